//! The 402 capability document.
//!
//! A static, machine-readable description of the offer: price bounds,
//! recipient, asset, accepted scheme/network, and the input/output schema a
//! client must conform to. Served to any request that does not carry a
//! payment header.

use serde_json::{Value, json};

use flipcore_types::{EngineConfig, constants};

/// Build the capability/challenge document for this deployment.
#[must_use]
pub fn capability_document(config: &EngineConfig, resource: &str) -> Value {
    let min_display = config.min_bet.to_display(config.asset_decimals);
    let max_display = config.max_bet.to_display(config.asset_decimals);
    let win_pct = config.win_probability * 100.0;
    let symbol = &config.asset_symbol;

    json!({
        "x402Version": constants::X402_VERSION,
        "error": "Payment Required",
        "message": format!("Pay minimum {min_display} {symbol} to flip a coin"),
        "accepts": [{
            "name": format!("{} | Coinflip on x402", constants::ENGINE_NAME),
            "scheme": config.scheme,
            "network": config.network,
            "maxAmountRequired": config.min_bet.to_string(),
            "resource": resource,
            "description": format!(
                "Flip it or leave it. {win_pct:.0}% win chance. (Min: {min_display}, Max: {max_display} {symbol})"
            ),
            "mimeType": "application/json",
            "payTo": config.payment_recipient.to_string(),
            "asset": config.asset.to_string(),
            "maxTimeoutSeconds": constants::MAX_TIMEOUT_SECS,
            "outputSchema": {
                "input": {
                    "type": "http",
                    "method": "POST",
                    "properties": {
                        "x402Version": { "type": "number" },
                        "scheme": { "type": "string" },
                        "network": { "type": "string" },
                        "payload": {
                            "type": "object",
                            "properties": {
                                "signature": { "type": "string" },
                                "authorization": {
                                    "type": "object",
                                    "properties": {
                                        "from": { "type": "string" },
                                        "to": { "type": "string" },
                                        "value": { "type": "string" },
                                        "validAfter": { "type": "string" },
                                        "validBefore": { "type": "string" },
                                        "nonce": { "type": "string" }
                                    }
                                }
                            }
                        }
                    }
                },
                "output": {
                    "success": "boolean",
                    "message": "string",
                    "data": {
                        "type": "object",
                        "properties": {
                            "lucky": { "type": "boolean" },
                            "betAmount": { "type": "string" },
                            "payoutAmount": { "type": "string" },
                            "recipient": { "type": "string" },
                            "paymentTx": { "type": "string" },
                            "payoutTx": { "type": "string" }
                        }
                    }
                }
            }
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipcore_types::Address;

    fn config() -> EngineConfig {
        let recipient: Address = "0xea55e1a310202453685d91dcf654db9d38a286a3".parse().unwrap();
        EngineConfig::base_usdc(recipient)
    }

    #[test]
    fn document_advertises_reference_terms() {
        let doc = capability_document(&config(), "https://flip.example/");
        assert_eq!(doc["x402Version"], json!(1));
        assert_eq!(doc["error"], json!("Payment Required"));

        let accept = &doc["accepts"][0];
        assert_eq!(accept["scheme"], json!("exact"));
        assert_eq!(accept["network"], json!("base"));
        assert_eq!(accept["maxAmountRequired"], json!("50000"));
        assert_eq!(
            accept["payTo"],
            json!("0xea55e1a310202453685d91dcf654db9d38a286a3")
        );
        assert_eq!(accept["maxTimeoutSeconds"], json!(3600));
        assert_eq!(accept["resource"], json!("https://flip.example/"));
    }

    #[test]
    fn message_uses_display_denomination() {
        let doc = capability_document(&config(), "https://flip.example/");
        assert_eq!(doc["message"], json!("Pay minimum 0.05 USDC to flip a coin"));
        let description = doc["accepts"][0]["description"].as_str().unwrap();
        assert!(description.contains("30% win chance"));
        assert!(description.contains("Max: 1000"));
    }

    #[test]
    fn schema_names_every_authorization_field() {
        let doc = capability_document(&config(), "r");
        let auth_props = &doc["accepts"][0]["outputSchema"]["input"]["properties"]["payload"]
            ["properties"]["authorization"]["properties"];
        for field in ["from", "to", "value", "validAfter", "validBefore", "nonce"] {
            assert!(auth_props.get(field).is_some(), "missing {field}");
        }
    }
}
