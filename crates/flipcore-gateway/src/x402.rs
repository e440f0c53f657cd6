//! x402 payment-header codec.
//!
//! The `X-PAYMENT` header carries a base64-encoded JSON envelope:
//!
//! ```json
//! {
//!   "x402Version": 1,
//!   "scheme": "exact",
//!   "network": "base",
//!   "payload": {
//!     "signature": "0x…65 bytes…",
//!     "authorization": { "from": "…", "to": "…", "value": "50000", … }
//!   }
//! }
//! ```
//!
//! Decoding failures are all classified as `InvalidPayload` so the boundary
//! maps them to HTTP 400 uniformly.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use flipcore_types::{FlipcoreError, Result, TransferAuthorization, constants};

/// The outer x402 envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEnvelope {
    pub x402_version: u32,
    pub scheme: String,
    pub network: String,
    pub payload: PaymentPayload,
}

/// The signed authorization and its detached signature blob. The signature
/// stays a raw string here — decomposition happens in the validator so a
/// malformed blob is reported with its precise reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub signature: String,
    pub authorization: TransferAuthorization,
}

/// Decode and structurally check an `X-PAYMENT` header value.
///
/// # Errors
/// `InvalidPayload` on bad base64, malformed JSON, missing fields, or an
/// unsupported protocol version.
pub fn decode_payment_header(header: &str) -> Result<PaymentEnvelope> {
    let raw = BASE64
        .decode(header.trim())
        .map_err(|e| FlipcoreError::InvalidPayload {
            reason: format!("payment header is not valid base64: {e}"),
        })?;

    let envelope: PaymentEnvelope =
        serde_json::from_slice(&raw).map_err(|e| FlipcoreError::InvalidPayload {
            reason: format!("invalid x402 payload: {e}"),
        })?;

    if envelope.x402_version != constants::X402_VERSION {
        return Err(FlipcoreError::InvalidPayload {
            reason: format!("unsupported x402 version {}", envelope.x402_version),
        });
    }

    Ok(envelope)
}

/// Encode an envelope into an `X-PAYMENT` header value. Used by clients and
/// the test suites.
///
/// # Errors
/// `Serialization` if the envelope cannot be serialized.
pub fn encode_payment_header(envelope: &PaymentEnvelope) -> Result<String> {
    let json = serde_json::to_vec(envelope)
        .map_err(|e| FlipcoreError::Serialization(e.to_string()))?;
    Ok(BASE64.encode(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipcore_types::{Address, TokenAmount};

    fn payer() -> Address {
        "0x1111111111111111111111111111111111111111".parse().unwrap()
    }

    fn payee() -> Address {
        "0xea55e1a310202453685d91dcf654db9d38a286a3".parse().unwrap()
    }

    fn envelope() -> PaymentEnvelope {
        PaymentEnvelope {
            x402_version: 1,
            scheme: "exact".to_string(),
            network: "base".to_string(),
            payload: PaymentPayload {
                signature: format!("0x{}{}1b", "11".repeat(32), "22".repeat(32)),
                authorization: TransferAuthorization::dummy(payer(), payee(), 50_000),
            },
        }
    }

    #[test]
    fn header_roundtrip() {
        let envelope = envelope();
        let header = encode_payment_header(&envelope).unwrap();
        let back = decode_payment_header(&header).unwrap();
        assert_eq!(back.x402_version, 1);
        assert_eq!(back.scheme, "exact");
        assert_eq!(back.payload.authorization.value, TokenAmount(50_000));
        assert_eq!(back.payload.signature, envelope.payload.signature);
    }

    #[test]
    fn wire_field_names_are_camel_case() {
        let json = serde_json::to_value(envelope()).unwrap();
        assert!(json.get("x402Version").is_some());
        assert!(json["payload"]["authorization"].get("validBefore").is_some());
    }

    #[test]
    fn rejects_bad_base64() {
        let err = decode_payment_header("!!! not base64 !!!").unwrap_err();
        assert!(matches!(err, FlipcoreError::InvalidPayload { .. }));
    }

    #[test]
    fn rejects_non_json_payload() {
        let header = BASE64.encode(b"hello");
        let err = decode_payment_header(&header).unwrap_err();
        assert!(matches!(err, FlipcoreError::InvalidPayload { .. }));
    }

    #[test]
    fn rejects_missing_authorization() {
        let header = BASE64.encode(
            br#"{"x402Version":1,"scheme":"exact","network":"base","payload":{"signature":"0x00"}}"#,
        );
        let err = decode_payment_header(&header).unwrap_err();
        assert!(matches!(err, FlipcoreError::InvalidPayload { .. }));
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut envelope = envelope();
        envelope.x402_version = 2;
        let header = encode_payment_header(&envelope).unwrap();
        let err = decode_payment_header(&header).unwrap_err();
        assert!(matches!(err, FlipcoreError::InvalidPayload { .. }));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let header = format!("  {}  ", encode_payment_header(&envelope()).unwrap());
        assert!(decode_payment_header(&header).is_ok());
    }
}
