//! The signed, time-bounded transfer authorization.
//!
//! A [`TransferAuthorization`] is the payer's off-chain permission for the
//! settlement account to pull a specific value once. The engine validates its
//! static invariants; the freshness window and signer identity are enforced by
//! the ledger itself during transfer execution.

use serde::{Deserialize, Serialize};

use crate::{Address, AuthNonce, ReplayKey, TokenAmount};

/// Permission to move `value` from `from` to `to`, valid within
/// `[valid_after, valid_before)`, identified by a signer-chosen nonce.
///
/// Wire form is camelCase with string-encoded numerics, matching the x402
/// payload schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferAuthorization {
    /// Payer address.
    pub from: Address,
    /// Recipient address; must equal the configured payee.
    pub to: Address,
    /// Transfer value in base units.
    pub value: TokenAmount,
    /// Unix timestamp before which the signature is not yet valid.
    #[serde(with = "u64_string")]
    pub valid_after: u64,
    /// Unix timestamp at which the signature expires.
    #[serde(with = "u64_string")]
    pub valid_before: u64,
    /// Opaque 32-byte unique token chosen by the signer.
    pub nonce: AuthNonce,
}

impl TransferAuthorization {
    /// The unit of replay tracking for this authorization.
    #[must_use]
    pub fn replay_key(&self) -> ReplayKey {
        ReplayKey::derive(&self.from, &self.nonce)
    }

    /// Whether `now` (unix seconds) falls inside the validity window.
    /// The lower bound is exclusive and the upper bound is exclusive,
    /// matching the ledger's own check.
    #[must_use]
    pub fn is_live(&self, now: u64) -> bool {
        now > self.valid_after && now < self.valid_before
    }
}

mod u64_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &u64, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(de)?;
        raw.parse::<u64>()
            .map_err(|e| D::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
    }
}

/// Dummy authorization for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl TransferAuthorization {
    /// A live authorization for `value` base units with a random nonce.
    pub fn dummy(from: Address, to: Address, value: u128) -> Self {
        Self {
            from,
            to,
            value: TokenAmount(value),
            valid_after: 0,
            valid_before: u64::MAX,
            nonce: AuthNonce(rand::random::<[u8; 32]>()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payer() -> Address {
        "0x1111111111111111111111111111111111111111".parse().unwrap()
    }

    fn payee() -> Address {
        "0xea55e1a310202453685d91dcf654db9d38a286a3".parse().unwrap()
    }

    #[test]
    fn wire_roundtrip() {
        let auth = TransferAuthorization {
            from: payer(),
            to: payee(),
            value: TokenAmount(50_000),
            valid_after: 0,
            valid_before: 1_999_999_999,
            nonce: AuthNonce([0x5a; 32]),
        };
        let json = serde_json::to_string(&auth).unwrap();
        assert!(json.contains("\"validAfter\":\"0\""));
        assert!(json.contains("\"value\":\"50000\""));
        let back: TransferAuthorization = serde_json::from_str(&json).unwrap();
        assert_eq!(auth, back);
    }

    #[test]
    fn parses_reference_payload() {
        let json = r#"{
            "from": "0x1111111111111111111111111111111111111111",
            "to": "0xEA55E1A310202453685D91DCF654DB9D38A286A3",
            "value": "50000",
            "validAfter": "0",
            "validBefore": "1999999999",
            "nonce": "0x5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a"
        }"#;
        let auth: TransferAuthorization = serde_json::from_str(json).unwrap();
        assert_eq!(auth.value, TokenAmount(50_000));
        assert_eq!(auth.to, payee());
    }

    #[test]
    fn missing_field_is_rejected() {
        let json = r#"{
            "from": "0x1111111111111111111111111111111111111111",
            "value": "50000",
            "validAfter": "0",
            "validBefore": "1999999999",
            "nonce": "0x5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a"
        }"#;
        assert!(serde_json::from_str::<TransferAuthorization>(json).is_err());
    }

    #[test]
    fn replay_key_folds_address_case() {
        let mut a = TransferAuthorization::dummy(
            "0xabcdef1111111111111111111111111111111111".parse().unwrap(),
            payee(),
            50_000,
        );
        a.nonce = AuthNonce([1u8; 32]);
        let b = TransferAuthorization {
            from: "0xABCDEF1111111111111111111111111111111111".parse().unwrap(),
            ..a.clone()
        };
        assert_eq!(a.replay_key(), b.replay_key());
    }

    #[test]
    fn validity_window_bounds() {
        let auth = TransferAuthorization {
            from: payer(),
            to: payee(),
            value: TokenAmount(50_000),
            valid_after: 100,
            valid_before: 200,
            nonce: AuthNonce([2u8; 32]),
        };
        assert!(!auth.is_live(100));
        assert!(auth.is_live(101));
        assert!(auth.is_live(199));
        assert!(!auth.is_live(200));
    }
}
