//! Authorization validator — hard gate ahead of any ledger interaction.
//!
//! Checks run in a fixed order and the first failure determines the reported
//! reason, which is what gives clients precise status codes. The validator is
//! pure and synchronous: it consults the replay guard read-only and never
//! touches the ledger. On-chain authorization correctness (signer identity,
//! freshness window) is the ledger's own verification and surfaces as a
//! collection failure if wrong.

use std::sync::Arc;

use flipcore_types::{
    EcdsaSignature, EngineConfig, FlipcoreError, Result, TransferAuthorization,
};

use crate::replay_guard::ReplayGuard;

/// Validates inbound authorizations against protocol invariants.
pub struct AuthorizationValidator {
    config: Arc<EngineConfig>,
}

impl AuthorizationValidator {
    #[must_use]
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    /// Run all pre-ledger checks, returning the decomposed signature on
    /// success.
    ///
    /// Check order (first failure wins):
    /// 1. structural completeness (degenerate zero value)
    /// 2. amount bounds
    /// 3. recipient match (case-insensitive by construction)
    /// 4. signature decomposability
    /// 5. replay state
    ///
    /// # Errors
    /// A 1xx/2xx classified [`FlipcoreError`] naming the failed check.
    pub fn validate(
        &self,
        authorization: &TransferAuthorization,
        signature_blob: &str,
        guard: &ReplayGuard,
    ) -> Result<EcdsaSignature> {
        if authorization.value.is_zero() {
            return Err(FlipcoreError::InvalidPayload {
                reason: "zero-value authorization".to_string(),
            });
        }

        if authorization.value < self.config.min_bet {
            return Err(FlipcoreError::BetBelowMinimum {
                value: authorization.value,
                min: self.config.min_bet,
            });
        }
        if authorization.value > self.config.max_bet {
            return Err(FlipcoreError::BetAboveMaximum {
                value: authorization.value,
                max: self.config.max_bet,
            });
        }

        if authorization.to != self.config.payment_recipient {
            return Err(FlipcoreError::RecipientMismatch {
                expected: self.config.payment_recipient,
                actual: authorization.to,
            });
        }

        let signature = EcdsaSignature::parse(signature_blob)?;

        let key = authorization.replay_key();
        if guard.has(&key) {
            return Err(FlipcoreError::AuthorizationReplayed(key));
        }

        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipcore_types::{Address, TokenAmount};
    use std::time::Duration;

    fn recipient() -> Address {
        "0xea55e1a310202453685d91dcf654db9d38a286a3".parse().unwrap()
    }

    fn payer() -> Address {
        "0x1111111111111111111111111111111111111111".parse().unwrap()
    }

    fn validator() -> AuthorizationValidator {
        AuthorizationValidator::new(Arc::new(EngineConfig::base_usdc(recipient())))
    }

    fn guard() -> ReplayGuard {
        ReplayGuard::new(Duration::from_secs(3600), 100)
    }

    fn good_signature() -> String {
        format!("0x{}{}1b", "11".repeat(32), "22".repeat(32))
    }

    #[test]
    fn accepts_reference_authorization() {
        let auth = TransferAuthorization::dummy(payer(), recipient(), 50_000);
        let sig = validator()
            .validate(&auth, &good_signature(), &guard())
            .unwrap();
        assert_eq!(sig.v, 27);
    }

    #[test]
    fn rejects_below_minimum() {
        let auth = TransferAuthorization::dummy(payer(), recipient(), 49_999);
        let err = validator()
            .validate(&auth, &good_signature(), &guard())
            .unwrap_err();
        assert!(matches!(err, FlipcoreError::BetBelowMinimum { .. }));
    }

    #[test]
    fn rejects_above_maximum() {
        let auth = TransferAuthorization::dummy(payer(), recipient(), 2_000_000_000);
        let err = validator()
            .validate(&auth, &good_signature(), &guard())
            .unwrap_err();
        assert!(matches!(
            err,
            FlipcoreError::BetAboveMaximum {
                value: TokenAmount(2_000_000_000),
                ..
            }
        ));
    }

    #[test]
    fn accepts_boundary_amounts() {
        let v = validator();
        let g = guard();
        let min = TransferAuthorization::dummy(payer(), recipient(), 50_000);
        let max = TransferAuthorization::dummy(payer(), recipient(), 1_000_000_000);
        assert!(v.validate(&min, &good_signature(), &g).is_ok());
        assert!(v.validate(&max, &good_signature(), &g).is_ok());
    }

    #[test]
    fn rejects_wrong_recipient() {
        let auth = TransferAuthorization::dummy(payer(), payer(), 50_000);
        let err = validator()
            .validate(&auth, &good_signature(), &guard())
            .unwrap_err();
        assert!(matches!(err, FlipcoreError::RecipientMismatch { .. }));
    }

    #[test]
    fn bounds_reported_before_recipient() {
        // Both checks would fail; the bounds reason must win.
        let auth = TransferAuthorization::dummy(payer(), payer(), 1);
        let err = validator()
            .validate(&auth, &good_signature(), &guard())
            .unwrap_err();
        assert!(matches!(err, FlipcoreError::BetBelowMinimum { .. }));
    }

    #[test]
    fn rejects_malformed_signature() {
        let auth = TransferAuthorization::dummy(payer(), recipient(), 50_000);
        let err = validator()
            .validate(&auth, "0xdeadbeef", &guard())
            .unwrap_err();
        assert!(matches!(err, FlipcoreError::MalformedSignature { .. }));
    }

    #[test]
    fn rejects_tracked_replay_key() {
        let auth = TransferAuthorization::dummy(payer(), recipient(), 50_000);
        let g = guard();
        g.try_begin(&auth.replay_key()).unwrap();
        g.commit(&auth.replay_key());
        let err = validator()
            .validate(&auth, &good_signature(), &g)
            .unwrap_err();
        assert!(matches!(err, FlipcoreError::AuthorizationReplayed(_)));
    }

    #[test]
    fn rejects_zero_value() {
        let auth = TransferAuthorization::dummy(payer(), recipient(), 0);
        let err = validator()
            .validate(&auth, &good_signature(), &guard())
            .unwrap_err();
        assert!(matches!(err, FlipcoreError::InvalidPayload { .. }));
    }
}
