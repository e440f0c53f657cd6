//! The settlement orchestrator — one wager, end to end.
//!
//! Sequences validation → replay reservation → bet collection → outcome draw
//! → (conditional) payout → resolution, advancing the wager state machine and
//! translating every failure into a classified error. Ledger confirmation
//! waits happen outside any lock; the replay guard's mutex only protects its
//! own bookkeeping.
//!
//! Payout-stage failures are the one correctness-sensitive partial-failure
//! state: the payer's funds were already collected. They are logged at ERROR
//! with full detail for operator reconciliation and must never be retried by
//! the client.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use flipcore_ingress::{AuthorizationValidator, ReplayGuard};
use flipcore_ledger::SettlementLedger;
use flipcore_types::{
    EngineConfig, FlipcoreError, RecordType, Result, SettlementRecord, TransferAuthorization,
    WagerAttempt, WagerResolution, WagerState,
};

use crate::outcome::{DrawSource, OutcomeEngine, ThreadRngDraw};

/// Drives wager attempts through their state machine against a ledger.
pub struct SettlementOrchestrator<L: SettlementLedger> {
    config: Arc<EngineConfig>,
    validator: AuthorizationValidator,
    guard: Arc<ReplayGuard>,
    outcome: OutcomeEngine,
    ledger: L,
    draw_source: Mutex<Box<dyn DrawSource>>,
}

impl<L: SettlementLedger> SettlementOrchestrator<L> {
    /// Build an orchestrator with the production draw source.
    ///
    /// # Errors
    /// Propagates configuration validation failures.
    pub fn new(config: Arc<EngineConfig>, ledger: L) -> Result<Self> {
        Self::with_draw_source(config, ledger, Box::new(ThreadRngDraw))
    }

    /// Build an orchestrator with an injected draw source (deterministic
    /// testing, external randomness beacons).
    ///
    /// # Errors
    /// Propagates configuration validation failures.
    pub fn with_draw_source(
        config: Arc<EngineConfig>,
        ledger: L,
        draw_source: Box<dyn DrawSource>,
    ) -> Result<Self> {
        config.validate()?;
        let outcome = OutcomeEngine::new(config.win_probability)?;
        let guard = Arc::new(ReplayGuard::new(
            config.replay_retention,
            config.max_replay_entries,
        ));
        Ok(Self {
            validator: AuthorizationValidator::new(Arc::clone(&config)),
            config,
            guard,
            outcome,
            ledger,
            draw_source: Mutex::new(draw_source),
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    #[must_use]
    pub fn replay_guard(&self) -> &ReplayGuard {
        &self.guard
    }

    /// Settle one authorized wager.
    ///
    /// Exactly one structured resolution or classified error per call; no
    /// ledger operation is ever retried here.
    ///
    /// # Errors
    /// - validation / replay errors: terminal, no ledger interaction
    /// - collection errors: terminal, no funds moved, reservation released
    /// - payout errors: terminal **after** funds were collected
    pub async fn settle(
        &self,
        authorization: TransferAuthorization,
        signature_blob: &str,
    ) -> Result<WagerResolution> {
        let mut attempt = WagerAttempt::new(authorization);
        tracing::info!(
            attempt = %attempt.id,
            from = %attempt.authorization.from.short(),
            value = %attempt.bet_amount,
            "wager received"
        );

        // Stage 1: pre-ledger validation.
        let signature =
            match self
                .validator
                .validate(&attempt.authorization, signature_blob, &self.guard)
            {
                Ok(signature) => signature,
                Err(err) => return Err(self.reject(&mut attempt, err)),
            };
        attempt.advance(WagerState::Validated)?;

        // Stage 2: atomic replay reservation, then the pull-transfer. The
        // reservation is the serialization point for concurrent requests
        // carrying the same (from, nonce).
        let key = attempt.authorization.replay_key();
        if let Err(err) = self.guard.try_begin(&key) {
            return Err(self.reject(&mut attempt, err));
        }

        let collected = self
            .ledger
            .collect_bet(&attempt.authorization, &signature)
            .await;
        match collected {
            Ok(receipt) => {
                // Only now is the nonce burnt: funds have actually moved.
                self.guard.commit(&key);
                attempt.collection = Some(receipt);
                attempt.advance(WagerState::BetCollected)?;
            }
            Err(err) => {
                // No funds moved; the same authorization stays usable.
                self.guard.release(&key);
                return Err(self.reject(&mut attempt, err));
            }
        }

        // Stage 3: the draw.
        let (roll, lucky) = {
            let mut source = self.draw_source.lock().expect("draw source lock poisoned");
            self.outcome.draw_and_decide(source.as_mut())
        };
        attempt.lucky = Some(lucky);
        attempt.advance(WagerState::OutcomeDrawn)?;
        tracing::info!(
            attempt = %attempt.id,
            roll,
            threshold = self.outcome.win_probability(),
            lucky,
            "outcome drawn"
        );

        // Stage 4: conditional payout.
        if lucky {
            let payout_amount = attempt
                .bet_amount
                .checked_mul(self.config.payout_multiplier)
                .ok_or_else(|| FlipcoreError::Internal("payout amount overflow".to_string()))?;

            let disbursed = self
                .ledger
                .disburse_payout(attempt.authorization.from, payout_amount)
                .await;
            match disbursed {
                Ok(receipt) => {
                    attempt.payout = Some(receipt);
                    attempt.advance(WagerState::PayoutSent)?;
                }
                Err(err) => {
                    // The payer already paid and won. Nothing here retries;
                    // the record below is the operator's reconciliation hook.
                    attempt.fail();
                    let record = SettlementRecord::new(
                        RecordType::SettlementFailed,
                        attempt.id,
                        attempt.collection.map(|r| r.tx_hash),
                        None,
                        err.to_string(),
                    );
                    tracing::error!(
                        attempt = %attempt.id,
                        class = %err.class(),
                        record = %record.hash_hex(),
                        payment_tx = ?attempt.collection.map(|r| r.tx_hash.to_string()),
                        owed = %payout_amount,
                        "bet collected but payout failed; manual reconciliation required"
                    );
                    return Err(err);
                }
            }
        }

        attempt.advance(WagerState::Completed)?;
        let resolution = self.resolve(&attempt, lucky);

        let record = SettlementRecord::new(
            if lucky {
                RecordType::PayoutDisbursed
            } else {
                RecordType::WagerLost
            },
            attempt.id,
            attempt.collection.map(|r| r.tx_hash),
            attempt.payout.map(|r| r.tx_hash),
            format!("bet {}", attempt.bet_amount),
        );
        tracing::info!(
            attempt = %attempt.id,
            record_type = %record.record_type,
            record = %record.hash_hex(),
            "wager settled"
        );
        Ok(resolution)
    }

    /// Terminal rejection before any payout obligation exists.
    fn reject(&self, attempt: &mut WagerAttempt, err: FlipcoreError) -> FlipcoreError {
        attempt.fail();
        let record = SettlementRecord::new(
            RecordType::SettlementFailed,
            attempt.id,
            attempt.collection.map(|r| r.tx_hash),
            None,
            err.to_string(),
        );
        tracing::info!(
            attempt = %attempt.id,
            class = %err.class(),
            record = %record.hash_hex(),
            error = %err,
            "wager rejected"
        );
        err
    }

    fn resolve(&self, attempt: &WagerAttempt, lucky: bool) -> WagerResolution {
        let collection = attempt
            .collection
            .expect("resolved attempts always carry a collection receipt");
        WagerResolution {
            lucky,
            bet_amount: attempt.bet_amount,
            recipient: attempt.authorization.from,
            payment_tx: collection.tx_hash,
            payout_tx: attempt.payout.map(|r| r.tx_hash),
            payout_amount: attempt.payout.map(|r| r.amount),
            block_number: attempt.payout.map(|r| r.block_number),
            timestamp: Utc::now(),
        }
    }
}
