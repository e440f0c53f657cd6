//! # WagerAttempt — the per-request unit of work
//!
//! One inbound authorized payment produces one [`WagerAttempt`], driven
//! through a monotonic state machine by the settlement orchestrator:
//!
//! ```text
//!   RECEIVED ──▶ VALIDATED ──▶ BET_COLLECTED ──▶ OUTCOME_DRAWN ──┬─▶ PAYOUT_SENT ──▶ COMPLETED
//!       │             │                                          │                       ▲
//!       │             │                                          └───────(lost)──────────┘
//!       └──────┬──────┴──────────────(payout failed)──▶ FAILED
//! ```
//!
//! Attempts are never persisted: crash recovery and audit rely on the
//! external ledger's transaction history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Address, AttemptId, TokenAmount, TransferAuthorization, TxHash};

/// The lifecycle state of a wager attempt.
///
/// Transitions are **monotonic** (never go backwards); `Completed` and
/// `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WagerState {
    /// Request decoded, nothing checked yet.
    Received,
    /// All pre-ledger invariants passed.
    Validated,
    /// The pull-transfer confirmed; the payer's funds have moved.
    /// **Irreversible** — the replay key is committed at this point.
    BetCollected,
    /// The outcome draw has been evaluated.
    OutcomeDrawn,
    /// The payout transfer confirmed (winning path only).
    PayoutSent,
    /// Terminal success (won-and-paid or lost).
    Completed,
    /// Terminal failure at some stage.
    Failed,
}

impl WagerState {
    /// Can this attempt transition to the given target state?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Received, Self::Validated)
                | (Self::Validated, Self::BetCollected)
                | (Self::BetCollected, Self::OutcomeDrawn)
                | (Self::OutcomeDrawn, Self::PayoutSent | Self::Completed)
                | (Self::PayoutSent, Self::Completed)
                | (
                    Self::Received | Self::Validated | Self::BetCollected | Self::OutcomeDrawn,
                    Self::Failed
                )
        )
    }

    /// Whether this state ends the attempt.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for WagerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Received => write!(f, "RECEIVED"),
            Self::Validated => write!(f, "VALIDATED"),
            Self::BetCollected => write!(f, "BET_COLLECTED"),
            Self::OutcomeDrawn => write!(f, "OUTCOME_DRAWN"),
            Self::PayoutSent => write!(f, "PAYOUT_SENT"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// A confirmed transfer as reported by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    /// Confirmed transaction identifier.
    pub tx_hash: TxHash,
    /// Block in which the transaction was included.
    pub block_number: u64,
    /// The moved amount.
    pub amount: TokenAmount,
}

/// Transient per-request work item. Created on arrival, discarded after the
/// response is produced.
#[derive(Debug, Clone)]
pub struct WagerAttempt {
    /// Log-correlation identifier for this attempt.
    pub id: AttemptId,
    /// The inbound authorization.
    pub authorization: TransferAuthorization,
    /// Derived bet amount (the authorization's value).
    pub bet_amount: TokenAmount,
    /// Current lifecycle state.
    pub state: WagerState,
    /// The confirmed bet-collection transfer, once it exists.
    pub collection: Option<TransferReceipt>,
    /// The drawn outcome, once it exists.
    pub lucky: Option<bool>,
    /// The confirmed payout transfer (winning path only).
    pub payout: Option<TransferReceipt>,
}

impl WagerAttempt {
    #[must_use]
    pub fn new(authorization: TransferAuthorization) -> Self {
        let bet_amount = authorization.value;
        Self {
            id: AttemptId::new(),
            authorization,
            bet_amount,
            state: WagerState::Received,
            collection: None,
            lucky: None,
            payout: None,
        }
    }

    /// Advance to the next state, enforcing the monotonic transition table.
    ///
    /// # Errors
    /// Returns an internal error on an illegal transition — that is an engine
    /// bug, not a client condition.
    pub fn advance(&mut self, target: WagerState) -> crate::Result<()> {
        if !self.state.can_transition_to(target) {
            return Err(crate::FlipcoreError::Internal(format!(
                "illegal wager transition {} -> {target} for {}",
                self.state, self.id
            )));
        }
        self.state = target;
        Ok(())
    }

    /// Force the attempt into its terminal failure state. Legal from every
    /// non-terminal state, a no-op once terminal.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = WagerState::Failed;
        }
    }
}

/// The structured terminal result of a settled wager, serialized verbatim
/// into the HTTP response's `data` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WagerResolution {
    /// Whether the draw won.
    pub lucky: bool,
    /// The collected bet amount in base units.
    pub bet_amount: TokenAmount,
    /// The payer (and payout recipient on a win).
    pub recipient: Address,
    /// The confirmed bet-collection transaction.
    pub payment_tx: TxHash,
    /// The confirmed payout transaction (win only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_tx: Option<TxHash>,
    /// The payout amount in base units (win only, exactly 2x the bet).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_amount: Option<TokenAmount>,
    /// Block reference of the payout transaction (win only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// When the resolution was produced.
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuthNonce;

    fn make_attempt() -> WagerAttempt {
        let auth = TransferAuthorization {
            from: "0x1111111111111111111111111111111111111111".parse().unwrap(),
            to: "0xea55e1a310202453685d91dcf654db9d38a286a3".parse().unwrap(),
            value: TokenAmount(50_000),
            valid_after: 0,
            valid_before: u64::MAX,
            nonce: AuthNonce([3u8; 32]),
        };
        WagerAttempt::new(auth)
    }

    #[test]
    fn happy_path_transitions() {
        let mut attempt = make_attempt();
        assert_eq!(attempt.state, WagerState::Received);
        attempt.advance(WagerState::Validated).unwrap();
        attempt.advance(WagerState::BetCollected).unwrap();
        attempt.advance(WagerState::OutcomeDrawn).unwrap();
        attempt.advance(WagerState::PayoutSent).unwrap();
        attempt.advance(WagerState::Completed).unwrap();
        assert!(attempt.state.is_terminal());
    }

    #[test]
    fn losing_path_skips_payout() {
        let mut attempt = make_attempt();
        attempt.advance(WagerState::Validated).unwrap();
        attempt.advance(WagerState::BetCollected).unwrap();
        attempt.advance(WagerState::OutcomeDrawn).unwrap();
        attempt.advance(WagerState::Completed).unwrap();
    }

    #[test]
    fn no_backward_transitions() {
        assert!(!WagerState::BetCollected.can_transition_to(WagerState::Validated));
        assert!(!WagerState::Completed.can_transition_to(WagerState::Received));
        assert!(!WagerState::Failed.can_transition_to(WagerState::Validated));
        assert!(!WagerState::PayoutSent.can_transition_to(WagerState::Failed));
    }

    #[test]
    fn illegal_transition_is_an_error() {
        let mut attempt = make_attempt();
        let err = attempt.advance(WagerState::PayoutSent).unwrap_err();
        assert!(matches!(err, crate::FlipcoreError::Internal(_)));
        assert_eq!(attempt.state, WagerState::Received);
    }

    #[test]
    fn fail_is_idempotent_and_terminal() {
        let mut attempt = make_attempt();
        attempt.advance(WagerState::Validated).unwrap();
        attempt.fail();
        assert_eq!(attempt.state, WagerState::Failed);
        attempt.fail();
        assert_eq!(attempt.state, WagerState::Failed);
    }

    #[test]
    fn bet_amount_is_derived_from_authorization() {
        let attempt = make_attempt();
        assert_eq!(attempt.bet_amount, TokenAmount(50_000));
    }

    #[test]
    fn resolution_omits_payout_fields_on_loss() {
        let resolution = WagerResolution {
            lucky: false,
            bet_amount: TokenAmount(50_000),
            recipient: "0x1111111111111111111111111111111111111111".parse().unwrap(),
            payment_tx: TxHash::deterministic("transfer", 1),
            payout_tx: None,
            payout_amount: None,
            block_number: None,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&resolution).unwrap();
        assert!(json.contains("\"lucky\":false"));
        assert!(json.contains("\"betAmount\":\"50000\""));
        assert!(!json.contains("payoutTx"));
        assert!(!json.contains("payoutAmount"));
    }

    #[test]
    fn resolution_win_wire_shape() {
        let resolution = WagerResolution {
            lucky: true,
            bet_amount: TokenAmount(50_000),
            recipient: "0x1111111111111111111111111111111111111111".parse().unwrap(),
            payment_tx: TxHash::deterministic("transfer", 1),
            payout_tx: Some(TxHash::deterministic("payout", 2)),
            payout_amount: Some(TokenAmount(100_000)),
            block_number: Some(42),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&resolution).unwrap();
        assert!(json.contains("\"payoutAmount\":\"100000\""));
        assert!(json.contains("\"blockNumber\":42"));
    }
}
