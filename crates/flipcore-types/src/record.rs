//! Settlement records for the audit trail.
//!
//! Every terminal transition of a wager attempt produces a
//! [`SettlementRecord`] that is emitted through structured logging. The
//! record carries a SHA-256 hash of its canonical payload so log lines can be
//! cross-checked against the ledger's transaction history after the fact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AttemptId, TxHash};

/// The terminal outcome this record proves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// The bet transfer confirmed and the draw lost; no payout owed.
    WagerLost,
    /// The bet transfer confirmed, the draw won, and the payout confirmed.
    PayoutDisbursed,
    /// The attempt terminated in a failure state. When the failure happened
    /// after collection, this record is the operator's reconciliation hook.
    SettlementFailed,
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WagerLost => write!(f, "WAGER_LOST"),
            Self::PayoutDisbursed => write!(f, "PAYOUT_DISBURSED"),
            Self::SettlementFailed => write!(f, "SETTLEMENT_FAILED"),
        }
    }
}

/// An audit-trail record of one terminal wager transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// What kind of terminal outcome this record proves.
    pub record_type: RecordType,
    /// The attempt this record belongs to.
    pub attempt_id: AttemptId,
    /// The bet-collection transaction, if one confirmed.
    pub payment_tx: Option<TxHash>,
    /// The payout transaction, if one confirmed.
    pub payout_tx: Option<TxHash>,
    /// Free-form detail (error text on failure, amounts on success).
    pub detail: String,
    /// SHA-256 hash over the canonical record payload.
    pub payload_hash: [u8; 32],
    /// When this record was issued.
    pub recorded_at: DateTime<Utc>,
}

impl SettlementRecord {
    #[must_use]
    pub fn new(
        record_type: RecordType,
        attempt_id: AttemptId,
        payment_tx: Option<TxHash>,
        payout_tx: Option<TxHash>,
        detail: impl Into<String>,
    ) -> Self {
        let detail = detail.into();
        let payload_hash = Self::hash_payload(record_type, attempt_id, payment_tx, payout_tx, &detail);
        Self {
            record_type,
            attempt_id,
            payment_tx,
            payout_tx,
            detail,
            payload_hash,
            recorded_at: Utc::now(),
        }
    }

    /// Canonical payload hash: `"flipcore:record:v1:" || type || attempt ||
    /// payment_tx || payout_tx || detail`.
    fn hash_payload(
        record_type: RecordType,
        attempt_id: AttemptId,
        payment_tx: Option<TxHash>,
        payout_tx: Option<TxHash>,
        detail: &str,
    ) -> [u8; 32] {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"flipcore:record:v1:");
        hasher.update(record_type.to_string().as_bytes());
        hasher.update(attempt_id.0.as_bytes());
        hasher.update(payment_tx.map_or([0u8; 32], |tx| tx.0));
        hasher.update(payout_tx.map_or([0u8; 32], |tx| tx.0));
        hasher.update(detail.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        bytes
    }

    /// Hex form of the payload hash, for log lines.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.payload_hash)
    }
}
