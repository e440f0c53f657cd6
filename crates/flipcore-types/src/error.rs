//! Error types for the flipcore settlement engine.
//!
//! All errors use the `FLIP_ERR_` prefix convention for easy grepping in
//! logs. Error codes are grouped by subsystem:
//! - 1xx: Validation errors (pre-ledger, client-recoverable)
//! - 2xx: Replay errors
//! - 3xx: Bet-collection errors (no funds moved)
//! - 4xx: Payout errors (funds already collected — partial failures)
//! - 9xx: General / internal errors
//!
//! The HTTP boundary never inspects message strings: every variant carries an
//! [`ErrorClass`] tag that is matched exhaustively for status mapping.

use thiserror::Error;

use crate::{Address, ReplayKey, TokenAmount};

/// Central error enum for all flipcore operations.
#[derive(Debug, Error)]
pub enum FlipcoreError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// The payment payload is structurally unusable (missing fields,
    /// undecodable header, unsupported protocol version).
    #[error("FLIP_ERR_100: Invalid x402 payload: {reason}")]
    InvalidPayload { reason: String },

    /// Bet value is below the configured minimum.
    #[error("FLIP_ERR_101: Insufficient amount: {value}, required minimum: {min}")]
    BetBelowMinimum { value: TokenAmount, min: TokenAmount },

    /// Bet value is above the configured maximum.
    #[error("FLIP_ERR_102: Bet exceeds maximum: {value}, maximum is {max}")]
    BetAboveMaximum { value: TokenAmount, max: TokenAmount },

    /// The authorization's `to` is not the configured payment recipient.
    #[error("FLIP_ERR_103: Invalid payment recipient: expected {expected}, got {actual}")]
    RecipientMismatch { expected: Address, actual: Address },

    /// The signature blob does not decompose into (r, s, v).
    #[error("FLIP_ERR_104: Invalid signature format: {reason}")]
    MalformedSignature { reason: String },

    /// An address field failed hex decoding.
    #[error("FLIP_ERR_105: Invalid address encoding: {0}")]
    MalformedAddress(String),

    /// An amount field failed integer decoding.
    #[error("FLIP_ERR_106: Invalid amount encoding: {0}")]
    MalformedAmount(String),

    /// A nonce field failed hex decoding.
    #[error("FLIP_ERR_107: Invalid nonce encoding: {0}")]
    MalformedNonce(String),

    // =================================================================
    // Replay Errors (2xx)
    // =================================================================
    /// The authorization's replay key is already tracked (consumed or
    /// mid-flight in a concurrent request).
    #[error("FLIP_ERR_200: Authorization already processed: {0}")]
    AuthorizationReplayed(ReplayKey),

    // =================================================================
    // Bet-Collection Errors (3xx) — no funds moved
    // =================================================================
    /// The ledger rejected or reverted the pull-transfer (bad signer,
    /// expired window, consumed nonce, insufficient payer funds).
    #[error("FLIP_ERR_300: Bet collection rejected: {reason}")]
    CollectionRejected { reason: String },

    // =================================================================
    // Payout Errors (4xx) — bet already collected
    // =================================================================
    /// Settlement account holds too little native currency to cover the
    /// payout transaction. Operational condition, never leaked to clients.
    #[error("FLIP_ERR_400: Insufficient gas reserve: need {needed}, have {available}")]
    InsufficientGasReserve {
        needed: TokenAmount,
        available: TokenAmount,
    },

    /// Settlement account holds too little of the wagered asset to cover
    /// the payout amount.
    #[error("FLIP_ERR_401: Insufficient asset reserve: need {needed}, have {available}")]
    InsufficientAssetReserve {
        needed: TokenAmount,
        available: TokenAmount,
    },

    /// The payout transaction was rejected after preconditions passed.
    #[error("FLIP_ERR_402: Payout transfer rejected: {reason}")]
    PayoutRejected { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("FLIP_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("FLIP_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid bounds, probability out of range, etc.).
    #[error("FLIP_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Coarse failure classification used for exhaustive matching at the HTTP
/// boundary and in operator alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Pre-ledger rejection. Fully recoverable: the client retries with a
    /// corrected or fresh authorization.
    Validation,
    /// Bet transfer failed. No funds moved; safely retryable.
    Collection,
    /// Payout precondition failed after the bet was collected. Operational,
    /// alert-worthy, not client-retryable.
    PayoutPrecondition,
    /// Payout submission failed after preconditions passed. Same
    /// partial-failure class as above.
    PayoutSubmission,
    /// Engine-internal failure.
    Internal,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::Collection => write!(f, "COLLECTION"),
            Self::PayoutPrecondition => write!(f, "PAYOUT_PRECONDITION"),
            Self::PayoutSubmission => write!(f, "PAYOUT_SUBMISSION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

impl FlipcoreError {
    /// Classify this error for boundary mapping. Replay rejections are a
    /// validation-stage outcome (no ledger interaction happened), even
    /// though the HTTP layer gives them a dedicated status.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidPayload { .. }
            | Self::BetBelowMinimum { .. }
            | Self::BetAboveMaximum { .. }
            | Self::RecipientMismatch { .. }
            | Self::MalformedSignature { .. }
            | Self::MalformedAddress(_)
            | Self::MalformedNonce(_)
            | Self::MalformedAmount(_)
            | Self::AuthorizationReplayed(_) => ErrorClass::Validation,
            Self::CollectionRejected { .. } => ErrorClass::Collection,
            Self::InsufficientGasReserve { .. } | Self::InsufficientAssetReserve { .. } => {
                ErrorClass::PayoutPrecondition
            }
            Self::PayoutRejected { .. } => ErrorClass::PayoutSubmission,
            Self::Internal(_) | Self::Serialization(_) | Self::Configuration(_) => {
                ErrorClass::Internal
            }
        }
    }

    /// Whether this failure left collected funds without a matching payout.
    /// Such attempts need operator reconciliation, not client retries.
    #[must_use]
    pub fn is_partial_failure(&self) -> bool {
        matches!(
            self.class(),
            ErrorClass::PayoutPrecondition | ErrorClass::PayoutSubmission
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, FlipcoreError>;
