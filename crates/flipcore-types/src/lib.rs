//! # flipcore-types
//!
//! Shared types, errors, and configuration for the **flipcore** x402 coinflip
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`AuthNonce`], [`TxHash`], [`AttemptId`], [`ReplayKey`]
//! - **Amounts**: [`TokenAmount`] (base units, string wire form)
//! - **Authorization model**: [`TransferAuthorization`], [`EcdsaSignature`]
//! - **Wager model**: [`WagerAttempt`], [`WagerState`], [`WagerResolution`], [`TransferReceipt`]
//! - **Audit trail**: [`SettlementRecord`], [`RecordType`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`FlipcoreError`] with `FLIP_ERR_` prefix codes, [`ErrorClass`]
//! - **Constants**: protocol bounds and defaults

pub mod amount;
pub mod authorization;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod record;
pub mod signature;
pub mod wager;

// Re-export all primary types at crate root for ergonomic imports:
//   use flipcore_types::{TransferAuthorization, TokenAmount, WagerResolution, ...};

pub use amount::*;
pub use authorization::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use record::*;
pub use signature::*;
pub use wager::*;

// Constants are accessed via `flipcore_types::constants::FOO`
// (not re-exported to avoid name collisions).
