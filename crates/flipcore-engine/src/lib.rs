//! # flipcore-engine
//!
//! **Outcome Core**: the pure draw evaluation and the settlement
//! orchestrator that sequences one wager end-to-end.
//!
//! ## Architecture
//!
//! ```text
//! gateway → SettlementOrchestrator.settle()
//!             ├─ AuthorizationValidator  (pre-ledger gate)
//!             ├─ ReplayGuard             (atomic reservation)
//!             ├─ SettlementLedger        (collect → confirm)
//!             ├─ OutcomeEngine           (draw < p ?)
//!             └─ SettlementLedger        (payout, winning path)
//! ```
//!
//! The orchestrator owns the wager state machine, never retries a ledger
//! operation, never transitions backward, and translates every failure into
//! a classified [`flipcore_types::FlipcoreError`].

pub mod orchestrator;
pub mod outcome;

pub use orchestrator::SettlementOrchestrator;
pub use outcome::{DrawSource, FixedDraw, OutcomeEngine, ThreadRngDraw};
