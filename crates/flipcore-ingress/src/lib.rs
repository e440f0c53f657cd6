//! # flipcore-ingress
//!
//! **Authorization Envelope**: the pre-ledger gate every inbound payment
//! authorization passes through before the engine touches any funds.
//!
//! ## Architecture
//!
//! 1. **ReplayGuard**: tracks consumed authorizations with an atomic
//!    two-phase reservation (PENDING on entry, CONSUMED after the transfer
//!    confirms) and bounded TTL retention
//! 2. **AuthorizationValidator**: ordered, side-effect-free invariant checks
//!    (bounds, recipient, signature shape, replay state)
//!
//! ## Request Flow
//!
//! ```text
//! gateway → AuthorizationValidator.validate() → orchestrator
//!         → ReplayGuard.try_begin() → ledger pull-transfer
//!         → ReplayGuard.commit() (confirmed) | .release() (rejected)
//! ```
//!
//! Validation never touches the ledger; signer identity and the freshness
//! window are the ledger's own checks and surface as collection failures.

pub mod replay_guard;
pub mod validator;

pub use replay_guard::ReplayGuard;
pub use validator::AuthorizationValidator;
