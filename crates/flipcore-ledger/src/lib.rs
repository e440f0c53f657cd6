//! # flipcore-ledger
//!
//! **Finality boundary**: the [`SettlementLedger`] trait the orchestrator
//! settles against, plus an in-memory reference implementation.
//!
//! ## Architecture
//!
//! The engine never talks to a chain directly — it sequences two irreversible
//! transfer operations and two balance reads through this trait:
//!
//! ```text
//! orchestrator → collect_bet()      (pull-transfer via signed authorization)
//!              → disburse_payout()  (push-transfer with precondition checks)
//!              → asset_balance() / native_balance()
//! ```
//!
//! Both transfers block until confirmation — the dominant latency of the
//! whole flow — and are never retried here: a blind retry risks a double
//! transfer.
//!
//! [`InMemoryLedger`] emulates authorization-based pull-transfer semantics
//! (validity window, nonce registry, balances, deterministic tx hashes) for
//! tests and local development. Production deployments implement the trait
//! against a real chain RPC client.

pub mod client;
pub mod inmemory;

pub use client::SettlementLedger;
pub use inmemory::InMemoryLedger;
