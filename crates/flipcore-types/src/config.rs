//! Engine configuration.
//!
//! All deployment parameters live in one immutable [`EngineConfig`] built at
//! startup and passed into the orchestrator; nothing here mutates at runtime.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Address, FlipcoreError, Result, TokenAmount, constants};

/// Deployment-time parameters of the settlement engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The address every authorization's `to` must match (the service's
    /// collection account).
    pub payment_recipient: Address,
    /// Contract address of the wagered asset.
    pub asset: Address,
    /// Human-readable asset symbol for client-facing messages.
    pub asset_symbol: String,
    /// Decimal places of the asset's base-unit representation.
    pub asset_decimals: u32,
    /// Ledger network identifier advertised in the capability document.
    pub network: String,
    /// Accepted x402 payment scheme.
    pub scheme: String,
    /// Minimum accepted bet, inclusive.
    pub min_bet: TokenAmount,
    /// Maximum accepted bet, inclusive.
    pub max_bet: TokenAmount,
    /// Probability of a winning draw.
    pub win_probability: f64,
    /// Multiplier applied to the bet on a win.
    pub payout_multiplier: u32,
    /// How long consumed replay keys are retained.
    pub replay_retention: Duration,
    /// Replay-guard capacity before oldest-first eviction.
    pub max_replay_entries: usize,
    /// Native-currency floor the settlement account must hold before a
    /// payout is submitted.
    pub gas_reserve_floor: TokenAmount,
}

impl EngineConfig {
    /// Reference deployment: USDC on Base, 0.05–1000 bounds, 30% odds, 2x.
    ///
    /// # Panics
    /// Panics if the built-in asset address constant is corrupt — a compile
    /// artifact defect, not a runtime condition.
    #[must_use]
    pub fn base_usdc(payment_recipient: Address) -> Self {
        Self {
            payment_recipient,
            asset: constants::USDC_BASE
                .parse()
                .expect("built-in asset address must parse"),
            asset_symbol: "USDC".to_string(),
            asset_decimals: constants::ASSET_DECIMALS,
            network: constants::NETWORK_BASE.to_string(),
            scheme: constants::SCHEME_EXACT.to_string(),
            min_bet: TokenAmount(constants::MIN_BET_UNITS),
            max_bet: TokenAmount(constants::MAX_BET_UNITS),
            win_probability: constants::WIN_PROBABILITY,
            payout_multiplier: constants::PAYOUT_MULTIPLIER,
            replay_retention: Duration::from_secs(constants::REPLAY_RETENTION_SECS),
            max_replay_entries: constants::MAX_REPLAY_ENTRIES,
            gas_reserve_floor: TokenAmount(constants::GAS_RESERVE_FLOOR),
        }
    }

    /// Check internal consistency once at startup.
    ///
    /// # Errors
    /// Returns [`FlipcoreError::Configuration`] naming the first violated
    /// constraint.
    pub fn validate(&self) -> Result<()> {
        if self.payment_recipient == Address::ZERO {
            return Err(FlipcoreError::Configuration(
                "payment recipient must not be the zero address".to_string(),
            ));
        }
        if self.min_bet.is_zero() || self.min_bet > self.max_bet {
            return Err(FlipcoreError::Configuration(format!(
                "bet bounds invalid: min {} max {}",
                self.min_bet, self.max_bet
            )));
        }
        if !(0.0..=1.0).contains(&self.win_probability) {
            return Err(FlipcoreError::Configuration(format!(
                "win probability {} outside [0, 1]",
                self.win_probability
            )));
        }
        if self.payout_multiplier == 0 {
            return Err(FlipcoreError::Configuration(
                "payout multiplier must be at least 1".to_string(),
            ));
        }
        if self.max_replay_entries == 0 {
            return Err(FlipcoreError::Configuration(
                "replay guard capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
