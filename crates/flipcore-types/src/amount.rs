//! Base-unit token amounts.
//!
//! All value moves through the engine as integer base units of the wagered
//! asset (6 decimals in the reference deployment). The wire representation is
//! a decimal string; `rust_decimal` is used only at the display boundary
//! (capability document, human-facing messages).

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FlipcoreError;

/// An amount in the asset's smallest currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenAmount(pub u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub fn units(self) -> u128 {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Multiply by a payout multiplier without risking silent wrap-around.
    #[must_use]
    pub fn checked_mul(self, factor: u32) -> Option<Self> {
        self.0.checked_mul(u128::from(factor)).map(Self)
    }

    /// Human-denominated value at the given decimal scale, trailing zeros
    /// trimmed (50_000 units at 6 decimals -> `0.05`).
    ///
    /// Display-only: amounts beyond `i128` saturate rather than panic.
    #[must_use]
    pub fn to_display(self, decimals: u32) -> Decimal {
        let units = i128::try_from(self.0).unwrap_or(i128::MAX);
        Decimal::from_i128_with_scale(units, decimals).normalize()
    }
}

impl FromStr for TokenAmount {
    type Err = FlipcoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u128>()
            .map(Self)
            .map_err(|e| FlipcoreError::MalformedAmount(format!("{s:?}: {e}")))
    }
}

impl TryFrom<String> for TokenAmount {
    type Error = FlipcoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TokenAmount> for String {
    fn from(amount: TokenAmount) -> Self {
        amount.to_string()
    }
}

impl From<u128> for TokenAmount {
    fn from(units: u128) -> Self {
        Self(units)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_strings() {
        let amount: TokenAmount = "50000".parse().unwrap();
        assert_eq!(amount.units(), 50_000);
    }

    #[test]
    fn rejects_non_integer_strings() {
        assert!("0.05".parse::<TokenAmount>().is_err());
        assert!("-1".parse::<TokenAmount>().is_err());
        assert!("0x50".parse::<TokenAmount>().is_err());
        assert!("".parse::<TokenAmount>().is_err());
    }

    #[test]
    fn doubling_is_checked() {
        assert_eq!(
            TokenAmount(50_000).checked_mul(2),
            Some(TokenAmount(100_000))
        );
        assert_eq!(TokenAmount(u128::MAX).checked_mul(2), None);
    }

    #[test]
    fn display_denomination() {
        assert_eq!(TokenAmount(50_000).to_display(6).to_string(), "0.05");
        assert_eq!(TokenAmount(1_000_000_000).to_display(6).to_string(), "1000");
        assert_eq!(TokenAmount(100_000).to_display(6).to_string(), "0.1");
    }

    #[test]
    fn serde_uses_strings() {
        let amount = TokenAmount(50_000);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"50000\"");
        let back: TokenAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(amount, back);
    }
}
