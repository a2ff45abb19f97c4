//! Type-safe price representation using decimal arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the default currency.
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// Format for display with exactly two decimal places (e.g., "$19.99").
    ///
    /// Half-cent amounts round away from zero.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{rounded:.2}", self.currency_code.symbol())
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol placed before the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn usd(amount: &str) -> Price {
        Price::from_amount(Decimal::from_str(amount).unwrap_or_default())
    }

    #[test]
    fn test_display_pads_to_two_decimals() {
        assert_eq!(usd("12.5").display(), "$12.50");
        assert_eq!(usd("7").display(), "$7.00");
        assert_eq!(usd("0").display(), "$0.00");
    }

    #[test]
    fn test_display_rounds_extra_precision() {
        assert_eq!(usd("19.999").display(), "$20.00");
        assert_eq!(usd("3.005").display(), "$3.01");
        assert_eq!(usd("3.004").display(), "$3.00");
    }

    #[test]
    fn test_display_uses_currency_symbol() {
        let price = Price::new(Decimal::new(450, 2), CurrencyCode::GBP);
        assert_eq!(price.to_string(), "£4.50");
    }
}
