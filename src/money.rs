use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Stripe amounts are integers in the currency's minor unit (cents).
pub fn from_minor_units(amount: i64) -> Decimal {
    Decimal::new(amount, 2)
}

/// Format a money amount with exactly two decimal places and a leading symbol.
/// Half cents round away from zero.
pub fn format_money(value: Decimal, currency_symbol: &str) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{:.2}", currency_symbol, rounded)
}

/// Flat-rate card processing fee used to estimate fees on items that have
/// not been charged yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// Fraction of the amount, e.g. 0.029 for 2.9%
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
    /// Fixed per-transaction charge in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub fixed: Decimal,
}

impl FeeSchedule {
    pub fn estimate(&self, amount: Decimal) -> Decimal {
        amount * self.percentage + self.fixed
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            percentage: Decimal::new(29, 3),
            fixed: Decimal::new(30, 2),
        }
    }
}
