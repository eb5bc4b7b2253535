//! Prices as the backend sends them: decimal amounts encoded as text.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in Mexican pesos.
///
/// The backend serializes decimals as strings (`"450.00"`); this type keeps
/// the exact decimal value and never goes through floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The raw decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display with a currency symbol and two decimals (e.g. `$450.00`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_decodes_text_decimal() {
        let price: Price = serde_json::from_str("\"450.00\"").unwrap();
        assert_eq!(price.amount(), Decimal::new(45000, 2));
    }

    #[test]
    fn test_price_encodes_as_text() {
        let price = Price::new(Decimal::new(1850, 2));
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"18.50\"");
    }

    #[test]
    fn test_price_display_pads_decimals() {
        assert_eq!(Price::new(Decimal::new(15, 0)).display(), "$15.00");
        assert_eq!(Price::new(Decimal::new(45000, 2)).to_string(), "$450.00");
    }
}
