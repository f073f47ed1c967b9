//! Type-safe price representation using decimal arithmetic.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
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

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Price of `quantity` units at this unit price, or `None` if the
    /// amount overflows.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Option<Self> {
        Some(Self {
            amount: self.amount.checked_mul(Decimal::from(quantity))?,
            currency_code: self.currency_code.clone(),
        })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.currency_code.symbol() {
            Some(symbol) => write!(f, "{symbol}{:.2}", self.amount),
            None => write!(f, "{:.2} {}", self.amount, self.currency_code),
        }
    }
}

/// ISO 4217 currency codes.
///
/// The commerce API can report any ISO code; the common ones get their own
/// variant and everything else is carried verbatim in [`CurrencyCode::Other`].
/// Serializes as the bare code string (`"USD"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    Other(String),
}

impl CurrencyCode {
    /// The ISO code string.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::Other(code) => code,
        }
    }

    /// Display symbol, when one is unambiguous.
    #[must_use]
    pub const fn symbol(&self) -> Option<&'static str> {
        match self {
            Self::USD | Self::CAD | Self::AUD => Some("$"),
            Self::EUR => Some("€"),
            Self::GBP => Some("£"),
            Self::Other(_) => None,
        }
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Self::USD,
            "EUR" => Self::EUR,
            "GBP" => Self::GBP,
            "CAD" => Self::CAD,
            "AUD" => Self::AUD,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.code().to_string()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_times_multiplies_amount() {
        let unit = Price::new(Decimal::from_str("12.50").unwrap(), CurrencyCode::USD);
        let line = unit.times(3).unwrap();
        assert_eq!(line.amount, Decimal::from_str("37.50").unwrap());
        assert_eq!(line.currency_code, CurrencyCode::USD);
    }

    #[test]
    fn test_times_zero_quantity() {
        let unit = Price::new(Decimal::from_str("9.99").unwrap(), CurrencyCode::EUR);
        assert_eq!(unit.times(0).unwrap().amount, Decimal::ZERO);
    }

    #[test]
    fn test_times_overflow_is_none() {
        let unit = Price::new(Decimal::MAX, CurrencyCode::USD);
        assert!(unit.times(2).is_none());
        assert_eq!(unit.times(1).unwrap().amount, Decimal::MAX);
    }

    #[test]
    fn test_currency_code_round_trips_unknown_codes() {
        let code = CurrencyCode::from("jpy");
        assert_eq!(code, CurrencyCode::Other("JPY".to_string()));
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"JPY\"");

        let known: CurrencyCode = serde_json::from_str("\"GBP\"").unwrap();
        assert_eq!(known, CurrencyCode::GBP);
    }

    #[test]
    fn test_display() {
        let usd = Price::new(Decimal::from_str("5").unwrap(), CurrencyCode::USD);
        assert_eq!(usd.to_string(), "$5.00");

        let jpy = Price::new(Decimal::from_str("500").unwrap(), CurrencyCode::from("JPY"));
        assert_eq!(jpy.to_string(), "500.00 JPY");
    }
}
