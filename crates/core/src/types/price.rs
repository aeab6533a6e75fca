//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are held as [`Decimal`] in the currency's standard unit (dollars,
//! not cents). Conversion to the payment processor's minor units and to the
//! two-decimal display strings happens here and nowhere else, so every caller
//! rounds the same way.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
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

    /// Create a price in US dollars.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Amount rounded to cents, half away from zero, with exactly two
    /// decimal places of scale.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        let mut value = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(2);
        value
    }

    /// Amount in minor units (cents), rounded half away from zero.
    ///
    /// Returns `None` if the amount does not fit in an `i64` or overflows
    /// the decimal range when scaled.
    #[must_use]
    pub fn minor_units(&self) -> Option<i64> {
        self.amount
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }

    /// Two-decimal amount without a currency symbol (e.g., `"12.64"`).
    #[must_use]
    pub fn to_fixed(&self) -> String {
        self.rounded().to_string()
    }

    /// Format for display (e.g., `"$19.99"`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{}", self.currency_code.symbol(), self.to_fixed())
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
    /// Currency symbol used for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Lowercase code as expected by the payment processor.
    #[must_use]
    pub const fn processor_code(&self) -> &'static str {
        match self {
            Self::USD => "usd",
            Self::EUR => "eur",
            Self::GBP => "gbp",
            Self::CAD => "cad",
            Self::AUD => "aud",
        }
    }
}

/// Serde adapter that writes a [`Decimal`] as a JSON number and reads it back
/// from either a number or a numeric string.
///
/// Browsers send prices as plain numbers (`6.99`), so the shortest decimal
/// representation of the number is parsed rather than its binary expansion.
pub mod amount {
    use super::{Decimal, FromStr, ToPrimitive};
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(serde_json::Number),
        Text(String),
    }

    fn parse(raw: RawAmount) -> Result<Decimal, String> {
        let text = match raw {
            RawAmount::Number(n) => n.to_string(),
            RawAmount::Text(s) => s,
        };
        Decimal::from_str(text.trim())
            .or_else(|_| Decimal::from_scientific(text.trim()))
            .map_err(|e| format!("invalid amount {text:?}: {e}"))
    }

    /// Serialize a decimal as a JSON number, or as a numeric string when no
    /// `f64` reads back as the same value.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error.
    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let exact = value
            .to_f64()
            .filter(|float| Decimal::from_str(&float.to_string()).is_ok_and(|d| d == *value));
        match exact {
            Some(float) => serializer.serialize_f64(float),
            None => serializer.serialize_str(&value.to_string()),
        }
    }

    /// Deserialize a decimal from a JSON number or string.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not numeric.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        parse(RawAmount::deserialize(deserializer)?).map_err(de::Error::custom)
    }

    /// Same as the parent module, for optional fields.
    pub mod option {
        use super::{Decimal, RawAmount, parse};
        use serde::{Deserialize, Deserializer, Serializer, de};

        /// Serialize an optional decimal as a JSON number or `null`.
        ///
        /// # Errors
        ///
        /// Returns the serializer's error.
        pub fn serialize<S: Serializer>(
            value: &Option<Decimal>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(amount) => super::serialize(amount, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize an optional decimal from a JSON number, string or `null`.
        ///
        /// # Errors
        ///
        /// Returns an error if a present value is not numeric.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Decimal>, D::Error> {
            Option::<RawAmount>::deserialize(deserializer)?
                .map(parse)
                .transpose()
                .map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(s: &str) -> Price {
        Price::usd(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_minor_units_rounds_half_up() {
        assert_eq!(usd("6.99").minor_units(), Some(699));
        assert_eq!(usd("0.125").minor_units(), Some(13));
        assert_eq!(usd("12.644").minor_units(), Some(1264));
        assert_eq!(usd("3").minor_units(), Some(300));
    }

    #[test]
    fn test_minor_units_out_of_range() {
        assert_eq!(Price::usd(Decimal::from_scientific("1e28").unwrap()).minor_units(), None);
        assert_eq!(Price::usd(Decimal::MAX).minor_units(), None);
        assert_eq!(usd("100000000000000000").minor_units(), None);
    }

    #[test]
    fn test_to_fixed_pads_and_rounds() {
        assert_eq!(usd("5").to_fixed(), "5.00");
        assert_eq!(usd("0.655662").to_fixed(), "0.66");
        assert_eq!(usd("12.635662").to_fixed(), "12.64");
        assert_eq!(usd("0.005").to_fixed(), "0.01");
    }

    #[test]
    fn test_display_uses_symbol() {
        assert_eq!(usd("18.99").display(), "$18.99");
        let eur = Price::new(Decimal::from_str("2.5").unwrap(), CurrencyCode::EUR);
        assert_eq!(eur.display(), "€2.50");
    }

    #[test]
    fn test_processor_code() {
        assert_eq!(CurrencyCode::USD.processor_code(), "usd");
        assert_eq!(CurrencyCode::default(), CurrencyCode::USD);
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Wrapper {
        #[serde(with = "amount")]
        price: Decimal,
        #[serde(default, with = "amount::option")]
        tax: Option<Decimal>,
    }

    #[test]
    fn test_amount_reads_numbers_and_strings() {
        let w: Wrapper = serde_json::from_str(r#"{"price": 6.99, "tax": "0.66"}"#).unwrap();
        assert_eq!(w.price, Decimal::from_str("6.99").unwrap());
        assert_eq!(w.tax, Some(Decimal::from_str("0.66").unwrap()));

        let w: Wrapper = serde_json::from_str(r#"{"price": 7}"#).unwrap();
        assert_eq!(w.price, Decimal::from(7));
        assert_eq!(w.tax, None);
    }

    #[test]
    fn test_amount_writes_numbers() {
        let w = Wrapper {
            price: Decimal::from_str("6.99").unwrap(),
            tax: None,
        };
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["price"], serde_json::json!(6.99));
        assert!(json["tax"].is_null());
    }

    #[test]
    fn test_amount_keeps_precision_beyond_f64() {
        let w = Wrapper {
            price: Decimal::from_str("1.23456789012345678901").unwrap(),
            tax: Some(Decimal::from_str("50000000000000000000000000000").unwrap()),
        };
        let json = serde_json::to_string(&w).unwrap();
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back, w);
    }

    #[test]
    fn test_amount_rejects_garbage() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"price": "cheap"}"#).is_err());
    }
}
