use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Digits allowed in total, whole part plus fraction.
pub const MAX_DIGITS: usize = 10;
/// Digits allowed after the decimal point.
pub const DECIMAL_PLACES: usize = 2;

const CENTS_PER_UNIT: i64 = 100;

/// Fixed-point price stored as integer cents (e.g. 1099 = 10.99).
///
/// Always rendered with exactly two decimals on the wire, never as a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, sqlx::Type)]
#[sqlx(transparent)]
pub struct Price(i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("A valid number is required.")]
    Invalid,
    #[error("Ensure that there are no more than 10 digits in total.")]
    TooManyDigits,
    #[error("Ensure that there are no more than 2 decimal places.")]
    TooManyDecimalPlaces,
    #[error("Ensure that there are no more than 8 digits before the decimal point.")]
    TooManyWholeDigits,
    #[error("Ensure this value is greater than or equal to 0.")]
    Negative,
}

impl Price {
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents < 0 {
            return Err(PriceError::Negative);
        }
        Ok(Self(cents))
    }

    pub fn cents(self) -> i64 {
        self.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let (negative, unsigned) = match raw.as_bytes().first() {
            Some(b'-') => (true, &raw[1..]),
            Some(b'+') => (false, &raw[1..]),
            _ => (false, raw),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(PriceError::Invalid);
        }

        let significant_whole = whole.trim_start_matches('0');
        if significant_whole.len() + fraction.len() > MAX_DIGITS {
            return Err(PriceError::TooManyDigits);
        }
        if fraction.len() > DECIMAL_PLACES {
            return Err(PriceError::TooManyDecimalPlaces);
        }
        if significant_whole.len() > MAX_DIGITS - DECIMAL_PLACES {
            return Err(PriceError::TooManyWholeDigits);
        }

        // Bounded to 8 + 2 digits above, so this cannot overflow.
        let units: i64 = if significant_whole.is_empty() {
            0
        } else {
            significant_whole.parse().map_err(|_| PriceError::Invalid)?
        };
        let cents: i64 = format!("{:0<width$}", fraction, width = DECIMAL_PLACES)
            .parse()
            .map_err(|_| PriceError::Invalid)?;

        let total = units * CENTS_PER_UNIT + cents;
        if negative && total != 0 {
            return Err(PriceError::Negative);
        }
        Ok(Self(total))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0 / CENTS_PER_UNIT,
            self.0 % CENTS_PER_UNIT
        )
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Price, PriceError> {
        raw.parse()
    }

    #[test]
    fn parses_two_decimal_string() {
        assert_eq!(parse("10.99").unwrap().cents(), 1099);
    }

    #[test]
    fn pads_short_fractions() {
        assert_eq!(parse("10.9").unwrap().cents(), 1090);
        assert_eq!(parse("10").unwrap().cents(), 1000);
        assert_eq!(parse(".5").unwrap().cents(), 50);
        assert_eq!(parse("7.").unwrap().cents(), 700);
    }

    #[test]
    fn trims_whitespace_and_plus_sign() {
        assert_eq!(parse("  +3.50 ").unwrap().cents(), 350);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse("abc"), Err(PriceError::Invalid));
        assert_eq!(parse(""), Err(PriceError::Invalid));
        assert_eq!(parse("."), Err(PriceError::Invalid));
        assert_eq!(parse("1.2.3"), Err(PriceError::Invalid));
        assert_eq!(parse("1e3"), Err(PriceError::Invalid));
    }

    #[test]
    fn rejects_three_decimal_places() {
        assert_eq!(parse("10.999"), Err(PriceError::TooManyDecimalPlaces));
    }

    #[test]
    fn rejects_too_many_digits() {
        assert_eq!(parse("123456789.12"), Err(PriceError::TooManyDigits));
        assert_eq!(parse("123456789"), Err(PriceError::TooManyWholeDigits));
        assert_eq!(parse("00012345678.90").unwrap().cents(), 1_234_567_890);
    }

    #[test]
    fn rejects_negative_but_allows_negative_zero() {
        assert_eq!(parse("-1.00"), Err(PriceError::Negative));
        assert_eq!(parse("-0.00").unwrap().cents(), 0);
        assert_eq!(Price::from_cents(-1), Err(PriceError::Negative));
    }

    #[test]
    fn displays_fixed_two_decimals() {
        assert_eq!(Price::from_cents(1099).unwrap().to_string(), "10.99");
        assert_eq!(Price::from_cents(500).unwrap().to_string(), "5.00");
        assert_eq!(Price::from_cents(7).unwrap().to_string(), "0.07");
    }

    #[test]
    fn serializes_as_json_string() {
        let price = parse("15.99").unwrap();
        assert_eq!(serde_json::to_value(price).unwrap(), serde_json::json!("15.99"));
    }
}
