//! Currency helpers on top of `rust_decimal`.
//!
//! Amounts are kept as `Decimal` end to end; rounding only happens where a
//! value is divided (commission) or displayed.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Currency amounts carry two decimal places.
pub const DECIMAL_PLACES: u32 = 2;

/// Round to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Reject negative amounts.
pub fn validate_amount(value: Decimal, field: &str) -> Result<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(StoreError::InvalidAmount {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

/// How amounts are printed on screen and on receipts.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    #[serde(default = "default_thousands")]
    pub thousands_separator: String,
    #[serde(default = "default_decimal")]
    pub decimal_separator: String,
}

fn default_thousands() -> String {
    ",".to_string()
}

fn default_decimal() -> String {
    ".".to_string()
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            thousands_separator: default_thousands(),
            decimal_separator: default_decimal(),
        }
    }
}

/// Format an amount like `$1,234.50`; negatives render as `-$1,234.50`.
pub fn format_currency(amount: Decimal, format: &CurrencyFormat) -> String {
    let rounded = round_money(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = group_digits(whole, &format.thousands_separator);
    let sign = if negative { "-" } else { "" };

    format!(
        "{}{}{}{}{}",
        sign, format.symbol, grouped, format.decimal_separator, frac
    )
}

fn group_digits(digits: &str, separator: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    let len = digits.len();

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_with_grouping_and_cents() {
        let fmt = CurrencyFormat::default();
        assert_eq!(format_currency(dec!(1234567.5), &fmt), "$1,234,567.50");
        assert_eq!(format_currency(dec!(0), &fmt), "$0.00");
        assert_eq!(format_currency(dec!(999), &fmt), "$999.00");
        assert_eq!(format_currency(dec!(-1500.255), &fmt), "-$1,500.26");
    }

    #[test]
    fn formats_with_custom_separators() {
        let fmt = CurrencyFormat {
            symbol: "$ ".to_string(),
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
        };
        assert_eq!(format_currency(dec!(45000), &fmt), "$ 45.000,00");
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(validate_amount(dec!(-0.01), "amount").is_err());
        assert_eq!(validate_amount(dec!(0), "amount").unwrap(), dec!(0));
        assert_eq!(validate_amount(dec!(10.5), "amount").unwrap(), dec!(10.5));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_money(dec!(2.345)), dec!(2.35));
        assert_eq!(round_money(dec!(-2.345)), dec!(-2.35));
    }
}
