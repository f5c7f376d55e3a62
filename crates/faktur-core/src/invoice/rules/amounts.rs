//! Indonesian amount parsing and formatting (`1.234.567,89`).

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ExtractionError;
use crate::models::config::PriceUnits;
use crate::models::invoice::Price;

use super::patterns::RUPIAH_AMOUNT;

/// Parse an Indonesian-formatted amount (e.g., "1.234,56").
///
/// `.` groups thousands and `,` separates the fraction.
pub fn parse_rupiah(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if !RUPIAH_AMOUNT.is_match(s) {
        return None;
    }

    let normalized = s.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).ok()
}

/// Build a [`Price`] from a captured token.
pub fn parse_price(raw: &str) -> Price {
    let raw = raw.trim();
    Price {
        raw: raw.to_string(),
        value: parse_rupiah(raw),
    }
}

/// Convert a price into the whole-unit tax base.
pub fn tax_base(price: &Price, units: PriceUnits) -> Result<Decimal, ExtractionError> {
    let value = price.value.ok_or_else(|| ExtractionError::MalformedNumber {
        field: "price".to_string(),
        value: price.raw.clone(),
    })?;

    match units {
        PriceUnits::Whole => Ok(value.trunc()),
        PriceUnits::Digits => {
            let digits: String = price.raw.chars().filter(|c| c.is_ascii_digit()).collect();
            Decimal::from_str(&digits).map_err(|_| ExtractionError::MalformedNumber {
                field: "price".to_string(),
                value: price.raw.clone(),
            })
        }
    }
}

/// Group an integer string with `.` every three digits.
fn group_thousands(integer_part: &str) -> String {
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    formatted
}

/// Format a whole amount with `.` thousand separators (1.008.333).
///
/// A fractional part, if any, follows a `,`.
pub fn format_thousands(amount: Decimal) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    let s = amount.abs().normalize().to_string();

    match s.split_once('.') {
        Some((integer_part, fraction)) => {
            format!("{}{},{}", sign, group_thousands(integer_part), fraction)
        }
        None => format!("{}{}", sign, group_thousands(&s)),
    }
}

/// Format an amount the way invoices print it (1.234,56).
pub fn format_rupiah(amount: Decimal) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    let s = format!("{:.2}", amount.abs());

    match s.split_once('.') {
        Some((integer_part, fraction)) => {
            format!("{}{},{}", sign, group_thousands(integer_part), fraction)
        }
        None => s,
    }
}
