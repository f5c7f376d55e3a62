//! Invoice date extraction and tax period derivation.

use std::collections::HashMap;

use chrono::NaiveDate;
use lazy_static::lazy_static;

use crate::models::invoice::NOT_FOUND;

use super::FieldExtractor;
use super::patterns::INVOICE_DATE;

/// Indonesian month names and their two-digit numbers.
pub const MONTHS: [(&str, &str); 12] = [
    ("Januari", "01"),
    ("Februari", "02"),
    ("Maret", "03"),
    ("April", "04"),
    ("Mei", "05"),
    ("Juni", "06"),
    ("Juli", "07"),
    ("Agustus", "08"),
    ("September", "09"),
    ("Oktober", "10"),
    ("November", "11"),
    ("Desember", "12"),
];

lazy_static! {
    static ref MONTH_NUMBERS: HashMap<&'static str, &'static str> =
        MONTHS.iter().copied().collect();
}

/// Two-digit month number for an Indonesian month name.
pub fn month_number(name: &str) -> Option<&'static str> {
    MONTH_NUMBERS.get(name).copied()
}

/// Invoice date extractor.
///
/// Matches `, D MonthName YYYY` (the place-and-date line above the
/// signature) and renders it as `DD/MonthName/YYYY`.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        INVOICE_DATE
            .captures(text)
            .map(|caps| format!("{:0>2}/{}/{}", &caps[1], &caps[2], &caps[3]))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        INVOICE_DATE
            .captures_iter(text)
            .map(|caps| format!("{:0>2}/{}/{}", &caps[1], &caps[2], &caps[3]))
            .collect()
    }
}

/// Extract the invoice date as `DD/MonthName/YYYY`.
pub fn extract_invoice_date(text: &str) -> Option<String> {
    DateExtractor::new().extract(text)
}

fn date_parts(date: &str) -> Option<(&str, &str, &str)> {
    let mut parts = date.split('/');
    let day = parts.next()?;
    let month = parts.next()?;
    let year = parts.next()?;
    Some((day, month, year))
}

/// Tax period (Masa) of a `DD/MonthName/YYYY` date.
///
/// Returns the sentinel when the date is missing or the month name is not
/// one of the twelve known names.
pub fn period_of(date: &str) -> String {
    date_parts(date)
        .and_then(|(_, month, _)| month_number(month))
        .unwrap_or(NOT_FOUND)
        .to_string()
}

/// Tax year (Tahun) of a `DD/MonthName/YYYY` date.
pub fn year_of(date: &str) -> String {
    date_parts(date)
        .map(|(_, _, year)| year)
        .unwrap_or(NOT_FOUND)
        .to_string()
}

/// Calendar date of a `DD/MonthName/YYYY` date.
pub fn parse_invoice_date(date: &str) -> Option<NaiveDate> {
    let (day, month, year) = date_parts(date)?;
    let month: u32 = month_number(month)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
}
