//! Rule-based field extractors for Indonesian tax invoices.

pub mod amounts;
pub mod dates;
pub mod fields;
pub mod line_items;
pub mod nitku;
pub mod patterns;
pub mod tax;

pub use amounts::{format_rupiah, format_thousands, parse_price, parse_rupiah, tax_base};
pub use dates::{extract_invoice_date, month_number, parse_invoice_date, period_of, year_of, DateExtractor};
pub use fields::{extract_header, header_rules, FieldRule, FieldSource};
pub use line_items::{extract_line_items, LineItemExtractor, LineItemScan};
pub use nitku::{extract_nitku, NitkuExtractor};
pub use tax::{compute_tax, try_compute_tax, TaxFormula};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
