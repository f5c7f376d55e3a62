//! Joining line items with their document header.

use tracing::debug;

use crate::models::config::PriceUnits;
use crate::models::invoice::{
    DerivedFields, InvoiceHeader, LineItem, MergedRecord, TaxOutcome, NOT_FOUND,
};

use super::rules::{amounts::tax_base, dates, tax::compute_tax};

/// Invoice-code prefix (Kode Faktur): the first two characters of the serial code.
pub fn invoice_code_prefix(serial_code: &str) -> String {
    if serial_code == NOT_FOUND {
        return NOT_FOUND.to_string();
    }

    let prefix: String = serial_code.chars().take(2).collect();
    if prefix.chars().count() < 2 {
        NOT_FOUND.to_string()
    } else {
        prefix
    }
}

/// Derive Kode Faktur, Masa and Tahun from a header.
pub fn derive(header: &InvoiceHeader) -> DerivedFields {
    DerivedFields {
        invoice_code_prefix: invoice_code_prefix(&header.serial_code),
        period: dates::period_of(&header.invoice_date),
        year: dates::year_of(&header.invoice_date),
    }
}

/// Merges line items with a header and computes their tax.
#[derive(Debug, Clone, Default)]
pub struct RecordMerger {
    price_units: PriceUnits,
}

impl RecordMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how prices become the whole-unit tax base.
    pub fn with_price_units(mut self, units: PriceUnits) -> Self {
        self.price_units = units;
        self
    }

    /// Tax figures for one item under the given invoice-code prefix.
    pub fn tax_for(&self, item: &LineItem, prefix: &str) -> TaxOutcome {
        match tax_base(&item.price, self.price_units) {
            Ok(base) => compute_tax(base, prefix),
            Err(e) => {
                debug!("Item {}: {}", item.number, e);
                TaxOutcome::NotComputed
            }
        }
    }

    /// One record per item, in item order. No items gives no records.
    pub fn merge(&self, header: &InvoiceHeader, items: &[LineItem]) -> Vec<MergedRecord> {
        let derived = derive(header);

        items
            .iter()
            .map(|item| MergedRecord {
                item: item.clone(),
                header: header.clone(),
                derived: derived.clone(),
                tax: self.tax_for(item, &derived.invoice_code_prefix),
            })
            .collect()
    }
}

/// Merge items with their header using whole-unit prices.
pub fn merge(header: &InvoiceHeader, items: &[LineItem]) -> Vec<MergedRecord> {
    RecordMerger::new().merge(header, items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::rules::amounts::parse_price;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn header() -> InvoiceHeader {
        InvoiceHeader {
            serial_code: "03002500012345678".to_string(),
            invoice_date: "05/Februari/2025".to_string(),
            source_file: "faktur_001.pdf".to_string(),
            ..InvoiceHeader::default()
        }
    }

    fn line(number: &str, price: &str) -> LineItem {
        LineItem {
            number: number.to_string(),
            code: "000000".to_string(),
            description: "JASA".to_string(),
            price: parse_price(price),
        }
    }

    #[test]
    fn test_derive() {
        let derived = derive(&header());
        assert_eq!(
            derived,
            DerivedFields {
                invoice_code_prefix: "03".to_string(),
                period: "02".to_string(),
                year: "2025".to_string(),
            }
        );
    }

    #[test]
    fn test_derive_from_missing_fields() {
        let derived = derive(&InvoiceHeader::default());
        assert_eq!(derived.invoice_code_prefix, NOT_FOUND);
        assert_eq!(derived.period, NOT_FOUND);
        assert_eq!(derived.year, NOT_FOUND);
    }

    #[test]
    fn test_prefix_of_short_serial_code() {
        assert_eq!(invoice_code_prefix("0"), NOT_FOUND);
        assert_eq!(invoice_code_prefix("01"), "01");
    }

    #[test]
    fn test_merge_empty_items() {
        assert!(merge(&header(), &[]).is_empty());
    }

    #[test]
    fn test_merge_one_record_per_item() {
        let items = vec![line("1", "1.100.000,00"), line("2", "abc")];
        let records = merge(&header(), &items);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].item.number, "1");
        assert_eq!(records[0].header.source_file, "faktur_001.pdf");
        assert_eq!(records[0].derived.period, "02");
        assert_eq!(
            records[0].tax,
            TaxOutcome::Computed {
                dpp: Decimal::from(1_008_333),
                ppn: Decimal::from(121_000),
            }
        );
        // Malformed price keeps the item but leaves the tax uncomputed.
        assert_eq!(records[1].tax, TaxOutcome::NotComputed);
    }

    #[test]
    fn test_merge_with_digit_price_units() {
        let merger = RecordMerger::new().with_price_units(PriceUnits::Digits);
        let mut h = header();
        h.serial_code = "01002500000000001".to_string();

        let records = merger.merge(&h, &[line("1", "1.000,00")]);
        assert_eq!(records[0].tax.dpp(), Some(Decimal::from(100_000)));
        assert_eq!(records[0].tax.ppn(), Some(Decimal::from(12_000)));
    }
}
