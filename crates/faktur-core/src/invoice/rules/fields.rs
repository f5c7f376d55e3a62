//! Header field rule table.
//!
//! Each header field is described by one [`FieldRule`]: where the value
//! comes from and how the raw capture is cleaned up. Every rule runs once
//! over the full document text; the first hit wins and a miss leaves the
//! field at the not-found sentinel.

use regex::Regex;
use tracing::trace;

use crate::models::invoice::{HeaderField, InvoiceHeader};

use super::dates::extract_invoice_date;
use super::nitku::extract_nitku;
use super::patterns::{
    BUYER_ADDRESS, BUYER_NAME, BUYER_NPWP, CITY, REFERENCE, SELLER_ADDRESS, SELLER_NAME,
    SELLER_NPWP, SERIAL_CODE, SIGNATORY, TOTAL_PPNBM,
};

/// Where a field value comes from.
#[derive(Clone, Copy)]
pub enum FieldSource {
    /// First capture group of a single-shot search.
    Pattern(&'static Regex),
    /// A dedicated rule that does more than one search.
    Custom(fn(&str) -> Option<String>),
}

/// One row of the header rule table.
#[derive(Clone, Copy)]
pub struct FieldRule {
    pub field: HeaderField,
    pub source: FieldSource,
    pub postprocess: fn(&str) -> String,
}

fn trim(s: &str) -> String {
    s.trim().to_string()
}

impl FieldRule {
    const fn pattern(field: HeaderField, regex: &'static Regex) -> Self {
        Self {
            field,
            source: FieldSource::Pattern(regex),
            postprocess: trim,
        }
    }

    const fn custom(field: HeaderField, rule: fn(&str) -> Option<String>) -> Self {
        Self {
            field,
            source: FieldSource::Custom(rule),
            postprocess: trim,
        }
    }

    /// Apply the rule to the document text.
    pub fn apply(&self, text: &str) -> Option<String> {
        let raw = match self.source {
            FieldSource::Pattern(regex) => regex
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
            FieldSource::Custom(rule) => rule(text),
        }?;

        Some((self.postprocess)(&raw))
    }
}

/// The header rule table, in column order.
pub fn header_rules() -> [FieldRule; 13] {
    [
        FieldRule::pattern(HeaderField::SerialCode, &SERIAL_CODE),
        FieldRule::pattern(HeaderField::SellerName, &SELLER_NAME),
        FieldRule::pattern(HeaderField::SellerAddress, &SELLER_ADDRESS),
        FieldRule::pattern(HeaderField::SellerNpwp, &SELLER_NPWP),
        FieldRule::pattern(HeaderField::BuyerName, &BUYER_NAME),
        FieldRule::pattern(HeaderField::BuyerAddress, &BUYER_ADDRESS),
        FieldRule::pattern(HeaderField::BuyerNpwp, &BUYER_NPWP),
        FieldRule::custom(HeaderField::BuyerNitku, extract_nitku),
        FieldRule::pattern(HeaderField::TotalPpnbm, &TOTAL_PPNBM),
        FieldRule::pattern(HeaderField::City, &CITY),
        FieldRule::custom(HeaderField::InvoiceDate, extract_invoice_date),
        FieldRule::pattern(HeaderField::Reference, &REFERENCE),
        FieldRule::pattern(HeaderField::Signatory, &SIGNATORY),
    ]
}

/// Extract all header fields from document text.
///
/// Never fails: a field with no match keeps the `-` sentinel. The source
/// file name is left for the caller to fill in.
pub fn extract_header(text: &str) -> InvoiceHeader {
    let mut header = InvoiceHeader::default();

    for rule in header_rules() {
        match rule.apply(text) {
            Some(value) => header.set(rule.field, value),
            None => trace!("Field not found: {}", rule.field.label()),
        }
    }

    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::NOT_FOUND;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "Faktur Pajak\n\
        Kode dan Nomor Seri Faktur Pajak: 04002500012345678\n\
        Pengusaha Kena Pajak:\n\
        Nama : PT MAJU BERSAMA\n\
        Alamat : JL. MERDEKA NO. 10, BANDUNG\n\
        NPWP : 0987654321098765\n\
        Pembeli Barang Kena Pajak/Penerima Jasa Kena Pajak:\n\
        Nama : PT PEMBELI JAYA\n\
        Alamat : JL. SUDIRMAN NO. 1 JAKARTA #0012345678901234000000\n\
        NPWP : 0012345678901234\n\
        NIK : -\n\
        Jumlah PPnBM (Pajak Penjualan atas Barang Mewah) 0,00\n\
        Referensi: INV/2025/0001\n\
        JAKARTA SELATAN, 5 Februari 2025\n\
        Ditandatangani secara elektronik\n\
        BUDI SANTOSO\n";

    #[test]
    fn test_no_fields_found() {
        let header = extract_header("lorem ipsum dolor sit amet");
        assert_eq!(header, InvoiceHeader::default());
        assert_eq!(header.missing_fields(), HeaderField::ALL.to_vec());
    }

    #[test]
    fn test_full_header() {
        let header = extract_header(SAMPLE);

        assert_eq!(header.serial_code, "04002500012345678");
        assert_eq!(header.seller_name, "PT MAJU BERSAMA");
        assert_eq!(header.seller_address, "JL. MERDEKA NO. 10, BANDUNG");
        assert_eq!(header.seller_npwp, "0987654321098765");
        assert_eq!(header.buyer_name, "PT PEMBELI JAYA");
        assert_eq!(header.buyer_address, "JL. SUDIRMAN NO. 1 JAKARTA");
        assert_eq!(header.buyer_npwp, "0012345678901234");
        assert_eq!(header.buyer_nitku, "0012345678901234000000");
        assert_eq!(header.total_ppnbm, "0,00");
        assert_eq!(header.city, "JAKARTA SELATAN");
        assert_eq!(header.invoice_date, "05/Februari/2025");
        assert_eq!(header.reference, "INV/2025/0001");
        assert_eq!(header.signatory, "BUDI SANTOSO");
        assert_eq!(header.source_file, NOT_FOUND);
        assert!(header.missing_fields().is_empty());
    }

    #[test]
    fn test_partial_header_keeps_sentinels() {
        let header = extract_header("Kode dan Nomor Seri Faktur Pajak: 01002500000000001\n");

        assert_eq!(header.serial_code, "01002500000000001");
        assert_eq!(header.missing_fields().len(), HeaderField::ALL.len() - 1);
        assert_eq!(header.city, NOT_FOUND);
    }

    #[test]
    fn test_rule_table_covers_every_field_in_order() {
        let fields: Vec<HeaderField> = header_rules().iter().map(|r| r.field).collect();
        assert_eq!(fields, HeaderField::ALL.to_vec());
    }
}
