//! Faktur Pajak data models.
//!
//! Every header field is a plain string. A field the extractor could not
//! locate holds [`NOT_FOUND`] rather than being absent, so rows from
//! different documents always carry the same columns.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::invoice::rules::dates::parse_invoice_date;

/// Sentinel for a field that was not found in the document text.
pub const NOT_FOUND: &str = "-";

fn not_found() -> String {
    NOT_FOUND.to_string()
}

/// Header fields of one tax invoice document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Invoice serial code (Kode dan Nomor Seri Faktur Pajak).
    #[serde(rename = "Kode dan Nomor Seri Faktur Pajak", default = "not_found")]
    pub serial_code: String,

    /// Issuer name.
    #[serde(rename = "Nama Pengusaha Kena Pajak", default = "not_found")]
    pub seller_name: String,

    /// Issuer address.
    #[serde(rename = "alamat Pengusaha Kena Pajak", default = "not_found")]
    pub seller_address: String,

    /// Issuer NPWP.
    #[serde(rename = "npwp Pengusaha Kena Pajak", default = "not_found")]
    pub seller_npwp: String,

    /// Buyer name.
    #[serde(
        rename = "Nama Pembeli Barang Kena Pajak/Penerima Jasa Kena Pajak:",
        default = "not_found"
    )]
    pub buyer_name: String,

    /// Buyer address.
    #[serde(
        rename = "Alamat Pembeli Barang Kena Pajak/Penerima Jasa Kena Pajak:",
        default = "not_found"
    )]
    pub buyer_address: String,

    /// Buyer NPWP.
    #[serde(
        rename = "NPWP Pembeli Barang Kena Pajak/Penerima Jasa Kena Pajak:",
        default = "not_found"
    )]
    pub buyer_npwp: String,

    /// Buyer NITKU (22 digits).
    #[serde(
        rename = "NITKU Pembeli Barang Kena Pajak/Penerima Jasa Kena Pajak:",
        default = "not_found"
    )]
    pub buyer_nitku: String,

    /// Total luxury-goods tax as printed.
    #[serde(rename = "Jumlah PPnBM", default = "not_found")]
    pub total_ppnbm: String,

    /// City of signing.
    #[serde(rename = "Kota", default = "not_found")]
    pub city: String,

    /// Invoice date as `DD/MonthName/YYYY`.
    #[serde(rename = "Tanggal faktur pajak", default = "not_found")]
    pub invoice_date: String,

    /// Reference text.
    #[serde(rename = "referensi", default = "not_found")]
    pub reference: String,

    /// Electronic signatory.
    #[serde(rename = "Penandatangan", default = "not_found")]
    pub signatory: String,

    /// Name of the uploaded file the header was read from.
    #[serde(rename = "Nama asli file", default = "not_found")]
    pub source_file: String,
}

impl Default for InvoiceHeader {
    fn default() -> Self {
        Self {
            serial_code: not_found(),
            seller_name: not_found(),
            seller_address: not_found(),
            seller_npwp: not_found(),
            buyer_name: not_found(),
            buyer_address: not_found(),
            buyer_npwp: not_found(),
            buyer_nitku: not_found(),
            total_ppnbm: not_found(),
            city: not_found(),
            invoice_date: not_found(),
            reference: not_found(),
            signatory: not_found(),
            source_file: not_found(),
        }
    }
}

/// Extracted header fields, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    SerialCode,
    SellerName,
    SellerAddress,
    SellerNpwp,
    BuyerName,
    BuyerAddress,
    BuyerNpwp,
    BuyerNitku,
    TotalPpnbm,
    City,
    InvoiceDate,
    Reference,
    Signatory,
}

impl HeaderField {
    /// All extracted fields in export order.
    pub const ALL: [HeaderField; 13] = [
        HeaderField::SerialCode,
        HeaderField::SellerName,
        HeaderField::SellerAddress,
        HeaderField::SellerNpwp,
        HeaderField::BuyerName,
        HeaderField::BuyerAddress,
        HeaderField::BuyerNpwp,
        HeaderField::BuyerNitku,
        HeaderField::TotalPpnbm,
        HeaderField::City,
        HeaderField::InvoiceDate,
        HeaderField::Reference,
        HeaderField::Signatory,
    ];

    /// Column label used in exported tables.
    pub fn label(&self) -> &'static str {
        match self {
            HeaderField::SerialCode => "Kode dan Nomor Seri Faktur Pajak",
            HeaderField::SellerName => "Nama Pengusaha Kena Pajak",
            HeaderField::SellerAddress => "alamat Pengusaha Kena Pajak",
            HeaderField::SellerNpwp => "npwp Pengusaha Kena Pajak",
            HeaderField::BuyerName => "Nama Pembeli Barang Kena Pajak/Penerima Jasa Kena Pajak:",
            HeaderField::BuyerAddress => {
                "Alamat Pembeli Barang Kena Pajak/Penerima Jasa Kena Pajak:"
            }
            HeaderField::BuyerNpwp => "NPWP Pembeli Barang Kena Pajak/Penerima Jasa Kena Pajak:",
            HeaderField::BuyerNitku => "NITKU Pembeli Barang Kena Pajak/Penerima Jasa Kena Pajak:",
            HeaderField::TotalPpnbm => "Jumlah PPnBM",
            HeaderField::City => "Kota",
            HeaderField::InvoiceDate => "Tanggal faktur pajak",
            HeaderField::Reference => "referensi",
            HeaderField::Signatory => "Penandatangan",
        }
    }
}

impl InvoiceHeader {
    /// Value of a header field.
    pub fn get(&self, field: HeaderField) -> &str {
        match field {
            HeaderField::SerialCode => &self.serial_code,
            HeaderField::SellerName => &self.seller_name,
            HeaderField::SellerAddress => &self.seller_address,
            HeaderField::SellerNpwp => &self.seller_npwp,
            HeaderField::BuyerName => &self.buyer_name,
            HeaderField::BuyerAddress => &self.buyer_address,
            HeaderField::BuyerNpwp => &self.buyer_npwp,
            HeaderField::BuyerNitku => &self.buyer_nitku,
            HeaderField::TotalPpnbm => &self.total_ppnbm,
            HeaderField::City => &self.city,
            HeaderField::InvoiceDate => &self.invoice_date,
            HeaderField::Reference => &self.reference,
            HeaderField::Signatory => &self.signatory,
        }
    }

    /// Set a header field.
    pub fn set(&mut self, field: HeaderField, value: String) {
        let slot = match field {
            HeaderField::SerialCode => &mut self.serial_code,
            HeaderField::SellerName => &mut self.seller_name,
            HeaderField::SellerAddress => &mut self.seller_address,
            HeaderField::SellerNpwp => &mut self.seller_npwp,
            HeaderField::BuyerName => &mut self.buyer_name,
            HeaderField::BuyerAddress => &mut self.buyer_address,
            HeaderField::BuyerNpwp => &mut self.buyer_npwp,
            HeaderField::BuyerNitku => &mut self.buyer_nitku,
            HeaderField::TotalPpnbm => &mut self.total_ppnbm,
            HeaderField::City => &mut self.city,
            HeaderField::InvoiceDate => &mut self.invoice_date,
            HeaderField::Reference => &mut self.reference,
            HeaderField::Signatory => &mut self.signatory,
        };
        *slot = value;
    }

    /// Whether a field still holds the not-found sentinel.
    pub fn is_missing(&self, field: HeaderField) -> bool {
        self.get(field) == NOT_FOUND
    }

    /// Fields that were not found in the text.
    pub fn missing_fields(&self) -> Vec<HeaderField> {
        HeaderField::ALL
            .into_iter()
            .filter(|f| self.is_missing(*f))
            .collect()
    }

    /// Invoice date as a calendar date, when it names a real day.
    pub fn issue_date(&self) -> Option<NaiveDate> {
        parse_invoice_date(&self.invoice_date)
    }
}

/// A unit price as printed on the invoice.
///
/// The exact decimal value is kept; conversion to a whole-unit tax base
/// happens when records are merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Token as it appears in the text (e.g. `1.234,56`).
    pub raw: String,

    /// Parsed value, `None` when the token is malformed.
    pub value: Option<Decimal>,
}

impl Price {
    /// A price with no token at all.
    pub fn missing() -> Self {
        Self {
            raw: not_found(),
            value: None,
        }
    }
}

/// A single sold item on the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Sequence number as printed.
    #[serde(rename = "No")]
    pub number: String,

    /// Six-digit goods/service code.
    #[serde(rename = "Kode Barang/Jasa")]
    pub code: String,

    /// Description collapsed onto a single line.
    #[serde(rename = "Nama Barang Kena Pajak / Jasa Kena Pajak")]
    pub description: String,

    /// Unit price.
    #[serde(rename = "Harga Jual / Penggantian / Uang Muka / Termin (Rp)")]
    pub price: Price,
}

impl LineItem {
    /// Placeholder item for header-only rows.
    pub fn placeholder() -> Self {
        Self {
            number: not_found(),
            code: not_found(),
            description: not_found(),
            price: Price::missing(),
        }
    }
}

/// DPP and PPN derived for one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaxOutcome {
    /// Both figures in whole currency units.
    Computed { dpp: Decimal, ppn: Decimal },
    /// The price could not serve as a tax base.
    NotComputed,
}

impl TaxOutcome {
    /// Tax base, if computed.
    pub fn dpp(&self) -> Option<Decimal> {
        match self {
            TaxOutcome::Computed { dpp, .. } => Some(*dpp),
            TaxOutcome::NotComputed => None,
        }
    }

    /// Tax amount, if computed.
    pub fn ppn(&self) -> Option<Decimal> {
        match self {
            TaxOutcome::Computed { ppn, .. } => Some(*ppn),
            TaxOutcome::NotComputed => None,
        }
    }
}

/// Fields derived from the header when records are merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFields {
    /// First two characters of the serial code.
    #[serde(rename = "Kode Faktur")]
    pub invoice_code_prefix: String,

    /// Two-digit tax period (month).
    #[serde(rename = "Masa")]
    pub period: String,

    /// Four-digit tax year.
    #[serde(rename = "Tahun")]
    pub year: String,
}

/// One line item joined with its document's header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRecord {
    #[serde(flatten)]
    pub item: LineItem,

    #[serde(flatten)]
    pub header: InvoiceHeader,

    #[serde(flatten)]
    pub derived: DerivedFields,

    /// Tax figures for the item.
    pub tax: TaxOutcome,
}

/// One document's header with its derived fields, for the header table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderRecord {
    #[serde(flatten)]
    pub header: InvoiceHeader,

    #[serde(flatten)]
    pub derived: DerivedFields,

    /// Number of eligible line items found.
    #[serde(rename = "Jumlah Item")]
    pub item_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header_is_all_sentinels() {
        let header = InvoiceHeader::default();
        assert_eq!(header.missing_fields().len(), HeaderField::ALL.len());
        assert_eq!(header.source_file, NOT_FOUND);
    }

    #[test]
    fn test_get_set_roundtrip_per_field() {
        let mut header = InvoiceHeader::default();
        header.set(HeaderField::City, "JAKARTA SELATAN".to_string());

        assert_eq!(header.get(HeaderField::City), "JAKARTA SELATAN");
        assert!(!header.is_missing(HeaderField::City));
        assert!(header.is_missing(HeaderField::Reference));
    }

    #[test]
    fn test_issue_date() {
        let mut header = InvoiceHeader::default();
        assert_eq!(header.issue_date(), None);

        header.invoice_date = "17/Agustus/2024".to_string();
        assert_eq!(header.issue_date(), NaiveDate::from_ymd_opt(2024, 8, 17));
    }

    #[test]
    fn test_tax_outcome_accessors() {
        let outcome = TaxOutcome::Computed {
            dpp: Decimal::from(1000),
            ppn: Decimal::from(120),
        };
        assert_eq!(outcome.ppn(), Some(Decimal::from(120)));
        assert!(TaxOutcome::NotComputed.dpp().is_none());
    }

    #[test]
    fn test_header_serializes_with_column_labels() {
        let header = InvoiceHeader::default();
        let json = serde_json::to_value(&header).unwrap();

        for field in HeaderField::ALL {
            assert_eq!(json[field.label()], NOT_FOUND);
        }
    }
}
