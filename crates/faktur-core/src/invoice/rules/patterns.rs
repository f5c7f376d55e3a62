//! Common regex patterns for Faktur Pajak extraction.
//!
//! Anchors are the literal labels printed on the e-Faktur layout and are
//! matched case-sensitively.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice serial code
    pub static ref SERIAL_CODE: Regex = Regex::new(
        r"Kode dan Nomor Seri Faktur Pajak:\s*(\d+)"
    ).unwrap();

    // Issuer (Pengusaha Kena Pajak) block
    pub static ref SELLER_NAME: Regex = Regex::new(
        r"(?s)Pengusaha Kena Pajak:\s*Nama\s*:\s*(.*?)\s*Alamat"
    ).unwrap();

    pub static ref SELLER_ADDRESS: Regex = Regex::new(
        r"(?s)Pengusaha Kena Pajak:.*?Alamat\s*:\s*(.*?)\s*NPWP"
    ).unwrap();

    pub static ref SELLER_NPWP: Regex = Regex::new(
        r"(?s)Pengusaha Kena Pajak:.*?NPWP\s*:\s*([0-9.]+)"
    ).unwrap();

    // Buyer (Pembeli Barang Kena Pajak) block
    pub static ref BUYER_NAME: Regex = Regex::new(
        r"(?s)Pembeli Barang Kena Pajak.*?Nama\s*:\s*(.*?)\s*Alamat"
    ).unwrap();

    pub static ref BUYER_ADDRESS: Regex = Regex::new(
        r"(?s)Pembeli Barang Kena Pajak.*?Alamat\s*:\s*(.*?)\s*#"
    ).unwrap();

    pub static ref BUYER_NPWP: Regex = Regex::new(
        r"(?s)NPWP\s*:\s*([0-9.]+)\s*NIK"
    ).unwrap();

    // NITKU: '#' and exactly 22 digits
    pub static ref NITKU: Regex = Regex::new(
        r"#(\d{22})(?:[^0-9]|$)"
    ).unwrap();

    // Totals
    pub static ref TOTAL_PPNBM: Regex = Regex::new(
        r"(?s)Jumlah PPnBM.*?([0-9.]+,[0-9]+)"
    ).unwrap();

    // Place and date of signing, e.g. "\nJAKARTA SELATAN, 05 Februari 2025"
    pub static ref CITY: Regex = Regex::new(
        r"\n([A-Z .,]+),\s*\d{1,2}\s+\w+\s+\d{4}"
    ).unwrap();

    pub static ref INVOICE_DATE: Regex = Regex::new(
        r",\s*(\d{1,2})\s+([A-Za-z]+)\s+(\d{4})"
    ).unwrap();

    pub static ref REFERENCE: Regex = Regex::new(
        r"(?s)Referensi:\s*(.*?)\n"
    ).unwrap();

    pub static ref SIGNATORY: Regex = Regex::new(
        r"(?s)Ditandatangani secara elektronik\n(.*?)\n"
    ).unwrap();

    // Line items
    pub static ref ITEM_HEAD: Regex = Regex::new(
        r"(\d+)\s+(\d{6})\s+"
    ).unwrap();

    // "PPnBM (0,00%) = Rp 0,00" followed by the item price
    pub static ref ITEM_TAX_BLOCK: Regex = Regex::new(
        r"(?s)PPnBM[^=]*=\s*Rp\s*(?P<ppnbm>[0-9.]+,[0-9]{2}).*?\s+(?P<price>[0-9.]+,[0-9]{2})"
    ).unwrap();

    pub static ref ITEM_ROW: Regex = Regex::new(
        r"(?s)(\d+)\s+(\d{6})\s+(.*?PPnBM.*?=\s*Rp\s*0,00.*?)\s+([0-9.]+,[0-9]{2})"
    ).unwrap();

    // Indonesian amount: '.' thousands, ',' fraction
    pub static ref RUPIAH_AMOUNT: Regex = Regex::new(
        r"^\d{1,3}(?:\.\d{3})*(?:,\d+)?$|^\d+(?:,\d+)?$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nitku_requires_exactly_22_digits() {
        assert!(NITKU.is_match("#0012345678901234000000"));
        assert!(NITKU.is_match("Alamat #0012345678901234000000\n"));
        assert!(!NITKU.is_match("#00123456789012340000001"));
        assert!(!NITKU.is_match("#001234567890123400000"));
    }

    #[test]
    fn test_rupiah_amount_shapes() {
        assert!(RUPIAH_AMOUNT.is_match("1.234,56"));
        assert!(RUPIAH_AMOUNT.is_match("1234,56"));
        assert!(RUPIAH_AMOUNT.is_match("0,00"));
        assert!(RUPIAH_AMOUNT.is_match("1.000.000"));
        assert!(!RUPIAH_AMOUNT.is_match("1.23,4"));
        assert!(!RUPIAH_AMOUNT.is_match("..,00"));
    }
}
