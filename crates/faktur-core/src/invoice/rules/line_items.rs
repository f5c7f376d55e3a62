//! Line-item table extraction.
//!
//! A printed item looks like this once the PDF is linearised:
//!
//! ```text
//! 1
//! 000000
//! JASA KONSULTASI
//! Rp 1.000.000,00 x 1,00 Lainnya
//! Potongan Harga = Rp 0,00
//! PPnBM (0,00%) = Rp 0,00
//! 1.000.000,00
//! ```
//!
//! The PPnBM tax block closes the description and the amount after it is
//! the item price. Only items with a zero PPnBM are part of the recap.

use tracing::{debug, trace};

use crate::models::config::LineItemStrategy;
use crate::models::invoice::LineItem;

use super::FieldExtractor;
use super::amounts::{parse_price, parse_rupiah};
use super::patterns::{ITEM_HEAD, ITEM_ROW, ITEM_TAX_BLOCK};

/// Line-item extractor.
pub struct LineItemExtractor {
    strategy: LineItemStrategy,
}

/// Items found in one document, with the blocks that were passed over.
#[derive(Debug, Clone, Default)]
pub struct LineItemScan {
    /// Eligible items in order of appearance.
    pub items: Vec<LineItem>,
    /// Item numbers excluded for carrying a non-zero PPnBM.
    pub excluded: Vec<String>,
}

impl LineItemExtractor {
    /// Create an extractor with the default strategy.
    pub fn new() -> Self {
        Self {
            strategy: LineItemStrategy::default(),
        }
    }

    /// Set the location strategy.
    pub fn with_strategy(mut self, strategy: LineItemStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Scan the text for items.
    pub fn scan(&self, text: &str) -> LineItemScan {
        let scan = match self.strategy {
            LineItemStrategy::TaxBlock => scan_tax_blocks(text),
            LineItemStrategy::SinglePattern => scan_single_pattern(text),
        };

        debug!(
            "Found {} line items ({} excluded) using {:?}",
            scan.items.len(),
            scan.excluded.len(),
            self.strategy
        );
        scan
    }
}

impl Default for LineItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for LineItemExtractor {
    type Output = LineItem;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.scan(text).items
    }
}

/// Collapse all whitespace runs (newlines included) into single spaces.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn scan_tax_blocks(text: &str) -> LineItemScan {
    let mut scan = LineItemScan::default();
    let mut cursor = 0;

    for block in ITEM_TAX_BLOCK.captures_iter(text) {
        let (Some(whole), Some(price)) = (block.get(0), block.name("price")) else {
            continue;
        };
        let segment_start = cursor;
        cursor = whole.end();

        // The item head is the first one since the previous tax block.
        let Some(head) = ITEM_HEAD.captures(&text[segment_start..whole.start()]) else {
            trace!("Tax block at {} has no item head before it", whole.start());
            continue;
        };
        let description_start = segment_start + head.get(0).map_or(0, |m| m.end());

        let ppnbm = &block["ppnbm"];
        if !matches!(parse_rupiah(ppnbm), Some(v) if v.is_zero()) {
            debug!("Excluding item {} with PPnBM Rp {}", &head[1], ppnbm);
            scan.excluded.push(head[1].to_string());
            continue;
        }

        scan.items.push(LineItem {
            number: head[1].to_string(),
            code: head[2].to_string(),
            description: collapse_whitespace(&text[description_start..price.start()]),
            price: parse_price(price.as_str()),
        });
    }

    scan
}

fn scan_single_pattern(text: &str) -> LineItemScan {
    let items = ITEM_ROW
        .captures_iter(text)
        .map(|caps| LineItem {
            number: caps[1].to_string(),
            code: caps[2].to_string(),
            description: collapse_whitespace(&caps[3]),
            price: parse_price(&caps[4]),
        })
        .collect();

    LineItemScan {
        items,
        excluded: Vec::new(),
    }
}

/// Extract eligible line items with the default strategy.
pub fn extract_line_items(text: &str) -> Vec<LineItem> {
    LineItemExtractor::new().extract_all(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const TABLE_HEADING: &str = "No.\nKode Barang/\nJasa\nNama Barang Kena Pajak / Jasa Kena Pajak\n\
                                 Harga Jual / Penggantian /\nUang Muka / Termin\n(Rp)\n";

    fn item(no: u32, code: &str, lines: &[&str], ppnbm: &str, price: &str) -> String {
        let rate = if ppnbm == "0,00" { "0,00%" } else { "10,00%" };
        format!(
            "{}\n{}\n{}\nPotongan Harga = Rp 0,00\nPPnBM ({}) = Rp {}\n{}\n",
            no,
            code,
            lines.join("\n"),
            rate,
            ppnbm,
            price
        )
    }

    #[test]
    fn test_single_item_multiline_description() {
        let text = format!(
            "{}{}Harga Jual / Penggantian / Uang Muka / Termin 2.500.000,00\n",
            TABLE_HEADING,
            item(
                1,
                "000000",
                &["JASA KONSULTASI", "PAJAK TAHUNAN", "Rp 2.500.000,00 x 1,00 Lainnya"],
                "0,00",
                "2.500.000,00"
            )
        );

        let items = extract_line_items(&text);
        assert_eq!(items.len(), 1);

        let first = &items[0];
        assert_eq!(first.number, "1");
        assert_eq!(first.code, "000000");
        assert_eq!(
            first.description,
            "JASA KONSULTASI PAJAK TAHUNAN Rp 2.500.000,00 x 1,00 Lainnya \
             Potongan Harga = Rp 0,00 PPnBM (0,00%) = Rp 0,00"
        );
        assert!(!first.description.contains('\n'));
        assert_eq!(first.price.raw, "2.500.000,00");
        assert_eq!(first.price.value, Some(Decimal::from(2_500_000)));
    }

    #[test]
    fn test_items_keep_text_order() {
        let text = format!(
            "{}{}{}",
            TABLE_HEADING,
            item(2, "100100", &["SEMEN"], "0,00", "75.000,00"),
            item(1, "200200", &["PASIR"], "0,00", "1.234,56"),
        );

        let items = extract_line_items(&text);
        let numbers: Vec<&str> = items.iter().map(|i| i.number.as_str()).collect();
        assert_eq!(numbers, vec!["2", "1"]);
        assert_eq!(items[1].price.value, Some(Decimal::from_str("1234.56").unwrap()));
    }

    #[test]
    fn test_nonzero_ppnbm_item_is_excluded() {
        let text = format!(
            "{}{}",
            TABLE_HEADING,
            item(1, "300300", &["MOBIL MEWAH"], "50.000.000,00", "500.000.000,00"),
        );

        let scan = LineItemExtractor::new().scan(&text);
        assert!(scan.items.is_empty());
        assert_eq!(scan.excluded, vec!["1".to_string()]);
    }

    #[test]
    fn test_nonzero_ppnbm_item_does_not_swallow_next_item() {
        let text = format!(
            "{}{}{}",
            TABLE_HEADING,
            item(1, "300300", &["MOBIL MEWAH"], "50.000.000,00", "500.000.000,00"),
            item(2, "100100", &["SEMEN"], "0,00", "75.000,00"),
        );

        let items = extract_line_items(&text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].number, "2");
        assert_eq!(items[0].code, "100100");
        assert!(items[0].description.starts_with("SEMEN"));
    }

    #[test]
    fn test_no_items() {
        assert!(extract_line_items("Faktur Pajak\nKode dan Nomor Seri Faktur Pajak: 010\n").is_empty());
    }

    #[test]
    fn test_single_pattern_strategy_matches_zero_ppnbm_items() {
        let text = format!(
            "{}{}{}",
            TABLE_HEADING,
            item(1, "100100", &["SEMEN", "PORTLAND"], "0,00", "75.000,00"),
            item(2, "200200", &["PASIR"], "0,00", "1.234,56"),
        );

        let extractor = LineItemExtractor::new().with_strategy(LineItemStrategy::SinglePattern);
        let items = extractor.extract_all(&text);
        let tax_block = extract_line_items(&text);

        assert_eq!(items.len(), 2);
        assert_eq!(items, tax_block);
    }

    #[test]
    fn test_single_pattern_strategy_drops_lone_nonzero_item() {
        let text = format!(
            "{}{}",
            TABLE_HEADING,
            item(1, "300300", &["MOBIL MEWAH"], "50.000.000,00", "500.000.000,00"),
        );

        let extractor = LineItemExtractor::new().with_strategy(LineItemStrategy::SinglePattern);
        assert!(extractor.extract_all(&text).is_empty());
    }
}
