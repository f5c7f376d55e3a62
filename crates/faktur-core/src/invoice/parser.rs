//! Faktur Pajak parser combining header rules and line-item extraction.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::config::{ExtractionConfig, LineItemStrategy, PriceUnits};
use crate::models::invoice::{HeaderField, InvoiceHeader, LineItem, MergedRecord};

use super::merger::RecordMerger;
use super::rules::{extract_header, tax_base, LineItemExtractor};
use super::Result;

/// Result of invoice extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted header fields.
    pub header: InvoiceHeader,
    /// Eligible line items in order of appearance.
    pub items: Vec<LineItem>,
    /// Numbers of items excluded for a non-zero PPnBM.
    pub excluded_items: Vec<String>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse invoice from text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}

/// Rule-based Faktur Pajak parser.
pub struct FakturParser {
    /// Line-item location strategy.
    line_item_strategy: LineItemStrategy,
    /// Tax base conversion, used to flag prices that cannot be taxed.
    price_units: PriceUnits,
}

impl FakturParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            line_item_strategy: LineItemStrategy::default(),
            price_units: PriceUnits::default(),
        }
    }

    /// Create a parser from the extraction section of the configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_line_item_strategy(config.line_item_strategy)
            .with_price_units(config.price_units)
    }

    /// Set the line-item strategy.
    pub fn with_line_item_strategy(mut self, strategy: LineItemStrategy) -> Self {
        self.line_item_strategy = strategy;
        self
    }

    /// Set the price units.
    pub fn with_price_units(mut self, units: PriceUnits) -> Self {
        self.price_units = units;
        self
    }
}

impl Default for FakturParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for FakturParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        if text.trim().is_empty() {
            warn!("Document has no text layer");
            return Ok(ExtractionResult {
                header: InvoiceHeader::default(),
                items: Vec::new(),
                excluded_items: Vec::new(),
                warnings: vec!["Document has no text".to_string()],
                processing_time_ms: start.elapsed().as_millis() as u64,
            });
        }

        info!("Parsing faktur from {} characters of text", text.len());
        let mut warnings = Vec::new();

        let header = extract_header(text);
        for field in [HeaderField::SerialCode, HeaderField::InvoiceDate] {
            if header.is_missing(field) {
                warnings.push(format!("Could not extract {}", field.label()));
            }
        }

        let scan = LineItemExtractor::new()
            .with_strategy(self.line_item_strategy)
            .scan(text);

        if scan.items.is_empty() {
            warnings.push("Could not extract line items".to_string());
        }
        for number in &scan.excluded {
            warnings.push(format!("Item {} excluded: non-zero PPnBM", number));
        }

        for item in &scan.items {
            if let Err(e) = tax_base(&item.price, self.price_units) {
                warnings.push(format!("Item {}: {}", item.number, e));
            }
        }

        debug!(
            "Extracted faktur {} with {} items and {} warnings",
            header.serial_code,
            scan.items.len(),
            warnings.len()
        );

        Ok(ExtractionResult {
            header,
            items: scan.items,
            excluded_items: scan.excluded,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl ExtractionResult {
    /// Stamp the source file name onto the header.
    pub fn with_source_file(mut self, name: impl Into<String>) -> Self {
        self.header.source_file = name.into();
        self
    }

    /// Merged detail records for this document.
    pub fn records(&self, merger: &RecordMerger) -> Vec<MergedRecord> {
        merger.merge(&self.header, &self.items)
    }
}
