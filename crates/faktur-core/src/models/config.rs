//! Configuration structures for the recap pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the faktur pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FakturConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// Recap export configuration.
    pub export: ExportConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Retry page text with lopdf when pdf-extract fails on a document.
    pub fallback_to_lopdf: bool,

    /// Below this many non-whitespace characters a document is reported
    /// as probably scanned.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            fallback_to_lopdf: true,
            min_text_length: 50,
        }
    }
}

/// How line items are located in the document text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemStrategy {
    /// Anchor on each PPnBM tax block and look back for the item head.
    #[default]
    TaxBlock,
    /// One multi-line pattern over the whole text.
    SinglePattern,
}

/// How a printed price becomes the whole-unit tax base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceUnits {
    /// Whole rupiah, fractional cents truncated (`1.234,56` -> 1234).
    #[default]
    Whole,
    /// Both separators stripped (`1.234,56` -> 123456), as the legacy
    /// recap tool computed it.
    Digits,
}

/// What the detail table holds for a document without eligible items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyDocumentPolicy {
    /// The document contributes no detail rows.
    #[default]
    Drop,
    /// The document contributes one header-only detail row.
    HeaderOnly,
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Line-item location strategy.
    pub line_item_strategy: LineItemStrategy,

    /// Tax base conversion for prices.
    pub price_units: PriceUnits,

    /// Handling of documents with zero eligible line items.
    pub empty_documents: EmptyDocumentPolicy,
}

/// Recap export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// CSV field delimiter.
    pub delimiter: char,

    /// Also write the one-row-per-document header table.
    pub header_table: bool,

    /// File name of the detail table.
    pub detail_file_name: String,

    /// File name of the header table.
    pub header_file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            header_table: false,
            detail_file_name: "rekap_faktur.csv".to_string(),
            header_file_name: "rekap_faktur_header.csv".to_string(),
        }
    }
}

impl FakturConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FakturConfig =
            serde_json::from_str(r#"{"extraction": {"price_units": "digits"}}"#).unwrap();

        assert_eq!(config.extraction.price_units, PriceUnits::Digits);
        assert_eq!(config.extraction.line_item_strategy, LineItemStrategy::TaxBlock);
        assert_eq!(config.export.delimiter, ',');
        assert!(config.pdf.fallback_to_lopdf);
    }

    #[test]
    fn test_enum_names_are_snake_case() {
        let json = serde_json::to_value(ExtractionConfig {
            line_item_strategy: LineItemStrategy::SinglePattern,
            price_units: PriceUnits::Whole,
            empty_documents: EmptyDocumentPolicy::HeaderOnly,
        })
        .unwrap();

        assert_eq!(json["line_item_strategy"], "single_pattern");
        assert_eq!(json["empty_documents"], "header_only");
    }
}
