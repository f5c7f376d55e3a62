//! Recap aggregation across documents.
//!
//! A [`Recap`] collects the extraction results of a batch in input order
//! and lays them out as the detail table (one row per line item) and the
//! header table (one row per document).

use std::fmt::Display;

use serde::Serialize;
use tracing::{debug, warn};

use crate::invoice::{derive, ExtractionResult, RecordMerger};
use crate::invoice::rules::format_thousands;
use crate::models::config::{EmptyDocumentPolicy, ExtractionConfig, PriceUnits};
use crate::models::invoice::{
    HeaderField, HeaderRecord, LineItem, MergedRecord, TaxOutcome,
};

/// Line-item columns leading the detail table.
pub const ITEM_COLUMNS: [&str; 4] = [
    "No",
    "Kode Barang/Jasa",
    "Nama Barang Kena Pajak / Jasa Kena Pajak",
    "Harga Jual / Penggantian / Uang Muka / Termin (Rp)",
];

/// Columns following the header fields in both tables.
pub const DERIVED_COLUMNS: [&str; 4] = ["Nama asli file", "Masa", "Tahun", "Kode Faktur"];

/// Tax columns closing the detail table.
pub const TAX_COLUMNS: [&str; 2] = ["DPP", "PPN"];

/// Item-count column closing the header table.
pub const ITEM_COUNT_COLUMN: &str = "Jumlah Item";

/// Detail table columns, in order.
pub fn detail_columns() -> Vec<&'static str> {
    ITEM_COLUMNS
        .into_iter()
        .chain(HeaderField::ALL.iter().map(|f| f.label()))
        .chain(DERIVED_COLUMNS)
        .chain(TAX_COLUMNS)
        .collect()
}

/// Header table columns, in order.
pub fn header_columns() -> Vec<&'static str> {
    HeaderField::ALL
        .iter()
        .map(|f| f.label())
        .chain(DERIVED_COLUMNS)
        .chain(std::iter::once(ITEM_COUNT_COLUMN))
        .collect()
}

fn tax_cells(tax: &TaxOutcome) -> [String; 2] {
    match tax {
        TaxOutcome::Computed { dpp, ppn } => [format_thousands(*dpp), format_thousands(*ppn)],
        TaxOutcome::NotComputed => [String::new(), String::new()],
    }
}

/// Render a merged record as a detail table row.
///
/// DPP and PPN use `.` thousand separators; an uncomputed tax renders as
/// empty cells.
pub fn detail_row(record: &MergedRecord) -> Vec<String> {
    let item = &record.item;
    let mut row = vec![
        item.number.clone(),
        item.code.clone(),
        item.description.clone(),
        item.price.raw.clone(),
    ];

    row.extend(HeaderField::ALL.iter().map(|f| record.header.get(*f).to_string()));
    row.push(record.header.source_file.clone());
    row.push(record.derived.period.clone());
    row.push(record.derived.year.clone());
    row.push(record.derived.invoice_code_prefix.clone());
    row.extend(tax_cells(&record.tax));
    row
}

/// Render a header record as a header table row.
pub fn header_row(record: &HeaderRecord) -> Vec<String> {
    let mut row: Vec<String> = HeaderField::ALL
        .iter()
        .map(|f| record.header.get(*f).to_string())
        .collect();

    row.push(record.header.source_file.clone());
    row.push(record.derived.period.clone());
    row.push(record.derived.year.clone());
    row.push(record.derived.invoice_code_prefix.clone());
    row.push(record.item_count.to_string());
    row
}

/// A document that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDocument {
    /// Source file name.
    pub source_file: String,
    /// Error message.
    pub error: String,
}

/// Batch recap.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Recap {
    #[serde(skip)]
    merger: RecordMerger,
    #[serde(skip)]
    empty_documents: EmptyDocumentPolicy,

    /// Detail records in input order.
    records: Vec<MergedRecord>,
    /// One header record per processed document.
    headers: Vec<HeaderRecord>,
    /// Documents that failed.
    failures: Vec<FailedDocument>,
}

impl Recap {
    /// Create an empty recap with default policies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recap from the extraction section of the configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_price_units(config.price_units)
            .with_empty_documents(config.empty_documents)
    }

    /// Set how prices become the tax base.
    pub fn with_price_units(mut self, units: PriceUnits) -> Self {
        self.merger = RecordMerger::new().with_price_units(units);
        self
    }

    /// Set the detail-table policy for documents without eligible items.
    pub fn with_empty_documents(mut self, policy: EmptyDocumentPolicy) -> Self {
        self.empty_documents = policy;
        self
    }

    /// Add one document's extraction result.
    ///
    /// The header's source file name is replaced by `source_file`.
    pub fn push(&mut self, result: &ExtractionResult, source_file: &str) {
        let mut header = result.header.clone();
        header.source_file = source_file.to_string();

        let mut records = self.merger.merge(&header, &result.items);
        if records.is_empty() {
            match self.empty_documents {
                EmptyDocumentPolicy::Drop => {
                    debug!("{}: no eligible line items, no detail rows", source_file);
                }
                EmptyDocumentPolicy::HeaderOnly => {
                    records.push(MergedRecord {
                        item: LineItem::placeholder(),
                        header: header.clone(),
                        derived: derive(&header),
                        tax: TaxOutcome::NotComputed,
                    });
                }
            }
        }

        self.headers.push(HeaderRecord {
            derived: derive(&header),
            header,
            item_count: result.items.len(),
        });
        self.records.extend(records);
    }

    /// Record a document that failed; it contributes no rows.
    pub fn push_failure(&mut self, source_file: &str, error: impl Display) {
        warn!("Skipping {}: {}", source_file, error);
        self.failures.push(FailedDocument {
            source_file: source_file.to_string(),
            error: error.to_string(),
        });
    }

    /// Detail records.
    pub fn records(&self) -> &[MergedRecord] {
        &self.records
    }

    /// Header records, one per processed document.
    pub fn headers(&self) -> &[HeaderRecord] {
        &self.headers
    }

    /// Failed documents.
    pub fn failures(&self) -> &[FailedDocument] {
        &self.failures
    }

    /// Number of documents processed successfully.
    pub fn document_count(&self) -> usize {
        self.headers.len()
    }

    /// Detail table rows.
    pub fn detail_rows(&self) -> Vec<Vec<String>> {
        self.records.iter().map(detail_row).collect()
    }

    /// Header table rows.
    pub fn header_rows(&self) -> Vec<Vec<String>> {
        self.headers.iter().map(header_row).collect()
    }
}
