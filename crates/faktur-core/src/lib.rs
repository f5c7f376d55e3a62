//! Core library for Faktur Pajak recaps.
//!
//! This crate provides:
//! - PDF text extraction, concatenated page by page
//! - Rule-based header and line-item extraction for Indonesian tax invoices
//! - DPP/PPN calculation keyed on the invoice-code prefix
//! - Recap aggregation into detail and header tables

pub mod document;
pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;
pub mod recap;

pub use document::DocumentProcessor;
pub use error::{ExtractionError, FakturError, PdfError, Result};
pub use invoice::rules::{compute_tax, extract_header, extract_line_items};
pub use invoice::{merge, ExtractionResult, FakturParser, InvoiceParser, RecordMerger};
pub use models::config::FakturConfig;
pub use models::invoice::{InvoiceHeader, LineItem, MergedRecord, TaxOutcome, NOT_FOUND};
pub use pdf::{normalize_text, PageSource, PdfExtractor};
pub use recap::Recap;
