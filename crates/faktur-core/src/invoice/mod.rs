//! Invoice field extraction module.

mod merger;
mod parser;
pub mod rules;

pub use merger::{derive, invoice_code_prefix, merge, RecordMerger};
pub use parser::{ExtractionResult, FakturParser, InvoiceParser};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
