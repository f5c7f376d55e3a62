//! Error types for the faktur-core library.

use thiserror::Error;

/// Main error type for the faktur library.
#[derive(Error, Debug)]
pub enum FakturError {
    /// The document could not be read as a PDF.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Document format errors.
///
/// Any of these skips the affected document; the rest of a batch carries on.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to invoice field extraction.
///
/// None of these abort a document: the extractors recover locally and
/// record them as warnings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// A captured amount does not parse as an Indonesian decimal.
    #[error("malformed number in {field}: {value:?}")]
    MalformedNumber { field: String, value: String },

    /// A price cannot serve as a tax base (negative or fractional).
    #[error("invalid tax base: {0}")]
    InvalidTaxBase(String),
}

/// Result type for the faktur library.
pub type Result<T> = std::result::Result<T, FakturError>;
