//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PageSource, Result};
use crate::error::PdfError;

/// PDF text extractor.
///
/// Page text comes from pdf-extract; when that fails on a document and the
/// fallback is enabled, lopdf's own text extraction is used per page.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    pages: Vec<String>,
    fallback_to_lopdf: bool,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            pages: Vec::new(),
            fallback_to_lopdf: true,
        }
    }

    /// Enable or disable the lopdf fallback.
    pub fn with_lopdf_fallback(mut self, enabled: bool) -> Self {
        self.fallback_to_lopdf = enabled;
        self
    }

    /// Load a PDF from bytes and extract the text of every page.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        self.pages = self.extract_pages()?;
        Ok(())
    }

    fn extract_pages(&self) -> Result<Vec<String>> {
        match pdf_extract::extract_text_from_mem_by_pages(&self.raw_data) {
            Ok(pages) => Ok(pages),
            Err(e) if self.fallback_to_lopdf => {
                warn!("pdf-extract failed ({}), falling back to lopdf", e);
                self.extract_pages_with_lopdf()
            }
            Err(e) => Err(PdfError::TextExtraction(e.to_string())),
        }
    }

    fn extract_pages_with_lopdf(&self) -> Result<Vec<String>> {
        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))?;

        doc.get_pages()
            .keys()
            .map(|&number| {
                doc.extract_text(&[number])
                    .map_err(|e| PdfError::TextExtraction(e.to_string()))
            })
            .collect()
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for PdfExtractor {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String> {
        page.checked_sub(1)
            .and_then(|index| self.pages.get(index as usize))
            .cloned()
            .ok_or(PdfError::InvalidPage(page))
    }
}
