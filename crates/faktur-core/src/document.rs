//! Single-document pipeline: PDF text, then header and line items.

use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::invoice::{ExtractionResult, FakturParser, InvoiceParser};
use crate::models::config::{FakturConfig, PdfConfig};
use crate::pdf::{classify_text, normalize_text, PdfExtractor, PdfType};

/// Turns one PDF into an [`ExtractionResult`].
pub struct DocumentProcessor {
    pdf: PdfConfig,
    parser: FakturParser,
}

impl DocumentProcessor {
    pub fn new(config: &FakturConfig) -> Self {
        Self {
            pdf: config.pdf.clone(),
            parser: FakturParser::from_config(&config.extraction),
        }
    }

    /// Process a PDF file. The file name becomes the header's source file.
    pub fn process_file(&self, path: &Path) -> Result<ExtractionResult> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.process_bytes(&data, &name)
    }

    /// Process PDF bytes.
    pub fn process_bytes(&self, data: &[u8], source_file: &str) -> Result<ExtractionResult> {
        let mut extractor = PdfExtractor::new().with_lopdf_fallback(self.pdf.fallback_to_lopdf);
        extractor.load(data)?;

        let text = normalize_text(&extractor)?;
        self.process_text(&text, source_file)
    }

    /// Process already-normalized document text.
    pub fn process_text(&self, text: &str, source_file: &str) -> Result<ExtractionResult> {
        info!("Processing {}", source_file);

        let mut result = self.parser.parse(text)?.with_source_file(source_file);

        if classify_text(text, self.pdf.min_text_length) == PdfType::Scanned {
            warn!("{} has very little text; it may be a scanned image", source_file);
            result.warnings.push(format!(
                "Document has fewer than {} characters of text; it may be scanned",
                self.pdf.min_text_length
            ));
        }

        Ok(result)
    }
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new(&FakturConfig::default())
    }
}
