//! PDF processing module.

mod extractor;

pub use extractor::PdfExtractor;

use tracing::debug;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Type of PDF content, judged by the amount of extractable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains extractable text.
    Text,
    /// Little or no text; probably a scanned image.
    Scanned,
}

/// A document that yields text page by page.
pub trait PageSource {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Text of a page, numbered from 1.
    fn page_text(&self, page: u32) -> Result<String>;
}

/// Concatenate the text of every page in page order, with no separator.
pub fn normalize_text<S: PageSource + ?Sized>(source: &S) -> Result<String> {
    let page_count = source.page_count();
    if page_count == 0 {
        return Err(PdfError::NoPages);
    }

    let mut text = String::new();
    for page in 1..=page_count {
        text.push_str(&source.page_text(page)?);
    }

    debug!("Normalized {} pages into {} characters", page_count, text.len());
    Ok(text)
}

/// Classify text by the number of non-whitespace characters it holds.
pub fn classify_text(text: &str, min_text_length: usize) -> PdfType {
    let visible = text.chars().filter(|c| !c.is_whitespace()).count();
    if visible < min_text_length {
        PdfType::Scanned
    } else {
        PdfType::Text
    }
}

/// In-memory PDFs for tests.
#[cfg(test)]
pub(crate) mod testing {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Build a PDF with one page per entry, each line drawn on its own row.
    pub(crate) fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in pages {
            let mut operations = Vec::new();
            for (row, line) in lines.iter().enumerate() {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
                operations.push(Operation::new(
                    "Td",
                    vec![50.into(), (780 - 20 * row as i64).into()],
                ));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct InMemoryPages(Vec<&'static str>);

    impl PageSource for InMemoryPages {
        fn page_count(&self) -> u32 {
            self.0.len() as u32
        }

        fn page_text(&self, page: u32) -> Result<String> {
            self.0
                .get(page as usize - 1)
                .map(|s| s.to_string())
                .ok_or(PdfError::InvalidPage(page))
        }
    }

    #[test]
    fn test_pages_joined_without_separator() {
        let source = InMemoryPages(vec!["Faktur Pajak\nKode", " dan Nomor Seri", "\nakhir"]);
        assert_eq!(
            normalize_text(&source).unwrap(),
            "Faktur Pajak\nKode dan Nomor Seri\nakhir"
        );
    }

    #[test]
    fn test_no_pages() {
        assert!(matches!(
            normalize_text(&InMemoryPages(vec![])),
            Err(PdfError::NoPages)
        ));
    }

    #[test]
    fn test_classify_text() {
        assert_eq!(classify_text("  \n\n ", 1), PdfType::Scanned);
        assert_eq!(classify_text("Faktur Pajak", 5), PdfType::Text);
        assert_eq!(classify_text("abc", 50), PdfType::Scanned);
    }
}
