//! Document text extraction.

mod extractor;

pub use extractor::PdfExtractor;

use std::path::Path;

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Text recovered from a document, one entry per page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentText {
    pub pages: Vec<String>,
}

impl DocumentText {
    /// Page texts joined with newlines, in page order.
    pub fn text(&self) -> String {
        self.pages.join("\n")
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// True when no page yielded any non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.trim().is_empty())
    }
}

/// Trait for turning document bytes into text.
pub trait TextExtractor {
    /// Decode `data` into per-page text.
    fn extract(&self, data: &[u8]) -> Result<DocumentText>;
}

/// Accepts documents that are already text (e.g. `pdftotext` dumps).
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, data: &[u8]) -> Result<DocumentText> {
        let text = std::str::from_utf8(data)
            .map_err(|e| ExtractionError::Encoding(e.to_string()))?;
        // Form feeds mark page breaks in text dumps.
        let pages = text.split('\u{000C}').map(str::to_string).collect();
        Ok(DocumentText { pages })
    }
}

/// Input document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" | "text" => Some(DocumentKind::Text),
            _ => None,
        }
    }

    /// Sniff the format from the `%PDF` magic, falling back to text.
    pub fn sniff(data: &[u8]) -> Self {
        if data.starts_with(b"%PDF") {
            DocumentKind::Pdf
        } else {
            DocumentKind::Text
        }
    }
}

/// Extract text from `data` with the extractor for `kind`.
pub fn extract_document(data: &[u8], kind: DocumentKind) -> Result<DocumentText> {
    match kind {
        DocumentKind::Pdf => PdfExtractor::new().extract(data),
        DocumentKind::Text => PlainTextExtractor.extract(data),
    }
}
