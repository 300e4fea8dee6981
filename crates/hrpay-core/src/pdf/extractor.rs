//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{DocumentText, Result, TextExtractor};
use crate::error::ExtractionError;

/// PDF text extractor.
///
/// Text is read page by page through lopdf. Documents whose fonts lopdf
/// cannot decode are re-read as a whole with pdf-extract.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    fn load(&self, data: &[u8]) -> Result<(Document, Vec<u8>)> {
        let mut doc = Document::load_mem(data).map_err(|e| ExtractionError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let raw = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(ExtractionError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| ExtractionError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        if doc.get_pages().is_empty() {
            return Err(ExtractionError::NoPages);
        }

        Ok((doc, raw))
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, data: &[u8]) -> Result<DocumentText> {
        let (doc, raw) = self.load(data)?;
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

        let mut pages = Vec::with_capacity(page_numbers.len());
        for page in &page_numbers {
            match doc.extract_text(&[*page]) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    warn!("Failed to extract text from page {}: {}", page, e);
                    pages.push(String::new());
                }
            }
        }

        let document = DocumentText { pages };
        if !document.is_blank() {
            debug!("Extracted text from {} pages", document.page_count());
            return Ok(document);
        }

        debug!("lopdf found no text, falling back to pdf-extract");
        let text = pdf_extract::extract_text_from_mem(&raw)
            .map_err(|e| ExtractionError::TextExtraction(e.to_string()))?;
        Ok(DocumentText { pages: vec![text] })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::{render_payslip, PayslipArtifact};
    use crate::payslip::{PayslipParser, RulePayslipParser};
    use crate::pdf::{extract_document, DocumentKind};
    use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    /// Build a PDF with one text line per `BT`/`ET` block, one entry per page.
    fn text_pdf(pages: &[&[&str]]) -> Vec<u8> {
        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        let page_ids: Vec<Ref> = (0..pages.len()).map(|i| Ref::new(4 + 2 * i as i32)).collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(pages.len() as i32);
        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

        for (lines, page_id) in pages.iter().zip(&page_ids) {
            let content_id = Ref::new(page_id.get() + 1);
            {
                let mut page = pdf.page(*page_id);
                page.parent(pages_id)
                    .media_box(Rect::new(0.0, 0.0, 595.0, 842.0))
                    .contents(content_id);
                page.resources().fonts().pair(Name(b"F1"), font_id);
            }

            let mut content = Content::new();
            let mut y = 800.0;
            for line in lines.iter() {
                content.begin_text();
                content.set_font(Name(b"F1"), 12.0);
                content.set_text_matrix([1.0, 0.0, 0.0, 1.0, 50.0, y]);
                content.show(Str(line.as_bytes()));
                content.end_text();
                y -= 20.0;
            }
            pdf.stream(content_id, &content.finish());
        }
        pdf.finish()
    }

    #[test]
    fn test_rendered_payslip_text_recovered() {
        let bytes = render_payslip(&PayslipArtifact {
            name: "Amit Kumar",
            code: "E001",
            month: 4,
            year: 2024,
            gross: Decimal::new(24000, 0),
            deductions: Decimal::new(288000, 2),
            net: Decimal::new(2112000, 2),
        });

        let doc = extract_document(&bytes, DocumentKind::Pdf).unwrap();
        assert_eq!(doc.page_count(), 1);

        let text = doc.text();
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            vec![
                "Payslip  04/2024",
                "Employee: Amit Kumar",
                "Code: E001",
                "Gross: 24,000.00",
                "Deductions: 2,880.00",
                "Net Pay: 21,120.00",
            ]
        );
    }

    #[test]
    fn test_pages_joined_in_order() {
        let bytes = text_pdf(&[&["first page"], &["second page"]]);

        let doc = PdfExtractor::new().extract(&bytes).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[0].contains("first page"));
        assert!(doc.pages[1].contains("second page"));

        let text = doc.text();
        let first = text.find("first page").unwrap();
        let second = text.find("second page").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_payslip_fields_parsed_from_pdf() {
        let bytes = text_pdf(&[&[
            "PAY SLIP FOR THE MONTH OF APR 2024",
            "NAME OF THE STAFF: AMIT KUMAR",
            "BASIC PAY (A) : 16,000.00",
            "SUB TOTAL [B] : 22,400.00",
            "NET PAYABLE AMOUNT : Rs. 20,287.00",
        ]]);

        let doc = extract_document(&bytes, DocumentKind::Pdf).unwrap();
        let parsed = RulePayslipParser::new().parse(&doc.text());

        assert_eq!(parsed.name.as_deref(), Some("AMIT KUMAR"));
        assert_eq!(parsed.month, Some(4));
        assert_eq!(parsed.year, Some(2024));
        assert_eq!(parsed.basic, Some(Decimal::new(16000, 0)));
        assert_eq!(parsed.gross, Some(Decimal::new(22400, 0)));
        assert_eq!(parsed.net, Some(Decimal::new(20287, 0)));
    }

    #[test]
    fn test_textless_pdf_goes_through_fallback() {
        let bytes = text_pdf(&[&[]]);

        // lopdf finds nothing, so pdf-extract decides the outcome.
        match PdfExtractor::new().extract(&bytes) {
            Ok(doc) => {
                assert_eq!(doc.page_count(), 1);
                assert!(doc.is_blank());
            }
            Err(err) => assert!(matches!(err, ExtractionError::TextExtraction(_))),
        }
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = PdfExtractor::new().extract(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::Parse(_)));
    }

    #[test]
    fn test_truncated_pdf_rejected() {
        let result = PdfExtractor::new().extract(b"%PDF-1.7\n1 0 obj\n<<");
        assert!(result.is_err());
    }
}
