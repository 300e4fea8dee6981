//! Single-page payslip PDF.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use rust_decimal::Decimal;

use crate::payslip::rules::format_amount;

// A4 in points.
const PAGE_W: f32 = 595.0;
const PAGE_H: f32 = 842.0;

const LEFT: f32 = 50.0;
const TITLE_Y: f32 = 800.0;
const FIRST_LINE_Y: f32 = 770.0;
const LINE_STEP: f32 = 20.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;

/// Everything printed on a payslip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayslipArtifact<'a> {
    pub name: &'a str,
    pub code: &'a str,
    pub month: u32,
    pub year: i32,
    pub gross: Decimal,
    pub deductions: Decimal,
    pub net: Decimal,
}

impl PayslipArtifact<'_> {
    pub fn title(&self) -> String {
        format!("Payslip  {:02}/{}", self.month, self.year)
    }

    /// Labeled body lines in print order.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Employee: {}", self.name),
            format!("Code: {}", self.code),
            format!("Gross: {}", format_amount(self.gross)),
            format!("Deductions: {}", format_amount(self.deductions)),
            format!("Net Pay: {}", format_amount(self.net)),
        ]
    }
}

/// Render the payslip as PDF bytes.
///
/// The output carries no timestamps or generated identifiers, so equal
/// inputs give byte-identical documents.
pub fn render_payslip(slip: &PayslipArtifact) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let page_id = Ref::new(3);
    let content_id = Ref::new(4);
    let font_id = Ref::new(5);
    let bold_id = Ref::new(6);

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id).kids([page_id]).count(1);

    {
        let mut page = pdf.page(page_id);
        page.parent(pages_id)
            .media_box(Rect::new(0.0, 0.0, PAGE_W, PAGE_H))
            .contents(content_id);
        page.resources()
            .fonts()
            .pair(Name(b"F1"), font_id)
            .pair(Name(b"F2"), bold_id);
    }

    pdf.type1_font(font_id).base_font(Name(b"Helvetica"));
    pdf.type1_font(bold_id).base_font(Name(b"Helvetica-Bold"));

    let mut content = Content::new();
    draw_text(&mut content, b"F2", TITLE_SIZE, LEFT, TITLE_Y, &slip.title());

    let mut y = FIRST_LINE_Y;
    for line in slip.lines() {
        draw_text(&mut content, b"F1", BODY_SIZE, LEFT, y, &line);
        y -= LINE_STEP;
    }

    pdf.stream(content_id, &content.finish());
    pdf.finish()
}

fn draw_text(content: &mut Content, font: &[u8], size: f32, x: f32, y: f32, text: &str) {
    let bytes = latin_bytes(text);
    content.begin_text();
    content.set_font(Name(font), size);
    content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
    content.show(Str(&bytes));
    content.end_text();
}

/// Standard Type 1 fonts only cover single-byte text; anything else prints
/// as `?`.
fn latin_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> PayslipArtifact<'static> {
        PayslipArtifact {
            name: "Amit Kumar",
            code: "E001",
            month: 4,
            year: 2024,
            gross: Decimal::new(24000, 0),
            deductions: Decimal::new(288000, 2),
            net: Decimal::new(2112000, 2),
        }
    }

    #[test]
    fn test_lines() {
        let slip = sample();
        assert_eq!(slip.title(), "Payslip  04/2024");
        assert_eq!(
            slip.lines(),
            vec![
                "Employee: Amit Kumar",
                "Code: E001",
                "Gross: 24,000.00",
                "Deductions: 2,880.00",
                "Net Pay: 21,120.00",
            ]
        );
    }

    #[test]
    fn test_render_is_pdf() {
        let bytes = render_payslip(&sample());
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(lopdf::Document::load_mem(&bytes).is_ok());
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(render_payslip(&sample()), render_payslip(&sample()));
    }

    #[test]
    fn test_non_ascii_replaced() {
        assert_eq!(latin_bytes("Zoë"), b"Zo?".to_vec());
    }
}
