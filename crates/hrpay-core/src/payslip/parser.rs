//! Rule-based single payslip parser.

use tracing::debug;

use crate::models::ParsedPayslip;

use super::rules::patterns::{PAY_PERIOD, STAFF_NAME};
use super::rules::{month_from_abbrev, FIELD_RULES};

/// Trait for payslip parsing.
pub trait PayslipParser {
    /// Parse payslip fields from extracted text. Never fails: fields whose
    /// pattern does not match are left empty.
    fn parse(&self, text: &str) -> ParsedPayslip;
}

/// Parser driven by the declarative [`FIELD_RULES`] table.
#[derive(Debug, Clone, Copy)]
pub struct RulePayslipParser {
    keep_raw_text: bool,
}

impl RulePayslipParser {
    pub fn new() -> Self {
        Self { keep_raw_text: true }
    }

    /// Set whether the raw text is kept on the result for auditing.
    pub fn with_raw_text(mut self, keep: bool) -> Self {
        self.keep_raw_text = keep;
        self
    }

    fn extract_period(&self, text: &str) -> (Option<u32>, Option<i32>) {
        match PAY_PERIOD.captures(text) {
            Some(caps) => (month_from_abbrev(&caps[1]), caps[2].parse().ok()),
            None => (None, None),
        }
    }

    fn extract_name(&self, text: &str) -> Option<String> {
        STAFF_NAME
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|name| !name.is_empty())
    }
}

impl Default for RulePayslipParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PayslipParser for RulePayslipParser {
    fn parse(&self, text: &str) -> ParsedPayslip {
        let (month, year) = self.extract_period(text);

        let mut payslip = ParsedPayslip {
            name: self.extract_name(text),
            month,
            year,
            ..Default::default()
        };

        for rule in FIELD_RULES.iter() {
            if let Some(value) = rule.apply(text) {
                (rule.assign)(&mut payslip, value);
            }
        }

        if self.keep_raw_text {
            payslip.raw_text = text.to_string();
        }

        debug!(
            "Parsed payslip for {:?}, missing fields: {:?}",
            payslip.name,
            payslip.missing_fields()
        );

        payslip
    }
}
