//! Declarative field rules for payslip extraction.
//!
//! Each financial field is one [`FieldRule`]: a labeled pattern whose first
//! capture group holds the value, a post-processor turning the capture into
//! a decimal, and the slot it fills. Supporting a new label variant means
//! adding a row to [`FIELD_RULES`].

pub mod amounts;
pub mod months;
pub mod patterns;

pub use amounts::{format_amount, parse_amount};
pub use months::month_from_abbrev;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use crate::models::ParsedPayslip;
use patterns::*;

/// One labeled numeric field.
pub struct FieldRule {
    /// Field name as reported in missing-field lists.
    pub field: &'static str,
    /// Pattern whose first group captures the raw value.
    pub pattern: &'static Regex,
    /// Converts the raw capture into a value.
    pub post: fn(&str) -> Option<Decimal>,
    /// Stores the value on the payslip.
    pub assign: fn(&mut ParsedPayslip, Decimal),
}

impl FieldRule {
    /// Run the rule against `text`, returning the converted value if any.
    pub fn apply(&self, text: &str) -> Option<Decimal> {
        let caps = self.pattern.captures(text)?;
        (self.post)(caps.get(1)?.as_str())
    }
}

lazy_static! {
    /// All financial fields recognised on a single payslip.
    pub static ref FIELD_RULES: Vec<FieldRule> = vec![
        FieldRule { field: "basic", pattern: &BASIC_PAY, post: parse_amount, assign: |p, v| p.basic = Some(v) },
        FieldRule { field: "hra", pattern: &HRA, post: parse_amount, assign: |p, v| p.hra = Some(v) },
        FieldRule { field: "gross", pattern: &GROSS, post: parse_amount, assign: |p, v| p.gross = Some(v) },
        FieldRule { field: "pf_ee", pattern: &PF_EMPLOYEE, post: parse_amount, assign: |p, v| p.pf_ee = Some(v) },
        FieldRule { field: "pf_er", pattern: &PF_EMPLOYER, post: parse_amount, assign: |p, v| p.pf_er = Some(v) },
        FieldRule { field: "esi_ee", pattern: &ESIC_EMPLOYEE, post: parse_amount, assign: |p, v| p.esi_ee = Some(v) },
        FieldRule { field: "esi_er", pattern: &ESIC_EMPLOYER, post: parse_amount, assign: |p, v| p.esi_er = Some(v) },
        FieldRule { field: "lwf_ee", pattern: &LWF_EMPLOYEE, post: parse_amount, assign: |p, v| p.lwf_ee = Some(v) },
        FieldRule { field: "lwf_er", pattern: &LWF_EMPLOYER, post: parse_amount, assign: |p, v| p.lwf_er = Some(v) },
        FieldRule { field: "admin_pf", pattern: &ADMIN_CHARGES, post: parse_amount, assign: |p, v| p.admin_pf = Some(v) },
        FieldRule { field: "net", pattern: &NET_PAYABLE, post: parse_amount, assign: |p, v| p.net = Some(v) },
    ];
}
