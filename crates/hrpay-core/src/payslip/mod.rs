//! Payslip field extraction.

mod parser;
pub mod rules;

pub use parser::{PayslipParser, RulePayslipParser};
