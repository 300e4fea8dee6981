//! Payroll computation and payslip artifacts.

mod artifact;
mod engine;

pub use artifact::{render_payslip, PayslipArtifact};
pub use engine::{run_payroll, validate_month, PayFigures, RunOptions};
