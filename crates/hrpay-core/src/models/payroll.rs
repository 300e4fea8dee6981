//! Payroll run and payslip models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a payroll run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run created, payslips being written.
    Processing,
    /// All payslips computed and stored.
    Completed,
    /// Payslips came from ingested documents rather than computation.
    Imported,
}

impl RunStatus {
    pub fn to_db_str(self) -> &'static str {
        match self {
            RunStatus::Processing => "Processing",
            RunStatus::Completed => "Completed",
            RunStatus::Imported => "Imported",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Processing" => Some(RunStatus::Processing),
            "Completed" => Some(RunStatus::Completed),
            "Imported" => Some(RunStatus::Imported),
            _ => None,
        }
    }
}

/// One batch of payslips for a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    pub id: i64,
    /// Month, 1-12.
    pub month: u32,
    pub year: i32,
    pub status: RunStatus,
    pub processed_on: DateTime<Utc>,
}

/// A persisted payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    pub id: i64,
    pub run_id: i64,
    pub employee_id: i64,
    pub gross: Decimal,
    pub deductions: Decimal,
    pub net: Decimal,
    /// Locator of the rendered or imported document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Payslip figures ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayslip {
    pub run_id: i64,
    pub employee_id: i64,
    pub gross: Decimal,
    pub deductions: Decimal,
    pub net: Decimal,
    pub url: Option<String>,
}

/// Per-employee outcome of a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipResult {
    pub code: String,
    pub name: String,
    pub gross: Decimal,
    pub deductions: Decimal,
    pub net: Decimal,
    pub url: String,
}
