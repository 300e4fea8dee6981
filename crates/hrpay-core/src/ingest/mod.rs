//! Importing parsed documents and attendance logs into the store.

mod attendance;
mod consolidated;
mod payslip;

pub use attendance::import_attendance;
pub use consolidated::{import_consolidated, ImportSummary};
pub use payslip::{import_payslip, PayslipImport, SourceDocument};

use std::collections::HashMap;

use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::{IngestError, PersistenceError, Result};
use crate::matching::{normalize_name, DEFAULT_THRESHOLD};
use crate::models::{Employee, HrpayConfig, NewEmployee, RunStatus};
use crate::store::{get_or_create_run, insert_employee, next_employee_code};

/// Settings shared by document imports.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOptions {
    /// Minimum fuzzy score for a roster match.
    pub threshold: f64,
    /// Create roster entries for names that match nobody.
    pub create_missing: bool,
    /// Base salary for created employees when the document gives none.
    pub default_base_salary: Decimal,
    /// Lifetime of presigned URLs for stored source documents.
    pub presign_ttl: std::time::Duration,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            create_missing: true,
            default_base_salary: Decimal::new(20000, 0),
            presign_ttl: std::time::Duration::from_secs(3600),
        }
    }
}

impl From<&HrpayConfig> for IngestOptions {
    fn from(config: &HrpayConfig) -> Self {
        Self {
            threshold: config.matching.threshold,
            create_missing: config.ingest.create_missing_employees,
            default_base_salary: config.payroll.default_base_salary,
            presign_ttl: std::time::Duration::from_secs(config.storage.presign_ttl_secs),
        }
    }
}

/// Manual `NAME=CODE` overrides, keyed by normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignments {
    by_name: HashMap<String, String>,
}

impl Assignments {
    /// Parse `NAME=CODE` pairs.
    pub fn parse<S: AsRef<str>>(pairs: &[S]) -> std::result::Result<Self, IngestError> {
        let mut by_name = HashMap::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (name, code) = pair
                .split_once('=')
                .map(|(n, c)| (normalize_name(n), c.trim()))
                .filter(|(n, c)| !n.is_empty() && !c.is_empty())
                .ok_or_else(|| IngestError::InvalidAssignment(pair.to_string()))?;
            by_name.insert(name, code.to_string());
        }
        Ok(Self { by_name })
    }

    /// Code assigned to a document name, if any.
    pub fn code_for(&self, raw_name: &str) -> Option<&str> {
        self.by_name.get(&normalize_name(raw_name)).map(String::as_str)
    }
}

/// Run that receives imported payslips for a period.
fn import_run(conn: &Connection, month: u32, year: i32) -> Result<i64> {
    let run = get_or_create_run(conn, month, year, RunStatus::Imported)?;
    if run.status != RunStatus::Imported {
        return Err(PersistenceError::RunComputed { month, year }.into());
    }
    Ok(run.id)
}

/// Create a roster entry for a document name under the next free code.
fn create_employee(conn: &Connection, raw_name: &str, base_salary: Decimal) -> Result<Employee> {
    let code = next_employee_code(conn)?;
    let employee = insert_employee(
        conn,
        &NewEmployee::from_document_name(code, raw_name, base_salary),
    )?;
    info!("Created employee {} for '{}'", employee.code, raw_name);
    Ok(employee)
}
