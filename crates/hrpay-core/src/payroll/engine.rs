use std::time::Duration;

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info};

use super::artifact::{render_payslip, PayslipArtifact};
use crate::error::{HrpayError, PersistenceError, Result};
use crate::models::{Employee, NewPayslip, PayslipResult, RunStatus};
use crate::storage::{payslip_key, BlobStore};
use crate::store::{
    delete_payslips_for_run, get_or_create_run, insert_payslip, list_employees, set_run_status,
    Database,
};

/// Settings for a computed payroll run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Provident fund rate applied to base salary.
    pub pf_rate: Decimal,
    /// Lifetime of presigned payslip URLs.
    pub presign_ttl: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            pf_rate: Decimal::new(12, 2),
            presign_ttl: Duration::from_secs(3600),
        }
    }
}

/// Gross, deductions and net for one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayFigures {
    pub gross: Decimal,
    pub deductions: Decimal,
    pub net: Decimal,
}

impl PayFigures {
    /// Gross is the base salary; the only deduction is provident fund,
    /// rounded half away from zero to two places.
    pub fn compute(base_salary: Decimal, pf_rate: Decimal) -> Self {
        let deductions =
            (pf_rate * base_salary).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            gross: base_salary,
            deductions,
            net: base_salary - deductions,
        }
    }
}

pub fn validate_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(HrpayError::InvalidMonth(month))
    }
}

/// Compute, render, store and persist payslips for every active employee.
///
/// All database writes happen in one transaction. Re-running a period
/// replaces its payslips; a period holding imported payslips is refused.
/// On any error nothing is committed and the run is left as it was.
pub fn run_payroll(
    db: &mut Database,
    blobs: &dyn BlobStore,
    options: &RunOptions,
    month: u32,
    year: i32,
) -> Result<Vec<PayslipResult>> {
    validate_month(month)?;

    let tx = db.transaction()?;

    let run = get_or_create_run(&tx, month, year, RunStatus::Processing)?;
    if run.status == RunStatus::Imported {
        return Err(PersistenceError::RunImported { month, year }.into());
    }

    let replaced = delete_payslips_for_run(&tx, run.id)?;
    if replaced > 0 {
        info!("Recomputing {:02}/{}: replacing {} payslips", month, year, replaced);
    }

    let employees = list_employees(&tx, true)?;
    let mut results = Vec::with_capacity(employees.len());

    for employee in &employees {
        let result = process_employee(&tx, blobs, options, run.id, month, year, employee)?;
        results.push(result);
    }

    set_run_status(&tx, run.id, RunStatus::Completed, Utc::now())?;
    tx.commit()?;

    info!(
        "Payroll {:02}/{} completed for {} employees",
        month,
        year,
        results.len()
    );
    Ok(results)
}

fn process_employee(
    conn: &rusqlite::Connection,
    blobs: &dyn BlobStore,
    options: &RunOptions,
    run_id: i64,
    month: u32,
    year: i32,
    employee: &Employee,
) -> Result<PayslipResult> {
    let figures = PayFigures::compute(employee.base_salary, options.pf_rate);
    let name = employee.full_name();

    let pdf = render_payslip(&PayslipArtifact {
        name: &name,
        code: &employee.code,
        month,
        year,
        gross: figures.gross,
        deductions: figures.deductions,
        net: figures.net,
    });

    let key = payslip_key(year, month, &employee.code);
    let locator = blobs.put(&key, &pdf)?;
    let url = blobs.presign(&key, options.presign_ttl).unwrap_or(locator);

    insert_payslip(
        conn,
        &NewPayslip {
            run_id,
            employee_id: employee.id,
            gross: figures.gross,
            deductions: figures.deductions,
            net: figures.net,
            url: Some(url.clone()),
        },
    )?;

    debug!("{} ({}): net {}", name, employee.code, figures.net);

    Ok(PayslipResult {
        code: employee.code.clone(),
        name,
        gross: figures.gross,
        deductions: figures.deductions,
        net: figures.net,
        url,
    })
}
