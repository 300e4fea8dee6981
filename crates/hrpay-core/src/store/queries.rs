use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use super::StoreResult;
use crate::error::PersistenceError;
use crate::models::{
    AttendanceRecord, Employee, NewEmployee, NewPayslip, PayrollRun, Payslip, RunStatus,
};

const EMPLOYEE_COLUMNS: &str = "id, code, first_name, last_name, base_salary, active";
const RUN_COLUMNS: &str = "id, month, year, status, processed_on";
const PAYSLIP_COLUMNS: &str = "id, run_id, employee_id, gross, deductions, net, url";

fn corrupt(idx: usize, table: &'static str, column: &'static str, value: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(PersistenceError::Corrupt { table, column, value }),
    )
}

fn decimal_at(row: &Row, idx: usize, table: &'static str, column: &'static str) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw).map_err(|_| corrupt(idx, table, column, raw))
}

fn timestamp_at(row: &Row, idx: usize, table: &'static str, column: &'static str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| corrupt(idx, table, column, raw))
}

fn map_employee(row: &Row) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        code: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        base_salary: decimal_at(row, 4, "employees", "base_salary")?,
        active: row.get(5)?,
    })
}

fn map_run(row: &Row) -> rusqlite::Result<PayrollRun> {
    let status: String = row.get(3)?;
    let status = RunStatus::from_db_str(&status)
        .ok_or_else(|| corrupt(3, "payroll_runs", "status", status.clone()))?;

    Ok(PayrollRun {
        id: row.get(0)?,
        month: row.get(1)?,
        year: row.get(2)?,
        status,
        processed_on: timestamp_at(row, 4, "payroll_runs", "processed_on")?,
    })
}

fn map_payslip(row: &Row) -> rusqlite::Result<Payslip> {
    Ok(Payslip {
        id: row.get(0)?,
        run_id: row.get(1)?,
        employee_id: row.get(2)?,
        gross: decimal_at(row, 3, "payslips", "gross")?,
        deductions: decimal_at(row, 4, "payslips", "deductions")?,
        net: decimal_at(row, 5, "payslips", "net")?,
        url: row.get(6)?,
    })
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

/// All employees ordered by id, optionally only the active ones.
pub fn list_employees(conn: &Connection, active_only: bool) -> StoreResult<Vec<Employee>> {
    let filter = if active_only { "WHERE active = 1" } else { "" };
    let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees {filter} ORDER BY id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_employee)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_employee_by_code(conn: &Connection, code: &str) -> StoreResult<Option<Employee>> {
    let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE code = ?1");
    Ok(conn.query_row(&sql, [code], map_employee).optional()?)
}

pub fn get_employee(conn: &Connection, id: i64) -> StoreResult<Option<Employee>> {
    let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_employee).optional()?)
}

/// Insert an active employee and return the stored record.
pub fn insert_employee(conn: &Connection, new: &NewEmployee) -> StoreResult<Employee> {
    conn.execute(
        "INSERT INTO employees (code, first_name, last_name, base_salary, active)
         VALUES (?1, ?2, ?3, ?4, 1)",
        params![
            new.code,
            new.first_name,
            new.last_name,
            new.base_salary.to_string(),
        ],
    )?;

    Ok(Employee {
        id: conn.last_insert_rowid(),
        code: new.code.clone(),
        first_name: new.first_name.clone(),
        last_name: new.last_name.clone(),
        base_salary: new.base_salary,
        active: true,
    })
}

pub fn set_employee_active(conn: &Connection, code: &str, active: bool) -> StoreResult<()> {
    let changed = conn.execute(
        "UPDATE employees SET active = ?1 WHERE code = ?2",
        params![active, code],
    )?;
    if changed == 0 {
        return Err(PersistenceError::UnknownEmployee(code.to_string()));
    }
    Ok(())
}

pub fn count_employees(conn: &Connection) -> StoreResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?)
}

/// Number of active employees.
pub fn headcount(conn: &Connection) -> StoreResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM employees WHERE active = 1",
        [],
        |row| row.get(0),
    )?)
}

/// Next free `E###` code: one past the highest numeric `E` code on file.
pub fn next_employee_code(conn: &Connection) -> StoreResult<String> {
    let mut stmt = conn.prepare("SELECT code FROM employees")?;
    let codes = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut highest = 0u32;
    for code in codes {
        let code = code?;
        let Some(digits) = code.strip_prefix('E') else {
            continue;
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if let Ok(n) = digits.parse::<u32>() {
            highest = highest.max(n);
        }
    }

    let next = highest
        .checked_add(1)
        .ok_or(PersistenceError::CodesExhausted(highest))?;
    Ok(format!("E{:03}", next))
}

// ---------------------------------------------------------------------------
// Payroll runs
// ---------------------------------------------------------------------------

pub fn find_run(conn: &Connection, month: u32, year: i32) -> StoreResult<Option<PayrollRun>> {
    let sql = format!("SELECT {RUN_COLUMNS} FROM payroll_runs WHERE month = ?1 AND year = ?2");
    Ok(conn.query_row(&sql, params![month, year], map_run).optional()?)
}

/// Return the run for the period, inserting it with `status` if absent.
///
/// An existing run keeps its status.
pub fn get_or_create_run(
    conn: &Connection,
    month: u32,
    year: i32,
    status: RunStatus,
) -> StoreResult<PayrollRun> {
    conn.execute(
        "INSERT INTO payroll_runs (month, year, status, processed_on)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (month, year) DO NOTHING",
        params![month, year, status.to_db_str(), Utc::now().to_rfc3339()],
    )?;

    find_run(conn, month, year)?
        .ok_or(PersistenceError::Database(rusqlite::Error::QueryReturnedNoRows))
}

pub fn set_run_status(
    conn: &Connection,
    run_id: i64,
    status: RunStatus,
    processed_on: DateTime<Utc>,
) -> StoreResult<()> {
    conn.execute(
        "UPDATE payroll_runs SET status = ?1, processed_on = ?2 WHERE id = ?3",
        params![status.to_db_str(), processed_on.to_rfc3339(), run_id],
    )?;
    Ok(())
}

/// All runs, most recent period first.
pub fn list_runs(conn: &Connection) -> StoreResult<Vec<PayrollRun>> {
    let sql = format!("SELECT {RUN_COLUMNS} FROM payroll_runs ORDER BY year DESC, month DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_run)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Payslips
// ---------------------------------------------------------------------------

pub fn delete_payslips_for_run(conn: &Connection, run_id: i64) -> StoreResult<usize> {
    Ok(conn.execute("DELETE FROM payslips WHERE run_id = ?1", [run_id])?)
}

pub fn insert_payslip(conn: &Connection, slip: &NewPayslip) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO payslips (run_id, employee_id, gross, deductions, net, url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            slip.run_id,
            slip.employee_id,
            slip.gross.to_string(),
            slip.deductions.to_string(),
            slip.net.to_string(),
            slip.url,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert a payslip or replace the figures of the existing one for the
/// same run and employee.
pub fn upsert_payslip(conn: &Connection, slip: &NewPayslip) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO payslips (run_id, employee_id, gross, deductions, net, url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (run_id, employee_id) DO UPDATE SET
             gross = excluded.gross,
             deductions = excluded.deductions,
             net = excluded.net,
             url = excluded.url",
        params![
            slip.run_id,
            slip.employee_id,
            slip.gross.to_string(),
            slip.deductions.to_string(),
            slip.net.to_string(),
            slip.url,
        ],
    )?;
    Ok(())
}

/// Payslips of one run ordered by employee id.
pub fn payslips_for_run(conn: &Connection, run_id: i64) -> StoreResult<Vec<Payslip>> {
    let sql = format!("SELECT {PAYSLIP_COLUMNS} FROM payslips WHERE run_id = ?1 ORDER BY employee_id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([run_id], map_payslip)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Net pay summed over every payslip ever stored.
pub fn total_net_disbursed(conn: &Connection) -> StoreResult<Decimal> {
    let mut stmt = conn.prepare("SELECT net FROM payslips")?;
    let rows = stmt.query_map([], |row| decimal_at(row, 0, "payslips", "net"))?;

    let mut total = Decimal::ZERO;
    for r in rows {
        total += r?;
    }
    Ok(total)
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

pub fn insert_attendance(conn: &Connection, employee_id: i64, record: &AttendanceRecord) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO attendance_logs (employee_id, day, punch_in, punch_out, source)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            employee_id,
            record.day.format("%Y-%m-%d").to_string(),
            record.punch_in,
            record.punch_out,
            record.source_or_default(),
        ],
    )?;
    Ok(())
}

pub fn count_attendance(conn: &Connection) -> StoreResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM attendance_logs", [], |row| row.get(0))?)
}
