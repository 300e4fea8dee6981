use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;

use super::queries::{count_employees, insert_employee};
use super::StoreResult;
use crate::models::NewEmployee;

/// Monetary columns hold canonical decimal text so values stay exact.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    code         TEXT NOT NULL UNIQUE,
    first_name   TEXT NOT NULL DEFAULT '',
    last_name    TEXT NOT NULL DEFAULT '',
    base_salary  TEXT NOT NULL DEFAULT '20000',
    active       INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS attendance_logs (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id  INTEGER NOT NULL REFERENCES employees(id),
    day          TEXT NOT NULL,
    punch_in     TEXT,
    punch_out    TEXT,
    source       TEXT
);

CREATE TABLE IF NOT EXISTS payroll_runs (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    month        INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
    year         INTEGER NOT NULL,
    status       TEXT NOT NULL CHECK(status IN ('Processing','Completed','Imported')),
    processed_on TEXT NOT NULL,
    UNIQUE (month, year)
);

CREATE TABLE IF NOT EXISTS payslips (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id       INTEGER NOT NULL REFERENCES payroll_runs(id),
    employee_id  INTEGER NOT NULL REFERENCES employees(id),
    gross        TEXT NOT NULL,
    deductions   TEXT NOT NULL,
    net          TEXT NOT NULL,
    url          TEXT,
    UNIQUE (run_id, employee_id)
);

CREATE INDEX IF NOT EXISTS idx_attendance_employee_day ON attendance_logs(employee_id, day);
"#;

/// Demo roster: code, first name, last name, base salary.
pub const SEED_EMPLOYEES: [(&str, &str, &str, i64); 5] = [
    ("E001", "Amit", "Kumar", 24000),
    ("E002", "Sara", "Iyer", 28000),
    ("E003", "Rohit", "Das", 22000),
    ("E004", "Neha", "Rao", 26000),
    ("E005", "Vikram", "Shah", 30000),
];

/// Create all tables and indexes that do not exist yet.
pub fn create_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Insert the demo roster when the employees table is empty.
///
/// Returns the number of employees inserted.
pub fn seed_if_empty(conn: &Connection) -> StoreResult<usize> {
    if count_employees(conn)? > 0 {
        return Ok(0);
    }

    for (code, first, last, salary) in SEED_EMPLOYEES {
        insert_employee(
            conn,
            &NewEmployee {
                code: code.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                base_salary: Decimal::from(salary),
            },
        )?;
    }

    info!("Seeded {} demo employees", SEED_EMPLOYEES.len());
    Ok(SEED_EMPLOYEES.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{list_employees, Database};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.init().unwrap();
        db.init().unwrap();
    }

    #[test]
    fn test_seed_only_when_empty() {
        let db = Database::open_in_memory().unwrap();
        db.init().unwrap();

        assert_eq!(seed_if_empty(db.conn()).unwrap(), 5);
        assert_eq!(seed_if_empty(db.conn()).unwrap(), 0);

        let employees = list_employees(db.conn(), false).unwrap();
        assert_eq!(employees.len(), 5);
        assert_eq!(employees[1].full_name(), "Sara Iyer");
        assert_eq!(employees[1].base_salary, Decimal::new(28000, 0));
    }
}
