use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::{create_employee, import_run, IngestOptions};
use crate::error::{IngestError, PersistenceError, Result};
use crate::matching::NameMatcher;
use crate::models::{Employee, MatchType, NewPayslip, ParsedPayslip};
use crate::payroll::validate_month;
use crate::storage::{import_key, BlobStore};
use crate::store::{find_employee_by_code, list_employees, upsert_payslip, Database};

/// Original bytes of an imported document.
#[derive(Debug, Clone, Copy)]
pub struct SourceDocument<'a> {
    pub bytes: &'a [u8],
    /// File extension used for the stored copy (`pdf`, `txt`).
    pub extension: &'a str,
}

/// What an imported payslip was linked to and stored as.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayslipImport {
    pub code: String,
    pub employee_name: String,
    /// `None` when the employee was assigned by code.
    pub match_type: Option<MatchType>,
    pub score: f64,
    pub created: bool,
    pub run_id: i64,
    pub month: u32,
    pub year: i32,
    pub gross: Decimal,
    pub deductions: Decimal,
    pub net: Decimal,
    pub url: Option<String>,
}

struct Resolved {
    employee: Employee,
    match_type: Option<MatchType>,
    score: f64,
    created: bool,
}

/// Persist a parsed payslip into the imported run for its period.
///
/// The employee is `assign_code` when given, otherwise the roster match
/// for the payslip name, otherwise a newly created employee when
/// `options.create_missing` is set. A payslip already imported for the
/// same employee and period is replaced.
pub fn import_payslip(
    db: &mut Database,
    blobs: &dyn BlobStore,
    options: &IngestOptions,
    parsed: &ParsedPayslip,
    source: Option<SourceDocument>,
    assign_code: Option<&str>,
) -> Result<PayslipImport> {
    let mut missing = Vec::new();
    if parsed.name.is_none() && assign_code.is_none() {
        missing.push("name");
    }
    if parsed.month.is_none() {
        missing.push("month");
    }
    if parsed.year.is_none() {
        missing.push("year");
    }
    if parsed.net.is_none() {
        missing.push("net");
    }
    let (Some(month), Some(year), Some(net), true) =
        (parsed.month, parsed.year, parsed.net, missing.is_empty())
    else {
        return Err(IngestError::Incomplete(missing).into());
    };
    validate_month(month)?;

    let tx = db.transaction()?;

    let resolved = match assign_code {
        Some(code) => Resolved {
            employee: find_employee_by_code(&tx, code)?
                .ok_or_else(|| PersistenceError::UnknownEmployee(code.to_string()))?,
            match_type: None,
            score: 1.0,
            created: false,
        },
        None => {
            let name = parsed.name.as_deref().unwrap_or_default();
            resolve_by_name(&tx, options, name, parsed)?
        }
    };
    let employee = resolved.employee;

    let run_id = import_run(&tx, month, year)?;

    let url = match source {
        Some(doc) => {
            let key = import_key(year, month, &employee.code, doc.extension);
            let locator = blobs.put(&key, doc.bytes)?;
            Some(blobs.presign(&key, options.presign_ttl).unwrap_or(locator))
        }
        None => None,
    };

    let gross = parsed.gross.unwrap_or(net);
    let deductions = gross - net;
    upsert_payslip(
        &tx,
        &NewPayslip {
            run_id,
            employee_id: employee.id,
            gross,
            deductions,
            net,
            url: url.clone(),
        },
    )?;
    tx.commit()?;

    info!(
        "Imported payslip {:02}/{} for {} ({}), net {}",
        month,
        year,
        employee.full_name(),
        employee.code,
        net
    );

    Ok(PayslipImport {
        code: employee.code.clone(),
        employee_name: employee.full_name(),
        match_type: resolved.match_type,
        score: resolved.score,
        created: resolved.created,
        run_id,
        month,
        year,
        gross,
        deductions,
        net,
        url,
    })
}

fn resolve_by_name(
    conn: &rusqlite::Connection,
    options: &IngestOptions,
    name: &str,
    parsed: &ParsedPayslip,
) -> Result<Resolved> {
    let roster = list_employees(conn, false)?;
    let found = NameMatcher::new(&roster)
        .with_threshold(options.threshold)
        .best_match(name);

    let matched = found
        .emp_id
        .and_then(|id| roster.into_iter().find(|e| e.id == id));
    if let Some(employee) = matched {
        return Ok(Resolved {
            employee,
            match_type: Some(found.match_type),
            score: found.score,
            created: false,
        });
    }

    if !options.create_missing {
        return Err(IngestError::Unmatched(name.to_string()).into());
    }

    let base_salary = parsed
        .basic
        .or(parsed.gross)
        .unwrap_or(options.default_base_salary);
    Ok(Resolved {
        employee: create_employee(conn, name, base_salary)?,
        match_type: Some(MatchType::Unmatched),
        score: 0.0,
        created: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewEmployee, RunStatus};
    use crate::payroll::{run_payroll, RunOptions};
    use crate::storage::LocalBlobStore;
    use crate::store::{find_run, insert_employee, payslips_for_run};
    use crate::HrpayError;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn setup() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.init().unwrap();
        insert_employee(
            db.conn(),
            &NewEmployee {
                code: "E001".to_string(),
                first_name: "Ravi K.".to_string(),
                last_name: "Sharma".to_string(),
                base_salary: Decimal::new(12000, 0),
            },
        )
        .unwrap();
        db
    }

    fn parsed(name: &str) -> ParsedPayslip {
        ParsedPayslip {
            name: Some(name.to_string()),
            month: Some(4),
            year: Some(2024),
            gross: Some(Decimal::new(16800, 0)),
            basic: Some(Decimal::new(12000, 0)),
            net: Some(Decimal::new(15209, 0)),
            ..Default::default()
        }
    }

    #[test]
    fn test_import_exact_match() {
        let dir = tempdir().unwrap();
        let blobs = LocalBlobStore::new(dir.path());
        let mut db = setup();

        let source = SourceDocument { bytes: b"payslip text", extension: "txt" };
        let import = import_payslip(
            &mut db,
            &blobs,
            &IngestOptions::default(),
            &parsed("RAVI K. SHARMA"),
            Some(source),
            None,
        )
        .unwrap();

        assert_eq!(import.code, "E001");
        assert_eq!(import.match_type, Some(MatchType::Exact));
        assert!(!import.created);
        assert_eq!(import.deductions, Decimal::new(1591, 0));
        assert!(dir.path().join("imports/2024/04/E001.txt").exists());

        let run = find_run(db.conn(), 4, 2024).unwrap().unwrap();
        assert_eq!(run.status, RunStatus::Imported);
        let slips = payslips_for_run(db.conn(), run.id).unwrap();
        assert_eq!(slips.len(), 1);
        assert_eq!(slips[0].net, Decimal::new(15209, 0));
    }

    #[test]
    fn test_import_twice_replaces() {
        let dir = tempdir().unwrap();
        let blobs = LocalBlobStore::new(dir.path());
        let mut db = setup();
        let options = IngestOptions::default();

        import_payslip(&mut db, &blobs, &options, &parsed("Ravi K Sharma"), None, None).unwrap();
        let mut second = parsed("Ravi K Sharma");
        second.net = Some(Decimal::new(15000, 0));
        import_payslip(&mut db, &blobs, &options, &second, None, None).unwrap();

        let run = find_run(db.conn(), 4, 2024).unwrap().unwrap();
        let slips = payslips_for_run(db.conn(), run.id).unwrap();
        assert_eq!(slips.len(), 1);
        assert_eq!(slips[0].net, Decimal::new(15000, 0));
    }

    #[test]
    fn test_unknown_name_creates_employee() {
        let dir = tempdir().unwrap();
        let blobs = LocalBlobStore::new(dir.path());
        let mut db = setup();

        let import = import_payslip(
            &mut db,
            &blobs,
            &IngestOptions::default(),
            &parsed("PRIYA NAIR"),
            None,
            None,
        )
        .unwrap();

        assert!(import.created);
        assert_eq!(import.code, "E002");
        let created = find_employee_by_code(db.conn(), "E002").unwrap().unwrap();
        assert_eq!(created.first_name, "PRIYA");
        assert_eq!(created.base_salary, Decimal::new(12000, 0));
    }

    #[test]
    fn test_unknown_name_without_creation_fails() {
        let dir = tempdir().unwrap();
        let blobs = LocalBlobStore::new(dir.path());
        let mut db = setup();
        let options = IngestOptions {
            create_missing: false,
            ..Default::default()
        };

        let err = import_payslip(&mut db, &blobs, &options, &parsed("PRIYA NAIR"), None, None)
            .unwrap_err();
        assert!(matches!(err, HrpayError::Ingest(IngestError::Unmatched(_))));
        assert_eq!(find_run(db.conn(), 4, 2024).unwrap(), None);
    }

    #[test]
    fn test_assign_code_overrides_name() {
        let dir = tempdir().unwrap();
        let blobs = LocalBlobStore::new(dir.path());
        let mut db = setup();
        let mut payslip = parsed("x");
        payslip.name = None;

        let import = import_payslip(
            &mut db,
            &blobs,
            &IngestOptions::default(),
            &payslip,
            None,
            Some("E001"),
        )
        .unwrap();
        assert_eq!(import.code, "E001");
        assert_eq!(import.match_type, None);

        let err = import_payslip(
            &mut db,
            &blobs,
            &IngestOptions::default(),
            &payslip,
            None,
            Some("E404"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            HrpayError::Persistence(PersistenceError::UnknownEmployee(_))
        ));
    }

    #[test]
    fn test_incomplete_payslip_rejected() {
        let dir = tempdir().unwrap();
        let blobs = LocalBlobStore::new(dir.path());
        let mut db = setup();
        let payslip = ParsedPayslip {
            name: Some("RAVI".to_string()),
            month: Some(4),
            ..Default::default()
        };

        let err = import_payslip(&mut db, &blobs, &IngestOptions::default(), &payslip, None, None)
            .unwrap_err();
        match err {
            HrpayError::Ingest(IngestError::Incomplete(fields)) => {
                assert_eq!(fields, vec!["year", "net"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_computed_period_refuses_import() {
        let dir = tempdir().unwrap();
        let blobs = LocalBlobStore::new(dir.path());
        let mut db = setup();
        run_payroll(&mut db, &blobs, &RunOptions::default(), 4, 2024).unwrap();

        let err = import_payslip(
            &mut db,
            &blobs,
            &IngestOptions::default(),
            &parsed("RAVI K. SHARMA"),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            HrpayError::Persistence(PersistenceError::RunComputed { .. })
        ));
    }
}
