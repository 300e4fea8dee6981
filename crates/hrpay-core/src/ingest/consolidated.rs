use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::{create_employee, import_run, Assignments, IngestOptions};
use crate::error::{PersistenceError, Result};
use crate::matching::{normalize_name, NameMatcher};
use crate::models::{ConsolidatedRow, MatchResult, NewPayslip};
use crate::payroll::validate_month;
use crate::store::{find_employee_by_code, list_employees, upsert_payslip, Database};

/// Counts reported by a consolidated import.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub rows_parsed: usize,
    pub employees_created: usize,
    pub rows_imported: usize,
    /// Rows left for manual assignment and re-submission.
    pub unmatched: Vec<MatchResult>,
    /// Rows that resolved to an employee already booked by an earlier row
    /// of the same statement. They are not written.
    pub conflicts: Vec<MatchResult>,
}

/// Import consolidated rows as payslips of the imported run for a period.
///
/// Each row goes to its `assignments` override, else its roster match,
/// else a newly created employee when `options.create_missing` is set.
/// Rows resolved to nobody are returned in [`ImportSummary::unmatched`];
/// rows without a net figure are skipped. A row resolving to an employee
/// already booked by an earlier row is kept out and listed in
/// [`ImportSummary::conflicts`]. Statements carry net pay only, so gross is
/// recorded equal to net.
pub fn import_consolidated(
    db: &mut Database,
    options: &IngestOptions,
    rows: &[ConsolidatedRow],
    month: u32,
    year: i32,
    assignments: &Assignments,
) -> Result<ImportSummary> {
    validate_month(month)?;

    let tx = db.transaction()?;
    let roster = list_employees(&tx, false)?;
    let matches = NameMatcher::new(&roster)
        .with_threshold(options.threshold)
        .match_rows(rows);

    let mut summary = ImportSummary {
        rows_parsed: rows.len(),
        ..Default::default()
    };
    // Employees created by this import, so repeated names reuse them.
    let mut created: HashMap<String, i64> = HashMap::new();
    let mut run_id: Option<i64> = None;
    let mut booked: HashSet<i64> = HashSet::new();

    for result in matches {
        let Some(net) = result.net else {
            warn!("Skipping '{}': no net amount", result.name);
            continue;
        };

        let employee_id = if let Some(code) = assignments.code_for(&result.name) {
            find_employee_by_code(&tx, code)?
                .ok_or_else(|| PersistenceError::UnknownEmployee(code.to_string()))?
                .id
        } else if let Some(id) = result.emp_id {
            id
        } else if let Some(id) = created.get(&normalize_name(&result.name)) {
            *id
        } else if options.create_missing {
            let base_salary = result.wage_rate.unwrap_or(options.default_base_salary);
            let employee = create_employee(&tx, &result.name, base_salary)?;
            created.insert(normalize_name(&result.name), employee.id);
            summary.employees_created += 1;
            employee.id
        } else {
            summary.unmatched.push(result);
            continue;
        };

        if !booked.insert(employee_id) {
            warn!(
                "Row '{}' resolves to employee {} already booked by this statement, left for review",
                result.name, employee_id
            );
            summary.conflicts.push(MatchResult {
                emp_id: Some(employee_id),
                ..result
            });
            continue;
        }

        let run_id = match run_id {
            Some(id) => id,
            None => *run_id.insert(import_run(&tx, month, year)?),
        };

        upsert_payslip(
            &tx,
            &NewPayslip {
                run_id,
                employee_id,
                gross: net,
                deductions: Decimal::ZERO,
                net,
                url: None,
            },
        )?;
        summary.rows_imported += 1;
    }

    tx.commit()?;

    info!(
        "Consolidated import {:02}/{}: {} rows, {} imported, {} created, {} unmatched, {} conflicts",
        month,
        year,
        summary.rows_parsed,
        summary.rows_imported,
        summary.employees_created,
        summary.unmatched.len(),
        summary.conflicts.len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HrpayError;
    use crate::models::{MatchType, NewEmployee};
    use crate::store::{find_run, payslips_for_run, seed_if_empty};
    use pretty_assertions::assert_eq;

    fn setup() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.init().unwrap();
        seed_if_empty(db.conn()).unwrap();
        db
    }

    fn row(name: &str, wage: Option<i64>, net: Option<i64>) -> ConsolidatedRow {
        ConsolidatedRow {
            name: name.to_string(),
            designation: "Clerk".to_string(),
            wage_rate: wage.map(Decimal::from),
            net: net.map(Decimal::from),
        }
    }

    fn no_create() -> IngestOptions {
        IngestOptions {
            create_missing: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_matched_rows_imported() {
        let mut db = setup();
        let rows = vec![
            row("Amit Kumar", Some(24000), Some(21120)),
            row("SARA IYER.", Some(28000), Some(24640)),
        ];

        let summary =
            import_consolidated(&mut db, &no_create(), &rows, 4, 2024, &Assignments::default())
                .unwrap();

        assert_eq!(summary.rows_parsed, 2);
        assert_eq!(summary.rows_imported, 2);
        assert_eq!(summary.employees_created, 0);
        assert!(summary.unmatched.is_empty());

        let run = find_run(db.conn(), 4, 2024).unwrap().unwrap();
        let slips = payslips_for_run(db.conn(), run.id).unwrap();
        assert_eq!(slips.len(), 2);
        assert_eq!(slips[0].gross, slips[0].net);
        assert_eq!(slips[0].deductions, Decimal::ZERO);
    }

    #[test]
    fn test_unmatched_reported_for_review() {
        let mut db = setup();
        let rows = vec![row("John A. Smith", Some(15000), Some(14500))];

        let summary =
            import_consolidated(&mut db, &no_create(), &rows, 4, 2024, &Assignments::default())
                .unwrap();

        assert_eq!(summary.rows_imported, 0);
        assert_eq!(summary.unmatched.len(), 1);
        assert_eq!(summary.unmatched[0].match_type, MatchType::Unmatched);
        assert_eq!(find_run(db.conn(), 4, 2024).unwrap(), None);
    }

    #[test]
    fn test_assignment_resolves_unmatched() {
        let mut db = setup();
        let rows = vec![row("John A. Smith", Some(15000), Some(14500))];
        let assignments = Assignments::parse(&["John A Smith=E003"]).unwrap();

        let summary = import_consolidated(&mut db, &no_create(), &rows, 4, 2024, &assignments)
            .unwrap();
        assert_eq!(summary.rows_imported, 1);
        assert!(summary.unmatched.is_empty());
    }

    #[test]
    fn test_unknown_assignment_code_aborts() {
        let mut db = setup();
        let rows = vec![row("John A. Smith", Some(15000), Some(14500))];
        let assignments = Assignments::parse(&["John A Smith=E999"]).unwrap();

        let err =
            import_consolidated(&mut db, &no_create(), &rows, 4, 2024, &assignments).unwrap_err();
        assert!(matches!(
            err,
            HrpayError::Persistence(PersistenceError::UnknownEmployee(_))
        ));
    }

    #[test]
    fn test_create_missing_once_per_name() {
        let mut db = setup();
        let rows = vec![
            row("John A. Smith", Some(15000), Some(14500)),
            row("JOHN A SMITH", Some(15000), Some(14700)),
        ];

        let summary = import_consolidated(
            &mut db,
            &IngestOptions::default(),
            &rows,
            5,
            2024,
            &Assignments::default(),
        )
        .unwrap();

        assert_eq!(summary.employees_created, 1);
        assert_eq!(summary.rows_imported, 1);
        assert_eq!(summary.conflicts.len(), 1);
        assert_eq!(summary.conflicts[0].name, "JOHN A SMITH");
        let created = find_employee_by_code(db.conn(), "E006").unwrap().unwrap();
        assert_eq!(created.first_name, "John A.");
        assert_eq!(created.last_name, "Smith");
        assert_eq!(created.base_salary, Decimal::new(15000, 0));
    }

    #[test]
    fn test_second_row_for_same_employee_left_for_review() {
        let mut db = setup();
        let rows = vec![
            row("Amit Kumar", Some(24000), Some(100)),
            row("Amit Kumarr", Some(24000), Some(200)),
        ];

        let summary =
            import_consolidated(&mut db, &no_create(), &rows, 4, 2024, &Assignments::default())
                .unwrap();

        assert_eq!(summary.rows_imported, 1);
        assert!(summary.unmatched.is_empty());
        assert_eq!(summary.conflicts.len(), 1);
        assert_eq!(summary.conflicts[0].name, "Amit Kumarr");
        assert_eq!(summary.conflicts[0].emp_id, Some(1));

        let run = find_run(db.conn(), 4, 2024).unwrap().unwrap();
        let slips = payslips_for_run(db.conn(), run.id).unwrap();
        assert_eq!(slips.len(), 1);
        assert_eq!(slips[0].net, Decimal::new(100, 0));
    }

    #[test]
    fn test_assigned_row_colliding_with_match_left_for_review() {
        let mut db = setup();
        let rows = vec![
            row("Sara Iyer", Some(28000), Some(24640)),
            row("John A. Smith", Some(15000), Some(14500)),
        ];
        let assignments = Assignments::parse(&["John A Smith=E002"]).unwrap();

        let summary = import_consolidated(&mut db, &no_create(), &rows, 4, 2024, &assignments)
            .unwrap();
        assert_eq!(summary.rows_imported, 1);
        assert_eq!(summary.conflicts.len(), 1);
        assert_eq!(summary.conflicts[0].emp_id, Some(2));
    }

    #[test]
    fn test_rows_without_net_skipped() {
        let mut db = setup();
        let rows = vec![row("Amit Kumar", Some(24000), None)];

        let summary =
            import_consolidated(&mut db, &no_create(), &rows, 4, 2024, &Assignments::default())
                .unwrap();
        assert_eq!(summary.rows_parsed, 1);
        assert_eq!(summary.rows_imported, 0);
        assert!(summary.unmatched.is_empty());
    }

    #[test]
    fn test_import_into_new_employee_roster() {
        let mut db = setup();
        crate::store::insert_employee(
            db.conn(),
            &NewEmployee {
                code: "E010".to_string(),
                first_name: "Meena".to_string(),
                last_name: "Iyer".to_string(),
                base_salary: Decimal::new(22000, 0),
            },
        )
        .unwrap();
        let rows = vec![row("Meena Iyer", Some(22000), Some(20800))];

        let summary =
            import_consolidated(&mut db, &no_create(), &rows, 4, 2024, &Assignments::default())
                .unwrap();
        assert_eq!(summary.rows_imported, 1);
    }
}
