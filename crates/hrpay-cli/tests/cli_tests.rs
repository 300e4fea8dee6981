mod common;

use common::{Workspace, fixture, hrpay};
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;

#[test]
fn test_init_seeds_roster_once() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["init", "--seed"])
        .assert()
        .success()
        .stdout(contains("Seeded 5 demo employees"));

    ws.cmd()
        .args(["init", "--seed"])
        .assert()
        .success()
        .stdout(contains("Roster is not empty"));

    ws.cmd()
        .args(["employees", "list"])
        .assert()
        .success()
        .stdout(contains("E001").and(contains("Amit Kumar")).and(contains("E005")));
}

#[test]
fn test_employees_add_and_deactivate() {
    let ws = Workspace::seeded();

    ws.cmd()
        .args(["employees", "add", "--first-name", "Priya", "--last-name", "Nair", "--salary", "18000"])
        .assert()
        .success()
        .stdout(contains("E006"));

    ws.cmd()
        .args(["employees", "deactivate", "E006"])
        .assert()
        .success();

    ws.cmd()
        .args(["employees", "list"])
        .assert()
        .success()
        .stdout(contains("Priya").not());

    ws.cmd()
        .args(["employees", "list", "--all", "--format", "csv"])
        .assert()
        .success()
        .stdout(contains("E006,Priya,Nair"));
}

#[test]
fn test_payslip_parse_json() {
    hrpay()
        .args(["payslip", "parse", "--format", "json"])
        .arg(fixture("payslips/amit_kumar_apr_2024.txt"))
        .assert()
        .success()
        .stdout(
            contains("\"name\": \"AMIT KUMAR\"")
                .and(contains("\"month\": 4"))
                .and(contains("\"year\": 2024")),
        );
}

#[test]
fn test_payslip_parse_missing_file() {
    hrpay()
        .args(["payslip", "parse", "/nonexistent/slip.txt"])
        .assert()
        .failure()
        .stderr(contains("Input file not found"));
}

#[test]
fn test_payslip_import_exact_match_stores_source() {
    let ws = Workspace::seeded();

    ws.cmd()
        .args(["payslip", "import"])
        .arg(fixture("payslips/amit_kumar_apr_2024.txt"))
        .assert()
        .success()
        .stdout(contains("E001").and(contains("exact match")).and(contains("20,287.00")));

    assert!(ws.data_root().join("imports/2024/04/E001.txt").exists());
}

#[test]
fn test_payslip_import_creates_missing_employee() {
    let ws = Workspace::seeded();

    ws.cmd()
        .args(["payslip", "import"])
        .arg(fixture("payslips/priya_nair_apr_2024.txt"))
        .assert()
        .success()
        .stdout(contains("E006").and(contains("new employee")));

    ws.cmd()
        .args(["employees", "list", "--format", "csv"])
        .assert()
        .success()
        .stdout(contains("E006,PRIYA,NAIR"));
}

#[test]
fn test_payslip_import_assign_unknown_code_fails() {
    let ws = Workspace::seeded();

    ws.cmd()
        .args(["payslip", "import", "--assign", "E999"])
        .arg(fixture("payslips/amit_kumar_apr_2024.txt"))
        .assert()
        .failure()
        .stderr(contains("unknown employee code: E999"));
}

#[test]
fn test_consolidated_match_reports_fuzzy_and_unmatched() {
    let ws = Workspace::seeded();

    ws.cmd()
        .args(["consolidated", "match"])
        .arg(fixture("statement_may_2024.txt"))
        .assert()
        .success()
        .stdout(
            contains("Amit Kumaar")
                .and(contains("Amit Kumar (fuzzy, 0.9524)"))
                .and(contains("Sara Iyer (exact, 1.0000)"))
                .and(contains("no match")),
        );
}

#[test]
fn test_consolidated_import_then_assign() {
    let ws = Workspace::seeded();
    let statement = fixture("statement_may_2024.txt");

    ws.cmd()
        .args(["consolidated", "import", "--month", "5", "--year", "2024", "--no-create"])
        .arg(&statement)
        .assert()
        .success()
        .stdout(
            contains("Imported 2 of 3 rows for 05/2024")
                .and(contains("Zubin Mehta"))
                .and(contains("--assign")),
        );

    ws.cmd()
        .args([
            "consolidated", "import", "--month", "5", "--year", "2024", "--no-create",
            "--assign", "Zubin Mehta=E005",
        ])
        .arg(&statement)
        .assert()
        .success()
        .stdout(contains("Imported 3 of 3 rows").and(contains("matched no employee").not()));

    ws.cmd()
        .args(["summary"])
        .assert()
        .success()
        .stdout(contains("57,260.00").and(contains("05/2024")).and(contains("Imported")));
}

#[test]
fn test_consolidated_import_reports_duplicate_employee_rows() {
    let ws = Workspace::seeded();
    let statement = ws.dir.path().join("duplicate.txt");
    fs::write(
        &statement,
        "\
| 1 | Amit Kumar  | M | 01-04-1990 | Supervisor | 24000 | 26 | 24000 | 0 | 100 |
| 2 | Amit Kumarr | M | 01-04-1990 | Supervisor | 24000 | 26 | 24000 | 0 | 200 |
",
    )
    .unwrap();

    ws.cmd()
        .args(["consolidated", "import", "--month", "6", "--year", "2024", "--no-create"])
        .arg(&statement)
        .assert()
        .success()
        .stdout(
            contains("Imported 1 of 2 rows")
                .and(contains("already on this statement"))
                .and(contains("Amit Kumarr")),
        );
}

#[test]
fn test_consolidated_import_rejects_bad_month() {
    let ws = Workspace::seeded();

    ws.cmd()
        .args(["consolidated", "import", "--month", "13", "--year", "2024"])
        .arg(fixture("statement_may_2024.txt"))
        .assert()
        .failure();
}

#[test]
fn test_run_payroll_csv() {
    let ws = Workspace::seeded();

    ws.cmd()
        .args(["run", "--month", "4", "--year", "2024", "--format", "csv"])
        .assert()
        .success()
        .stdout(
            contains("code,name,gross,deductions,net,url")
                .and(contains("E001,Amit Kumar,24000"))
                .and(contains("21120")),
        );

    assert!(ws.data_root().join("2024/04/payslip_E001.pdf").exists());
    assert!(ws.data_root().join("2024/04/payslip_E005.pdf").exists());
}

#[test]
fn test_run_refuses_imported_period() {
    let ws = Workspace::seeded();

    ws.cmd()
        .args(["payslip", "import"])
        .arg(fixture("payslips/amit_kumar_apr_2024.txt"))
        .assert()
        .success();

    ws.cmd()
        .args(["run", "--month", "4", "--year", "2024"])
        .assert()
        .failure()
        .stderr(contains("was imported and cannot be recomputed"));
}

#[test]
fn test_run_rejects_month_out_of_range() {
    let ws = Workspace::seeded();

    ws.cmd()
        .args(["run", "--month", "13", "--year", "2024"])
        .assert()
        .failure()
        .stderr(contains("13"));
}

#[test]
fn test_attendance_import_skips_unknown_codes() {
    let ws = Workspace::seeded();

    ws.cmd()
        .args(["attendance", "import"])
        .arg(fixture("attendance.csv"))
        .assert()
        .success()
        .stdout(contains("Imported 2 rows").and(contains("1 rows skipped")));
}

#[test]
fn test_summary_after_run() {
    let ws = Workspace::seeded();

    ws.cmd()
        .args(["run", "--month", "4", "--year", "2024"])
        .assert()
        .success();

    ws.cmd()
        .args(["summary"])
        .assert()
        .success()
        .stdout(
            contains("Active employees: 5")
                .and(contains("04/2024"))
                .and(contains("Completed")),
        );
}

#[test]
fn test_batch_continue_on_error_writes_summary() {
    let ws = Workspace::seeded();
    let inbox = ws.dir.path().join("inbox");
    fs::create_dir_all(&inbox).unwrap();
    for name in ["amit_kumar_apr_2024.txt", "priya_nair_apr_2024.txt"] {
        fs::copy(fixture(&format!("payslips/{name}")), inbox.join(name)).unwrap();
    }
    fs::write(inbox.join("blank_period.txt"), "NAME OF THE STAFF: NOBODY\n").unwrap();

    let pattern = inbox.join("*.txt");
    let report_dir = ws.dir.path().join("reports");

    ws.cmd()
        .args(["batch", "--continue-on-error", "--summary", "--output-dir"])
        .arg(&report_dir)
        .arg(pattern.to_string_lossy().as_ref())
        .assert()
        .success()
        .stdout(contains("2 imported, 1 failed").and(contains("blank_period.txt")));

    let summary = fs::read_to_string(report_dir.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,code"));
    assert!(summary.contains("amit_kumar_apr_2024.txt,success,E001"));
    assert!(summary.contains("blank_period.txt,error"));
}

#[test]
fn test_batch_stops_on_first_error() {
    let ws = Workspace::seeded();
    let inbox = ws.dir.path().join("inbox");
    fs::create_dir_all(&inbox).unwrap();
    fs::write(inbox.join("a_blank.txt"), "NAME OF THE STAFF: NOBODY\n").unwrap();

    ws.cmd()
        .arg("batch")
        .arg(inbox.join("*.txt").to_string_lossy().as_ref())
        .assert()
        .failure()
        .stderr(contains("missing required fields"));
}

#[test]
fn test_config_get_and_set() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["config", "get", "matching.threshold"])
        .assert()
        .success()
        .stdout(contains("0.86"));

    ws.cmd()
        .args(["config", "set", "matching.threshold", "0.9"])
        .assert()
        .success();

    ws.cmd()
        .args(["config", "get", "matching.threshold"])
        .assert()
        .success()
        .stdout(contains("0.9"));

    ws.cmd()
        .args(["config", "set", "matching.threshold", "-1"])
        .assert()
        .failure()
        .stderr(contains("matching.threshold must be between 0 and 1"));

    ws.cmd()
        .args(["config", "get", "matching.threshold"])
        .assert()
        .success()
        .stdout(contains("0.9"));

    ws.cmd()
        .args(["config", "set", "matching.nonexistent", "1"])
        .assert()
        .failure()
        .stderr(contains("Configuration key not found"));
}
