//! Regex patterns for payslip and statement extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Pay period header: "PAY SLIP FOR THE MONTH OF APR 2024"
    pub static ref PAY_PERIOD: Regex = Regex::new(
        r"(?i)PAY SLIP FOR THE MONTH OF\s+([A-Z]{3})\s+(\d{4})"
    ).unwrap();

    // Staff name: letters, spaces, periods, hyphens and apostrophes on the label's line
    pub static ref STAFF_NAME: Regex = Regex::new(
        r"(?i)NAME OF THE STAFF:[ \t]*([A-Z][A-Z \t.\-']*)"
    ).unwrap();

    pub static ref BASIC_PAY: Regex = Regex::new(
        r"(?i)BASIC\s*PAY.*?:\s*([0-9.,]+)"
    ).unwrap();

    pub static ref HRA: Regex = Regex::new(
        r"(?i)H\.?R\.?A.*?:\s*([0-9.,]+)"
    ).unwrap();

    pub static ref GROSS: Regex = Regex::new(
        r"(?i)(?:SUB TOTAL|GROSS SALARY|SUB\s*TOTAL.*\[B\])\D+([0-9.,]+)"
    ).unwrap();

    pub static ref PF_EMPLOYEE: Regex = Regex::new(
        r"(?i)PROVIDENT FUND\s*\(EMPLOYEE\).*?:\s*([0-9.,]+)"
    ).unwrap();

    pub static ref PF_EMPLOYER: Regex = Regex::new(
        r"(?i)PROVIDENT FUND\s*\(EMPLOYER\).*?:\s*([0-9.,]+)"
    ).unwrap();

    pub static ref ESIC_EMPLOYEE: Regex = Regex::new(
        r"(?i)E\.?S\.?I\.?C\.?\s*\(EMPLOYEE\).*?:\s*([0-9.,]+)"
    ).unwrap();

    pub static ref ESIC_EMPLOYER: Regex = Regex::new(
        r"(?i)E\.?S\.?I\.?C\.?\s*\(EMPLOYER\).*?:\s*([0-9.,]+)"
    ).unwrap();

    pub static ref LWF_EMPLOYEE: Regex = Regex::new(
        r"(?i)L\.?W\.?F\.?\s*\(EMPLOYEE\).*?:\s*([0-9.,]+)"
    ).unwrap();

    pub static ref LWF_EMPLOYER: Regex = Regex::new(
        r"(?i)L\.?W\.?F\.?\s*\(EMPLOYER\).*?:\s*([0-9.,]+)"
    ).unwrap();

    pub static ref ADMIN_CHARGES: Regex = Regex::new(
        r"(?i)ADMIN.*?CHARGES.*?:\s*([0-9.,]+)"
    ).unwrap();

    pub static ref NET_PAYABLE: Regex = Regex::new(
        r"(?i)NET\s*(?:PAYABLE|PAY).+?:\s*Rs?\.?\s*([0-9.,]+)"
    ).unwrap();

    // Consolidated statement cells
    pub static ref SERIAL_CELL: Regex = Regex::new(r"^[0-9]+$").unwrap();

    pub static ref NUMERIC_CELL: Regex = Regex::new(r"^[0-9][0-9,]*(?:\.[0-9]*)?$").unwrap();
}
