//! Roster data models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::matching::normalize_full_name;

/// An employee on the authoritative roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Database identity.
    pub id: i64,

    /// Unique employee code (e.g. `E001`).
    pub code: String,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Monthly base salary.
    pub base_salary: Decimal,

    /// Whether the employee takes part in payroll runs.
    pub active: bool,
}

impl Employee {
    /// Display name, first then last.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Normalized full name used for matching.
    pub fn normalized_name(&self) -> String {
        normalize_full_name(&self.first_name, &self.last_name)
    }
}

/// Payload for creating an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    pub base_salary: Decimal,
}

impl NewEmployee {
    /// Build a roster entry from a free-form name as it appears on a document.
    ///
    /// The last whitespace-separated token becomes the family name.
    pub fn from_document_name(code: impl Into<String>, raw_name: &str, base_salary: Decimal) -> Self {
        let tokens: Vec<&str> = raw_name.split_whitespace().collect();
        let (first_name, last_name) = match tokens.split_last() {
            Some((last, rest)) if !rest.is_empty() => (rest.join(" "), (*last).to_string()),
            Some((only, _)) => ((*only).to_string(), String::new()),
            None => (String::new(), String::new()),
        };

        Self {
            code: code.into(),
            first_name,
            last_name,
            base_salary,
        }
    }
}
