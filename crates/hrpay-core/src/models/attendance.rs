//! Attendance log models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of an attendance CSV (`code, day, punch_in, punch_out, source`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Employee code the punches belong to.
    pub code: String,
    /// ISO calendar day.
    pub day: NaiveDate,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub punch_in: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub punch_out: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub source: Option<String>,
}

impl AttendanceRecord {
    /// Source label, `csv` when the column was absent or blank.
    pub fn source_or_default(&self) -> &str {
        self.source.as_deref().unwrap_or("csv")
    }
}

/// Counts reported by an attendance import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub inserted: usize,
    /// Rows whose code is not on the roster or that could not be read.
    pub skipped: usize,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}
