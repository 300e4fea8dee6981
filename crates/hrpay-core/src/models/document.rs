//! Transient records produced by document parsing and name matching.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fields recovered from a single payslip.
///
/// Every field is optional: a pattern that does not match leaves it `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPayslip {
    pub name: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub gross: Option<Decimal>,
    pub basic: Option<Decimal>,
    pub hra: Option<Decimal>,
    pub pf_ee: Option<Decimal>,
    pub pf_er: Option<Decimal>,
    pub esi_ee: Option<Decimal>,
    pub esi_er: Option<Decimal>,
    pub lwf_ee: Option<Decimal>,
    pub lwf_er: Option<Decimal>,
    pub admin_pf: Option<Decimal>,
    pub net: Option<Decimal>,
    /// Extracted text the fields were read from.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub raw_text: String,
}

impl ParsedPayslip {
    /// Names of the fields that were not recovered.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks: [(&'static str, bool); 14] = [
            ("name", self.name.is_none()),
            ("month", self.month.is_none()),
            ("year", self.year.is_none()),
            ("gross", self.gross.is_none()),
            ("basic", self.basic.is_none()),
            ("hra", self.hra.is_none()),
            ("pf_ee", self.pf_ee.is_none()),
            ("pf_er", self.pf_er.is_none()),
            ("esi_ee", self.esi_ee.is_none()),
            ("esi_er", self.esi_er.is_none()),
            ("lwf_ee", self.lwf_ee.is_none()),
            ("lwf_er", self.lwf_er.is_none()),
            ("admin_pf", self.admin_pf.is_none()),
            ("net", self.net.is_none()),
        ];
        checks
            .into_iter()
            .filter_map(|(field, missing)| missing.then_some(field))
            .collect()
    }
}

/// One employee line from a consolidated statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedRow {
    pub name: String,
    pub designation: String,
    pub wage_rate: Option<Decimal>,
    pub net: Option<Decimal>,
}

/// How a document name was linked to the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Fuzzy,
    Unmatched,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Fuzzy => "fuzzy",
            MatchType::Unmatched => "unmatched",
        }
    }
}

/// A consolidated row together with its roster match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub name: String,
    pub designation: String,
    pub wage_rate: Option<Decimal>,
    pub net: Option<Decimal>,
    pub emp_id: Option<i64>,
    pub emp_name: String,
    pub match_type: MatchType,
    pub score: f64,
    /// Several roster entries shared the winning score; the first was taken.
    #[serde(default)]
    pub ambiguous: bool,
}

impl MatchResult {
    pub fn is_matched(&self) -> bool {
        self.emp_id.is_some()
    }
}
