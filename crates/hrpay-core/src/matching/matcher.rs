//! Exact-then-fuzzy name matching against the roster.

use tracing::{debug, warn};

use crate::models::{ConsolidatedRow, Employee, MatchResult, MatchType};

use super::normalize::normalize_name;
use super::similarity::ratio;

/// Minimum similarity for a fuzzy match.
pub const DEFAULT_THRESHOLD: f64 = 0.86;

/// Outcome of matching one name.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub emp_id: Option<i64>,
    /// Roster display name of the matched employee, empty when unmatched.
    pub emp_name: String,
    pub match_type: MatchType,
    pub score: f64,
    pub ambiguous: bool,
}

impl NameMatch {
    fn unmatched() -> Self {
        Self {
            emp_id: None,
            emp_name: String::new(),
            match_type: MatchType::Unmatched,
            score: 0.0,
            ambiguous: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    id: i64,
    display: String,
    normalized: String,
}

/// Matches free-form names against a snapshot of the roster.
///
/// Candidates are kept in employee-id order so that ties always resolve to
/// the same employee.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    candidates: Vec<Candidate>,
    threshold: f64,
}

impl NameMatcher {
    pub fn new(employees: &[Employee]) -> Self {
        let mut candidates: Vec<Candidate> = employees
            .iter()
            .map(|e| Candidate {
                id: e.id,
                display: e.full_name(),
                normalized: e.normalized_name(),
            })
            .collect();
        candidates.sort_by_key(|c| c.id);

        Self {
            candidates,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Set the minimum fuzzy score (inclusive).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Find the roster entry for `raw_name`.
    pub fn best_match(&self, raw_name: &str) -> NameMatch {
        let needle = normalize_name(raw_name);

        let exact: Vec<&Candidate> = self
            .candidates
            .iter()
            .filter(|c| c.normalized == needle)
            .collect();
        if let Some(first) = exact.first() {
            let ambiguous = exact.len() > 1;
            if ambiguous {
                warn!(
                    "Name '{}' matches {} roster entries exactly, using id {}",
                    raw_name,
                    exact.len(),
                    first.id
                );
            }
            return NameMatch {
                emp_id: Some(first.id),
                emp_name: first.display.clone(),
                match_type: MatchType::Exact,
                score: 1.0,
                ambiguous,
            };
        }

        let mut best: Option<(&Candidate, f64)> = None;
        let mut ties = 0usize;
        for candidate in &self.candidates {
            let score = ratio(&needle, &candidate.normalized);
            match best {
                Some((_, top)) if score > top => {
                    best = Some((candidate, score));
                    ties = 0;
                }
                Some((_, top)) if score == top => ties += 1,
                None => best = Some((candidate, score)),
                _ => {}
            }
        }

        match best {
            Some((candidate, score)) if score >= self.threshold => {
                let ambiguous = ties > 0;
                if ambiguous {
                    warn!(
                        "Name '{}' ties with {} other roster entries at {:.4}, using id {}",
                        raw_name, ties, score, candidate.id
                    );
                }
                NameMatch {
                    emp_id: Some(candidate.id),
                    emp_name: candidate.display.clone(),
                    match_type: MatchType::Fuzzy,
                    score: round_score(score),
                    ambiguous,
                }
            }
            Some((candidate, score)) => {
                debug!(
                    "No match for '{}' (best {} at {:.4}, threshold {})",
                    raw_name, candidate.display, score, self.threshold
                );
                NameMatch::unmatched()
            }
            None => NameMatch::unmatched(),
        }
    }

    /// Match every consolidated row, preserving row order.
    pub fn match_rows(&self, rows: &[ConsolidatedRow]) -> Vec<MatchResult> {
        rows.iter()
            .map(|row| {
                let m = self.best_match(&row.name);
                MatchResult {
                    name: row.name.clone(),
                    designation: row.designation.clone(),
                    wage_rate: row.wage_rate,
                    net: row.net,
                    emp_id: m.emp_id,
                    emp_name: m.emp_name,
                    match_type: m.match_type,
                    score: m.score,
                    ambiguous: m.ambiguous,
                }
            })
            .collect()
    }
}

fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}
