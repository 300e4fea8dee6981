//! Reconciliation of document names against the employee roster.

mod matcher;
mod normalize;
pub mod similarity;

pub use matcher::{NameMatch, NameMatcher, DEFAULT_THRESHOLD};
pub use normalize::{normalize_full_name, normalize_name};
