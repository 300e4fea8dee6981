//! Three-letter month abbreviations.

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Map a three-letter month token (any case) to 1-12.
pub fn month_from_abbrev(token: &str) -> Option<u32> {
    let upper = token.trim().to_uppercase();
    MONTHS
        .iter()
        .position(|m| *m == upper)
        .map(|idx| idx as u32 + 1)
}
