/// Canonical form of a person's name for comparison.
///
/// Uppercases, drops every character that is neither a letter nor
/// whitespace, collapses whitespace runs and trims. Applying it twice gives
/// the same result as applying it once.
pub fn normalize_name(raw: &str) -> String {
    let kept: String = raw
        .to_uppercase()
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a roster name given as separate first and last names.
pub fn normalize_full_name(first_name: &str, last_name: &str) -> String {
    normalize_name(&format!("{} {}", first_name, last_name))
}
