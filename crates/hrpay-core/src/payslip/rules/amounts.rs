//! Monetary amount parsing and formatting.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount written with `,` thousands separators (e.g. "12,500.00").
///
/// A trailing period (as in "12,500.") is tolerated. Returns `None` for
/// anything that is not a plain decimal once separators are removed.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim_end_matches('.');

    if cleaned.is_empty() || !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    Decimal::from_str(cleaned).ok()
}

/// Format an amount with thousands separators and two decimals (24,000.00).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2));
    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };

    let Some((integer_part, decimal_part)) = unsigned.split_once('.') else {
        return s;
    };

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{}{}.{}", sign, formatted, decimal_part)
}
