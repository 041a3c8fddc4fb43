use rust_decimal::Decimal;
use std::str::FromStr;

use crate::parsing::patterns::PLAIN_DECIMAL;

/// Parse a space-grouped Hungarian amount ("1 234,56") into a Decimal.
///
/// Thin and non-breaking spaces count as grouping too.
pub fn parse_spaced_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{00a0}' | '\u{202f}'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    Decimal::from_str(&cleaned).ok()
}

/// Parse a dot-grouped Hungarian amount ("1.234,56") into a Decimal.
///
/// Returns None unless the cleaned string is a plain decimal number.
pub fn parse_dotted_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.replace('.', "").replace(',', ".");
    let cleaned = cleaned.trim();
    if !PLAIN_DECIMAL.is_match(cleaned) {
        return None;
    }
    Decimal::from_str(cleaned).ok()
}

/// Strip spaces and hyphens from a license plate ("ABC-123" -> "ABC123").
pub fn normalize_plate(raw: &str) -> String {
    raw.chars().filter(|c| *c != ' ' && *c != '-').collect()
}
