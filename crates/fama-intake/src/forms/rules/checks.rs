use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

fn phone_pattern() -> &'static Regex {
    static PHONE_RE: OnceLock<Regex> = OnceLock::new();
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^\(\d{2}\)\s\d{4,5}-\d{4}$").expect("phone regex compiles")
    })
}

/// `(DD) DDDDD-DDDD` or `(DD) DDDD-DDDD`.
pub fn is_phone(value: &str) -> bool {
    phone_pattern().is_match(value)
}

/// Re-masks a Brazilian phone number typed with or without punctuation.
///
/// Only digits, spaces, and `()-+` count as phone input. Ten or eleven digits (after dropping a
/// leading `55` country code) are formatted; anything else is returned trimmed so the pattern
/// check reports it.
pub fn format_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.chars().all(is_phone_char) {
        return trimmed.to_string();
    }
    let mut digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if matches!(digits.len(), 12 | 13) && digits.starts_with("55") {
        digits.drain(..2);
    }

    match digits.len() {
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => trimmed.to_string(),
    }
}

fn is_phone_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ' ' | '(' | ')' | '-' | '+')
}

/// Digits only, as expected by the messaging gateway.
pub fn phone_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Accepts the HTML date input format or a full RFC 3339 timestamp.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}

/// Whole years elapsed, counting the birthday only once the month and day are reached.
/// `None` when the birth date is after `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    today.years_since(birth)
}
