use chrono::{Datelike, Local};

/// Current calendar year as the 4-digit archive partition string.
pub fn current_year() -> String {
    format!("{:04}", Local::now().year())
}

/// Parse an archive year for backward-walk arithmetic.
/// Only 4-digit numeric strings are accepted.
pub fn parse_year(year: &str) -> Option<i32> {
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}
