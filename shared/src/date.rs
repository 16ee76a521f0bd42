use chrono::NaiveDate;
use thiserror::Error;

/// Format used for the external (host facing) representation of a date.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Long, human readable form shown in the picker field, e.g. "January 5, 2024".
pub const LONG_DATE_FORMAT: &str = "%B %-d, %Y";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("Date string is empty")]
    Empty,
    #[error("Invalid date '{input}': {reason}")]
    Malformed { input: String, reason: String },
}

/// Parse an ISO date (`YYYY-MM-DD`).
///
/// Full RFC 3339 timestamps are accepted as well; only the calendar date in
/// front of the `T` separator is kept, no timezone conversion is applied.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateParseError::Empty);
    }

    let date_part = trimmed.split('T').next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, ISO_DATE_FORMAT).map_err(|e| DateParseError::Malformed {
        input: trimmed.to_string(),
        reason: e.to_string(),
    })
}

/// Resolve the optional initial value of a picker.
///
/// Absent or unparsable input means "nothing selected"; the failure is logged
/// and never reaches the caller.
pub fn parse_initial_date(input: Option<&str>) -> Option<NaiveDate> {
    let input = input?;
    match parse_date(input) {
        Ok(date) => Some(date),
        Err(DateParseError::Empty) => None,
        Err(e) => {
            log::debug!("Ignoring initial picker value: {}", e);
            None
        }
    }
}

pub fn format_long(date: NaiveDate) -> String {
    date.format(LONG_DATE_FORMAT).to_string()
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}
