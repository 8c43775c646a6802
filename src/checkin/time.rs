use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::checkin::error::CheckInError;

/// Wall-clock format used both for parsing input and for storage,
/// e.g. `03/14/2024 02:30 PM`.
pub const CANONICAL_FORMAT: &str = "%m/%d/%Y %I:%M %p";

/// A check-in time after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTime {
    /// Re-formatted value, stored as `encoded_time`.
    pub canonical: String,
    /// Calendar day the cooldown rule is scoped to.
    pub day_key: NaiveDate,
    pub at: NaiveDateTime,
}

/// Parse a raw `MM/DD/YYYY hh:mm AM|PM` string and re-emit it canonically.
///
/// No timezone is applied; the wall-clock value is kept as submitted.
pub fn normalize(raw: &str) -> Result<NormalizedTime, CheckInError> {
    let at = parse(raw).ok_or_else(|| CheckInError::InvalidTimeFormat {
        raw: raw.to_string(),
    })?;

    Ok(NormalizedTime {
        canonical: at.format(CANONICAL_FORMAT).to_string(),
        day_key: at.date(),
        at,
    })
}

/// chrono's `%Y` takes any number of digits and an optional sign, so the year
/// field is checked to be exactly four unsigned digits before parsing.
pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if !has_four_digit_year(raw) {
        return None;
    }

    let at = NaiveDateTime::parse_from_str(raw, CANONICAL_FORMAT).ok()?;
    (1000..=9999).contains(&at.year()).then_some(at)
}

fn has_four_digit_year(raw: &str) -> bool {
    raw.split_whitespace()
        .next()
        .and_then(|date| date.rsplit('/').next())
        .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()))
}
