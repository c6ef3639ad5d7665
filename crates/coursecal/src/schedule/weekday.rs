//! Weekday code tokenizer.
//!
//! The schedule API encodes meeting days as concatenated codes, e.g. `MWF`
//! or `TTh`. Two-letter codes share their first letter with a one-letter
//! code, so tokenizing is a longest-match scan over a fixed table.

use chrono::Weekday;

use super::error::{ScheduleError, ScheduleResult};

/// Known weekday codes. Multi-letter codes come first so they win over
/// their one-letter prefixes.
const WEEKDAY_TOKENS: &[(&str, Weekday)] = &[
    ("Th", Weekday::Thu),
    ("Su", Weekday::Sun),
    ("M", Weekday::Mon),
    ("T", Weekday::Tue),
    ("W", Weekday::Wed),
    ("F", Weekday::Fri),
    ("S", Weekday::Sat),
];

/// Splits a raw weekday string into weekdays, in input order.
///
/// # Errors
/// Returns [`ScheduleError::Parse`] if the string is empty or contains
/// anything that isn't a known weekday code.
pub fn parse_weekdays(raw: &str) -> ScheduleResult<Vec<Weekday>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScheduleError::parse("empty weekday string"));
    }

    let mut days = Vec::new();
    let mut rest = trimmed;

    while !rest.is_empty() {
        let (token, day) = WEEKDAY_TOKENS
            .iter()
            .find(|(token, _)| rest.starts_with(token))
            .ok_or_else(|| {
                let offset = trimmed.len() - rest.len();
                ScheduleError::parse(format!(
                    "unknown weekday code at position {} in {:?}",
                    offset, raw
                ))
            })?;

        days.push(*day);
        rest = &rest[token.len()..];
    }

    Ok(days)
}

/// Short code used when building event identifiers (Monday = 0).
pub fn day_ordinal(day: Weekday) -> u32 {
    day.num_days_from_monday()
}
