//! VTIMEZONE blocks built from the IANA database bundled with `chrono-tz`.
//!
//! `icalendar` cannot write a VTIMEZONE (every component it renders gets a
//! DTSTAMP and UID), so the block is rendered here as text.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone};
use chrono_tz::{OffsetComponents, Tz};
use std::fmt::{self, Write};

/// How far before the first date to look for the rule already in force
const LOOKBACK_DAYS: i64 = 366;

/// Onset used for a zone with no transition in the window
const FIXED_ONSET: &str = "19700101T000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservanceKind {
    Standard,
    Daylight,
}

impl ObservanceKind {
    fn component(self) -> &'static str {
        match self {
            ObservanceKind::Standard => "STANDARD",
            ObservanceKind::Daylight => "DAYLIGHT",
        }
    }
}

/// One STANDARD or DAYLIGHT sub-component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observance {
    pub kind: ObservanceKind,
    /// Local onset, in the offset being left
    pub onset: NaiveDateTime,
    /// Seconds east of UTC before the onset
    pub offset_from: i32,
    /// Seconds east of UTC from the onset on
    pub offset_to: i32,
    pub name: String,
}

fn offset_seconds(tz: Tz, utc: &NaiveDateTime) -> i32 {
    tz.offset_from_utc_datetime(utc).fix().local_minus_utc()
}

fn observance_at(tz: Tz, utc: NaiveDateTime, offset_from: i32) -> Observance {
    let offset = tz.offset_from_utc_datetime(&utc);
    let kind = if offset.dst_offset() == Duration::zero() {
        ObservanceKind::Standard
    } else {
        ObservanceKind::Daylight
    };

    Observance {
        kind,
        onset: utc + Duration::seconds(i64::from(offset_from)),
        offset_from,
        offset_to: offset.fix().local_minus_utc(),
        name: offset.to_string(),
    }
}

/// Narrows an offset change between `before` and `after` down to the minute.
fn find_transition(tz: Tz, mut before: NaiveDateTime, mut after: NaiveDateTime) -> NaiveDateTime {
    let old = offset_seconds(tz, &before);
    while (after - before) > Duration::minutes(1) {
        let mid = before + Duration::minutes((after - before).num_minutes() / 2);
        if offset_seconds(tz, &mid) == old {
            before = mid;
        } else {
            after = mid;
        }
    }
    after
}

/// The observances needed to resolve local times between `from` and `to`.
///
/// The first entry is the rule in force on `from`; the rest are the
/// transitions up to the end of `to`.
pub fn observances(tz: Tz, from: NaiveDate, to: NaiveDate) -> Vec<Observance> {
    let window_start = from.and_time(NaiveTime::MIN);
    let scan_end = (to + Duration::days(1)).and_time(NaiveTime::MIN);

    let mut before = Vec::new();
    let mut within = Vec::new();

    let mut cursor = window_start - Duration::days(LOOKBACK_DAYS);
    let mut current = offset_seconds(tz, &cursor);
    while cursor < scan_end {
        let next = cursor + Duration::days(1);
        let offset = offset_seconds(tz, &next);
        if offset != current {
            let at = find_transition(tz, cursor, next);
            let observance = observance_at(tz, at, current);
            if at <= window_start {
                before.push(observance);
            } else {
                within.push(observance);
            }
            current = offset;
        }
        cursor = next;
    }

    let in_force = before.pop().unwrap_or_else(|| {
        let mut fixed = observance_at(tz, window_start, offset_seconds(tz, &window_start));
        fixed.onset = NaiveDateTime::parse_from_str(FIXED_ONSET, "%Y%m%dT%H%M%S")
            .unwrap_or(fixed.onset);
        fixed
    });

    std::iter::once(in_force).chain(within).collect()
}

/// e.g. `-0500`, or `+053000` when seconds are present
fn format_offset(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let total = seconds.abs();
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if secs == 0 {
        format!("{sign}{hours:02}{minutes:02}")
    } else {
        format!("{sign}{hours:02}{minutes:02}{secs:02}")
    }
}

fn write_vtimezone(out: &mut String, tz: Tz, from: NaiveDate, to: NaiveDate) -> fmt::Result {
    write!(out, "BEGIN:VTIMEZONE\r\n")?;
    write!(out, "TZID:{}\r\n", tz.name())?;
    for observance in observances(tz, from, to) {
        let component = observance.kind.component();
        write!(out, "BEGIN:{}\r\n", component)?;
        write!(out, "DTSTART:{}\r\n", observance.onset.format("%Y%m%dT%H%M%S"))?;
        write!(out, "TZOFFSETFROM:{}\r\n", format_offset(observance.offset_from))?;
        write!(out, "TZOFFSETTO:{}\r\n", format_offset(observance.offset_to))?;
        write!(out, "TZNAME:{}\r\n", observance.name)?;
        write!(out, "END:{}\r\n", component)?;
    }
    write!(out, "END:VTIMEZONE\r\n")
}

/// Renders a VTIMEZONE covering `from..=to`, with CRLF line endings.
pub fn vtimezone(tz: Tz, from: NaiveDate, to: NaiveDate) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_vtimezone(&mut out, tz, from, to);
    out
}

/// Places `block` after the calendar properties, ahead of the first event.
pub(crate) fn insert_into_calendar(document: String, block: &str) -> String {
    let at = document
        .find("\r\nBEGIN:VEVENT\r\n")
        .or_else(|| document.rfind("\r\nEND:VCALENDAR"))
        .map(|i| i + 2);

    match at {
        Some(at) => {
            let mut out = String::with_capacity(document.len() + block.len());
            out.push_str(&document[..at]);
            out.push_str(block);
            out.push_str(&document[at..]);
            out
        }
        None => document,
    }
}
