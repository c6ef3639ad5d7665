//! Expands meeting patterns into weekly recurring calendar events.
//!
//! Each weekday a section meets on becomes its own event series: the first
//! event lands on the first matching date on or after the term start (a
//! term that starts on that weekday counts), and repeats weekly through the
//! last day of the term inclusive.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use rrule::RRuleSet;
use std::collections::HashSet;
use tracing::warn;

use super::error::{ScheduleError, ScheduleResult};
use super::types::CourseMeeting;
use super::weekday::day_ordinal;
use crate::config::Term;

/// Upper bound on expanded occurrences; a year of weekly meetings.
const MAX_OCCURRENCES: u16 = 53;

/// Suffix that keeps generated UIDs globally unique.
const UID_DOMAIN: &str = "coursecal";

/// One weekly series for a single (meeting, weekday) pair
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub weekday: Weekday,
    /// Local start of the first occurrence
    pub start: NaiveDateTime,
    /// Local end of the first occurrence
    pub end: NaiveDateTime,
    pub timezone: Tz,
    /// Last instant (UTC) a series may start at
    pub until: DateTime<Utc>,
}

impl CalendarEvent {
    /// The RRULE value for this series
    pub fn rrule(&self) -> String {
        format!("FREQ=WEEKLY;UNTIL={}", self.until.format("%Y%m%dT%H%M%SZ"))
    }

    /// Expands the series into the local start time of every occurrence.
    pub fn occurrences(&self) -> ScheduleResult<Vec<NaiveDateTime>> {
        let text = format!(
            "DTSTART;TZID={}:{}\nRRULE:{}",
            self.timezone.name(),
            self.start.format("%Y%m%dT%H%M%S"),
            self.rrule()
        );

        let set: RRuleSet = text.parse().map_err(|e| {
            ScheduleError::parse(format!("invalid recurrence for {}: {}", self.uid, e))
        })?;

        Ok(set
            .all(MAX_OCCURRENCES)
            .dates
            .iter()
            .map(|dt| dt.naive_local())
            .collect())
    }
}

/// First date on or after `from` that falls on `day`.
///
/// If `from` is already that weekday, `from` itself is returned.
pub fn first_occurrence(from: NaiveDate, day: Weekday) -> NaiveDate {
    let days_ahead = (7 + day_ordinal(day) - day_ordinal(from.weekday())) % 7;
    from + Days::new(u64::from(days_ahead))
}

/// The UTC instant at the very end of the term's last day, in `tz`.
pub fn term_until(term: &Term, tz: Tz) -> DateTime<Utc> {
    let last_second = term.end.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default());
    tz.from_local_datetime(&last_second)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&last_second))
}

/// Turns one meeting pattern into one event per weekday, in weekday-code order.
///
/// A weekday whose first occurrence falls after the term end produces no event.
pub fn expand_meeting(meeting: &CourseMeeting, term: &Term, tz: Tz) -> Vec<CalendarEvent> {
    let until = term_until(term, tz);
    let summary = build_summary(meeting);
    let description = build_description(meeting);
    let location = meeting.location.to_string();

    meeting
        .weekdays
        .iter()
        .filter_map(|&weekday| {
            let first = first_occurrence(term.start, weekday);
            if first > term.end {
                warn!(
                    course = %meeting.course_code(),
                    section = %meeting.section,
                    term = %term.id,
                    weekday = %weekday,
                    "Meeting day never occurs within the term"
                );
                return None;
            }

            Some(CalendarEvent {
                uid: build_uid(meeting, term, weekday),
                summary: summary.clone(),
                description: description.clone(),
                location: location.clone(),
                weekday,
                start: first.and_time(meeting.start_time),
                end: first.and_time(meeting.end_time),
                timezone: tz,
                until,
            })
        })
        .collect()
}

/// Expands every meeting, keeping input order.
///
/// A UID seen earlier in the batch (a repeated weekday code such as `MM`)
/// is dropped, so every event in the result has a distinct UID.
pub fn expand_meetings(meetings: &[CourseMeeting], term: &Term, tz: Tz) -> Vec<CalendarEvent> {
    let mut seen = HashSet::new();
    meetings
        .iter()
        .flat_map(|m| expand_meeting(m, term, tz))
        .filter(|event| seen.insert(event.uid.clone()))
        .collect()
}

/// e.g. "CS 246 J. Smith LEC 001"
fn build_summary(meeting: &CourseMeeting) -> String {
    [
        meeting.subject.as_str(),
        meeting.catalog_number.as_str(),
        meeting.instructor(),
        meeting.section.as_str(),
    ]
    .iter()
    .filter(|part| !part.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(" ")
}

fn build_description(meeting: &CourseMeeting) -> String {
    let instructors = if meeting.instructors_display.is_empty() {
        "TBA".to_string()
    } else {
        meeting.instructors_display.join(", ")
    };

    format!(
        "Instructors: {}\nClass number: {}",
        instructors, meeting.class_number
    )
}

fn build_uid(meeting: &CourseMeeting, term: &Term, weekday: Weekday) -> String {
    let mut uid = format!(
        "{}-{}-{}-{}-day{}",
        term.id,
        meeting.subject,
        meeting.catalog_number,
        meeting.section,
        day_ordinal(weekday)
    );
    if meeting.pattern_index > 0 {
        uid.push_str(&format!("-p{}", meeting.pattern_index));
    }

    format!("{}@{}", uid.replace(' ', "-"), UID_DOMAIN)
}
