//! Normalizes raw schedule records into [`CourseMeeting`]s.

use chrono::NaiveTime;
use tracing::debug;

use super::error::{ScheduleError, ScheduleResult};
use super::types::{CourseMeeting, Location, RawClass, RawSchedule};
use super::weekday::parse_weekdays;

/// Extracts every weekly meeting pattern from a raw record.
///
/// Patterns marked TBA or cancelled are skipped, so a record can yield no
/// meetings at all.
///
/// # Errors
/// * [`ScheduleError::Validation`] if a required field is absent
/// * [`ScheduleError::Parse`] if the weekday or time strings are malformed
pub fn extract_meetings(raw: &RawSchedule) -> ScheduleResult<Vec<CourseMeeting>> {
    let subject = required(raw.subject.as_deref(), "<unknown>", "subject")?;
    let catalog_number = required(raw.catalog_number.as_deref(), subject, "catalog_number")?;
    let course = format!("{} {}", subject, catalog_number);
    let section = required(raw.section.as_deref(), &course, "section")?;
    let class_number = raw
        .class_number
        .as_ref()
        .map(ToString::to_string)
        .ok_or_else(|| ScheduleError::missing(&course, "class_number"))?;

    let classes = raw
        .classes
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ScheduleError::missing(&course, "classes"))?;

    let mut meetings = Vec::with_capacity(classes.len());

    for (pattern_index, class) in classes.iter().enumerate() {
        let date = class
            .date
            .as_ref()
            .ok_or_else(|| ScheduleError::missing(&course, "date"))?;

        if date.is_tba || date.is_cancelled {
            debug!(
                course = %course,
                section = %section,
                pattern_index,
                "Skipping TBA/cancelled meeting pattern"
            );
            continue;
        }

        let weekday_codes = required(date.weekdays.as_deref(), &course, "date.weekdays")?;
        let start_time = required(date.start_time.as_deref(), &course, "date.start_time")?;
        let end_time = required(date.end_time.as_deref(), &course, "date.end_time")?;
        let location = extract_location(class, &course)?;

        let start_time = parse_clock_time(start_time)?;
        let end_time = parse_clock_time(end_time)?;
        if end_time <= start_time {
            return Err(ScheduleError::parse(format!(
                "{} ends ({}) before it starts ({})",
                course, end_time, start_time
            )));
        }

        let instructors = class.instructors.clone().unwrap_or_default();
        let instructors_display = instructors.iter().map(|i| display_instructor(i)).collect();

        meetings.push(CourseMeeting {
            subject: subject.to_string(),
            catalog_number: catalog_number.to_string(),
            section: section.to_string(),
            class_number: class_number.clone(),
            weekday_codes: weekday_codes.to_string(),
            weekdays: parse_weekdays(weekday_codes)?,
            start_time,
            end_time,
            location,
            instructors,
            instructors_display,
            pattern_index,
        });
    }

    Ok(meetings)
}

fn required<'a>(value: Option<&'a str>, course: &str, field: &str) -> ScheduleResult<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ScheduleError::missing(course, field))
}

fn extract_location(class: &RawClass, course: &str) -> ScheduleResult<Location> {
    let location = class
        .location
        .as_ref()
        .ok_or_else(|| ScheduleError::missing(course, "location"))?;

    Ok(Location {
        building: required(location.building.as_deref(), course, "location.building")?.to_string(),
        room: required(location.room.as_deref(), course, "location.room")?.to_string(),
    })
}

/// Parses a 24-hour `HH:MM` time as used by the schedule API.
pub fn parse_clock_time(raw: &str) -> ScheduleResult<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|e| ScheduleError::parse(format!("invalid time {:?}: {}", raw, e)))
}

/// Formats `"Last,First"` as `"F. Last"`.
///
/// Names without a comma are passed through trimmed.
pub fn display_instructor(raw: &str) -> String {
    match raw.split_once(',') {
        Some((last, first)) => {
            let last = last.trim();
            match first.trim().chars().next() {
                Some(initial) => format!("{}. {}", initial, last),
                None => last.to_string(),
            }
        }
        None => raw.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::fixtures::sample_raw;
    use crate::schedule::types::RawClassDate;
    use chrono::Weekday;

    #[test]
    fn test_extract_basic() {
        let meetings = extract_meetings(&sample_raw("LEC 001")).unwrap();
        assert_eq!(meetings.len(), 1);

        let m = &meetings[0];
        assert_eq!(m.course_code(), "CS 246");
        assert_eq!(m.section, "LEC 001");
        assert_eq!(m.class_number, "4856");
        assert_eq!(m.weekdays, vec![Weekday::Tue, Weekday::Thu]);
        assert_eq!(m.start_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(m.end_time, NaiveTime::from_hms_opt(11, 20, 0).unwrap());
        assert_eq!(m.location.to_string(), "MC 2065");
        assert_eq!(m.instructor(), "J. Smith");
    }

    #[test]
    fn test_missing_instructors_is_not_an_error() {
        let mut raw = sample_raw("LEC 001");
        raw.classes.as_mut().unwrap()[0].instructors = None;

        let meetings = extract_meetings(&raw).unwrap();
        assert!(meetings[0].instructors_display.is_empty());
        assert_eq!(meetings[0].instructor(), "");

        raw.classes.as_mut().unwrap()[0].instructors = Some(vec![]);
        assert_eq!(extract_meetings(&raw).unwrap()[0].instructor(), "");
    }

    #[test]
    fn test_missing_required_field() {
        let mut raw = sample_raw("LEC 001");
        raw.section = None;
        assert_eq!(
            extract_meetings(&raw),
            Err(ScheduleError::Validation {
                course: "CS 246".to_string(),
                field: "section".to_string(),
            })
        );

        let mut raw = sample_raw("LEC 001");
        raw.classes.as_mut().unwrap()[0].location = None;
        assert!(matches!(
            extract_meetings(&raw),
            Err(ScheduleError::Validation { field, .. }) if field == "location"
        ));

        let mut raw = sample_raw("LEC 001");
        raw.classes = Some(vec![]);
        assert!(matches!(
            extract_meetings(&raw),
            Err(ScheduleError::Validation { field, .. }) if field == "classes"
        ));
    }

    #[test]
    fn test_bad_time_is_parse_error() {
        let mut raw = sample_raw("LEC 001");
        raw.classes.as_mut().unwrap()[0]
            .date
            .as_mut()
            .unwrap()
            .start_time = Some("ten".to_string());
        assert!(matches!(
            extract_meetings(&raw),
            Err(ScheduleError::Parse { .. })
        ));
    }

    #[test]
    fn test_end_before_start_is_parse_error() {
        let mut raw = sample_raw("LEC 001");
        raw.classes.as_mut().unwrap()[0].date.as_mut().unwrap().end_time =
            Some("09:00".to_string());
        assert!(matches!(
            extract_meetings(&raw),
            Err(ScheduleError::Parse { .. })
        ));
    }

    #[test]
    fn test_tba_patterns_are_skipped() {
        let mut raw = sample_raw("TUT 101");
        let tba = RawClass {
            date: Some(RawClassDate {
                is_tba: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        raw.classes.as_mut().unwrap().insert(0, tba);

        let meetings = extract_meetings(&raw).unwrap();
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].pattern_index, 1);
    }

    #[test]
    fn test_display_instructor() {
        assert_eq!(display_instructor("Smith,John"), "J. Smith");
        assert_eq!(display_instructor("Van Dyke, Anna"), "A. Van Dyke");
        assert_eq!(display_instructor("Staff"), "Staff");
        assert_eq!(display_instructor("Lee,"), "Lee");
    }
}
