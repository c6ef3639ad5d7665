/// Course schedule lookup and expansion into calendar events
pub mod client;
pub mod course_id;
pub mod error;
pub mod expand;
pub mod extract;
pub mod types;
pub mod weekday;

pub use client::ScheduleClient;
pub use course_id::{parse_course_list, CourseId};
pub use error::{ScheduleError, ScheduleResult};
pub use expand::CalendarEvent;
pub use types::*;

use chrono_tz::Tz;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::Term;

/// Turns raw schedule records into calendar events for a term.
///
/// # Returns
/// * `Ok(Vec<CalendarEvent>)` - One event series per (meeting, weekday), in record order;
///   a section that appears more than once is expanded only once
/// * `Err` - The first extraction failure; no partial result is returned
pub fn events_from_records(
    records: &[RawSchedule],
    term: &Term,
    tz: Tz,
) -> ScheduleResult<Vec<CalendarEvent>> {
    let mut sections = HashSet::new();
    let mut meetings = Vec::new();
    for record in records {
        // The same section can arrive twice, e.g. as `4856+CS246`
        let key = (&record.subject, &record.catalog_number, &record.section);
        if !sections.insert(key) {
            debug!(
                subject = ?record.subject,
                catalog_number = ?record.catalog_number,
                section = ?record.section,
                "Skipping duplicate section"
            );
            continue;
        }
        meetings.extend(extract::extract_meetings(record)?);
    }

    let events = expand::expand_meetings(&meetings, term, tz);
    info!(
        term = %term.id,
        meetings = meetings.len(),
        events = events.len(),
        "Expanded course meetings"
    );

    Ok(events)
}

/// Fetches and expands schedules in one step
///
/// Convenience function that combines fetch, extract and expand.
pub async fn get_term_events(
    client: &ScheduleClient,
    term: &Term,
    courses: &[CourseId],
    tz: Tz,
) -> ScheduleResult<Vec<CalendarEvent>> {
    let records = client.fetch_all(courses, &term.id).await?;
    events_from_records(&records, term, tz)
}


#[cfg(test)]
mod tests {
    use super::fixtures::{sample_raw, winter_2015};
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sections_produce_one_series_per_weekday() {
        let records = vec![sample_raw("LEC 001"), sample_raw("LEC 002")];
        let events =
            events_from_records(&records, &winter_2015(), chrono_tz::America::Toronto).unwrap();

        // Two sections x (Tue, Thu)
        assert_eq!(events.len(), 4);
        let uids: HashSet<_> = events.iter().map(|e| e.uid.clone()).collect();
        assert_eq!(uids.len(), 4);

        let keys: HashSet<_> = events
            .iter()
            .map(|e| (e.summary.clone(), e.weekday))
            .collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_one_bad_record_fails_everything() {
        let mut bad = sample_raw("LEC 002");
        bad.catalog_number = None;
        let records = vec![sample_raw("LEC 001"), bad];

        assert!(matches!(
            events_from_records(&records, &winter_2015(), chrono_tz::America::Toronto),
            Err(ScheduleError::Validation { .. })
        ));
    }

    #[test]
    fn test_repeated_section_is_expanded_once() {
        let records = vec![sample_raw("LEC 001"), sample_raw("LEC 002"), sample_raw("LEC 001")];
        let events =
            events_from_records(&records, &winter_2015(), chrono_tz::America::Toronto).unwrap();

        let uids: Vec<_> = events.iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(
            uids,
            vec![
                "1151-CS-246-LEC-001-day1@coursecal",
                "1151-CS-246-LEC-001-day3@coursecal",
                "1151-CS-246-LEC-002-day1@coursecal",
                "1151-CS-246-LEC-002-day3@coursecal",
            ]
        );
    }
}
