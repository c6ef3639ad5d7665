//! ICS file generation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, EventLike, Property, ValueType};

use super::name::DocumentName;
use super::timezone::{insert_into_calendar, vtimezone};
use crate::config::Term;
use crate::schedule::CalendarEvent;

/// Generate a complete .ics document holding every event series
pub fn generate_ics(
    name: &DocumentName,
    term: &Term,
    tz: Tz,
    events: &[CalendarEvent],
    generated_at: DateTime<Utc>,
) -> String {
    let mut cal = Calendar::new();
    cal.name(&name.title);
    cal.timezone(tz.name());

    // Term bounds, for tools that want to know what the file covers
    cal.append_property(date_property("X-COURSECAL-TERM-START", term.start));
    cal.append_property(date_property("X-COURSECAL-TERM-END", term.end));

    let dtstamp = generated_at.format("%Y%m%dT%H%M%SZ").to_string();

    for event in events {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&event.uid);
        ics_event.add_property("DTSTAMP", &dtstamp);
        ics_event.summary(&event.summary);
        ics_event.description(&event.description);
        ics_event.location(&event.location);

        add_zoned_datetime(&mut ics_event, "DTSTART", &event.start, event.timezone);
        add_zoned_datetime(&mut ics_event, "DTEND", &event.end, event.timezone);
        ics_event.add_property("RRULE", event.rrule());

        cal.push(ics_event.done());
    }

    let document = cal.done().to_string();
    insert_into_calendar(document, &vtimezone(tz, term.start, term.end))
}

fn date_property(name: &str, date: NaiveDate) -> Property {
    let mut prop = Property::new(name, date.format("%Y%m%d").to_string());
    prop.append_parameter(ValueType::Date);
    prop
}

/// Local wall-clock time with a TZID parameter, so recurrences keep their
/// local time across daylight saving changes
fn add_zoned_datetime(ics_event: &mut icalendar::Event, name: &str, time: &NaiveDateTime, tz: Tz) {
    let mut prop = Property::new(name, time.format("%Y%m%dT%H%M%S").to_string());
    prop.add_parameter("TZID", tz.name());
    ics_event.append_property(prop);
}
