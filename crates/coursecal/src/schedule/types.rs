/// Types for course schedule data
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Envelope every schedule API response is wrapped in
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub meta: ApiMeta,

    /// Usually a list of schedule records, but an empty object or `null`
    /// when the API has nothing for the request
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMeta {
    pub status: u16,

    #[serde(default)]
    pub message: Option<String>,
}

/// The API is inconsistent about whether some identifiers are numbers or strings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StringOrNumber {
    Number(u64),
    Text(String),
}

impl fmt::Display for StringOrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringOrNumber::Number(n) => write!(f, "{}", n),
            StringOrNumber::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Raw schedule record for one course section, as returned by the API.
///
/// Everything is optional here; the extractor decides what is required.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSchedule {
    pub subject: Option<String>,
    pub catalog_number: Option<String>,
    pub section: Option<String>,
    pub class_number: Option<StringOrNumber>,
    pub title: Option<String>,
    pub term: Option<StringOrNumber>,

    /// Meeting patterns for this section
    pub classes: Option<Vec<RawClass>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawClass {
    pub date: Option<RawClassDate>,
    pub location: Option<RawLocation>,

    /// Names formatted as `"Last,First"`
    pub instructors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawClassDate {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub weekdays: Option<String>,

    #[serde(default)]
    pub is_tba: bool,

    #[serde(default)]
    pub is_cancelled: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawLocation {
    pub building: Option<String>,
    pub room: Option<String>,
}

/// Where a section meets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub building: String,
    pub room: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.building, self.room)
    }
}

/// One weekly meeting pattern of a course section, normalized from a
/// [`RawSchedule`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseMeeting {
    pub subject: String,           // e.g., "CS"
    pub catalog_number: String,    // e.g., "246"
    pub section: String,           // e.g., "LEC 001"
    pub class_number: String,      // e.g., "4856"
    pub weekday_codes: String,     // e.g., "TTh"
    pub weekdays: Vec<Weekday>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: Location,
    pub instructors: Vec<String>,         // raw, "Last,First"
    pub instructors_display: Vec<String>, // "F. Last"
    /// Position of this pattern in the section's list of patterns
    pub pattern_index: usize,
}

impl CourseMeeting {
    /// The instructor shown in event titles, or an empty string if there is none
    pub fn instructor(&self) -> &str {
        self.instructors_display
            .first()
            .map(String::as_str)
            .unwrap_or("")
    }

    /// e.g. "CS 246"
    pub fn course_code(&self) -> String {
        format!("{} {}", self.subject, self.catalog_number)
    }
}
