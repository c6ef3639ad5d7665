//! Error types for the schedule pipeline.

use thiserror::Error;

/// Errors that can occur while turning a schedule request into a calendar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A weekday code or time string could not be parsed
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// A fetched record is missing a required field
    #[error("Missing required field `{field}` in record for {course}")]
    Validation { course: String, field: String },

    /// Network/HTTP request to the schedule API failed
    #[error("Fetch error: {message}")]
    Fetch { message: String },

    /// The schedule API has no data for this course
    #[error("No schedule found for course {course} in term {term}")]
    NotFound { course: String, term: String },

    /// The requested term is not in the term table
    #[error("Unknown term: {term}")]
    UnknownTerm { term: String },

    /// The request itself is malformed (e.g. no courses given)
    #[error("Bad request: {message}")]
    BadRequest { message: String },
}

impl ScheduleError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        ScheduleError::Parse {
            message: message.into(),
        }
    }

    pub(crate) fn missing(course: impl Into<String>, field: impl Into<String>) -> Self {
        ScheduleError::Validation {
            course: course.into(),
            field: field.into(),
        }
    }
}

/// The request URL carries the API key, so it is stripped from the message.
impl From<reqwest::Error> for ScheduleError {
    fn from(err: reqwest::Error) -> Self {
        ScheduleError::Fetch {
            message: err.without_url().to_string(),
        }
    }
}

impl From<url::ParseError> for ScheduleError {
    fn from(err: url::ParseError) -> Self {
        ScheduleError::Fetch {
            message: format!("Invalid API URL: {}", err),
        }
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transport_error_hides_url() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1/v2/courses/4856/schedule.json?key=hunter2&term=1151")
            .send()
            .await
            .unwrap_err();

        let ScheduleError::Fetch { message } = ScheduleError::from(err) else {
            panic!("expected a fetch error");
        };
        assert!(!message.contains("hunter2"));
    }
}
