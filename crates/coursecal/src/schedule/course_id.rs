//! Parsing of user-supplied course identifiers.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::error::{ScheduleError, ScheduleResult};

static CLASS_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4,5}$").unwrap());
static COURSE_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{2,6})[\s\-_]?(\d{1,3}[A-Za-z]?)$").unwrap());

/// A course as a user may name it in a request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CourseId {
    /// A numeric class number (e.g., "4856"), which pins a single section
    ClassNumber(String),
    /// A subject and catalog number (e.g., "CS 246"), which covers every section
    Course { subject: String, catalog: String },
}

impl CourseId {
    /// Parses a single identifier such as `4856`, `CS246`, `cs-246` or `CS 246`.
    pub fn parse(raw: &str) -> ScheduleResult<Self> {
        let trimmed = raw.trim();

        if CLASS_NUMBER_REGEX.is_match(trimmed) {
            return Ok(CourseId::ClassNumber(trimmed.to_string()));
        }

        if let Some(caps) = COURSE_CODE_REGEX.captures(trimmed) {
            return Ok(CourseId::Course {
                subject: caps[1].to_uppercase(),
                catalog: caps[2].to_uppercase(),
            });
        }

        Err(ScheduleError::BadRequest {
            message: format!("{:?} is not a class number or course code", raw),
        })
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseId::ClassNumber(n) => write!(f, "{}", n),
            CourseId::Course { subject, catalog } => write!(f, "{}{}", subject, catalog),
        }
    }
}

/// Splits a `+`- or `,`-separated list of identifiers.
///
/// Empty entries are ignored; an entirely empty list is a bad request.
pub fn parse_course_list(raw: &str) -> ScheduleResult<Vec<CourseId>> {
    let ids = raw
        .split(['+', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(CourseId::parse)
        .collect::<ScheduleResult<Vec<_>>>()?;

    if ids.is_empty() {
        return Err(ScheduleError::BadRequest {
            message: "no courses requested".to_string(),
        });
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(subject: &str, catalog: &str) -> CourseId {
        CourseId::Course {
            subject: subject.to_string(),
            catalog: catalog.to_string(),
        }
    }

    #[test]
    fn test_class_number() {
        assert_eq!(
            CourseId::parse("4856").unwrap(),
            CourseId::ClassNumber("4856".to_string())
        );
    }

    #[test]
    fn test_course_codes() {
        assert_eq!(CourseId::parse("CS246").unwrap(), course("CS", "246"));
        assert_eq!(CourseId::parse("cs-246").unwrap(), course("CS", "246"));
        assert_eq!(CourseId::parse("MATH 135").unwrap(), course("MATH", "135"));
        assert_eq!(CourseId::parse("ECE 106e").unwrap(), course("ECE", "106E"));
    }

    #[test]
    fn test_garbage_is_bad_request() {
        assert!(matches!(
            CourseId::parse("../etc/passwd"),
            Err(ScheduleError::BadRequest { .. })
        ));
        assert!(matches!(
            CourseId::parse("12"),
            Err(ScheduleError::BadRequest { .. })
        ));
    }

    #[test]
    fn test_course_list() {
        let ids = parse_course_list("4856+CS246,,MATH135+").unwrap();
        assert_eq!(
            ids,
            vec![
                CourseId::ClassNumber("4856".to_string()),
                course("CS", "246"),
                course("MATH", "135"),
            ]
        );
    }

    #[test]
    fn test_empty_course_list() {
        assert!(matches!(
            parse_course_list(" + "),
            Err(ScheduleError::BadRequest { .. })
        ));
    }
}
