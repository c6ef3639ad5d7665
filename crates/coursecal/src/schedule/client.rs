//! HTTP client for the course schedule API.
//!
//! Two lookups are supported:
//! 1. `/courses/{class_number}/schedule.json?term=...` for a single class number
//! 2. `/terms/{term}/{subject}/{catalog}/schedule.json` for every section of a course
//!
//! Both answer with a `{ "meta": ..., "data": [...] }` envelope.

use futures::future::try_join_all;
use rand::Rng;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

use super::course_id::CourseId;
use super::error::{ScheduleError, ScheduleResult};
use super::types::{ApiResponse, RawSchedule};

/// Configuration for the schedule client.
#[derive(Debug, Clone)]
pub struct ScheduleClientConfig {
    /// Base URL of the API, without a trailing slash
    pub base_url: String,
    /// API credential sent as the `key` query parameter
    pub api_key: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ScheduleClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Client for looking up course schedules.
pub struct ScheduleClient {
    client: Client,
    config: ScheduleClientConfig,
}

impl ScheduleClient {
    /// Creates a client with default timeouts.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ScheduleError> {
        Self::with_config(ScheduleClientConfig::new(base_url, api_key))
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: ScheduleClientConfig) -> Result<Self, ScheduleError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScheduleError::Fetch {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    /// Fetches the schedules of every requested course, concurrently.
    ///
    /// Records come back in request order. Any single failure fails the
    /// whole batch.
    pub async fn fetch_all(
        &self,
        courses: &[CourseId],
        term: &str,
    ) -> ScheduleResult<Vec<RawSchedule>> {
        let batch_id = new_batch_id();
        let start = Instant::now();

        info!(
            batch_id = %batch_id,
            term = %term,
            courses = courses.len(),
            "Fetching course schedules"
        );

        let result = try_join_all(
            courses
                .iter()
                .map(|course| self.fetch_schedule(course, term, &batch_id)),
        )
        .await;

        match result {
            Ok(batches) => {
                let records: Vec<RawSchedule> = batches.into_iter().flatten().collect();
                info!(
                    batch_id = %batch_id,
                    records = records.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Fetched course schedules"
                );
                Ok(records)
            }
            Err(e) => {
                error!(
                    batch_id = %batch_id,
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Course schedule fetch failed"
                );
                Err(e)
            }
        }
    }

    /// Fetches the raw schedule records for one course.
    pub async fn fetch_schedule(
        &self,
        course: &CourseId,
        term: &str,
        batch_id: &str,
    ) -> ScheduleResult<Vec<RawSchedule>> {
        let url = self.schedule_url(course, term)?;
        debug!(
            batch_id = %batch_id,
            course = %course,
            path = %url.path(),
            "Requesting schedule"
        );

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(not_found(course, term));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                batch_id = %batch_id,
                course = %course,
                status = %status,
                "Schedule API returned an error status"
            );
            return Err(ScheduleError::Fetch {
                message: format!("schedule API returned {} for {}: {}", status, course, body),
            });
        }

        let envelope: ApiResponse = response.json().await.map_err(|e| ScheduleError::Fetch {
            message: format!("malformed schedule payload for {}: {}", course, e.without_url()),
        })?;

        decode_envelope(envelope, course, term)
    }

    /// Builds the lookup URL for a course, including the API key.
    fn schedule_url(&self, course: &CourseId, term: &str) -> ScheduleResult<Url> {
        let mut url = Url::parse(&self.config.base_url)?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| ScheduleError::Fetch {
                message: format!("{} cannot be used as a base URL", self.config.base_url),
            })?;
            segments.pop_if_empty();

            match course {
                CourseId::ClassNumber(number) => {
                    segments.extend(["courses", number.as_str(), "schedule.json"]);
                }
                CourseId::Course { subject, catalog } => {
                    segments.extend([
                        "terms",
                        term,
                        subject.as_str(),
                        catalog.as_str(),
                        "schedule.json",
                    ]);
                }
            }
        }

        url.query_pairs_mut().append_pair("key", &self.config.api_key);
        if matches!(course, CourseId::ClassNumber(_)) {
            url.query_pairs_mut().append_pair("term", term);
        }

        Ok(url)
    }
}

/// Unwraps the API envelope into schedule records.
fn decode_envelope(
    envelope: ApiResponse,
    course: &CourseId,
    term: &str,
) -> ScheduleResult<Vec<RawSchedule>> {
    match envelope.meta.status {
        200..=203 => {}
        204 | 404 => return Err(not_found(course, term)),
        status => {
            return Err(ScheduleError::Fetch {
                message: format!(
                    "schedule API reported status {} for {}: {}",
                    status,
                    course,
                    envelope.meta.message.unwrap_or_default()
                ),
            })
        }
    }

    let is_empty = match &envelope.data {
        serde_json::Value::Null => true,
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::Object(fields) => fields.is_empty(),
        _ => false,
    };
    if is_empty {
        return Err(not_found(course, term));
    }

    serde_json::from_value(envelope.data).map_err(|e| ScheduleError::Fetch {
        message: format!("malformed schedule payload for {}: {}", course, e),
    })
}

fn not_found(course: &CourseId, term: &str) -> ScheduleError {
    ScheduleError::NotFound {
        course: course.to_string(),
        term: term.to_string(),
    }
}

/// Short random tag shared by the log lines of one `fetch_all` call.
fn new_batch_id() -> String {
    let mut rng = rand::thread_rng();
    format!("fetch-{:04x}{:06x}", rng.gen::<u16>(), rng.gen_range(0..0x100_0000u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::fixtures::schedule_json;
    use mockito::{Matcher, Server};

    #[test]
    fn test_class_number_url() {
        let client = ScheduleClient::new("https://api.uwaterloo.ca/v2", "secret").unwrap();
        let url = client
            .schedule_url(&CourseId::ClassNumber("4856".to_string()), "1151")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.uwaterloo.ca/v2/courses/4856/schedule.json?key=secret&term=1151"
        );
    }

    #[test]
    fn test_course_code_url() {
        let client = ScheduleClient::new("https://api.uwaterloo.ca/v2/", "secret").unwrap();
        let course = CourseId::Course {
            subject: "CS".to_string(),
            catalog: "246".to_string(),
        };
        let url = client.schedule_url(&course, "1151").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.uwaterloo.ca/v2/terms/1151/CS/246/schedule.json?key=secret"
        );
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_request_order() {
        let mut server = Server::new_async().await;

        let first = server
            .mock("GET", "/courses/4856/schedule.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "k".into()),
                Matcher::UrlEncoded("term".into(), "1151".into()),
            ]))
            .with_status(200)
            .with_body(schedule_json("CS", "246", &["LEC 001"]))
            .create_async()
            .await;
        let second = server
            .mock("GET", "/terms/1151/MATH/135/schedule.json")
            .match_query(Matcher::UrlEncoded("key".into(), "k".into()))
            .with_status(200)
            .with_body(schedule_json("MATH", "135", &["LEC 001", "LEC 002"]))
            .create_async()
            .await;

        let client = ScheduleClient::new(server.url(), "k").unwrap();
        let courses = vec![
            CourseId::ClassNumber("4856".to_string()),
            CourseId::parse("MATH135").unwrap(),
        ];
        let records = client.fetch_all(&courses, "1151").await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].subject.as_deref(), Some("CS"));
        assert_eq!(records[1].subject.as_deref(), Some("MATH"));
        assert_eq!(records[2].section.as_deref(), Some("LEC 002"));
    }

    #[tokio::test]
    async fn test_empty_data_is_not_found() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/courses/9999/schedule.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"meta": {"status": 204, "message": "No data returned"}, "data": []}"#)
            .create_async()
            .await;

        let client = ScheduleClient::new(server.url(), "k").unwrap();
        let err = client
            .fetch_all(&[CourseId::ClassNumber("9999".to_string())], "1151")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::NotFound {
                course: "9999".to_string(),
                term: "1151".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_server_error_is_fetch_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/courses/4856/schedule.json")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = ScheduleClient::new(server.url(), "k").unwrap();
        let err = client
            .fetch_all(&[CourseId::ClassNumber("4856".to_string())], "1151")
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_fetch_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/courses/4856/schedule.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = ScheduleClient::new(server.url(), "k").unwrap();
        let err = client
            .fetch_all(&[CourseId::ClassNumber("4856".to_string())], "1151")
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Fetch { .. }));
    }

    #[test]
    fn test_envelope_error_status() {
        let envelope: ApiResponse =
            serde_json::from_str(r#"{"meta": {"status": 401, "message": "Invalid API key"}, "data": {}}"#)
                .unwrap();
        let err = decode_envelope(envelope, &CourseId::ClassNumber("4856".to_string()), "1151")
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Fetch { message } if message.contains("Invalid API key")));
    }

    #[test]
    fn test_batch_ids_are_tagged_and_distinct() {
        let a = new_batch_id();
        let b = new_batch_id();
        assert!(a.starts_with("fetch-"));
        assert_eq!(a.len(), "fetch-".len() + 10);
        assert_ne!(a, b);
    }
}
