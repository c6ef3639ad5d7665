//! Calendar download and preview endpoints.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDateTime, Utc, Weekday};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::calendar::{document_name, generate_ics};
use crate::config::Term;
use crate::schedule::{self, parse_course_list, CalendarEvent, CourseId, ScheduleError};
use crate::server::types::ApiErrorType;
use crate::types::AppState;

const ICS_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Looks up the term and parses the course list from the path.
fn resolve_request(
    state: &AppState,
    term: &str,
    courses: &str,
) -> Result<(Term, Vec<CourseId>), ScheduleError> {
    let term = state
        .terms
        .get(term)
        .cloned()
        .ok_or_else(|| ScheduleError::UnknownTerm {
            term: term.to_string(),
        })?;
    let courses = parse_course_list(courses)?;
    Ok((term, courses))
}

/// Runs the whole pipeline for a request.
async fn build_events(
    state: &AppState,
    term: &str,
    courses: &str,
) -> Result<(Term, Vec<CourseId>, Vec<CalendarEvent>), ScheduleError> {
    let (term, courses) = resolve_request(state, term, courses)?;
    let events =
        schedule::get_term_events(&state.client, &term, &courses, state.config.timezone).await?;
    Ok((term, courses, events))
}

/// GET /ics/:term/:courses
///
/// Returns an `.ics` attachment with one weekly event series per
/// meeting day of every requested course. `courses` is a `+` or `,`
/// separated list of class numbers or course codes.
pub async fn get_calendar(
    Path((term, courses)): Path<(String, String)>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /ics/{}/{}", term, courses);

    match build_events(&s, &term, &courses).await {
        Ok((term, courses, events)) => {
            let name = document_name(&term, &courses);
            let body = generate_ics(&name, &term, s.config.timezone, &events, Utc::now());

            info!(
                term = %term.id,
                events = events.len(),
                file = %name.file_name,
                "Generated calendar"
            );

            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, ICS_CONTENT_TYPE.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", name.file_name),
                    ),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to build calendar for {}/{}: {}", term, courses, e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// One event series as shown by the preview endpoint
#[derive(Debug, Serialize)]
pub struct EventPreview {
    pub uid: String,
    pub summary: String,
    pub location: String,
    pub weekday: Weekday,
    pub first_start: NaiveDateTime,
    pub first_end: NaiveDateTime,
    pub last_start: Option<NaiveDateTime>,
    pub occurrences: usize,
}

#[derive(Debug, Serialize)]
pub struct SchedulePreview {
    pub term: Term,
    pub name: String,
    pub timezone: String,
    pub events: Vec<EventPreview>,
}

fn preview_event(event: &CalendarEvent) -> Result<EventPreview, ScheduleError> {
    let occurrences = event.occurrences()?;
    Ok(EventPreview {
        uid: event.uid.clone(),
        summary: event.summary.clone(),
        location: event.location.clone(),
        weekday: event.weekday,
        first_start: event.start,
        first_end: event.end,
        last_start: occurrences.last().copied(),
        occurrences: occurrences.len(),
    })
}

/// GET /schedule/:term/:courses
///
/// Returns the events the calendar would contain, as JSON.
pub async fn get_schedule_preview(
    Path((term, courses)): Path<(String, String)>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /schedule/{}/{}", term, courses);

    let result = build_events(&s, &term, &courses).await.and_then(|(term, courses, events)| {
        let events = events
            .iter()
            .map(preview_event)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SchedulePreview {
            name: document_name(&term, &courses).title,
            timezone: s.config.timezone.name().to_string(),
            term,
            events,
        })
    });

    match result {
        Ok(preview) => (StatusCode::OK, Json(preview)).into_response(),
        Err(e) => {
            error!("Failed to build schedule preview for {}/{}: {}", term, courses, e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// GET /terms
///
/// Lists the terms calendars can be generated for.
pub async fn get_all_terms(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /terms");
    let terms: Vec<&Term> = s.terms.terms().collect();
    (StatusCode::OK, Json(terms)).into_response()
}
