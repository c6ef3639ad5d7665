use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::server::endpoints::{calendar, status};
use crate::types::AppState;

mod endpoints;
mod types;

pub use types::ApiErrorType;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(status::get_home))
        .route("/health", get(status::get_health))
        .route("/terms", get(calendar::get_all_terms))
        .route("/ics/:term/:courses", get(calendar::get_calendar))
        .route("/schedule/:term/:courses", get(calendar::get_schedule_preview))
        .with_state(app_state)
}
