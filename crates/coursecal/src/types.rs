/// Shared application state
use crate::config::{AppConfig, TermCatalog};
use crate::schedule::ScheduleClient;

/// State shared by every request handler. Nothing in it changes after startup.
pub struct AppState {
    pub config: AppConfig,
    pub terms: TermCatalog,
    pub client: ScheduleClient,
}

impl AppState {
    /// Builds the state from a loaded config and term table
    pub fn new(config: AppConfig, terms: TermCatalog) -> Result<Self, crate::schedule::ScheduleError> {
        let client = ScheduleClient::new(config.api_url.clone(), config.api_key.clone())?;
        Ok(AppState {
            config,
            terms,
            client,
        })
    }
}
