// src/state.rs
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::report_client::{ReportClient, ReportError};
use crate::services::session_manager::SessionManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionManager,
    pub client: ReportClient,
}

impl AppState {
    pub fn new(client: ReportClient, session_ttl: Duration, history_capacity: usize) -> Self {
        Self {
            sessions: SessionManager::new(session_ttl, history_capacity),
            client,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ReportError> {
        let client = ReportClient::new(&config.report_api_base_url, config.request_timeout)?;
        Ok(Self::new(client, config.session_ttl, config.history_capacity))
    }
}
