//! HTTP client for the report-generation service.
//!
//! One POST per submission, no retry. Only a 200 counts as success.

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{info, warn};

use crate::message::{ReportRequest, ReportResponse};

pub const GENERATE_REPORT_PATH: &str = "/generate_report";

#[derive(Debug, Error)]
pub enum ReportError {
    /// DNS failure, refused connection, timeout and similar.
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    #[error("report service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Decode(String),
}

impl ReportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ReportError::Transport(e) if e.is_timeout())
    }
}

#[derive(Debug, Clone)]
pub struct ReportClient {
    client: Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl ReportClient {
    /// `timeout` of `None` leaves the call unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ReportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ReportError::Transport)?;
        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), GENERATE_REPORT_PATH);

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub async fn generate_report(&self, request: &ReportRequest) -> Result<ReportResponse, ReportError> {
        let start = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, timeout = e.is_timeout(), "report request failed");
                ReportError::Transport(e)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(endpoint = %self.endpoint, status = status.as_u16(), error = %e, "could not read error body");
                    format!("<unreadable body: {e}>")
                }
            };
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "report service returned an error status");
            return Err(ReportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(ReportError::Transport)?;
        let report: ReportResponse =
            serde_json::from_str(&body).map_err(|e| ReportError::Decode(e.to_string()))?;

        info!(
            endpoint = %self.endpoint,
            elapsed_ms = start.elapsed().as_millis() as u64,
            has_report = report.report_text().is_some(),
            "report received"
        );
        Ok(report)
    }
}
