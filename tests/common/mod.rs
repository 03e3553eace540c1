#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::StatusCode, routing::post};
use research_report_client::services::report_client::ReportClient;
use research_report_client::state::AppState;
use tokio::net::TcpListener;

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_report_service(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A report service that always answers with the same status and body.
pub fn fixed_reply(status: StatusCode, body: &'static str) -> Router {
    Router::new().route("/generate_report", post(move || async move { (status, body) }))
}

/// Base URL of a local port with nothing listening on it.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn client_for(base_url: &str) -> ReportClient {
    ReportClient::new(base_url, Some(Duration::from_secs(5))).unwrap()
}

pub fn app_state_for(base_url: &str) -> Arc<AppState> {
    Arc::new(AppState::new(client_for(base_url), Duration::from_secs(60), 100))
}
