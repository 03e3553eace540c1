// src/routes/mod.rs
pub mod report;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use report::{clear_history_handler, get_history_handler, options_handler, submit_report_handler};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    let api_routes = Router::new()
        .route("/report", post(submit_report_handler))
        .route("/options", get(options_handler))
        .route(
            "/history/{session_id}",
            get(get_history_handler).delete(clear_history_handler),
        );

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new("public"))
        .layer(TraceLayer::new_for_http())
}
