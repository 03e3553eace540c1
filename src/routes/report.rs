use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::{
    error::AppError,
    message::{FormOptions, HistoryResponse, SubmitReportRequest, SubmitReportResponse},
    services::{
        query_builder::{build_request, form_options},
        renderer::{render, render_history},
    },
    state::SharedState,
};

pub async fn submit_report_handler(
    State(state): State<SharedState>,
    Json(payload): Json<SubmitReportRequest>,
) -> Result<Json<SubmitReportResponse>, AppError> {
    let request = build_request(&payload.query, payload.year, payload.quarter, &payload.agent)?;

    let session_id = match &payload.session_id {
        Some(s) if !s.trim().is_empty() => state.sessions.ensure_session(s).await,
        _ => state.sessions.create_session().await,
    };

    if !state.sessions.try_begin_submission(&session_id).await {
        return Err(AppError::Conflict(session_id));
    }

    info!(
        session_id = %session_id,
        year = request.year,
        quarter = request.quarter,
        agent = request.agent_name.as_deref().unwrap_or("none"),
        "generating report"
    );

    // The call runs in its own task so the session is settled even if the
    // browser goes away mid-request.
    let task_state = state.clone();
    let task_session = session_id.clone();
    let joined = tokio::spawn(async move {
        let outcome = task_state.client.generate_report(&request).await;
        let rendered = render(&outcome);
        let (phase, history) = task_state
            .sessions
            .finish_submission(&task_session, &request.query, &outcome)
            .await;
        (rendered, phase, history)
    })
    .await;

    let (rendered, phase, history) = match joined {
        Ok(done) => done,
        Err(e) => {
            state.sessions.abort_submission(&session_id).await;
            return Err(AppError::Internal(e.to_string()));
        }
    };

    Ok(Json(SubmitReportResponse {
        session_id,
        phase,
        html: rendered.to_html(),
        sections: rendered.sections,
        history_html: render_history(&history),
        history,
    }))
}

pub async fn options_handler() -> Json<FormOptions> {
    Json(form_options())
}

pub async fn get_history_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let history = state
        .sessions
        .get_history(&session_id)
        .await
        .ok_or_else(|| AppError::NotFound(session_id.clone()))?;
    Ok(Json(HistoryResponse { session_id, history }))
}

pub async fn clear_history_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.sessions.clear_history(&session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(session_id))
    }
}
