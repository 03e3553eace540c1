// src/services/session_manager.rs
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::message::ReportResponse;
use crate::services::history::{ChatHistoryEntry, HistoryLog};
use crate::services::report_client::ReportError;

/// Where a session is in the submit cycle.
///
/// `Idle -> Submitting -> Rendered | ErrorShown`, and back to `Submitting`
/// on the next submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    Rendered,
    ErrorShown,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub id: String,
    pub history: HistoryLog,
    pub phase: SubmissionPhase,
    pub last_active: Instant,
}

impl Session {
    pub fn new(id: impl Into<String>, history_capacity: usize) -> Self {
        Self {
            id: id.into(),
            history: HistoryLog::new(history_capacity),
            phase: SubmissionPhase::Idle,
            last_active: Instant::now(),
        }
    }
}

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
    history_capacity: usize,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .field("history_capacity", &self.history_capacity)
            .finish()
    }
}

impl SessionManager {
    pub fn new(ttl: Duration, history_capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            history_capacity,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // Create a fresh session and return its id.
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let session = Session::new(id.clone(), self.history_capacity);

        let mut guard = self.inner.write().await;
        guard.insert(id.clone(), session);
        id
    }

    // Ensure there's a session with this id.
    pub async fn ensure_session(&self, id: &str) -> String {
        {
            let guard = self.inner.read().await;
            if guard.contains_key(id) {
                return id.to_string();
            }
        }
        let mut guard = self.inner.write().await;
        guard
            .entry(id.to_string())
            .or_insert_with(|| Session::new(id, self.history_capacity));
        id.to_string()
    }

    /// Moves the session into `Submitting`. Returns false when a submission
    /// is already in flight for it, unless that one started more than a ttl
    /// ago and is treated as abandoned.
    pub async fn try_begin_submission(&self, session_id: &str) -> bool {
        let mut guard = self.inner.write().await;
        let session = guard
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id, self.history_capacity));
        if session.phase == SubmissionPhase::Submitting {
            if session.last_active.elapsed() < self.ttl {
                return false;
            }
            tracing::warn!(session_id, "reclaiming submission older than the session ttl");
        }
        session.phase = SubmissionPhase::Submitting;
        session.last_active = Instant::now();
        true
    }

    /// Settles a submission and returns the resulting phase together with
    /// a copy of the history. Only successful exchanges are recorded.
    pub async fn finish_submission(
        &self,
        session_id: &str,
        query: &str,
        outcome: &Result<ReportResponse, ReportError>,
    ) -> (SubmissionPhase, Vec<ChatHistoryEntry>) {
        let mut guard = self.inner.write().await;
        let session = guard
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id, self.history_capacity));

        session.phase = match outcome {
            Ok(response) => {
                if let Some(evicted) = session.history.record(query, response) {
                    tracing::debug!(session_id, evicted = %evicted.message, "history full, oldest entry evicted");
                }
                SubmissionPhase::Rendered
            }
            Err(_) => SubmissionPhase::ErrorShown,
        };
        session.last_active = Instant::now();
        (session.phase, session.history.to_vec())
    }

    /// Puts a session stuck in `Submitting` back to `Idle`.
    pub async fn abort_submission(&self, session_id: &str) {
        let mut guard = self.inner.write().await;
        if let Some(session) = guard.get_mut(session_id) {
            if session.phase == SubmissionPhase::Submitting {
                session.phase = SubmissionPhase::Idle;
            }
        }
    }

    pub async fn get_phase(&self, session_id: &str) -> Option<SubmissionPhase> {
        let guard = self.inner.read().await;
        guard.get(session_id).map(|s| s.phase)
    }

    /// Get a copy of the session history
    pub async fn get_history(&self, session_id: &str) -> Option<Vec<ChatHistoryEntry>> {
        let guard = self.inner.read().await;
        guard.get(session_id).map(|s| s.history.to_vec())
    }

    /// Empty a session's history. Returns false for an unknown session.
    pub async fn clear_history(&self, session_id: &str) -> bool {
        let mut guard = self.inner.write().await;
        match guard.get_mut(session_id) {
            Some(session) => {
                session.history.clear();
                session.last_active = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Remove a session by id
    pub async fn remove_session(&self, session_id: &str) -> bool {
        let mut guard = self.inner.write().await;
        guard.remove(session_id).is_some()
    }

    /// Remove sessions idle longer than ttl. Returns number removed.
    /// A submission that started more than a ttl ago counts as idle too.
    pub async fn purge_expired(&self) -> usize {
        let mut guard = self.inner.write().await;
        let now = Instant::now();
        let before = guard.len();
        guard.retain(|_, s| now.duration_since(s.last_active) < self.ttl);
        before - guard.len()
    }

    /// Number of sessions
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
