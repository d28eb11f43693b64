//! Periodic best-effort persistence of in-progress answers
//!
//! One task per editing session, on a fixed interval independent of user
//! input. Ticks with an empty answer map are skipped. Failures are
//! recorded as a transient status and logged, never escalated, and never
//! block editing. The task dies with its handle, so no autosave can fire
//! after the session is torn down.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared_types::Answers;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutosaveState {
    /// Nothing saved yet this session
    Idle,
    Saved,
    Error,
}

/// Last observed autosave outcome, surfaced to the editing client
#[derive(Debug, Clone, Serialize)]
pub struct AutosaveStatus {
    pub state: AutosaveState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_saved_at: Option<DateTime<Utc>>,
}

pub struct AutosaveHandle {
    status: Arc<Mutex<AutosaveStatus>>,
    task: JoinHandle<()>,
}

impl AutosaveHandle {
    /// Spawn the save loop for one document. Ownership of the document was
    /// verified when the session opened; the task is keyed to that id only.
    pub fn spawn(
        db: SqlitePool,
        document_id: String,
        answers: Arc<Mutex<Answers>>,
        interval: Duration,
    ) -> Self {
        let status = Arc::new(Mutex::new(AutosaveStatus {
            state: AutosaveState::Idle,
            last_saved_at: None,
        }));
        let task = tokio::spawn(run(db, document_id, answers, Arc::clone(&status), interval));
        Self { status, task }
    }

    pub async fn status(&self) -> AutosaveStatus {
        self.status.lock().await.clone()
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    db: SqlitePool,
    document_id: String,
    answers: Arc<Mutex<Answers>>,
    status: Arc<Mutex<AutosaveStatus>>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately; the loop below waits a full
    // interval before the first save.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let snapshot = answers.lock().await.clone();
        if snapshot.is_empty() {
            continue;
        }

        let answers_json = match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(document_id = %document_id, %err, "autosave could not encode answers");
                continue;
            }
        };

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET answers_json = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&answers_json)
        .bind(now.to_rfc3339())
        .bind(&document_id)
        .execute(&db)
        .await;

        let mut status = status.lock().await;
        match result {
            Ok(_) => {
                status.state = AutosaveState::Saved;
                status.last_saved_at = Some(now);
                tracing::debug!(document_id = %document_id, "autosaved answers");
            }
            Err(err) => {
                status.state = AutosaveState::Error;
                tracing::warn!(document_id = %document_id, %err, "autosave failed");
            }
        }
    }
}
