//! Editing-session handlers
//!
//! A session hosts the multi-step form state machine for one draft and
//! owns its autosave task. Session state is in-memory and per-process;
//! the document row remains the source of truth for answers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use form_engine::{FormSession, Progress};
use serde_json::json;
use shared_types::{Answers, DocumentStatus};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::autosave::AutosaveHandle;
use crate::error::ApiError;
use crate::handlers::documents::fetch_owned;
use crate::handlers::templates::load_template;
use crate::models::{GotoStepRequest, NextStepRequest, OpenSessionRequest, SessionResponse};
use crate::sessions::EditSession;
use crate::state::AppState;

async fn session_response(id: &str, session: &EditSession) -> SessionResponse {
    SessionResponse {
        id: id.to_string(),
        document_id: session.document_id.clone(),
        step_count: session.form.step_count(),
        current_step: session.form.current_step(),
        completed_steps: session.form.completed_steps(),
        finished: session.finished,
        fields: session.form.current_fields().to_vec(),
        autosave: session.autosave.status().await,
    }
}

/// Open an editing session on an owned draft
pub async fn open_session(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let document = fetch_owned(&state.db, &req.document_id, &user_id).await?;
    let status: DocumentStatus = document.status.parse().unwrap_or(DocumentStatus::Draft);
    if status.is_terminal() {
        return Err(ApiError::InvalidRequest(
            "generated documents are no longer editable".to_string(),
        ));
    }

    let template = load_template(&state.db, &document.template_id, false).await?;
    let answers: Answers = serde_json::from_str(&document.answers_json).unwrap_or_default();
    let answers = Arc::new(Mutex::new(answers));

    let autosave = AutosaveHandle::spawn(
        state.db.clone(),
        document.id.clone(),
        Arc::clone(&answers),
        state.autosave_interval,
    );

    let id = Uuid::new_v4().to_string();
    let session = EditSession {
        document_id: document.id,
        user_id,
        form: FormSession::new(&template),
        finished: false,
        answers,
        autosave,
    };

    tracing::info!("Opened session {} on document {}", id, session.document_id);

    let response = session_response(&id, &session).await;
    state.sessions.lock().await.insert(id, session);
    Ok((StatusCode::CREATED, Json(response)))
}

/// Current progress of a session
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let sessions = state.sessions.lock().await;
    let session = sessions
        .get(&id)
        .filter(|s| s.user_id == user_id)
        .ok_or_else(|| ApiError::SessionNotFound(id.clone()))?;
    Ok(Json(session_response(&id, session).await))
}

/// Submit the full form state, validate the current step, and advance.
///
/// On validation failure the session stays put and the field failures are
/// returned. On success the validated answers are persisted before the
/// client moves on.
pub async fn next_step(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<NextStepRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (response, document_id, answers_json) = {
        let mut sessions = state.sessions.lock().await;
        let session = sessions
            .get_mut(&id)
            .filter(|s| s.user_id == user_id)
            .ok_or_else(|| ApiError::SessionNotFound(id.clone()))?;

        match session.form.advance(&req.answers) {
            Ok(Progress::Finished) => session.finished = true,
            Ok(Progress::Advanced { .. }) => {}
            Err(validation) => return Err(ApiError::StepValidation(validation)),
        }

        *session.answers.lock().await = req.answers.clone();

        let answers_json = serde_json::to_string(&req.answers)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid answers: {}", e)))?;
        (
            session_response(&id, session).await,
            session.document_id.clone(),
            answers_json,
        )
    };

    sqlx::query(
        r#"
        UPDATE documents
        SET answers_json = ?, updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&answers_json)
    .bind(Utc::now().to_rfc3339())
    .bind(&document_id)
    .bind(&user_id)
    .execute(&state.db)
    .await?;

    Ok(Json(response))
}

/// Step back one step; never validates
pub async fn back_step(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .get_mut(&id)
        .filter(|s| s.user_id == user_id)
        .ok_or_else(|| ApiError::SessionNotFound(id.clone()))?;
    session.form.back();
    Ok(Json(session_response(&id, session).await))
}

/// Jump to an earlier or already-completed step
pub async fn goto_step(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<GotoStepRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .get_mut(&id)
        .filter(|s| s.user_id == user_id)
        .ok_or_else(|| ApiError::SessionNotFound(id.clone()))?;
    session
        .form
        .go_to(req.step)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    Ok(Json(session_response(&id, session).await))
}

/// Tear a session down, cancelling its autosave task
pub async fn close_session(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let owned = sessions
        .get(&id)
        .filter(|s| s.user_id == user_id)
        .is_some();
    if !owned {
        return Err(ApiError::SessionNotFound(id));
    }

    // Dropping the session aborts the autosave task
    sessions.remove(&id);
    tracing::info!("Closed session {}", id);
    Ok(Json(json!({"success": true})))
}
