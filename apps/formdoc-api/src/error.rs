//! Error types for the formdoc API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use form_engine::StepValidation;
use serde_json::json;
use thiserror::Error;

use crate::artifacts::ArtifactError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Covers both a genuinely missing document and an ownership mismatch;
    /// the two must stay indistinguishable to the caller.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Step validation failed")]
    StepValidation(StepValidation),

    #[error("Document is missing answers")]
    IncompleteAnswers(Vec<String>),

    #[error("Artifact generation failed: {0}")]
    ArtifactGeneration(#[from] ArtifactError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, mut body) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({"error": "Unauthorized"}),
            ),
            ApiError::TemplateNotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({"error": format!("Template not found: {}", id)}),
            ),
            ApiError::DocumentNotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({"error": format!("Document not found: {}", id)}),
            ),
            ApiError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({"error": format!("Session not found: {}", id)}),
            ),
            ApiError::StepValidation(validation) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "Step validation failed",
                    "failures": validation.failures,
                }),
            ),
            ApiError::IncompleteAnswers(missing) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "Document is missing answers",
                    "missing": missing,
                }),
            ),
            ApiError::ArtifactGeneration(e) => {
                tracing::error!("Artifact generation failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({"error": "Artifact generation failed"}),
                )
            }
            ApiError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, json!({"error": msg}))
            }
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Database error"}),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Internal error"}),
                )
            }
        };

        if let Some(map) = body.as_object_mut() {
            map.insert("status".to_string(), json!(status.as_u16()));
        }

        (status, Json(body)).into_response()
    }
}
