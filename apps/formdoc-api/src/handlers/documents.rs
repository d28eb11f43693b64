//! Document lifecycle handlers
//!
//! Every route here is owner-scoped: lookups always filter on both the
//! document id and the acting user id, so an ownership mismatch is
//! indistinguishable from a missing document.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::json;
use shared_types::{Answers, DocumentStatus};
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::templates::load_template;
use crate::models::{
    CreateDocumentRequest, DbDocument, DbTemplate, DocumentResponse, DocumentSummary,
    ListDocumentsQuery, UpdateDocumentRequest,
};
use crate::state::AppState;

const DOCUMENT_COLUMNS: &str = r#"
    SELECT id, user_id, template_id, title, status, answers_json,
           artifact_url, artifact_hash, created_at, updated_at
    FROM documents
"#;

/// Fetch a document owned by `user_id`, or fail with `DocumentNotFound`
pub(crate) async fn fetch_owned(
    db: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<DbDocument, ApiError> {
    let sql = format!("{} WHERE id = ? AND user_id = ?", DOCUMENT_COLUMNS);
    let document: Option<DbDocument> = sqlx::query_as(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    document.ok_or_else(|| ApiError::DocumentNotFound(id.to_string()))
}

/// Create a draft document from an active template
pub async fn create_document(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentResponse>), ApiError> {
    let template: Option<DbTemplate> = sqlx::query_as(
        r#"
        SELECT id, title, description, category_id, applicant_type, tags, body,
               is_active, popularity_score, created_at, updated_at
        FROM templates
        WHERE id = ? AND is_active = 1
        "#,
    )
    .bind(&req.template_id)
    .fetch_optional(&state.db)
    .await?;
    let template = template.ok_or_else(|| ApiError::TemplateNotFound(req.template_id.clone()))?;

    let id = Uuid::new_v4().to_string();
    let title = req.title.unwrap_or_else(|| template.title.clone());
    let answers = req.answers.unwrap_or_default();
    let answers_json = serde_json::to_string(&answers)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid answers: {}", e)))?;
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO documents (id, user_id, template_id, title, status, answers_json, created_at, updated_at)
        VALUES (?, ?, ?, ?, 'draft', ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&user_id)
    .bind(&req.template_id)
    .bind(&title)
    .bind(&answers_json)
    .bind(now.to_rfc3339())
    .bind(now.to_rfc3339())
    .execute(&state.db)
    .await?;

    tracing::info!("Created document: {}", id);

    let document = fetch_owned(&state.db, &id, &user_id).await?;
    Ok((StatusCode::CREATED, Json(document.decode(None))))
}

/// List the caller's documents, newest-edited first
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<Json<Vec<DocumentSummary>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(|raw| {
            raw.parse::<DocumentStatus>()
                .map_err(|e| ApiError::InvalidRequest(e.to_string()))
        })
        .transpose()?;

    let mut sql = String::from(
        r#"
        SELECT d.id, d.template_id, t.title AS template_title, d.title, d.status,
               d.artifact_url, d.created_at, d.updated_at
        FROM documents d
        JOIN templates t ON t.id = d.template_id
        WHERE d.user_id = ?
        "#,
    );
    if status.is_some() {
        sql.push_str(" AND d.status = ?");
    }
    if query.search.is_some() {
        sql.push_str(" AND d.title LIKE ?");
    }
    sql.push_str(" ORDER BY d.updated_at DESC");

    let mut db_query = sqlx::query_as::<_, DocumentSummary>(&sql).bind(&user_id);
    if let Some(status) = status {
        db_query = db_query.bind(status.to_string());
    }
    if let Some(search) = &query.search {
        db_query = db_query.bind(format!("%{}%", search));
    }

    Ok(Json(db_query.fetch_all(&state.db).await?))
}

/// Get one document, with its template and fields attached
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let document = fetch_owned(&state.db, &id, &user_id).await?;
    let template = load_template(&state.db, &document.template_id, false).await?;
    Ok(Json(document.decode(Some(template))))
}

/// Update a draft: full answer-map replacement and/or a new title.
///
/// Saves are last-write-wins by design; callers submit the complete form
/// state each time and single-session editing is a documented precondition.
pub async fn update_document(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateDocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let existing = fetch_owned(&state.db, &id, &user_id).await?;
    let current_status = existing
        .status
        .parse::<DocumentStatus>()
        .unwrap_or(DocumentStatus::Draft);

    let status = match req.status {
        Some(DocumentStatus::Draft) if current_status.is_terminal() => {
            return Err(ApiError::InvalidRequest(
                "generated documents cannot return to draft".to_string(),
            ));
        }
        Some(requested) => requested,
        None => current_status,
    };

    let title = req.title.unwrap_or(existing.title);
    let answers_json = match &req.answers {
        Some(answers) => serde_json::to_string(answers)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid answers: {}", e)))?,
        None => existing.answers_json,
    };

    sqlx::query(
        r#"
        UPDATE documents
        SET title = ?, status = ?, answers_json = ?, updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&title)
    .bind(status.to_string())
    .bind(&answers_json)
    .bind(Utc::now().to_rfc3339())
    .bind(&id)
    .bind(&user_id)
    .execute(&state.db)
    .await?;

    let document = fetch_owned(&state.db, &id, &user_id).await?;
    Ok(Json(document.decode(None)))
}

/// Delete a document
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    fetch_owned(&state.db, &id, &user_id).await?;

    sqlx::query("DELETE FROM documents WHERE id = ? AND user_id = ?")
        .bind(&id)
        .bind(&user_id)
        .execute(&state.db)
        .await?;

    tracing::info!("Deleted document: {}", id);
    Ok(Json(json!({"success": true})))
}

/// Export a document: validate completeness, render, generate the artifact,
/// and only then flip the status to `generated`.
///
/// The operation is one logical step: if the generator fails, the status
/// write never happens and the document stays a draft.
pub async fn export_document(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let document = fetch_owned(&state.db, &id, &user_id).await?;
    // Deactivated templates do not invalidate existing documents
    let template = load_template(&state.db, &document.template_id, false).await?;

    let answers: Answers = serde_json::from_str(&document.answers_json).unwrap_or_default();

    let report = template_engine::validate(&template.body, &answers);
    if !report.complete {
        return Err(ApiError::IncompleteAnswers(report.missing));
    }

    let rendered = template_engine::render(&template.body, &answers);
    let artifact = state.artifacts.generate(&document.title, &rendered)?;

    sqlx::query(
        r#"
        UPDATE documents
        SET status = 'generated', artifact_url = ?, artifact_hash = ?, updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&artifact.url)
    .bind(&artifact.hash)
    .bind(Utc::now().to_rfc3339())
    .bind(&id)
    .bind(&user_id)
    .execute(&state.db)
    .await?;

    tracing::info!(
        "Exported document {} to {} (hash {})",
        id,
        artifact.url,
        artifact.hash
    );

    let document = fetch_owned(&state.db, &id, &user_id).await?;
    Ok(Json(document.decode(None)))
}
