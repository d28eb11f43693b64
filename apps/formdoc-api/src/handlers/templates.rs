//! Template schema handlers

use axum::{
    extract::{Path, State},
    Json,
};
use shared_types::Template;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{DbCategory, DbFormField, DbTemplate};
use crate::state::AppState;

/// Load a template with its category and ordered fields, fully decoded.
///
/// `active_only` applies to new-document paths; existing documents keep
/// working against templates that have since been deactivated.
pub(crate) async fn load_template(
    db: &SqlitePool,
    id: &str,
    active_only: bool,
) -> Result<Template, ApiError> {
    let sql = if active_only {
        r#"
        SELECT id, title, description, category_id, applicant_type, tags, body,
               is_active, popularity_score, created_at, updated_at
        FROM templates
        WHERE id = ? AND is_active = 1
        "#
    } else {
        r#"
        SELECT id, title, description, category_id, applicant_type, tags, body,
               is_active, popularity_score, created_at, updated_at
        FROM templates
        WHERE id = ?
        "#
    };

    let template: Option<DbTemplate> = sqlx::query_as(sql).bind(id).fetch_optional(db).await?;
    let template = template.ok_or_else(|| ApiError::TemplateNotFound(id.to_string()))?;

    let category: Option<DbCategory> = sqlx::query_as(
        r#"
        SELECT id, name, slug, icon, description, sort_order
        FROM categories
        WHERE id = ?
        "#,
    )
    .bind(&template.category_id)
    .fetch_optional(db)
    .await?;

    let fields: Vec<DbFormField> = sqlx::query_as(
        r#"
        SELECT id, template_id, field_name, label, field_type, placeholder,
               is_required, step_number, sort_order, validation_rules, options
        FROM form_fields
        WHERE template_id = ?
        ORDER BY step_number, sort_order
        "#,
    )
    .bind(id)
    .fetch_all(db)
    .await?;

    Ok(template.decode(category.map(DbCategory::decode), fields))
}

/// Get an active template by ID
pub async fn get_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Template>, ApiError> {
    let template = load_template(&state.db, &id, true).await?;

    // Token/field cross-check; authoring defects are logged, not fatal
    for finding in template_engine::lint(&template) {
        tracing::debug!(template_id = %id, identifier = %finding.identifier, "{}", finding.message);
    }

    Ok(Json(template))
}
