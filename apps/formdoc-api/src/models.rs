//! Data models for the formdoc API
//!
//! `Db*` structs mirror the SQLite rows, where tags and select options are
//! comma-delimited TEXT and validation rules / answers are JSON TEXT blobs
//! for portability. `decode` methods turn rows into the shared domain
//! types callers receive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{
    Answers, ApplicantType, Category, Document, DocumentStatus, FieldType, FormField, Template,
    ValidationRules,
};
use sqlx::FromRow;

/// templates row
#[derive(Debug, Clone, FromRow)]
pub struct DbTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub applicant_type: String,
    pub tags: String,
    pub body: String,
    pub is_active: bool,
    pub popularity_score: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// form_fields row
#[derive(Debug, Clone, FromRow)]
pub struct DbFormField {
    pub id: String,
    pub template_id: String,
    pub field_name: String,
    pub label: String,
    pub field_type: String,
    pub placeholder: Option<String>,
    pub is_required: bool,
    pub step_number: i64,
    pub sort_order: i64,
    pub validation_rules: String,
    pub options: Option<String>,
}

/// categories row
#[derive(Debug, Clone, FromRow)]
pub struct DbCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub icon: String,
    pub description: Option<String>,
    pub sort_order: i64,
}

/// documents row
#[derive(Debug, Clone, FromRow)]
pub struct DbDocument {
    pub id: String,
    pub user_id: String,
    pub template_id: String,
    pub title: String,
    pub status: String,
    pub answers_json: String,
    pub artifact_url: Option<String>,
    pub artifact_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbCategory {
    pub fn decode(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            slug: self.slug,
            icon: self.icon,
            description: self.description,
            order: self.sort_order,
        }
    }
}

impl DbFormField {
    pub fn decode(self) -> FormField {
        FormField {
            field_name: self.field_name,
            label: self.label,
            field_type: self.field_type.parse().unwrap_or(FieldType::Text),
            placeholder: self.placeholder,
            is_required: self.is_required,
            step_number: self.step_number.max(1) as u32,
            order: self.sort_order,
            validation_rules: serde_json::from_str(&self.validation_rules).unwrap_or_default(),
            options: split_csv(self.options.as_deref().unwrap_or_default()),
            id: self.id,
            template_id: self.template_id,
        }
    }
}

impl DbTemplate {
    pub fn decode(self, category: Option<Category>, fields: Vec<DbFormField>) -> Template {
        Template {
            title: self.title,
            description: self.description,
            category,
            applicant_type: self.applicant_type.parse().unwrap_or(ApplicantType::Both),
            tags: split_csv(&self.tags),
            body: self.body,
            is_active: self.is_active,
            popularity_score: self.popularity_score,
            form_fields: fields.into_iter().map(DbFormField::decode).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            id: self.id,
            category_id: self.category_id,
        }
    }
}

impl DbDocument {
    pub fn decode(self, template: Option<Template>) -> DocumentResponse {
        DocumentResponse {
            document: Document {
                status: self.status.parse().unwrap_or(DocumentStatus::Draft),
                answers: serde_json::from_str(&self.answers_json).unwrap_or_default(),
                id: self.id,
                user_id: self.user_id,
                template_id: self.template_id,
                title: self.title,
                artifact_url: self.artifact_url,
                artifact_hash: self.artifact_hash,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            template,
        }
    }
}

/// Comma-delimited wire form for tags and select options
fn split_csv(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        Vec::new()
    } else {
        raw.split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()
    }
}

// ============================================================
// Request / response types
// ============================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    pub template_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub answers: Option<Answers>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDocumentRequest {
    /// Full replacement of the answer map, not a merge
    #[serde(default)]
    pub answers: Option<Answers>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<DocumentStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListDocumentsQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

/// Document plus its (optionally attached) template
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    #[serde(flatten)]
    pub document: Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
}

/// Row shape of the owner-scoped document listing
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DocumentSummary {
    pub id: String,
    pub template_id: String,
    pub template_title: String,
    pub title: String,
    pub status: String,
    pub artifact_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRequest {
    pub body: String,
    #[serde(default)]
    pub answers: Answers,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub rendered: String,
    pub complete: bool,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenSessionRequest {
    pub document_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NextStepRequest {
    /// The complete current form state; submitted in full on every step
    #[serde(default)]
    pub answers: Answers,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GotoStepRequest {
    pub step: u32,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub document_id: String,
    pub step_count: u32,
    pub current_step: u32,
    pub completed_steps: Vec<u32>,
    pub finished: bool,
    /// Fields of the current step, in display order
    pub fields: Vec<FormField>,
    pub autosave: crate::autosave::AutosaveStatus,
}
