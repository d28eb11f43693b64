//! Core data model shared by the form engine, the renderer, and the API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::answers::Answers;

/// Raised when a stored enum value does not match any known variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value: {0}")]
pub struct UnknownVariant(pub String);

/// Grouping metadata for templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order: i64,
}

/// Who a template is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantType {
    Physical,
    Legal,
    Both,
}

impl std::fmt::Display for ApplicantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicantType::Physical => write!(f, "physical"),
            ApplicantType::Legal => write!(f, "legal"),
            ApplicantType::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for ApplicantType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "physical" => Ok(ApplicantType::Physical),
            "legal" => Ok(ApplicantType::Legal),
            "both" => Ok(ApplicantType::Both),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Input kind of a form field. The set is closed; validation dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Select,
    Textarea,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Number => write!(f, "number"),
            FieldType::Date => write!(f, "date"),
            FieldType::Select => write!(f, "select"),
            FieldType::Textarea => write!(f, "textarea"),
        }
    }
}

impl std::str::FromStr for FieldType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(FieldType::Text),
            "number" => Ok(FieldType::Number),
            "date" => Ok(FieldType::Date),
            "select" => Ok(FieldType::Select),
            "textarea" => Ok(FieldType::Textarea),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Declared per-field constraints. An absent key means no constraint of
/// that kind. Keys are camelCase on the wire, matching the stored JSON blobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ValidationRules {
    /// True when no constraint of any kind is declared
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
            && self.min.is_none()
            && self.max.is_none()
    }
}

/// One input descriptor owned by exactly one template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub id: String,
    pub template_id: String,
    /// Identifier, unique within the template; body tokens bind to it by name
    pub field_name: String,
    pub label: String,
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub is_required: bool,
    /// Fields sharing a step number belong to the same form page
    pub step_number: u32,
    pub order: i64,
    pub validation_rules: ValidationRules,
    /// Only meaningful for `FieldType::Select`
    #[serde(default)]
    pub options: Vec<String>,
}

/// A document blueprint: a parametrized body plus its described form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub applicant_type: ApplicantType,
    pub tags: Vec<String>,
    /// Text with zero or more `{{identifier}}` substitution tokens
    pub body: String,
    pub is_active: bool,
    pub popularity_score: i64,
    pub form_fields: Vec<FormField>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle status of a document. `Generated` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Generated,
}

impl DocumentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, DocumentStatus::Generated)
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Draft => write!(f, "draft"),
            DocumentStatus::Generated => write!(f, "generated"),
        }
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(DocumentStatus::Draft),
            "generated" => Ok(DocumentStatus::Generated),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// One user's instantiation of a template: collected answers plus status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub user_id: String,
    /// Immutable after creation
    pub template_id: String,
    pub title: String,
    pub status: DocumentStatus,
    pub answers: Answers,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
