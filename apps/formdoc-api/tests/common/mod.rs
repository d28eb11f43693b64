//! Shared fixtures for formdoc-api integration tests
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use formdoc_api::artifacts::{ArtifactError, ArtifactGenerator, ArtifactHandle};
use formdoc_api::state::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

pub const TEMPLATE_ID: &str = "tpl-poa";
pub const INACTIVE_TEMPLATE_ID: &str = "tpl-retired";

/// Body referencing three fields across two steps
pub const TEMPLATE_BODY: &str = "POWER OF ATTORNEY\n\nI, {{full_name}}, residing at {{address}}, \
authorize payment of {{amount}} rubles.";

/// Generator that always succeeds without touching the filesystem
pub struct StubGenerator;

impl ArtifactGenerator for StubGenerator {
    fn generate(&self, _title: &str, text: &str) -> Result<ArtifactHandle, ArtifactError> {
        Ok(ArtifactHandle {
            url: format!("/artifacts/stub-{}.html", text.len()),
            hash: "stub-hash".to_string(),
        })
    }
}

/// Generator standing in for a broken external collaborator
pub struct FailingGenerator;

impl ArtifactGenerator for FailingGenerator {
    fn generate(&self, _title: &str, _text: &str) -> Result<ArtifactHandle, ArtifactError> {
        Err(ArtifactError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "generator offline",
        )))
    }
}

pub async fn setup_pool() -> SqlitePool {
    // One connection: each in-memory SQLite connection is its own database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    AppState::run_migrations(&pool).await.unwrap();
    pool
}

pub async fn seed_catalog(pool: &SqlitePool) {
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO categories (id, name, slug, icon, description, sort_order)
         VALUES ('cat-legal', 'Legal', 'legal', 'gavel', 'Legal documents', 1)",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO templates (id, title, description, category_id, applicant_type, tags, body,
                                is_active, popularity_score, created_at, updated_at)
         VALUES (?, 'Power of Attorney', 'Authorize someone to act for you', 'cat-legal',
                 'physical', 'legal,poa', ?, 1, 5, ?, ?)",
    )
    .bind(TEMPLATE_ID)
    .bind(TEMPLATE_BODY)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO templates (id, title, description, category_id, applicant_type, tags, body,
                                is_active, popularity_score, created_at, updated_at)
         VALUES (?, 'Retired Template', '', 'cat-legal', 'both', '', 'Old {{thing}}', 0, 0, ?, ?)",
    )
    .bind(INACTIVE_TEMPLATE_ID)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .unwrap();

    let fields: [(&str, &str, &str, Option<&str>, bool, i64, i64, &str); 4] = [
        (
            "fld-name",
            "full_name",
            "text",
            Some("Ivanov Ivan Ivanovich"),
            true,
            1,
            0,
            r#"{"minLength": 3, "maxLength": 100}"#,
        ),
        (
            "fld-address",
            "address",
            "textarea",
            None,
            true,
            1,
            1,
            "{}",
        ),
        (
            "fld-phone",
            "phone",
            "text",
            Some("+79991234567"),
            false,
            1,
            2,
            r#"{"pattern": "^\\+?\\d{10,15}$"}"#,
        ),
        ("fld-amount", "amount", "number", None, true, 2, 0, r#"{"min": 1}"#),
    ];

    for (id, name, field_type, placeholder, required, step, order, rules) in fields {
        sqlx::query(
            "INSERT INTO form_fields (id, template_id, field_name, label, field_type, placeholder,
                                      is_required, step_number, sort_order, validation_rules, options)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL)",
        )
        .bind(id)
        .bind(TEMPLATE_ID)
        .bind(name)
        .bind(name)
        .bind(field_type)
        .bind(placeholder)
        .bind(required)
        .bind(step)
        .bind(order)
        .bind(rules)
        .execute(pool)
        .await
        .unwrap();
    }
}

pub async fn insert_document(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    template_id: &str,
    answers_json: &str,
) {
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        "INSERT INTO documents (id, user_id, template_id, title, status, answers_json, created_at, updated_at)
         VALUES (?, ?, ?, 'Fixture Document', 'draft', ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(template_id)
    .bind(answers_json)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn test_state(generator: Arc<dyn ArtifactGenerator>) -> Arc<AppState> {
    let pool = setup_pool().await;
    seed_catalog(&pool).await;
    Arc::new(AppState {
        db: pool,
        artifacts: generator,
        artifacts_dir: std::env::temp_dir().join("formdoc-api-tests"),
        sessions: Default::default(),
        autosave_interval: Duration::from_secs(600),
    })
}

pub async fn test_app() -> (Router, Arc<AppState>) {
    let state = test_state(Arc::new(StubGenerator)).await;
    (formdoc_api::router(Arc::clone(&state)), state)
}

/// Drive one request through the router and decode the JSON response
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
