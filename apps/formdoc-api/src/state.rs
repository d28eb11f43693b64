//! Application state for the formdoc API

use crate::artifacts::{ArtifactGenerator, FileArtifactGenerator};
use crate::sessions::SessionMap;
use anyhow::Result;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Autosave cadence when AUTOSAVE_INTERVAL_SECS is unset (10 minutes)
const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 600;

pub struct AppState {
    pub db: SqlitePool,
    pub artifacts: Arc<dyn ArtifactGenerator>,
    pub artifacts_dir: PathBuf,
    pub sessions: SessionMap,
    pub autosave_interval: Duration,
}

impl AppState {
    pub async fn new() -> Result<Self> {
        // Get database path from env or use default
        let db_path = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            let data_dir = dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("formdoc-api");
            std::fs::create_dir_all(&data_dir).ok();
            format!("sqlite:{}/formdoc.db?mode=rwc", data_dir.display())
        });

        tracing::info!("Connecting to database: {}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_path)
            .await?;

        Self::run_migrations(&pool).await?;

        let artifacts_dir = std::env::var("ARTIFACTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("formdoc-api")
                    .join("artifacts")
            });

        let autosave_interval = std::env::var("AUTOSAVE_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS));

        Ok(Self {
            db: pool,
            artifacts: Arc::new(FileArtifactGenerator::new(artifacts_dir.clone())),
            artifacts_dir,
            sessions: SessionMap::default(),
            autosave_interval,
        })
    }

    pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                icon TEXT NOT NULL,
                description TEXT,
                sort_order INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS templates (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                category_id TEXT NOT NULL REFERENCES categories(id),
                applicant_type TEXT NOT NULL DEFAULT 'both',
                tags TEXT NOT NULL DEFAULT '',
                body TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                popularity_score INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS form_fields (
                id TEXT PRIMARY KEY,
                template_id TEXT NOT NULL REFERENCES templates(id),
                field_name TEXT NOT NULL,
                label TEXT NOT NULL,
                field_type TEXT NOT NULL DEFAULT 'text',
                placeholder TEXT,
                is_required INTEGER NOT NULL DEFAULT 0,
                step_number INTEGER NOT NULL DEFAULT 1,
                sort_order INTEGER NOT NULL DEFAULT 0,
                validation_rules TEXT NOT NULL DEFAULT '{}',
                options TEXT,
                UNIQUE(template_id, field_name)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                template_id TEXT NOT NULL REFERENCES templates(id),
                title TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'draft',
                answers_json TEXT NOT NULL DEFAULT '{}',
                artifact_url TEXT,
                artifact_hash TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Indexes for owner-scoped lookups
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_documents_user ON documents(user_id)
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_form_fields_template ON form_fields(template_id)
            "#,
        )
        .execute(pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }
}

/// Get platform-specific data directory
mod dirs {
    use std::path::PathBuf;

    pub fn data_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }
}
