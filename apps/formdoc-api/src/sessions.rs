//! In-memory editing sessions
//!
//! A session binds one authenticated user to one draft document and hosts
//! the form engine's current-step state plus the autosave task. Sessions
//! are process-local and die with the process; persisted state lives on
//! the document row.

use crate::autosave::AutosaveHandle;
use form_engine::FormSession;
use shared_types::Answers;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct EditSession {
    pub document_id: String,
    pub user_id: String,
    pub form: FormSession,
    /// Set when the form has validated past its last step
    pub finished: bool,
    /// Latest submitted answer map, shared with the autosave task
    pub answers: Arc<Mutex<Answers>>,
    pub autosave: AutosaveHandle,
}

pub type SessionMap = Arc<Mutex<HashMap<String, EditSession>>>;
