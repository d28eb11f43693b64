//! Template body rendering and completeness checking
//!
//! A template body is plain text carrying `{{identifier}}` substitution
//! tokens. This crate substitutes a flat answer map into the body, reports
//! which identifiers are still unanswered, and cross-checks a template's
//! tokens against its declared form fields. Rendering is total and
//! side-effect-free; it runs on every preview refresh.

pub mod linter;
pub mod renderer;

pub use linter::{lint, LintFinding, LintSeverity};
pub use renderer::{extract_variables, render, validate, CompletenessReport};
