//! Flat token substitution over a template body

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;
use shared_types::{answer_text, Answers};
use std::collections::HashSet;

lazy_static! {
    /// `{{identifier}}` tokens; identifiers are word characters only.
    /// Anything else that merely looks token-like is prose and stays as-is.
    static ref TOKEN_RE: Regex = Regex::new(r"\{\{(\w+)\}\}").unwrap();
}

/// Substitute answers into `body`.
///
/// All substitutions happen in a single pass, so a value that itself
/// contains token-like text is never re-substituted. Tokens with no
/// non-blank answer become a visible `[identifier]` tag — the output is
/// always well-formed prose with no leaked token syntax.
pub fn render(body: &str, answers: &Answers) -> String {
    TOKEN_RE
        .replace_all(body, |caps: &Captures<'_>| {
            let name = &caps[1];
            match answers.get(name).and_then(answer_text) {
                Some(text) => text,
                None => format!("[{}]", name),
            }
        })
        .into_owned()
}

/// Distinct identifiers referenced anywhere in `body`, in no particular order
pub fn extract_variables(body: &str) -> HashSet<String> {
    TOKEN_RE
        .captures_iter(body)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Result of checking a body against an answer map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletenessReport {
    pub complete: bool,
    /// Unanswered identifiers, in first-occurrence order
    pub missing: Vec<String>,
}

/// Report which of the body's identifiers have no non-blank answer.
/// This is the sole gate for export.
pub fn validate(body: &str, answers: &Answers) -> CompletenessReport {
    let mut seen = HashSet::new();
    let mut missing = Vec::new();
    for caps in TOKEN_RE.captures_iter(body) {
        let name = &caps[1];
        if seen.insert(name.to_string()) && !shared_types::is_answered(answers, name) {
            missing.push(name.to_string());
        }
    }
    CompletenessReport {
        complete: missing.is_empty(),
        missing,
    }
}
