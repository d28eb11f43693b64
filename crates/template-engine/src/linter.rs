//! Authoring-time cross-check between body tokens and declared form fields
//!
//! Tokens and fields are bound only by matching identifier strings, so a
//! typo on either side silently produces a hole in the rendered document.
//! The linter makes that binding checkable: run it when a template enters
//! the catalog.

use crate::renderer::extract_variables;
use serde::Serialize;
use shared_types::Template;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LintSeverity {
    /// The token can never be substituted; the document will always carry a hole
    Error,
    /// The field never reaches the body; it may still feed metadata
    Warning,
}

/// One finding from [`lint`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintFinding {
    pub identifier: String,
    pub severity: LintSeverity,
    pub message: String,
}

/// Cross-check a template's body tokens against its declared fields.
/// Findings are sorted by identifier so output is reproducible.
pub fn lint(template: &Template) -> Vec<LintFinding> {
    let tokens = extract_variables(&template.body);
    let field_names: HashSet<&str> = template
        .form_fields
        .iter()
        .map(|f| f.field_name.as_str())
        .collect();

    let mut findings = Vec::new();

    for token in &tokens {
        if !field_names.contains(token.as_str()) {
            findings.push(LintFinding {
                identifier: token.clone(),
                severity: LintSeverity::Error,
                message: format!("token '{{{{{}}}}}' has no form field", token),
            });
        }
    }

    for name in &field_names {
        if !tokens.contains(*name) {
            findings.push(LintFinding {
                identifier: (*name).to_string(),
                severity: LintSeverity::Warning,
                message: format!("field '{}' never appears in the body", name),
            });
        }
    }

    findings.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use shared_types::{ApplicantType, FieldType, FormField, ValidationRules};

    fn field(name: &str) -> FormField {
        FormField {
            id: format!("field-{}", name),
            template_id: "tpl-1".to_string(),
            field_name: name.to_string(),
            label: name.to_string(),
            field_type: FieldType::Text,
            placeholder: None,
            is_required: false,
            step_number: 1,
            order: 0,
            validation_rules: ValidationRules::default(),
            options: Vec::new(),
        }
    }

    fn template(body: &str, fields: Vec<FormField>) -> Template {
        let now = Utc::now();
        Template {
            id: "tpl-1".to_string(),
            title: "Test".to_string(),
            description: String::new(),
            category_id: "cat-1".to_string(),
            category: None,
            applicant_type: ApplicantType::Both,
            tags: Vec::new(),
            body: body.to_string(),
            is_active: true,
            popularity_score: 0,
            form_fields: fields,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn bound_template_has_no_findings() {
        let tpl = template("Hello {{name}}", vec![field("name")]);
        assert_eq!(lint(&tpl), Vec::new());
    }

    #[test]
    fn unbound_token_is_an_error() {
        let tpl = template("Hello {{name}}, {{missing}}", vec![field("name")]);
        let findings = lint(&tpl);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].identifier, "missing");
        assert_eq!(findings[0].severity, LintSeverity::Error);
    }

    #[test]
    fn orphaned_field_is_a_warning() {
        let tpl = template("Hello {{name}}", vec![field("name"), field("internal_ref")]);
        let findings = lint(&tpl);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].identifier, "internal_ref");
        assert_eq!(findings[0].severity, LintSeverity::Warning);
    }

    #[test]
    fn findings_sort_by_identifier() {
        let tpl = template("{{zeta}} {{alpha}}", vec![field("middle")]);
        let ids: Vec<_> = lint(&tpl).into_iter().map(|f| f.identifier).collect();
        assert_eq!(ids, vec!["alpha", "middle", "zeta"]);
    }
}
