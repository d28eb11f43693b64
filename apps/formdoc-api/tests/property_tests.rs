//! Property-based tests for the document engine
//!
//! Exercises the renderer and step-validation invariants the API relies on.

use form_engine::{validate_step, FieldFailure};
use proptest::prelude::*;
use serde_json::json;
use shared_types::{Answers, FieldType, FormField, ValidationRules};
use std::collections::HashSet;
use template_engine::{extract_variables, render, validate};

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

/// Prose with no brace or bracket characters, so assertions about leaked
/// token syntax and placeholder markers stay unambiguous
fn prose() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .,]{0,20}"
}

/// A body interleaving prose with `{{identifier}}` tokens, plus the
/// identifiers it references (possibly with repeats)
fn body_and_vars() -> impl Strategy<Value = (String, Vec<String>)> {
    (
        prop::collection::vec((prose(), identifier()), 0..6),
        prose(),
    )
        .prop_map(|(parts, tail)| {
            let mut body = String::new();
            let mut vars = Vec::new();
            for (text, var) in parts {
                body.push_str(&text);
                body.push_str(&format!("{{{{{}}}}}", var));
                vars.push(var);
            }
            body.push_str(&tail);
            (body, vars)
        })
}

fn plain_field(name: &str, required: bool) -> FormField {
    FormField {
        id: format!("field-{}", name),
        template_id: "tpl".to_string(),
        field_name: name.to_string(),
        label: name.to_string(),
        field_type: FieldType::Text,
        placeholder: None,
        is_required: required,
        step_number: 1,
        order: 0,
        validation_rules: ValidationRules::default(),
        options: Vec::new(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================================
    // Renderer
    // ============================================================

    #[test]
    fn extracted_variables_match_the_body((body, vars) in body_and_vars()) {
        let expected: HashSet<String> = vars.into_iter().collect();
        prop_assert_eq!(extract_variables(&body), expected);
    }

    #[test]
    fn complete_answers_leave_no_tokens_or_markers(
        (body, vars) in body_and_vars(),
        value in "[a-zA-Z0-9]{1,10}",
    ) {
        let answers: Answers = vars.iter().map(|v| (v.clone(), json!(value))).collect();

        let report = validate(&body, &answers);
        prop_assert!(report.complete);
        prop_assert!(report.missing.is_empty());

        let rendered = render(&body, &answers);
        prop_assert!(!rendered.contains("{{"));
        prop_assert!(!rendered.contains('['));
    }

    #[test]
    fn render_is_idempotent((body, vars) in body_and_vars(), value in "[a-zA-Z0-9]{1,10}") {
        // Answer only every other variable; the rest become markers
        let answers: Answers = vars
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 2 == 0)
            .map(|(_, v)| (v.clone(), json!(value)))
            .collect();

        let once = render(&body, &answers);
        prop_assert!(!once.contains("{{"));
        prop_assert_eq!(render(&once, &answers), once);
    }

    #[test]
    fn missing_is_exactly_the_unanswered_set(
        (body, vars) in body_and_vars(),
        value in "[a-zA-Z0-9]{1,10}",
    ) {
        let answered: HashSet<String> = vars.iter().take(vars.len() / 2).cloned().collect();
        let answers: Answers = answered.iter().map(|v| (v.clone(), json!(value))).collect();

        let report = validate(&body, &answers);
        let missing: HashSet<String> = report.missing.iter().cloned().collect();
        let expected: HashSet<String> = vars
            .iter()
            .filter(|v| !answered.contains(*v))
            .cloned()
            .collect();

        prop_assert_eq!(missing, expected);
        prop_assert_eq!(report.complete, report.missing.is_empty());
        // No duplicates in the missing list
        let dedup: HashSet<&String> = report.missing.iter().collect();
        prop_assert_eq!(dedup.len(), report.missing.len());
    }

    // ============================================================
    // Step validation
    // ============================================================

    #[test]
    fn required_is_reported_iff_required_and_blank(
        required in any::<bool>(),
        answer in prop_oneof![
            Just(None),
            Just(Some(json!(""))),
            "[a-zA-Z0-9]{1,10}".prop_map(|s| Some(json!(s))),
        ],
    ) {
        let field = plain_field("subject", required);
        let mut answers = Answers::new();
        let blank = match &answer {
            None => true,
            Some(value) => {
                answers.insert("subject".to_string(), value.clone());
                value == &json!("")
            }
        };

        let result = validate_step(&[field], &answers);
        let reported = result
            .failures
            .get("subject")
            .is_some_and(|fs| fs.contains(&FieldFailure::Required));
        prop_assert_eq!(reported, required && blank);
    }
}
