//! Per-step validation against declared field constraints

use serde::Serialize;
use shared_types::{answer_number, answer_text, Answers, FieldType, FormField};
use std::collections::BTreeMap;

/// Why a single field failed validation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FieldFailure {
    Required,
    TooShort { min: usize },
    TooLong { max: usize },
    PatternMismatch { pattern: String },
    OutOfRange { min: Option<f64>, max: Option<f64> },
}

/// Outcome of validating one step's fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepValidation {
    pub ok: bool,
    /// Field name → failures, one entry per invalid field
    pub failures: BTreeMap<String, Vec<FieldFailure>>,
}

/// Check every field of a step against the answer map.
///
/// Each declared rule is checked independently; a field can accumulate
/// several failures. There is no precedence between constraint kinds.
pub fn validate_step(fields: &[FormField], answers: &Answers) -> StepValidation {
    let mut failures = BTreeMap::new();
    for field in fields {
        let field_failures = check_field(field, answers);
        if !field_failures.is_empty() {
            failures.insert(field.field_name.clone(), field_failures);
        }
    }
    StepValidation {
        ok: failures.is_empty(),
        failures,
    }
}

fn check_field(field: &FormField, answers: &Answers) -> Vec<FieldFailure> {
    let text = answers.get(&field.field_name).and_then(answer_text);

    let Some(text) = text else {
        // Blank answers only ever fail the required check
        return if field.is_required {
            vec![FieldFailure::Required]
        } else {
            Vec::new()
        };
    };

    let rules = &field.validation_rules;
    let mut failures = Vec::new();

    match field.field_type {
        FieldType::Number => {
            if rules.min.is_some() || rules.max.is_some() {
                match answers.get(&field.field_name).and_then(answer_number) {
                    Some(n) => {
                        let below = rules.min.is_some_and(|min| n < min);
                        let above = rules.max.is_some_and(|max| n > max);
                        if below || above {
                            failures.push(FieldFailure::OutOfRange {
                                min: rules.min,
                                max: rules.max,
                            });
                        }
                    }
                    // A declared range cannot be checked against a
                    // non-numeric answer.
                    None => failures.push(FieldFailure::OutOfRange {
                        min: rules.min,
                        max: rules.max,
                    }),
                }
            }
        }
        FieldType::Text | FieldType::Date | FieldType::Select | FieldType::Textarea => {
            let len = text.chars().count();
            if let Some(min) = rules.min_length {
                if len < min {
                    failures.push(FieldFailure::TooShort { min });
                }
            }
            if let Some(max) = rules.max_length {
                if len > max {
                    failures.push(FieldFailure::TooLong { max });
                }
            }
            if let Some(pattern) = &rules.pattern {
                match regex::Regex::new(pattern) {
                    Ok(re) => {
                        if !re.is_match(&text) {
                            failures.push(FieldFailure::PatternMismatch {
                                pattern: pattern.clone(),
                            });
                        }
                    }
                    Err(err) => {
                        // An undeclarable regex is an authoring defect; the
                        // answer cannot be blamed for it.
                        tracing::warn!(
                            field = %field.field_name,
                            %err,
                            "skipping unparseable pattern rule"
                        );
                    }
                }
            }
        }
    }

    failures
}
