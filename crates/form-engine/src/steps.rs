//! Partition a template's fields into ordered form steps

use serde::Serialize;
use shared_types::{FormField, Template};

/// One page of the form: all fields sharing a step number
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormStep {
    pub number: u32,
    pub fields: Vec<FormField>,
}

/// Derive the step list from a template.
///
/// Steps run `1..=max(step_number)`; a gap in the numbering yields an empty
/// step, which validates trivially. Within a step, fields sort by order
/// index, ties broken by field name so the layout is reproducible.
pub fn steps_of(template: &Template) -> Vec<FormStep> {
    let max_step = template
        .form_fields
        .iter()
        .map(|f| f.step_number)
        .max()
        .unwrap_or(0);

    (1..=max_step)
        .map(|number| {
            let mut fields: Vec<FormField> = template
                .form_fields
                .iter()
                .filter(|f| f.step_number == number)
                .cloned()
                .collect();
            fields.sort_by(|a, b| {
                a.order
                    .cmp(&b.order)
                    .then_with(|| a.field_name.cmp(&b.field_name))
            });
            FormStep { number, fields }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::tests::{field, template};
    use pretty_assertions::assert_eq;

    #[test]
    fn groups_fields_by_step_and_sorts_by_order() {
        let tpl = template(vec![
            field("city", 2, 1),
            field("name", 1, 2),
            field("street", 2, 0),
            field("email", 1, 1),
        ]);

        let steps = steps_of(&tpl);
        assert_eq!(steps.len(), 2);

        let step_one: Vec<_> = steps[0].fields.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(step_one, vec!["email", "name"]);

        let step_two: Vec<_> = steps[1].fields.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(step_two, vec!["street", "city"]);
    }

    #[test]
    fn order_ties_break_by_field_name() {
        let tpl = template(vec![
            field("zulu", 1, 5),
            field("alpha", 1, 5),
            field("mike", 1, 5),
        ]);

        let steps = steps_of(&tpl);
        let names: Vec<_> = steps[0]
            .fields
            .iter()
            .map(|f| f.field_name.as_str())
            .collect();
        assert_eq!(names, vec!["alpha", "mike", "zulu"]);
    }

    #[test]
    fn step_gaps_yield_empty_steps() {
        let tpl = template(vec![field("first", 1, 0), field("last", 3, 0)]);

        let steps = steps_of(&tpl);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1].number, 2);
        assert!(steps[1].fields.is_empty());
    }

    #[test]
    fn template_without_fields_has_no_steps() {
        let tpl = template(Vec::new());
        assert!(steps_of(&tpl).is_empty());
    }
}
