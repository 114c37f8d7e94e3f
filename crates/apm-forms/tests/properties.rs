use apm_forms::{
    evaluate_condition, evaluate_display, validate_submission, visible_fields, ConditionLogic,
    ConditionalDisplay, FieldCondition, FieldDefinition, FieldType, FormDefinition, FormValues,
};
use proptest::prelude::*;

const OPERATORS: &[&str] = &[
    "equals",
    "not_equals",
    "contains",
    "not_contains",
    "starts_with",
    "ends_with",
    "is_empty",
    "is_not_empty",
];

fn value_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec!["", "ya", "tidak", "Ya Tentu"]).prop_map(String::from))
}

fn condition_strategy() -> impl Strategy<Value = FieldCondition> {
    (
        prop::sample::select(vec!["a", "b"]),
        prop::sample::select(OPERATORS.to_vec()),
        prop::sample::select(vec!["ya", "tidak", "y"]),
    )
        .prop_map(|(field, operator, value)| FieldCondition::new(field, operator).with_value(value))
}

fn values_from(a: Option<String>, b: Option<String>) -> FormValues {
    let mut values = FormValues::new();
    if let Some(a) = a {
        values.insert("a", a);
    }
    if let Some(b) = b {
        values.insert("b", b);
    }
    values
}

fn form_strategy() -> impl Strategy<Value = FormDefinition> {
    prop::collection::vec((any::<i16>(), any::<bool>(), prop::option::of(condition_strategy())), 0..12)
        .prop_map(|specs| {
            let fields = specs
                .into_iter()
                .enumerate()
                .map(|(i, (order, required, condition))| {
                    let mut field = FieldDefinition::new(format!("f{i}"), FieldType::Text, format!("F{i}"))
                        .with_order(i64::from(order));
                    field.required = required;
                    field.condition = condition
                        .map(|c| ConditionalDisplay::show_when(ConditionLogic::And, vec![c]));
                    field
                })
                .collect();
            FormDefinition::with_fields(fields)
        })
}

proptest! {
    #[test]
    fn visible_fields_keep_ascending_order(form in form_strategy(), a in value_strategy(), b in value_strategy()) {
        let values = values_from(a, b);
        let orders: Vec<_> = visible_fields(&form, &values).iter().map(|f| f.order).collect();
        prop_assert!(orders.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn unconditioned_fields_always_visible(form in form_strategy(), a in value_strategy(), b in value_strategy()) {
        let values = values_from(a, b);
        let visible: Vec<_> = visible_fields(&form, &values).iter().map(|f| f.id.clone()).collect();
        for field in form.fields.iter().filter(|f| f.condition.is_none()) {
            prop_assert!(visible.contains(&field.id));
        }
    }

    #[test]
    fn and_display_matches_conjunction(
        first in condition_strategy(),
        second in condition_strategy(),
        a in value_strategy(),
        b in value_strategy(),
    ) {
        let values = values_from(a, b);
        let expected = evaluate_condition(&first, &values) && evaluate_condition(&second, &values);

        let show = ConditionalDisplay::show_when(ConditionLogic::And, vec![first.clone(), second.clone()]);
        let hide = ConditionalDisplay::hide_when(ConditionLogic::And, vec![first, second]);
        prop_assert_eq!(evaluate_display(&show, &values), expected);
        prop_assert_eq!(evaluate_display(&hide, &values), !expected);
    }

    #[test]
    fn validation_is_idempotent(form in form_strategy(), a in value_strategy(), b in value_strategy()) {
        let values = values_from(a, b);
        prop_assert_eq!(validate_submission(&form, &values), validate_submission(&form, &values));
    }

    #[test]
    fn filled_visible_fields_round_trip(form in form_strategy(), a in value_strategy(), b in value_strategy()) {
        let mut values = values_from(a, b);
        for field in &form.fields {
            values.insert(field.id.clone(), "terisi");
        }
        // fill every field, then keep only what ends up visible
        let visible: std::collections::HashSet<String> =
            visible_fields(&form, &values).iter().map(|f| f.id.clone()).collect();
        let expected = values.restricted_to(&visible);

        let data = validate_submission(&form, &values).into_result();
        prop_assert_eq!(data, Ok(expected));
    }
}
