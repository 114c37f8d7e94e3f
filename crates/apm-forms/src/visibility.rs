//! Field visibility
//!
//! Recomputed from scratch on every call: a later field may depend on an
//! earlier one, including one that is itself hidden. Values of hidden fields
//! stay in the mapping and still take part in evaluation.

use crate::condition::evaluate_display;
use crate::field::FieldDefinition;
use crate::form::FormDefinition;
use crate::value::FormValues;
use std::collections::HashSet;

/// A field without a condition is always visible
pub fn is_visible(field: &FieldDefinition, values: &FormValues) -> bool {
    field
        .condition
        .as_ref()
        .map_or(true, |display| evaluate_display(display, values))
}

/// Visible fields in ascending `order`
pub fn visible_fields<'a>(form: &'a FormDefinition, values: &FormValues) -> Vec<&'a FieldDefinition> {
    let visible: Vec<_> = form
        .ordered_fields()
        .into_iter()
        .filter(|field| is_visible(field, values))
        .collect();
    tracing::debug!(total = form.fields.len(), visible = visible.len(), "computed visible fields");
    visible
}

pub fn visible_field_ids(form: &FormDefinition, values: &FormValues) -> HashSet<String> {
    visible_fields(form, values)
        .into_iter()
        .map(|field| field.id.clone())
        .collect()
}
