//! Visible command

use super::{load_form, load_values};
use crate::output::OutputFormat;
use apm_forms::visible_fields;
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled)]
struct FieldRow {
    order: i64,
    id: String,
    #[tabled(rename = "type")]
    field_type: String,
    label: String,
    required: bool,
}

pub fn handle(form: &Path, values: &Path, format: OutputFormat) -> Result<(), String> {
    let form = load_form(form)?;
    let values = load_values(values)?;

    let fields = visible_fields(&form, &values);
    let rows = fields
        .iter()
        .map(|field| FieldRow {
            order: field.order,
            id: field.id.clone(),
            field_type: field.field_type.to_string(),
            label: field.label.clone(),
            required: field.required,
        })
        .collect();
    format.print_rows(&fields, rows);
    Ok(())
}
