//! Validate command

use super::{display_value, load_form, load_values};
use crate::output::{status, OutputFormat};
use apm_forms::{validate_registration, validate_submission, FormValues, ValidationErrors, ValidationResult};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled)]
struct ValueRow {
    field: String,
    value: String,
}

#[derive(Tabled)]
struct ErrorRow {
    field: String,
    message: String,
}

fn value_rows(values: &FormValues) -> Vec<ValueRow> {
    values
        .iter()
        .map(|(id, value)| ValueRow {
            field: id.to_string(),
            value: display_value(value),
        })
        .collect()
}

fn error_rows(errors: &ValidationErrors) -> Vec<ErrorRow> {
    errors
        .iter()
        .map(|e| ErrorRow {
            field: e.field_id.clone(),
            message: e.message.clone(),
        })
        .collect()
}

fn report_errors<T: Serialize>(payload: &T, errors: &ValidationErrors, format: OutputFormat) {
    if format.is_table() {
        status(false, &format!("{} field(s) rejected", errors.len()));
    }
    format.print_rows(payload, error_rows(errors));
}

/// Returns whether the submission was accepted
pub fn handle(form: Option<&Path>, values: &Path, registration: bool, format: OutputFormat) -> Result<bool, String> {
    let form = form.map(load_form).transpose()?;
    let values = load_values(values)?;

    if registration {
        return match validate_registration(form.as_ref(), &values) {
            Ok(accepted) => {
                if format.is_table() {
                    status(true, "Registration accepted");
                    let mut rows = value_rows(&accepted.base);
                    rows.extend(value_rows(&accepted.custom));
                    format.print_rows(&accepted, rows);
                } else {
                    format.print(&accepted);
                }
                Ok(true)
            }
            Err(errors) => {
                let payload = ValidationResult::Invalid { errors: errors.clone() };
                report_errors(&payload, &errors, format);
                Ok(false)
            }
        };
    }

    let form = form.ok_or("--form is required without --registration")?;
    let result = validate_submission(&form, &values);
    match &result {
        ValidationResult::Valid { data } => {
            if format.is_table() {
                status(true, "Submission accepted");
            }
            format.print_rows(&result, value_rows(data));
        }
        ValidationResult::Invalid { errors } => report_errors(&result, errors, format),
    }
    Ok(result.is_valid())
}
