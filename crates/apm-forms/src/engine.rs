//! Submission validation
//!
//! Two phases: work out which fields the submitter could see, then validate
//! only those. A hidden field can never block a submission, and the accepted
//! payload never carries values for fields that were not shown.

use crate::field::{FieldDefinition, FieldType};
use crate::form::FormDefinition;
use crate::rules::build_checker;
use crate::validator::{FormValidator, ValidationErrors};
use crate::value::{FieldValue, FormValues};
use crate::visibility::visible_field_ids;
use serde::Serialize;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Key under which an internal engine fault is reported
pub const FORM_ERROR_KEY: &str = "_form";

/// Message reported for an internal engine fault
pub const INTERNAL_ERROR_MESSAGE: &str = "Terjadi kesalahan validasi";

/// Outcome of validating one submission
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationResult {
    /// Accepted payload, restricted to the validated fields
    Valid { data: FormValues },
    /// First error per field
    Invalid { errors: ValidationErrors },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }

    pub fn data(&self) -> Option<&FormValues> {
        match self {
            ValidationResult::Valid { data } => Some(data),
            ValidationResult::Invalid { .. } => None,
        }
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            ValidationResult::Valid { .. } => None,
            ValidationResult::Invalid { errors } => Some(errors),
        }
    }

    pub fn into_result(self) -> Result<FormValues, ValidationErrors> {
        match self {
            ValidationResult::Valid { data } => Ok(data),
            ValidationResult::Invalid { errors } => Err(errors),
        }
    }

    fn internal_fault() -> Self {
        ValidationResult::Invalid {
            errors: ValidationErrors::single(FORM_ERROR_KEY, INTERNAL_ERROR_MESSAGE),
        }
    }
}

/// Validate a submission against the fields visible for these values
pub fn validate_submission(form: &FormDefinition, values: &FormValues) -> ValidationResult {
    guarded(|| {
        let visible = visible_field_ids(form, values);
        check(form, values, Some(&visible))
    })
}

/// Validate against an explicit visible set, or every field when `None`
pub fn validate_form_data(
    form: &FormDefinition,
    values: &FormValues,
    visible: Option<&HashSet<String>>,
) -> ValidationResult {
    guarded(|| check(form, values, visible))
}

/// Check a single value the way the full pass would
pub fn validate_field(field: &FieldDefinition, value: Option<&FieldValue>) -> Option<String> {
    if field.field_type == FieldType::Hidden {
        return None;
    }
    build_checker(field).check(value).err()
}

fn check(
    form: &FormDefinition,
    values: &FormValues,
    visible: Option<&HashSet<String>>,
) -> ValidationResult {
    let validator = FormValidator::build(form, visible);
    match validator.validate(values) {
        Ok(()) => {
            let accepted = match visible {
                Some(ids) => values.restricted_to(ids),
                None => values.restricted_to(&form.field_ids()),
            };
            tracing::debug!(checked = validator.len(), accepted = accepted.len(), "submission accepted");
            ValidationResult::Valid { data: accepted }
        }
        Err(errors) => {
            tracing::debug!(checked = validator.len(), errors = errors.len(), "submission rejected");
            ValidationResult::Invalid { errors }
        }
    }
}

// Collapses any fault inside the pass into the single `_form` error.
fn guarded(pass: impl FnOnce() -> ValidationResult) -> ValidationResult {
    catch_unwind(AssertUnwindSafe(pass)).unwrap_or_else(|_| {
        tracing::error!("form validation aborted by an internal fault");
        ValidationResult::internal_fault()
    })
}
