//! Base registration flow
//!
//! Every competition and expo registration collects the same six core fields
//! before anything from the event's own form. Core fields are validated on
//! their own. The custom form's conditions see every submitted value, but it
//! only validates and keeps the remaining keys.

use crate::engine::{validate_form_data, validate_submission};
use crate::field::{FieldDefinition, FieldType, FieldValidation};
use crate::form::FormDefinition;
use crate::templates::nim_validation;
use crate::validator::ValidationErrors;
use crate::value::FormValues;
use crate::visibility::visible_field_ids;
use serde::Serialize;

/// Ids of the core registration fields
pub const BASE_REGISTRATION_FIELDS: [&str; 6] = ["nama", "nim", "email", "whatsapp", "fakultas", "prodi"];

/// The core fields as a form of their own
pub fn base_registration_form() -> FormDefinition {
    let fields = vec![
        FieldDefinition::new("nama", FieldType::Text, "Nama").required().with_validation(FieldValidation {
            min_length: Some(2),
            ..Default::default()
        }),
        FieldDefinition::new("nim", FieldType::Nim, "NIM").required().with_validation(nim_validation()),
        FieldDefinition::new("email", FieldType::Email, "Email").required(),
        FieldDefinition::new("whatsapp", FieldType::Text, "Nomor WhatsApp")
            .required()
            .with_validation(FieldValidation {
                min_length: Some(10),
                min_length_message: Some("Nomor WhatsApp minimal 10 digit".into()),
                max_length: Some(15),
                max_length_message: Some("Nomor WhatsApp maksimal 15 digit".into()),
                pattern: Some("^[0-9+]+$".into()),
                pattern_message: Some("Nomor WhatsApp tidak valid".into()),
                ..Default::default()
            }),
        FieldDefinition::new("fakultas", FieldType::Text, "Fakultas").required(),
        FieldDefinition::new("prodi", FieldType::Prodi, "Program Studi").required(),
    ];

    let count = fields.len() as i64;
    let fields = fields
        .into_iter()
        .enumerate()
        .map(|(position, field)| field.with_order(position as i64 - count))
        .collect();
    FormDefinition::with_fields(fields)
}

impl FormDefinition {
    /// Core fields first, then this form's fields. A custom field with a
    /// core id replaces the core one.
    pub fn merged_with_base(&self) -> FormDefinition {
        let custom_ids = self.field_ids();
        let mut fields: Vec<_> = base_registration_form()
            .fields
            .into_iter()
            .filter(|field| !custom_ids.contains(&field.id))
            .collect();
        fields.extend(self.fields.iter().cloned());
        FormDefinition {
            fields,
            settings: self.settings.clone(),
            version: self.version,
        }
    }
}

/// Accepted registration, split the way it is stored
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Registration {
    pub base: FormValues,
    pub custom: FormValues,
}

/// Validate core fields and, when the event has one, its custom form
pub fn validate_registration(
    custom_form: Option<&FormDefinition>,
    values: &FormValues,
) -> Result<Registration, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let base = validate_submission(&base_registration_form(), &values.only(&BASE_REGISTRATION_FIELDS))
        .into_result()
        .unwrap_or_else(|e| {
            errors.extend(e);
            FormValues::new()
        });

    let custom = match custom_form {
        Some(form) => {
            // conditions may reference core fields
            let visible = visible_field_ids(form, values);
            validate_form_data(form, &values.without(&BASE_REGISTRATION_FIELDS), Some(&visible))
                .into_result()
                .unwrap_or_else(|e| {
                    errors.extend(e);
                    FormValues::new()
                })
        }
        None => FormValues::new(),
    };

    if errors.is_empty() {
        Ok(Registration { base, custom })
    } else {
        Err(errors)
    }
}
