//! Form validator
//!
//! Built from a definition (optionally restricted to the currently visible
//! fields) and run against a value mapping. Errors come back in field order,
//! first message per field.

use crate::field::{FieldDefinition, FieldType};
use crate::form::FormDefinition;
use crate::rules::{build_checker, FieldChecker};
use crate::value::FormValues;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Error reported for one field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field_id: String,
    pub message: String,
}

/// Per-field errors in field order
///
/// Serializes as a JSON object `{ "<field id>": "<message>" }`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single error under one key
    pub fn single(field_id: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field_id, message);
        errors
    }

    /// Keeps the first message reported for a field
    pub fn insert(&mut self, field_id: impl Into<String>, message: impl Into<String>) {
        let field_id = field_id.into();
        if !self.contains(&field_id) {
            self.0.push(FieldError {
                field_id,
                message: message.into(),
            });
        }
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        for error in other.0 {
            self.insert(error.field_id, error.message);
        }
    }

    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field_id == field_id)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.0.iter().any(|e| e.field_id == field_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|e| (e.field_id.clone(), e.message.clone()))
            .collect()
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for error in &self.0 {
            map.serialize_entry(&error.field_id, &error.message)?;
        }
        map.end()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<_> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field_id, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Executable validator for one form
///
/// Holds no state beyond what it was built from; the same inputs always
/// build an equivalent validator.
#[derive(Clone, Debug)]
pub struct FormValidator {
    checkers: Vec<(String, FieldChecker)>,
}

impl FormValidator {
    /// Build checkers for every non-hidden field, or only those in `visible`
    pub fn build(form: &FormDefinition, visible: Option<&HashSet<String>>) -> Self {
        let checkers = form
            .ordered_fields()
            .into_iter()
            .filter(|field| field.field_type != FieldType::Hidden)
            .filter(|field| visible.map_or(true, |ids| ids.contains(&field.id)))
            .map(|field: &FieldDefinition| (field.id.clone(), build_checker(field)))
            .collect();
        Self { checkers }
    }

    /// Ids this validator checks, in order
    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.checkers.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    pub fn validate(&self, values: &FormValues) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (id, checker) in &self.checkers {
            if let Err(message) = checker.check(values.get(id)) {
                errors.insert(id.clone(), message);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
