//! CLI Commands

pub mod check;
pub mod config;
pub mod templates;
pub mod validate;
pub mod visible;

use apm_forms::{FieldValue, FormDefinition, FormValues};
use std::fs;
use std::path::Path;

/// Read a JSON or YAML document, chosen by extension
fn read_document(path: &Path) -> Result<serde_json::Value, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    }
}

pub fn load_form(path: &Path) -> Result<FormDefinition, String> {
    let raw = read_document(path)?;
    let form: FormDefinition = serde_json::from_value(raw).map_err(|e| e.to_string())?;
    tracing::debug!(path = %path.display(), fields = form.fields.len(), "loaded form");
    Ok(form)
}

pub fn load_values(path: &Path) -> Result<FormValues, String> {
    let raw = read_document(path)?;
    FormValues::from_json(&raw).map_err(|e| e.to_string())
}

/// Compact single-line rendering for table cells
pub fn display_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::List(items) => items.join(", "),
        FieldValue::File(file) => file.name.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
