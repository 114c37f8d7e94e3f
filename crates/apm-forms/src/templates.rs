//! Field template palette
//!
//! The builder offers one template per field type. The palette is built
//! once on first use and never changes afterwards.

use crate::field::{FieldDefinition, FieldOption, FieldType, FieldValidation};
use serde::Serialize;
use std::sync::OnceLock;

/// Faculties offered by the `fakultas` field
pub const FAKULTAS: &[(&str, &str)] = &[
    ("ft", "Fakultas Teknik"),
    ("fk", "Fakultas Kedokteran"),
    ("fh", "Fakultas Hukum"),
    ("feb", "Fakultas Ekonomika dan Bisnis"),
    ("fisip", "Fakultas Ilmu Sosial dan Ilmu Politik"),
    ("fib", "Fakultas Ilmu Budaya"),
    ("fpsi", "Fakultas Psikologi"),
    ("fpp", "Fakultas Peternakan dan Pertanian"),
    ("fsm", "Fakultas Sains dan Matematika"),
    ("fkm", "Fakultas Kesehatan Masyarakat"),
    ("fpi", "Fakultas Perikanan dan Ilmu Kelautan"),
    ("sv", "Sekolah Vokasi"),
];

pub const NIM_PATTERN: &str = "^[0-9A-Za-z]+$";
pub const NIM_PATTERN_MESSAGE: &str = "NIM hanya boleh berisi huruf dan angka";

const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

pub fn fakultas_options() -> Vec<FieldOption> {
    FAKULTAS
        .iter()
        .map(|(value, label)| FieldOption::new(*value, *label))
        .collect()
}

/// NIM constraints: 8 to 20 letters and digits
pub fn nim_validation() -> FieldValidation {
    FieldValidation {
        min_length: Some(8),
        max_length: Some(20),
        pattern: Some(NIM_PATTERN.into()),
        pattern_message: Some(NIM_PATTERN_MESSAGE.into()),
        ..Default::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    Basic,
    Contact,
    Selection,
    File,
    Datetime,
    Special,
}

/// Values a new field starts with
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

/// Palette entry
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTemplate {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub icon: String,
    pub category: FieldCategory,
    pub defaults: TemplateDefaults,
}

impl FieldTemplate {
    fn new(field_type: FieldType, label: &str, icon: &str, category: FieldCategory) -> Self {
        Self {
            field_type,
            label: label.into(),
            icon: icon.into(),
            category,
            defaults: TemplateDefaults::default(),
        }
    }

    fn placeholder(mut self, placeholder: &str) -> Self {
        self.defaults.placeholder = Some(placeholder.into());
        self
    }

    fn options(mut self, options: Vec<FieldOption>) -> Self {
        self.defaults.options = options;
        self
    }

    fn validation(mut self, validation: FieldValidation) -> Self {
        self.defaults.validation = Some(validation);
        self
    }

    fn default_label(mut self, label: &str) -> Self {
        self.defaults.label = Some(label.into());
        self
    }
}

/// The full palette, in display order
pub fn field_templates() -> &'static [FieldTemplate] {
    static TEMPLATES: OnceLock<Vec<FieldTemplate>> = OnceLock::new();
    TEMPLATES.get_or_init(|| {
        use FieldCategory::*;
        let sample = || vec![FieldOption::new("option1", "Option 1")];
        vec![
            FieldTemplate::new(FieldType::Text, "Text Input", "type", Basic).placeholder("Masukkan teks..."),
            FieldTemplate::new(FieldType::Textarea, "Text Area", "align-left", Basic)
                .placeholder("Masukkan teks panjang..."),
            FieldTemplate::new(FieldType::Number, "Number", "hash", Basic).placeholder("0"),
            FieldTemplate::new(FieldType::Email, "Email", "mail", Contact).placeholder("email@example.com"),
            FieldTemplate::new(FieldType::Phone, "Phone/WhatsApp", "phone", Contact).placeholder("08xxxxxxxxxx"),
            FieldTemplate::new(FieldType::Url, "URL", "link", Contact).placeholder("https://..."),
            FieldTemplate::new(FieldType::Select, "Dropdown", "chevron-down", Selection).options(sample()),
            FieldTemplate::new(FieldType::Radio, "Radio Buttons", "circle", Selection).options(sample()),
            FieldTemplate::new(FieldType::Checkbox, "Checkboxes", "check-square", Selection).options(sample()),
            FieldTemplate::new(FieldType::Multiselect, "Multi Select", "list", Selection).options(sample()),
            FieldTemplate::new(FieldType::File, "File Upload", "upload", File).validation(FieldValidation {
                max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
                allowed_file_types: Some(vec!["image/*".into(), "application/pdf".into()]),
                ..Default::default()
            }),
            FieldTemplate::new(FieldType::Date, "Date", "calendar", Datetime),
            FieldTemplate::new(FieldType::Time, "Time", "clock", Datetime),
            FieldTemplate::new(FieldType::Datetime, "Date & Time", "calendar-clock", Datetime),
            FieldTemplate::new(FieldType::Nim, "NIM", "id-card", Special)
                .default_label("NIM")
                .placeholder("Masukkan NIM")
                .validation(nim_validation()),
            FieldTemplate::new(FieldType::Fakultas, "Fakultas", "building", Special)
                .default_label("Fakultas")
                .options(fakultas_options()),
            FieldTemplate::new(FieldType::Prodi, "Program Studi", "graduation-cap", Special)
                .default_label("Program Studi")
                .placeholder("Masukkan program studi"),
        ]
    })
}

pub fn template_for(field_type: &FieldType) -> Option<&'static FieldTemplate> {
    field_templates().iter().find(|t| &t.field_type == field_type)
}

impl FieldDefinition {
    /// New optional field from a palette entry, with a fresh unique id
    pub fn from_template(template: &FieldTemplate, order: i64) -> Self {
        let id = format!("field_{}", uuid::Uuid::new_v4().simple());
        let label = template
            .defaults
            .label
            .clone()
            .unwrap_or_else(|| template.label.clone());
        let mut field = FieldDefinition::new(id, template.field_type.clone(), label).with_order(order);
        field.placeholder = template.defaults.placeholder.clone();
        field.options = template.defaults.options.clone();
        field.validation = template.defaults.validation.clone();
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_covers_every_visible_type() {
        let palette = field_templates();
        assert_eq!(palette.len(), 17);
        assert!(template_for(&FieldType::Hidden).is_none());
        assert!(palette
            .iter()
            .filter(|t| t.field_type.is_selection())
            .all(|t| !t.defaults.options.is_empty()));
    }

    #[test]
    fn test_from_template_applies_defaults() {
        let nim = template_for(&FieldType::Nim).unwrap();
        let field = FieldDefinition::from_template(nim, 4);
        assert_eq!(field.label, "NIM");
        assert_eq!(field.order, 4);
        assert!(!field.required);
        assert_eq!(field.validation.as_ref().and_then(|v| v.min_length), Some(8));

        let other = FieldDefinition::from_template(nim, 5);
        assert_ne!(field.id, other.id);
    }

    #[test]
    fn test_fakultas_template_lists_every_faculty() {
        let field = FieldDefinition::from_template(template_for(&FieldType::Fakultas).unwrap(), 0);
        assert_eq!(field.options.len(), FAKULTAS.len());
        assert_eq!(field.options[0].label, "Fakultas Teknik");
    }
}
