//! Form definitions
//!
//! A form is stored as JSON next to the competition or expo it belongs to.
//! The editing operations here mirror what the admin builder does to it.

use crate::error::{FormsError, Result};
use crate::field::{FieldDefinition, FieldType};
use crate::templates::FieldTemplate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Submission behaviour of a form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormSettings {
    pub submit_button_text: String,
    pub success_message: String,
    pub allow_multiple_submissions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_confirmation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_captcha: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_handler: Option<String>,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            submit_button_text: "Daftar".into(),
            success_message: "Pendaftaran berhasil! Terima kasih telah mendaftar.".into(),
            allow_multiple_submissions: false,
            redirect_url: None,
            show_confirmation: Some(true),
            confirmation_message: Some("Apakah Anda yakin ingin mengirim formulir ini?".into()),
            enable_captcha: None,
            submit_handler: None,
        }
    }
}

/// Ordered collection of fields plus submission settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub fields: Vec<FieldDefinition>,
    pub settings: FormSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

/// Kind of problem found by [`FormDefinition::lint`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    NoFields,
    DuplicateId,
    MissingOptions,
    InvalidPattern,
    UnknownConditionField,
    UnknownFieldType,
    UnknownOperator,
}

impl IssueKind {
    /// Issues that block saving the definition
    pub fn is_blocking(&self) -> bool {
        matches!(self, IssueKind::NoFields | IssueKind::DuplicateId)
    }
}

/// Authoring problem in a definition
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DefinitionIssue {
    pub kind: IssueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
    pub message: String,
}

impl DefinitionIssue {
    fn new(kind: IssueKind, field_id: Option<&str>, message: String) -> Self {
        Self {
            kind,
            field_id: field_id.map(String::from),
            message,
        }
    }
}

impl FormDefinition {
    /// New form with default settings and no fields
    pub fn empty() -> Self {
        Self {
            fields: Vec::new(),
            settings: FormSettings::default(),
            version: Some(1),
        }
    }

    pub fn with_fields(fields: Vec<FieldDefinition>) -> Self {
        Self {
            fields,
            ..Self::empty()
        }
    }

    /// Parse a stored definition
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fields sorted by `order`; ties keep their list position
    pub fn ordered_fields(&self) -> Vec<&FieldDefinition> {
        let mut fields: Vec<_> = self.fields.iter().collect();
        fields.sort_by_key(|field| field.order);
        fields
    }

    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn field_ids(&self) -> HashSet<String> {
        self.fields.iter().map(|field| field.id.clone()).collect()
    }

    pub fn add_field(&mut self, field: FieldDefinition) {
        self.fields.push(field);
    }

    /// Append a field built from a palette template, ordered last
    pub fn add_from_template(&mut self, template: &FieldTemplate) -> &FieldDefinition {
        let order = self.fields.len() as i64;
        self.fields.push(FieldDefinition::from_template(template, order));
        &self.fields[self.fields.len() - 1]
    }

    pub fn replace_field(&mut self, index: usize, field: FieldDefinition) -> Result<()> {
        let slot = self
            .fields
            .get_mut(index)
            .ok_or_else(|| FormsError::FieldNotFound(format!("index {index}")))?;
        *slot = field;
        Ok(())
    }

    pub fn remove_field(&mut self, index: usize) -> Result<FieldDefinition> {
        if index >= self.fields.len() {
            return Err(FormsError::FieldNotFound(format!("index {index}")));
        }
        Ok(self.fields.remove(index))
    }

    /// Swap with the previous field. Returns false at the top.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.fields.len() {
            return false;
        }
        self.fields.swap(index, index - 1);
        self.renumber();
        true
    }

    /// Swap with the next field. Returns false at the bottom.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.fields.len() {
            return false;
        }
        self.fields.swap(index, index + 1);
        self.renumber();
        true
    }

    fn renumber(&mut self) {
        for (position, field) in self.fields.iter_mut().enumerate() {
            field.order = position as i64;
        }
    }

    /// Authoring problems. None of these stop validation from running.
    pub fn lint(&self) -> Vec<DefinitionIssue> {
        let mut issues = Vec::new();

        if self.fields.is_empty() {
            issues.push(DefinitionIssue::new(
                IssueKind::NoFields,
                None,
                "Form harus memiliki minimal 1 field".into(),
            ));
        }

        let ids = self.field_ids();
        let mut seen = HashSet::new();
        for field in &self.fields {
            let id = Some(field.id.as_str());

            if !seen.insert(field.id.as_str()) {
                issues.push(DefinitionIssue::new(
                    IssueKind::DuplicateId,
                    id,
                    format!("Field '{}' digunakan lebih dari sekali", field.id),
                ));
            }

            if let FieldType::Other(name) = &field.field_type {
                issues.push(DefinitionIssue::new(
                    IssueKind::UnknownFieldType,
                    id,
                    format!("Tipe field '{name}' tidak dikenal"),
                ));
            }

            if field.field_type.is_selection() && field.options.is_empty() {
                issues.push(DefinitionIssue::new(
                    IssueKind::MissingOptions,
                    id,
                    format!("Field '{}' harus memiliki minimal 1 opsi", field.label),
                ));
            }

            if let Some(pattern) = field.validation.as_ref().and_then(|v| v.pattern.as_deref()) {
                if let Err(e) = regex::Regex::new(pattern) {
                    issues.push(DefinitionIssue::new(
                        IssueKind::InvalidPattern,
                        id,
                        format!("Pola validasi '{}' tidak valid: {e}", field.label),
                    ));
                }
            }

            for condition in field.condition.iter().flat_map(|c| &c.conditions) {
                if !ids.contains(&condition.field) {
                    issues.push(DefinitionIssue::new(
                        IssueKind::UnknownConditionField,
                        id,
                        format!(
                            "Kondisi pada '{}' merujuk field yang tidak ada: {}",
                            field.label, condition.field
                        ),
                    ));
                }
                if let crate::condition::ConditionOperator::Other(name) = &condition.operator {
                    issues.push(DefinitionIssue::new(
                        IssueKind::UnknownOperator,
                        id,
                        format!("Operator '{name}' tidak dikenal"),
                    ));
                }
            }
        }

        issues
    }

    /// Reject a definition the builder must not save
    pub fn ensure_savable(&self) -> Result<()> {
        match self.lint().into_iter().find(|issue| issue.kind.is_blocking()) {
            Some(issue) => Err(FormsError::InvalidDefinition(issue.message)),
            None => Ok(()),
        }
    }
}

impl Default for FormDefinition {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{ConditionLogic, ConditionalDisplay, FieldCondition};
    use crate::field::FieldValidation;
    use crate::templates::field_templates;

    fn text(id: &str) -> FieldDefinition {
        FieldDefinition::new(id, FieldType::Text, id.to_uppercase())
    }

    #[test]
    fn test_from_json_requires_fields_and_settings() {
        assert!(FormDefinition::from_json(r#"{"fields": [], "settings": {}}"#).is_ok());
        assert!(matches!(
            FormDefinition::from_json(r#"{"fields": {}, "settings": {}}"#),
            Err(FormsError::Decode(_))
        ));
        assert!(FormDefinition::from_json(r#"{"fields": []}"#).is_err());
    }

    #[test]
    fn test_settings_defaults_fill_missing_keys() {
        let form = FormDefinition::from_json(r#"{"fields": [], "settings": {"submitButtonText": "Kirim"}}"#)
            .unwrap();
        assert_eq!(form.settings.submit_button_text, "Kirim");
        assert!(!form.settings.allow_multiple_submissions);
    }

    #[test]
    fn test_move_renumbers_orders() {
        let mut form = FormDefinition::with_fields(vec![
            text("a").with_order(10),
            text("b").with_order(20),
            text("c").with_order(30),
        ]);
        assert!(form.move_up(2));
        let ids: Vec<_> = form.fields.iter().map(|f| (f.id.as_str(), f.order)).collect();
        assert_eq!(ids, vec![("a", 0), ("c", 1), ("b", 2)]);
        assert!(!form.move_up(0));
        assert!(!form.move_down(2));
    }

    #[test]
    fn test_replace_and_remove_check_bounds() {
        let mut form = FormDefinition::with_fields(vec![text("a")]);
        assert!(form.replace_field(0, text("z")).is_ok());
        assert_eq!(form.fields[0].id, "z");
        assert!(matches!(form.remove_field(3), Err(FormsError::FieldNotFound(_))));
        assert_eq!(form.remove_field(0).unwrap().id, "z");
    }

    #[test]
    fn test_add_from_template_orders_last() {
        let mut form = FormDefinition::with_fields(vec![text("a")]);
        let template = &field_templates()[0];
        let added = form.add_from_template(template);
        assert_eq!(added.order, 1);
        assert!(added.id.starts_with("field_"));
    }

    #[test]
    fn test_lint_findings() {
        let form = FormDefinition::with_fields(vec![
            text("a"),
            text("a"),
            FieldDefinition::new("s", FieldType::Radio, "Pilihan"),
            text("p").with_validation(FieldValidation {
                pattern: Some("([".into()),
                ..Default::default()
            }),
            text("q").with_condition(ConditionalDisplay::show_when(
                ConditionLogic::And,
                vec![FieldCondition::new("ghost", "sometimes")],
            )),
        ]);
        let kinds: Vec<_> = form.lint().into_iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::DuplicateId,
                IssueKind::MissingOptions,
                IssueKind::InvalidPattern,
                IssueKind::UnknownConditionField,
                IssueKind::UnknownOperator,
            ]
        );
        assert!(matches!(form.ensure_savable(), Err(FormsError::InvalidDefinition(_))));
    }

    #[test]
    fn test_empty_form_cannot_be_saved() {
        let err = FormDefinition::empty().ensure_savable().unwrap_err();
        assert_eq!(err.to_string(), "invalid form definition: Form harus memiliki minimal 1 field");
    }
}
