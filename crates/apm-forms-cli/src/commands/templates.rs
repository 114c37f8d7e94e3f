//! Templates command

use crate::output::OutputFormat;
use apm_forms::{field_templates, FieldTemplate};
use tabled::Tabled;

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "type")]
    field_type: String,
    label: String,
    icon: String,
    category: String,
    options: usize,
}

fn category_name(template: &FieldTemplate) -> String {
    serde_json::to_value(template.category)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_default()
}

pub fn handle(category: Option<&str>, format: OutputFormat) -> Result<(), String> {
    let templates: Vec<&FieldTemplate> = field_templates()
        .iter()
        .filter(|t| category.map_or(true, |c| category_name(t).eq_ignore_ascii_case(c)))
        .collect();

    if templates.is_empty() {
        if let Some(c) = category {
            return Err(format!(
                "Unknown category: {} (basic, contact, selection, file, datetime, special)",
                c
            ));
        }
    }

    let rows = templates
        .iter()
        .map(|t| TemplateRow {
            field_type: t.field_type.to_string(),
            label: t.label.clone(),
            icon: t.icon.clone(),
            category: category_name(t),
            options: t.defaults.options.len(),
        })
        .collect();
    format.print_rows(&templates, rows);
    Ok(())
}
