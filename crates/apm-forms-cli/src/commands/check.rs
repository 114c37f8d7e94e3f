//! Check command

use super::load_form;
use crate::output::{status, OutputFormat};
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled)]
struct IssueRow {
    kind: String,
    field: String,
    message: String,
}

/// Returns false when the form could not be saved as is
pub fn handle(form: &Path, format: OutputFormat) -> Result<bool, String> {
    let form = load_form(form)?;
    let issues = form.lint();
    let savable = !issues.iter().any(|issue| issue.kind.is_blocking());

    if format.is_table() {
        let summary = format!("{} field(s), {} issue(s)", form.fields.len(), issues.len());
        status(savable, &summary);
    }

    let rows = issues
        .iter()
        .map(|issue| IssueRow {
            kind: format!("{:?}", issue.kind),
            field: issue.field_id.clone().unwrap_or_default(),
            message: issue.message.clone(),
        })
        .collect();
    format.print_rows(&issues, rows);
    Ok(savable)
}
