//! Upload policy
//!
//! File fields are not checked during submission validation; the upload
//! endpoint checks the file itself, before a handle is ever issued.

use crate::error::{FormsError, Result};
use crate::field::{FieldDefinition, FieldValidation};
use crate::value::FileHandle;

const MB: u64 = 1024 * 1024;

pub const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
pub const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];
pub const MAX_IMAGE_SIZE: u64 = 5 * MB;
pub const MAX_DOCUMENT_SIZE: u64 = 10 * MB;

/// Size and type limits for one upload
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadPolicy {
    /// Bytes; no limit when `None`
    pub max_size: Option<u64>,
    /// MIME types, `type/*` wildcards or `.ext` extensions; empty allows all
    pub allowed: Vec<String>,
}

impl UploadPolicy {
    pub fn from_validation(validation: &FieldValidation) -> Self {
        Self {
            max_size: validation.max_file_size,
            allowed: validation.allowed_file_types.clone().unwrap_or_default(),
        }
    }

    pub fn for_field(field: &FieldDefinition) -> Self {
        field
            .validation
            .as_ref()
            .map(Self::from_validation)
            .unwrap_or_default()
    }

    pub fn images() -> Self {
        Self {
            max_size: Some(MAX_IMAGE_SIZE),
            allowed: IMAGE_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn documents() -> Self {
        Self {
            max_size: Some(MAX_DOCUMENT_SIZE),
            allowed: DOCUMENT_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Policy the portal's generic upload endpoint applies, chosen by MIME type
    pub fn for_portal(file: &FileHandle) -> Result<Self> {
        let mime = file.mime_type.as_deref().unwrap_or_default();
        if IMAGE_TYPES.contains(&mime) {
            Ok(Self::images())
        } else if DOCUMENT_TYPES.contains(&mime) {
            Ok(Self::documents())
        } else {
            Err(FormsError::UploadRejected(
                "Invalid file type. Allowed: JPEG, PNG, GIF, WebP, PDF, DOC, DOCX".into(),
            ))
        }
    }

    pub fn accepts_type(&self, file: &FileHandle) -> bool {
        if self.allowed.is_empty() {
            return true;
        }
        let mime = file.mime_type.as_deref().unwrap_or_default().to_ascii_lowercase();
        let extension = file.extension();

        self.allowed.iter().any(|pattern| {
            let pattern = pattern.trim().to_ascii_lowercase();
            if pattern.starts_with('.') {
                extension.as_deref() == Some(pattern.as_str())
            } else if let Some(family) = pattern.strip_suffix("/*") {
                mime.split_once('/').map_or(false, |(kind, _)| kind == family)
            } else {
                mime == pattern
            }
        })
    }

    pub fn check(&self, file: &FileHandle) -> Result<()> {
        if !self.accepts_type(file) {
            return Err(FormsError::UploadRejected(format!(
                "Invalid file type. Allowed: {}",
                self.allowed.join(", ")
            )));
        }
        if let Some(max) = self.max_size {
            if file.size > max {
                return Err(FormsError::UploadRejected(format!(
                    "File too large. Max size: {}MB",
                    max / MB
                )));
            }
        }
        Ok(())
    }
}
