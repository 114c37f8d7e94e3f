//! APM Form Engine
//!
//! Dynamic registration forms for competitions (lomba) and expo events.
//! Administrators author a [`FormDefinition`] as JSON; this crate turns it
//! into a validator at submission time.
//!
//! ## Features
//! - Typed field vocabulary (text, select, checkbox, date, file, ...)
//! - Conditional show/hide logic evaluated against the current values
//! - Two-phase validation: visibility first, then only visible fields
//! - Base registration fields shared by every competition form
//! - Field template palette and authoring helpers
//! - Upload policy checks for file fields
//!
//! # Flow
//!
//! ```text
//! FormDefinition ──► visible_fields(values) ──► FormValidator::build(visible)
//!                                                      │
//!                         values ─────────────────────►│
//!                                                      ▼
//!                                  Valid { data } | Invalid { errors }
//! ```
//!
//! Everything here is a pure function of its inputs: no I/O, no shared
//! mutable state, safe to call from any number of request handlers.

pub mod condition;
pub mod engine;
pub mod error;
pub mod field;
pub mod form;
pub mod registration;
pub mod rules;
pub mod submission;
pub mod templates;
pub mod upload;
pub mod validator;
pub mod value;
pub mod visibility;

pub use condition::{
    evaluate_condition, evaluate_display, ConditionLogic, ConditionOperator, ConditionValue,
    ConditionalDisplay, FieldCondition,
};
pub use engine::{
    validate_field, validate_form_data, validate_submission, ValidationResult, FORM_ERROR_KEY,
    INTERNAL_ERROR_MESSAGE,
};
pub use error::{FormsError, Result};
pub use field::{FieldDefinition, FieldOption, FieldType, FieldValidation};
pub use form::{DefinitionIssue, FormDefinition, FormSettings, IssueKind};
pub use registration::{base_registration_form, validate_registration, Registration};
pub use submission::{FormSubmission, SubmissionMetadata};
pub use templates::{field_templates, FieldCategory, FieldTemplate};
pub use upload::UploadPolicy;
pub use validator::{FieldError, FormValidator, ValidationErrors};
pub use value::{FieldValue, FileHandle, FormValues};
pub use visibility::{is_visible, visible_field_ids, visible_fields};
