//! Accepted submissions

use crate::engine::validate_submission;
use crate::form::FormDefinition;
use crate::validator::ValidationErrors;
use crate::value::FormValues;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMetadata {
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_version: Option<u32>,
}

/// Validated payload ready to be stored
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub data: FormValues,
    pub metadata: SubmissionMetadata,
}

impl FormSubmission {
    /// Validate `values` and stamp the accepted payload
    pub fn accept(form: &FormDefinition, values: &FormValues) -> Result<Self, ValidationErrors> {
        let data = validate_submission(form, values).into_result()?;
        Ok(Self {
            data,
            metadata: SubmissionMetadata {
                submitted_at: Utc::now(),
                user_agent: None,
                ip_address: None,
                form_version: form.version,
            },
        })
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.metadata.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.metadata.ip_address = Some(ip_address.into());
        self
    }
}
