use serde::{Deserialize, Serialize};

use crate::domain::field_errors::FieldErrors;

/// Body of every `/api/contact` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionResult {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: "Email sent successfully!".into(),
            errors: None,
            error: None,
        }
    }

    pub fn invalid(errors: FieldErrors) -> Self {
        Self {
            success: false,
            message: "Invalid form data.".into(),
            errors: Some(errors),
            error: None,
        }
    }

    pub fn delivery_failed(detail: String) -> Self {
        Self {
            success: false,
            message: "Failed to send email.".into(),
            errors: None,
            error: Some(detail),
        }
    }

    pub fn unexpected() -> Self {
        Self {
            success: false,
            message: "Something went wrong.".into(),
            errors: None,
            error: None,
        }
    }
}
