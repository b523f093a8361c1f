use serde::{Deserialize, Serialize};
use crate::core::email::ValidationResult;
use crate::models::domain::UserId;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Response for the standalone email validation query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailValidationResponse {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

impl From<ValidationResult> for EmailValidationResponse {
    fn from(result: ValidationResult) -> Self {
        match result {
            ValidationResult::Valid => Self {
                is_valid: true,
                error: None,
                user_id: None,
            },
            ValidationResult::InvalidSyntax => Self {
                is_valid: false,
                error: Some("Invalid email".to_string()),
                user_id: None,
            },
            ValidationResult::DuplicateEmail(owner) => Self {
                is_valid: false,
                error: Some("Duplicate email".to_string()),
                user_id: Some(owner),
            },
        }
    }
}
