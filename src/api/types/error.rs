//! API error types and the domain-to-HTTP failure mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::domain::DomainError;

/// Error categories reported in the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    PermissionError,
    ConflictError,
    UnprocessableEntityError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::PermissionError => write!(f, "permission_error"),
            Self::ConflictError => write!(f, "conflict_error"),
            Self::UnprocessableEntityError => write!(f, "unprocessable_entity_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(
        status: StatusCode,
        error_type: ApiErrorType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    param: None,
                    code: None,
                },
            },
        }
    }

    /// Add parameter info
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    /// Add error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, ApiErrorType::PermissionError, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, ApiErrorType::ConflictError, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiErrorType::UnprocessableEntityError,
            message,
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::NotFound { .. } => {
                Self::unprocessable("Unknown user").with_code("UNPROCESSABLE_ENTITY")
            }
            DomainError::EmailTaken { .. } => {
                Self::conflict("Email already exist")
                    .with_param("email")
                    .with_code("EMAIL_ALREADY_TAKEN")
            }
            DomainError::PasswordMismatch => {
                Self::forbidden("Invalid Confirm Password").with_code("INVALID_PASSWORD")
            }
            DomainError::InvalidOldPassword => {
                Self::forbidden("Invalid Old Password")
                    .with_param("old_password")
                    .with_code("INVALID_PASSWORD")
            }
            DomainError::Persistence { .. }
            | DomainError::Hashing { .. }
            | DomainError::Configuration { .. } => {
                tracing::error!(error = %err, "Request failed with internal error");
                Self::internal("Internal server error").with_code("SERVER_ERROR")
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let param = errors
            .field_errors()
            .keys()
            .min()
            .map(|field| field.to_string());

        let mut err = Self::bad_request(format!("Invalid request: {}", errors))
            .with_code("VALIDATION_ERROR");

        if let Some(param) = param {
            err = err.with_param(param);
        }

        err
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_with_param() {
        let err = ApiError::bad_request("Invalid value")
            .with_param("email")
            .with_code("VALIDATION_ERROR");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.param, Some("email".to_string()));
        assert_eq!(err.response.error.code, Some("VALIDATION_ERROR".to_string()));
    }

    #[test]
    fn test_not_found_maps_to_unknown_user() {
        let api_err: ApiError = DomainError::not_found("User 'x' not found").into();

        assert_eq!(api_err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api_err.response.error.message, "Unknown user");
    }

    #[test]
    fn test_credential_failures_mapping() {
        let taken: ApiError = DomainError::email_taken("ann@ex.com").into();
        assert_eq!(taken.status, StatusCode::CONFLICT);
        assert_eq!(taken.response.error.code.as_deref(), Some("EMAIL_ALREADY_TAKEN"));

        let mismatch: ApiError = DomainError::PasswordMismatch.into();
        assert_eq!(mismatch.status, StatusCode::FORBIDDEN);
        assert_eq!(mismatch.response.error.code.as_deref(), Some("INVALID_PASSWORD"));

        let old: ApiError = DomainError::InvalidOldPassword.into();
        assert_eq!(old.status, StatusCode::FORBIDDEN);
        assert_eq!(old.response.error.message, "Invalid Old Password");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let api_err: ApiError = DomainError::persistence("connection refused to 10.0.0.5").into();

        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api_err.response.error.message.contains("10.0.0.5"));

        let hashing: ApiError = DomainError::hashing("oom").into();
        assert_eq!(hashing.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::conflict("Email already exist").with_code("EMAIL_ALREADY_TAKEN");
        let json = serde_json::to_string(&err.response).unwrap();

        assert!(json.contains("\"type\":\"conflict_error\""));
        assert!(json.contains("EMAIL_ALREADY_TAKEN"));
        assert!(!json.contains("param"));
    }
}
