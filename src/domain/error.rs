use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Email already taken: {email}")]
    EmailTaken { email: String },

    #[error("Password confirmation does not match")]
    PasswordMismatch,

    #[error("Old password is invalid")]
    InvalidOldPassword,

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Hashing error: {message}")]
    Hashing { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Fieldless failure kind, for callers that only need to branch on the reason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    EmailTaken,
    PasswordMismatch,
    InvalidOldPassword,
    Persistence,
    Hashing,
    Configuration,
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn email_taken(email: impl Into<String>) -> Self {
        Self::EmailTaken {
            email: email.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::EmailTaken { .. } => ErrorKind::EmailTaken,
            Self::PasswordMismatch => ErrorKind::PasswordMismatch,
            Self::InvalidOldPassword => ErrorKind::InvalidOldPassword,
            Self::Persistence { .. } => ErrorKind::Persistence,
            Self::Hashing { .. } => ErrorKind::Hashing,
            Self::Configuration { .. } => ErrorKind::Configuration,
        }
    }
}

impl ErrorKind {
    /// Stable label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::EmailTaken => "email_taken",
            Self::PasswordMismatch => "password_mismatch",
            Self::InvalidOldPassword => "invalid_old_password",
            Self::Persistence => "persistence_error",
            Self::Hashing => "hashing_error",
            Self::Configuration => "configuration_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("User 'abc' not found");
        assert_eq!(error.to_string(), "Not found: User 'abc' not found");
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_email_taken_error() {
        let error = DomainError::email_taken("ann@ex.com");
        assert_eq!(error.to_string(), "Email already taken: ann@ex.com");
        assert_eq!(error.kind(), ErrorKind::EmailTaken);
    }

    #[test]
    fn test_password_errors() {
        assert_eq!(
            DomainError::PasswordMismatch.to_string(),
            "Password confirmation does not match"
        );
        assert_eq!(
            DomainError::InvalidOldPassword.kind(),
            ErrorKind::InvalidOldPassword
        );
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(DomainError::persistence("down").kind().as_str(), "persistence_error");
        assert_eq!(DomainError::hashing("oom").kind().as_str(), "hashing_error");
    }
}
