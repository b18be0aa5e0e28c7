use thiserror::Error;

use super::validator::Validator;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("user with specified email already exists")]
    UserExists,

    #[error("specified user does not exist")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    FailedValidation(Validator),

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Expected business conditions, as opposed to infrastructure faults
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::UserExists | Self::UserNotFound | Self::FailedValidation(_)
        )
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        Self::storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_errors() {
        assert!(DomainError::UserExists.is_expected());
        assert!(DomainError::UserNotFound.is_expected());
        assert!(DomainError::FailedValidation(Validator::new()).is_expected());
        assert!(!DomainError::storage("connection reset").is_expected());
        assert!(!DomainError::internal("boom").is_expected());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DomainError::storage("pool timed out").to_string(),
            "Storage error: pool timed out"
        );
        assert_eq!(
            DomainError::UserExists.to_string(),
            "user with specified email already exists"
        );
    }
}
