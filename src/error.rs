//! Error types for the booking service.

use thiserror::Error;

use crate::config::ConfigurationError;
use crate::messaging::MessagingError;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Messaging error: {0}")]
    Messaging(#[from] MessagingError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl BookingError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type BookingResult<T> = std::result::Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let config_err = ConfigurationError::missing_required_field("queue_name", "settings");
        let err: BookingError = config_err.into();
        assert!(matches!(err, BookingError::Configuration(_)));
        assert!(err.to_string().contains("queue_name"));

        let err: BookingError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, BookingError::Database(_)));
    }

    #[test]
    fn test_validation_display() {
        let err = BookingError::validation("unknown booking status 'late'");
        assert_eq!(
            err.to_string(),
            "Validation error: unknown booking status 'late'"
        );
    }
}
