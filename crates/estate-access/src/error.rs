//! Error types for estate-access.
//!
//! This module defines all error types used throughout the crate, providing
//! detailed context for debugging and user-facing messages for the CLI.

use std::path::PathBuf;
use thiserror::Error;

use crate::resident::FieldError;

/// The main error type for estate-access operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Authentication Errors ===
    /// The supplied credentials did not match.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The command requires a logged-in user.
    #[error("not logged in: run `estatectl login` first")]
    NotAuthenticated,

    // === Record Errors ===
    /// No resident exists with the given id.
    #[error("Resident not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// Submitted resident data failed validation.
    #[error("validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// An unrecognized access type was supplied.
    #[error("unknown access type '{0}': expected Resident, Visitor, or Staff")]
    UnknownAccessType(String),

    /// An unrecognized sort column was supplied.
    #[error("unknown column '{0}': expected name, houseNumber, accessType, or lastVisit")]
    UnknownColumn(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for estate-access operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a not-found error for the given resident id.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error means the resident does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Field errors carried by a validation failure, empty otherwise.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resident::ResidentField;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
        assert_eq!(
            Error::internal("test error").to_string(),
            "internal error: test error"
        );
    }

    #[test]
    fn test_not_found() {
        let err = Error::not_found("42");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Resident not found: 42");
        assert!(!Error::InvalidCredentials.is_not_found());
    }

    #[test]
    fn test_validation_error_lists_every_field() {
        let err = Error::Validation(vec![
            FieldError::new(ResidentField::Name, "Name must be at least 2 characters"),
            FieldError::new(ResidentField::HouseNumber, "House number is required"),
        ]);
        assert!(err.is_validation());
        assert_eq!(err.field_errors().len(), 2);

        let msg = err.to_string();
        assert!(msg.contains("at least 2 characters"));
        assert!(msg.contains("House number is required"));
    }

    #[test]
    fn test_field_errors_empty_for_other_variants() {
        assert!(Error::NotAuthenticated.field_errors().is_empty());
    }

    #[test]
    fn test_not_authenticated_mentions_login() {
        assert!(Error::NotAuthenticated.to_string().contains("login"));
    }

    #[test]
    fn test_unknown_access_type_display() {
        let err = Error::UnknownAccessType("guest".to_string());
        assert!(err.to_string().contains("guest"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::config_validation("items_per_page must be greater than 0");
        assert!(err.to_string().contains("items_per_page"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
