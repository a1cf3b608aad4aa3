//! Unified error types for the catalog service.
//!
//! Validation failures carry user-facing messages; database write failures are
//! classified into duplicates and still-referenced rows so callers can report them.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Any database failure not classified below
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// An entity invariant does not hold for the submitted data
    #[error("Validation failed: {message}")]
    Validation {
        /// User-facing explanation
        message: String,
    },

    /// A referenced row is missing or not selectable for the given field
    #[error("Invalid selection for `{field}`: {message}")]
    InvalidChoice {
        /// Name of the offending field
        field: &'static str,
        /// User-facing explanation
        message: String,
    },

    /// The requested row does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind (e.g., "category")
        entity: &'static str,
        /// Requested id
        id: i64,
    },

    /// A uniqueness constraint was violated
    #[error("Duplicate {entity}: {message}")]
    Duplicate {
        /// Entity kind
        entity: &'static str,
        /// Database message
        message: String,
    },

    /// A foreign key constraint was violated (row still referenced, or dangling reference)
    #[error("{entity} is referenced by other records: {message}")]
    InUse {
        /// Entity kind
        entity: &'static str,
        /// Database message
        message: String,
    },

    /// I/O failure (e.g., reading the seed file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for an invalid selection on `field`.
    pub fn invalid_choice(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidChoice {
            field,
            message: message.into(),
        }
    }

    /// Classifies a failed insert, update or delete on `entity`.
    ///
    /// Unique violations become [`Error::Duplicate`], foreign key violations become
    /// [`Error::InUse`]; anything else stays a plain database error.
    #[must_use]
    pub fn from_write(entity: &'static str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => {
                return Self::Duplicate { entity, message };
            }
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                return Self::InUse { entity, message };
            }
            _ => {}
        }

        // Fall back to SQLite's message text when the driver code is not mapped
        let message = err.to_string();
        if message.contains("UNIQUE constraint failed") {
            Self::Duplicate { entity, message }
        } else if message.contains("FOREIGN KEY constraint failed") {
            Self::InUse { entity, message }
        } else {
            Self::Database(err)
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
