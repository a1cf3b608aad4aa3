//! Mapping of catalog errors to HTTP responses.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error flag.
    pub error: bool,
    /// Error code.
    pub code: String,
    /// Offending field, for invalid selections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Error message.
    pub message: String,
}

impl Error {
    /// Status code and machine-readable code for this error.
    #[must_use]
    pub const fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::InvalidChoice { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_CHOICE"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE"),
            Self::InUse { .. } => (StatusCode::CONFLICT, "IN_USE"),
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::EnvVar(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let field = match &self {
            Self::InvalidChoice { field, .. } => Some((*field).to_string()),
            _ => None,
        };
        let body = ErrorResponse {
            error: true,
            code: code.to_string(),
            field,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::validation("bad").status().0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::NotFound {
                entity: "product",
                id: 1
            }
            .status()
            .0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::InUse {
                entity: "measure",
                message: String::new()
            }
            .status()
            .1,
            "IN_USE"
        );
        assert_eq!(
            Error::Database(DbErr::Custom("boom".to_string())).status().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
