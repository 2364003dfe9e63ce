//! Error types for the todo service.
//!
//! # Design
//! Client-facing failures are plain-text bodies whose wording is part of the
//! API ("Invalid Todo Status", "Invalid Due Date", ...), so the `Display`
//! output of each validation variant is exactly that text. Storage faults are
//! logged and reported as a bare 500 without leaking SQLite details.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::model::EnumField;

/// Failures of the storage handle.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// `close` was called while clones of the handle were still alive.
    #[error("storage handle is still in use")]
    InUse,
}

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid Todo Priority")]
    InvalidPriority,

    #[error("Invalid Todo Status")]
    InvalidStatus,

    #[error("Invalid Todo Category")]
    InvalidCategory,

    #[error("Invalid Due Date")]
    InvalidDueDate,

    /// Empty title.
    #[error("Invalid Todo")]
    InvalidTitle,

    /// Update body named none of the updatable fields.
    #[error("Invalid Update Request")]
    EmptyUpdate,

    #[error("Todo Not Found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// The validation error reported for a value outside `field`'s set.
    pub fn invalid(field: EnumField) -> Self {
        match field {
            EnumField::Priority => ServiceError::InvalidPriority,
            EnumField::Status => ServiceError::InvalidStatus,
            EnumField::Category => ServiceError::InvalidCategory,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ServiceError::Store(error) = &self {
            tracing::error!(%error, "storage failure while handling request");
            return (status, "Internal Server Error").into_response();
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_match_api_text() {
        assert_eq!(ServiceError::InvalidPriority.to_string(), "Invalid Todo Priority");
        assert_eq!(ServiceError::InvalidStatus.to_string(), "Invalid Todo Status");
        assert_eq!(ServiceError::InvalidCategory.to_string(), "Invalid Todo Category");
        assert_eq!(ServiceError::InvalidDueDate.to_string(), "Invalid Due Date");
    }

    #[test]
    fn invalid_maps_each_field_to_its_error() {
        let messages: Vec<_> = EnumField::ALL
            .into_iter()
            .map(|f| ServiceError::invalid(f).to_string())
            .collect();
        assert_eq!(
            messages,
            ["Invalid Todo Status", "Invalid Todo Priority", "Invalid Todo Category"]
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(ServiceError::InvalidCategory.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::EmptyUpdate.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServiceError::Store(StoreError::InUse).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
