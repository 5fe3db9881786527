use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{response::ApiResponse, store::StoreError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("All fields are required")]
    MissingField,

    #[error("Invalid item type")]
    InvalidType,

    #[error("Invalid user id")]
    InvalidUserId,

    #[error("A user with this email already exists")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Storage {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Replace the generic storage message with one naming the failed
    /// operation. Other variants pass through.
    pub fn storage_context(self, message: &'static str) -> Self {
        match self {
            AppError::Storage { source, .. } => AppError::Storage { message, source },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingField
            | AppError::InvalidType
            | AppError::InvalidUserId
            | AppError::DuplicateEmail
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(source: StoreError) -> Self {
        AppError::Storage {
            message: "Storage error",
            source,
        }
    }
}

pub trait StorageContext<T> {
    fn storage_context(self, message: &'static str) -> AppResult<T>;
}

impl<T, E: Into<AppError>> StorageContext<T> for Result<T, E> {
    fn storage_context(self, message: &'static str) -> AppResult<T> {
        self.map_err(|err| {
            let err: AppError = err.into();
            err.storage_context(message)
        })
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Storage { message, source } => {
                tracing::error!(error = ?source, "{message}");
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal error");
            }
            _ => {}
        }

        let message = self.to_string();
        let body = ApiResponse::success(
            message.clone(),
            ErrorData { error: message },
        );

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn io_failure() -> StoreError {
        StoreError::Io {
            collection: "records".to_string(),
            source: std::io::Error::other("disk full at /srv/data/records.json"),
        }
    }

    #[test]
    fn status_codes() {
        assert_eq!(AppError::MissingField.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidType.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidUserId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::DuplicateEmail.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::from(io_failure()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_context_only_rewrites_storage_errors() {
        let err: Result<(), StoreError> = Err(io_failure());
        let err = err.storage_context("Failed to save records").unwrap_err();
        assert_eq!(err.to_string(), "Failed to save records");

        let err: AppResult<()> = Err(AppError::DuplicateEmail);
        let err = err.storage_context("Registration failed").unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[test]
    fn storage_message_does_not_leak_paths() {
        let err = AppError::from(io_failure()).storage_context("Failed to load records");
        assert!(!err.to_string().contains("/srv/data"));
    }

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn error_body_carries_message_and_error() {
        let (status, body) = body_json(AppError::DuplicateEmail).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "A user with this email already exists");
        assert_eq!(body["error"], "A user with this email already exists");
    }

    #[tokio::test]
    async fn storage_error_body_names_operation_only() {
        let err = AppError::from(io_failure()).storage_context("Failed to load records");
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to load records");
        assert_eq!(body["error"], "Failed to load records");
        assert!(!body.to_string().contains("/srv/data"));
        assert!(!body.to_string().contains("records.json"));
    }
}
