//! Error handling for the Tornado Risk Monitor
//!
//! Every failure that reaches a client is rendered as
//! `{ "success": false, "message": ..., "error_code": ... }`.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Request errors
    #[error("Method not allowed. Only GET and POST are supported.")]
    MethodNotAllowed,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Failure to obtain a reading for one location
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("weather service unreachable: {0}")]
    Unreachable(String),

    #[error("weather service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed weather data: {0}")]
    Malformed(String),

    #[error("no reading within {0:?}")]
    Timeout(Duration),
}

/// Failure to commit one risk record
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("database fault: {0}")]
    Database(String),

    #[error("write did not complete within {0:?}")]
    Timeout(Duration),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if !matches!(db_err.kind(), ErrorKind::Other) => {
                StorageError::ConstraintViolation(db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StorageError::Unavailable(err.to_string())
            }
            _ => StorageError::Database(err.to_string()),
        }
    }
}

/// Numeric error codes reported in failure bodies
pub mod codes {
    pub const NOT_FOUND: i32 = 1004;
    pub const METHOD_NOT_ALLOWED: i32 = 1005;
    pub const DATABASE: i32 = 3001;
    pub const MIGRATION: i32 = 3002;
    pub const CONFIGURATION: i32 = 3003;
    pub const INTERNAL: i32 = 5000;
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error_code: i32,
}

impl AppError {
    /// Stable numeric code for this error
    pub fn error_code(&self) -> i32 {
        match self {
            AppError::MethodNotAllowed => codes::METHOD_NOT_ALLOWED,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Configuration(_) => codes::CONFIGURATION,
            AppError::DatabaseError(_) => codes::DATABASE,
            AppError::MigrationError(_) => codes::MIGRATION,
            AppError::Internal(_) => codes::INTERNAL,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_)
            | AppError::DatabaseError(_)
            | AppError::MigrationError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message; database internals are not exposed
    pub fn client_message(&self) -> String {
        match self {
            AppError::NotFound(resource) => format!("{} not found", resource),
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            other => other.to_string(),
        }
    }

    pub fn to_response_body(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            message: self.client_message(),
            error_code: self.error_code(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (self.status_code(), Json(self.to_response_body())).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
