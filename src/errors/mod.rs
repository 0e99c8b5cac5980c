//! Error handling module for the RCL panel core.
//!
//! Provides a centralized error type with stable error codes. Note that the
//! store accessor deliberately does NOT surface most of these: read failures
//! fall back to defaults and write failures are logged, per the best-effort
//! persistence policy. Errors here are for the operations that must reject
//! loudly (login, gated session open, import validation).

use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
#[allow(dead_code)]
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const INVALID_IMPORT: &str = "INVALID_IMPORT";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// No valid session token present; the caller must fall back to the
    /// public entry point (fail closed).
    Unauthorized(String),
    /// Login rejected. The message is always the generic "invalid username
    /// or password" so unknown-username and wrong-password are
    /// indistinguishable.
    InvalidCredentials,
    /// Import payload rejected before any write happened.
    InvalidImport(String),
    /// Validation error on an editor operation.
    Validation(String),
    /// Underlying store failure.
    Storage(String),
    /// JSON serialization failure.
    Serialization(String),
    /// Internal error.
    Internal(String),
}

impl AppError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::InvalidCredentials => codes::INVALID_CREDENTIALS,
            AppError::InvalidImport(_) => codes::INVALID_IMPORT,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Storage(_) => codes::STORAGE_ERROR,
            AppError::Serialization(_) => codes::SERIALIZATION_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the human-readable error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::InvalidCredentials => "Invalid username or password".to_string(),
            AppError::InvalidImport(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Storage(msg) => msg.clone(),
            AppError::Serialization(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Storage error: {:?}", err);
        AppError::Storage(format!("Storage error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Serialization(format!("JSON error: {}", err))
    }
}

/// Serializable error details, used by embedders that need to show the
/// failure to a human (the import status banner, the login form).
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for ErrorDetails {
    fn from(error: &AppError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.message(),
        }
    }
}
