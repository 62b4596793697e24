//! Error types for the Nylas client
//!
//! This module defines the error hierarchy for all operations in the crate.

use thiserror::Error;

/// Main error type for the Nylas client
#[derive(Error, Debug)]
pub enum NylasError {
    /// OAuth / token errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Nylas API errors
    #[error("Nylas API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// OAuth / token errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No access token configured")]
    MissingAccessToken,

    #[error("Token exchange failed: {message}")]
    TokenExchangeFailed { message: String },
}

/// Nylas API errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{collection} not found: {id}")]
    NotFound { collection: String, id: String },

    #[error("API request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Operation '{operation}' is not supported for {collection}")]
    UnsupportedOperation {
        collection: String,
        operation: String,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}")]
    MissingEnvVar { var: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid parameter: {name} - {message}")]
    InvalidParameter { name: String, message: String },
}

/// Result type alias for Nylas operations
pub type Result<T> = std::result::Result<T, NylasError>;
