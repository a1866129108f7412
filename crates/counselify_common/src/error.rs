use std::fmt;
use thiserror::Error;

/// The base error type for all Counselify errors.
///
/// Each crate keeps its own narrow error enum and converts into this one at
/// the boundary where errors are reported to the caller.
#[derive(Error, Debug)]
pub enum CounselifyError {
    /// A time or date token could not be parsed
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// The non-availability (or another read-only) service could not be reached
    #[error("Fetch from {service_name} failed: {message}")]
    FetchError {
        service_name: String,
        message: String,
    },

    /// Incomplete selection, out-of-range date, blocked slot, ...
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Booking or reschedule request failed on the network or on the server
    #[error("Transaction failed: {0}")]
    TransactionError(String),

    /// Scratch storage could not be read or written
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CounselifyError {
    /// Whether the error should be shown to the user.
    ///
    /// Parse, fetch, validation and storage failures are absorbed by the
    /// engine; only transaction-level failures reach the error channel.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            CounselifyError::TransactionError(_)
                | CounselifyError::TimeoutError(_)
                | CounselifyError::HttpError(_)
        )
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, CounselifyError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, CounselifyError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, CounselifyError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| CounselifyError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, CounselifyError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| CounselifyError::InternalError(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for CounselifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CounselifyError::TimeoutError(err.to_string())
        } else {
            CounselifyError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CounselifyError {
    fn from(err: serde_json::Error) -> Self {
        CounselifyError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for CounselifyError {
    fn from(err: std::io::Error) -> Self {
        CounselifyError::StorageError(err.to_string())
    }
}

impl From<config::ConfigError> for CounselifyError {
    fn from(err: config::ConfigError) -> Self {
        CounselifyError::ConfigError(err.to_string())
    }
}

// Utility functions for error handling
pub fn parse_error<T: fmt::Display>(message: T) -> CounselifyError {
    CounselifyError::ParseError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> CounselifyError {
    CounselifyError::ValidationError(message.to_string())
}

pub fn fetch_error<T: fmt::Display>(service_name: &str, message: T) -> CounselifyError {
    CounselifyError::FetchError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn transaction_error<T: fmt::Display>(message: T) -> CounselifyError {
    CounselifyError::TransactionError(message.to_string())
}

pub fn timeout_error<T: fmt::Display>(message: T) -> CounselifyError {
    CounselifyError::TimeoutError(message.to_string())
}
