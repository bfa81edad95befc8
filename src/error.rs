//! Error types for pagekit
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for pagekit
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Iterator Errors
    // ============================================================================
    /// A page position failed validation in `move_to`/`get`
    #[error("page {position} is not a valid page position")]
    InvalidPosition {
        /// The rejected position
        position: i64,
        /// The total page count known at the time of the failure, if any
        total_pages: Option<u64>,
    },

    /// The configured throttling delay is malformed
    #[error("invalid delay configuration: {message}")]
    InvalidDelay {
        /// What was wrong with the (secs, nanos) pair
        message: String,
    },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    /// The underlying HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Response status code
        status: u16,
        /// Response body, if it could be read
        body: String,
    },

    /// The endpoint URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Errors
    // ============================================================================
    /// A response body was not valid JSON
    #[error("failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The item array could not be located in a response body
    #[error("failed to extract records from path '{path}': {message}")]
    RecordExtraction {
        /// The configured dotted path
        path: String,
        /// Why extraction failed
        message: String,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// A generic error with a plain message
    #[error("{0}")]
    Other(String),

    /// A passthrough for anyhow errors
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an invalid position error
    pub fn invalid_position(position: i64, total_pages: Option<u64>) -> Self {
        Self::InvalidPosition {
            position,
            total_pages,
        }
    }

    /// Create an invalid delay error
    pub fn invalid_delay(message: impl Into<String>) -> Self {
        Self::InvalidDelay {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a record extraction error
    pub fn extraction(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordExtraction {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for pagekit
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_position(0, None);
        assert_eq!(err.to_string(), "page 0 is not a valid page position");

        let err = Error::invalid_delay("secs must be non-negative");
        assert_eq!(
            err.to_string(),
            "invalid delay configuration: secs must be non-negative"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::extraction("data.items", "path not found in response");
        assert_eq!(
            err.to_string(),
            "failed to extract records from path 'data.items': path not found in response"
        );
    }

    #[test]
    fn test_invalid_position_keeps_known_total() {
        let err = Error::invalid_position(9, Some(3));
        match err {
            Error::InvalidPosition {
                position,
                total_pages,
            } => {
                assert_eq!(position, 9);
                assert_eq!(total_pages, Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::invalid_delay("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: invalid delay configuration: inner"));
    }
}
