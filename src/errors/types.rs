//! Error type definitions for the OCR server
//!
//! This module defines all error types used throughout the application,
//! providing a hierarchical error system that maps cleanly onto the HTTP
//! responses the server produces: invalid input becomes a client error,
//! everything else a server error.

use thiserror::Error;

/// Top-level application error type
///
/// This enum represents all possible errors that can occur while handling
/// a request. It uses `thiserror` to provide automatic error trait
/// implementations and proper error chaining.
#[derive(Error, Debug)]
pub enum AppError {
    /// The submitted bytes did not decode as a supported image
    #[error("Invalid image")]
    InvalidImage,

    /// Cache store errors (disk I/O on the cache directory)
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Canonical encoding errors
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// OCR engine failures other than invalid input
    #[error("OCR engine error: {message}")]
    Engine { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Durable cache store specific errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// No entry persisted under the given key
    ///
    /// Callers that checked existence first may still see this on a racy
    /// read; the coordinator recovers by falling back to the miss path.
    #[error("Cache entry not found: {key}")]
    NotFound { key: String },

    /// Disk I/O failure reading or writing the cache directory
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Canonical encoder specific errors
///
/// These indicate a contract violation by the OCR engine rather than a
/// problem with the request, and are surfaced as server errors.
#[derive(Error, Debug)]
pub enum EncodingError {
    /// A numeric field was NaN or infinite
    ///
    /// serde_json would silently emit `null` for such values, corrupting
    /// the persisted format, so they are rejected before serialization.
    #[error("Non-finite number in field: {field}")]
    NonFiniteNumber { field: String },

    /// A block's line geometry and text sequences differ in length
    #[error("Block {block}: {coords} line geometries but {texts} line texts")]
    LineCountMismatch {
        block: usize,
        coords: usize,
        texts: usize,
    },

    /// JSON serialization or parsing failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// OCR engine errors
#[derive(Error, Debug)]
pub enum OcrError {
    /// The bytes did not decode as a supported image
    #[error("Invalid image")]
    InvalidImage,

    /// The engine failed after the image was accepted
    #[error("Engine failure: {message}")]
    Engine { message: String },
}

impl AppError {
    /// Create an internal error with a custom message
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl OcrError {
    /// Create an engine failure with a custom message
    pub fn engine<S: Into<String>>(message: S) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }
}

impl From<OcrError> for AppError {
    fn from(err: OcrError) -> Self {
        match err {
            OcrError::InvalidImage => Self::InvalidImage,
            OcrError::Engine { message } => Self::Engine { message },
        }
    }
}
