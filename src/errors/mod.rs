//! Application error types

pub mod types;

pub use types::{AppError, CacheError, EncodingError, OcrError};
