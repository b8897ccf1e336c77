//! Content-addressed OCR result cache
//!
//! This module is organized into three layers:
//! - **Key derivation**: stable content keys from raw image bytes
//! - **Storage**: durable, atomically-written cache entries on disk
//! - **Service**: the per-request coordinator deciding hit vs. miss and
//!   guarding the OCR engine against concurrent invocation

pub mod key;
pub mod service;
pub mod storage;

pub use key::ContentKey;
pub use service::OcrCacheService;
pub use storage::OcrCacheStorage;
