//! OCR engine boundary
//!
//! The cache layer treats recognition as an opaque, exclusive-use function
//! from image bytes to an [`OcrResult`](crate::models::OcrResult). Engines
//! implement [`OcrEngine`]; everything about models and weights stays on
//! their side of the trait.

pub mod command;
pub mod engine;

pub use command::CommandOcrEngine;
pub use engine::{DetectOnlyEngine, OcrEngine};
