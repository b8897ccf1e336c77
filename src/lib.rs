pub mod config;
pub mod encoding;
pub mod errors;
pub mod models;
pub mod ocr;
pub mod ocr_cache;
pub mod web;
