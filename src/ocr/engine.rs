//! Engine trait and the built-in dimension-only engine

use crate::errors::OcrError;
use crate::models::OcrResult;

/// A synchronous OCR engine.
///
/// `analyze` is blocking and CPU/accelerator-bound; implementations are not
/// required to tolerate concurrent invocation (loaded model state may be
/// shared and non-re-entrant). The cache service serializes calls through a
/// mutex and runs them on a blocking task, so implementations can assume
/// exclusive access for the duration of one call.
pub trait OcrEngine: Send {
    /// Analyze one image, returning [`OcrError::InvalidImage`] when the
    /// bytes do not decode as a supported image.
    fn analyze(&mut self, image: &[u8]) -> Result<OcrResult, OcrError>;
}

/// Engine that decodes the image but performs no text recognition.
///
/// Every result carries the image dimensions and an empty block list. This
/// serves deployments that only want the caching/validation layer, and is
/// the behavior of the upstream OCR-disabled mode.
#[derive(Debug, Default)]
pub struct DetectOnlyEngine;

impl OcrEngine for DetectOnlyEngine {
    fn analyze(&mut self, image: &[u8]) -> Result<OcrResult, OcrError> {
        let (width, height) = decode_dimensions(image)?;
        Ok(OcrResult::empty(
            env!("CARGO_PKG_VERSION"),
            width,
            height,
        ))
    }
}

/// Decode the image far enough to learn its pixel dimensions.
pub(crate) fn decode_dimensions(image: &[u8]) -> Result<(u32, u32), OcrError> {
    let img = image::load_from_memory(image).map_err(|_| OcrError::InvalidImage)?;
    Ok((img.width(), img.height()))
}
