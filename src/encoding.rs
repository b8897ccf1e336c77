//! Canonical JSON encoding of OCR results
//!
//! Cache entries must be byte-stable: the same [`OcrResult`] always encodes
//! to the same bytes, non-ASCII text is written verbatim, and all numeric
//! fields are plain JSON numbers. The encoder also enforces the engine
//! contract (finite numbers, parallel line sequences) before anything is
//! persisted, so a misbehaving engine shows up as a server error instead of
//! a corrupt cache entry.

use serde_json::Value;

use crate::errors::EncodingError;
use crate::models::OcrResult;

/// Encode a result into its canonical JSON byte form.
///
/// Validates the engine contract first; serialization itself preserves
/// struct field order and leaves non-ASCII characters unescaped.
pub fn encode(result: &OcrResult) -> Result<Vec<u8>, EncodingError> {
    validate(result)?;
    Ok(serde_json::to_vec(result)?)
}

/// Re-serialize previously persisted canonical JSON.
///
/// With `preserve_order` enabled on serde_json this is a fixed point over
/// [`encode`] output. Used when migrating entries written by an older
/// encoder; current cache hits return stored bytes verbatim.
pub fn renormalize(stored: &[u8]) -> Result<Vec<u8>, EncodingError> {
    let value: Value = serde_json::from_slice(stored)?;
    Ok(serde_json::to_vec(&value)?)
}

fn validate(result: &OcrResult) -> Result<(), EncodingError> {
    for (idx, block) in result.blocks.iter().enumerate() {
        if !block.lines_consistent() {
            return Err(EncodingError::LineCountMismatch {
                block: idx,
                coords: block.lines_coords.len(),
                texts: block.lines.len(),
            });
        }
        if !block.font_size.is_finite() {
            return Err(EncodingError::NonFiniteNumber {
                field: format!("blocks[{idx}].font_size"),
            });
        }
        for (line_idx, line) in block.lines_coords.iter().enumerate() {
            if line.iter().flatten().any(|c| !c.is_finite()) {
                return Err(EncodingError::NonFiniteNumber {
                    field: format!("blocks[{idx}].lines_coords[{line_idx}]"),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TextBlock;

    fn sample_result() -> OcrResult {
        let mut block = TextBlock::new([31, 376, 138, 696], true, 47.0);
        block.push_line(vec![[74.0, 392.0], [117.0, 392.0], [117.0, 680.0]], "いつも通りだな");
        block.push_line(vec![[38.0, 392.0], [72.0, 392.0], [72.0, 563.0]], "平和だ");
        OcrResult {
            version: "0.1.0".to_string(),
            img_width: 800,
            img_height: 1200,
            blocks: vec![block],
        }
    }

    #[test]
    fn test_encode_preserves_non_ascii_verbatim() {
        let encoded = encode(&sample_result()).unwrap();
        let text = String::from_utf8(encoded).unwrap();
        assert!(text.contains("いつも通りだな"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let result = sample_result();
        assert_eq!(encode(&result).unwrap(), encode(&result).unwrap());
    }

    #[test]
    fn test_renormalize_is_fixed_point_over_encode() {
        let encoded = encode(&sample_result()).unwrap();
        assert_eq!(renormalize(&encoded).unwrap(), encoded);

        let empty = encode(&OcrResult::empty("0.1.0", 3, 3)).unwrap();
        assert_eq!(renormalize(&empty).unwrap(), empty);
    }

    #[test]
    fn test_encode_rejects_mismatched_line_sequences() {
        let mut result = sample_result();
        result.blocks[0].lines.pop();
        match encode(&result) {
            Err(EncodingError::LineCountMismatch { block, coords, texts }) => {
                assert_eq!(block, 0);
                assert_eq!(coords, 2);
                assert_eq!(texts, 1);
            }
            other => panic!("expected LineCountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_rejects_non_finite_numbers() {
        let mut result = sample_result();
        result.blocks[0].font_size = f32::NAN;
        assert!(matches!(
            encode(&result),
            Err(EncodingError::NonFiniteNumber { .. })
        ));

        let mut result = sample_result();
        result.blocks[0].lines_coords[0][0][1] = f32::INFINITY;
        assert!(matches!(
            encode(&result),
            Err(EncodingError::NonFiniteNumber { .. })
        ));
    }

    #[test]
    fn test_renormalize_rejects_garbage() {
        assert!(renormalize(b"not json").is_err());
    }
}
