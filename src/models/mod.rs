//! Data models for OCR results
//!
//! These types define the persisted cache entry format. Field names and
//! declaration order match the JSON written to disk exactly, so changing
//! either invalidates existing cache directories.

use serde::{Deserialize, Serialize};

/// A completed analysis of one page image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    /// Version of the engine that produced this result
    pub version: String,
    pub img_width: u32,
    pub img_height: u32,
    /// Detected text blocks, in detector order; empty for a blank page
    pub blocks: Vec<TextBlock>,
}

/// One detected text region and its recognized lines.
///
/// `lines_coords` and `lines` are parallel: entry `i` of `lines` is the
/// recognized text for the geometry at entry `i` of `lines_coords`. Use
/// [`TextBlock::push_line`] to keep them in lockstep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Bounding box as x1, y1, x2, y2 in image pixels
    #[serde(rename = "box")]
    pub bbox: [i32; 4],
    /// Whether the text runs vertically
    pub vertical: bool,
    /// Estimated font size in pixels
    pub font_size: f32,
    /// Per-line polygon coordinates, each a sequence of (x, y) points
    pub lines_coords: Vec<Vec<[f32; 2]>>,
    /// Per-line recognized text
    pub lines: Vec<String>,
}

impl OcrResult {
    /// Create a result with no detected blocks, e.g. for a blank page or
    /// when recognition is disabled.
    pub fn empty(version: impl Into<String>, img_width: u32, img_height: u32) -> Self {
        Self {
            version: version.into(),
            img_width,
            img_height,
            blocks: Vec::new(),
        }
    }
}

impl TextBlock {
    pub fn new(bbox: [i32; 4], vertical: bool, font_size: f32) -> Self {
        Self {
            bbox,
            vertical,
            font_size,
            lines_coords: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Append one recognized line together with its geometry.
    ///
    /// This is the only way the parallel sequences should grow; appending
    /// to one without the other breaks the persisted-format invariant.
    pub fn push_line(&mut self, coords: Vec<[f32; 2]>, text: impl Into<String>) {
        self.lines_coords.push(coords);
        self.lines.push(text.into());
    }

    /// Whether the parallel line sequences are consistent.
    pub fn lines_consistent(&self) -> bool {
        self.lines_coords.len() == self.lines.len()
    }
}
