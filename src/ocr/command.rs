//! External-process OCR engine
//!
//! Runs a configured command once per page: image bytes on stdin, result
//! JSON on stdout. The heavy model lives entirely in the external process;
//! this side only validates that the input decodes as an image and that the
//! returned JSON parses as a result.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::errors::OcrError;
use crate::models::OcrResult;

use super::engine::{decode_dimensions, OcrEngine};

/// Engine backed by an external OCR command.
pub struct CommandOcrEngine {
    program: String,
    args: Vec<String>,
}

impl CommandOcrEngine {
    pub fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }
}

impl OcrEngine for CommandOcrEngine {
    fn analyze(&mut self, image: &[u8]) -> Result<OcrResult, OcrError> {
        // Reject undecodable input locally instead of burning an engine run
        decode_dimensions(image)?;

        debug!("Invoking OCR command: {}", self.program);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| OcrError::engine(format!("failed to spawn {}: {e}", self.program)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OcrError::engine("engine stdin unavailable"))?;

        // Feed stdin from its own thread while wait_with_output drains
        // stdout and stderr; writing inline deadlocks once the child fills
        // either output pipe buffer before consuming all of its input
        let image = image.to_vec();
        let writer = std::thread::spawn(move || stdin.write_all(&image));

        let output = child
            .wait_with_output()
            .map_err(|e| OcrError::engine(format!("engine did not complete: {e}")))?;
        let written = writer
            .join()
            .map_err(|_| OcrError::engine("engine stdin writer panicked"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::engine(format!(
                "engine exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        // A failing child closes its stdin early and the exit status already
        // told that story; surface the write error only alongside success
        written.map_err(|e| OcrError::engine(format!("failed to write image to engine: {e}")))?;

        serde_json::from_slice(&output.stdout)
            .map_err(|e| OcrError::engine(format!("engine produced unparseable result: {e}")))
    }
}
