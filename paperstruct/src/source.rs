//! Raw text handed over by the PDF text recovery step.
//!
//! The recovery step (byte scraping or OCR) lives outside this crate. When it
//! cannot recover anything useful it returns a fixed sentinel message instead
//! of failing. The extractor treats that message as ordinary text; callers can
//! use [`RawDocumentText::is_low_content`] to warn about it.

use anyhow::{Context, Result};
use std::path::Path;

/// Message returned by the text recovery step when a PDF yields no usable text.
pub const LOW_CONTENT_SENTINEL: &str =
    "Failed to extract meaningful text from this PDF. The document may be scanned or image-based.";

/// Below this many non-whitespace characters a text is considered low-content.
pub const MIN_MEANINGFUL_CHARS: usize = 100;

const SENTINEL_PREFIX: &str = "Failed to extract meaningful text";

/// The entire recovered text of one document, newline-delimited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocumentText {
    text: String,
}

impl RawDocumentText {
    /// Creates a new `RawDocumentText`, normalizing `\r\n` and `\r` line breaks to `\n`.
    pub fn new<S: Into<String>>(text: S) -> RawDocumentText {
        let text: String = text.into();
        let text = if text.contains('\r') {
            text.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            text
        };
        RawDocumentText { text: text }
    }

    /// Decodes bytes as UTF-8, replacing invalid sequences.
    pub fn from_bytes(bytes: &[u8]) -> RawDocumentText {
        RawDocumentText::new(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Reads a text file holding previously recovered PDF text.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<RawDocumentText> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read text file: {}", path.display()))?;
        return Ok(RawDocumentText::from_bytes(&bytes));
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns `true` if the text is the recovery sentinel or carries fewer
    /// than [`MIN_MEANINGFUL_CHARS`] non-whitespace characters.
    pub fn is_low_content(&self) -> bool {
        if self.text.trim_start().starts_with(SENTINEL_PREFIX) {
            return true;
        }
        let meaningful = self.text.chars().filter(|c| !c.is_whitespace()).count();
        meaningful < MIN_MEANINGFUL_CHARS
    }
}

impl From<String> for RawDocumentText {
    fn from(text: String) -> Self {
        RawDocumentText::new(text)
    }
}

impl From<&str> for RawDocumentText {
    fn from(text: &str) -> Self {
        RawDocumentText::new(text)
    }
}

impl AsRef<str> for RawDocumentText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
