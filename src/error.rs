//! Error types for the pdf-assets library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`] — **Fatal**: the run cannot continue (missing root,
//!   a write to the output tree failed, a page or image object is
//!   malformed). Returned as `Err(ExtractError)` from [`crate::run`] and
//!   [`crate::extract_document`].
//!
//! * [`OpenError`] — **Non-fatal**: a single document could not be opened.
//!   It is recorded in [`crate::output::SkippedDocument`] and the batch moves
//!   on to the next document.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-assets library.
///
/// Per-document open failures use [`OpenError`] and never surface here.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The scan root does not exist or is not a directory.
    #[error("Scan root not found: '{path}'\nCheck the directory exists and is readable.")]
    RootNotFound { path: PathBuf },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// A page of an opened document could not be read for text (its page
    /// node or resource chain is unresolvable). Undecodable fonts are not
    /// an error; their runs are dropped with a warning.
    #[error("Text extraction failed for page {page} of '{path}': {detail}")]
    PageText {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    /// An image reference on a page could not be resolved or decoded.
    #[error("Malformed image on page {page} of '{path}': {detail}")]
    MalformedImage {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create a directory or write a file in the output tree.
    #[error("Failed to write '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtractError {
    pub(crate) fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractError::OutputWriteFailed {
            path: path.into(),
            source,
        }
    }
}

/// Why a discovered document could not be opened.
///
/// Stored alongside the document path in the run summary. The run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum OpenError {
    /// The file vanished between discovery and opening.
    #[error("file not found")]
    NotFound,

    /// Process does not have read permission on the file.
    #[error("permission denied")]
    PermissionDenied,

    /// The file does not start with the `%PDF` header.
    #[error("not a PDF (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    /// The document is encrypted; decryption is not supported.
    #[error("document is encrypted")]
    Encrypted,

    /// The parser rejected the file (broken xref, truncated body, …).
    #[error("corrupt PDF: {detail}")]
    Corrupt { detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_not_found_display() {
        let e = ExtractError::RootNotFound {
            path: PathBuf::from("/nowhere"),
        };
        assert!(e.to_string().contains("/nowhere"));
    }

    #[test]
    fn page_text_display() {
        let e = ExtractError::PageText {
            path: PathBuf::from("a.pdf"),
            page: 3,
            detail: "missing font".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
        assert!(msg.contains("a.pdf"));
        assert!(msg.contains("missing font"));
    }

    #[test]
    fn write_failed_keeps_source() {
        use std::error::Error as _;
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let e = ExtractError::write_failed("out/page-1.txt", io);
        assert!(e.to_string().contains("page-1.txt"));
        assert!(e.source().is_some());
    }

    #[test]
    fn not_a_pdf_display() {
        let e = OpenError::NotAPdf {
            magic: b"GIF8".to_vec(),
        };
        assert!(e.to_string().starts_with("not a PDF"));
    }

    #[test]
    fn open_error_roundtrips_through_json() {
        let e = OpenError::Corrupt {
            detail: "xref".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: OpenError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
