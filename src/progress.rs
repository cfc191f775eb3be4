//! Progress-callback trait for per-document and per-page events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the run works through the discovered documents.
//!
//! # Example
//!
//! ```rust
//! use pdf_assets::{DocumentReport, ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     pages: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, _index: usize, _total: usize, report: &DocumentReport) {
//!         self.pages.fetch_add(report.page_count, Ordering::SeqCst);
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { pages: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::OpenError;
use crate::output::{DocumentReport, RunSummary};
use std::path::Path;
use std::sync::Arc;

/// Called by the run as it processes each document.
///
/// Implementations must be `Send + Sync`: page events are fired from the
/// blocking worker thread that owns the open document. Events are still
/// strictly ordered, one document at a time. All methods default to no-ops.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after discovery, before the first document is opened.
    ///
    /// # Arguments
    /// * `total_documents` — number of `.pdf` files discovered
    fn on_run_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called just before a document is opened.
    ///
    /// # Arguments
    /// * `index` — 1-indexed position in discovery order
    /// * `total` — total documents in this run
    /// * `path`  — the document being processed
    fn on_document_start(&self, index: usize, total: usize, path: &Path) {
        let _ = (index, total, path);
    }

    /// Called after a page's text and images are on disk.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — pages in the current document
    /// * `text_len`    — byte length of the extracted text
    /// * `images`      — image files written for the page
    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize, images: usize) {
        let _ = (page_num, total_pages, text_len, images);
    }

    /// Called when a document has been fully written.
    fn on_document_complete(&self, index: usize, total: usize, report: &DocumentReport) {
        let _ = (index, total, report);
    }

    /// Called when a document could not be opened and was skipped.
    fn on_document_skipped(&self, index: usize, total: usize, path: &Path, error: &OpenError) {
        let _ = (index, total, path, error);
    }

    /// Called once after every document has been attempted.
    fn on_run_complete(&self, summary: &RunSummary) {
        let _ = summary;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        pages: AtomicUsize,
        completes: AtomicUsize,
        skips: AtomicUsize,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_document_start(&self, _index: usize, _total: usize, _path: &Path) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_complete(&self, _page: usize, _total: usize, _len: usize, _images: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_complete(&self, _index: usize, _total: usize, _report: &DocumentReport) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_skipped(&self, _i: usize, _t: usize, _p: &Path, _e: &OpenError) {
            self.skips.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start(2);
        cb.on_document_start(1, 2, Path::new("a.pdf"));
        cb.on_page_complete(1, 1, 10, 0);
        cb.on_document_skipped(2, 2, Path::new("b.pdf"), &OpenError::NotFound);
        cb.on_run_complete(&RunSummary::default());
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        let report = DocumentReport {
            source: PathBuf::from("a.pdf"),
            name: "a".into(),
            output_dir: PathBuf::from("out/a"),
            page_count: 2,
            pages: vec![],
        };

        tracker.on_document_start(1, 2, Path::new("a.pdf"));
        tracker.on_page_complete(1, 2, 5, 0);
        tracker.on_page_complete(2, 2, 7, 1);
        tracker.on_document_complete(1, 2, &report);
        tracker.on_document_start(2, 2, Path::new("b.pdf"));
        tracker.on_document_skipped(2, 2, Path::new("b.pdf"), &OpenError::Encrypted);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.pages.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.skips.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_run_start(10);
        cb.on_document_start(1, 10, Path::new("x.pdf"));
    }
}
