//! # pdf-assets
//!
//! Walk a directory tree, find every PDF, and dump each one's per-page text
//! and embedded images into a mirrored output tree.
//!
//! ## Pipeline Overview
//!
//! ```text
//! root/
//!  │
//!  ├─ 1. Discover  recursive walk for *.pdf (any case)
//!  ├─ 2. Open      magic-byte check + lopdf parse (failure skips the file)
//!  ├─ 3. Metadata  metadata.txt with source path and page count
//!  ├─ 4. Text      page-N.txt for every page
//!  └─ 5. Images    page-N-img-M.<ext> for every image in the page resources
//! ```
//!
//! Documents are processed one at a time in discovery order. Output goes to
//! `<root>/docs/pdf-assets/<sanitized stem>/` unless another output root is
//! configured.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_assets::{run, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder().root("./papers").build()?;
//!     let summary = run(&config).await?;
//!     eprintln!(
//!         "{} documents, {} pages, {} images → {}",
//!         summary.documents.len(),
//!         summary.total_pages(),
//!         summary.total_images(),
//!         summary.output_root.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-assets` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, DEFAULT_OUTPUT_SUBDIR};
pub use error::{ExtractError, OpenError};
pub use extract::{extract_document, run, run_sync};
pub use output::{
    DocumentOutcome, DocumentReport, ImageFile, ImageFormat, NameCollision, PageReport,
    RunSummary, SkippedDocument,
};
pub use pipeline::discover::discover;
pub use pipeline::sanitize::{safe_name, sanitize};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
