//! Batch extraction entry points.
//!
//! [`run`] discovers every PDF under the configured root and processes them
//! strictly one after another. [`extract_document`] handles a single file
//! and is what `run` calls for each one.
//!
//! lopdf is synchronous and the work is disk-bound, so each document is
//! processed inside `spawn_blocking`; the handle is awaited before the next
//! document starts, so at most one document is ever open.

use crate::config::{default_output_root, ExtractionConfig};
use crate::error::ExtractError;
use crate::output::{
    DocumentOutcome, DocumentReport, ImageFile, NameCollision, PageReport, RunSummary,
    SkippedDocument,
};
use crate::pipeline::{discover, images, input, layout, sanitize, text};
use crate::progress::ProgressCallback;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract every PDF under `config.root`.
///
/// # Returns
/// `Ok(RunSummary)` once every discovered document has been attempted, even
/// if some could not be opened (see `summary.skipped`).
///
/// # Errors
/// Returns `Err(ExtractError)` only for fatal errors:
/// - the root does not exist
/// - a directory or file in the output tree could not be written
/// - a page's text or an image object is malformed
pub async fn run(config: &ExtractionConfig) -> Result<RunSummary, ExtractError> {
    let start = Instant::now();

    // ── Step 1: Resolve root ─────────────────────────────────────────────
    let root = std::fs::canonicalize(&config.root)
        .ok()
        .filter(|p| p.is_dir())
        .ok_or_else(|| ExtractError::RootNotFound {
            path: config.root.clone(),
        })?;
    let output_root = match config.output_dir {
        Some(ref dir) => dir.clone(),
        None => default_output_root(&root),
    };
    info!("Scanning {}", root.display());

    // ── Step 2: Discover documents ───────────────────────────────────────
    let documents = {
        let root = root.clone();
        let follow_links = config.follow_links;
        tokio::task::spawn_blocking(move || discover::discover(&root, follow_links))
            .await
            .map_err(|e| ExtractError::Internal(format!("Discovery task panicked: {}", e)))?
    };
    let total = documents.len();

    let mut summary = RunSummary {
        root: root.clone(),
        output_root: output_root.clone(),
        discovered: total,
        ..Default::default()
    };

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total);
    }

    if documents.is_empty() {
        info!("No PDF files found under {}", root.display());
        summary.duration_ms = start.elapsed().as_millis() as u64;
        if let Some(ref cb) = config.progress_callback {
            cb.on_run_complete(&summary);
        }
        return Ok(summary);
    }
    info!("Found {} PDF files", total);

    // ── Step 3: Process sequentially ─────────────────────────────────────
    let mut names: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

    for (i, path) in documents.iter().enumerate() {
        let index = i + 1;
        info!("Processing {}", path.display());
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(index, total, path);
        }

        match extract_document(path, &output_root, config).await? {
            DocumentOutcome::Extracted(report) => {
                let sources = names.entry(report.name.clone()).or_default();
                sources.push(report.source.clone());
                if sources.len() > 1 {
                    warn!(
                        "Output name '{}' already used by {}; files may be overwritten",
                        report.name,
                        sources[0].display()
                    );
                }

                info!("  done -> {}", report.output_dir.display());
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_complete(index, total, &report);
                }
                summary.documents.push(report);
            }
            DocumentOutcome::Skipped(skipped) => {
                warn!("  ERROR opening {}: {}", path.display(), skipped.error);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_skipped(index, total, path, &skipped.error);
                }
                summary.skipped.push(skipped);
            }
        }
    }

    // ── Step 4: Summarise ────────────────────────────────────────────────
    summary.collisions = names
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(name, sources)| NameCollision { name, sources })
        .collect();
    summary.duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "Run complete: {} extracted, {} skipped, {}ms; output under {}",
        summary.documents.len(),
        summary.skipped.len(),
        summary.duration_ms,
        output_root.display()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(&summary);
    }

    Ok(summary)
}

/// Synchronous wrapper around [`run`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_sync(config: &ExtractionConfig) -> Result<RunSummary, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(run(config))
}

/// Extract one document into `<output_root>/<sanitized stem>/`.
///
/// An unopenable document is not an error: it comes back as
/// [`DocumentOutcome::Skipped`] and nothing is written for it.
pub async fn extract_document(
    path: &Path,
    output_root: &Path,
    config: &ExtractionConfig,
) -> Result<DocumentOutcome, ExtractError> {
    let path = path.to_path_buf();
    let output_root = output_root.to_path_buf();
    let clean = config.clean_output;
    let progress = config.progress_callback.clone();

    tokio::task::spawn_blocking(move || {
        extract_document_blocking(&path, &output_root, clean, progress.as_ref())
    })
    .await
    .map_err(|e| ExtractError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Blocking implementation of single-document extraction.
fn extract_document_blocking(
    path: &Path,
    output_root: &Path,
    clean: bool,
    progress: Option<&ProgressCallback>,
) -> Result<DocumentOutcome, ExtractError> {
    let document = match input::open_document(path) {
        Ok(doc) => doc,
        Err(error) => {
            return Ok(DocumentOutcome::Skipped(SkippedDocument {
                source: path.to_path_buf(),
                error,
            }))
        }
    };

    let name = sanitize::safe_name(path);
    let output_dir = output_root.join(&name);
    layout::prepare_output_dir(&output_dir, clean)?;

    let pages = document.get_pages();
    let page_count = pages.len();
    layout::write_metadata(&output_dir, path, page_count)?;

    let mut reports = Vec::with_capacity(page_count);
    for (page_num, page_id) in pages {
        let n = page_num as usize;

        let page_text = text::page_text(&document, page_num, page_id).map_err(|e| ExtractError::PageText {
            path: path.to_path_buf(),
            page: n,
            detail: e.to_string(),
        })?;
        let text_path = layout::write_page_text(&output_dir, n, &page_text)?;

        let malformed = |e: lopdf::Error| ExtractError::MalformedImage {
            path: path.to_path_buf(),
            page: n,
            detail: e.to_string(),
        };
        let refs = images::page_image_refs(&document, page_id).map_err(malformed)?;

        let mut files = Vec::with_capacity(refs.len());
        for (i, id) in refs.into_iter().enumerate() {
            let image = images::extract_image(&document, id).map_err(malformed)?;
            let image_path = layout::write_page_image(&output_dir, n, i + 1, &image)?;
            files.push(ImageFile {
                index: i + 1,
                path: image_path,
                format: image.format,
                bytes: image.data.len(),
            });
        }

        debug!(
            "Page {}/{}: {} chars, {} images",
            n,
            page_count,
            page_text.len(),
            files.len()
        );
        if let Some(cb) = progress {
            cb.on_page_complete(n, page_count, page_text.len(), files.len());
        }

        reports.push(PageReport {
            page_num: n,
            text_path,
            text_len: page_text.len(),
            images: files,
        });
    }

    Ok(DocumentOutcome::Extracted(DocumentReport {
        source: path.to_path_buf(),
        name,
        output_dir,
        page_count,
        pages: reports,
    }))
}
