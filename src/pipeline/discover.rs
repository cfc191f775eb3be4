//! Document discovery: recursive walk for `*.pdf` files.
//!
//! Order is whatever the directory walk yields; it is not sorted. Entries
//! that cannot be read (permission denied on a subdirectory, a dangling
//! link) are logged and skipped rather than aborting the walk.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Whether a file name carries a `.pdf` suffix, case-insensitively.
pub fn is_pdf_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// Recursively collect every regular file under `root` whose name ends in
/// `.pdf` (any case).
///
/// With `follow_links`, symlinked directories are descended into and
/// `walkdir` reports loops as errors, which are skipped like any other
/// unreadable entry.
pub fn discover(root: &Path, follow_links: bool) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root).follow_links(follow_links) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if is_pdf_name(&entry.file_name().to_string_lossy()) {
            debug!("Discovered {}", entry.path().display());
            found.push(entry.into_path());
        }
    }

    found
}
