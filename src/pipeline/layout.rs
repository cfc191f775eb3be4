//! Output layout: where each artefact of a document lands on disk.
//!
//! ```text
//! <output_root>/<sanitized stem>/
//!     metadata.txt            Path: … / Pages: …
//!     page-<N>.txt            plain text of page N (1-indexed)
//!     page-<N>-img-<M>.<ext>  M-th image on page N, native format
//! ```

use super::images::ExtractedImage;
use crate::error::ExtractError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const METADATA_FILE: &str = "metadata.txt";

pub fn page_text_name(page_num: usize) -> String {
    format!("page-{page_num}.txt")
}

pub fn page_image_name(page_num: usize, image_index: usize, ext: &str) -> String {
    format!("page-{page_num}-img-{image_index}.{ext}")
}

/// Contents of `metadata.txt`.
pub fn metadata_contents(source: &Path, page_count: usize) -> String {
    format!("Path: {}\nPages: {}\n", source.display(), page_count)
}

/// Create the document's output directory. With `clean`, an existing
/// directory and everything in it is removed first.
pub fn prepare_output_dir(dir: &Path, clean: bool) -> Result<(), ExtractError> {
    if clean && dir.exists() {
        debug!("Removing previous output {}", dir.display());
        fs::remove_dir_all(dir).map_err(|e| ExtractError::write_failed(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| ExtractError::write_failed(dir, e))
}

pub fn write_metadata(dir: &Path, source: &Path, page_count: usize) -> Result<PathBuf, ExtractError> {
    let path = dir.join(METADATA_FILE);
    write_file(&path, metadata_contents(source, page_count).as_bytes())?;
    Ok(path)
}

pub fn write_page_text(dir: &Path, page_num: usize, text: &str) -> Result<PathBuf, ExtractError> {
    let path = dir.join(page_text_name(page_num));
    write_file(&path, text.as_bytes())?;
    Ok(path)
}

pub fn write_page_image(
    dir: &Path,
    page_num: usize,
    image_index: usize,
    image: &ExtractedImage,
) -> Result<PathBuf, ExtractError> {
    let path = dir.join(page_image_name(page_num, image_index, image.format.extension()));
    write_file(&path, &image.data)?;
    Ok(path)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExtractError> {
    fs::write(path, bytes).map_err(|e| ExtractError::write_failed(path, e))
}
