//! Result types describing what a run wrote to disk.
//!
//! Everything here is `Serialize` so the CLI can emit a run as JSON.

use crate::error::OpenError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Native encoding of an extracted image, which also picks its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// `DCTDecode` (JPEG) stream, outer filters undone.
    Jpeg,
    /// `JPXDecode` (JPEG 2000) stream, outer filters undone.
    Jpx,
    /// `JBIG2Decode` stream, outer filters undone.
    Jbig2,
    /// Decoded pixel data re-encoded as PNG.
    Png,
    /// Stream bytes in an encoding that could not be identified or
    /// decoded. Written under the default `png` extension.
    Unknown,
}

impl ImageFormat {
    /// File extension written for this format.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Jpx => "jpx",
            ImageFormat::Jbig2 => "jb2",
            ImageFormat::Png => "png",
            ImageFormat::Unknown => "png",
        }
    }
}

/// One image file written for a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFile {
    /// 1-indexed position in the page's image inventory.
    pub index: usize,
    pub path: PathBuf,
    pub format: ImageFormat,
    pub bytes: usize,
}

/// Files written for one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    /// 1-indexed page number.
    pub page_num: usize,
    pub text_path: PathBuf,
    /// Byte length of the extracted text.
    pub text_len: usize,
    pub images: Vec<ImageFile>,
}

/// Everything written for one successfully opened document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub source: PathBuf,
    /// Sanitized stem, i.e. the output subdirectory name.
    pub name: String,
    pub output_dir: PathBuf,
    pub page_count: usize,
    pub pages: Vec<PageReport>,
}

impl DocumentReport {
    /// Total number of image files written across all pages.
    pub fn image_count(&self) -> usize {
        self.pages.iter().map(|p| p.images.len()).sum()
    }
}

/// A discovered document that could not be opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub source: PathBuf,
    pub error: OpenError,
}

/// Two or more documents in one run that mapped to the same output directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameCollision {
    pub name: String,
    /// Sources in processing order; the last one's files win on overlap.
    pub sources: Vec<PathBuf>,
}

/// Outcome of processing a single document.
#[derive(Debug, Clone)]
pub enum DocumentOutcome {
    Extracted(DocumentReport),
    Skipped(SkippedDocument),
}

/// Summary of a whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub root: PathBuf,
    pub output_root: PathBuf,
    pub discovered: usize,
    pub documents: Vec<DocumentReport>,
    pub skipped: Vec<SkippedDocument>,
    pub collisions: Vec<NameCollision>,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn total_pages(&self) -> usize {
        self.documents.iter().map(|d| d.page_count).sum()
    }

    pub fn total_images(&self) -> usize {
        self.documents.iter().map(DocumentReport::image_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions() {
        assert_eq!(ImageFormat::Jpeg.extension(), "jpeg");
        assert_eq!(ImageFormat::Jpx.extension(), "jpx");
        assert_eq!(ImageFormat::Jbig2.extension(), "jb2");
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Unknown.extension(), "png");
    }

    #[test]
    fn summary_totals() {
        let page = |n: usize, images: usize| PageReport {
            page_num: n,
            text_path: PathBuf::from(format!("page-{n}.txt")),
            text_len: 0,
            images: (1..=images)
                .map(|i| ImageFile {
                    index: i,
                    path: PathBuf::from(format!("page-{n}-img-{i}.png")),
                    format: ImageFormat::Png,
                    bytes: 10,
                })
                .collect(),
        };
        let summary = RunSummary {
            documents: vec![DocumentReport {
                source: PathBuf::from("a.pdf"),
                name: "a".into(),
                output_dir: PathBuf::from("out/a"),
                page_count: 3,
                pages: vec![page(1, 0), page(2, 2), page(3, 1)],
            }],
            ..Default::default()
        };
        assert_eq!(summary.total_pages(), 3);
        assert_eq!(summary.total_images(), 3);
    }

    #[test]
    fn format_serialises_lowercase() {
        let json = serde_json::to_string(&ImageFormat::Jbig2).unwrap();
        assert_eq!(json, "\"jbig2\"");
        let json = serde_json::to_string(&ImageFormat::Unknown).unwrap();
        assert_eq!(json, "\"unknown\"");
    }
}
