//! Configuration types for a batch extraction run.
//!
//! All run behaviour is controlled through [`ExtractionConfig`], built via
//! its [`ExtractionConfigBuilder`]. Defaults reproduce the classic layout:
//! scan the current directory and write under `<root>/docs/pdf-assets/`.

use crate::error::ExtractError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::{Path, PathBuf};

/// Output root used when none is configured, relative to the scan root.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "docs/pdf-assets";

/// Configuration for a batch extraction run.
///
/// # Example
/// ```rust
/// use pdf_assets::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .root("./papers")
///     .output_dir("./extracted")
///     .clean_output(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.output_root(), std::path::PathBuf::from("./extracted"));
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Directory tree to scan for `.pdf` files. Default: `.`.
    pub root: PathBuf,

    /// Where per-document directories are created.
    /// If None, uses `<root>/docs/pdf-assets`.
    pub output_dir: Option<PathBuf>,

    /// Remove a document's output directory before writing it. Default: false.
    ///
    /// Without this, files from an earlier run survive when a document now
    /// has fewer images (old `page-N-img-M` names are never overwritten).
    pub clean_output: bool,

    /// Follow symbolic links during discovery. Default: false.
    pub follow_links: bool,

    /// Optional progress callback for per-document and per-page events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output_dir: None,
            clean_output: false,
            follow_links: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("root", &self.root)
            .field("output_dir", &self.output_dir)
            .field("clean_output", &self.clean_output)
            .field("follow_links", &self.follow_links)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The directory that receives one subdirectory per document.
    pub fn output_root(&self) -> PathBuf {
        match self.output_dir {
            Some(ref dir) => dir.clone(),
            None => default_output_root(&self.root),
        }
    }
}

/// `<root>/docs/pdf-assets`.
pub fn default_output_root(root: &Path) -> PathBuf {
    root.join(DEFAULT_OUTPUT_SUBDIR)
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn clean_output(mut self, v: bool) -> Self {
        self.config.clean_output = v;
        self
    }

    pub fn follow_links(mut self, v: bool) -> Self {
        self.config.follow_links = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.root.as_os_str().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "Scan root must not be empty".into(),
            ));
        }
        if matches!(c.output_dir, Some(ref d) if d.as_os_str().is_empty()) {
            return Err(ExtractError::InvalidConfig(
                "Output directory must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgressCallback;
    use std::sync::Arc;

    #[test]
    fn default_output_root_is_under_root() {
        let config = ExtractionConfig::builder().root("/data").build().unwrap();
        assert_eq!(config.output_root(), PathBuf::from("/data/docs/pdf-assets"));
    }

    #[test]
    fn explicit_output_dir_wins() {
        let config = ExtractionConfig::builder()
            .root("/data")
            .output_dir("/tmp/out")
            .build()
            .unwrap();
        assert_eq!(config.output_root(), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn empty_root_is_rejected() {
        let err = ExtractionConfig::builder().root("").build().unwrap_err();
        assert!(matches!(err, ExtractError::InvalidConfig(_)));
    }

    #[test]
    fn empty_output_dir_is_rejected() {
        let err = ExtractionConfig::builder()
            .output_dir("")
            .build()
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidConfig(_)));
    }

    #[test]
    fn debug_hides_callback() {
        let config = ExtractionConfig::builder()
            .progress_callback(Arc::new(NoopProgressCallback))
            .build()
            .unwrap();
        let dbg = format!("{config:?}");
        assert!(dbg.contains("<dyn ExtractionProgressCallback>"));
    }

    #[test]
    fn defaults() {
        let c = ExtractionConfig::default();
        assert_eq!(c.root, PathBuf::from("."));
        assert!(!c.clean_output);
        assert!(!c.follow_links);
        assert!(c.progress_callback.is_none());
    }
}
