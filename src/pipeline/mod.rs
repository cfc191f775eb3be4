//! Pipeline stages for batch PDF extraction.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own and none of them knows about the run as a whole.
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ input ──▶ text ──▶ images ──▶ encode ──▶ layout
//! (walkdir)    (lopdf)   (page)   (XObject)  (→ PNG)    (files)
//! ```
//!
//! 1. [`discover`]: recursive walk for `*.pdf`, case-insensitive
//! 2. [`sanitize`]: map a document stem to its output directory name
//! 3. [`input`]:    magic-byte check and parse; failures are per-document
//! 4. [`text`]:     plain text of one page
//! 5. [`images`]:   resource-based image inventory and native-format bytes
//! 6. [`encode`]:   bare samples → PNG for streams with no container format
//! 7. [`layout`]:   file names and writes under the output root

pub mod discover;
pub mod encode;
pub mod images;
pub mod input;
pub mod layout;
pub mod sanitize;
pub mod text;
