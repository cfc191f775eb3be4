//! Plain-text extraction for a single page.
//!
//! Text is gathered run by run. A font whose encoding lopdf cannot resolve
//! (for example a Type0 `Identity-H` font without `/ToUnicode`) only loses
//! the runs drawn with it; the rest of the page is still returned. A page
//! whose resource chain cannot be resolved is an error.

use lopdf::{Document, ObjectId};
use tracing::warn;

/// Extract the text of one page (1-indexed). Pages without text operators
/// yield an empty string.
pub fn page_text(document: &Document, page_num: u32, page_id: ObjectId) -> Result<String, lopdf::Error> {
    document.get_page_fonts(page_id)?;

    let mut text = String::new();
    for chunk in document.extract_text_chunks(&[page_num]) {
        match chunk {
            Ok(run) => text.push_str(&run),
            Err(e) => warn!("Page {}: skipping undecodable text ({})", page_num, e),
        }
    }
    Ok(text)
}
