//! Document opening: validate a discovered path and parse it with lopdf.
//!
//! We check readability and the PDF magic bytes (`%PDF`) before handing the
//! file to the parser so callers get a specific [`OpenError`] rather than a
//! generic parse failure for the common "this isn't really a PDF" case.

use crate::error::OpenError;
use lopdf::Document;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Open a PDF for extraction.
///
/// Every failure here is recoverable: the caller logs it and moves on to the
/// next document.
pub fn open_document(path: &Path) -> Result<Document, OpenError> {
    check_header(path)?;

    let document = Document::load(path).map_err(classify_load_error)?;
    // lopdf decrypts with the empty user password when it can; anything
    // still encrypted needs a password we do not have.
    if document.is_encrypted() {
        return Err(OpenError::Encrypted);
    }

    debug!(
        "Opened {} (PDF {}, {} pages)",
        path.display(),
        document.version,
        document.get_pages().len()
    );
    Ok(document)
}

/// Validate existence, read permission and the `%PDF` magic.
fn check_header(path: &Path) -> Result<(), OpenError> {
    let mut f = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(OpenError::PermissionDenied);
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(OpenError::NotFound);
        }
        Err(e) => {
            return Err(OpenError::Corrupt {
                detail: e.to_string(),
            });
        }
    };

    let mut magic = [0u8; 4];
    let mut read = 0;
    while read < magic.len() {
        match f.read(&mut magic[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) => {
                return Err(OpenError::Corrupt {
                    detail: e.to_string(),
                })
            }
        }
    }

    if &magic[..read] != b"%PDF" {
        return Err(OpenError::NotAPdf {
            magic: magic[..read].to_vec(),
        });
    }
    Ok(())
}

fn classify_load_error(e: lopdf::Error) -> OpenError {
    match e {
        lopdf::Error::Decryption(_)
        | lopdf::Error::UnsupportedSecurityHandler(_)
        | lopdf::Error::AlreadyEncrypted => OpenError::Encrypted,
        lopdf::Error::IO(io) => match io.kind() {
            std::io::ErrorKind::NotFound => OpenError::NotFound,
            std::io::ErrorKind::PermissionDenied => OpenError::PermissionDenied,
            _ => OpenError::Corrupt {
                detail: io.to_string(),
            },
        },
        other => OpenError::Corrupt {
            detail: other.to_string(),
        },
    }
}
