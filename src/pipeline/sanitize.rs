//! Output-name sanitisation.
//!
//! Each document's output directory is named after its file stem with every
//! run of characters outside `[0-9A-Za-z._-]` collapsed to a single `_`.
//! The mapping is not injective: `a b.pdf` and `a+b.pdf` both become `a_b`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static RE_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9A-Za-z._-]+").unwrap());

/// Replace disallowed character runs with `_`. Idempotent.
pub fn sanitize(stem: &str) -> String {
    RE_UNSAFE.replace_all(stem, "_").into_owned()
}

/// Sanitized stem of a document path (file name minus its last extension).
pub fn safe_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    sanitize(&stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_allowed_characters() {
        assert_eq!(sanitize("Report_2024-v1.2"), "Report_2024-v1.2");
    }

    #[test]
    fn collapses_runs() {
        assert_eq!(sanitize("a  b"), "a_b");
        assert_eq!(sanitize("a (final) copy"), "a_final_copy");
        assert_eq!(sanitize("été"), "_t_");
    }

    #[test]
    fn idempotent() {
        for s in ["a b", "x//y", "übung (1)", "plain", "__", "a.b-c_d", "日本語.v2"] {
            let once = sanitize(s);
            assert_eq!(sanitize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn safe_name_uses_stem() {
        assert_eq!(safe_name(Path::new("/x/y/My Paper.pdf")), "My_Paper");
        assert_eq!(safe_name(Path::new("archive.tar.PDF")), "archive.tar");
    }

    #[test]
    fn distinct_stems_can_collide() {
        let a = safe_name(Path::new("a b.pdf"));
        let b = safe_name(Path::new("a+b.pdf"));
        assert_eq!(a, b);
        assert_eq!(a, "a_b");
    }
}
