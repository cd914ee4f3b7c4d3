// odm-core/src/patch.rs
//! Neutralizes eager-include statements in fetched source.
//!
//! Upstream files pull their siblings in with an include directive the
//! moment they are loaded. Left active, that bypasses the resolver hook and
//! fails on files that were never materialized, so every occurrence is
//! turned into a line comment.

use tracing::debug;

/// Prefix that turns a statement into a line comment.
pub const DISABLE_MARKER: &[u8] = b"//";

/// Configured directive plus the rewrite.
#[derive(Debug, Clone)]
pub struct ContentPatcher {
    directive: Vec<u8>,
}

impl ContentPatcher {
    pub fn new(directive: impl Into<Vec<u8>>) -> Self {
        Self {
            directive: directive.into(),
        }
    }

    pub fn directive(&self) -> &[u8] {
        &self.directive
    }

    pub fn neutralize(&self, content: &[u8]) -> Vec<u8> {
        neutralize(content, &self.directive)
    }
}

/// Prefixes every occurrence of `directive` in `content` with
/// [`DISABLE_MARKER`]. Occurrences already directly behind the marker are
/// left alone, so applying this twice is the same as applying it once.
/// Matched regions are skipped, never re-scanned.
pub fn neutralize(content: &[u8], directive: &[u8]) -> Vec<u8> {
    if directive.is_empty() || content.len() < directive.len() {
        return content.to_vec();
    }

    let mut out = Vec::with_capacity(content.len() + 2 * DISABLE_MARKER.len());
    let mut copied = 0;
    let mut pos = 0;
    let mut patched = 0usize;

    while pos + directive.len() <= content.len() {
        if &content[pos..pos + directive.len()] != directive {
            pos += 1;
            continue;
        }
        let disabled = pos >= DISABLE_MARKER.len()
            && &content[pos - DISABLE_MARKER.len()..pos] == DISABLE_MARKER;
        if !disabled {
            out.extend_from_slice(&content[copied..pos]);
            out.extend_from_slice(DISABLE_MARKER);
            copied = pos;
            patched += 1;
        }
        pos += directive.len();
    }
    out.extend_from_slice(&content[copied..]);

    if patched > 0 {
        debug!("Disabled {} include statement(s)", patched);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTIVE: &[u8] = b"require_once";

    #[test]
    fn comments_out_each_occurrence() {
        let src = b"<?php\nrequire_once 'Zend/Loader.php';\nclass Zend_View {}\n";
        assert_eq!(
            neutralize(src, DIRECTIVE),
            b"<?php\n//require_once 'Zend/Loader.php';\nclass Zend_View {}\n".to_vec()
        );
    }

    #[test]
    fn occurrences_at_edges_and_back_to_back() {
        assert_eq!(neutralize(b"require_once", DIRECTIVE), b"//require_once");
        assert_eq!(
            neutralize(b"require_oncerequire_once", DIRECTIVE),
            b"//require_once//require_once"
        );
        assert_eq!(neutralize(b"xrequire_once", DIRECTIVE), b"x//require_once");
        assert_eq!(
            neutralize(b"/require_once", DIRECTIVE),
            b"///require_once",
            "a single slash is not a comment marker"
        );
    }

    #[test]
    fn unrelated_bytes_are_untouched() {
        let src: Vec<u8> = (0u8..=255).chain(b"require_onc".iter().copied()).collect();
        assert_eq!(neutralize(&src, DIRECTIVE), src);
        assert_eq!(neutralize(b"", DIRECTIVE), b"");
        assert_eq!(neutralize(b"require", DIRECTIVE), b"require");
    }

    #[test]
    fn only_the_marker_is_inserted() {
        let src = b"a\r\n\trequire_once(\"x\");\xffrequire_once;\x00";
        let out = neutralize(src, DIRECTIVE);
        assert_eq!(out.len(), src.len() + 2 * DISABLE_MARKER.len());
        let restored: Vec<u8> = String::from_utf8_lossy(&out)
            .replace("//require_once", "require_once")
            .into_bytes();
        assert_eq!(restored, String::from_utf8_lossy(src).into_owned().into_bytes());
    }

    #[test]
    fn idempotent() {
        let samples: &[&[u8]] = &[
            b"",
            b"require_once",
            b"//require_once",
            b"////require_once require_once",
            b"require_oncerequire_oncerequire_once",
            b"<?php /** require_once inside a docblock */ require_once 'a.php';",
            b"// require_once 'spaced.php';",
        ];
        for sample in samples {
            let once = neutralize(sample, DIRECTIVE);
            let twice = neutralize(&once, DIRECTIVE);
            assert_eq!(once, twice, "{}", String::from_utf8_lossy(sample));
        }
    }

    #[test]
    fn self_overlapping_directive() {
        let once = neutralize(b"aaaaa", b"aa");
        assert_eq!(once, b"//aa//aaa");
        assert_eq!(neutralize(&once, b"aa"), once);
    }

    #[test]
    fn patcher_uses_configured_directive() {
        let patcher = ContentPatcher::new("include_once");
        assert_eq!(
            patcher.neutralize(b"include_once 'a.php'; require_once 'b.php';"),
            b"//include_once 'a.php'; require_once 'b.php';"
        );
        assert_eq!(patcher.directive(), b"include_once");
    }

    #[test]
    fn empty_directive_is_a_no_op() {
        assert_eq!(neutralize(b"anything", b""), b"anything");
    }
}
