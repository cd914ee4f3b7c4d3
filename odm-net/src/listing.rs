// odm-net/src/listing.rs
//! Remote directory index parsing.
//!
//! Upstream indexes are untrusted and often sloppy HTML. Parsing is lenient:
//! whatever anchors can be recovered are returned, anything else is dropped,
//! and a page with nothing usable yields an empty listing rather than an
//! error.

use odm_common::model::path::is_file_name;
use odm_common::model::ListingEntry;
use scraper::{Html, Selector};
use tracing::{debug, warn};

const ENTRY_SELECTOR: &str = "ul > li > a";

/// Extracts `(name, is_dir)` entries from the anchors of an HTML index.
/// Names without the `extension` marker are directories; the parent entry is
/// never returned.
pub fn parse_index(raw: &[u8], extension: &str) -> Vec<ListingEntry> {
    let body = String::from_utf8_lossy(raw);
    let document = Html::parse_document(&body);
    let selector = match Selector::parse(ENTRY_SELECTOR) {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid listing selector '{}': {}", ENTRY_SELECTOR, e);
            return Vec::new();
        }
    };

    let entries: Vec<ListingEntry> = document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(entry_name)
        .map(|name| ListingEntry {
            is_dir: !is_file_name(&name, extension),
            name,
        })
        .collect();

    debug!("Parsed {} listing entries", entries.len());
    entries
}

/// Reduces an href to the bare child name, or `None` for self/parent
/// references and sort links.
fn entry_name(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('?') || href.starts_with('#') {
        return None;
    }
    let href = href.split(['?', '#']).next().unwrap_or(href);
    let trimmed = href.trim_end_matches('/');
    let name = trimmed.rsplit('/').next().unwrap_or(trimmed);
    match name {
        "" | "." | ".." => None,
        n => Some(n.to_string()),
    }
}
