//! Shortlink redirect page parsing.
//!
//! `m.tb.cn` pages embed the true destination in a JavaScript assignment
//! rather than an HTTP redirect header. The `url = '...';` assignment is
//! required; the `extraData = {...};` blob is optional sugar carrying a
//! title and preview image.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::warn;

static URL_ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\s*=\s*'(.+)';").unwrap());

static EXTRA_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"extraData\s*=\s*(\{.+\});").unwrap());

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShortlinkExtra {
    pub title: Option<String>,
    pub pic: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ShortlinkPage {
    /// Destination URL, exactly as embedded — not yet canonical.
    pub url: String,
    pub extra: ShortlinkExtra,
}

/// Parse a shortlink redirect page. `None` means the page carries no
/// destination assignment — the product behind the code is gone.
pub fn parse_redirect_page(html: &str) -> Option<ShortlinkPage> {
    let url = URL_ASSIGN_RE.captures(html)?[1].to_string();

    let extra = EXTRA_DATA_RE
        .captures(html)
        .and_then(|caps| match serde_json::from_str(&caps[1]) {
            Ok(extra) => Some(extra),
            Err(e) => {
                warn!(error = %e, "extraData blob is not valid JSON, ignoring");
                None
            }
        })
        .unwrap_or_default();

    Some(ShortlinkPage { url, extra })
}
