// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Directory autoindex pages.
//!
//! Static file servers (nginx `autoindex`, Apache `mod_autoindex`,
//! `python -m http.server`) list a directory as an HTML page with one anchor
//! per entry. This module pulls the `href` of every anchor out of such a page
//! and hands them to [`Listing::from_entries`] for filtering.
//!
//! # Example
//!
//! ```
//! use benchscope_adapters::upstream::autoindex::parse_listing;
//!
//! let html = r#"<html><body><a href="../">../</a><a href="ssb/">ssb/</a></body></html>"#;
//! let listing = parse_listing(html).unwrap();
//! assert_eq!(listing.directories, vec!["ssb/"]);
//! ```

use benchscope_core::Listing;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static ANCHOR_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("anchor pattern is valid")
});

static MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(?:html|body|a)[\s>]").expect("markup pattern is valid"));

/// Errors raised while reading a listing page.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AutoindexError {
    /// The body is not an HTML document
    #[error("response is not an HTML directory listing")]
    NotHtml,
}

/// Extract the raw `href` values of every anchor, decoded.
pub fn hrefs(html: &str) -> Result<Vec<String>, AutoindexError> {
    if !MARKUP.is_match(html) {
        return Err(AutoindexError::NotHtml);
    }

    Ok(ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| percent_decode(&decode_entities(m.as_str())))
        .collect())
}

/// Parse an autoindex page into sorted directories and result files.
///
/// Sort links, absolute links and links to other hosts are dropped along
/// with anything else that is not a plain entry of this directory.
pub fn parse_listing(html: &str) -> Result<Listing, AutoindexError> {
    Ok(Listing::from_entries(hrefs(html)?))
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

fn percent_decode(value: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(value.as_bytes())).into_owned()
}
