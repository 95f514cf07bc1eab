//! Lenient `Accept` header parsing.
//!
//! The header is split on `,` into media ranges and each range on `;` into a
//! content type and parameters. Whitespace around tokens and around `=` is
//! ignored, leading and trailing dots on the whole header are stripped, and
//! empty segments are skipped rather than rejected.

use std::collections::BTreeMap;

/// One entry of an `Accept` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaRange {
    pub content_type: String,
    pub params: BTreeMap<String, String>,
}

impl MediaRange {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            params: BTreeMap::new(),
        }
    }

    /// Content type in lower case, for matching against a registry.
    pub fn normalized(&self) -> String {
        self.content_type.to_ascii_lowercase()
    }
}

/// Parse an `Accept` header into media ranges, in client order.
pub fn parse_accept(header: &str) -> Vec<MediaRange> {
    header
        .trim()
        .trim_matches('.')
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let mut segments = part.split(';');
            let content_type = segments.next()?.trim();
            if content_type.is_empty() {
                return None;
            }
            let params = segments
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| match p.split_once('=') {
                    Some((k, v)) => (k.trim().to_owned(), v.trim().to_owned()),
                    None => (p.to_owned(), String::new()),
                })
                .collect();
            Some(MediaRange {
                content_type: content_type.to_owned(),
                params,
            })
        })
        .collect()
}

/// Strip parameters from a `Content-Type` value and lower-case it.
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
