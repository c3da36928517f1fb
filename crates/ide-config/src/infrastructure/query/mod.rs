//! Query-string reader.
//!
//! [`UrlQuery`] implements the [`QueryReader`] port over a URL or a bare
//! query string.  Keys and values are percent-decoded (`+` decodes to a
//! space) with `url::form_urlencoded`, exactly as a browser's
//! `URLSearchParams` does.  The parsed parameters never change after
//! construction, matching a page whose query string is fixed for its
//! lifetime.

use url::{form_urlencoded, Url};

use crate::application::resolve_config::QueryReader;

/// Decoded query-string parameters, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlQuery {
    pairs: Vec<(String, String)>,
}

impl UrlQuery {
    /// A reader with no parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses `input` as a full URL (`https://host/ide?config.theme=dark`) or,
    /// failing that, as a bare query string with or without a leading `?`.
    pub fn parse(input: &str) -> Self {
        let query = match Url::parse(input) {
            Ok(url) => url.query().unwrap_or_default().to_string(),
            Err(_) => input.strip_prefix('?').unwrap_or(input).to_string(),
        };
        Self {
            pairs: form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        }
    }

    /// Builds a reader from already-decoded pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl QueryReader for UrlQuery {
    fn get(&self, key: &str) -> Option<String> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn keys(&self) -> Vec<String> {
        self.pairs.iter().map(|(k, _)| k.clone()).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
