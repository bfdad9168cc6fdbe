//! Navigation requests and their query-parameter wire form.
//!
//! # Keyset parameters
//!
//! | Parameter | Type  | Meaning                                         |
//! |-----------|-------|-------------------------------------------------|
//! | `first`   | bool  | First page                                      |
//! | `before`  | token | Page immediately before the referenced row      |
//! | `after`   | token | Page immediately after the referenced row       |
//! | `last`    | bool  | Last page                                       |
//! | `size`    | int   | Page size, only if the options allow it         |
//!
//! Conflicting selectors are resolved by precedence, never rejected:
//! `last` > `after` > `before` > `first`. With no selector the first page
//! is returned.
//!
//! # Offset parameters
//!
//! `page` (1-based, default 1) and `size`.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::options::PaginationOptions;
use crate::ordering::TraversalDirection;

/// An opaque row reference, typically a primary key.
///
/// Tokens that parse as an integer become [`ReferenceToken::Int`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceToken {
    /// Integer key
    Int(i64),
    /// Any other key
    Text(String),
}

impl ReferenceToken {
    /// Parse a raw token.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.parse::<i64>()
            .map_or_else(|_| Self::Text(raw.to_string()), Self::Int)
    }

    /// The integer value, if this is an integer token.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Text(_) => None,
        }
    }

    /// The text value, if this is a text token.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for ReferenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ReferenceToken {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for ReferenceToken {
    fn from(v: &str) -> Self {
        Self::parse(v)
    }
}

/// Which page to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavigationIntent {
    /// The first page.
    #[default]
    First,
    /// The last page.
    Last,
    /// The page right after the referenced row.
    After(ReferenceToken),
    /// The page right before the referenced row.
    Before(ReferenceToken),
}

impl NavigationIntent {
    /// Traversal direction implied by the intent.
    #[must_use]
    pub const fn direction(&self) -> TraversalDirection {
        match self {
            Self::First | Self::After(_) => TraversalDirection::Forward,
            Self::Last | Self::Before(_) => TraversalDirection::Backward,
        }
    }

    /// The reference token, for `After`/`Before`.
    #[must_use]
    pub const fn reference(&self) -> Option<&ReferenceToken> {
        match self {
            Self::After(token) | Self::Before(token) => Some(token),
            Self::First | Self::Last => None,
        }
    }
}

/// A keyset page request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeysetRequest {
    /// Which page to fetch.
    pub intent: NavigationIntent,
    /// Requested page size; resolved against the options' default and maximum.
    pub size: Option<i64>,
}

impl KeysetRequest {
    /// Request with the given intent and the default size.
    #[must_use]
    pub const fn new(intent: NavigationIntent) -> Self {
        Self { intent, size: None }
    }

    /// Request the first page.
    #[must_use]
    pub const fn first() -> Self {
        Self::new(NavigationIntent::First)
    }

    /// Request the last page.
    #[must_use]
    pub const fn last() -> Self {
        Self::new(NavigationIntent::Last)
    }

    /// Request the page after a row.
    #[must_use]
    pub fn after(token: impl Into<ReferenceToken>) -> Self {
        Self::new(NavigationIntent::After(token.into()))
    }

    /// Request the page before a row.
    #[must_use]
    pub fn before(token: impl Into<ReferenceToken>) -> Self {
        Self::new(NavigationIntent::Before(token.into()))
    }

    /// Override the page size. Takes priority over anything parsed from a query.
    #[must_use]
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// Build a request from query parameters.
    pub fn from_query(params: &QueryParams, options: &PaginationOptions) -> Self {
        let first = params.get(&options.first_query_parameter_name).is_some_and(parse_bool);
        let last = params.get(&options.last_query_parameter_name).is_some_and(parse_bool);
        let after = params.get(&options.after_query_parameter_name).map(ReferenceToken::parse);
        let before = params.get(&options.before_query_parameter_name).map(ReferenceToken::parse);

        let selectors = [first, last, after.is_some(), before.is_some()]
            .iter()
            .filter(|s| **s)
            .count();

        let intent = if last {
            NavigationIntent::Last
        } else if let Some(token) = after {
            NavigationIntent::After(token)
        } else if let Some(token) = before {
            NavigationIntent::Before(token)
        } else {
            NavigationIntent::First
        };

        if selectors > 1 {
            debug!(?intent, selectors, "conflicting navigation selectors resolved by precedence");
        }

        Self {
            intent,
            size: size_from_query(params, options),
        }
    }
}

/// An offset page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetRequest {
    /// 1-based page number; values below 1 are treated as 1.
    pub page: i64,
    /// Requested page size.
    pub size: Option<i64>,
}

impl Default for OffsetRequest {
    fn default() -> Self {
        Self::page(1)
    }
}

impl OffsetRequest {
    /// Request a page with the default size.
    #[must_use]
    pub const fn page(page: i64) -> Self {
        Self { page, size: None }
    }

    /// Override the page size.
    #[must_use]
    pub const fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// Page number coerced to at least 1.
    #[must_use]
    pub const fn effective_page(&self) -> u64 {
        if self.page < 1 { 1 } else { self.page.unsigned_abs() }
    }

    /// Build a request from query parameters.
    pub fn from_query(params: &QueryParams, options: &PaginationOptions) -> Self {
        let page = params
            .get(&options.page_query_parameter_name)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(1);
        Self {
            page,
            size: size_from_query(params, options),
        }
    }
}

fn size_from_query(params: &QueryParams, options: &PaginationOptions) -> Option<i64> {
    if !options.can_change_size_from_query {
        return None;
    }
    params.get(&options.size_query_parameter_name).map(|raw| {
        raw.trim()
            .parse::<i64>()
            .unwrap_or_else(|_| i64::from(options.default_size))
    })
}

/// Case-insensitive `true`; anything else is `false`.
fn parse_bool(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

/// Decoded query parameters, first value per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: HashMap<String, String>,
}

impl QueryParams {
    /// Collect already-decoded pairs. The first value for a key wins.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut values = HashMap::new();
        for (key, value) in pairs {
            values.entry(key.into()).or_insert_with(|| value.into());
        }
        Self { values }
    }

    /// Parse a raw query string (with or without a leading `?`).
    ///
    /// Keys and values are percent-decoded and `+` becomes a space.
    /// A key without `=` gets an empty value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        Self::from_pairs(raw.split('&').filter(|pair| !pair.is_empty()).map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (url_decode(key), url_decode(value))
        }))
    }

    /// Value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Percent-decoding; malformed escapes are kept verbatim.
fn url_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'%' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                if let Some(decoded) = hex {
                    out.push(decoded);
                    i += 3;
                    continue;
                }
                out.push(b'%');
            },
            b'+' => out.push(b' '),
            _ => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
