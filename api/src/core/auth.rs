//! Bearer-token allow-list.
//!
//! The list is read once at startup. An empty list rejects every token.

use std::{collections::HashSet, fmt};

/// Separators accepted between keys in `TENET_API_KEYS`.
const KEY_SEPARATORS: [char; 6] = [',', ' ', ';', '\n', '\r', '\t'];

const BEARER_PREFIX: &str = "bearer ";

/// Static set of accepted API keys.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKeyAllowList {
    keys: HashSet<String>,
}

impl ApiKeyAllowList {
    /// Splits on comma, whitespace, semicolon and newline; drops empty items.
    pub fn parse(raw: &str) -> Self {
        let keys = raw
            .split(KEY_SEPARATORS)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        Self { keys }
    }

    /// Fail-closed membership check.
    pub fn is_allowed(&self, token: &str) -> bool {
        !self.keys.is_empty() && self.keys.contains(token)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// keys never end up in logs
impl fmt::Debug for ApiKeyAllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyAllowList")
            .field("len", &self.keys.len())
            .finish()
    }
}

/// Extracts the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; `None` when the scheme is not
/// `Bearer` or the token is empty.
pub fn extract_bearer(header: &str) -> Option<&str> {
    let scheme = header.get(..BEARER_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    let token = header[BEARER_PREFIX.len()..].trim();
    (!token.is_empty()).then_some(token)
}
