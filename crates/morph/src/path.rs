//! Path-parameter lookup.
//!
//! Path values are owned by the router sitting in front of the adapter, so
//! the adapter only speaks to a [`PathParams`] provider. [`KeyValuePath`] is
//! a self-contained reference provider that reads parameters straight out of
//! slash-delimited key/value paths; in practice the host's router usually
//! supplies the provider instead.

use crate::request::Request;
use indexmap::IndexMap;

/// Resolves one path-parameter value per call.
///
/// Returns the empty string when the key is absent; providers make no
/// distinction between "absent" and "present but empty".
pub trait PathParams: Send + Sync {
    /// Returns the value for `key` in `req`.
    fn lookup(&self, req: &Request, key: &str) -> String;
}

impl<F> PathParams for F
where
    F: Fn(&Request, &str) -> String + Send + Sync,
{
    fn lookup(&self, req: &Request, key: &str) -> String {
        self(req, key)
    }
}

/// Reference provider treating the URI path as alternating key/value pairs.
///
/// `/Size/Large/Color/Blue` resolves `Size` to `Large` and `Color` to
/// `Blue`. A dangling key maps to the empty string and a later occurrence of
/// a key wins.
///
/// # Example
///
/// ```rust
/// use morph::KeyValuePath;
///
/// let params = KeyValuePath::parse("/Name/Fred/Age/42");
/// assert_eq!(params.get("Name").map(String::as_str), Some("Fred"));
/// assert_eq!(params.get("Age").map(String::as_str), Some("42"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyValuePath;

impl KeyValuePath {
    /// Parses a path into its key/value pairs.
    ///
    /// Leading, trailing, and repeated slashes are ignored; empty or
    /// all-slash input yields an empty map.
    #[must_use]
    pub fn parse(path: &str) -> IndexMap<String, String> {
        let mut params = IndexMap::new();
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        while let Some(key) = segments.next() {
            let value = segments.next().unwrap_or("");
            params.insert(key.to_string(), value.to_string());
        }
        params
    }
}

impl PathParams for KeyValuePath {
    fn lookup(&self, req: &Request, key: &str) -> String {
        Self::parse(req.path()).get(key).cloned().unwrap_or_default()
    }
}
