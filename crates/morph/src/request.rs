//! Request representation handed to the adapter by the host server.

use bytes::Bytes;
use http::{header, HeaderMap, Method, Uri};
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

/// An in-flight HTTP request.
///
/// Clones are cheap handles onto the same body, so a pass-through request
/// argument shares bytes with the binder instead of copying them. The
/// request is immutable once constructed; per-request binding state lives
/// elsewhere.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use morph::Request;
///
/// let req = Request::builder()
///     .method(Method::POST)
///     .uri("/orders?priority=high")
///     .header("content-type", "application/json")
///     .body(r#"{"size":"Large"}"#)
///     .build();
///
/// assert_eq!(req.path(), "/orders");
/// assert_eq!(req.query_string(), Some("priority=high"));
/// assert_eq!(req.content_type(), Some("application/json"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
}

impl Request {
    /// Creates a new request from its parts.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Body) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
        }
    }

    /// Starts building a request, mainly for tests and examples.
    #[must_use]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the raw query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value, verbatim.
    ///
    /// Body binding compares this against the exact media-type literals;
    /// parameters such as a charset suffix are deliberately not stripped.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Returns the request body handle.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }
}

/// A request body: either bytes already in memory or a pending reader.
///
/// The first call to [`Body::bytes`] drains a pending reader fully into
/// memory and caches the result (or the failure), so every JSON target
/// decodes the same bytes and a read fault is reported consistently.
/// Clones share the underlying state.
#[derive(Clone)]
pub struct Body {
    state: Arc<Mutex<BodyState>>,
}

enum BodyState {
    Buffered(Bytes),
    Pending(Box<dyn Read + Send>),
    Failed(String),
}

impl Body {
    /// An empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(Bytes::new())
    }

    /// A body that will be read lazily from `reader` on first use.
    #[must_use]
    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Self {
            state: Arc::new(Mutex::new(BodyState::Pending(Box::new(reader)))),
        }
    }

    /// Returns the full body bytes, reading them into memory if needed.
    ///
    /// # Errors
    ///
    /// Returns the read error if the underlying reader fails; subsequent
    /// calls keep failing with the same message.
    pub fn bytes(&self) -> io::Result<Bytes> {
        let mut state = self.state.lock();
        match &mut *state {
            BodyState::Buffered(bytes) => Ok(bytes.clone()),
            BodyState::Failed(message) => Err(io::Error::other(message.clone())),
            BodyState::Pending(reader) => {
                let mut buf = Vec::new();
                match reader.read_to_end(&mut buf) {
                    Ok(_) => {
                        let bytes = Bytes::from(buf);
                        *state = BodyState::Buffered(bytes.clone());
                        Ok(bytes)
                    }
                    Err(err) => {
                        *state = BodyState::Failed(err.to_string());
                        Err(err)
                    }
                }
            }
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.state.lock() {
            BodyState::Buffered(bytes) => f.debug_tuple("Body").field(&bytes.len()).finish(),
            BodyState::Pending(_) => f.write_str("Body(<pending>)"),
            BodyState::Failed(message) => f.debug_tuple("Body").field(message).finish(),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self {
            state: Arc::new(Mutex::new(BodyState::Buffered(bytes))),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from(Bytes::from(bytes))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::from(Bytes::from(text))
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::from(Bytes::from_static(text.as_bytes()))
    }
}

/// Builder for constructing a [`Request`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Option<Body>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI from anything `Uri` can be parsed from.
    ///
    /// Invalid input is ignored and [`RequestBuilder::build`] will panic on
    /// the missing URI.
    #[must_use]
    pub fn uri<U>(mut self, uri: U) -> Self
    where
        Uri: TryFrom<U>,
    {
        if let Ok(uri) = Uri::try_from(uri) {
            self.uri = Some(uri);
        }
        self
    }

    /// Adds a single header; invalid names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::HeaderName::try_from(name),
            http::HeaderValue::try_from(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Builds the request.
    ///
    /// # Panics
    ///
    /// Panics if the URI was not set. The method defaults to GET and the
    /// body to empty.
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method.unwrap_or(Method::GET),
            uri: self.uri.expect("uri is required"),
            headers: self.headers,
            body: self.body.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("reader broke"))
        }
    }

    #[test]
    fn test_builder_defaults() {
        let req = Request::builder().uri("/").build();
        assert_eq!(req.method(), &Method::GET);
        assert_eq!(req.path(), "/");
        assert_eq!(req.query_string(), None);
        assert!(req.body().bytes().unwrap().is_empty());
    }

    #[test]
    fn test_builder_parts() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/login?next=%2Fhome")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("username=fred")
            .build();

        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.path(), "/login");
        assert_eq!(req.query_string(), Some("next=%2Fhome"));
        assert_eq!(
            req.content_type(),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(&req.body().bytes().unwrap()[..], b"username=fred");
    }

    #[test]
    fn test_body_clone_shares_bytes() {
        let req = Request::builder().uri("/").body("shared").build();
        let other = req.clone();

        assert_eq!(req.body().bytes().unwrap(), other.body().bytes().unwrap());
    }

    #[test]
    fn test_reader_body_is_cached_after_first_read() {
        let body = Body::from_reader(io::Cursor::new(b"streamed".to_vec()));
        assert_eq!(&body.bytes().unwrap()[..], b"streamed");
        // Second read serves the cache instead of the drained reader.
        assert_eq!(&body.bytes().unwrap()[..], b"streamed");
    }

    #[test]
    fn test_reader_failure_is_sticky() {
        let body = Body::from_reader(FailingReader);
        assert!(body.bytes().is_err());
        let second = body.bytes().unwrap_err();
        assert!(second.to_string().contains("reader broke"));
    }

    #[test]
    fn test_content_type_is_verbatim() {
        let req = Request::builder()
            .uri("/")
            .header("content-type", "application/json; charset=utf-8")
            .build();
        // No parameter stripping: gating happens on the exact literal.
        assert_eq!(req.content_type(), Some("application/json; charset=utf-8"));
    }
}
