//! Response destination capability and the buffered per-request response.

use http::{HeaderMap, StatusCode};
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// Capability of a response destination, as supplied by the host server.
///
/// The adapter writes exactly one response through this interface per
/// request. `write` follows `io::Write` semantics: it may accept fewer bytes
/// than offered, and the encoder retries until the buffer is drained.
/// Status and headers record the latest value; what the transport does with
/// late updates is the host's concern.
pub trait ResponseWriter {
    /// Sets the response status.
    fn set_status(&mut self, status: StatusCode);

    /// Inserts (or replaces) a response header.
    fn insert_header(&mut self, name: &str, value: &str);

    /// Writes body bytes, returning how many were accepted.
    ///
    /// # Errors
    ///
    /// Returns the transport error; the encoder logs it and stops writing.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
}

/// An in-memory response.
///
/// This is both the buffer behind [`ResponseHandle`] and the writer used in
/// tests: it implements [`ResponseWriter`] by recording everything.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    /// Creates an empty 200 response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Returns the response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body as (lossy) text, for assertions.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseWriter for Response {
    fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn insert_header(&mut self, name: &str, value: &str) {
        if let (Ok(name), Ok(value)) = (
            http::HeaderName::try_from(name),
            http::HeaderValue::try_from(value),
        ) {
            self.headers.insert(name, value);
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}

/// Pass-through handle onto the in-flight response.
///
/// Handlers that declare a response-destination parameter receive a clone of
/// this handle and can set the status, add headers, or write body bytes
/// directly. Everything is buffered and flushed to the host's writer after
/// the handler returns, ahead of any encoded payload.
///
/// The handle is cheap to clone and internally locked, so it satisfies the
/// `Send + Sync` bounds the handler machinery requires without the handler
/// needing `&mut` access.
#[derive(Debug, Clone, Default)]
pub struct ResponseHandle {
    parts: Arc<Mutex<Response>>,
}

impl ResponseHandle {
    /// Creates a fresh handle for one request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the response status.
    pub fn set_status(&self, status: StatusCode) {
        self.parts.lock().status = status;
    }

    /// Inserts (or replaces) a response header.
    pub fn insert_header(&self, name: &str, value: &str) {
        self.parts.lock().insert_header(name, value);
    }

    /// Appends bytes to the buffered response body.
    pub fn write(&self, buf: &[u8]) {
        self.parts.lock().body.extend_from_slice(buf);
    }

    /// Takes the buffered response, leaving a fresh one behind.
    pub(crate) fn take(&self) -> Response {
        std::mem::take(&mut *self.parts.lock())
    }
}
