//! Error types for request binding and field mapping.

use http::StatusCode;
use std::io;
use thiserror::Error;

/// Error produced while populating call arguments from a request.
///
/// Every variant is a client fault: binding stops at the first failure and
/// the request is answered with a bad-request status before the handler is
/// ever invoked.
#[derive(Debug, Error)]
pub enum BindError {
    /// The request body could not be fully read into memory.
    #[error("reading request body: {0}")]
    BodyRead(#[from] io::Error),

    /// The JSON body could not be decoded into a targeted argument.
    #[error("decoding json body: {0}")]
    JsonDecode(#[from] serde_json::Error),

    /// The form-encoded body could not be parsed.
    #[error("parsing form body: {0}")]
    FormParse(String),
}

impl BindError {
    /// The HTTP status this fault maps to.
    ///
    /// Binder faults are always the caller's doing, so every variant maps
    /// to bad request. Handler and encoding faults are server faults and
    /// are handled by the response encoder instead.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BodyRead(_) | Self::JsonDecode(_) | Self::FormParse(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

/// Error produced while coercing a flat string value into a field.
///
/// Field errors never fail a request: the binder tolerates them and leaves
/// the field at its previous value, matching the tolerant write-through
/// contract of the field mapper.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The raw value could not be parsed into the field's type.
    #[error("field `{field}`: {message}")]
    Coerce {
        /// Destination field key.
        field: &'static str,
        /// Parser failure text.
        message: String,
    },
}
