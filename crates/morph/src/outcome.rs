//! Return-value classification and conversion.
//!
//! A handler's return type decides, at registration, whether the route has a
//! payload at all ([`IntoOutcome::HAS_BODY`]) and, per request, how the
//! returned value is rendered. `Result` carries the error channel: an `Err`
//! takes absolute precedence and suppresses any payload.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Deref;

/// A payload value rendered for the response body.
#[derive(Debug)]
pub enum Rendered {
    /// No body.
    Empty,
    /// UTF-8 plain text.
    Text(String),
    /// JSON bytes, or the marshal failure.
    Json(Result<Vec<u8>, serde_json::Error>),
}

/// The invoker's verdict on one call.
#[derive(Debug)]
pub enum Outcome {
    /// The call succeeded; the payload (possibly empty) is rendered.
    Success(Rendered),
    /// The call returned an error; its display text becomes the body.
    Failure(String),
}

/// A return kind eligible for the response body.
///
/// Text kinds (`String`, `&'static str`) render as plain text; every other
/// implementor renders as JSON. `()` is the "no body" kind. Types outside
/// this whitelist do not implement the trait and are rejected when the
/// handler is registered.
pub trait Payload {
    /// Whether this kind ever produces a body.
    const HAS_BODY: bool = true;

    /// Renders the value.
    fn render(self) -> Rendered;
}

/// Conversion from a handler's return value into an [`Outcome`].
pub trait IntoOutcome {
    /// Whether the route's plan should expect a payload.
    const HAS_BODY: bool;

    /// Converts the returned value.
    fn into_outcome(self) -> Outcome;
}

/// Marker forcing a serializable value to render as JSON.
///
/// Useful for struct returns, where the flat whitelist cannot enumerate the
/// type: `Json(user)` renders `user` with `serde_json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Consumes the wrapper and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Payload for () {
    const HAS_BODY: bool = false;

    fn render(self) -> Rendered {
        Rendered::Empty
    }
}

impl IntoOutcome for () {
    const HAS_BODY: bool = false;

    fn into_outcome(self) -> Outcome {
        Outcome::Success(Rendered::Empty)
    }
}

impl Payload for String {
    fn render(self) -> Rendered {
        Rendered::Text(self)
    }
}

impl Payload for &'static str {
    fn render(self) -> Rendered {
        Rendered::Text(self.to_string())
    }
}

/// JSON-rendered scalar kinds.
macro_rules! json_payload_impls {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Payload for $ty {
                fn render(self) -> Rendered {
                    Rendered::Json(serde_json::to_vec(&self))
                }
            }
        )*
    };
}

json_payload_impls!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
    serde_json::Value,
);

impl<T: Serialize> Payload for Option<T> {
    fn render(self) -> Rendered {
        Rendered::Json(serde_json::to_vec(&self))
    }
}

impl<T: Serialize> Payload for Vec<T> {
    fn render(self) -> Rendered {
        Rendered::Json(serde_json::to_vec(&self))
    }
}

impl<T: Serialize, const N: usize> Payload for [T; N] {
    fn render(self) -> Rendered {
        Rendered::Json(serde_json::to_vec(&self))
    }
}

impl<K: Serialize + Eq + std::hash::Hash, V: Serialize> Payload for HashMap<K, V> {
    fn render(self) -> Rendered {
        Rendered::Json(serde_json::to_vec(&self))
    }
}

impl<K: Serialize + Ord, V: Serialize> Payload for BTreeMap<K, V> {
    fn render(self) -> Rendered {
        Rendered::Json(serde_json::to_vec(&self))
    }
}

impl<T: Serialize> Payload for Json<T> {
    fn render(self) -> Rendered {
        Rendered::Json(serde_json::to_vec(&self.0))
    }
}

/// Bare-payload returns succeed unconditionally.
macro_rules! into_outcome_impls {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoOutcome for $ty {
                const HAS_BODY: bool = true;

                fn into_outcome(self) -> Outcome {
                    Outcome::Success(self.render())
                }
            }
        )*
    };
}

into_outcome_impls!(
    String,
    &'static str,
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    serde_json::Value,
);

impl<T: Serialize> IntoOutcome for Option<T> {
    const HAS_BODY: bool = true;

    fn into_outcome(self) -> Outcome {
        Outcome::Success(self.render())
    }
}

impl<T: Serialize> IntoOutcome for Vec<T> {
    const HAS_BODY: bool = true;

    fn into_outcome(self) -> Outcome {
        Outcome::Success(self.render())
    }
}

impl<T: Serialize, const N: usize> IntoOutcome for [T; N] {
    const HAS_BODY: bool = true;

    fn into_outcome(self) -> Outcome {
        Outcome::Success(self.render())
    }
}

impl<K: Serialize + Eq + std::hash::Hash, V: Serialize> IntoOutcome for HashMap<K, V> {
    const HAS_BODY: bool = true;

    fn into_outcome(self) -> Outcome {
        Outcome::Success(self.render())
    }
}

impl<K: Serialize + Ord, V: Serialize> IntoOutcome for BTreeMap<K, V> {
    const HAS_BODY: bool = true;

    fn into_outcome(self) -> Outcome {
        Outcome::Success(self.render())
    }
}

impl<T: Serialize> IntoOutcome for Json<T> {
    const HAS_BODY: bool = true;

    fn into_outcome(self) -> Outcome {
        Outcome::Success(self.render())
    }
}

impl<P: Payload, E: fmt::Display> IntoOutcome for Result<P, E> {
    const HAS_BODY: bool = P::HAS_BODY;

    fn into_outcome(self) -> Outcome {
        match self {
            Ok(payload) => Outcome::Success(payload.render()),
            Err(err) => Outcome::Failure(err.to_string()),
        }
    }
}
