//! # Morph
//!
//! Adapt plain functions into HTTP handlers.
//!
//! A function's parameter list and return type declare its data contract.
//! At registration, morph analyzes the signature once and freezes a
//! **binding plan**; per request, it populates the arguments from the
//! request, invokes the function, and encodes the returned value into the
//! response.
//!
//! ## Binding sources
//!
//! | Parameter type | Source |
//! |----------------|--------|
//! | [`Request`] | Pass-through: the in-flight request |
//! | [`ResponseHandle`] | Pass-through: the response destination |
//! | `#[derive(Bind)]` struct | Form body, path, query, and/or JSON body |
//! | Scalar (`bool`, integers, floats, `String`) | Inert, default value |
//!
//! A struct parameter may be eligible for several sources at once: the
//! flat sources (form, path, query) by carrying `#[bind(...)]` field tags,
//! and the JSON body always. Which body source applies to a given request
//! is decided by its `Content-Type`, never by the plan.
//!
//! ## Return values
//!
//! Strings render as `text/plain`; scalars, sequences, maps,
//! `serde_json::Value`, and [`Json`]-wrapped values render as
//! `application/json`; `()` renders nothing. Wrapping any of these in
//! `Result` adds the error channel: an `Err` suppresses the payload and
//! answers with a server-fault status and the error's text.
//!
//! ## Example
//!
//! ```rust
//! use morph::{Adapter, Bind, Request, Response};
//! use serde::Deserialize;
//!
//! #[derive(Bind, Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct OrderPizza {
//!     #[bind(form = "size", query = "size")]
//!     size: String,
//!     #[bind(form = "toppings", query = "toppings")]
//!     toppings: Vec<String>,
//! }
//!
//! fn order_pizza(order: OrderPizza) -> String {
//!     format!("{order:?}")
//! }
//!
//! let adapter = Adapter::new();
//! let route = adapter.handler(order_pizza);
//!
//! let req = Request::builder()
//!     .method(http::Method::POST)
//!     .uri("/order-pizza")
//!     .header("content-type", "application/x-www-form-urlencoded")
//!     .body("size=Large&toppings=Pepperoni&toppings=Olives")
//!     .build();
//! let mut res = Response::new();
//! route.serve(&req, &mut res);
//!
//! assert_eq!(res.status(), http::StatusCode::OK);
//! assert!(res.text().contains("Large"));
//! ```
//!
//! ## Concurrency
//!
//! Everything is synchronous. A [`Route`] is immutable after registration
//! and serves concurrent requests through `&self`; all per-request state is
//! freshly allocated and never shared.

#![doc(html_root_url = "https://docs.rs/morph/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod adapter;
pub mod bind;
mod encode;
mod error;
pub mod fields;
mod handler;
mod outcome;
mod path;
pub mod plan;
mod request;
mod response;

// Re-export main types
pub use adapter::{Adapter, Route};
pub use bind::{BindArg, BindCx};
pub use error::{BindError, FieldError};
pub use fields::{Bind, Field, FieldBinder, FieldParse, Mapper, MapperSet, TagGroup};
pub use handler::Handler;
pub use outcome::{IntoOutcome, Json, Outcome, Payload, Rendered};
pub use path::{KeyValuePath, PathParams};
pub use plan::{ArgBinding, BindPlan, PassThrough, ValueBinding};
pub use request::{Body, Request, RequestBuilder};
pub use response::{Response, ResponseHandle, ResponseWriter};

/// Derive macro generating the [`fields::Bind`] schema (key tables and
/// field setters) plus the [`bind::BindArg`] glue for a struct with
/// `#[bind(...)]` field tags. Shares its name with the trait it implements,
/// so one import brings both.
pub use morph_derive::Bind;
