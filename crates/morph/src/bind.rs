//! Per-parameter binding: classification at plan time, population per
//! request.
//!
//! Every handler parameter type implements [`BindArg`]. Classification runs
//! once at registration and feeds the binding plan; `produce` runs per
//! request, in declared parameter order, and builds the call argument set.
//! For a data-bound argument the fixed source order is path, then query,
//! then body, with body binding gated strictly on the declared content type
//! so a handler that never touches the body never pays for reading it.

use crate::error::BindError;
use crate::fields::{Bind, MapperSet};
use crate::path::PathParams;
use crate::plan::{ArgBinding, ValueBinding};
use crate::request::Request;
use crate::response::ResponseHandle;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;

/// A handler parameter the adapter knows how to supply.
///
/// Implementations come from three places: the pass-through types
/// ([`Request`], [`ResponseHandle`]), inert scalars (populated with their
/// default value), and `#[derive(Bind)]` structs (data-bound).
pub trait BindArg: Sized {
    /// Classifies this parameter type against the configured mappers.
    fn classify(mappers: &MapperSet) -> ArgBinding;

    /// Produces the argument value for one request.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] on body-read, JSON-decode, or form-parse
    /// faults; any fault aborts binding before the handler is invoked.
    fn produce(cx: &mut BindCx<'_>, binding: &ArgBinding) -> Result<Self, BindError>;
}

/// Per-request binding context.
///
/// Freshly created for every request and discarded after the call; the
/// parsed query and form maps are cached here so multiple targeted
/// arguments share one parse.
pub struct BindCx<'a> {
    req: &'a Request,
    mappers: &'a MapperSet,
    path_params: Option<&'a dyn PathParams>,
    response: &'a ResponseHandle,
    query: Option<IndexMap<String, Vec<String>>>,
    form: Option<IndexMap<String, Vec<String>>>,
}

impl<'a> BindCx<'a> {
    pub(crate) fn new(
        req: &'a Request,
        mappers: &'a MapperSet,
        path_params: Option<&'a dyn PathParams>,
        response: &'a ResponseHandle,
    ) -> Self {
        Self {
            req,
            mappers,
            path_params,
            response,
            query: None,
            form: None,
        }
    }

    /// Query pairs, parsed leniently on first use.
    fn query_pairs(&mut self) -> &IndexMap<String, Vec<String>> {
        let req = self.req;
        self.query.get_or_insert_with(|| {
            let raw = req.query_string().unwrap_or("");
            group_pairs(
                form_urlencoded::parse(raw.as_bytes())
                    .map(|(name, value)| (name.into_owned(), value.into_owned())),
            )
        })
    }

    /// Form pairs, parsed strictly on first use.
    fn form_pairs(&mut self) -> Result<&IndexMap<String, Vec<String>>, BindError> {
        if self.form.is_none() {
            let bytes = self.req.body().bytes()?;
            let text = std::str::from_utf8(&bytes)
                .map_err(|err| BindError::FormParse(format!("invalid utf-8: {err}")))?;
            let pairs: Vec<(String, String)> = serde_urlencoded::from_str(text)
                .map_err(|err| BindError::FormParse(err.to_string()))?;
            self.form = Some(group_pairs(pairs));
        }
        Ok(self.form.get_or_insert_with(IndexMap::new))
    }
}

fn group_pairs(
    pairs: impl IntoIterator<Item = (String, String)>,
) -> IndexMap<String, Vec<String>> {
    let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
    for (name, value) in pairs {
        grouped.entry(name).or_default().push(value);
    }
    grouped
}

impl BindArg for Request {
    fn classify(_mappers: &MapperSet) -> ArgBinding {
        ArgBinding::Request
    }

    fn produce(cx: &mut BindCx<'_>, _binding: &ArgBinding) -> Result<Self, BindError> {
        Ok(cx.req.clone())
    }
}

impl BindArg for ResponseHandle {
    fn classify(_mappers: &MapperSet) -> ArgBinding {
        ArgBinding::Writer
    }

    fn produce(cx: &mut BindCx<'_>, _binding: &ArgBinding) -> Result<Self, BindError> {
        Ok(cx.response.clone())
    }
}

/// Inert scalar parameters: no binding sources, supplied as their default.
macro_rules! inert_arg_impls {
    ($($ty:ty),* $(,)?) => {
        $(
            impl BindArg for $ty {
                fn classify(_mappers: &MapperSet) -> ArgBinding {
                    ArgBinding::Value(ValueBinding::default())
                }

                fn produce(
                    _cx: &mut BindCx<'_>,
                    _binding: &ArgBinding,
                ) -> Result<Self, BindError> {
                    Ok(Self::default())
                }
            }
        )*
    };
}

inert_arg_impls!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String,
);

/// Plan-time classification for a `#[derive(Bind)]` struct parameter.
///
/// Eligibility per flat source is decided by asking each configured mapper
/// whether the type exposes keys for it; path keys are resolved here so the
/// per-request lookup only fetches known names. Every derived struct is
/// additionally a whole-body JSON target.
pub fn classify_value<T: Bind>(mappers: &MapperSet) -> ArgBinding {
    ArgBinding::Value(ValueBinding {
        form: mappers.form.is_some_and(|m| !m.keys::<T>().is_empty()),
        query: mappers.query.is_some_and(|m| !m.keys::<T>().is_empty()),
        json: true,
        path_keys: mappers.path.and_then(|m| {
            let keys = m.keys::<T>();
            (!keys.is_empty()).then_some(keys)
        }),
    })
}

/// Request-time population for a `#[derive(Bind)]` struct parameter.
///
/// # Errors
///
/// Returns a [`BindError`] on body-read, JSON-decode, or form-parse faults.
pub fn produce_value<T>(cx: &mut BindCx<'_>, binding: &ArgBinding) -> Result<T, BindError>
where
    T: Bind + DeserializeOwned,
{
    let ArgBinding::Value(binding) = binding else {
        unreachable!("plan and signature are built from the same parameter list");
    };
    let mut value = T::default();

    if let Some(keys) = binding.path_keys {
        match (cx.path_params, cx.mappers.path) {
            (Some(provider), Some(mapper)) => {
                let req = cx.req;
                let mut fields = mapper.bind(&mut value);
                for key in keys {
                    let raw = provider.lookup(req, key);
                    fields.set(key, &[raw.as_str()]);
                }
            }
            _ => {
                tracing::debug!(
                    "argument has path targets but no path-param provider, binding skipped"
                );
            }
        }
    }

    if binding.query {
        if let Some(mapper) = cx.mappers.query {
            let pairs = cx.query_pairs();
            let mut fields = mapper.bind(&mut value);
            for (name, values) in pairs {
                let values: Vec<&str> = values.iter().map(String::as_str).collect();
                fields.set(name, &values);
            }
        }
    }

    let content_type = cx.req.content_type();
    if binding.json && content_type == Some(mime::APPLICATION_JSON.as_ref()) {
        // Every JSON target decodes the same cached bytes independently.
        let bytes = cx.req.body().bytes()?;
        value = serde_json::from_slice(&bytes)?;
    } else if binding.form && content_type == Some(mime::APPLICATION_WWW_FORM_URLENCODED.as_ref())
    {
        if let Some(mapper) = cx.mappers.form {
            let pairs = cx.form_pairs()?;
            let mut fields = mapper.bind(&mut value);
            for (name, values) in pairs {
                let values: Vec<&str> = values.iter().map(String::as_str).collect();
                fields.set(name, &values);
            }
        }
    }

    Ok(value)
}
