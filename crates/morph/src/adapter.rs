//! Registration: turning functions into servable routes.

use crate::bind::BindCx;
use crate::encode;
use crate::fields::MapperSet;
use crate::handler::{ErasedHandler, Handler, HandlerFn};
use crate::path::PathParams;
use crate::plan::BindPlan;
use crate::request::Request;
use crate::response::{ResponseHandle, ResponseWriter};
use std::fmt;
use std::sync::Arc;

/// The adapter: mapper configuration plus an optional path-param provider.
///
/// An `Adapter` is the registration front door. It holds the three field
/// mappers and the provider by value/reference for the lifetime of every
/// route it creates, rather than consulting process-wide globals.
///
/// # Example
///
/// ```rust
/// use morph::{Adapter, KeyValuePath, Request, Response};
///
/// fn hello() -> String {
///     "Hello, World!".to_string()
/// }
///
/// let adapter = Adapter::new().path_params(KeyValuePath);
/// let route = adapter.handler(hello);
///
/// let req = Request::builder().uri("/hello").build();
/// let mut res = Response::new();
/// route.serve(&req, &mut res);
/// assert_eq!(res.text(), "Hello, World!");
/// ```
#[derive(Clone, Default)]
pub struct Adapter {
    mappers: MapperSet,
    path_params: Option<Arc<dyn PathParams>>,
}

impl Adapter {
    /// Creates an adapter with the three default mappers and no path-param
    /// provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole mapper set.
    #[must_use]
    pub fn mappers(mut self, mappers: MapperSet) -> Self {
        self.mappers = mappers;
        self
    }

    /// Sets the path-param provider.
    ///
    /// Without one, path-eligible arguments are silently skipped; that is a
    /// documented limitation, not a fault.
    #[must_use]
    pub fn path_params(mut self, provider: impl PathParams + 'static) -> Self {
        self.path_params = Some(Arc::new(provider));
        self
    }

    /// Registers a function as a route, analyzing its signature once.
    #[must_use]
    pub fn handler<F, Args>(&self, f: F) -> Route
    where
        F: Handler<Args>,
        Args: 'static,
    {
        let plan = F::plan(&self.mappers);
        tracing::trace!(?plan, "binding plan built");
        Route {
            kind: RouteKind::Planned {
                plan,
                handler: Box::new(HandlerFn::new(f)),
            },
            mappers: self.mappers,
            path_params: self.path_params.clone(),
        }
    }

    /// Registers an already-complete handler, bypassing the binding
    /// machinery entirely.
    ///
    /// Use this for functions that already speak request/writer directly;
    /// they are stored and invoked with zero per-request overhead.
    #[must_use]
    pub fn raw<F>(&self, f: F) -> Route
    where
        F: Fn(&Request, &mut dyn ResponseWriter) + Send + Sync + 'static,
    {
        Route {
            kind: RouteKind::Raw(Box::new(f)),
            mappers: self.mappers,
            path_params: self.path_params.clone(),
        }
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("mappers", &self.mappers)
            .field("path_params", &self.path_params.is_some())
            .finish()
    }
}

type RawFn = Box<dyn Fn(&Request, &mut dyn ResponseWriter) + Send + Sync>;

enum RouteKind {
    Raw(RawFn),
    Planned {
        plan: BindPlan,
        handler: Box<dyn ErasedHandler>,
    },
}

/// One registered function plus its frozen binding plan.
///
/// A route is immutable after registration: the plan is read-only and the
/// route serves concurrent requests through `&self` without coordination.
pub struct Route {
    kind: RouteKind,
    mappers: MapperSet,
    path_params: Option<Arc<dyn PathParams>>,
}

impl Route {
    /// The route's binding plan; `None` for raw routes, which have none.
    #[must_use]
    pub fn plan(&self) -> Option<&BindPlan> {
        match &self.kind {
            RouteKind::Raw(_) => None,
            RouteKind::Planned { plan, .. } => Some(plan),
        }
    }

    /// Serves one request, writing exactly one response.
    pub fn serve(&self, req: &Request, w: &mut dyn ResponseWriter) {
        match &self.kind {
            RouteKind::Raw(f) => f(req, w),
            RouteKind::Planned { plan, handler } => {
                let response = ResponseHandle::new();
                let mut cx = BindCx::new(
                    req,
                    &self.mappers,
                    self.path_params.as_deref(),
                    &response,
                );
                match handler.call(&mut cx, plan) {
                    Ok(outcome) => {
                        encode::respond(w, response.take(), outcome, plan.has_payload());
                    }
                    Err(err) => {
                        tracing::debug!(%err, "request binding failed");
                        encode::respond_bind_error(w, &err);
                    }
                }
            }
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RouteKind::Raw(_) => f.debug_struct("Route").field("kind", &"raw").finish(),
            RouteKind::Planned { plan, .. } => f
                .debug_struct("Route")
                .field("kind", &"planned")
                .field("plan", plan)
                .finish(),
        }
    }
}
