//! The handler contract over arbitrary function signatures.
//!
//! [`Handler`] is implemented for plain functions and closures of up to
//! eight parameters, where every parameter implements
//! [`BindArg`](crate::bind::BindArg) and the return type implements
//! [`IntoOutcome`]. `plan` runs the signature analysis once at registration;
//! `call` binds the argument set for one request, invokes the function, and
//! captures the outcome. Anything that is not such a function simply does
//! not implement the trait, so a bad registration fails at compile time
//! rather than at request time.

use crate::bind::{BindArg, BindCx};
use crate::error::BindError;
use crate::fields::MapperSet;
use crate::outcome::{IntoOutcome, Outcome};
use crate::plan::BindPlan;
use std::marker::PhantomData;

/// A function adaptable into a route.
///
/// `Args` is a marker tuple naming the parameter types; it lets a single
/// function type carry distinct impls per arity without overlap.
pub trait Handler<Args>: Send + Sync + 'static {
    /// Analyzes the signature and produces the binding plan.
    fn plan(mappers: &MapperSet) -> BindPlan;

    /// Binds arguments, invokes the function, and captures the outcome.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] when argument binding fails; the function is
    /// not invoked in that case.
    fn call(&self, cx: &mut BindCx<'_>, plan: &BindPlan) -> Result<Outcome, BindError>;
}

macro_rules! impl_handler {
    ($($idx:tt $arg:ident),*) => {
        impl<Fun, Out, $($arg,)*> Handler<($($arg,)*)> for Fun
        where
            Fun: Fn($($arg),*) -> Out + Send + Sync + 'static,
            Out: IntoOutcome,
            $($arg: BindArg + 'static,)*
        {
            fn plan(mappers: &MapperSet) -> BindPlan {
                BindPlan::new(
                    vec![$(<$arg as BindArg>::classify(mappers)),*],
                    Out::HAS_BODY,
                )
            }

            #[allow(unused_variables, non_snake_case)]
            fn call(
                &self,
                cx: &mut BindCx<'_>,
                plan: &BindPlan,
            ) -> Result<Outcome, BindError> {
                let args = plan.args();
                $(let $arg = <$arg as BindArg>::produce(cx, &args[$idx])?;)*
                Ok((self)($($arg),*).into_outcome())
            }
        }
    };
}

impl_handler!();
impl_handler!(0 A1);
impl_handler!(0 A1, 1 A2);
impl_handler!(0 A1, 1 A2, 2 A3);
impl_handler!(0 A1, 1 A2, 2 A3, 3 A4);
impl_handler!(0 A1, 1 A2, 2 A3, 3 A4, 4 A5);
impl_handler!(0 A1, 1 A2, 2 A3, 3 A4, 4 A5, 5 A6);
impl_handler!(0 A1, 1 A2, 2 A3, 3 A4, 4 A5, 5 A6, 6 A7);
impl_handler!(0 A1, 1 A2, 2 A3, 3 A4, 4 A5, 5 A6, 6 A7, 7 A8);

/// A type-erased handler, so routes of different signatures can share one
/// storage type.
pub(crate) trait ErasedHandler: Send + Sync {
    fn call(&self, cx: &mut BindCx<'_>, plan: &BindPlan) -> Result<Outcome, BindError>;
}

/// Pairs a concrete function with its `Args` marker for erasure.
pub(crate) struct HandlerFn<F, Args> {
    f: F,
    _args: PhantomData<fn(Args)>,
}

impl<F, Args> HandlerFn<F, Args> {
    pub(crate) fn new(f: F) -> Self {
        Self {
            f,
            _args: PhantomData,
        }
    }
}

impl<F, Args> ErasedHandler for HandlerFn<F, Args>
where
    F: Handler<Args>,
    Args: 'static,
{
    fn call(&self, cx: &mut BindCx<'_>, plan: &BindPlan) -> Result<Outcome, BindError> {
        Handler::call(&self.f, cx, plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ArgBinding;
    use crate::request::Request;
    use crate::response::ResponseHandle;

    fn no_args() -> String {
        "no args".to_string()
    }

    fn pass_through(_w: ResponseHandle, _req: Request) {}

    fn mixed(_w: ResponseHandle, _req: Request, _i: i32, _f: f32) -> &'static str {
        "mixed"
    }

    #[test]
    fn test_plan_for_no_args() {
        let mappers = MapperSet::default();
        let plan = <fn() -> String as Handler<()>>::plan(&mappers);
        assert!(plan.args().is_empty());
        assert!(plan.has_payload());
    }

    #[test]
    fn test_plan_for_pass_through_signature() {
        let mappers = MapperSet::default();
        let plan =
            <fn(ResponseHandle, Request) as Handler<(ResponseHandle, Request)>>::plan(&mappers);
        assert_eq!(plan.args(), &[ArgBinding::Writer, ArgBinding::Request]);
        assert!(!plan.has_payload());
        assert!(plan.form_targets().is_empty());
        assert!(plan.json_targets().is_empty());
        assert!(plan.query_targets().is_empty());
        assert!(plan.path_targets().is_empty());
    }

    #[test]
    fn test_plan_preserves_declared_order() {
        let mappers = MapperSet::default();
        let plan = <fn(ResponseHandle, Request, i32, f32) -> &'static str as Handler<(
            ResponseHandle,
            Request,
            i32,
            f32,
        )>>::plan(&mappers);
        assert_eq!(plan.args().len(), 4);
        assert_eq!(plan.args()[0], ArgBinding::Writer);
        assert_eq!(plan.args()[1], ArgBinding::Request);
        assert!(matches!(plan.args()[2], ArgBinding::Value(_)));
        assert!(matches!(plan.args()[3], ArgBinding::Value(_)));
    }

    #[test]
    fn test_call_invokes_function() {
        let mappers = MapperSet::default();
        let plan = <fn() -> String as Handler<()>>::plan(&mappers);
        let req = Request::builder().uri("/").build();
        let response = ResponseHandle::new();
        let mut cx = BindCx::new(&req, &mappers, None, &response);

        let f: fn() -> String = no_args;
        let outcome = Handler::call(&f, &mut cx, &plan).unwrap();
        assert!(matches!(outcome, Outcome::Success(_)));
    }

    #[test]
    fn test_erased_handler_matches_direct_call() {
        let mappers = MapperSet::default();
        let plan = <fn(ResponseHandle, Request, i32, f32) -> &'static str as Handler<(
            ResponseHandle,
            Request,
            i32,
            f32,
        )>>::plan(&mappers);
        let erased: Box<dyn ErasedHandler> = Box::new(HandlerFn::<
            fn(ResponseHandle, Request, i32, f32) -> &'static str,
            (ResponseHandle, Request, i32, f32),
        >::new(mixed));

        let req = Request::builder().uri("/").build();
        let response = ResponseHandle::new();
        let mut cx = BindCx::new(&req, &mappers, None, &response);
        let outcome = erased.call(&mut cx, &plan).unwrap();
        assert!(matches!(outcome, Outcome::Success(_)));
    }

    #[test]
    fn test_closure_capturing_state() {
        let mappers = MapperSet::default();
        let greeting = "hello".to_string();
        let f = move || greeting.clone();

        let req = Request::builder().uri("/").build();
        let response = ResponseHandle::new();
        let mut cx = BindCx::new(&req, &mappers, None, &response);
        let plan = BindPlan::new(vec![], true);
        let outcome = Handler::call(&f, &mut cx, &plan).unwrap();
        assert!(matches!(outcome, Outcome::Success(_)));
    }

    #[test]
    fn test_pass_through_call_has_empty_outcome() {
        let f: fn(ResponseHandle, Request) = pass_through;
        let mappers = MapperSet::default();
        let plan = <fn(ResponseHandle, Request) as Handler<(ResponseHandle, Request)>>::plan(
            &mappers,
        );
        let req = Request::builder().uri("/").build();
        let response = ResponseHandle::new();
        let mut cx = BindCx::new(&req, &mappers, None, &response);
        let outcome = Handler::call(&f, &mut cx, &plan).unwrap();
        assert!(matches!(
            outcome,
            Outcome::Success(crate::outcome::Rendered::Empty)
        ));
    }
}
