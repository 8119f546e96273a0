//! Route handlers and their declared parameters.
//!
//! A handler declares, at registration time, the route parameters it wants
//! to receive. When a route matches, the dispatcher binds the route's values to
//! those names in declaration order and hands them over as [`HandlerArgs`].

use crate::segment::ParamValue;
use std::collections::HashMap;
use std::fmt;

/// What to do when a declared parameter has no bound value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// The dispatch fails with `MissingRouteParameter`.
    Required,
    /// The argument is passed as absent.
    Optional,
    /// The given value is passed instead.
    Default(ParamValue),
}

/// One entry of a handler's parameter manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredParam {
    name: String,
    fallback: Fallback,
}

impl DeclaredParam {
    pub fn required(name: impl Into<String>) -> Self {
        Self { name: name.into(), fallback: Fallback::Required }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self { name: name.into(), fallback: Fallback::Optional }
    }

    pub fn with_default(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self { name: name.into(), fallback: Fallback::Default(value.into()) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fallback(&self) -> &Fallback {
        &self.fallback
    }
}

impl From<&str> for DeclaredParam {
    fn from(name: &str) -> Self {
        Self::required(name)
    }
}

impl From<String> for DeclaredParam {
    fn from(name: String) -> Self {
        Self::required(name)
    }
}

/// Arguments assembled for a handler call.
///
/// Values keep the order of the handler's manifest and can be read by
/// position or by name. Route parameters the manifest did not ask for are kept
/// apart and available through [`HandlerArgs::unused`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerArgs {
    values: Vec<(String, Option<ParamValue>)>,
    unused: HashMap<String, ParamValue>,
}

impl HandlerArgs {
    pub(crate) fn new(values: Vec<(String, Option<ParamValue>)>, unused: HashMap<String, ParamValue>) -> Self {
        Self { values, unused }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.iter().find(|(key, _)| key == name).and_then(|(_, value)| value.as_ref())
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_int)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }

    /// Positional access, `None` for an absent optional argument.
    pub fn at(&self, index: usize) -> Option<&ParamValue> {
        self.values.get(index).and_then(|(_, value)| value.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ParamValue>)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Route parameters that were bound but not declared by the handler.
    pub fn unused(&self) -> &HashMap<String, ParamValue> {
        &self.unused
    }
}

/// A callable registered for a route.
///
/// `R` is whatever the owning transport expects a handler to produce; the
/// router never looks at it.
pub trait RouteHandler<R>: Send + Sync {
    /// The parameter manifest, in the order arguments are passed.
    fn declared_params(&self) -> &[DeclaredParam];

    fn call(&self, args: HandlerArgs) -> R;
}

impl<R> fmt::Debug for dyn RouteHandler<R> + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteHandler").field("declared_params", &self.declared_params()).finish()
    }
}

/// A closure holder implementing [`RouteHandler`].
pub struct FnHandler<F> {
    params: Vec<DeclaredParam>,
    f: F,
}

impl<F> FnHandler<F> {
    fn new(params: Vec<DeclaredParam>, f: F) -> Self {
        Self { params, f }
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").field("params", &self.params).finish_non_exhaustive()
    }
}

/// Wraps a closure and its parameter manifest into a handler.
///
/// ```
/// use micro_route::{handler_fn, DeclaredParam, HandlerArgs};
///
/// let handler = handler_fn(["id", "name"], |args: HandlerArgs| args.len());
/// let with_page = handler_fn([DeclaredParam::with_default("page", 1_i64)], |args: HandlerArgs| args.get_int("page"));
/// ```
pub fn handler_fn<F, R, I, P>(params: I, f: F) -> FnHandler<F>
where
    F: Fn(HandlerArgs) -> R + Send + Sync,
    I: IntoIterator<Item = P>,
    P: Into<DeclaredParam>,
{
    FnHandler::new(params.into_iter().map(Into::into).collect(), f)
}

impl<F, R> RouteHandler<R> for FnHandler<F>
where
    F: Fn(HandlerArgs) -> R + Send + Sync,
{
    fn declared_params(&self) -> &[DeclaredParam] {
        &self.params
    }

    fn call(&self, args: HandlerArgs) -> R {
        (self.f)(args)
    }
}
