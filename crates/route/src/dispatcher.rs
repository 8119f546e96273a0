//! Per-request dispatch.
//!
//! Dispatch runs a small state machine:
//!
//! ```text
//! Start -> MethodLookup -> Matched
//!                       \-> CatchAllLookup -> Matched
//!                                          \-> NotFound
//! ```
//!
//! `Matched` binds the route's parameters to the handler's manifest and calls
//! the handler. `NotFound` is handed back to the caller as a value; producing a
//! response for it is up to the transport.

use crate::error::DispatchError;
use crate::handler::{DeclaredParam, Fallback, HandlerArgs, RouteHandler};
use crate::matcher::{Matcher, Route};
use crate::parser::TemplateParser;
use crate::table::{MethodToken, RouteTable};
use std::sync::Arc;
use tracing::{debug, trace};

/// A handler as stored in the route tables.
pub type BoxedHandler<R> = Arc<dyn RouteHandler<R>>;

/// What a dispatch ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome<R> {
    /// A handler ran and produced this value.
    Matched(R),
    NotFound,
}

impl<R> DispatchOutcome<R> {
    #[inline]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn into_matched(self) -> Option<R> {
        match self {
            Self::Matched(result) => Some(result),
            Self::NotFound => None,
        }
    }
}

enum DispatchState<'r, R> {
    Start,
    MethodLookup(MethodToken),
    CatchAllLookup,
    Matched(Route, &'r BoxedHandler<R>),
    NotFound,
}

/// Borrows a router's table for the duration of one request.
pub(crate) struct Dispatcher<'r, R> {
    parser: &'r TemplateParser,
    table: &'r RouteTable<BoxedHandler<R>>,
}

impl<'r, R> Dispatcher<'r, R> {
    pub(crate) fn new(parser: &'r TemplateParser, table: &'r RouteTable<BoxedHandler<R>>) -> Self {
        Self { parser, table }
    }

    /// Finds the route for `path`: the method's own table first, then catch-all.
    ///
    /// `method` is `None` for HTTP methods that have no table of their own.
    pub(crate) fn resolve(&self, method: Option<MethodToken>, path: &str) -> Option<(Route, &'r BoxedHandler<R>)> {
        let matcher = Matcher::new(self.parser);

        let mut state = DispatchState::Start;
        loop {
            state = match state {
                DispatchState::Start => match method {
                    Some(method) if method != MethodToken::CatchAll => DispatchState::MethodLookup(method),
                    _ => DispatchState::CatchAllLookup,
                },
                DispatchState::MethodLookup(method) => {
                    match matcher.best_match(path, self.table.lookup(method).candidates()) {
                        Some((route, handler)) => DispatchState::Matched(route, handler),
                        None => {
                            trace!(%method, path, "no method route, trying catch-all");
                            DispatchState::CatchAllLookup
                        }
                    }
                }
                DispatchState::CatchAllLookup => {
                    match matcher.best_match(path, self.table.lookup(MethodToken::CatchAll).candidates()) {
                        Some((route, handler)) => DispatchState::Matched(route, handler),
                        None => DispatchState::NotFound,
                    }
                }
                DispatchState::Matched(route, handler) => {
                    debug!(?method, path, template = route.template().raw(), score = route.score(), "route matched");
                    return Some((route, handler));
                }
                DispatchState::NotFound => {
                    debug!(?method, path, "no route found");
                    return None;
                }
            };
        }
    }

    pub(crate) fn dispatch(&self, method: Option<MethodToken>, path: &str) -> Result<DispatchOutcome<R>, DispatchError> {
        let Some((route, handler)) = self.resolve(method, path) else {
            return Ok(DispatchOutcome::NotFound);
        };

        let args = bind(route, handler.declared_params())?;
        Ok(DispatchOutcome::Matched(handler.call(args)))
    }
}

/// Assigns the route's values to the declared parameters, in manifest order.
pub(crate) fn bind(route: Route, declared: &[DeclaredParam]) -> Result<HandlerArgs, DispatchError> {
    let template = route.template().raw().to_owned();
    let mut params = route.into_params();

    let values = declared
        .iter()
        .map(|param| {
            let value = match (params.remove(param.name()), param.fallback()) {
                (Some(value), _) => Some(value),
                (None, Fallback::Default(value)) => Some(value.clone()),
                (None, Fallback::Optional) => None,
                (None, Fallback::Required) => {
                    return Err(DispatchError::missing_route_parameter(&template, param.name()));
                }
            };
            Ok((param.name().to_owned(), value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !params.is_empty() {
        trace!(template = %template, unused = ?params.keys().collect::<Vec<_>>(), "route parameters not declared by handler");
    }

    Ok(HandlerArgs::new(values, params))
}
