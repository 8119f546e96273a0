//! Route registration and the frozen router.
//!
//! Routes are registered on a [`RouterBuilder`]. Templates are parsed as they
//! are registered, so a malformed template fails the registration call that
//! introduced it. [`RouterBuilder::build`] freezes the table into a [`Router`],
//! which is read-only and can be shared between threads without locking.
//!
//! ```
//! use micro_route::{handler_fn, DeclaredParam, DispatchOutcome, HandlerArgs, Router};
//! use http::Method;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let router = Router::builder()
//!     .get("/users/{int:id}", handler_fn(["id"], |args: HandlerArgs| format!("user {}", args.get_int("id").unwrap_or_default())))?
//!     .catch_all("/{page}", handler_fn(["page"], |args: HandlerArgs| format!("page {}", args.get_str("page").unwrap_or_default())))?
//!     .build();
//!
//! let outcome = router.route(&(Method::GET, "/users/42"))?;
//! assert_eq!(outcome, DispatchOutcome::Matched("user 42".to_string()));
//!
//! let outcome = router.route(&(Method::POST, "/about"))?;
//! assert_eq!(outcome, DispatchOutcome::Matched("page about".to_string()));
//! # Ok(())
//! # }
//! ```

use crate::config::RouterConfig;
use crate::dispatcher::{BoxedHandler, DispatchOutcome, Dispatcher};
use crate::error::{DispatchError, RouteError};
use crate::handler::RouteHandler;
use crate::matcher::Route;
use crate::parser::{Delimiters, TemplateParser};
use crate::request::RouteRequest;
use crate::table::{MethodToken, RouteTable};
use crate::template::TemplateCache;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// An immutable set of routes.
pub struct Router<R> {
    parser: TemplateParser,
    cache: TemplateCache,
    table: RouteTable<BoxedHandler<R>>,
}

impl<R> Router<R> {
    /// Creates a builder splitting on the default delimiters `/ . _ -`.
    pub fn builder() -> RouterBuilder<R> {
        RouterBuilder::new(TemplateParser::default())
    }

    pub fn builder_with_delimiters(delimiters: Delimiters) -> RouterBuilder<R> {
        RouterBuilder::new(TemplateParser::new(delimiters))
    }

    pub fn builder_with_config(config: &RouterConfig) -> Result<RouterBuilder<R>, RouteError> {
        config.delimiters().map(Self::builder_with_delimiters)
    }

    /// Starts a new registration phase from this router's routes.
    ///
    /// The router itself is left untouched.
    pub fn to_builder(&self) -> RouterBuilder<R> {
        RouterBuilder { parser: self.parser.clone(), cache: self.cache.clone(), table: self.table.clone() }
    }

    pub fn parser(&self) -> &TemplateParser {
        &self.parser
    }

    pub fn table(&self) -> &RouteTable<BoxedHandler<R>> {
        &self.table
    }

    /// Finds the best route for `path` without calling its handler.
    ///
    /// `method` of `None` (an HTTP method with no table of its own) consults
    /// catch-all routes only.
    pub fn at(&self, method: Option<MethodToken>, path: &str) -> Option<(Route, &dyn RouteHandler<R>)> {
        Dispatcher::new(&self.parser, &self.table)
            .resolve(method, path)
            .map(|(route, handler)| (route, &**handler as &dyn RouteHandler<R>))
    }

    /// Dispatches `request` to its handler.
    ///
    /// A request no route matches yields [`DispatchOutcome::NotFound`]; nothing
    /// is written anywhere.
    pub fn route<Req: RouteRequest + ?Sized>(&self, request: &Req) -> Result<DispatchOutcome<R>, DispatchError> {
        self.dispatch(MethodToken::from_method(request.method()), request.path())
    }

    pub fn dispatch(&self, method: Option<MethodToken>, path: &str) -> Result<DispatchOutcome<R>, DispatchError> {
        Dispatcher::new(&self.parser, &self.table).dispatch(method, path)
    }
}

impl<R> Clone for Router<R> {
    fn clone(&self) -> Self {
        Self { parser: self.parser.clone(), cache: self.cache.clone(), table: self.table.clone() }
    }
}

impl<R> fmt::Debug for Router<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut routes = f.debug_map();
        for method in MethodToken::ALL {
            let table = self.table.lookup(method);
            if !table.is_empty() {
                routes.entry(&method, &table.iter().map(|entry| entry.template().raw()).collect::<Vec<_>>());
            }
        }
        routes.finish()
    }
}

/// Collects route registrations before they are frozen into a [`Router`].
pub struct RouterBuilder<R> {
    parser: TemplateParser,
    cache: TemplateCache,
    table: RouteTable<BoxedHandler<R>>,
}

macro_rules! method_route {
    ($method:ident, $token:ident) => {
        #[doc = concat!("Registers `template` for ", stringify!($token), " requests.")]
        pub fn $method<H: RouteHandler<R> + 'static>(self, template: &str, handler: H) -> Result<Self, RouteError> {
            self.route(&[MethodToken::$token], template, handler)
        }
    };
}

impl<R> RouterBuilder<R> {
    fn new(parser: TemplateParser) -> Self {
        Self { parser, cache: TemplateCache::new(), table: RouteTable::new() }
    }

    method_route!(get, Get);
    method_route!(post, Post);
    method_route!(put, Put);
    method_route!(patch, Patch);
    method_route!(delete, Delete);
    method_route!(options, Options);
    method_route!(catch_all, CatchAll);

    /// Registers `template` under every method in `methods`.
    ///
    /// Registering a template string already present for a method replaces
    /// the earlier handler.
    pub fn route<H: RouteHandler<R> + 'static>(
        mut self,
        methods: &[MethodToken],
        template: &str,
        handler: H,
    ) -> Result<Self, RouteError> {
        let handler: BoxedHandler<R> = Arc::new(handler);
        self.register(methods, template, &handler)?;
        Ok(self)
    }

    /// Like [`RouterBuilder::route`], sharing an already boxed handler.
    pub fn route_shared(
        mut self,
        methods: &[MethodToken],
        template: &str,
        handler: Arc<dyn RouteHandler<R>>,
    ) -> Result<Self, RouteError> {
        self.register(methods, template, &handler)?;
        Ok(self)
    }

    fn register(&mut self, methods: &[MethodToken], template: &str, handler: &BoxedHandler<R>) -> Result<(), RouteError> {
        let parsed = self.cache.get_or_parse(&self.parser, template)?;
        debug!(?methods, template, "register route");
        self.table.register(methods, &parsed, handler);
        Ok(())
    }

    pub fn parser(&self) -> &TemplateParser {
        &self.parser
    }

    /// Ends the registration phase.
    pub fn build(self) -> Router<R> {
        Router { parser: self.parser, cache: self.cache, table: self.table }
    }
}

impl<R> fmt::Debug for RouterBuilder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("delimiters", self.parser.delimiters())
            .field("templates", &self.cache.len())
            .finish_non_exhaustive()
    }
}
