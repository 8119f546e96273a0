//! A request router with typed path parameters.
//!
//! Routes are registered as templates such as `/users/{int:id}` or
//! `/list/{count=0}`. A request path is matched against every template of
//! its method, the most specific match wins, and the extracted parameters
//! are type-coerced and passed to the handler by name.
//!
//! # Template syntax
//!
//! - static text and delimiters match literally (`/`, `.`, `_` and `-` by default)
//! - `{name}` captures one path token as a string
//! - `{int:id}` / `{bool:flag}` only match tokens valid for the type
//! - `{page?}` is optional, `{page=1}` is optional with a default
//!
//! # Specificity
//!
//! Each segment of a matching template adds to its score: literal text and
//! delimiters 10000, typed parameters 5000, string parameters 1000. The
//! highest score wins; ties go to the template registered first.
//!
//! # Example
//!
//! ```
//! use micro_route::{handler_fn, DispatchOutcome, HandlerArgs, Router};
//! use http::Method;
//!
//! let router = Router::builder()
//!     .get("/items/{name}", handler_fn(["name"], |args: HandlerArgs| format!("by name: {}", args.get_str("name").unwrap_or_default())))
//!     .and_then(|builder| builder.get("/items/{int:id}", handler_fn(["id"], |args: HandlerArgs| format!("by id: {}", args.get_int("id").unwrap_or_default()))))
//!     .unwrap()
//!     .build();
//!
//! assert_eq!(router.route(&(Method::GET, "/items/7")), Ok(DispatchOutcome::Matched("by id: 7".to_string())));
//! assert_eq!(router.route(&(Method::GET, "/items/seven")), Ok(DispatchOutcome::Matched("by name: seven".to_string())));
//! assert_eq!(router.route(&(Method::DELETE, "/items/7")), Ok(DispatchOutcome::NotFound));
//! ```

mod config;
mod dispatcher;
mod error;
mod handler;
mod matcher;
mod request;
mod router;
mod shared;

pub mod parser;
pub mod segment;
pub mod table;
pub mod template;

pub use config::RouterConfig;
pub use dispatcher::BoxedHandler;
pub use dispatcher::DispatchOutcome;
pub use error::DispatchError;
pub use error::RouteError;
pub use handler::handler_fn;
pub use handler::DeclaredParam;
pub use handler::Fallback;
pub use handler::FnHandler;
pub use handler::HandlerArgs;
pub use handler::RouteHandler;
pub use matcher::Matcher;
pub use matcher::Route;
pub use parser::Delimiters;
pub use parser::TemplateParser;
pub use request::RouteRequest;
pub use router::Router;
pub use router::RouterBuilder;
pub use segment::ParamType;
pub use segment::ParamValue;
pub use segment::Segment;
pub use shared::SharedRouter;
pub use table::MethodToken;
pub use template::RouteTemplate;
