//! A router that can take registrations after dispatch has started.
//!
//! Readers always see a complete, immutable [`Router`] snapshot and never
//! block. A late registration builds a new router from the current one and
//! publishes it atomically; writers are serialized among themselves.

use crate::dispatcher::DispatchOutcome;
use crate::error::{DispatchError, RouteError};
use crate::request::RouteRequest;
use crate::router::{Router, RouterBuilder};
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

pub struct SharedRouter<R> {
    current: ArcSwap<Router<R>>,
    writer: Mutex<()>,
}

impl<R> SharedRouter<R> {
    pub fn new(router: Router<R>) -> Self {
        Self { current: ArcSwap::from_pointee(router), writer: Mutex::new(()) }
    }

    /// The router currently published.
    pub fn load(&self) -> Arc<Router<R>> {
        self.current.load_full()
    }

    /// Replaces the published router.
    pub fn store(&self, router: Router<R>) {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.current.store(Arc::new(router));
    }

    /// Registers more routes on top of the current router.
    ///
    /// If `f` fails, the published router is left as it was.
    pub fn update<F>(&self, f: F) -> Result<(), RouteError>
    where
        F: FnOnce(RouterBuilder<R>) -> Result<RouterBuilder<R>, RouteError>,
    {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let builder = self.current.load().to_builder();
        let router = f(builder)?.build();
        self.current.store(Arc::new(router));
        debug!("published updated router");
        Ok(())
    }

    pub fn route<Req: RouteRequest + ?Sized>(&self, request: &Req) -> Result<DispatchOutcome<R>, DispatchError> {
        self.current.load().route(request)
    }
}

impl<R> From<Router<R>> for SharedRouter<R> {
    fn from(router: Router<R>) -> Self {
        Self::new(router)
    }
}

impl<R> fmt::Debug for SharedRouter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRouter").field("current", &self.current.load_full()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{handler_fn, DeclaredParam, HandlerArgs, RouteHandler};
    use http::Method;
    use std::thread;

    fn named(name: &'static str) -> impl RouteHandler<String> {
        handler_fn(Vec::<DeclaredParam>::new(), move |_args: HandlerArgs| name.to_owned())
    }

    #[test]
    fn test_late_registration() {
        let shared = SharedRouter::new(Router::builder().get("/a", named("a")).unwrap().build());
        let before = shared.load();

        shared.update(|builder| builder.get("/b", named("b"))).unwrap();

        assert_eq!(shared.route(&(Method::GET, "/b")), Ok(DispatchOutcome::Matched("b".into())));
        assert_eq!(shared.route(&(Method::GET, "/a")), Ok(DispatchOutcome::Matched("a".into())));
        assert_eq!(before.route(&(Method::GET, "/b")), Ok(DispatchOutcome::NotFound));
    }

    #[test]
    fn test_failed_update_keeps_router() {
        let shared = SharedRouter::new(Router::builder().get("/a", named("a")).unwrap().build());

        let err = shared.update(|builder| builder.get("/{float:x}", named("x"))).unwrap_err();
        assert!(matches!(err, RouteError::InvalidRouteType { .. }));
        assert_eq!(shared.route(&(Method::GET, "/a")), Ok(DispatchOutcome::Matched("a".into())));
    }

    #[test]
    fn test_store_replaces_router() {
        let shared: SharedRouter<String> = Router::builder().get("/a", named("a")).unwrap().build().into();
        shared.store(Router::builder().get("/c", named("c")).unwrap().build());

        assert_eq!(shared.route(&(Method::GET, "/a")), Ok(DispatchOutcome::NotFound));
        assert_eq!(shared.route(&(Method::GET, "/c")), Ok(DispatchOutcome::Matched("c".into())));
    }

    #[test]
    fn test_concurrent_readers() {
        let shared = Arc::new(SharedRouter::new(Router::builder().get("/a", named("a")).unwrap().build()));

        let readers = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..100 {
                        assert!(shared.route(&(Method::GET, "/a")).unwrap().is_matched());
                    }
                })
            })
            .collect::<Vec<_>>();

        shared.update(|builder| builder.get("/b", named("b"))).unwrap();

        for reader in readers {
            reader.join().unwrap();
        }
        assert!(shared.route(&(Method::GET, "/b")).unwrap().is_matched());
    }
}
