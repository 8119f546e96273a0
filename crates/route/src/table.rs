//! Per-method route tables.
//!
//! Every [`MethodToken`], including the [`MethodToken::CatchAll`]
//! pseudo-method, owns an ordered mapping from raw template string to handler.
//! Iteration follows registration order. Registering an existing template
//! string again replaces its handler in place and keeps its original position.

use crate::template::RouteTemplate;
use http::Method;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

const METHOD_COUNT: usize = 7;

/// Method tokens routes can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MethodToken {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    /// Routes consulted for any method once the method's own table has no match.
    CatchAll,
}

impl MethodToken {
    /// Every token, in table order.
    pub const ALL: [MethodToken; METHOD_COUNT] = [
        MethodToken::Get,
        MethodToken::Post,
        MethodToken::Put,
        MethodToken::Patch,
        MethodToken::Delete,
        MethodToken::Options,
        MethodToken::CatchAll,
    ];

    /// Maps an HTTP method to its token.
    ///
    /// Methods without a table of their own (HEAD, TRACE, CONNECT, extensions)
    /// return `None` and are only served by catch-all routes.
    pub fn from_method(method: &Method) -> Option<Self> {
        match method.as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::CatchAll => "CATCHALL",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MethodToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered template together with its handler.
#[derive(Debug, Clone)]
pub struct RouteEntry<H> {
    template: Arc<RouteTemplate>,
    handler: H,
}

impl<H> RouteEntry<H> {
    pub fn template(&self) -> &Arc<RouteTemplate> {
        &self.template
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// Ordered mapping from raw template string to handler for one method.
#[derive(Debug, Clone)]
pub struct MethodRoutes<H> {
    entries: Vec<RouteEntry<H>>,
    positions: HashMap<String, usize>,
}

impl<H> Default for MethodRoutes<H> {
    fn default() -> Self {
        Self { entries: Vec::new(), positions: HashMap::new() }
    }
}

impl<H> MethodRoutes<H> {
    /// Inserts `template -> handler`, returning the handler it replaced.
    pub fn insert(&mut self, template: Arc<RouteTemplate>, handler: H) -> Option<H> {
        match self.positions.get(template.raw()) {
            Some(&position) => {
                let entry = &mut self.entries[position];
                entry.template = template;
                Some(std::mem::replace(&mut entry.handler, handler))
            }
            None => {
                self.positions.insert(template.raw().to_owned(), self.entries.len());
                self.entries.push(RouteEntry { template, handler });
                None
            }
        }
    }

    pub fn get(&self, raw: &str) -> Option<&RouteEntry<H>> {
        self.positions.get(raw).map(|&position| &self.entries[position])
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry<H>> {
        self.entries.iter()
    }

    /// `(template, handler)` pairs in registration order, the candidate set of a match.
    pub fn candidates(&self) -> impl Iterator<Item = (&Arc<RouteTemplate>, &H)> {
        self.entries.iter().map(|entry| (&entry.template, &entry.handler))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Route tables for every [`MethodToken`].
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    tables: [MethodRoutes<H>; METHOD_COUNT],
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self { tables: std::array::from_fn(|_| MethodRoutes::default()) }
    }
}

impl<H: Clone> RouteTable<H> {
    /// Registers `template -> handler` under each of `methods`.
    ///
    /// An existing registration of the same raw template under a method is
    /// replaced: the last registration wins.
    pub fn register(&mut self, methods: &[MethodToken], template: &Arc<RouteTemplate>, handler: &H) {
        for &method in methods {
            if self.tables[method.index()].insert(Arc::clone(template), handler.clone()).is_some() {
                warn!(%method, template = template.raw(), "route registered twice, replaced previous handler");
            }
        }
    }
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes of `method`; empty when nothing was registered for it.
    pub fn lookup(&self, method: MethodToken) -> &MethodRoutes<H> {
        &self.tables[method.index()]
    }

    /// Every registered template, each raw string once.
    pub fn templates(&self) -> impl Iterator<Item = &Arc<RouteTemplate>> {
        let mut seen = HashSet::new();
        self.tables
            .iter()
            .flat_map(MethodRoutes::iter)
            .map(RouteEntry::template)
            .filter(move |template| seen.insert(template.raw().to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TemplateParser;

    fn template(raw: &str) -> Arc<RouteTemplate> {
        Arc::new(TemplateParser::default().parse_template(raw).unwrap())
    }

    #[test]
    fn test_method_token_from_http() {
        assert_eq!(MethodToken::from_method(&Method::GET), Some(MethodToken::Get));
        assert_eq!(MethodToken::from_method(&Method::POST), Some(MethodToken::Post));
        assert_eq!(MethodToken::from_method(&Method::PUT), Some(MethodToken::Put));
        assert_eq!(MethodToken::from_method(&Method::PATCH), Some(MethodToken::Patch));
        assert_eq!(MethodToken::from_method(&Method::DELETE), Some(MethodToken::Delete));
        assert_eq!(MethodToken::from_method(&Method::OPTIONS), Some(MethodToken::Options));
        assert_eq!(MethodToken::from_method(&Method::HEAD), None);
        assert_eq!(MethodToken::CatchAll.to_string(), "CATCHALL");
    }

    #[test]
    fn test_lookup_unregistered_is_empty() {
        let table: RouteTable<&str> = RouteTable::new();
        for method in MethodToken::ALL {
            assert!(table.lookup(method).is_empty());
        }
    }

    #[test]
    fn test_register_many_methods() {
        let mut table = RouteTable::new();
        table.register(&[MethodToken::Get, MethodToken::Post], &template("/users"), &"users");

        assert_eq!(table.lookup(MethodToken::Get).len(), 1);
        assert_eq!(table.lookup(MethodToken::Post).len(), 1);
        assert!(table.lookup(MethodToken::Put).is_empty());
        assert_eq!(table.templates().count(), 1);
    }

    #[test]
    fn test_register_same_template_replaces_handler() {
        // documented quirk: last write wins, position is kept
        let mut table = RouteTable::new();
        table.register(&[MethodToken::Get], &template("/a"), &"first");
        table.register(&[MethodToken::Get], &template("/b"), &"b");
        table.register(&[MethodToken::Get], &template("/a"), &"second");

        let routes = table.lookup(MethodToken::Get);
        assert_eq!(routes.len(), 2);
        assert_eq!(routes.get("/a").map(RouteEntry::handler), Some(&"second"));

        let order = routes.iter().map(|entry| entry.template().raw()).collect::<Vec<_>>();
        assert_eq!(order, vec!["/a", "/b"]);
    }
}
