use crate::error::RouteError;
use crate::parser::TemplateParser;
use crate::segment::{Parameter, Segment};
use std::collections::HashMap;
use std::sync::Arc;

/// A parsed route template: the raw string and its ordered segments.
///
/// Templates carry no handler. They are shared behind an [`Arc`] between every
/// method table the template was registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    pub(crate) fn new(raw: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self { raw: raw.into(), segments }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.segments.iter().filter_map(Segment::as_parameter)
    }

    /// Sum of the segment scores, the specificity of a successful match.
    pub fn score(&self) -> u32 {
        self.segments.iter().map(Segment::score).sum()
    }
}

/// Parsed templates keyed by their raw string.
///
/// Each key is written once; later lookups of the same string share the first
/// parse.
#[derive(Debug, Clone, Default)]
pub struct TemplateCache {
    templates: HashMap<String, Arc<RouteTemplate>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, raw: &str) -> Option<&Arc<RouteTemplate>> {
        self.templates.get(raw)
    }

    /// Returns the cached template for `raw`, parsing and caching it on first use.
    ///
    /// A template that fails to parse is not cached.
    pub fn get_or_parse(&mut self, parser: &TemplateParser, raw: &str) -> Result<Arc<RouteTemplate>, RouteError> {
        if let Some(template) = self.templates.get(raw) {
            return Ok(Arc::clone(template));
        }

        let template = Arc::new(parser.parse_template(raw)?);
        self.templates.insert(raw.to_owned(), Arc::clone(&template));
        Ok(template)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
