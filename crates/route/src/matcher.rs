//! Positional matching and specificity scoring.
//!
//! A request path is split once, then every candidate template is walked
//! position by position against it. A template matches when each of its
//! segments links with the path token at the same index (or with nothing,
//! for trailing delimiters and optional parameters). Among matching templates
//! the one with the highest [score](RouteTemplate::score) wins; on equal scores
//! the earliest registered template is kept.

use crate::parser::TemplateParser;
use crate::segment::{Link, ParamValue};
use crate::template::RouteTemplate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// The result of matching a request path against a template.
///
/// Built fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    template: Arc<RouteTemplate>,
    score: u32,
    params: HashMap<String, ParamValue>,
}

impl Route {
    pub fn template(&self) -> &RouteTemplate {
        &self.template
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Bound parameter values by name, from the path or from defaults.
    pub fn params(&self) -> &HashMap<String, ParamValue> {
        &self.params
    }

    pub fn parameter(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    pub fn into_params(self) -> HashMap<String, ParamValue> {
        self.params
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Matcher<'p> {
    parser: &'p TemplateParser,
}

impl<'p> Matcher<'p> {
    pub fn new(parser: &'p TemplateParser) -> Self {
        Self { parser }
    }

    /// Returns the most specific candidate matching `path`, with its handler.
    pub fn best_match<'t, H, I>(&self, path: &str, candidates: I) -> Option<(Route, &'t H)>
    where
        H: 't,
        I: IntoIterator<Item = (&'t Arc<RouteTemplate>, &'t H)>,
    {
        let parts = self.parser.split(path);

        let mut best: Option<(Route, &'t H)> = None;
        for (template, handler) in candidates {
            let Some(route) = Self::link(template, &parts) else {
                continue;
            };

            trace!(template = template.raw(), score = route.score, "candidate matched");
            if best.as_ref().is_none_or(|(current, _)| route.score > current.score) {
                best = Some((route, handler));
            }
        }

        best
    }

    /// Links `template` with an already split path.
    ///
    /// Returns `None` when any segment rejects the token at its position, or
    /// when the path has more tokens than the template.
    pub fn link(template: &Arc<RouteTemplate>, parts: &[&str]) -> Option<Route> {
        if template.len() < parts.len() {
            trace!(template = template.raw(), "path longer than template");
            return None;
        }

        let mut params = HashMap::new();
        for (index, segment) in template.segments().iter().enumerate() {
            let uri_part = parts.get(index).copied();
            match segment.link(uri_part) {
                Link::Matched => {}
                Link::Bound(value) => {
                    if let Some(parameter) = segment.as_parameter() {
                        params.insert(parameter.name().to_owned(), value);
                    }
                }
                Link::Rejected => {
                    trace!(template = template.raw(), segment = segment.raw(), ?uri_part, "segment rejected");
                    return None;
                }
            }
        }

        Some(Route { template: Arc::clone(template), score: template.score(), params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{LITERAL_SCORE, STRING_PARAM_SCORE, TYPED_PARAM_SCORE};

    fn templates(raws: &[&'static str]) -> Vec<(Arc<RouteTemplate>, &'static str)> {
        let parser = TemplateParser::default();
        raws.iter().map(|raw| (Arc::new(parser.parse_template(raw).unwrap()), *raw)).collect()
    }

    fn best_match<'t>(
        path: &str,
        candidates: &'t [(Arc<RouteTemplate>, &'static str)],
    ) -> Option<(Route, &'t &'static str)> {
        let parser = TemplateParser::default();
        Matcher::new(&parser).best_match(path, candidates.iter().map(|(template, handler)| (template, handler)))
    }

    #[test]
    fn test_static_match() {
        let candidates = templates(&["/users", "/posts"]);
        let (route, handler) = best_match("/posts", &candidates).unwrap();
        assert_eq!(*handler, "/posts");
        assert!(route.params().is_empty());
        assert_eq!(route.score(), LITERAL_SCORE);
    }

    #[test]
    fn test_string_params_bind_raw_tokens() {
        let candidates = templates(&["/users/{name}/posts/{slug}"]);
        let (route, _) = best_match("/users/alice/posts/hello", &candidates).unwrap();
        assert_eq!(route.parameter("name"), Some(&ParamValue::from("alice")));
        assert_eq!(route.parameter("slug"), Some(&ParamValue::from("hello")));
        assert_eq!(route.template().raw(), "/users/{name}/posts/{slug}");
    }

    #[test]
    fn test_typed_beats_string() {
        let candidates = templates(&["/items/{name}", "/items/{int:id}"]);
        let (route, handler) = best_match("/items/7", &candidates).unwrap();
        assert_eq!(*handler, "/items/{int:id}");
        assert_eq!(route.parameter("id"), Some(&ParamValue::Int(7)));
        assert_eq!(route.score(), 2 * LITERAL_SCORE + TYPED_PARAM_SCORE);

        let (route, handler) = best_match("/items/seven", &candidates).unwrap();
        assert_eq!(*handler, "/items/{name}");
        assert_eq!(route.score(), 2 * LITERAL_SCORE + STRING_PARAM_SCORE);
    }

    #[test]
    fn test_static_beats_parameter() {
        let candidates = templates(&["/users/{name}", "/users/me"]);
        let (_, handler) = best_match("/users/me", &candidates).unwrap();
        assert_eq!(*handler, "/users/me");
    }

    #[test]
    fn test_type_rejection_excludes_template() {
        let candidates = templates(&["/flags/{bool:flag}"]);
        assert!(best_match("/flags/maybe", &candidates).is_none());

        let (route, _) = best_match("/flags/TRUE", &candidates).unwrap();
        assert_eq!(route.parameter("flag"), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn test_path_longer_than_template() {
        let candidates = templates(&["/users"]);
        assert!(best_match("/users/42", &candidates).is_none());
    }

    #[test]
    fn test_missing_required_parameter() {
        let candidates = templates(&["/users/{id}"]);
        assert!(best_match("/users", &candidates).is_none());
    }

    #[test]
    fn test_optional_trailing_parameters() {
        let candidates = templates(&["/list/{count=0}", "/tags/{tag?}"]);

        let (route, handler) = best_match("/list", &candidates).unwrap();
        assert_eq!(*handler, "/list/{count=0}");
        assert_eq!(route.parameter("count"), Some(&ParamValue::from("0")));

        let (route, _) = best_match("/list/25", &candidates).unwrap();
        assert_eq!(route.parameter("count"), Some(&ParamValue::from("25")));

        let (route, _) = best_match("/tags", &candidates).unwrap();
        assert_eq!(route.parameter("tag"), None);
    }

    #[test]
    fn test_trailing_delimiter_in_path_is_trimmed() {
        let candidates = templates(&["/users/{id}"]);
        let (route, _) = best_match("/users/42/", &candidates).unwrap();
        assert_eq!(route.parameter("id"), Some(&ParamValue::from("42")));
    }

    #[test]
    fn test_delimiter_mismatch() {
        let candidates = templates(&["/files/{name}.{ext}"]);
        let (route, _) = best_match("/files/report.pdf", &candidates).unwrap();
        assert_eq!(route.parameter("name"), Some(&ParamValue::from("report")));
        assert_eq!(route.parameter("ext"), Some(&ParamValue::from("pdf")));

        assert!(best_match("/files/report-pdf", &candidates).is_none());
    }

    #[test]
    fn test_equal_scores_keep_first_registered() {
        let candidates = templates(&["/a/{x}", "/a/{y}"]);
        let (route, handler) = best_match("/a/1", &candidates).unwrap();
        assert_eq!(*handler, "/a/{x}");
        assert_eq!(route.parameter("x"), Some(&ParamValue::from("1")));

        let candidates = templates(&["/a/{y}", "/a/{x}"]);
        let (_, handler) = best_match("/a/1", &candidates).unwrap();
        assert_eq!(*handler, "/a/{y}");
    }

    #[test]
    fn test_no_candidates() {
        assert!(best_match("/anything", &[]).is_none());
    }

    #[test]
    fn test_root_path() {
        let candidates = templates(&["/"]);
        let (route, _) = best_match("/", &candidates).unwrap();
        assert_eq!(route.score(), 0);
    }
}
