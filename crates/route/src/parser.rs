//! Template and path tokenizer.
//!
//! Both route templates and request paths go through [`TemplateParser::split`],
//! which yields runs of content interleaved with single delimiter tokens:
//!
//! ```
//! use micro_route::TemplateParser;
//!
//! let parser = TemplateParser::default();
//! assert_eq!(parser.split("/users/{id}.json"), vec!["users", "/", "{id}", ".", "json"]);
//! ```
//!
//! Template tokens are then turned into [`Segment`]s by
//! [`TemplateParser::parse_segment`]. The parameter grammar is
//! `'{' [type ':'] name [('=' [literal]) | '?'] '}'`.

use crate::error::RouteError;
use crate::segment::{ParamType, ParamValue, Parameter, Segment};
use crate::template::RouteTemplate;
use std::collections::HashSet;

const PARAM_PREFIX: char = '{';
const PARAM_SUFFIX: char = '}';
const TYPE_SEPARATOR: char = ':';
const DEFAULT_SEPARATOR: char = '=';
const OPTIONAL_MARKER: char = '?';

/// Delimiters used when none are configured.
pub const DEFAULT_DELIMITERS: [char; 4] = ['/', '.', '_', '-'];

/// Ordered set of path delimiter characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    chars: Vec<char>,
}

impl Delimiters {
    /// Builds a delimiter set, keeping the first occurrence of each character.
    ///
    /// Characters that take part in the template grammar or in parameter names
    /// (alphanumerics, `{`, `}`, `:`, `=`, `?`) cannot be delimiters.
    pub fn new<I: IntoIterator<Item = char>>(chars: I) -> Result<Self, RouteError> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for c in chars {
            if c.is_alphanumeric()
                || c.is_whitespace()
                || matches!(c, PARAM_PREFIX | PARAM_SUFFIX | TYPE_SEPARATOR | DEFAULT_SEPARATOR | OPTIONAL_MARKER)
            {
                return Err(RouteError::invalid_config(format!("'{c}' can not be used as a path delimiter")));
            }
            if seen.insert(c) {
                ordered.push(c);
            }
        }

        if ordered.is_empty() {
            return Err(RouteError::invalid_config("at least one path delimiter is required"));
        }

        Ok(Self { chars: ordered })
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }

    /// True when `token` is exactly one delimiter character.
    pub fn is_delimiter(&self, token: &str) -> bool {
        let mut chars = token.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if self.contains(c))
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self { chars: DEFAULT_DELIMITERS.to_vec() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateParser {
    delimiters: Delimiters,
}

impl TemplateParser {
    pub fn new(delimiters: Delimiters) -> Self {
        Self { delimiters }
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Splits `s` into content runs and single-character delimiter tokens.
    ///
    /// Leading and trailing delimiters are trimmed first, empty tokens are
    /// never produced. Consecutive delimiters each yield their own token.
    pub fn split<'a>(&self, s: &'a str) -> Vec<&'a str> {
        let trimmed = s.trim_matches(|c| self.delimiters.contains(c));

        let mut tokens = Vec::new();
        let mut start = 0;
        for (index, c) in trimmed.char_indices() {
            if !self.delimiters.contains(c) {
                continue;
            }
            if start < index {
                tokens.push(&trimmed[start..index]);
            }
            let end = index + c.len_utf8();
            tokens.push(&trimmed[index..end]);
            start = end;
        }
        if start < trimmed.len() {
            tokens.push(&trimmed[start..]);
        }

        tokens
    }

    /// Parses a single template token.
    ///
    /// `template` is only used to give errors context.
    pub fn parse_segment(&self, template: &str, token: &str) -> Result<Segment, RouteError> {
        if self.delimiters.is_delimiter(token) {
            return Ok(Segment::delimiter(token));
        }

        match token.strip_prefix(PARAM_PREFIX).and_then(|t| t.strip_suffix(PARAM_SUFFIX)) {
            Some(inner) => parse_parameter(template, token, inner).map(|parameter| Segment::parameter(token, parameter)),
            None => Ok(Segment::literal(token)),
        }
    }

    /// Splits and parses a whole template.
    ///
    /// Fails on unknown type annotations, malformed parameters, defaults that
    /// do not fit their type and parameter names used twice.
    pub fn parse_template(&self, raw: &str) -> Result<RouteTemplate, RouteError> {
        let mut names = HashSet::new();
        let segments = self
            .split(raw)
            .into_iter()
            .map(|token| {
                let segment = self.parse_segment(raw, token)?;
                if let Some(parameter) = segment.as_parameter()
                    && !names.insert(parameter.name().to_owned())
                {
                    return Err(RouteError::duplicate_parameter(raw, parameter.name()));
                }
                Ok(segment)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RouteTemplate::new(raw, segments))
    }
}

fn is_word(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn parse_parameter(template: &str, token: &str, inner: &str) -> Result<Parameter, RouteError> {
    let (param_type, rest) = match inner.split_once(TYPE_SEPARATOR) {
        Some((type_name, rest)) => {
            if type_name.is_empty() || !type_name.bytes().all(|b| b.is_ascii_alphabetic()) {
                return Err(RouteError::invalid_segment(template, token));
            }
            let param_type =
                ParamType::from_name(type_name).ok_or_else(|| RouteError::invalid_route_type(template, type_name))?;
            (param_type, rest)
        }
        None => (ParamType::String, inner),
    };

    let (name, default_literal, marked_optional) = if let Some(name) = rest.strip_suffix(OPTIONAL_MARKER) {
        (name, None, true)
    } else if let Some((name, literal)) = rest.split_once(DEFAULT_SEPARATOR) {
        (name, Some(literal), false)
    } else {
        (rest, None, false)
    };

    if name.is_empty() || !is_word(name) {
        return Err(RouteError::invalid_segment(template, token));
    }

    let default = match default_literal {
        None => None,
        Some(literal) if !is_word(literal) => return Err(RouteError::invalid_segment(template, token)),
        Some(literal) => default_value(template, name, literal, param_type)?,
    };

    // an empty `=` still marks the parameter optional
    let optional = marked_optional || default_literal.is_some();
    Ok(Parameter::new(name.to_owned(), param_type, default, optional))
}

fn default_value(
    template: &str,
    name: &str,
    literal: &str,
    param_type: ParamType,
) -> Result<Option<ParamValue>, RouteError> {
    if literal.is_empty() && param_type != ParamType::String {
        return Ok(None);
    }

    param_type
        .coerce(literal)
        .map(Some)
        .ok_or_else(|| RouteError::invalid_default(template, name, literal, param_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentKind;

    fn parse(token: &str) -> Result<Segment, RouteError> {
        TemplateParser::default().parse_segment(token, token)
    }

    fn parameter(token: &str) -> Parameter {
        parse(token).unwrap().as_parameter().cloned().unwrap()
    }

    #[test]
    fn test_split_default_delimiters() {
        let parser = TemplateParser::default();
        assert_eq!(parser.split("/users/42"), vec!["users", "/", "42"]);
        assert_eq!(parser.split("/files/report_2024-01.pdf/"), vec![
            "files", "/", "report", "_", "2024", "-", "01", ".", "pdf"
        ]);
        assert_eq!(parser.split("a//b"), vec!["a", "/", "/", "b"]);
        assert!(parser.split("").is_empty());
        assert!(parser.split("///").is_empty());
    }

    #[test]
    fn test_split_custom_delimiters() {
        let parser = TemplateParser::new(Delimiters::new(['/']).unwrap());
        assert_eq!(parser.split("/report_2024.pdf"), vec!["report_2024.pdf"]);
        assert_eq!(parser.split("/a/b.c"), vec!["a", "/", "b.c"]);
    }

    #[test]
    fn test_split_concat_round_trip() {
        let parser = TemplateParser::default();
        for input in ["/a/b", "x.y_z-w", "--a--b--", "one", "/v1/users/{id}.json", "a/./b"] {
            let trimmed = input.trim_matches(|c| DEFAULT_DELIMITERS.contains(&c));
            assert_eq!(parser.split(input).concat(), trimmed, "input: {input}");
        }
    }

    #[test]
    fn test_delimiters_validation() {
        assert!(Delimiters::new(['/', '.']).is_ok());
        assert_eq!(Delimiters::new(['/', '/', '.']).unwrap().as_slice(), &['/', '.']);
        assert!(matches!(Delimiters::new([]), Err(RouteError::InvalidConfig { .. })));
        assert!(matches!(Delimiters::new(['a']), Err(RouteError::InvalidConfig { .. })));
        assert!(matches!(Delimiters::new(['{']), Err(RouteError::InvalidConfig { .. })));
        assert!(matches!(Delimiters::new([' ']), Err(RouteError::InvalidConfig { .. })));
    }

    #[test]
    fn test_parse_delimiter_and_static() {
        assert_eq!(parse("/").unwrap().kind(), &SegmentKind::Delimiter);
        assert_eq!(parse("users").unwrap().kind(), &SegmentKind::Static);
        assert_eq!(parse("{").unwrap().kind(), &SegmentKind::Static);
        assert_eq!(parse("{id").unwrap().kind(), &SegmentKind::Static);
    }

    #[test]
    fn test_parse_plain_parameter() {
        let param = parameter("{name}");
        assert_eq!(param.name(), "name");
        assert_eq!(param.param_type(), ParamType::String);
        assert!(!param.is_optional());
        assert_eq!(param.default_value(), None);
    }

    #[test]
    fn test_parse_typed_parameter() {
        assert_eq!(parameter("{int:id}").param_type(), ParamType::Int);
        assert_eq!(parameter("{integer:id}").param_type(), ParamType::Int);
        assert_eq!(parameter("{bool:flag}").param_type(), ParamType::Bool);
        assert_eq!(parameter("{boolean:flag}").param_type(), ParamType::Bool);
        assert_eq!(parameter("{string:slug}").param_type(), ParamType::String);
    }

    #[test]
    fn test_parse_optional_parameter() {
        let param = parameter("{page?}");
        assert!(param.is_optional());
        assert_eq!(param.default_value(), None);

        let param = parameter("{int:page?}");
        assert!(param.is_optional());
        assert_eq!(param.param_type(), ParamType::Int);
    }

    #[test]
    fn test_parse_default_parameter() {
        let param = parameter("{count=0}");
        assert!(param.is_optional());
        assert_eq!(param.default_value(), Some(&ParamValue::Str("0".into())));

        let param = parameter("{int:page=3}");
        assert_eq!(param.default_value(), Some(&ParamValue::Int(3)));

        let param = parameter("{bool:flag=true}");
        assert_eq!(param.default_value(), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn test_parse_empty_default() {
        let param = parameter("{tag=}");
        assert!(param.is_optional());
        assert_eq!(param.default_value(), Some(&ParamValue::Str(String::new())));

        let param = parameter("{int:page=}");
        assert!(param.is_optional());
        assert_eq!(param.default_value(), None);
    }

    #[test]
    fn test_invalid_route_type() {
        let err = parse("{float:x}").unwrap_err();
        assert_eq!(err, RouteError::invalid_route_type("{float:x}", "float"));
    }

    #[test]
    fn test_invalid_segments() {
        for token in ["{}", "{?}", "{int:}", "{x y}", "{na!me}", "{a=b!}", "{1a:b}", "{a?b}"] {
            assert!(matches!(parse(token), Err(RouteError::InvalidSegment { .. })), "token: {token}");
        }
    }

    #[test]
    fn test_invalid_default() {
        assert!(matches!(parse("{int:page=abc}"), Err(RouteError::InvalidDefault { .. })));
        assert!(matches!(parse("{bool:flag=maybe}"), Err(RouteError::InvalidDefault { .. })));
    }

    #[test]
    fn test_parse_template() {
        let template = TemplateParser::default().parse_template("/users/{int:id}/posts/{slug?}").unwrap();
        assert_eq!(template.raw(), "/users/{int:id}/posts/{slug?}");
        assert_eq!(template.len(), 7);
        assert_eq!(template.parameters().map(Parameter::name).collect::<Vec<_>>(), vec!["id", "slug"]);
    }

    #[test]
    fn test_parse_template_duplicate_parameter() {
        let err = TemplateParser::default().parse_template("/{id}/{int:id}").unwrap_err();
        assert_eq!(err, RouteError::duplicate_parameter("/{id}/{int:id}", "id"));
    }
}
