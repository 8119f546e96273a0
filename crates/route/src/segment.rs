//! Parsed units of a route template.
//!
//! A template such as `/users/{int:id}` is split into [`Segment`]s: the
//! delimiter `/`, the static literal `users`, another `/` and the parameter
//! `id`. Segments are immutable once parsed. Values extracted while matching a
//! request are collected into a [`Route`](crate::Route), never written back
//! into the segment, so a parsed template can be shared by concurrent requests.

use std::fmt;

/// Score of a segment that commits to literal text (static text or delimiter).
pub const LITERAL_SCORE: u32 = 10_000;
/// Score of a parameter with a narrowing type such as `int` or `bool`.
pub const TYPED_PARAM_SCORE: u32 = 5_000;
/// Score of a parameter that captures any string.
pub const STRING_PARAM_SCORE: u32 = 1_000;

/// Declared type of a route parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamType {
    #[default]
    String,
    Int,
    Bool,
}

impl ParamType {
    /// Resolves a type annotation, accepting the long and short spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "int" | "integer" => Some(Self::Int),
            "bool" | "boolean" => Some(Self::Bool),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
        }
    }

    /// Returns true if `raw` satisfies this type's validity predicate.
    pub fn accepts(self, raw: &str) -> bool {
        match self {
            Self::String => true,
            Self::Int => is_numeric(raw),
            Self::Bool => parse_bool(raw).is_some(),
        }
    }

    /// Validates and converts a raw path token into a typed value.
    ///
    /// Returns `None` when the token is rejected by [`ParamType::accepts`].
    pub fn coerce(self, raw: &str) -> Option<ParamValue> {
        match self {
            Self::String => Some(ParamValue::Str(raw.to_owned())),
            Self::Int => parse_int(raw).map(ParamValue::Int),
            Self::Bool => parse_bool(raw).map(ParamValue::Bool),
        }
    }

    #[inline]
    pub fn score(self) -> u32 {
        match self {
            Self::String => STRING_PARAM_SCORE,
            Self::Int | Self::Bool => TYPED_PARAM_SCORE,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optionally signed decimal number, with optional fraction and exponent.
fn is_numeric(raw: &str) -> bool {
    fn all_digits(s: &str) -> bool {
        s.bytes().all(|b| b.is_ascii_digit())
    }

    let unsigned = raw.strip_prefix(|c| c == '+' || c == '-').unwrap_or(raw);
    let (mantissa, exponent) = match unsigned.find(|c| c == 'e' || c == 'E') {
        Some(index) => (&unsigned[..index], Some(&unsigned[index + 1..])),
        None => (unsigned, None),
    };

    let (integral, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let mantissa_ok = !(integral.is_empty() && fraction.is_empty()) && all_digits(integral) && all_digits(fraction);

    let exponent_ok = exponent.is_none_or(|exp| {
        let exp = exp.strip_prefix(|c| c == '+' || c == '-').unwrap_or(exp);
        !exp.is_empty() && all_digits(exp)
    });

    mantissa_ok && exponent_ok
}

#[allow(clippy::cast_possible_truncation, reason = "numeric tokens truncate toward zero and saturate")]
fn parse_int(raw: &str) -> Option<i64> {
    if !is_numeric(raw) {
        return None;
    }
    raw.parse::<i64>().ok().or_else(|| raw.parse::<f64>().ok().map(|value| value.trunc() as i64))
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") || raw == "1" {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") || raw == "0" {
        Some(false)
    } else {
        None
    }
}

/// A type-coerced parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl ParamValue {
    pub fn param_type(&self) -> ParamType {
        match self {
            Self::Str(_) => ParamType::String,
            Self::Int(_) => ParamType::Int,
            Self::Bool(_) => ParamType::Bool,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A named parameter segment, e.g. `{int:page=1}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    param_type: ParamType,
    default: Option<ParamValue>,
    optional: bool,
}

impl Parameter {
    pub(crate) fn new(name: String, param_type: ParamType, default: Option<ParamValue>, optional: bool) -> Self {
        Self { name, param_type, default, optional }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_type(&self) -> ParamType {
        self.param_type
    }

    pub fn default_value(&self) -> Option<&ParamValue> {
        self.default.as_ref()
    }

    /// True when marked with `?` or given a default.
    pub fn is_optional(&self) -> bool {
        self.optional || self.default.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    Delimiter,
    Static,
    Parameter(Parameter),
}

/// Outcome of linking one template segment with the path token at the same position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Link {
    /// Literal text lined up, or an absent optional parameter without default.
    Matched,
    /// A parameter bound to a value taken from the path or its default.
    Bound(ParamValue),
    Rejected,
}

/// One parsed unit of a template: a delimiter, static text or a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    raw: String,
    kind: SegmentKind,
}

impl Segment {
    pub(crate) fn delimiter(raw: impl Into<String>) -> Self {
        Self { raw: raw.into(), kind: SegmentKind::Delimiter }
    }

    pub(crate) fn literal(raw: impl Into<String>) -> Self {
        Self { raw: raw.into(), kind: SegmentKind::Static }
    }

    pub(crate) fn parameter(raw: impl Into<String>, parameter: Parameter) -> Self {
        Self { raw: raw.into(), kind: SegmentKind::Parameter(parameter) }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    pub fn as_parameter(&self) -> Option<&Parameter> {
        match &self.kind {
            SegmentKind::Parameter(parameter) => Some(parameter),
            _ => None,
        }
    }

    #[inline]
    pub fn is_delimiter(&self) -> bool {
        matches!(self.kind, SegmentKind::Delimiter)
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        matches!(self.kind, SegmentKind::Static)
    }

    /// Specificity contributed by this segment to a matching template.
    pub fn score(&self) -> u32 {
        match &self.kind {
            SegmentKind::Delimiter | SegmentKind::Static => LITERAL_SCORE,
            SegmentKind::Parameter(parameter) => parameter.param_type.score(),
        }
    }

    /// Links this segment with the path token at the same position, `None`
    /// when the path is shorter than the template.
    pub(crate) fn link(&self, uri_part: Option<&str>) -> Link {
        match (&self.kind, uri_part) {
            (SegmentKind::Delimiter, None) => Link::Matched,
            (SegmentKind::Delimiter | SegmentKind::Static, Some(part)) if part == self.raw => Link::Matched,
            (SegmentKind::Delimiter | SegmentKind::Static, _) => Link::Rejected,
            (SegmentKind::Parameter(parameter), None) => {
                if !parameter.is_optional() {
                    return Link::Rejected;
                }
                parameter.default.clone().map_or(Link::Matched, Link::Bound)
            }
            (SegmentKind::Parameter(parameter), Some(part)) => {
                parameter.param_type.coerce(part).map_or(Link::Rejected, Link::Bound)
            }
        }
    }
}
