use crate::error::RouteError;
use crate::parser::Delimiters;
use serde::Deserialize;

/// Router settings, read once when a router builder is created.
///
/// ```
/// use micro_route::RouterConfig;
///
/// let config: RouterConfig = serde_json::from_str(r#"{ "delimiters": ["/", "."] }"#).unwrap();
/// assert_eq!(config.delimiters().unwrap().as_slice(), &['/', '.']);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Path delimiter characters; missing or empty selects `/ . _ -`.
    pub delimiters: Option<Vec<char>>,
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiters<I: IntoIterator<Item = char>>(mut self, delimiters: I) -> Self {
        self.delimiters = Some(delimiters.into_iter().collect());
        self
    }

    pub fn delimiters(&self) -> Result<Delimiters, RouteError> {
        match &self.delimiters {
            Some(chars) if !chars.is_empty() => Delimiters::new(chars.iter().copied()),
            _ => Ok(Delimiters::default()),
        }
    }
}
