//! Path rules: pattern → properties mappings that classify a destination.
//!
//! A [`PathRule`] pairs an ordered list of regular expressions with a bag of
//! [`PathProperties`]. Patterns are matched against the path component of a
//! location (unanchored, so `/new$` matches `/posts/new`).
//!
//! The well-known properties have typed accessors:
//!
//! | Property | Accessor | Default |
//! |----------|----------|---------|
//! | `presentation` | [`PathProperties::presentation`] | [`Presentation::Default`] |
//! | `context` | [`PathProperties::context`] | [`Context::Default`] |
//! | `historical_location` | [`PathProperties::is_historical_location`] | `false` |
//!
//! # Server routes
//!
//! Three rules are always present in a
//! [`PathConfiguration`](crate::PathConfiguration). They let the server ask
//! the app to leave the current screen instead of pushing a new one:
//!
//! | Path suffix | Presentation |
//! |-------------|--------------|
//! | `/recede_historical_location` | `pop` |
//! | `/resume_historical_location` | `none` |
//! | `/refresh_historical_location` | `refresh` |

use crate::error::ConfigurationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// How a destination is presented in the navigation hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Presentation {
    /// Push, or replace when visiting the current location again.
    #[default]
    Default,
    /// Always push.
    Push,
    /// Pop the top destination (recede).
    Pop,
    /// Replace the top destination.
    Replace,
    /// Replace the whole main stack with this destination.
    ReplaceRoot,
    /// Dismiss modals and pop the main stack to its root.
    ClearAll,
    /// Pop, then reload the new top destination.
    Refresh,
    /// Leave the hierarchy untouched (resume).
    None,
}

impl Presentation {
    /// Parse a property value. Unknown values map to [`Presentation::Default`].
    pub fn from_property(value: &str) -> Self {
        match value {
            "push" => Self::Push,
            "pop" => Self::Pop,
            "replace" => Self::Replace,
            "replace_root" => Self::ReplaceRoot,
            "clear_all" => Self::ClearAll,
            "refresh" => Self::Refresh,
            "none" => Self::None,
            _ => Self::Default,
        }
    }

    /// The property value this presentation is written as.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Replace => "replace",
            Self::ReplaceRoot => "replace_root",
            Self::ClearAll => "clear_all",
            Self::Refresh => "refresh",
            Self::None => "none",
        }
    }
}

/// Which stack a destination lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Context {
    /// The main stack.
    #[default]
    Default,
    /// The modal stack, presented over the main one.
    Modal,
}

impl Context {
    /// Parse a property value. Unknown values map to [`Context::Default`].
    pub fn from_property(value: &str) -> Self {
        match value {
            "modal" => Self::Modal,
            _ => Self::Default,
        }
    }
}

/// Property bag attached to a path rule and carried by a proposal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathProperties {
    values: HashMap<String, Value>,
}

impl PathProperties {
    /// Create an empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or overwrite a property.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Raw property value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Property value if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Property value if it is a boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    /// `presentation` property.
    pub fn presentation(&self) -> Presentation {
        self.get_str("presentation")
            .map_or(Presentation::Default, Presentation::from_property)
    }

    /// `context` property.
    pub fn context(&self) -> Context {
        self.get_str("context")
            .map_or(Context::Default, Context::from_property)
    }

    /// `historical_location` property.
    pub fn is_historical_location(&self) -> bool {
        self.get_bool("historical_location").unwrap_or(false)
    }

    /// Return `true` if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the number of properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate over all `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

/// Raw serialized shape of a rule.
#[derive(Debug, Clone, Deserialize)]
struct RawPathRule {
    patterns: Vec<String>,
    #[serde(default)]
    properties: PathProperties,
}

/// One compiled pattern. Server routes match their path literally.
#[derive(Debug, Clone)]
enum Pattern {
    Regex(Regex),
    Literal(&'static str),
}

impl Pattern {
    fn is_match(&self, path: &str) -> bool {
        match self {
            Self::Regex(regex) => regex.is_match(path),
            Self::Literal(literal) => path.contains(*literal),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Regex(regex) => regex.as_str(),
            Self::Literal(literal) => *literal,
        }
    }
}

/// An immutable pattern list plus the properties it assigns.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawPathRule")]
pub struct PathRule {
    patterns: Vec<Pattern>,
    properties: PathProperties,
}

impl TryFrom<RawPathRule> for PathRule {
    type Error = ConfigurationError;

    fn try_from(raw: RawPathRule) -> Result<Self, Self::Error> {
        Self::new(raw.patterns.as_slice(), raw.properties)
    }
}

impl PathRule {
    /// Compile a rule. Fails on the first invalid pattern.
    pub fn new<S: AsRef<str>>(
        patterns: &[S],
        properties: PathProperties,
    ) -> Result<Self, ConfigurationError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern)
                    .map(Pattern::Regex)
                    .map_err(|source| ConfigurationError::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
            properties,
        })
    }

    /// Check if any pattern matches `path`.
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(path))
    }

    /// Pattern sources, in declaration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Pattern::as_str)
    }

    /// Properties assigned by this rule.
    pub fn properties(&self) -> &PathProperties {
        &self.properties
    }

    /// `/recede_historical_location`: pop the current screen.
    pub fn recede_historical_location() -> Self {
        Self::historical("/recede_historical_location", Presentation::Pop)
    }

    /// `/resume_historical_location`: keep the current screen.
    pub fn resume_historical_location() -> Self {
        Self::historical("/resume_historical_location", Presentation::None)
    }

    /// `/refresh_historical_location`: pop and reload the previous screen.
    pub fn refresh_historical_location() -> Self {
        Self::historical("/refresh_historical_location", Presentation::Refresh)
    }

    /// The three server-driven historical location rules.
    pub fn default_server_routes() -> Vec<Self> {
        vec![
            Self::recede_historical_location(),
            Self::resume_historical_location(),
            Self::refresh_historical_location(),
        ]
    }

    fn historical(pattern: &'static str, presentation: Presentation) -> Self {
        let properties = PathProperties::new()
            .with("presentation", presentation.as_str())
            .with("context", "default")
            .with("historical_location", true);
        Self {
            patterns: vec![Pattern::Literal(pattern)],
            properties,
        }
    }
}
