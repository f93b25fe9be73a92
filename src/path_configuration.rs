//! The path configuration: an ordered, immutable table of [`PathRule`]s.
//!
//! Built once (from code or a JSON document) and injected into the
//! [`Navigator`](crate::Navigator). Lookup is **first match wins**: rules are
//! tried in order and the properties of the first rule with a matching
//! pattern are returned unmerged. The three server routes
//! ([`PathRule::default_server_routes`]) always come first so an app rule such
//! as `".*"` cannot shadow them.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "settings": { "tabs": ["home", "search"] },
//!   "rules": [
//!     { "patterns": ["/new$", "/edit$"], "properties": { "context": "modal" } },
//!     { "patterns": ["/sign_in$"], "properties": { "presentation": "replace_root" } }
//!   ]
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use hybrid_navigator::{Context, PathConfiguration};
//! use url::Url;
//!
//! let configuration = PathConfiguration::from_json_str(
//!     r#"{"rules": [{"patterns": ["/new$"], "properties": {"context": "modal"}}]}"#,
//! )
//! .unwrap();
//!
//! let location = Url::parse("https://my.app.com/posts/new").unwrap();
//! assert_eq!(configuration.properties(&location).context(), Context::Modal);
//! ```

use crate::error::ConfigurationError;
use crate::path_rule::{PathProperties, PathRule};
use crate::{debug_log, error_log};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use url::Url;

#[derive(Debug, Deserialize)]
struct RawPathConfiguration {
    #[serde(default)]
    settings: HashMap<String, Value>,
    #[serde(default)]
    rules: Vec<PathRule>,
}

/// Ordered rule table plus free-form app settings.
#[derive(Debug, Clone)]
pub struct PathConfiguration {
    settings: HashMap<String, Value>,
    rules: Vec<PathRule>,
}

impl PathConfiguration {
    /// A configuration holding only the server routes.
    pub fn new() -> Self {
        Self {
            settings: HashMap::new(),
            rules: PathRule::default_server_routes(),
        }
    }

    /// A configuration with app rules, after the server routes.
    pub fn with_rules(rules: Vec<PathRule>) -> Self {
        let mut configuration = Self::new();
        configuration.rules.extend(rules);
        configuration
    }

    /// Attach app settings.
    pub fn with_settings(mut self, settings: HashMap<String, Value>) -> Self {
        self.settings = settings;
        self
    }

    /// Parse a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let raw: RawPathConfiguration = serde_json::from_str(json)?;
        debug_log!(
            "Loaded path configuration: {} rules, {} settings",
            raw.rules.len(),
            raw.settings.len()
        );
        Ok(Self::with_rules(raw.rules).with_settings(raw.settings))
    }

    /// Read and parse a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| {
            error_log!("Could not read path configuration '{}': {}", path.display(), err);
            err
        })?;
        Self::from_json_str(&json)
    }

    /// All rules, server routes first.
    pub fn rules(&self) -> &[PathRule] {
        &self.rules
    }

    /// Rule at `index`, as returned by [`matching_rule_index`](Self::matching_rule_index).
    pub fn rule(&self, index: usize) -> Option<&PathRule> {
        self.rules.get(index)
    }

    /// Free-form settings from the configuration document.
    pub fn settings(&self) -> &HashMap<String, Value> {
        &self.settings
    }

    /// Index of the first rule matching `path`.
    pub fn matching_rule_index(&self, path: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.matches(path))
    }

    /// Properties for a location path. Empty if no rule matches.
    pub fn properties_for_path(&self, path: &str) -> PathProperties {
        self.matching_rule_index(path)
            .and_then(|index| self.rule(index))
            .map(|rule| rule.properties().clone())
            .unwrap_or_default()
    }

    /// Properties for a location.
    pub fn properties(&self, location: &Url) -> PathProperties {
        self.properties_for_path(location.path())
    }
}

impl Default for PathConfiguration {
    fn default() -> Self {
        Self::new()
    }
}
