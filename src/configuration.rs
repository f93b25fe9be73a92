//! Per-navigator session configuration.
//!
//! A [`NavigatorConfiguration`] is built once and shared (behind an `Arc`) by
//! the navigator and every decision handler invocation, so handlers can
//! behave per navigator instance without global state.
//!
//! # Example
//!
//! ```
//! use hybrid_navigator::NavigatorConfiguration;
//!
//! let configuration = NavigatorConfiguration::parse("main", "https://my.app.com")
//!     .unwrap()
//!     .with_user_agent_suffix("HybridNavigator (iOS)");
//!
//! assert_eq!(configuration.name(), "main");
//! assert_eq!(configuration.app_host(), Some("my.app.com"));
//! ```

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Immutable settings for one navigator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigatorConfiguration {
    name: String,
    start_location: Url,
    #[serde(default)]
    user_agent_suffix: Option<String>,
    #[serde(default)]
    debug_logging: bool,
}

impl NavigatorConfiguration {
    /// Create a configuration from a logical name and start location.
    pub fn new(name: impl Into<String>, start_location: Url) -> Self {
        Self {
            name: name.into(),
            start_location,
            user_agent_suffix: None,
            debug_logging: false,
        }
    }

    /// Create a configuration, parsing the start location.
    pub fn parse(name: impl Into<String>, start_location: &str) -> Result<Self, ConfigurationError> {
        let url = Url::parse(start_location).map_err(|source| ConfigurationError::InvalidLocation {
            location: start_location.to_string(),
            source,
        })?;
        Ok(Self::new(name, url))
    }

    /// Load a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append a suffix to the engine's user agent.
    pub fn with_user_agent_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent_suffix = Some(suffix.into());
        self
    }

    /// Enable verbose decision logging for this navigator.
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    /// Logical name, used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location loaded when the navigator starts.
    pub fn start_location(&self) -> &Url {
        &self.start_location
    }

    /// Host of the start location; the "app's own host" for routing.
    pub fn app_host(&self) -> Option<&str> {
        self.start_location.host_str()
    }

    /// User agent suffix, if configured.
    pub fn user_agent_suffix(&self) -> Option<&str> {
        self.user_agent_suffix.as_deref()
    }

    /// Whether verbose decision logging is enabled.
    pub fn debug_logging(&self) -> bool {
        self.debug_logging
    }

    /// Check if `location` is served by the app's own host over http(s).
    ///
    /// Hosts are compared exactly: `app.com` and `my.app.com` are different.
    pub fn is_app_location(&self, location: &Url) -> bool {
        is_web_scheme(location) && location.host_str().is_some() && location.host_str() == self.app_host()
    }
}

/// `http` or `https`.
pub(crate) fn is_web_scheme(location: &Url) -> bool {
    matches!(location.scheme(), "http" | "https")
}
