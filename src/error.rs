//! Error and outcome types.
//!
//! - [`VisitError`]: why a visit failed to load. Always recoverable: the
//!   navigator hands it to the delegate together with a
//!   [`RetryHandle`](crate::RetryHandle).
//! - [`HttpError`]: classification of a non-success HTTP status.
//! - [`ConfigurationError`]: a path configuration or navigator configuration
//!   could not be built.
//! - [`RouteOutcome`]: the value returned by
//!   [`Navigator::route`](crate::Navigator::route). Declined navigation is an
//!   outcome, not an error.
//!
//! # Examples
//!
//! ```
//! use hybrid_navigator::{HttpError, VisitError};
//!
//! let error = VisitError::Http(HttpError::from_status(404));
//! assert_eq!(error.to_string(), "HTTP error: not found (404)");
//! assert!(error.is_http());
//! ```

use crate::visit::VisitId;
use thiserror::Error;

/// A failed page load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisitError {
    /// The device could not reach the server.
    #[error("Could not connect to the server.")]
    NetworkFailure,

    /// The request timed out.
    #[error("The request timed out.")]
    TimeoutFailure,

    /// The response was not an HTML document.
    #[error("The server returned an invalid content type.")]
    ContentTypeMismatch,

    /// The page loaded but failed to render.
    #[error("The page could not be loaded due to a configuration error.")]
    PageLoadFailure,

    /// The server answered with a non-success status.
    #[error("HTTP error: {0}")]
    Http(HttpError),

    /// Engine-specific failure with a human-readable description.
    #[error("{0}")]
    Other(String),
}

impl VisitError {
    /// Build the error for an HTTP status code.
    pub fn http(status: u16) -> Self {
        Self::Http(HttpError::from_status(status))
    }

    /// Check if this failure came from an HTTP status.
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// The HTTP status, if this failure came from one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http(http) => Some(http.status_code()),
            _ => None,
        }
    }
}

/// Non-success HTTP response, classified by status family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HttpError {
    /// 401
    #[error("unauthorized (401)")]
    Unauthorized,

    /// 404
    #[error("not found (404)")]
    NotFound,

    /// Any other 4xx.
    #[error("client error ({0})")]
    Client(u16),

    /// Any 5xx.
    #[error("server error ({0})")]
    Server(u16),

    /// Anything outside 4xx/5xx the engine still reported as a failure.
    #[error("unknown status ({0})")]
    Unknown(u16),
}

impl HttpError {
    /// Classify a status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            400..=499 => Self::Client(status),
            500..=599 => Self::Server(status),
            other => Self::Unknown(other),
        }
    }

    /// The raw status code.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::NotFound => 404,
            Self::Client(status) | Self::Server(status) | Self::Unknown(status) => *status,
        }
    }

    /// 4xx family, including 401 and 404.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// 5xx family.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server(_))
    }
}

/// Configuration could not be built or loaded.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A path rule pattern is not a valid regular expression.
    #[error("invalid path rule pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Compiler error from `regex`.
        #[source]
        source: regex::Error,
    },

    /// The configuration document is not valid JSON for this schema.
    #[error("invalid path configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("could not read path configuration: {0}")]
    Io(#[from] std::io::Error),

    /// A location string is not a valid absolute URL.
    #[error("invalid location '{location}': {source}")]
    InvalidLocation {
        /// The offending location.
        location: String,
        /// Parser error from `url`.
        #[source]
        source: url::ParseError,
    },
}

/// Result of asking the navigator to route a location.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// A visit was started for the location.
    Visited {
        /// Identifier of the newly started visit.
        visit: VisitId,
    },

    /// A route decision handler cancelled in-app navigation.
    Cancelled {
        /// Name of the handler that took responsibility.
        handler: String,
    },

    /// The delegate rejected the proposal, or handlers re-entered `route()`
    /// too deeply.
    Rejected,

    /// The proposal changed the hierarchy without loading anything new
    /// (recede/resume, or a pop with nothing left to reload).
    HierarchyChanged,
}

impl RouteOutcome {
    /// Check if a visit was started.
    pub fn is_visited(&self) -> bool {
        matches!(self, Self::Visited { .. })
    }

    /// Check if a handler cancelled navigation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Check if the delegate rejected the proposal.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected)
    }

    /// The started visit, if any.
    pub fn visit_id(&self) -> Option<VisitId> {
        match self {
            Self::Visited { visit } => Some(*visit),
            _ => None,
        }
    }
}
