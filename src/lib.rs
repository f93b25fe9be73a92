//! # Hybrid Navigator
//!
//! The native navigation layer of a hybrid app, where screens are web pages
//! rendered by an embedded web engine:
//!
//! - **Visit lifecycle** - one monotonic state machine per page load, with
//!   stray engine callbacks filtered out
//! - **Route decisions** - an ordered chain of handlers that may take a
//!   location away from in-app navigation (external hosts, `mailto:`, ...)
//! - **Policy decisions** - the same chain shape for the engine's own
//!   navigation actions (link taps, reloads, new windows)
//! - **Path configuration** - regex rules that classify locations into
//!   presentation and context, loaded from code or JSON
//! - **Delegate** - the host decides on proposals and receives lifecycle,
//!   failure and authentication events
//!
//! # Quick Start
//!
//! ```
//! use hybrid_navigator::*;
//! use url::Url;
//!
//! struct Engine;
//!
//! impl WebEngine for Engine {
//!     fn load(&mut self, _location: &Url, _options: &VisitOptions) -> NavigationHandle {
//!         NavigationHandle::new(1)
//!     }
//!     fn stop_loading(&mut self, _navigation: NavigationHandle) {}
//!     fn set_navigation_receiver(&mut self, _visit: Option<VisitId>) {}
//! }
//!
//! let paths = PathConfiguration::from_json_str(
//!     r#"{ "rules": [ { "patterns": ["/new$"], "properties": { "context": "modal" } } ] }"#,
//! )
//! .unwrap();
//!
//! let configuration = NavigatorConfiguration::parse("main", "https://my.app.com").unwrap();
//! let mut navigator = Navigator::new(configuration, DefaultNavigatorDelegate::new(), Engine)
//!     .with_path_configuration(paths);
//!
//! navigator.start();
//! navigator.route(Url::parse("https://my.app.com/posts/new").unwrap());
//! assert!(navigator.hierarchy().is_modal_presented());
//!
//! // The server asks the app to go back.
//! navigator.route(Url::parse("https://my.app.com/recede_historical_location").unwrap());
//! assert!(!navigator.hierarchy().is_modal_presented());
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)
//! - `cache` (default) - LRU cache for path configuration lookups

#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Cache (optional)
#[cfg(feature = "cache")]
pub mod cache;

// Configuration
pub mod configuration;
pub mod path_configuration;
pub mod path_rule;

// Error handling
pub mod error;

// Visits and the engine seam
pub mod engine;
pub mod proposal;
pub mod visit;

// Decision handlers
pub mod policy;
pub mod router;

// Navigation
pub mod delegate;
pub mod hierarchy;
pub mod navigator;

#[cfg(test)]
mod test_support;

// Re-export main types for convenient access
#[cfg(feature = "cache")]
pub use cache::{CacheStats, PropertiesCache};
pub use configuration::NavigatorConfiguration;
pub use delegate::{DefaultNavigatorDelegate, ErrorPresentation, ExternalTarget, NavigatorDelegate};
pub use engine::{
    AuthChallengeDisposition, AuthenticationChallenge, Credential, NavigationAction, NavigationHandle,
    NavigationTarget, NavigationType, WebEngine,
};
pub use error::{ConfigurationError, HttpError, RouteOutcome, VisitError};
pub use hierarchy::{ChangeKind, Destination, Entry, HierarchyChange, NavigationHierarchy};
pub use navigator::{Navigator, NavigatorHandle};
pub use path_configuration::PathConfiguration;
pub use path_rule::{Context, PathProperties, PathRule, Presentation};
pub use policy::{
    policy_handler_fn, FnPolicyDecisionHandler, LinkActivatedPolicyDecisionHandler, NewWindowPolicyDecisionHandler,
    PolicyDecision, PolicyDecisionHandler, PolicyManager, ReloadPolicyDecisionHandler,
};
pub use proposal::{ProposalResult, VisitProposal};
pub use router::{
    route_handler_fn, AppNavigationRouteDecisionHandler, ExternalDomainRouteDecisionHandler, FnRouteDecisionHandler,
    Resolved, RouteDecision, RouteDecisionHandler, Router, SystemNavigationRouteDecisionHandler,
};
pub use visit::{
    RequestMethod, RetryHandle, Visit, VisitAction, VisitId, VisitObserver, VisitOptions, VisitState,
};
