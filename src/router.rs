//! Route decision handlers and the [`Router`] that chains them.
//!
//! Before a location becomes a proposal, the router asks its handlers, in
//! registration order, whether one of them wants to take it. The first
//! handler whose [`matches`](RouteDecisionHandler::matches) returns `true` is
//! asked to [`handle`](RouteDecisionHandler::handle) it and its decision is
//! final; later handlers are not consulted. With no match the location is
//! navigated in-app.
//!
//! # Built-in handlers
//!
//! | Handler | Matches | Decision |
//! |---------|---------|----------|
//! | [`AppNavigationRouteDecisionHandler`] | http(s), app host | `Navigate` |
//! | [`ExternalDomainRouteDecisionHandler`] | http(s), any other host | opens in-app browser, `Cancel` |
//! | [`SystemNavigationRouteDecisionHandler`] | non-http(s) schemes | hands to system, `Cancel` |
//!
//! [`Router::default`] registers them in that order.
//!
//! # Example
//!
//! ```
//! use hybrid_navigator::{route_handler_fn, RouteDecision, Router};
//!
//! let router = Router::default().with_handler(route_handler_fn(
//!     "downloads",
//!     |url, _configuration| url.path().ends_with(".pdf"),
//!     |_url, _configuration, _navigator| RouteDecision::Cancel,
//! ));
//! assert_eq!(router.len(), 4);
//! ```

use crate::configuration::{is_web_scheme, NavigatorConfiguration};
use crate::delegate::ExternalTarget;
use crate::navigator::NavigatorHandle;
use crate::{debug_log, trace_log};
use url::Url;

/// Outcome of a route decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteDecision {
    /// Continue with an in-app visit.
    Navigate,
    /// Stop; the handler took responsibility for the location.
    Cancel,
}

/// A decision plus the handler that made it (`None` for the default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    /// The decision.
    pub decision: T,
    /// Name of the deciding handler.
    pub handler: Option<String>,
}

/// A pluggable interceptor for route proposals.
pub trait RouteDecisionHandler: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Pure, cheap predicate: does this handler want `location`?
    fn matches(&self, location: &Url, configuration: &NavigatorConfiguration) -> bool;

    /// Decide for a matched location. May have side effects.
    fn handle(
        &self,
        location: &Url,
        configuration: &NavigatorConfiguration,
        navigator: &mut dyn NavigatorHandle,
    ) -> RouteDecision;
}

/// Create a route decision handler from a name and two closures.
pub fn route_handler_fn<M, H>(name: impl Into<String>, matches: M, handle: H) -> FnRouteDecisionHandler<M, H>
where
    M: Fn(&Url, &NavigatorConfiguration) -> bool + Send + Sync + 'static,
    H: Fn(&Url, &NavigatorConfiguration, &mut dyn NavigatorHandle) -> RouteDecision + Send + Sync + 'static,
{
    FnRouteDecisionHandler {
        name: name.into(),
        matches,
        handle,
    }
}

/// Handler created from closures via [`route_handler_fn`].
pub struct FnRouteDecisionHandler<M, H> {
    name: String,
    matches: M,
    handle: H,
}

impl<M, H> RouteDecisionHandler for FnRouteDecisionHandler<M, H>
where
    M: Fn(&Url, &NavigatorConfiguration) -> bool + Send + Sync + 'static,
    H: Fn(&Url, &NavigatorConfiguration, &mut dyn NavigatorHandle) -> RouteDecision + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, location: &Url, configuration: &NavigatorConfiguration) -> bool {
        (self.matches)(location, configuration)
    }

    fn handle(
        &self,
        location: &Url,
        configuration: &NavigatorConfiguration,
        navigator: &mut dyn NavigatorHandle,
    ) -> RouteDecision {
        (self.handle)(location, configuration, navigator)
    }
}

/// Lets locations on the app's own host through.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppNavigationRouteDecisionHandler;

impl RouteDecisionHandler for AppNavigationRouteDecisionHandler {
    fn name(&self) -> &str {
        "app-navigation"
    }

    fn matches(&self, location: &Url, configuration: &NavigatorConfiguration) -> bool {
        configuration.is_app_location(location)
    }

    fn handle(
        &self,
        _location: &Url,
        _configuration: &NavigatorConfiguration,
        _navigator: &mut dyn NavigatorHandle,
    ) -> RouteDecision {
        RouteDecision::Navigate
    }
}

/// Opens http(s) locations on any other host in an in-app browser.
///
/// Hosts are compared exactly, so with an app on `my.app.com` both
/// `external.com` and `app.com` match.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalDomainRouteDecisionHandler;

impl RouteDecisionHandler for ExternalDomainRouteDecisionHandler {
    fn name(&self) -> &str {
        "external-domain"
    }

    fn matches(&self, location: &Url, configuration: &NavigatorConfiguration) -> bool {
        is_web_scheme(location) && location.host_str() != configuration.app_host()
    }

    fn handle(
        &self,
        location: &Url,
        _configuration: &NavigatorConfiguration,
        navigator: &mut dyn NavigatorHandle,
    ) -> RouteDecision {
        navigator.open_external(location, ExternalTarget::InAppBrowser);
        RouteDecision::Cancel
    }
}

/// Hands non-web schemes (`mailto:`, `tel:`, ...) to the system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNavigationRouteDecisionHandler;

impl RouteDecisionHandler for SystemNavigationRouteDecisionHandler {
    fn name(&self) -> &str {
        "system-navigation"
    }

    fn matches(&self, location: &Url, _configuration: &NavigatorConfiguration) -> bool {
        !is_web_scheme(location)
    }

    fn handle(
        &self,
        location: &Url,
        _configuration: &NavigatorConfiguration,
        navigator: &mut dyn NavigatorHandle,
    ) -> RouteDecision {
        navigator.open_external(location, ExternalTarget::System);
        RouteDecision::Cancel
    }
}

/// Ordered chain of route decision handlers.
pub struct Router {
    handlers: Vec<Box<dyn RouteDecisionHandler>>,
}

impl Router {
    /// Create a router from an ordered list of handlers.
    pub fn new(handlers: Vec<Box<dyn RouteDecisionHandler>>) -> Self {
        Self { handlers }
    }

    /// A router with no handlers; every location navigates.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Append a handler after the existing ones.
    pub fn with_handler<H: RouteDecisionHandler>(mut self, handler: H) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Return `true` if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handler names, in evaluation order.
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }

    /// Resolve `location` to a decision.
    pub fn decide_route(
        &self,
        location: &Url,
        configuration: &NavigatorConfiguration,
        navigator: &mut dyn NavigatorHandle,
    ) -> RouteDecision {
        self.resolve(location, configuration, navigator).decision
    }

    /// Resolve `location`, also reporting which handler decided.
    pub fn resolve(
        &self,
        location: &Url,
        configuration: &NavigatorConfiguration,
        navigator: &mut dyn NavigatorHandle,
    ) -> Resolved<RouteDecision> {
        for handler in &self.handlers {
            let matched = handler.matches(location, configuration);
            trace_log!("Route handler '{}' matches '{}': {}", handler.name(), location, matched);
            if matched {
                let decision = handler.handle(location, configuration, navigator);
                debug_log!(
                    "[{}] route handler '{}' decided {:?} for '{}'",
                    configuration.name(),
                    handler.name(),
                    decision,
                    location
                );
                return Resolved {
                    decision,
                    handler: Some(handler.name().to_string()),
                };
            }
        }

        debug_log!("[{}] no route handler matched '{}'", configuration.name(), location);
        Resolved {
            decision: RouteDecision::Navigate,
            handler: None,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::empty()
            .with_handler(AppNavigationRouteDecisionHandler)
            .with_handler(ExternalDomainRouteDecisionHandler)
            .with_handler(SystemNavigationRouteDecisionHandler)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("handlers", &self.handler_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{configuration, url, SpyRouteHandler, StubNavigator};
    use std::sync::Arc;

    #[test]
    fn test_no_handlers_navigates() {
        let router = Router::empty();
        let mut navigator = StubNavigator::default();
        let decision = router.decide_route(&url("https://my.app.com/page"), &configuration(), &mut navigator);
        assert_eq!(decision, RouteDecision::Navigate);
    }

    #[test]
    fn test_no_matching_handlers_navigates() {
        let first = SpyRouteHandler::no_match();
        let second = SpyRouteHandler::no_match();
        let router = Router::empty()
            .with_handler(first.clone())
            .with_handler(second.clone());
        let mut navigator = StubNavigator::default();

        let resolved = router.resolve(&url("https://my.app.com/page"), &configuration(), &mut navigator);

        assert_eq!(resolved.decision, RouteDecision::Navigate);
        assert_eq!(resolved.handler, None);
        assert!(first.matches_called() && !first.handle_called());
        assert!(second.matches_called() && !second.handle_called());
    }

    #[test]
    fn test_only_first_matching_handler_is_executed() {
        let no_match = SpyRouteHandler::no_match();
        let match_one = SpyRouteHandler::matching(RouteDecision::Cancel);
        let match_two = SpyRouteHandler::matching(RouteDecision::Cancel);
        let router = Router::empty()
            .with_handler(no_match.clone())
            .with_handler(match_one.clone())
            .with_handler(match_two.clone());
        let mut navigator = StubNavigator::default();

        let decision = router.decide_route(&url("https://my.app.com/page"), &configuration(), &mut navigator);

        assert_eq!(decision, RouteDecision::Cancel);
        assert!(no_match.matches_called());
        assert!(!no_match.handle_called());
        assert!(match_one.matches_called());
        assert!(match_one.handle_called());
        assert!(!match_two.matches_called());
        assert!(!match_two.handle_called());
    }

    #[test]
    fn test_external_domain_handler_matching() {
        let handler = ExternalDomainRouteDecisionHandler;
        let configuration = configuration();

        assert!(handler.matches(&url("https://external.com/page"), &configuration));
        assert!(handler.matches(&url("https://app.com/page"), &configuration));
        assert!(!handler.matches(&url("https://my.app.com/page"), &configuration));
        assert!(!handler.matches(&url("file:///path/to/file"), &configuration));
    }

    #[test]
    fn test_external_domain_handler_cancels_and_opens_browser() {
        let handler = ExternalDomainRouteDecisionHandler;
        let mut navigator = StubNavigator::default();
        let location = url("https://external.com/page");

        let decision = handler.handle(&location, &configuration(), &mut navigator);

        assert_eq!(decision, RouteDecision::Cancel);
        assert_eq!(navigator.opened, vec![(location, ExternalTarget::InAppBrowser)]);
    }

    #[test]
    fn test_system_handler_matches_non_web_schemes() {
        let handler = SystemNavigationRouteDecisionHandler;
        let configuration = configuration();
        assert!(handler.matches(&url("mailto:ada@example.com"), &configuration));
        assert!(handler.matches(&url("tel:+15555550100"), &configuration));
        assert!(!handler.matches(&url("https://external.com"), &configuration));
    }

    #[test]
    fn test_default_router_order() {
        let router = Router::default();
        assert_eq!(
            router.handler_names(),
            vec!["app-navigation", "external-domain", "system-navigation"]
        );
    }

    #[test]
    fn test_default_router_decisions() {
        let router = Router::default();
        let configuration = configuration();
        let mut navigator = StubNavigator::default();

        let internal = router.resolve(&url("https://my.app.com/posts"), &configuration, &mut navigator);
        assert_eq!(internal.decision, RouteDecision::Navigate);
        assert_eq!(internal.handler.as_deref(), Some("app-navigation"));

        let external = router.resolve(&url("https://external.com"), &configuration, &mut navigator);
        assert_eq!(external.decision, RouteDecision::Cancel);
        assert_eq!(external.handler.as_deref(), Some("external-domain"));

        let mail = router.resolve(&url("mailto:ada@example.com"), &configuration, &mut navigator);
        assert_eq!(mail.handler.as_deref(), Some("system-navigation"));
        assert_eq!(navigator.opened.len(), 2);
    }

    #[test]
    fn test_route_handler_fn() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handler = route_handler_fn(
            "pdf",
            |location, _| location.path().ends_with(".pdf"),
            move |_, _, _| {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                RouteDecision::Cancel
            },
        );
        let router = Router::empty().with_handler(handler);
        let mut navigator = StubNavigator::default();

        let resolved = router.resolve(&url("https://my.app.com/report.pdf"), &configuration(), &mut navigator);
        assert_eq!(resolved.decision, RouteDecision::Cancel);
        assert_eq!(resolved.handler.as_deref(), Some("pdf"));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
