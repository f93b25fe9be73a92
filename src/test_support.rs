//! Shared fixtures for unit tests.

use crate::configuration::NavigatorConfiguration;
use crate::delegate::ExternalTarget;
use crate::engine::NavigationAction;
use crate::error::RouteOutcome;
use crate::navigator::NavigatorHandle;
use crate::policy::{PolicyDecision, PolicyDecisionHandler};
use crate::router::{RouteDecision, RouteDecisionHandler};
use crate::visit::VisitId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

pub(crate) fn configuration() -> NavigatorConfiguration {
    NavigatorConfiguration::parse("test", "https://my.app.com").unwrap()
}

pub(crate) fn url(location: &str) -> Url {
    Url::parse(location).unwrap()
}

#[derive(Clone, Default)]
struct Calls {
    matches: Arc<AtomicBool>,
    handle: Arc<AtomicBool>,
}

/// Route handler that records whether it was consulted.
#[derive(Clone)]
pub(crate) struct SpyRouteHandler {
    decision: Option<RouteDecision>,
    calls: Calls,
}

impl SpyRouteHandler {
    pub(crate) fn no_match() -> Self {
        Self {
            decision: None,
            calls: Calls::default(),
        }
    }

    pub(crate) fn matching(decision: RouteDecision) -> Self {
        Self {
            decision: Some(decision),
            calls: Calls::default(),
        }
    }

    pub(crate) fn matches_called(&self) -> bool {
        self.calls.matches.load(Ordering::SeqCst)
    }

    pub(crate) fn handle_called(&self) -> bool {
        self.calls.handle.load(Ordering::SeqCst)
    }
}

impl RouteDecisionHandler for SpyRouteHandler {
    fn name(&self) -> &str {
        "spy"
    }

    fn matches(&self, _location: &Url, _configuration: &NavigatorConfiguration) -> bool {
        self.calls.matches.store(true, Ordering::SeqCst);
        self.decision.is_some()
    }

    fn handle(
        &self,
        _location: &Url,
        _configuration: &NavigatorConfiguration,
        _navigator: &mut dyn NavigatorHandle,
    ) -> RouteDecision {
        self.calls.handle.store(true, Ordering::SeqCst);
        self.decision.unwrap_or(RouteDecision::Navigate)
    }
}

/// Policy handler that records whether it was consulted.
#[derive(Clone)]
pub(crate) struct SpyPolicyHandler {
    decision: Option<PolicyDecision>,
    calls: Calls,
}

impl SpyPolicyHandler {
    pub(crate) fn no_match() -> Self {
        Self {
            decision: None,
            calls: Calls::default(),
        }
    }

    pub(crate) fn matching(decision: PolicyDecision) -> Self {
        Self {
            decision: Some(decision),
            calls: Calls::default(),
        }
    }

    pub(crate) fn matches_called(&self) -> bool {
        self.calls.matches.load(Ordering::SeqCst)
    }

    pub(crate) fn handle_called(&self) -> bool {
        self.calls.handle.load(Ordering::SeqCst)
    }
}

impl PolicyDecisionHandler for SpyPolicyHandler {
    fn name(&self) -> &str {
        "spy"
    }

    fn matches(&self, _action: &NavigationAction, _configuration: &NavigatorConfiguration) -> bool {
        self.calls.matches.store(true, Ordering::SeqCst);
        self.decision.is_some()
    }

    fn handle(
        &self,
        _action: &NavigationAction,
        _configuration: &NavigatorConfiguration,
        _navigator: &mut dyn NavigatorHandle,
    ) -> PolicyDecision {
        self.calls.handle.store(true, Ordering::SeqCst);
        self.decision.unwrap_or(PolicyDecision::Allow)
    }
}

/// Navigator stand-in that records what handlers asked of it.
pub(crate) struct StubNavigator {
    configuration: NavigatorConfiguration,
    pub(crate) opened: Vec<(Url, ExternalTarget)>,
    pub(crate) routed: Vec<Url>,
    pub(crate) reloads: usize,
    /// What `reload` answers, `None` when there is nothing to reload.
    pub(crate) reload_result: Option<VisitId>,
}

impl Default for StubNavigator {
    fn default() -> Self {
        Self {
            configuration: configuration(),
            opened: Vec::new(),
            routed: Vec::new(),
            reloads: 0,
            reload_result: None,
        }
    }
}

impl NavigatorHandle for StubNavigator {
    fn configuration(&self) -> &NavigatorConfiguration {
        &self.configuration
    }

    fn current_location(&self) -> Option<&Url> {
        None
    }

    fn route(&mut self, location: Url) -> RouteOutcome {
        self.routed.push(location);
        RouteOutcome::Rejected
    }

    fn reload(&mut self) -> Option<VisitId> {
        self.reloads += 1;
        self.reload_result
    }

    fn open_external(&mut self, location: &Url, target: ExternalTarget) {
        self.opened.push((location.clone(), target));
    }
}
