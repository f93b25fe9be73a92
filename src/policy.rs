//! Policy decision handlers and the [`PolicyManager`] that chains them.
//!
//! Where the [`Router`](crate::Router) intercepts application-level route
//! proposals, the policy manager intercepts the web engine's own navigation
//! actions: link taps the page did not handle itself, reloads, requests for a
//! new window. Evaluation is the same first-match-wins chain; with no match
//! the engine is allowed to proceed.
//!
//! # Built-in handlers
//!
//! | Handler | Matches | Effect |
//! |---------|---------|--------|
//! | [`ReloadPolicyDecisionHandler`] | main-frame reload | navigator reloads with a fresh visit, if it has a screen to reload |
//! | [`NewWindowPolicyDecisionHandler`] | link opening a new window | navigator routes the URL |
//! | [`LinkActivatedPolicyDecisionHandler`] | main-frame link to another host | navigator routes the URL |
//!
//! All three cancel the engine's own navigation, except a reload with no
//! visible screen, which the engine performs itself. [`PolicyManager::default`]
//! registers them in that order.

use crate::configuration::NavigatorConfiguration;
use crate::engine::{NavigationAction, NavigationTarget, NavigationType};
use crate::navigator::NavigatorHandle;
use crate::router::Resolved;
use crate::{debug_log, trace_log};

/// Outcome of a policy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyDecision {
    /// Let the engine perform the navigation.
    Allow,
    /// Stop the engine's navigation.
    Cancel,
}

/// A pluggable interceptor for engine navigation actions.
pub trait PolicyDecisionHandler: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Pure, cheap predicate: does this handler want `action`?
    fn matches(&self, action: &NavigationAction, configuration: &NavigatorConfiguration) -> bool;

    /// Decide for a matched action. May have side effects.
    fn handle(
        &self,
        action: &NavigationAction,
        configuration: &NavigatorConfiguration,
        navigator: &mut dyn NavigatorHandle,
    ) -> PolicyDecision;
}

/// Create a policy decision handler from a name and two closures.
pub fn policy_handler_fn<M, H>(name: impl Into<String>, matches: M, handle: H) -> FnPolicyDecisionHandler<M, H>
where
    M: Fn(&NavigationAction, &NavigatorConfiguration) -> bool + Send + Sync + 'static,
    H: Fn(&NavigationAction, &NavigatorConfiguration, &mut dyn NavigatorHandle) -> PolicyDecision
        + Send
        + Sync
        + 'static,
{
    FnPolicyDecisionHandler {
        name: name.into(),
        matches,
        handle,
    }
}

/// Handler created from closures via [`policy_handler_fn`].
pub struct FnPolicyDecisionHandler<M, H> {
    name: String,
    matches: M,
    handle: H,
}

impl<M, H> PolicyDecisionHandler for FnPolicyDecisionHandler<M, H>
where
    M: Fn(&NavigationAction, &NavigatorConfiguration) -> bool + Send + Sync + 'static,
    H: Fn(&NavigationAction, &NavigatorConfiguration, &mut dyn NavigatorHandle) -> PolicyDecision
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, action: &NavigationAction, configuration: &NavigatorConfiguration) -> bool {
        (self.matches)(action, configuration)
    }

    fn handle(
        &self,
        action: &NavigationAction,
        configuration: &NavigatorConfiguration,
        navigator: &mut dyn NavigatorHandle,
    ) -> PolicyDecision {
        (self.handle)(action, configuration, navigator)
    }
}

/// Turns an engine reload into a fresh visit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReloadPolicyDecisionHandler;

impl PolicyDecisionHandler for ReloadPolicyDecisionHandler {
    fn name(&self) -> &str {
        "reload"
    }

    fn matches(&self, action: &NavigationAction, _configuration: &NavigatorConfiguration) -> bool {
        action.navigation_type == NavigationType::Reload && action.is_main_frame()
    }

    fn handle(
        &self,
        _action: &NavigationAction,
        _configuration: &NavigatorConfiguration,
        navigator: &mut dyn NavigatorHandle,
    ) -> PolicyDecision {
        match navigator.reload() {
            Some(_) => PolicyDecision::Cancel,
            None => {
                debug_log!("Nothing to reload natively, letting the engine reload");
                PolicyDecision::Allow
            }
        }
    }
}

/// Routes `target="_blank"` links through the navigator instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewWindowPolicyDecisionHandler;

impl PolicyDecisionHandler for NewWindowPolicyDecisionHandler {
    fn name(&self) -> &str {
        "new-window"
    }

    fn matches(&self, action: &NavigationAction, _configuration: &NavigatorConfiguration) -> bool {
        action.navigation_type == NavigationType::LinkActivated
            && action.target == NavigationTarget::NewWindow
    }

    fn handle(
        &self,
        action: &NavigationAction,
        _configuration: &NavigatorConfiguration,
        navigator: &mut dyn NavigatorHandle,
    ) -> PolicyDecision {
        navigator.route(action.url.clone());
        PolicyDecision::Cancel
    }
}

/// Routes main-frame links that leave the app's host through the navigator,
/// so the route handlers decide where they open.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkActivatedPolicyDecisionHandler;

impl PolicyDecisionHandler for LinkActivatedPolicyDecisionHandler {
    fn name(&self) -> &str {
        "link-activated"
    }

    fn matches(&self, action: &NavigationAction, configuration: &NavigatorConfiguration) -> bool {
        action.navigation_type == NavigationType::LinkActivated
            && action.is_main_frame()
            && !configuration.is_app_location(&action.url)
    }

    fn handle(
        &self,
        action: &NavigationAction,
        _configuration: &NavigatorConfiguration,
        navigator: &mut dyn NavigatorHandle,
    ) -> PolicyDecision {
        navigator.route(action.url.clone());
        PolicyDecision::Cancel
    }
}

/// Ordered chain of policy decision handlers.
pub struct PolicyManager {
    handlers: Vec<Box<dyn PolicyDecisionHandler>>,
}

impl PolicyManager {
    /// Create a manager from an ordered list of handlers.
    pub fn new(handlers: Vec<Box<dyn PolicyDecisionHandler>>) -> Self {
        Self { handlers }
    }

    /// A manager with no handlers; every action is allowed.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Append a handler after the existing ones.
    pub fn with_handler<H: PolicyDecisionHandler>(mut self, handler: H) -> Self {
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

    /// Resolve `action` to a decision.
    pub fn decide_policy(
        &self,
        action: &NavigationAction,
        configuration: &NavigatorConfiguration,
        navigator: &mut dyn NavigatorHandle,
    ) -> PolicyDecision {
        self.resolve(action, configuration, navigator).decision
    }

    /// Resolve `action`, also reporting which handler decided.
    pub fn resolve(
        &self,
        action: &NavigationAction,
        configuration: &NavigatorConfiguration,
        navigator: &mut dyn NavigatorHandle,
    ) -> Resolved<PolicyDecision> {
        for handler in &self.handlers {
            if handler.matches(action, configuration) {
                let decision = handler.handle(action, configuration, navigator);
                debug_log!(
                    "[{}] policy handler '{}' decided {:?} for {:?} '{}'",
                    configuration.name(),
                    handler.name(),
                    decision,
                    action.navigation_type,
                    action.url
                );
                return Resolved {
                    decision,
                    handler: Some(handler.name().to_string()),
                };
            }
            trace_log!("Policy handler '{}' passed on '{}'", handler.name(), action.url);
        }

        Resolved {
            decision: PolicyDecision::Allow,
            handler: None,
        }
    }
}

impl Default for PolicyManager {
    fn default() -> Self {
        Self::empty()
            .with_handler(ReloadPolicyDecisionHandler)
            .with_handler(NewWindowPolicyDecisionHandler)
            .with_handler(LinkActivatedPolicyDecisionHandler)
    }
}

impl std::fmt::Debug for PolicyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyManager")
            .field("handlers", &self.handler_names())
            .finish()
    }
}
