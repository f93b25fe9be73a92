//! The navigator: routing pipeline, active visit and hierarchy.
//!
//! A [`Navigator`] owns one web engine, one delegate and the hierarchy of
//! screens shown for them. Routing a location runs the pipeline:
//!
//! 1. the [`Router`] asks its handlers whether one takes the location;
//! 2. the [`PathConfiguration`] classifies it into [`PathProperties`];
//! 3. the delegate answers the resulting [`VisitProposal`];
//! 4. the presentation is applied to the hierarchy and, when the new top needs
//!    loading, a [`Visit`] is started. Any previous visit is canceled first.
//!
//! The host drives the navigator from its event loop and feeds engine
//! callbacks back through the `engine_did_*` methods. Decision handlers get a
//! [`NavigatorHandle`] so they can route, reload or open locations externally
//! while a resolution is running.
//!
//! # Example
//!
//! ```
//! use hybrid_navigator::{
//!     DefaultNavigatorDelegate, NavigationHandle, Navigator, NavigatorConfiguration, VisitId,
//!     VisitOptions, WebEngine,
//! };
//! use url::Url;
//!
//! #[derive(Default)]
//! struct Engine(u64);
//!
//! impl WebEngine for Engine {
//!     fn load(&mut self, _location: &Url, _options: &VisitOptions) -> NavigationHandle {
//!         self.0 += 1;
//!         NavigationHandle::new(self.0)
//!     }
//!     fn stop_loading(&mut self, _navigation: NavigationHandle) {}
//!     fn set_navigation_receiver(&mut self, _visit: Option<VisitId>) {}
//! }
//!
//! let configuration = NavigatorConfiguration::parse("main", "https://my.app.com").unwrap();
//! let mut navigator = Navigator::new(configuration, DefaultNavigatorDelegate::new(), Engine::default());
//!
//! assert!(navigator.start().is_visited());
//! assert!(navigator.route(Url::parse("https://external.com").unwrap()).is_cancelled());
//! assert_eq!(navigator.delegate().opened().len(), 1);
//! ```

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, PropertiesCache};
use crate::configuration::NavigatorConfiguration;
use crate::delegate::{ExternalTarget, NavigatorDelegate};
use crate::engine::{AuthChallengeDisposition, AuthenticationChallenge, NavigationAction, NavigationHandle, WebEngine};
use crate::error::{RouteOutcome, VisitError};
use crate::hierarchy::{ChangeKind, Destination, NavigationHierarchy};
use crate::path_configuration::PathConfiguration;
use crate::path_rule::{PathProperties, Presentation};
use crate::policy::{PolicyDecision, PolicyManager};
use crate::proposal::{ProposalResult, VisitProposal};
use crate::router::{RouteDecision, Router};
use crate::visit::{RetryHandle, Visit, VisitAction, VisitId, VisitObserver, VisitOptions};
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use std::sync::Arc;
use url::Url;

/// Maximum nesting of `route()` calls made by decision handlers.
const MAX_ROUTE_DEPTH: usize = 5;

// ============================================================================
// NavigatorHandle
// ============================================================================

/// What decision handlers may ask of the navigator running them.
pub trait NavigatorHandle {
    /// Configuration of the navigator.
    fn configuration(&self) -> &NavigatorConfiguration;

    /// Location of the visible entry.
    fn current_location(&self) -> Option<&Url>;

    /// Route a location through the full pipeline.
    fn route(&mut self, location: Url) -> RouteOutcome;

    /// Reload the visible entry with a fresh visit.
    fn reload(&mut self) -> Option<VisitId>;

    /// Hand a location to the delegate for opening outside the navigator.
    fn open_external(&mut self, location: &Url, target: ExternalTarget);
}

// ============================================================================
// Navigator
// ============================================================================

/// Native navigation for one web engine.
pub struct Navigator<D: NavigatorDelegate, E: WebEngine> {
    configuration: Arc<NavigatorConfiguration>,
    path_configuration: Arc<PathConfiguration>,
    router: Arc<Router>,
    policy_manager: Arc<PolicyManager>,
    delegate: D,
    engine: E,
    hierarchy: NavigationHierarchy<D::Destination>,
    active_visit: Option<Visit>,
    route_depth: usize,
    #[cfg(feature = "cache")]
    cache: PropertiesCache,
}

impl<D: NavigatorDelegate, E: WebEngine> Navigator<D, E> {
    /// Create a navigator with the built-in router and policy manager and a
    /// path configuration holding only the server routes.
    pub fn new(configuration: impl Into<Arc<NavigatorConfiguration>>, delegate: D, engine: E) -> Self {
        let configuration = configuration.into();
        info_log!(
            "Navigator '{}' created for '{}'",
            configuration.name(),
            configuration.start_location()
        );
        Self {
            configuration,
            path_configuration: Arc::new(PathConfiguration::new()),
            router: Arc::new(Router::default()),
            policy_manager: Arc::new(PolicyManager::default()),
            delegate,
            engine,
            hierarchy: NavigationHierarchy::new(),
            active_visit: None,
            route_depth: 0,
            #[cfg(feature = "cache")]
            cache: PropertiesCache::new(),
        }
    }

    /// Use `path_configuration` to classify locations.
    pub fn with_path_configuration(mut self, path_configuration: impl Into<Arc<PathConfiguration>>) -> Self {
        self.path_configuration = path_configuration.into();
        #[cfg(feature = "cache")]
        self.cache.clear();
        self
    }

    /// Use `router` for route decisions.
    pub fn with_router(mut self, router: impl Into<Arc<Router>>) -> Self {
        self.router = router.into();
        self
    }

    /// Use `policy_manager` for engine policy decisions.
    pub fn with_policy_manager(mut self, policy_manager: impl Into<Arc<PolicyManager>>) -> Self {
        self.policy_manager = policy_manager.into();
        self
    }

    /// Route the configured start location.
    pub fn start(&mut self) -> RouteOutcome {
        let location = self.configuration.start_location().clone();
        self.route(location)
    }

    /// Route `location` with default visit options.
    pub fn route(&mut self, location: Url) -> RouteOutcome {
        self.route_with_options(location, VisitOptions::default())
    }

    /// Route `location` through the full pipeline.
    pub fn route_with_options(&mut self, location: Url, options: VisitOptions) -> RouteOutcome {
        if self.route_depth >= MAX_ROUTE_DEPTH {
            error_log!(
                "Routing loop detected (depth {}) routing to '{}'",
                self.route_depth,
                location
            );
            return RouteOutcome::Rejected;
        }

        let router = Arc::clone(&self.router);
        let configuration = Arc::clone(&self.configuration);
        self.route_depth += 1;
        let resolved = router.resolve(&location, &configuration, self);
        self.route_depth -= 1;

        if resolved.decision == RouteDecision::Cancel {
            return RouteOutcome::Cancelled {
                handler: resolved.handler.unwrap_or_default(),
            };
        }

        let properties = self.classify(&location);
        let proposal = VisitProposal::new(location, options, properties);
        if self.configuration.debug_logging() {
            info_log!(
                "[{}] proposing '{}' ({}, {:?})",
                self.configuration.name(),
                proposal.url(),
                proposal.presentation().as_str(),
                proposal.context()
            );
        }

        match self.delegate.handle_proposal(&proposal) {
            ProposalResult::Accept => self.present(&proposal, Destination::Default),
            ProposalResult::AcceptCustom(destination) => self.present(&proposal, Destination::Custom(destination)),
            ProposalResult::Reject => {
                debug_log!("Delegate rejected proposal for '{}'", proposal.url());
                RouteOutcome::Rejected
            }
        }
    }

    /// Resolve an engine navigation action. The engine proceeds only on
    /// [`PolicyDecision::Allow`].
    pub fn decide_policy(&mut self, action: &NavigationAction) -> PolicyDecision {
        let policy_manager = Arc::clone(&self.policy_manager);
        let configuration = Arc::clone(&self.configuration);
        policy_manager.decide_policy(action, &configuration, self)
    }

    /// Reload the visible entry with a fresh visit.
    pub fn reload(&mut self) -> Option<VisitId> {
        let location = self.hierarchy.current_location()?.clone();
        info_log!("Reloading '{}'", location);
        Some(self.start_visit(location, VisitOptions::with_action(VisitAction::Replace).reloading()))
    }

    /// Retry a failed visit with a brand-new visit.
    ///
    /// Returns `None` if another visit has started since the failure.
    pub fn retry(&mut self, retry: RetryHandle) -> Option<VisitId> {
        let current = self.active_visit.as_ref().map(Visit::id);
        if current != Some(retry.failed_visit()) {
            warn_log!(
                "Ignoring retry of visit {}: superseded by {:?}",
                retry.failed_visit(),
                current
            );
            return None;
        }
        info_log!("Retrying '{}'", retry.location());
        Some(self.start_visit(retry.location().clone(), retry.options().clone()))
    }

    /// Cancel the active visit, if one is running.
    pub fn cancel(&mut self) -> bool {
        match self.active_visit.as_mut() {
            Some(visit) => visit.cancel(&mut self.engine),
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Engine callbacks
    // ------------------------------------------------------------------------

    /// The engine followed a redirect for `navigation`.
    pub fn engine_did_redirect(&mut self, navigation: NavigationHandle, to: Url) -> bool {
        match self.active_visit.as_mut() {
            Some(visit) => visit.did_redirect(navigation, to),
            None => {
                trace_log!("No active visit for redirect of {:?}", navigation);
                false
            }
        }
    }

    /// The engine finished loading `navigation`.
    pub fn engine_did_finish(&mut self, navigation: NavigationHandle, final_location: Option<Url>) -> bool {
        let Some(visit) = self.active_visit.as_mut() else {
            trace_log!("No active visit for finish of {:?}", navigation);
            return false;
        };
        let mut relay = DelegateRelay {
            delegate: &mut self.delegate,
        };
        if !visit.did_finish(navigation, final_location, &mut relay) {
            return false;
        }
        if visit.resolved_location() != visit.location() {
            self.hierarchy
                .update_top_location(visit.location(), visit.resolved_location().clone());
        }
        true
    }

    /// The engine failed to load `navigation`.
    pub fn engine_did_fail(&mut self, navigation: NavigationHandle, error: VisitError) -> bool {
        let Some(visit) = self.active_visit.as_mut() else {
            trace_log!("No active visit for failure of {:?}", navigation);
            return false;
        };
        let mut relay = DelegateRelay {
            delegate: &mut self.delegate,
        };
        visit.did_fail(navigation, &error, &mut relay)
    }

    /// The server sent an authentication challenge for `navigation`.
    ///
    /// Challenges for anything but the active visit are canceled.
    pub fn engine_did_receive_challenge(
        &mut self,
        navigation: NavigationHandle,
        challenge: &AuthenticationChallenge,
    ) -> AuthChallengeDisposition {
        let disposition = self.active_visit.as_mut().and_then(|visit| {
            let mut relay = DelegateRelay {
                delegate: &mut self.delegate,
            };
            visit.did_receive_challenge(navigation, challenge, &mut relay)
        });
        disposition.unwrap_or(AuthChallengeDisposition::CancelAuthenticationChallenge)
    }

    /// A form submission started in the page.
    pub fn form_submission_did_start(&mut self, location: &Url) {
        trace_log!("Form submission started: '{}'", location);
        self.delegate.form_submission_did_start(location);
    }

    /// A form submission finished in the page.
    pub fn form_submission_did_finish(&mut self, location: &Url) {
        trace_log!("Form submission finished: '{}'", location);
        self.delegate.form_submission_did_finish(location);
    }

    /// A page request finished.
    pub fn request_did_finish(&mut self, location: &Url) {
        trace_log!("Request finished: '{}'", location);
        self.delegate.request_did_finish(location);
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Configuration of this navigator.
    pub fn configuration(&self) -> &NavigatorConfiguration {
        &self.configuration
    }

    /// Path configuration used for classification.
    pub fn path_configuration(&self) -> &PathConfiguration {
        &self.path_configuration
    }

    /// Route decision chain.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Policy decision chain.
    pub fn policy_manager(&self) -> &PolicyManager {
        &self.policy_manager
    }

    /// The delegate.
    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    /// The delegate, mutably.
    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    /// The web engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The web engine, mutably.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Screens shown by this navigator.
    pub fn hierarchy(&self) -> &NavigationHierarchy<D::Destination> {
        &self.hierarchy
    }

    /// The most recently started visit.
    pub fn active_visit(&self) -> Option<&Visit> {
        self.active_visit.as_ref()
    }

    /// Location of the visible entry.
    pub fn current_location(&self) -> Option<&Url> {
        self.hierarchy.current_location()
    }

    /// Classification cache statistics.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn present(&mut self, proposal: &VisitProposal, destination: Destination<D::Destination>) -> RouteOutcome {
        let presentation = proposal.presentation();
        if proposal.is_historical_location() {
            debug_log!(
                "Historical location '{}' ({})",
                proposal.url(),
                presentation.as_str()
            );
        }

        match presentation {
            Presentation::Pop | Presentation::ClearAll | Presentation::None => {
                let change = self
                    .hierarchy
                    .show(proposal.url().clone(), destination, presentation, proposal.context());
                if change.kind != ChangeKind::None {
                    self.discard_active_visit();
                }
                RouteOutcome::HierarchyChanged
            }
            Presentation::Refresh => {
                if self.hierarchy.recede().kind != ChangeKind::None {
                    self.discard_active_visit();
                }
                match self.reload() {
                    Some(visit) => RouteOutcome::Visited { visit },
                    None => RouteOutcome::HierarchyChanged,
                }
            }
            Presentation::Default | Presentation::Push | Presentation::Replace | Presentation::ReplaceRoot => {
                self.hierarchy
                    .show(proposal.url().clone(), destination, presentation, proposal.context());
                let visit = self.start_visit(proposal.url().clone(), proposal.options().clone());
                RouteOutcome::Visited { visit }
            }
        }
    }

    /// Drop the visit of a screen that left the hierarchy, stopping its load.
    fn discard_active_visit(&mut self) {
        if let Some(mut visit) = self.active_visit.take() {
            if visit.cancel(&mut self.engine) {
                debug_log!("Canceled visit {} for '{}'", visit.id(), visit.location());
            }
            trace_log!("Discarded visit {} after hierarchy change", visit.id());
        }
    }

    fn start_visit(&mut self, location: Url, options: VisitOptions) -> VisitId {
        if let Some(mut previous) = self.active_visit.take() {
            if previous.cancel(&mut self.engine) {
                debug_log!("Canceled visit {} for '{}'", previous.id(), previous.location());
            }
        }

        let mut visit = Visit::new(location, options);
        let id = visit.id();
        let mut relay = DelegateRelay {
            delegate: &mut self.delegate,
        };
        visit.start(&mut self.engine, &mut relay);
        self.active_visit = Some(visit);
        id
    }

    #[cfg(feature = "cache")]
    fn classify(&mut self, location: &Url) -> PathProperties {
        let path = location.path();
        let index = match self.cache.get(path) {
            Some(index) => index,
            None => {
                let index = self.path_configuration.matching_rule_index(path);
                self.cache.insert(path.to_string(), index);
                index
            }
        };
        index
            .and_then(|index| self.path_configuration.rule(index))
            .map(|rule| rule.properties().clone())
            .unwrap_or_default()
    }

    #[cfg(not(feature = "cache"))]
    fn classify(&mut self, location: &Url) -> PathProperties {
        self.path_configuration.properties(location)
    }
}

impl<D: NavigatorDelegate, E: WebEngine> NavigatorHandle for Navigator<D, E> {
    fn configuration(&self) -> &NavigatorConfiguration {
        &self.configuration
    }

    fn current_location(&self) -> Option<&Url> {
        self.hierarchy.current_location()
    }

    fn route(&mut self, location: Url) -> RouteOutcome {
        Navigator::route(self, location)
    }

    fn reload(&mut self) -> Option<VisitId> {
        Navigator::reload(self)
    }

    fn open_external(&mut self, location: &Url, target: ExternalTarget) {
        self.delegate.open_external(location, target);
    }
}

impl<D: NavigatorDelegate, E: WebEngine> std::fmt::Debug for Navigator<D, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("name", &self.configuration.name())
            .field("current_location", &self.current_location().map(Url::as_str))
            .field("active_visit", &self.active_visit.as_ref().map(Visit::id))
            .field("router", &self.router)
            .field("policy_manager", &self.policy_manager)
            .finish()
    }
}

/// Forwards visit lifecycle events to the delegate.
struct DelegateRelay<'a, D> {
    delegate: &'a mut D,
}

impl<D: NavigatorDelegate> VisitObserver for DelegateRelay<'_, D> {
    fn visit_will_start(&mut self, visit: &Visit) {
        trace_log!("Visit {} will start: '{}'", visit.id(), visit.location());
    }

    fn visit_did_start(&mut self, visit: &Visit) {
        self.delegate.visit_did_start(visit);
    }

    fn visit_did_complete(&mut self, visit: &Visit, final_location: &Url) {
        self.delegate.visit_did_complete(visit, final_location);
    }

    fn visit_did_fail(&mut self, visit: &Visit, error: &VisitError, retry: RetryHandle) {
        self.delegate.visit_did_fail_request(visit.location(), error, Some(retry));
    }

    fn visit_did_receive_challenge(
        &mut self,
        _visit: &Visit,
        challenge: &AuthenticationChallenge,
    ) -> AuthChallengeDisposition {
        self.delegate.did_receive_authentication_challenge(challenge)
    }
}
