//! The visit lifecycle state machine.
//!
//! A [`Visit`] is one attempt to load a location into the web engine. It
//! moves strictly forward:
//!
//! ```text
//! Initialized ──start()──▶ Started ──did_finish()──▶ Completed
//!      │                      ├──────did_fail()────▶ Failed
//!      └──────cancel()────────┴──────cancel()──────▶ Canceled
//! ```
//!
//! Terminal states are absorbing. `start()` on anything but `Initialized` is a
//! no-op, and engine callbacks reaching a visit that is not `Started`, or that
//! carry another load's [`NavigationHandle`], are dropped. That is what keeps
//! a late redirect or failure from a superseded load from touching the current
//! navigation.
//!
//! The visit reports to a [`VisitObserver`]; in practice the
//! [`Navigator`](crate::Navigator) relays those events to its delegate.

use crate::engine::{AuthChallengeDisposition, AuthenticationChallenge, NavigationHandle, WebEngine};
use crate::error::VisitError;
use crate::{debug_log, trace_log, warn_log};
use std::fmt;
use url::Url;
use uuid::Uuid;

/// Generated identity of a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisitId(Uuid);

impl VisitId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VisitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VisitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitState {
    /// Created, not yet started.
    Initialized,
    /// Loading.
    Started,
    /// Loaded successfully.
    Completed,
    /// Load failed.
    Failed,
    /// Stopped by its owner.
    Canceled,
}

impl VisitState {
    /// Completed, failed, or canceled.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Canceled)
    }

    /// Check if moving from `self` to `next` respects the state machine.
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Initialized, Self::Started | Self::Canceled) => true,
            (Self::Started, Self::Completed | Self::Failed | Self::Canceled) => true,
            _ => false,
        }
    }
}

/// How the visit affects the engine's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitAction {
    /// Push a new history entry.
    #[default]
    Advance,
    /// Replace the current history entry.
    Replace,
    /// Restore a previous entry.
    Restore,
}

/// HTTP method of the visit's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestMethod {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

/// Options a visit was requested with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisitOptions {
    /// History action.
    pub action: VisitAction,
    /// Whether this visit reloads the location it targets.
    pub reload: bool,
    /// Request method.
    pub method: RequestMethod,
}

impl VisitOptions {
    /// Default options with a different history action.
    pub fn with_action(action: VisitAction) -> Self {
        Self {
            action,
            ..Self::default()
        }
    }

    /// Mark the visit as a reload.
    pub fn reloading(mut self) -> Self {
        self.reload = true;
        self
    }
}

/// Zero-argument retry capability handed out on failure.
///
/// Pass it back to [`Navigator::retry`](crate::Navigator::retry); the
/// navigator builds a brand-new visit rather than resuming the failed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryHandle {
    failed_visit: VisitId,
    location: Url,
    options: VisitOptions,
}

impl RetryHandle {
    /// The visit that failed.
    pub fn failed_visit(&self) -> VisitId {
        self.failed_visit
    }

    /// Location the retry will load.
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Options the retry will use.
    pub fn options(&self) -> &VisitOptions {
        &self.options
    }
}

/// Receives a visit's lifecycle events.
pub trait VisitObserver {
    /// The visit is about to start.
    fn visit_will_start(&mut self, visit: &Visit);

    /// The visit has started.
    fn visit_did_start(&mut self, visit: &Visit);

    /// The visit completed; `final_location` reflects redirects.
    fn visit_did_complete(&mut self, visit: &Visit, final_location: &Url);

    /// The visit failed.
    fn visit_did_fail(&mut self, visit: &Visit, error: &VisitError, retry: RetryHandle);

    /// The server asked for credentials during the visit.
    fn visit_did_receive_challenge(
        &mut self,
        visit: &Visit,
        challenge: &AuthenticationChallenge,
    ) -> AuthChallengeDisposition;
}

/// One in-flight navigation attempt.
#[derive(Debug, Clone)]
pub struct Visit {
    id: VisitId,
    location: Url,
    options: VisitOptions,
    state: VisitState,
    navigation: Option<NavigationHandle>,
    redirected_location: Option<Url>,
}

impl Visit {
    /// Create a visit in the `Initialized` state.
    pub fn new(location: Url, options: VisitOptions) -> Self {
        Self {
            id: VisitId::new(),
            location,
            options,
            state: VisitState::Initialized,
            navigation: None,
            redirected_location: None,
        }
    }

    /// Identity token.
    pub fn id(&self) -> VisitId {
        self.id
    }

    /// Requested location.
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Requested options.
    pub fn options(&self) -> &VisitOptions {
        &self.options
    }

    /// Current state.
    pub fn state(&self) -> VisitState {
        self.state
    }

    /// Engine handle of the load, once started.
    pub fn navigation(&self) -> Option<NavigationHandle> {
        self.navigation
    }

    /// Last redirect target, or the requested location.
    pub fn resolved_location(&self) -> &Url {
        self.redirected_location.as_ref().unwrap_or(&self.location)
    }

    /// Check if the visit is loading.
    pub fn is_started(&self) -> bool {
        self.state == VisitState::Started
    }

    /// Check if the visit reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Start loading. No-op unless `Initialized`.
    ///
    /// Returns `true` if the visit started.
    pub fn start(&mut self, engine: &mut dyn WebEngine, observer: &mut dyn VisitObserver) -> bool {
        if !self.transition(VisitState::Started) {
            trace_log!("Visit {} already {:?}, ignoring start()", self.id, self.state);
            return false;
        }

        observer.visit_will_start(self);
        observer.visit_did_start(self);
        self.navigation = Some(engine.load(&self.location, &self.options));
        engine.set_navigation_receiver(Some(self.id));
        true
    }

    /// The engine followed a redirect.
    pub fn did_redirect(&mut self, navigation: NavigationHandle, to: Url) -> bool {
        if !self.accepts(navigation, "redirect") {
            return false;
        }
        debug_log!("Visit {} redirected to '{}'", self.id, to);
        self.redirected_location = Some(to);
        true
    }

    /// The engine finished loading. `final_location` overrides any redirect
    /// seen so far when the engine reports it.
    pub fn did_finish(
        &mut self,
        navigation: NavigationHandle,
        final_location: Option<Url>,
        observer: &mut dyn VisitObserver,
    ) -> bool {
        if !self.accepts(navigation, "finish") {
            return false;
        }
        if let Some(location) = final_location {
            self.redirected_location = Some(location);
        }
        self.transition(VisitState::Completed);
        let resolved = self.resolved_location().clone();
        observer.visit_did_complete(self, &resolved);
        true
    }

    /// The engine failed to load.
    pub fn did_fail(
        &mut self,
        navigation: NavigationHandle,
        error: &VisitError,
        observer: &mut dyn VisitObserver,
    ) -> bool {
        if !self.accepts(navigation, "failure") {
            return false;
        }
        warn_log!("Visit {} to '{}' failed: {}", self.id, self.location, error);
        self.transition(VisitState::Failed);
        let retry = RetryHandle {
            failed_visit: self.id,
            location: self.location.clone(),
            options: self.options.clone(),
        };
        observer.visit_did_fail(self, error, retry);
        true
    }

    /// The server issued an authentication challenge.
    ///
    /// Returns `None` if the callback was ignored.
    pub fn did_receive_challenge(
        &mut self,
        navigation: NavigationHandle,
        challenge: &AuthenticationChallenge,
        observer: &mut dyn VisitObserver,
    ) -> Option<AuthChallengeDisposition> {
        if !self.accepts(navigation, "authentication challenge") {
            return None;
        }
        Some(observer.visit_did_receive_challenge(self, challenge))
    }

    /// Cancel the visit, stopping its load if one is running.
    ///
    /// Returns `true` if the visit was canceled by this call.
    pub fn cancel(&mut self, engine: &mut dyn WebEngine) -> bool {
        let was_started = self.is_started();
        if !self.transition(VisitState::Canceled) {
            return false;
        }
        if was_started {
            if let Some(navigation) = self.navigation {
                engine.stop_loading(navigation);
            }
            engine.set_navigation_receiver(None);
        }
        true
    }

    fn accepts(&self, navigation: NavigationHandle, callback: &str) -> bool {
        if self.state != VisitState::Started || self.navigation != Some(navigation) {
            trace_log!(
                "Visit {} ({:?}) ignoring {} for navigation {:?}",
                self.id,
                self.state,
                callback,
                navigation
            );
            return false;
        }
        true
    }

    fn transition(&mut self, next: VisitState) -> bool {
        if !self.state.can_transition_to(next) {
            return false;
        }
        debug_log!("Visit {}: {:?} → {:?}", self.id, self.state, next);
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeEngine {
        loads: Vec<Url>,
        stopped: Vec<NavigationHandle>,
        receiver: Option<VisitId>,
    }

    impl WebEngine for FakeEngine {
        fn load(&mut self, location: &Url, _options: &VisitOptions) -> NavigationHandle {
            self.loads.push(location.clone());
            NavigationHandle::new(self.loads.len() as u64)
        }

        fn stop_loading(&mut self, navigation: NavigationHandle) {
            self.stopped.push(navigation);
        }

        fn set_navigation_receiver(&mut self, visit: Option<VisitId>) {
            self.receiver = visit;
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        calls: Vec<String>,
        completed_at: Option<Url>,
        retry: Option<RetryHandle>,
    }

    impl VisitObserver for RecordingObserver {
        fn visit_will_start(&mut self, _visit: &Visit) {
            self.calls.push("will_start".into());
        }

        fn visit_did_start(&mut self, _visit: &Visit) {
            self.calls.push("did_start".into());
        }

        fn visit_did_complete(&mut self, _visit: &Visit, final_location: &Url) {
            self.calls.push("did_complete".into());
            self.completed_at = Some(final_location.clone());
        }

        fn visit_did_fail(&mut self, _visit: &Visit, error: &VisitError, retry: RetryHandle) {
            self.calls.push(format!("did_fail:{}", error));
            self.retry = Some(retry);
        }

        fn visit_did_receive_challenge(
            &mut self,
            _visit: &Visit,
            _challenge: &AuthenticationChallenge,
        ) -> AuthChallengeDisposition {
            self.calls.push("challenge".into());
            AuthChallengeDisposition::PerformDefaultHandling
        }
    }

    fn visit() -> Visit {
        Visit::new(
            Url::parse("http://localhost/new").unwrap(),
            VisitOptions::default(),
        )
    }

    fn started() -> (Visit, FakeEngine, RecordingObserver) {
        let mut visit = visit();
        let mut engine = FakeEngine::default();
        let mut observer = RecordingObserver::default();
        visit.start(&mut engine, &mut observer);
        (visit, engine, observer)
    }

    #[test]
    fn test_start_transitions_to_started() {
        let (visit, _, _) = started();
        assert_eq!(visit.state(), VisitState::Started);
    }

    #[test]
    fn test_start_notifies_will_then_did_start() {
        let (_, _, observer) = started();
        assert_eq!(observer.calls, vec!["will_start", "did_start"]);
    }

    #[test]
    fn test_start_kicks_off_load_and_claims_receiver() {
        let (visit, engine, _) = started();
        assert!(visit.navigation().is_some());
        assert_eq!(engine.loads.len(), 1);
        assert_eq!(engine.receiver, Some(visit.id()));
    }

    #[test]
    fn test_start_twice_is_noop() {
        let (mut visit, mut engine, mut observer) = started();
        assert!(!visit.start(&mut engine, &mut observer));

        let did_start = observer.calls.iter().filter(|c| *c == "did_start").count();
        assert_eq!(did_start, 1);
        assert_eq!(engine.loads.len(), 1);
    }

    #[test]
    fn test_finish_reports_redirected_location() {
        let (mut visit, _, mut observer) = started();
        let navigation = visit.navigation().unwrap();
        let redirected = Url::parse("http://localhost/redirected").unwrap();

        assert!(visit.did_redirect(navigation, redirected.clone()));
        assert!(visit.did_finish(navigation, None, &mut observer));

        assert_eq!(visit.state(), VisitState::Completed);
        assert_eq!(observer.completed_at, Some(redirected));
    }

    #[test]
    fn test_finish_prefers_engine_final_location() {
        let (mut visit, _, mut observer) = started();
        let navigation = visit.navigation().unwrap();
        let final_location = Url::parse("http://localhost/final").unwrap();

        visit.did_redirect(navigation, Url::parse("http://localhost/hop").unwrap());
        visit.did_finish(navigation, Some(final_location.clone()), &mut observer);

        assert_eq!(observer.completed_at, Some(final_location));
    }

    #[test]
    fn test_failure_hands_out_retry() {
        let (mut visit, _, mut observer) = started();
        let navigation = visit.navigation().unwrap();

        assert!(visit.did_fail(navigation, &VisitError::NetworkFailure, &mut observer));

        assert_eq!(visit.state(), VisitState::Failed);
        let retry = observer.retry.unwrap();
        assert_eq!(retry.failed_visit(), visit.id());
        assert_eq!(retry.location(), visit.location());
    }

    #[test]
    fn test_terminal_state_is_absorbing() {
        let (mut visit, mut engine, mut observer) = started();
        let navigation = visit.navigation().unwrap();
        visit.did_finish(navigation, None, &mut observer);

        assert!(!visit.did_fail(navigation, &VisitError::TimeoutFailure, &mut observer));
        assert!(!visit.cancel(&mut engine));
        assert!(!visit.start(&mut engine, &mut observer));
        assert_eq!(visit.state(), VisitState::Completed);
    }

    #[test]
    fn test_callbacks_before_start_are_ignored() {
        let mut visit = visit();
        let mut observer = RecordingObserver::default();
        let navigation = NavigationHandle::new(1);

        assert!(!visit.did_finish(navigation, None, &mut observer));
        assert!(observer.calls.is_empty());
        assert_eq!(visit.state(), VisitState::Initialized);
    }

    #[test]
    fn test_callbacks_for_other_navigation_are_ignored() {
        let (mut visit, _, mut observer) = started();
        let stray = NavigationHandle::new(99);

        assert!(!visit.did_redirect(stray, Url::parse("http://localhost/x").unwrap()));
        assert!(!visit.did_fail(stray, &VisitError::NetworkFailure, &mut observer));
        assert_eq!(visit.state(), VisitState::Started);
        assert_eq!(visit.resolved_location(), visit.location());
    }

    #[test]
    fn test_cancel_stops_load_and_ignores_late_callbacks() {
        let (mut visit, mut engine, mut observer) = started();
        let navigation = visit.navigation().unwrap();

        assert!(visit.cancel(&mut engine));
        assert_eq!(visit.state(), VisitState::Canceled);
        assert_eq!(engine.stopped, vec![navigation]);
        assert_eq!(engine.receiver, None);

        assert!(!visit.did_finish(navigation, None, &mut observer));
        assert!(!observer.calls.contains(&"did_complete".to_string()));
    }

    #[test]
    fn test_cancel_before_start() {
        let mut visit = visit();
        let mut engine = FakeEngine::default();
        let mut observer = RecordingObserver::default();

        assert!(visit.cancel(&mut engine));
        assert!(engine.stopped.is_empty());
        assert!(!visit.start(&mut engine, &mut observer));
        assert!(engine.loads.is_empty());
    }

    #[test]
    fn test_challenge_only_while_started() {
        let (mut visit, _, mut observer) = started();
        let navigation = visit.navigation().unwrap();
        let challenge = AuthenticationChallenge {
            host: "localhost".into(),
            scheme: "Basic".into(),
            realm: None,
        };

        assert_eq!(
            visit.did_receive_challenge(navigation, &challenge, &mut observer),
            Some(AuthChallengeDisposition::PerformDefaultHandling)
        );
        visit.did_finish(navigation, None, &mut observer);
        assert_eq!(
            visit.did_receive_challenge(navigation, &challenge, &mut observer),
            None
        );
    }

    #[test]
    fn test_state_transition_table() {
        use VisitState::*;
        assert!(Initialized.can_transition_to(Started));
        assert!(Started.can_transition_to(Failed));
        assert!(!Started.can_transition_to(Initialized));
        assert!(!Completed.can_transition_to(Started));
        assert!(!Canceled.can_transition_to(Canceled));
        assert!(Failed.is_terminal());
        assert!(!Started.is_terminal());
    }
}
