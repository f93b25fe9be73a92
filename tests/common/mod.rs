//! Test utilities for navigator integration tests
//!
//! Provides a fake web engine, a recording delegate and small helpers.

#![allow(dead_code)]

use hybrid_navigator::*;
use url::Url;

/// Route log output to the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parse an absolute URL.
pub fn url(location: &str) -> Url {
    Url::parse(location).unwrap()
}

/// Location on the test app's host.
pub fn app_url(path: &str) -> Url {
    url("https://my.app.com").join(path).unwrap()
}

pub fn configuration() -> NavigatorConfiguration {
    NavigatorConfiguration::parse("test", "https://my.app.com").unwrap()
}

/// Web engine that records what it was asked to do.
#[derive(Debug, Default)]
pub struct FakeEngine {
    pub loads: Vec<(Url, VisitOptions)>,
    pub stopped: Vec<NavigationHandle>,
    pub receiver: Option<VisitId>,
    next_handle: u64,
}

impl FakeEngine {
    /// Locations loaded so far, oldest first.
    pub fn loaded_paths(&self) -> Vec<&str> {
        self.loads.iter().map(|(location, _)| location.path()).collect()
    }
}

impl WebEngine for FakeEngine {
    fn load(&mut self, location: &Url, options: &VisitOptions) -> NavigationHandle {
        self.loads.push((location.clone(), options.clone()));
        self.next_handle += 1;
        NavigationHandle::new(self.next_handle)
    }

    fn stop_loading(&mut self, navigation: NavigationHandle) {
        self.stopped.push(navigation);
    }

    fn set_navigation_receiver(&mut self, visit: Option<VisitId>) {
        self.receiver = visit;
    }
}

/// How the recording delegate answers proposals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Accept,
    Custom(String),
    Reject,
}

/// A failure reported to the delegate.
#[derive(Debug, Clone)]
pub struct Failure {
    pub location: Url,
    pub error: VisitError,
    pub retry: Option<RetryHandle>,
}

/// Delegate that records every event it receives.
#[derive(Debug)]
pub struct RecordingDelegate {
    pub answer: Answer,
    pub disposition: AuthChallengeDisposition,
    pub proposals: Vec<VisitProposal>,
    pub events: Vec<String>,
    pub completed: Vec<Url>,
    pub failures: Vec<Failure>,
    pub opened: Vec<(Url, ExternalTarget)>,
}

impl Default for RecordingDelegate {
    fn default() -> Self {
        Self {
            answer: Answer::Accept,
            disposition: AuthChallengeDisposition::PerformDefaultHandling,
            proposals: Vec::new(),
            events: Vec::new(),
            completed: Vec::new(),
            failures: Vec::new(),
            opened: Vec::new(),
        }
    }
}

impl RecordingDelegate {
    pub fn answering(answer: Answer) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl NavigatorDelegate for RecordingDelegate {
    type Destination = String;

    fn handle_proposal(&mut self, proposal: &VisitProposal) -> ProposalResult<String> {
        self.proposals.push(proposal.clone());
        match &self.answer {
            Answer::Accept => ProposalResult::Accept,
            Answer::Custom(destination) => ProposalResult::AcceptCustom(destination.clone()),
            Answer::Reject => ProposalResult::Reject,
        }
    }

    fn visit_did_start(&mut self, _visit: &Visit) {
        self.events.push("visit_did_start".into());
    }

    fn visit_did_complete(&mut self, _visit: &Visit, final_location: &Url) {
        self.events.push("visit_did_complete".into());
        self.completed.push(final_location.clone());
    }

    fn visit_did_fail_request(&mut self, location: &Url, error: &VisitError, retry: Option<RetryHandle>) {
        self.events.push("visit_did_fail_request".into());
        self.failures.push(Failure {
            location: location.clone(),
            error: error.clone(),
            retry,
        });
    }

    fn did_receive_authentication_challenge(
        &mut self,
        _challenge: &AuthenticationChallenge,
    ) -> AuthChallengeDisposition {
        self.events.push("challenge".into());
        self.disposition.clone()
    }

    fn form_submission_did_start(&mut self, _location: &Url) {
        self.events.push("form_submission_did_start".into());
    }

    fn form_submission_did_finish(&mut self, _location: &Url) {
        self.events.push("form_submission_did_finish".into());
    }

    fn request_did_finish(&mut self, _location: &Url) {
        self.events.push("request_did_finish".into());
    }

    fn open_external(&mut self, location: &Url, target: ExternalTarget) {
        self.opened.push((location.clone(), target));
    }
}

pub type TestNavigator = Navigator<RecordingDelegate, FakeEngine>;

/// Navigator with the built-in handlers and server routes only.
pub fn navigator() -> TestNavigator {
    init_logging();
    Navigator::new(configuration(), RecordingDelegate::default(), FakeEngine::default())
}

/// Navigator whose path configuration is parsed from `json`.
pub fn navigator_with_paths(json: &str) -> TestNavigator {
    navigator().with_path_configuration(PathConfiguration::from_json_str(json).unwrap())
}

/// Engine handle of the active visit.
pub fn active_navigation(navigator: &TestNavigator) -> NavigationHandle {
    navigator
        .active_visit()
        .and_then(Visit::navigation)
        .expect("an active, started visit")
}
