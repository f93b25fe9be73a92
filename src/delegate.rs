//! The host application's side of the navigator.
//!
//! [`NavigatorDelegate`] has no default method bodies: every implementor
//! states what it does for each event. [`DefaultNavigatorDelegate`] supplies
//! the stock behavior, so an implementor can embed one and forward the
//! methods it does not care about:
//!
//! ```
//! use hybrid_navigator::{
//!     AuthChallengeDisposition, AuthenticationChallenge, DefaultNavigatorDelegate, ExternalTarget,
//!     NavigatorDelegate, ProposalResult, RetryHandle, Visit, VisitError, VisitProposal,
//! };
//! use url::Url;
//!
//! #[derive(Default)]
//! struct App {
//!     base: DefaultNavigatorDelegate,
//!     numbers: Vec<String>,
//! }
//!
//! impl NavigatorDelegate for App {
//!     type Destination = ();
//!
//!     fn handle_proposal(&mut self, proposal: &VisitProposal) -> ProposalResult<()> {
//!         self.base.handle_proposal(proposal)
//!     }
//!     fn visit_did_start(&mut self, visit: &Visit) {
//!         self.base.visit_did_start(visit)
//!     }
//!     fn visit_did_complete(&mut self, visit: &Visit, final_location: &Url) {
//!         self.base.visit_did_complete(visit, final_location)
//!     }
//!     fn visit_did_fail_request(&mut self, location: &Url, error: &VisitError, retry: Option<RetryHandle>) {
//!         self.base.visit_did_fail_request(location, error, retry)
//!     }
//!     fn did_receive_authentication_challenge(
//!         &mut self,
//!         challenge: &AuthenticationChallenge,
//!     ) -> AuthChallengeDisposition {
//!         self.base.did_receive_authentication_challenge(challenge)
//!     }
//!     fn form_submission_did_start(&mut self, location: &Url) {
//!         self.base.form_submission_did_start(location)
//!     }
//!     fn form_submission_did_finish(&mut self, location: &Url) {
//!         self.base.form_submission_did_finish(location)
//!     }
//!     fn request_did_finish(&mut self, location: &Url) {
//!         self.base.request_did_finish(location)
//!     }
//!     fn open_external(&mut self, location: &Url, target: ExternalTarget) {
//!         if location.scheme() == "tel" {
//!             self.numbers.push(location.path().to_string());
//!         } else {
//!             self.base.open_external(location, target)
//!         }
//!     }
//! }
//! ```

use crate::engine::{AuthChallengeDisposition, AuthenticationChallenge};
use crate::error::VisitError;
use crate::proposal::{ProposalResult, VisitProposal};
use crate::visit::{RetryHandle, Visit};
use crate::{debug_log, info_log};
use url::Url;

/// Where a location handed off by a decision handler should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalTarget {
    /// An in-app browser sheet.
    InAppBrowser,
    /// The operating system's handler for the scheme.
    System,
}

/// Receives the navigator's outbound events.
pub trait NavigatorDelegate {
    /// Opaque UI handle the delegate may supply for a proposal.
    type Destination;

    /// Decide what to do with a proposal.
    fn handle_proposal(&mut self, proposal: &VisitProposal) -> ProposalResult<Self::Destination>;

    /// A visit started loading.
    fn visit_did_start(&mut self, visit: &Visit);

    /// A visit finished loading at `final_location`.
    fn visit_did_complete(&mut self, visit: &Visit, final_location: &Url);

    /// A visit failed. `retry` is present when the failure can be retried.
    fn visit_did_fail_request(&mut self, location: &Url, error: &VisitError, retry: Option<RetryHandle>);

    /// The server asked for credentials.
    fn did_receive_authentication_challenge(
        &mut self,
        challenge: &AuthenticationChallenge,
    ) -> AuthChallengeDisposition;

    /// A form submission started.
    fn form_submission_did_start(&mut self, location: &Url);

    /// A form submission finished.
    fn form_submission_did_finish(&mut self, location: &Url);

    /// A page request (fetch, not a visit) finished.
    fn request_did_finish(&mut self, location: &Url);

    /// Open a location outside the navigator.
    fn open_external(&mut self, location: &Url, target: ExternalTarget);
}

/// Error screen content for a failed visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPresentation {
    /// Human-readable description of the failure.
    pub message: String,
    /// Retry affordance, if the failure can be retried.
    pub retry: Option<RetryHandle>,
}

/// Stock delegate behavior.
///
/// Accepts every proposal with the default destination, presents failures as
/// an [`ErrorPresentation`], performs default handling for authentication
/// challenges and records locations it was asked to open externally.
#[derive(Debug, Clone, Default)]
pub struct DefaultNavigatorDelegate {
    error: Option<ErrorPresentation>,
    opened: Vec<(Url, ExternalTarget)>,
}

impl DefaultNavigatorDelegate {
    /// Create the default delegate.
    pub fn new() -> Self {
        Self::default()
    }

    /// The error currently presented, if any.
    pub fn error(&self) -> Option<&ErrorPresentation> {
        self.error.as_ref()
    }

    /// Take the presented error, clearing it.
    pub fn take_error(&mut self) -> Option<ErrorPresentation> {
        self.error.take()
    }

    /// Locations handed off for external opening, oldest first.
    pub fn opened(&self) -> &[(Url, ExternalTarget)] {
        &self.opened
    }
}

impl NavigatorDelegate for DefaultNavigatorDelegate {
    type Destination = ();

    fn handle_proposal(&mut self, _proposal: &VisitProposal) -> ProposalResult<()> {
        ProposalResult::Accept
    }

    fn visit_did_start(&mut self, _visit: &Visit) {
        self.error = None;
    }

    fn visit_did_complete(&mut self, _visit: &Visit, _final_location: &Url) {}

    fn visit_did_fail_request(&mut self, location: &Url, error: &VisitError, retry: Option<RetryHandle>) {
        debug_log!("Presenting error for '{}': {}", location, error);
        self.error = Some(ErrorPresentation {
            message: error.to_string(),
            retry,
        });
    }

    fn did_receive_authentication_challenge(
        &mut self,
        _challenge: &AuthenticationChallenge,
    ) -> AuthChallengeDisposition {
        AuthChallengeDisposition::PerformDefaultHandling
    }

    fn form_submission_did_start(&mut self, _location: &Url) {}

    fn form_submission_did_finish(&mut self, _location: &Url) {}

    fn request_did_finish(&mut self, _location: &Url) {}

    fn open_external(&mut self, location: &Url, target: ExternalTarget) {
        info_log!("Opening '{}' externally ({:?})", location, target);
        self.opened.push((location.clone(), target));
    }
}
