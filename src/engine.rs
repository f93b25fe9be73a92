//! The seam to the embedded web engine.
//!
//! The rendering surface is an external collaborator. The crate only needs
//! three things from it, expressed by [`WebEngine`]: start a load, stop a
//! load, and route its navigation callbacks to one visit at a time. The host
//! feeds the engine's callbacks back through the
//! [`Navigator`](crate::Navigator)'s `engine_did_*` methods, tagged with the
//! [`NavigationHandle`] the engine returned from [`WebEngine::load`].
//!
//! Low-level navigation actions (link taps, reloads, new-window requests)
//! are described by [`NavigationAction`] and resolved by the
//! [`PolicyManager`](crate::PolicyManager).

use crate::visit::{VisitId, VisitOptions};
use url::Url;

/// Opaque token for one in-flight engine load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigationHandle(u64);

impl NavigationHandle {
    /// Wrap an engine-assigned identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The engine-assigned identifier.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// The embedded rendering engine.
pub trait WebEngine {
    /// Begin loading `location`, returning a handle for its callbacks.
    fn load(&mut self, location: &Url, options: &VisitOptions) -> NavigationHandle;

    /// Stop the load identified by `navigation`.
    fn stop_loading(&mut self, navigation: NavigationHandle);

    /// Make `visit` the exclusive receiver of navigation callbacks, or detach
    /// the current receiver with `None`.
    fn set_navigation_receiver(&mut self, visit: Option<VisitId>);
}

/// What triggered an engine-level navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationType {
    /// The user activated a link.
    LinkActivated,
    /// A form was submitted.
    FormSubmitted,
    /// Back/forward list traversal.
    BackForward,
    /// The page was reloaded.
    Reload,
    /// A form was resubmitted.
    FormResubmitted,
    /// Anything else (script-initiated, initial load).
    Other,
}

/// Which frame a navigation action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationTarget {
    /// The top-level document.
    MainFrame,
    /// An iframe.
    Subframe,
    /// No frame: the page asked for a new window (`target="_blank"`).
    NewWindow,
}

/// An engine-level request to navigate, awaiting a policy decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationAction {
    /// Requested location.
    pub url: Url,
    /// What triggered the request.
    pub navigation_type: NavigationType,
    /// Which frame it targets.
    pub target: NavigationTarget,
}

impl NavigationAction {
    /// Create a navigation action.
    pub fn new(url: Url, navigation_type: NavigationType, target: NavigationTarget) -> Self {
        Self {
            url,
            navigation_type,
            target,
        }
    }

    /// A main-frame link activation.
    pub fn link_activated(url: Url) -> Self {
        Self::new(url, NavigationType::LinkActivated, NavigationTarget::MainFrame)
    }

    /// Check if the action targets the main frame.
    pub fn is_main_frame(&self) -> bool {
        self.target == NavigationTarget::MainFrame
    }
}

/// A server's request for credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationChallenge {
    /// Host asking for credentials.
    pub host: String,
    /// Authentication scheme (`Basic`, `Digest`, ...).
    pub scheme: String,
    /// Realm, if the server sent one.
    pub realm: Option<String>,
}

/// Username/password answer to a challenge.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Username.
    pub user: String,
    /// Password.
    pub password: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// How the engine should answer an authentication challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthChallengeDisposition {
    /// Answer with the given credential.
    UseCredential(Credential),
    /// Let the engine do whatever it would do without a handler.
    PerformDefaultHandling,
    /// Cancel the request.
    CancelAuthenticationChallenge,
    /// Reject this protection space and try the next one.
    RejectProtectionSpace,
}
