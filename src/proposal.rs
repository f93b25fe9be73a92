//! Visit proposals and the delegate's answer to them.
//!
//! The navigator classifies a location with the path configuration and
//! wraps the result in a [`VisitProposal`]. The delegate answers with a
//! [`ProposalResult`]; `D` is the delegate's own destination type, the opaque
//! UI handle it may supply instead of the default screen.

use crate::path_rule::{Context, PathProperties, Presentation};
use crate::visit::VisitOptions;
use url::Url;

/// A candidate navigation awaiting delegate approval.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitProposal {
    url: Url,
    options: VisitOptions,
    properties: PathProperties,
}

impl VisitProposal {
    /// Create a proposal.
    pub fn new(url: Url, options: VisitOptions, properties: PathProperties) -> Self {
        Self {
            url,
            options,
            properties,
        }
    }

    /// Target location.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Visit options the visit will be started with.
    pub fn options(&self) -> &VisitOptions {
        &self.options
    }

    /// Classification properties from the path configuration.
    pub fn properties(&self) -> &PathProperties {
        &self.properties
    }

    /// Requested presentation.
    pub fn presentation(&self) -> Presentation {
        self.properties.presentation()
    }

    /// Requested context.
    pub fn context(&self) -> Context {
        self.properties.context()
    }

    /// Check if this is a server-driven recede/resume/refresh signal.
    pub fn is_historical_location(&self) -> bool {
        self.properties.is_historical_location()
    }
}

/// The delegate's answer to a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalResult<D> {
    /// Show the default destination for the proposal.
    Accept,
    /// Show the supplied destination instead of the default one.
    AcceptCustom(D),
    /// Do nothing.
    Reject,
}

impl<D> ProposalResult<D> {
    /// Check if the proposal was accepted in either form.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Reject)
    }
}
