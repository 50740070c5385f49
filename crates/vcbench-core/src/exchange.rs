//! Credential exchange handle and state.

use serde::{Deserialize, Serialize};

/// Opaque identifier of one credential exchange on the agent
/// (`credential_exchange_id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeHandle(String);

impl ExchangeHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExchangeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// State of a credential exchange as reported by the agent.
///
/// Unknown states are kept verbatim in [`ExchangeState::Other`] and treated
/// as not yet terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExchangeState {
    ProposalSent,
    ProposalReceived,
    OfferSent,
    OfferReceived,
    RequestSent,
    RequestReceived,
    CredentialIssued,
    CredentialReceived,
    /// The holder confirmed receipt and storage of the credential.
    CredentialAcked,
    Other(String),
}

impl ExchangeState {
    /// Returns `true` for the terminal acknowledged state.
    pub fn is_acknowledged(&self) -> bool {
        matches!(self, Self::CredentialAcked)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ProposalSent => "proposal_sent",
            Self::ProposalReceived => "proposal_received",
            Self::OfferSent => "offer_sent",
            Self::OfferReceived => "offer_received",
            Self::RequestSent => "request_sent",
            Self::RequestReceived => "request_received",
            Self::CredentialIssued => "credential_issued",
            Self::CredentialReceived => "credential_received",
            Self::CredentialAcked => "credential_acked",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ExchangeState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "proposal_sent" => Self::ProposalSent,
            "proposal_received" => Self::ProposalReceived,
            "offer_sent" => Self::OfferSent,
            "offer_received" => Self::OfferReceived,
            "request_sent" => Self::RequestSent,
            "request_received" => Self::RequestReceived,
            "credential_issued" => Self::CredentialIssued,
            "credential_received" => Self::CredentialReceived,
            "credential_acked" => Self::CredentialAcked,
            _ => Self::Other(s),
        }
    }
}

impl From<ExchangeState> for String {
    fn from(state: ExchangeState) -> Self {
        match state {
            ExchangeState::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
