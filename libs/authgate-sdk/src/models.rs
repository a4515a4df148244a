//! Evidence, call-target, and decision models.

use std::any::Any;
use std::fmt;

use rustls_pki_types::CertificateDer;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Evidence bundle handed to a [`ClaimMapper`](crate::ClaimMapper).
///
/// Built fresh per call from the call's metadata and negotiated peer state,
/// immutable once constructed. Credential-bearing fields are wrapped in
/// `SecretString` so `Debug` redacts them automatically.
#[derive(Debug, Clone)]
pub struct AuthInfo {
    /// Primary metadata value (typically a bearer credential). May wrap the
    /// empty string when the header was absent.
    pub auth_token: SecretString,
    /// Secondary metadata value. May wrap the empty string.
    pub extra_data: SecretString,
    /// Subject of the verified client leaf certificate, when the peer
    /// presented one.
    pub tls_subject: Option<TlsSubject>,
    /// Full negotiated peer descriptor, when the transport was mutual TLS.
    pub tls_connection: Option<TlsConnection>,
    /// Resolved audience for the call. Empty when no resolver is configured
    /// or resolution was not possible.
    pub audience: String,
}

/// Parsed distinguished name of a client certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsSubject {
    /// First CN attribute of the subject, if any.
    pub common_name: Option<String>,
    /// All O attributes of the subject.
    #[serde(default)]
    pub organizations: Vec<String>,
    /// All OU attributes of the subject.
    #[serde(default)]
    pub organizational_units: Vec<String>,
    /// The full subject rendered as a DN string (e.g. `CN=svc, O=acme`).
    pub distinguished_name: String,
}

/// Negotiated TLS peer state as seen by the host's acceptor.
///
/// Hosts build this from their TLS session (each chain leaf-first, as the
/// verifier produced it) and attach it to the incoming request before the
/// interceptor runs. Absence means the transport was not mutual TLS, which
/// is a normal state, not an error.
#[derive(Debug, Clone, Default)]
pub struct TlsConnection {
    /// Verified certificate chains, each ordered leaf-first.
    pub verified_chains: Vec<Vec<CertificateDer<'static>>>,
}

impl TlsConnection {
    /// Wrap a set of verified chains.
    #[must_use]
    pub fn new(verified_chains: Vec<Vec<CertificateDer<'static>>>) -> Self {
        Self { verified_chains }
    }

    /// The client (leaf) certificate.
    ///
    /// Only the first verified chain and its first entry are consulted;
    /// multiple simultaneous chains are not disambiguated, the first is
    /// authoritative. An empty chain list or empty first chain yields `None`
    /// ("no client certificate").
    #[must_use]
    pub fn peer_leaf_certificate(&self) -> Option<&CertificateDer<'static>> {
        self.verified_chains.first().and_then(|chain| chain.first())
    }
}

/// The authorization question: who is calling what.
///
/// Built once per call, immutable. The payload is passed through for policy
/// inspection only (authorizers may downcast it to a concrete request type)
/// and is never mutated.
pub struct CallTarget<'a> {
    /// Tenant/scope identifier. Empty for namespace-agnostic calls.
    pub namespace: &'a str,
    /// Fully-qualified method identifier (e.g.
    /// `/workflow.v1.WorkflowService/StartRun`).
    pub api_name: &'a str,
    /// The original, untyped call payload.
    pub request: &'a (dyn Any + Send + Sync),
}

impl fmt::Debug for CallTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallTarget")
            .field("namespace", &self.namespace)
            .field("api_name", &self.api_name)
            .finish_non_exhaustive()
    }
}

/// Outcome of a policy evaluation.
///
/// `Deny` is the default so a default-constructed result can never grant
/// access by omission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Access refused.
    #[default]
    Deny,
    /// Access granted.
    Allow,
}

/// Result of [`Authorizer::authorize`](crate::Authorizer::authorize).
///
/// An `Ok` return from the authorizer does **not** imply allow; callers must
/// check [`decision`](Self::decision) explicitly. The reason, when present on
/// a deny, is surfaced to the caller verbatim: authorizers opt into that
/// disclosure deliberately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResult {
    /// The allow/deny outcome.
    #[serde(default)]
    pub decision: Decision,
    /// Optional human-readable explanation, only ever surfaced on deny.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuthorizationResult {
    /// A granting result.
    #[must_use]
    pub fn allow() -> Self {
        Self {
            decision: Decision::Allow,
            reason: None,
        }
    }

    /// A refusing result with no disclosed reason.
    #[must_use]
    pub fn deny() -> Self {
        Self {
            decision: Decision::Deny,
            reason: None,
        }
    }

    /// A refusing result whose reason will be disclosed to the caller.
    #[must_use]
    pub fn deny_with_reason(reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::Deny,
            reason: Some(reason.into()),
        }
    }

    /// Whether the decision is [`Decision::Allow`].
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.decision == Decision::Allow
    }
}
