//! Collaborator contracts consumed by the authorization interceptor.

use std::any::Any;

use async_trait::async_trait;

use crate::claims::Claims;
use crate::error::{AuthorizerError, ClaimMapperError};
use crate::models::{AuthInfo, AuthorizationResult, CallTarget};

/// Converts raw call evidence into normalized [`Claims`].
///
/// Implementations must be deterministic for identical evidence: the
/// interceptor assumes repeated identical calls map to identical claims. A
/// mapper may perform I/O (key lookups, remote validation); the call is
/// awaited inline and the caller's deadline propagates by future drop.
#[async_trait]
pub trait ClaimMapper: Send + Sync {
    /// Map an evidence bundle to claims.
    ///
    /// # Errors
    ///
    /// Any [`ClaimMapperError`] rejects the call with the generic
    /// unauthorized status; the error itself is only logged locally.
    async fn get_claims(&self, auth_info: &AuthInfo) -> Result<Claims, ClaimMapperError>;

    /// Whether authentication evidence must be present for mapping to run.
    ///
    /// The default (`true`) means the interceptor skips mapping entirely when
    /// the call carried no certificate subject and no primary header value.
    /// Mappers that issue anonymous claims override this to `false` and are
    /// then invoked with an empty evidence bundle.
    fn auth_info_required(&self) -> bool {
        true
    }
}

/// Derives the audience string for a call, for credential formats that bind
/// tokens to an intended recipient.
///
/// Consulted at most once per call, only to populate
/// [`AuthInfo::audience`](crate::AuthInfo) before mapping. Failures are not
/// modeled: when resolution is impossible, return the empty string.
#[async_trait]
pub trait AudienceResolver: Send + Sync {
    /// Resolve the audience for this request/method pair.
    async fn audience(&self, request: &(dyn Any + Send + Sync), api_name: &str) -> String;
}

/// Evaluates an authorization policy against claims and a call target.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Decide whether the call may proceed.
    ///
    /// `claims` is `None` when no evidence-mapping ran for this call (no
    /// claim mapper configured, or no evidence and the mapper requires it).
    /// Implementations must not mutate the target payload.
    ///
    /// # Errors
    ///
    /// An error is an evaluation fault, not a deny: a deny is an `Ok` result
    /// whose decision is [`Decision::Deny`](crate::Decision). Faults reject
    /// the call with the generic unauthorized status and are only logged.
    async fn authorize(
        &self,
        claims: Option<&Claims>,
        target: &CallTarget<'_>,
    ) -> Result<AuthorizationResult, AuthorizerError>;
}

/// Capability probe for request payloads that carry a namespace.
///
/// Payload types expose their namespace by overriding
/// [`namespace`](Self::namespace); the default (`None`) models a payload with
/// no namespace, so plumbing a new request type through is a one-line impl.
pub trait NamespacedRequest {
    /// The namespace this request operates on, if the payload carries one.
    fn namespace(&self) -> Option<&str> {
        None
    }
}

/// Unit payloads carry no namespace.
impl NamespacedRequest for () {}
