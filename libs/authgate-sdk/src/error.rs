//! Error types for the pluggable authorization collaborators.

use thiserror::Error;

/// Errors a [`ClaimMapper`](crate::ClaimMapper) can return.
///
/// The interceptor treats every variant the same way: it logs the full error
/// locally and rejects the call with the generic unauthorized status, so none
/// of this detail ever reaches the caller. The variants exist for logs and for
/// mapper-side tests.
#[derive(Debug, Error)]
pub enum ClaimMapperError {
    /// The presented evidence could not be parsed (bad token format,
    /// undecodable payload).
    #[error("malformed auth evidence: {0}")]
    Malformed(String),

    /// The presented evidence was well-formed but no longer valid.
    #[error("expired auth evidence: {0}")]
    Expired(String),

    /// The presented evidence does not map to a known identity.
    #[error("untrusted auth evidence: {0}")]
    Untrusted(String),

    /// The mapper itself failed (backing store unreachable, bad state).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors an [`Authorizer`](crate::Authorizer) can return.
///
/// An error is an evaluation *fault*, distinct from a deny decision: a deny is
/// a successful evaluation with a negative outcome and is expressed through
/// [`AuthorizationResult`](crate::AuthorizationResult), never as an error.
#[derive(Debug, Error)]
pub enum AuthorizerError {
    /// Policy evaluation could not complete (e.g. a remote policy service
    /// failed mid-decision).
    #[error("policy evaluation failed: {0}")]
    Evaluation(String),

    /// The authorizer itself failed before evaluation started.
    #[error("internal error: {0}")]
    Internal(String),
}
