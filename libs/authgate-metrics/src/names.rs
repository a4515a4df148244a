//! Metric and tag names emitted by the authorization layer.

/// Operation tag value for every metric this layer records.
pub const OPERATION_AUTHORIZATION: &str = "Authorization";

/// Namespace tag value used when the call target exposes no namespace.
pub const NAMESPACE_UNKNOWN: &str = "_unknown_";

/// Timer: wall-clock duration of a single authorizer evaluation, recorded on
/// every evaluation regardless of outcome.
pub const AUTHORIZATION_LATENCY: &str = "service_authorization_latency";

/// Counter: calls refused because the authorizer decided deny.
pub const ERRORS_UNAUTHORIZED: &str = "service_errors_unauthorized";

/// Counter: calls refused because the authorizer itself failed.
pub const ERRORS_AUTHORIZE_FAILED: &str = "service_errors_authorize_failed";

/// Counter: calls refused because claim mapping failed.
pub const ERRORS_CLAIM_MAPPING_FAILED: &str = "service_errors_claim_mapping_failed";

/// Counter: calls that carried no authentication evidence at all, so claim
/// mapping was skipped. Not a failure; tracked so operators can tell silent
/// anonymous traffic apart from rejected traffic.
pub const REQUESTS_NO_AUTH_EVIDENCE: &str = "service_requests_no_auth_evidence";
