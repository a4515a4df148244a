#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `AuthGate` SDK
//!
//! Contracts and models for the request-boundary authorization layer:
//!
//! - [`ClaimMapper`] - maps raw call evidence to normalized claims
//! - [`AudienceResolver`] - derives the audience string for a call
//! - [`Authorizer`] - evaluates policy against claims and a call target
//! - [`NamespacedRequest`] - namespace capability probe on request payloads
//! - [`AuthInfo`] / [`TlsSubject`] / [`TlsConnection`] - evidence models
//! - [`Claims`] / [`Role`] - normalized caller identity
//! - [`CallTarget`] / [`Decision`] / [`AuthorizationResult`] - the
//!   authorization question and its outcome
//! - [`ClaimMapperError`] / [`AuthorizerError`] - collaborator error types
//!
//! ## Usage
//!
//! Implementations live outside this crate; the interceptor in
//! `authgate-grpc` consumes them through these traits:
//!
//! ```ignore
//! struct HeaderMapper;
//!
//! #[async_trait]
//! impl ClaimMapper for HeaderMapper {
//!     async fn get_claims(&self, auth_info: &AuthInfo) -> Result<Claims, ClaimMapperError> {
//!         // inspect auth_info.auth_token / auth_info.tls_subject ...
//!     }
//! }
//! ```

pub mod api;
pub mod claims;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::{AudienceResolver, Authorizer, ClaimMapper, NamespacedRequest};
pub use claims::{Claims, Role};
pub use error::{AuthorizerError, ClaimMapperError};
pub use models::{
    AuthInfo, AuthorizationResult, CallTarget, Decision, TlsConnection, TlsSubject,
};
