#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Request-boundary authorization for `tonic` unary services.
//!
//! One [`AuthorizationInterceptor`] guards a whole server:
//!
//! - collects identity evidence (credential metadata, mutual-TLS peer state),
//! - maps evidence to [`Claims`](authgate_sdk::Claims) through the configured
//!   [`ClaimMapper`](authgate_sdk::ClaimMapper),
//! - evaluates the configured [`Authorizer`](authgate_sdk::Authorizer)
//!   against the call target,
//! - forwards admitted calls with claims attached to the request extensions,
//!   and rejects everything else with a fixed `PermissionDenied` status.
//!
//! Service methods wrap their handler:
//!
//! ```ignore
//! use authgate_grpc::AuthorizationInterceptor;
//!
//! async fn submit_job(
//!     auth: &AuthorizationInterceptor,
//!     request: Request<SubmitJob>,
//! ) -> Result<Response<SubmitJobAck>, Status> {
//!     auth.intercept("SubmitJob", request, |request| async move {
//!         // claims available via authgate_grpc::mapped_claims(&request)
//!         Ok(Response::new(SubmitJobAck::default()))
//!     })
//!     .await
//! }
//! ```
//!
//! With neither a claim mapper nor an authorizer configured the interceptor
//! forwards every call untouched.

pub mod authorizer;
pub mod config;
pub mod context;
pub mod interceptor;
pub mod mapper;
pub mod peer;

// Re-export main types at crate root
pub use authorizer::{NoopAuthorizer, RoleAuthorizer};
pub use config::{
    AuthorizationConfig, AuthorizerConfig, ClaimMapperConfig, interceptor_from_config,
};
pub use context::{AuthHeaderValue, MappedClaims, auth_header, mapped_claims};
pub use interceptor::{
    AuthorizationInterceptor, AuthorizationInterceptorBuilder, DEFAULT_AUTH_EXTRA_HEADER_NAME,
    DEFAULT_AUTH_HEADER_NAME, REQUEST_UNAUTHORIZED,
};
pub use mapper::{NoopClaimMapper, StaticTokenClaimMapper};
