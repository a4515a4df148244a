//! The unary-call authorization interceptor.
//!
//! One [`AuthorizationInterceptor`] sits in front of every unary call:
//! it collects identity evidence from metadata and TLS peer state, maps the
//! evidence to [`Claims`], asks the [`Authorizer`] for a decision, and either
//! forwards the call or rejects it with a fixed `PermissionDenied` status
//! that leaks nothing about the internal failure.

use std::any::Any;
use std::future::Future;
use std::sync::{Arc, LazyLock};
use std::time::Instant;

use bytes::Bytes;
use secrecy::SecretString;
use tonic::metadata::MetadataMap;
use tonic::{Code, Request, Status};

use authgate_metrics::names;
use authgate_metrics::{MetricsRecorder, MetricsScope, NoopRecorder};
use authgate_sdk::{
    AudienceResolver, AuthInfo, AuthorizationResult, Authorizer, AuthorizerError, CallTarget,
    ClaimMapper, Claims, NamespacedRequest, TlsConnection,
};

use crate::context::{AuthHeaderValue, MappedClaims};
use crate::peer;

/// Message of every rejection this layer produces.
pub const REQUEST_UNAUTHORIZED: &str = "Request unauthorized.";

/// Default metadata key for the primary credential.
pub const DEFAULT_AUTH_HEADER_NAME: &str = "authorization";

/// Default metadata key for supplementary credential data.
pub const DEFAULT_AUTH_EXTRA_HEADER_NAME: &str = "authorization-extras";

static UNAUTHORIZED: LazyLock<Status> =
    LazyLock::new(|| Status::permission_denied(REQUEST_UNAUTHORIZED));

/// The generic rejection. Same status for every internal failure mode.
fn unauthorized_status() -> Status {
    UNAUTHORIZED.clone()
}

/// Rejection for a deny whose policy chose to disclose its reason. The
/// message stays generic; the reason travels in the status details.
fn unauthorized_status_with_reason(reason: String) -> Status {
    Status::with_details(Code::PermissionDenied, REQUEST_UNAUTHORIZED, Bytes::from(reason))
}

/// First value of a metadata key, skipping values that are not valid ASCII.
fn first_metadata_value(metadata: &MetadataMap, name: &str) -> Option<String> {
    metadata
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
}

/// Evaluate policy, recording the latency timer on success and failure alike.
async fn authorize_timed(
    authorizer: &dyn Authorizer,
    claims: Option<&Claims>,
    target: &CallTarget<'_>,
    scope: &dyn MetricsScope,
) -> Result<AuthorizationResult, AuthorizerError> {
    let start = Instant::now();
    let result = authorizer.authorize(claims, target).await;
    scope.record_timer(names::AUTHORIZATION_LATENCY, start.elapsed());
    result
}

/// Request-boundary authorization for unary calls.
///
/// Build one per server with [`AuthorizationInterceptor::builder`] (or
/// [`interceptor_from_config`](crate::config::interceptor_from_config)),
/// share it behind an [`Arc`], and run every unary call through
/// [`intercept`](Self::intercept). With no claim mapper and no authorizer
/// configured the interceptor forwards everything untouched.
pub struct AuthorizationInterceptor {
    claim_mapper: Option<Arc<dyn ClaimMapper>>,
    authorizer: Option<Arc<dyn Authorizer>>,
    audience_resolver: Option<Arc<dyn AudienceResolver>>,
    metrics: Arc<dyn MetricsRecorder>,
    auth_header_name: String,
    auth_extra_header_name: String,
}

impl AuthorizationInterceptor {
    /// Start a builder with no collaborators and default header names.
    #[must_use]
    pub fn builder() -> AuthorizationInterceptorBuilder {
        AuthorizationInterceptorBuilder::default()
    }

    /// Run the authorization pipeline for one unary call, forwarding to
    /// `handler` when the call is admitted.
    ///
    /// `api_name` identifies the invoked method for policy and audience
    /// resolution; hosts typically pass the full method path. The payload
    /// type advertises its namespace through [`NamespacedRequest`]; payloads
    /// without one are treated as system-level calls.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` with the fixed [`REQUEST_UNAUTHORIZED`] message
    /// when claim mapping fails, the authorizer faults, or the decision is a
    /// deny. A deny may carry a policy-supplied reason in the status
    /// details. Errors from the forwarded handler pass through unchanged.
    pub async fn intercept<Req, Res, H, Fut>(
        &self,
        api_name: &str,
        mut request: Request<Req>,
        handler: H,
    ) -> Result<Res, Status>
    where
        Req: NamespacedRequest + Any + Send + Sync,
        H: FnOnce(Request<Req>) -> Fut + Send,
        Fut: Future<Output = Result<Res, Status>> + Send,
    {
        let claims = match (&self.claim_mapper, &self.authorizer) {
            (Some(mapper), Some(_)) => {
                self.map_claims(api_name, mapper.as_ref(), &mut request).await?
            }
            _ => None,
        };

        if let Some(authorizer) = &self.authorizer {
            self.enforce(authorizer.as_ref(), claims.as_deref(), api_name, request.get_ref())
                .await?;
        }

        handler(request).await
    }

    /// Evidence collection and claim mapping. `Ok(None)` means mapping was
    /// skipped because no evidence arrived and the mapper insists on some.
    async fn map_claims<Req>(
        &self,
        api_name: &str,
        mapper: &dyn ClaimMapper,
        request: &mut Request<Req>,
    ) -> Result<Option<Arc<Claims>>, Status>
    where
        Req: NamespacedRequest + Any + Send + Sync,
    {
        let auth_header = first_metadata_value(request.metadata(), &self.auth_header_name);
        let extra_header = first_metadata_value(request.metadata(), &self.auth_extra_header_name);
        let tls_connection = peer::tls_connection(request);
        let tls_subject = tls_connection
            .as_ref()
            .and_then(TlsConnection::peer_leaf_certificate)
            .and_then(peer::peer_subject);

        if tls_subject.is_none() && auth_header.is_none() && mapper.auth_info_required() {
            self.metrics_scope(request.get_ref().namespace())
                .increment_counter(names::REQUESTS_NO_AUTH_EVIDENCE);
            return Ok(None);
        }

        let audience = match &self.audience_resolver {
            Some(resolver) => resolver.audience(request.get_ref(), api_name).await,
            None => String::new(),
        };

        let auth_header = auth_header.unwrap_or_default();
        let auth_info = AuthInfo {
            auth_token: SecretString::from(auth_header.clone()),
            extra_data: SecretString::from(extra_header.unwrap_or_default()),
            tls_subject,
            tls_connection,
            audience,
        };

        match mapper.get_claims(&auth_info).await {
            Ok(mapped) => {
                let mapped = Arc::new(mapped);
                request
                    .extensions_mut()
                    .insert(MappedClaims::new(Arc::clone(&mapped)));
                if !auth_header.is_empty() {
                    request
                        .extensions_mut()
                        .insert(AuthHeaderValue::new(SecretString::from(auth_header)));
                }
                Ok(Some(mapped))
            }
            Err(err) => {
                tracing::debug!("claim mapping failed: {err}");
                self.metrics_scope(request.get_ref().namespace())
                    .increment_counter(names::ERRORS_CLAIM_MAPPING_FAILED);
                Err(unauthorized_status())
            }
        }
    }

    /// Policy evaluation against the call target.
    async fn enforce<Req>(
        &self,
        authorizer: &dyn Authorizer,
        claims: Option<&Claims>,
        api_name: &str,
        payload: &Req,
    ) -> Result<(), Status>
    where
        Req: NamespacedRequest + Any + Send + Sync,
    {
        let namespace = payload.namespace().unwrap_or_default();
        let target = CallTarget {
            namespace,
            api_name,
            request: payload,
        };
        let scope = self.metrics_scope(payload.namespace());

        match authorize_timed(authorizer, claims, &target, scope.as_ref()).await {
            Ok(result) if result.is_allowed() => Ok(()),
            Ok(result) => {
                scope.increment_counter(names::ERRORS_UNAUTHORIZED);
                match result.reason {
                    Some(reason) => Err(unauthorized_status_with_reason(reason)),
                    None => Err(unauthorized_status()),
                }
            }
            Err(err) => {
                scope.increment_counter(names::ERRORS_AUTHORIZE_FAILED);
                tracing::error!("authorizer failed: {err}");
                Err(unauthorized_status())
            }
        }
    }

    /// Scope tagged with the authorization operation and the call's
    /// namespace, or the unknown-namespace sentinel when the payload does not
    /// expose one.
    fn metrics_scope(&self, namespace: Option<&str>) -> Box<dyn MetricsScope> {
        let tag = match namespace {
            Some(ns) if !ns.is_empty() => ns,
            _ => names::NAMESPACE_UNKNOWN,
        };
        self.metrics.with_tags(names::OPERATION_AUTHORIZATION, tag)
    }
}

/// Builder for [`AuthorizationInterceptor`].
#[derive(Default)]
pub struct AuthorizationInterceptorBuilder {
    claim_mapper: Option<Arc<dyn ClaimMapper>>,
    authorizer: Option<Arc<dyn Authorizer>>,
    audience_resolver: Option<Arc<dyn AudienceResolver>>,
    metrics: Option<Arc<dyn MetricsRecorder>>,
    auth_header_name: String,
    auth_extra_header_name: String,
}

impl AuthorizationInterceptorBuilder {
    /// Install a claim mapper. Mapping only runs when an authorizer is also
    /// installed.
    #[must_use]
    pub fn claim_mapper(mut self, mapper: Arc<dyn ClaimMapper>) -> Self {
        self.claim_mapper = Some(mapper);
        self
    }

    /// Install an authorizer.
    #[must_use]
    pub fn authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    /// Install an audience resolver consulted before claim mapping.
    #[must_use]
    pub fn audience_resolver(mut self, resolver: Arc<dyn AudienceResolver>) -> Self {
        self.audience_resolver = Some(resolver);
        self
    }

    /// Install a metrics recorder. Defaults to discarding measurements.
    #[must_use]
    pub fn metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Metadata key for the primary credential. An empty name falls back to
    /// [`DEFAULT_AUTH_HEADER_NAME`].
    #[must_use]
    pub fn auth_header_name(mut self, name: impl Into<String>) -> Self {
        self.auth_header_name = name.into();
        self
    }

    /// Metadata key for supplementary credential data. An empty name falls
    /// back to [`DEFAULT_AUTH_EXTRA_HEADER_NAME`].
    #[must_use]
    pub fn auth_extra_header_name(mut self, name: impl Into<String>) -> Self {
        self.auth_extra_header_name = name.into();
        self
    }

    /// Finalize the interceptor.
    #[must_use]
    pub fn build(self) -> AuthorizationInterceptor {
        AuthorizationInterceptor {
            claim_mapper: self.claim_mapper,
            authorizer: self.authorizer,
            audience_resolver: self.audience_resolver,
            metrics: self.metrics.unwrap_or_else(|| Arc::new(NoopRecorder)),
            auth_header_name: coalesce(self.auth_header_name, DEFAULT_AUTH_HEADER_NAME),
            auth_extra_header_name: coalesce(
                self.auth_extra_header_name,
                DEFAULT_AUTH_EXTRA_HEADER_NAME,
            ),
        }
    }
}

fn coalesce(value: String, fallback: &str) -> String {
    if value.is_empty() { fallback.to_owned() } else { value }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use authgate_metrics::testing::CapturingRecorder;

    use super::*;

    #[test]
    fn builder_defaults_header_names() {
        let interceptor = AuthorizationInterceptor::builder().build();
        assert_eq!(interceptor.auth_header_name, DEFAULT_AUTH_HEADER_NAME);
        assert_eq!(
            interceptor.auth_extra_header_name,
            DEFAULT_AUTH_EXTRA_HEADER_NAME,
        );
    }

    #[test]
    fn builder_coalesces_empty_header_names() {
        let interceptor = AuthorizationInterceptor::builder()
            .auth_header_name("")
            .auth_extra_header_name("")
            .build();
        assert_eq!(interceptor.auth_header_name, DEFAULT_AUTH_HEADER_NAME);
        assert_eq!(
            interceptor.auth_extra_header_name,
            DEFAULT_AUTH_EXTRA_HEADER_NAME,
        );
    }

    #[test]
    fn builder_keeps_custom_header_names() {
        let interceptor = AuthorizationInterceptor::builder()
            .auth_header_name("x-credential")
            .auth_extra_header_name("x-credential-extras")
            .build();
        assert_eq!(interceptor.auth_header_name, "x-credential");
        assert_eq!(interceptor.auth_extra_header_name, "x-credential-extras");
    }

    #[test]
    fn metrics_scope_substitutes_unknown_namespace() {
        let recorder = CapturingRecorder::new();
        let interceptor = AuthorizationInterceptor::builder()
            .metrics(Arc::new(recorder.clone()))
            .build();

        interceptor.metrics_scope(None).increment_counter(names::ERRORS_UNAUTHORIZED);
        interceptor.metrics_scope(Some("")).increment_counter(names::ERRORS_UNAUTHORIZED);
        interceptor
            .metrics_scope(Some("accounting"))
            .increment_counter(names::ERRORS_UNAUTHORIZED);

        let counters = recorder.counters();
        assert_eq!(counters[0].namespace, names::NAMESPACE_UNKNOWN);
        assert_eq!(counters[1].namespace, names::NAMESPACE_UNKNOWN);
        assert_eq!(counters[2].namespace, "accounting");
        assert!(counters.iter().all(|c| c.operation == names::OPERATION_AUTHORIZATION));
    }

    #[test]
    fn generic_status_shape() {
        let status = unauthorized_status();
        assert_eq!(status.code(), Code::PermissionDenied);
        assert_eq!(status.message(), REQUEST_UNAUTHORIZED);
        assert!(status.details().is_empty());
    }

    #[test]
    fn reasoned_status_keeps_generic_message() {
        let status = unauthorized_status_with_reason("writer role required".to_owned());
        assert_eq!(status.code(), Code::PermissionDenied);
        assert_eq!(status.message(), REQUEST_UNAUTHORIZED);
        assert_eq!(status.details(), b"writer role required");
    }

    #[test]
    fn first_metadata_value_skips_invalid_ascii() {
        let mut request = Request::new(());
        request.metadata_mut().insert(
            "authorization",
            tonic::metadata::MetadataValue::from_static("Bearer tok-1"),
        );
        assert_eq!(
            first_metadata_value(request.metadata(), "authorization").as_deref(),
            Some("Bearer tok-1"),
        );
        assert!(first_metadata_value(request.metadata(), "other").is_none());
    }
}
