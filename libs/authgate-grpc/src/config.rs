//! Configuration for the authorization layer.
//!
//! Deserialized from the host's config file; [`interceptor_from_config`]
//! turns it into a ready interceptor. Both strategy fields default to
//! `none`, which leaves the corresponding stage disabled.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use authgate_metrics::MetricsRecorder;
use authgate_sdk::{Authorizer, ClaimMapper, Claims, Role};

use crate::authorizer::{NoopAuthorizer, RoleAuthorizer};
use crate::interceptor::{
    AuthorizationInterceptor, DEFAULT_AUTH_EXTRA_HEADER_NAME, DEFAULT_AUTH_HEADER_NAME,
};
use crate::mapper::{NoopClaimMapper, StaticTokenClaimMapper};

/// Top-level authorization settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorizationConfig {
    /// Metadata key carrying the primary credential.
    pub auth_header_name: String,
    /// Metadata key carrying supplementary credential data.
    pub auth_extra_header_name: String,
    /// Claim-mapping strategy.
    pub claim_mapper: ClaimMapperConfig,
    /// Policy strategy.
    pub authorizer: AuthorizerConfig,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            auth_header_name: DEFAULT_AUTH_HEADER_NAME.to_owned(),
            auth_extra_header_name: DEFAULT_AUTH_EXTRA_HEADER_NAME.to_owned(),
            claim_mapper: ClaimMapperConfig::default(),
            authorizer: AuthorizerConfig::default(),
        }
    }
}

/// Claim-mapper selection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ClaimMapperConfig {
    /// No claim mapper; claim mapping is skipped entirely.
    #[default]
    None,
    /// Every call maps to system-admin claims.
    Noop,
    /// Fixed token table, see [`StaticTokenClaimMapper`].
    StaticTokens {
        /// Token-to-claims entries.
        #[serde(default)]
        tokens: Vec<TokenMapping>,
    },
}

/// Authorizer selection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum AuthorizerConfig {
    /// No authorizer; every call is forwarded.
    #[default]
    None,
    /// Explicit open door: evaluates, always allows.
    Noop,
    /// Role gates per API, see [`RoleAuthorizer`].
    Roles {
        /// APIs gated on `reader` instead of `writer`.
        #[serde(default)]
        read_only_apis: Vec<String>,
    },
}

/// One static token and the identity it authenticates.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// Token value matched against the primary credential.
    pub token: String,
    /// Claims issued when this token is presented.
    pub claims: ClaimsConfig,
}

/// Declarative claims shape used by the static token table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClaimsConfig {
    /// Authenticated subject identifier.
    pub subject: String,
    /// Roles held across all namespaces.
    pub system_roles: Vec<RoleName>,
    /// Per-namespace role grants.
    pub namespaces: HashMap<String, Vec<RoleName>>,
    /// Free-form mapper-specific payload.
    pub extensions: serde_json::Value,
}

impl ClaimsConfig {
    fn to_claims(&self) -> Claims {
        Claims {
            subject: self.subject.clone(),
            system: fold_roles(&self.system_roles),
            namespaces: self
                .namespaces
                .iter()
                .map(|(namespace, roles)| (namespace.clone(), fold_roles(roles)))
                .collect(),
            extensions: self.extensions.clone(),
        }
    }
}

/// Role names accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    /// Read-only access.
    Reader,
    /// Read and write access.
    Writer,
    /// Task-processing access.
    Worker,
    /// Full access.
    Admin,
}

impl From<RoleName> for Role {
    fn from(name: RoleName) -> Self {
        match name {
            RoleName::Reader => Role::READER,
            RoleName::Writer => Role::WRITER,
            RoleName::Worker => Role::WORKER,
            RoleName::Admin => Role::ADMIN,
        }
    }
}

fn fold_roles(names: &[RoleName]) -> Role {
    names
        .iter()
        .fold(Role::UNSPECIFIED, |acc, name| acc | Role::from(*name))
}

/// Build the configured claim mapper, or `None` when mapping is disabled.
#[must_use]
pub fn claim_mapper_from_config(config: &ClaimMapperConfig) -> Option<Arc<dyn ClaimMapper>> {
    match config {
        ClaimMapperConfig::None => None,
        ClaimMapperConfig::Noop => Some(Arc::new(NoopClaimMapper)),
        ClaimMapperConfig::StaticTokens { tokens } => {
            let table = tokens
                .iter()
                .map(|entry| (entry.token.clone(), entry.claims.to_claims()));
            Some(Arc::new(StaticTokenClaimMapper::new(table)))
        }
    }
}

/// Build the configured authorizer, or `None` when enforcement is disabled.
#[must_use]
pub fn authorizer_from_config(config: &AuthorizerConfig) -> Option<Arc<dyn Authorizer>> {
    match config {
        AuthorizerConfig::None => None,
        AuthorizerConfig::Noop => Some(Arc::new(NoopAuthorizer)),
        AuthorizerConfig::Roles { read_only_apis } => {
            Some(Arc::new(RoleAuthorizer::new(read_only_apis.iter().cloned())))
        }
    }
}

/// Assemble an interceptor from configuration.
#[must_use]
pub fn interceptor_from_config(
    config: &AuthorizationConfig,
    metrics: Arc<dyn MetricsRecorder>,
) -> AuthorizationInterceptor {
    let mut builder = AuthorizationInterceptor::builder()
        .metrics(metrics)
        .auth_header_name(config.auth_header_name.as_str())
        .auth_extra_header_name(config.auth_extra_header_name.as_str());
    if let Some(mapper) = claim_mapper_from_config(&config.claim_mapper) {
        builder = builder.claim_mapper(mapper);
    }
    if let Some(authorizer) = authorizer_from_config(&config.authorizer) {
        builder = builder.authorizer(authorizer);
    }
    builder.build()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_config_disables_both_stages() {
        let config: AuthorizationConfig = serde_json::from_value(json!({})).unwrap();

        assert_eq!(config.auth_header_name, "authorization");
        assert_eq!(config.auth_extra_header_name, "authorization-extras");
        assert!(claim_mapper_from_config(&config.claim_mapper).is_none());
        assert!(authorizer_from_config(&config.authorizer).is_none());
    }

    #[test]
    fn static_tokens_config_parses_and_folds_roles() {
        let config: AuthorizationConfig = serde_json::from_value(json!({
            "auth_header_name": "x-credential",
            "claim_mapper": {
                "mode": "static_tokens",
                "tokens": [{
                    "token": "tok-ops",
                    "claims": {
                        "subject": "ops@example",
                        "system_roles": ["reader"],
                        "namespaces": {"accounting": ["writer", "worker"]},
                    },
                }],
            },
            "authorizer": {
                "mode": "roles",
                "read_only_apis": ["DescribeQueue"],
            },
        }))
        .unwrap();

        assert_eq!(config.auth_header_name, "x-credential");
        let ClaimMapperConfig::StaticTokens { tokens } = &config.claim_mapper else {
            panic!("expected static_tokens mode");
        };
        let claims = tokens[0].claims.to_claims();
        assert_eq!(claims.subject, "ops@example");
        assert_eq!(claims.system, Role::READER);
        assert_eq!(
            claims.namespaces["accounting"],
            Role::WRITER | Role::WORKER,
        );
        assert!(claim_mapper_from_config(&config.claim_mapper).is_some());
        assert!(authorizer_from_config(&config.authorizer).is_some());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<AuthorizationConfig, _> =
            serde_json::from_value(json!({"auth_headr_name": "oops"}));
        assert!(result.is_err());
    }

    #[test]
    fn noop_modes_build_open_door_stages() {
        let config: AuthorizationConfig = serde_json::from_value(json!({
            "claim_mapper": {"mode": "noop"},
            "authorizer": {"mode": "noop"},
        }))
        .unwrap();

        assert!(claim_mapper_from_config(&config.claim_mapper).is_some());
        assert!(authorizer_from_config(&config.authorizer).is_some());
    }
}
