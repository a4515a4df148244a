//! Built-in authorizers.

use std::collections::HashSet;

use async_trait::async_trait;

use authgate_sdk::{AuthorizationResult, Authorizer, AuthorizerError, CallTarget, Claims, Role};

/// Authorizer that admits every call. The open-door default for deployments
/// that only want claim mapping, or none of this at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuthorizer;

#[async_trait]
impl Authorizer for NoopAuthorizer {
    async fn authorize(
        &self,
        _claims: Option<&Claims>,
        _target: &CallTarget<'_>,
    ) -> Result<AuthorizationResult, AuthorizerError> {
        Ok(AuthorizationResult::allow())
    }
}

/// Role-gated authorizer.
///
/// Reads in the target namespace require [`Role::READER`], everything else
/// requires [`Role::WRITER`]. The effective role is the union of the system
/// role and the role held in the target namespace; `ADMIN` passes any gate,
/// and `WRITER`/`WORKER` satisfy a read gate. Denials carry a reason.
pub struct RoleAuthorizer {
    read_only_apis: HashSet<String>,
}

impl RoleAuthorizer {
    /// Build an authorizer treating `read_only_apis` as read gates.
    #[must_use]
    pub fn new(read_only_apis: impl IntoIterator<Item = String>) -> Self {
        Self {
            read_only_apis: read_only_apis.into_iter().collect(),
        }
    }

    fn required_role(&self, api_name: &str) -> Role {
        if self.read_only_apis.contains(api_name) {
            Role::READER
        } else {
            Role::WRITER
        }
    }

    fn grants(effective: Role, required: Role) -> bool {
        if effective.contains(Role::ADMIN) || effective.contains(required) {
            return true;
        }
        required == Role::READER
            && (effective.contains(Role::WRITER) || effective.contains(Role::WORKER))
    }
}

fn role_label(role: Role) -> &'static str {
    if role == Role::READER { "reader" } else { "writer" }
}

#[async_trait]
impl Authorizer for RoleAuthorizer {
    async fn authorize(
        &self,
        claims: Option<&Claims>,
        target: &CallTarget<'_>,
    ) -> Result<AuthorizationResult, AuthorizerError> {
        let Some(claims) = claims else {
            return Ok(AuthorizationResult::deny_with_reason(
                "no identity established",
            ));
        };

        let mut effective = claims.system;
        if !target.namespace.is_empty() {
            effective |= claims.namespace_role(target.namespace);
        }

        let required = self.required_role(target.api_name);
        if Self::grants(effective, required) {
            return Ok(AuthorizationResult::allow());
        }

        let label = role_label(required);
        let reason = if target.namespace.is_empty() {
            format!("{label} role required for system calls")
        } else {
            let namespace = target.namespace;
            format!("{label} role required in namespace {namespace}")
        };
        Ok(AuthorizationResult::deny_with_reason(reason))
    }
}
