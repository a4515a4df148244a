//! Built-in claim mappers.

use std::collections::HashMap;

use async_trait::async_trait;
use secrecy::ExposeSecret;

use authgate_sdk::{AuthInfo, ClaimMapper, ClaimMapperError, Claims, Role};

/// Claim mapper for deployments without real authentication: every call maps
/// to system-admin claims, whether or not it carries evidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClaimMapper;

#[async_trait]
impl ClaimMapper for NoopClaimMapper {
    async fn get_claims(&self, _auth_info: &AuthInfo) -> Result<Claims, ClaimMapperError> {
        Ok(Claims {
            system: Role::ADMIN,
            ..Claims::default()
        })
    }

    fn auth_info_required(&self) -> bool {
        false
    }
}

/// Claim mapper backed by a fixed token table, for development setups and
/// tests.
///
/// Matches the primary credential (with or without a `Bearer` prefix) against
/// the table. Certificate evidence alone does not authenticate here: a call
/// without a recognized token is untrusted.
pub struct StaticTokenClaimMapper {
    tokens: HashMap<String, Claims>,
}

impl StaticTokenClaimMapper {
    /// Build a mapper from `(token, claims)` pairs.
    #[must_use]
    pub fn new(tokens: impl IntoIterator<Item = (String, Claims)>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ClaimMapper for StaticTokenClaimMapper {
    async fn get_claims(&self, auth_info: &AuthInfo) -> Result<Claims, ClaimMapperError> {
        let presented = auth_info.auth_token.expose_secret();
        let token = presented.strip_prefix("Bearer ").unwrap_or(presented);
        if token.is_empty() {
            return Err(ClaimMapperError::Untrusted("no token presented".to_owned()));
        }
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| ClaimMapperError::Untrusted("token not recognized".to_owned()))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn info_with_token(token: &str) -> AuthInfo {
        AuthInfo {
            auth_token: SecretString::from(token),
            extra_data: SecretString::from(""),
            tls_subject: None,
            tls_connection: None,
            audience: String::new(),
        }
    }

    fn table() -> HashMap<String, Claims> {
        let mut tokens = HashMap::new();
        tokens.insert(
            "tok-writer".to_owned(),
            Claims {
                subject: "writer@example".to_owned(),
                system: Role::WRITER,
                ..Claims::default()
            },
        );
        tokens
    }

    #[tokio::test]
    async fn noop_mapper_grants_admin_without_evidence() {
        let mapper = NoopClaimMapper;
        assert!(!mapper.auth_info_required());

        let claims = mapper.get_claims(&info_with_token("")).await.unwrap();
        assert_eq!(claims.system, Role::ADMIN);
        assert!(claims.subject.is_empty());
    }

    #[tokio::test]
    async fn static_mapper_matches_bare_token() {
        let mapper = StaticTokenClaimMapper::new(table());

        let claims = mapper.get_claims(&info_with_token("tok-writer")).await.unwrap();
        assert_eq!(claims.subject, "writer@example");
        assert_eq!(claims.system, Role::WRITER);
    }

    #[tokio::test]
    async fn static_mapper_strips_bearer_prefix() {
        let mapper = StaticTokenClaimMapper::new(table());

        let claims = mapper
            .get_claims(&info_with_token("Bearer tok-writer"))
            .await
            .unwrap();
        assert_eq!(claims.system, Role::WRITER);
    }

    #[tokio::test]
    async fn static_mapper_rejects_unknown_token() {
        let mapper = StaticTokenClaimMapper::new(table());

        let err = mapper
            .get_claims(&info_with_token("tok-unknown"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimMapperError::Untrusted(_)));
    }

    #[tokio::test]
    async fn static_mapper_rejects_empty_token() {
        let mapper = StaticTokenClaimMapper::new(table());

        let err = mapper.get_claims(&info_with_token("")).await.unwrap_err();
        assert!(matches!(err, ClaimMapperError::Untrusted(_)));
        assert!(mapper.auth_info_required());
    }
}
