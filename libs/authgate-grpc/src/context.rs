//! Request extensions published for downstream handlers.
//!
//! The interceptor attaches the mapped [`Claims`] (and, when present, the raw
//! primary credential) to the request before forwarding. Both wrappers keep
//! their payload private, so only this crate can fabricate the entries;
//! handlers read them through [`mapped_claims`] and [`auth_header`].

use std::sync::Arc;

use secrecy::SecretString;
use tonic::Request;

use authgate_sdk::Claims;

/// Extension entry holding the claims produced by claim mapping.
#[derive(Debug, Clone)]
pub struct MappedClaims(Arc<Claims>);

impl MappedClaims {
    pub(crate) fn new(claims: Arc<Claims>) -> Self {
        Self(claims)
    }

    /// The mapped claims.
    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.0
    }

    /// Shared handle to the claims, for handlers that spawn work.
    #[must_use]
    pub fn shared(&self) -> Arc<Claims> {
        Arc::clone(&self.0)
    }
}

/// Extension entry holding the raw primary credential header value.
///
/// Only attached when the header was non-empty, so its presence doubles as
/// "the caller sent a credential".
#[derive(Debug, Clone)]
pub struct AuthHeaderValue(SecretString);

impl AuthHeaderValue {
    pub(crate) fn new(value: SecretString) -> Self {
        Self(value)
    }

    /// The header value as received, still wrapped against accidental logging.
    #[must_use]
    pub fn value(&self) -> &SecretString {
        &self.0
    }
}

/// Claims the interceptor attached to this request, if claim mapping ran.
#[must_use]
pub fn mapped_claims<T>(request: &Request<T>) -> Option<&Claims> {
    request.extensions().get::<MappedClaims>().map(MappedClaims::claims)
}

/// Raw primary credential of this request, if one was presented.
#[must_use]
pub fn auth_header<T>(request: &Request<T>) -> Option<&SecretString> {
    request.extensions().get::<AuthHeaderValue>().map(AuthHeaderValue::value)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use authgate_sdk::Role;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn mapped_claims_round_trip() {
        let claims = Claims {
            subject: "ops@example".to_owned(),
            system: Role::WRITER,
            ..Claims::default()
        };
        let mut request = Request::new(());
        request
            .extensions_mut()
            .insert(MappedClaims::new(Arc::new(claims.clone())));

        assert_eq!(mapped_claims(&request), Some(&claims));
    }

    #[test]
    fn absent_entries_read_as_none() {
        let request = Request::new(());
        assert!(mapped_claims(&request).is_none());
        assert!(auth_header(&request).is_none());
    }

    #[test]
    fn auth_header_round_trip() {
        let mut request = Request::new(());
        request
            .extensions_mut()
            .insert(AuthHeaderValue::new(SecretString::from("Bearer tok-1")));

        let value = auth_header(&request).unwrap();
        assert_eq!(value.expose_secret(), "Bearer tok-1");
    }

    #[test]
    fn shared_handle_points_at_same_claims() {
        let entry = MappedClaims::new(Arc::new(Claims::default()));
        assert!(Arc::ptr_eq(&entry.shared(), &entry.shared()));
    }
}
