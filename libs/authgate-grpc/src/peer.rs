//! Peer TLS evidence extraction.
//!
//! The transport owns the handshake; by the time a call reaches the
//! interceptor the host has attached a [`TlsConnection`] to the request
//! extensions (built from its acceptor's verified chains). Everything here is
//! pure reads; absence of TLS state is a normal condition, never an error.

use rustls_pki_types::CertificateDer;
use tonic::Request;
use x509_parser::prelude::{FromDer, X509Certificate};

use authgate_sdk::{TlsConnection, TlsSubject};

/// Negotiated TLS peer state for this call, if the host attached one.
///
/// `None` means the transport was not mutual TLS (or the host did not wire
/// peer state through); the call then carries no certificate evidence.
#[must_use]
pub fn tls_connection<T>(request: &Request<T>) -> Option<TlsConnection> {
    request.extensions().get::<TlsConnection>().cloned()
}

/// Parse the subject out of a client certificate.
///
/// Returns `None` when the DER does not parse; the call then proceeds as if
/// no certificate was presented.
#[must_use]
pub fn peer_subject(cert: &CertificateDer<'_>) -> Option<TlsSubject> {
    match X509Certificate::from_der(cert.as_ref()) {
        Ok((_remaining, parsed)) => {
            let subject = parsed.subject();
            Some(TlsSubject {
                common_name: subject
                    .iter_common_name()
                    .find_map(|attr| attr.as_str().ok().map(ToOwned::to_owned)),
                organizations: subject
                    .iter_organization()
                    .filter_map(|attr| attr.as_str().ok().map(ToOwned::to_owned))
                    .collect(),
                organizational_units: subject
                    .iter_organizational_unit()
                    .filter_map(|attr| attr.as_str().ok().map(ToOwned::to_owned))
                    .collect(),
                distinguished_name: subject.to_string(),
            })
        }
        Err(err) => {
            tracing::debug!("unparseable client certificate: {err}");
            None
        }
    }
}
