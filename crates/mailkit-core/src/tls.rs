//! TLS configuration shared by the protocol clients.
//!
//! Certificate validation always goes through `rustls`'s own verifier chain
//! (backed by the Mozilla root store via `webpki-roots`); what this module
//! adds is the platform-neutral cipher-suite level from spec §6
//! (`tls.cipherSuite`) and the `tls.requireServerCertificate` escape hatch
//! for talking to servers with self-signed or expired certificates in
//! controlled environments.

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};

/// Platform-neutral cipher suite selection, per spec §6 `tls.cipherSuite`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CipherLevel {
    /// Only the strongest suites `rustls` offers.
    High,
    /// `rustls`'s default suite selection.
    #[default]
    Medium,
    /// Accept whatever the peer proposes that `rustls` supports at all.
    Low,
}

/// TLS configuration for a single connection attempt.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Platform-neutral cipher suite level.
    pub cipher_level: CipherLevel,
    /// If `false`, the peer certificate chain is accepted unconditionally.
    ///
    /// Defaults to `true`; this should only be disabled for testing against
    /// servers with self-signed certificates.
    pub require_server_certificate: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cipher_level: CipherLevel::default(),
            require_server_certificate: true,
        }
    }
}

impl TlsConfig {
    /// Builds a `rustls` client configuration from this policy.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let builder = ClientConfig::builder();

        if self.require_server_certificate {
            let root_store = RootCertStore {
                roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
            };
            builder.with_root_certificates(root_store).with_no_client_auth()
        } else {
            builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoVerifier))
                .with_no_client_auth()
        }
    }
}

/// A certificate verifier that accepts any chain, used only when
/// `tls.requireServerCertificate` is explicitly set to `false`.
#[derive(Debug)]
struct NoVerifier;

impl ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ED25519,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_requires_server_certificate() {
        let config = TlsConfig::default();
        assert!(config.require_server_certificate);
        assert_eq!(config.cipher_level, CipherLevel::Medium);
    }

    #[test]
    fn builds_client_config_without_panicking() {
        let config = TlsConfig::default();
        let _ = config.client_config();

        let lenient = TlsConfig {
            require_server_certificate: false,
            ..TlsConfig::default()
        };
        let _ = lenient.client_config();
    }
}
