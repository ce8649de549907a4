//! Transport boundary
//!
//! The engine never performs network I/O itself. A [`Transport`] receives a
//! fully signed and serialized request and returns the raw status and body.
//! [`HttpTransport`] is the default implementation on top of reqwest; tests
//! and callers with their own HTTP stack can plug in anything else.

use crate::{PayError, Result};
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub mod http;

pub use http::HttpTransport;

/// Client certificate and CA pool for gateways that require mutual TLS
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM client certificate chain
    pub client_cert_pem: Vec<u8>,
    /// PEM private key for the client certificate
    pub client_key_pem: Vec<u8>,
    /// Optional PEM CA bundle trusted in addition to the system roots
    pub ca_pem: Option<Vec<u8>>,
}

impl fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsConfig")
            .field("client_cert_pem", &format!("<{} bytes>", self.client_cert_pem.len()))
            .field("client_key_pem", &"<redacted>")
            .field("ca_pem", &self.ca_pem.as_ref().map(|ca| ca.len()))
            .finish()
    }
}

impl TlsConfig {
    pub fn new(client_cert_pem: impl Into<Vec<u8>>, client_key_pem: impl Into<Vec<u8>>) -> Self {
        Self {
            client_cert_pem: client_cert_pem.into(),
            client_key_pem: client_key_pem.into(),
            ca_pem: None,
        }
    }

    /// Trust an additional CA bundle
    pub fn with_ca(mut self, ca_pem: impl Into<Vec<u8>>) -> Self {
        self.ca_pem = Some(ca_pem.into());
        self
    }

    /// Load certificate, key and optional CA bundle from PEM files.
    ///
    /// Each file is read fully and closed before the next one is opened.
    pub fn from_files(
        cert_path: impl AsRef<Path>,
        key_path: impl AsRef<Path>,
        ca_path: Option<&Path>,
    ) -> Result<Self> {
        let read = |path: &Path| {
            std::fs::read(path).map_err(|e| {
                PayError::key_material(format!("Failed to read {}: {}", path.display(), e))
            })
        };
        let config = Self {
            client_cert_pem: read(cert_path.as_ref())?,
            client_key_pem: read(key_path.as_ref())?,
            ca_pem: ca_path.map(read).transpose()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every part at least looks like PEM
    pub fn validate(&self) -> Result<()> {
        let is_pem = |bytes: &[u8]| String::from_utf8_lossy(bytes).contains("-----BEGIN");
        if !is_pem(&self.client_cert_pem) {
            return Err(PayError::key_material("Client certificate is not PEM"));
        }
        if !is_pem(&self.client_key_pem) {
            return Err(PayError::key_material("Client key is not PEM"));
        }
        if let Some(ca) = &self.ca_pem {
            if !is_pem(ca) {
                return Err(PayError::key_material("CA bundle is not PEM"));
            }
        }
        Ok(())
    }
}

/// Per-call options
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Mutual TLS material, for operations the gateway requires it on
    pub tls: Option<TlsConfig>,
    /// Deadline for this call, overriding the client default
    pub timeout: Option<Duration>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A signed, serialized request ready to send
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub tls: Option<TlsConfig>,
    pub timeout: Option<Duration>,
}

/// Raw gateway answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends requests to a gateway.
///
/// Implementations must not retry; failures are surfaced to the caller,
/// who owns retry policy.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}
