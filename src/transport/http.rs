//! reqwest-backed transport

use super::{TlsConfig, Transport, TransportRequest, TransportResponse};
use crate::{PayError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Certificate, Client, Identity};
use std::time::Duration;

/// HTTP POST transport.
///
/// Calls without TLS material share one pooled client. Calls carrying a
/// [`TlsConfig`] get a dedicated client built with that identity, since
/// reqwest binds client certificates at client construction.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Create a transport without a default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Create a transport whose calls time out after `timeout` unless the
    /// request carries its own deadline
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let client = Self::builder(timeout)
            .build()
            .map_err(|e| PayError::config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, timeout })
    }

    fn builder(timeout: Option<Duration>) -> reqwest::ClientBuilder {
        let mut builder = Client::builder().use_rustls_tls();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder
    }

    fn client_for(&self, tls: &TlsConfig) -> Result<Client> {
        let mut identity_pem = tls.client_cert_pem.clone();
        identity_pem.push(b'\n');
        identity_pem.extend_from_slice(&tls.client_key_pem);
        let identity = Identity::from_pem(&identity_pem)
            .map_err(|e| PayError::key_material(format!("Invalid client identity: {}", e)))?;

        let mut builder = Self::builder(self.timeout).identity(identity);
        if let Some(ca) = &tls.ca_pem {
            let ca = Certificate::from_pem(ca)
                .map_err(|e| PayError::key_material(format!("Invalid CA certificate: {}", e)))?;
            builder = builder.add_root_certificate(ca);
        }

        builder
            .build()
            .map_err(|e| PayError::config(format!("Failed to create TLS HTTP client: {}", e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let client = match &request.tls {
            Some(tls) => self.client_for(tls)?,
            None => self.client.clone(),
        };

        tracing::debug!(
            "POST {} ({} bytes, mutual TLS: {})",
            request.url,
            request.body.len(),
            request.tls.is_some()
        );

        let mut builder = client
            .post(&request.url)
            .header(CONTENT_TYPE, request.content_type)
            .body(request.body);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Request to {} failed: {}", request.url, e);
            PayError::from(e)
        })?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use mockito::{Matcher, Server};

    fn request(url: String) -> TransportRequest {
        TransportRequest {
            url,
            body: b"<xml><a>1</a></xml>".to_vec(),
            content_type: crate::types::content_types::XML,
            tls: None,
            timeout: None,
        }
    }

    #[tokio::test]
    async fn test_posts_body_and_returns_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/pay/orderquery")
            .match_header("content-type", Matcher::Regex("application/xml".to_string()))
            .match_body("<xml><a>1</a></xml>")
            .with_status(200)
            .with_body("<xml><return_code>SUCCESS</return_code></xml>")
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let response = transport
            .send(request(format!("{}/pay/orderquery", server.url())))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            b"<xml><return_code>SUCCESS</return_code></xml>".to_vec()
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_returned_not_raised() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/pay/orderquery")
            .with_status(503)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let response = transport
            .send(request(format!("{}/pay/orderquery", server.url())))
            .await
            .unwrap();
        assert_eq!(response.status, 503);
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let transport = HttpTransport::with_timeout(Some(Duration::from_secs(2))).unwrap();
        let err = transport
            .send(request("http://127.0.0.1:1/pay/orderquery".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_invalid_identity_is_key_material_error() {
        let transport = HttpTransport::new().unwrap();
        let mut req = request("https://127.0.0.1:1/secapi/pay/reverse".to_string());
        req.tls = Some(TlsConfig::new("garbage", "garbage"));
        let err = transport.send(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyMaterial);
    }
}
