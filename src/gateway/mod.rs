//! Gateway adapters
//!
//! Every operation runs the same pipeline:
//!
//! ```text
//! Build -> Sign -> Transmit -> Receive -> Verify -> Parse
//! ```
//!
//! [`GatewayClient`] implements the provider-neutral stages on top of a
//! [`GatewayProfile`]. The provider clients ([`WeChatClient`],
//! [`AlipayClient`], [`UnionPayClient`]) only add their fixed fields and
//! typed operations.
//!
//! # Examples
//!
//! ```no_run
//! use rust_paygate::config::GatewayConfig;
//! use rust_paygate::crypto::KeyMaterial;
//! use rust_paygate::gateway::{Provider, WeChatClient};
//! use rust_paygate::transport::CallOptions;
//! use rust_paygate::types::{BodyMap, Environment};
//!
//! # async fn example() -> rust_paygate::Result<()> {
//! let config = GatewayConfig::new(Provider::WeChat, Environment::Production)
//!     .with_app_id("wx2421b1c4370ec43b")
//!     .with_merchant_id("10000100")
//!     .with_key_material(KeyMaterial::secret("192006250b4c09247ec02edce69f6a2d")?);
//! let client = WeChatClient::new(config)?;
//!
//! let body = BodyMap::new().with("out_trade_no", "1415659990");
//! let order = client.query_order(body, &CallOptions::new()).await?;
//! println!("trade state: {:?}", order.trade_state);
//! # Ok(())
//! # }
//! ```

use crate::codec;
use crate::config::GatewayConfig;
use crate::crypto::{canonical_string, KeyMaterial};
use crate::transport::{CallOptions, HttpTransport, Transport, TransportRequest};
use crate::types::{content_types, BodyMap, SignType};
use crate::{PayError, Result};
use std::sync::Arc;
use std::time::Duration;

pub mod alipay;
pub mod profile;
pub mod unionpay;
pub mod wechat;


pub use alipay::AlipayClient;
pub use profile::{GatewayProfile, Provider, WireFormat};
pub use unionpay::UnionPayClient;
pub use wechat::WeChatClient;

/// Provider-neutral pipeline shared by the provider clients
#[derive(Clone)]
pub struct GatewayClient {
    profile: GatewayProfile,
    app_id: String,
    merchant_id: String,
    base_url: String,
    keys: Arc<KeyMaterial>,
    transport: Arc<dyn Transport>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("provider", &self.profile.provider)
            .field("environment", &self.profile.environment)
            .field("app_id", &self.app_id)
            .field("merchant_id", &self.merchant_id)
            .field("base_url", &self.base_url)
            .field("keys", &self.keys)
            .field("transport", &"<transport>")
            .finish()
    }
}

impl GatewayClient {
    /// Create a new gateway client from a validated config
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;

        let transport = HttpTransport::with_timeout(config.timeout)?;
        let profile = config.profile();
        let keys = config
            .key_material
            .ok_or_else(|| PayError::key_material("No key material configured"))?;

        Ok(Self {
            profile,
            base_url: config
                .base_url
                .unwrap_or_else(|| profile.base_url.to_string()),
            app_id: config.app_id,
            merchant_id: config.merchant_id,
            keys: Arc::new(keys),
            transport: Arc::new(transport),
            timeout: config.timeout,
        })
    }

    /// Replace the transport, e.g. with a caller's own HTTP stack
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn profile(&self) -> &GatewayProfile {
        &self.profile
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn keys(&self) -> &KeyMaterial {
        &self.keys
    }

    /// Endpoint URL for `path`; an empty path is the base URL itself
    pub fn url(&self, path: &str) -> String {
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Algorithm a request carrying `body` will be signed with
    pub fn sign_type_for(&self, body: &BodyMap) -> Result<SignType> {
        if let Some(forced) = self.profile.forced_sign_type {
            return Ok(forced);
        }
        let requested = body
            .get_string(self.profile.algorithm_field)
            .map(|tag| tag.parse::<SignType>())
            .transpose()?;
        Ok(self.profile.select_sign_type(requested))
    }

    /// Sign stage.
    ///
    /// Writes the algorithm tag, drops any caller-supplied signature and
    /// attaches a fresh one. Returns the algorithm used.
    pub fn sign(&self, body: &mut BodyMap, secret_override: Option<&str>) -> Result<SignType> {
        let sign_type = self.sign_type_for(body)?;

        body.set(self.profile.algorithm_field, sign_type.as_str());
        body.remove(self.profile.signature_field);

        let canonical = canonical_string(body, &self.profile.excluded_fields());
        let signature = self.keys.sign_with(&canonical, sign_type, secret_override)?;
        body.set(self.profile.signature_field, signature);

        tracing::debug!(
            "Signed {} request with {} ({} fields)",
            self.profile.provider.as_str(),
            sign_type,
            body.len()
        );
        Ok(sign_type)
    }

    /// Transmit and Receive stages.
    ///
    /// Serializes the signed body, sends it and returns the raw response
    /// body once it has passed the receive checks.
    pub async fn transmit(
        &self,
        path: &str,
        body: &BodyMap,
        options: &CallOptions,
    ) -> Result<Vec<u8>> {
        let (payload, content_type) = match self.profile.request_format {
            WireFormat::Xml => (codec::xml::encode(body), content_types::XML),
            WireFormat::Form | WireFormat::Json => (codec::form::encode(body), content_types::FORM),
        };

        // Client certificates are only presented to production gateways
        let tls = if self.profile.environment.is_production() {
            options.tls.clone()
        } else {
            None
        };

        let request = TransportRequest {
            url: self.url(path),
            body: payload.into_bytes(),
            content_type,
            tls,
            timeout: options.timeout.or(self.timeout),
        };
        let url = request.url.clone();

        let response = self.transport.send(request).await?;
        self.check_response(&url, response.status, &response.body)?;

        tracing::debug!(
            "Received {} bytes from {}",
            response.body.len(),
            url
        );
        Ok(response.body)
    }

    fn check_response(&self, url: &str, status: u16, body: &[u8]) -> Result<()> {
        if status != 200 {
            tracing::error!(
                "Gateway {} answered with status {}: {}",
                url,
                status,
                String::from_utf8_lossy(body)
            );
            return Err(PayError::transport(format!(
                "HTTP status {} from {}",
                status, url
            )));
        }
        if body.is_empty() {
            tracing::error!("Gateway {} answered with an empty body", url);
            return Err(PayError::transport(format!("Empty response from {}", url)));
        }
        if codec::looks_like_html(body) {
            tracing::error!("Gateway {} answered with an HTML page", url);
            return Err(PayError::transport(format!(
                "HTML error page instead of a gateway response from {}",
                url
            )));
        }
        Ok(())
    }

    /// Decode a response body in the profile's response format.
    ///
    /// A body that does not decode is a broken exchange, not a gateway
    /// answer, and fails with a transport error.
    pub fn decode_response(&self, body: &[u8]) -> Result<BodyMap> {
        match self.profile.response_format {
            WireFormat::Xml => codec::xml::decode(body).map_err(malformed_body),
            WireFormat::Form if !body.contains(&b'=') => {
                Err(malformed_body("form payload has no fields"))
            }
            WireFormat::Form => Ok(codec::form::decode(body)),
            WireFormat::Json => Err(PayError::codec(
                "JSON responses are decoded by the provider client",
            )),
        }
    }

    /// Verify stage for flat payloads.
    ///
    /// A payload without a signature is never trusted: it is surfaced as a
    /// provider error built from its code and message fields.
    pub fn verify_payload(
        &self,
        payload: &BodyMap,
        sign_type: SignType,
        secret_override: Option<&str>,
    ) -> Result<()> {
        let signature = match payload.get_string(self.profile.signature_field) {
            Some(signature) => signature,
            None => return Err(self.unsigned_error(payload)),
        };

        let canonical = canonical_string(payload, &self.profile.excluded_fields());
        self.check_signature(&canonical, &signature, sign_type, secret_override)
    }

    /// Verify a signature over already-extracted signed content
    pub fn check_signature(
        &self,
        content: &str,
        signature: &str,
        sign_type: SignType,
        secret_override: Option<&str>,
    ) -> Result<()> {
        if self
            .keys
            .verify_with(content, signature, sign_type, secret_override)?
        {
            Ok(())
        } else {
            tracing::warn!(
                "{} signature verification failed ({})",
                self.profile.provider.as_str(),
                sign_type
            );
            Err(PayError::verification_failed(format!(
                "{} signature does not match payload",
                sign_type
            )))
        }
    }

    /// Algorithm an inbound notification claims, subject to the profile policy
    pub fn notification_sign_type(&self, payload: &BodyMap) -> Result<SignType> {
        self.sign_type_for(payload)
    }

    fn unsigned_error(&self, payload: &BodyMap) -> PayError {
        let code = payload
            .get_string(self.profile.code_field)
            .unwrap_or_else(|| "UNKNOWN".to_string());
        let message = payload
            .get_string(self.profile.message_field)
            .unwrap_or_else(|| "Unsigned response from gateway".to_string());
        tracing::warn!(
            "{} returned an unsigned payload: {} {}",
            self.profile.provider.as_str(),
            code,
            message
        );
        PayError::provider(code, message)
    }

    /// Full pipeline for providers with flat responses: sign, send,
    /// decode and verify. Returns the verified payload.
    pub async fn round_trip(
        &self,
        path: &str,
        mut body: BodyMap,
        options: &CallOptions,
        secret_override: Option<&str>,
    ) -> Result<BodyMap> {
        let sign_type = self.sign(&mut body, secret_override)?;
        let raw = self.transmit(path, &body, options).await?;
        let payload = self.decode_response(&raw)?;
        self.verify_payload(&payload, sign_type, secret_override)?;
        Ok(payload)
    }
}

/// An endpoint and the transport requirements it carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub path: &'static str,
    /// Production gateway rejects the call without a client certificate
    pub requires_tls: bool,
}

impl Operation {
    pub const fn new(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            requires_tls: false,
        }
    }

    pub const fn with_tls(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            requires_tls: true,
        }
    }

    /// Fail early when a certificate-bound call has no TLS material
    pub fn check(&self, profile: &GatewayProfile, options: &CallOptions) -> Result<()> {
        if self.requires_tls && profile.environment.is_production() && options.tls.is_none() {
            return Err(PayError::config(format!(
                "{} requires a client certificate in production",
                self.name
            )));
        }
        Ok(())
    }
}

/// Receive-stage failure for a body that does not decode in the expected
/// wire format
pub(crate) fn malformed_body(cause: impl std::fmt::Display) -> PayError {
    tracing::error!("Malformed response body: {}", cause);
    PayError::transport(format!("Malformed response body: {}", cause))
}
