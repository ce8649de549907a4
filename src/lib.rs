//! # paygate
//!
//! A **type-safe** client library for third-party payment gateways: WeChat Pay,
//! Alipay and UnionPay.
//!
//! ## Features
//!
//! - 🔏 **Signing engine**: deterministic canonicalization with MD5, HMAC-SHA256,
//!   RSA (SHA1) and RSA2 (SHA256) signatures
//! - ✅ **Response verification**: constant-time digest comparison and RSA
//!   PKCS#1 v1.5 verification of every inbound payload and notification
//! - 🧪 **Sandbox support**: one uniform policy per gateway that switches the
//!   base URL and forces the gateway's legacy algorithm
//! - 🔒 **Mutual TLS**: client certificates for operations that require them
//! - 🔌 **Pluggable transport**: reqwest by default, any [`transport::Transport`]
//!   implementation otherwise
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rust_paygate::{
//!     config::GatewayConfig,
//!     crypto::KeyMaterial,
//!     gateway::{AlipayClient, Provider},
//!     transport::CallOptions,
//!     types::{BodyMap, Environment},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let keys = KeyMaterial::rsa_from_files(
//!         "merchant_private.pem",
//!         Some(std::path::Path::new("alipay_public.pem")),
//!     )?;
//!     let config = GatewayConfig::new(Provider::Alipay, Environment::Production)
//!         .with_app_id("2014072300007148")
//!         .with_key_material(keys);
//!     let client = AlipayClient::new(config)?;
//!
//!     let body = BodyMap::new()
//!         .with("out_trade_no", "20150320010101001")
//!         .with("scene", "bar_code")
//!         .with("auth_code", "28763443825664394")
//!         .with("subject", "Iphone6 16G")
//!         .with("total_amount", "88.88");
//!     let payment = client.trade_pay(body, &CallOptions::new()).await?;
//!
//!     if payment.common.is_success() {
//!         println!("paid: {:?}", payment.trade_no);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`types`**: parameter map, algorithm tags, environments, typed responses
//! - **`crypto`**: canonicalizer, signer, verifier and key material
//! - **`codec`**: XML and form wire formats
//! - **`transport`**: the HTTP boundary and mutual TLS material
//! - **`gateway`**: per-provider profiles and clients
//! - **`config`**: client configuration and environment loading
//! - **`error`**: error taxonomy

pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod gateway;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use config::GatewayConfig;
pub use crypto::KeyMaterial;
pub use error::{ErrorKind, PayError, Result};
pub use gateway::{AlipayClient, GatewayClient, Provider, UnionPayClient, WeChatClient};
pub use transport::{CallOptions, HttpTransport, TlsConfig, Transport};
pub use types::{BodyMap, Environment, SignType, Value};

/// Current version of the paygate library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
