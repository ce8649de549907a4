//! Request signing and response verification engine
//!
//! This module turns a [`BodyMap`](crate::types::BodyMap) into a deterministic
//! canonical string, signs it with a shared secret or an RSA private key, and
//! checks provider signatures on inbound payloads.
//!
//! # Architecture
//!
//! - [`canonical`] - sorted `key=value&...` signing string
//! - [`signer`] - MD5 / HMAC-SHA256 digests and RSA / RSA2 signatures
//! - [`verifier`] - constant-time digest comparison and RSA verification
//! - [`keys`] - shared secret and RSA key loading
//!
//! # Examples
//!
//! ## Symmetric signing
//!
//! ```
//! use rust_paygate::crypto::{canonical_string, sign_symmetric, verify_symmetric};
//! use rust_paygate::types::{BodyMap, SignType};
//!
//! # fn example() -> rust_paygate::Result<()> {
//! let body = BodyMap::new()
//!     .with("appid", "A1")
//!     .with("mch_id", "M1")
//!     .with("out_trade_no", "T1")
//!     .with("total_fee", 100);
//!
//! let canonical = canonical_string(&body, &["sign", "sign_type"]);
//! let sign = sign_symmetric(&canonical, "S", SignType::Md5)?;
//! assert!(verify_symmetric(&canonical, &sign, "S", SignType::Md5)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Key material
//!
//! ```no_run
//! use rust_paygate::crypto::KeyMaterial;
//! use rust_paygate::types::SignType;
//! use std::path::Path;
//!
//! # fn example() -> rust_paygate::Result<()> {
//! let keys = KeyMaterial::rsa_from_files(
//!     "merchant_private.pem",
//!     Some(Path::new("alipay_public.pem")),
//! )?;
//! let sign = keys.sign("app_id=2021&method=alipay.trade.query", SignType::Rsa2)?;
//! # Ok(())
//! # }
//! ```

pub mod canonical;
pub mod keys;
pub mod signer;
pub mod verifier;


pub use canonical::canonical_string;
pub use keys::{parse_private_key, parse_public_key, KeyMaterial};
pub use signer::{sign_asymmetric, sign_symmetric};
pub use verifier::{verify_asymmetric, verify_symmetric};

use rand::RngCore;

/// Random 32-character hex nonce for `nonce_str` style fields
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
