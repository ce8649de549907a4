//! Request signing

use crate::types::SignType;
use crate::{PayError, Result};
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha1::Sha1;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// The exact bytes a symmetric signature covers: `canonical&key=secret`
pub fn symmetric_payload(canonical: &str, secret: &str) -> String {
    if canonical.is_empty() {
        format!("key={}", secret)
    } else {
        format!("{}&key={}", canonical, secret)
    }
}

/// Sign with a shared secret; returns an uppercase hex digest
pub fn sign_symmetric(canonical: &str, secret: &str, sign_type: SignType) -> Result<String> {
    let payload = symmetric_payload(canonical, secret);
    let digest = match sign_type {
        SignType::Md5 => Md5::digest(payload.as_bytes()).to_vec(),
        SignType::HmacSha256 => {
            let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
                .map_err(|_| PayError::key_material("Invalid HMAC key"))?;
            mac.update(payload.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
        other => {
            return Err(PayError::unsupported_algorithm(format!(
                "{} is not a symmetric algorithm",
                other
            )))
        }
    };
    Ok(hex::encode_upper(digest))
}

/// Sign with an RSA private key (PKCS#1 v1.5); returns standard base64
pub fn sign_asymmetric(
    canonical: &str,
    private_key: &RsaPrivateKey,
    sign_type: SignType,
) -> Result<String> {
    let signature = match sign_type {
        SignType::Rsa => SigningKey::<Sha1>::new(private_key.clone())
            .try_sign(canonical.as_bytes())
            .map(|s| s.to_bytes()),
        SignType::Rsa2 => SigningKey::<Sha256>::new(private_key.clone())
            .try_sign(canonical.as_bytes())
            .map(|s| s.to_bytes()),
        other => {
            return Err(PayError::unsupported_algorithm(format!(
                "{} is not an asymmetric algorithm",
                other
            )))
        }
    }
    .map_err(|e| PayError::key_material(format!("RSA signing failed: {}", e)))?;

    Ok(general_purpose::STANDARD.encode(signature))
}
