//! Response and notification verification
//!
//! A mismatch is an expected outcome and comes back as `Ok(false)`. Errors
//! are reserved for signatures or keys that cannot be parsed at all.

use super::signer;
use crate::types::SignType;
use crate::{PayError, Result};
use base64::{engine::general_purpose, Engine as _};
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Verify a hex digest produced with a shared secret
pub fn verify_symmetric(
    canonical: &str,
    signature: &str,
    secret: &str,
    sign_type: SignType,
) -> Result<bool> {
    let hex_len = match sign_type {
        SignType::Md5 => 32,
        SignType::HmacSha256 => 64,
        other => {
            return Err(PayError::unsupported_algorithm(format!(
                "{} is not a symmetric algorithm",
                other
            )))
        }
    };

    let provided = signature.trim();
    if provided.len() != hex_len || !provided.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(PayError::malformed_signature(format!(
            "expected {} hex characters for {}",
            hex_len, sign_type
        )));
    }

    let expected = signer::sign_symmetric(canonical, secret, sign_type)?;
    let provided = provided.to_ascii_uppercase();
    Ok(expected.as_bytes().ct_eq(provided.as_bytes()).into())
}

/// Verify a base64 PKCS#1 v1.5 signature with the provider's public key
pub fn verify_asymmetric(
    canonical: &str,
    signature: &str,
    public_key: &RsaPublicKey,
    sign_type: SignType,
) -> Result<bool> {
    if sign_type.is_symmetric() {
        return Err(PayError::unsupported_algorithm(format!(
            "{} is not an asymmetric algorithm",
            sign_type
        )));
    }

    let raw = general_purpose::STANDARD
        .decode(signature.trim())
        .map_err(|e| PayError::malformed_signature(format!("signature is not base64: {}", e)))?;
    if raw.is_empty() {
        return Err(PayError::malformed_signature("signature is empty"));
    }
    let signature = Signature::try_from(raw.as_slice())
        .map_err(|e| PayError::malformed_signature(e.to_string()))?;

    let verified = match sign_type {
        SignType::Rsa => VerifyingKey::<Sha1>::new(public_key.clone())
            .verify(canonical.as_bytes(), &signature)
            .is_ok(),
        _ => VerifyingKey::<Sha256>::new(public_key.clone())
            .verify(canonical.as_bytes(), &signature)
            .is_ok(),
    };
    Ok(verified)
}
