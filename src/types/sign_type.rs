//! Signature algorithm tags

use crate::{PayError, Result};
use std::fmt;
use std::str::FromStr;

/// Algorithm used to sign a request and verify a response.
///
/// Both sides of an exchange must agree on the tag, otherwise verification
/// fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignType {
    /// MD5 over `canonical&key=secret` (legacy symmetric)
    Md5,
    /// HMAC-SHA256 keyed with the secret over `canonical&key=secret`
    HmacSha256,
    /// PKCS#1 v1.5 with SHA1 (legacy asymmetric)
    Rsa,
    /// PKCS#1 v1.5 with SHA256
    Rsa2,
}

impl SignType {
    /// Wire name of the tag
    pub fn as_str(&self) -> &'static str {
        match self {
            SignType::Md5 => "MD5",
            SignType::HmacSha256 => "HMAC-SHA256",
            SignType::Rsa => "RSA",
            SignType::Rsa2 => "RSA2",
        }
    }

    /// Whether the tag uses a shared secret rather than a key pair
    pub fn is_symmetric(&self) -> bool {
        matches!(self, SignType::Md5 | SignType::HmacSha256)
    }

    /// The legacy tag of the same family
    pub fn legacy(&self) -> SignType {
        if self.is_symmetric() {
            SignType::Md5
        } else {
            SignType::Rsa
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignType {
    type Err = PayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "MD5" => Ok(SignType::Md5),
            "HMAC-SHA256" => Ok(SignType::HmacSha256),
            "RSA" => Ok(SignType::Rsa),
            "RSA2" => Ok(SignType::Rsa2),
            other => Err(PayError::unsupported_algorithm(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_parse_round_trips_wire_names() {
        for tag in [
            SignType::Md5,
            SignType::HmacSha256,
            SignType::Rsa,
            SignType::Rsa2,
        ] {
            assert_eq!(tag.as_str().parse::<SignType>().unwrap(), tag);
        }
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        let err = "SM2".parse::<SignType>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedAlgorithm);
        // wire names are case-sensitive
        assert!("md5".parse::<SignType>().is_err());
    }

    #[test]
    fn test_legacy_stays_in_family() {
        assert_eq!(SignType::HmacSha256.legacy(), SignType::Md5);
        assert_eq!(SignType::Rsa2.legacy(), SignType::Rsa);
        assert!(SignType::Md5.is_symmetric());
        assert!(!SignType::Rsa.is_symmetric());
    }
}
