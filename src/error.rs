//! Error types for the paygate library

use thiserror::Error;

/// Result type alias for paygate operations
pub type Result<T> = std::result::Result<T, PayError>;

/// The distinguishable outcome classes a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Credentials could not be read or parsed. Not retryable.
    KeyMaterial,
    /// Algorithm tag unknown or incompatible with the key kind. Not retryable.
    UnsupportedAlgorithm,
    /// An inbound signature could not be parsed; the payload is untrusted.
    MalformedSignature,
    /// Network, status or body-shape failure before verification.
    Transport,
    /// The signature parsed but did not match; the payload is untrusted.
    VerificationFailed,
    /// The provider answered with an unsigned error payload.
    Provider,
    /// A payload could not be encoded or decoded.
    Codec,
    /// Client configuration is invalid.
    Config,
}

/// Main error type for paygate operations
#[derive(Error, Debug)]
pub enum PayError {
    /// Unreadable or unparsable key material
    #[error("Key material error: {message}")]
    KeyMaterial { message: String },

    /// Unknown algorithm tag, or tag used with the wrong key kind
    #[error("Unsupported algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    /// Inbound signature cannot be parsed
    #[error("Malformed signature: {message}")]
    MalformedSignature { message: String },

    /// Transport failure (status, body shape, connection)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Signature did not match the payload
    #[error("Signature verification failed: {reason}")]
    VerificationFailed { reason: String },

    /// Unsigned error payload returned by the provider
    #[error("Provider error [{code}]: {message}")]
    Provider { code: String, message: String },

    /// XML / form decoding error
    #[error("Codec error: {message}")]
    Codec { message: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error outside of signature parsing
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PayError {
    /// Create a key material error
    pub fn key_material(message: impl Into<String>) -> Self {
        Self::KeyMaterial {
            message: message.into(),
        }
    }

    /// Create an unsupported algorithm error
    pub fn unsupported_algorithm(algorithm: impl Into<String>) -> Self {
        Self::UnsupportedAlgorithm {
            algorithm: algorithm.into(),
        }
    }

    /// Create a malformed signature error
    pub fn malformed_signature(message: impl Into<String>) -> Self {
        Self::MalformedSignature {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a verification failed error
    pub fn verification_failed(reason: impl Into<String>) -> Self {
        Self::VerificationFailed {
            reason: reason.into(),
        }
    }

    /// Create a provider error
    pub fn provider(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a codec error
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Which outcome class this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::KeyMaterial { .. } => ErrorKind::KeyMaterial,
            Self::UnsupportedAlgorithm { .. } => ErrorKind::UnsupportedAlgorithm,
            Self::MalformedSignature { .. } => ErrorKind::MalformedSignature,
            Self::Transport { .. } | Self::Http(_) => ErrorKind::Transport,
            Self::VerificationFailed { .. } => ErrorKind::VerificationFailed,
            Self::Provider { .. } => ErrorKind::Provider,
            Self::Codec { .. } | Self::Json(_) | Self::Base64(_) => ErrorKind::Codec,
            Self::Config { .. } => ErrorKind::Config,
            Self::Io(_) => ErrorKind::KeyMaterial,
        }
    }

    /// Whether a caller-side retry could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

impl From<quick_xml::Error> for PayError {
    fn from(err: quick_xml::Error) -> Self {
        Self::codec(format!("XML: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinct() {
        assert_eq!(PayError::key_material("x").kind(), ErrorKind::KeyMaterial);
        assert_eq!(
            PayError::unsupported_algorithm("SM3").kind(),
            ErrorKind::UnsupportedAlgorithm
        );
        assert_eq!(
            PayError::malformed_signature("x").kind(),
            ErrorKind::MalformedSignature
        );
        assert_eq!(PayError::transport("x").kind(), ErrorKind::Transport);
        assert_eq!(
            PayError::verification_failed("x").kind(),
            ErrorKind::VerificationFailed
        );
        assert_eq!(PayError::provider("FAIL", "x").kind(), ErrorKind::Provider);
        assert_eq!(PayError::codec("x").kind(), ErrorKind::Codec);
        assert_eq!(PayError::config("x").kind(), ErrorKind::Config);
    }

    #[test]
    fn test_only_transport_is_retryable() {
        assert!(PayError::transport("timeout").is_retryable());
        assert!(!PayError::verification_failed("bad sign").is_retryable());
        assert!(!PayError::key_material("bad pem").is_retryable());
    }

    #[test]
    fn test_display_includes_provider_code() {
        let err = PayError::provider("NOAUTH", "merchant not authorized");
        assert_eq!(
            err.to_string(),
            "Provider error [NOAUTH]: merchant not authorized"
        );
    }
}
