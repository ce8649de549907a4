//! Provider / environment variants
//!
//! Every provider-specific constant the orchestration needs is resolved here
//! once, at client construction, instead of being branched on at call sites.

use crate::types::constants::{alipay, fields, unionpay, wechat};
use crate::types::{Environment, SignType};

/// Supported payment providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    WeChat,
    Alipay,
    UnionPay,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::WeChat => "wechat",
            Provider::Alipay => "alipay",
            Provider::UnionPay => "unionpay",
        }
    }
}

/// Request and response encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// Flat `<xml>` document
    Xml,
    /// `application/x-www-form-urlencoded`
    Form,
    /// JSON document with one `<method>_response` node (responses only)
    Json,
}

/// Everything that differs between one provider/environment pair and another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayProfile {
    pub provider: Provider,
    pub environment: Environment,
    /// Base URL, endpoint paths are appended to it
    pub base_url: &'static str,
    /// Field carrying the signature
    pub signature_field: &'static str,
    /// Field carrying the algorithm tag
    pub algorithm_field: &'static str,
    /// Algorithm used when neither policy nor caller picks one
    pub default_sign_type: SignType,
    /// Algorithm every request is forced to, regardless of caller choice
    pub forced_sign_type: Option<SignType>,
    pub request_format: WireFormat,
    pub response_format: WireFormat,
    /// Status code field of an unsigned error payload
    pub code_field: &'static str,
    /// Message field of an unsigned error payload
    pub message_field: &'static str,
}

impl GatewayProfile {
    /// Resolve the variant for a provider and environment
    pub const fn resolve(provider: Provider, environment: Environment) -> Self {
        match (provider, environment) {
            (Provider::WeChat, Environment::Production) => WECHAT_PRODUCTION,
            (Provider::WeChat, Environment::Sandbox) => WECHAT_SANDBOX,
            (Provider::Alipay, Environment::Production) => ALIPAY_PRODUCTION,
            (Provider::Alipay, Environment::Sandbox) => ALIPAY_SANDBOX,
            (Provider::UnionPay, Environment::Production) => UNIONPAY_PRODUCTION,
            (Provider::UnionPay, Environment::Sandbox) => UNIONPAY_SANDBOX,
        }
    }

    /// Keys never fed to the canonicalizer
    pub fn excluded_fields(&self) -> [&'static str; 2] {
        [self.signature_field, self.algorithm_field]
    }

    /// Algorithm for one request.
    ///
    /// The forced tag wins, then a valid caller-requested tag, then the
    /// profile default.
    pub fn select_sign_type(&self, requested: Option<SignType>) -> SignType {
        self.forced_sign_type
            .or(requested)
            .unwrap_or(self.default_sign_type)
    }
}

pub const WECHAT_PRODUCTION: GatewayProfile = GatewayProfile {
    provider: Provider::WeChat,
    environment: Environment::Production,
    base_url: wechat::BASE_URL,
    signature_field: fields::SIGN,
    algorithm_field: fields::SIGN_TYPE,
    default_sign_type: SignType::Md5,
    forced_sign_type: None,
    request_format: WireFormat::Xml,
    response_format: WireFormat::Xml,
    code_field: wechat::RETURN_CODE,
    message_field: wechat::RETURN_MSG,
};

pub const WECHAT_SANDBOX: GatewayProfile = GatewayProfile {
    base_url: wechat::SANDBOX_BASE_URL,
    environment: Environment::Sandbox,
    forced_sign_type: Some(SignType::Md5),
    ..WECHAT_PRODUCTION
};

pub const ALIPAY_PRODUCTION: GatewayProfile = GatewayProfile {
    provider: Provider::Alipay,
    environment: Environment::Production,
    base_url: alipay::BASE_URL_UTF8,
    signature_field: fields::SIGN,
    algorithm_field: fields::SIGN_TYPE,
    default_sign_type: SignType::Rsa2,
    forced_sign_type: None,
    request_format: WireFormat::Form,
    response_format: WireFormat::Json,
    code_field: alipay::CODE,
    message_field: alipay::MSG,
};

pub const ALIPAY_SANDBOX: GatewayProfile = GatewayProfile {
    base_url: alipay::SANDBOX_BASE_URL_UTF8,
    environment: Environment::Sandbox,
    forced_sign_type: Some(SignType::Rsa),
    ..ALIPAY_PRODUCTION
};

pub const UNIONPAY_PRODUCTION: GatewayProfile = GatewayProfile {
    provider: Provider::UnionPay,
    environment: Environment::Production,
    base_url: unionpay::BASE_URL,
    signature_field: fields::SIGNATURE,
    algorithm_field: fields::SIGN_METHOD,
    default_sign_type: SignType::Rsa2,
    forced_sign_type: None,
    request_format: WireFormat::Form,
    response_format: WireFormat::Form,
    code_field: unionpay::RESP_CODE,
    message_field: unionpay::RESP_MSG,
};

pub const UNIONPAY_SANDBOX: GatewayProfile = GatewayProfile {
    base_url: unionpay::SANDBOX_BASE_URL,
    environment: Environment::Sandbox,
    forced_sign_type: Some(SignType::Rsa),
    ..UNIONPAY_PRODUCTION
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_changes_only_url_and_forced_algorithm() {
        for provider in [Provider::WeChat, Provider::Alipay, Provider::UnionPay] {
            let prod = GatewayProfile::resolve(provider, Environment::Production);
            let sandbox = GatewayProfile::resolve(provider, Environment::Sandbox);

            assert_ne!(prod.base_url, sandbox.base_url);
            assert!(prod.forced_sign_type.is_none());
            assert_eq!(
                sandbox.forced_sign_type,
                Some(prod.default_sign_type.legacy())
            );

            assert_eq!(prod.signature_field, sandbox.signature_field);
            assert_eq!(prod.algorithm_field, sandbox.algorithm_field);
            assert_eq!(prod.default_sign_type, sandbox.default_sign_type);
            assert_eq!(prod.request_format, sandbox.request_format);
            assert_eq!(prod.response_format, sandbox.response_format);
        }
    }

    #[test]
    fn test_sign_type_selection() {
        assert_eq!(
            WECHAT_PRODUCTION.select_sign_type(Some(SignType::HmacSha256)),
            SignType::HmacSha256
        );
        assert_eq!(WECHAT_PRODUCTION.select_sign_type(None), SignType::Md5);
        assert_eq!(
            WECHAT_SANDBOX.select_sign_type(Some(SignType::HmacSha256)),
            SignType::Md5
        );
        assert_eq!(ALIPAY_PRODUCTION.select_sign_type(None), SignType::Rsa2);
        assert_eq!(
            ALIPAY_SANDBOX.select_sign_type(Some(SignType::Rsa2)),
            SignType::Rsa
        );
    }

    #[test]
    fn test_excluded_fields() {
        assert_eq!(WECHAT_PRODUCTION.excluded_fields(), ["sign", "sign_type"]);
        assert_eq!(
            UNIONPAY_SANDBOX.excluded_fields(),
            ["signature", "signMethod"]
        );
    }
}
