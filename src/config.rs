//! Client configuration

use crate::crypto::KeyMaterial;
use crate::gateway::{GatewayProfile, Provider};
use crate::types::Environment;
use crate::{PayError, Result};
use std::path::Path;
use std::time::Duration;

/// Environment variable selecting `production` or `sandbox`
pub const ENV_ENVIRONMENT: &str = "PAYGATE_ENVIRONMENT";
pub const ENV_APP_ID: &str = "PAYGATE_APP_ID";
pub const ENV_MERCHANT_ID: &str = "PAYGATE_MERCHANT_ID";
/// Shared secret for symmetric providers
pub const ENV_API_KEY: &str = "PAYGATE_API_KEY";
/// Merchant private key file for asymmetric providers
pub const ENV_PRIVATE_KEY_PATH: &str = "PAYGATE_PRIVATE_KEY_PATH";
/// Provider public key file for asymmetric providers
pub const ENV_PUBLIC_KEY_PATH: &str = "PAYGATE_PUBLIC_KEY_PATH";
pub const ENV_BASE_URL: &str = "PAYGATE_BASE_URL";

/// Everything needed to construct a gateway client
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub provider: Provider,
    pub environment: Environment,
    /// Application identifier (WeChat `appid`, Alipay `app_id`)
    pub app_id: String,
    /// Merchant identifier (WeChat `mch_id`, UnionPay `merId`)
    pub merchant_id: String,
    pub key_material: Option<KeyMaterial>,
    /// Overrides the profile's base URL
    pub base_url: Option<String>,
    /// Default per-call deadline
    pub timeout: Option<Duration>,
}

impl GatewayConfig {
    /// Create a new config
    pub fn new(provider: Provider, environment: Environment) -> Self {
        Self {
            provider,
            environment,
            app_id: String::new(),
            merchant_id: String::new(),
            key_material: None,
            base_url: None,
            timeout: None,
        }
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    pub fn with_merchant_id(mut self, merchant_id: impl Into<String>) -> Self {
        self.merchant_id = merchant_id.into();
        self
    }

    pub fn with_key_material(mut self, key_material: KeyMaterial) -> Self {
        self.key_material = Some(key_material);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The provider/environment variant this config selects
    pub fn profile(&self) -> GatewayProfile {
        GatewayProfile::resolve(self.provider, self.environment)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let needs_app_id = matches!(self.provider, Provider::WeChat | Provider::Alipay);
        let needs_merchant_id = matches!(self.provider, Provider::WeChat | Provider::UnionPay);

        if needs_app_id && self.app_id.trim().is_empty() {
            return Err(PayError::config(format!(
                "{} requires an application id",
                self.provider.as_str()
            )));
        }
        if needs_merchant_id && self.merchant_id.trim().is_empty() {
            return Err(PayError::config(format!(
                "{} requires a merchant id",
                self.provider.as_str()
            )));
        }

        let keys = self
            .key_material
            .as_ref()
            .ok_or_else(|| PayError::key_material("No key material configured"))?;
        let profile = self.profile();
        if !keys.supports(profile.default_sign_type) {
            return Err(PayError::key_material(format!(
                "{} signs with {}, which the configured key material cannot produce",
                self.provider.as_str(),
                profile.default_sign_type
            )));
        }

        if let Some(base_url) = &self.base_url {
            let parsed = url::Url::parse(base_url)
                .map_err(|e| PayError::config(format!("Invalid base URL {}: {}", base_url, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(PayError::config(
                    "Base URL must start with http:// or https://",
                ));
            }
        }

        Ok(())
    }

    /// Load a config from `PAYGATE_*` environment variables
    pub fn from_env(provider: Provider) -> Result<Self> {
        Self::from_lookup(provider, |name| std::env::var(name).ok())
    }

    /// Load a config through an arbitrary variable lookup
    pub fn from_lookup<F>(provider: Provider, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let environment = match var(ENV_ENVIRONMENT) {
            Some(value) => value.parse()?,
            None => Environment::Sandbox,
        };

        let profile = GatewayProfile::resolve(provider, environment);
        let key_material = if profile.default_sign_type.is_symmetric() {
            let secret = var(ENV_API_KEY)
                .ok_or_else(|| PayError::config(format!("{} must be set", ENV_API_KEY)))?;
            KeyMaterial::secret(secret)?
        } else {
            let private_key = var(ENV_PRIVATE_KEY_PATH).ok_or_else(|| {
                PayError::config(format!("{} must be set", ENV_PRIVATE_KEY_PATH))
            })?;
            let public_key = var(ENV_PUBLIC_KEY_PATH);
            KeyMaterial::rsa_from_files(private_key, public_key.as_deref().map(Path::new))?
        };

        let mut config = Self::new(provider, environment)
            .with_app_id(var(ENV_APP_ID).unwrap_or_default())
            .with_merchant_id(var(ENV_MERCHANT_ID).unwrap_or_default())
            .with_key_material(key_material);
        if let Some(base_url) = var(ENV_BASE_URL) {
            config = config.with_base_url(base_url);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::collections::HashMap;

    fn wechat_config() -> GatewayConfig {
        GatewayConfig::new(Provider::WeChat, Environment::Production)
            .with_app_id("wx123")
            .with_merchant_id("1900000109")
            .with_key_material(KeyMaterial::secret("S").unwrap())
    }

    #[test]
    fn test_valid_config() {
        assert!(wechat_config().validate().is_ok());
        assert_eq!(
            wechat_config().profile().base_url,
            crate::types::wechat::BASE_URL
        );
    }

    #[test]
    fn test_missing_identifiers() {
        let err = wechat_config().with_app_id("").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = wechat_config().with_merchant_id(" ").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_key_material_must_match_provider() {
        let mut config = wechat_config();
        config.key_material = None;
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::KeyMaterial);

        let alipay = GatewayConfig::new(Provider::Alipay, Environment::Production)
            .with_app_id("2021000000000000")
            .with_key_material(KeyMaterial::secret("S").unwrap());
        assert_eq!(alipay.validate().unwrap_err().kind(), ErrorKind::KeyMaterial);
    }

    #[test]
    fn test_base_url_validation() {
        assert!(wechat_config()
            .with_base_url("http://127.0.0.1:8080")
            .validate()
            .is_ok());

        let err = wechat_config()
            .with_base_url("ftp://example.com")
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = wechat_config()
            .with_base_url("not a url")
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_ENVIRONMENT, "production"),
            (ENV_APP_ID, "wx123"),
            (ENV_MERCHANT_ID, "1900000109"),
            (ENV_API_KEY, "S"),
        ]
        .into_iter()
        .collect();

        let config =
            GatewayConfig::from_lookup(Provider::WeChat, |k| vars.get(k).map(|v| v.to_string()))
                .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.app_id, "wx123");
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_from_lookup_missing_secret() {
        let err = GatewayConfig::from_lookup(Provider::WeChat, |_| None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_from_lookup_missing_key_file() {
        let vars: HashMap<&str, &str> = [
            (ENV_APP_ID, "2021000000000000"),
            (ENV_PRIVATE_KEY_PATH, "/nonexistent/private.pem"),
        ]
        .into_iter()
        .collect();
        let err =
            GatewayConfig::from_lookup(Provider::Alipay, |k| vars.get(k).map(|v| v.to_string()))
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyMaterial);
    }
}
