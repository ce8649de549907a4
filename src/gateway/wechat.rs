//! WeChat Pay client
//!
//! XML over HTTPS, signed with the merchant API key. The sandbox signs with
//! a per-merchant key fetched from `pay/getsignkey` instead.

use super::{GatewayClient, Operation, Provider};
use crate::codec;
use crate::config::GatewayConfig;
use crate::crypto::generate_nonce;
use crate::transport::{CallOptions, Transport};
use crate::types::constants::wechat;
use crate::types::{
    BodyMap, CloseOrderResponse, MicropayResponse, QueryOrderResponse, ReverseResponse,
    UnifiedOrderResponse,
};
use crate::{PayError, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub const MICROPAY: Operation = Operation::new("micropay", wechat::MICROPAY);
pub const UNIFIED_ORDER: Operation = Operation::new("unified_order", wechat::UNIFIED_ORDER);
pub const QUERY_ORDER: Operation = Operation::new("query_order", wechat::ORDER_QUERY);
pub const CLOSE_ORDER: Operation = Operation::new("close_order", wechat::CLOSE_ORDER);
pub const REVERSE: Operation = Operation::with_tls("reverse", wechat::REVERSE);

/// WeChat Pay merchant client
#[derive(Debug, Clone)]
pub struct WeChatClient {
    gateway: GatewayClient,
}

impl WeChatClient {
    /// Create a new WeChat Pay client
    pub fn new(config: GatewayConfig) -> Result<Self> {
        if config.provider != Provider::WeChat {
            return Err(PayError::config(format!(
                "WeChatClient cannot be built from a {} config",
                config.provider.as_str()
            )));
        }
        Ok(Self {
            gateway: GatewayClient::new(config)?,
        })
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.gateway = self.gateway.with_transport(transport);
        self
    }

    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    /// Build stage: fixed identifiers plus a nonce when the caller gave none
    fn build(&self, mut body: BodyMap) -> BodyMap {
        body.set(wechat::APP_ID, self.gateway.app_id())
            .set(wechat::MCH_ID, self.gateway.merchant_id())
            .set_default(wechat::NONCE_STR, generate_nonce());
        body
    }

    /// Fetch the sandbox signing key.
    ///
    /// The request is signed with the API key. The answer is unsigned by
    /// protocol, so only a `SUCCESS` answer carrying a key is accepted.
    pub async fn sandbox_sign_key(&self, options: &CallOptions) -> Result<String> {
        let mut body = BodyMap::new();
        body.set(wechat::MCH_ID, self.gateway.merchant_id())
            .set(wechat::NONCE_STR, generate_nonce());
        self.gateway.sign(&mut body, None)?;

        let raw = self
            .gateway
            .transmit(wechat::SANDBOX_SIGN_KEY, &body, options)
            .await?;
        let payload = self.gateway.decode_response(&raw)?;

        let return_code = payload.get_string(wechat::RETURN_CODE).unwrap_or_default();
        if return_code != wechat::SUCCESS {
            return Err(PayError::provider(
                if return_code.is_empty() {
                    "UNKNOWN".to_string()
                } else {
                    return_code
                },
                payload
                    .get_string(wechat::RETURN_MSG)
                    .unwrap_or_else(|| "Failed to fetch sandbox signing key".to_string()),
            ));
        }

        payload
            .get_string(wechat::SANDBOX_SIGNKEY)
            .ok_or_else(|| PayError::provider(wechat::SUCCESS, "Sandbox signing key missing"))
    }

    /// Run one operation and return the verified payload
    pub async fn execute(
        &self,
        operation: &Operation,
        body: BodyMap,
        options: &CallOptions,
    ) -> Result<BodyMap> {
        operation.check(self.gateway.profile(), options)?;

        let body = self.build(body);
        let sandbox_key = if self.gateway.profile().environment.is_production() {
            None
        } else {
            Some(self.sandbox_sign_key(options).await?)
        };

        tracing::debug!("WeChat Pay {} via {}", operation.name, operation.path);
        self.gateway
            .round_trip(operation.path, body, options, sandbox_key.as_deref())
            .await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        body: BodyMap,
        options: &CallOptions,
    ) -> Result<T> {
        self.execute(operation, body, options).await?.decode()
    }

    /// Submit a payment-code (barcode) payment
    pub async fn micropay(
        &self,
        body: BodyMap,
        options: &CallOptions,
    ) -> Result<MicropayResponse> {
        self.call(&MICROPAY, body, options).await
    }

    /// Create a prepaid order.
    ///
    /// The sandbox only accepts its fixed acceptance-case amount, so
    /// `total_fee` is overridden there.
    pub async fn unified_order(
        &self,
        mut body: BodyMap,
        options: &CallOptions,
    ) -> Result<UnifiedOrderResponse> {
        if !self.gateway.profile().environment.is_production() {
            body.set(wechat::TOTAL_FEE, wechat::SANDBOX_UNIFIED_ORDER_FEE);
        }
        self.call(&UNIFIED_ORDER, body, options).await
    }

    pub async fn query_order(
        &self,
        body: BodyMap,
        options: &CallOptions,
    ) -> Result<QueryOrderResponse> {
        self.call(&QUERY_ORDER, body, options).await
    }

    pub async fn close_order(
        &self,
        body: BodyMap,
        options: &CallOptions,
    ) -> Result<CloseOrderResponse> {
        self.call(&CLOSE_ORDER, body, options).await
    }

    /// Reverse a payment. Production requires `options.tls`.
    pub async fn reverse(&self, body: BodyMap, options: &CallOptions) -> Result<ReverseResponse> {
        self.call(&REVERSE, body, options).await
    }

    /// Verify an asynchronous payment notification against the API key
    pub fn verify_notification(&self, body: &[u8]) -> Result<BodyMap> {
        let payload = codec::xml::decode(body)?;
        let sign_type = self.gateway.notification_sign_type(&payload)?;
        self.gateway.verify_payload(&payload, sign_type, None)?;
        Ok(payload)
    }
}
