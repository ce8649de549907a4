//! UnionPay gateway client
//!
//! Form-encoded requests and responses, signed with the merchant RSA key.

use super::{GatewayClient, Provider};
use crate::config::GatewayConfig;
use crate::transport::{CallOptions, Transport};
use crate::types::constants::unionpay;
use crate::types::{BodyMap, QueryTransactionResponse};
use crate::{PayError, Result};
use std::sync::Arc;

// Transaction query defaults: query type, no subtype, merchant direct access
const QUERY_TXN_TYPE: &str = "00";
const QUERY_TXN_SUB_TYPE: &str = "00";
const QUERY_BIZ_TYPE: &str = "000000";
const ACCESS_TYPE_MERCHANT: &str = "0";

/// UnionPay merchant client
#[derive(Debug, Clone)]
pub struct UnionPayClient {
    gateway: GatewayClient,
}

impl UnionPayClient {
    /// Create a new UnionPay client
    pub fn new(config: GatewayConfig) -> Result<Self> {
        if config.provider != Provider::UnionPay {
            return Err(PayError::config(format!(
                "UnionPayClient cannot be built from a {} config",
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

    fn build(&self, mut body: BodyMap) -> BodyMap {
        body.set(unionpay::MER_ID, self.gateway.merchant_id())
            .set(unionpay::VERSION, unionpay::API_VERSION)
            .set(unionpay::ENCODING, unionpay::ENCODING_UTF8);
        body
    }

    /// Send `body` to `path` and return the verified response
    pub async fn execute(
        &self,
        path: &str,
        body: BodyMap,
        options: &CallOptions,
    ) -> Result<BodyMap> {
        let body = self.build(body);
        tracing::debug!("UnionPay {}", path);
        self.gateway.round_trip(path, body, options, None).await
    }

    /// Query the status of a transaction by `orderId` and `txnTime`
    pub async fn query_transaction(
        &self,
        mut body: BodyMap,
        options: &CallOptions,
    ) -> Result<QueryTransactionResponse> {
        body.set_default("txnType", QUERY_TXN_TYPE)
            .set_default("txnSubType", QUERY_TXN_SUB_TYPE)
            .set_default("bizType", QUERY_BIZ_TYPE)
            .set_default("accessType", ACCESS_TYPE_MERCHANT);
        self.execute(unionpay::QUERY_TRANS, body, options)
            .await?
            .decode()
    }
}
