//! Alipay open platform client
//!
//! Requests are form-encoded with the business fields packed into
//! `biz_content`. Responses are JSON:
//!
//! ```text
//! {"alipay_trade_query_response": {...}, "sign": "..."}
//! ```
//!
//! The signature covers the exact text of the response node, so the node is
//! kept as raw JSON until it has been verified.

use super::{malformed_body, GatewayClient, Provider};
use crate::codec;
use crate::config::GatewayConfig;
use crate::transport::{CallOptions, Transport};
use crate::types::constants::{alipay, fields};
use crate::types::{
    AlipayCommon, BodyMap, SignType, TradeCancelResponse, TradeCloseResponse, TradePayResponse,
    TradeQueryResponse,
};
use crate::{PayError, Result};
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Alipay merchant client
#[derive(Debug, Clone)]
pub struct AlipayClient {
    gateway: GatewayClient,
}

impl AlipayClient {
    /// Create a new Alipay client
    pub fn new(config: GatewayConfig) -> Result<Self> {
        if config.provider != Provider::Alipay {
            return Err(PayError::config(format!(
                "AlipayClient cannot be built from a {} config",
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

    /// Build stage: common parameters plus `biz_content`
    fn build(&self, method: &str, body: BodyMap) -> Result<BodyMap> {
        let mut request = BodyMap::new();
        let mut biz = BodyMap::new();
        for (key, value) in &body {
            if alipay::TOP_LEVEL_FIELDS.contains(&key.as_str()) || key == fields::SIGN_TYPE {
                request.set(key.as_str(), value.clone());
            } else if key != fields::SIGN {
                biz.set(key.as_str(), value.clone());
            }
        }

        request
            .set(alipay::APP_ID, self.gateway.app_id())
            .set(alipay::METHOD, method)
            .set(alipay::FORMAT, alipay::FORMAT_JSON)
            .set(alipay::CHARSET, alipay::CHARSET_UTF8)
            .set(
                alipay::TIMESTAMP,
                chrono::Local::now()
                    .format(alipay::TIMESTAMP_FORMAT)
                    .to_string(),
            )
            .set(alipay::VERSION, alipay::API_VERSION);
        if !biz.is_empty() {
            request.set(alipay::BIZ_CONTENT, serde_json::to_string(&biz)?);
        }
        Ok(request)
    }

    /// Run `method` and return the verified response node
    pub async fn execute(
        &self,
        method: &str,
        body: BodyMap,
        options: &CallOptions,
    ) -> Result<serde_json::Value> {
        let node = self.execute_raw(method, body, options).await?;
        Ok(serde_json::from_str(node.get())?)
    }

    async fn execute_raw(
        &self,
        method: &str,
        body: BodyMap,
        options: &CallOptions,
    ) -> Result<Box<RawValue>> {
        let mut request = self.build(method, body)?;
        let sign_type = self.gateway.sign(&mut request, None)?;

        tracing::debug!("Alipay {}", method);
        let raw = self.gateway.transmit("", &request, options).await?;
        self.verify_response(method, &raw, sign_type)
    }

    /// Verify stage: locate the response node and check the signature over
    /// its raw text
    fn verify_response(
        &self,
        method: &str,
        raw: &[u8],
        sign_type: SignType,
    ) -> Result<Box<RawValue>> {
        let envelope: BTreeMap<String, &RawValue> =
            serde_json::from_slice(raw).map_err(malformed_body)?;
        let node_name = response_node(method);

        let node = envelope
            .get(&node_name)
            .or_else(|| envelope.get(alipay::ERROR_RESPONSE))
            .copied()
            .ok_or_else(|| malformed_body(format!("no {} node", node_name)))?;

        let signature = match envelope.get(fields::SIGN) {
            Some(sign) => serde_json::from_str::<String>(sign.get())?,
            None => {
                let common: AlipayCommon = serde_json::from_str(node.get())?;
                tracing::warn!("Alipay returned an unsigned {}: {}", node_name, common.code);
                let message = common.sub_msg.unwrap_or(common.msg);
                return Err(PayError::provider(common.code, message));
            }
        };

        self.gateway
            .check_signature(node.get(), &signature, sign_type, None)?;
        Ok(node.to_owned())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: BodyMap,
        options: &CallOptions,
    ) -> Result<T> {
        let node = self.execute_raw(method, body, options).await?;
        Ok(serde_json::from_str(node.get())?)
    }

    /// Barcode / face payment
    pub async fn trade_pay(&self, body: BodyMap, options: &CallOptions) -> Result<TradePayResponse> {
        self.call(alipay::TRADE_PAY, body, options).await
    }

    pub async fn trade_query(
        &self,
        body: BodyMap,
        options: &CallOptions,
    ) -> Result<TradeQueryResponse> {
        self.call(alipay::TRADE_QUERY, body, options).await
    }

    pub async fn trade_close(
        &self,
        body: BodyMap,
        options: &CallOptions,
    ) -> Result<TradeCloseResponse> {
        self.call(alipay::TRADE_CLOSE, body, options).await
    }

    pub async fn trade_cancel(
        &self,
        body: BodyMap,
        options: &CallOptions,
    ) -> Result<TradeCancelResponse> {
        self.call(alipay::TRADE_CANCEL, body, options).await
    }

    /// Verify an asynchronous notification posted as a form.
    ///
    /// `sign` and `sign_type` are left out of the signed content; the
    /// algorithm is the one the notification declares.
    pub fn verify_notification(&self, form: &[u8]) -> Result<BodyMap> {
        let payload = codec::form::decode(form);
        let sign_type = self.gateway.notification_sign_type(&payload)?;
        self.gateway.verify_payload(&payload, sign_type, None)?;
        Ok(payload)
    }
}

/// Name of the JSON node carrying the answer to `method`
fn response_node(method: &str) -> String {
    format!("{}_response", method.replace('.', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{canonical_string, KeyMaterial};
    use crate::types::Environment;
    use crate::ErrorKind;
    use mockito::{Matcher, Server};

    const MERCHANT_PRIVATE: &str = include_str!("../../tests/fixtures/merchant_private.pem");
    const PROVIDER_PRIVATE: &str = include_str!("../../tests/fixtures/provider_private.pem");
    const PROVIDER_PUBLIC: &str = include_str!("../../tests/fixtures/provider_public.pem");

    const QUERY_NODE: &str = r#"{"code":"10000","msg":"Success","trade_no":"2013112011001004330000121536","out_trade_no":"6823789339978248","buyer_logon_id":"159****5620","trade_status":"TRADE_SUCCESS","total_amount":"88.88"}"#;

    fn client(environment: Environment, base_url: String) -> AlipayClient {
        let config = GatewayConfig::new(Provider::Alipay, environment)
            .with_app_id("2014072300007148")
            .with_key_material(KeyMaterial::rsa(MERCHANT_PRIVATE, Some(PROVIDER_PUBLIC)).unwrap())
            .with_base_url(base_url);
        AlipayClient::new(config).unwrap()
    }

    fn provider_sign(content: &str, sign_type: SignType) -> String {
        KeyMaterial::rsa(PROVIDER_PRIVATE, None)
            .unwrap()
            .sign(content, sign_type)
            .unwrap()
    }

    fn envelope(node_name: &str, node: &str, sign: Option<String>) -> String {
        match sign {
            Some(sign) => format!(r#"{{"{}":{},"sign":"{}"}}"#, node_name, node, sign),
            None => format!(r#"{{"{}":{}}}"#, node_name, node),
        }
    }

    #[test]
    fn test_response_node() {
        assert_eq!(response_node("alipay.trade.query"), "alipay_trade_query_response");
    }

    #[test]
    fn test_build_packs_business_fields() {
        let client = client(Environment::Production, "http://127.0.0.1:1/gateway.do".into());
        let request = client
            .build(
                alipay::TRADE_PAY,
                BodyMap::new()
                    .with("out_trade_no", "20150320010101001")
                    .with("total_amount", "88.88")
                    .with("notify_url", "https://merchant.example/notify")
                    .with("sign", "stale"),
            )
            .unwrap();

        assert_eq!(request.get_string("app_id").as_deref(), Some("2014072300007148"));
        assert_eq!(request.get_string("method").as_deref(), Some("alipay.trade.pay"));
        assert_eq!(request.get_string("format").as_deref(), Some("JSON"));
        assert_eq!(request.get_string("charset").as_deref(), Some("utf-8"));
        assert_eq!(request.get_string("version").as_deref(), Some("1.0"));
        assert_eq!(
            request.get_string("notify_url").as_deref(),
            Some("https://merchant.example/notify")
        );
        assert!(!request.contains_key("sign"));
        assert!(!request.contains_key("out_trade_no"));

        let timestamp = request.get_string("timestamp").unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(&timestamp, alipay::TIMESTAMP_FORMAT).is_ok());

        let biz: serde_json::Value =
            serde_json::from_str(&request.get_string("biz_content").unwrap()).unwrap();
        assert_eq!(biz["out_trade_no"], "20150320010101001");
        assert_eq!(biz["total_amount"], "88.88");
        assert!(biz.get("notify_url").is_none());
    }

    #[tokio::test]
    async fn test_trade_query_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/gateway.do")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("method".into(), "alipay.trade.query".into()),
                Matcher::UrlEncoded("sign_type".into(), "RSA2".into()),
                Matcher::UrlEncoded("app_id".into(), "2014072300007148".into()),
                Matcher::Regex("sign=".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json;charset=utf-8")
            .with_body(envelope(
                "alipay_trade_query_response",
                QUERY_NODE,
                Some(provider_sign(QUERY_NODE, SignType::Rsa2)),
            ))
            .create_async()
            .await;

        let client = client(Environment::Production, format!("{}/gateway.do", server.url()));
        let response = client
            .trade_query(
                BodyMap::new().with("out_trade_no", "6823789339978248"),
                &CallOptions::new(),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(response.common.is_success());
        assert_eq!(response.trade_status.as_deref(), Some("TRADE_SUCCESS"));
        assert_eq!(response.total_amount.as_deref(), Some("88.88"));
    }

    #[tokio::test]
    async fn test_sandbox_forces_rsa() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/gateway.do")
            .match_body(Matcher::UrlEncoded("sign_type".into(), "RSA".into()))
            .with_status(200)
            .with_body(envelope(
                "alipay_trade_query_response",
                QUERY_NODE,
                Some(provider_sign(QUERY_NODE, SignType::Rsa)),
            ))
            .create_async()
            .await;

        let client = client(Environment::Sandbox, format!("{}/gateway.do", server.url()));
        let response = client
            .trade_query(
                BodyMap::new()
                    .with("out_trade_no", "6823789339978248")
                    .with("sign_type", "RSA2"),
                &CallOptions::new(),
            )
            .await
            .unwrap();
        assert_eq!(response.trade_no.as_deref(), Some("2013112011001004330000121536"));
    }

    #[tokio::test]
    async fn test_tampered_node_fails_verification() {
        let signature = provider_sign(QUERY_NODE, SignType::Rsa2);
        let tampered = QUERY_NODE.replace("88.88", "0.01");

        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/gateway.do")
            .with_status(200)
            .with_body(envelope("alipay_trade_query_response", &tampered, Some(signature)))
            .create_async()
            .await;

        let client = client(Environment::Production, format!("{}/gateway.do", server.url()));
        let err = client
            .trade_query(BodyMap::new().with("out_trade_no", "1"), &CallOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VerificationFailed);
    }

    #[tokio::test]
    async fn test_unsigned_error_response_is_provider_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/gateway.do")
            .with_status(200)
            .with_body(envelope(
                "error_response",
                r#"{"code":"40002","msg":"Invalid Arguments","sub_code":"isv.invalid-app-id","sub_msg":"invalid app_id"}"#,
                None,
            ))
            .create_async()
            .await;

        let client = client(Environment::Production, format!("{}/gateway.do", server.url()));
        let err = client
            .trade_close(BodyMap::new().with("out_trade_no", "1"), &CallOptions::new())
            .await
            .unwrap_err();
        match err {
            PayError::Provider { code, message } => {
                assert_eq!(code, "40002");
                assert_eq!(message, "invalid app_id");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_html_page_is_transport_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/gateway.do")
            .with_status(200)
            .with_body("<html><head><title>Error</title></head></html>")
            .create_async()
            .await;

        let client = client(Environment::Production, format!("{}/gateway.do", server.url()));
        let err = client
            .trade_cancel(BodyMap::new().with("out_trade_no", "1"), &CallOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_generic_execute() {
        let node = r#"{"code":"10000","msg":"Success","refund_fee":"88.88","fund_change":"Y"}"#;
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/gateway.do")
            .match_body(Matcher::UrlEncoded("method".into(), "alipay.trade.refund".into()))
            .with_status(200)
            .with_body(envelope(
                "alipay_trade_refund_response",
                node,
                Some(provider_sign(node, SignType::Rsa2)),
            ))
            .create_async()
            .await;

        let client = client(Environment::Production, format!("{}/gateway.do", server.url()));
        let value = client
            .execute(
                "alipay.trade.refund",
                BodyMap::new()
                    .with("out_trade_no", "1")
                    .with("refund_amount", "88.88"),
                &CallOptions::new(),
            )
            .await
            .unwrap();
        assert_eq!(value["fund_change"], "Y");
    }

    #[tokio::test]
    async fn test_malformed_envelope_is_transport_error() {
        let bodies = [
            r#"{"something_else":{}}"#,
            "upstream connect error or disconnect/reset before headers",
            r#"{"alipay_trade_query_response":{"code":"10000""#,
        ];
        for body in bodies {
            let mut server = Server::new_async().await;
            let _mock = server
                .mock("POST", "/gateway.do")
                .with_status(200)
                .with_body(body)
                .create_async()
                .await;

            let client = client(Environment::Production, format!("{}/gateway.do", server.url()));
            let err = client
                .trade_query(BodyMap::new().with("out_trade_no", "1"), &CallOptions::new())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Transport, "body {}", body);
        }
    }

    #[test]
    fn test_verify_notification() {
        let client = client(Environment::Production, "http://127.0.0.1:1/gateway.do".into());

        let mut notification = BodyMap::new()
            .with("notify_id", "ac05099524730693a8b330c5ecf72da9786")
            .with("trade_no", "2013112011001004330000121536")
            .with("trade_status", "TRADE_SUCCESS")
            .with("total_amount", "88.88")
            .with("sign_type", "RSA2");
        let canonical = canonical_string(&notification, &["sign", "sign_type"]);
        notification.set("sign", provider_sign(&canonical, SignType::Rsa2));
        let form = codec::form::encode(&notification);

        let payload = client.verify_notification(form.as_bytes()).unwrap();
        assert_eq!(payload.get_string("trade_status").as_deref(), Some("TRADE_SUCCESS"));

        let forged = form.replace("88.88", "0.01");
        let err = client.verify_notification(forged.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VerificationFailed);
    }
}
