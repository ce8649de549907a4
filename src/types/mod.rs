//! Core types for the gateway clients
//!
//! This module defines the data structures shared by the signing engine and
//! the gateway adapters.
//!
//! # Architecture
//!
//! - [`body_map`] - the parameter map carried by every request and response
//! - [`sign_type`] - algorithm tags selecting the signer and verifier
//! - [`environment`] - production / sandbox selection
//! - [`responses`] - typed results decoded from verified payloads
//! - [`constants`] - gateway URLs, endpoint paths and field names
//!
//! # Examples
//!
//! ```
//! use rust_paygate::types::{BodyMap, SignType};
//!
//! let mut body = BodyMap::new();
//! body.set("out_trade_no", "T1")
//!     .set("total_fee", 100)
//!     .set("sign_type", SignType::HmacSha256.as_str());
//!
//! assert_eq!(body.get_i64("total_fee"), Some(100));
//! ```

pub mod body_map;
pub mod constants;
pub mod environment;
pub mod responses;
pub mod sign_type;

pub use body_map::{BodyMap, Value};
pub use constants::{alipay, content_types, fields, unionpay, wechat};
pub use environment::Environment;
pub use responses::{
    AlipayCommon, CloseOrderResponse, MicropayResponse, QueryOrderResponse,
    QueryTransactionResponse, ReverseResponse, TradeCancelResponse, TradeCloseResponse,
    TradePayResponse, TradeQueryResponse, UnifiedOrderResponse, WeChatCommon,
};
pub use sign_type::SignType;
