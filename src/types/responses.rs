//! Typed results decoded from verified payloads
//!
//! Every field arrives as text. Amount fields stay strings so the caller
//! decides how to interpret currency units.

use serde::{Deserialize, Serialize};

/// Fields present on every WeChat Pay response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeChatCommon {
    pub return_code: String,
    pub return_msg: Option<String>,
    pub appid: Option<String>,
    pub mch_id: Option<String>,
    pub nonce_str: Option<String>,
    pub sign: Option<String>,
    pub result_code: Option<String>,
    pub err_code: Option<String>,
    pub err_code_des: Option<String>,
}

impl WeChatCommon {
    /// Whether the business result succeeded
    pub fn is_success(&self) -> bool {
        self.return_code == "SUCCESS" && self.result_code.as_deref() == Some("SUCCESS")
    }
}

/// `pay/micropay`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MicropayResponse {
    #[serde(flatten)]
    pub common: WeChatCommon,
    pub openid: Option<String>,
    pub trade_type: Option<String>,
    pub bank_type: Option<String>,
    pub total_fee: Option<String>,
    pub cash_fee: Option<String>,
    pub transaction_id: Option<String>,
    pub out_trade_no: Option<String>,
    pub time_end: Option<String>,
}

/// `pay/unifiedorder`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnifiedOrderResponse {
    #[serde(flatten)]
    pub common: WeChatCommon,
    pub device_info: Option<String>,
    pub trade_type: Option<String>,
    pub prepay_id: Option<String>,
    pub code_url: Option<String>,
    pub mweb_url: Option<String>,
}

/// `pay/orderquery`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOrderResponse {
    #[serde(flatten)]
    pub common: WeChatCommon,
    pub openid: Option<String>,
    pub trade_type: Option<String>,
    pub trade_state: Option<String>,
    pub trade_state_desc: Option<String>,
    pub bank_type: Option<String>,
    pub total_fee: Option<String>,
    pub cash_fee: Option<String>,
    pub transaction_id: Option<String>,
    pub out_trade_no: Option<String>,
    pub time_end: Option<String>,
}

/// `pay/closeorder`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloseOrderResponse {
    #[serde(flatten)]
    pub common: WeChatCommon,
}

/// `secapi/pay/reverse`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverseResponse {
    #[serde(flatten)]
    pub common: WeChatCommon,
    /// `Y` when the caller should retry the reversal
    pub recall: Option<String>,
}

/// Fields present on every Alipay response node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlipayCommon {
    pub code: String,
    pub msg: String,
    pub sub_code: Option<String>,
    pub sub_msg: Option<String>,
}

impl AlipayCommon {
    pub fn is_success(&self) -> bool {
        self.code == crate::types::constants::alipay::SUCCESS_CODE
    }
}

/// `alipay.trade.pay`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradePayResponse {
    #[serde(flatten)]
    pub common: AlipayCommon,
    pub trade_no: Option<String>,
    pub out_trade_no: Option<String>,
    pub buyer_logon_id: Option<String>,
    pub total_amount: Option<String>,
    pub receipt_amount: Option<String>,
    pub gmt_payment: Option<String>,
    pub buyer_user_id: Option<String>,
}

/// `alipay.trade.query`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeQueryResponse {
    #[serde(flatten)]
    pub common: AlipayCommon,
    pub trade_no: Option<String>,
    pub out_trade_no: Option<String>,
    pub buyer_logon_id: Option<String>,
    pub trade_status: Option<String>,
    pub total_amount: Option<String>,
    pub send_pay_date: Option<String>,
    pub buyer_user_id: Option<String>,
}

/// `alipay.trade.close`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeCloseResponse {
    #[serde(flatten)]
    pub common: AlipayCommon,
    pub trade_no: Option<String>,
    pub out_trade_no: Option<String>,
}

/// `alipay.trade.cancel`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeCancelResponse {
    #[serde(flatten)]
    pub common: AlipayCommon,
    pub trade_no: Option<String>,
    pub out_trade_no: Option<String>,
    pub retry_flag: Option<String>,
    pub action: Option<String>,
}

/// UnionPay transaction status query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryTransactionResponse {
    pub resp_code: String,
    pub resp_msg: Option<String>,
    pub order_id: Option<String>,
    pub txn_time: Option<String>,
    pub query_id: Option<String>,
    pub orig_resp_code: Option<String>,
    pub orig_resp_msg: Option<String>,
    pub txn_amt: Option<String>,
}
