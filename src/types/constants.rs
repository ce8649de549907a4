//! Gateway URLs, endpoint paths and field names

/// Field names shared across providers
pub mod fields {
    /// Signature field on WeChat Pay and Alipay payloads
    pub const SIGN: &str = "sign";
    /// Algorithm-selection field on WeChat Pay and Alipay payloads
    pub const SIGN_TYPE: &str = "sign_type";
    /// Signature field on UnionPay payloads
    pub const SIGNATURE: &str = "signature";
    /// Algorithm-selection field on UnionPay payloads
    pub const SIGN_METHOD: &str = "signMethod";
}

/// WeChat Pay endpoints and fields
pub mod wechat {
    pub const BASE_URL: &str = "https://api.mch.weixin.qq.com/";
    pub const SANDBOX_BASE_URL: &str = "https://api.mch.weixin.qq.com/sandboxnew/";

    pub const MICROPAY: &str = "pay/micropay";
    pub const UNIFIED_ORDER: &str = "pay/unifiedorder";
    pub const ORDER_QUERY: &str = "pay/orderquery";
    pub const CLOSE_ORDER: &str = "pay/closeorder";
    pub const REVERSE: &str = "secapi/pay/reverse";
    /// Sandbox signing key endpoint, relative to the sandbox base URL
    pub const SANDBOX_SIGN_KEY: &str = "pay/getsignkey";

    pub const APP_ID: &str = "appid";
    pub const MCH_ID: &str = "mch_id";
    pub const NONCE_STR: &str = "nonce_str";
    pub const TOTAL_FEE: &str = "total_fee";
    pub const RETURN_CODE: &str = "return_code";
    pub const RETURN_MSG: &str = "return_msg";
    pub const SANDBOX_SIGNKEY: &str = "sandbox_signkey";

    /// Success marker of `return_code`
    pub const SUCCESS: &str = "SUCCESS";
    /// Amount the sandbox expects for the unified order acceptance case
    pub const SANDBOX_UNIFIED_ORDER_FEE: i64 = 101;
}

/// Alipay endpoints and fields
pub mod alipay {
    pub const BASE_URL: &str = "https://openapi.alipay.com/gateway.do";
    pub const SANDBOX_BASE_URL: &str = "https://openapi.alipaydev.com/gateway.do";
    pub const BASE_URL_UTF8: &str = "https://openapi.alipay.com/gateway.do?charset=utf-8";
    pub const SANDBOX_BASE_URL_UTF8: &str =
        "https://openapi.alipaydev.com/gateway.do?charset=utf-8";

    pub const TRADE_PAY: &str = "alipay.trade.pay";
    pub const TRADE_QUERY: &str = "alipay.trade.query";
    pub const TRADE_CLOSE: &str = "alipay.trade.close";
    pub const TRADE_CANCEL: &str = "alipay.trade.cancel";

    pub const APP_ID: &str = "app_id";
    pub const METHOD: &str = "method";
    pub const FORMAT: &str = "format";
    pub const CHARSET: &str = "charset";
    pub const TIMESTAMP: &str = "timestamp";
    pub const VERSION: &str = "version";
    pub const BIZ_CONTENT: &str = "biz_content";
    pub const ERROR_RESPONSE: &str = "error_response";
    pub const CODE: &str = "code";
    pub const MSG: &str = "msg";
    pub const SUB_MSG: &str = "sub_msg";

    /// Request fields that stay at the top level instead of `biz_content`
    pub const TOP_LEVEL_FIELDS: &[&str] = &["notify_url", "return_url", "app_auth_token"];

    pub const FORMAT_JSON: &str = "JSON";
    pub const CHARSET_UTF8: &str = "utf-8";
    pub const API_VERSION: &str = "1.0";
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    /// Success marker of the `code` field
    pub const SUCCESS_CODE: &str = "10000";
}

/// UnionPay endpoints and fields
pub mod unionpay {
    pub const BASE_URL: &str = "https://gateway.95516.com/gateway/api/";
    pub const SANDBOX_BASE_URL: &str = "https://gateway.test.95516.com/gateway/api/";

    pub const BACK_TRANS_REQUEST: &str = "backTransReq.do";
    pub const QUERY_TRANS: &str = "queryTrans.do";

    pub const MER_ID: &str = "merId";
    pub const VERSION: &str = "version";
    pub const ENCODING: &str = "encoding";
    pub const RESP_CODE: &str = "respCode";
    pub const RESP_MSG: &str = "respMsg";

    pub const API_VERSION: &str = "5.1.0";
    pub const ENCODING_UTF8: &str = "UTF-8";
}

/// Content types used on the wire
pub mod content_types {
    pub const XML: &str = "application/xml; charset=utf-8";
    pub const FORM: &str = "application/x-www-form-urlencoded; charset=utf-8";
}
