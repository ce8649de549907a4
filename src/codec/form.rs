//! `application/x-www-form-urlencoded` bodies

use crate::types::BodyMap;
use url::form_urlencoded;

/// Serialize a map as a form body, keys in map order. Empty values are kept.
pub fn encode(body: &BodyMap) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(body.iter().map(|(k, v)| (k.as_str(), v.to_string())))
        .finish()
}

/// Parse a form body; later duplicates overwrite earlier ones
pub fn decode(bytes: &[u8]) -> BodyMap {
    form_urlencoded::parse(bytes)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_percent_encodes() {
        let body = BodyMap::new()
            .with("biz_content", r#"{"out_trade_no":"T1"}"#)
            .with("timestamp", "2024-01-01 10:00:00");
        assert_eq!(
            encode(&body),
            "biz_content=%7B%22out_trade_no%22%3A%22T1%22%7D&timestamp=2024-01-01+10%3A00%3A00"
        );
    }

    #[test]
    fn test_decode_plus_and_percent() {
        let body = decode(b"respMsg=success+ok&signature=ab%2Bc%3D&merId=777");
        assert_eq!(body.get_string("respMsg").as_deref(), Some("success ok"));
        assert_eq!(body.get_string("signature").as_deref(), Some("ab+c="));
        assert_eq!(body.get_string("merId").as_deref(), Some("777"));
    }
}
