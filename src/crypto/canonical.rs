//! Canonical signing string

use crate::types::BodyMap;

/// Build the canonical string of `body`.
///
/// Keys are sorted by byte value, rendered as `key=value` and joined with
/// `&`. Keys listed in `excluded` and entries with an empty value are left
/// out entirely; providers canonicalize the same way, and any difference
/// only shows up later as an unexplained signature mismatch.
pub fn canonical_string(body: &BodyMap, excluded: &[&str]) -> String {
    let mut pairs: Vec<(&str, String)> = body
        .iter()
        .filter(|(k, _)| !excluded.contains(&k.as_str()))
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.as_str(), v.to_string()))
        .collect();
    // Byte order is the contract, independent of the container's iteration order.
    pairs.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let mut out = String::new();
    for (i, (k, v)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        out.push_str(k);
        out.push('=');
        out.push_str(v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut forward = BodyMap::new();
        forward
            .set("appid", "A1")
            .set("mch_id", "M1")
            .set("out_trade_no", "T1")
            .set("total_fee", "100");

        let mut backward = BodyMap::new();
        backward
            .set("total_fee", "100")
            .set("out_trade_no", "T1")
            .set("mch_id", "M1")
            .set("appid", "A1");

        assert_eq!(
            canonical_string(&forward, &["sign"]),
            canonical_string(&backward, &["sign"])
        );
    }

    #[test]
    fn test_empty_values_are_omitted() {
        let body = BodyMap::new().with("a", "1").with("b", "");
        assert_eq!(canonical_string(&body, &[]), "a=1");
    }

    #[test]
    fn test_excluded_keys_are_omitted() {
        let body = BodyMap::new()
            .with("a", "1")
            .with("sign", "ABC")
            .with("sign_type", "MD5");
        assert_eq!(canonical_string(&body, &["sign", "sign_type"]), "a=1");
    }

    #[test]
    fn test_byte_order_puts_uppercase_first() {
        let body = BodyMap::new()
            .with("b", "2")
            .with("B", "1")
            .with("a_b", "3")
            .with("ab", "4");
        assert_eq!(canonical_string(&body, &[]), "B=1&a_b=3&ab=4&b=2");
    }

    #[test]
    fn test_reference_fields() {
        let body = BodyMap::new()
            .with("appid", "A1")
            .with("mch_id", "M1")
            .with("out_trade_no", "T1")
            .with("total_fee", 100);
        assert_eq!(
            canonical_string(&body, &["sign"]),
            "appid=A1&mch_id=M1&out_trade_no=T1&total_fee=100"
        );
    }

    #[test]
    fn test_empty_map() {
        assert_eq!(canonical_string(&BodyMap::new(), &["sign"]), "");
    }
}
