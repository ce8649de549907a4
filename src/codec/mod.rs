//! Wire formats for [`BodyMap`](crate::types::BodyMap)
//!
//! - [`xml`] - WeChat Pay requests and responses
//! - [`form`] - Alipay and UnionPay requests, UnionPay responses and
//!   asynchronous notifications
//!
//! Alipay JSON responses are handled by the Alipay adapter because the
//! signed content is the raw text of one JSON node.

pub mod form;
pub mod xml;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Whether a response body is an HTML page rather than the expected payload.
///
/// Gateways and their proxies answer some failures with an HTML error page
/// and a 200 status. The page may open with a BOM, an XML prolog or a
/// comment, so the markers are searched for anywhere in the head of the
/// body. Markup inside a genuine XML payload is entity-escaped and does not
/// match.
pub fn looks_like_html(body: &[u8]) -> bool {
    let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
    let head = &body[..body.len().min(1024)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    head.contains("<!doctype html") || head.contains("<html")
}
