//! Flat tag-per-field XML (`<xml><key>value</key>...</xml>`)

use crate::types::BodyMap;
use crate::{PayError, Result};
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Serialize a map as `<xml><k>v</k>...</xml>`, keys in map order
pub fn encode(body: &BodyMap) -> String {
    let mut out = String::from("<xml>");
    for (key, value) in body {
        out.push('<');
        out.push_str(key);
        out.push('>');
        out.push_str(&escape(value.to_string().as_str()));
        out.push_str("</");
        out.push_str(key);
        out.push('>');
    }
    out.push_str("</xml>");
    out
}

/// Parse the direct children of the root element into a map.
///
/// Text and CDATA content are both accepted. Deeper nesting is ignored.
pub fn decode(bytes: &[u8]) -> Result<BodyMap> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut body = BodyMap::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut field: Option<String> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                depth += 1;
                if depth == 1 {
                    saw_root = true;
                } else if depth == 2 {
                    field = Some(element_name(e.name().as_ref())?);
                    text.clear();
                }
            }
            Event::Empty(e) => {
                if depth == 0 {
                    saw_root = true;
                } else if depth == 1 {
                    body.set(element_name(e.name().as_ref())?, "");
                }
            }
            Event::Text(t) if depth == 2 => text.push_str(&t.unescape()?),
            Event::CData(c) if depth == 2 => {
                let raw = c.into_inner();
                let s = std::str::from_utf8(&raw)
                    .map_err(|_| PayError::codec("CDATA is not valid UTF-8"))?;
                text.push_str(s);
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some(key) = field.take() {
                        body.set(key, std::mem::take(&mut text));
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(PayError::codec("XML payload has no root element"));
    }
    Ok(body)
}

fn element_name(raw: &[u8]) -> Result<String> {
    String::from_utf8(raw.to_vec()).map_err(|_| PayError::codec("XML element name is not UTF-8"))
}
