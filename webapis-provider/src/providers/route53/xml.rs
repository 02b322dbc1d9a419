//! REST-XML to JSON conversion for Route53 responses.
//!
//! A generic element-to-object conversion comes first: repeated tags become
//! arrays and leaf elements become strings. A normalization pass then
//! restores the listing shape: list wrappers flattened, numbers and booleans
//! typed.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::{Map, Value};

/// Wrappers holding repeated items: `<HostedZones><HostedZone/>...</HostedZones>`.
const LIST_KEYS: &[(&str, &str)] = &[
    ("HostedZones", "HostedZone"),
    ("ResourceRecordSets", "ResourceRecordSet"),
    ("ResourceRecords", "ResourceRecord"),
];

const INTEGER_KEYS: &[&str] = &["TTL", "Weight", "ResourceRecordSetCount"];

const BOOLEAN_KEYS: &[&str] = &[
    "IsTruncated",
    "EvaluateTargetHealth",
    "PrivateZone",
    "MultiValueAnswer",
];

/// Convert an XML document to JSON. The root element becomes the single key.
pub(crate) fn xml_to_json(xml: &str) -> Result<Value, quick_xml::Error> {
    fn parse_element(reader: &mut Reader<&[u8]>) -> Result<Value, quick_xml::Error> {
        let mut map: Map<String, Value> = Map::new();
        let mut buf = Vec::new();
        let mut text = String::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    let child = parse_element(reader)?;
                    insert_repeated(&mut map, tag, child);
                }
                Event::Empty(e) => {
                    let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    insert_repeated(&mut map, tag, Value::Null);
                }
                Event::Text(e) => {
                    text.push_str(&e.unescape()?);
                }
                Event::CData(e) => {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
                Event::End(_) | Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if map.is_empty() {
            Ok(Value::String(text.trim().to_string()))
        } else {
            Ok(Value::Object(map))
        }
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root = Map::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                let child = parse_element(&mut reader)?;
                root.insert(tag, child);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(Value::Object(root))
}

fn insert_repeated(map: &mut Map<String, Value>, tag: String, value: Value) {
    if let Some(existing) = map.get_mut(&tag) {
        if let Value::Array(items) = existing {
            items.push(value);
        } else {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    } else {
        map.insert(tag, value);
    }
}

/// Restore list, integer and boolean typing throughout a converted response.
pub(crate) fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| {
                    let v = normalize_field(&key, v);
                    (key, v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        other => other,
    }
}

fn normalize_field(key: &str, value: Value) -> Value {
    if let Some((_, item_tag)) = LIST_KEYS.iter().find(|(k, _)| *k == key) {
        let items = match value {
            Value::Object(mut wrapper) => match wrapper.remove(*item_tag) {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(single) => vec![single],
            },
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        return Value::Array(items.into_iter().map(normalize).collect());
    }

    if INTEGER_KEYS.contains(&key) {
        if let Value::String(s) = &value
            && let Ok(n) = s.parse::<u64>()
        {
            return Value::from(n);
        }
        return value;
    }

    if BOOLEAN_KEYS.contains(&key) {
        if let Value::String(s) = &value {
            return Value::Bool(s.eq_ignore_ascii_case("true"));
        }
        return value;
    }

    normalize(value)
}

/// Convert, normalize and unwrap the `root` element of a response body.
pub(crate) fn parse_response(xml: &str, root: &str) -> Result<Value, String> {
    let json = xml_to_json(xml).map_err(|e| format!("XML parse error: {e}"))?;
    match json {
        Value::Object(mut map) => map
            .remove(root)
            .map(normalize)
            .ok_or_else(|| format!("missing <{root}> element")),
        _ => Err(format!("missing <{root}> element")),
    }
}

/// `(Code, Message)` of an `<ErrorResponse>` body.
pub(crate) fn parse_error(xml: &str) -> Option<(String, String)> {
    let json = xml_to_json(xml).ok()?;
    let error = json.get("ErrorResponse")?.get("Error")?;
    let code = error.get("Code")?.as_str()?.to_string();
    let message = error
        .get("Message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some((code, message))
}
