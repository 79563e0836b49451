//! Generic decode of chain-encoded values into plain value trees

use serde_json::{Map, Value};

/// Convert an encoded value into its plain form
///
/// - object keys become camelCase (`twin_id` -> `twinId`); a key whose camelCase
///   form is already taken in the same object keeps its original spelling
/// - `0x`-prefixed byte strings holding printable UTF-8 become that text
/// - everything else is copied as-is
pub(crate) fn to_primitive(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, nested) in map {
                let camel = camel_case(key);
                let key = if camel != *key && (map.contains_key(&camel) || out.contains_key(&camel))
                {
                    key.clone()
                } else {
                    camel
                };
                out.insert(key, to_primitive(nested));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(to_primitive).collect()),
        Value::String(s) => match bytes_as_text(s) {
            Some(text) => Value::String(text),
            None => value.clone(),
        },
        other => other.clone(),
    }
}

fn camel_case(key: &str) -> String {
    if !key.contains('_') {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn bytes_as_text(s: &str) -> Option<String> {
    let digits = s.strip_prefix("0x")?;
    if digits.len() % 2 != 0 {
        return None;
    }

    let bytes = hex::decode(digits).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    if text.chars().any(char::is_control) {
        return None;
    }
    Some(text)
}
