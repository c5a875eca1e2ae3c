// XML serialization of view data

use serde_json::Value;

use super::template::{escape_html, value_to_text};

/// Serialize `value` under a `<root>` element, with an XML declaration
///
/// Object keys become child elements, array items become `<item>` elements.
pub fn to_xml(root: &str, value: &Value) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    write_element(&mut out, &element_name(root), value);
    out
}

fn write_element(out: &mut String, name: &str, value: &Value) {
    match value {
        Value::Null => {
            out.push('<');
            out.push_str(name);
            out.push_str("/>");
        }
        Value::Object(map) => {
            out.push_str(&format!("<{}>", name));
            for (key, child) in map {
                write_element(out, &element_name(key), child);
            }
            out.push_str(&format!("</{}>", name));
        }
        Value::Array(items) => {
            out.push_str(&format!("<{}>", name));
            for item in items {
                write_element(out, "item", item);
            }
            out.push_str(&format!("</{}>", name));
        }
        scalar => {
            out.push_str(&format!(
                "<{}>{}</{}>",
                name,
                escape_html(&value_to_text(scalar)),
                name
            ));
        }
    }
}

/// Coerce an arbitrary key into a valid element name
fn element_name(raw: &str) -> String {
    let mut name: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let valid_start = name
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start {
        name.insert(0, '_');
    }
    name
}
