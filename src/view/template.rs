// Minimal `{{ ... }}` template substitution
//
// `{{ path }}` inserts the HTML-escaped data value at `path`.
// `{{ helper arg }}` calls the helper with `arg` (a data path is resolved
// first, otherwise the literal text is passed) and inserts its output as is.
// Unknown names render as nothing.

use serde_json::Value;

use super::ViewData;

/// Escape text for inclusion in HTML or XML
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Plain-text form of a value: strings unquoted, null empty, the rest as JSON
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn render(template: &str, data: &ViewData) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            // Unterminated tag, emit the remainder verbatim
            out.push_str(&rest[start..]);
            return out;
        };
        out.push_str(&evaluate(after[..end].trim(), data));
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn evaluate(expr: &str, data: &ViewData) -> String {
    let (name, arg) = match expr.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim())),
        None => (expr, None),
    };

    if let Some(helper) = data.helper(name) {
        let arg = arg.unwrap_or("");
        let resolved = match data.lookup(arg) {
            Some(value) => value_to_text(value),
            None => unquote(arg).to_string(),
        };
        return helper(&resolved);
    }

    match data.lookup(expr) {
        Some(value) => escape_html(&value_to_text(value)),
        None => {
            tracing::debug!(name = %expr, "Template variable not found");
            String::new()
        }
    }
}

fn unquote(arg: &str) -> &str {
    arg.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(arg)
}
