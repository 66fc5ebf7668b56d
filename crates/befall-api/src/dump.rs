//! Verbose structural dump of requests and responses
//!
//! ```text
//! (EchoResponse) {
//!   message: (string) "hello",
//!   tags: (array len=2) [
//!     (string) "a",
//!     (string) "b",
//!   ],
//! }
//! ```
//!
//! Types needing a custom rendering are registered by identifier; nothing is
//! inspected at runtime beyond the JSON value itself.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Write;

/// Renders a value of a registered type. Receives the indent depth.
pub type RenderFn = fn(&Value, usize) -> String;

const INDENT: &str = "  ";

pub struct Dumper {
    renderers: HashMap<String, RenderFn>,
}

impl Dumper {
    /// A dumper with no custom renderers.
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    pub fn register(&mut self, type_id: impl Into<String>, render: RenderFn) {
        self.renderers.insert(type_id.into(), render);
    }

    pub fn dump(&self, type_id: &str, value: &Value) -> String {
        match self.renderers.get(type_id) {
            Some(render) => format!("({}) {}", type_id, render(value, 0)),
            None => format!("({}) {}", type_id, render_plain(value, 0)),
        }
    }
}

impl Default for Dumper {
    fn default() -> Self {
        let mut dumper = Self::empty();
        dumper.register("ArgMap", render_arg_map);
        dumper
    }
}

fn kind(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Number(n) if n.is_f64() => "float".to_string(),
        Value::Number(_) => "int".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(items) => format!("array len={}", items.len()),
        Value::Object(fields) => format!("map len={}", fields.len()),
    }
}

fn render_plain(value: &Value, depth: usize) -> String {
    match value {
        Value::Array(items) => {
            let mut out = String::from("[\n");
            for item in items {
                let _ = writeln!(
                    out,
                    "{}({}) {},",
                    INDENT.repeat(depth + 1),
                    kind(item),
                    render_plain(item, depth + 1)
                );
            }
            out.push_str(&INDENT.repeat(depth));
            out.push(']');
            out
        }
        Value::Object(fields) => {
            let mut out = String::from("{\n");
            for (key, field) in fields {
                let _ = writeln!(
                    out,
                    "{}{}: ({}) {},",
                    INDENT.repeat(depth + 1),
                    key,
                    kind(field),
                    render_plain(field, depth + 1)
                );
            }
            out.push_str(&INDENT.repeat(depth));
            out.push('}');
            out
        }
        scalar => scalar.to_string(),
    }
}

/// Decoded arguments: one `name = value` line each, values kept compact.
fn render_arg_map(value: &Value, depth: usize) -> String {
    let Value::Object(fields) = value else {
        return render_plain(value, depth);
    };

    let mut out = format!("len={} {{\n", fields.len());
    for (key, field) in fields {
        let _ = writeln!(out, "{}{} = {}", INDENT.repeat(depth + 1), key, field);
    }
    out.push_str(&INDENT.repeat(depth));
    out.push('}');
    out
}
