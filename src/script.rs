use crate::config::SensorConfig;
use crate::fields::{FieldDefault, FieldValue};
use std::fmt::Write as _;

pub const SCRIPT_FN: &str = "setValues";

/// Render the page's `setValues()` prefill script for a configuration.
pub fn render(cfg: &SensorConfig) -> String {
    render_fields(&cfg.field_values())
}

pub fn render_fields(fields: &[FieldDefault]) -> String {
    let mut out = format!("function {SCRIPT_FN}()\n{{\n");
    for f in fields {
        match &f.value {
            FieldValue::Text(s) => line(&mut out, f.id, "value", &quote(s)),
            FieldValue::Checked(c) => line(&mut out, f.id, "checked", bool_lit(*c)),
            FieldValue::CheckedWithValue(c) => {
                line(&mut out, f.id, "checked", bool_lit(*c));
                line(&mut out, f.id, "value", bool_lit(*c));
            }
        }
    }
    out.push_str("}\n");
    out
}

fn line(out: &mut String, id: &str, prop: &str, literal: &str) {
    let _ = writeln!(out, "\tdocument.getElementById(\"{id}\").{prop} = {literal};");
}

fn bool_lit(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}

// JS double-quoted string literal
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\x3c"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
