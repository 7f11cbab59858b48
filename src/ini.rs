// src/ini.rs
use crate::errors::{ConfigError, Result};
use itertools::Itertools;
use std::borrow::Cow;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

/// A parsed INI file. Sections and keys keep file order; on duplicates the
/// first occurrence wins on lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    pub sections: Vec<Section>,
}

impl IniDocument {
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse INI text: `[section]` headers, `key=value` lines, full-line `;` or
/// `#` comments. Every key must sit inside a section. A value wrapped in
/// double quotes is unescaped (see [`quote_value`]); anything else is taken
/// verbatim up to the end of the line.
pub fn parse(text: &str) -> Result<IniDocument> {
    let mut doc = IniDocument::default();
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix('[') {
            let name = rest.strip_suffix(']').ok_or_else(|| ConfigError::Parse {
                line: line_no,
                msg: "unterminated section header".into(),
            })?;
            doc.sections.push(Section { name: name.trim().to_string(), entries: Vec::new() });
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::Parse {
            line: line_no,
            msg: format!("expected `key=value`, got `{line}`"),
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::Parse { line: line_no, msg: "empty key".into() });
        }
        let value = unquote_value(value.trim()).map_err(|msg| ConfigError::Parse { line: line_no, msg })?;
        let section = doc.sections.last_mut().ok_or_else(|| ConfigError::Parse {
            line: line_no,
            msg: format!("key `{key}` outside of any section"),
        })?;
        section.entries.push((key.to_string(), value));
    }
    Ok(doc)
}

/// Render a value so that `parse` reads it back unchanged. Plain values are
/// written as-is; values with edge whitespace, a leading quote, a backslash
/// or control characters are double-quoted and escaped.
pub fn quote_value(value: &str) -> Cow<'_, str> {
    let plain = value == value.trim()
        && !value.starts_with('"')
        && !value.contains('\\')
        && !value.chars().any(char::is_control);
    if plain {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    Cow::Owned(out)
}

fn unquote_value(raw: &str) -> std::result::Result<String, String> {
    let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) else {
        return Ok(raw.to_string());
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let rest = chars.as_str();
                let hex = rest
                    .strip_prefix('{')
                    .and_then(|r| r.split_once('}'))
                    .map(|(hex, _)| hex)
                    .ok_or("malformed `\\u{..}` escape")?;
                let ch = u32::from_str_radix(hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("bad code point `{hex}`"))?;
                out.push(ch);
                // skip `{hex}`
                chars = rest[hex.len() + 2..].chars();
            }
            other => return Err(format!("unknown escape `\\{}`", other.map(String::from).unwrap_or_default())),
        }
    }
    Ok(out)
}

pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Six hex bytes separated by `-` or `:`; each byte one or two digits.
pub fn parse_mac(s: &str) -> Option<[u8; 6]> {
    let mut out = [0u8; 6];
    let mut parts = s.trim().split(['-', ':']);
    for slot in out.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 2 {
            return None;
        }
        *slot = u8::from_str_radix(part, 16).ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

/// Lowercase hex without padding, joined by `-` (`de-ad-b-ee-f-1`).
pub fn format_mac(mac: &[u8; 6]) -> String {
    mac.iter().map(|b| format!("{b:x}")).join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_sections_comments_and_spaces() {
        let text = "\
; sensor settings
[data upload]
upload_freq=180   ; seconds
device_id = TSH06   ; ThermoSensor Home 06

# server
[server config]
server_auth_token=abc;def
";
        let doc = parse(text).unwrap();
        assert_eq!(doc.sections.len(), 2);
        // only full-line comments exist; the rest of a line is the value
        assert_eq!(doc.get("data upload", "upload_freq"), Some("180   ; seconds"));
        assert_eq!(doc.get("data upload", "device_id"), Some("TSH06   ; ThermoSensor Home 06"));
        assert_eq!(doc.get("server config", "server_auth_token"), Some("abc;def"));
        assert_eq!(doc.get("server config", "upload_freq"), None);
        assert_eq!(doc.get("display", "display_contrast"), None);
    }

    #[test]
    fn awkward_values_are_quoted() {
        assert_eq!(quote_value("Cafe #5"), "Cafe #5");
        assert_eq!(quote_value("tok ;x"), "tok ;x");
        assert_eq!(quote_value(" padded "), "\" padded \"");
        assert_eq!(quote_value("a\nb"), r#""a\nb""#);
        assert_eq!(quote_value(r#""quoted""#), r#""\"quoted\"""#);
        assert_eq!(quote_value("bell\u{7}"), r#""bell\u{7}""#);
    }

    #[test]
    fn quoted_values_read_back() {
        for value in ["Cafe #5", " padded ", "a\nb\r\tc", r#"back\slash"#, r#""x""#, "nul\0", ""] {
            let text = format!("[s]\nk={}\n", quote_value(value));
            let doc = parse(&text).unwrap();
            assert_eq!(doc.get("s", "k"), Some(value), "{text:?}");
        }
    }

    #[test]
    fn bad_escape_is_an_error() {
        let err = parse("[s]\nk=\"a\\qb\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 2, .. }));
        assert!(parse("[s]\nk=\"\\u{110000}\"\n").is_err());
        assert!(parse("[s]\nk=\"\\u{41\"\n").is_err());
    }

    #[test]
    fn key_before_section_is_an_error() {
        let err = parse("\nupload_freq=180\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 2, .. }));
    }

    #[test]
    fn garbage_line_is_an_error() {
        let err = parse("[network]\nwifi_enabled\n").unwrap_err();
        assert_eq!(err.to_string(), "ini parse error on line 2: expected `key=value`, got `wifi_enabled`");
        assert!(parse("[network\n").is_err());
    }

    #[test]
    fn first_duplicate_wins() {
        let doc = parse("[a]\nk=1\nk=2\n").unwrap();
        assert_eq!(doc.get("a", "k"), Some("1"));
    }

    #[test]
    fn bools() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn macs() {
        assert_eq!(parse_mac("00-00-00-00-00-00"), Some([0; 6]));
        assert_eq!(parse_mac("de:ad:b:ee:f:1"), Some([0xde, 0xad, 0x0b, 0xee, 0x0f, 0x01]));
        assert_eq!(parse_mac("de-ad-be-ef"), None);
        assert_eq!(parse_mac("de-ad-be-ef-00-11-22"), None);
        assert_eq!(parse_mac("zz-ad-be-ef-00-11"), None);
        assert_eq!(format_mac(&[0xde, 0xad, 0x0b, 0xee, 0x0f, 0x01]), "de-ad-b-ee-f-1");
    }
}
