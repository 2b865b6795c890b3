//! Attribute micro-syntax.
//!
//! Two textual forms exist. The token form `name[=value][#color]` is what an
//! editing prompt shows, with several tokens joined by `;`. The cell form
//! `value#color` is used inside CSV, where the column header carries the
//! name.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ids::IdGenerator;
use crate::ir::{Attribute, AttributeDisplay};

static TRAILING_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(.*)#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

fn color_hex(color: &str) -> &str {
    color.strip_prefix('#').unwrap_or(color)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Renders `name[=value][#color]`. An attribute without a name renders as
/// an empty string, which callers filter out.
pub fn encode_token(attr: &Attribute) -> String {
    if attr.name.is_empty() {
        return String::new();
    }
    let mut out = attr.name.clone();
    if let Some(value) = attr.value.as_deref().filter(|v| !v.is_empty()) {
        out.push('=');
        out.push_str(value);
    }
    if let Some(color) = attr.color.as_deref().filter(|c| !c.is_empty()) {
        out.push('#');
        out.push_str(color_hex(color));
    }
    out
}

/// Parses `;`-separated tokens. Tokens whose name ends up empty are
/// dropped; every surviving attribute gets a fresh id.
pub fn decode_tokens(text: &str, ids: &mut dyn IdGenerator) -> Vec<Attribute> {
    let mut attributes = Vec::new();
    for segment in text.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let (left, color) = match segment.split_once('#') {
            Some((left, color)) => (left, non_empty(color.trim())),
            None => (segment, None),
        };
        let (name, value) = match left.split_once('=') {
            Some((name, value)) => (name.trim(), non_empty(value.trim())),
            None => (left.trim(), None),
        };
        if name.is_empty() {
            continue;
        }
        attributes.push(Attribute {
            id: ids.next_id(),
            name: name.to_string(),
            value,
            color: color.map(|c| format!("#{c}")),
            display: AttributeDisplay::Label,
        });
    }
    attributes
}

/// The prompt form of a whole attribute list: tokens joined by `"; "`.
pub fn format_attributes(attributes: &[Attribute]) -> String {
    attributes
        .iter()
        .map(encode_token)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Inverse of [`format_attributes`].
pub fn parse_attributes(text: &str, ids: &mut dyn IdGenerator) -> Vec<Attribute> {
    decode_tokens(text, ids)
}

/// CSV cell form: `<value><#color>`, no name.
pub fn encode_cell(attr: &Attribute) -> String {
    let value = attr.value.as_deref().unwrap_or("");
    match attr.color.as_deref().filter(|c| !c.is_empty()) {
        Some(color) => format!("{value}#{}", color_hex(color)),
        None => value.to_string(),
    }
}

/// Parses a CSV cell for the attribute column `name`. A trailing `#RGB` or
/// `#RRGGBB` becomes the color; whatever precedes it is the value.
pub fn decode_cell(name: &str, raw: &str, ids: &mut dyn IdGenerator) -> Attribute {
    let trimmed = raw.trim();
    let (value, color) = match TRAILING_COLOR_RE.captures(trimmed) {
        Some(caps) => {
            let value = caps.get(1).map_or("", |m| m.as_str()).trim();
            let hex = caps.get(2).map_or("", |m| m.as_str());
            (non_empty(value), Some(format!("#{hex}")))
        }
        None => (non_empty(trimmed), None),
    };
    Attribute {
        id: ids.next_id(),
        name: name.to_string(),
        value,
        color,
        display: AttributeDisplay::Label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    #[test]
    fn encodes_full_token() {
        let attr = Attribute::new("a", "level")
            .with_value("L5")
            .with_color("#ff0000");
        assert_eq!(encode_token(&attr), "level=L5#ff0000");
    }

    #[test]
    fn nameless_token_is_empty() {
        let attr = Attribute::new("a", "").with_value("x");
        assert_eq!(encode_token(&attr), "");
    }

    #[test]
    fn decodes_tokens_in_order() {
        let mut ids = SequentialIds::new("attr-");
        let attrs = decode_tokens(" team = infra ; remote ;; =orphan; level=L5#0af", &mut ids);
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[0].name, "team");
        assert_eq!(attrs[0].value.as_deref(), Some("infra"));
        assert_eq!(attrs[0].id, "attr-1");
        assert_eq!(attrs[1].name, "remote");
        assert_eq!(attrs[1].value, None);
        assert_eq!(attrs[2].name, "level");
        assert_eq!(attrs[2].value.as_deref(), Some("L5"));
        assert_eq!(attrs[2].color.as_deref(), Some("#0af"));
    }

    #[test]
    fn token_round_trip_keeps_fields() {
        let mut ids = SequentialIds::default();
        let attr = Attribute::new("x", "site")
            .with_value("Berlin")
            .with_color("#123456");
        let decoded = decode_tokens(&encode_token(&attr), &mut ids);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].name, "site");
        assert_eq!(decoded[0].value.as_deref(), Some("Berlin"));
        assert_eq!(decoded[0].color.as_deref(), Some("#123456"));
    }

    #[test]
    fn formats_attribute_list() {
        let attrs = vec![
            Attribute::new("1", "a").with_value("1"),
            Attribute::new("2", ""),
            Attribute::new("3", "b").with_color("#fff"),
        ];
        assert_eq!(format_attributes(&attrs), "a=1; b#fff");
    }

    #[test]
    fn cell_value_and_color_are_independent() {
        assert_eq!(encode_cell(&Attribute::new("1", "n").with_value("v")), "v");
        assert_eq!(encode_cell(&Attribute::new("1", "n").with_color("#abc")), "#abc");
        assert_eq!(encode_cell(&Attribute::new("1", "n")), "");
    }

    #[test]
    fn decodes_trailing_color_from_cell() {
        let mut ids = SequentialIds::default();
        let attr = decode_cell("level", " Senior #A1B2C3 ", &mut ids);
        assert_eq!(attr.name, "level");
        assert_eq!(attr.value.as_deref(), Some("Senior"));
        assert_eq!(attr.color.as_deref(), Some("#A1B2C3"));

        let only_color = decode_cell("flag", "#f00", &mut ids);
        assert_eq!(only_color.value, None);
        assert_eq!(only_color.color.as_deref(), Some("#f00"));
    }

    #[test]
    fn cell_without_valid_color_is_all_value() {
        let mut ids = SequentialIds::default();
        let attr = decode_cell("room", "B#12", &mut ids);
        assert_eq!(attr.value.as_deref(), Some("B#12"));
        assert_eq!(attr.color, None);
    }
}
