use crate::ir::{Attribute, AttributeDisplay};

/// Composite text shown inside a node: the name on the first line, then one
/// line per `label`-display attribute (`name: value`, or bare `name`).
pub fn node_label_text(name: &str, attributes: &[Attribute]) -> String {
    let mut lines = vec![name.to_string()];
    for attr in attributes {
        if attr.display != AttributeDisplay::Label {
            continue;
        }
        let attr_name = attr.name.trim();
        if attr_name.is_empty() {
            continue;
        }
        match attr.value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => lines.push(format!("{attr_name}: {value}")),
            None => lines.push(attr_name.to_string()),
        }
    }
    lines.retain(|line| !line.is_empty());
    lines.join("\n")
}
