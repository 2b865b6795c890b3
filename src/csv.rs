//! Delimiter-separated org chart tables.
//!
//! The header must name `id`, `name` and `parent` columns (any case, any
//! order). Every other column is an attribute column whose cells use the
//! `value#color` form. A `parent` cell may list several parents separated
//! by `|`, `,` or `;`.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::attribute::{decode_cell, encode_cell};
use crate::error::{OrgChartError, Result};
use crate::ids::IdGenerator;
use crate::ir::{Node, OrgChartData, Relationship};

const REQUIRED_COLUMNS: [&str; 3] = ["id", "name", "parent"];

fn split_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn detect_delimiter(first_line: &str) -> char {
    if first_line.contains('\t') { '\t' } else { ',' }
}

/// Splits one line into trimmed cells. Quotes toggle quoted mode and `""`
/// inside quotes is a literal quote.
fn split_cells(line: &str, delimiter: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                current.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == delimiter && !in_quotes {
            cells.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    cells.push(current.trim().to_string());
    cells
}

fn split_parents(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(['|', ',', ';'])
        .map(str::trim)
        .filter(|parent| !parent.is_empty())
}

/// Parses a CSV or TSV org chart. Rows without an id are skipped, a blank
/// name falls back to the id, and every parent yields a relationship
/// `parent->child`. The parsed nodes carry no geometry.
pub fn parse_csv(text: &str, ids: &mut dyn IdGenerator) -> Result<OrgChartData> {
    let lines = split_lines(text);
    let Some((header_line, rows)) = lines.split_first() else {
        return Err(OrgChartError::MissingHeader);
    };
    let delimiter = detect_delimiter(header_line);
    let headers = split_cells(header_line, delimiter);

    let column = |wanted: &str| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(wanted))
    };
    let missing: Vec<&'static str> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|&name| column(name).is_none())
        .collect();
    let (Some(id_col), Some(name_col), Some(parent_col)) =
        (column("id"), column("name"), column("parent"))
    else {
        return Err(OrgChartError::MissingColumns(missing));
    };
    let attribute_columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, header)| {
            !REQUIRED_COLUMNS
                .iter()
                .any(|required| header.eq_ignore_ascii_case(required))
        })
        .map(|(idx, header)| (idx, header.as_str()))
        .collect();

    let mut nodes = Vec::new();
    let mut relationships = Vec::new();
    let mut used_rel_ids: HashSet<String> = HashSet::new();

    for line in rows {
        let cells = split_cells(line, delimiter);
        let cell = |idx: usize| cells.get(idx).map_or("", String::as_str);

        let id = cell(id_col);
        if id.is_empty() {
            continue;
        }
        let name = match cell(name_col) {
            "" => id,
            name => name,
        };

        let mut node = Node::new(id, name);
        for &(idx, header) in &attribute_columns {
            let raw = cell(idx);
            if raw.is_empty() {
                continue;
            }
            node.attributes.push(decode_cell(header, raw, ids));
        }
        nodes.push(node);

        for parent in split_parents(cell(parent_col)) {
            if parent == id {
                continue;
            }
            let key = format!("{parent}->{id}");
            let rel_id = if used_rel_ids.contains(&key) {
                ids.next_id()
            } else {
                key
            };
            used_rel_ids.insert(rel_id.clone());
            relationships.push(Relationship::new(rel_id, parent, id));
        }
    }

    debug!(
        nodes = nodes.len(),
        relationships = relationships.len(),
        tabbed = (delimiter == '\t');
        "parsed org chart table"
    );
    Ok(OrgChartData::new(nodes, relationships))
}

fn escape_cell(value: &str) -> String {
    if value.contains([',', '"', '\t', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Comma-separated table with one row per node. Parents are collected from
/// the relationships; attribute columns appear in first-seen order. No
/// trailing newline.
pub fn serialize_csv(data: &OrgChartData) -> String {
    let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
    for rel in &data.relationships {
        parents
            .entry(rel.to.as_str())
            .or_default()
            .push(rel.from.as_str());
    }

    let mut attribute_names: Vec<&str> = Vec::new();
    for attr in data.nodes.iter().flat_map(|node| &node.attributes) {
        if !attr.name.is_empty() && !attribute_names.contains(&attr.name.as_str()) {
            attribute_names.push(&attr.name);
        }
    }

    let mut lines = Vec::with_capacity(data.nodes.len() + 1);
    let header: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .chain(attribute_names.iter())
        .map(|name| escape_cell(name))
        .collect();
    lines.push(header.join(","));

    for node in &data.nodes {
        let parent_cell = parents
            .get(node.id.as_str())
            .map(|list| list.join(","))
            .unwrap_or_default();
        let mut row = vec![
            escape_cell(&node.id),
            escape_cell(&node.name),
            escape_cell(&parent_cell),
        ];
        for name in &attribute_names {
            let value = node
                .attributes
                .iter()
                .find(|attr| attr.name == *name)
                .map(encode_cell)
                .unwrap_or_default();
            row.push(escape_cell(&value));
        }
        lines.push(row.join(","));
    }
    lines.join("\n")
}
