//! Turns an org chart document back into scene elements.

use std::collections::{BTreeMap, HashMap, HashSet};

use log::debug;

use crate::config::Config;
use crate::geometry::{ArrowEnd, BindingGeometry, Point};
use crate::ids::{IdAllocator, IdGenerator};
use crate::ir::{Node, OrgChartData, Relationship};
use crate::label::node_label_text;
use crate::layout::layout;
use crate::scene::{
    Arrowhead, Binding, BoundKind, Element, ElementKind, ElementMetadata, NodeMetadata,
    RelationshipMetadata, Scene, TextAlign, VerticalAlign, normalize_points,
};
use crate::text::measure_wrapped;
use crate::theme::FillStyle;

/// Builds a scene fragment for `data`, ready to merge into a scene whose
/// element ids are `existing_ids`.
///
/// Documents without geometry are laid out first. Each node becomes a
/// rectangle followed by its bound label text, if any; relationships
/// whose endpoints both exist become arrows from the parent's
/// bottom-centre to the child's top-centre and come after all nodes.
pub fn synthesize(
    data: &OrgChartData,
    config: &Config,
    existing_ids: &HashSet<String>,
    ids: &mut dyn IdGenerator,
    geometry: &dyn BindingGeometry,
) -> Scene {
    let resolved = layout(data, &config.layout);
    let mut alloc = IdAllocator::new(existing_ids, ids);
    let mut org_chart = BTreeMap::new();
    let mut elements: Vec<Element> = Vec::with_capacity(resolved.nodes.len() * 2);
    let mut element_index: HashMap<&str, usize> = HashMap::new();

    for node in &resolved.nodes {
        let element_id = alloc.claim(&node.id);
        let mut shape = node_shape(node, &element_id, config);
        org_chart.insert(
            element_id.clone(),
            ElementMetadata::Node(NodeMetadata {
                node_id: element_id.clone(),
                name: node.name.clone(),
                attributes: node.attributes.clone(),
            }),
        );

        let label = node_label_text(&node.name, &node.attributes);
        element_index.insert(node.id.as_str(), elements.len());
        if label.is_empty() {
            elements.push(shape);
            continue;
        }
        let text = bound_label(&mut shape, &label, alloc.fresh(), config);
        elements.push(shape);
        elements.push(text);
    }

    let mut arrows = Vec::new();
    for rel in &resolved.relationships {
        let (Some(&start_idx), Some(&end_idx)) = (
            element_index.get(rel.from.as_str()),
            element_index.get(rel.to.as_str()),
        ) else {
            debug!(relationship = rel.id.as_str(); "skipping relationship with unknown endpoint");
            continue;
        };
        let arrow_id = alloc.claim(&rel.id);
        let arrow = connector(
            &arrow_id,
            &elements[start_idx],
            &elements[end_idx],
            geometry,
        );
        elements[start_idx].add_bound(&arrow_id, BoundKind::Arrow);
        elements[end_idx].add_bound(&arrow_id, BoundKind::Arrow);

        org_chart.insert(
            arrow_id.clone(),
            ElementMetadata::Relationship(relationship_metadata(
                rel,
                &arrow_id,
                &elements[start_idx].id,
                &elements[end_idx].id,
            )),
        );
        arrows.push(arrow);
    }

    debug!(
        nodes = element_index.len(),
        arrows = arrows.len();
        "synthesized org chart"
    );
    elements.extend(arrows);
    Scene {
        elements,
        org_chart,
    }
}

fn node_shape(node: &Node, id: &str, config: &Config) -> Element {
    let mut shape = Element::styled(id, ElementKind::Rectangle, &config.style);
    shape.x = node.x;
    shape.y = node.y;
    shape.width = node.width;
    shape.height = node.height;
    shape
}

/// A new text element bound inside `container` and registered in its
/// bound elements.
pub(crate) fn bound_label(
    container: &mut Element,
    label: &str,
    id: String,
    config: &Config,
) -> Element {
    let mut text = Element::styled(id, ElementKind::Text, &config.style);
    text.stroke_color = container.stroke_color.clone();
    text.background_color = "transparent".to_string();
    text.text_align = TextAlign::Center;
    text.vertical_align = VerticalAlign::Middle;
    text.container_id = Some(container.id.clone());
    fit_label(&mut text, container, label, config);
    container.add_bound(&text.id, BoundKind::Text);
    text
}

/// Sets `text` to `label`, wrapped to the container's inner width and
/// centred inside it. The unwrapped label is kept in `original_text`.
pub(crate) fn fit_label(text: &mut Element, container: &Element, label: &str, config: &Config) {
    let padding = config.layout.label_padding;
    let line_height = config.layout.label_line_height;
    let max_width = (container.width - padding * 2.0).max(0.0);
    let block = measure_wrapped(label, text.font_size, line_height, Some(max_width));

    text.text = block.text();
    text.original_text = label.to_string();
    text.width = block.width;
    text.height = block.height;
    text.line_height = line_height;
    text.x = container.x + (container.width - block.width) / 2.0;
    text.y = container.y + (container.height - block.height) / 2.0;
}

/// Straight arrow bound from `start`'s bottom-centre to `end`'s top-centre.
pub(crate) fn connector(
    id: &str,
    start: &Element,
    end: &Element,
    geometry: &dyn BindingGeometry,
) -> Element {
    let from = start.bounds().bottom_center();
    let to = end.bounds().top_center();

    let mut arrow = Element::new(id, ElementKind::Arrow);
    arrow.inherit_style(start);
    arrow.background_color = "transparent".to_string();
    arrow.fill_style = FillStyle::Solid;
    arrow.rounded = false;
    arrow.x = from.x;
    arrow.y = from.y;
    arrow.points = vec![Point::ORIGIN, Point::new(to.x - from.x, to.y - from.y)];
    arrow.end_arrowhead = Some(Arrowhead::Arrow);

    let start_binding = Binding {
        element_id: start.id.clone(),
        fixed_point: geometry.fixed_point(&arrow, start, from),
    };
    let end_binding = Binding {
        element_id: end.id.clone(),
        fixed_point: geometry.fixed_point(&arrow, end, to),
    };
    let first = geometry
        .bound_point(&arrow, ArrowEnd::Start, &start_binding, start)
        .unwrap_or(arrow.points[0]);
    let last = geometry
        .bound_point(&arrow, ArrowEnd::End, &end_binding, end)
        .unwrap_or(arrow.points[1]);
    arrow.points = vec![first, last];
    arrow.start_binding = Some(start_binding);
    arrow.end_binding = Some(end_binding);
    normalize_points(&mut arrow);
    arrow
}

fn relationship_metadata(
    rel: &Relationship,
    arrow_id: &str,
    from: &str,
    to: &str,
) -> RelationshipMetadata {
    RelationshipMetadata {
        rel_id: arrow_id.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        label: rel.label.clone(),
        cardinality: rel.cardinality.clone(),
        attributes: rel.attributes.clone(),
    }
}
