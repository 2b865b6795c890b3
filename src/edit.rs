//! Editing operations on org chart shapes already in a scene.

use std::collections::HashSet;

use log::debug;

use crate::attribute::parse_attributes;
use crate::config::{Config, LayoutConfig};
use crate::geometry::BindingGeometry;
use crate::ids::{IdAllocator, IdGenerator};
use crate::ir::Attribute;
use crate::label::node_label_text;
use crate::layout::{LayoutBox, RowPlacement, compute_depths, pack_rows};
use crate::scene::{BoundKind, Element, ElementKind, ElementMetadata, NodeMetadata, Scene};
use crate::synthesize::{bound_label, connector, fit_label};

const FALLBACK_NODE_NAME: &str = "Node";

/// The single node a selection points at: one bindable shape, or a
/// container together with its own label text.
pub fn selected_node<S: AsRef<str>>(scene: &Scene, selection: &[S]) -> Option<String> {
    let selected: Vec<&Element> = selection
        .iter()
        .filter_map(|id| scene.get(id.as_ref()))
        .collect();
    match selected.as_slice() {
        [only] if only.is_bindable() => Some(only.id.clone()),
        [first, second] => [(first, second), (second, first)]
            .into_iter()
            .find(|(container, label)| {
                container.is_bindable()
                    && label.container_id.as_deref() == Some(container.id.as_str())
                    && scene
                        .bound_text(container)
                        .is_some_and(|text| text.id == label.id)
            })
            .map(|(container, _)| container.id.clone()),
        _ => None,
    }
}

/// Re-levels the selected shapes into centred rows.
///
/// Depths come from arrows whose both ends are selected. Rows start at the
/// top of the selection and are centred on its horizontal centre; within a
/// row shapes keep their left-to-right order. Bound labels move with their
/// shapes and every arrow attached to a moved shape is re-routed. Returns
/// the arranged ids, or `None` when fewer than two shapes are selected.
pub fn arrange_selection<S: AsRef<str>>(
    scene: &mut Scene,
    selection: &[S],
    config: &LayoutConfig,
    geometry: &dyn BindingGeometry,
) -> Option<Vec<String>> {
    let selected: HashSet<&str> = selection.iter().map(AsRef::as_ref).collect();
    let shapes: Vec<&Element> = scene
        .non_deleted()
        .filter(|element| selected.contains(element.id.as_str()) && element.is_bindable())
        .collect();
    if shapes.len() < 2 {
        return None;
    }

    let ids: Vec<String> = shapes.iter().map(|shape| shape.id.clone()).collect();
    let bounds = scene.common_bounds(ids.iter().map(String::as_str))?;
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let edges = scene
        .non_deleted()
        .filter(|element| element.is_arrow())
        .filter_map(|arrow| {
            let start = arrow.start_binding.as_ref()?;
            let end = arrow.end_binding.as_ref()?;
            Some((start.element_id.as_str(), end.element_id.as_str()))
        });
    let depths = compute_depths(&id_refs, edges);

    let boxes: Vec<LayoutBox> = shapes
        .iter()
        .map(|shape| LayoutBox {
            x: shape.x,
            width: shape.width,
            height: shape.height,
            depth: depths.get(&shape.id).copied().unwrap_or(0),
        })
        .collect();
    let placement = RowPlacement {
        center_x: bounds.center_x(),
        top_y: bounds.min_y,
        sort_by_x: true,
    };
    let positions = pack_rows(&boxes, placement, config);

    for (id, position) in ids.iter().zip(positions) {
        move_shape(scene, id, position.x, position.y);
    }
    let moved: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let arrows: Vec<String> = scene
        .non_deleted()
        .filter(|element| element.is_arrow())
        .filter(|arrow| {
            [&arrow.start_binding, &arrow.end_binding]
                .into_iter()
                .flatten()
                .any(|binding| moved.contains(binding.element_id.as_str()))
        })
        .map(|arrow| arrow.id.clone())
        .collect();
    for arrow_id in &arrows {
        scene.rebind_arrow(arrow_id, geometry);
    }

    debug!(shapes = ids.len(), arrows = arrows.len(); "arranged selection");
    Some(ids)
}

/// Moves a shape and its bound label text together.
fn move_shape(scene: &mut Scene, id: &str, x: f64, y: f64) {
    let Some(shape) = scene.get_mut(id) else {
        return;
    };
    let (dx, dy) = (x - shape.x, y - shape.y);
    shape.x = x;
    shape.y = y;
    let texts: Vec<String> = shape
        .bound_elements
        .iter()
        .filter(|bound| bound.kind == BoundKind::Text)
        .map(|bound| bound.id.clone())
        .collect();
    for text_id in texts {
        if let Some(text) = scene.get_mut(&text_id) {
            text.x += dx;
            text.y += dy;
        }
    }
}

/// Adds a child shape below `parent_id`, linked by a bound arrow.
///
/// The child copies the parent's kind when it is a rectangle, diamond or
/// ellipse and is a rectangle otherwise. It is at least the configured
/// minimum size, centred under the parent one child gap below it.
/// Returns the new `(child, arrow)` ids, or `None` when the parent is not
/// a bindable shape.
pub fn add_child(
    scene: &mut Scene,
    parent_id: &str,
    config: &Config,
    ids: &mut dyn IdGenerator,
    geometry: &dyn BindingGeometry,
) -> Option<(String, String)> {
    let parent = scene
        .get(parent_id)
        .filter(|element| element.is_bindable())?
        .clone();
    let kind = match parent.kind {
        ElementKind::Rectangle | ElementKind::Diamond | ElementKind::Ellipse => parent.kind,
        _ => ElementKind::Rectangle,
    };

    let mut alloc = IdAllocator::new(&scene.element_ids(), ids);
    let child_id = alloc.fresh();
    let arrow_id = alloc.fresh();

    let layout = &config.layout;
    let bounds = parent.bounds();
    let mut child = Element::styled(child_id.clone(), kind, &config.style);
    child.inherit_style(&parent);
    child.width = layout.child_min_width.max(parent.width);
    child.height = layout.child_min_height.max(parent.height);
    child.x = bounds.center_x() - child.width / 2.0;
    child.y = bounds.max_y + layout.child_gap;

    let arrow = connector(&arrow_id, &parent, &child, geometry);
    child.add_bound(&arrow_id, BoundKind::Arrow);
    if let Some(parent) = scene.get_mut(parent_id) {
        parent.add_bound(&arrow_id, BoundKind::Arrow);
    }
    scene.elements.push(child);
    scene.elements.push(arrow);

    debug!(parent = parent_id, child = child_id.as_str(); "added child node");
    Some((child_id, arrow_id))
}

/// Renames the node behind `element_id` and refreshes its label. An empty
/// name is ignored. Returns whether the scene changed.
pub fn set_node_label(
    scene: &mut Scene,
    element_id: &str,
    name: &str,
    config: &Config,
    ids: &mut dyn IdGenerator,
) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return false;
    }
    let Some(container) = scene.get(element_id).filter(|element| element.is_bindable()) else {
        return false;
    };
    let existing = scene.node_metadata(element_id);
    let metadata = NodeMetadata {
        node_id: stored_node_id(existing, &container.id),
        name: name.to_string(),
        attributes: existing
            .map(|meta| meta.attributes.clone())
            .unwrap_or_default(),
    };
    apply_node_metadata(scene, element_id, metadata, config, ids);
    true
}

/// Replaces the attributes of the node behind `element_id` with those
/// parsed from `text` (`name=value#color; ...`) and refreshes its label.
/// Returns whether the scene changed.
pub fn set_node_attributes(
    scene: &mut Scene,
    element_id: &str,
    text: &str,
    config: &Config,
    ids: &mut dyn IdGenerator,
) -> bool {
    let attributes: Vec<Attribute> = parse_attributes(text, ids);
    let Some(container) = scene.get(element_id).filter(|element| element.is_bindable()) else {
        return false;
    };
    let existing = scene.node_metadata(element_id);
    let name = existing
        .map(|meta| meta.name.as_str())
        .filter(|name| !name.is_empty())
        .or_else(|| scene.label_text(container))
        .unwrap_or(FALLBACK_NODE_NAME)
        .to_string();
    let metadata = NodeMetadata {
        node_id: stored_node_id(existing, &container.id),
        name,
        attributes,
    };
    apply_node_metadata(scene, element_id, metadata, config, ids);
    true
}

fn stored_node_id(existing: Option<&NodeMetadata>, element_id: &str) -> String {
    existing
        .map(|meta| meta.node_id.as_str())
        .filter(|id| !id.is_empty())
        .unwrap_or(element_id)
        .to_string()
}

fn apply_node_metadata(
    scene: &mut Scene,
    element_id: &str,
    metadata: NodeMetadata,
    config: &Config,
    ids: &mut dyn IdGenerator,
) {
    let label = node_label_text(&metadata.name, &metadata.attributes);
    scene.set_metadata(element_id, ElementMetadata::Node(metadata));
    refresh_label(scene, element_id, &label, config, ids);
}

/// Rewrites the bound label of a container, creating one right after the
/// container when it has none.
fn refresh_label(
    scene: &mut Scene,
    container_id: &str,
    label: &str,
    config: &Config,
    ids: &mut dyn IdGenerator,
) {
    let Some(container) = scene.get(container_id).cloned() else {
        return;
    };
    if let Some(text_id) = scene.bound_text(&container).map(|text| text.id.clone()) {
        if let Some(text) = scene.get_mut(&text_id) {
            fit_label(text, &container, label, config);
        }
        return;
    }
    if label.is_empty() {
        return;
    }

    let text_id = IdAllocator::new(&scene.element_ids(), ids).fresh();
    let Some(index) = scene
        .elements
        .iter()
        .position(|element| !element.is_deleted && element.id == container_id)
    else {
        return;
    };
    let text = bound_label(&mut scene.elements[index], label, text_id, config);
    scene.elements.insert(index + 1, text);
}
