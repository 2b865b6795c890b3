use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::ir::{Node, OrgChartData, Relationship};
use crate::scene::{Element, Scene};

const FALLBACK_NODE_NAME: &str = "Node";

/// Derives the org chart model from a scene.
///
/// Nodes come from the bindable shapes in `selection` when it holds at least
/// one, otherwise from every bindable shape. Relationships come from every
/// arrow in the scene whose two bound ends both resolve to accepted nodes;
/// self-loops are skipped.
pub fn extract<S: AsRef<str>>(scene: &Scene, selection: &[S]) -> OrgChartData {
    let selected: HashSet<&str> = selection.iter().map(AsRef::as_ref).collect();
    let selected_bindable: Vec<&Element> = scene
        .non_deleted()
        .filter(|element| selected.contains(element.id.as_str()) && element.is_bindable())
        .collect();
    let candidates = if selected_bindable.is_empty() {
        scene
            .non_deleted()
            .filter(|element| element.is_bindable())
            .collect()
    } else {
        selected_bindable
    };

    let mut node_id_by_element: HashMap<&str, String> = HashMap::new();
    let mut nodes = Vec::with_capacity(candidates.len());
    for element in candidates {
        let node = extract_node(scene, element);
        node_id_by_element.insert(element.id.as_str(), node.id.clone());
        nodes.push(node);
    }
    let node_ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();

    let mut relationships = Vec::new();
    for arrow in scene.non_deleted().filter(|element| element.is_arrow()) {
        let (Some(start), Some(end)) = (&arrow.start_binding, &arrow.end_binding) else {
            continue;
        };
        let endpoints = node_id_by_element
            .get(start.element_id.as_str())
            .zip(node_id_by_element.get(end.element_id.as_str()));
        let Some((from, to)) = endpoints else {
            trace!(arrow = arrow.id.as_str(); "dropping arrow bound outside the node set");
            continue;
        };
        if !node_ids.contains(from.as_str()) || !node_ids.contains(to.as_str()) {
            continue;
        }
        if from == to {
            trace!(arrow = arrow.id.as_str(); "dropping self-loop");
            continue;
        }
        relationships.push(extract_relationship(scene, arrow, from, to));
    }

    debug!(
        nodes = nodes.len(),
        relationships = relationships.len();
        "extracted org chart"
    );
    OrgChartData::new(nodes, relationships)
}

fn extract_node(scene: &Scene, element: &Element) -> Node {
    let metadata = scene.node_metadata(&element.id);
    let id = non_empty(metadata.map(|meta| meta.node_id.as_str())).unwrap_or(element.id.as_str());
    let name = non_empty(metadata.map(|meta| meta.name.as_str()))
        .or_else(|| scene.label_text(element))
        .unwrap_or(FALLBACK_NODE_NAME);
    Node {
        id: id.to_string(),
        name: name.to_string(),
        x: element.x,
        y: element.y,
        width: element.width,
        height: element.height,
        attributes: metadata
            .map(|meta| meta.attributes.clone())
            .unwrap_or_default(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn extract_relationship(scene: &Scene, arrow: &Element, from: &str, to: &str) -> Relationship {
    let metadata = scene.relationship_metadata(&arrow.id);
    let label = non_empty(metadata.and_then(|meta| meta.label.as_deref()))
        .or_else(|| scene.label_text(arrow));
    Relationship {
        id: non_empty(metadata.map(|meta| meta.rel_id.as_str()))
            .unwrap_or(arrow.id.as_str())
            .to_string(),
        from: non_empty(metadata.map(|meta| meta.from.as_str()))
            .unwrap_or(from)
            .to_string(),
        to: non_empty(metadata.map(|meta| meta.to.as_str()))
            .unwrap_or(to)
            .to_string(),
        label: label.map(str::to_string),
        cardinality: metadata.and_then(|meta| meta.cardinality.clone()),
        attributes: metadata
            .map(|meta| meta.attributes.clone())
            .unwrap_or_default(),
    }
}
