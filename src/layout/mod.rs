//! Depth leveling and row packing for org charts.

mod ranking;
mod rows;

pub use ranking::compute_depths;
pub use rows::{LayoutBox, RowPlacement, pack_rows};

use log::debug;

use crate::config::LayoutConfig;
use crate::ir::{Node, OrgChartData};

/// Resolves geometry for every node of `data`.
///
/// A document without any node geometry gets a fresh layout: default node
/// size, one row per depth, rows centred on x = 0 starting at y = 0, nodes
/// in insertion order. A document that already carries geometry is kept
/// as is, except that non-positive sizes fall back to the default size.
pub fn layout(data: &OrgChartData, config: &LayoutConfig) -> OrgChartData {
    let mut out = data.clone();
    if !data.needs_layout() {
        for node in &mut out.nodes {
            floor_size(node, config);
        }
        return out;
    }

    let node_ids: Vec<&str> = data.nodes.iter().map(|node| node.id.as_str()).collect();
    let edges = data
        .relationships
        .iter()
        .map(|rel| (rel.from.as_str(), rel.to.as_str()));
    let depths = compute_depths(&node_ids, edges);

    let boxes: Vec<LayoutBox> = data
        .nodes
        .iter()
        .map(|node| LayoutBox {
            x: 0.0,
            width: config.node_width,
            height: config.node_height,
            depth: depths.get(&node.id).copied().unwrap_or(0),
        })
        .collect();
    let positions = pack_rows(&boxes, RowPlacement::fresh(), config);

    for ((node, layout_box), position) in out.nodes.iter_mut().zip(&boxes).zip(positions) {
        node.x = position.x;
        node.y = position.y;
        node.width = layout_box.width;
        node.height = layout_box.height;
    }
    debug!(
        nodes = out.nodes.len(),
        rows = depths.values().max().map_or(0, |max| max + 1);
        "laid out org chart"
    );
    out
}

fn floor_size(node: &mut Node, config: &LayoutConfig) {
    if node.width <= 0.0 {
        node.width = config.node_width;
    }
    if node.height <= 0.0 {
        node.height = config.node_height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Relationship;

    fn chart(nodes: &[&str], edges: &[(&str, &str)]) -> OrgChartData {
        OrgChartData::new(
            nodes.iter().map(|id| Node::new(*id, *id)).collect(),
            edges
                .iter()
                .map(|(from, to)| Relationship::new(format!("{from}->{to}"), *from, *to))
                .collect(),
        )
    }

    #[test]
    fn tree_is_laid_out_in_rows() {
        let data = chart(&["ceo", "cto", "cfo"], &[("ceo", "cto"), ("ceo", "cfo")]);
        let laid_out = layout(&data, &LayoutConfig::default());
        let ceo = &laid_out.nodes[0];
        let cto = &laid_out.nodes[1];
        let cfo = &laid_out.nodes[2];
        assert_eq!((ceo.x, ceo.y), (-100.0, 0.0));
        assert_eq!((ceo.width, ceo.height), (200.0, 100.0));
        assert_eq!(cto.y, 180.0);
        assert_eq!(cfo.y, 180.0);
        assert_eq!(cto.x, -220.0);
        assert_eq!(cfo.x, 20.0);
    }

    #[test]
    fn positioned_document_is_passed_through() {
        let mut data = chart(&["a", "b"], &[("a", "b")]);
        data.nodes[0].x = 37.0;
        data.nodes[0].y = -12.0;
        data.nodes[0].width = 150.0;
        let laid_out = layout(&data, &LayoutConfig::default());
        assert_eq!(laid_out.nodes[0].x, 37.0);
        assert_eq!(laid_out.nodes[0].y, -12.0);
        assert_eq!(laid_out.nodes[0].width, 150.0);
        assert_eq!(laid_out.nodes[0].height, 100.0);
        assert_eq!((laid_out.nodes[1].x, laid_out.nodes[1].y), (0.0, 0.0));
        assert_eq!(laid_out.nodes[1].width, 200.0);
    }

    #[test]
    fn cycle_lands_on_a_single_row() {
        let data = chart(&["a", "b"], &[("a", "b"), ("b", "a")]);
        let laid_out = layout(&data, &LayoutConfig::default());
        assert!(laid_out.nodes.iter().all(|node| node.y == 0.0));
        assert_eq!(laid_out.nodes[1].x - laid_out.nodes[0].x, 240.0);
    }

    #[test]
    fn layout_is_idempotent_on_its_output() {
        let data = chart(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let once = layout(&data, &LayoutConfig::default());
        let twice = layout(&once, &LayoutConfig::default());
        assert_eq!(once, twice);
    }
}
