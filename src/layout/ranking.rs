use std::collections::{HashMap, HashSet, VecDeque};

use log::trace;

/// Row index for every node in `node_ids`: the fewest hops from any root,
/// where roots are nodes without incoming edges inside the subset.
///
/// Edges with an endpoint outside the subset are ignored. When the subset
/// has no root at all (a pure cycle) every node sits at depth 0. Nodes no
/// root reaches also default to 0. Longer paths never push a node down, so
/// cycles are tolerated.
pub fn compute_depths<'a, E>(node_ids: &[&'a str], edges: E) -> HashMap<String, usize>
where
    E: IntoIterator<Item = (&'a str, &'a str)>,
{
    let set: HashSet<&str> = node_ids.iter().copied().collect();
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut incoming: HashMap<&str, usize> = HashMap::new();

    for (from, to) in edges {
        if set.contains(from) && set.contains(to) {
            adj.entry(from).or_default().push(to);
            *incoming.entry(to).or_default() += 1;
        }
    }

    let mut depths: HashMap<String, usize> = HashMap::new();
    let roots: Vec<&str> = node_ids
        .iter()
        .copied()
        .filter(|id| !incoming.contains_key(id))
        .collect();

    if roots.is_empty() {
        trace!(nodes = node_ids.len(); "no root found, leveling skipped");
        for id in node_ids {
            depths.insert(id.to_string(), 0);
        }
        return depths;
    }

    let mut best: HashMap<&str, usize> = HashMap::new();
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
    for root in roots {
        best.insert(root, 0);
        queue.push_back((root, 0));
    }

    while let Some((id, depth)) = queue.pop_front() {
        let Some(children) = adj.get(id) else {
            continue;
        };
        let next_depth = depth + 1;
        for &child in children {
            let shorter = best.get(child).is_none_or(|&existing| next_depth < existing);
            if shorter {
                best.insert(child, next_depth);
                queue.push_back((child, next_depth));
            }
        }
    }

    for id in node_ids {
        let depth = best.get(id).copied().unwrap_or(0);
        depths.insert(id.to_string(), depth);
    }
    depths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depths(nodes: &[&str], edges: &[(&str, &str)]) -> HashMap<String, usize> {
        compute_depths(nodes, edges.iter().copied())
    }

    #[test]
    fn chain_levels_by_distance() {
        let result = depths(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert_eq!(result["a"], 0);
        assert_eq!(result["b"], 1);
        assert_eq!(result["c"], 2);
    }

    #[test]
    fn pure_cycle_stays_flat() {
        let result = depths(&["a", "b"], &[("a", "b"), ("b", "a")]);
        assert_eq!(result["a"], 0);
        assert_eq!(result["b"], 0);
    }

    #[test]
    fn shortest_path_wins_over_longer_one() {
        let result = depths(
            &["root", "mid", "leaf"],
            &[("root", "mid"), ("mid", "leaf"), ("root", "leaf")],
        );
        assert_eq!(result["leaf"], 1);
    }

    #[test]
    fn cycle_below_root_is_leveled() {
        let result = depths(
            &["r", "x", "y"],
            &[("r", "x"), ("x", "y"), ("y", "x")],
        );
        assert_eq!(result["r"], 0);
        assert_eq!(result["x"], 1);
        assert_eq!(result["y"], 2);
    }

    #[test]
    fn unreachable_cycle_defaults_to_zero() {
        let result = depths(
            &["r", "c1", "c2"],
            &[("c1", "c2"), ("c2", "c1")],
        );
        assert_eq!(result["r"], 0);
        assert_eq!(result["c1"], 0);
        assert_eq!(result["c2"], 0);
    }

    #[test]
    fn edges_outside_subset_are_ignored() {
        let result = depths(&["b", "c"], &[("a", "b"), ("b", "c")]);
        assert_eq!(result["b"], 0);
        assert_eq!(result["c"], 1);
    }

    #[test]
    fn multiple_roots_level_together() {
        let result = depths(
            &["a", "b", "c", "d"],
            &[("a", "c"), ("b", "d"), ("c", "d")],
        );
        assert_eq!(result["d"], 1);
        assert_eq!(result["c"], 1);
    }
}
