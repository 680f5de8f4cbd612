use crate::graphlib::alg;
use crate::LayoutGraph;
use crate::util::max_rank;

/// Initial order: a depth-first walk over successors, seeded with the leaf nodes sorted by
/// rank. Each node is appended to its rank as it is reached, which keeps connected nodes
/// close together from the start.
pub fn init_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut simple: Vec<(&str, i32)> = g
        .nodes()
        .filter(|v| g.children(v).is_empty())
        .filter_map(|v| Some((v, g.node(v)?.rank?)))
        .collect();
    let Some(max) = max_rank(g) else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<String>> = vec![Vec::new(); (max.max(0) + 1) as usize];

    simple.sort_by_key(|&(_, rank)| rank);
    let seeds: Vec<&str> = simple.into_iter().map(|(v, _)| v).collect();
    for v in alg::preorder(g, &seeds) {
        if !g.children(v).is_empty() {
            continue;
        }
        let Some(rank) = g.node(v).and_then(|n| n.rank) else {
            continue;
        };
        if let Some(layer) = layers.get_mut(rank.max(0) as usize) {
            layer.push(v.to_string());
        }
    }
    layers
}
