//! Coordinate assignment.
//!
//! Ranks become rows: every node of a rank is centered on the rank's baseline, and rows are
//! `rank_separation` apart. Horizontal coordinates come from Brandes–Köpf ([`bk`]). Both run
//! on the non-compound view of the graph; subgraph boxes are derived later from their border
//! nodes.

pub mod bk;

use crate::LayoutGraph;
use crate::util::{as_non_compound_graph, build_layer_matrix};

pub fn position(g: &mut LayoutGraph) {
    let mut flat = as_non_compound_graph(g);
    position_y(&mut flat);
    let xs = bk::position_x(&flat);

    flat.for_each_node(|v, label| {
        if let Some(node) = g.node_mut(v) {
            node.y = label.y;
            if let Some(&x) = xs.get(v) {
                node.x = Some(x);
            }
        }
    });
}

pub fn position_y(g: &mut LayoutGraph) {
    let rank_sep = g.graph().rank_separation;
    let mut prev_y = 0.0;
    for layer in build_layer_matrix(g) {
        let max_height = layer
            .iter()
            .filter_map(|v| g.node(v))
            .fold(0.0_f64, |acc, n| acc.max(n.height));
        for v in &layer {
            if let Some(node) = g.node_mut(v) {
                node.y = Some(prev_y + max_height / 2.0);
            }
        }
        prev_y += max_height + rank_sep;
    }
}
