//! Crossing reduction.
//!
//! Starting from a depth-first initial order, ranks are swept alternately upwards and
//! downwards. Each sweep sorts every rank by the barycenters of its neighbors on the rank just
//! visited, keeping subgraphs contiguous. Tie-breaking flips between left and right bias every
//! two sweeps. Sweeping stops after four sweeps in a row without improving the best crossing
//! count, and the best order seen, the initial one included, is kept.

mod barycenter;
mod constraints;
mod cross_count;
mod init_order;
mod layer_graph;
mod resolve_conflicts;
mod sort;
mod sort_subgraph;

pub use barycenter::{BarycenterEntry, barycenter};
pub use constraints::add_subgraph_constraints;
pub use cross_count::cross_count;
pub use init_order::init_order;
pub use layer_graph::{
    LayerEdge, LayerGraph, LayerGraphLabel, LayerNode, Relationship, build_layer_graph,
};
pub use resolve_conflicts::{ConstraintGraph, ResolvedEntry, resolve_conflicts};
pub use sort::{SortResult, sort};
pub use sort_subgraph::sort_subgraph;

use crate::LayoutGraph;
use crate::graphlib::{Graph, GraphOptions};
use crate::util::{build_layer_matrix, max_rank};
use std::collections::BTreeMap;

/// Consecutive non-improving sweeps before giving up.
const MAX_STALE_SWEEPS: usize = 4;

pub fn order(g: &mut LayoutGraph) {
    let Some(max_rank) = max_rank(g) else {
        return;
    };
    let nodes_by_rank = nodes_by_rank(g);

    let layering = init_order(g);
    assign_order(g, &layering);

    let mut best_cc = cross_count(g, &layering);
    let mut best = layering;

    let mut i = 0;
    let mut last_best = 0;
    while last_best < MAX_STALE_SWEEPS {
        let bias_right = i % 4 >= 2;
        if i % 2 == 1 {
            let ranks: Vec<i32> = (1..=max_rank).collect();
            sweep(g, &nodes_by_rank, &ranks, Relationship::InEdges, bias_right);
        } else {
            let ranks: Vec<i32> = (0..max_rank).rev().collect();
            sweep(g, &nodes_by_rank, &ranks, Relationship::OutEdges, bias_right);
        }

        let layering = build_layer_matrix(g);
        let cc = cross_count(g, &layering);
        if cc < best_cc {
            last_best = 0;
            best_cc = cc;
            best = layering;
        }

        i += 1;
        last_best += 1;
    }

    tracing::trace!(sweeps = i, crossings = best_cc, "order settled");
    assign_order(g, &best);
}

/// Nodes of every rank, including subgraphs that span it.
fn nodes_by_rank(g: &LayoutGraph) -> BTreeMap<i32, Vec<String>> {
    let mut out: BTreeMap<i32, Vec<String>> = BTreeMap::new();
    g.for_each_node(|v, node| {
        if let Some(rank) = node.rank {
            out.entry(rank).or_default().push(v.to_string());
        }
        if let (Some(min), Some(max)) = (node.min_rank, node.max_rank) {
            for r in min..=max {
                if node.rank != Some(r) {
                    out.entry(r).or_default().push(v.to_string());
                }
            }
        }
    });
    out
}

fn assign_order(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    for layer in layering {
        for (i, v) in layer.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(i);
            }
        }
    }
}

fn sweep(
    g: &mut LayoutGraph,
    nodes_by_rank: &BTreeMap<i32, Vec<String>>,
    ranks: &[i32],
    relationship: Relationship,
    bias_right: bool,
) {
    let mut cg: ConstraintGraph = Graph::new(GraphOptions::default());
    for &rank in ranks {
        let nodes = nodes_by_rank.get(&rank).map_or(&[][..], Vec::as_slice);
        let lg = build_layer_graph(g, rank, relationship, Some(nodes));
        let root = lg.graph().root.clone();

        let sorted = sort_subgraph(&lg, &root, &cg, bias_right);
        for (i, v) in sorted.vs.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(i);
            }
        }
        add_subgraph_constraints(&lg, &mut cg, &sorted.vs);
    }
}
