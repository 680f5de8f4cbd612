use crate::graphlib::{Graph, GraphOptions};
use crate::util::{mutated, unique_id};
use crate::LayoutGraph;

/// Which neighbors of a rank feed its barycenters: the rank above (`InEdges`) or the rank
/// below (`OutEdges`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    InEdges,
    OutEdges,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerNode {
    pub order: Option<usize>,
    /// Border nodes of a subgraph on this rank.
    pub border_left: Option<String>,
    pub border_right: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerEdge {
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerGraphLabel {
    pub root: String,
}

/// Compound graph of one rank. Every edge points towards the rank's nodes, so their
/// barycenters always come from `in_edges`.
pub type LayerGraph = Graph<LayerNode, LayerEdge, LayerGraphLabel>;

/// Builds the layer graph of `rank`: its nodes and the subgraphs spanning it, nested as in
/// `g` under a fresh root, plus the neighbors on the adjacent rank named by `relationship`.
/// Weights of parallel edges are summed.
///
/// `nodes` restricts the candidates; `None` scans the whole graph.
pub fn build_layer_graph(
    g: &LayoutGraph,
    rank: i32,
    relationship: Relationship,
    nodes: Option<&[String]>,
) -> LayerGraph {
    let mut root = unique_id("_root");
    while g.has_node(&root) {
        root = unique_id("_root");
    }

    let mut result: LayerGraph = Graph::new(GraphOptions {
        compound: true,
        ..Default::default()
    });
    result.set_graph(LayerGraphLabel { root: root.clone() });
    result.set_node(root.clone(), LayerNode::default());

    let all;
    let nodes = match nodes {
        Some(nodes) => nodes,
        None => {
            all = g.node_ids();
            &all
        }
    };

    for v in nodes {
        let Some(node) = g.node(v) else {
            continue;
        };
        let spans = matches!((node.min_rank, node.max_rank), (Some(min), Some(max)) if min <= rank && rank <= max);
        if node.rank != Some(rank) && !spans {
            continue;
        }

        result.set_node(v.clone(), layer_node(g, v));
        let parent = g.parent(v).unwrap_or(&root).to_string();
        mutated(result.set_parent(v.clone(), parent));

        let edges = match relationship {
            Relationship::InEdges => g.in_edges(v, None),
            Relationship::OutEdges => g.out_edges(v, None),
        }
        .unwrap_or_default();
        for e in edges {
            let u = if e.v == *v { &e.w } else { &e.v };
            if !result.has_node(u) {
                result.set_node(u.clone(), layer_node(g, u));
            }
            let weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
            let existing = result.edge(u, v, None).map_or(0.0, |l| l.weight);
            result.set_edge_with_label(
                u.clone(),
                v.clone(),
                LayerEdge {
                    weight: weight + existing,
                },
            );
        }

        if node.min_rank.is_some() {
            let border = |side: &Vec<Option<String>>| side.get(rank as usize).cloned().flatten();
            result.set_node(
                v.clone(),
                LayerNode {
                    order: None,
                    border_left: border(&node.border_left),
                    border_right: border(&node.border_right),
                },
            );
        }
    }
    result
}

fn layer_node(g: &LayoutGraph, v: &str) -> LayerNode {
    LayerNode {
        order: g.node(v).and_then(|n| n.order),
        ..Default::default()
    }
}
