//! Self-loops are taken out before ranking, come back as dummy nodes next to their owner
//! once the order is known, and are routed around the owner after positioning.

use crate::util::{add_dummy_node, build_layer_matrix, mutated};
use crate::{LayoutGraph, NodeKind, NodeLabel, Point, SelfEdge};

pub fn remove_self_edges(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        if e.v != e.w {
            continue;
        }
        let Some(label) = g.edge_by_key(&e).cloned() else {
            continue;
        };
        g.remove_edge_key(&e);
        if let Some(node) = g.node_mut(&e.v) {
            node.self_edges.push(SelfEdge { edge: e, label });
        }
    }
}

/// Places one dummy per stashed self-loop right after its owner, shifting the rest of the
/// layer to the right.
pub fn insert_self_edges(g: &mut LayoutGraph) {
    for layer in build_layer_matrix(g) {
        let mut shift = 0;
        for (i, v) in layer.iter().enumerate() {
            let Some(node) = g.node_mut(v) else {
                continue;
            };
            node.order = Some(i + shift);
            let rank = node.rank;
            let self_edges = std::mem::take(&mut node.self_edges);

            for SelfEdge { edge, label } in self_edges {
                shift += 1;
                let dummy = NodeLabel {
                    width: label.width,
                    height: label.height,
                    rank,
                    order: Some(i + shift),
                    ..Default::default()
                };
                add_dummy_node(
                    g,
                    NodeKind::SelfEdge {
                        edge,
                        label: Box::new(label),
                    },
                    dummy,
                    "_se",
                );
            }
        }
    }
}

/// Replaces every self-loop dummy by its edge, routed as a loop on the right side of the
/// owner.
pub fn position_self_edges(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        let Some(node) = g.node(&v) else {
            continue;
        };
        let NodeKind::SelfEdge { edge, label } = &node.kind else {
            continue;
        };
        let Some(owner) = g.node(&edge.v) else {
            continue;
        };
        let (node_x, node_y) = (node.x.unwrap_or(0.0), node.y.unwrap_or(0.0));
        let x = owner.x.unwrap_or(0.0) + owner.width / 2.0;
        let y = owner.y.unwrap_or(0.0);
        let dx = node_x - x;
        let dy = owner.height / 2.0;

        let edge = edge.clone();
        let mut label = (**label).clone();
        label.points = vec![
            Point { x: x + 2.0 * dx / 3.0, y: y - dy },
            Point { x: x + 5.0 * dx / 6.0, y: y - dy },
            Point { x: x + dx, y },
            Point { x: x + 5.0 * dx / 6.0, y: y + dy },
            Point { x: x + 2.0 * dx / 3.0, y: y + dy },
        ];
        label.x = Some(node_x);
        label.y = Some(node_y);

        g.remove_node(&v);
        mutated(g.set_edge_key(edge, label));
    }
}
