//! Breaks edges that span more than one rank into chains of unit-length edges.
//!
//! Every intermediate rank gets a [`NodeKind::ChainLink`] dummy. The first link of a chain
//! keeps the original edge label and is recorded in `dummy_chains`; the link on the edge's
//! `label_rank` takes the size of the edge label so ordering and positioning reserve room for
//! it. [`undo`] collects the dummy positions as the edge's route and restores the edge.

use crate::graphlib::EdgeKey;
use crate::util::{add_dummy_node, mutated};
use crate::{EdgeLabel, LayoutGraph, NodeKind, NodeLabel, Point};

pub fn run(g: &mut LayoutGraph) {
    g.graph_mut().dummy_chains.clear();
    for e in g.edge_keys() {
        normalize_edge(g, e);
    }
    tracing::trace!(chains = g.graph().dummy_chains.len(), "edges normalized");
}

fn normalize_edge(g: &mut LayoutGraph, e: EdgeKey) {
    let Some(v_rank) = g.node(&e.v).and_then(|n| n.rank) else {
        return;
    };
    let Some(w_rank) = g.node(&e.w).and_then(|n| n.rank) else {
        return;
    };
    // Unit-length edges stay as they are; so do flat and inverted ones, which have no
    // intermediate rank to route through.
    if w_rank <= v_rank + 1 {
        return;
    }
    let Some(mut original) = g.edge_by_key(&e).cloned() else {
        return;
    };
    g.remove_edge_key(&e);
    original.points.clear();

    let weight = original.weight;
    let label_rank = original.label_rank;
    let (label_width, label_height, label_pos) =
        (original.width, original.height, original.label_pos);
    let mut original = Some(Box::new(original));

    let mut prev = e.v.clone();
    for rank in v_rank + 1..w_rank {
        let is_label = label_rank == Some(rank);
        let mut label = NodeLabel {
            rank: Some(rank),
            ..Default::default()
        };
        if is_label {
            label.width = label_width;
            label.height = label_height;
            label.label_pos = Some(label_pos);
        }

        let head = original.is_some();
        let kind = NodeKind::ChainLink {
            edge: e.clone(),
            original: original.take(),
            has_label: is_label,
        };
        let dummy = add_dummy_node(g, kind, label, "_d");
        if head {
            g.graph_mut().dummy_chains.push(dummy.clone());
        }

        mutated(g.set_edge_named(
            prev,
            dummy.clone(),
            e.name.clone(),
            Some(EdgeLabel::with_weight(weight, 1)),
        ));
        prev = dummy;
    }

    mutated(g.set_edge_named(prev, e.w, e.name, Some(EdgeLabel::with_weight(weight, 1))));
}

pub fn undo(g: &mut LayoutGraph) {
    let chains = std::mem::take(&mut g.graph_mut().dummy_chains);
    for head in chains {
        let Some(NodeKind::ChainLink {
            edge,
            original: Some(original),
            ..
        }) = g.node(&head).map(|n| n.kind.clone())
        else {
            continue;
        };
        let mut label = *original;

        let mut v = head;
        loop {
            let Some(node) = g.node(&v) else {
                break;
            };
            let NodeKind::ChainLink { has_label, .. } = node.kind else {
                break;
            };
            let x = node.x.unwrap_or(0.0);
            let y = node.y.unwrap_or(0.0);
            label.points.push(Point { x, y });
            if has_label {
                label.x = Some(x);
                label.y = Some(y);
                label.width = node.width;
                label.height = node.height;
            }

            let next = g
                .successors(&v)
                .and_then(|s| s.first().map(|w| w.to_string()));
            g.remove_node(&v);
            let Some(next) = next else {
                break;
            };
            v = next;
        }

        mutated(g.set_edge_key(edge, label));
    }
}
