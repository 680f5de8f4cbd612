//! Left and right border nodes for every rank a subgraph spans.
//!
//! The nodes on each side are chained top to bottom, so ordering keeps them at the edges of
//! the subgraph and positioning can read the subgraph's horizontal extent from them.

use crate::util::{add_border_node, mutated};
use crate::{BorderSide, EdgeLabel, LayoutGraph};

pub fn add_border_segments(g: &mut LayoutGraph) {
    let roots: Vec<String> = g.children_root().into_iter().map(str::to_string).collect();
    for root in roots {
        // Children first; the child list is taken before any border node joins it.
        let mut stack: Vec<(String, Vec<String>, usize)> = vec![(root.clone(), owned_children(g, &root), 0)];
        while let Some((_, children, next)) = stack.last_mut() {
            if let Some(child) = children.get(*next).cloned() {
                *next += 1;
                let grandchildren = owned_children(g, &child);
                stack.push((child, grandchildren, 0));
                continue;
            }
            if let Some((v, _, _)) = stack.pop() {
                add_segments(g, &v);
            }
        }
    }
}

fn owned_children(g: &LayoutGraph, v: &str) -> Vec<String> {
    g.children(v).into_iter().map(str::to_string).collect()
}

fn add_segments(g: &mut LayoutGraph, v: &str) {
    let Some((min_rank, max_rank)) = g.node(v).and_then(|n| Some((n.min_rank?, n.max_rank?))) else {
        return;
    };
    let len = (max_rank.max(0) + 1) as usize;
    if let Some(n) = g.node_mut(v) {
        n.border_left = vec![None; len];
        n.border_right = vec![None; len];
    }
    for rank in min_rank.max(0)..=max_rank {
        add_segment_node(g, v, BorderSide::Left, "_bl", rank);
        add_segment_node(g, v, BorderSide::Right, "_br", rank);
    }
}

fn add_segment_node(g: &mut LayoutGraph, sg: &str, side: BorderSide, prefix: &str, rank: i32) {
    let ix = rank as usize;
    let side_of = |n: &crate::NodeLabel| -> Option<String> {
        let nodes = match side {
            BorderSide::Left => &n.border_left,
            _ => &n.border_right,
        };
        ix.checked_sub(1).and_then(|p| nodes.get(p).cloned().flatten())
    };
    let prev = g.node(sg).and_then(side_of);

    let curr = add_border_node(g, side, prefix, Some(rank));
    if let Some(n) = g.node_mut(sg) {
        let nodes = match side {
            BorderSide::Left => &mut n.border_left,
            _ => &mut n.border_right,
        };
        if let Some(slot) = nodes.get_mut(ix) {
            *slot = Some(curr.clone());
        }
    }
    mutated(g.set_parent(curr.clone(), sg));
    if let Some(prev) = prev {
        g.set_edge_with_label(prev, curr, EdgeLabel::with_weight(1.0, 1));
    }
}
