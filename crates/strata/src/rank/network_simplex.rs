//! Network simplex ranking (Gansner et al., "A Technique for Drawing Directed Graphs").
//!
//! 1. Collapse multi-edges and rank with longest path.
//! 2. Build a tight spanning tree.
//! 3. Label the tree with low/lim postorder numbers and compute the cut value of every tree
//!    edge.
//! 4. While some tree edge has a negative cut value, replace it with the non-tree edge of
//!    minimum slack that crosses the same cut, then recompute ranks and cut values.

use super::feasible_tree::{TreeEdge, TreeGraph, feasible_tree};
use super::util::{longest_path, slack};
use crate::LayoutGraph;
use crate::graphlib::{EdgeKey, alg};
use crate::util::simplify;
use rustc_hash::FxHashSet as HashSet;

pub fn network_simplex(g: &mut LayoutGraph) {
    let mut simplified = simplify(g);
    longest_path(&mut simplified);
    let mut t = feasible_tree(&mut simplified);
    init_low_lim_values(&mut t, None);
    init_cut_values(&mut t, &simplified);

    let mut exchanges = 0usize;
    while let Some(e) = leave_edge(&t) {
        let Some(f) = enter_edge(&t, &simplified, &e) else {
            break;
        };
        exchange_edges(&mut t, &mut simplified, &e, &f);
        exchanges += 1;
    }
    tracing::trace!(exchanges, "network simplex converged");

    simplified.for_each_node(|v, label| {
        if let Some(node) = g.node_mut(v) {
            node.rank = label.rank;
        }
    });
}

/// Assigns cut values to every tree edge, children before parents.
pub fn init_cut_values(t: &mut TreeGraph, g: &LayoutGraph) {
    let seeds: Vec<String> = t.node_ids();
    let seeds: Vec<&str> = seeds.iter().map(String::as_str).collect();
    let order: Vec<String> = alg::postorder(t, &seeds).map(str::to_string).collect();
    for v in order {
        assign_cut_value(t, g, &v);
    }
}

fn assign_cut_value(t: &mut TreeGraph, g: &LayoutGraph, child: &str) {
    let Some(parent) = t.node(child).and_then(|n| n.parent.clone()) else {
        return;
    };
    let cut_value = calc_cut_value(t, g, child);
    if let Some(edge) = t.edge_mut(child, &parent, None) {
        edge.cut_value = cut_value;
    }
}

/// Cut value of the tree edge between `child` and its parent, derived from the cut values
/// of the child's own tree edges.
pub fn calc_cut_value(t: &TreeGraph, g: &LayoutGraph, child: &str) -> f64 {
    let Some(parent) = t.node(child).and_then(|n| n.parent.as_deref()) else {
        return 0.0;
    };

    let (child_is_tail, graph_edge) = match g.edge(child, parent, None) {
        Some(e) => (true, e),
        None => match g.edge(parent, child, None) {
            Some(e) => (false, e),
            None => return 0.0,
        },
    };
    let mut cut_value = graph_edge.weight;

    for e in g.node_edges(child, None).unwrap_or_default() {
        let is_out_edge = e.v == child;
        let other = if is_out_edge { &e.w } else { &e.v };
        if other == parent {
            continue;
        }
        let points_to_head = is_out_edge == child_is_tail;
        let other_weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
        cut_value += if points_to_head {
            other_weight
        } else {
            -other_weight
        };
        if let Some(tree_edge) = t.edge(child, other, None) {
            cut_value += if points_to_head {
                -tree_edge.cut_value
            } else {
                tree_edge.cut_value
            };
        }
    }
    cut_value
}

/// Numbers the tree in postorder: `lim` is the node's own number and `low` the smallest
/// number in its subtree. Also records every node's tree parent.
pub fn init_low_lim_values(t: &mut TreeGraph, root: Option<&str>) {
    let mut roots: Vec<String> = Vec::new();
    if let Some(root) = root {
        roots.push(root.to_string());
    }
    roots.extend(t.node_ids());

    let mut visited: HashSet<String> = HashSet::default();
    let mut next_lim = 1;
    for root in roots {
        if !visited.insert(root.clone()) {
            continue;
        }
        let neighbors = owned_neighbors(t, &root);
        // (node, parent, neighbors, next neighbor, low)
        let mut stack: Vec<(String, Option<String>, Vec<String>, usize, i32)> =
            vec![(root, None, neighbors, 0, next_lim)];

        while let Some((v, _, neighbors, next, _)) = stack.last_mut() {
            if let Some(w) = neighbors.get(*next).cloned() {
                *next += 1;
                if visited.insert(w.clone()) {
                    let parent = Some(v.clone());
                    let neighbors = owned_neighbors(t, &w);
                    stack.push((w, parent, neighbors, 0, next_lim));
                }
                continue;
            }
            let Some((v, parent, _, _, low)) = stack.pop() else {
                break;
            };
            if let Some(label) = t.node_mut(&v) {
                label.low = low;
                label.lim = next_lim;
                label.parent = parent;
            }
            next_lim += 1;
        }
    }
}

fn owned_neighbors(t: &TreeGraph, v: &str) -> Vec<String> {
    t.neighbors(v)
        .unwrap_or_default()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// First tree edge with a negative cut value.
pub fn leave_edge(t: &TreeGraph) -> Option<EdgeKey> {
    let mut found = None;
    t.for_each_edge(|e, label| {
        if found.is_none() && label.cut_value < 0.0 {
            found = Some(e.clone());
        }
    });
    found
}

/// Non-tree edge of minimum slack that reconnects the two halves left after removing
/// `edge`, oriented the same way across the cut.
pub fn enter_edge(t: &TreeGraph, g: &LayoutGraph, edge: &EdgeKey) -> Option<EdgeKey> {
    let (v, w) = if g.has_edge(&edge.v, &edge.w, None) {
        (&edge.v, &edge.w)
    } else {
        (&edge.w, &edge.v)
    };
    let v_label = t.node(v)?;
    let w_label = t.node(w)?;

    let (tail_label, flip) = if v_label.lim > w_label.lim {
        (w_label, true)
    } else {
        (v_label, false)
    };

    let is_descendant = |node: &str| {
        t.node(node)
            .is_some_and(|n| tail_label.low <= n.lim && n.lim <= tail_label.lim)
    };

    let mut best: Option<(i32, EdgeKey)> = None;
    for e in g.edges() {
        if flip == is_descendant(e.v.as_str()) && flip != is_descendant(e.w.as_str()) {
            let s = slack(g, e);
            if best.as_ref().is_none_or(|(b, _)| s < *b) {
                best = Some((s, e.clone()));
            }
        }
    }
    best.map(|(_, e)| e)
}

pub fn exchange_edges(t: &mut TreeGraph, g: &mut LayoutGraph, e: &EdgeKey, f: &EdgeKey) {
    t.remove_edge(&e.v, &e.w, None);
    t.set_edge_with_label(f.v.clone(), f.w.clone(), TreeEdge::default());
    init_low_lim_values(t, None);
    init_cut_values(t, g);
    update_ranks(t, g);
}

/// Re-derives ranks from the tree so that every tree edge is tight again.
fn update_ranks(t: &TreeGraph, g: &mut LayoutGraph) {
    let seeds: Vec<String> = t.node_ids();
    let seeds: Vec<&str> = seeds.iter().map(String::as_str).collect();
    for v in alg::preorder(t, &seeds) {
        let Some(parent) = t.node(v).and_then(|n| n.parent.as_deref()) else {
            continue;
        };
        let (edge, flipped) = match g.edge(v, parent, None) {
            Some(e) => (e, false),
            None => match g.edge(parent, v, None) {
                Some(e) => (e, true),
                None => continue,
            },
        };
        let min_len = edge.min_len as i32;
        let parent_rank = g.node(parent).and_then(|n| n.rank).unwrap_or(0);
        if let Some(label) = g.node_mut(v) {
            label.rank = Some(if flipped {
                parent_rank + min_len
            } else {
                parent_rank - min_len
            });
        }
    }
}
