//! Nesting graph for compound graphs.
//!
//! Before ranking, every subgraph gets a top and a bottom border node and every child is
//! linked between them, so the ranker keeps subgraph contents between its borders. A root
//! node ties every top-level subgraph and every leaf together, making the graph connected.
//! Ranks of the original nodes are stretched by `node_rank_factor` so border nodes get ranks
//! of their own.

use crate::util::{add_border_node, add_dummy_node, mutated};
use crate::{BorderSide, EdgeLabel, LayoutGraph, NodeKind, NodeLabel};
use rustc_hash::FxHashMap as HashMap;

struct Context {
    root: String,
    node_sep: usize,
    weight: f64,
    height: usize,
    depths: HashMap<String, usize>,
}

struct Frame {
    v: String,
    top: String,
    bottom: String,
    children: Vec<String>,
    next: usize,
}

pub fn run(g: &mut LayoutGraph) {
    let root = add_dummy_node(g, NodeKind::Root, NodeLabel::default(), "_root");
    let depths = tree_depths(g);
    let height = depths.values().copied().max().unwrap_or(1).saturating_sub(1);
    let node_sep = 2 * height + 1;

    g.graph_mut().nesting_root = Some(root.clone());

    g.for_each_edge_mut(|_, e| e.min_len *= node_sep);

    let mut weight = 1.0;
    g.for_each_edge(|_, e| weight += e.weight);

    let ctx = Context {
        root,
        node_sep,
        weight,
        height,
        depths,
    };

    let top_level: Vec<String> = g.children_root().into_iter().map(str::to_string).collect();
    for v in top_level {
        visit(g, &ctx, &v);
    }

    g.graph_mut().node_rank_factor = Some(node_sep as i32);
    tracing::trace!(height, node_sep, "nesting graph built");
}

/// Removes the root node and every edge added to keep subgraphs together.
pub fn cleanup(g: &mut LayoutGraph) {
    if let Some(root) = g.graph_mut().nesting_root.take() {
        g.remove_node(&root);
    }

    let mut nesting = Vec::new();
    g.for_each_edge(|e, label| {
        if label.nesting_edge {
            nesting.push(e.clone());
        }
    });
    for e in nesting {
        g.remove_edge_key(&e);
    }
}

/// Depth of every node in the subgraph forest; top-level nodes have depth 1.
fn tree_depths(g: &LayoutGraph) -> HashMap<String, usize> {
    let mut depths: HashMap<String, usize> = HashMap::default();
    let mut stack: Vec<(&str, usize)> = g.children_root().into_iter().rev().map(|v| (v, 1)).collect();
    while let Some((v, depth)) = stack.pop() {
        depths.insert(v.to_string(), depth);
        for child in g.children(v).into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    depths
}

fn visit(g: &mut LayoutGraph, ctx: &Context, start: &str) {
    let Some(frame) = enter(g, ctx, start) else {
        return;
    };
    let mut stack = vec![frame];

    while let Some(frame) = stack.last_mut() {
        if let Some(child) = frame.children.get(frame.next).cloned() {
            frame.next += 1;
            match enter(g, ctx, &child) {
                Some(f) => stack.push(f),
                None => {
                    if let Some(parent) = stack.last() {
                        link_child(g, ctx, parent, &child);
                    }
                }
            }
            continue;
        }

        let Some(done) = stack.pop() else {
            break;
        };
        if let Some(parent) = stack.last() {
            link_child(g, ctx, parent, &done.v);
        }
        if g.parent(&done.v).is_none() {
            let depth = ctx.depths.get(&done.v).copied().unwrap_or(1);
            g.set_edge_with_label(
                ctx.root.clone(),
                done.top,
                EdgeLabel {
                    nesting_edge: true,
                    ..EdgeLabel::with_weight(0.0, ctx.height + depth)
                },
            );
        }
    }
}

/// Leaves are hooked to the root directly; subgraphs get their border nodes and a frame.
fn enter(g: &mut LayoutGraph, ctx: &Context, v: &str) -> Option<Frame> {
    let children: Vec<String> = g.children(v).into_iter().map(str::to_string).collect();
    if children.is_empty() {
        if v != ctx.root {
            g.set_edge_with_label(ctx.root.clone(), v, EdgeLabel::with_weight(0.0, ctx.node_sep));
        }
        return None;
    }

    let top = add_border_node(g, BorderSide::Top, "_bt", None);
    let bottom = add_border_node(g, BorderSide::Bottom, "_bb", None);
    mutated(g.set_parent(top.clone(), v));
    mutated(g.set_parent(bottom.clone(), v));
    if let Some(label) = g.node_mut(v) {
        label.border_top = Some(top.clone());
        label.border_bottom = Some(bottom.clone());
    }

    Some(Frame {
        v: v.to_string(),
        top,
        bottom,
        children,
        next: 0,
    })
}

fn link_child(g: &mut LayoutGraph, ctx: &Context, parent: &Frame, child: &str) {
    let Some(child_label) = g.node(child) else {
        return;
    };
    let child_top = child_label.border_top.clone().unwrap_or_else(|| child.to_string());
    let child_bottom = child_label
        .border_bottom
        .clone()
        .unwrap_or_else(|| child.to_string());
    let weight = if child_label.border_top.is_some() {
        ctx.weight
    } else {
        2.0 * ctx.weight
    };
    let min_len = if child_top != child_bottom {
        1
    } else {
        let depth = ctx.depths.get(&parent.v).copied().unwrap_or(1);
        ctx.height.saturating_sub(depth) + 1
    };

    let label = EdgeLabel {
        nesting_edge: true,
        ..EdgeLabel::with_weight(weight, min_len)
    };
    g.set_edge_with_label(parent.top.clone(), child_top, label.clone());
    g.set_edge_with_label(child_bottom, parent.bottom.clone(), label);
}
