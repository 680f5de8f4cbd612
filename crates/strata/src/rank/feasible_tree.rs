//! Tight spanning tree construction.
//!
//! Starting from the first node, the tree grows over zero-slack edges. When it gets stuck,
//! the edge with the smallest slack that leaves the tree is taken from a priority queue and
//! the whole tree is shifted by that slack, which makes the edge tight. The resulting ranks
//! are feasible and every tree edge is tight.

use super::util::slack;
use crate::LayoutGraph;
use crate::data::PriorityQueue;
use crate::graphlib::{EdgeKey, Graph, GraphOptions};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNode {
    pub low: i32,
    pub lim: i32,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeEdge {
    pub cut_value: f64,
}

/// Undirected spanning tree over the nodes of a layout graph.
pub type TreeGraph = Graph<TreeNode, TreeEdge, ()>;

/// Builds a tight spanning tree, shifting ranks of `g` as needed. A disconnected `g` yields
/// a spanning forest.
pub fn feasible_tree(g: &mut LayoutGraph) -> TreeGraph {
    let mut t: TreeGraph = Graph::new(GraphOptions {
        directed: false,
        ..Default::default()
    });
    let Some(start) = g.nodes().next().map(str::to_string) else {
        return t;
    };
    let size = g.node_count();
    t.set_node(start, TreeNode::default());

    while tight_tree(&mut t, g) < size {
        match find_min_slack_edge(&t, g) {
            Some(e) => {
                let delta = if t.has_node(&e.v) {
                    slack(g, &e)
                } else {
                    -slack(g, &e)
                };
                shift_ranks(&t, g, delta);
            }
            None => {
                // Nothing connects the tree to the rest; start another component.
                let Some(next) = g.nodes().find(|v| !t.has_node(v)).map(str::to_string) else {
                    break;
                };
                t.set_node(next, TreeNode::default());
            }
        }
    }
    t
}

/// Grows `t` over tight edges of `g`, depth first from every tree node. Returns the tree
/// size.
fn tight_tree(t: &mut TreeGraph, g: &LayoutGraph) -> usize {
    let roots = t.node_ids();
    for root in roots {
        let edges = g.node_edges(&root, None).unwrap_or_default();
        let mut stack: Vec<(String, Vec<EdgeKey>, usize)> = vec![(root, edges, 0)];

        while let Some((v, edges, next)) = stack.last_mut() {
            let Some(e) = edges.get(*next) else {
                stack.pop();
                continue;
            };
            *next += 1;
            let w = if *v == e.v { &e.w } else { &e.v };
            if t.has_node(w) || slack(g, e) != 0 {
                continue;
            }
            let v = v.clone();
            let w = w.clone();
            t.set_node(w.clone(), TreeNode::default());
            t.set_edge_with_label(v, w.clone(), TreeEdge::default());
            let edges = g.node_edges(&w, None).unwrap_or_default();
            stack.push((w, edges, 0));
        }
    }
    t.node_count()
}

/// Edge with exactly one endpoint in `t` and the smallest slack.
fn find_min_slack_edge(t: &TreeGraph, g: &LayoutGraph) -> Option<EdgeKey> {
    let edges = g.edge_keys();
    let mut queue = PriorityQueue::new();
    for (i, e) in edges.iter().enumerate() {
        if t.has_node(&e.v) != t.has_node(&e.w) {
            queue.add(i.to_string(), f64::from(slack(g, e)));
        }
    }
    let i: usize = queue.min().ok()?.parse().ok()?;
    edges.into_iter().nth(i)
}

fn shift_ranks(t: &TreeGraph, g: &mut LayoutGraph, delta: i32) {
    for v in t.nodes() {
        if let Some(rank) = g.node_mut(v).and_then(|n| n.rank.as_mut()) {
            *rank += delta;
        }
    }
}
