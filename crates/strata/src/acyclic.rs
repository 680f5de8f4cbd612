//! Break cycles by reversing a feedback arc set.
//!
//! `run` reverses every selected edge under a fresh `rev` name and marks its label; `undo`
//! turns the marked edges back around and restores their original name.

use crate::graphlib::EdgeKey;
use crate::util::{mutated, unique_id};
use crate::{Acyclicer, EdgeLabel, LayoutGraph};
use rustc_hash::FxHashSet as HashSet;

pub fn run(g: &mut LayoutGraph) {
    let fas = match g.graph().acyclicer {
        Acyclicer::Greedy => crate::greedy_fas::greedy_fas_with_weight(g, |lbl: &EdgeLabel| {
            if !lbl.weight.is_finite() {
                return 0;
            }
            lbl.weight.round() as i64
        }),
        Acyclicer::Dfs => dfs_fas(g),
    };
    tracing::trace!(reversed = fas.len(), acyclicer = ?g.graph().acyclicer, "breaking cycles");

    for e in fas {
        if e.v == e.w {
            continue;
        }
        let Some(mut label) = g.edge_by_key(&e).cloned() else {
            continue;
        };
        g.remove_edge_key(&e);

        label.forward_name = e.name.clone();
        label.reversed = true;
        let name = if g.is_multigraph() {
            Some(unique_id("rev"))
        } else {
            None
        };
        mutated(g.set_edge_named(e.w, e.v, name, Some(label)));
    }
}

pub fn undo(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        let Some(mut label) = g.edge_by_key(&e).filter(|l| l.reversed).cloned() else {
            continue;
        };
        g.remove_edge_key(&e);

        let forward_name = label.forward_name.take();
        label.reversed = false;
        mutated(g.set_edge_named(e.w, e.v, forward_name, Some(label)));
    }
}

/// Out-edges that close a cycle during a depth-first walk seeded in node insertion order.
pub fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeKey> {
    let mut fas = Vec::new();
    let mut visited: HashSet<String> = HashSet::default();
    let mut on_stack: HashSet<String> = HashSet::default();

    for root in g.nodes() {
        if !visited.insert(root.to_string()) {
            continue;
        }
        on_stack.insert(root.to_string());
        let mut stack: Vec<(String, Vec<EdgeKey>, usize)> = vec![(
            root.to_string(),
            g.out_edges(root, None).unwrap_or_default(),
            0,
        )];

        while let Some((v, edges, next)) = stack.last_mut() {
            let Some(e) = edges.get(*next).cloned() else {
                on_stack.remove(v.as_str());
                stack.pop();
                continue;
            };
            *next += 1;

            if on_stack.contains(&e.w) {
                fas.push(e);
            } else if visited.insert(e.w.clone()) {
                on_stack.insert(e.w.clone());
                let out = g.out_edges(&e.w, None).unwrap_or_default();
                stack.push((e.w, out, 0));
            }
        }
    }
    fas
}
