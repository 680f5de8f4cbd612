//! Rank direction handling.
//!
//! The pipeline always lays out top to bottom. `adjust` swaps node and label sizes for
//! horizontal rank directions before positioning; `undo` mirrors and transposes the result
//! into the requested direction.

use crate::{LayoutGraph, NodeKind, RankDir};

pub fn adjust(g: &mut LayoutGraph) {
    if matches!(g.graph().rank_dir, RankDir::LR | RankDir::RL) {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut LayoutGraph) {
    let rank_dir = g.graph().rank_dir;
    if matches!(rank_dir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
    if matches!(rank_dir, RankDir::LR | RankDir::RL) {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, n| {
        (n.width, n.height) = (n.height, n.width);
        // Stashed self-loop labels come back as edges and get swapped again by `undo`.
        for se in &mut n.self_edges {
            (se.label.width, se.label.height) = (se.label.height, se.label.width);
        }
        if let NodeKind::SelfEdge { label, .. } = &mut n.kind {
            (label.width, label.height) = (label.height, label.width);
        }
    });
    g.for_each_edge_mut(|_, e| {
        (e.width, e.height) = (e.height, e.width);
    });
}

fn reverse_y(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, n| {
        if let Some(y) = n.y.as_mut() {
            *y = -*y;
        }
    });
    g.for_each_edge_mut(|_, e| {
        for p in &mut e.points {
            p.y = -p.y;
        }
        if let Some(y) = e.y.as_mut() {
            *y = -*y;
        }
    });
}

fn swap_xy(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, n| {
        (n.x, n.y) = (n.y, n.x);
    });
    g.for_each_edge_mut(|_, e| {
        for p in &mut e.points {
            (p.x, p.y) = (p.y, p.x);
        }
        (e.x, e.y) = (e.y, e.x);
    });
}
