//! Helpers shared by the layout stages.

use crate::graphlib::{Graph, GraphOptions};
use crate::{BorderSide, EdgeLabel, LayoutGraph, NodeKind, NodeLabel, Point};
use rustc_hash::FxHashMap as HashMap;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

static UNIQUE_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn unique_id(prefix: impl ToString) -> String {
    let id = UNIQUE_ID_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("{}{}", prefix.to_string(), id)
}

/// Checks a graph mutation the pipeline makes on its own compound multigraph. Those only fail
/// on a named edge in a simple graph or a parent link in a flat one, which the pipeline never
/// asks for.
#[track_caller]
pub(crate) fn mutated<T>(result: crate::graphlib::Result<T>) {
    debug_assert!(result.is_ok(), "graph mutation failed: {:?}", result.err());
}

/// Inserts a node of the given kind under a fresh id starting with `prefix`.
pub fn add_dummy_node(g: &mut LayoutGraph, kind: NodeKind, label: NodeLabel, prefix: &str) -> String {
    let mut v = unique_id(prefix);
    while g.has_node(&v) {
        v = unique_id(prefix);
    }
    g.set_node(v.clone(), NodeLabel { kind, ..label });
    v
}

pub fn add_border_node(
    g: &mut LayoutGraph,
    side: BorderSide,
    prefix: &str,
    rank: Option<i32>,
) -> String {
    add_dummy_node(
        g,
        NodeKind::Border(side),
        NodeLabel {
            rank,
            ..Default::default()
        },
        prefix,
    )
}

/// Collapses multi-edges into one edge per node pair: weights add up, `min_len` takes the
/// maximum.
pub fn simplify(g: &LayoutGraph) -> LayoutGraph {
    let mut simplified: LayoutGraph = Graph::new(GraphOptions::default());
    simplified.set_graph(g.graph().clone());
    g.for_each_node(|v, label| {
        simplified.set_node(v, label.clone());
    });
    g.for_each_edge(|e, label| {
        let (weight, min_len) = simplified
            .edge(&e.v, &e.w, None)
            .map(|prev| (prev.weight, prev.min_len))
            .unwrap_or((0.0, 1));
        simplified.set_edge_with_label(
            e.v.clone(),
            e.w.clone(),
            EdgeLabel::with_weight(weight + label.weight, min_len.max(label.min_len)),
        );
    });
    simplified
}

/// Copy of `g` without subgraph nodes and without the parent forest.
pub fn as_non_compound_graph(g: &LayoutGraph) -> LayoutGraph {
    let mut simplified: LayoutGraph = Graph::new(GraphOptions {
        multigraph: g.is_multigraph(),
        ..Default::default()
    });
    simplified.set_graph(g.graph().clone());
    g.for_each_node(|v, label| {
        if g.children(v).is_empty() {
            simplified.set_node(v, label.clone());
        }
    });
    g.for_each_edge(|e, label| {
        mutated(simplified.set_edge_key(e.clone(), label.clone()));
    });
    simplified
}

/// `v -> (w -> summed weight of v -> w edges)` for every node.
pub fn successor_weights(g: &LayoutGraph) -> HashMap<String, HashMap<String, f64>> {
    let mut out: HashMap<String, HashMap<String, f64>> = HashMap::default();
    for v in g.nodes() {
        let mut weights: HashMap<String, f64> = HashMap::default();
        for e in g.out_edges(v, None).unwrap_or_default() {
            let weight = g.edge_by_key(&e).map(|l| l.weight).unwrap_or(0.0);
            *weights.entry(e.w).or_insert(0.0) += weight;
        }
        out.insert(v.to_string(), weights);
    }
    out
}

/// `w -> (v -> summed weight of v -> w edges)` for every node.
pub fn predecessor_weights(g: &LayoutGraph) -> HashMap<String, HashMap<String, f64>> {
    let mut out: HashMap<String, HashMap<String, f64>> = HashMap::default();
    for w in g.nodes() {
        let mut weights: HashMap<String, f64> = HashMap::default();
        for e in g.in_edges(w, None).unwrap_or_default() {
            let weight = g.edge_by_key(&e).map(|l| l.weight).unwrap_or(0.0);
            *weights.entry(e.v).or_insert(0.0) += weight;
        }
        out.insert(w.to_string(), weights);
    }
    out
}

/// Point where the segment from the center of `rect` towards `point` leaves the rectangle.
///
/// A point at the center itself has no direction; the center is returned.
pub fn intersect_rect(rect: &NodeLabel, point: Point) -> Point {
    let x = rect.x.unwrap_or(0.0);
    let y = rect.y.unwrap_or(0.0);
    let dx = point.x - x;
    let dy = point.y - y;
    let mut w = rect.width / 2.0;
    let mut h = rect.height / 2.0;

    if dx == 0.0 && dy == 0.0 {
        return Point { x, y };
    }

    let (sx, sy) = if dy.abs() * w > dx.abs() * h {
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };
    Point {
        x: x + sx,
        y: y + sy,
    }
}

/// Node ids grouped by rank (outer index) and sorted by order (inner index).
pub fn build_layer_matrix(g: &LayoutGraph) -> Vec<Vec<String>> {
    let Some(max) = max_rank(g) else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<(usize, String)>> = vec![Vec::new(); (max.max(-1) + 1) as usize];
    g.for_each_node(|v, n| {
        let Some(rank) = n.rank else {
            return;
        };
        if rank < 0 {
            return;
        }
        if let Some(layer) = layers.get_mut(rank as usize) {
            layer.push((n.order.unwrap_or(usize::MAX), v.to_string()));
        }
    });
    layers
        .into_iter()
        .map(|mut layer| {
            layer.sort_by_key(|(order, _)| *order);
            layer.into_iter().map(|(_, v)| v).collect()
        })
        .collect()
}

/// Shifts ranks so the smallest one is 0.
pub fn normalize_ranks(g: &mut LayoutGraph) {
    let mut min_rank = i32::MAX;
    g.for_each_node(|_, n| {
        if let Some(rank) = n.rank {
            min_rank = min_rank.min(rank);
        }
    });
    if min_rank == i32::MAX {
        return;
    }
    g.for_each_node_mut(|_, n| {
        if let Some(rank) = n.rank.as_mut() {
            *rank -= min_rank;
        }
    });
}

/// Drops ranks that hold no node, except the ones reserved for subgraph borders (multiples of
/// `node_rank_factor`, when set).
pub fn remove_empty_ranks(g: &mut LayoutGraph) {
    let mut offset = i32::MAX;
    g.for_each_node(|_, n| {
        if let Some(rank) = n.rank {
            offset = offset.min(rank);
        }
    });
    if offset == i32::MAX {
        return;
    }

    let mut layers: BTreeMap<i32, Vec<String>> = BTreeMap::new();
    let mut max = 0;
    g.for_each_node(|v, n| {
        if let Some(rank) = n.rank {
            let r = rank - offset;
            max = max.max(r);
            layers.entry(r).or_default().push(v.to_string());
        }
    });

    let factor = g.graph().node_rank_factor.filter(|&f| f > 0);
    let mut delta = 0;
    for i in 0..=max {
        match layers.get(&i) {
            None if factor.is_none_or(|f| i % f != 0) => delta -= 1,
            Some(vs) if delta != 0 => {
                for v in vs {
                    if let Some(rank) = g.node_mut(v).and_then(|n| n.rank.as_mut()) {
                        *rank += delta;
                    }
                }
            }
            _ => {}
        }
    }
}

pub fn max_rank(g: &LayoutGraph) -> Option<i32> {
    let mut max: Option<i32> = None;
    g.for_each_node(|_, n| {
        if let Some(rank) = n.rank {
            max = Some(max.map_or(rank, |m| m.max(rank)));
        }
    });
    max
}

/// Splits `items` into those accepted by `pred` and the rest, keeping order.
pub fn partition<T>(items: Vec<T>, mut pred: impl FnMut(&T) -> bool) -> (Vec<T>, Vec<T>) {
    let mut lhs = Vec::new();
    let mut rhs = Vec::new();
    for item in items {
        if pred(&item) {
            lhs.push(item);
        } else {
            rhs.push(item);
        }
    }
    (lhs, rhs)
}

pub fn time_to_writer<T>(name: &str, writer: &mut dyn Write, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    let ms = start.elapsed().as_millis();
    let _ = writeln!(writer, "{name} time: {ms}ms");
    let _ = writer.flush();
    out
}

/// Runs `f` and reports how long it took through `tracing`.
pub fn time<T>(name: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    tracing::debug!(
        target: "strata::timing",
        stage = name,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "{name} time: {}ms",
        elapsed.as_millis()
    );
    out
}
