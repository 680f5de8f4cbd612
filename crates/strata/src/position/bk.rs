//! Brandes–Köpf horizontal coordinate assignment ("Fast and Simple Horizontal Coordinate
//! Assignment", with the corrections by Brandes, Walter & Zink).
//!
//! Four passes combine up/down alignment with left/right compaction. Each pass aligns nodes
//! into vertical blocks with their median neighbors, avoiding segments marked as conflicts,
//! then packs the blocks as tightly as the separations allow. The passes are shifted onto the
//! narrowest one and balanced per node.

use crate::graphlib::{Graph, GraphOptions};
use crate::util::build_layer_matrix;
use crate::{Align, BorderSide, LabelPos, LayoutGraph, NodeKind};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

/// Unordered node pairs whose segment must not be used for alignment.
pub type Conflicts = HashMap<String, HashSet<String>>;

/// Coordinates of one pass.
pub type Xs = HashMap<String, f64>;

pub fn add_conflict(conflicts: &mut Conflicts, v: &str, w: &str) {
    let (v, w) = if v <= w { (v, w) } else { (w, v) };
    conflicts
        .entry(v.to_string())
        .or_default()
        .insert(w.to_string());
}

pub fn has_conflict(conflicts: &Conflicts, v: &str, w: &str) -> bool {
    let (v, w) = if v <= w { (v, w) } else { (w, v) };
    conflicts.get(v).is_some_and(|ws| ws.contains(w))
}

fn is_dummy(g: &LayoutGraph, v: &str) -> bool {
    g.node(v).is_some_and(|n| n.is_dummy())
}

fn order_of(g: &LayoutGraph, v: &str) -> usize {
    g.node(v).and_then(|n| n.order).unwrap_or(0)
}

/// Type 1 conflicts: a non-inner segment crossing an inner segment (one between two dummy
/// nodes). Inner segments win, so long edges stay straight.
pub fn find_type1_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::default();

    for pair in layering.windows(2) {
        let (prev_layer, layer) = (&pair[0], &pair[1]);
        let mut k0 = 0;
        let mut scan_pos = 0;
        let last = layer.len().saturating_sub(1);

        for (i, v) in layer.iter().enumerate() {
            let w = find_other_inner_segment_node(g, v);
            let k1 = w.map_or(prev_layer.len(), |w| order_of(g, w));

            if w.is_none() && i != last {
                continue;
            }
            for scan_node in &layer[scan_pos..=i] {
                let scan_dummy = is_dummy(g, scan_node);
                for u in g.predecessors(scan_node).unwrap_or_default() {
                    let u_pos = order_of(g, u);
                    if (u_pos < k0 || k1 < u_pos) && !(is_dummy(g, u) && scan_dummy) {
                        add_conflict(&mut conflicts, u, scan_node);
                    }
                }
            }
            scan_pos = i + 1;
            k0 = k1;
        }
    }
    conflicts
}

/// Type 2 conflicts: two inner segments crossing. Segments between subgraph border nodes
/// take precedence over the ones they cross.
pub fn find_type2_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::default();

    let scan = |conflicts: &mut Conflicts,
                south: &[String],
                range: std::ops::Range<usize>,
                prev_north_border: Option<isize>,
                next_north_border: Option<isize>| {
        let (Some(prev), Some(next)) = (prev_north_border, next_north_border) else {
            return;
        };
        for v in &south[range] {
            if !is_dummy(g, v) {
                continue;
            }
            for u in g.predecessors(v).unwrap_or_default() {
                let Some(u_node) = g.node(u) else {
                    continue;
                };
                let u_order = u_node.order.unwrap_or(0) as isize;
                if u_node.is_dummy() && (u_order < prev || u_order > next) {
                    add_conflict(conflicts, u, v);
                }
            }
        }
    };

    for pair in layering.windows(2) {
        let (north, south) = (&pair[0], &pair[1]);
        let mut prev_north_pos: isize = -1;
        let mut next_north_pos: Option<isize> = None;
        let mut south_pos = 0;

        for (lookahead, v) in south.iter().enumerate() {
            if g.node(v).is_some_and(|n| n.kind.is_border()) {
                if let Some(u) = g.predecessors(v).and_then(|p| p.first().copied()) {
                    let pos = order_of(g, u) as isize;
                    next_north_pos = Some(pos);
                    scan(&mut conflicts, south, south_pos..lookahead, Some(prev_north_pos), Some(pos));
                    south_pos = lookahead;
                    prev_north_pos = pos;
                }
            }
            scan(
                &mut conflicts,
                south,
                south_pos..south.len(),
                next_north_pos,
                Some(north.len() as isize),
            );
        }
    }
    conflicts
}

fn find_other_inner_segment_node<'g>(g: &'g LayoutGraph, v: &str) -> Option<&'g str> {
    if !is_dummy(g, v) {
        return None;
    }
    g.predecessors(v)?.into_iter().find(|u| is_dummy(g, u))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    /// Block root of every node.
    pub root: HashMap<String, String>,
    /// Next node of the block, cyclic back to the root.
    pub align: HashMap<String, String>,
}

/// Groups nodes into vertical blocks: each node joins the block of its median neighbor (as
/// given by `neighbors`) unless the segment conflicts or would cross an earlier alignment.
pub fn vertical_alignment<F>(layering: &[Vec<String>], conflicts: &Conflicts, neighbors: F) -> Alignment
where
    F: Fn(&str) -> Vec<String>,
{
    let mut root: HashMap<String, String> = HashMap::default();
    let mut align: HashMap<String, String> = HashMap::default();
    let mut pos: HashMap<String, usize> = HashMap::default();

    for layer in layering {
        for (order, v) in layer.iter().enumerate() {
            root.insert(v.clone(), v.clone());
            align.insert(v.clone(), v.clone());
            pos.insert(v.clone(), order);
        }
    }

    for layer in layering {
        let mut prev_idx: isize = -1;
        for v in layer {
            let mut ws = neighbors(v);
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|w| pos.get(w).copied().unwrap_or(usize::MAX));
            let mp = (ws.len() - 1) as f64 / 2.0;

            for w in &ws[mp.floor() as usize..=mp.ceil() as usize] {
                let w_pos = pos.get(w).map_or(isize::MAX, |&p| p as isize);
                if align.get(v) == Some(v) && prev_idx < w_pos && !has_conflict(conflicts, v, w) {
                    let w_root = root.get(w).cloned().unwrap_or_else(|| w.clone());
                    align.insert(w.clone(), v.clone());
                    align.insert(v.clone(), w_root.clone());
                    root.insert(v.clone(), w_root);
                    prev_idx = w_pos;
                }
            }
        }
    }

    Alignment { root, align }
}

/// Places every block as far left as its separation constraints allow, then pulls blocks
/// right towards their successors where that does not stretch a border.
pub fn horizontal_compaction(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    alignment: &Alignment,
    reverse_sep: bool,
) -> Xs {
    let block_g = build_block_graph(g, layering, &alignment.root, reverse_sep);
    let fixed_side = if reverse_sep {
        BorderSide::Left
    } else {
        BorderSide::Right
    };
    let mut xs: Xs = HashMap::default();

    iterate(&block_g, |v| block_g.predecessors(v), |elem| {
        let x = block_g
            .in_edges(elem, None)
            .unwrap_or_default()
            .iter()
            .fold(0.0_f64, |acc, e| {
                let sep = block_g.edge_by_key(e).copied().unwrap_or(0.0);
                acc.max(xs.get(&e.v).copied().unwrap_or(0.0) + sep)
            });
        xs.insert(elem.to_string(), x);
    });

    iterate(&block_g, |v| block_g.successors(v), |elem| {
        let min = block_g
            .out_edges(elem, None)
            .unwrap_or_default()
            .iter()
            .fold(f64::INFINITY, |acc, e| {
                let sep = block_g.edge_by_key(e).copied().unwrap_or(0.0);
                acc.min(xs.get(&e.w).copied().unwrap_or(0.0) - sep)
            });
        let pinned = g
            .node(elem)
            .is_some_and(|n| n.kind == NodeKind::Border(fixed_side));
        if min.is_finite() && !pinned {
            let x = xs.entry(elem.to_string()).or_insert(0.0);
            *x = x.max(min);
        }
    });

    alignment
        .align
        .keys()
        .map(|v| {
            let root = alignment.root.get(v).unwrap_or(v);
            (v.clone(), xs.get(root).copied().unwrap_or(0.0))
        })
        .collect()
}

/// Visits the block graph depth first along `next`; `set` runs once a node's `next` nodes
/// have been handled.
fn iterate<'b>(
    block_g: &'b BlockGraph,
    next: impl Fn(&str) -> Option<Vec<&'b str>>,
    mut set: impl FnMut(&str),
) {
    let mut stack: Vec<&str> = block_g.nodes().collect();
    let mut visited: HashSet<&str> = HashSet::default();
    while let Some(elem) = stack.pop() {
        if visited.contains(elem) {
            set(elem);
        } else {
            visited.insert(elem);
            stack.push(elem);
            stack.extend(next(elem).unwrap_or_default());
        }
    }
}

/// Block roots with an edge between neighboring blocks weighted by their minimum separation.
pub type BlockGraph = Graph<(), f64, ()>;

pub fn build_block_graph(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    root: &HashMap<String, String>,
    reverse_sep: bool,
) -> BlockGraph {
    let mut block_g: BlockGraph = Graph::new(GraphOptions::default());
    for layer in layering {
        let mut prev: Option<&String> = None;
        for v in layer {
            let v_root = root.get(v).unwrap_or(v).clone();
            block_g.ensure_node(v_root.clone());
            if let Some(u) = prev {
                let u_root = root.get(u).unwrap_or(u).clone();
                let prev_max = block_g.edge(&u_root, &v_root, None).copied().unwrap_or(0.0);
                let s = sep(g, v, u, reverse_sep);
                block_g.set_edge_with_label(u_root, v_root, s.max(prev_max));
            }
            prev = Some(v);
        }
    }
    block_g
}

/// Minimum distance between the centers of `v` and its left neighbor `w`.
fn sep(g: &LayoutGraph, v: &str, w: &str, reverse_sep: bool) -> f64 {
    let (Some(v_label), Some(w_label)) = (g.node(v), g.node(w)) else {
        return 0.0;
    };
    let node_sep = g.graph().node_separation;
    let edge_sep = g.graph().edge_separation;
    let signed = |delta: f64| if reverse_sep { delta } else { -delta };

    let mut sum = v_label.width / 2.0;
    sum += match v_label.label_pos {
        Some(LabelPos::L) => signed(-v_label.width / 2.0),
        Some(LabelPos::R) => signed(v_label.width / 2.0),
        _ => 0.0,
    };
    sum += if v_label.is_dummy() { edge_sep } else { node_sep } / 2.0;
    sum += if w_label.is_dummy() { edge_sep } else { node_sep } / 2.0;
    sum += w_label.width / 2.0;
    sum += match w_label.label_pos {
        Some(LabelPos::L) => signed(w_label.width / 2.0),
        Some(LabelPos::R) => signed(-w_label.width / 2.0),
        _ => 0.0,
    };
    sum
}

const ALIGNMENTS: [Align; 4] = [Align::UL, Align::UR, Align::DL, Align::DR];

fn width(g: &LayoutGraph, v: &str) -> f64 {
    g.node(v).map_or(0.0, |n| n.width)
}

/// The pass whose drawing is narrowest; earlier passes win ties.
pub fn find_smallest_width_alignment(g: &LayoutGraph, xss: &HashMap<Align, Xs>) -> Option<Align> {
    let mut best: Option<(Align, f64)> = None;
    for align in ALIGNMENTS {
        let Some(xs) = xss.get(&align) else {
            continue;
        };
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for (v, &x) in xs {
            let half = width(g, v) / 2.0;
            max = max.max(x + half);
            min = min.min(x - half);
        }
        let w = max - min;
        if best.is_none_or(|(_, b)| w < b) {
            best = Some((align, w));
        }
    }
    best.map(|(align, _)| align)
}

/// Shifts left passes onto the left edge of `align_to`, right passes onto its right edge.
pub fn align_coordinates(xss: &mut HashMap<Align, Xs>, align_to: Align) {
    let Some(target) = xss.get(&align_to) else {
        return;
    };
    let target_min = target.values().copied().fold(f64::INFINITY, f64::min);
    let target_max = target.values().copied().fold(f64::NEG_INFINITY, f64::max);

    for align in ALIGNMENTS {
        if align == align_to {
            continue;
        }
        let Some(xs) = xss.get_mut(&align) else {
            continue;
        };
        let delta = if matches!(align, Align::UL | Align::DL) {
            target_min - xs.values().copied().fold(f64::INFINITY, f64::min)
        } else {
            target_max - xs.values().copied().fold(f64::NEG_INFINITY, f64::max)
        };
        if delta != 0.0 && delta.is_finite() {
            xs.values_mut().for_each(|x| *x += delta);
        }
    }
}

/// Final coordinate per node: the pass selected by `align`, or the mean of the two median
/// passes.
pub fn balance(xss: &HashMap<Align, Xs>, align: Option<Align>) -> Xs {
    let Some(ul) = xss.get(&Align::UL) else {
        return Xs::default();
    };
    ul.keys()
        .map(|v| {
            let x = match align {
                Some(align) => xss.get(&align).and_then(|xs| xs.get(v)).copied().unwrap_or(0.0),
                None => {
                    let mut vals: Vec<f64> = ALIGNMENTS
                        .iter()
                        .filter_map(|a| xss.get(a).and_then(|xs| xs.get(v)).copied())
                        .collect();
                    vals.sort_by(f64::total_cmp);
                    match vals.len() {
                        4 => (vals[1] + vals[2]) / 2.0,
                        0 => 0.0,
                        n => (vals[(n - 1) / 2] + vals[n / 2]) / 2.0,
                    }
                }
            };
            (v.clone(), x)
        })
        .collect()
}

/// Horizontal coordinates for every node of a non-compound, ordered graph.
pub fn position_x(g: &LayoutGraph) -> Xs {
    let layering = build_layer_matrix(g);
    let mut conflicts = find_type1_conflicts(g, &layering);
    for (v, ws) in find_type2_conflicts(g, &layering) {
        for w in ws {
            add_conflict(&mut conflicts, &v, &w);
        }
    }

    let mut xss: HashMap<Align, Xs> = HashMap::default();
    for align in ALIGNMENTS {
        let up = matches!(align, Align::UL | Align::UR);
        let right = matches!(align, Align::UR | Align::DR);

        let mut adjusted: Vec<Vec<String>> = layering.clone();
        if !up {
            adjusted.reverse();
        }
        if right {
            adjusted.iter_mut().for_each(|layer| layer.reverse());
        }

        let neighbors = |v: &str| -> Vec<String> {
            let ns = if up { g.predecessors(v) } else { g.successors(v) };
            ns.unwrap_or_default().into_iter().map(str::to_string).collect()
        };
        let alignment = vertical_alignment(&adjusted, &conflicts, neighbors);
        let mut xs = horizontal_compaction(g, &adjusted, &alignment, right);
        if right {
            xs.values_mut().for_each(|x| *x = -*x);
        }
        xss.insert(align, xs);
    }

    let Some(smallest) = find_smallest_width_alignment(g, &xss) else {
        return Xs::default();
    };
    align_coordinates(&mut xss, smallest);
    let chosen = g.graph().align;
    tracing::trace!(narrowest = ?smallest, ?chosen, "horizontal coordinates balanced");
    balance(&xss, chosen)
}
