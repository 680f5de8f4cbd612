//! The layout pipeline.
//!
//! [`layout`] copies the recognized attributes of the caller's graph into an internal
//! compound multigraph, runs every stage on that copy and writes the results back. Stages run
//! in a fixed order; most of them add dummy nodes that a later stage removes again.

use crate::graphlib::json::{self, GraphJson};
use crate::graphlib::{Graph, GraphOptions};
use crate::util::{self, add_dummy_node, intersect_rect};
use crate::{
    EdgeLabel, GraphLabel, LabelPos, LayoutError, LayoutGraph, LayoutOptions, NodeKind,
    NodeLabel, Point, RankDir, Result, acyclic, add_border_segments, coordinate_system,
    nesting_graph, normalize, order, parent_dummy_chains, position, rank, self_edges,
};

/// Lays out `g` in place: every node gets `x`/`y`, every edge gets `points` (and `x`/`y` when
/// it has a label), subgraph nodes get their box and the graph label gets the drawing size.
pub fn layout(g: &mut LayoutGraph) -> Result<()> {
    layout_with_options(g, LayoutOptions::default())
}

pub fn layout_with_options(g: &mut LayoutGraph, opts: LayoutOptions) -> Result<()> {
    let timed = opts.debug_timing;
    stage(timed, "layout", || {
        let mut layout_graph = stage(timed, "  buildLayoutGraph", || build_layout_graph(g))?;
        stage(timed, "  runLayout", || run_layout(&mut layout_graph, timed));
        stage(timed, "  updateInputGraph", || update_input_graph(g, &layout_graph));
        Ok(())
    })
}

fn stage<T>(timed: bool, name: &str, f: impl FnOnce() -> T) -> T {
    if timed { util::time(name, f) } else { f() }
}

/// Reads a graph document as produced by [`write_json`].
pub fn read_json(input: &str) -> Result<LayoutGraph> {
    let doc: GraphJson<NodeLabel, EdgeLabel, GraphLabel> = serde_json::from_str(input)?;
    Ok(json::read(doc)?)
}

pub fn write_json(g: &LayoutGraph) -> Result<String> {
    Ok(serde_json::to_string(&json::write(g))?)
}

fn run_layout(g: &mut LayoutGraph, timed: bool) {
    stage(timed, "    makeSpaceForEdgeLabels", || make_space_for_edge_labels(g));
    stage(timed, "    removeSelfEdges", || self_edges::remove_self_edges(g));
    stage(timed, "    acyclic", || acyclic::run(g));
    stage(timed, "    nestingGraph.run", || nesting_graph::run(g));
    stage(timed, "    rank", || rank_leaves(g));
    stage(timed, "    injectEdgeLabelProxies", || inject_edge_label_proxies(g));
    stage(timed, "    removeEmptyRanks", || util::remove_empty_ranks(g));
    stage(timed, "    nestingGraph.cleanup", || nesting_graph::cleanup(g));
    stage(timed, "    normalizeRanks", || util::normalize_ranks(g));
    stage(timed, "    assignRankMinMax", || assign_rank_min_max(g));
    stage(timed, "    removeEdgeLabelProxies", || remove_edge_label_proxies(g));
    stage(timed, "    normalize.run", || normalize::run(g));
    stage(timed, "    parentDummyChains", || {
        parent_dummy_chains::parent_dummy_chains(g)
    });
    stage(timed, "    addBorderSegments", || {
        add_border_segments::add_border_segments(g)
    });
    stage(timed, "    order", || order::order(g));
    stage(timed, "    insertSelfEdges", || self_edges::insert_self_edges(g));
    stage(timed, "    adjustCoordinateSystem", || coordinate_system::adjust(g));
    stage(timed, "    position", || position::position(g));
    stage(timed, "    positionSelfEdges", || self_edges::position_self_edges(g));
    stage(timed, "    removeBorderNodes", || remove_border_nodes(g));
    stage(timed, "    normalize.undo", || normalize::undo(g));
    stage(timed, "    fixupEdgeLabelCoords", || fixup_edge_label_coords(g));
    stage(timed, "    undoCoordinateSystem", || coordinate_system::undo(g));
    stage(timed, "    translateGraph", || translate_graph(g));
    stage(timed, "    assignNodeIntersects", || assign_node_intersects(g));
    stage(timed, "    reversePoints", || reverse_points_for_reversed_edges(g));
    stage(timed, "    acyclic.undo", || acyclic::undo(g));
}

fn check(item: impl FnOnce() -> String, field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidValue {
            item: item(),
            field,
            value,
        })
    }
}

/// Internal copy of `input` holding only the attributes layout reads. The copy is always a
/// compound multigraph so the stages can add border nodes and parallel chain edges.
fn build_layout_graph(input: &LayoutGraph) -> Result<LayoutGraph> {
    if !input.is_directed() {
        return Err(LayoutError::Undirected);
    }

    let mut g: LayoutGraph = Graph::new(GraphOptions {
        directed: true,
        multigraph: true,
        compound: true,
    });

    let config = input.graph();
    for (field, value) in [
        ("nodeSeparation", config.node_separation),
        ("edgeSeparation", config.edge_separation),
        ("rankSeparation", config.rank_separation),
        ("marginX", config.margin_x),
        ("marginY", config.margin_y),
    ] {
        if !value.is_finite() {
            return Err(LayoutError::InvalidValue {
                item: "graph".to_string(),
                field,
                value,
            });
        }
    }
    g.set_graph(GraphLabel {
        rank_dir: config.rank_dir,
        align: config.align,
        node_separation: config.node_separation,
        edge_separation: config.edge_separation,
        rank_separation: config.rank_separation,
        margin_x: config.margin_x,
        margin_y: config.margin_y,
        acyclicer: config.acyclicer,
        ranker: config.ranker,
        ..Default::default()
    });

    for v in input.nodes() {
        let Some(label) = input.node(v) else {
            continue;
        };
        check(|| format!("node {v}"), "width", label.width)?;
        check(|| format!("node {v}"), "height", label.height)?;
        g.set_node(v, NodeLabel::sized(label.width, label.height));
    }
    for v in input.nodes() {
        if let Some(parent) = input.parent(v) {
            g.set_parent(v, parent)?;
        }
    }

    for e in input.edges() {
        let Some(label) = input.edge_by_key(e) else {
            continue;
        };
        if e.v == e.w && !input.children(&e.v).is_empty() {
            return Err(LayoutError::SubgraphSelfLoop { node: e.v.clone() });
        }
        let item = || format!("edge {} -> {}", e.v, e.w);
        check(item, "weight", label.weight)?;
        check(item, "width", label.width)?;
        check(item, "height", label.height)?;
        check(item, "labelOffset", label.label_offset)?;
        g.set_edge_key(
            e.clone(),
            EdgeLabel {
                min_len: label.min_len,
                weight: label.weight,
                width: label.width,
                height: label.height,
                label_offset: label.label_offset,
                label_pos: label.label_pos,
                ..Default::default()
            },
        )?;
    }

    tracing::trace!(
        nodes = g.node_count(),
        edges = g.edge_count(),
        rank_dir = ?g.graph().rank_dir,
        "layout graph built"
    );
    Ok(g)
}

/// Edge labels get a rank of their own: rank separation is halved and every edge is made
/// twice as long. Labels beside the edge also grow by their offset along the rank.
fn make_space_for_edge_labels(g: &mut LayoutGraph) {
    g.graph_mut().rank_separation /= 2.0;
    let rank_dir = g.graph().rank_dir;
    g.for_each_edge_mut(|_, e| {
        e.min_len *= 2;
        if e.label_pos != LabelPos::C {
            match rank_dir {
                RankDir::TB | RankDir::BT => e.width += e.label_offset,
                RankDir::LR | RankDir::RL => e.height += e.label_offset,
            }
        }
    });
}

/// Ranks the leaf view of the graph; subgraph nodes get their span from their borders later.
fn rank_leaves(g: &mut LayoutGraph) {
    let mut flat = util::as_non_compound_graph(g);
    rank::rank(&mut flat);
    flat.for_each_node(|v, label| {
        if let Some(node) = g.node_mut(v) {
            node.rank = label.rank;
        }
    });
}

/// Marks the rank every edge label will sit on with a proxy node, so removing empty ranks
/// keeps it.
fn inject_edge_label_proxies(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        let Some(label) = g.edge_by_key(&e) else {
            continue;
        };
        if label.width == 0.0 || label.height == 0.0 {
            continue;
        }
        let (Some(v_rank), Some(w_rank)) = (
            g.node(&e.v).and_then(|n| n.rank),
            g.node(&e.w).and_then(|n| n.rank),
        ) else {
            continue;
        };
        let rank = (w_rank - v_rank) / 2 + v_rank;
        add_dummy_node(
            g,
            NodeKind::EdgeProxy { edge: e },
            NodeLabel {
                rank: Some(rank),
                ..Default::default()
            },
            "_ep",
        );
    }
}

fn remove_edge_label_proxies(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        let Some(node) = g.node(&v) else {
            continue;
        };
        let NodeKind::EdgeProxy { edge } = &node.kind else {
            continue;
        };
        let (edge, rank) = (edge.clone(), node.rank);
        if let Some(label) = g.edge_mut_by_key(&edge) {
            label.label_rank = rank;
        }
        g.remove_node(&v);
    }
}

/// Rank span of every subgraph, read off its top and bottom border nodes.
fn assign_rank_min_max(g: &mut LayoutGraph) {
    let mut max_rank = 0;
    for v in g.node_ids() {
        let Some(node) = g.node(&v) else {
            continue;
        };
        let (Some(top), Some(bottom)) = (node.border_top.as_deref(), node.border_bottom.as_deref())
        else {
            continue;
        };
        let min = g.node(top).and_then(|n| n.rank);
        let max = g.node(bottom).and_then(|n| n.rank);
        if let Some(max) = max {
            max_rank = max_rank.max(max);
        }
        if let Some(node) = g.node_mut(&v) {
            node.min_rank = min;
            node.max_rank = max;
        }
    }
    g.graph_mut().max_rank = Some(max_rank);
}

/// Sizes every subgraph node from its border nodes, then drops all border nodes.
fn remove_border_nodes(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if g.children(&v).is_empty() {
            continue;
        }
        let Some(node) = g.node(&v) else {
            continue;
        };
        let corner = |id: Option<&String>| g.node(id?.as_str()).map(|n| (n.x, n.y));
        let top = corner(node.border_top.as_ref());
        let bottom = corner(node.border_bottom.as_ref());
        let left = corner(node.border_left.last().and_then(Option::as_ref));
        let right = corner(node.border_right.last().and_then(Option::as_ref));
        let (Some((_, Some(ty))), Some((_, Some(by))), Some((Some(lx), _)), Some((Some(rx), _))) =
            (top, bottom, left, right)
        else {
            continue;
        };

        let width = (rx - lx).abs();
        let height = (by - ty).abs();
        if let Some(node) = g.node_mut(&v) {
            node.width = width;
            node.height = height;
            node.x = Some(lx + width / 2.0);
            node.y = Some(ty + height / 2.0);
        }
    }

    let mut borders = Vec::new();
    g.for_each_node(|v, n| {
        if n.kind.is_border() {
            borders.push(v.to_string());
        }
    });
    for v in borders {
        g.remove_node(&v);
    }
}

/// Moves side labels off the edge: the label box reserved `label_offset` next to the route.
fn fixup_edge_label_coords(g: &mut LayoutGraph) {
    g.for_each_edge_mut(|_, e| {
        let Some(x) = e.x else {
            return;
        };
        match e.label_pos {
            LabelPos::L => {
                e.width -= e.label_offset;
                e.x = Some(x - e.width / 2.0 - e.label_offset);
            }
            LabelPos::R => {
                e.width -= e.label_offset;
                e.x = Some(x + e.width / 2.0 + e.label_offset);
            }
            LabelPos::C => {}
        }
    });
}

/// Shifts the drawing so its top left corner sits at the margins and records its size.
fn translate_graph(g: &mut LayoutGraph) {
    let mut min_x = f64::INFINITY;
    let mut max_x: f64 = 0.0;
    let mut min_y = f64::INFINITY;
    let mut max_y: f64 = 0.0;
    let mut extend = |x: f64, y: f64, w: f64, h: f64| {
        min_x = min_x.min(x - w / 2.0);
        max_x = max_x.max(x + w / 2.0);
        min_y = min_y.min(y - h / 2.0);
        max_y = max_y.max(y + h / 2.0);
    };

    g.for_each_node(|_, n| {
        extend(n.x.unwrap_or(0.0), n.y.unwrap_or(0.0), n.width, n.height);
    });
    g.for_each_edge(|_, e| {
        if let Some(x) = e.x {
            extend(x, e.y.unwrap_or(0.0), e.width, e.height);
        }
    });

    let margin_x = g.graph().margin_x;
    let margin_y = g.graph().margin_y;
    let min_x = if min_x.is_finite() { min_x } else { 0.0 } - margin_x;
    let min_y = if min_y.is_finite() { min_y } else { 0.0 } - margin_y;

    g.for_each_node_mut(|_, n| {
        n.x = Some(n.x.unwrap_or(0.0) - min_x);
        n.y = Some(n.y.unwrap_or(0.0) - min_y);
    });
    g.for_each_edge_mut(|_, e| {
        for p in &mut e.points {
            p.x -= min_x;
            p.y -= min_y;
        }
        if let Some(x) = e.x.as_mut() {
            *x -= min_x;
        }
        if let Some(y) = e.y.as_mut() {
            *y -= min_y;
        }
    });

    let graph = g.graph_mut();
    graph.width = Some(max_x - min_x + margin_x);
    graph.height = Some(max_y - min_y + margin_y);
}

/// Ends every route on the borders of its endpoint nodes.
fn assign_node_intersects(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        let (Some(node_v), Some(node_w)) = (g.node(&e.v).cloned(), g.node(&e.w).cloned()) else {
            continue;
        };
        let Some(label) = g.edge_mut_by_key(&e) else {
            continue;
        };
        let center = |n: &NodeLabel| Point {
            x: n.x.unwrap_or(0.0),
            y: n.y.unwrap_or(0.0),
        };
        let (first, last) = match (label.points.first(), label.points.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => (center(&node_w), center(&node_v)),
        };
        label.points.insert(0, intersect_rect(&node_v, first));
        label.points.push(intersect_rect(&node_w, last));
    }
}

fn reverse_points_for_reversed_edges(g: &mut LayoutGraph) {
    g.for_each_edge_mut(|_, e| {
        if e.reversed {
            e.points.reverse();
        }
    });
}

/// Copies the results onto the caller's labels, leaving every other attribute alone.
fn update_input_graph(input: &mut LayoutGraph, layout_graph: &LayoutGraph) {
    for v in input.node_ids() {
        let Some(layout_label) = layout_graph.node(&v) else {
            continue;
        };
        let is_subgraph = !layout_graph.children(&v).is_empty();
        if let Some(label) = input.node_mut(&v) {
            label.x = layout_label.x;
            label.y = layout_label.y;
            label.rank = layout_label.rank;
            if is_subgraph {
                label.width = layout_label.width;
                label.height = layout_label.height;
            }
        }
    }

    for e in input.edge_keys() {
        let Some(layout_label) = layout_graph.edge_by_key(&e) else {
            continue;
        };
        if let Some(label) = input.edge_mut_by_key(&e) {
            label.points = layout_label.points.clone();
            if layout_label.x.is_some() {
                label.x = layout_label.x;
                label.y = layout_label.y;
            }
        }
    }

    let graph = input.graph_mut();
    graph.width = layout_graph.graph().width;
    graph.height = layout_graph.graph().height;
}
