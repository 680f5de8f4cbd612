use strata::graphlib::{Graph, GraphOptions};
use strata::util;
use strata::{BorderSide, EdgeLabel, GraphLabel, LayoutGraph, NodeKind, NodeLabel, Point};

fn new_graph(options: GraphOptions) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(options);
    g.set_graph(GraphLabel::default());
    g
}

fn ranked(rank: i32) -> NodeLabel {
    NodeLabel {
        rank: Some(rank),
        ..Default::default()
    }
}

fn ranked_at(rank: i32, order: usize) -> NodeLabel {
    NodeLabel {
        rank: Some(rank),
        order: Some(order),
        ..Default::default()
    }
}

#[test]
fn unique_id_never_repeats_and_keeps_the_prefix() {
    let a = util::unique_id("_d");
    let b = util::unique_id("_d");
    assert_ne!(a, b);
    assert!(a.starts_with("_d"));
    assert!(b.starts_with("_d"));
}

#[test]
fn add_dummy_node_creates_a_node_of_the_given_kind() {
    let mut g = new_graph(GraphOptions::default());
    let v = util::add_dummy_node(&mut g, NodeKind::Root, NodeLabel::sized(3.0, 4.0), "_x");

    let node = g.node(&v).expect("dummy node");
    assert_eq!(node.kind, NodeKind::Root);
    assert_eq!(node.width, 3.0);
    assert!(node.is_dummy());
}

#[test]
fn add_border_node_sets_side_and_rank() {
    let mut g = new_graph(GraphOptions::default());
    let v = util::add_border_node(&mut g, BorderSide::Left, "_bl", Some(2));

    let node = g.node(&v).expect("border node");
    assert_eq!(node.kind, NodeKind::Border(BorderSide::Left));
    assert_eq!(node.rank, Some(2));
}

#[test]
fn simplify_copies_a_graph_without_multi_edges() {
    let mut g = new_graph(GraphOptions::default());
    g.set_edge_with_label("a", "b", EdgeLabel::with_weight(1.0, 1));

    let simplified = util::simplify(&g);
    assert_eq!(simplified.edge("a", "b", None), Some(&EdgeLabel::with_weight(1.0, 1)));
    assert_eq!(simplified.edge_count(), 1);
}

#[test]
fn simplify_collapses_multi_edges() {
    let mut g = new_graph(GraphOptions {
        multigraph: true,
        ..Default::default()
    });
    g.set_edge_with_label("a", "b", EdgeLabel::with_weight(1.0, 1));
    g.set_edge_named("a", "b", Some("multi"), Some(EdgeLabel::with_weight(2.0, 2)))
        .expect("named edge");

    let simplified = util::simplify(&g);
    assert!(!simplified.is_multigraph());
    let label = simplified.edge("a", "b", None).expect("collapsed edge");
    assert_eq!(label.weight, 3.0);
    assert_eq!(label.min_len, 2);
    assert_eq!(simplified.edge_count(), 1);
}

#[test]
fn simplify_keeps_the_graph_label() {
    let mut g = new_graph(GraphOptions::default());
    g.graph_mut().node_separation = 7.0;
    assert_eq!(util::simplify(&g).graph().node_separation, 7.0);
}

#[test]
fn as_non_compound_graph_drops_subgraph_nodes() {
    let mut g = new_graph(GraphOptions {
        compound: true,
        multigraph: true,
        ..Default::default()
    });
    g.set_node("a", NodeLabel::sized(1.0, 2.0));
    g.set_parent("a", "sg").expect("parent");
    g.set_edge("a", "b");

    let flat = util::as_non_compound_graph(&g);
    assert!(flat.has_node("a"));
    assert!(flat.has_node("b"));
    assert!(!flat.has_node("sg"));
    assert!(!flat.is_compound());
    assert!(flat.is_multigraph());
    assert_eq!(flat.node("a"), Some(&NodeLabel::sized(1.0, 2.0)));
    assert!(flat.has_edge("a", "b", None));
}

#[test]
fn as_non_compound_graph_keeps_named_multi_edges_and_their_labels() {
    let mut g = new_graph(GraphOptions {
        compound: true,
        multigraph: true,
        ..Default::default()
    });
    g.set_parent("a", "sg").expect("parent");
    g.set_parent("b", "sg").expect("parent");
    g.set_edge_named("a", "b", Some("x"), Some(EdgeLabel::with_weight(2.0, 1)))
        .expect("named edge");
    g.set_edge_named("a", "b", Some("y"), Some(EdgeLabel::with_weight(5.0, 3)))
        .expect("named edge");
    g.set_edge("a", "b");

    let flat = util::as_non_compound_graph(&g);
    assert_eq!(flat.edge_count(), 3);
    assert_eq!(flat.edge("a", "b", Some("x")), Some(&EdgeLabel::with_weight(2.0, 1)));
    assert_eq!(flat.edge("a", "b", Some("y")), Some(&EdgeLabel::with_weight(5.0, 3)));
    assert!(flat.has_edge("a", "b", None));
    assert!(!flat.has_node("sg"));
}

#[test]
fn successor_weights_sums_the_weights_of_parallel_edges() {
    let mut g = new_graph(GraphOptions {
        multigraph: true,
        ..Default::default()
    });
    g.set_edge_with_label("a", "b", EdgeLabel::with_weight(2.0, 1));
    g.set_edge_named("a", "b", Some("x"), Some(EdgeLabel::with_weight(3.0, 1)))
        .expect("named edge");
    g.set_edge_with_label("a", "c", EdgeLabel::with_weight(1.0, 1));

    let weights = util::successor_weights(&g);
    assert_eq!(weights["a"]["b"], 5.0);
    assert_eq!(weights["a"]["c"], 1.0);
    assert!(weights["b"].is_empty());
}

#[test]
fn predecessor_weights_maps_targets_to_their_sources() {
    let mut g = new_graph(GraphOptions::default());
    g.set_edge_with_label("a", "c", EdgeLabel::with_weight(2.0, 1));
    g.set_edge_with_label("b", "c", EdgeLabel::with_weight(4.0, 1));

    let weights = util::predecessor_weights(&g);
    assert_eq!(weights["c"]["a"], 2.0);
    assert_eq!(weights["c"]["b"], 4.0);
    assert!(weights["a"].is_empty());
}

fn rect() -> NodeLabel {
    NodeLabel {
        x: Some(0.0),
        y: Some(0.0),
        ..NodeLabel::sized(10.0, 20.0)
    }
}

#[test]
fn intersect_rect_hits_the_top_and_bottom_sides() {
    assert_eq!(util::intersect_rect(&rect(), Point { x: 0.0, y: 100.0 }), Point { x: 0.0, y: 10.0 });
    assert_eq!(util::intersect_rect(&rect(), Point { x: 0.0, y: -100.0 }), Point { x: 0.0, y: -10.0 });
}

#[test]
fn intersect_rect_hits_the_left_and_right_sides() {
    assert_eq!(util::intersect_rect(&rect(), Point { x: 100.0, y: 0.0 }), Point { x: 5.0, y: 0.0 });
    assert_eq!(util::intersect_rect(&rect(), Point { x: -100.0, y: 0.0 }), Point { x: -5.0, y: 0.0 });
}

#[test]
fn intersect_rect_stays_on_the_border_for_diagonal_points() {
    for point in [
        Point { x: 10.0, y: 10.0 },
        Point { x: -3.0, y: 50.0 },
        Point { x: 40.0, y: -2.0 },
    ] {
        let p = util::intersect_rect(&rect(), point);
        let on_vertical_side = (p.x.abs() - 5.0).abs() < 1e-9 && p.y.abs() <= 10.0;
        let on_horizontal_side = (p.y.abs() - 10.0).abs() < 1e-9 && p.x.abs() <= 5.0;
        assert!(on_vertical_side || on_horizontal_side, "{p:?} is not on the border");
    }
}

#[test]
fn intersect_rect_returns_the_center_for_the_center_point() {
    assert_eq!(util::intersect_rect(&rect(), Point { x: 0.0, y: 0.0 }), Point { x: 0.0, y: 0.0 });
}

#[test]
fn build_layer_matrix_groups_nodes_by_rank_and_order() {
    let mut g = new_graph(GraphOptions::default());
    g.set_node("a", ranked_at(0, 0));
    g.set_node("b", ranked_at(0, 1));
    g.set_node("c", ranked_at(1, 0));
    g.set_node("d", ranked_at(1, 1));
    g.set_node("e", ranked_at(2, 0));

    assert_eq!(
        util::build_layer_matrix(&g),
        vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]
    );
}

#[test]
fn build_layer_matrix_sorts_by_order_not_insertion() {
    let mut g = new_graph(GraphOptions::default());
    g.set_node("b", ranked_at(0, 1));
    g.set_node("a", ranked_at(0, 0));
    assert_eq!(util::build_layer_matrix(&g), vec![vec!["a", "b"]]);
}

#[test]
fn normalize_ranks_shifts_the_minimum_rank_to_zero() {
    let mut g = new_graph(GraphOptions::default());
    g.set_node("a", ranked(3));
    g.set_node("b", ranked(5));
    g.set_node("c", ranked(4));

    util::normalize_ranks(&mut g);
    assert_eq!(g.node("a").and_then(|n| n.rank), Some(0));
    assert_eq!(g.node("b").and_then(|n| n.rank), Some(2));
    assert_eq!(g.node("c").and_then(|n| n.rank), Some(1));
}

#[test]
fn normalize_ranks_handles_negative_ranks() {
    let mut g = new_graph(GraphOptions::default());
    g.set_node("a", ranked(-3));
    g.set_node("b", ranked(-2));

    util::normalize_ranks(&mut g);
    assert_eq!(g.node("a").and_then(|n| n.rank), Some(0));
    assert_eq!(g.node("b").and_then(|n| n.rank), Some(1));
}

#[test]
fn remove_empty_ranks_drops_every_gap_without_a_rank_factor() {
    let mut g = new_graph(GraphOptions::default());
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(3));

    util::remove_empty_ranks(&mut g);
    assert_eq!(g.node("a").and_then(|n| n.rank), Some(0));
    assert_eq!(g.node("b").and_then(|n| n.rank), Some(1));
}

#[test]
fn remove_empty_ranks_keeps_multiples_of_the_rank_factor() {
    let mut g = new_graph(GraphOptions::default());
    g.graph_mut().node_rank_factor = Some(4);
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(8));

    util::remove_empty_ranks(&mut g);
    assert_eq!(g.node("a").and_then(|n| n.rank), Some(0));
    assert_eq!(g.node("b").and_then(|n| n.rank), Some(2));
}

#[test]
fn max_rank_ignores_unranked_nodes() {
    let mut g = new_graph(GraphOptions::default());
    assert_eq!(util::max_rank(&g), None);
    g.set_node("a", ranked(2));
    g.set_node("b", NodeLabel::default());
    g.set_node("c", ranked(7));
    assert_eq!(util::max_rank(&g), Some(7));
}

#[test]
fn partition_splits_by_predicate_and_keeps_order() {
    let (even, odd) = util::partition(vec![1, 2, 3, 4, 5, 6], |x| x % 2 == 0);
    assert_eq!(even, vec![2, 4, 6]);
    assert_eq!(odd, vec![1, 3, 5]);
}

#[test]
fn time_to_writer_reports_the_stage_and_returns_the_value() {
    let mut out: Vec<u8> = Vec::new();
    let value = util::time_to_writer("stage", &mut out, || 42);
    assert_eq!(value, 42);
    let text = String::from_utf8(out).expect("utf8");
    assert!(text.starts_with("stage time: "), "{text}");
    assert!(text.trim_end().ends_with("ms"), "{text}");
}

#[test]
fn time_returns_the_value_of_the_closure() {
    assert_eq!(util::time("noop", || "done"), "done");
}
