use strata::graphlib::{Graph, GraphOptions};
use strata::order::{cross_count, init_order, order};
use strata::{EdgeLabel, GraphLabel, LayoutGraph, NodeLabel, util};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions::default());
    g.set_graph(GraphLabel::default());
    g
}

fn ranked(g: &mut LayoutGraph, vs: &[&str], rank: i32) {
    for v in vs {
        g.set_node(
            *v,
            NodeLabel {
                rank: Some(rank),
                ..Default::default()
            },
        );
    }
}

fn layering(layers: &[&[&str]]) -> Vec<Vec<String>> {
    layers
        .iter()
        .map(|layer| layer.iter().map(|v| v.to_string()).collect())
        .collect()
}

fn crossings_after_order(g: &mut LayoutGraph) -> f64 {
    order(g);
    let layering = util::build_layer_matrix(g);
    cross_count(g, &layering)
}

#[test]
fn cross_count_of_an_empty_layering_is_zero() {
    let g = new_graph();
    assert_eq!(cross_count(&g, &[]), 0.0);
}

#[test]
fn cross_count_is_zero_without_crossings() {
    let mut g = new_graph();
    g.set_edge("a1", "b1");
    g.set_edge("a2", "b2");
    assert_eq!(cross_count(&g, &layering(&[&["a1", "a2"], &["b1", "b2"]])), 0.0);
}

#[test]
fn cross_count_counts_a_single_crossing() {
    let mut g = new_graph();
    g.set_edge("a1", "b1");
    g.set_edge("a2", "b2");
    assert_eq!(cross_count(&g, &layering(&[&["a1", "a2"], &["b2", "b1"]])), 1.0);
}

#[test]
fn cross_count_weighs_crossings() {
    let mut g = new_graph();
    g.set_edge_with_label("a1", "b1", EdgeLabel::with_weight(2.0, 1));
    g.set_edge("a2", "b2");
    assert_eq!(cross_count(&g, &layering(&[&["a1", "a2"], &["b2", "b1"]])), 2.0);
}

#[test]
fn cross_count_sums_over_every_pair_of_layers() {
    let mut g = new_graph();
    g.set_path(&["a1", "b1", "c1"]);
    g.set_path(&["a2", "b2", "c2"]);
    assert_eq!(
        cross_count(&g, &layering(&[&["a1", "a2"], &["b2", "b1"], &["c1", "c2"]])),
        2.0
    );
}

#[test]
fn cross_count_handles_shared_endpoints() {
    let mut g = new_graph();
    g.set_path(&["a", "b", "c"]);
    g.set_path(&["d", "e", "c"]);
    g.set_path(&["a", "f", "i"]);
    g.set_edge("a", "e");

    assert_eq!(cross_count(&g, &layering(&[&["a", "d"], &["b", "e", "f"], &["c", "i"]])), 1.0);
    assert_eq!(cross_count(&g, &layering(&[&["d", "a"], &["e", "b", "f"], &["c", "i"]])), 0.0);
}

#[test]
fn order_does_not_add_crossings_to_a_tree() {
    let mut g = new_graph();
    ranked(&mut g, &["a"], 1);
    ranked(&mut g, &["b", "e"], 2);
    ranked(&mut g, &["c", "d", "f"], 3);
    g.set_path(&["a", "b", "c"]);
    g.set_edge("b", "d");
    g.set_path(&["a", "e", "f"]);

    assert_eq!(crossings_after_order(&mut g), 0.0);
}

#[test]
fn order_solves_a_simple_graph() {
    let mut g = new_graph();
    ranked(&mut g, &["a", "d"], 1);
    ranked(&mut g, &["b", "f", "e"], 2);
    ranked(&mut g, &["c", "g"], 3);
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "e");
    g.set_path(&["d", "f", "g"]);

    assert_eq!(crossings_after_order(&mut g), 0.0);
}

#[test]
fn order_minimizes_crossings() {
    let mut g = new_graph();
    ranked(&mut g, &["a"], 1);
    ranked(&mut g, &["b", "e", "g"], 2);
    ranked(&mut g, &["c", "f", "h"], 3);
    ranked(&mut g, &["d"], 4);
    g.set_path(&["a", "b", "c", "d"]);
    g.set_path(&["a", "e", "f", "d"]);
    g.set_path(&["a", "g", "h", "d"]);
    g.set_edge("b", "f");
    g.set_edge("e", "c");

    assert!(crossings_after_order(&mut g) <= 1.0);
}

#[test]
fn order_assigns_a_distinct_order_within_each_rank() {
    let mut g = new_graph();
    ranked(&mut g, &["a", "b", "c"], 0);
    ranked(&mut g, &["d", "e", "f"], 1);
    g.set_edge("a", "f");
    g.set_edge("b", "e");
    g.set_edge("c", "d");

    order(&mut g);

    for layer in util::build_layer_matrix(&g) {
        let mut orders: Vec<usize> = layer
            .iter()
            .filter_map(|v| g.node(v).and_then(|n| n.order))
            .collect();
        orders.sort_unstable();
        assert_eq!(orders, (0..layer.len()).collect::<Vec<_>>());
    }
    assert_eq!(cross_count(&g, &util::build_layer_matrix(&g)), 0.0);
}

/// Four ranks of five nodes with pseudo-random weighted edges between neighboring ranks.
fn scrambled_graph(seed: u64) -> LayoutGraph {
    let mut state = seed;
    let mut next = move |bound: u64| {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) % bound
    };

    let mut g = new_graph();
    for rank in 0..4 {
        let names: Vec<String> = (0..5).map(|i| format!("r{rank}n{i}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        ranked(&mut g, &names, rank);
    }
    for rank in 0..3 {
        for _ in 0..8 {
            let v = format!("r{rank}n{}", next(5));
            let w = format!("r{}n{}", rank + 1, next(5));
            g.set_edge_with_label(v, w, EdgeLabel::with_weight(1.0 + next(3) as f64, 1));
        }
    }
    g
}

#[test]
fn order_never_ends_with_more_crossings_than_the_initial_order() {
    for seed in 0..32 {
        let mut g = scrambled_graph(seed);
        let initial = init_order(&g);
        let before = cross_count(&g, &initial);

        let after = crossings_after_order(&mut g);

        assert!(after <= before, "seed {seed}: {after} > {before}");
    }
}

#[test]
fn order_keeps_an_initial_order_that_is_already_optimal() {
    let mut g = new_graph();
    ranked(&mut g, &["a", "b"], 0);
    ranked(&mut g, &["c", "d"], 1);
    g.set_edge("a", "c");
    g.set_edge("b", "d");

    let initial = init_order(&g);
    assert_eq!(cross_count(&g, &initial), 0.0);
    assert_eq!(crossings_after_order(&mut g), 0.0);
}
