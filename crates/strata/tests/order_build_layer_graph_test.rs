use strata::graphlib::{Graph, GraphOptions};
use strata::order::{LayerGraph, Relationship, build_layer_graph};
use strata::{EdgeLabel, GraphLabel, LayoutGraph, NodeLabel};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        ..Default::default()
    });
    g.set_graph(GraphLabel::default());
    g
}

fn ranked(g: &mut LayoutGraph, v: &str, rank: i32) {
    g.set_node(
        v,
        NodeLabel {
            rank: Some(rank),
            ..Default::default()
        },
    );
}

fn four_node_graph() -> LayoutGraph {
    let mut g = new_graph();
    ranked(&mut g, "a", 1);
    ranked(&mut g, "b", 1);
    ranked(&mut g, "c", 2);
    ranked(&mut g, "d", 3);
    g.set_edge("a", "c");
    g.set_edge("b", "c");
    g.set_edge("c", "d");
    g
}

fn root_children(lg: &LayerGraph) -> Vec<String> {
    let root = lg.graph().root.clone();
    let mut children: Vec<String> = lg.children(&root).into_iter().map(str::to_string).collect();
    children.sort();
    children
}

fn weight(lg: &LayerGraph, u: &str, v: &str) -> Option<f64> {
    lg.edge(u, v, None).map(|e| e.weight)
}

#[test]
fn places_movable_nodes_without_parents_under_the_root() {
    let g = four_node_graph();
    let lg = build_layer_graph(&g, 1, Relationship::InEdges, None);

    assert!(lg.has_node(&lg.graph().root));
    assert_eq!(root_children(&lg), vec!["a", "b"]);
}

#[test]
fn copies_the_nodes_of_the_rank() {
    let g = four_node_graph();

    let lg = build_layer_graph(&g, 1, Relationship::InEdges, None);
    assert!(lg.has_node("a") && lg.has_node("b"));
    assert!(!lg.has_node("c"));

    let lg = build_layer_graph(&g, 2, Relationship::InEdges, None);
    assert_eq!(root_children(&lg), vec!["c"]);

    let lg = build_layer_graph(&g, 3, Relationship::InEdges, None);
    assert_eq!(root_children(&lg), vec!["d"]);
}

#[test]
fn copies_the_order_of_every_node() {
    let mut g = four_node_graph();
    for (v, order) in [("a", 1), ("b", 0), ("c", 0)] {
        if let Some(n) = g.node_mut(v) {
            n.order = Some(order);
        }
    }
    let lg = build_layer_graph(&g, 2, Relationship::InEdges, None);

    assert_eq!(lg.node("a").and_then(|n| n.order), Some(1));
    assert_eq!(lg.node("b").and_then(|n| n.order), Some(0));
    assert_eq!(lg.node("c").and_then(|n| n.order), Some(0));
}

#[test]
fn copies_in_edges_of_the_rank() {
    let g = four_node_graph();

    assert_eq!(build_layer_graph(&g, 1, Relationship::InEdges, None).edge_count(), 0);

    let lg = build_layer_graph(&g, 2, Relationship::InEdges, None);
    assert_eq!(lg.edge_count(), 2);
    assert_eq!(weight(&lg, "a", "c"), Some(1.0));
    assert_eq!(weight(&lg, "b", "c"), Some(1.0));

    let lg = build_layer_graph(&g, 3, Relationship::InEdges, None);
    assert_eq!(lg.edge_count(), 1);
    assert_eq!(weight(&lg, "c", "d"), Some(1.0));
}

#[test]
fn copies_out_edges_pointing_at_the_rank() {
    let g = four_node_graph();

    let lg = build_layer_graph(&g, 1, Relationship::OutEdges, None);
    assert_eq!(lg.edge_count(), 2);
    assert_eq!(weight(&lg, "c", "a"), Some(1.0));
    assert_eq!(weight(&lg, "c", "b"), Some(1.0));

    let lg = build_layer_graph(&g, 2, Relationship::OutEdges, None);
    assert_eq!(lg.edge_count(), 1);
    assert_eq!(weight(&lg, "d", "c"), Some(1.0));

    assert_eq!(build_layer_graph(&g, 3, Relationship::OutEdges, None).edge_count(), 0);
}

#[test]
fn collapses_multi_edges() {
    let mut g = new_graph();
    ranked(&mut g, "a", 1);
    ranked(&mut g, "b", 2);
    g.set_edge_with_label("a", "b", EdgeLabel::with_weight(2.0, 1));
    g.set_edge_named("a", "b", Some("multi"), Some(EdgeLabel::with_weight(3.0, 1)))
        .expect("named edge");

    let lg = build_layer_graph(&g, 2, Relationship::InEdges, None);
    assert_eq!(weight(&lg, "a", "b"), Some(5.0));
}

#[test]
fn preserves_the_subgraph_hierarchy_of_the_rank() {
    let mut g = new_graph();
    for v in ["a", "b", "c"] {
        ranked(&mut g, v, 0);
    }
    g.set_node(
        "sg",
        NodeLabel {
            min_rank: Some(0),
            max_rank: Some(0),
            border_left: vec![Some("bl".to_string())],
            border_right: vec![Some("br".to_string())],
            ..Default::default()
        },
    );
    g.set_parent("a", "sg").expect("compound graph");
    g.set_parent("b", "sg").expect("compound graph");

    let lg = build_layer_graph(&g, 0, Relationship::InEdges, None);

    assert_eq!(root_children(&lg), vec!["c", "sg"]);
    assert_eq!(lg.parent("a"), Some("sg"));
    assert_eq!(lg.parent("b"), Some("sg"));
    let sg = lg.node("sg").expect("subgraph");
    assert_eq!(sg.border_left.as_deref(), Some("bl"));
    assert_eq!(sg.border_right.as_deref(), Some("br"));
}

#[test]
fn restricts_candidates_to_the_given_nodes() {
    let g = four_node_graph();
    let nodes = vec!["a".to_string()];
    let lg = build_layer_graph(&g, 1, Relationship::InEdges, Some(&nodes));

    assert_eq!(root_children(&lg), vec!["a"]);
}
