use strata::graphlib::{Graph, GraphOptions};
use strata::position::{position, position_y};
use strata::{GraphLabel, LayoutGraph, NodeLabel};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        compound: true,
        ..Default::default()
    });
    g.set_graph(GraphLabel {
        rank_separation: 50.0,
        node_separation: 50.0,
        edge_separation: 10.0,
        ..Default::default()
    });
    g
}

fn place(g: &mut LayoutGraph, v: &str, rank: i32, order: usize, width: f64, height: f64) {
    g.set_node(
        v,
        NodeLabel {
            rank: Some(rank),
            order: Some(order),
            ..NodeLabel::sized(width, height)
        },
    );
}

fn y(g: &LayoutGraph, v: &str) -> Option<f64> {
    g.node(v).and_then(|n| n.y)
}

fn x(g: &LayoutGraph, v: &str) -> Option<f64> {
    g.node(v).and_then(|n| n.x)
}

#[test]
fn position_respects_rank_separation() {
    let mut g = new_graph();
    g.graph_mut().rank_separation = 1000.0;
    place(&mut g, "a", 0, 0, 50.0, 100.0);
    place(&mut g, "b", 1, 0, 50.0, 80.0);
    g.set_edge("a", "b");

    position(&mut g);

    assert_eq!(y(&g, "a"), Some(100.0 / 2.0));
    assert_eq!(y(&g, "b"), Some(100.0 + 1000.0 + 80.0 / 2.0));
}

#[test]
fn position_uses_the_tallest_node_of_each_rank() {
    let mut g = new_graph();
    g.graph_mut().rank_separation = 1000.0;
    place(&mut g, "a", 0, 0, 50.0, 50.0);
    place(&mut g, "b", 0, 1, 50.0, 100.0);
    place(&mut g, "c", 1, 0, 50.0, 90.0);
    g.set_edge("a", "c");

    position(&mut g);

    assert_eq!(y(&g, "a"), Some(100.0 / 2.0));
    assert_eq!(y(&g, "b"), Some(100.0 / 2.0));
    assert_eq!(y(&g, "c"), Some(100.0 + 1000.0 + 90.0 / 2.0));
}

#[test]
fn position_respects_node_separation() {
    let mut g = new_graph();
    g.graph_mut().node_separation = 1000.0;
    place(&mut g, "a", 0, 0, 50.0, 100.0);
    place(&mut g, "b", 0, 1, 70.0, 80.0);

    position(&mut g);

    let a = x(&g, "a").expect("x assigned");
    assert_eq!(x(&g, "b"), Some(a + 50.0 / 2.0 + 1000.0 + 70.0 / 2.0));
}

#[test]
fn position_leaves_subgraph_nodes_alone() {
    let mut g = new_graph();
    place(&mut g, "a", 0, 0, 50.0, 50.0);
    g.set_node("sg1", NodeLabel::default());
    g.set_parent("a", "sg1").expect("compound graph");

    position(&mut g);

    assert_eq!(x(&g, "sg1"), None);
    assert_eq!(y(&g, "sg1"), None);
    assert!(x(&g, "a").is_some());
}

#[test]
fn position_y_stacks_ranks_in_order() {
    let mut g = new_graph();
    place(&mut g, "a", 0, 0, 10.0, 20.0);
    place(&mut g, "b", 1, 0, 10.0, 40.0);
    place(&mut g, "c", 2, 0, 10.0, 10.0);

    position_y(&mut g);

    assert_eq!(y(&g, "a"), Some(10.0));
    assert_eq!(y(&g, "b"), Some(20.0 + 50.0 + 20.0));
    assert_eq!(y(&g, "c"), Some(20.0 + 50.0 + 40.0 + 50.0 + 5.0));
}
