use strata::add_border_segments::add_border_segments;
use strata::graphlib::{Graph, GraphOptions};
use strata::{BorderSide, GraphLabel, LayoutGraph, NodeKind, NodeLabel};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        compound: true,
        ..Default::default()
    });
    g.set_graph(GraphLabel::default());
    g
}

fn subgraph(min_rank: i32, max_rank: i32) -> NodeLabel {
    NodeLabel {
        min_rank: Some(min_rank),
        max_rank: Some(max_rank),
        ..Default::default()
    }
}

fn border(g: &LayoutGraph, sg: &str, side: BorderSide, rank: usize) -> String {
    let node = g.node(sg).expect("subgraph");
    let nodes = match side {
        BorderSide::Left => &node.border_left,
        _ => &node.border_right,
    };
    nodes
        .get(rank)
        .cloned()
        .flatten()
        .unwrap_or_else(|| panic!("{sg} has no {side:?} border on rank {rank}"))
}

fn assert_border_node(g: &LayoutGraph, v: &str, side: BorderSide, rank: i32, parent: &str) {
    let node = g.node(v).expect("border node");
    assert_eq!(node.kind, NodeKind::Border(side));
    assert_eq!(node.rank, Some(rank));
    assert_eq!((node.width, node.height), (0.0, 0.0));
    assert_eq!(g.parent(v), Some(parent));
}

#[test]
fn does_not_add_border_nodes_to_a_non_compound_graph() {
    let mut g: LayoutGraph = Graph::new(GraphOptions::default());
    g.set_node(
        "a",
        NodeLabel {
            rank: Some(0),
            ..Default::default()
        },
    );
    add_border_segments(&mut g);

    assert_eq!(g.node_count(), 1);
}

#[test]
fn does_not_add_border_nodes_to_a_graph_without_subgraphs() {
    let mut g = new_graph();
    g.set_node(
        "a",
        NodeLabel {
            rank: Some(0),
            ..Default::default()
        },
    );
    add_border_segments(&mut g);

    assert_eq!(g.node_count(), 1);
}

#[test]
fn adds_a_border_for_a_single_rank_subgraph() {
    let mut g = new_graph();
    g.set_node("sg", subgraph(1, 1));
    add_border_segments(&mut g);

    let bl = border(&g, "sg", BorderSide::Left, 1);
    let br = border(&g, "sg", BorderSide::Right, 1);
    assert_border_node(&g, &bl, BorderSide::Left, 1, "sg");
    assert_border_node(&g, &br, BorderSide::Right, 1, "sg");
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn adds_a_chained_border_for_a_multi_rank_subgraph() {
    let mut g = new_graph();
    g.set_node("sg", subgraph(1, 2));
    add_border_segments(&mut g);

    let node = g.node("sg").expect("subgraph");
    assert_eq!(node.border_left.len(), 3);
    assert_eq!(node.border_left[0], None);

    for side in [BorderSide::Left, BorderSide::Right] {
        let first = border(&g, "sg", side, 1);
        let second = border(&g, "sg", side, 2);
        assert_border_node(&g, &first, side, 1, "sg");
        assert_border_node(&g, &second, side, 2, "sg");
        assert!(g.has_edge(&first, &second, None));
    }
    assert_eq!(g.edge_count(), 2);
}

#[test]
fn adds_borders_for_nested_subgraphs() {
    let mut g = new_graph();
    g.set_node("sg1", subgraph(1, 1));
    g.set_node("sg2", subgraph(1, 1));
    g.set_parent("sg2", "sg1").expect("compound graph");
    add_border_segments(&mut g);

    for sg in ["sg1", "sg2"] {
        let bl = border(&g, sg, BorderSide::Left, 1);
        let br = border(&g, sg, BorderSide::Right, 1);
        assert_border_node(&g, &bl, BorderSide::Left, 1, sg);
        assert_border_node(&g, &br, BorderSide::Right, 1, sg);
    }
    assert_ne!(
        border(&g, "sg1", BorderSide::Left, 1),
        border(&g, "sg2", BorderSide::Left, 1)
    );
}
