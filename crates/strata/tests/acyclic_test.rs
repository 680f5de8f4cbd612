use strata::graphlib::{Graph, GraphOptions, alg};
use strata::{Acyclicer, EdgeLabel, GraphLabel, LayoutGraph, acyclic};

const ACYCLICERS: [Acyclicer; 2] = [Acyclicer::Greedy, Acyclicer::Dfs];

fn new_graph(acyclicer: Acyclicer) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        ..Default::default()
    });
    g.set_graph(GraphLabel {
        acyclicer,
        ..Default::default()
    });
    g
}

fn sorted_edges(g: &LayoutGraph) -> Vec<(String, String)> {
    let mut edges: Vec<(String, String)> = g.edges().map(|e| (e.v.clone(), e.w.clone())).collect();
    edges.sort();
    edges
}

fn pair(v: &str, w: &str) -> (String, String) {
    (v.to_string(), w.to_string())
}

#[test]
fn acyclic_run_does_not_change_an_already_acyclic_graph() {
    for acyclicer in ACYCLICERS {
        let mut g = new_graph(acyclicer);
        g.set_path(&["a", "b", "d"]);
        g.set_path(&["a", "c", "d"]);

        acyclic::run(&mut g);
        assert_eq!(
            sorted_edges(&g),
            vec![pair("a", "b"), pair("a", "c"), pair("b", "d"), pair("c", "d")]
        );
    }
}

#[test]
fn acyclic_run_breaks_cycles_in_the_input_graph() {
    for acyclicer in ACYCLICERS {
        let mut g = new_graph(acyclicer);
        g.set_path(&["a", "b", "c", "d", "a"]);
        acyclic::run(&mut g);
        assert!(alg::is_acyclic(&g), "{acyclicer:?} left a cycle");
    }
}

#[test]
fn acyclic_run_creates_a_multi_edge_where_necessary() {
    for acyclicer in ACYCLICERS {
        let mut g = new_graph(acyclicer);
        g.set_path(&["a", "b", "a"]);
        acyclic::run(&mut g);
        assert!(alg::is_acyclic(&g));

        let parallel = if g.has_edge("a", "b", None) {
            g.out_edges("a", Some("b"))
        } else {
            g.out_edges("b", Some("a"))
        };
        assert_eq!(parallel.map(|es| es.len()), Some(2));
        assert_eq!(g.edge_count(), 2);
    }
}

#[test]
fn acyclic_run_marks_reversed_edges_with_their_original_name() {
    let mut g = new_graph(Acyclicer::Dfs);
    g.set_edge("a", "b");
    g.set_edge_named("b", "a", Some("back"), None::<EdgeLabel>)
        .expect("named edge");
    acyclic::run(&mut g);

    let reversed: Vec<&EdgeLabel> = g
        .edges()
        .filter_map(|e| g.edge_by_key(e))
        .filter(|l| l.reversed)
        .collect();
    assert_eq!(reversed.len(), 1);
    assert_eq!(reversed[0].forward_name.as_deref(), Some("back"));
}

#[test]
fn acyclic_undo_does_not_change_edges_where_the_original_graph_was_acyclic() {
    for acyclicer in ACYCLICERS {
        let mut g = new_graph(acyclicer);
        g.set_edge_with_label("a", "b", EdgeLabel::with_weight(3.0, 2));
        acyclic::run(&mut g);
        acyclic::undo(&mut g);
        assert_eq!(g.edge("a", "b", None), Some(&EdgeLabel::with_weight(3.0, 2)));
        assert_eq!(g.edge_count(), 1);
    }
}

#[test]
fn acyclic_undo_can_restore_previously_reversed_edges() {
    for acyclicer in ACYCLICERS {
        let mut g = new_graph(acyclicer);
        g.set_edge_with_label("a", "b", EdgeLabel::with_weight(3.0, 2));
        g.set_edge_with_label("b", "a", EdgeLabel::with_weight(4.0, 3));
        acyclic::run(&mut g);
        acyclic::undo(&mut g);
        assert_eq!(g.edge("a", "b", None), Some(&EdgeLabel::with_weight(3.0, 2)));
        assert_eq!(g.edge("b", "a", None), Some(&EdgeLabel::with_weight(4.0, 3)));
        assert_eq!(g.edge_count(), 2);
    }
}

#[test]
fn acyclic_undo_restores_the_name_of_a_reversed_multi_edge() {
    let mut g = new_graph(Acyclicer::Dfs);
    g.set_edge("a", "b");
    g.set_edge_named("b", "a", Some("back"), Some(EdgeLabel::with_weight(2.0, 1)))
        .expect("named edge");
    acyclic::run(&mut g);
    acyclic::undo(&mut g);

    assert_eq!(g.edge("b", "a", Some("back")), Some(&EdgeLabel::with_weight(2.0, 1)));
    assert_eq!(g.edge_count(), 2);
}

#[test]
fn acyclic_greedy_prefers_to_break_cycles_at_low_weight_edges() {
    let mut g = new_graph(Acyclicer::Greedy);
    for (v, w) in [("a", "b"), ("b", "c"), ("d", "a")] {
        g.set_edge_with_label(v, w, EdgeLabel::with_weight(2.0, 1));
    }
    g.set_edge_with_label("c", "d", EdgeLabel::with_weight(1.0, 1));

    acyclic::run(&mut g);
    assert!(alg::is_acyclic(&g));
    assert!(!g.has_edge("c", "d", None));
}

#[test]
fn acyclic_dfs_fas_returns_the_back_edges_of_a_walk() {
    let mut g = new_graph(Acyclicer::Dfs);
    g.set_path(&["a", "b", "c", "a"]);
    let fas = acyclic::dfs_fas(&g);
    assert_eq!(fas.len(), 1);
    assert_eq!((fas[0].v.as_str(), fas[0].w.as_str()), ("c", "a"));
}
