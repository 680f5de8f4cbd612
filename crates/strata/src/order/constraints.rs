use super::{ConstraintGraph, LayerGraph};
use rustc_hash::FxHashMap as HashMap;

/// Records, for the freshly sorted `vs`, which sibling subgraph came first under each common
/// parent, so later ranks keep sibling subgraphs in the same left-to-right order.
pub fn add_subgraph_constraints(g: &LayerGraph, cg: &mut ConstraintGraph, vs: &[String]) {
    let mut prev: HashMap<String, String> = HashMap::default();
    let mut root_prev: Option<String> = None;

    for v in vs {
        let mut child = g.parent(v).map(str::to_string);
        while let Some(c) = child {
            let parent = g.parent(&c).map(str::to_string);
            let prev_child = match &parent {
                Some(p) => prev.insert(p.clone(), c.clone()),
                None => root_prev.replace(c.clone()),
            };
            if let Some(prev_child) = prev_child {
                if prev_child != c {
                    cg.set_edge(prev_child, c);
                    break;
                }
            }
            child = parent;
        }
    }
}
