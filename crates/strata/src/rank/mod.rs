//! Rank assignment.
//!
//! Every node gets an integer rank such that `rank(w) - rank(v) >= min_len` holds for every
//! edge. The default ranker minimizes the weighted edge length with network simplex; the
//! cheaper rankers trade quality for speed.

pub mod feasible_tree;
pub mod network_simplex;
pub mod util;

pub use feasible_tree::{TreeEdge, TreeGraph, TreeNode, feasible_tree};
pub use network_simplex::network_simplex;
pub use util::{longest_path, slack};

use crate::{LayoutGraph, Ranker};

/// Ranks `g` with the ranker selected on its graph label. `g` must be acyclic and must not
/// be compound.
pub fn rank(g: &mut LayoutGraph) {
    let ranker = g.graph().ranker;
    tracing::trace!(?ranker, nodes = g.node_count(), "ranking");
    match ranker {
        Ranker::NetworkSimplex => network_simplex(g),
        Ranker::TightTree => {
            longest_path(g);
            feasible_tree(g);
        }
        Ranker::LongestPath => longest_path(g),
    }
}
