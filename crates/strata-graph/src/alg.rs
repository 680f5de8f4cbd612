//! Algorithms over [`Graph`](crate::Graph).
//!
//! Traversals walk successors in directed graphs and neighbors in undirected ones. All of
//! them use explicit stacks, so deep graphs do not exhaust the call stack.

mod tarjan;
mod traversal;

pub use tarjan::{find_cycles, tarjan};
pub use traversal::{Postorder, Preorder, components, is_acyclic, postorder, preorder};

use crate::Graph;

fn navigate<'g, N, E, G>(g: &'g Graph<N, E, G>, v: &str) -> Vec<&'g str>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let next = if g.is_directed() {
        g.successors(v)
    } else {
        g.neighbors(v)
    };
    next.unwrap_or_default()
}
