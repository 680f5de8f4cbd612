//! Graph container used by `strata`.
//!
//! [`Graph`] is a directed or undirected graph with optional multigraph (named parallel
//! edges) and compound (node nesting) support. Algorithms over it live in [`alg`], and
//! [`json`] maps a graph to and from a plain serde document.

pub mod alg;
mod error;
mod graph;
pub mod json;

pub use error::{GraphError, Result};
pub use graph::{EdgeKey, Graph, GraphOptions};
