//! Layered layout for directed compound multigraphs.
//!
//! [`layout`] assigns ranks, a crossing-reduced order within every rank, and coordinates to
//! the nodes of a [`LayoutGraph`], then routes every edge. The individual stages are public
//! modules so they can be exercised on their own.

pub use strata_graph as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod acyclic;
pub mod add_border_segments;
pub mod coordinate_system;
pub mod data;
mod error;
pub mod greedy_fas;
mod layout;
mod model;
pub mod nesting_graph;
pub mod normalize;
pub mod order;
pub mod parent_dummy_chains;
pub mod position;
pub mod rank;
pub mod self_edges;
pub mod util;

pub use error::{LayoutError, Result};
pub use layout::{layout, layout_with_options, read_json, write_json};
pub use model::{
    Acyclicer, Align, BorderSide, EdgeLabel, GraphLabel, LabelPos, LayoutGraph, LayoutOptions,
    NodeKind, NodeLabel, Point, RankDir, Ranker, SelfEdge,
};
