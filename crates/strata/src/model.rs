//! Label types for layout graphs.
//!
//! The same labels are used for the caller's graph and for the internal layout graph. Input
//! and output fields are serializable; pipeline bookkeeping is skipped and never read from
//! the caller's labels.

use crate::graphlib::{EdgeKey, Graph};
use serde::{Deserialize, Serialize};

pub type LayoutGraph = Graph<NodeLabel, EdgeLabel, GraphLabel>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

/// Pins horizontal placement to one of the four alignments instead of balancing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Align {
    UL,
    UR,
    DL,
    DR,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Acyclicer {
    /// Depth-first back-edge removal.
    #[default]
    Dfs,
    Greedy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ranker {
    #[default]
    NetworkSimplex,
    TightTree,
    LongestPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPos {
    L,
    C,
    #[default]
    R,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphLabel {
    pub rank_dir: RankDir,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    pub node_separation: f64,
    pub edge_separation: f64,
    pub rank_separation: f64,
    pub margin_x: f64,
    pub margin_y: f64,
    pub acyclicer: Acyclicer,
    pub ranker: Ranker,

    /// Drawing size, written by layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    #[serde(skip)]
    pub nesting_root: Option<String>,
    #[serde(skip)]
    pub node_rank_factor: Option<i32>,
    /// First dummy node of every normalized edge chain.
    #[serde(skip)]
    pub dummy_chains: Vec<String>,
    #[serde(skip)]
    pub max_rank: Option<i32>,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rank_dir: RankDir::TB,
            align: None,
            node_separation: 50.0,
            edge_separation: 20.0,
            rank_separation: 50.0,
            margin_x: 0.0,
            margin_y: 0.0,
            acyclicer: Acyclicer::Dfs,
            ranker: Ranker::NetworkSimplex,
            width: None,
            height: None,
            nesting_root: None,
            node_rank_factor: None,
            dummy_chains: Vec::new(),
            max_rank: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// What a node of the layout graph stands for.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeKind {
    /// A caller node (leaf or subgraph).
    #[default]
    Ordinary,
    /// Root that ties every top-level node together while ranking.
    Root,
    /// Subgraph border node.
    Border(BorderSide),
    /// Marks the rank an edge label will occupy while empty ranks are removed.
    EdgeProxy { edge: EdgeKey },
    /// Reserves room next to a node for one of its self-loops.
    SelfEdge { edge: EdgeKey, label: Box<EdgeLabel> },
    /// Intermediate node of a normalized long edge. The first link of a chain keeps the
    /// original label; `has_label` marks the link that carries the edge label.
    ChainLink {
        edge: EdgeKey,
        original: Option<Box<EdgeLabel>>,
        has_label: bool,
    },
}

impl NodeKind {
    pub fn is_dummy(&self) -> bool {
        !matches!(self, NodeKind::Ordinary)
    }

    pub fn is_border(&self) -> bool {
        matches!(self, NodeKind::Border(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfEdge {
    pub edge: EdgeKey,
    pub label: EdgeLabel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,

    #[serde(skip)]
    pub kind: NodeKind,
    #[serde(skip)]
    pub rank: Option<i32>,
    #[serde(skip)]
    pub order: Option<usize>,
    #[serde(skip)]
    pub label_pos: Option<LabelPos>,
    #[serde(skip)]
    pub min_rank: Option<i32>,
    #[serde(skip)]
    pub max_rank: Option<i32>,
    #[serde(skip)]
    pub border_top: Option<String>,
    #[serde(skip)]
    pub border_bottom: Option<String>,
    /// Left border node per rank, indexed by rank.
    #[serde(skip)]
    pub border_left: Vec<Option<String>>,
    #[serde(skip)]
    pub border_right: Vec<Option<String>>,
    #[serde(skip)]
    pub self_edges: Vec<SelfEdge>,
}

impl NodeLabel {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.kind.is_dummy()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeLabel {
    pub min_len: usize,
    pub weight: f64,
    pub width: f64,
    pub height: f64,
    pub label_offset: f64,
    pub label_pos: LabelPos,

    /// Label center, only written for edges with a label box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Point>,

    #[serde(skip)]
    pub label_rank: Option<i32>,
    #[serde(skip)]
    pub reversed: bool,
    #[serde(skip)]
    pub forward_name: Option<String>,
    #[serde(skip)]
    pub nesting_edge: bool,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            min_len: 1,
            weight: 1.0,
            width: 0.0,
            height: 0.0,
            label_offset: 10.0,
            label_pos: LabelPos::R,
            x: None,
            y: None,
            points: Vec::new(),
            label_rank: None,
            reversed: false,
            forward_name: None,
            nesting_edge: false,
        }
    }
}

impl EdgeLabel {
    /// Label of an internal edge that only carries a weight and a minimum length.
    pub fn with_weight(weight: f64, min_len: usize) -> Self {
        Self {
            weight,
            min_len,
            ..Default::default()
        }
    }
}

/// Options for a single [`layout`](crate::layout) call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Log the duration of every pipeline stage (target `strata::timing`).
    pub debug_timing: bool,
}
