#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("cannot {op} in a non-compound graph")]
    NotCompound { op: &'static str },
    #[error("cannot set a named edge {v} -> {w} ({name}) in a non-multigraph")]
    NamedEdgeOnSimpleGraph { v: String, w: String, name: String },
    #[error("setting {parent} as parent of {node} would create a cycle")]
    ParentCycle { node: String, parent: String },
    #[error("graph document references a missing node: {node}")]
    MissingNode { node: String },
}

pub type Result<T> = std::result::Result<T, GraphError>;
