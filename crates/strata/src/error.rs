use crate::graphlib::GraphError;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("layout requires a directed graph")]
    Undirected,
    #[error("{item} has an invalid {field}: {value}")]
    InvalidValue {
        item: String,
        field: &'static str,
        value: f64,
    },
    #[error("self-loop on subgraph {node} cannot be routed")]
    SubgraphSelfLoop { node: String },
    #[error("invalid graph document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
