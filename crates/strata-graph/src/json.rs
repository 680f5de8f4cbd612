//! Plain document form of a [`Graph`].
//!
//! The document carries the graph options, every node (label and parent), every edge
//! (endpoints, name and label) and the graph label. [`read`] of a [`write`] rebuilds an
//! equal graph, including insertion order.

use crate::{Graph, GraphError, GraphOptions, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphJson<N, E, G> {
    pub options: GraphOptions,
    pub nodes: Vec<NodeJson<N>>,
    pub edges: Vec<EdgeJson<E>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<G>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeJson<N> {
    pub v: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<N>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeJson<E> {
    pub v: String,
    pub w: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<E>,
}

pub fn write<N, E, G>(g: &Graph<N, E, G>) -> GraphJson<N, E, G>
where
    N: Default + Clone + 'static,
    E: Default + Clone + 'static,
    G: Default + Clone,
{
    let mut nodes: Vec<NodeJson<N>> = Vec::with_capacity(g.node_count());
    g.for_each_node(|v, label| {
        nodes.push(NodeJson {
            v: v.to_string(),
            value: Some(label.clone()),
            parent: g.parent(v).map(str::to_string),
        });
    });

    let mut edges: Vec<EdgeJson<E>> = Vec::with_capacity(g.edge_count());
    g.for_each_edge(|key, label| {
        edges.push(EdgeJson {
            v: key.v.clone(),
            w: key.w.clone(),
            name: key.name.clone(),
            value: Some(label.clone()),
        });
    });

    GraphJson {
        options: g.options(),
        nodes,
        edges,
        value: Some(g.graph().clone()),
    }
}

/// Rebuilds a graph from its document. Parent links are applied after every node exists,
/// so a parent listed after its child keeps its own position.
pub fn read<N, E, G>(doc: GraphJson<N, E, G>) -> Result<Graph<N, E, G>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut g: Graph<N, E, G> = Graph::new(doc.options);
    if let Some(value) = doc.value {
        g.set_graph(value);
    }

    let mut parents: Vec<(String, String)> = Vec::new();
    for node in doc.nodes {
        match node.value {
            Some(label) => g.set_node(node.v.clone(), label),
            None => g.ensure_node(node.v.clone()),
        };
        if let Some(parent) = node.parent {
            parents.push((node.v, parent));
        }
    }
    for (v, parent) in parents {
        if !g.has_node(&parent) {
            return Err(GraphError::MissingNode { node: parent });
        }
        g.set_parent(v, parent)?;
    }

    for edge in doc.edges {
        g.set_edge_named(edge.v, edge.w, edge.name, edge.value)?;
    }
    Ok(g)
}
