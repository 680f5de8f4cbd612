//! Compound multigraph container.
//!
//! Node and edge labels are generic. Every node keeps its own in/out edge sets plus
//! predecessor/successor multiplicity tables, so neighbor queries never scan the whole edge
//! list and removing one of several parallel edges keeps the node adjacent.

mod edge_key;
mod entries;
mod options;

pub use edge_key::EdgeKey;
pub use options::GraphOptions;

use crate::error::{GraphError, Result};
use edge_key::EdgeKeyView;
use entries::{EdgeEntry, NodeEntry, SlotMap, SlotSet, decrement, increment};
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::Arc;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Dead slots tolerated before compaction is considered.
const MIN_DEAD_SLOTS: usize = 64;

type NodeLabelFn<N> = Arc<dyn Fn(&str) -> N + Send + Sync>;
type EdgeLabelFn<E> = Arc<dyn Fn(&str, &str, Option<&str>) -> E + Send + Sync>;

#[derive(Clone)]
pub struct Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    options: GraphOptions,

    graph_label: G,
    default_node_label: NodeLabelFn<N>,
    default_edge_label: EdgeLabelFn<E>,

    nodes: Vec<Option<NodeEntry<N>>>,
    node_index: HashMap<String, usize>,

    edges: Vec<Option<EdgeEntry<E>>>,
    edge_index: HashMap<EdgeKey, usize>,

    // Top-level nodes of a compound graph, in insertion order.
    root_children: SlotSet,
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            graph_label: G::default(),
            default_node_label: Arc::new(|_| N::default()),
            default_edge_label: Arc::new(|_, _, _| E::default()),
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            root_children: SlotSet::default(),
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    pub fn is_compound(&self) -> bool {
        self.options.compound
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    /// Label factory used when a node is created implicitly (by an edge, a parent link or
    /// [`Graph::ensure_node`]).
    pub fn set_default_node_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&str) -> N + Send + Sync + 'static,
    {
        self.default_node_label = Arc::new(f);
        self
    }

    /// Label factory used when an edge is created without a label.
    pub fn set_default_edge_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&str, &str, Option<&str>) -> E + Send + Sync + 'static,
    {
        self.default_edge_label = Arc::new(f);
        self
    }

    /* === Nodes ========== */

    fn slot(&self, v: &str) -> Option<usize> {
        self.node_index.get(v).copied()
    }

    fn entry(&self, ix: usize) -> Option<&NodeEntry<N>> {
        self.nodes.get(ix).and_then(Option::as_ref)
    }

    fn entry_mut(&mut self, ix: usize) -> Option<&mut NodeEntry<N>> {
        self.nodes.get_mut(ix).and_then(Option::as_mut)
    }

    fn id_at(&self, ix: usize) -> Option<&str> {
        self.entry(ix).map(|n| n.id.as_str())
    }

    fn entry_of(&self, v: &str) -> Option<&NodeEntry<N>> {
        self.slot(v).and_then(|ix| self.entry(ix))
    }

    fn live_nodes(&self) -> impl Iterator<Item = &NodeEntry<N>> {
        self.nodes.iter().flatten()
    }

    fn insert_node(&mut self, id: String, label: N) -> usize {
        let ix = self.nodes.len();
        self.nodes.push(Some(NodeEntry::new(id.clone(), label)));
        self.node_index.insert(id, ix);
        if self.options.compound {
            self.root_children.insert(ix);
        }
        ix
    }

    fn ensure_slot(&mut self, v: &str) -> usize {
        if let Some(ix) = self.slot(v) {
            return ix;
        }
        let label = (self.default_node_label)(v);
        self.insert_node(v.to_string(), label)
    }

    pub fn node_count(&self) -> usize {
        self.node_index.len()
    }

    /// Node keys in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.live_nodes().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes().map(str::to_string).collect()
    }

    /// Nodes without in-edges.
    pub fn sources(&self) -> Vec<&str> {
        self.live_nodes()
            .filter(|n| n.in_edges.is_empty())
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Nodes without out-edges.
    pub fn sinks(&self) -> Vec<&str> {
        self.live_nodes()
            .filter(|n| n.out_edges.is_empty())
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Creates (or updates) a node with an explicit label.
    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        match self.slot(&id) {
            Some(ix) => {
                if let Some(entry) = self.entry_mut(ix) {
                    entry.label = label;
                }
            }
            None => {
                self.insert_node(id, label);
            }
        }
        self
    }

    /// Creates a node with the default label unless it already exists.
    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        self.ensure_slot(&id);
        self
    }

    pub fn set_nodes(&mut self, ids: &[&str]) -> &mut Self {
        for id in ids {
            self.ensure_slot(id);
        }
        self
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.entry_of(id).map(|n| &n.label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        let ix = self.slot(id)?;
        self.entry_mut(ix).map(|n| &mut n.label)
    }

    /// Returns the stored key for `id`, borrowed from the graph.
    pub(crate) fn node_key(&self, id: &str) -> Option<&str> {
        self.entry_of(id).map(|n| n.id.as_str())
    }

    /// Removes `id` and every incident edge. In a compound graph the children of `id` move
    /// up to its parent.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(ix) = self.node_index.remove(id) else {
            return false;
        };

        let incident: Vec<usize> = self
            .entry(ix)
            .map(|n| n.in_edges.iter().chain(n.out_edges.iter()).copied().collect())
            .unwrap_or_default();
        for e in incident {
            self.remove_edge_slot(e);
        }

        if self.options.compound {
            let (parent, children) = match self.entry_mut(ix) {
                Some(n) => (n.parent, std::mem::take(&mut n.children)),
                None => (None, SlotSet::default()),
            };
            self.detach(ix, parent);
            for child in children {
                if let Some(c) = self.entry_mut(child) {
                    c.parent = parent;
                }
                self.children_slot_mut(parent).insert(child);
            }
        }

        self.nodes[ix] = None;
        self.compact_if_sparse();
        true
    }

    fn compact_if_sparse(&mut self) {
        let sparse = |slots: usize, live: usize| {
            let dead = slots - live;
            dead >= MIN_DEAD_SLOTS && dead > live
        };
        if sparse(self.nodes.len(), self.node_index.len())
            || sparse(self.edges.len(), self.edge_index.len())
        {
            self.compact();
        }
    }

    /// Drops dead slots and renumbers the live ones, keeping insertion order.
    fn compact(&mut self) {
        let node_map = SlotMap::of(&self.nodes);
        let edge_map = SlotMap::of(&self.edges);

        self.nodes = std::mem::take(&mut self.nodes)
            .into_iter()
            .flatten()
            .map(|mut n| {
                n.in_edges = edge_map.set(&n.in_edges);
                n.out_edges = edge_map.set(&n.out_edges);
                n.preds = node_map.counts(&n.preds);
                n.succs = node_map.counts(&n.succs);
                n.parent = n.parent.and_then(|p| node_map.get(p));
                n.children = node_map.set(&n.children);
                Some(n)
            })
            .collect();
        self.edges = std::mem::take(&mut self.edges)
            .into_iter()
            .flatten()
            .filter_map(|mut e| {
                e.v_ix = node_map.get(e.v_ix)?;
                e.w_ix = node_map.get(e.w_ix)?;
                Some(Some(e))
            })
            .collect();
        self.root_children = node_map.set(&self.root_children);

        self.node_index = self
            .live_nodes()
            .enumerate()
            .map(|(ix, n)| (n.id.clone(), ix))
            .collect();
        self.edge_index = self
            .edges
            .iter()
            .flatten()
            .enumerate()
            .map(|(ix, e)| (e.key.clone(), ix))
            .collect();
    }

    /* === Compound ========== */

    fn children_slot_mut(&mut self, parent: Option<usize>) -> &mut SlotSet {
        match parent.and_then(|p| self.nodes.get_mut(p).and_then(Option::as_mut)) {
            Some(p) => &mut p.children,
            None => &mut self.root_children,
        }
    }

    fn detach(&mut self, ix: usize, parent: Option<usize>) {
        self.children_slot_mut(parent).shift_remove(&ix);
    }

    fn attach(&mut self, ix: usize, parent: Option<usize>) {
        let old = self.entry(ix).and_then(|n| n.parent);
        self.detach(ix, old);
        if let Some(n) = self.entry_mut(ix) {
            n.parent = parent;
        }
        self.children_slot_mut(parent).insert(ix);
    }

    /// Moves `v` under `parent`, creating either node if needed.
    ///
    /// Fails without touching the graph when the graph is not compound or when `parent` is
    /// `v` itself or one of its descendants.
    pub fn set_parent(
        &mut self,
        v: impl Into<String>,
        parent: impl Into<String>,
    ) -> Result<&mut Self> {
        if !self.options.compound {
            return Err(GraphError::NotCompound { op: "set parent" });
        }
        let v = v.into();
        let parent = parent.into();

        let mut ancestor = Some(parent.as_str());
        while let Some(a) = ancestor {
            if a == v {
                return Err(GraphError::ParentCycle {
                    node: v.clone(),
                    parent: parent.clone(),
                });
            }
            ancestor = self.parent(a);
        }

        let p_ix = self.ensure_slot(&parent);
        let v_ix = self.ensure_slot(&v);
        self.attach(v_ix, Some(p_ix));
        Ok(self)
    }

    /// Moves `v` back to the top level.
    pub fn clear_parent(&mut self, v: impl Into<String>) -> Result<&mut Self> {
        if !self.options.compound {
            return Err(GraphError::NotCompound { op: "clear parent" });
        }
        let v = v.into();
        let v_ix = self.ensure_slot(&v);
        self.attach(v_ix, None);
        Ok(self)
    }

    pub fn parent(&self, v: &str) -> Option<&str> {
        if !self.options.compound {
            return None;
        }
        let p = self.entry_of(v)?.parent?;
        self.id_at(p)
    }

    /// Children of `v`; empty for leaves, unknown nodes and non-compound graphs.
    pub fn children(&self, v: &str) -> Vec<&str> {
        if !self.options.compound {
            return Vec::new();
        }
        self.entry_of(v)
            .map(|n| n.children.iter().filter_map(|&c| self.id_at(c)).collect())
            .unwrap_or_default()
    }

    /// Top-level nodes (every node when the graph is not compound).
    pub fn children_root(&self) -> Vec<&str> {
        if !self.options.compound {
            return self.nodes().collect();
        }
        self.root_children
            .iter()
            .filter_map(|&c| self.id_at(c))
            .collect()
    }

    /* === Adjacency ========== */

    /// `None` when `v` is not in the graph.
    pub fn predecessors(&self, v: &str) -> Option<Vec<&str>> {
        let n = self.entry_of(v)?;
        Some(n.preds.keys().filter_map(|&u| self.id_at(u)).collect())
    }

    /// `None` when `v` is not in the graph.
    pub fn successors(&self, v: &str) -> Option<Vec<&str>> {
        let n = self.entry_of(v)?;
        Some(n.succs.keys().filter_map(|&w| self.id_at(w)).collect())
    }

    /// Union of predecessors and successors, predecessors first.
    pub fn neighbors(&self, v: &str) -> Option<Vec<&str>> {
        let n = self.entry_of(v)?;
        let slots: IndexSet<usize, FxBuildHasher> =
            n.preds.keys().chain(n.succs.keys()).copied().collect();
        Some(slots.into_iter().filter_map(|u| self.id_at(u)).collect())
    }

    pub fn is_leaf(&self, v: &str) -> bool {
        let Some(n) = self.entry_of(v) else {
            return false;
        };
        if self.options.directed {
            n.succs.is_empty()
        } else {
            n.succs.is_empty() && n.preds.is_empty()
        }
    }

    /// Copy of the graph restricted to the nodes accepted by `keep`. Edges survive when
    /// both endpoints do; a node whose parent was dropped is attached to its nearest
    /// surviving ancestor.
    pub fn filter_nodes(&self, mut keep: impl FnMut(&str) -> bool) -> Self
    where
        N: Clone,
        E: Clone,
        G: Clone,
    {
        let mut copy = Self::new(self.options);
        copy.graph_label = self.graph_label.clone();
        copy.default_node_label = Arc::clone(&self.default_node_label);
        copy.default_edge_label = Arc::clone(&self.default_edge_label);

        for n in self.live_nodes() {
            if keep(&n.id) {
                copy.insert_node(n.id.clone(), n.label.clone());
            }
        }
        for e in self.edges.iter().flatten() {
            if copy.has_node(&e.key.v) && copy.has_node(&e.key.w) {
                copy.upsert_edge(
                    e.key.v.clone(),
                    e.key.w.clone(),
                    e.key.name.clone(),
                    Some(e.label.clone()),
                );
            }
        }

        if self.options.compound {
            for v in copy.node_ids() {
                let mut parent = self.parent(&v);
                while let Some(p) = parent {
                    if copy.has_node(p) {
                        break;
                    }
                    parent = self.parent(p);
                }
                if let (Some(p), Some(v_ix)) = (parent.and_then(|p| copy.slot(p)), copy.slot(&v))
                {
                    copy.attach(v_ix, Some(p));
                }
            }
        }
        copy
    }

    /* === Edges ========== */

    fn edge_view<'a>(&self, v: &'a str, w: &'a str, name: Option<&'a str>) -> EdgeKeyView<'a> {
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };
        let name = if self.options.multigraph { name } else { None };
        EdgeKeyView { v, w, name }
    }

    fn edge_slot(&self, v: &str, w: &str, name: Option<&str>) -> Option<usize> {
        self.edge_index.get(&self.edge_view(v, w, name)).copied()
    }

    fn edge_slot_by_key(&self, key: &EdgeKey) -> Option<usize> {
        self.edge_slot(&key.v, &key.w, key.name.as_deref())
    }

    fn upsert_edge(&mut self, v: String, w: String, name: Option<String>, label: Option<E>) {
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };

        if let Some(e_ix) = self.edge_slot(&v, &w, name.as_deref()) {
            if let (Some(label), Some(entry)) = (label, self.edges[e_ix].as_mut()) {
                entry.label = label;
            }
            return;
        }

        let v_ix = self.ensure_slot(&v);
        let w_ix = self.ensure_slot(&w);
        let label = match label {
            Some(label) => label,
            None => (self.default_edge_label)(&v, &w, name.as_deref()),
        };

        let e_ix = self.edges.len();
        let key = EdgeKey { v, w, name };
        self.edge_index.insert(key.clone(), e_ix);
        self.edges.push(Some(EdgeEntry {
            key,
            v_ix,
            w_ix,
            label,
        }));

        if let Some(n) = self.entry_mut(v_ix) {
            n.out_edges.insert(e_ix);
            increment(&mut n.succs, w_ix);
        }
        if let Some(n) = self.entry_mut(w_ix) {
            n.in_edges.insert(e_ix);
            increment(&mut n.preds, v_ix);
        }
    }

    fn remove_edge_slot(&mut self, e_ix: usize) -> bool {
        let Some(edge) = self.edges.get_mut(e_ix).and_then(Option::take) else {
            return false;
        };
        self.edge_index.remove(&edge.key);
        if let Some(n) = self.entry_mut(edge.v_ix) {
            n.out_edges.shift_remove(&e_ix);
            decrement(&mut n.succs, edge.w_ix);
        }
        if let Some(n) = self.entry_mut(edge.w_ix) {
            n.in_edges.shift_remove(&e_ix);
            decrement(&mut n.preds, edge.v_ix);
        }
        true
    }

    pub fn edge_count(&self) -> usize {
        self.edge_index.len()
    }

    /// Edge keys in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().flatten().map(|e| &e.key)
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges().cloned().collect()
    }

    /// Creates an unnamed edge with the default label, creating missing endpoints.
    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.upsert_edge(v.into(), w.into(), None, None);
        self
    }

    /// Creates or relabels an unnamed edge.
    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.upsert_edge(v.into(), w.into(), None, Some(label));
        self
    }

    /// Creates or updates an edge. A `None` label keeps the label of an existing edge and
    /// uses the default factory for a new one.
    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> Result<&mut Self> {
        let v = v.into();
        let w = w.into();
        let name: Option<String> = name.map(Into::into);
        if let Some(name) = &name {
            if !self.options.multigraph {
                return Err(GraphError::NamedEdgeOnSimpleGraph {
                    v,
                    w,
                    name: name.clone(),
                });
            }
        }
        self.upsert_edge(v, w, name, label);
        Ok(self)
    }

    pub fn set_edge_key(&mut self, key: EdgeKey, label: E) -> Result<&mut Self> {
        self.set_edge_named(key.v, key.w, key.name, Some(label))
    }

    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edge_slot(v, w, name).is_some()
    }

    pub fn has_edge_key(&self, key: &EdgeKey) -> bool {
        self.edge_slot_by_key(key).is_some()
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        let e_ix = self.edge_slot(v, w, name)?;
        self.edges[e_ix].as_ref().map(|e| &e.label)
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let e_ix = self.edge_slot(v, w, name)?;
        self.edges[e_ix].as_mut().map(|e| &mut e.label)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        let e_ix = self.edge_slot_by_key(key)?;
        self.edges[e_ix].as_ref().map(|e| &e.label)
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        let e_ix = self.edge_slot_by_key(key)?;
        self.edges[e_ix].as_mut().map(|e| &mut e.label)
    }

    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> bool {
        let removed = self
            .edge_slot(v, w, name)
            .is_some_and(|e_ix| self.remove_edge_slot(e_ix));
        if removed {
            self.compact_if_sparse();
        }
        removed
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> bool {
        let removed = self
            .edge_slot_by_key(key)
            .is_some_and(|e_ix| self.remove_edge_slot(e_ix));
        if removed {
            self.compact_if_sparse();
        }
        removed
    }

    fn collect_edges(
        &self,
        slots: &SlotSet,
        other: Option<&str>,
        other_end: fn(&EdgeEntry<E>) -> usize,
    ) -> Vec<EdgeKey> {
        let other = match other {
            Some(u) => match self.slot(u) {
                Some(ix) => Some(ix),
                None => return Vec::new(),
            },
            None => None,
        };
        slots
            .iter()
            .filter_map(|&e| self.edges[e].as_ref())
            .filter(|e| other.is_none_or(|u| other_end(e) == u))
            .map(|e| e.key.clone())
            .collect()
    }

    /// Edges ending at `v`, optionally only those starting at `u`.
    pub fn in_edges(&self, v: &str, u: Option<&str>) -> Option<Vec<EdgeKey>> {
        let n = self.entry_of(v)?;
        Some(self.collect_edges(&n.in_edges, u, |e| e.v_ix))
    }

    /// Edges starting at `v`, optionally only those ending at `w`.
    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Option<Vec<EdgeKey>> {
        let n = self.entry_of(v)?;
        Some(self.collect_edges(&n.out_edges, w, |e| e.w_ix))
    }

    /// In-edges followed by out-edges of `v`.
    pub fn node_edges(&self, v: &str, w: Option<&str>) -> Option<Vec<EdgeKey>> {
        let mut out = self.in_edges(v, w)?;
        out.extend(self.out_edges(v, w)?);
        Some(out)
    }

    pub fn for_each_node<F>(&self, mut f: F)
    where
        F: FnMut(&str, &N),
    {
        for n in self.live_nodes() {
            f(&n.id, &n.label);
        }
    }

    pub fn for_each_node_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut N),
    {
        for n in self.nodes.iter_mut().flatten() {
            f(&n.id, &mut n.label);
        }
    }

    pub fn for_each_edge<F>(&self, mut f: F)
    where
        F: FnMut(&EdgeKey, &E),
    {
        for e in self.edges.iter().flatten() {
            f(&e.key, &e.label);
        }
    }

    pub fn for_each_edge_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&EdgeKey, &mut E),
    {
        for e in self.edges.iter_mut().flatten() {
            f(&e.key, &mut e.label);
        }
    }
}

impl<N, E, G> fmt::Debug for Graph<N, E, G>
where
    N: Default + fmt::Debug + 'static,
    E: Default + fmt::Debug + 'static,
    G: Default + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("options", &self.options)
            .field("label", &self.graph_label)
            .field(
                "nodes",
                &self
                    .live_nodes()
                    .map(|n| (&n.id, &n.label))
                    .collect::<Vec<_>>(),
            )
            .field(
                "edges",
                &self
                    .edges
                    .iter()
                    .flatten()
                    .map(|e| (&e.key, &e.label))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
