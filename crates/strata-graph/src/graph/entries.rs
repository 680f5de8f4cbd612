//! Internal storage entries for [`Graph`](super::Graph).
//!
//! Nodes and edges live in slot vectors. A removed entry leaves a `None` slot behind so the
//! indices held by adjacency tables stay valid and iteration keeps insertion order. Once dead
//! slots outnumber live ones the graph renumbers its slots through a [`SlotMap`].

use super::EdgeKey;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;

pub(crate) type SlotSet = IndexSet<usize, FxBuildHasher>;
pub(crate) type SlotCounts = IndexMap<usize, usize, FxBuildHasher>;

#[derive(Debug, Clone)]
pub(crate) struct NodeEntry<N> {
    pub(crate) id: String,
    pub(crate) label: N,
    /// Edge slots ending at this node.
    pub(crate) in_edges: SlotSet,
    /// Edge slots starting at this node.
    pub(crate) out_edges: SlotSet,
    /// Predecessor node slot -> number of parallel edges.
    pub(crate) preds: SlotCounts,
    /// Successor node slot -> number of parallel edges.
    pub(crate) succs: SlotCounts,
    pub(crate) parent: Option<usize>,
    pub(crate) children: SlotSet,
}

impl<N> NodeEntry<N> {
    pub(crate) fn new(id: String, label: N) -> Self {
        Self {
            id,
            label,
            in_edges: SlotSet::default(),
            out_edges: SlotSet::default(),
            preds: SlotCounts::default(),
            succs: SlotCounts::default(),
            parent: None,
            children: SlotSet::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EdgeEntry<E> {
    pub(crate) key: EdgeKey,
    pub(crate) v_ix: usize,
    pub(crate) w_ix: usize,
    pub(crate) label: E,
}

pub(crate) fn increment(counts: &mut SlotCounts, slot: usize) {
    *counts.entry(slot).or_insert(0) += 1;
}

pub(crate) fn decrement(counts: &mut SlotCounts, slot: usize) {
    if let Some(n) = counts.get_mut(&slot) {
        *n -= 1;
        if *n == 0 {
            counts.shift_remove(&slot);
        }
    }
}

/// Old slot -> new slot after compaction; `None` for dead slots.
pub(crate) struct SlotMap(Vec<Option<usize>>);

impl SlotMap {
    pub(crate) fn of<T>(slots: &[Option<T>]) -> Self {
        let mut next = 0;
        Self(
            slots
                .iter()
                .map(|slot| {
                    slot.as_ref().map(|_| {
                        next += 1;
                        next - 1
                    })
                })
                .collect(),
        )
    }

    pub(crate) fn get(&self, old: usize) -> Option<usize> {
        self.0.get(old).copied().flatten()
    }

    pub(crate) fn set(&self, set: &SlotSet) -> SlotSet {
        set.iter().filter_map(|&ix| self.get(ix)).collect()
    }

    pub(crate) fn counts(&self, counts: &SlotCounts) -> SlotCounts {
        counts
            .iter()
            .filter_map(|(&ix, &n)| Some((self.get(ix)?, n)))
            .collect()
    }
}
