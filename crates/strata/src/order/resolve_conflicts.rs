//! Merges barycenter entries that would violate the subgraph constraint graph.
//!
//! Entries are processed in topological order of the constraint graph. When an entry's
//! barycenter would place it before an entry it must follow, the two are coalesced into one
//! entry whose barycenter is their weighted mean.

use super::BarycenterEntry;
use crate::graphlib::Graph;
use rustc_hash::FxHashMap as HashMap;

/// Constraint graph: an edge `u -> v` keeps `u` left of `v`.
pub type ConstraintGraph = Graph<(), (), ()>;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    pub vs: Vec<String>,
    /// Smallest original index among the merged entries.
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

struct Working {
    entry: ResolvedEntry,
    indegree: usize,
    ins: Vec<usize>,
    outs: Vec<usize>,
    merged: bool,
}

pub fn resolve_conflicts(entries: &[BarycenterEntry], cg: &ConstraintGraph) -> Vec<ResolvedEntry> {
    let mut work: Vec<Working> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| Working {
            entry: ResolvedEntry {
                vs: vec![e.v.clone()],
                i,
                barycenter: e.barycenter,
                weight: e.barycenter.and(e.weight),
            },
            indegree: 0,
            ins: Vec::new(),
            outs: Vec::new(),
            merged: false,
        })
        .collect();
    let index: HashMap<&str, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.v.as_str(), i))
        .collect();

    for e in cg.edges() {
        let (Some(&v), Some(&w)) = (index.get(e.v.as_str()), index.get(e.w.as_str())) else {
            continue;
        };
        work[w].indegree += 1;
        work[v].outs.push(w);
    }

    let mut sources: Vec<usize> = (0..work.len()).filter(|&i| work[i].indegree == 0).collect();
    let mut processed: Vec<usize> = Vec::new();

    while let Some(v) = sources.pop() {
        processed.push(v);

        let ins: Vec<usize> = work[v].ins.iter().rev().copied().collect();
        for u in ins {
            if work[u].merged {
                continue;
            }
            let should_merge = match (work[u].entry.barycenter, work[v].entry.barycenter) {
                (Some(ub), Some(vb)) => ub >= vb,
                _ => true,
            };
            if should_merge {
                merge_entries(&mut work, v, u);
            }
        }

        for w in work[v].outs.clone() {
            work[w].ins.push(v);
            work[w].indegree -= 1;
            if work[w].indegree == 0 {
                sources.push(w);
            }
        }
    }

    processed
        .into_iter()
        .filter(|&i| !work[i].merged)
        .map(|i| work[i].entry.clone())
        .collect()
}

/// Folds `source` into `target`; the source's nodes go first.
fn merge_entries(work: &mut [Working], target: usize, source: usize) {
    let mut sum = 0.0;
    let mut weight = 0.0;
    for ix in [target, source] {
        let e = &work[ix].entry;
        if let (Some(b), Some(w)) = (e.barycenter, e.weight) {
            if w != 0.0 {
                sum += b * w;
                weight += w;
            }
        }
    }

    let mut vs = std::mem::take(&mut work[source].entry.vs);
    let source_i = work[source].entry.i;
    work[source].merged = true;

    let t = &mut work[target].entry;
    vs.append(&mut t.vs);
    t.vs = vs;
    if weight != 0.0 {
        t.barycenter = Some(sum / weight);
        t.weight = Some(weight);
    } else {
        t.barycenter = None;
        t.weight = None;
    }
    t.i = t.i.min(source_i);
}
