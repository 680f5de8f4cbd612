//! Greedy feedback arc set (Eades, Lin & Smyth).
//!
//! Nodes sit in buckets indexed by `out - in + max_in + 1`; bucket 0 holds sinks and the last
//! bucket holds sources. Sinks and sources are peeled off first; when none remain, a node from
//! the highest non-empty middle bucket is removed and its remaining in-edges join the result.
//! Within a bucket nodes leave in the order they entered.

use crate::data::{Handle, List};
use crate::graphlib::{EdgeKey, Graph};
use rustc_hash::FxHashMap as HashMap;

pub fn greedy_fas<N, E, G>(g: &Graph<N, E, G>) -> Vec<EdgeKey>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    greedy_fas_with_weight(g, |_| 1)
}

/// Like [`greedy_fas`], with every edge weighted by `weight_fn`. Parallel edges between the
/// same pair count as one edge carrying the summed weight; every one of them is returned when
/// the pair is selected.
pub fn greedy_fas_with_weight<N, E, G>(
    g: &Graph<N, E, G>,
    weight_fn: impl Fn(&E) -> i64,
) -> Vec<EdgeKey>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    if g.node_count() <= 1 {
        return Vec::new();
    }

    let mut state = State::build(g, weight_fn);
    let pairs = state.run();
    tracing::trace!(pairs = pairs.len(), "greedy feedback arc set");

    pairs
        .into_iter()
        .flat_map(|(v, w)| {
            g.out_edges(&state.ids[v], Some(state.ids[w].as_str()))
                .unwrap_or_default()
        })
        .collect()
}

struct State {
    ids: Vec<String>,
    in_w: Vec<i64>,
    out_w: Vec<i64>,
    // Aggregated adjacency: (other end, summed weight), first-seen order.
    ins: Vec<Vec<(usize, i64)>>,
    outs: Vec<Vec<(usize, i64)>>,
    alive: Vec<bool>,
    remaining: usize,
    buckets: Vec<List<usize>>,
    zero_idx: i64,
    entries: Vec<Option<(usize, Handle)>>,
}

impl State {
    fn build<N, E, G>(g: &Graph<N, E, G>, weight_fn: impl Fn(&E) -> i64) -> Self
    where
        N: Default + 'static,
        E: Default + 'static,
        G: Default,
    {
        let ids = g.node_ids();
        let index: HashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, v)| (v.as_str(), i))
            .collect();
        let n = ids.len();

        let mut in_w = vec![0i64; n];
        let mut out_w = vec![0i64; n];
        let mut ins: Vec<Vec<(usize, i64)>> = vec![Vec::new(); n];
        let mut outs: Vec<Vec<(usize, i64)>> = vec![Vec::new(); n];
        let mut pair_slot: HashMap<(usize, usize), (usize, usize)> = HashMap::default();
        let mut max_in = 0;
        let mut max_out = 0;

        for e in g.edges() {
            let (Some(&v), Some(&w)) = (index.get(e.v.as_str()), index.get(e.w.as_str())) else {
                continue;
            };
            // A self-loop can never be broken by reversal.
            if v == w {
                continue;
            }
            let weight = g.edge_by_key(e).map(&weight_fn).unwrap_or(1);
            match pair_slot.get(&(v, w)) {
                Some(&(out_ix, in_ix)) => {
                    outs[v][out_ix].1 += weight;
                    ins[w][in_ix].1 += weight;
                }
                None => {
                    pair_slot.insert((v, w), (outs[v].len(), ins[w].len()));
                    outs[v].push((w, weight));
                    ins[w].push((v, weight));
                }
            }
            out_w[v] += weight;
            in_w[w] += weight;
            max_out = max_out.max(out_w[v]);
            max_in = max_in.max(in_w[w]);
        }

        let bucket_len = (max_out + max_in + 3).max(3) as usize;
        let mut state = Self {
            ids,
            in_w,
            out_w,
            ins,
            outs,
            alive: vec![true; n],
            remaining: n,
            buckets: (0..bucket_len).map(|_| List::new()).collect(),
            zero_idx: max_in + 1,
            entries: vec![None; n],
        };
        for v in 0..n {
            state.assign_bucket(v);
        }
        state
    }

    fn bucket_of(&self, v: usize) -> usize {
        let last = self.buckets.len() - 1;
        if self.out_w[v] == 0 {
            0
        } else if self.in_w[v] == 0 {
            last
        } else {
            (self.out_w[v] - self.in_w[v] + self.zero_idx).clamp(1, last as i64 - 1) as usize
        }
    }

    fn assign_bucket(&mut self, v: usize) {
        if let Some((bucket, handle)) = self.entries[v].take() {
            self.buckets[bucket].remove(handle);
        }
        let bucket = self.bucket_of(v);
        let handle = self.buckets[bucket].enqueue(v);
        self.entries[v] = Some((bucket, handle));
    }

    fn dequeue(&mut self, bucket: usize) -> Option<usize> {
        let v = self.buckets[bucket].dequeue()?;
        self.entries[v] = None;
        Some(v)
    }

    fn run(&mut self) -> Vec<(usize, usize)> {
        let mut results = Vec::new();
        let sources = self.buckets.len() - 1;

        while self.remaining > 0 {
            while let Some(v) = self.dequeue(0) {
                self.remove(v, None);
            }
            while let Some(v) = self.dequeue(sources) {
                self.remove(v, None);
            }
            if self.remaining == 0 {
                break;
            }
            for bucket in (1..sources).rev() {
                if let Some(v) = self.dequeue(bucket) {
                    self.remove(v, Some(&mut results));
                    break;
                }
            }
        }
        results
    }

    fn remove(&mut self, v: usize, mut collect: Option<&mut Vec<(usize, usize)>>) {
        if !self.alive[v] {
            return;
        }
        self.alive[v] = false;
        self.remaining -= 1;

        for i in 0..self.ins[v].len() {
            let (u, weight) = self.ins[v][i];
            if !self.alive[u] {
                continue;
            }
            if let Some(results) = collect.as_deref_mut() {
                results.push((u, v));
            }
            self.out_w[u] -= weight;
            self.assign_bucket(u);
        }
        for i in 0..self.outs[v].len() {
            let (w, weight) = self.outs[v][i];
            if !self.alive[w] {
                continue;
            }
            self.in_w[w] -= weight;
            self.assign_bucket(w);
        }
    }
}
