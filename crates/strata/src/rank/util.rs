use crate::LayoutGraph;
use crate::graphlib::EdgeKey;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

struct Frame {
    v: String,
    out: Vec<EdgeKey>,
    next: usize,
    rank: Option<i32>,
    // `min_len` of the edge this node was reached through.
    via: i32,
}

/// Initial ranking: every node is placed as low as its successors allow, sinks at rank 0.
/// Ranks come out non-positive and are normalized later.
pub fn longest_path(g: &mut LayoutGraph) {
    let mut done: HashMap<String, i32> = HashMap::default();
    let mut entered: HashSet<String> = HashSet::default();
    let sources: Vec<String> = g.sources().into_iter().map(str::to_string).collect();

    for source in sources {
        if !entered.insert(source.clone()) {
            continue;
        }
        let out = g.out_edges(&source, None).unwrap_or_default();
        let mut stack = vec![Frame {
            v: source,
            out,
            next: 0,
            rank: None,
            via: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if let Some(e) = frame.out.get(frame.next).cloned() {
                frame.next += 1;
                let min_len = g.edge_by_key(&e).map_or(1, |l| l.min_len as i32);
                if let Some(&w_rank) = done.get(&e.w) {
                    let candidate = w_rank - min_len;
                    frame.rank = Some(frame.rank.map_or(candidate, |r| r.min(candidate)));
                } else if entered.insert(e.w.clone()) {
                    let out = g.out_edges(&e.w, None).unwrap_or_default();
                    stack.push(Frame {
                        v: e.w,
                        out,
                        next: 0,
                        rank: None,
                        via: min_len,
                    });
                }
                continue;
            }

            let Some(finished) = stack.pop() else {
                break;
            };
            let rank = finished.rank.unwrap_or(0);
            if let Some(label) = g.node_mut(&finished.v) {
                label.rank = Some(rank);
            }
            if let Some(parent) = stack.last_mut() {
                let candidate = rank - finished.via;
                parent.rank = Some(parent.rank.map_or(candidate, |r| r.min(candidate)));
            }
            done.insert(finished.v, rank);
        }
    }
}

/// How much longer than its `min_len` an edge currently is.
pub fn slack(g: &LayoutGraph, e: &EdgeKey) -> i32 {
    let w_rank = g.node(&e.w).and_then(|n| n.rank).unwrap_or(0);
    let v_rank = g.node(&e.v).and_then(|n| n.rank).unwrap_or(0);
    let min_len = g.edge_by_key(e).map_or(1, |l| l.min_len as i32);
    w_rank - v_rank - min_len
}
