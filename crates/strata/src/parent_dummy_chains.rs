//! Moves the dummy nodes of every normalized edge into the subgraphs the edge passes through.
//!
//! A chain climbs from its source through the source's ancestors up to the lowest common
//! ancestor of both endpoints, then descends towards the target. Each link is parented to the
//! deepest subgraph on that path whose rank span still covers the link's rank.

use crate::util::mutated;
use crate::{LayoutGraph, NodeKind};
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone, Copy)]
struct PostorderNum {
    low: usize,
    lim: usize,
}

/// Path between two nodes through the subgraph forest. `None` stands for the top level.
struct TreePath {
    path: Vec<Option<String>>,
    lca: Option<String>,
}

pub fn parent_dummy_chains(g: &mut LayoutGraph) {
    let nums = postorder(g);

    for head in g.graph().dummy_chains.clone() {
        let Some(NodeKind::ChainLink { edge, .. }) = g.node(&head).map(|n| n.kind.clone()) else {
            continue;
        };
        let TreePath { path, lca } = find_path(g, &nums, &edge.v, &edge.w);

        let mut path_idx = 0;
        let mut path_v = path.first().cloned().flatten();
        let mut ascending = true;
        let mut v = head;

        while v != edge.w {
            let Some(rank) = g.node(&v).and_then(|n| n.rank) else {
                break;
            };

            if ascending {
                while path_v != lca
                    && path_v
                        .as_deref()
                        .and_then(|p| g.node(p))
                        .and_then(|n| n.max_rank)
                        .is_some_and(|max| max < rank)
                {
                    path_idx += 1;
                    path_v = path.get(path_idx).cloned().flatten();
                }
                if path_v == lca {
                    ascending = false;
                }
            }

            if !ascending {
                while path_idx + 1 < path.len()
                    && path[path_idx + 1]
                        .as_deref()
                        .and_then(|p| g.node(p))
                        .and_then(|n| n.min_rank)
                        .is_some_and(|min| min <= rank)
                {
                    path_idx += 1;
                }
                path_v = path.get(path_idx).cloned().flatten();
            }

            mutated(match &path_v {
                Some(parent) => g.set_parent(v.clone(), parent.clone()),
                None => g.clear_parent(v.clone()),
            });

            let Some(next) = g
                .successors(&v)
                .and_then(|s| s.first().map(|w| w.to_string()))
            else {
                break;
            };
            v = next;
        }
    }
}

/// Ancestors of `v` up to the lowest common ancestor with `w`, followed by the ancestors of
/// `w` below it, top down.
fn find_path(g: &LayoutGraph, nums: &HashMap<String, PostorderNum>, v: &str, w: &str) -> TreePath {
    let (Some(v_num), Some(w_num)) = (nums.get(v), nums.get(w)) else {
        return TreePath {
            path: vec![None],
            lca: None,
        };
    };
    let low = v_num.low.min(w_num.low);
    let lim = v_num.lim.max(w_num.lim);

    let mut v_path: Vec<Option<String>> = Vec::new();
    let mut current = v.to_string();
    let lca = loop {
        let parent = g.parent(&current).map(str::to_string);
        v_path.push(parent.clone());
        let Some(parent) = parent else {
            break None;
        };
        let covers = nums
            .get(&parent)
            .is_some_and(|n| n.low <= low && lim <= n.lim);
        if covers {
            break Some(parent);
        }
        current = parent;
    };

    let mut w_path: Vec<Option<String>> = Vec::new();
    let mut current = w.to_string();
    while let Some(parent) = g.parent(&current).map(str::to_string) {
        if Some(&parent) == lca.as_ref() {
            break;
        }
        w_path.push(Some(parent.clone()));
        current = parent;
    }
    w_path.reverse();
    v_path.extend(w_path);

    TreePath { path: v_path, lca }
}

/// Postorder numbers of the subgraph forest: `lim` is the node's number and `low` the
/// smallest number in its subtree.
fn postorder(g: &LayoutGraph) -> HashMap<String, PostorderNum> {
    let mut result: HashMap<String, PostorderNum> = HashMap::default();
    let mut lim = 0;

    for root in g.children_root() {
        // (node, children, next child, low)
        let mut stack: Vec<(&str, Vec<&str>, usize, usize)> = vec![(root, g.children(root), 0, lim)];
        while let Some((v, children, next, low)) = stack.last_mut() {
            if let Some(&child) = children.get(*next) {
                *next += 1;
                stack.push((child, g.children(child), 0, lim));
                continue;
            }
            result.insert(v.to_string(), PostorderNum { low: *low, lim });
            lim += 1;
            stack.pop();
        }
    }
    result
}
