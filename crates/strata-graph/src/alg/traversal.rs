use super::navigate;
use crate::Graph;
use rustc_hash::FxHashSet as HashSet;
use std::collections::VecDeque;

/// Lazy depth-first preorder. Seeds are visited in the given order; seeds already reached
/// from an earlier seed are skipped, and unknown seeds are ignored.
pub struct Preorder<'g, N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    g: &'g Graph<N, E, G>,
    seeds: VecDeque<&'g str>,
    stack: Vec<&'g str>,
    visited: HashSet<&'g str>,
}

pub fn preorder<'g, N, E, G>(g: &'g Graph<N, E, G>, seeds: &[&str]) -> Preorder<'g, N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    Preorder {
        g,
        seeds: seeds.iter().filter_map(|s| g.node_key(s)).collect(),
        stack: Vec::new(),
        visited: HashSet::default(),
    }
}

impl<'g, N, E, G> Iterator for Preorder<'g, N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    type Item = &'g str;

    fn next(&mut self) -> Option<&'g str> {
        loop {
            if self.stack.is_empty() {
                let seed = self.seeds.pop_front()?;
                self.stack.push(seed);
            }
            while let Some(v) = self.stack.pop() {
                if !self.visited.insert(v) {
                    continue;
                }
                let next = navigate(self.g, v);
                self.stack
                    .extend(next.into_iter().rev().filter(|w| !self.visited.contains(w)));
                return Some(v);
            }
        }
    }
}

struct Frame<'g> {
    node: &'g str,
    next: Vec<&'g str>,
    pos: usize,
}

/// Lazy depth-first postorder with the same seeding rules as [`Preorder`].
pub struct Postorder<'g, N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    g: &'g Graph<N, E, G>,
    seeds: VecDeque<&'g str>,
    frames: Vec<Frame<'g>>,
    visited: HashSet<&'g str>,
}

pub fn postorder<'g, N, E, G>(g: &'g Graph<N, E, G>, seeds: &[&str]) -> Postorder<'g, N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    Postorder {
        g,
        seeds: seeds.iter().filter_map(|s| g.node_key(s)).collect(),
        frames: Vec::new(),
        visited: HashSet::default(),
    }
}

impl<'g, N, E, G> Postorder<'g, N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    fn enter(&mut self, v: &'g str) {
        if self.visited.insert(v) {
            self.frames.push(Frame {
                node: v,
                next: navigate(self.g, v),
                pos: 0,
            });
        }
    }
}

impl<'g, N, E, G> Iterator for Postorder<'g, N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    type Item = &'g str;

    fn next(&mut self) -> Option<&'g str> {
        loop {
            let Some(frame) = self.frames.last_mut() else {
                let seed = self.seeds.pop_front()?;
                self.enter(seed);
                continue;
            };
            if frame.pos < frame.next.len() {
                let w = frame.next[frame.pos];
                frame.pos += 1;
                self.enter(w);
                continue;
            }
            return self.frames.pop().map(|f| f.node);
        }
    }
}

/// `true` when no edge sequence returns to its start. A self-loop is a cycle.
pub fn is_acyclic<N, E, G>(g: &Graph<N, E, G>) -> bool
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut done: HashSet<&str> = HashSet::default();
    let mut on_stack: HashSet<&str> = HashSet::default();

    for start in g.nodes() {
        if done.contains(start) {
            continue;
        }
        let mut frames: Vec<Frame<'_>> = vec![Frame {
            node: start,
            next: g.successors(start).unwrap_or_default(),
            pos: 0,
        }];
        on_stack.insert(start);

        while let Some(frame) = frames.last_mut() {
            if frame.pos < frame.next.len() {
                let w = frame.next[frame.pos];
                frame.pos += 1;
                if on_stack.contains(w) {
                    return false;
                }
                if !done.contains(w) {
                    on_stack.insert(w);
                    frames.push(Frame {
                        node: w,
                        next: g.successors(w).unwrap_or_default(),
                        pos: 0,
                    });
                }
                continue;
            }
            let node = frame.node;
            frames.pop();
            on_stack.remove(node);
            done.insert(node);
        }
    }
    true
}

/// Weakly connected components, each in discovery order.
pub fn components<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut visited: HashSet<&str> = HashSet::default();
    let mut out: Vec<Vec<String>> = Vec::new();

    for start in g.nodes() {
        if !visited.insert(start) {
            continue;
        }
        let mut component: Vec<String> = Vec::new();
        let mut stack = vec![start];
        while let Some(v) = stack.pop() {
            component.push(v.to_string());
            for w in g.neighbors(v).unwrap_or_default() {
                if visited.insert(w) {
                    stack.push(w);
                }
            }
        }
        out.push(component);
    }
    out
}
