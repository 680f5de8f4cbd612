use crate::Graph;
use rustc_hash::FxHashMap as HashMap;

struct Visit {
    index: usize,
    lowlink: usize,
    on_stack: bool,
}

struct Frame<'g> {
    node: &'g str,
    next: Vec<&'g str>,
    pos: usize,
}

/// Strongly connected components (Tarjan). Every node lands in exactly one component;
/// nodes on no cycle form singleton components.
pub fn tarjan<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut index: usize = 0;
    let mut visits: HashMap<&str, Visit> = HashMap::default();
    let mut stack: Vec<&str> = Vec::new();
    let mut out: Vec<Vec<String>> = Vec::new();

    let mut visit = |v, visits: &mut HashMap<_, Visit>, stack: &mut Vec<_>| {
        visits.insert(
            v,
            Visit {
                index,
                lowlink: index,
                on_stack: true,
            },
        );
        index += 1;
        stack.push(v);
        Frame {
            node: v,
            next: g.successors(v).unwrap_or_default(),
            pos: 0,
        }
    };

    for start in g.nodes() {
        if visits.contains_key(start) {
            continue;
        }
        let mut frames = vec![visit(start, &mut visits, &mut stack)];

        while let Some(frame) = frames.last_mut() {
            if frame.pos < frame.next.len() {
                let w = frame.next[frame.pos];
                frame.pos += 1;
                let v = frame.node;
                match visits.get(w) {
                    None => {
                        let child = visit(w, &mut visits, &mut stack);
                        frames.push(child);
                    }
                    Some(seen) if seen.on_stack => {
                        let w_index = seen.index;
                        if let Some(entry) = visits.get_mut(v) {
                            entry.lowlink = entry.lowlink.min(w_index);
                        }
                    }
                    Some(_) => {}
                }
                continue;
            }

            let v = frame.node;
            frames.pop();
            let (lowlink, v_index) = match visits.get(v) {
                Some(entry) => (entry.lowlink, entry.index),
                None => continue,
            };
            if let Some(parent) = frames.last() {
                if let Some(entry) = visits.get_mut(parent.node) {
                    entry.lowlink = entry.lowlink.min(lowlink);
                }
            }
            if lowlink == v_index {
                let mut component: Vec<String> = Vec::new();
                while let Some(w) = stack.pop() {
                    if let Some(entry) = visits.get_mut(w) {
                        entry.on_stack = false;
                    }
                    component.push(w.to_string());
                    if w == v {
                        break;
                    }
                }
                out.push(component);
            }
        }
    }
    out
}

/// Components that contain a cycle: multi-node components plus nodes with a self-loop.
pub fn find_cycles<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    tarjan(g)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component.first().is_some_and(|v| {
                    g.successors(v)
                        .is_some_and(|succs| succs.iter().any(|w| w == v))
                })
        })
        .collect()
}
