use super::{BarycenterEntry, ConstraintGraph, LayerGraph, SortResult, barycenter, resolve_conflicts, sort};
use rustc_hash::FxHashMap as HashMap;

/// Orders the children of `v` in a layer graph, recursing into nested subgraphs. A subgraph
/// is sorted as a block that stays between its left and right border nodes; its own
/// barycenter joins the parent's sort.
pub fn sort_subgraph(g: &LayerGraph, v: &str, cg: &ConstraintGraph, bias_right: bool) -> SortResult {
    let node = g.node(v);
    let bl = node.and_then(|n| n.border_left.clone());
    let br = node.and_then(|n| n.border_right.clone());

    let movable: Vec<String> = g
        .children(v)
        .into_iter()
        .filter(|w| bl.is_none() || (Some(*w) != bl.as_deref() && Some(*w) != br.as_deref()))
        .map(str::to_string)
        .collect();

    let mut barycenters = barycenter(g, &movable);
    let mut subgraphs: HashMap<String, SortResult> = HashMap::default();
    for entry in &mut barycenters {
        if g.children(&entry.v).is_empty() {
            continue;
        }
        let result = sort_subgraph(g, &entry.v, cg, bias_right);
        if result.barycenter.is_some() {
            merge_barycenters(entry, &result);
        }
        subgraphs.insert(entry.v.clone(), result);
    }

    let mut entries = resolve_conflicts(&barycenters, cg);
    for entry in &mut entries {
        entry.vs = std::mem::take(&mut entry.vs)
            .into_iter()
            .flat_map(|w| match subgraphs.get(&w) {
                Some(sub) => sub.vs.clone(),
                None => vec![w],
            })
            .collect();
    }

    let mut result = sort(entries, bias_right);

    if let (Some(bl), Some(br)) = (bl, br) {
        let bl_pred = first_predecessor_order(g, &bl);
        let br_pred = first_predecessor_order(g, &br);
        let mut vs = Vec::with_capacity(result.vs.len() + 2);
        vs.push(bl);
        vs.append(&mut result.vs);
        vs.push(br);
        result.vs = vs;

        if let (Some(bl_order), Some(br_order)) = (bl_pred, br_pred) {
            let barycenter = result.barycenter.unwrap_or(0.0);
            let weight = result.weight.unwrap_or(0.0);
            result.barycenter = Some((barycenter * weight + bl_order + br_order) / (weight + 2.0));
            result.weight = Some(weight + 2.0);
        }
    }
    result
}

fn first_predecessor_order(g: &LayerGraph, v: &str) -> Option<f64> {
    let preds = g.predecessors(v)?;
    let u = preds.first()?;
    Some(g.node(u).and_then(|n| n.order).unwrap_or(0) as f64)
}

fn merge_barycenters(target: &mut BarycenterEntry, other: &SortResult) {
    let (Some(ob), Some(ow)) = (other.barycenter, other.weight) else {
        return;
    };
    match (target.barycenter, target.weight) {
        (Some(tb), Some(tw)) => {
            target.barycenter = Some((tb * tw + ob * ow) / (tw + ow));
            target.weight = Some(tw + ow);
        }
        _ => {
            target.barycenter = Some(ob);
            target.weight = Some(ow);
        }
    }
}
