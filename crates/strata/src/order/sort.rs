use super::ResolvedEntry;
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortResult {
    pub vs: Vec<String>,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

/// Sorts entries by barycenter. Entries without one keep their original index: they are
/// slotted back in as soon as the output reaches that position. Equal barycenters are ordered
/// by original index, descending when `bias_right` is set.
pub fn sort(entries: Vec<ResolvedEntry>, bias_right: bool) -> SortResult {
    let (mut sortable, mut unsortable): (Vec<ResolvedEntry>, Vec<ResolvedEntry>) =
        entries.into_iter().partition(|e| e.barycenter.is_some());
    unsortable.sort_by(|a, b| b.i.cmp(&a.i));
    sortable.sort_by(|a, b| compare_with_bias(a, b, bias_right));

    let mut vs: Vec<String> = Vec::new();
    let mut sum = 0.0;
    let mut weight = 0.0;
    let mut vs_index = consume_unsortable(&mut vs, &mut unsortable, 0);

    for entry in sortable {
        vs_index += entry.vs.len();
        let w = entry.weight.unwrap_or(0.0);
        sum += entry.barycenter.unwrap_or(0.0) * w;
        weight += w;
        vs.extend(entry.vs);
        vs_index = consume_unsortable(&mut vs, &mut unsortable, vs_index);
    }
    // Whatever is left sits past the end.
    while let Some(last) = unsortable.pop() {
        vs.extend(last.vs);
    }

    let (barycenter, weight) = if weight != 0.0 {
        (Some(sum / weight), Some(weight))
    } else {
        (None, None)
    };
    SortResult {
        vs,
        barycenter,
        weight,
    }
}

fn consume_unsortable(vs: &mut Vec<String>, unsortable: &mut Vec<ResolvedEntry>, mut index: usize) -> usize {
    while unsortable.last().is_some_and(|last| last.i <= index) {
        if let Some(last) = unsortable.pop() {
            vs.extend(last.vs);
            index += 1;
        }
    }
    index
}

fn compare_with_bias(a: &ResolvedEntry, b: &ResolvedEntry, bias_right: bool) -> Ordering {
    let (ab, bb) = (a.barycenter.unwrap_or(0.0), b.barycenter.unwrap_or(0.0));
    match ab.partial_cmp(&bb) {
        Some(Ordering::Less) => Ordering::Less,
        Some(Ordering::Greater) => Ordering::Greater,
        _ if bias_right => b.i.cmp(&a.i),
        _ => a.i.cmp(&b.i),
    }
}
