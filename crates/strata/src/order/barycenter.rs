use super::LayerGraph;

#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub v: String,
    /// `None` for nodes without neighbors on the adjacent rank.
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

/// Weighted mean order of each node's in-neighbors. Nodes without in-edges, or whose
/// in-edges all weigh zero, get no barycenter.
pub fn barycenter(g: &LayerGraph, movable: &[String]) -> Vec<BarycenterEntry> {
    movable
        .iter()
        .map(|v| {
            let in_edges = g.in_edges(v, None).unwrap_or_default();
            let (sum, weight) = in_edges.iter().fold((0.0, 0.0), |(sum, weight), e| {
                let w = g.edge_by_key(e).map_or(0.0, |l| l.weight);
                let order = g.node(&e.v).and_then(|n| n.order).unwrap_or(0) as f64;
                (sum + w * order, weight + w)
            });
            // Zero total weight pulls nowhere; such a node is unsortable like one without edges.
            if weight == 0.0 {
                return BarycenterEntry {
                    v: v.clone(),
                    barycenter: None,
                    weight: None,
                };
            }
            BarycenterEntry {
                v: v.clone(),
                barycenter: Some(sum / weight),
                weight: Some(weight),
            }
        })
        .collect()
}
