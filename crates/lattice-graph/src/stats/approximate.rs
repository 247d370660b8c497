//! Closed-form estimates for large graphs.

/// Random-graph estimate `ln(n) / ln(mean degree)`; 0 when undefined.
pub(super) fn average_path_length(nodes: usize, edges: usize) -> f64 {
    if nodes < 2 {
        return 0.0;
    }
    let mean_degree = 2.0 * edges as f64 / nodes as f64;
    if mean_degree <= 1.0 {
        return 0.0;
    }
    (nodes as f64).ln() / mean_degree.ln()
}

/// Expected clustering of a random graph with the same density.
pub(super) fn clustering(density: f64) -> f64 {
    density.clamp(0.0, 1.0)
}
