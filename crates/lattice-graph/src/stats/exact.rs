use std::collections::VecDeque;

use rayon::prelude::*;

use crate::graph::AgentProjection;

/// Mean directed hop distance over all ordered pairs `(u, v)`, `u != v`,
/// where `v` is reachable from `u`. Zero when no such pair exists.
pub(super) fn average_path_length(projection: &AgentProjection<'_>) -> f64 {
    let n = projection.vertex_count();
    let (total, pairs) = (0..n)
        .into_par_iter()
        .map(|source| hop_sums(projection, source))
        .reduce(|| (0usize, 0usize), |a, b| (a.0 + b.0, a.1 + b.1));
    if pairs == 0 {
        0.0
    } else {
        total as f64 / pairs as f64
    }
}

/// `(sum of hop distances, reachable targets)` from one source.
fn hop_sums(projection: &AgentProjection<'_>, source: usize) -> (usize, usize) {
    let n = projection.vertex_count();
    let mut dist = vec![usize::MAX; n];
    let mut queue = VecDeque::new();
    dist[source] = 0;
    queue.push_back(source);
    let (mut total, mut reached) = (0, 0);
    while let Some(u) = queue.pop_front() {
        for &v in projection.out_neighbors(u) {
            if dist[v] == usize::MAX {
                dist[v] = dist[u] + 1;
                total += dist[v];
                reached += 1;
                queue.push_back(v);
            }
        }
    }
    (total, reached)
}

/// Average local clustering coefficient of the undirected projection.
/// Nodes with fewer than two neighbors contribute 0.
pub(super) fn average_clustering(projection: &AgentProjection<'_>) -> f64 {
    let n = projection.vertex_count();
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = (0..n)
        .into_par_iter()
        .map(|slot| local_clustering(projection, slot))
        .sum();
    sum / n as f64
}

fn local_clustering(projection: &AgentProjection<'_>, slot: usize) -> f64 {
    let neighbors = projection.neighbors(slot);
    let k = neighbors.len();
    if k < 2 {
        return 0.0;
    }
    let mut links = 0usize;
    for (i, &a) in neighbors.iter().enumerate() {
        let a_neighbors = projection.neighbors(a);
        for &b in &neighbors[i + 1..] {
            if a_neighbors.binary_search(&b).is_ok() {
                links += 1;
            }
        }
    }
    links as f64 / (k * (k - 1) / 2) as f64
}
