//! `ProcessLowerStars` (Robins, Wood & Sheppard): builds a discrete gradient
//! vector field from a scalar field by pairing each vertex's lower star into
//! facet/cofacet arrows, one vertex at a time.
//!
//! Two lower stars of distinct vertices never share a cell, so the
//! per-vertex computation below touches no shared state: each call only
//! reads the field and only produces pairing decisions local to that
//! vertex's own star. That locality is what lets [`build`] split the vertex
//! range into contiguous blocks and process each block on its own thread
//! with a private result buffer, merging into the shared [`Gradient`] only
//! after every thread has joined, without a mutex or `unsafe`.

use crate::cell::{self, CellId, GridShape};
use crate::field::Field;

use super::types::Gradient;

/// Pairing decisions produced by processing a single vertex's lower star.
struct VertexResult {
    pairs: Vec<(CellId, CellId)>,
    critical: Vec<CellId>,
}

/// Local view of pairing state scoped to one vertex's lower star, so the
/// algorithm can be expressed exactly as in the literature (`is_unpaired`,
/// `unpaired_facets`) without touching the shared gradient mid-computation.
#[derive(Default)]
struct LocalPairing {
    paired: Vec<CellId>,
    critical: Vec<CellId>,
}

impl LocalPairing {
    fn is_unpaired(&self, c: CellId) -> bool {
        !self.paired.contains(&c) && !self.critical.contains(&c)
    }

    fn pair(&mut self, a: CellId, b: CellId) {
        self.paired.push(a);
        self.paired.push(b);
    }

    fn set_critical(&mut self, c: CellId) {
        self.critical.push(c);
    }
}

fn unpaired_facets_in(shape: GridShape, local: &LocalPairing, lstar: &[CellId], c: CellId) -> Vec<CellId> {
    cell::facets(shape, c)
        .as_slice()
        .iter()
        .copied()
        .filter(|f| lstar.contains(f) && local.is_unpaired(*f))
        .collect()
}

/// Removes and returns the lower-`ext`-valued element of `queue`.
fn pop_min(field: &Field, queue: &mut Vec<CellId>) -> Option<CellId> {
    if queue.is_empty() {
        return None;
    }
    let (min_idx, _) = queue
        .iter()
        .enumerate()
        .min_by_key(|&(_, &c)| field.ext(c))
        .expect("queue is non-empty");
    Some(queue.remove(min_idx))
}

fn process_vertex(shape: GridShape, field: &Field, v: u32) -> VertexResult {
    let vertex = CellId(v);
    let mut local = LocalPairing::default();

    let lstar = cell::lower_star(shape, field, v);
    if lstar.is_empty() {
        // Value is a strict local minimum: nothing below it, so it is critical.
        return VertexResult {
            pairs: Vec::new(),
            critical: vec![vertex],
        };
    }

    let delta = lstar[0];
    local.pair(vertex, delta);

    let mut pq_zero: Vec<CellId> = lstar[1..]
        .iter()
        .copied()
        .filter(|&c| cell::dim(shape, c) == 1)
        .collect();
    let mut pq_one: Vec<CellId> = Vec::new();

    for &f in &cell::cofacets(shape, delta) {
        if lstar.contains(&f) && unpaired_facets_in(shape, &local, &lstar, f).len() == 1 {
            pq_one.push(f);
        }
    }

    while !pq_one.is_empty() || !pq_zero.is_empty() {
        while let Some(alpha) = pop_min(field, &mut pq_one) {
            let unpaired = unpaired_facets_in(shape, &local, &lstar, alpha);
            if unpaired.is_empty() {
                pq_zero.push(alpha);
            } else {
                let pair_cell = unpaired[0];
                local.pair(pair_cell, alpha);
                pq_zero.retain(|&c| c != pair_cell);
                for &beta in &lstar {
                    if unpaired_facets_in(shape, &local, &lstar, beta).len() == 1 {
                        let facets_beta = cell::facets(shape, beta);
                        if facets_beta.contains(alpha) || facets_beta.contains(pair_cell) {
                            pq_one.push(beta);
                        }
                    }
                }
            }
        }
        if let Some(gamma) = pop_min(field, &mut pq_zero) {
            local.set_critical(gamma);
            for &a in &lstar {
                let facets_a = cell::facets(shape, a);
                if facets_a.contains(gamma) && unpaired_facets_in(shape, &local, &lstar, a).len() == 1 {
                    pq_one.push(a);
                }
            }
        }
    }

    // local.paired holds (a, b, a, b, ...) pairs pushed two at a time.
    let pairs = local
        .paired
        .chunks_exact(2)
        .map(|w| (w[0], w[1]))
        .collect();
    VertexResult {
        pairs,
        critical: local.critical,
    }
}

fn split_into_blocks(n: u32, threads: usize) -> Vec<(u32, u32)> {
    let threads = threads.max(1) as u32;
    let block_len = n / threads;
    let mut blocks = Vec::with_capacity(threads as usize);
    for i in 0..threads {
        let start = block_len * i;
        let end = if i + 1 == threads { n } else { block_len * (i + 1) };
        if start < end {
            blocks.push((start, end));
        }
    }
    blocks
}

/// Builds the discrete gradient field for `field`, splitting the `ProcessLowerStars`
/// vertex loop across `threads` worker threads (a value of `0` or `1` runs
/// sequentially on the calling thread).
#[tracing::instrument(skip(field), fields(w = field.shape().w, h = field.shape().h, threads))]
pub fn build(field: &Field, threads: usize) -> Gradient {
    let shape = field.shape();
    let n = shape.n();
    let total_cells = 4 * n as usize;

    let results: Vec<VertexResult> = if threads <= 1 {
        (0..n).map(|v| process_vertex(shape, field, v)).collect()
    } else {
        let blocks = split_into_blocks(n, threads);
        let mut results = Vec::with_capacity(n as usize);
        std::thread::scope(|scope| {
            let handles: Vec<_> = blocks
                .into_iter()
                .map(|(start, end)| {
                    scope.spawn(move || {
                        (start..end)
                            .map(|v| process_vertex(shape, field, v))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            for handle in handles {
                results.extend(handle.join().expect("lower-star worker thread panicked"));
            }
        });
        results
    };

    let mut gradient = Gradient::new(total_cells);
    let mut critical_count = 0usize;
    for r in results {
        for (a, b) in r.pairs {
            gradient.set_arrow(a, b);
        }
        for c in r.critical {
            gradient.set_critical(c);
            critical_count += 1;
        }
    }
    tracing::info!(critical_count, "discrete gradient built");
    gradient
}

/// All critical cells, sorted ascending by extended value. A valid
/// filtration of the complex, since an `ext` order always refines the
/// Morse-index partial order induced by the gradient.
pub fn critical_cells_sorted(field: &Field, gradient: &Gradient) -> Vec<CellId> {
    let n = field.shape().n();
    let mut out: Vec<CellId> = (0..4 * n)
        .map(CellId)
        .filter(|&c| gradient.is_critical(c))
        .collect();
    out.sort_by_key(|&c| field.ext(c));
    out
}

#[cfg(test)]
mod tests;
