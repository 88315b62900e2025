//! Persistence pairing via a single pass of reduced-matrix boundary
//! reduction, expressed with union-find (for the positive/negative sign of
//! each saddle) and per-critical-cell cycle bitsets (for the pairing
//! itself).
//!
//! The filtration is the critical cells in ascending extended-value order.
//! A forward pass over negative saddles pairs each with the minimum whose
//! component it merges (0-dimensional persistence); a reverse pass over
//! positive saddles pairs each with the maximum whose 1-cycle it closes
//! (1-dimensional persistence, dual to the forward pass under the
//! Alexander-duality symmetry of the torus's saddle connectivity).

use fixedbitset::FixedBitSet;
use petgraph::unionfind::UnionFind;
use std::collections::HashMap;

use crate::cell::{self, CellId, GridShape};
use crate::field::Field;
use crate::msgraph::MsGraph;

/// A persistence pair: a saddle together with the extremum it is paired
/// with, and the absolute difference of their extended values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PersistencePair {
    pub saddle: CellId,
    pub extremum: CellId,
    pub persistence: f64,
}

fn xor_into(curset: &mut FixedBitSet, cycle: &FixedBitSet) {
    curset.symmetric_difference_with(cycle);
}

fn reduce_pass(
    field: &Field,
    critical: &[CellId],
    shape: GridShape,
    idx_of: &HashMap<CellId, usize>,
    cycles: &mut [Option<FixedBitSet>],
    pairs: &mut Vec<PersistencePair>,
    indices: impl Iterator<Item = usize>,
    neighbors_of: impl Fn(CellId) -> Vec<CellId>,
    is_eligible: impl Fn(usize) -> bool,
    pick_bit: impl Fn(&FixedBitSet) -> Option<usize>,
) {
    let n = critical.len();
    for i in indices {
        if cell::dim(shape, critical[i]) != 1 || !is_eligible(i) {
            continue;
        }
        let mut curset = FixedBitSet::with_capacity(n);
        for neighbor in neighbors_of(critical[i]) {
            curset.insert(idx_of[&neighbor]);
        }
        while curset.count_ones(..) > 0 {
            let s = pick_bit(&curset).expect("curset is non-empty");
            match cycles[s].clone() {
                None => {
                    cycles[s] = Some(curset.clone());
                    cycles[i] = Some(curset.clone());
                    pairs.push(PersistencePair {
                        saddle: critical[i],
                        extremum: critical[s],
                        persistence: (field.ext(critical[i]).max() - field.ext(critical[s]).max()).abs(),
                    });
                }
                Some(cycle) => xor_into(&mut curset, &cycle),
            }
        }
    }
}

/// Computes every persistence pair, sorted descending by persistence (so
/// the least-persistent, most-cancellable pair is last, matching the
/// order the simplifier pops pairs in).
pub fn compute(shape: GridShape, field: &Field, critical: &[CellId], ms: &MsGraph) -> Vec<PersistencePair> {
    let n = critical.len();
    let idx_of: HashMap<CellId, usize> = critical.iter().enumerate().map(|(i, &c)| (c, i)).collect();

    let mut signs = FixedBitSet::with_capacity(n);
    let mut uf = UnionFind::new(n);
    for (i, &cidx) in critical.iter().enumerate() {
        match cell::dim(shape, cidx) {
            0 => signs.insert(i),
            1 => {
                let neighbors = ms.min_neighbors(cidx);
                let (a, b) = (idx_of[&neighbors[0]], idx_of[&neighbors[1]]);
                if uf.find(a) == uf.find(b) {
                    signs.insert(i);
                }
                uf.union(a, b);
            }
            _ => {}
        }
    }

    // One cycle table threaded through both passes: the reverse pass must see
    // cycles assigned by the forward pass (and vice versa would apply if run
    // first), exactly as the single-array reduction in the reference
    // implementation does.
    let mut cycles: Vec<Option<FixedBitSet>> = vec![None; n];
    let mut pairs = Vec::new();

    reduce_pass(
        field,
        critical,
        shape,
        &idx_of,
        &mut cycles,
        &mut pairs,
        0..n,
        |c| ms.min_neighbors(c),
        |i| !signs.contains(i),
        |curset| curset.ones().max(),
    );

    reduce_pass(
        field,
        critical,
        shape,
        &idx_of,
        &mut cycles,
        &mut pairs,
        (0..n).rev(),
        |c| ms.max_neighbors(c),
        |i| signs.contains(i),
        |curset| curset.ones().min(),
    );

    pairs.sort_by(|a, b| b.persistence.total_cmp(&a.persistence));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    fn worked_example() -> (GridShape, Field) {
        let shape = GridShape::new(4, 3);
        let values = vec![2.0, 8.0, 1.0, 10.0, 9.0, 5.0, 6.0, 11.0, 7.0, 3.0, 4.0, 12.0];
        (shape, Field::new(shape, values))
    }

    #[test]
    fn persistence_pairs_are_sorted_descending() {
        let (shape, field) = worked_example();
        let gradient = crate::gradient::build(&field, 1);
        let critical = crate::gradient::critical_cells_sorted(&field, &gradient);
        let ms = crate::msgraph::build(shape, &gradient, &critical);
        let pairs = compute(shape, &field, &critical, &ms);
        for w in pairs.windows(2) {
            assert!(w[0].persistence >= w[1].persistence);
        }
    }

    #[test]
    fn every_saddle_appears_in_exactly_one_pair() {
        let (shape, field) = worked_example();
        let gradient = crate::gradient::build(&field, 1);
        let critical = crate::gradient::critical_cells_sorted(&field, &gradient);
        let ms = crate::msgraph::build(shape, &gradient, &critical);
        let pairs = compute(shape, &field, &critical, &ms);
        let saddle_count = critical.iter().filter(|&&c| cell::dim(shape, c) == 1).count();
        assert_eq!(pairs.len(), saddle_count);
    }
}
