//! Separatrix arc tracing: for every saddle, the (typically four) V-paths
//! running from it down to a minimum or up to a maximum.

use std::collections::HashMap;

use crate::cell::{self, CellId, GridShape};
use crate::gradient::Gradient;

/// All separatrix arcs, keyed by their originating saddle. Each saddle maps
/// to a list of arcs, each arc a flattened alternating `[saddle, vertex,
/// edge, vertex, ..., minimum]` or `[saddle, face, edge, face, ...,
/// maximum]` sequence of cell ids describing the V-path step by step.
pub type ArcTable = HashMap<CellId, Vec<Vec<CellId>>>;

/// Traces every arc leaving a single saddle. Exposed separately from
/// [`compute_all`] because the simplifier needs to recompute a single
/// saddle's arcs after each pair cancellation without rebuilding the whole
/// table.
pub fn arcs_from_saddle(shape: GridShape, gradient: &Gradient, saddle: CellId) -> Vec<Vec<CellId>> {
    let mut out = Vec::with_capacity(4);

    // Saddle-to-minimum separatrices: descend from each of the saddle's two
    // vertex facets, following gradient arrows until a critical vertex.
    for &start_vertex in cell::facets(shape, saddle).as_slice() {
        let mut arc = vec![saddle, start_vertex];
        let mut cur_v = start_vertex;
        while !gradient.is_critical(cur_v) {
            let cur_e = gradient.arrow(cur_v).expect("unpaired non-critical vertex");
            let endpoints = cell::verts(shape, cur_e);
            let (a, b) = (endpoints.as_slice()[0], endpoints.as_slice()[1]);
            cur_v = if a == cur_v { b } else { a };
            arc.push(cur_e);
            arc.push(cur_v);
        }
        out.push(arc);
    }

    // Saddle-to-maximum separatrices: ascend from each of the saddle's two
    // face cofacets.
    for &start_face in &cell::cofacets(shape, saddle) {
        let mut arc = vec![saddle, start_face];
        let mut cur_f = start_face;
        while !gradient.is_critical(cur_f) {
            let cur_e = gradient.arrow(cur_f).expect("unpaired non-critical face");
            let cf = cell::cofacets(shape, cur_e);
            cur_f = if cf[0] == cur_f { cf[1] } else { cf[0] };
            arc.push(cur_e);
            arc.push(cur_f);
        }
        out.push(arc);
    }

    out
}

/// Builds the full arc table for every saddle in `critical`.
pub fn compute_all(shape: GridShape, gradient: &Gradient, critical: &[CellId]) -> ArcTable {
    critical
        .iter()
        .copied()
        .filter(|&c| cell::dim(shape, c) == 1)
        .map(|s| (s, arcs_from_saddle(shape, gradient, s)))
        .collect()
}

/// Looks up the unique arc running from `saddle` to `extremum`.
pub fn find_arc<'a>(arcs: &'a ArcTable, saddle: CellId, extremum: CellId) -> Option<&'a Vec<CellId>> {
    arcs.get(&saddle)?.iter().find(|arc| arc.last() == Some(&extremum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    #[test]
    fn every_arc_starts_at_its_saddle_and_ends_at_a_critical_cell() {
        let shape = GridShape::new(4, 3);
        let values = vec![2.0, 8.0, 1.0, 10.0, 9.0, 5.0, 6.0, 11.0, 7.0, 3.0, 4.0, 12.0];
        let field = Field::new(shape, values);
        let gradient = crate::gradient::build(&field, 1);
        let critical = crate::gradient::critical_cells_sorted(&field, &gradient);
        let table = compute_all(shape, &gradient, &critical);
        for (&saddle, arcs) in &table {
            assert_eq!(arcs.len(), 4, "each saddle has 4 separatrices on a closed surface");
            for arc in arcs {
                assert_eq!(arc[0], saddle);
                assert!(gradient.is_critical(*arc.last().unwrap()));
                assert_eq!(arc.len() % 2, 0, "arc alternates cell, vertex/face pairs");
            }
        }
    }
}
