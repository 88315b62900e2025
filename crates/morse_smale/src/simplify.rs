//! Topological simplification: cancelling persistence pairs below a
//! threshold, by one of two strategies.
//!
//! `GradientReversal` flips the discrete gradient along the unique V-path
//! connecting the pair, which is the textbook cancellation operation and
//! keeps the gradient a valid discrete Morse function throughout. `ArcSplicing`
//! instead performs graph surgery directly on the Morse–Smale graph and
//! splices the severed separatrices back together (Sousbie's method);
//! it is cheaper per cancellation (no gradient rewrite) but needs a
//! mustache-removal pass to clean up the back-and-forth segments the
//! splice can introduce into an arc.

use crate::arcs::{self, ArcTable};
use crate::cell::{self, CellId, GridShape};
use crate::gradient::Gradient;
use crate::msgraph::MsGraph;
use crate::persistence::PersistencePair;

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

/// Strategy used to cancel a persistence pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimplifyMethod {
    /// Reverse the gradient along the connecting V-path.
    GradientReversal,
    /// Splice the severed separatrices together in the MS graph directly.
    ArcSplicing,
}

/// Removes the cell's node from the MS graph, fixing up `node_of` for the
/// node petgraph's swap-remove relocates into the freed slot.
fn remove_ms_node(ms: &mut MsGraph, cell: CellId) {
    let node = ms.node_of.remove(&cell).expect("cell must be a live MS-graph node");
    let last = NodeIndex::new(ms.graph.node_count() - 1);
    ms.graph.remove_node(node);
    if node != last {
        let moved_cell = ms.graph[node].cell;
        ms.node_of.insert(moved_cell, node);
    }
}

/// Removes one edge between `a` and `b` (if several parallel edges exist,
/// removes an arbitrary one of them, matching the single-edge removal a
/// Morse-Smale pair cancellation calls for).
fn remove_ms_edge(ms: &mut MsGraph, a: CellId, b: CellId) {
    let (na, nb) = (ms.node_of[&a], ms.node_of[&b]);
    if let Some(edge) = ms.graph.find_edge(na, nb) {
        ms.graph.remove_edge(edge);
    }
}

fn add_ms_edge(ms: &mut MsGraph, a: CellId, b: CellId) {
    let (na, nb) = (ms.node_of[&a], ms.node_of[&b]);
    ms.graph.add_edge(na, nb, ());
}

/// Saddle-neighbours of `of` in the MS graph, excluding `exclude`, counted
/// with multiplicity (a parallel edge contributes once per edge).
fn ms_neighbors_excluding(ms: &MsGraph, of: CellId, exclude: CellId) -> Vec<CellId> {
    let node = ms.node_of[&of];
    ms.graph
        .edges(node)
        .filter_map(|edge| {
            let other = if edge.source() == node { edge.target() } else { edge.source() };
            let other_cell = ms.graph[other].cell;
            (other_cell != exclude).then_some(other_cell)
        })
        .collect()
}

/// Removes runs of the form `a, b, a` ("mustaches") from a spliced arc,
/// a back-and-forth detour the arc-splicing method can introduce when it
/// glues two separatrices together through the cancelled saddle's old
/// position.
pub fn simplify_arc(arc: &mut Vec<CellId>) {
    let mut it: usize = 1;
    while arc.len() >= 3 && it < arc.len() - 2 {
        if arc[it - 1] == arc[it + 1] {
            let mut mustache_len = 1usize;
            while it > mustache_len
                && it + mustache_len + 1 < arc.len()
                && arc[it - mustache_len - 1] == arc[it + mustache_len + 1]
            {
                mustache_len += 1;
            }
            let lo = it - mustache_len;
            let hi = it + mustache_len;
            arc.drain(lo..hi);
            it = lo;
        } else {
            it += 1;
        }
    }
}

fn pick_other_extremum(candidates: &[CellId], exclude: CellId) -> CellId {
    if candidates[0] != exclude {
        candidates[0]
    } else {
        candidates[1]
    }
}

/// Cancels the next pair (the least-persistent one still pending) by
/// reversing the gradient along its connecting V-path. Returns `false` with
/// no effect if no pairs remain.
pub fn eliminate_pair_revert_gradient(
    shape: GridShape,
    gradient: &mut Gradient,
    ms: &mut MsGraph,
    arc_table: &mut ArcTable,
    pending: &mut Vec<PersistencePair>,
) -> bool {
    let Some(pair) = pending.pop() else {
        return false;
    };
    let saddle = pair.saddle;
    debug_assert_eq!(cell::dim(shape, saddle), 1, "pair.saddle must be a 1-cell");
    let extr = pair.extremum;
    let extr_dim = cell::dim(shape, extr);
    debug_assert_ne!(extr_dim, 1, "pair.extremum must be a min or max");

    let other_saddles = ms_neighbors_excluding(ms, extr, saddle);
    let mins_or_maxs = if extr_dim == 0 { ms.min_neighbors(saddle) } else { ms.max_neighbors(saddle) };
    let min_or_max = pick_other_extremum(&mins_or_maxs, extr);

    let arc = arcs::find_arc(arc_table, saddle, extr)
        .expect("persistence pair must have a backing separatrix arc")
        .clone();
    let mut i = 0;
    while i + 1 < arc.len() {
        gradient.set_arrow(arc[i], arc[i + 1]);
        i += 2;
    }

    gradient.unset_critical(saddle);
    gradient.unset_critical(extr);

    remove_ms_node(ms, saddle);
    arc_table.remove(&saddle);

    for s in other_saddles {
        remove_ms_edge(ms, s, extr);
        add_ms_edge(ms, s, min_or_max);
        let recomputed = arcs::arcs_from_saddle(shape, gradient, s);
        arc_table.insert(s, recomputed);
    }

    remove_ms_node(ms, extr);
    true
}

/// Cancels the next pending pair by splicing separatrices in the MS graph
/// directly, without touching the gradient (Sousbie's method).
pub fn eliminate_pair_change_msgraph(
    shape: GridShape,
    gradient: &mut Gradient,
    ms: &mut MsGraph,
    arc_table: &mut ArcTable,
    pending: &mut Vec<PersistencePair>,
) -> bool {
    let Some(pair) = pending.pop() else {
        return false;
    };
    let saddle = pair.saddle;
    debug_assert_eq!(cell::dim(shape, saddle), 1, "pair.saddle must be a 1-cell");
    let extr = pair.extremum;
    let extr_dim = cell::dim(shape, extr);
    debug_assert_ne!(extr_dim, 1, "pair.extremum must be a min or max");

    let other_saddles = ms_neighbors_excluding(ms, extr, saddle);
    let mins_or_maxs = if extr_dim == 0 { ms.min_neighbors(saddle) } else { ms.max_neighbors(saddle) };
    let min_or_max = pick_other_extremum(&mins_or_maxs, extr);

    // The continuation every severed (s, extr) arc gets spliced onto: the
    // reversed middle of the cancelled (saddle, extr) arc, followed by the
    // whole (saddle, min_or_max) arc.
    let arc_extension = {
        let saddle_to_extr = arcs::find_arc(arc_table, saddle, extr)
            .expect("persistence pair must have a backing separatrix arc")
            .clone();
        let mut middle: Vec<CellId> = saddle_to_extr[1..saddle_to_extr.len() - 1].to_vec();
        middle.reverse();
        let saddle_to_min_or_max = arcs::find_arc(arc_table, saddle, min_or_max)
            .expect("saddle must also connect to the surviving extremum")
            .clone();
        middle.extend(saddle_to_min_or_max);
        middle
    };

    remove_ms_node(ms, saddle);
    for &s in &other_saddles {
        remove_ms_edge(ms, s, extr);
        add_ms_edge(ms, s, min_or_max);
    }
    remove_ms_node(ms, extr);

    for &s in &other_saddles {
        let arc = arc_table
            .get_mut(&s)
            .and_then(|arcs_for_s| arcs_for_s.iter_mut().find(|a| a.last() == Some(&extr)))
            .expect("severed saddle must have an arc ending at the cancelled extremum");
        arc.extend(arc_extension.iter().copied());
        simplify_arc(arc);
    }

    arc_table.remove(&saddle);
    gradient.unset_critical(saddle);
    gradient.unset_critical(extr);
    true
}

/// Dispatches to the gradient-reversal or arc-splicing cancellation by
/// [`SimplifyMethod`].
pub fn eliminate_pair(
    method: SimplifyMethod,
    shape: GridShape,
    gradient: &mut Gradient,
    ms: &mut MsGraph,
    arc_table: &mut ArcTable,
    pending: &mut Vec<PersistencePair>,
) -> bool {
    match method {
        SimplifyMethod::GradientReversal => eliminate_pair_revert_gradient(shape, gradient, ms, arc_table, pending),
        SimplifyMethod::ArcSplicing => eliminate_pair_change_msgraph(shape, gradient, ms, arc_table, pending),
    }
}
