//! Top-level façade: builds a complex from a field in one call, and exposes
//! simplification and query/export operations over the result.

use std::collections::{HashMap, HashSet};

use nalgebra::Vector2;
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;

use crate::arcs::{self, ArcTable};
use crate::cell::{self, CellId, GridShape};
use crate::error::{MorseError, Result};
use crate::field::Field;
use crate::gradient::{self, Gradient};
use crate::msgraph::{self, MsGraph, NodeData};
use crate::persistence::{self, PersistencePair};
use crate::simplify::{self, SimplifyMethod};

/// A fully built (and possibly partially simplified) Morse–Smale complex
/// for one scalar field.
pub struct Engine {
    shape: GridShape,
    field: Field,
    gradient: Gradient,
    ms: MsGraph,
    arcs: ArcTable,
    pairs: Vec<PersistencePair>,
}

impl Engine {
    /// Builds the discrete gradient, Morse–Smale graph, separatrix arcs and
    /// persistence pairs for `field` in one pass, splitting the gradient
    /// computation across `threads` worker threads.
    #[tracing::instrument(skip(field), fields(w = field.shape().w, h = field.shape().h))]
    pub fn build_all(field: &Field, threads: usize) -> Engine {
        let shape = field.shape();
        let gradient = gradient::build(field, threads);
        let critical = gradient::critical_cells_sorted(field, &gradient);
        let ms = msgraph::build(shape, &gradient, &critical);
        let arcs = arcs::compute_all(shape, &gradient, &critical);
        let pairs = persistence::compute(shape, field, &critical, &ms);
        tracing::info!(critical_count = critical.len(), pair_count = pairs.len(), "Morse-Smale complex built");
        Engine {
            shape,
            field: field.clone(),
            gradient,
            ms,
            arcs,
            pairs,
        }
    }

    /// Cancels every pending pair with persistence strictly below `level`.
    pub fn simplify_by_level(&mut self, level: f64, method: SimplifyMethod) {
        let elimination_num = self.pairs.iter().filter(|p| p.persistence < level).count();
        self.eliminate_n(elimination_num, method);
    }

    /// Cancels the least-persistent `percent` percent of pending pairs.
    pub fn simplify_by_percent(&mut self, percent: f64, method: SimplifyMethod) -> Result<()> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(MorseError::PercentOutOfRange(percent));
        }
        let elimination_num = (percent * 0.01 * self.pairs.len() as f64) as usize;
        self.eliminate_n(elimination_num, method);
        Ok(())
    }

    /// Cancels pairs until at most `pairs_remained` are left pending.
    pub fn simplify_by_pairs_remained(&mut self, pairs_remained: usize, method: SimplifyMethod) -> Result<()> {
        if pairs_remained > self.pairs.len() {
            tracing::warn!(pairs_remained, current = self.pairs.len(), "fewer pairs than requested remain; nothing to simplify");
            return Ok(());
        }
        if pairs_remained < 2 {
            return Err(MorseError::TooFewPairsRequested(pairs_remained));
        }
        let elimination_num = self.pairs.len() - pairs_remained;
        self.eliminate_n(elimination_num, method);
        Ok(())
    }

    fn eliminate_n(&mut self, n: usize, method: SimplifyMethod) {
        for _ in 0..n {
            let ok = simplify::eliminate_pair(
                method,
                self.shape,
                &mut self.gradient,
                &mut self.ms,
                &mut self.arcs,
                &mut self.pairs,
            );
            if !ok {
                tracing::warn!("requested more cancellations than pending pairs; stopped early");
                break;
            }
        }
    }

    /// Coordinates of every remaining critical point with the given Morse
    /// index (0 = minimum, 1 = saddle, 2 = maximum).
    pub fn critical_points(&self, morse_index: u8) -> Vec<Vector2<f64>> {
        let n = self.shape.n();
        (0..4 * n)
            .map(CellId)
            .filter(|&c| self.gradient.is_critical(c) && cell::dim(self.shape, c) == morse_index)
            .map(|c| cell::coords(self.shape, c))
            .collect()
    }

    /// Coordinates of every separatrix arc, each returned as a polyline.
    /// Arcs whose endpoints fall outside `cut = (x0, y0, x1, y1)` are
    /// dropped entirely; a polyline is additionally split wherever two
    /// consecutive cells are more than one grid step apart, which happens
    /// exactly where the arc wraps across the torus's periodic seam.
    pub fn arcs(&self, cut: Option<(f64, f64, f64, f64)>) -> Vec<Vec<Vector2<f64>>> {
        let mut out = Vec::new();
        for arc in self.arcs.values().flatten() {
            if let Some((x0, y0, x1, y1)) = cut {
                let inside = |p: Vector2<f64>| (x0..=x1).contains(&p.x) && (y0..=y1).contains(&p.y);
                let first = cell::coords(self.shape, arc[0]);
                let last = cell::coords(self.shape, *arc.last().expect("arc is non-empty"));
                if !(inside(first) && inside(last)) {
                    continue;
                }
            }
            let points: Vec<Vector2<f64>> = arc.iter().map(|&c| cell::coords(self.shape, c)).collect();
            let mut current: Vec<Vector2<f64>> = vec![points[0]];
            for w in points.windows(2) {
                if (w[0].x - w[1].x).abs() < 1.0 && (w[0].y - w[1].y).abs() < 1.0 {
                    current.push(w[1]);
                } else {
                    if current.len() > 1 {
                        out.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                    current.push(w[1]);
                }
            }
            if current.len() > 1 {
                out.push(current);
            }
        }
        out
    }

    pub fn ms_graph(&self) -> &MsGraph {
        &self.ms
    }

    /// All currently pending persistence pairs, sorted descending by
    /// persistence.
    pub fn persistence_pairs(&self) -> &[PersistencePair] {
        &self.pairs
    }

    /// The Morse–Smale graph with parallel edges collapsed and every edge
    /// backed by a separatrix that wraps across the torus seam removed,
    /// suitable for drawing in the plane without the seam's visual
    /// artifacts.
    pub fn cut_morse_graph(&self) -> UnGraph<NodeData, ()> {
        let mut g = UnGraph::<NodeData, ()>::with_capacity(self.ms.graph.node_count(), self.ms.graph.edge_count());
        let mut node_of: HashMap<CellId, _> = HashMap::with_capacity(self.ms.graph.node_count());
        for idx in self.ms.graph.node_indices() {
            let data = self.ms.graph[idx];
            node_of.insert(data.cell, g.add_node(data));
        }

        let mut seen = HashSet::new();
        for edge in self.ms.graph.edge_references() {
            let a = self.ms.graph[edge.source()].cell;
            let b = self.ms.graph[edge.target()].cell;
            let key = if a.0 < b.0 { (a, b) } else { (b, a) };
            if seen.insert(key) {
                g.add_edge(node_of[&a], node_of[&b], ());
            }
        }

        for arc in self.arcs.values().flatten() {
            let crosses_seam = arc.iter().any(|&c| {
                cell::verts(self.shape, c)
                    .as_slice()
                    .iter()
                    .any(|v| cell::vertex_on_seam(self.shape, v.0))
            });
            if !crosses_seam {
                continue;
            }
            let a = arc[0];
            let b = *arc.last().expect("arc is non-empty");
            if let (Some(&na), Some(&nb)) = (node_of.get(&a), node_of.get(&b)) {
                if let Some(e) = g.find_edge(na, nb) {
                    g.remove_edge(e);
                }
            }
        }
        g
    }

    /// Birth/death coordinates for a persistence diagram. `betti = Some(0)`
    /// keeps only component-merging (0-dimensional) pairs, `Some(1)` keeps
    /// only cycle-closing (1-dimensional) pairs, and `None` returns every
    /// pair with birth and death ordered so birth <= death.
    pub fn persistence_diagram(&self, betti: Option<u8>) -> (Vec<f64>, Vec<f64>) {
        let raw_birth: Vec<f64> = self.pairs.iter().map(|p| self.field.ext(p.saddle).max()).collect();
        let raw_death: Vec<f64> = self.pairs.iter().map(|p| self.field.ext(p.extremum).max()).collect();

        let mut births = Vec::new();
        let mut deaths = Vec::new();
        match betti {
            Some(0) => {
                for i in 0..raw_birth.len() {
                    if raw_birth[i] > raw_death[i] {
                        births.push(raw_death[i]);
                        deaths.push(raw_birth[i]);
                    }
                }
            }
            Some(1) => {
                for i in 0..raw_birth.len() {
                    if raw_birth[i] < raw_death[i] {
                        births.push(raw_birth[i]);
                        deaths.push(raw_death[i]);
                    }
                }
            }
            _ => {
                for i in 0..raw_birth.len() {
                    births.push(raw_birth[i].min(raw_death[i]));
                    deaths.push(raw_birth[i].max(raw_death[i]));
                }
            }
        }
        (births, deaths)
    }
}

#[cfg(test)]
mod tests;
