//! Data types for the discrete gradient vector field.

use crate::cell::CellId;
use fixedbitset::FixedBitSet;

/// A discrete gradient vector field, represented as a partial involution over
/// the cell address space: if `V[a] == Some(b)` then `V[b] == Some(a)` and
/// `{a, b}` is a facet/cofacet pair pointing from the lower-dimensional cell
/// to the higher-dimensional one it is paired with.
///
/// Cells with `V[c] == None` are either critical ([`Gradient::is_critical`])
/// or, during incremental construction only, not yet visited.
#[derive(Clone, Debug)]
pub struct Gradient {
    pub(crate) v: Vec<Option<CellId>>,
    pub(crate) critical: FixedBitSet,
}

impl Gradient {
    pub(crate) fn new(total_cells: usize) -> Self {
        Self {
            v: vec![None; total_cells],
            critical: FixedBitSet::with_capacity(total_cells),
        }
    }

    /// The cell `c` is paired with, if any.
    #[inline]
    pub fn arrow(&self, c: CellId) -> Option<CellId> {
        self.v[c.index()]
    }

    #[inline]
    pub fn is_critical(&self, c: CellId) -> bool {
        self.critical.contains(c.index())
    }

    #[inline]
    pub fn is_unpaired(&self, c: CellId) -> bool {
        self.v[c.index()].is_none() && !self.is_critical(c)
    }

    pub(crate) fn set_arrow(&mut self, a: CellId, b: CellId) {
        self.v[a.index()] = Some(b);
        self.v[b.index()] = Some(a);
    }

    pub(crate) fn set_critical(&mut self, c: CellId) {
        self.critical.insert(c.index());
    }

    pub(crate) fn unset_critical(&mut self, c: CellId) {
        self.critical.set(c.index(), false);
    }

    pub(crate) fn clear_arrow(&mut self, a: CellId, b: CellId) {
        self.v[a.index()] = None;
        self.v[b.index()] = None;
    }
}
