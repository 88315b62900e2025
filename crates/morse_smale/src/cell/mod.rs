//! Cell indexing for a toroidal cubical complex.
//!
//! A `w` by `h` scalar grid is completed to a CW complex of vertices,
//! horizontal edges, vertical edges and faces (unit squares), with periodic
//! identification on both axes so the complex is a genuine torus rather than
//! a rectangle with a boundary. All neighbour arithmetic below wraps modulo
//! `w` or `h` for exactly this reason; there is no special-cased boundary
//! behaviour anywhere in the crate.
//!
//! Vertex `(col, row)` takes flat index `row * w + col` (row-major, stride
//! `w`). Edges and faces reuse a vertex id as an anchor: a horizontal edge is
//! anchored at its left vertex, a vertical edge at its top vertex, and a face
//! at its top-left vertex.

mod types;

pub use types::{CellId, CellList, GridShape};

/// Morse index of a cell: 0 for vertices, 1 for edges (both orientations), 2
/// for faces.
#[inline]
pub fn dim(shape: GridShape, c: CellId) -> u8 {
    let n = shape.n();
    if c.0 < n {
        0
    } else if c.0 < 3 * n {
        1
    } else {
        2
    }
}

#[inline]
fn vleft(shape: GridShape, v: u32) -> u32 {
    let col = shape.col(v);
    v - col + (col + shape.w - 1) % shape.w
}

#[inline]
fn vright(shape: GridShape, v: u32) -> u32 {
    let col = shape.col(v);
    v - col + (col + 1) % shape.w
}

#[inline]
fn vtop(shape: GridShape, v: u32) -> u32 {
    let n = shape.n();
    (v + n - shape.w) % n
}

#[inline]
fn vbottom(shape: GridShape, v: u32) -> u32 {
    (v + shape.w) % shape.n()
}

#[inline]
fn e_left(shape: GridShape, v: u32) -> CellId {
    CellId(shape.n() + vleft(shape, v))
}

#[inline]
fn e_right(shape: GridShape, v: u32) -> CellId {
    CellId(shape.n() + v)
}

#[inline]
fn e_top(shape: GridShape, v: u32) -> CellId {
    CellId(2 * shape.n() + vtop(shape, v))
}

#[inline]
fn e_bottom(shape: GridShape, v: u32) -> CellId {
    CellId(2 * shape.n() + v)
}

#[inline]
fn f_left_top(shape: GridShape, v: u32) -> CellId {
    CellId(3 * shape.n() + vtop(shape, vleft(shape, v)))
}

#[inline]
fn f_left_bottom(shape: GridShape, v: u32) -> CellId {
    CellId(3 * shape.n() + vleft(shape, v))
}

#[inline]
fn f_right_top(shape: GridShape, v: u32) -> CellId {
    CellId(3 * shape.n() + vtop(shape, v))
}

#[inline]
fn f_right_bottom(shape: GridShape, v: u32) -> CellId {
    CellId(3 * shape.n() + v)
}

/// Vertices incident to a cell: one for a vertex, two for an edge (left/right
/// or top/bottom endpoint), four for a face (top-left, top-right, bottom-left,
/// bottom-right, in that order).
pub fn verts(shape: GridShape, c: CellId) -> CellList {
    let n = shape.n();
    if c.0 < n {
        CellList::from_iter([CellId(c.0)])
    } else if c.0 < 2 * n {
        let v = c.0 - n;
        CellList::from_iter([CellId(v), CellId(vright(shape, v))])
    } else if c.0 < 3 * n {
        let v = c.0 - 2 * n;
        CellList::from_iter([CellId(v), CellId(vbottom(shape, v))])
    } else {
        let v = c.0 - 3 * n;
        let right = vright(shape, v);
        CellList::from_iter([
            CellId(v),
            CellId(right),
            CellId(vbottom(shape, right)),
            CellId(vbottom(shape, v)),
        ])
    }
}

/// Proper faces of a cell one dimension down: for a face, its four bounding
/// edges (top, left, bottom, right); for an edge, its two endpoint vertices.
/// Vertices have no proper faces; calling this on a vertex returns the
/// vertex itself and is never meaningful; callers only ever invoke it on
/// edges and faces.
pub fn facets(shape: GridShape, c: CellId) -> CellList {
    let n = shape.n();
    if c.0 < 3 * n {
        verts(shape, c)
    } else {
        let v = c.0 - 3 * n;
        CellList::from_iter([
            e_right(shape, v),
            e_bottom(shape, v),
            e_right(shape, vbottom(shape, v)),
            e_bottom(shape, vright(shape, v)),
        ])
    }
}

/// The two faces sharing an edge. Panics if `c` is not a 1-cell.
pub fn cofacets(shape: GridShape, c: CellId) -> [CellId; 2] {
    let n = shape.n();
    assert_eq!(dim(shape, c), 1, "cofacets() requires a 1-cell");
    if c.0 < 2 * n {
        let v = c.0 - n;
        [f_right_bottom(shape, v), f_right_top(shape, v)]
    } else {
        let v = c.0 - 2 * n;
        [f_left_bottom(shape, v), f_right_bottom(shape, v)]
    }
}

/// All eight cells (four edges, four faces) incident to a vertex, in a fixed
/// but otherwise arbitrary order. Used only as the input to [`lower_star`].
fn star(shape: GridShape, v: u32) -> [CellId; 8] {
    [
        e_right(shape, v),
        e_top(shape, v),
        e_left(shape, v),
        e_bottom(shape, v),
        f_right_top(shape, v),
        f_left_top(shape, v),
        f_left_bottom(shape, v),
        f_right_bottom(shape, v),
    ]
}

/// Cells in the star of vertex `v` whose value (under `ext`) is strictly
/// lower than `v`'s own, sorted ascending by extended value. This is the
/// per-vertex input to `ProcessLowerStars` ([`crate::gradient`]).
pub fn lower_star(shape: GridShape, field: &crate::field::Field, v: u32) -> Vec<CellId> {
    let val = field.value(v);
    let is_lower = |u: u32| field.value(u) < val;

    let left = is_lower(vleft(shape, v));
    let top = is_lower(vtop(shape, v));
    let right = is_lower(vright(shape, v));
    let bottom = is_lower(vbottom(shape, v));
    let left_top = is_lower(vleft(shape, vtop(shape, v)));
    let right_top = is_lower(vright(shape, vtop(shape, v)));
    let left_bottom = is_lower(vleft(shape, vbottom(shape, v)));
    let right_bottom = is_lower(vright(shape, vbottom(shape, v)));

    let mut out = Vec::with_capacity(8);
    if left {
        out.push(e_left(shape, v));
    }
    if top {
        out.push(e_top(shape, v));
    }
    if right {
        out.push(e_right(shape, v));
    }
    if bottom {
        out.push(e_bottom(shape, v));
    }
    if left && top && left_top {
        out.push(f_left_top(shape, v));
    }
    if right && top && right_top {
        out.push(f_right_top(shape, v));
    }
    if left && bottom && left_bottom {
        out.push(f_left_bottom(shape, v));
    }
    if right && bottom && right_bottom {
        out.push(f_right_bottom(shape, v));
    }
    out.sort_by(|&a, &b| field.ext(a).cmp(&field.ext(b)));
    out
}

/// Euclidean-ish coordinates of a cell's centre, for plotting and for the
/// seam tests used when cutting the Morse graph for export. Edges and faces
/// are offset by 0.5 on the axis they span.
pub fn coords(shape: GridShape, c: CellId) -> nalgebra::Vector2<f64> {
    use nalgebra::Vector2;
    let n = shape.n();
    if c.0 < n {
        let v = c.0;
        Vector2::new(shape.col(v) as f64, shape.row(v) as f64)
    } else if c.0 < 2 * n {
        let v = verts(shape, c).as_slice()[0];
        Vector2::new(shape.col(v.0) as f64 + 0.5, shape.row(v.0) as f64)
    } else if c.0 < 3 * n {
        let v = verts(shape, c).as_slice()[0];
        Vector2::new(shape.col(v.0) as f64, shape.row(v.0) as f64 + 0.5)
    } else {
        let v = verts(shape, c).as_slice()[0];
        Vector2::new(shape.col(v.0) as f64 + 0.5, shape.row(v.0) as f64 + 0.5)
    }
}

/// `true` if a vertex lies on the torus's fundamental-domain seam (row 0 or
/// column 0), the row/column whose neighbour wrap makes a straight-line
/// drawing of an incident edge visually wrong.
pub fn vertex_on_seam(shape: GridShape, v: u32) -> bool {
    shape.row(v) == 0 || shape.col(v) == 0
}

#[cfg(test)]
mod tests;
