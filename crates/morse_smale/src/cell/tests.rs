use super::*;
use crate::field::Field;

fn small_field() -> (GridShape, Field) {
    // 3x4 grid with one maximum, two minima and three saddles.
    let shape = GridShape::new(4, 3);
    let values = vec![2.0, 8.0, 1.0, 10.0, 9.0, 5.0, 6.0, 11.0, 7.0, 3.0, 4.0, 12.0];
    (shape, Field::new(shape, values))
}

#[test]
fn dim_partitions_the_four_blocks() {
    let shape = GridShape::new(4, 3);
    let n = shape.n();
    assert_eq!(dim(shape, CellId(0)), 0);
    assert_eq!(dim(shape, CellId(n - 1)), 0);
    assert_eq!(dim(shape, CellId(n)), 1);
    assert_eq!(dim(shape, CellId(3 * n - 1)), 1);
    assert_eq!(dim(shape, CellId(3 * n)), 2);
    assert_eq!(dim(shape, CellId(4 * n - 1)), 2);
}

#[test]
fn vertex_neighbours_wrap_toroidally() {
    let shape = GridShape::new(4, 3);
    // top-left vertex wraps left to the row's last column and up to the last row.
    assert_eq!(vleft(shape, 0), 3);
    assert_eq!(vtop(shape, 0), 8);
    assert_eq!(vright(shape, 3), 0);
    assert_eq!(vbottom(shape, 8), 0);
}

#[test]
fn facets_of_face_are_its_four_edges_and_cofacets_invert_them() {
    let shape = GridShape::new(4, 3);
    let n = shape.n();
    let face = CellId(3 * n);
    let fs = facets(shape, face);
    assert_eq!(fs.len(), 4);
    for &e in &fs {
        let cf = cofacets(shape, e);
        assert!(cf.contains(&face), "face must appear among its edges' cofacets");
    }
}

#[test]
fn verts_of_face_has_four_distinct_vertices() {
    let shape = GridShape::new(4, 3);
    let n = shape.n();
    let face = CellId(3 * n + 5);
    let vs = verts(shape, face);
    assert_eq!(vs.len(), 4);
    let mut ids: Vec<u32> = vs.as_slice().iter().map(|c| c.0).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[test]
fn lower_star_is_sorted_ascending_by_extended_value() {
    let (shape, field) = small_field();
    let ls = lower_star(shape, &field, 5);
    let vals: Vec<_> = ls.iter().map(|&c| field.ext(c)).collect();
    for w in vals.windows(2) {
        assert!(w[0] <= w[1]);
    }
}

#[test]
fn coords_offsets_edges_and_faces_by_half() {
    let shape = GridShape::new(4, 3);
    let n = shape.n();
    let v = coords(shape, CellId(5));
    let he = coords(shape, CellId(n + 5));
    let ve = coords(shape, CellId(2 * n + 5));
    let f = coords(shape, CellId(3 * n + 5));
    assert_eq!(he.y, v.y);
    assert!((he.x - v.x - 0.5).abs() < 1e-12);
    assert_eq!(ve.x, v.x);
    assert!((ve.y - v.y - 0.5).abs() < 1e-12);
    assert!((f.x - v.x - 0.5).abs() < 1e-12);
    assert!((f.y - v.y - 0.5).abs() < 1e-12);
}
