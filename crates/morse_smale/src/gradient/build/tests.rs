use super::*;
use crate::cell::GridShape;

fn worked_example() -> (GridShape, Field) {
    // 3 rows by 4 columns; one maximum (value 12), two minima (1 and 2), three saddles.
    let shape = GridShape::new(4, 3);
    let values = vec![2.0, 8.0, 1.0, 10.0, 9.0, 5.0, 6.0, 11.0, 7.0, 3.0, 4.0, 12.0];
    (shape, Field::new(shape, values))
}

#[test]
fn gradient_is_a_partial_involution() {
    let (_shape, field) = worked_example();
    let gradient = build(&field, 1);
    for c in 0..gradient.v.len() {
        let c = CellId(c as u32);
        if let Some(partner) = gradient.arrow(c) {
            assert_eq!(gradient.arrow(partner), Some(c), "arrow must point back");
        }
    }
}

#[test]
fn every_cell_is_either_paired_or_critical_not_both() {
    let (_shape, field) = worked_example();
    let gradient = build(&field, 1);
    for c in 0..gradient.v.len() {
        let c = CellId(c as u32);
        let paired = gradient.arrow(c).is_some();
        let critical = gradient.is_critical(c);
        assert!(paired != critical, "cell {:?} must be exactly one of paired/critical", c);
    }
}

#[test]
fn sequential_and_parallel_builds_agree() {
    let (_shape, field) = worked_example();
    let seq = build(&field, 1);
    let par = build(&field, 4);
    assert_eq!(seq.v, par.v);
    assert_eq!(seq.critical, par.critical);
}

#[test]
fn critical_cells_include_exactly_one_minimum_and_one_maximum_on_this_fixture() {
    let (shape, field) = worked_example();
    let gradient = build(&field, 2);
    let crit = critical_cells_sorted(&field, &gradient);
    let minima = crit.iter().filter(|&&c| cell::dim(shape, c) == 0).count();
    let maxima = crit.iter().filter(|&&c| cell::dim(shape, c) == 2).count();
    let saddles = crit.iter().filter(|&&c| cell::dim(shape, c) == 1).count();
    // Euler characteristic of the torus is 0: #min - #saddle + #max == 0.
    assert_eq!(minima as i64 - saddles as i64 + maxima as i64, 0);
    assert!(minima >= 1);
    assert!(maxima >= 1);
}
