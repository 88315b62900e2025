use proptest::{collection::vec, prelude::*};

use super::*;

fn worked_example() -> Field {
    let shape = GridShape::new(4, 3);
    let values = vec![2.0, 8.0, 1.0, 10.0, 9.0, 5.0, 6.0, 11.0, 7.0, 3.0, 4.0, 12.0];
    Field::new(shape, values)
}

#[test]
fn build_all_finds_the_expected_critical_point_counts() {
    let field = worked_example();
    let engine = Engine::build_all(&field, 2);
    assert_eq!(engine.critical_points(2).len(), 1, "one maximum");
    assert_eq!(engine.critical_points(0).len(), 2, "two minima");
    assert_eq!(engine.critical_points(1).len(), 3, "three saddles");
}

#[test]
fn simplify_by_pairs_remained_rejects_fewer_than_two() {
    let field = worked_example();
    let mut engine = Engine::build_all(&field, 1);
    let err = engine
        .simplify_by_pairs_remained(1, SimplifyMethod::GradientReversal)
        .unwrap_err();
    assert!(matches!(err, MorseError::TooFewPairsRequested(1)));
}

#[test]
fn simplify_by_percent_rejects_out_of_range_values() {
    let field = worked_example();
    let mut engine = Engine::build_all(&field, 1);
    assert!(engine.simplify_by_percent(150.0, SimplifyMethod::GradientReversal).is_err());
    assert!(engine.simplify_by_percent(-1.0, SimplifyMethod::GradientReversal).is_err());
}

#[test]
fn simplify_by_pairs_remained_leaves_exactly_that_many() {
    let field = worked_example();
    let mut engine = Engine::build_all(&field, 1);
    let starting = engine.persistence_pairs().len();
    if starting >= 3 {
        engine
            .simplify_by_pairs_remained(2, SimplifyMethod::GradientReversal)
            .unwrap();
        assert_eq!(engine.persistence_pairs().len(), 2);
    }
}

#[test]
fn both_simplification_methods_agree_on_remaining_pair_count() {
    let field = worked_example();
    let mut by_gradient = Engine::build_all(&field, 1);
    let mut by_splice = Engine::build_all(&field, 1);
    let starting = by_gradient.persistence_pairs().len();
    if starting >= 3 {
        by_gradient
            .simplify_by_pairs_remained(2, SimplifyMethod::GradientReversal)
            .unwrap();
        by_splice
            .simplify_by_pairs_remained(2, SimplifyMethod::ArcSplicing)
            .unwrap();
        assert_eq!(by_gradient.persistence_pairs().len(), by_splice.persistence_pairs().len());
    }
}

#[test]
fn cut_morse_graph_has_no_more_edges_than_the_full_graph() {
    let field = worked_example();
    let engine = Engine::build_all(&field, 1);
    let cut = engine.cut_morse_graph();
    assert!(cut.edge_count() <= engine.ms_graph().graph.edge_count());
}

fn field_strategy(w: u32, h: u32) -> impl Strategy<Value = Field> {
    let shape = GridShape::new(w, h);
    vec(-1000i32..1000, shape.n() as usize)
        .prop_map(move |ints| Field::new(shape, ints.into_iter().map(|v| v as f64).collect()))
}

proptest! {
    /// Every cell is paired or critical, never both, on any field.
    #[test]
    fn gradient_pairs_or_criticalizes_every_cell(field in field_strategy(4, 4)) {
        let gradient = gradient::build(&field, 1);
        for i in 0..4 * field.shape().n() {
            let c = CellId(i);
            prop_assert_ne!(gradient.arrow(c).is_some(), gradient.is_critical(c));
        }
    }

    /// The discrete gradient is always a partial involution.
    #[test]
    fn gradient_is_always_an_involution(field in field_strategy(3, 5)) {
        let gradient = gradient::build(&field, 1);
        for i in 0..4 * field.shape().n() {
            let c = CellId(i);
            if let Some(partner) = gradient.arrow(c) {
                prop_assert_eq!(gradient.arrow(partner), Some(c));
            }
        }
    }

    /// Morse theory's Euler characteristic identity holds on the torus
    /// regardless of the field: #minima - #saddles + #maxima == 0.
    #[test]
    fn critical_cell_counts_satisfy_euler_characteristic(field in field_strategy(5, 4)) {
        let shape = field.shape();
        let gradient = gradient::build(&field, 1);
        let critical = gradient::critical_cells_sorted(&field, &gradient);
        let minima = critical.iter().filter(|&&c| cell::dim(shape, c) == 0).count() as i64;
        let saddles = critical.iter().filter(|&&c| cell::dim(shape, c) == 1).count() as i64;
        let maxima = critical.iter().filter(|&&c| cell::dim(shape, c) == 2).count() as i64;
        prop_assert_eq!(minima - saddles + maxima, 0);
    }

    /// Every separatrix arc starts at its saddle and ends at a critical cell.
    #[test]
    fn every_arc_ends_at_a_critical_cell(field in field_strategy(4, 3)) {
        let shape = field.shape();
        let gradient = gradient::build(&field, 1);
        let critical = gradient::critical_cells_sorted(&field, &gradient);
        let table = arcs::compute_all(shape, &gradient, &critical);
        for (&saddle, saddle_arcs) in &table {
            for arc in saddle_arcs {
                prop_assert_eq!(arc[0], saddle);
                prop_assert!(gradient.is_critical(*arc.last().unwrap()));
            }
        }
    }

    /// Persistence pairs are always returned sorted descending.
    #[test]
    fn persistence_pairs_stay_sorted(field in field_strategy(4, 4)) {
        let engine = Engine::build_all(&field, 1);
        let pairs = engine.persistence_pairs();
        for w in pairs.windows(2) {
            prop_assert!(w[0].persistence >= w[1].persistence);
        }
    }

    /// Cancelling pairs down to a target count never leaves more pairs than asked.
    #[test]
    fn simplify_by_pairs_remained_never_overshoots(field in field_strategy(5, 5)) {
        let mut engine = Engine::build_all(&field, 1);
        let starting = engine.persistence_pairs().len();
        if starting >= 2 {
            let target = starting / 2 + (starting % 2);
            let target = target.max(2).min(starting);
            engine.simplify_by_pairs_remained(target, SimplifyMethod::GradientReversal).unwrap();
            prop_assert!(engine.persistence_pairs().len() <= starting);
        }
    }
}
