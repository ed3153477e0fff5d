//! Property tests: invariants that must hold for any finite input.

use persistence1d::prelude::*;
use proptest::prelude::*;

/// Finite samples of moderate magnitude
fn finite_vec(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(
        prop::num::f64::NORMAL.prop_filter("finite", |x| x.is_finite() && x.abs() < 1e12),
        0..=max_len,
    )
}

/// Small integer levels, so plateaus and ties are common
fn tied_vec(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec((-4i32..=4).prop_map(f64::from), 0..=max_len)
}

fn threshold_value() -> impl Strategy<Value = f64> {
    0.0..1e6f64
}

proptest! {
    #![proptest_config(ProptestConfig { max_local_rejects: 1_000_000, ..ProptestConfig::with_cases(300) })]

    #[test]
    fn verify_holds_for_random_input(data in finite_vec(500)) {
        let engine = Persistence1D::from_samples(&data).unwrap();
        prop_assert!(engine.verify(), "{:?}", engine.check());
    }

    #[test]
    fn verify_holds_with_ties(data in tied_vec(200)) {
        let engine = Persistence1D::from_samples(&data).unwrap();
        prop_assert!(engine.verify(), "{:?}", engine.check());
    }

    #[test]
    fn persistence_is_abs_difference(data in finite_vec(300)) {
        let engine = Persistence1D::from_samples(&data).unwrap();
        for p in engine.paired_extrema(Threshold::ZERO, IndexBase::Zero) {
            prop_assert!(p.persistence >= 0.0);
            prop_assert_eq!(p.persistence, (data[p.max_index] - data[p.min_index]).abs());
            prop_assert!(data[p.min_index] <= data[p.max_index]);
        }
    }

    #[test]
    fn one_unpaired_minimum(data in tied_vec(200)) {
        let engine = Persistence1D::from_samples(&data).unwrap();
        let extrema = engine.extrema().len();
        if extrema > 0 {
            prop_assert_eq!(extrema % 2, 1);
            prop_assert_eq!(engine.state().pairs().len(), (extrema - 1) / 2);
        }
        let lowest = data.iter().copied().fold(f64::INFINITY, f64::min);
        if data.is_empty() {
            prop_assert_eq!(engine.global_minimum_index(IndexBase::Zero), UNDEFINED_INDEX);
        } else {
            prop_assert_eq!(engine.global_minimum_value(), lowest);
        }
    }

    #[test]
    fn threshold_filter_is_monotonic(
        data in finite_vec(300),
        a in threshold_value(),
        b in threshold_value(),
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let engine = Persistence1D::from_samples(&data).unwrap();
        let wide = engine.paired_extrema(Threshold::new(low).unwrap(), IndexBase::Zero);
        let narrow = engine.paired_extrema(Threshold::new(high).unwrap(), IndexBase::Zero);

        prop_assert!(narrow.len() <= wide.len());
        for p in &narrow {
            prop_assert!(wide.contains(p));
            prop_assert!(p.persistence > high);
        }
    }

    #[test]
    fn queries_leave_no_residue(data in finite_vec(200), t in threshold_value()) {
        let engine = Persistence1D::from_samples(&data).unwrap();
        let fresh = engine.extrema_indices(Threshold::new(t).unwrap(), IndexBase::One);
        let _ = engine.extrema_indices(Threshold::ZERO, IndexBase::Zero);
        let again = engine.extrema_indices(Threshold::new(t).unwrap(), IndexBase::One);
        prop_assert_eq!(fresh, again);
    }

    #[test]
    fn one_based_shifts_every_index(data in finite_vec(200)) {
        let engine = Persistence1D::from_samples(&data).unwrap();
        let zero = engine.paired_extrema(Threshold::ZERO, IndexBase::Zero);
        let one = engine.paired_extrema(Threshold::ZERO, IndexBase::One);
        prop_assert_eq!(zero.len(), one.len());
        for (z, o) in zero.iter().zip(&one) {
            prop_assert_eq!(z.min_index + 1, o.min_index);
            prop_assert_eq!(z.max_index + 1, o.max_index);
        }
    }

    #[test]
    fn recompute_on_empty_resets(data in finite_vec(200)) {
        let mut engine = Persistence1D::from_samples(&data).unwrap();
        engine.compute(&[]).unwrap();
        prop_assert!(engine.paired_extrema(Threshold::ZERO, IndexBase::Zero).is_empty());
        prop_assert_eq!(engine.global_minimum_index(IndexBase::Zero), UNDEFINED_INDEX);
        prop_assert_eq!(engine.global_minimum_value(), 0.0);
        prop_assert!(engine.verify());
    }
}
