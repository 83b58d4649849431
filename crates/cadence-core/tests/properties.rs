//! Property-based tests for cadence-core parameter primitives.
//!
//! Covers range normalization, snapping and the structural equivalence of
//! state trees using proptest for randomized input generation.

use std::collections::BTreeMap;

use cadence_core::{ParamDescriptor, ParamRange, ParameterSet, ParameterStore, StateTree};
use proptest::prelude::*;

fn tree_strategy() -> impl Strategy<Value = StateTree> {
    (
        prop::sample::select(vec!["parameters", "PARAMS"]),
        prop::collection::btree_map("[a-d]", -10.0f32..10.0f32, 0..4),
    )
        .prop_map(|(kind, values): (&str, BTreeMap<String, f32>)| StateTree {
            kind: kind.to_string(),
            values,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any linear range, normalizing then denormalizing a plain value
    /// lands within float tolerance of the original.
    #[test]
    fn linear_range_round_trip(
        min in -1000.0f32..0.0f32,
        span in 0.1f32..2000.0f32,
        t in 0.0f32..=1.0f32,
    ) {
        let range = ParamRange::new(min, min + span);
        let value = min + span * t;
        let back = range.from_normalized(range.to_normalized(value));
        let tolerance = 1e-4 * (1.0 + min.abs() + span);
        prop_assert!(
            (back - value).abs() <= tolerance,
            "range [{}, {}] value {} came back as {}", min, min + span, value, back
        );
    }

    /// Skewed ranges stay monotonic and inside [0, 1].
    #[test]
    fn skewed_normalization_is_monotonic(
        a in 20.0f32..20000.0f32,
        b in 20.0f32..20000.0f32,
    ) {
        let range = ParamRange::with_centre(20.0, 20000.0, 1000.0).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (nlo, nhi) = (range.to_normalized(lo), range.to_normalized(hi));
        prop_assert!((0.0..=1.0).contains(&nlo));
        prop_assert!((0.0..=1.0).contains(&nhi));
        prop_assert!(nlo <= nhi, "{} -> {}, {} -> {}", lo, nlo, hi, nhi);
    }

    /// Snapped values are always inside the range and snapping is idempotent.
    #[test]
    fn snap_is_clamped_and_idempotent(
        value in -20.0f32..20.0f32,
        step in prop::sample::select(vec![0.0f32, 0.25, 0.5, 1.0]),
    ) {
        let range = ParamRange::stepped(-10.0, 10.0, step);
        let snapped = range.snap(value);
        prop_assert!(range.contains(snapped));
        prop_assert_eq!(range.snap(snapped), snapped);
    }

    /// Tree equivalence is reflexive and symmetric.
    #[test]
    fn equivalence_reflexive_and_symmetric(a in tree_strategy(), b in tree_strategy()) {
        prop_assert!(a.is_equivalent_to(&a));
        prop_assert!(a.is_equivalent_to(&a.clone()));
        prop_assert_eq!(a.is_equivalent_to(&b), b.is_equivalent_to(&a));
    }

    /// Tree equivalence is transitive.
    #[test]
    fn equivalence_transitive(
        a in tree_strategy(),
        b in tree_strategy(),
        c in tree_strategy(),
    ) {
        if a.is_equivalent_to(&b) && b.is_equivalent_to(&c) {
            prop_assert!(a.is_equivalent_to(&c));
        }
        // Force the interesting case too: two clones of one tree.
        let b2 = a.clone();
        let c2 = b2.clone();
        prop_assert!(a.is_equivalent_to(&b2) && b2.is_equivalent_to(&c2) && a.is_equivalent_to(&c2));
    }

    /// A store restored from its own snapshot is equivalent to that snapshot.
    #[test]
    fn restore_reproduces_snapshot(
        gain in -60.0f32..12.0f32,
        mix in 0.0f32..100.0f32,
        mode in 0.0f32..3.0f32,
    ) {
        let parameters = ParameterSet::new(vec![
            ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0),
            ParamDescriptor::new("mix", "Mix", ParamRange::new(0.0, 100.0), 50.0),
            ParamDescriptor::choice("mode", "Mode", &["A", "B", "C"]),
        ])
        .unwrap();
        let store = ParameterStore::detached(parameters);
        store.set("gain", gain);
        store.set("mix", mix);
        store.set("mode", mode);
        let snapshot = store.snapshot();

        store.reset();
        store.restore(&snapshot);
        prop_assert!(store.snapshot().is_equivalent_to(&snapshot));
    }
}
