use proptest::prelude::*;
use sierra_measures::{
    curve_similarity, fractional_losses, from_series, karp_flatt, self_organization,
    IdealCurveKind, SimilarityMethod,
};

fn doubling_sizes(n: usize) -> Vec<usize> {
    (0..n).map(|k| 1usize << k).collect()
}

proptest! {
    #[test]
    fn prop_linear_speedup_has_zero_serial_fraction(
        base in 1.0f64..1000.0,
        n in 2usize..8,
    ) {
        let sizes = doubling_sizes(n);
        let perf: Vec<f64> = sizes.iter().map(|&s| base * s as f64).collect();
        let kf = karp_flatt(&perf, &sizes).unwrap();

        prop_assert_eq!(kf.len(), n - 1);
        for v in kf {
            prop_assert!(v.abs() < 1e-9);
        }
    }

    #[test]
    fn prop_baselines_are_zero(
        perf in proptest::collection::vec(0.0f64..500.0, 1..8),
        tlost in proptest::collection::vec(0.0f64..50.0, 8),
    ) {
        let sizes = doubling_sizes(perf.len());
        let tlost = &tlost[..perf.len()];
        let fl = fractional_losses(&perf, tlost, &sizes).unwrap();
        let so = self_organization(&fl, &sizes).unwrap();

        prop_assert_eq!(fl.len(), perf.len());
        prop_assert_eq!(fl[0], 0.0);
        prop_assert_eq!(so[0], 0.0);
    }

    #[test]
    fn prop_distances_are_non_negative(
        a in proptest::collection::vec(-100.0f64..100.0, 1..20),
        b in proptest::collection::vec(-100.0f64..100.0, 1..20),
    ) {
        let (ca, cb) = (from_series(&a), from_series(&b));
        for method in SimilarityMethod::ALL {
            let d = method.distance(&ca, &cb).unwrap();
            prop_assert!(d >= 0.0, "{} gave {}", method, d);
        }
    }

    #[test]
    fn prop_unchanged_environment_is_perfectly_similar(
        perf in proptest::collection::vec(0.0f64..100.0, 1..30),
        var in proptest::collection::vec(0.0f64..1.0, 30),
    ) {
        let var = &var[..perf.len()];
        let score = curve_similarity(
            IdealCurveKind::Adaptability,
            SimilarityMethod::Frechet,
            &perf,
            &perf,
            var,
            var,
        )
        .unwrap();
        prop_assert!(score.abs() < 1e-9);
    }
}
