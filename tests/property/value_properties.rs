use cogspace::config::MemoryConfig;
use cogspace::memory::types::{Priority, Truth};
use proptest::prelude::*;

// ── Truth merge is commutative ───────────────────────────────────────────

proptest! {
    #[test]
    fn merge_is_commutative(
        s1 in 0.0f64..=1.0,
        c1 in 0.01f64..100.0,
        s2 in 0.0f64..=1.0,
        c2 in 0.01f64..100.0,
    ) {
        let a = Truth::new(s1, c1);
        let b = Truth::new(s2, c2);
        let ab = a.merge(&b);
        let ba = b.merge(&a);
        prop_assert!((ab.strength() - ba.strength()).abs() < 1e-9);
        prop_assert!((ab.count() - ba.count()).abs() < 1e-9);
    }
}

// ── Merged strength stays between the inputs ─────────────────────────────

proptest! {
    #[test]
    fn merged_strength_is_bounded(
        s1 in 0.0f64..=1.0,
        c1 in 0.0f64..100.0,
        s2 in 0.0f64..=1.0,
        c2 in 0.0f64..100.0,
    ) {
        let merged = Truth::new(s1, c1).merge(&Truth::new(s2, c2));
        prop_assert!(merged.strength() >= s1.min(s2) - 1e-9);
        prop_assert!(merged.strength() <= s1.max(s2) + 1e-9);
        prop_assert!(merged.confidence() >= 0.0 && merged.confidence() < 1.0);
    }
}

// ── Decay without boost never raises short-term priority ─────────────────

proptest! {
    #[test]
    fn decay_is_monotonic(
        sti in 0.0f64..=1.0,
        lti in 0.0f64..=1.0,
        rounds in 1usize..50,
    ) {
        let config = MemoryConfig::default();
        let mut p = Priority::new(sti, lti);
        let mut last = p.sti;
        for _ in 0..rounds {
            p.decay(&config);
            prop_assert!(p.sti < last || p.sti == 0.0);
            prop_assert!(p.lti >= 0.0 && p.lti <= 1.0);
            last = p.sti;
        }
    }
}

// ── Boost keeps priorities in range ──────────────────────────────────────

proptest! {
    #[test]
    fn boost_stays_in_unit_interval(
        sti in 0.0f64..=1.0,
        amount in 0.0f64..5.0,
        rate in 0.0f64..=1.0,
    ) {
        let mut p = Priority::new(sti, 0.0);
        p.boost(amount, rate);
        prop_assert!(p.sti >= sti && p.sti <= 1.0);
        prop_assert!(p.lti >= 0.0 && p.lti <= 1.0);
    }
}
