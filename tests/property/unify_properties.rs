use cogspace::atom::Atom;
use cogspace::unify::{subst, unify, Bindings};
use proptest::prelude::*;

fn arb_leaf() -> impl Strategy<Value = Atom> {
    prop_oneof![
        arb_ground_leaf(),
        prop::sample::select(vec!["x", "y", "z"]).prop_map(|name| Atom::var(name)),
    ]
}

fn arb_ground_leaf() -> impl Strategy<Value = Atom> {
    prop_oneof![
        prop::sample::select(vec!["a", "b", "c", "f", "g"]).prop_map(|name| Atom::sym(name)),
        (0i64..4).prop_map(Atom::int),
    ]
}

fn arb_atom() -> impl Strategy<Value = Atom> {
    arb_leaf().prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Atom::expr)
    })
}

fn arb_ground_atom() -> impl Strategy<Value = Atom> {
    arb_ground_leaf().prop_recursive(3, 16, 3, |inner| {
        prop::collection::vec(inner, 0..3).prop_map(Atom::expr)
    })
}

// ── Soundness: a unifier makes both sides equal ──────────────────────────

proptest! {
    #[test]
    fn unifier_equalizes_both_sides(p in arb_atom(), i in arb_atom()) {
        if let Some(b) = unify(&p, &i, &Bindings::new()) {
            prop_assert_eq!(subst(&p, &b), subst(&i, &b));
        }
    }
}

// ── Reflexivity ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn every_atom_unifies_with_itself(a in arb_atom()) {
        prop_assert!(unify(&a, &a, &Bindings::new()).is_some());
    }
}

// ── Symmetry of success ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn success_does_not_depend_on_side(p in arb_atom(), i in arb_atom()) {
        let forward = unify(&p, &i, &Bindings::new()).is_some();
        let backward = unify(&i, &p, &Bindings::new()).is_some();
        prop_assert_eq!(forward, backward);
    }
}

// ── Occurs-check ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn variable_never_binds_to_term_containing_it(
        wrapper in prop::collection::vec(arb_leaf(), 0..3),
    ) {
        let mut children = wrapper;
        children.push(Atom::var("x"));
        let containing = Atom::expr(children);
        prop_assert!(unify(&Atom::var("x"), &containing, &Bindings::new()).is_none());
    }
}

// ── Ground atoms unify only when identical ───────────────────────────────

proptest! {
    #[test]
    fn ground_atoms_unify_iff_equal(p in arb_ground_atom(), i in arb_ground_atom()) {
        prop_assert_eq!(unify(&p, &i, &Bindings::new()).is_some(), p == i);
    }
}
