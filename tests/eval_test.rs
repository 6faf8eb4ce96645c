mod helpers;

use cogspace::atom::Atom;
use helpers::{atom, interp_with, sorted_strings, test_interp, PEANO};

#[test]
fn peano_addition() {
    let interp = interp_with(PEANO);
    let results = interp.evaluate(&atom("(add (S Z) (S Z))"));
    assert_eq!(results, vec![atom("(S (S Z))")]);

    let results = interp.evaluate(&atom("(add (S (S Z)) (S Z))"));
    assert_eq!(results, vec![atom("(S (S (S Z)))")]);
}

#[test]
fn depth_zero_returns_atom_unchanged() {
    let interp = interp_with(PEANO);
    let expr = atom("(add (S Z) Z)");
    assert_eq!(interp.eval(&expr, 0), vec![expr.clone()]);
}

#[test]
fn evaluation_is_total() {
    let interp = interp_with(PEANO);
    for text in ["Z", "$x", "42", "\"s\"", "()", "(unknown f)", "(add)", "(add Z)"] {
        let expr = atom(text);
        for depth in [0, 1, 5, 32] {
            assert!(!interp.eval(&expr, depth).is_empty(), "{text} at depth {depth}");
        }
    }
}

#[test]
fn shallow_depth_stops_rewriting_early() {
    let interp = interp_with(PEANO);
    let results = interp.eval(&atom("(add (S (S Z)) Z)"), 1);
    assert_eq!(results, vec![atom("(S (add (S Z) Z))")]);
}

#[test]
fn mutually_recursive_rules_terminate() {
    let interp = interp_with("(= (ping) (pong))\n(= (pong) (ping))");
    let results = interp.evaluate(&atom("(ping)"));
    assert_eq!(results.len(), 1);
}

#[test]
fn growing_rule_is_bounded_by_depth() {
    let interp = interp_with("(= (grow $x) (grow (S $x)))");
    let results = interp.eval(&atom("(grow Z)"), 10);
    assert_eq!(results.len(), 1);
    assert!(results[0].to_string().starts_with("(grow (S"));
}

#[test]
fn match_returns_every_binding() {
    let interp = interp_with("(Knows A Something)\n(Knows A OtherThing)\n(Knows B Third)");
    let results = interp.evaluate(&atom("(match &self (Knows A $w) $w)"));
    assert_eq!(results.len(), 1);
    let list = results[0].as_list().unwrap();
    assert_eq!(sorted_strings(list), vec!["OtherThing", "Something"]);
}

#[test]
fn rules_and_grounded_functions_compose() {
    let interp = interp_with(
        "(= (square $x) (* $x $x))\n(= (hyp2 $a $b) (+ (square $a) (square $b)))",
    );
    assert_eq!(interp.evaluate(&atom("(hyp2 3 4)")), vec![Atom::int(25)]);
    assert_eq!(
        interp.evaluate(&atom("(< (square 2) 5)")),
        vec![Atom::sym("True")]
    );
}

#[test]
fn structural_fallback_evaluates_children() {
    let interp = test_interp();
    let results = interp.evaluate(&atom("(pair (+ 1 2) (* 2 3))"));
    assert_eq!(results, vec![atom("(pair 3 6)")]);
}

#[test]
fn program_directives_report_results() {
    let interp = test_interp();
    let outputs = interp
        .run_program(&format!("{}\n!(add (S Z) Z)\n!(+ 1 1)", helpers::PEANO))
        .unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].results, vec![atom("(S Z)")]);
    assert_eq!(outputs[1].results, vec![Atom::int(2)]);
}

#[test]
fn custom_grounded_function() {
    let interp = test_interp();
    interp.registry().register("shout", |args, _| match args {
        [only] => Ok(Atom::sym(only.to_string().to_uppercase())),
        _ => anyhow::bail!("shout takes one argument"),
    });
    assert_eq!(interp.evaluate(&atom("(shout hello)")), vec![Atom::sym("HELLO")]);
}
