//! Rewrite-based evaluator over the atomspace.
//!
//! Evaluation is non-deterministic: an expression may rewrite to several
//! results. For each expression the strategies run in order, accumulating
//! into one de-duplicated, capped result list:
//!
//! 1. specific rules: stored `(= lhs rhs)` whose ground `lhs` matches,
//! 2. general rules: stored `(= lhs rhs)` whose `lhs` has variables and
//!    unifies with the expression,
//! 3. grounded application when the head names a native function,
//! 4. structural fallback, only when nothing above produced a result.
//!
//! Every rewrite result is evaluated again with one less unit of depth. An
//! atom that is already being evaluated further up the same path evaluates
//! to itself, which cuts self-rewriting loops.

pub mod builtins;
pub mod registry;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::atom::Atom;
use crate::config::InterpreterConfig;
use crate::memory::store::Memory;
use crate::reader::{self, ParseError, Statement};
use crate::unify::{subst, unify, Bindings};
use registry::Registry;

const RESULT_VAR: &str = "$__result";
const PATTERN_VAR: &str = "$__pattern";
const TEMPLATE_VAR: &str = "$__template";
const TYPE_VAR: &str = "$__type";

/// A `!` directive from a program together with what it evaluated to.
#[derive(Debug, Clone)]
pub struct ProgramOutput {
    pub expr: Atom,
    pub results: Vec<Atom>,
}

pub struct Interpreter {
    space: Arc<Memory>,
    registry: Arc<Registry>,
    config: InterpreterConfig,
}

/// Ordered, de-duplicated result list with a hard cap.
struct Results {
    items: Vec<Atom>,
    seen: HashSet<String>,
    cap: usize,
}

impl Results {
    fn new(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            cap: cap.max(1),
        }
    }

    fn push(&mut self, atom: Atom) {
        if !self.is_full() && self.seen.insert(atom.id().to_owned()) {
            self.items.push(atom);
        }
    }

    fn extend(&mut self, atoms: Vec<Atom>) {
        for atom in atoms {
            self.push(atom);
        }
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.cap
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Interpreter {
    /// Interpreter over `space` with the standard builtins registered.
    pub fn new(space: Arc<Memory>, config: InterpreterConfig) -> Self {
        Self::with_registry(space, Arc::new(Registry::with_builtins()), config)
    }

    pub fn with_registry(
        space: Arc<Memory>,
        registry: Arc<Registry>,
        config: InterpreterConfig,
    ) -> Self {
        Self {
            space,
            registry,
            config,
        }
    }

    pub fn space(&self) -> &Arc<Memory> {
        &self.space
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Evaluate with the configured depth budget.
    pub fn evaluate(&self, atom: &Atom) -> Vec<Atom> {
        self.eval(atom, self.config.max_depth)
    }

    /// Evaluate `atom` with at most `max_depth` nested rewrites.
    ///
    /// Total: never fails, and an atom nothing applies to evaluates to
    /// itself. A depth of zero returns `[atom]`.
    pub fn eval(&self, atom: &Atom, max_depth: usize) -> Vec<Atom> {
        let mut path = HashSet::new();
        self.eval_path(atom, max_depth, &mut path)
    }

    /// Parse `text` and run it: plain statements are added to the space,
    /// `!` directives are evaluated. Nothing is applied if parsing fails.
    pub fn run_program(&self, text: &str) -> Result<Vec<ProgramOutput>, ParseError> {
        let statements = reader::parse_program(text)?;
        let mut outputs = Vec::new();
        for statement in statements {
            match statement {
                Statement::Assert(atom) => {
                    self.space.add(atom);
                }
                Statement::Evaluate(expr) => {
                    let results = self.evaluate(&expr);
                    debug!(expr = %expr, results = results.len(), "evaluated directive");
                    outputs.push(ProgramOutput { expr, results });
                }
            }
        }
        Ok(outputs)
    }

    fn eval_path(&self, atom: &Atom, depth: usize, path: &mut HashSet<String>) -> Vec<Atom> {
        let expr = match atom.as_expression() {
            Some(expr) if depth > 0 && !expr.is_empty() => expr,
            _ => return vec![atom.clone()],
        };
        if !path.insert(atom.id().to_owned()) {
            return vec![atom.clone()];
        }

        let mut results = Results::new(self.config.max_results);
        let arity_ok = self.check_declared_arity(atom);
        if arity_ok {
            let applied = self.apply_specific_rules(atom, depth, path, &mut results);
            self.apply_general_rules(atom, &applied, depth, path, &mut results);
            self.apply_grounded(atom, depth, path, &mut results);
        }
        if results.is_empty() {
            let mut changed = false;
            let children: Vec<Atom> = expr
                .children()
                .iter()
                .map(|child| match self.eval_path(child, depth - 1, path).as_slice() {
                    [single] if single != child => {
                        changed = true;
                        single.clone()
                    }
                    _ => child.clone(),
                })
                .collect();
            results.push(if changed {
                Atom::expr(children)
            } else {
                atom.clone()
            });
        }

        path.remove(atom.id());
        results.items
    }

    /// Rules whose left-hand side is ground. Returns the rules applied so
    /// the general pass skips them.
    fn apply_specific_rules(
        &self,
        atom: &Atom,
        depth: usize,
        path: &mut HashSet<String>,
        results: &mut Results,
    ) -> HashSet<String> {
        let mut applied = HashSet::new();
        let pattern = Atom::expr(vec![Atom::sym("="), atom.clone(), Atom::var(RESULT_VAR)]);
        for m in self.space.query(&pattern) {
            if results.is_full() {
                break;
            }
            if rule_lhs(&m.atom).is_some_and(Atom::has_variables) {
                continue;
            }
            let Some(rhs) = m.bindings.resolve(RESULT_VAR) else {
                continue;
            };
            applied.insert(m.atom.id().to_owned());
            results.extend(self.eval_path(&rhs, depth - 1, path));
        }
        applied
    }

    fn apply_general_rules(
        &self,
        atom: &Atom,
        applied: &HashSet<String>,
        depth: usize,
        path: &mut HashSet<String>,
        results: &mut Results,
    ) {
        let pattern = Atom::expr(vec![
            Atom::sym("="),
            Atom::var(PATTERN_VAR),
            Atom::var(TEMPLATE_VAR),
        ]);
        for m in self.space.query(&pattern) {
            if results.is_full() {
                break;
            }
            if applied.contains(m.atom.id()) {
                continue;
            }
            let (Some(lhs), Some(template)) = (
                m.bindings.resolve(PATTERN_VAR),
                m.bindings.resolve(TEMPLATE_VAR),
            ) else {
                continue;
            };
            if !lhs.has_variables() {
                continue;
            }
            if let Some(bindings) = unify(&lhs, atom, &Bindings::new()) {
                let rewritten = subst(&template, &bindings);
                results.extend(self.eval_path(&rewritten, depth - 1, path));
            }
        }
    }

    fn apply_grounded(
        &self,
        atom: &Atom,
        depth: usize,
        path: &mut HashSet<String>,
        results: &mut Results,
    ) {
        let Some(expr) = atom.as_expression() else {
            return;
        };
        let Some(func) = expr.head().and_then(|head| self.registry.resolve(head)) else {
            return;
        };

        let mut args = Vec::with_capacity(expr.tail().len());
        for arg in expr.tail() {
            let mut values = self.eval_path(arg, depth - 1, path);
            if values.len() != 1 {
                debug!(
                    func = func.name(),
                    arg = %arg,
                    results = values.len(),
                    "argument not single-valued, skipping grounded call"
                );
                return;
            }
            args.extend(values.pop());
        }

        match func.call(&args, &self.space) {
            Ok(out) => results.extend(self.eval_path(&out, depth - 1, path)),
            Err(e) => debug!(func = func.name(), error = %e, "grounded call produced no result"),
        }
    }

    /// False when a `(: f (-> A.. R))` declaration exists for the head and
    /// the expression's argument count disagrees with it.
    fn check_declared_arity(&self, atom: &Atom) -> bool {
        let Some(expr) = atom.as_expression() else {
            return true;
        };
        let name = match expr.head() {
            Some(Atom::Symbol(name)) => name.to_string(),
            Some(head) => match head.as_function() {
                Some(func) => func.name().to_owned(),
                None => return true,
            },
            None => return true,
        };
        let Some(expected) = self.declared_arity(&name) else {
            return true;
        };
        let got = expr.tail().len();
        if got != expected {
            warn!(
                head = %name,
                expected,
                got,
                "argument count disagrees with declared type, skipping rules"
            );
            return false;
        }
        true
    }

    fn declared_arity(&self, name: &str) -> Option<usize> {
        let pattern = Atom::expr(vec![Atom::sym(":"), Atom::sym(name), Atom::var(TYPE_VAR)]);
        self.space.query(&pattern).iter().find_map(|m| {
            let ty = m.bindings.resolve(TYPE_VAR)?;
            let arrow = ty.as_expression()?;
            if arrow.head()?.as_symbol() != Some("->") {
                return None;
            }
            Some(arrow.len().saturating_sub(2))
        })
    }
}

/// Left-hand side of a stored `(= lhs rhs)` rule.
fn rule_lhs(rule: &Atom) -> Option<&Atom> {
    match rule.as_expression()?.children() {
        [_, lhs, _] => Some(lhs),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interp() -> Interpreter {
        Interpreter::new(Arc::new(Memory::default()), InterpreterConfig::default())
    }

    fn e(children: Vec<Atom>) -> Atom {
        Atom::expr(children)
    }

    fn s(name: &str) -> Atom {
        Atom::sym(name)
    }

    #[test]
    fn atoms_without_rules_evaluate_to_themselves() {
        let it = interp();
        let atom = e(vec![s("Unknown"), s("thing")]);
        assert_eq!(it.eval(&atom, 5), vec![atom.clone()]);
        assert_eq!(it.eval(&s("Sym"), 5), vec![s("Sym")]);
        assert_eq!(it.eval(&Atom::var("x"), 5), vec![Atom::var("x")]);
    }

    #[test]
    fn depth_zero_is_identity() {
        let it = interp();
        it.space().add(e(vec![s("="), e(vec![s("f")]), s("done")]));
        let atom = e(vec![s("f")]);
        assert_eq!(it.eval(&atom, 0), vec![atom.clone()]);
        assert_eq!(it.eval(&atom, 1), vec![s("done")]);
    }

    #[test]
    fn specific_rule_rewrites() {
        let it = interp();
        it.space().add(e(vec![s("="), e(vec![s("color"), s("sky")]), s("Blue")]));
        assert_eq!(it.evaluate(&e(vec![s("color"), s("sky")])), vec![s("Blue")]);
    }

    #[test]
    fn non_deterministic_rules_yield_every_result() {
        let it = interp();
        it.space().add(e(vec![s("="), e(vec![s("coin")]), s("Heads")]));
        it.space().add(e(vec![s("="), e(vec![s("coin")]), s("Tails")]));
        let mut out: Vec<String> = it.evaluate(&e(vec![s("coin")])).iter().map(|a| a.to_string()).collect();
        out.sort();
        assert_eq!(out, vec!["Heads", "Tails"]);
    }

    #[test]
    fn grounded_arithmetic_evaluates_arguments_first() {
        let it = interp();
        let atom = e(vec![s("+"), e(vec![s("*"), Atom::int(2), Atom::int(3)]), Atom::int(4)]);
        assert_eq!(it.evaluate(&atom), vec![Atom::int(10)]);
    }

    #[test]
    fn failing_grounded_call_falls_back_to_structure() {
        let it = interp();
        let atom = e(vec![s("/"), Atom::int(1), Atom::int(0)]);
        assert_eq!(it.evaluate(&atom), vec![atom.clone()]);
    }

    #[test]
    fn self_rewriting_rule_terminates() {
        let it = interp();
        it.space().add(e(vec![s("="), e(vec![s("loop")]), e(vec![s("loop")])]));
        assert_eq!(it.evaluate(&e(vec![s("loop")])), vec![e(vec![s("loop")])]);
    }

    #[test]
    fn results_are_capped() {
        let space = Arc::new(Memory::default());
        let config = InterpreterConfig {
            max_results: 2,
            ..InterpreterConfig::default()
        };
        let it = Interpreter::new(space, config);
        for i in 0..5 {
            it.space().add(e(vec![s("="), e(vec![s("many")]), Atom::int(i)]));
        }
        assert_eq!(it.evaluate(&e(vec![s("many")])).len(), 2);
    }

    #[test]
    fn declared_arity_mismatch_skips_rules() {
        let it = interp();
        // (: inc (-> Number Number))
        it.space().add(e(vec![
            s(":"),
            s("inc"),
            e(vec![s("->"), s("Number"), s("Number")]),
        ]));
        it.space().add(e(vec![
            s("="),
            e(vec![s("inc"), Atom::var("x"), Atom::var("y")]),
            s("bad"),
        ]));
        let atom = e(vec![s("inc"), s("a"), s("b")]);
        assert_eq!(it.evaluate(&atom), vec![atom.clone()]);
    }

    #[test]
    fn run_program_adds_and_evaluates() {
        let it = interp();
        let outputs = it
            .run_program("(= (double $x) (* $x 2))\n!(double 21)")
            .unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].results, vec![Atom::int(42)]);
    }

    #[test]
    fn run_program_applies_nothing_on_parse_error() {
        let it = interp();
        let before = it.space().len();
        assert!(it.run_program("(Fact A)\n(Broken").is_err());
        assert_eq!(it.space().len(), before);
    }
}
