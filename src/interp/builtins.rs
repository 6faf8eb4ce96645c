//! Standard grounded functions: arithmetic, comparison and `match`.

use anyhow::{anyhow, bail, Result};

use super::registry::Registry;
use crate::atom::{Atom, GroundedValue};
use crate::memory::store::Memory;
use crate::unify::subst;

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(atom: &Atom) -> Result<Num> {
        match atom.as_grounded().map(|g| g.value()) {
            Some(GroundedValue::Int(i)) => Ok(Num::Int(*i)),
            Some(GroundedValue::Float(x)) => Ok(Num::Float(*x)),
            _ => Err(anyhow!("not a number: {atom}")),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(x) => x,
        }
    }
}

fn operands(name: &str, args: &[Atom]) -> Result<(Num, Num)> {
    match args {
        [a, b] => Ok((Num::of(a)?, Num::of(b)?)),
        _ => bail!("{name} expects 2 arguments, got {}", args.len()),
    }
}

fn arithmetic(
    name: &'static str,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> impl Fn(&[Atom], &Memory) -> Result<Atom> + Send + Sync + 'static {
    move |args: &[Atom], _: &Memory| match operands(name, args)? {
        (Num::Int(a), Num::Int(b)) => int_op(a, b)
            .map(Atom::int)
            .ok_or_else(|| anyhow!("integer {name} failed for {a} and {b}")),
        (a, b) => {
            let out = float_op(a.as_f64(), b.as_f64());
            if out.is_finite() {
                Ok(Atom::float(out))
            } else {
                bail!("{name} produced a non-finite result")
            }
        }
    }
}

fn comparison(
    name: &'static str,
    cmp: fn(f64, f64) -> bool,
) -> impl Fn(&[Atom], &Memory) -> Result<Atom> + Send + Sync + 'static {
    move |args: &[Atom], _: &Memory| {
        let (a, b) = operands(name, args)?;
        Ok(truth_atom(cmp(a.as_f64(), b.as_f64())))
    }
}

fn truth_atom(value: bool) -> Atom {
    Atom::sym(if value { "True" } else { "False" })
}

/// `(== a b)`: numeric comparison for numbers, structural identity otherwise.
fn equals(args: &[Atom], _: &Memory) -> Result<Atom> {
    let [a, b] = args else {
        bail!("== expects 2 arguments, got {}", args.len());
    };
    match (Num::of(a), Num::of(b)) {
        (Ok(x), Ok(y)) => Ok(truth_atom(x.as_f64() == y.as_f64())),
        _ => Ok(truth_atom(a == b)),
    }
}

/// `(match &self pattern template)`: the template instantiated once per
/// stored atom matching `pattern`, as a grounded list.
fn match_space(args: &[Atom], space: &Memory) -> Result<Atom> {
    let [source, pattern, template] = args else {
        bail!("match expects 3 arguments, got {}", args.len());
    };
    if source.as_symbol() != Some("&self") {
        bail!("match only supports &self, got {source}");
    }
    let results = space
        .query(pattern)
        .into_iter()
        .map(|m| subst(template, &m.bindings))
        .collect();
    Ok(Atom::list(results))
}

/// Install every builtin into `registry`.
pub fn install(registry: &Registry) {
    registry.register("+", arithmetic("+", i64::checked_add, |a, b| a + b));
    registry.register("-", arithmetic("-", i64::checked_sub, |a, b| a - b));
    registry.register("*", arithmetic("*", i64::checked_mul, |a, b| a * b));
    registry.register("/", arithmetic("/", i64::checked_div, |a, b| a / b));
    registry.register("<", comparison("<", |a, b| a < b));
    registry.register(">", comparison(">", |a, b| a > b));
    registry.register("<=", comparison("<=", |a, b| a <= b));
    registry.register(">=", comparison(">=", |a, b| a >= b));
    registry.register("==", equals);
    registry.register("match", match_space);
}
