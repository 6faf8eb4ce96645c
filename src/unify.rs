//! Structural unification and substitution over atoms.
//!
//! [`unify`] is iterative: pending pairs live on an explicit stack so deeply
//! nested expressions cannot exhaust the call stack. Variables are bound
//! only after an occurs-check, and a variable that already has a binding is
//! merged by unifying the old and new values rather than overwritten.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::atom::{Atom, VARIABLE_SIGIL};

/// Variable bindings keyed by the variable's identity (`$name`).
#[derive(Clone, Default, PartialEq)]
pub struct Bindings {
    map: HashMap<String, Atom>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw binding of a variable, with or without the sigil.
    pub fn get(&self, var: &str) -> Option<&Atom> {
        if var.starts_with(VARIABLE_SIGIL) {
            self.map.get(var)
        } else {
            self.map.get(&format!("{VARIABLE_SIGIL}{var}"))
        }
    }

    /// Binding of a variable with all nested variables substituted.
    pub fn resolve(&self, var: &str) -> Option<Atom> {
        self.get(var).map(|value| subst(value, self))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Atom)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Bind without checks; used to seed initial bindings.
    pub fn with(mut self, var: &str, value: Atom) -> Self {
        self.map.insert(Atom::var(var).id().to_owned(), value);
        self
    }

    /// Fold `other` into these bindings, unifying any shared variables.
    pub fn merge(&self, other: &Bindings) -> Option<Bindings> {
        let mut merged = self.clone();
        let mut stack = Vec::new();
        let mut merging = HashSet::new();
        for (var, value) in &other.map {
            bind(&mut merged, var, value.clone(), &mut stack, &mut merging)?;
        }
        drain(&mut merged, stack, &mut merging)?;
        Some(merged)
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.map.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        f.write_str("{")?;
        for (i, (var, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{var}={value}")?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Unify `pattern` with `instance`, extending `initial`.
///
/// Returns `None` when the atoms cannot be made equal. Failure is ordinary
/// control flow, not an error.
pub fn unify(pattern: &Atom, instance: &Atom, initial: &Bindings) -> Option<Bindings> {
    let mut bindings = initial.clone();
    let mut merging = HashSet::new();
    let stack = vec![(pattern.clone(), instance.clone())];
    drain(&mut bindings, stack, &mut merging)?;
    Some(bindings)
}

fn drain(
    bindings: &mut Bindings,
    mut stack: Vec<(Atom, Atom)>,
    merging: &mut HashSet<String>,
) -> Option<()> {
    while let Some((left, right)) = stack.pop() {
        let left = subst(&left, bindings);
        let right = subst(&right, bindings);
        if left == right {
            continue;
        }
        match (&left, &right) {
            (Atom::Variable(_), _) => {
                bind(bindings, left.id(), right.clone(), &mut stack, merging)?
            }
            (_, Atom::Variable(_)) => {
                bind(bindings, right.id(), left.clone(), &mut stack, merging)?
            }
            (Atom::Expression(a), Atom::Expression(b)) => {
                if a.len() != b.len() {
                    return None;
                }
                // Reversed so children are unified left to right.
                for (x, y) in a.children().iter().zip(b.children()).rev() {
                    stack.push((x.clone(), y.clone()));
                }
            }
            _ => return None,
        }
    }
    Some(())
}

fn bind(
    bindings: &mut Bindings,
    var: &str,
    value: Atom,
    stack: &mut Vec<(Atom, Atom)>,
    merging: &mut HashSet<String>,
) -> Option<()> {
    let value = subst(&value, bindings);
    if value.is_variable() && value.id() == var {
        return Some(());
    }
    if occurs(var, &value) {
        return None;
    }
    if let Some(existing) = bindings.map.get(var).cloned() {
        // Only reachable through cyclic seed bindings; a second visit means
        // the chain loops back on itself.
        if !merging.insert(var.to_owned()) {
            return None;
        }
        stack.push((existing, value));
        return Some(());
    }
    bindings.map.insert(var.to_owned(), value);
    Some(())
}

/// Does variable `var` appear anywhere inside `atom`?
fn occurs(var: &str, atom: &Atom) -> bool {
    if !atom.has_variables() {
        return false;
    }
    let mut pending = vec![atom];
    while let Some(next) = pending.pop() {
        match next {
            Atom::Variable(_) if next.id() == var => return true,
            Atom::Expression(expr) if expr.has_variables() => {
                pending.extend(expr.children());
            }
            _ => {}
        }
    }
    false
}

/// Replace bound variables by their values, following chains.
///
/// A variable met again while its own binding is being expanded is left in
/// place, so cyclic bindings terminate. Unchanged subtrees are returned as
/// the original shared handles.
pub fn subst(atom: &Atom, bindings: &Bindings) -> Atom {
    if bindings.is_empty() || !atom.has_variables() {
        return atom.clone();
    }
    let mut expanding = Vec::new();
    subst_inner(atom, bindings, &mut expanding)
}

fn subst_inner(atom: &Atom, bindings: &Bindings, expanding: &mut Vec<String>) -> Atom {
    match atom {
        Atom::Variable(_) => {
            let id = atom.id();
            if expanding.iter().any(|v| v == id) {
                return atom.clone();
            }
            match bindings.map.get(id) {
                Some(value) => {
                    expanding.push(id.to_owned());
                    let resolved = subst_inner(value, bindings, expanding);
                    expanding.pop();
                    resolved
                }
                None => atom.clone(),
            }
        }
        Atom::Expression(expr) if expr.has_variables() => {
            let mut changed = false;
            let children: Vec<Atom> = expr
                .children()
                .iter()
                .map(|child| {
                    let next = subst_inner(child, bindings, expanding);
                    if !Atom::ptr_eq(&next, child) {
                        changed = true;
                    }
                    next
                })
                .collect();
            if changed {
                Atom::expr(children)
            } else {
                atom.clone()
            }
        }
        _ => atom.clone(),
    }
}

/// Rename every variable in `atom` with a `#suffix`, standardizing a stored
/// atom apart from the pattern it is about to meet.
pub fn rename_variables(atom: &Atom, suffix: u64) -> Atom {
    match atom {
        Atom::Variable(_) => Atom::var(format!("{}#{suffix}", atom.id())),
        Atom::Expression(expr) if expr.has_variables() => Atom::expr(
            expr.children()
                .iter()
                .map(|child| rename_variables(child, suffix))
                .collect(),
        ),
        _ => atom.clone(),
    }
}
