//! Name → native function table consulted by the interpreter.

use dashmap::DashMap;

use crate::atom::{Atom, GroundedFn};
use crate::memory::store::Memory;

/// Registered grounded functions, keyed by the symbol name they answer to.
#[derive(Default)]
pub struct Registry {
    functions: DashMap<String, GroundedFn>,
}

impl Registry {
    /// Empty registry with no builtins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the standard builtins.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        super::builtins::install(&registry);
        registry
    }

    /// Register (or replace) a function under `name`.
    pub fn register<F>(&self, name: &str, func: F) -> Atom
    where
        F: Fn(&[Atom], &Memory) -> anyhow::Result<Atom> + Send + Sync + 'static,
    {
        let grounded = GroundedFn::new(name, func);
        self.functions.insert(name.to_owned(), grounded.clone());
        Atom::function(grounded)
    }

    pub fn get(&self, name: &str) -> Option<GroundedFn> {
        self.functions.get(name).map(|f| f.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Function to apply for an expression head: either the grounded
    /// function itself or a symbol naming a registered one.
    pub fn resolve(&self, head: &Atom) -> Option<GroundedFn> {
        match head {
            Atom::Grounded(_) => head.as_function().cloned(),
            Atom::Symbol(name) => self.get(name),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.functions.iter().map(|e| e.key().clone()).collect();
        names.sort();
        f.debug_struct("Registry").field("functions", &names).finish()
    }
}
