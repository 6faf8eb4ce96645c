//! The atomspace: canonical interning table, per-atom metadata and the head index.
//!
//! [`Memory`] owns every stored atom. Each entry pairs the canonical [`Atom`]
//! with its own metadata cell, so attention updates lock a single atom and
//! never the whole store. Expressions are additionally indexed by the
//! identity of their head so queries with a concrete head only visit
//! plausible candidates.

use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::atom::Atom;
use crate::config::MemoryConfig;
use crate::memory::types::{Priority, Truth, Value};

/// Symbols that are interned at construction and never forgotten or removed.
pub const PROTECTED_SYMBOLS: &[&str] = &[
    "=", ":", "->", "Type", "True", "False", "&self", "match", "Implies", "Seq", "Utility",
    "Atom", "Symbol", "Variable", "Expression", "Grounded", "Number", "String",
];

/// Head-index bucket for expressions whose head is a variable (or which are empty).
pub(super) const WILDCARD_HEAD: &str = "$";

/// Index entry: the canonical atom and its metadata cell.
#[derive(Clone)]
pub(super) struct Slot {
    pub(super) atom: Atom,
    pub(super) value: Arc<Mutex<Value>>,
}

pub struct Memory {
    pub(super) atoms: DashMap<String, Slot>,
    pub(super) head_index: DashMap<String, DashSet<String>>,
    pub(super) protected: HashSet<String>,
    pub(super) config: MemoryConfig,
    clock: AtomicU64,
    fresh: AtomicU64,
}

impl Memory {
    pub fn new(config: MemoryConfig) -> Self {
        let memory = Self {
            atoms: DashMap::new(),
            head_index: DashMap::new(),
            protected: PROTECTED_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            config,
            clock: AtomicU64::new(0),
            fresh: AtomicU64::new(0),
        };
        for name in PROTECTED_SYMBOLS {
            memory.add(Atom::sym(name));
        }
        memory
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Current logical tick. Advances once per maintenance cycle.
    pub fn now(&self) -> u64 {
        self.clock.load(Ordering::Acquire)
    }

    pub(super) fn advance_clock(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Suffix for renaming a stored atom's variables apart.
    pub(super) fn fresh_suffix(&self) -> u64 {
        self.fresh.fetch_add(1, Ordering::Relaxed)
    }

    pub fn is_protected(&self, atom: &Atom) -> bool {
        matches!(atom, Atom::Symbol(_)) && self.protected.contains(atom.id())
    }

    /// Intern `atom`, returning the single canonical instance for its identity.
    ///
    /// First insertion creates default metadata (unknown truth, initial
    /// priority). Every call, first or not, counts as an access.
    pub fn add(&self, atom: Atom) -> Atom {
        if let Some(existing) = self.touch_stored(atom.id(), self.config.access_boost) {
            return existing;
        }

        // Must run before `entry` below: it reads the same map.
        let atom = self.share_children(atom);
        let initial = Value::new(
            Priority::new(self.config.initial_sti, self.config.initial_lti),
            self.now(),
        );

        // Touched while the entry is held, so forgetting cannot detach the
        // slot between interning and the access boost.
        let slot = match self.atoms.entry(atom.id().to_owned()) {
            Entry::Occupied(existing) => {
                self.touch(existing.get(), self.config.access_boost);
                existing.get().clone()
            }
            Entry::Vacant(vacant) => {
                if let Some(head) = index_key(&atom) {
                    self.head_index
                        .entry(head.to_owned())
                        .or_default()
                        .insert(atom.id().to_owned());
                }
                let slot = Slot {
                    atom,
                    value: Arc::new(Mutex::new(initial)),
                };
                self.touch(&slot, self.config.access_boost);
                vacant.insert(slot.clone());
                debug!(atom = %slot.atom, "interned");
                slot
            }
        };
        slot.atom
    }

    /// Intern `atom` and fold `truth` into its evidence.
    pub fn assert(&self, atom: Atom, truth: Truth) -> Atom {
        let atom = self.add(atom);
        self.update_value(&atom, |value| value.truth = value.truth.merge(&truth));
        atom
    }

    /// Look up by identity. A successful read counts as an access.
    pub fn get(&self, id: &str) -> Option<Atom> {
        self.touch_stored(id, self.config.access_boost)
    }

    /// [`get`](Self::get) by an atom's structural identity.
    pub fn get_atom(&self, atom: &Atom) -> Option<Atom> {
        self.get(atom.id())
    }

    /// Presence check without the access side effect.
    pub fn contains(&self, id: &str) -> bool {
        self.atoms.contains_key(id)
    }

    /// Snapshot of the metadata of a stored atom.
    pub fn value(&self, atom: &Atom) -> Option<Value> {
        let slot = self.slot(atom.id())?;
        let value = *slot.value.lock();
        Some(value)
    }

    /// Atomic read-modify-write of an atom's metadata.
    ///
    /// The access tick is stamped afterwards, and a truth change that raises
    /// confidence by more than `revision_epsilon` earns an extra boost
    /// proportional to the gain. `update` runs under the atom's lock and must
    /// not call back into the store.
    pub fn update_value(&self, atom: &Atom, update: impl FnOnce(&mut Value)) -> Option<Value> {
        let slot = self.slot(atom.id())?;
        let mut value = slot.value.lock();
        let before = value.truth.confidence();
        update(&mut value);
        value.last_access = self.now();
        let gain = value.truth.confidence() - before;
        if gain > self.config.revision_epsilon {
            value
                .priority
                .boost(gain * self.config.revision_boost, self.config.lti_learning_rate);
        }
        Some(*value)
    }

    /// Raise an atom's short-term priority. Returns `false` if it is not stored.
    pub fn boost(&self, atom: &Atom, amount: f64) -> bool {
        self.touch_stored(atom.id(), amount).is_some()
    }

    /// Explicitly remove an atom. Protected symbols are refused.
    pub fn remove(&self, atom: &Atom) -> bool {
        if self.is_protected(atom) {
            warn!(atom = %atom, "refusing to remove protected symbol");
            return false;
        }
        self.remove_where(atom.id(), |_| true)
    }

    /// Every stored atom with a copy of its metadata.
    pub fn snapshot(&self) -> Vec<(Atom, Value)> {
        self.slots()
            .into_iter()
            .map(|(_, slot)| {
                let value = *slot.value.lock();
                (slot.atom, value)
            })
            .collect()
    }

    pub(super) fn slot(&self, id: &str) -> Option<Slot> {
        self.atoms.get(id).map(|entry| entry.value().clone())
    }

    pub(super) fn slots(&self) -> Vec<(String, Slot)> {
        self.atoms
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Boost a stored atom under the table read guard. Removal needs the
    /// shard write lock, so the boost always lands on a live slot.
    fn touch_stored(&self, id: &str, amount: f64) -> Option<Atom> {
        let entry = self.atoms.get(id)?;
        self.touch(entry.value(), amount);
        Some(entry.value().atom.clone())
    }

    pub(super) fn touch(&self, slot: &Slot, amount: f64) {
        let mut value = slot.value.lock();
        value.priority.boost(amount, self.config.lti_learning_rate);
        value.last_access = self.now();
    }

    /// Remove `id` if `approve` accepts the current slot. The index entry goes
    /// first, while the table shard is still held, so a concurrent reader
    /// either sees the whole atom or nothing.
    pub(super) fn remove_where(&self, id: &str, approve: impl FnOnce(&Slot) -> bool) -> bool {
        match self.atoms.entry(id.to_owned()) {
            Entry::Occupied(occupied) => {
                if !approve(occupied.get()) {
                    return false;
                }
                if let Some(head) = index_key(&occupied.get().atom) {
                    self.unindex(head, id);
                }
                occupied.remove();
                true
            }
            Entry::Vacant(_) => false,
        }
    }

    fn unindex(&self, head: &str, id: &str) {
        if let Some(bucket) = self.head_index.get(head) {
            bucket.remove(id);
        }
        self.head_index.remove_if(head, |_, bucket| bucket.is_empty());
    }

    /// Replace children with their stored canonical instances so stored
    /// expressions share structure.
    fn share_children(&self, atom: Atom) -> Atom {
        let Atom::Expression(expr) = &atom else {
            return atom;
        };
        let mut changed = false;
        let children: Vec<Atom> = expr
            .children()
            .iter()
            .map(|child| match self.atoms.get(child.id()) {
                Some(stored) if !Atom::ptr_eq(&stored.atom, child) && stored.atom == *child => {
                    changed = true;
                    stored.atom.clone()
                }
                _ => child.clone(),
            })
            .collect();
        if changed {
            Atom::expr(children)
        } else {
            atom
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}

/// Head-index key of a stored atom; only expressions are indexed.
pub(super) fn index_key(atom: &Atom) -> Option<&str> {
    let expr = atom.as_expression()?;
    match expr.head() {
        Some(head) if !head.is_variable() => Some(head.id()),
        _ => Some(WILDCARD_HEAD),
    }
}
