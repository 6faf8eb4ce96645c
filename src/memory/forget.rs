//! Priority decay and forgetting: the atomspace's only reclamation path.
//!
//! One cycle advances the logical clock, decays every atom's priority under
//! that atom's own lock, then removes low-priority atoms lowest first. Each
//! removal re-checks the candidate under the table entry lock, so an atom
//! boosted after it was collected survives.

use serde::Serialize;
use tracing::{debug, info};

use super::store::{Memory, Slot};
use crate::atom::Atom;

/// Outcome of one decay-and-forget cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ForgetReport {
    /// Logical tick the cycle ran at.
    pub tick: u64,
    /// Atoms whose priority was decayed.
    pub decayed: usize,
    /// Atoms below `min_forget_priority` that were eligible for removal.
    pub candidates: usize,
    pub removed: usize,
    pub size_before: usize,
    pub size_after: usize,
    /// Whether either removal trigger fired.
    pub triggered: bool,
}

struct Candidate {
    id: String,
    priority: f64,
}

impl Memory {
    /// Run one maintenance cycle.
    ///
    /// Removal only starts when the store exceeds `forget_trigger_size`, or
    /// when candidates exceed `forget_candidate_fraction` of the store. It
    /// stops once the store is back at `forget_trigger_size ×
    /// forget_target_ratio` or the candidates run out, whichever trigger
    /// fired. Protected symbols and variables are never removed.
    pub fn decay_and_forget(&self) -> ForgetReport {
        let tick = self.advance_clock();
        let slots = self.slots();
        let size_before = slots.len();
        let tau = self.config.recency_tau;
        let threshold = self.config.min_forget_priority;

        let mut candidates = Vec::new();
        for (id, slot) in &slots {
            let effective = {
                let mut value = slot.value.lock();
                value.priority.decay(&self.config);
                value.effective_priority(tick, tau)
            };
            if effective < threshold && self.forgettable(&slot.atom) {
                candidates.push(Candidate {
                    id: id.clone(),
                    priority: effective,
                });
            }
        }

        let over_size = size_before > self.config.forget_trigger_size;
        let over_fraction =
            candidates.len() as f64 > self.config.forget_candidate_fraction * size_before as f64;
        let triggered = over_size || over_fraction;

        let mut removed = 0;
        if triggered {
            candidates.sort_by(|a, b| a.priority.total_cmp(&b.priority));
            let target =
                (self.config.forget_trigger_size as f64 * self.config.forget_target_ratio) as usize;
            for candidate in &candidates {
                if self.len() <= target {
                    break;
                }
                if self.remove_where(&candidate.id, |slot| self.still_forgettable(slot, tick)) {
                    removed += 1;
                }
            }
        }

        let report = ForgetReport {
            tick,
            decayed: size_before,
            candidates: candidates.len(),
            removed,
            size_before,
            size_after: self.len(),
            triggered,
        };
        if removed > 0 {
            info!(
                tick,
                removed,
                size = report.size_after,
                "forgot low-priority atoms"
            );
        } else {
            debug!(tick, candidates = report.candidates, "decay cycle");
        }
        report
    }

    fn forgettable(&self, atom: &Atom) -> bool {
        !atom.is_variable() && !self.is_protected(atom)
    }

    /// Re-evaluated under the entry lock: a concurrent boost may have lifted
    /// the atom above the threshold since it was collected.
    fn still_forgettable(&self, slot: &Slot, tick: u64) -> bool {
        let effective = slot
            .value
            .lock()
            .effective_priority(tick, self.config.recency_tau);
        effective < self.config.min_forget_priority && self.forgettable(&slot.atom)
    }
}
