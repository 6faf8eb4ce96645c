use serde::Serialize;
use std::collections::BTreeMap;

use super::store::Memory;
use crate::atom::AtomKind;

/// Snapshot statistics of the atomspace.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_atoms: usize,
    pub by_kind: BTreeMap<String, usize>,
    /// `(= lhs rhs)` expressions.
    pub rules: usize,
    /// `(: atom type)` expressions.
    pub type_declarations: usize,
    pub protected: usize,
    pub mean_sti: f64,
    pub mean_lti: f64,
    pub mean_confidence: f64,
    pub clock: u64,
}

/// Compute store statistics from a point-in-time snapshot.
pub fn memory_stats(memory: &Memory) -> StatsResponse {
    let snapshot = memory.snapshot();
    let mut by_kind = BTreeMap::new();
    for kind in [
        AtomKind::Symbol,
        AtomKind::Variable,
        AtomKind::Expression,
        AtomKind::Grounded,
    ] {
        by_kind.insert(kind.to_string(), 0);
    }

    let mut rules = 0;
    let mut type_declarations = 0;
    let mut protected = 0;
    let (mut sti, mut lti, mut confidence) = (0.0, 0.0, 0.0);

    for (atom, value) in &snapshot {
        *by_kind.entry(atom.kind().to_string()).or_insert(0) += 1;
        match atom.head().and_then(|h| h.as_symbol()) {
            Some("=") => rules += 1,
            Some(":") => type_declarations += 1,
            _ => {}
        }
        if memory.is_protected(atom) {
            protected += 1;
        }
        sti += value.priority.sti;
        lti += value.priority.lti;
        confidence += value.truth.confidence();
    }

    let n = snapshot.len().max(1) as f64;
    StatsResponse {
        total_atoms: snapshot.len(),
        by_kind,
        rules,
        type_declarations,
        protected,
        mean_sti: sti / n,
        mean_lti: lti / n,
        mean_confidence: confidence / n,
        clock: memory.now(),
    }
}
