//! Pattern queries over the atomspace.
//!
//! Candidate generation uses the head index when the pattern is an
//! expression with a concrete head, and falls back to a scan of the whole
//! store otherwise. Cheap filters (confidence floor, arity) run before the
//! unifier; matches are boosted and ranked by `confidence × strength`.

use serde::Serialize;

use super::store::{Memory, WILDCARD_HEAD};
use crate::atom::Atom;
use crate::unify::{rename_variables, unify, Bindings};

/// One successful match.
#[derive(Debug, Clone)]
pub struct QueryMatch {
    /// The stored atom that matched.
    pub atom: Atom,
    /// Bindings for the pattern's variables.
    pub bindings: Bindings,
    /// `confidence × strength` of the matched atom at match time.
    pub score: f64,
}

/// Serializable view of a match for CLI output.
#[derive(Debug, Serialize)]
pub struct QueryMatchView {
    pub atom: String,
    pub bindings: Vec<(String, String)>,
    pub score: f64,
}

impl QueryMatch {
    /// Render the match with its bindings resolved and sorted by variable name.
    pub fn view(&self) -> QueryMatchView {
        let mut bindings: Vec<(String, String)> = self
            .bindings
            .iter()
            .filter(|(var, _)| !var.contains('#'))
            .filter_map(|(var, _)| {
                let value = self.bindings.resolve(var)?;
                Some((var.to_string(), value.to_string()))
            })
            .collect();
        bindings.sort();
        QueryMatchView {
            atom: self.atom.to_string(),
            bindings,
            score: self.score,
        }
    }
}

impl Memory {
    /// Find every stored atom that unifies with `pattern`.
    ///
    /// Stored atoms containing variables are renamed apart first, so their
    /// variables never capture the pattern's. At most `max_candidates`
    /// candidates are examined and at most `max_results` matches returned.
    pub fn query(&self, pattern: &Atom) -> Vec<QueryMatch> {
        let arity = pattern.as_expression().map(|expr| expr.len());
        let mut matches = Vec::new();

        for id in self
            .candidate_ids(pattern)
            .iter()
            .take(self.config.max_candidates)
        {
            // Removed since the candidate list was taken.
            let Some(slot) = self.slot(id) else {
                continue;
            };
            let truth = slot.value.lock().truth;
            if truth.confidence() < self.config.min_confidence {
                continue;
            }
            if let Some(arity) = arity {
                match slot.atom.as_expression() {
                    Some(expr) if expr.len() == arity => {}
                    _ => continue,
                }
            }

            let candidate = if slot.atom.has_variables() {
                rename_variables(&slot.atom, self.fresh_suffix())
            } else {
                slot.atom.clone()
            };
            if let Some(bindings) = unify(pattern, &candidate, &Bindings::new()) {
                self.touch(&slot, self.config.access_boost);
                matches.push(QueryMatch {
                    atom: slot.atom.clone(),
                    bindings,
                    score: truth.score(),
                });
            }
        }

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(self.config.max_results);
        matches
    }

    /// Identities worth unifying against `pattern`.
    fn candidate_ids(&self, pattern: &Atom) -> Vec<String> {
        match pattern {
            Atom::Expression(expr) => match expr.head() {
                Some(head) if !head.is_variable() => {
                    let mut ids = self.bucket(head.id());
                    ids.extend(self.bucket(WILDCARD_HEAD));
                    ids
                }
                // Variable head: every atom is a candidate.
                _ => self.all_ids(),
            },
            Atom::Variable(_) => self.all_ids(),
            Atom::Symbol(_) | Atom::Grounded(_) => {
                if self.contains(pattern.id()) {
                    vec![pattern.id().to_owned()]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn bucket(&self, head: &str) -> Vec<String> {
        self.head_index
            .get(head)
            .map(|bucket| bucket.iter().map(|id| id.key().clone()).collect())
            .unwrap_or_default()
    }

    fn all_ids(&self) -> Vec<String> {
        self.atoms.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfig;
    use crate::memory::types::Truth;

    fn e(children: Vec<Atom>) -> Atom {
        Atom::expr(children)
    }

    #[test]
    fn query_uses_head_index_and_binds() {
        let memory = Memory::default();
        memory.add(e(vec![Atom::sym("Knows"), Atom::sym("A"), Atom::sym("X")]));
        memory.add(e(vec![Atom::sym("Likes"), Atom::sym("A"), Atom::sym("X")]));

        let pattern = e(vec![Atom::sym("Knows"), Atom::var("who"), Atom::sym("X")]);
        let results = memory.query(&pattern);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].bindings.get("who"), Some(&Atom::sym("A")));
    }

    #[test]
    fn variable_head_scans_everything() {
        let memory = Memory::default();
        memory.add(e(vec![Atom::sym("Knows"), Atom::sym("A")]));
        memory.add(e(vec![Atom::sym("Likes"), Atom::sym("B")]));
        let results = memory.query(&e(vec![Atom::var("rel"), Atom::var("x")]));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn results_ranked_by_confidence_times_strength() {
        let memory = Memory::default();
        let weak = e(vec![Atom::sym("Color"), Atom::sym("Red")]);
        let strong = e(vec![Atom::sym("Color"), Atom::sym("Blue")]);
        memory.assert(weak, Truth::new(0.5, 1.0));
        memory.assert(strong, Truth::new(1.0, 20.0));

        let results = memory.query(&e(vec![Atom::sym("Color"), Atom::var("c")]));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].bindings.get("c"), Some(&Atom::sym("Blue")));
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn confidence_floor_skips_candidates() {
        let config = MemoryConfig {
            min_confidence: 0.5,
            ..MemoryConfig::default()
        };
        let memory = Memory::new(config);
        memory.add(e(vec![Atom::sym("Rumor"), Atom::sym("A")]));
        memory.assert(e(vec![Atom::sym("Rumor"), Atom::sym("B")]), Truth::observed(5.0));

        let results = memory.query(&e(vec![Atom::sym("Rumor"), Atom::var("x")]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].bindings.get("x"), Some(&Atom::sym("B")));
    }

    #[test]
    fn stored_variables_do_not_capture_pattern_variables() {
        let memory = Memory::default();
        // (= (id $x) $x)
        memory.add(e(vec![
            Atom::sym("="),
            e(vec![Atom::sym("id"), Atom::var("x")]),
            Atom::var("x"),
        ]));
        let pattern = e(vec![
            Atom::sym("="),
            e(vec![Atom::sym("id"), Atom::sym("k")]),
            Atom::var("x"),
        ]);
        let results = memory.query(&pattern);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].bindings.resolve("x"), Some(Atom::sym("k")));
    }

    #[test]
    fn result_count_is_capped() {
        let config = MemoryConfig {
            max_results: 3,
            ..MemoryConfig::default()
        };
        let memory = Memory::new(config);
        for i in 0..10 {
            memory.add(e(vec![Atom::sym("N"), Atom::int(i)]));
        }
        assert_eq!(memory.query(&e(vec![Atom::sym("N"), Atom::var("n")])).len(), 3);
    }

    #[test]
    fn view_hides_renamed_variables() {
        let memory = Memory::default();
        memory.add(e(vec![Atom::sym("P"), Atom::var("y"), Atom::sym("b")]));
        let results = memory.query(&e(vec![Atom::sym("P"), Atom::sym("a"), Atom::var("z")]));
        let view = results[0].view();
        assert_eq!(view.bindings, vec![("$z".to_string(), "b".to_string())]);
    }
}
