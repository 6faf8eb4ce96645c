//! Perceive / decide / act / learn loop over the shared atomspace.
//!
//! Everything the agent knows lives in [`Memory`]: percepts become facts,
//! transitions become `(Implies (Seq prev action) next)` atoms and learned
//! utilities become `(= (Utility action) value)` rules, so programs and
//! queries see the same knowledge the agent acts on.
//!
//! The only randomness is action selection, drawn from an injected [`Rng`].

pub mod chain;
pub mod environment;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::atom::Atom;
use crate::config::AgentConfig;
use crate::interp::Interpreter;
use crate::memory::store::Memory;
use crate::memory::types::Truth;
pub use chain::ChainWorld;
pub use environment::Environment;

const UTILITY_VAR: &str = "$__utility";

/// Where the agent is inside its current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgentPhase {
    Idle,
    Perceiving,
    Deciding,
    Acting,
    Learning,
}

/// What one cycle did.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// No action was available.
    Idle { state: Atom },
    Acted {
        state: Atom,
        action: Atom,
        next_state: Atom,
        reward: f64,
        /// Utility of `action` after learning.
        utility: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    GoalReached,
    EnvironmentStopped,
    CycleBudget,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub cycles: usize,
    pub idle_cycles: usize,
    pub total_reward: f64,
    pub stop: StopReason,
}

pub struct Agent<R = StdRng> {
    interp: Arc<Interpreter>,
    config: AgentConfig,
    rng: R,
    phase: AgentPhase,
}

impl Agent<StdRng> {
    /// Agent with an entropy-seeded generator.
    pub fn new(interp: Arc<Interpreter>, config: AgentConfig) -> Self {
        Self::with_rng(interp, config, StdRng::from_entropy())
    }

    /// Agent with a reproducible generator.
    pub fn seeded(interp: Arc<Interpreter>, config: AgentConfig, seed: u64) -> Self {
        Self::with_rng(interp, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Agent<R> {
    pub fn with_rng(interp: Arc<Interpreter>, config: AgentConfig, rng: R) -> Self {
        Self {
            interp,
            config,
            rng,
            phase: AgentPhase::Idle,
        }
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn space(&self) -> &Memory {
        self.interp.space()
    }

    /// Store percepts as confident facts and fingerprint them into one
    /// state symbol, `State-<hash>`, which is asserted true and returned.
    pub fn process_perception(&mut self, percepts: &[Atom]) -> Atom {
        self.phase = AgentPhase::Perceiving;
        let truth = Truth::new(1.0, self.config.perception_count);
        let mut ids = Vec::with_capacity(percepts.len());
        for percept in percepts {
            let stored = self.space().assert(percept.clone(), truth);
            self.space().boost(&stored, self.config.perception_boost);
            ids.push(stored.id().to_owned());
        }
        ids.sort();
        ids.dedup();

        let digest = blake3::hash(ids.join("\n").as_bytes()).to_hex();
        let state = Atom::sym(format!("State-{}", &digest.as_str()[..16]));
        self.space().assert(state, truth)
    }

    /// Learned utility of `action`: the largest value among its
    /// `(= (Utility action) v)` rules. Non-numeric values are evaluated first.
    pub fn utility(&self, action: &Atom) -> Option<f64> {
        self.utility_rules(action)
            .into_iter()
            .map(|(_, value)| value)
            .max_by(f64::total_cmp)
    }

    /// Pick an action: random with probability `exploration`, otherwise the
    /// highest utility above `utility_threshold`, falling back to random when
    /// nothing clears the threshold. Ties at the top are broken at random.
    pub fn select_action(&mut self, actions: &[Atom]) -> Option<Atom> {
        self.phase = AgentPhase::Deciding;
        if actions.is_empty() {
            return None;
        }
        if self.rng.gen::<f64>() < self.config.exploration {
            let pick = self.rng.gen_range(0..actions.len());
            debug!(action = %actions[pick], "exploring");
            return Some(actions[pick].clone());
        }

        let ranked: Vec<(usize, f64)> = actions
            .iter()
            .enumerate()
            .filter_map(|(i, action)| Some((i, self.utility(action)?)))
            .filter(|(_, u)| *u > self.config.utility_threshold)
            .collect();
        let best = ranked.iter().map(|(_, u)| *u).max_by(f64::total_cmp);
        let tied: Vec<usize> = ranked
            .iter()
            .filter(|(_, u)| Some(*u) == best)
            .map(|(i, _)| *i)
            .collect();

        let pick = match tied.as_slice() {
            [] => self.rng.gen_range(0..actions.len()),
            [only] => *only,
            _ => {
                debug!(tied = tied.len(), "breaking utility tie at random");
                tied[self.rng.gen_range(0..tied.len())]
            }
        };
        Some(actions[pick].clone())
    }

    /// Reinforce the observed transition and move the action's utility a
    /// step towards `reward`. Returns the new utility.
    pub fn learn(&mut self, prev: &Atom, action: &Atom, next: &Atom, reward: f64) -> f64 {
        self.phase = AgentPhase::Learning;
        let space = self.interp.space();

        let transition = Atom::expr(vec![
            Atom::sym("Implies"),
            Atom::expr(vec![Atom::sym("Seq"), prev.clone(), action.clone()]),
            next.clone(),
        ]);
        space.assert(transition, Truth::observed(1.0));

        let key = utility_key(action);
        let rules = self.utility_rules(action);
        let best = rules
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(rule, value)| {
                let count = space.value(rule).map_or(0.0, |v| v.truth.count());
                (*value, count)
            });
        let (old, count) = best.unwrap_or((0.0, 0.0));
        let new = old + self.config.learning_rate * (reward - old);

        // Only rules for exactly this action are stale; general ones stay.
        for (rule, _) in &rules {
            if rule.as_expression().and_then(|e| e.children().get(1)) == Some(&key) {
                space.remove(rule);
            }
        }
        let rule = Atom::expr(vec![Atom::sym("="), key, Atom::float(new)]);
        let rule = space.assert(rule, Truth::new(1.0, count + 1.0));
        space.boost(&rule, self.config.reward_boost);

        debug!(action = %action, old, new, reward, "utility updated");
        new
    }

    /// One full cycle against `env`.
    pub fn step<E: Environment + ?Sized>(&mut self, env: &mut E) -> CycleOutcome {
        let percepts = env.perceive();
        let state = self.process_perception(&percepts);
        let actions = env.available_actions(&state);
        let Some(action) = self.select_action(&actions) else {
            self.phase = AgentPhase::Idle;
            return CycleOutcome::Idle { state };
        };

        self.phase = AgentPhase::Acting;
        let (next_percepts, reward) = env.execute(&action);
        let next_state = self.process_perception(&next_percepts);
        let utility = self.learn(&state, &action, &next_state, reward);
        self.phase = AgentPhase::Idle;
        CycleOutcome::Acted {
            state,
            action,
            next_state,
            reward,
            utility,
        }
    }

    /// Cycle until `goal` matches something in the space, the environment
    /// stops, or `max_cycles` cycles have run.
    pub fn run<E: Environment + ?Sized>(
        &mut self,
        env: &mut E,
        goal: Option<&Atom>,
        max_cycles: usize,
    ) -> RunSummary {
        let mut summary = RunSummary {
            cycles: 0,
            idle_cycles: 0,
            total_reward: 0.0,
            stop: StopReason::CycleBudget,
        };
        loop {
            if goal.is_some_and(|g| !self.space().query(g).is_empty()) {
                summary.stop = StopReason::GoalReached;
                break;
            }
            if !env.is_running() {
                summary.stop = StopReason::EnvironmentStopped;
                break;
            }
            if summary.cycles >= max_cycles {
                break;
            }
            summary.cycles += 1;
            match self.step(env) {
                CycleOutcome::Idle { .. } => summary.idle_cycles += 1,
                CycleOutcome::Acted { reward, .. } => summary.total_reward += reward,
            }
        }
        info!(
            cycles = summary.cycles,
            reward = summary.total_reward,
            stop = ?summary.stop,
            "agent run finished"
        );
        summary
    }

    /// `(rule, value)` for every utility rule matching `action`.
    fn utility_rules(&self, action: &Atom) -> Vec<(Atom, f64)> {
        let pattern = Atom::expr(vec![
            Atom::sym("="),
            utility_key(action),
            Atom::var(UTILITY_VAR),
        ]);
        self.space()
            .query(&pattern)
            .into_iter()
            .filter_map(|m| {
                let value = m.bindings.resolve(UTILITY_VAR)?;
                let number = value.as_number().or_else(|| {
                    self.interp
                        .evaluate(&value)
                        .iter()
                        .find_map(Atom::as_number)
                })?;
                Some((m.atom, number))
            })
            .collect()
    }
}

fn utility_key(action: &Atom) -> Atom {
    Atom::expr(vec![Atom::sym("Utility"), action.clone()])
}
