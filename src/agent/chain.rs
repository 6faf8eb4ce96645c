//! A linear chain of states, `S0 → S1 → … → Sn`.
//!
//! From every state but the last the agent may `(Move Si Si+1)` or
//! `(Stay Si)`. Moving earns that link's reward; staying earns the stay
//! reward. The episode ends on reaching the last state. Percepts are
//! `(At Si)`.

use tracing::warn;

use super::environment::Environment;
use crate::atom::Atom;

#[derive(Debug, Clone)]
pub struct ChainWorld {
    states: Vec<Atom>,
    /// `rewards[i]` is paid for moving from state `i` to `i + 1`.
    rewards: Vec<f64>,
    stay_reward: f64,
    position: usize,
    steps: usize,
}

impl ChainWorld {
    /// Build a chain over `names`. Missing link rewards default to zero.
    pub fn new(names: &[&str], rewards: &[f64]) -> Self {
        let states: Vec<Atom> = names.iter().map(Atom::sym).collect();
        let links = states.len().saturating_sub(1);
        let mut rewards = rewards.to_vec();
        rewards.resize(links, 0.0);
        Self {
            states,
            rewards,
            stay_reward: 0.0,
            position: 0,
            steps: 0,
        }
    }

    /// `A → B → Goal` with rewards 0.1 and 1.0.
    pub fn three_state() -> Self {
        Self::new(&["A", "B", "Goal"], &[0.1, 1.0])
    }

    pub fn with_stay_reward(mut self, reward: f64) -> Self {
        self.stay_reward = reward;
        self
    }

    /// Back to the first state.
    pub fn reset(&mut self) {
        self.position = 0;
        self.steps = 0;
    }

    pub fn current(&self) -> Option<&Atom> {
        self.states.get(self.position)
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// `(Move from to)`.
    pub fn move_action(&self, from: usize) -> Option<Atom> {
        let to = self.states.get(from + 1)?;
        Some(Atom::expr(vec![
            Atom::sym("Move"),
            self.states[from].clone(),
            to.clone(),
        ]))
    }

    /// `(Stay at)`.
    pub fn stay_action(&self, at: usize) -> Option<Atom> {
        let state = self.states.get(at)?;
        Some(Atom::expr(vec![Atom::sym("Stay"), state.clone()]))
    }

    fn percepts(&self) -> Vec<Atom> {
        self.current()
            .map(|state| vec![Atom::expr(vec![Atom::sym("At"), state.clone()])])
            .unwrap_or_default()
    }
}

impl Environment for ChainWorld {
    fn perceive(&mut self) -> Vec<Atom> {
        self.percepts()
    }

    fn available_actions(&mut self, _state: &Atom) -> Vec<Atom> {
        if !self.is_running() {
            return Vec::new();
        }
        self.move_action(self.position)
            .into_iter()
            .chain(self.stay_action(self.position))
            .collect()
    }

    fn execute(&mut self, action: &Atom) -> (Vec<Atom>, f64) {
        self.steps += 1;
        let reward = if Some(action) == self.move_action(self.position).as_ref() {
            let reward = self.rewards[self.position];
            self.position += 1;
            reward
        } else if Some(action) == self.stay_action(self.position).as_ref() {
            self.stay_reward
        } else {
            warn!(action = %action, "action not available in chain world");
            0.0
        };
        (self.percepts(), reward)
    }

    fn is_running(&self) -> bool {
        self.position + 1 < self.states.len()
    }
}
