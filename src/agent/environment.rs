use crate::atom::Atom;

/// The world an [`Agent`](super::Agent) acts in.
///
/// The agent makes no assumption about what percepts or actions mean
/// beyond their being atoms.
pub trait Environment {
    /// Current observations.
    fn perceive(&mut self) -> Vec<Atom>;

    /// Actions available in `state` (the agent's fingerprint symbol).
    fn available_actions(&mut self, state: &Atom) -> Vec<Atom>;

    /// Perform `action`, returning the new percepts and the reward.
    fn execute(&mut self, action: &Atom) -> (Vec<Atom>, f64);

    /// False once the episode is over.
    fn is_running(&self) -> bool;
}
