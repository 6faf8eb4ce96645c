//! Per-atom metadata: [`Truth`], [`Priority`] and the [`Value`] record that
//! bundles them with the last access tick.

use serde::{Deserialize, Serialize};

use crate::config::MemoryConfig;

/// Evidence count at which confidence reaches one half.
pub const TRUTH_SENSITIVITY: f64 = 1.0;

/// Probabilistic truth: a strength in `[0, 1]` backed by an evidence count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Truth {
    strength: f64,
    count: f64,
}

impl Truth {
    /// No evidence either way.
    pub const UNKNOWN: Truth = Truth {
        strength: 0.5,
        count: 0.0,
    };

    /// Create a truth value, clamping strength to `[0, 1]` and count to `>= 0`.
    pub fn new(strength: f64, count: f64) -> Self {
        let strength = if strength.is_nan() { 0.5 } else { strength.clamp(0.0, 1.0) };
        let count = if count.is_nan() { 0.0 } else { count.max(0.0) };
        Self { strength, count }
    }

    /// Fully true, backed by `count` observations.
    pub fn observed(count: f64) -> Self {
        Self::new(1.0, count)
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn count(&self) -> f64 {
        self.count
    }

    /// `count / (count + k)`.
    pub fn confidence(&self) -> f64 {
        self.count / (self.count + TRUTH_SENSITIVITY)
    }

    /// Ranking score used by queries.
    pub fn score(&self) -> f64 {
        self.confidence() * self.strength
    }

    /// Accumulate evidence: count-weighted average of strengths, counts summed.
    pub fn merge(&self, other: &Truth) -> Truth {
        let total = self.count + other.count;
        if total <= 0.0 {
            return Truth::new((self.strength + other.strength) / 2.0, 0.0);
        }
        let strength = (self.strength * self.count + other.strength * other.count) / total;
        Truth::new(strength, total)
    }
}

impl Default for Truth {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// Two-timescale attention value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Priority {
    pub sti: f64,
    pub lti: f64,
}

impl Priority {
    pub fn new(sti: f64, lti: f64) -> Self {
        Self {
            sti: sti.clamp(0.0, 1.0),
            lti: lti.clamp(0.0, 1.0),
        }
    }

    /// One maintenance step: short-term decays, part of what it loses is
    /// consolidated into long-term, which then decays slightly.
    pub fn decay(&mut self, config: &MemoryConfig) {
        let lost = self.sti * config.sti_decay.clamp(0.0, 1.0);
        self.sti -= lost;
        if self.sti < f64::EPSILON {
            self.sti = 0.0;
        }
        let lti = (self.lti + lost * config.lti_transfer) * (1.0 - config.lti_decay.clamp(0.0, 1.0));
        self.lti = lti.clamp(0.0, 1.0);
    }

    /// Raise short-term priority by `amount` (clamped to 1); long-term gains
    /// the actual short-term delta scaled by `lti_learning_rate`.
    pub fn boost(&mut self, amount: f64, lti_learning_rate: f64) {
        let before = self.sti;
        self.sti = (self.sti + amount).clamp(0.0, 1.0);
        let delta = self.sti - before;
        if delta > 0.0 {
            self.lti = (self.lti + delta * lti_learning_rate).clamp(0.0, 1.0);
        }
    }

    /// Combined priority before recency scaling.
    pub fn raw(&self) -> f64 {
        (self.sti + self.lti).min(1.0)
    }
}

/// Metadata attached to every interned atom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub truth: Truth,
    pub priority: Priority,
    /// Logical tick of the last access.
    pub last_access: u64,
}

impl Value {
    pub fn new(priority: Priority, tick: u64) -> Self {
        Self {
            truth: Truth::UNKNOWN,
            priority,
            last_access: tick,
        }
    }

    /// `exp(-age / tau)` where age is measured in maintenance ticks.
    pub fn recency(&self, now: u64, tau: f64) -> f64 {
        let age = now.saturating_sub(self.last_access) as f64;
        (-age / tau.max(f64::EPSILON)).exp()
    }

    /// Priority as seen by the forgetting pass; never written back.
    pub fn effective_priority(&self, now: u64, tau: f64) -> f64 {
        self.priority.raw() * self.recency(now, tau)
    }
}
