use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CogConfig {
    pub log: LogConfig,
    pub memory: MemoryConfig,
    pub interpreter: InterpreterConfig,
    pub agent: AgentConfig,
    pub maintenance: MaintenanceConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

/// Attention, query and forgetting parameters of the atomspace.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MemoryConfig {
    /// Short-term priority given to a freshly interned atom.
    pub initial_sti: f64,
    /// Long-term priority given to a freshly interned atom.
    pub initial_lti: f64,
    /// Short-term boost applied on every `add`, `get` and successful query match.
    pub access_boost: f64,
    /// Fraction of short-term priority lost per maintenance cycle.
    pub sti_decay: f64,
    /// Fraction of the decayed short-term amount folded into long-term priority.
    pub lti_transfer: f64,
    /// Fraction of long-term priority lost per maintenance cycle.
    pub lti_decay: f64,
    /// Long-term gain per unit of short-term boost.
    pub lti_learning_rate: f64,
    /// Boost per unit of confidence gained by a truth revision.
    pub revision_boost: f64,
    /// Minimum confidence gain that counts as a revision.
    pub revision_epsilon: f64,
    /// Candidates with lower confidence are skipped by queries.
    pub min_confidence: f64,
    pub max_candidates: usize,
    pub max_results: usize,
    /// Effective priority below which a non-protected atom may be forgotten.
    pub min_forget_priority: f64,
    /// Store size above which forgetting always runs.
    pub forget_trigger_size: usize,
    /// Forgetting stops once the store shrinks to this share of the trigger size.
    pub forget_target_ratio: f64,
    /// Forgetting also runs when candidates exceed this share of the store.
    pub forget_candidate_fraction: f64,
    /// Recency time constant, in maintenance cycles.
    pub recency_tau: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InterpreterConfig {
    pub max_depth: usize,
    pub max_results: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AgentConfig {
    /// Probability of picking a uniformly random action.
    pub exploration: f64,
    /// Step size of the utility update.
    pub learning_rate: f64,
    /// Utilities must exceed this to be exploited.
    pub utility_threshold: f64,
    /// Evidence count asserted for every percept.
    pub perception_count: f64,
    /// Short-term boost given to each percept.
    pub perception_boost: f64,
    /// Short-term boost given to freshly learned utility rules.
    pub reward_boost: f64,
    pub max_cycles: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MaintenanceConfig {
    pub enabled: bool,
    pub interval_ms: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            initial_sti: 0.1,
            initial_lti: 0.0,
            access_boost: 0.05,
            sti_decay: 0.1,
            lti_transfer: 0.2,
            lti_decay: 0.01,
            lti_learning_rate: 0.1,
            revision_boost: 0.5,
            revision_epsilon: 0.01,
            min_confidence: 0.0,
            max_candidates: 10_000,
            max_results: 1_000,
            min_forget_priority: 0.05,
            forget_trigger_size: 10_000,
            forget_target_ratio: 0.8,
            forget_candidate_fraction: 0.25,
            recency_tau: 3.0,
        }
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_results: 64,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            exploration: 0.1,
            learning_rate: 0.5,
            utility_threshold: 0.0,
            perception_count: 10.0,
            perception_boost: 0.3,
            reward_boost: 0.8,
            max_cycles: 100,
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: 1000,
        }
    }
}

/// Returns `~/.cogspace/`, or `./.cogspace/` when no home directory is known.
pub fn default_cogspace_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cogspace")
}

/// Returns the default config file path: `~/.cogspace/config.toml`
pub fn default_config_path() -> PathBuf {
    default_cogspace_dir().join("config.toml")
}

impl CogConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            CogConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (COGSPACE_LOG_LEVEL, COGSPACE_MAX_DEPTH, COGSPACE_FORGET_TRIGGER).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("COGSPACE_LOG_LEVEL") {
            self.log.level = val;
        }
        if let Some(depth) = env_number("COGSPACE_MAX_DEPTH") {
            self.interpreter.max_depth = depth;
        }
        if let Some(trigger) = env_number("COGSPACE_FORGET_TRIGGER") {
            self.memory.forget_trigger_size = trigger;
        }
    }
}

fn env_number(key: &str) -> Option<usize> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring non-numeric override");
            None
        }
    }
}
