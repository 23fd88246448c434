//! Configuration parameters for the schedule optimizer.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration settings for one optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wall-clock budget per problem instance
    pub exec_duration: Duration,
    /// Divisor applied to the number of congested intersections per escalation round
    pub escalation_divisor: usize,
    /// Escalation rounds without a new best score before giving up
    pub stagnation_rounds: u32,
    /// Requested cap on the phase positions the sweeps may edit
    pub max_pos: usize,
    /// Largest step tried by the duration sweeps (steps run 1..=max_delta)
    pub max_delta: i32,
    /// Optional early exit for the hill climb after this many passes without improvement
    pub max_rounds_without_improvement: Option<u32>,
    /// Skip the congestion-guided duration escalator
    pub skip_escalation: bool,
    /// Skip the dead-weight pruner
    pub skip_pruning: bool,
    /// Seed phase durations from street usage before escalation
    pub seed_by_usage: bool,
    /// Run the green-light-wait escalator after the congestion escalator
    pub green_wait_escalation: bool,
    /// Pick the escalation divisor by trying every value in `1..=max` first
    pub tune_divisor: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            exec_duration: Duration::from_secs(300),
            escalation_divisor: 50,
            stagnation_rounds: 10,
            max_pos: usize::MAX,
            max_delta: 3,
            max_rounds_without_improvement: None,
            skip_escalation: false,
            skip_pruning: false,
            seed_by_usage: false,
            green_wait_escalation: false,
            tune_divisor: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the optimizer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.escalation_divisor == 0 {
            return Err(Error::invalid_config("escalation_divisor must be positive"));
        }
        if self.max_delta < 0 {
            return Err(Error::invalid_config("max_delta must not be negative"));
        }
        if self.max_pos == 0 {
            return Err(Error::invalid_config("max_pos must be positive"));
        }
        if self.tune_divisor == Some(0) {
            return Err(Error::invalid_config("tune_divisor must be positive"));
        }
        Ok(())
    }

    /// Set the per-instance wall-clock budget.
    pub fn with_exec_duration(mut self, duration: Duration) -> Self {
        self.exec_duration = duration;
        self
    }

    /// Set the escalation divisor.
    pub fn with_escalation_divisor(mut self, divisor: usize) -> Self {
        self.escalation_divisor = divisor;
        self
    }

    /// Set the escalation stagnation budget.
    pub fn with_stagnation_rounds(mut self, rounds: u32) -> Self {
        self.stagnation_rounds = rounds;
        self
    }

    /// Set the requested sweep window cap.
    pub fn with_max_pos(mut self, max_pos: usize) -> Self {
        self.max_pos = max_pos;
        self
    }

    /// Set the largest duration step.
    pub fn with_max_delta(mut self, max_delta: i32) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Stop the hill climb after this many passes without improvement.
    pub fn with_max_rounds_without_improvement(mut self, rounds: u32) -> Self {
        self.max_rounds_without_improvement = Some(rounds);
        self
    }

    /// Enable or disable the duration escalator.
    pub fn with_skip_escalation(mut self, skip: bool) -> Self {
        self.skip_escalation = skip;
        self
    }

    /// Enable or disable the pruner.
    pub fn with_skip_pruning(mut self, skip: bool) -> Self {
        self.skip_pruning = skip;
        self
    }

    /// Enable or disable usage-proportional duration seeding.
    pub fn with_seed_by_usage(mut self, enabled: bool) -> Self {
        self.seed_by_usage = enabled;
        self
    }

    /// Enable or disable the green-light-wait escalator.
    pub fn with_green_wait_escalation(mut self, enabled: bool) -> Self {
        self.green_wait_escalation = enabled;
        self
    }

    /// Tune the escalation divisor over `1..=max_divisor` before escalating.
    pub fn with_tune_divisor(mut self, max_divisor: usize) -> Self {
        self.tune_divisor = Some(max_divisor);
        self
    }
}
