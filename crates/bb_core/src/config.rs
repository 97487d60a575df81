//! Aggregation run configuration.
//!
//! Loaded from JSON, optionally via the `BB_SIM_CONFIG_PATH` environment
//! variable. Unknown fields are rejected so typos don't silently fall back
//! to defaults.

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

use crate::error::{Result, SimError};

pub const SIM_CONFIG_PATH_ENV: &str = "BB_SIM_CONFIG_PATH";

pub const DEFAULT_N_TRIALS: usize = 100_000;
pub const DEFAULT_BATCH_SIZE: usize = 10_000;
pub const DEFAULT_MAX_TRIALS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Trials per run. With early stopping: minimum trials before the first
    /// convergence check.
    #[serde(default = "default_n_trials")]
    pub n_trials: usize,

    /// Base seed. `None` draws one from OS entropy per run.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Run trials on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Trials per batch when early stopping.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Stop once the home-win standard error drops to this value.
    #[serde(default)]
    pub target_std_error: Option<f64>,

    /// Hard cap for early stopping.
    #[serde(default = "default_max_trials")]
    pub max_trials: usize,
}

fn default_n_trials() -> usize {
    DEFAULT_N_TRIALS
}

fn default_parallel() -> bool {
    true
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_max_trials() -> usize {
    DEFAULT_MAX_TRIALS
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            n_trials: DEFAULT_N_TRIALS,
            seed: None,
            parallel: true,
            batch_size: DEFAULT_BATCH_SIZE,
            target_std_error: None,
            max_trials: DEFAULT_MAX_TRIALS,
        }
    }
}

impl SimConfig {
    pub fn with_trials(mut self, n_trials: usize) -> Self {
        self.n_trials = n_trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_early_stopping(mut self, target_std_error: f64, batch_size: usize, max_trials: usize) -> Self {
        self.target_std_error = Some(target_std_error);
        self.batch_size = batch_size;
        self.max_trials = max_trials;
        self
    }

    /// Parses and validates.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Config named by `BB_SIM_CONFIG_PATH`, or the defaults when the
    /// variable is unset or blank.
    pub fn from_env_or_default() -> Result<Self> {
        let Ok(path) = env::var(SIM_CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        Self::from_file(path).map_err(|e| match e {
            SimError::InvalidConfig(msg) => {
                SimError::InvalidConfig(format!("{SIM_CONFIG_PATH_ENV}='{path}': {msg}"))
            }
            other => other,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_trials == 0 {
            return Err(SimError::InvalidConfig("n_trials must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(SimError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if let Some(target) = self.target_std_error {
            // p(1-p)/n is at most 0.25/n, so the std error never exceeds 0.5
            if !(target > 0.0 && target < 0.5) {
                return Err(SimError::InvalidConfig(format!(
                    "target_std_error must be in (0, 0.5), got {target}"
                )));
            }
            if self.max_trials < self.n_trials {
                return Err(SimError::InvalidConfig(format!(
                    "max_trials ({}) must be >= n_trials ({})",
                    self.max_trials, self.n_trials
                )));
            }
        }
        Ok(())
    }

    pub fn early_stopping(&self) -> bool {
        self.target_std_error.is_some()
    }
}
