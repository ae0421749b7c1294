//! Configuration for the step counter, trainer, tester and evaluator.

use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::PolicyType;

/// Training horizon and cadence of the global step counter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CounterConfig {
    /// Total number of environment steps to train for.
    pub total_step: u64,
    /// Steps between two evaluation passes.
    pub test_interval: u64,
    /// Steps between two training log lines.
    pub log_interval: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            total_step: 1_000_000,
            test_interval: 20_000,
            log_interval: 1_000,
        }
    }
}

/// Configuration of the interleaved train/test loop.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrainerConfig {
    /// Run evaluation passes when the counter's test cadence fires.
    pub run_test: bool,
    /// Directory receiving `train_reward.csv`.
    pub output_path: PathBuf,
    /// Seed for action sampling; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            run_test: false,
            output_path: PathBuf::from("data"),
            seed: None,
        }
    }
}

/// Configuration of the standalone online/offline tester.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TesterConfig {
    pub output_path: PathBuf,
    /// Delay between two polls of the counter in online testing.
    pub poll_interval: Duration,
    /// Pause after terminating a test episode before reading trip info.
    pub settle_delay: Duration,
    pub seed: Option<u64>,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("data"),
            poll_interval: Duration::from_secs(30),
            settle_delay: Duration::from_secs(2),
            seed: None,
        }
    }
}

/// Configuration of the deployment evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvaluatorConfig {
    pub output_path: PathBuf,
    /// Render the simulation while evaluating.
    pub demo: bool,
    pub policy_type: PolicyType,
    pub settle_delay: Duration,
    pub seed: Option<u64>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("data"),
            demo: false,
            policy_type: PolicyType::Default,
            settle_delay: Duration::from_secs(2),
            seed: None,
        }
    }
}
