//! Simulator interface driven by the trainer.
//!
//! The simulator itself (traffic physics, demand generation, trip-info
//! collection) lives outside this crate; the driver only sequences calls
//! through [`SimEnv`].

use std::fmt::Debug;
use std::path::Path;

use thiserror::Error;

use crate::types::{Action, AgentKind, Distributions, Mode};

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Environment error: {0}")]
    Source(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("Environment error: {0}")]
    Message(String),
}

/// Result of a single environment step.
#[derive(Debug, Clone)]
pub struct StepResult<O> {
    /// Observation after the step.
    pub next_ob: O,
    /// Per-entity reward (one element for single-agent control).
    pub reward: Vec<f64>,
    /// Whether the episode is over.
    pub done: bool,
    /// Scalar team-level reward.
    pub global_reward: f64,
}

/// Options for [`SimEnv::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetOptions {
    /// Launch the simulator with rendering enabled.
    pub gui: bool,
    /// Test scenario to load; `None` draws a training scenario.
    pub test_ind: Option<usize>,
}

impl ResetOptions {
    /// Reset into a specific test scenario.
    pub fn test(test_ind: usize, gui: bool) -> Self {
        Self {
            gui,
            test_ind: Some(test_ind),
        }
    }
}

/// A stateful simulator the agents act in.
///
/// # Lifecycle
///
/// 1. [`SimEnv::set_mode`] selects training or testing behavior.
/// 2. [`SimEnv::reset`] starts an episode and returns the first observation.
/// 3. [`SimEnv::step`] is called until it reports `done`.
/// 4. [`SimEnv::terminate`] closes the episode's simulator instance.
pub trait SimEnv {
    type Obs: Clone + Debug;

    fn reset(&mut self, options: ResetOptions) -> Result<Self::Obs, EnvError>;

    fn step(&mut self, action: &Action) -> Result<StepResult<Self::Obs>, EnvError>;

    fn terminate(&mut self) -> Result<(), EnvError>;

    /// Publishes the latest per-agent policies to neighbouring agents'
    /// observations. Must be called before [`SimEnv::step`].
    fn update_fingerprint(&mut self, policy: &Distributions) -> Result<(), EnvError>;

    fn set_mode(&mut self, mode: Mode);

    fn mode(&self) -> Mode;

    /// Number of fixed test scenarios.
    fn test_num(&self) -> usize;

    /// Family of the agent controlling this environment.
    fn agent(&self) -> AgentKind;

    /// Total number of control steps in one episode.
    fn episode_length(&self) -> usize;

    /// Restarts episode numbering used for measurement file names.
    fn reset_episode_count(&mut self) {}

    /// Enables traffic measurement output under `output_path`.
    fn init_data(
        &mut self,
        _is_record: bool,
        _record_stats: bool,
        _output_path: &Path,
    ) -> Result<(), EnvError> {
        Ok(())
    }

    /// Collects per-trip statistics of the episode that just terminated.
    fn collect_tripinfo(&mut self) -> Result<(), EnvError> {
        Ok(())
    }

    /// Writes all collected measurements.
    fn output_data(&mut self) -> Result<(), EnvError> {
        Ok(())
    }
}
