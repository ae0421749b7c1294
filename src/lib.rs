//! rl_driver - training and evaluation loops for reinforcement-learning
//! agents in simulated environments.
//!
//! The crate sequences calls between an environment ([`SimEnv`]), a model
//! ([`Policy`]) and a global step counter ([`StepCounter`]): multi-step
//! rollout collection, return bootstrapping, periodic evaluation and the
//! reward table written at the end of a run. The learning algorithms and the
//! simulator live behind those traits.

pub mod config;
pub mod coord;
pub mod counter;
pub mod environment;
pub mod error;
pub mod evaluation;
pub mod policy;
pub mod record;
pub mod rollout;
pub mod sampling;
pub mod session;
pub mod stats;
pub mod summary;
pub mod tester;
pub mod trainer;
pub mod training;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{CounterConfig, EvaluatorConfig, TesterConfig, TrainerConfig};
pub use coord::StopSignal;
pub use counter::{GlobalCounter, StepCounter};
pub use environment::{EnvError, ResetOptions, SimEnv, StepResult};
pub use error::TrainerError;
pub use policy::{ActionMode, ActionOutput, ModelError, Policy};
pub use record::{RewardLog, RewardRecord};
pub use rollout::Segment;
pub use session::Session;
pub use stats::RewardStats;
pub use summary::{MemorySummary, SummarySink, TracingSummary};
pub use tester::{Evaluator, Tester};
pub use trainer::Trainer;
pub use types::{Action, AgentKind, Distributions, Mode, PolicyType, ValueShape, Values};

/// Identifier attached to a training run's log span.
pub type RunId = String;

/// Generates a new unique run identifier (UUID v4).
pub fn generate_run_id() -> RunId {
    uuid::Uuid::new_v4().to_string()
}
