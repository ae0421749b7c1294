//! Model interface driven by the rollout and evaluation engines.

use std::fmt::Debug;

use thiserror::Error;

use crate::summary::SummarySink;
use crate::training::Transition;
use crate::types::{Action, Distributions, Values};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model does not support {0}")]
    Unsupported(&'static str),

    #[error("Model error: {0}")]
    Source(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("Model error: {0}")]
    Message(String),
}

/// How a value-based or heuristic model should pick its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMode {
    /// Exploration during training (e.g. epsilon-greedy).
    Explore,
    /// Best action under the current estimates.
    Greedy,
    /// Return a sampling distribution; the engine draws the action.
    Stochastic,
}

/// Output of [`Policy::forward_action`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutput {
    /// Action chosen by the model.
    pub action: Action,
    /// Auxiliary policy or Q values. With [`ActionMode::Stochastic`] these
    /// must be non-negative sampling weights, one set per agent.
    pub policy: Distributions,
}

/// A learning agent: forward passes, experience buffering and updates.
///
/// Actor-critic models implement the `forward_actor_critic`,
/// `forward_policy` and `forward_value` passes; value-based and heuristic
/// models implement `forward_action`. The passes a family does not use keep
/// their default, which reports [`ModelError::Unsupported`].
pub trait Policy {
    type Obs: Clone + Debug;

    /// Maximum number of transitions in one rollout segment.
    fn n_step(&self) -> usize;

    /// Number of independently controlled agents.
    fn n_agent(&self) -> usize {
        1
    }

    /// Policy distributions and value estimates for `ob`. `done` is the
    /// pre-decision flag that clears recurrent state.
    fn forward_actor_critic(
        &mut self,
        _ob: &Self::Obs,
        _done: bool,
    ) -> Result<(Distributions, Values), ModelError> {
        Err(ModelError::Unsupported("forward_actor_critic"))
    }

    /// Policy distributions only.
    fn forward_policy(
        &mut self,
        _ob: &Self::Obs,
        _done: bool,
    ) -> Result<Distributions, ModelError> {
        Err(ModelError::Unsupported("forward_policy"))
    }

    /// Value estimate only; used to bootstrap the return of a segment.
    fn forward_value(&mut self, _ob: &Self::Obs, _done: bool) -> Result<Values, ModelError> {
        Err(ModelError::Unsupported("forward_value"))
    }

    fn forward_action(
        &mut self,
        _ob: &Self::Obs,
        _mode: ActionMode,
    ) -> Result<ActionOutput, ModelError> {
        Err(ModelError::Unsupported("forward_action"))
    }

    fn add_transition(&mut self, transition: Transition<Self::Obs>) -> Result<(), ModelError>;

    /// Learning update over the buffered transitions. Actor-critic models
    /// receive the segment's bootstrap return; value-based models get `None`.
    fn backward(
        &mut self,
        bootstrap: Option<&Values>,
        summary: &mut dyn SummarySink,
        global_step: u64,
    ) -> Result<(), ModelError>;

    /// Clears recurrent state before a new episode.
    fn reset(&mut self) -> Result<(), ModelError>;
}
