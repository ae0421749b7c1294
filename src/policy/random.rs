//! Random policy for smoke tests and baselines.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::trait_::{ActionMode, ActionOutput, ModelError, Policy};
use crate::summary::SummarySink;
use crate::training::Transition;
use crate::types::{Action, Distributions, Values};

/// Uniformly random action selection for every agent.
///
/// Behaves as a value-based agent that never learns: transitions are
/// counted and dropped, `backward` is a no-op.
pub struct RandomPolicy<O> {
    action_dim: usize,
    n_agent: usize,
    n_step: usize,
    rng: StdRng,
    transitions_seen: usize,
    _obs: std::marker::PhantomData<fn(&O)>,
}

impl<O> RandomPolicy<O> {
    /// # Arguments
    ///
    /// * `action_dim` - Number of discrete actions per agent
    /// * `n_agent` - Number of agents; 1 produces [`Action::Single`]
    /// * `n_step` - Rollout segment length
    /// * `seed` - RNG seed
    pub fn new(action_dim: usize, n_agent: usize, n_step: usize, seed: u64) -> Self {
        Self {
            action_dim,
            n_agent,
            n_step,
            rng: StdRng::seed_from_u64(seed),
            transitions_seen: 0,
            _obs: std::marker::PhantomData,
        }
    }

    pub fn transitions_seen(&self) -> usize {
        self.transitions_seen
    }

    fn uniform(&self) -> Vec<f64> {
        vec![1.0 / self.action_dim as f64; self.action_dim]
    }
}

impl<O: Clone + std::fmt::Debug> Policy for RandomPolicy<O> {
    type Obs = O;

    fn n_step(&self) -> usize {
        self.n_step
    }

    fn n_agent(&self) -> usize {
        self.n_agent
    }

    fn forward_action(&mut self, _ob: &O, _mode: ActionMode) -> Result<ActionOutput, ModelError> {
        if self.action_dim == 0 {
            return Err(ModelError::Message("empty action space".into()));
        }
        if self.n_agent == 1 {
            let action = self.rng.gen_range(0..self.action_dim);
            return Ok(ActionOutput {
                action: Action::Single(action),
                policy: Distributions::Single(self.uniform()),
            });
        }
        let actions = (0..self.n_agent)
            .map(|_| self.rng.gen_range(0..self.action_dim))
            .collect();
        Ok(ActionOutput {
            action: Action::PerAgent(actions),
            policy: Distributions::PerAgent(vec![self.uniform(); self.n_agent]),
        })
    }

    fn add_transition(&mut self, _transition: Transition<O>) -> Result<(), ModelError> {
        self.transitions_seen += 1;
        Ok(())
    }

    fn backward(
        &mut self,
        _bootstrap: Option<&Values>,
        _summary: &mut dyn SummarySink,
        _global_step: u64,
    ) -> Result<(), ModelError> {
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ModelError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_policy_returns_one_action_per_agent() {
        let mut policy: RandomPolicy<()> = RandomPolicy::new(5, 4, 10, 7);
        let out = policy.forward_action(&(), ActionMode::Explore).unwrap();
        match out.action {
            Action::PerAgent(actions) => {
                assert_eq!(actions.len(), 4);
                assert!(actions.iter().all(|&a| a < 5));
            }
            other => panic!("expected per-agent action, got {:?}", other),
        }
        assert_eq!(out.policy.arity(), 4);
    }

    #[test]
    fn single_agent_uses_single_action() {
        let mut policy: RandomPolicy<()> = RandomPolicy::new(3, 1, 10, 7);
        let out = policy.forward_action(&(), ActionMode::Greedy).unwrap();
        assert!(matches!(out.action, Action::Single(a) if a < 3));
    }

    #[test]
    fn actor_critic_pass_is_unsupported() {
        let mut policy: RandomPolicy<()> = RandomPolicy::new(3, 1, 10, 7);
        let err = policy.forward_actor_critic(&(), true).unwrap_err();
        assert!(matches!(err, ModelError::Unsupported("forward_actor_critic")));
    }
}
