//! Greedy max-pressure baseline.
//!
//! Each agent observes one pressure score per signal phase (e.g. queued
//! vehicles served by that phase) and switches to the phase with the
//! highest score.

use super::trait_::{ActionMode, ActionOutput, ModelError, Policy};
use crate::sampling::argmax;
use crate::summary::SummarySink;
use crate::training::Transition;
use crate::types::{Action, Distributions, Values};

/// Per-agent phase scores: `obs[agent][phase]`.
pub type PhaseScores = Vec<Vec<f64>>;

/// Heuristic controller picking the highest-pressure phase of every agent.
///
/// With [`ActionMode::Stochastic`] the scores (clamped at zero) are returned
/// as sampling weights, falling back to uniform when all are zero.
pub struct GreedyPolicy {
    n_step: usize,
}

impl GreedyPolicy {
    pub fn new(n_step: usize) -> Self {
        Self { n_step }
    }

    fn weights(scores: &[f64]) -> Vec<f64> {
        let clamped: Vec<f64> = scores.iter().map(|s| s.max(0.0)).collect();
        if clamped.iter().sum::<f64>() > 0.0 {
            clamped
        } else {
            vec![1.0; scores.len()]
        }
    }
}

impl Policy for GreedyPolicy {
    type Obs = PhaseScores;

    fn n_step(&self) -> usize {
        self.n_step
    }

    fn forward_action(
        &mut self,
        ob: &PhaseScores,
        _mode: ActionMode,
    ) -> Result<ActionOutput, ModelError> {
        let mut actions = Vec::with_capacity(ob.len());
        for scores in ob {
            let best = argmax(scores)
                .ok_or_else(|| ModelError::Message("agent observed no phases".into()))?;
            actions.push(best);
        }
        let weights = ob.iter().map(|s| Self::weights(s)).collect();
        Ok(ActionOutput {
            action: Action::PerAgent(actions),
            policy: Distributions::PerAgent(weights),
        })
    }

    fn add_transition(&mut self, _transition: Transition<PhaseScores>) -> Result<(), ModelError> {
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
