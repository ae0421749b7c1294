//! Experience passed from the rollout engine to the model, and an on-policy
//! return buffer for actor-critic models.

use crate::types::{Action, Values};

/// A single environment transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<O> {
    /// Actor-critic experience: value estimate at `ob`.
    OnPolicy {
        ob: O,
        action: Action,
        reward: Vec<f64>,
        value: Values,
        done: bool,
    },
    /// Off-policy experience: keeps the successor observation.
    OffPolicy {
        ob: O,
        action: Action,
        reward: Vec<f64>,
        next_ob: O,
        done: bool,
    },
}

impl<O> Transition<O> {
    pub fn done(&self) -> bool {
        match self {
            Transition::OnPolicy { done, .. } | Transition::OffPolicy { done, .. } => *done,
        }
    }

    pub fn action(&self) -> &Action {
        match self {
            Transition::OnPolicy { action, .. } | Transition::OffPolicy { action, .. } => action,
        }
    }
}

/// Discounted returns and advantages of one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentReturns {
    pub returns: Vec<f64>,
    pub advantages: Vec<f64>,
}

/// Stores one agent's rewards and values for the current segment and turns
/// them into n-step bootstrapped returns.
#[derive(Debug, Clone)]
pub struct OnPolicyBuffer {
    gamma: f64,
    rewards: Vec<f64>,
    values: Vec<f64>,
    dones: Vec<bool>,
}

impl OnPolicyBuffer {
    pub fn new(gamma: f64) -> Self {
        Self {
            gamma,
            rewards: Vec::new(),
            values: Vec::new(),
            dones: Vec::new(),
        }
    }

    pub fn add(&mut self, reward: f64, value: f64, done: bool) {
        self.rewards.push(reward);
        self.values.push(value);
        self.dones.push(done);
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Computes `R_t = r_t + γ R_{t+1} (1 - done_t)` backwards from the
    /// bootstrap `r_last`, with advantages `R_t - V_t`, then clears the
    /// buffer.
    pub fn drain(&mut self, r_last: f64) -> SegmentReturns {
        let n = self.rewards.len();
        let mut returns = vec![0.0; n];
        let mut advantages = vec![0.0; n];
        let mut r = r_last;
        for t in (0..n).rev() {
            let non_terminal = if self.dones[t] { 0.0 } else { 1.0 };
            r = self.rewards[t] + self.gamma * r * non_terminal;
            returns[t] = r;
            advantages[t] = r - self.values[t];
        }
        self.rewards.clear();
        self.values.clear();
        self.dones.clear();
        SegmentReturns {
            returns,
            advantages,
        }
    }
}
