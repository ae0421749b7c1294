//! Reward summary statistics.

use std::fmt;

/// Mean and population standard deviation of a reward sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RewardStats {
    pub mean: f64,
    pub std: f64,
}

impl RewardStats {
    /// Summarizes `rewards`; an empty slice yields zeros.
    pub fn from_rewards(rewards: &[f64]) -> Self {
        if rewards.is_empty() {
            return Self::default();
        }
        let n = rewards.len() as f64;
        let mean = rewards.iter().sum::<f64>() / n;
        let var = rewards.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std: var.sqrt(),
        }
    }
}

/// Plain mean; zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    RewardStats::from_rewards(values).mean
}

impl fmt::Display for RewardStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ± {:.2}", self.mean, self.std)
    }
}
