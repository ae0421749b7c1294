//! Action selection from policy distributions.

use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;

use crate::types::{Action, Distributions};

/// Draws an index with probability proportional to `weights`.
pub fn sample<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Result<usize, WeightedError> {
    let dist = WeightedIndex::<f64>::new(weights)?;
    Ok(dist.sample(rng))
}

/// Index of the first maximal weight, `None` for an empty slice.
pub fn argmax(weights: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &w) in weights.iter().enumerate() {
        match best {
            Some((_, b)) if w <= b => {}
            _ => best = Some((i, w)),
        }
    }
    best.map(|(i, _)| i)
}

/// Samples one action per distribution.
pub fn sample_action<R: Rng + ?Sized>(
    policy: &Distributions,
    rng: &mut R,
) -> Result<Action, WeightedError> {
    match policy {
        Distributions::Single(pi) => Ok(Action::Single(sample(pi, rng)?)),
        Distributions::PerAgent(pis) => pis
            .iter()
            .map(|pi| sample(pi, rng))
            .collect::<Result<Vec<_>, _>>()
            .map(Action::PerAgent),
    }
}

/// Arg-max action of every distribution.
pub fn greedy_action(policy: &Distributions) -> Result<Action, WeightedError> {
    fn pick(pi: &[f64]) -> Result<usize, WeightedError> {
        argmax(pi).ok_or(WeightedError::NoItem)
    }
    match policy {
        Distributions::Single(pi) => Ok(Action::Single(pick(pi)?)),
        Distributions::PerAgent(pis) => pis
            .iter()
            .map(|pi| pick(pi))
            .collect::<Result<Vec<_>, _>>()
            .map(Action::PerAgent),
    }
}
