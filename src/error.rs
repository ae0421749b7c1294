//! Errors that abort a driver run.

use rand::distributions::WeightedError;
use thiserror::Error;

use crate::environment::EnvError;
use crate::policy::ModelError;
use crate::types::ValueShape;

/// Errors that abort a training or testing run.
///
/// There is no retry anywhere in the driver: every fault from the
/// environment or the model propagates to the caller of `run`.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid action distribution: {0}")]
    Sampling(#[from] WeightedError),

    #[error("Episode length {episode_length} is not a multiple of n_step {n_step}")]
    HorizonMismatch { episode_length: usize, n_step: usize },

    #[error("Bootstrap return is {found}, expected {expected}")]
    BootstrapShape {
        expected: ValueShape,
        found: ValueShape,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizon_mismatch_display() {
        let e = TrainerError::HorizonMismatch {
            episode_length: 720,
            n_step: 7,
        };
        assert_eq!(
            e.to_string(),
            "Episode length 720 is not a multiple of n_step 7"
        );
    }

    #[test]
    fn bootstrap_shape_display() {
        let e = TrainerError::BootstrapShape {
            expected: ValueShape::PerAgent(25),
            found: ValueShape::Scalar,
        };
        assert_eq!(e.to_string(), "Bootstrap return is scalar, expected per-agent[25]");
    }

    #[test]
    fn env_error_is_transparent() {
        let e: TrainerError = EnvError::Message("simulator crashed".into()).into();
        assert_eq!(e.to_string(), "Environment error: simulator crashed");
    }
}
