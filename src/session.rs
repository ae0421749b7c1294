//! Environment/policy pairing shared by the rollout and evaluation engines.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::environment::SimEnv;
use crate::error::TrainerError;
use crate::policy::Policy;
use crate::types::{AgentKind, Mode};

/// An environment, the policy acting in it, and the sampling RNG.
///
/// The agent family is read from the environment once at construction and
/// drives every branch of [`Session::explore`] and [`Session::perform`].
pub struct Session<E, P> {
    pub(crate) env: E,
    pub(crate) policy: P,
    pub(crate) agent: AgentKind,
    pub(crate) rng: StdRng,
    /// Steps taken in the current training episode.
    pub(crate) episode_step: u64,
}

impl<E, P> Session<E, P>
where
    E: SimEnv,
    P: Policy<Obs = E::Obs>,
{
    /// Pairs `env` with `policy`; `seed` fixes action sampling.
    pub fn new(env: E, policy: P, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            agent: env.agent(),
            env,
            policy,
            rng,
            episode_step: 0,
        }
    }

    /// Fails unless the rollout horizon evenly divides the episode length.
    pub fn check_horizon(&self) -> Result<(), TrainerError> {
        let n_step = self.policy.n_step();
        let episode_length = self.env.episode_length();
        if n_step == 0 || episode_length % n_step != 0 {
            return Err(TrainerError::HorizonMismatch {
                episode_length,
                n_step,
            });
        }
        Ok(())
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.env.set_mode(mode);
    }

    /// Agent family reported by the environment.
    pub fn agent(&self) -> AgentKind {
        self.agent
    }

    /// Returns a reference to the environment.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Returns a mutable reference to the environment.
    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Returns a reference to the policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Returns a mutable reference to the policy.
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Consumes the session, returning the environment and the policy.
    pub fn into_parts(self) -> (E, P) {
        (self.env, self.policy)
    }
}
