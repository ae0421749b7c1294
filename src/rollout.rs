//! Rollout engine: collects one bounded trajectory segment for training.

use crate::counter::StepCounter;
use crate::environment::SimEnv;
use crate::error::TrainerError;
use crate::policy::{ActionMode, Policy};
use crate::sampling::sample_action;
use crate::session::Session;
use crate::stats::mean;
use crate::training::Transition;
use crate::types::{AgentKind, ValueShape, Values};

/// Result of [`Session::explore`].
#[derive(Debug, Clone)]
pub struct Segment<O> {
    /// Observation to continue from.
    pub last_ob: O,
    /// Whether the episode ended inside this segment.
    pub done: bool,
    /// Bootstrap return `R`: zero when done, the model's value estimate of
    /// `last_ob` otherwise. Always a scalar zero for value-based agents.
    pub bootstrap: Values,
    /// Global reward of every step taken.
    pub rewards: Vec<f64>,
}

impl<E, P> Session<E, P>
where
    E: SimEnv,
    P: Policy<Obs = E::Obs>,
{
    /// Advances the environment by at most `n_step` steps, stopping early
    /// when the episode ends.
    ///
    /// Every step is recorded with [`Policy::add_transition`] and advances
    /// the global counter by exactly one. Faults from the environment or the
    /// model are returned immediately; there is no retry.
    ///
    /// # Arguments
    ///
    /// * `counter` - Global step counter
    /// * `prev_ob` - Observation to act on first
    /// * `prev_done` - Done flag preceding `prev_ob` (resets recurrent state)
    pub fn explore<C: StepCounter>(
        &mut self,
        counter: &C,
        prev_ob: E::Obs,
        prev_done: bool,
    ) -> Result<Segment<E::Obs>, TrainerError> {
        let n_step = self.policy.n_step();
        let mut ob = prev_ob;
        let mut done = prev_done;
        let mut rewards = Vec::with_capacity(n_step);

        for _ in 0..n_step {
            let (action, policy, value) = if self.agent.is_policy_gradient() {
                let (policy, value) = self.policy.forward_actor_critic(&ob, done)?;
                if self.agent.uses_fingerprint() {
                    self.env.update_fingerprint(&policy)?;
                }
                let action = sample_action(&policy, &mut self.rng)?;
                (action, policy, Some(value))
            } else {
                let out = self.policy.forward_action(&ob, ActionMode::Explore)?;
                (out.action, out.policy, None)
            };

            let step = self.env.step(&action)?;
            rewards.push(step.global_reward);
            let global_step = counter.next();
            self.episode_step += 1;

            if counter.should_log() {
                tracing::info!(
                    global_step,
                    episode_step = self.episode_step,
                    ob = ?ob,
                    action = %action,
                    policy = ?policy,
                    reward = step.global_reward,
                    train_reward = mean(&step.reward),
                    done = step.done,
                    "Training step"
                );
            }

            let transition = match value {
                Some(value) => Transition::OnPolicy {
                    ob,
                    action,
                    reward: step.reward,
                    value,
                    done: step.done,
                },
                None => Transition::OffPolicy {
                    ob,
                    action,
                    reward: step.reward,
                    next_ob: step.next_ob.clone(),
                    done: step.done,
                },
            };
            self.policy.add_transition(transition)?;

            done = step.done;
            ob = step.next_ob;
            if done {
                break;
            }
        }

        let bootstrap = self.bootstrap(&ob, done)?;
        Ok(Segment {
            last_ob: ob,
            done,
            bootstrap,
            rewards,
        })
    }

    fn bootstrap(&mut self, ob: &E::Obs, done: bool) -> Result<Values, TrainerError> {
        if !self.agent.is_policy_gradient() {
            return Ok(Values::Scalar(0.0));
        }
        let n_agent = self.policy.n_agent();
        if done {
            return Ok(Values::zeros(self.agent, n_agent));
        }
        let value = self.policy.forward_value(ob, false)?;
        let expected = match self.agent {
            AgentKind::PolicyGradientMulti => ValueShape::PerAgent(n_agent),
            _ => ValueShape::Scalar,
        };
        let found = value.shape();
        if found != expected {
            return Err(TrainerError::BootstrapShape { expected, found });
        }
        Ok(value)
    }
}
