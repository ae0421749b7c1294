//! Evaluation engine: plays full episodes without learning.

use crate::environment::{ResetOptions, SimEnv};
use crate::error::TrainerError;
use crate::policy::{ActionMode, Policy};
use crate::record::{RewardLog, RewardRecord};
use crate::sampling::{greedy_action, sample_action};
use crate::session::Session;
use crate::stats::{mean, RewardStats};
use crate::types::{Action, PolicyType};

impl<E, P> Session<E, P>
where
    E: SimEnv,
    P: Policy<Obs = E::Obs>,
{
    /// Plays test scenario `test_ind` to termination and summarizes the
    /// global rewards.
    ///
    /// Records no transitions and leaves the global counter untouched.
    /// `policy_type` overrides action selection: `Deterministic` takes the
    /// arg-max of actor-critic policies, `Stochastic` samples even for
    /// greedy and value-based agents.
    pub fn perform(
        &mut self,
        test_ind: usize,
        demo: bool,
        policy_type: PolicyType,
    ) -> Result<RewardStats, TrainerError> {
        let mut ob = self.env.reset(ResetOptions::test(test_ind, demo))?;
        // pre-decision flag: clears recurrent state on the first forward
        let mut done = true;
        self.policy.reset()?;
        let mut rewards = Vec::new();

        loop {
            let action = self.test_action(&ob, done, policy_type)?;
            let step = self.env.step(&action)?;
            rewards.push(step.global_reward);
            done = step.done;
            if done {
                break;
            }
            ob = step.next_ob;
        }

        Ok(RewardStats::from_rewards(&rewards))
    }

    fn test_action(
        &mut self,
        ob: &E::Obs,
        done: bool,
        policy_type: PolicyType,
    ) -> Result<Action, TrainerError> {
        if self.agent.is_policy_gradient() {
            let policy = self.policy.forward_policy(ob, done)?;
            if self.agent.uses_fingerprint() {
                self.env.update_fingerprint(&policy)?;
            }
            let action = match policy_type {
                PolicyType::Deterministic => greedy_action(&policy)?,
                PolicyType::Default | PolicyType::Stochastic => {
                    sample_action(&policy, &mut self.rng)?
                }
            };
            return Ok(action);
        }

        match policy_type {
            PolicyType::Stochastic => {
                let out = self.policy.forward_action(ob, ActionMode::Stochastic)?;
                Ok(sample_action(&out.policy, &mut self.rng)?)
            }
            PolicyType::Default | PolicyType::Deterministic => {
                Ok(self.policy.forward_action(ob, ActionMode::Greedy)?.action)
            }
        }
    }

    /// Runs every test scenario once, appending one record per scenario.
    /// Returns the average of the per-scenario mean rewards.
    pub(crate) fn test_pass(
        &mut self,
        global_step: u64,
        records: &mut RewardLog,
    ) -> Result<f64, TrainerError> {
        let test_num = self.env.test_num();
        let mut means = Vec::with_capacity(test_num);
        for test_ind in 0..test_num {
            let stats = self.perform(test_ind, false, PolicyType::Default)?;
            self.env.terminate()?;
            means.push(stats.mean);
            records.push(RewardRecord::test(self.agent, global_step, test_ind, stats));
        }
        Ok(mean(&means))
    }
}
