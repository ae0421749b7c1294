//! Interleaved training and evaluation loop.

use std::path::PathBuf;

use crate::config::TrainerConfig;
use crate::counter::StepCounter;
use crate::environment::{ResetOptions, SimEnv};
use crate::error::TrainerError;
use crate::policy::Policy;
use crate::record::{RewardLog, RewardRecord};
use crate::session::Session;
use crate::stats::RewardStats;
use crate::summary::SummarySink;
use crate::types::Mode;
use crate::{generate_run_id, RunId};

/// Alternates training episodes with periodic evaluation passes until the
/// global counter reaches its horizon.
///
/// # Lifecycle
///
/// 1. [`Trainer::new`] validates that `n_step` divides the episode length.
/// 2. [`Trainer::run`] loops: an evaluation pass whenever the counter's test
///    cadence fires (if enabled), then one full training episode.
/// 3. On exit the reward table is written to `output_path/train_reward.csv`.
pub struct Trainer<E, P, C, S> {
    session: Session<E, P>,
    counter: C,
    summary: S,
    records: RewardLog,
    config: TrainerConfig,
    run_id: RunId,
}

impl<E, P, C, S> Trainer<E, P, C, S>
where
    E: SimEnv,
    P: Policy<Obs = E::Obs>,
    C: StepCounter,
    S: SummarySink,
{
    /// # Errors
    ///
    /// Returns [`TrainerError::HorizonMismatch`] when the policy's `n_step`
    /// does not evenly divide the environment's episode length.
    pub fn new(
        env: E,
        policy: P,
        counter: C,
        summary: S,
        config: TrainerConfig,
    ) -> Result<Self, TrainerError> {
        let session = Session::new(env, policy, config.seed);
        session.check_horizon()?;
        if config.run_test {
            tracing::info!(test_num = session.env.test_num(), "Testing: total test num");
        }
        Ok(Self {
            session,
            counter,
            summary,
            records: RewardLog::new(),
            config,
            run_id: generate_run_id(),
        })
    }

    /// Runs until the counter signals stop and returns the path of the
    /// written reward table.
    pub fn run(&mut self) -> Result<PathBuf, TrainerError> {
        let span = tracing::info_span!(
            "train",
            run_id = %self.run_id,
            agent = %self.session.agent()
        );
        let _guard = span.enter();

        while !self.counter.should_stop() {
            if self.config.run_test && self.counter.should_test() {
                self.test_pass()?;
            }
            self.train_pass()?;
        }

        let path = self.records.save(&self.config.output_path)?;
        tracing::info!(path = %path.display(), rows = self.records.len(), "Saved reward table");
        Ok(path)
    }

    fn test_pass(&mut self) -> Result<(), TrainerError> {
        let global_step = self.counter.cur_step();
        self.session.set_mode(Mode::Test);
        let avg_reward = self.session.test_pass(global_step, &mut self.records)?;
        self.summary.add_scalar("test_reward", avg_reward, global_step);
        tracing::info!(global_step, avg_reward, "Testing");
        Ok(())
    }

    fn train_pass(&mut self) -> Result<(), TrainerError> {
        self.session.set_mode(Mode::Train);
        let mut ob = self.session.env.reset(ResetOptions::default())?;
        // pre-decision flag: clears recurrent state on the first forward
        let mut done = true;
        self.session.policy.reset()?;
        self.session.episode_step = 0;
        let mut rewards = Vec::new();

        let global_step = loop {
            let segment = self.session.explore(&self.counter, ob, done)?;
            rewards.extend_from_slice(&segment.rewards);
            let global_step = self.counter.cur_step();

            let bootstrap = self
                .session
                .agent
                .is_policy_gradient()
                .then_some(&segment.bootstrap);
            self.session
                .policy
                .backward(bootstrap, &mut self.summary, global_step)?;
            tracing::debug!(global_step, steps = segment.rewards.len(), "Segment update");

            if segment.done {
                self.session.env.terminate()?;
                break global_step;
            }
            ob = segment.last_ob;
            done = segment.done;
        };

        let stats = RewardStats::from_rewards(&rewards);
        self.records
            .push(RewardRecord::train(self.session.agent, global_step, stats));
        self.summary.add_scalar("train_reward", stats.mean, global_step);
        self.summary.flush();
        tracing::info!(
            global_step,
            avg_reward = stats.mean,
            std_reward = stats.std,
            "Training episode finished"
        );
        Ok(())
    }

    /// Reward records collected so far.
    pub fn records(&self) -> &RewardLog {
        &self.records
    }

    pub fn summary(&self) -> &S {
        &self.summary
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }

    pub fn session(&self) -> &Session<E, P> {
        &self.session
    }

    /// Consumes the trainer, e.g. to hand the trained policy to an
    /// [`Evaluator`](crate::tester::Evaluator).
    pub fn into_session(self) -> Session<E, P> {
        self.session
    }
}
