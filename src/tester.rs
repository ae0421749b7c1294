//! Standalone evaluation drivers.
//!
//! [`Tester`] evaluates a policy that another process keeps training, either
//! by polling a shared counter ([`Tester::run_online`]) or with a single pass
//! over every scenario ([`Tester::run_offline`]). [`Evaluator`] runs a trained
//! policy for deployment metrics.

use std::path::PathBuf;
use std::thread;

use crate::config::{EvaluatorConfig, TesterConfig};
use crate::coord::StopSignal;
use crate::counter::StepCounter;
use crate::environment::SimEnv;
use crate::error::TrainerError;
use crate::policy::Policy;
use crate::record::RewardLog;
use crate::session::Session;
use crate::stats::{mean, RewardStats};
use crate::summary::SummarySink;
use crate::types::{Mode, PolicyType};

/// Evaluation-only driver; the environment stays in test mode for its whole
/// lifetime and no transitions are recorded.
pub struct Tester<E, P, C, S> {
    session: Session<E, P>,
    counter: C,
    summary: S,
    records: RewardLog,
    config: TesterConfig,
}

impl<E, P, C, S> Tester<E, P, C, S>
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
        config: TesterConfig,
    ) -> Result<Self, TrainerError> {
        let mut session = Session::new(env, policy, config.seed);
        session.check_horizon()?;
        session.set_mode(Mode::Test);
        tracing::info!(test_num = session.env.test_num(), "Testing: total test num");
        Ok(Self {
            session,
            counter,
            summary,
            records: RewardLog::new(),
            config,
        })
    }

    /// Polls the counter every `poll_interval` and runs a full evaluation
    /// pass whenever its test cadence fires, until `stop` is raised.
    ///
    /// The stop flag is checked between polls only; a pass in progress
    /// always completes. Writes the reward table on exit and returns its
    /// path.
    pub fn run_online(&mut self, stop: &StopSignal) -> Result<PathBuf, TrainerError> {
        self.session.env.reset_episode_count();
        while !stop.should_stop() {
            thread::sleep(self.config.poll_interval);
            if self.counter.should_test() {
                let global_step = self.counter.cur_step();
                let avg_reward = self.session.test_pass(global_step, &mut self.records)?;
                self.summary.add_scalar("test_reward", avg_reward, global_step);
                tracing::info!(global_step, avg_reward, "Testing");
            }
        }
        let path = self.records.save(&self.config.output_path)?;
        tracing::info!(path = %path.display(), rows = self.records.len(), "Saved reward table");
        Ok(path)
    }

    /// Plays every test scenario once with data recording enabled and
    /// returns the mean of the per-scenario average rewards.
    pub fn run_offline(&mut self) -> Result<f64, TrainerError> {
        self.session.env.reset_episode_count();
        self.session
            .env
            .init_data(true, false, &self.config.output_path)?;

        let test_num = self.session.env.test_num();
        let mut means = Vec::with_capacity(test_num);
        for test_ind in 0..test_num {
            let stats = self.session.perform(test_ind, false, PolicyType::Default)?;
            self.session.env.terminate()?;
            thread::sleep(self.config.settle_delay);
            self.session.env.collect_tripinfo()?;
            tracing::debug!(test_ind, avg_reward = stats.mean, "Offline scenario");
            means.push(stats.mean);
        }

        let avg_reward = mean(&means);
        tracing::info!(avg_reward, "Offline testing");
        self.session.env.output_data()?;
        Ok(avg_reward)
    }

    /// Test records collected by [`Tester::run_online`].
    pub fn records(&self) -> &RewardLog {
        &self.records
    }

    pub fn summary(&self) -> &S {
        &self.summary
    }

    pub fn session(&self) -> &Session<E, P> {
        &self.session
    }
}

/// Runs a trained policy over every test scenario and records deployment
/// data through the environment.
pub struct Evaluator<E, P> {
    session: Session<E, P>,
    config: EvaluatorConfig,
}

impl<E, P> Evaluator<E, P>
where
    E: SimEnv,
    P: Policy<Obs = E::Obs>,
{
    /// Puts the environment in test mode. The rollout horizon is not
    /// checked.
    pub fn new(env: E, policy: P, config: EvaluatorConfig) -> Self {
        let mut session = Session::new(env, policy, config.seed);
        session.set_mode(Mode::Test);
        Self { session, config }
    }

    /// Returns the reward statistics of each scenario in test-index order.
    pub fn run(&mut self) -> Result<Vec<RewardStats>, TrainerError> {
        let env = &mut self.session.env;
        env.reset_episode_count();
        env.init_data(true, false, &self.config.output_path)?;
        thread::sleep(self.config.settle_delay);

        let test_num = self.session.env.test_num();
        let mut results = Vec::with_capacity(test_num);
        for test_ind in 0..test_num {
            let stats = self
                .session
                .perform(test_ind, self.config.demo, self.config.policy_type)?;
            self.session.env.terminate()?;
            tracing::info!(
                test_ind,
                avg_reward = stats.mean,
                std_reward = stats.std,
                "Evaluation episode"
            );
            thread::sleep(self.config.settle_delay);
            self.session.env.collect_tripinfo()?;
            results.push(stats);
        }
        self.session.env.output_data()?;
        Ok(results)
    }

    pub fn session(&self) -> &Session<E, P> {
        &self.session
    }
}
