//! Scripted environment and recording policy shared by the unit tests.

use std::path::{Path, PathBuf};

use crate::environment::{EnvError, ResetOptions, SimEnv, StepResult};
use crate::policy::{ActionMode, ActionOutput, ModelError, Policy};
use crate::sampling::greedy_action;
use crate::summary::SummarySink;
use crate::training::Transition;
use crate::types::{Action, AgentKind, Distributions, Mode, Values};

/// Fresh, not yet created directory under the system temp dir.
pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("rl_driver-{}", uuid::Uuid::new_v4()))
}

/// Everything the scripted environment was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvEvent {
    Reset { options: ResetOptions, mode: Mode },
    Fingerprint(Distributions),
    Step { action: Action, mode: Mode },
    Terminate { mode: Mode },
    SetMode(Mode),
    ResetEpisodeCount,
    InitData { is_record: bool, record_stats: bool, path: PathBuf },
    CollectTripinfo,
    OutputData,
}

/// Environment replaying a fixed global-reward sequence per episode.
///
/// Observations are the step index within the episode; the episode ends
/// after the last scripted reward.
#[derive(Debug)]
pub struct ScriptedEnv {
    kind: AgentKind,
    train_rewards: Vec<f64>,
    test_rewards: Vec<Vec<f64>>,
    episode_length: usize,
    test_num: usize,
    current: Vec<f64>,
    t: usize,
    mode: Mode,
    fail_at: Option<usize>,
    pub events: Vec<EnvEvent>,
}

impl ScriptedEnv {
    pub fn new(kind: AgentKind, rewards: Vec<f64>) -> Self {
        Self {
            kind,
            episode_length: rewards.len(),
            train_rewards: rewards,
            test_rewards: Vec::new(),
            test_num: 1,
            current: Vec::new(),
            t: 0,
            mode: Mode::Train,
            fail_at: None,
            events: Vec::new(),
        }
    }

    /// Per-scenario reward sequences; also sets the number of scenarios.
    pub fn with_test_rewards(mut self, rewards: Vec<Vec<f64>>) -> Self {
        self.test_num = rewards.len();
        self.test_rewards = rewards;
        self
    }

    pub fn with_test_num(mut self, test_num: usize) -> Self {
        self.test_num = test_num;
        self
    }

    pub fn with_episode_length(mut self, episode_length: usize) -> Self {
        self.episode_length = episode_length;
        self
    }

    /// Fails the step with index `t` of every episode.
    pub fn failing_at(mut self, t: usize) -> Self {
        self.fail_at = Some(t);
        self
    }

    /// Steps taken in the current episode.
    pub fn steps_taken(&self) -> usize {
        self.t
    }

    pub fn actions(&self) -> Vec<Action> {
        self.events
            .iter()
            .filter_map(|e| match e {
                EnvEvent::Step { action, .. } => Some(action.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn terminations(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, EnvEvent::Terminate { .. }))
            .count()
    }

    pub fn resets(&self) -> Vec<ResetOptions> {
        self.events
            .iter()
            .filter_map(|e| match e {
                EnvEvent::Reset { options, .. } => Some(*options),
                _ => None,
            })
            .collect()
    }
}

impl SimEnv for ScriptedEnv {
    type Obs = usize;

    fn reset(&mut self, options: ResetOptions) -> Result<usize, EnvError> {
        self.events.push(EnvEvent::Reset {
            options,
            mode: self.mode,
        });
        self.current = match options.test_ind {
            Some(i) if i < self.test_rewards.len() => self.test_rewards[i].clone(),
            _ => self.train_rewards.clone(),
        };
        self.t = 0;
        Ok(0)
    }

    fn step(&mut self, action: &Action) -> Result<StepResult<usize>, EnvError> {
        if self.fail_at == Some(self.t) {
            return Err(EnvError::Message(format!("scripted failure at {}", self.t)));
        }
        self.events.push(EnvEvent::Step {
            action: action.clone(),
            mode: self.mode,
        });
        let global_reward = self.current.get(self.t).copied().unwrap_or(0.0);
        self.t += 1;
        Ok(StepResult {
            next_ob: self.t,
            reward: vec![global_reward],
            done: self.t >= self.current.len(),
            global_reward,
        })
    }

    fn terminate(&mut self) -> Result<(), EnvError> {
        self.events.push(EnvEvent::Terminate { mode: self.mode });
        Ok(())
    }

    fn update_fingerprint(&mut self, policy: &Distributions) -> Result<(), EnvError> {
        self.events.push(EnvEvent::Fingerprint(policy.clone()));
        Ok(())
    }

    fn set_mode(&mut self, mode: Mode) {
        self.events.push(EnvEvent::SetMode(mode));
        self.mode = mode;
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn test_num(&self) -> usize {
        self.test_num
    }

    fn agent(&self) -> AgentKind {
        self.kind
    }

    fn episode_length(&self) -> usize {
        self.episode_length
    }

    fn reset_episode_count(&mut self) {
        self.events.push(EnvEvent::ResetEpisodeCount);
    }

    fn init_data(
        &mut self,
        is_record: bool,
        record_stats: bool,
        output_path: &Path,
    ) -> Result<(), EnvError> {
        self.events.push(EnvEvent::InitData {
            is_record,
            record_stats,
            path: output_path.to_path_buf(),
        });
        Ok(())
    }

    fn collect_tripinfo(&mut self) -> Result<(), EnvError> {
        self.events.push(EnvEvent::CollectTripinfo);
        Ok(())
    }

    fn output_data(&mut self) -> Result<(), EnvError> {
        self.events.push(EnvEvent::OutputData);
        Ok(())
    }
}

/// Policy returning scripted outputs and recording every call.
///
/// Unless overridden, actor-critic passes return one-hot distributions over
/// three actions whose hot index rotates with every call, so sampling is
/// deterministic and differs between steps.
#[derive(Debug)]
pub struct ScriptedPolicy {
    n_step: usize,
    n_agent: usize,
    multi: bool,
    value: f64,
    distribution: Option<Distributions>,
    action_output: ActionOutput,
    calls: usize,
    pub value_override: Option<Values>,
    pub transitions: Vec<Transition<usize>>,
    pub backward_calls: Vec<(Option<Values>, u64)>,
    pub value_queries: Vec<usize>,
    pub forward_dones: Vec<bool>,
    pub action_modes: Vec<ActionMode>,
    pub resets: usize,
}

impl ScriptedPolicy {
    fn base(n_step: usize, n_agent: usize, multi: bool) -> Self {
        Self {
            n_step,
            n_agent,
            multi,
            value: 0.5,
            distribution: None,
            action_output: ActionOutput {
                action: Action::Single(0),
                policy: Distributions::Single(vec![1.0, 0.0]),
            },
            calls: 0,
            value_override: None,
            transitions: Vec::new(),
            backward_calls: Vec::new(),
            value_queries: Vec::new(),
            forward_dones: Vec::new(),
            action_modes: Vec::new(),
            resets: 0,
        }
    }

    /// Single actor-critic.
    pub fn single(n_step: usize) -> Self {
        Self::base(n_step, 1, false)
    }

    /// Multi-agent actor-critic with `n_agent` agents.
    pub fn multi(n_step: usize, n_agent: usize) -> Self {
        Self::base(n_step, n_agent, true)
    }

    /// Value-based agent returning a fixed action.
    pub fn value_based(n_step: usize) -> Self {
        Self::base(n_step, 1, false)
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_distribution(mut self, distribution: Distributions) -> Self {
        self.distribution = Some(distribution);
        self
    }

    pub fn with_action_output(mut self, output: ActionOutput) -> Self {
        self.action_output = output;
        self
    }

    /// The action sampling must produce from one of this policy's
    /// one-hot distributions.
    pub fn sampled_from(&self, policy: &Distributions) -> Action {
        greedy_action(policy).unwrap_or(Action::Single(0))
    }

    fn distributions(&mut self) -> Distributions {
        if let Some(d) = &self.distribution {
            return d.clone();
        }
        let call = self.calls;
        self.calls += 1;
        let one_hot = |hot: usize| {
            let mut pi = vec![0.0; 3];
            pi[hot % 3] = 1.0;
            pi
        };
        if self.multi {
            Distributions::PerAgent((0..self.n_agent).map(|i| one_hot(call + i)).collect())
        } else {
            Distributions::Single(one_hot(call))
        }
    }

    fn values(&self) -> Values {
        if self.multi {
            Values::PerAgent(vec![self.value; self.n_agent])
        } else {
            Values::Scalar(self.value)
        }
    }
}

impl Policy for ScriptedPolicy {
    type Obs = usize;

    fn n_step(&self) -> usize {
        self.n_step
    }

    fn n_agent(&self) -> usize {
        self.n_agent
    }

    fn forward_actor_critic(
        &mut self,
        _ob: &usize,
        done: bool,
    ) -> Result<(Distributions, Values), ModelError> {
        self.forward_dones.push(done);
        Ok((self.distributions(), self.values()))
    }

    fn forward_policy(&mut self, _ob: &usize, done: bool) -> Result<Distributions, ModelError> {
        self.forward_dones.push(done);
        Ok(self.distributions())
    }

    fn forward_value(&mut self, ob: &usize, _done: bool) -> Result<Values, ModelError> {
        self.value_queries.push(*ob);
        Ok(self.value_override.clone().unwrap_or_else(|| self.values()))
    }

    fn forward_action(
        &mut self,
        _ob: &usize,
        mode: ActionMode,
    ) -> Result<ActionOutput, ModelError> {
        self.action_modes.push(mode);
        Ok(self.action_output.clone())
    }

    fn add_transition(&mut self, transition: Transition<usize>) -> Result<(), ModelError> {
        self.transitions.push(transition);
        Ok(())
    }

    fn backward(
        &mut self,
        bootstrap: Option<&Values>,
        summary: &mut dyn SummarySink,
        global_step: u64,
    ) -> Result<(), ModelError> {
        self.backward_calls.push((bootstrap.cloned(), global_step));
        summary.add_scalar("loss", 0.0, global_step);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ModelError> {
        self.resets += 1;
        Ok(())
    }
}
