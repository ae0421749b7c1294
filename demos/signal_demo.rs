// Demonstration: train and evaluate a baseline controller on a toy grid of
// signalized intersections.
//
// Run from this repo root:
//   cargo run --example signal_demo -- --policy greedy --steps 1200 --seed 7

use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rl_driver::policy::greedy::PhaseScores;
use rl_driver::policy::{GreedyPolicy, RandomPolicy};
use rl_driver::{
    Action, AgentKind, CounterConfig, Distributions, EnvError, Evaluator, EvaluatorConfig,
    GlobalCounter, Mode, Policy, PolicyType, ResetOptions, SimEnv, StepResult, Trainer,
    TrainerConfig, TracingSummary,
};

const PHASES: usize = 2;
const EPISODE_LENGTH: usize = 60;

/// Intersections with one queue per phase; serving a phase drains its queue
/// while the other phases keep accumulating arrivals.
struct SignalGrid {
    kind: AgentKind,
    n_agent: usize,
    queues: PhaseScores,
    t: usize,
    mode: Mode,
    seed: u64,
    rng: StdRng,
    episodes: usize,
}

impl SignalGrid {
    fn new(kind: AgentKind, n_agent: usize, seed: u64) -> Self {
        Self {
            kind,
            n_agent,
            queues: vec![vec![0.0; PHASES]; n_agent],
            t: 0,
            mode: Mode::Train,
            seed,
            rng: StdRng::seed_from_u64(seed),
            episodes: 0,
        }
    }

    fn served(&self, action: &Action, agent: usize) -> usize {
        match action {
            Action::Single(a) => *a,
            Action::PerAgent(actions) => actions.get(agent).copied().unwrap_or(0),
        }
    }
}

impl SimEnv for SignalGrid {
    type Obs = PhaseScores;

    fn reset(&mut self, options: ResetOptions) -> Result<PhaseScores, EnvError> {
        // test scenarios replay fixed demand
        if let Some(i) = options.test_ind {
            self.rng = StdRng::seed_from_u64(self.seed.wrapping_add(1_000 + i as u64));
        }
        self.queues = vec![vec![0.0; PHASES]; self.n_agent];
        self.t = 0;
        self.episodes += 1;
        tracing::debug!(episode = self.episodes, test_ind = ?options.test_ind, "Reset");
        Ok(self.queues.clone())
    }

    fn step(&mut self, action: &Action) -> Result<StepResult<PhaseScores>, EnvError> {
        let mut reward = Vec::with_capacity(self.n_agent);
        for agent in 0..self.n_agent {
            let served = self.served(action, agent);
            if served >= PHASES {
                return Err(EnvError::Message(format!("phase {} out of range", served)));
            }
            for phase in 0..PHASES {
                let arrivals = self.rng.gen_range(0.0..2.0);
                let queue = &mut self.queues[agent][phase];
                *queue += arrivals;
                if phase == served {
                    *queue = (*queue - 3.0).max(0.0);
                }
            }
            reward.push(-self.queues[agent].iter().sum::<f64>());
        }
        self.t += 1;
        let global_reward = reward.iter().sum::<f64>() / self.n_agent as f64;
        Ok(StepResult {
            next_ob: self.queues.clone(),
            reward,
            done: self.t >= EPISODE_LENGTH,
            global_reward,
        })
    }

    fn terminate(&mut self) -> Result<(), EnvError> {
        Ok(())
    }

    fn update_fingerprint(&mut self, _policy: &Distributions) -> Result<(), EnvError> {
        Ok(())
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn test_num(&self) -> usize {
        3
    }

    fn agent(&self) -> AgentKind {
        self.kind
    }

    fn episode_length(&self) -> usize {
        EPISODE_LENGTH
    }

    fn reset_episode_count(&mut self) {
        self.episodes = 0;
    }

    fn init_data(
        &mut self,
        _is_record: bool,
        _record_stats: bool,
        output_path: &Path,
    ) -> Result<(), EnvError> {
        tracing::info!(path = %output_path.display(), "Recording evaluation data");
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let policy_name = arg_value(&args, "--policy").unwrap_or("greedy");
    let total_step: u64 = arg_value(&args, "--steps")
        .and_then(|s| s.parse().ok())
        .unwrap_or(1_200);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(7);
    let output_path = env::temp_dir().join("rl_driver_signal_demo");

    match policy_name {
        "greedy" => run(
            AgentKind::Greedy,
            GreedyPolicy::new(10),
            total_step,
            seed,
            output_path,
        ),
        "random" => run(
            AgentKind::ValueBased,
            RandomPolicy::new(PHASES, 4, 10, seed),
            total_step,
            seed,
            output_path,
        ),
        other => {
            eprintln!("Unknown --policy '{}'; expected 'greedy' or 'random'.", other);
            std::process::exit(2);
        }
    }
}

fn run<P>(
    kind: AgentKind,
    policy: P,
    total_step: u64,
    seed: u64,
    output_path: PathBuf,
) -> Result<(), Box<dyn Error>>
where
    P: Policy<Obs = PhaseScores>,
{
    let counter = GlobalCounter::new(&CounterConfig {
        total_step,
        test_interval: total_step / 4,
        log_interval: 100,
    });
    let config = TrainerConfig {
        run_test: true,
        output_path: output_path.clone(),
        seed: Some(seed),
    };
    let mut trainer = Trainer::new(
        SignalGrid::new(kind, 4, seed),
        policy,
        &counter,
        TracingSummary,
        config,
    )?;
    let table = trainer.run()?;
    println!("Reward table: {}", table.display());

    let (env, policy) = trainer.into_session().into_parts();
    let mut evaluator = Evaluator::new(
        env,
        policy,
        EvaluatorConfig {
            output_path,
            policy_type: PolicyType::Stochastic,
            settle_delay: std::time::Duration::ZERO,
            seed: Some(seed),
            ..EvaluatorConfig::default()
        },
    );
    for (test_ind, stats) in evaluator.run()?.iter().enumerate() {
        println!("Scenario {}: {}", test_ind, stats);
    }
    Ok(())
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
