//! Headless episode driver
//!
//! Runs a `Policy` against the environment for a fixed number of episodes,
//! cutting each one off at a step cap, and reports rolling statistics
//! through `tracing`. Learning algorithms plug in by implementing `Policy`.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::game::{Action, GridWorldConfig};
use crate::metrics::{EpisodeRecord, EpisodeStats};
use crate::rl::{Env, FindTargetEnv};

/// Chooses the next action from an observation
pub trait Policy {
    fn select_action(&mut self, observation: &[i64], rng: &mut StdRng) -> Action;
}

/// Uniformly random moves
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn select_action(&mut self, _observation: &[i64], rng: &mut StdRng) -> Action {
        Action::ALL[rng.gen_range(0..Action::ALL.len())]
    }
}

/// Configuration for rollout mode
#[derive(Debug, Clone)]
pub struct RolloutConfig {
    pub episodes: usize,
    /// Episodes that reach this many steps are cut off
    pub max_steps: u32,
    /// Log a summary every N episodes
    pub log_frequency: usize,
    /// Seeds the first reset and the policy RNG
    pub seed: Option<u64>,
    /// Rolling window for the statistics
    pub stats_window: usize,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            max_steps: 100,
            log_frequency: 10,
            seed: None,
            stats_window: 100,
        }
    }
}

/// Final numbers of a rollout, serializable for reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RolloutSummary {
    pub episodes: usize,
    pub total_steps: u64,
    pub mean_reward: f32,
    pub mean_length: f32,
    pub success_rate: f32,
    pub best_reward: Option<f32>,
}

impl RolloutSummary {
    fn from_stats(stats: &EpisodeStats) -> Self {
        Self {
            episodes: stats.total_episodes(),
            total_steps: stats.total_steps(),
            mean_reward: stats.mean_reward(),
            mean_length: stats.mean_length(),
            success_rate: stats.success_rate(),
            best_reward: stats.best_reward(),
        }
    }
}

pub struct RolloutMode<P: Policy> {
    env: FindTargetEnv,
    policy: P,
    stats: EpisodeStats,
    config: RolloutConfig,
    rng: StdRng,
}

impl<P: Policy> RolloutMode<P> {
    pub fn new(env_config: GridWorldConfig, policy: P, config: RolloutConfig) -> Result<Self> {
        let env = match config.seed {
            Some(seed) => FindTargetEnv::with_seed(env_config, seed),
            None => FindTargetEnv::new(env_config),
        }
        .context("Failed to create environment")?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            env,
            policy,
            stats: EpisodeStats::new(config.stats_window),
            config,
            rng,
        })
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    /// Run every configured episode and release the display afterwards
    pub fn run(&mut self) -> Result<RolloutSummary> {
        info!(
            episodes = self.config.episodes,
            max_steps = self.config.max_steps,
            size = self.env.config().size,
            "starting rollout"
        );

        let result = self.run_episodes();
        self.env.close().context("Failed to close environment")?;
        result?;

        let summary = RolloutSummary::from_stats(&self.stats);
        info!("rollout complete: {}", self.stats.format_summary());
        Ok(summary)
    }

    fn run_episodes(&mut self) -> Result<()> {
        let log_frequency = self.config.log_frequency.max(1);

        for episode in 0..self.config.episodes {
            let seed = if episode == 0 { self.config.seed } else { None };
            let record = self.run_episode(seed)?;
            self.stats.record(record);

            if (episode + 1) % log_frequency == 0 {
                info!(
                    "[Episode {}/{}] {}",
                    episode + 1,
                    self.config.episodes,
                    self.stats.format_summary()
                );
            }
        }

        Ok(())
    }

    fn run_episode(&mut self, seed: Option<u64>) -> Result<EpisodeRecord> {
        let (mut obs, _) = self
            .env
            .reset(seed, None)
            .context("Failed to reset environment")?;
        let mut total_reward = 0.0;
        let mut length = 0;
        let mut reached_target = false;

        while length < self.config.max_steps {
            let action = self.policy.select_action(&obs, &mut self.rng);
            let step = self.env.step(action).context("Failed to step environment")?;

            total_reward += step.reward;
            length += 1;
            obs = step.observation;

            if step.terminated || step.truncated {
                reached_target = step.terminated;
                break;
            }
        }

        debug!(total_reward, length, reached_target, "episode finished");
        Ok(EpisodeRecord {
            total_reward,
            length,
            reached_target,
        })
    }
}
