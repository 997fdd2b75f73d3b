use tracing::debug;

use super::env::{Env, Info, ResetOptions, Step};
use super::error::EnvError;
use super::observation::{create_observation, observation_space};
use super::spaces::{BoxSpace, Discrete};
use crate::game::{Action, GridWorldConfig, GridWorldEngine, WorldState};
use crate::render::{RenderSnapshot, Renderer, RgbFrame};

/// Where the environment is in its episode lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    /// Constructed, never reset
    Uninitialized,
    /// Reset, no step taken yet
    Ready,
    Stepping,
    /// A target was reached; waiting for reset
    Terminal,
}

/// Grid world where the agent has to find a target
///
/// Wraps the engine and exposes the reset/step contract with:
/// - integer vector observations (see `ObservationKind`)
/// - a discrete action space of 4 moves
/// - optional rendering as pixel buffers or to the terminal
pub struct FindTargetEnv {
    engine: GridWorldEngine,
    state: WorldState,
    renderer: Renderer,
    phase: EpisodePhase,
}

impl FindTargetEnv {
    /// Create an environment, rejecting invalid configurations
    pub fn new(config: GridWorldConfig) -> Result<Self, EnvError> {
        config.validate()?;
        Ok(Self::from_engine(GridWorldEngine::new(config)))
    }

    /// Create an environment with a reproducible random source
    pub fn with_seed(config: GridWorldConfig, seed: u64) -> Result<Self, EnvError> {
        config.validate()?;
        Ok(Self::from_engine(GridWorldEngine::with_seed(config, seed)))
    }

    /// Create an environment from a render mode name such as `"rgb_array"`
    pub fn with_render_mode_name(config: GridWorldConfig, mode: &str) -> Result<Self, EnvError> {
        let mode = mode.parse()?;
        Self::new(config.with_render_mode(Some(mode)))
    }

    fn from_engine(mut engine: GridWorldEngine) -> Self {
        let config = engine.config();
        let renderer = Renderer::new(
            config.render_mode,
            config.size,
            config.window_size,
            config.render_fps,
        );
        let mut state = engine.reset(None);
        state.is_new_episode = false;

        Self {
            engine,
            state,
            renderer,
            phase: EpisodePhase::Uninitialized,
        }
    }

    pub fn config(&self) -> &GridWorldConfig {
        self.engine.config()
    }

    /// Current world state (for testing/debugging)
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    /// Step with a raw action index from a discrete policy
    pub fn step_index(&mut self, action_idx: usize) -> Result<Step<Vec<i64>>, EnvError> {
        let action = Action::try_from(action_idx)?;
        self.step(action)
    }

    /// Borrowed view of the world for a single render call
    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        snapshot_of(&self.state)
    }

    fn observation(&self) -> Vec<i64> {
        create_observation(&self.state, self.config().observation)
    }

    fn info(&self) -> Info {
        Info {
            distance: self.state.distance_to_first_target(),
            visits: self.state.visits.len(),
            steps: self.state.steps,
        }
    }

    fn render_for_humans_if_needed(&mut self) -> Result<(), EnvError> {
        let snapshot = snapshot_of(&self.state);
        self.renderer.render_for_humans_if_needed(&snapshot)
    }
}

fn snapshot_of(state: &WorldState) -> RenderSnapshot<'_> {
    RenderSnapshot {
        agent: state.agent,
        is_new_episode: state.is_new_episode,
        targets: &state.targets,
        visits: &state.visits,
    }
}

impl Env for FindTargetEnv {
    type Obs = Vec<i64>;
    type Act = Action;
    type Frame = RgbFrame;

    fn action_space(&self) -> Discrete {
        Discrete::new(Action::ALL.len())
    }

    fn observation_space(&self) -> BoxSpace {
        observation_space(self.config())
    }

    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ResetOptions>,
    ) -> Result<(Vec<i64>, Info), EnvError> {
        if let Some(seed) = seed {
            self.engine.reseed(seed);
        }

        let agent_start = options.and_then(|opts| opts.agent_position);
        if let Some(pos) = agent_start {
            let size = self.config().size;
            if !pos.is_within(size) {
                return Err(EnvError::InvalidConfig(format!(
                    "reset position ({}, {}) lies outside a {}x{} grid",
                    pos.x, pos.y, size, size
                )));
            }
        }
        self.state = self.engine.reset(agent_start);
        self.phase = EpisodePhase::Ready;

        let obs = self.observation();
        let info = self.info();
        self.render_for_humans_if_needed()?;
        Ok((obs, info))
    }

    fn step(&mut self, action: Action) -> Result<Step<Vec<i64>>, EnvError> {
        match self.phase {
            EpisodePhase::Uninitialized => debug!("step called before the first reset"),
            EpisodePhase::Terminal => debug!("step called on a finished episode"),
            EpisodePhase::Ready | EpisodePhase::Stepping => {}
        }

        let result = self.engine.step(&mut self.state, action);
        self.phase = if result.terminated {
            debug!(
                steps = self.state.steps,
                reward = result.reward,
                "target reached"
            );
            EpisodePhase::Terminal
        } else {
            EpisodePhase::Stepping
        };

        let step = Step {
            observation: self.observation(),
            reward: result.reward as f32,
            terminated: result.terminated,
            truncated: false,
            info: self.info(),
        };
        self.render_for_humans_if_needed()?;
        Ok(step)
    }

    fn render(&mut self) -> Result<Option<RgbFrame>, EnvError> {
        let snapshot = snapshot_of(&self.state);
        self.renderer.render(&snapshot)
    }

    fn close(&mut self) -> Result<(), EnvError> {
        self.renderer.close()
    }
}
