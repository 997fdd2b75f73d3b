use serde::{Deserialize, Serialize};

use super::error::EnvError;
use super::spaces::{BoxSpace, Discrete};
use crate::game::GridPosition;

/// Diagnostics returned alongside each observation
///
/// Not part of the learning signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// Manhattan distance from the agent to the first target
    pub distance: i64,
    /// Number of distinct cells visited this episode
    pub visits: usize,
    /// Steps taken this episode
    pub steps: u32,
}

/// Per-call reset overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetOptions {
    /// Preferred spawn cell; still resampled if a target occupies it
    pub agent_position: Option<GridPosition>,
}

/// A step result from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Step<O> {
    pub observation: O,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: Info,
}

/// Reset/step contract consumed by training drivers
pub trait Env {
    type Obs: Clone;
    type Act: Copy;
    type Frame;

    fn action_space(&self) -> Discrete;
    fn observation_space(&self) -> BoxSpace;

    /// Start a new episode, reseeding the environment RNG when `seed` is given
    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ResetOptions>,
    ) -> Result<(Self::Obs, Info), EnvError>;

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>, EnvError>;

    /// Produce a frame in pixel-buffer mode; `None` otherwise
    fn render(&mut self) -> Result<Option<Self::Frame>, EnvError>;

    /// Release display resources. Safe to call repeatedly.
    fn close(&mut self) -> Result<(), EnvError>;
}
