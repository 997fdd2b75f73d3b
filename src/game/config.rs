use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::action::ActionTable;
use super::direction::MovementType;
use super::state::GridPosition;
use super::target::{Rgb, Target};
use crate::rl::error::EnvError;

/// Preset environment layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Agent starts in the corner, one stationary target at (2, 3)
    Fixed,
    /// Target and agent are placed uniformly at random every episode
    Randomized,
}

/// Features emitted in each observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    /// Agent (x, y) only
    Position,
    /// Agent (x, y), flattened visit-count grid, current and previous distance
    PositionMemoryDistance,
}

/// How frames are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Draw to the terminal after every reset/step, throttled to `render_fps`
    Human,
    /// Return an RGB pixel buffer from `render()`
    RgbArray,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Human => "human",
            RenderMode::RgbArray => "rgb_array",
        }
    }
}

impl FromStr for RenderMode {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(RenderMode::Human),
            "rgb_array" => Ok(RenderMode::RgbArray),
            other => Err(EnvError::UnsupportedRenderMode(other.to_string())),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blueprint for a target, instantiated on every reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub color: Rgb,
    pub reward: i32,
    /// Fixed spawn cell, or `None` to sample one uniformly each episode
    pub position: Option<GridPosition>,
    #[serde(default)]
    pub velocity: f64,
    #[serde(default = "default_movement")]
    pub movement: MovementType,
    #[serde(default)]
    pub random_start: bool,
}

fn default_movement() -> MovementType {
    MovementType::None
}

impl TargetSpec {
    /// A red stationary target
    pub fn stationary(reward: i32, position: Option<GridPosition>) -> Self {
        Self {
            color: (255, 0, 0),
            reward,
            position,
            velocity: 0.0,
            movement: MovementType::None,
            random_start: false,
        }
    }

    pub fn with_motion(mut self, velocity: f64, movement: MovementType) -> Self {
        self.velocity = velocity;
        self.movement = movement;
        self
    }

    /// Build the target, using `fallback` when no fixed position is set
    pub fn instantiate(&self, grid_size: usize, fallback: GridPosition) -> Target {
        Target::new(
            self.color,
            self.reward,
            self.position.unwrap_or(fallback),
            self.velocity,
            self.movement,
            self.random_start,
            grid_size,
        )
    }
}

/// Configuration for the grid world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridWorldConfig {
    /// Cells per side of the square grid
    pub size: usize,
    pub observation: ObservationKind,
    /// Declared upper bound of every observation feature
    pub observation_high: i64,
    pub render_mode: Option<RenderMode>,
    pub render_fps: u32,
    /// Side length of the rendered frame in pixels
    pub window_size: u32,
    /// Agent spawn cell, or `None` to sample one uniformly
    pub agent_start: Option<GridPosition>,
    pub targets: Vec<TargetSpec>,
    /// Reward for every step that does not reach a target
    pub step_penalty: i32,
    pub action_table: ActionTable,
}

impl Default for GridWorldConfig {
    fn default() -> Self {
        Self::fixed(5)
    }
}

impl GridWorldConfig {
    /// Corner start, one stationary target at (2, 3) worth 25
    pub fn fixed(size: usize) -> Self {
        Self {
            size,
            observation: ObservationKind::Position,
            observation_high: size.saturating_sub(1) as i64,
            render_mode: None,
            render_fps: 4,
            window_size: 512,
            agent_start: Some(GridPosition::new(0, 0)),
            targets: vec![TargetSpec::stationary(25, Some(GridPosition::new(2, 3)))],
            step_penalty: -1,
            action_table: ActionTable::STANDARD,
        }
    }

    /// Random start, one random stationary target worth 10, memory observations
    pub fn randomized(size: usize) -> Self {
        Self {
            size,
            observation: ObservationKind::PositionMemoryDistance,
            observation_high: 25,
            render_mode: None,
            render_fps: 4,
            window_size: 512,
            agent_start: None,
            targets: vec![TargetSpec::stationary(10, None)],
            step_penalty: -1,
            action_table: ActionTable::STANDARD,
        }
    }

    pub fn for_variant(variant: Variant, size: usize) -> Self {
        match variant {
            Variant::Fixed => Self::fixed(size),
            Variant::Randomized => Self::randomized(size),
        }
    }

    pub fn with_render_mode(mut self, render_mode: Option<RenderMode>) -> Self {
        self.render_mode = render_mode;
        self
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, EnvError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration describes a playable world
    pub fn validate(&self) -> Result<(), EnvError> {
        if self.size == 0 {
            return Err(EnvError::InvalidConfig("size must be at least 1".to_string()));
        }

        if i32::try_from(self.size).is_err() {
            return Err(EnvError::InvalidConfig(format!(
                "size {} does not fit grid coordinates",
                self.size
            )));
        }

        if self.render_fps == 0 {
            return Err(EnvError::InvalidConfig(
                "render_fps must be positive".to_string(),
            ));
        }

        if self.window_size == 0 {
            return Err(EnvError::InvalidConfig(
                "window_size must be positive".to_string(),
            ));
        }

        if self.observation_high < 0 {
            return Err(EnvError::InvalidConfig(format!(
                "observation_high must be non-negative, got {}",
                self.observation_high
            )));
        }

        if self.targets.is_empty() {
            return Err(EnvError::InvalidConfig(
                "at least one target is required".to_string(),
            ));
        }

        if let Some(start) = self.agent_start {
            if !start.is_within(self.size) {
                return Err(EnvError::InvalidConfig(format!(
                    "agent_start ({}, {}) lies outside a {}x{} grid",
                    start.x, start.y, self.size, self.size
                )));
            }
        }

        for (i, spec) in self.targets.iter().enumerate() {
            if let Some(pos) = spec.position {
                if !pos.is_within(self.size) {
                    return Err(EnvError::InvalidConfig(format!(
                        "target {} at ({}, {}) lies outside a {}x{} grid",
                        i, pos.x, pos.y, self.size, self.size
                    )));
                }
            }
            if spec.velocity.is_nan() {
                return Err(EnvError::InvalidConfig(format!(
                    "target {} has a NaN velocity",
                    i
                )));
            }
            let max_velocity = (2 * self.size) as f64;
            if spec.velocity.is_finite() && spec.velocity > max_velocity {
                return Err(EnvError::InvalidConfig(format!(
                    "target {} velocity {} exceeds {} cells per step",
                    i, spec.velocity, max_velocity
                )));
            }
        }

        Ok(())
    }
}
