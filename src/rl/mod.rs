//! Reinforcement learning interface for the find-target grid world
//!
//! Provides:
//! - The `Env` reset/step contract and its action/observation spaces
//! - `FindTargetEnv`, the grid world behind that contract
//! - Position and position+memory+distance observations
//! - Typed errors for configuration, actions and rendering

pub mod env;
pub mod environment;
pub mod error;
pub mod observation;
pub mod spaces;

pub use env::{Env, Info, ResetOptions, Step};
pub use environment::{EpisodePhase, FindTargetEnv};
pub use error::EnvError;
pub use observation::{create_observation, observation_space};
pub use spaces::{BoxSpace, Discrete};
