//! Core grid-world logic
//!
//! This module contains the simulation without any I/O or rendering dependencies.
//! It is driven by the RL environment wrapper and by the interactive front end.

pub mod action;
pub mod config;
pub mod direction;
pub mod engine;
pub mod state;
pub mod target;

// Re-export commonly used types
pub use action::{Action, ActionTable};
pub use config::{GridWorldConfig, ObservationKind, RenderMode, TargetSpec, Variant};
pub use direction::{Direction, MovementType};
pub use engine::{GridWorldEngine, StepInfo, StepResult};
pub use state::{GridPosition, VisitCounts, WorldState};
pub use target::{Rgb, StepCadence, Target};
