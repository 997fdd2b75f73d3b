//! Find Target - a grid-world reinforcement learning environment
//!
//! This library provides:
//! - World rules: agent movement, targets, rewards (game module)
//! - The reset/step environment contract and observations (rl module)
//! - Pixel-buffer and terminal rendering (render module)
//! - Keyboard play and a headless rollout driver (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
