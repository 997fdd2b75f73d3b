pub mod human;
pub mod rollout;

pub use human::HumanMode;
pub use rollout::{Policy, RandomPolicy, RolloutConfig, RolloutMode, RolloutSummary};
