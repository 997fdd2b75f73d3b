pub mod episode_stats;

pub use episode_stats::{EpisodeRecord, EpisodeStats};
