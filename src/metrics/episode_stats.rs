//! Rolling episode statistics for rollout drivers
//!
//! Tracks returns, lengths and how often the target was reached over a
//! window of recent episodes, plus lifetime totals.

use std::collections::VecDeque;

use serde::Serialize;

/// Outcome of one finished (or cut off) episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpisodeRecord {
    pub total_reward: f32,
    pub length: u32,
    /// Whether the episode ended on a target rather than at the step cap
    pub reached_target: bool,
}

/// Episode statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use find_target::metrics::{EpisodeRecord, EpisodeStats};
///
/// let mut stats = EpisodeStats::new(100);
/// stats.record(EpisodeRecord { total_reward: 6.0, length: 5, reached_target: true });
///
/// assert_eq!(stats.total_episodes(), 1);
/// assert_eq!(stats.success_rate(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct EpisodeStats {
    recent: VecDeque<EpisodeRecord>,
    total_episodes: usize,
    total_steps: u64,
    best_reward: Option<f32>,
    window_size: usize,
}

impl EpisodeStats {
    /// Create a tracker keeping the last `window_size` episodes
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            recent: VecDeque::with_capacity(window_size),
            total_episodes: 0,
            total_steps: 0,
            best_reward: None,
            window_size,
        }
    }

    pub fn record(&mut self, episode: EpisodeRecord) {
        if self.recent.len() >= self.window_size {
            self.recent.pop_front();
        }
        self.recent.push_back(episode);

        self.total_episodes += 1;
        self.total_steps += u64::from(episode.length);
        self.best_reward = Some(match self.best_reward {
            Some(best) => best.max(episode.total_reward),
            None => episode.total_reward,
        });
    }

    /// Mean return over the rolling window, 0.0 when empty
    pub fn mean_reward(&self) -> f32 {
        self.mean_of(|episode| episode.total_reward)
    }

    pub fn mean_length(&self) -> f32 {
        self.mean_of(|episode| episode.length as f32)
    }

    /// Fraction of windowed episodes that reached a target
    pub fn success_rate(&self) -> f32 {
        self.mean_of(|episode| if episode.reached_target { 1.0 } else { 0.0 })
    }

    pub fn best_reward(&self) -> Option<f32> {
        self.best_reward
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line summary for log output
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Len: {:.1} | Success: {:.0}%",
            self.total_episodes,
            self.total_steps,
            self.mean_reward(),
            self.mean_length(),
            self.success_rate() * 100.0,
        )
    }

    fn mean_of(&self, value: impl Fn(&EpisodeRecord) -> f32) -> f32 {
        if self.recent.is_empty() {
            0.0
        } else {
            self.recent.iter().map(value).sum::<f32>() / self.recent.len() as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(total_reward: f32, length: u32, reached_target: bool) -> EpisodeRecord {
        EpisodeRecord {
            total_reward,
            length,
            reached_target,
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = EpisodeStats::new(10);
        assert_eq!(stats.total_episodes(), 0);
        assert_eq!(stats.mean_reward(), 0.0);
        assert_eq!(stats.mean_length(), 0.0);
        assert_eq!(stats.success_rate(), 0.0);
        assert_eq!(stats.best_reward(), None);
    }

    #[test]
    fn test_record_episode() {
        let mut stats = EpisodeStats::new(10);
        stats.record(episode(6.0, 5, true));
        stats.record(episode(-100.0, 100, false));

        assert_eq!(stats.total_episodes(), 2);
        assert_eq!(stats.total_steps(), 105);
        assert!((stats.mean_reward() + 47.0).abs() < 1e-5);
        assert!((stats.mean_length() - 52.5).abs() < 1e-5);
        assert!((stats.success_rate() - 0.5).abs() < 1e-5);
        assert_eq!(stats.best_reward(), Some(6.0));
    }

    #[test]
    fn test_rolling_window_evicts_oldest() {
        let mut stats = EpisodeStats::new(3);
        stats.record(episode(1.0, 10, false));
        stats.record(episode(2.0, 20, true));
        stats.record(episode(3.0, 30, true));
        assert!((stats.mean_reward() - 2.0).abs() < 1e-5);

        stats.record(episode(4.0, 40, true));
        assert_eq!(stats.total_episodes(), 4);
        assert!((stats.mean_reward() - 3.0).abs() < 1e-5);
        assert_eq!(stats.success_rate(), 1.0);
        // Totals are lifetime, not windowed
        assert_eq!(stats.total_steps(), 100);
    }

    #[test]
    fn test_zero_window_is_clamped() {
        let mut stats = EpisodeStats::new(0);
        stats.record(episode(1.0, 1, true));
        assert_eq!(stats.window_size(), 1);
        assert_eq!(stats.mean_reward(), 1.0);
    }

    #[test]
    fn test_format_summary() {
        let mut stats = EpisodeStats::new(10);
        stats.record(episode(6.0, 5, true));

        let summary = stats.format_summary();
        assert!(summary.contains("Episodes: 1"));
        assert!(summary.contains("Steps: 5"));
        assert!(summary.contains("Reward: 6.00"));
        assert!(summary.contains("Success: 100%"));
    }
}
