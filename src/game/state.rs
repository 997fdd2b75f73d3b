use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::target::Target;

/// A cell on the grid
///
/// Targets may sit outside the grid (the hidden sentinel), so coordinates
/// are signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    /// Where an `Appear` target goes while it is hidden
    pub const HIDDEN: GridPosition = GridPosition { x: -1, y: -1 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Sum of absolute coordinate differences
    pub fn manhattan_distance(&self, other: GridPosition) -> i64 {
        (i64::from(self.x) - i64::from(other.x)).abs()
            + (i64::from(self.y) - i64::from(other.y)).abs()
    }

    /// Check if the position lies within a `size` x `size` grid
    pub fn is_within(&self, size: usize) -> bool {
        let size = size as i64;
        (0..size).contains(&i64::from(self.x)) && (0..size).contains(&i64::from(self.y))
    }
}

/// Per-episode tally of how often the agent occupied each cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitCounts {
    counts: HashMap<GridPosition, u32>,
}

impl VisitCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more visit, starting at 1 for a fresh cell
    pub fn record(&mut self, pos: GridPosition) -> u32 {
        let count = self.counts.entry(pos).or_insert(0);
        *count += 1;
        *count
    }

    pub fn get(&self, pos: GridPosition) -> u32 {
        self.counts.get(&pos).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// Number of distinct cells visited
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridPosition, u32)> + '_ {
        self.counts.iter().map(|(&pos, &count)| (pos, count))
    }
}

/// Complete world state of one episode
#[derive(Debug, Clone)]
pub struct WorldState {
    pub grid_size: usize,
    pub agent: GridPosition,
    pub targets: Vec<Target>,
    pub visits: VisitCounts,
    /// Set by reset, cleared by the first step; the renderer shows a black frame
    pub is_new_episode: bool,
    /// Manhattan distance from the agent to the first target
    pub distance: i64,
    pub previous_distance: i64,
    pub steps: u32,
}

impl WorldState {
    pub fn new(grid_size: usize, agent: GridPosition, targets: Vec<Target>) -> Self {
        let mut state = Self {
            grid_size,
            agent,
            targets,
            visits: VisitCounts::new(),
            is_new_episode: true,
            distance: 0,
            previous_distance: 0,
            steps: 0,
        };
        state.distance = state.distance_to_first_target();
        state.previous_distance = state.distance;
        state
    }

    pub fn is_in_bounds(&self, pos: GridPosition) -> bool {
        pos.is_within(self.grid_size)
    }

    /// Check if any target currently sits on `pos`
    pub fn is_occupied_by_target(&self, pos: GridPosition) -> bool {
        self.targets.iter().any(|target| target.is_hit(pos))
    }

    pub fn distance_to_first_target(&self) -> i64 {
        self.targets
            .first()
            .map(|target| self.agent.manhattan_distance(target.position))
            .unwrap_or(0)
    }
}
