use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::{
    action::Action,
    config::GridWorldConfig,
    direction::MovementType,
    state::{GridPosition, WorldState},
    target::Target,
};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the move stayed on the grid
    pub moved: bool,
    /// Index of the target the agent landed on
    pub hit_target: Option<usize>,
}

/// Result of a world step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub reward: i32,
    pub terminated: bool,
    pub info: StepInfo,
}

/// Movement resolution, reward and target dynamics for the grid world
pub struct GridWorldEngine {
    config: GridWorldConfig,
    rng: StdRng,
}

impl GridWorldEngine {
    pub fn new(config: GridWorldConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose random draws are reproducible
    pub fn with_seed(config: GridWorldConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GridWorldConfig {
        &self.config
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Start a new episode
    ///
    /// `agent_start` overrides the configured spawn cell. Off-grid starts are
    /// replaced by a random cell, and the agent is resampled until it shares
    /// no cell with a target.
    pub fn reset(&mut self, agent_start: Option<GridPosition>) -> WorldState {
        let size = self.config.size;
        let targets = self.setup_targets();

        let agent = match agent_start.or(self.config.agent_start) {
            Some(pos) if pos.is_within(size) => pos,
            Some(pos) => {
                warn!(?pos, size, "agent start lies off the grid, sampling a random cell");
                self.random_position()
            }
            None => self.random_position(),
        };

        let mut state = WorldState::new(size, agent, targets);
        if Self::grid_is_covered(size, &state.targets) {
            warn!(size, "every cell holds a target, agent spawns on top of one");
        } else {
            while state.is_occupied_by_target(state.agent) {
                state.agent = self.random_position();
            }
        }
        state.distance = state.distance_to_first_target();
        state.previous_distance = state.distance;

        debug!(
            agent = ?state.agent,
            targets = state.targets.len(),
            distance = state.distance,
            "episode reset"
        );
        state
    }

    /// Execute one step of the world
    pub fn step(&mut self, state: &mut WorldState, action: Action) -> StepResult {
        state.is_new_episode = false;
        state.visits.record(state.agent);

        let (dx, dy) = self.config.action_table.delta(action);
        let candidate = state.agent.moved_by(dx, dy);
        let moved = state.is_in_bounds(candidate);

        // Previous distance is taken before the agent commits its move
        state.previous_distance = state.distance;
        if moved {
            state.agent = candidate;
        }
        state.steps += 1;

        let hit_target = state
            .targets
            .iter()
            .position(|target| target.is_hit(state.agent));

        let (reward, terminated) = match hit_target {
            Some(idx) => (state.targets[idx].reward, true),
            None => (self.config.step_penalty, false),
        };

        if !terminated {
            self.advance_targets(state);
        }

        state.distance = state.distance_to_first_target();

        StepResult {
            reward,
            terminated,
            info: StepInfo { moved, hit_target },
        }
    }

    /// Move every target one timestep, bouncing off the grid edges
    fn advance_targets(&mut self, state: &mut WorldState) {
        let size = state.grid_size;
        for (idx, target) in state.targets.iter_mut().enumerate() {
            let previous = target.position;
            target.step(&mut self.rng);

            let appears = target.movement.movement_type == MovementType::Appear;
            if !appears && !target.position.is_within(size) {
                target.update_position(previous);
                target.reverse_direction();
                debug!(
                    target = idx,
                    position = ?previous,
                    heading = ?target.movement.movement_type,
                    "target bounced off the edge"
                );
            }
        }
    }

    fn setup_targets(&mut self) -> Vec<Target> {
        let size = self.config.size;
        let specs = self.config.targets.clone();
        specs
            .iter()
            .map(|spec| {
                let fallback = self.random_position();
                spec.instantiate(size, fallback)
            })
            .collect()
    }

    fn random_position(&mut self) -> GridPosition {
        let size = self.config.size.max(1) as i32;
        GridPosition::new(self.rng.gen_range(0..size), self.rng.gen_range(0..size))
    }

    fn grid_is_covered(size: usize, targets: &[Target]) -> bool {
        let mut cells: Vec<GridPosition> = targets
            .iter()
            .map(|target| target.position)
            .filter(|pos| pos.is_within(size))
            .collect();
        cells.sort_by_key(|pos| (pos.x, pos.y));
        cells.dedup();
        cells.len() >= size * size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::TargetSpec;

    fn scenario_config() -> GridWorldConfig {
        let mut config = GridWorldConfig::fixed(5);
        config.targets = vec![TargetSpec::stationary(10, Some(GridPosition::new(2, 3)))];
        config
    }

    #[test]
    fn test_reset() {
        let mut engine = GridWorldEngine::with_seed(scenario_config(), 0);
        let state = engine.reset(None);

        assert_eq!(state.agent, GridPosition::new(0, 0));
        assert_eq!(state.targets.len(), 1);
        assert_eq!(state.distance, 5);
        assert!(state.visits.is_empty());
        assert!(state.is_new_episode);
    }

    #[test]
    fn test_shortest_path_reaches_target() {
        let mut engine = GridWorldEngine::with_seed(scenario_config(), 0);
        let mut state = engine.reset(None);

        let path = [
            Action::Right,
            Action::Right,
            Action::Down,
            Action::Down,
            Action::Down,
        ];
        let results: Vec<StepResult> = path
            .iter()
            .map(|&action| engine.step(&mut state, action))
            .collect();

        let rewards: Vec<i32> = results.iter().map(|r| r.reward).collect();
        let terminated: Vec<bool> = results.iter().map(|r| r.terminated).collect();
        assert_eq!(rewards, vec![-1, -1, -1, -1, 10]);
        assert_eq!(terminated, vec![false, false, false, false, true]);
        assert_eq!(results[4].info.hit_target, Some(0));
        assert_eq!(state.agent, GridPosition::new(2, 3));
    }

    #[test]
    fn test_wall_rejection_keeps_position() {
        let mut engine = GridWorldEngine::with_seed(scenario_config(), 0);
        let mut state = engine.reset(None);

        let result = engine.step(&mut state, Action::Up);
        assert_eq!(state.agent, GridPosition::new(0, 0));
        assert_eq!(result.reward, -1);
        assert!(!result.terminated);
        assert!(!result.info.moved);

        engine.step(&mut state, Action::Left);
        assert_eq!(state.agent, GridPosition::new(0, 0));
    }

    #[test]
    fn test_visit_recorded_before_move() {
        let mut engine = GridWorldEngine::with_seed(scenario_config(), 0);
        let mut state = engine.reset(None);

        engine.step(&mut state, Action::Right);
        assert_eq!(state.visits.get(GridPosition::new(0, 0)), 1);
        assert_eq!(state.visits.get(GridPosition::new(1, 0)), 0);
        assert!(!state.is_new_episode);
    }

    #[test]
    fn test_previous_distance_tracks_last_step() {
        let mut engine = GridWorldEngine::with_seed(scenario_config(), 0);
        let mut state = engine.reset(None);

        engine.step(&mut state, Action::Right);
        assert_eq!(state.previous_distance, 5);
        assert_eq!(state.distance, 4);

        engine.step(&mut state, Action::Up);
        assert_eq!(state.previous_distance, 4);
        assert_eq!(state.distance, 4);
    }

    #[test]
    fn test_agent_start_on_target_is_resampled() {
        let mut engine = GridWorldEngine::with_seed(scenario_config(), 3);
        for _ in 0..20 {
            let state = engine.reset(Some(GridPosition::new(2, 3)));
            assert_ne!(state.agent, GridPosition::new(2, 3));
            assert!(state.agent.is_within(5));
        }
    }

    #[test]
    fn test_same_seed_same_episode() {
        let config = GridWorldConfig::randomized(6);
        let mut a = GridWorldEngine::with_seed(config.clone(), 11);
        let mut b = GridWorldEngine::with_seed(config, 11);
        for _ in 0..5 {
            let sa = a.reset(None);
            let sb = b.reset(None);
            assert_eq!(sa.agent, sb.agent);
            assert_eq!(sa.targets[0].position, sb.targets[0].position);
        }
    }

    #[test]
    fn test_moving_target_bounces_off_edge() {
        let mut config = GridWorldConfig::fixed(3);
        config.agent_start = Some(GridPosition::new(0, 2));
        config.targets = vec![
            TargetSpec::stationary(10, Some(GridPosition::new(1, 0)))
                .with_motion(1.0, MovementType::Right),
        ];
        let mut engine = GridWorldEngine::with_seed(config, 0);
        let mut state = engine.reset(None);

        // Agent bumps into the bottom wall each step so the episode keeps going
        engine.step(&mut state, Action::Down);
        assert_eq!(state.targets[0].position, GridPosition::new(2, 0));

        engine.step(&mut state, Action::Down);
        assert_eq!(state.targets[0].position, GridPosition::new(2, 0));
        assert_eq!(state.targets[0].movement.movement_type, MovementType::Left);

        engine.step(&mut state, Action::Down);
        assert_eq!(state.targets[0].position, GridPosition::new(1, 0));
    }

    #[test]
    fn test_stationary_targets_stay_put() {
        let mut engine = GridWorldEngine::with_seed(scenario_config(), 0);
        let mut state = engine.reset(None);
        for _ in 0..10 {
            engine.step(&mut state, Action::Up);
        }
        assert_eq!(state.targets[0].position, GridPosition::new(2, 3));
    }

    #[test]
    fn test_single_cell_grid_does_not_hang() {
        let mut config = GridWorldConfig::fixed(1);
        config.targets = vec![TargetSpec::stationary(10, Some(GridPosition::new(0, 0)))];
        let mut engine = GridWorldEngine::with_seed(config, 0);
        let state = engine.reset(None);
        assert_eq!(state.agent, GridPosition::new(0, 0));
    }

    #[test]
    fn test_off_grid_start_is_replaced() {
        let mut engine = GridWorldEngine::with_seed(scenario_config(), 4);
        for _ in 0..20 {
            let state = engine.reset(Some(GridPosition::new(10, -3)));
            assert!(state.agent.is_within(5));
            assert_ne!(state.agent, GridPosition::new(2, 3));
        }
    }

    #[test]
    fn test_shipped_fixed_target_pays_its_reward() {
        let mut engine = GridWorldEngine::with_seed(GridWorldConfig::fixed(5), 0);
        let mut state = engine.reset(None);

        let mut last = None;
        for action in [
            Action::Right,
            Action::Right,
            Action::Down,
            Action::Down,
            Action::Down,
        ] {
            last = Some(engine.step(&mut state, action));
        }

        let result = last.unwrap();
        assert_eq!(result.reward, 25);
        assert!(result.terminated);
        assert_eq!(result.info.hit_target, Some(0));
    }

    #[test]
    fn test_second_target_pays_its_own_reward() {
        let mut config = GridWorldConfig::fixed(5);
        config.targets = vec![
            TargetSpec::stationary(10, Some(GridPosition::new(4, 4))),
            TargetSpec::stationary(7, Some(GridPosition::new(0, 2))),
        ];
        let mut engine = GridWorldEngine::with_seed(config, 0);
        let mut state = engine.reset(None);

        let first = engine.step(&mut state, Action::Down);
        assert_eq!(first.reward, -1);
        assert!(!first.terminated);

        let second = engine.step(&mut state, Action::Down);
        assert_eq!(second.reward, 7);
        assert!(second.terminated);
        assert_eq!(second.info.hit_target, Some(1));
        // Distance still measures the first target
        assert_eq!(state.distance, 6);
    }

    #[test]
    fn test_reset_avoids_every_target() {
        let mut config = GridWorldConfig::fixed(3);
        config.agent_start = None;
        config.targets = vec![
            TargetSpec::stationary(10, Some(GridPosition::new(0, 0))),
            TargetSpec::stationary(5, Some(GridPosition::new(1, 1))),
            TargetSpec::stationary(5, Some(GridPosition::new(2, 2))),
            TargetSpec::stationary(5, None),
        ];
        let mut engine = GridWorldEngine::with_seed(config, 8);
        for _ in 0..100 {
            let state = engine.reset(None);
            assert!(!state.is_occupied_by_target(state.agent));
            assert!(state.agent.is_within(3));
        }
    }

    #[test]
    fn test_target_moving_onto_agent_pays_on_next_step() {
        let mut config = GridWorldConfig::fixed(3);
        config.targets = vec![
            TargetSpec::stationary(10, Some(GridPosition::new(2, 0)))
                .with_motion(1.0, MovementType::Left),
        ];
        let mut engine = GridWorldEngine::with_seed(config, 0);
        let mut state = engine.reset(None);

        engine.step(&mut state, Action::Up);
        assert_eq!(state.targets[0].position, GridPosition::new(1, 0));

        // The target arrives after the hit check
        let arrival = engine.step(&mut state, Action::Up);
        assert_eq!(state.targets[0].position, state.agent);
        assert_eq!(arrival.reward, -1);
        assert!(!arrival.terminated);

        let next = engine.step(&mut state, Action::Up);
        assert_eq!(next.reward, 10);
        assert!(next.terminated);
    }
}
