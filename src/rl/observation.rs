use super::spaces::BoxSpace;
use crate::game::{GridWorldConfig, ObservationKind, WorldState};

/// Build the observation vector for the current world state
///
/// Layouts:
/// - `Position`: `[x, y]`
/// - `PositionMemoryDistance`: `[x, y, visits..., distance, previous_distance]`
///   where the visit grid is flattened as `visits[x * size + y]`
pub fn create_observation(state: &WorldState, kind: ObservationKind) -> Vec<i64> {
    let position = [i64::from(state.agent.x), i64::from(state.agent.y)];

    match kind {
        ObservationKind::Position => position.to_vec(),
        ObservationKind::PositionMemoryDistance => {
            let mut obs = Vec::with_capacity(observation_len(state.grid_size, kind));
            obs.extend_from_slice(&position);
            obs.extend(create_memory_grid(state));
            obs.push(state.distance);
            obs.push(state.previous_distance);
            obs
        }
    }
}

/// Visit counts laid out on a dense `size * size` grid
fn create_memory_grid(state: &WorldState) -> Vec<i64> {
    let size = state.grid_size;
    let mut memory = vec![0; size * size];

    for (pos, count) in state.visits.iter() {
        if pos.is_within(size) {
            memory[pos.x as usize * size + pos.y as usize] = i64::from(count);
        }
    }

    memory
}

pub fn observation_len(size: usize, kind: ObservationKind) -> usize {
    match kind {
        ObservationKind::Position => 2,
        ObservationKind::PositionMemoryDistance => 2 + size * size + 2,
    }
}

/// Declared bounds for the observations a config produces
///
/// Visit counts and distances are unbounded in principle; the upper bound
/// is whatever the config declares.
pub fn observation_space(config: &GridWorldConfig) -> BoxSpace {
    let len = observation_len(config.size, config.observation);
    let high = match config.observation {
        ObservationKind::Position => config.size.saturating_sub(1) as i64,
        ObservationKind::PositionMemoryDistance => config.observation_high,
    };
    BoxSpace::uniform(0, high, len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GridPosition, Target};

    fn state_with_visits() -> WorldState {
        let target = Target::stationary((255, 0, 0), 10, GridPosition::new(2, 3), 4);
        let mut state = WorldState::new(4, GridPosition::new(1, 0), vec![target]);
        state.visits.record(GridPosition::new(0, 0));
        state.visits.record(GridPosition::new(0, 0));
        state.visits.record(GridPosition::new(3, 1));
        state.previous_distance = 5;
        state
    }

    #[test]
    fn test_position_observation() {
        let state = state_with_visits();
        let obs = create_observation(&state, ObservationKind::Position);
        assert_eq!(obs, vec![1, 0]);
    }

    #[test]
    fn test_memory_observation_layout() {
        let state = state_with_visits();
        let obs = create_observation(&state, ObservationKind::PositionMemoryDistance);

        assert_eq!(obs.len(), 2 + 16 + 2);
        assert_eq!(&obs[..2], &[1, 0]);
        let memory = &obs[2..18];
        assert_eq!(memory[0], 2);
        assert_eq!(memory[3 * 4 + 1], 1);
        assert_eq!(memory.iter().sum::<i64>(), 3);
        assert_eq!(obs[18], 4);
        assert_eq!(obs[19], 5);
    }

    #[test]
    fn test_observation_space_matches_shape() {
        let config = GridWorldConfig::fixed(5);
        let space = observation_space(&config);
        assert_eq!(space.shape(), [2]);
        assert_eq!(space.high, vec![4, 4]);

        let config = GridWorldConfig::randomized(5);
        let space = observation_space(&config);
        assert_eq!(space.shape(), [29]);
        assert!(space.high.iter().all(|&h| h == 25));
    }
}
