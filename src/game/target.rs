use rand::Rng;
use serde::{Deserialize, Serialize};

use super::direction::{Direction, MovementType};
use super::state::GridPosition;

/// RGB color tag used by the renderer
pub type Rgb = (u8, u8, u8);

/// Velocity-gated stepping state
///
/// A target either moves `steps_per_timestep` cells every timestep
/// (velocity >= 1) or one cell every `round(1 / velocity)` timesteps.
/// Rounding breaks ties towards the even neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCadence {
    steps_per_timestep: u32,
    steps_until_next_step: u32,
    /// Value the countdown is reset to after each burst
    wait_after_burst: u32,
}

impl StepCadence {
    pub fn from_velocity(velocity: f64) -> Self {
        if velocity.is_nan() || velocity <= 0.0 {
            return Self {
                steps_per_timestep: 0,
                steps_until_next_step: 0,
                wait_after_burst: 0,
            };
        }

        let velocity = if velocity.is_infinite() { 1.0 } else { velocity };

        if velocity >= 1.0 {
            let steps = velocity.round_ties_even() as u32;
            Self {
                steps_per_timestep: steps,
                steps_until_next_step: 0,
                wait_after_burst: 0,
            }
        } else {
            let wait = ((1.0 / velocity).round_ties_even() as u32).saturating_sub(1);
            Self {
                steps_per_timestep: 1,
                steps_until_next_step: wait,
                wait_after_burst: wait,
            }
        }
    }

    pub fn steps_per_timestep(&self) -> u32 {
        self.steps_per_timestep
    }

    pub fn steps_until_next_step(&self) -> u32 {
        self.steps_until_next_step
    }

    /// Advance one timestep and return the size of the movement burst
    ///
    /// The countdown is only re-armed when at least one atomic step runs, so
    /// a stationary cadence stays at zero forever and keeps bursting nothing.
    pub fn tick(&mut self) -> u32 {
        if self.steps_until_next_step == 0 {
            if self.steps_per_timestep > 0 {
                self.steps_until_next_step = self.wait_after_burst;
            }
            self.steps_per_timestep
        } else {
            self.steps_until_next_step -= 1;
            0
        }
    }
}

/// Something the agent is looking for
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub color: Rgb,
    pub reward: i32,
    pub position: GridPosition,
    pub velocity: f64,
    pub movement: Direction,
    /// Appear targets respawn anywhere on the grid instead of blinking in place
    pub random_start: bool,
    original_position: GridPosition,
    grid_size: usize,
    cadence: StepCadence,
}

impl Target {
    pub fn new(
        color: Rgb,
        reward: i32,
        position: GridPosition,
        velocity: f64,
        movement: MovementType,
        random_start: bool,
        grid_size: usize,
    ) -> Self {
        Self {
            color,
            reward,
            position,
            velocity,
            movement: Direction::new(movement),
            random_start,
            original_position: position,
            grid_size,
            cadence: StepCadence::from_velocity(velocity),
        }
    }

    /// A target that never moves
    pub fn stationary(color: Rgb, reward: i32, position: GridPosition, grid_size: usize) -> Self {
        Self::new(
            color,
            reward,
            position,
            0.0,
            MovementType::None,
            false,
            grid_size,
        )
    }

    /// Black, worthless, parked in the corner
    pub fn dummy() -> Self {
        Self::stationary((0, 0, 0), 0, GridPosition::new(0, 0), 1)
    }

    pub fn original_position(&self) -> GridPosition {
        self.original_position
    }

    pub fn cadence(&self) -> &StepCadence {
        &self.cadence
    }

    /// Move the target for one timestep
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let burst = self.cadence.tick();
        for _ in 0..burst {
            self.atomic_step(rng);
        }
    }

    fn atomic_step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.movement.movement_type == MovementType::Appear {
            if self.random_start {
                self.set_random_position(rng);
            } else if self.position == self.original_position {
                self.position = GridPosition::HIDDEN;
            } else {
                self.position = self.original_position;
            }
        } else {
            let (dx, dy) = self.movement.movement_vector();
            self.position = self.position.moved_by(dx, dy);
        }
    }

    fn set_random_position<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let size = self.grid_size.max(1) as i32;
        self.position = GridPosition::new(rng.gen_range(0..size), rng.gen_range(0..size));
    }

    pub fn reverse_direction(&mut self) {
        self.movement.reverse();
    }

    /// Relocate without touching the cadence
    pub fn update_position(&mut self, new_position: GridPosition) {
        self.position = new_position;
    }

    pub fn is_hit(&self, pos: GridPosition) -> bool {
        self.position == pos
    }
}
