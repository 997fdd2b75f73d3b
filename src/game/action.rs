use serde::{Deserialize, Serialize};

use crate::rl::error::EnvError;

/// One of the four discrete moves available to the agent
///
/// The discriminant is the index used by the action space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Down = 0,
    Up = 1,
    Right = 2,
    Left = 3,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Down, Action::Up, Action::Right, Action::Left];

    /// Index of this action in the discrete action space
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl TryFrom<usize> for Action {
    type Error = EnvError;

    fn try_from(idx: usize) -> Result<Self, Self::Error> {
        match idx {
            0 => Ok(Action::Down),
            1 => Ok(Action::Up),
            2 => Ok(Action::Right),
            3 => Ok(Action::Left),
            other => Err(EnvError::InvalidAction(other)),
        }
    }
}

/// Maps action indices to grid displacements
///
/// Each environment variant owns one of these so the axis convention can
/// differ between variants without touching the movement resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTable([(i32, i32); 4]);

impl ActionTable {
    /// `{0: (0, 1), 1: (0, -1), 2: (1, 0), 3: (-1, 0)}`
    pub const STANDARD: ActionTable = ActionTable([(0, 1), (0, -1), (1, 0), (-1, 0)]);

    pub fn new(deltas: [(i32, i32); 4]) -> Self {
        Self(deltas)
    }

    /// Returns the delta (dx, dy) for an action
    pub fn delta(&self, action: Action) -> (i32, i32) {
        self.0[action.index()]
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::STANDARD
    }
}
