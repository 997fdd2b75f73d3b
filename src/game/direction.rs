use serde::{Deserialize, Serialize};

/// How a target moves across the grid
///
/// `Appear` does not translate the target; it toggles its visibility (or
/// relocates it when the target spawns randomly).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    None,
    Up,
    Down,
    Left,
    Right,
    DiagonalLeftDown,
    DiagonalLeftUp,
    DiagonalRightDown,
    DiagonalRightUp,
    Appear,
}

impl MovementType {
    /// Every movement type, in declaration order
    pub const ALL: [MovementType; 10] = [
        MovementType::None,
        MovementType::Up,
        MovementType::Down,
        MovementType::Left,
        MovementType::Right,
        MovementType::DiagonalLeftDown,
        MovementType::DiagonalLeftUp,
        MovementType::DiagonalRightDown,
        MovementType::DiagonalRightUp,
        MovementType::Appear,
    ];

    /// Returns the displacement (dx, dy) for one atomic step
    ///
    /// The y axis grows downwards, matching screen coordinates.
    pub fn movement_vector(&self) -> (i32, i32) {
        match self {
            MovementType::Up => (0, -1),
            MovementType::Down => (0, 1),
            MovementType::Right => (1, 0),
            MovementType::Left => (-1, 0),
            MovementType::DiagonalLeftUp => (-1, -1),
            MovementType::DiagonalLeftDown => (-1, 1),
            MovementType::DiagonalRightUp => (1, -1),
            MovementType::DiagonalRightDown => (1, 1),
            MovementType::None | MovementType::Appear => (0, 0),
        }
    }

    /// Returns the movement type pointing the opposite way
    pub fn reverse(&self) -> MovementType {
        match self {
            MovementType::Up => MovementType::Down,
            MovementType::Down => MovementType::Up,
            MovementType::Left => MovementType::Right,
            MovementType::Right => MovementType::Left,
            MovementType::DiagonalLeftDown => MovementType::DiagonalRightUp,
            MovementType::DiagonalLeftUp => MovementType::DiagonalRightDown,
            MovementType::DiagonalRightDown => MovementType::DiagonalLeftUp,
            MovementType::DiagonalRightUp => MovementType::DiagonalLeftDown,
            MovementType::None | MovementType::Appear => MovementType::None,
        }
    }
}

/// Current heading of a target
///
/// Two directions are equal when they carry the same movement type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    pub movement_type: MovementType,
}

impl Direction {
    pub fn new(movement_type: MovementType) -> Self {
        Self { movement_type }
    }

    /// Flip the heading in place
    pub fn reverse(&mut self) {
        self.movement_type = self.movement_type.reverse();
    }

    pub fn movement_vector(&self) -> (i32, i32) {
        self.movement_type.movement_vector()
    }
}

impl From<MovementType> for Direction {
    fn from(movement_type: MovementType) -> Self {
        Direction::new(movement_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_vectors() {
        assert_eq!(MovementType::Up.movement_vector(), (0, -1));
        assert_eq!(MovementType::Down.movement_vector(), (0, 1));
        assert_eq!(MovementType::Left.movement_vector(), (-1, 0));
        assert_eq!(MovementType::Right.movement_vector(), (1, 0));
        assert_eq!(MovementType::DiagonalLeftUp.movement_vector(), (-1, -1));
        assert_eq!(MovementType::DiagonalLeftDown.movement_vector(), (-1, 1));
        assert_eq!(MovementType::DiagonalRightUp.movement_vector(), (1, -1));
        assert_eq!(MovementType::DiagonalRightDown.movement_vector(), (1, 1));
        assert_eq!(MovementType::None.movement_vector(), (0, 0));
        assert_eq!(MovementType::Appear.movement_vector(), (0, 0));
    }

    #[test]
    fn test_vectors_are_unit_steps() {
        for movement in MovementType::ALL {
            let (dx, dy) = movement.movement_vector();
            assert!((-1..=1).contains(&dx));
            assert!((-1..=1).contains(&dy));
        }
    }

    #[test]
    fn test_reverse_pairs() {
        assert_eq!(MovementType::Up.reverse(), MovementType::Down);
        assert_eq!(MovementType::Left.reverse(), MovementType::Right);
        assert_eq!(
            MovementType::DiagonalLeftDown.reverse(),
            MovementType::DiagonalRightUp
        );
        assert_eq!(
            MovementType::DiagonalLeftUp.reverse(),
            MovementType::DiagonalRightDown
        );
        assert_eq!(MovementType::Appear.reverse(), MovementType::None);
        assert_eq!(MovementType::None.reverse(), MovementType::None);
    }

    #[test]
    fn test_reverse_is_involutive() {
        for movement in MovementType::ALL {
            if movement == MovementType::Appear {
                // Appear collapses to None on the first reversal
                continue;
            }
            assert_eq!(movement.reverse().reverse(), movement);
        }
    }

    #[test]
    fn test_reverse_negates_vector() {
        for movement in MovementType::ALL {
            let (dx, dy) = movement.movement_vector();
            assert_eq!(movement.reverse().movement_vector(), (-dx, -dy));
        }
    }

    #[test]
    fn test_direction_equality_is_structural() {
        let a = Direction::new(MovementType::Left);
        let b = Direction::from(MovementType::Left);
        assert_eq!(a, b);
        assert_ne!(a, Direction::new(MovementType::Right));
    }

    #[test]
    fn test_direction_reverse_in_place() {
        let mut direction = Direction::new(MovementType::DiagonalRightDown);
        direction.reverse();
        assert_eq!(direction.movement_type, MovementType::DiagonalLeftUp);
        assert_eq!(direction.movement_vector(), (-1, -1));
    }
}
