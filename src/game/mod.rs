//! # Game Module
//!
//! World value types shared by every generation phase.
//!
//! This module contains the building blocks the generator produces and the
//! runtime consumes:
//! - Coordinates and directions on the tile grid
//! - The tile vocabulary and its exclusion flags
//! - Rooms with their sparse grid, doors and spawn areas
//! - The player movement capability descriptor
//! - Level graphs composed of rooms and door links

pub mod level;
pub mod movement;
pub mod room;
pub mod tile;

pub use level::*;
pub use movement::*;
pub use room::*;
pub use tile::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a 2D coordinate on a room grid.
///
/// `y` grows downwards, so the tile directly below `(x, y)` is `(x, y + 1)`.
///
/// # Examples
///
/// ```
/// use roomforge::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// assert_eq!(pos.below(), Position::new(10, 6));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomforge::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Returns the tile directly below this one.
    pub fn below(self) -> Position {
        Position::new(self.x, self.y + 1)
    }

    /// Returns only the 4 cardinal adjacent positions (no diagonals).
    pub fn cardinal_adjacent_positions(self) -> [Position; 4] {
        [
            self + Direction::North.to_delta(),
            self + Direction::West.to_delta(),
            self + Direction::East.to_delta(),
            self + Direction::South.to_delta(),
        ]
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal directions on the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomforge::{Direction, Position};
    ///
    /// let delta = Direction::North.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
        }
    }

    /// Whether this direction moves along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }
}

/// Identifier of an entity occupying a tile.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_manhattan_distance() {
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(3, 4);
        assert_eq!(pos1.manhattan_distance(pos2), 7);
        assert_eq!(pos2.manhattan_distance(pos1), 7);
    }

    #[test]
    fn test_position_cardinal_adjacent() {
        let pos = Position::new(5, 5);
        let adjacent = pos.cardinal_adjacent_positions();
        assert_eq!(adjacent.len(), 4);
        assert!(adjacent.contains(&Position::new(5, 4))); // North
        assert!(adjacent.contains(&Position::new(4, 5))); // West
        assert!(adjacent.contains(&Position::new(5, 6))); // South
        assert!(!adjacent.contains(&Position::new(4, 4))); // No diagonal
    }

    #[test]
    fn test_position_ordering_is_column_major() {
        let mut positions = vec![
            Position::new(2, 0),
            Position::new(1, 5),
            Position::new(1, 2),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![Position::new(1, 2), Position::new(1, 5), Position::new(2, 0)]
        );
    }

    #[test]
    fn test_direction_deltas() {
        assert_eq!(Direction::North.to_delta(), Position::new(0, -1));
        assert_eq!(Direction::East.to_delta(), Position::new(1, 0));
        assert!(Direction::West.is_horizontal());
        assert!(!Direction::South.is_horizontal());
    }

    #[test]
    fn test_entity_id_uniqueness() {
        assert_ne!(new_entity_id(), new_entity_id());
    }
}
