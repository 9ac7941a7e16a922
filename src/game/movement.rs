//! # Movement Attributes
//!
//! The player's physical limits, expressed in tiles.

use serde::{Deserialize, Serialize};

/// What the player can physically do.
///
/// Generation and verification must be handed the same instance: this is the
/// only definition of "traversable" in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementAttributes {
    /// Footprint width in tiles
    pub player_width: i32,
    /// Footprint height in tiles
    pub player_height: i32,
    /// Tiles the player can rise in a single jump
    pub max_jump_height: i32,
    /// Tiles the player can travel horizontally in a single jump
    pub max_jump_distance: i32,
    /// Minimum clear height of a carved corridor
    pub min_corridor_height: i32,
}

impl MovementAttributes {
    /// Creates movement attributes with explicit jump limits and the default footprint.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomforge::MovementAttributes;
    ///
    /// let attrs = MovementAttributes::with_jump(3, 5);
    /// assert_eq!(attrs.max_jump_height, 3);
    /// assert_eq!(attrs.max_jump_distance, 5);
    /// assert_eq!(attrs.player_height, 2);
    /// ```
    pub fn with_jump(max_jump_height: i32, max_jump_distance: i32) -> Self {
        Self {
            max_jump_height,
            max_jump_distance,
            ..Self::default()
        }
    }

    /// Width and height of the block carved around each corridor step.
    pub fn corridor_block(&self, min_corridor_width: i32, min_corridor_height: i32) -> (i32, i32) {
        (
            min_corridor_width.max(self.player_width),
            min_corridor_height
                .max(self.min_corridor_height)
                .max(self.player_height),
        )
    }
}

impl Default for MovementAttributes {
    fn default() -> Self {
        Self {
            player_width: 1,
            player_height: 2,
            max_jump_height: 4,
            max_jump_distance: 6,
            min_corridor_height: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_attributes() {
        let attrs = MovementAttributes::default();
        assert_eq!(attrs.player_width, 1);
        assert_eq!(attrs.player_height, 2);
        assert_eq!(attrs.max_jump_height, 4);
        assert_eq!(attrs.max_jump_distance, 6);
    }

    #[test]
    fn test_corridor_block_takes_larger_dimension() {
        let attrs = MovementAttributes {
            player_width: 3,
            player_height: 4,
            ..Default::default()
        };
        assert_eq!(attrs.corridor_block(2, 2), (3, 4));

        let small = MovementAttributes::default();
        assert_eq!(small.corridor_block(2, 3), (2, 3));
    }
}
