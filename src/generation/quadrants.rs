//! Corner quadrants used to spread the spawn point and exits across a room.
//!
//! The layout phase and door placement share these bounds, so a spawn chosen
//! inside a quadrant is always classified back into that same quadrant.

use crate::config::QUADRANT_RADIUS;
use crate::Position;
use rand::seq::SliceRandom;
use rand::Rng;

/// One of the four corner regions of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// All quadrants in classification order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    fn is_left(self) -> bool {
        matches!(self, Quadrant::TopLeft | Quadrant::BottomLeft)
    }

    fn is_top(self) -> bool {
        matches!(self, Quadrant::TopLeft | Quadrant::TopRight)
    }
}

/// Rectangle covered by a quadrant: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadrantBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl QuadrantBounds {
    /// Checks whether a position lies inside these bounds.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x
            && pos.y >= self.y
            && pos.x < self.x + self.width
            && pos.y < self.y + self.height
    }

    /// Returns false if the bounds cover no tile.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Bounds of a single quadrant of a room of `room_size`.
///
/// Each quadrant spans at most `QUADRANT_RADIUS` tiles per axis, stays off the
/// outer border and never crosses the room's center line.
pub fn quadrant_bounds(quadrant: Quadrant, room_size: (i32, i32)) -> QuadrantBounds {
    let (width, height) = room_size;

    let (x, w) = if quadrant.is_left() {
        (1, QUADRANT_RADIUS.min(width / 2 - 1))
    } else {
        let x = (width / 2 + 1).max(width - QUADRANT_RADIUS - 1);
        (x, QUADRANT_RADIUS.min(width - x - 1))
    };

    let (y, h) = if quadrant.is_top() {
        (1, QUADRANT_RADIUS.min(height / 2 - 1))
    } else {
        let y = (height / 2 + 1).max(height - QUADRANT_RADIUS - 1);
        (y, QUADRANT_RADIUS.min(height - y - 1))
    };

    QuadrantBounds {
        x,
        y,
        width: w,
        height: h,
    }
}

/// Bounds of all four quadrants of a room.
pub fn get_room_quadrants(room_size: (i32, i32)) -> [(Quadrant, QuadrantBounds); 4] {
    Quadrant::ALL.map(|quadrant| (quadrant, quadrant_bounds(quadrant, room_size)))
}

/// Classifies a position into a quadrant.
///
/// Positions inside a quadrant's bounds belong to it; anything else falls back
/// to the room half it lies in.
///
/// # Examples
///
/// ```
/// use roomforge::{get_spawn_quadrant, Position, Quadrant};
///
/// assert_eq!(get_spawn_quadrant(Position::new(5, 5), (20, 20)), Quadrant::TopLeft);
/// assert_eq!(get_spawn_quadrant(Position::new(15, 16), (20, 20)), Quadrant::BottomRight);
/// ```
pub fn get_spawn_quadrant(pos: Position, room_size: (i32, i32)) -> Quadrant {
    if let Some((quadrant, _)) = get_room_quadrants(room_size)
        .into_iter()
        .find(|(_, bounds)| bounds.contains(pos))
    {
        return quadrant;
    }

    let left = pos.x < room_size.0 / 2;
    let top = pos.y < room_size.1 / 2;
    match (left, top) {
        (true, true) => Quadrant::TopLeft,
        (false, true) => Quadrant::TopRight,
        (true, false) => Quadrant::BottomLeft,
        (false, false) => Quadrant::BottomRight,
    }
}

/// The three quadrants other than the spawn quadrant.
pub fn get_available_quadrants(spawn_quadrant: Quadrant) -> Vec<Quadrant> {
    Quadrant::ALL
        .into_iter()
        .filter(|&quadrant| quadrant != spawn_quadrant)
        .collect()
}

/// The non-spawn quadrants in a random priority order.
pub fn randomly_assign_exit_quadrants<R: Rng + ?Sized>(
    spawn_quadrant: Quadrant,
    rng: &mut R,
) -> Vec<Quadrant> {
    let mut quadrants = get_available_quadrants(spawn_quadrant);
    quadrants.shuffle(rng);
    quadrants
}
