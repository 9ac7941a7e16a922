//! # Grid Mathematics
//!
//! Integer geometry helpers shared by the repair corridors and the jump-arc check.

use crate::Position;

/// Rasterizes the straight line between two positions, both endpoints included.
///
/// Standard integer Bresenham; the first element is always `start` and the
/// last is always `end`.
///
/// # Examples
///
/// ```
/// use roomforge::{bresenham_line, Position};
///
/// let line = bresenham_line(Position::new(0, 0), Position::new(3, 1));
/// assert_eq!(line.first(), Some(&Position::new(0, 0)));
/// assert_eq!(line.last(), Some(&Position::new(3, 1)));
/// assert_eq!(line.len(), 4);
/// ```
pub fn bresenham_line(start: Position, end: Position) -> Vec<Position> {
    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let sx = if start.x < end.x { 1 } else { -1 };
    let sy = if start.y < end.y { 1 } else { -1 };

    let mut points = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    let mut x = start.x;
    let mut y = start.y;
    let mut err = dx + dy;

    loop {
        points.push(Position::new(x, y));
        if x == end.x && y == end.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }

    points
}

/// Picks up to `count` evenly spaced items, starting with the first.
pub fn evenly_spaced<T: Copy>(items: &[T], count: usize) -> Vec<T> {
    if items.is_empty() || count == 0 {
        return Vec::new();
    }
    let step = (items.len() / count).max(1);
    items.iter().step_by(step).take(count).copied().collect()
}

/// Offsets covering a block of `size` tiles centered on zero.
///
/// Even sizes lean towards negative offsets, so a block of 2 covers `-1..=0`.
pub fn centered_offsets(size: i32) -> std::ops::RangeInclusive<i32> {
    let low = -(size / 2);
    low..=(low + size - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_single_point() {
        let p = Position::new(4, 4);
        assert_eq!(bresenham_line(p, p), vec![p]);
    }

    #[test]
    fn test_line_horizontal_and_vertical() {
        let line = bresenham_line(Position::new(5, 2), Position::new(1, 2));
        assert_eq!(line.len(), 5);
        assert!(line.iter().all(|p| p.y == 2));

        let line = bresenham_line(Position::new(0, 0), Position::new(0, -3));
        assert_eq!(
            line,
            vec![
                Position::new(0, 0),
                Position::new(0, -1),
                Position::new(0, -2),
                Position::new(0, -3)
            ]
        );
    }

    #[test]
    fn test_line_is_eight_connected() {
        let line = bresenham_line(Position::new(-3, 7), Position::new(9, -2));
        for pair in line.windows(2) {
            let d = pair[1] - pair[0];
            assert!(d.x.abs() <= 1 && d.y.abs() <= 1);
            assert_ne!(pair[0], pair[1]);
        }
        assert_eq!(line.len(), 13);
    }

    #[test]
    fn test_evenly_spaced() {
        let items: Vec<i32> = (0..100).collect();
        let picked = evenly_spaced(&items, 20);
        assert_eq!(picked.len(), 20);
        assert_eq!(picked[0], 0);
        assert_eq!(picked[1], 5);

        let few = [1, 2, 3];
        assert_eq!(evenly_spaced(&few, 20), vec![1, 2, 3]);
        assert!(evenly_spaced::<i32>(&[], 5).is_empty());
    }

    #[test]
    fn test_centered_offsets() {
        assert_eq!(centered_offsets(1), 0..=0);
        assert_eq!(centered_offsets(2), -1..=0);
        assert_eq!(centered_offsets(3), -1..=1);
    }
}
