//! # Traversal Verification
//!
//! Jump-physics reachability over the ground tiles of a room.
//!
//! Nodes are ground locations: walls with enough clear space above them for
//! the player to stand. An edge exists between two nodes when the jump is
//! within the player's limits and the straight-line sweep of the player's
//! silhouette does not hit a wall. The search is all-pairs on purpose; rooms
//! hold at most a few hundred ground tiles.

use crate::config::ADJACENT_DOOR_RANGE;
use crate::utils::bresenham_line;
use crate::{DoorId, GenerationFailure, MovementAttributes, Position, Room};
use std::collections::{HashSet, VecDeque};

/// Finds every wall tile the player can stand on.
///
/// A wall at `(x, y)` qualifies when the `entity_width` columns starting at `x`
/// are free of walls for `entity_height` tiles above it, all inside the room.
/// Door tiles never obstruct. Results are ordered by column, then row.
pub fn find_valid_ground_locations(
    room: &Room,
    entity_width: i32,
    entity_height: i32,
) -> Vec<Position> {
    let (width, height) = room.size();
    let mut locations = Vec::new();

    for x in 0..width {
        for y in 0..height {
            let pos = Position::new(x, y);
            if room.grid.is_wall(pos) && has_clearance(room, pos, entity_width, entity_height) {
                locations.push(pos);
            }
        }
    }

    locations
}

fn has_clearance(room: &Room, ground: Position, entity_width: i32, entity_height: i32) -> bool {
    (0..entity_width).all(|dx| {
        (1..=entity_height).all(|dy| {
            let above = Position::new(ground.x + dx, ground.y - dy);
            room.grid.contains(above) && !room.grid.is_wall(above)
        })
    })
}

/// Checks whether a jump from `from` to `to` is within the player's limits.
///
/// Only rising jumps are height-limited; drops of any height are allowed.
///
/// # Examples
///
/// ```
/// use roomforge::{check_physics_reach, Position};
///
/// let floor = Position::new(0, 10);
/// assert!(check_physics_reach(floor, Position::new(6, 10), 4, 6));
/// assert!(!check_physics_reach(floor, Position::new(7, 10), 4, 6));
/// assert!(!check_physics_reach(floor, Position::new(1, 5), 4, 6));
/// assert!(check_physics_reach(floor, Position::new(1, 20), 4, 6));
/// ```
pub fn check_physics_reach(
    from: Position,
    to: Position,
    max_jump_height: i32,
    max_jump_distance: i32,
) -> bool {
    let horizontal = (to.x - from.x).abs();
    let rise = from.y - to.y;

    horizontal <= max_jump_distance && rise <= max_jump_height
}

/// Checks that no wall sits within `entity_height` tiles above any point of
/// the straight line between two ground tiles.
pub fn check_jump_arc_clear(
    room: &Room,
    start: Position,
    end: Position,
    entity_height: i32,
) -> bool {
    bresenham_line(start, end).into_iter().all(|point| {
        (1..=entity_height).all(|dy| {
            let above = Position::new(point.x, point.y - dy);
            room.grid.contains(above) && !room.grid.is_wall(above)
        })
    })
}

/// Reachability oracle for one room and one set of movement attributes.
#[derive(Debug, Clone)]
pub struct TraversalVerifier<'a> {
    room: &'a Room,
    attrs: MovementAttributes,
    ground: Vec<Position>,
    ground_set: HashSet<Position>,
}

impl<'a> TraversalVerifier<'a> {
    /// Computes the ground locations of `room` for `attrs`.
    pub fn new(room: &'a Room, attrs: MovementAttributes) -> Self {
        let ground = find_valid_ground_locations(room, attrs.player_width, attrs.player_height);
        let ground_set = ground.iter().copied().collect();
        Self {
            room,
            attrs,
            ground,
            ground_set,
        }
    }

    /// Returns true if the player can stand on `pos`.
    pub fn is_ground(&self, pos: Position) -> bool {
        self.ground_set.contains(&pos)
    }

    /// Returns true if a single jump leads from `from` to `to`.
    pub fn can_jump(&self, from: Position, to: Position) -> bool {
        check_physics_reach(
            from,
            to,
            self.attrs.max_jump_height,
            self.attrs.max_jump_distance,
        ) && check_jump_arc_clear(self.room, from, to, self.attrs.player_height)
    }

    /// Every ground location reachable from `start` through any number of jumps.
    ///
    /// Returns an empty set if `start` is not a ground location.
    pub fn reachable_from(&self, start: Position) -> HashSet<Position> {
        let mut visited = HashSet::new();
        if !self.is_ground(start) {
            return visited;
        }
        self.search(start, &mut visited, |_| false);
        visited
    }

    /// Breadth-first search that stops as soon as `done` accepts a dequeued node.
    fn search<F>(&self, start: Position, visited: &mut HashSet<Position>, mut done: F) -> bool
    where
        F: FnMut(Position) -> bool,
    {
        let mut queue = VecDeque::from([start]);
        visited.insert(start);

        while let Some(current) = queue.pop_front() {
            if done(current) {
                return true;
            }
            for &candidate in &self.ground {
                if visited.contains(&candidate) || !self.can_jump(current, candidate) {
                    continue;
                }
                visited.insert(candidate);
                queue.push_back(candidate);
            }
        }

        false
    }

    /// Proves the entrance reaches every other door.
    ///
    /// The first door is the start. Doors within a few tiles of it on both axes
    /// count as directly connected.
    pub fn verify(&self) -> Result<(), GenerationFailure> {
        let mut doors = self.room.doors.values();
        let entrance = doors.next().ok_or(GenerationFailure::NoDoors)?;
        let start = entrance.ground();
        if !self.is_ground(start) {
            return Err(GenerationFailure::DoorOffGround {
                door: entrance.id.clone(),
            });
        }

        let mut pending: Vec<(DoorId, Position)> = Vec::new();
        for door in doors {
            let target = door.ground();
            if !self.is_ground(target) {
                return Err(GenerationFailure::DoorOffGround {
                    door: door.id.clone(),
                });
            }
            let near = (target.x - start.x).abs() <= ADJACENT_DOOR_RANGE
                && (target.y - start.y).abs() <= ADJACENT_DOOR_RANGE;
            if !near {
                pending.push((door.id.clone(), target));
            }
        }

        if pending.is_empty() {
            return Ok(());
        }

        let mut visited = HashSet::new();
        let found_all = self.search(start, &mut visited, |node| {
            pending.retain(|(_, target)| *target != node);
            pending.is_empty()
        });

        if found_all {
            Ok(())
        } else {
            let door = pending
                .first()
                .map(|(id, _)| id.clone())
                .unwrap_or_default();
            Err(GenerationFailure::Unreachable { door })
        }
    }
}

/// Every ground location reachable from `start` in `room` for `attrs`.
pub fn reachable_ground(room: &Room, attrs: MovementAttributes, start: Position) -> HashSet<Position> {
    TraversalVerifier::new(room, attrs).reachable_from(start)
}

/// Returns true if the entrance of `room` reaches every exit for `attrs`.
pub fn verify_traversable(room: &Room, attrs: MovementAttributes) -> bool {
    TraversalVerifier::new(room, attrs).verify().is_ok()
}
