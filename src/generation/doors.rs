//! # Door Placement
//!
//! Places the entrance on the spawn point and exits in the other corner
//! quadrants. Every door gets an air pocket above it and a protected wall strip
//! below it, so the door always stands on ground. The strip may be new ground
//! laid across open air; reachability is left to the traversal verifier.

use super::carving::{carve_line, CarveMode};
use super::{
    closest_pair, find_regions, get_spawn_quadrant, randomly_assign_exit_quadrants,
    GenerationConfig, GenerationFailure, Quadrant,
};
use crate::config::POCKET_SIZE;
use crate::{
    door_token, Door, DoorType, MovementAttributes, Position, Room, TileCell, TileFlag, TileType,
};
use log::debug;
use rand::rngs::StdRng;

/// Tiles reserved around a door: the air pocket rows above it plus the
/// ground strip row below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorFootprint {
    pub left: i32,
    pub right: i32,
    /// Top row of the air pocket
    pub top: i32,
    /// Row of the ground strip
    pub floor: i32,
}

impl DoorFootprint {
    /// Footprint of a door at `door` for a player with `attrs`.
    pub fn new(door: Position, attrs: &MovementAttributes) -> Self {
        let half = POCKET_SIZE / 2;
        let pocket_height = POCKET_SIZE.max(attrs.player_height);
        Self {
            left: door.x - half,
            right: (door.x + half).max(door.x + attrs.player_width - 1),
            top: door.y - pocket_height + 1,
            floor: door.y + 1,
        }
    }

    /// Checks whether two footprints share a tile.
    pub fn overlaps(&self, other: &DoorFootprint) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.floor
            && other.top <= self.floor
    }

    /// Checks whether a position lies inside the footprint.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.left && pos.x <= self.right && pos.y >= self.top && pos.y <= self.floor
    }

    /// Air pocket tiles, row-major.
    pub fn pocket(&self) -> impl Iterator<Item = Position> {
        let (left, right) = (self.left, self.right);
        (self.top..self.floor).flat_map(move |y| (left..=right).map(move |x| Position::new(x, y)))
    }

    /// Ground strip tiles, left to right.
    pub fn strip(&self) -> impl Iterator<Item = Position> {
        let floor = self.floor;
        (self.left..=self.right).map(move |x| Position::new(x, floor))
    }
}

/// Places the entrance and up to `exit_count` exits.
///
/// Exit count is capped at the number of non-spawn quadrants. Fails if any
/// requested exit has no legal position or fewer than two doors end up placed.
pub fn place_doors(
    room: &mut Room,
    attrs: &MovementAttributes,
    config: &GenerationConfig,
    exit_count: usize,
    rng: &mut StdRng,
) -> Result<(), GenerationFailure> {
    let spawn = room.player_spawn.ok_or(GenerationFailure::MissingSpawn)?;
    let block = attrs.corridor_block(config.min_corridor_width, config.min_corridor_height);

    place_entrance(room, spawn, attrs);
    connect_pocket(room, spawn, block);

    let spawn_quadrant = get_spawn_quadrant(spawn, room.size());
    let targets = randomly_assign_exit_quadrants(spawn_quadrant, rng);

    for &target in targets.iter().take(exit_count) {
        let pos = find_exit_position(room, attrs, spawn, spawn_quadrant, target)
            .ok_or(GenerationFailure::NoDoorPosition)?;
        place_exit(room, pos, attrs);
        connect_pocket(room, pos, block);
        debug!(
            "Exit placed at {} targeting {:?}, landed in {:?}",
            pos,
            target,
            get_spawn_quadrant(pos, room.size())
        );
    }

    if room.doors.len() < 2 {
        return Err(GenerationFailure::TooFewDoors {
            placed: room.doors.len(),
        });
    }
    Ok(())
}

/// Turns the spawn tile into the entrance and forces its ground strip.
fn place_entrance(room: &mut Room, spawn: Position, attrs: &MovementAttributes) {
    let footprint = DoorFootprint::new(spawn, attrs);
    room.place_tile(spawn, TileCell::door());
    for pos in footprint.strip() {
        let strip = TileCell::wall()
            .with_flag(TileFlag::SpawnPlatform)
            .with_flag(TileFlag::DoorPlatform);
        room.place_tile(pos, strip);
    }
    room.add_door(Door::new(door_token(0), spawn, DoorType::Entrance));
}

fn place_exit(room: &mut Room, pos: Position, attrs: &MovementAttributes) {
    let footprint = DoorFootprint::new(pos, attrs);
    for cell in footprint.pocket() {
        room.place_tile(cell, TileCell::air());
    }
    room.place_tile(pos, TileCell::door());
    for cell in footprint.strip() {
        room.place_tile(cell, TileCell::wall().with_flag(TileFlag::DoorPlatform));
    }
    let id = room.next_door_id();
    room.add_door(Door::new(id, pos, DoorType::Exit));
}

/// Checks whether an exit may be carved at `pos`.
///
/// The door tile must be air already. Its pocket must stay inside the border
/// and avoid hard-protected tiles. Each strip tile is either existing wall or
/// an interior tile free of hard flags, air included. The footprint must not
/// touch another door's footprint.
pub fn is_legal_exit_position(room: &Room, pos: Position, attrs: &MovementAttributes) -> bool {
    if !room.grid.is_air(pos) {
        return false;
    }

    let footprint = DoorFootprint::new(pos, attrs);
    let pocket_clear = footprint.pocket().all(|cell| {
        room.grid.is_interior(cell)
            && room
                .get_tile(cell)
                .map_or(false, |tile| tile.tile_type != TileType::Door && !tile.is_hard_protected())
    });
    let strip_clear = footprint.strip().all(|cell| {
        room.get_tile(cell).map_or(false, |tile| match tile.tile_type {
            TileType::Wall => true,
            TileType::Air => room.grid.is_interior(cell) && !tile.is_hard_protected(),
            TileType::Door => false,
        })
    });
    if !pocket_clear || !strip_clear {
        return false;
    }

    room.doors
        .values()
        .all(|door| !DoorFootprint::new(door.position, attrs).overlaps(&footprint))
}

/// Picks the exit position farthest from spawn, preferring `target`.
///
/// Falls back to any non-spawn quadrant, then to anywhere in the room. Sites
/// whose strip is already solid wall are searched first; sites that need new
/// ground laid over air are used only when no such site exists.
fn find_exit_position(
    room: &Room,
    attrs: &MovementAttributes,
    spawn: Position,
    spawn_quadrant: Quadrant,
    target: Quadrant,
) -> Option<Position> {
    let size = room.size();
    let candidates: Vec<(Position, Quadrant, bool)> = room
        .grid
        .positions()
        .filter(|&pos| is_legal_exit_position(room, pos, attrs))
        .map(|pos| {
            let grounded = DoorFootprint::new(pos, attrs)
                .strip()
                .all(|cell| room.grid.is_wall(cell));
            (pos, get_spawn_quadrant(pos, size), grounded)
        })
        .collect();

    let farthest = |grounded_only: bool, accept: &dyn Fn(Quadrant) -> bool| {
        candidates
            .iter()
            .filter(|(_, quadrant, grounded)| (*grounded || !grounded_only) && accept(*quadrant))
            .max_by_key(|(pos, _, _)| pos.manhattan_distance(spawn))
            .map(|(pos, _, _)| *pos)
    };

    [true, false].into_iter().find_map(|grounded_only| {
        farthest(grounded_only, &|quadrant| quadrant == target)
            .or_else(|| farthest(grounded_only, &|quadrant| quadrant != spawn_quadrant))
            .or_else(|| farthest(grounded_only, &|_| true))
    })
}

/// Bridges a freshly carved door pocket to the nearest other region if it
/// ended up isolated. Door platforms are left intact.
fn connect_pocket(room: &mut Room, door: Position, block: (i32, i32)) {
    let regions = find_regions(room);
    if regions.len() <= 1 {
        return;
    }

    let anchor = Position::new(door.x, door.y - 1);
    let Some(home) = regions.iter().position(|region| region.contains(&anchor)) else {
        return;
    };

    let bridge = regions
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != home)
        .filter_map(|(_, other)| closest_pair(&regions[home], other))
        .min_by_key(|(a, b)| a.manhattan_distance(*b));

    if let Some((from, to)) = bridge {
        debug!("Connecting door pocket at {} via {} -> {}", door, from, to);
        carve_line(room, from, to, block, CarveMode::KeepPlatforms);
    }
}
