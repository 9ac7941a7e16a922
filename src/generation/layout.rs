//! # Room Layout
//!
//! Carves the open space of a room with a biased drunkard's walk.
//!
//! The room starts solid. A spawn pocket is reserved in one of the corner
//! quadrants, then a walker starting at the pocket carves corridor-sized blocks
//! until it runs out of steps or has opened a third of the room. Horizontal
//! moves are twice as likely as vertical ones, which favors wide rooms the
//! player can run through.

use super::carving::{carve_block, CarveMode};
use super::{quadrant_bounds, GenerationConfig, GenerationFailure, Generator, Quadrant};
use crate::config::POCKET_SIZE;
use crate::{Direction, ForgeResult, MovementAttributes, Position, Room, TileCell, TileFlag};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// Walk directions; horizontal entries appear twice.
const WALK_DIRECTIONS: [Direction; 6] = [
    Direction::West,
    Direction::East,
    Direction::West,
    Direction::East,
    Direction::North,
    Direction::South,
];

/// Generates unvalidated room layouts for one set of movement attributes.
#[derive(Debug, Clone)]
pub struct RoomLayoutGenerator {
    attrs: MovementAttributes,
}

impl RoomLayoutGenerator {
    /// Creates a layout generator carving corridors wide enough for `attrs`.
    pub fn new(attrs: MovementAttributes) -> Self {
        Self { attrs }
    }

    /// The movement attributes corridors are sized for.
    pub fn attrs(&self) -> &MovementAttributes {
        &self.attrs
    }

    /// Produces a carved room with a reserved spawn pocket.
    ///
    /// The result is not guaranteed to be a single connected region.
    pub fn generate_layout(&self, config: &GenerationConfig, rng: &mut StdRng) -> Room {
        let width = rng.gen_range(config.min_room_size..=config.max_room_size);
        let height = rng.gen_range(config.min_room_size..=config.max_room_size);
        let mut room = Room::new(width, height, TileCell::wall());

        let quadrant = Quadrant::ALL[rng.gen_range(0..Quadrant::ALL.len())];
        let center = pick_spawn_center(quadrant, room.size(), rng);
        let pocket_tiles = reserve_spawn_pocket(&mut room, center);

        let block = self
            .attrs
            .corridor_block(config.min_corridor_width, config.min_corridor_height);
        let carved = self.walk(&mut room, center, block, rng) + pocket_tiles;

        debug!(
            "Layout {}x{} spawn {:?} in {:?}, {} tiles carved",
            width, height, room.player_spawn, quadrant, carved
        );
        room
    }

    fn walk(&self, room: &mut Room, start: Position, block: (i32, i32), rng: &mut StdRng) -> usize {
        let (width, height) = room.size();
        let step_budget = (width * height / 2) as usize;
        let carve_target = (width * height / 3) as usize;
        let margin = block.0.max(block.1);

        // Pocket tiles count towards the target
        let already_open = (POCKET_SIZE * POCKET_SIZE) as usize;
        let mut walked = 0;
        let mut pos = start;

        for _ in 0..step_budget {
            walked += carve_block(room, pos, block, CarveMode::RespectFlags);
            if already_open + walked >= carve_target {
                break;
            }

            let direction = WALK_DIRECTIONS[rng.gen_range(0..WALK_DIRECTIONS.len())];
            pos = clamp_to_margin(pos + direction.to_delta(), (width, height), margin);
        }

        walked
    }
}

fn clamp_to_margin(pos: Position, room_size: (i32, i32), margin: i32) -> Position {
    let clamp = |value: i32, extent: i32| {
        let high = (extent - 1 - margin).max(margin);
        value.clamp(margin, high)
    };
    Position::new(clamp(pos.x, room_size.0), clamp(pos.y, room_size.1))
}

/// Picks the pocket center so the spawn coordinate lands inside `quadrant`.
///
/// The center is shifted inward so the pocket and its platform keep a wall
/// border around them.
fn pick_spawn_center(quadrant: Quadrant, room_size: (i32, i32), rng: &mut StdRng) -> Position {
    let bounds = quadrant_bounds(quadrant, room_size);
    let (width, height) = room_size;

    let x = bounds.x + rng.gen_range(0..bounds.width.max(1));
    // The spawn sits one row below the center
    let y = bounds.y + rng.gen_range(0..(bounds.height - 1).max(1));

    Position::new(x.clamp(2, width - 3), y.clamp(2, height - 4))
}

/// Carves the 3x3 spawn pocket around `center` and lays its platform.
///
/// Returns the number of pocket tiles.
fn reserve_spawn_pocket(room: &mut Room, center: Position) -> usize {
    let half = POCKET_SIZE / 2;
    let mut tiles = 0;

    for dy in -half..=half {
        for dx in -half..=half {
            let pos = Position::new(center.x + dx, center.y + dy);
            if room
                .set_tile(pos, TileCell::air().with_flag(TileFlag::SpawnArea))
                .is_ok()
            {
                tiles += 1;
            }
        }
    }

    let platform_y = center.y + half + 1;
    for dx in -half..=half {
        let pos = Position::new(center.x + dx, platform_y);
        room.place_tile(pos, TileCell::wall().with_flag(TileFlag::SpawnPlatform));
    }

    // Bottom center of the pocket, directly above the platform
    room.player_spawn = Some(Position::new(center.x, center.y + half));
    tiles
}

impl Generator<Room> for RoomLayoutGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> ForgeResult<Room> {
        let room = self.generate_layout(config, rng);
        self.validate(&room, config)?;
        Ok(room)
    }

    fn validate(&self, room: &Room, _config: &GenerationConfig) -> ForgeResult<()> {
        let spawn = room.player_spawn.ok_or(GenerationFailure::MissingSpawn)?;
        if !room.grid.is_air(spawn) || !room.grid.is_wall(spawn.below()) {
            return Err(GenerationFailure::MissingSpawn.into());
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "RoomLayoutGenerator"
    }
}
