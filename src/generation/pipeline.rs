//! # Validation Pipeline
//!
//! Retries layout, repair, door placement and verification until a room
//! passes, then assigns difficulty and spawn areas. When every attempt fails
//! a minimal flat room is returned instead; it is traversable by construction.

use super::carving::create_rng;
use super::{
    find_regions, place_doors, repair_connectivity, DoorFootprint, GenerationConfig,
    GenerationFailure, Generator, RoomLayoutGenerator,
};
use crate::utils::{find_valid_ground_locations, TraversalVerifier};
use crate::{
    door_token, Door, DoorType, ForgeResult, MovementAttributes, Position, Room, SpawnArea,
    TileCell, TileType,
};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::json;

/// Tries placing each requested spawn area this many times.
const SPAWN_AREA_TRIES_PER_AREA: u32 = 10;

/// Generates a room that is proven traversable for `attrs`.
///
/// `depth` is the room's distance from the level start and drives difficulty;
/// `exit_count` is the number of exits requested from door placement. Never
/// fails: after `max_room_generation_attempts` the fallback room is returned.
#[cfg_attr(feature = "dev-tools", tracing::instrument(skip_all, fields(seed = config.seed, depth = depth)))]
pub fn generate_validated_room(
    config: &GenerationConfig,
    attrs: &MovementAttributes,
    depth: u32,
    exit_count: usize,
) -> Room {
    let mut rng = create_rng(config);
    generate_validated_room_with_rng(config, attrs, depth, exit_count, &mut rng)
}

/// Like [`generate_validated_room`], drawing randomness from `rng`.
pub fn generate_validated_room_with_rng(
    config: &GenerationConfig,
    attrs: &MovementAttributes,
    depth: u32,
    exit_count: usize,
    rng: &mut StdRng,
) -> Room {
    let layout = RoomLayoutGenerator::new(*attrs);

    for attempt in 1..=config.max_room_generation_attempts {
        match try_generate_room(&layout, config, attrs, exit_count, rng) {
            Ok(mut room) => {
                debug!("Room accepted on attempt {}", attempt);
                if config.place_spawn_areas {
                    place_spawn_areas(&mut room, config, attrs, rng);
                }
                configure_room_difficulty(&mut room, depth, config);
                return room;
            }
            Err(failure) => debug!("Room attempt {} rejected: {}", attempt, failure),
        }
    }

    warn!(
        "No valid room after {} attempts, using fallback room",
        config.max_room_generation_attempts
    );
    let mut room = generate_fallback_room(config, attrs);
    configure_room_difficulty(&mut room, depth, config);
    room
}

fn try_generate_room(
    layout: &RoomLayoutGenerator,
    config: &GenerationConfig,
    attrs: &MovementAttributes,
    exit_count: usize,
    rng: &mut StdRng,
) -> Result<Room, GenerationFailure> {
    let mut room = layout.generate_layout(config, rng);

    if find_regions(&room).len() > 1 {
        repair_connectivity(&mut room, config, attrs)?;
    }

    place_doors(&mut room, attrs, config, exit_count.max(1), rng)?;
    if room.doors.is_empty() {
        return Err(GenerationFailure::NoDoors);
    }

    let regions = find_regions(&room).len();
    if regions > 1 {
        return Err(GenerationFailure::Disconnected { regions });
    }

    TraversalVerifier::new(&room, *attrs).verify()?;
    Ok(room)
}

/// Builds the minimal room used when generation keeps failing.
///
/// A square of the configured minimum size filled with air, a flat wall floor
/// on the bottom row, an entrance near the left edge and an exit near the
/// right edge one tile above the floor.
pub fn generate_fallback_room(config: &GenerationConfig, attrs: &MovementAttributes) -> Room {
    let size = config
        .min_room_size
        .max(attrs.player_height + 3)
        .max(attrs.player_width.max(1) + 3);
    let mut room = Room::new(size, size, TileCell::air());
    let floor_y = size - 1;
    let door_y = floor_y - 1;

    for x in 0..size {
        room.place_tile(Position::new(x, floor_y), TileCell::wall());
    }

    let entrance = Position::new(1, door_y);
    let exit = Position::new(size - 1 - attrs.player_width.max(1), door_y);
    for (index, (pos, door_type)) in [(entrance, DoorType::Entrance), (exit, DoorType::Exit)]
        .into_iter()
        .enumerate()
    {
        room.place_tile(pos, TileCell::door());
        room.add_door(Door::new(door_token(index), pos, door_type));
    }

    room.player_spawn = Some(Position::new(size / 2, door_y));
    room
}

/// Difficulty for a room `depth` rooms away from the start.
///
/// Grows logarithmically and is clamped to the configured maximum.
///
/// # Examples
///
/// ```
/// use roomforge::{difficulty_for_depth, GenerationConfig};
///
/// let config = GenerationConfig::default();
/// assert_eq!(difficulty_for_depth(0, &config), 1);
/// assert_eq!(difficulty_for_depth(1, &config), 4);
/// assert_eq!(difficulty_for_depth(1000, &config), config.max_difficulty_rating);
/// ```
pub fn difficulty_for_depth(depth: u32, config: &GenerationConfig) -> u32 {
    if depth == 0 {
        return 1;
    }
    let growth = (f64::from(depth) + 1.0).ln() * config.difficulty_scale_factor * 10.0;
    (1 + growth.floor() as u32).min(config.max_difficulty_rating.max(1))
}

/// Assigns depth, difficulty and enemy density, and splits the enemy budget
/// across the room's spawn areas.
pub fn configure_room_difficulty(room: &mut Room, depth: u32, config: &GenerationConfig) {
    let difficulty = difficulty_for_depth(depth, config);
    let density = config.base_enemy_density * (1.0 + f64::from(difficulty) * 0.2);

    room.depth_from_start = depth;
    room.difficulty_rating = difficulty;
    room.enemy_density = density;

    if room.spawn_areas.is_empty() {
        return;
    }

    let air_tiles = room.grid.count_tiles(TileType::Air) as f64;
    let budget = ((density * air_tiles).round() as u32).min(config.max_enemies_per_room);
    let area_count = room.spawn_areas.len() as u32;
    let share = budget / area_count;
    let remainder = budget % area_count;

    for (index, area) in room.spawn_areas.iter_mut().enumerate() {
        let max_enemies = share + u32::from((index as u32) < remainder);
        area.spawn_rules
            .insert("allow_enemies".to_string(), json!(max_enemies > 0));
        area.spawn_rules
            .insert("max_enemies".to_string(), json!(max_enemies));
        area.spawn_rules
            .insert("difficulty_min".to_string(), json!(difficulty));
    }
}

/// Places spawn areas resting on ground, clear of doors and the spawn point.
///
/// Areas keep `spawn_area_spacing` tiles between each other. Placement is
/// best effort: fewer areas than requested are kept when space runs out.
/// Returns the number of areas placed.
pub fn place_spawn_areas(
    room: &mut Room,
    config: &GenerationConfig,
    attrs: &MovementAttributes,
    rng: &mut StdRng,
) -> usize {
    let wanted =
        rng.gen_range(config.min_spawn_areas_per_room..=config.max_spawn_areas_per_room) as usize;
    let ground = find_valid_ground_locations(room, attrs.player_width, attrs.player_height);
    if wanted == 0 || ground.is_empty() {
        return 0;
    }

    let footprints: Vec<DoorFootprint> = room
        .doors
        .values()
        .map(|door| DoorFootprint::new(door.position, attrs))
        .collect();
    let mut placed: Vec<SpawnArea> = Vec::new();

    for _ in 0..wanted as u32 * SPAWN_AREA_TRIES_PER_AREA {
        if placed.len() >= wanted {
            break;
        }

        let anchor = ground[rng.gen_range(0..ground.len())];
        let width = rng.gen_range(config.spawn_area_min_size..=config.spawn_area_max_size);
        let height = rng.gen_range(config.spawn_area_min_size..=config.spawn_area_max_size);
        let mut area = SpawnArea::new(
            Position::new(anchor.x - width / 2, anchor.y - height),
            (width, height),
        );

        let fits = area.all_coords().into_iter().all(|pos| {
            room.grid.is_air(pos)
                && room.player_spawn != Some(pos)
                && !footprints.iter().any(|footprint| footprint.contains(pos))
        });
        let crowded = placed
            .iter()
            .any(|other| area.is_near(other, config.spawn_area_spacing));
        if !fits || crowded {
            continue;
        }

        area.spawn_rules
            .insert("spawn_surface".to_string(), json!("ground"));
        area.allowed_entity_tags.push("enemy".to_string());
        placed.push(area);
    }

    debug!("Placed {} of {} spawn areas", placed.len(), wanted);
    let count = placed.len();
    room.spawn_areas.extend(placed);
    count
}

/// Generator producing validated rooms at a fixed depth and exit count.
#[derive(Debug, Clone)]
pub struct ValidatedRoomGenerator {
    pub attrs: MovementAttributes,
    pub depth: u32,
    pub exit_count: usize,
}

impl ValidatedRoomGenerator {
    /// Creates a generator for rooms at `depth` with `exit_count` exits.
    pub fn new(attrs: MovementAttributes, depth: u32, exit_count: usize) -> Self {
        Self {
            attrs,
            depth,
            exit_count,
        }
    }
}

impl Generator<Room> for ValidatedRoomGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> ForgeResult<Room> {
        Ok(generate_validated_room_with_rng(
            config,
            &self.attrs,
            self.depth,
            self.exit_count,
            rng,
        ))
    }

    fn validate(&self, room: &Room, _config: &GenerationConfig) -> ForgeResult<()> {
        let regions = find_regions(room).len();
        if regions > 1 {
            return Err(GenerationFailure::Disconnected { regions }.into());
        }
        TraversalVerifier::new(room, self.attrs).verify()?;
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "ValidatedRoomGenerator"
    }
}
