//! # Generation Module
//!
//! Procedural room and level generation.
//!
//! Rooms go through layout, connectivity repair, door placement and traversal
//! verification, retrying until a room passes or falling back to a minimal room
//! that is traversable by construction. Levels wire validated rooms together
//! along a room graph.

pub mod connectivity;
pub mod doors;
pub mod graph;
pub mod layout;
pub mod pipeline;
pub mod quadrants;

pub use connectivity::*;
pub use doors::*;
pub use graph::*;
pub use layout::*;
pub use pipeline::*;
pub use quadrants::*;

use crate::{ForgeError, ForgeResult, LayoutType, MovementAttributes};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest room side the layout and fallback phases can work with.
pub const MIN_SUPPORTED_ROOM_SIZE: i32 = 12;

/// Configuration for room generation.
///
/// Read-only for the duration of a generation run. Every knob has a default,
/// so partial JSON files deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Minimum room side length
    pub min_room_size: i32,
    /// Maximum room side length
    pub max_room_size: i32,
    /// Attempts before the fallback room is used
    pub max_room_generation_attempts: u32,
    /// Minimum corridor width carved by the walk and repairs
    pub min_corridor_width: i32,
    /// Minimum corridor height carved by the walk and repairs
    pub min_corridor_height: i32,
    /// Whether validated rooms receive spawn areas
    pub place_spawn_areas: bool,
    /// Minimum spawn areas per room
    pub min_spawn_areas_per_room: u32,
    /// Maximum spawn areas per room
    pub max_spawn_areas_per_room: u32,
    /// Minimum spawn area side length
    pub spawn_area_min_size: i32,
    /// Maximum spawn area side length
    pub spawn_area_max_size: i32,
    /// Minimum gap between spawn areas
    pub spawn_area_spacing: i32,
    /// Enemies per air tile at difficulty zero
    pub base_enemy_density: f64,
    /// Cap on enemies in a single room
    pub max_enemies_per_room: u32,
    /// Multiplier on the logarithmic difficulty curve
    pub difficulty_scale_factor: f64,
    /// Cap on room difficulty
    pub max_difficulty_rating: u32,
}

impl GenerationConfig {
    /// Creates a default generation configuration with the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomforge::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            min_room_size: 20,
            max_room_size: 40,
            max_room_generation_attempts: 100,
            min_corridor_width: 2,
            min_corridor_height: 2,
            place_spawn_areas: true,
            min_spawn_areas_per_room: 1,
            max_spawn_areas_per_room: 5,
            spawn_area_min_size: 3,
            spawn_area_max_size: 6,
            spawn_area_spacing: 5,
            base_enemy_density: 0.01,
            max_enemies_per_room: 20,
            difficulty_scale_factor: 0.5,
            max_difficulty_rating: 10,
        }
    }

    /// Creates a configuration for testing with smaller rooms.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            min_room_size: 20,
            max_room_size: 30,
            ..Self::new(seed)
        }
    }

    /// Returns a copy of this configuration with another seed.
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    /// Rejects configurations the generator cannot honor.
    pub fn validate(&self) -> ForgeResult<()> {
        if self.min_room_size < MIN_SUPPORTED_ROOM_SIZE {
            return Err(ForgeError::InvalidConfig(format!(
                "min_room_size must be at least {}, got {}",
                MIN_SUPPORTED_ROOM_SIZE, self.min_room_size
            )));
        }
        if self.max_room_size < self.min_room_size {
            return Err(ForgeError::InvalidConfig(format!(
                "max_room_size {} is below min_room_size {}",
                self.max_room_size, self.min_room_size
            )));
        }
        if self.max_room_generation_attempts == 0 {
            return Err(ForgeError::InvalidConfig(
                "max_room_generation_attempts must be positive".to_string(),
            ));
        }
        if self.min_corridor_width < 1 || self.min_corridor_height < 1 {
            return Err(ForgeError::InvalidConfig(
                "corridor dimensions must be positive".to_string(),
            ));
        }
        if self.spawn_area_min_size < 1 || self.spawn_area_max_size < self.spawn_area_min_size {
            return Err(ForgeError::InvalidConfig(
                "spawn area size bounds are inconsistent".to_string(),
            ));
        }
        if self.max_spawn_areas_per_room < self.min_spawn_areas_per_room {
            return Err(ForgeError::InvalidConfig(
                "spawn area count bounds are inconsistent".to_string(),
            ));
        }
        if self.base_enemy_density < 0.0 || self.difficulty_scale_factor < 0.0 {
            return Err(ForgeError::InvalidConfig(
                "densities and scale factors must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Configuration for the shape of a multi-room level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelGenerationConfig {
    /// Target number of rooms
    pub num_rooms: usize,
    /// Graph strategy
    pub layout_type: LayoutType,
    /// Entrance doors per room
    pub entrance_doors_per_room: u32,
    /// Exit doors per room; bounds the number of branches
    pub exit_doors_per_room: u32,
    /// Chance of hanging a side room off a main-path room
    pub branch_probability: f64,
    /// Chance of adding a skip-ahead edge from a main-path room
    pub loop_probability: f64,
}

impl LevelGenerationConfig {
    /// Creates a level configuration for the given layout.
    pub fn new(num_rooms: usize, layout_type: LayoutType) -> Self {
        let exit_doors_per_room = match layout_type {
            LayoutType::Linear => 1,
            LayoutType::Branching | LayoutType::Looping => 2,
        };
        Self {
            num_rooms,
            layout_type,
            entrance_doors_per_room: 1,
            exit_doors_per_room,
            branch_probability: 0.5,
            loop_probability: 0.3,
        }
    }

    /// Rejects configurations the graph builder cannot honor.
    pub fn validate(&self) -> ForgeResult<()> {
        if self.num_rooms == 0 {
            return Err(ForgeError::InvalidConfig(
                "a level needs at least one room".to_string(),
            ));
        }
        if !(1..=2).contains(&self.entrance_doors_per_room) {
            return Err(ForgeError::InvalidConfig(format!(
                "entrance_doors_per_room must be 1 or 2, got {}",
                self.entrance_doors_per_room
            )));
        }
        if !(1..=2).contains(&self.exit_doors_per_room) {
            return Err(ForgeError::InvalidConfig(format!(
                "exit_doors_per_room must be 1 or 2, got {}",
                self.exit_doors_per_room
            )));
        }
        for (name, value) in [
            ("branch_probability", self.branch_probability),
            ("loop_probability", self.loop_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ForgeError::InvalidConfig(format!(
                    "{} must be within 0..=1, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for LevelGenerationConfig {
    fn default() -> Self {
        Self::new(5, LayoutType::Linear)
    }
}

/// On-disk configuration bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub generation: GenerationConfig,
    pub level: LevelGenerationConfig,
    pub movement: MovementAttributes,
}

impl ConfigFile {
    /// Loads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ConfigFile = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes this configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> ForgeResult<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Validates every section.
    pub fn validate(&self) -> ForgeResult<()> {
        self.generation.validate()?;
        self.level.validate()?;
        if self.movement.player_width < 1 || self.movement.player_height < 1 {
            return Err(ForgeError::InvalidConfig(
                "player footprint must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Why a single room generation attempt was abandoned.
///
/// Every variant is recoverable by retrying with fresh randomness.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    #[error("layout has no usable spawn point")]
    MissingSpawn,

    #[error("{regions} regions remain after repair")]
    RepairExhausted { regions: usize },

    #[error("no bridging pair between regions")]
    NoRepairCandidates,

    #[error("no legal door position")]
    NoDoorPosition,

    #[error("only {placed} doors placed")]
    TooFewDoors { placed: usize },

    #[error("door placement split the room into {regions} regions")]
    Disconnected { regions: usize },

    #[error("room has no doors")]
    NoDoors,

    #[error("door {door} does not stand on ground")]
    DoorOffGround { door: String },

    #[error("door {door} is unreachable from the entrance")]
    Unreachable { door: String },
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> ForgeResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> ForgeResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Carving primitives shared by the layout, repair and door phases.
pub mod carving {
    use crate::utils::{bresenham_line, centered_offsets};
    use crate::{GenerationConfig, Position, Room, TileCell, TileFlag, TileType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Which exclusion flags a carve honors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum CarveMode {
        /// Skip every flagged cell
        RespectFlags,
        /// Skip only door tiles and the platforms doors stand on
        KeepPlatforms,
        /// Carve through everything except door tiles
        IgnoreFlags,
    }

    impl CarveMode {
        fn allows(self, cell: &TileCell) -> bool {
            match self {
                CarveMode::RespectFlags => !cell.is_protected(),
                CarveMode::KeepPlatforms => !(cell.has_flag(&TileFlag::SpawnPlatform)
                    || cell.has_flag(&TileFlag::DoorPlatform)
                    || cell.has_flag(&TileFlag::PcgDoor)),
                CarveMode::IgnoreFlags => true,
            }
        }
    }

    /// Turns a `block`-sized rectangle centered on `center` into air.
    ///
    /// The outer border of the room is never carved, nor are door tiles.
    /// Returns the number of tiles that changed.
    pub fn carve_block(room: &mut Room, center: Position, block: (i32, i32), mode: CarveMode) -> usize {
        let mut carved = 0;
        for dy in centered_offsets(block.1) {
            for dx in centered_offsets(block.0) {
                let pos = Position::new(center.x + dx, center.y + dy);
                if !room.grid.is_interior(pos) {
                    continue;
                }
                let allowed = match room.get_tile(pos) {
                    Some(cell) => cell.tile_type == TileType::Wall && mode.allows(cell),
                    None => false,
                };
                if allowed && room.set_tile(pos, TileCell::air()).is_ok() {
                    carved += 1;
                }
            }
        }
        carved
    }

    /// Carves a block at every point of the line between two positions.
    pub fn carve_line(
        room: &mut Room,
        from: Position,
        to: Position,
        block: (i32, i32),
        mode: CarveMode,
    ) -> usize {
        bresenham_line(from, to)
            .into_iter()
            .map(|point| carve_block(room, point, block, mode))
            .sum()
    }
}
