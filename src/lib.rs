//! # Roomforge
//!
//! Procedural generation of playable 2D platformer rooms and multi-room levels.
//!
//! ## Architecture Overview
//!
//! Every room produced here is checked against the movement limits of the player
//! that will later walk through it. The pipeline runs in phases:
//!
//! - **Layout**: a biased drunkard's walk carves air out of a solid room and
//!   reserves a spawn pocket
//! - **Connectivity**: flood fill finds disconnected air regions and bridges them
//! - **Doors**: an entrance at the spawn point and exits in the other corner
//!   quadrants, each standing on protected ground
//! - **Verification**: a breadth-first search over jump arcs proves every exit
//!   can be reached from the entrance
//! - **Levels**: validated rooms are wired together along a room graph with a
//!   guaranteed start to goal path
//!
//! All randomness flows from a single seed, so identical seeds reproduce identical
//! rooms and levels.

pub mod game;
pub mod generation;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use utils::*;

pub use game::{
    Direction, Door, DoorLink, DoorType, EntityId, LayoutType, LevelGraph, MovementAttributes,
    Position, Room, RoomGraph, RoomGrid, RoomId, SpawnArea, TileCell, TileFlag, TileType,
};

pub use generation::{
    generate_complete_level, generate_fallback_room, generate_validated_room, ConfigFile,
    GenerationConfig, GenerationFailure, Generator, LevelGenerationConfig, RoomLayoutGenerator,
    ValidatedRoomGenerator,
};

pub use utils::{verify_traversable, TraversalVerifier};

/// Core error type for the Roomforge generator.
#[derive(thiserror::Error, Debug)]
pub enum ForgeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A grid write landed outside the room
    #[error("Position ({x}, {y}) is outside the room")]
    OutOfBounds { x: i32, y: i32 },

    /// A level lookup referenced a room that was never added
    #[error("Unknown room: {0}")]
    UnknownRoom(String),

    /// A generation attempt failed
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationFailure),
}

/// Result type used throughout the Roomforge codebase.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation constants shared by the layout and door phases.
pub mod config {
    /// Side length of the square corner quadrants used for spawn and exit placement
    pub const QUADRANT_RADIUS: i32 = 10;

    /// Side length of the air pocket carved around the spawn point and every door
    pub const POCKET_SIZE: i32 = 3;

    /// Regions sampled per side when searching for the closest bridging pair
    pub const REPAIR_SAMPLE_POINTS: usize = 20;

    /// Upper bound on repair passes before a layout is abandoned
    pub const MAX_REPAIR_ATTEMPTS: u32 = 10;

    /// Doors closer than this on both axes are treated as directly connected
    pub const ADJACENT_DOOR_RANGE: i32 = 3;

    /// Choice label attached to door links created by the level assembler
    pub const DEFAULT_CHOICE_LABEL: &str = "default";
}
