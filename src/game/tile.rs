//! # Tiles
//!
//! The tile vocabulary shared with the runtime and the exclusion flags that
//! carving operations consult.

use crate::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Behavioral tile categories the generator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Solid tile with collision
    Wall,
    /// Empty space
    Air,
    /// Transit point into another room
    Door,
}

impl TileType {
    /// Returns true if entities collide with this tile.
    pub fn has_collision(self) -> bool {
        matches!(self, TileType::Wall)
    }

    /// Returns true if this tile is open space.
    pub fn is_empty(self) -> bool {
        matches!(self, TileType::Air)
    }

    /// Returns true if this tile leads to another room.
    pub fn is_transit(self) -> bool {
        matches!(self, TileType::Door)
    }

    /// Gets the debug display character for this tile type.
    pub fn display_char(self) -> char {
        match self {
            TileType::Wall => '#',
            TileType::Air => '.',
            TileType::Door => 'D',
        }
    }
}

/// Advisory markers attached to cells.
///
/// Flags never change how a tile behaves; they only tell carving operations
/// which cells they must leave alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileFlag {
    /// Generic exclusion marker
    Protected,
    /// Ground strip under the spawn pocket
    SpawnPlatform,
    /// Ground strip under a door pocket
    DoorPlatform,
    /// Door tile placed by the generator
    PcgDoor,
    /// Cell of the reserved spawn pocket
    SpawnArea,
}

impl TileFlag {
    /// Returns true if door placement may overwrite a cell carrying this flag.
    pub fn overridable_for_connectivity(&self) -> bool {
        matches!(self, TileFlag::SpawnArea)
    }
}

/// A single cell of a room grid.
///
/// Cells are values: carving replaces them wholesale rather than mutating them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileCell {
    /// Behavioral category
    pub tile_type: TileType,
    /// Exclusion markers
    pub flags: BTreeSet<TileFlag>,
    /// Entity occupying this cell, if any
    pub entity_id: Option<EntityId>,
    /// Free-form tile metadata
    pub metadata: HashMap<String, String>,
}

impl Default for TileType {
    fn default() -> Self {
        TileType::Air
    }
}

impl TileCell {
    /// Creates a cell of the given type with no flags.
    pub fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            ..Default::default()
        }
    }

    /// Creates a plain wall cell.
    pub fn wall() -> Self {
        Self::new(TileType::Wall)
    }

    /// Creates a plain air cell.
    pub fn air() -> Self {
        Self::new(TileType::Air)
    }

    /// Creates a door cell tagged as generator-placed.
    pub fn door() -> Self {
        Self::new(TileType::Door).with_flag(TileFlag::PcgDoor)
    }

    /// Returns a copy of this cell with an extra flag.
    pub fn with_flag(mut self, flag: TileFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    /// Returns a copy of this cell occupied by an entity.
    pub fn with_entity(mut self, entity_id: EntityId) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    /// Returns true if the cell carries the given flag.
    pub fn has_flag(&self, flag: &TileFlag) -> bool {
        self.flags.contains(flag)
    }

    /// Returns true if any exclusion flag is present.
    pub fn is_protected(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Returns true if a flag other than the overridable ones is present.
    pub fn is_hard_protected(&self) -> bool {
        self.flags.iter().any(|flag| !flag.overridable_for_connectivity())
    }

    /// Sets metadata for this cell.
    pub fn set_metadata(&mut self, key: String, value: String) {
        self.metadata.insert(key, value);
    }

    /// Gets metadata value by key.
    pub fn get_metadata(&self, key: &str) -> Option<&String> {
        self.metadata.get(key)
    }
}
