//! # Rooms
//!
//! A room is a sparse tile grid plus the door table, spawn point and spawn
//! areas the generator attaches to it.

use crate::{ForgeError, ForgeResult, Position, RoomId, TileCell, TileType};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Identifier of a door inside one room.
pub type DoorId = String;

/// Returns the door identifier for the `index`-th door of a room.
///
/// The entrance takes index 0, so it is always allocated before any exit.
/// Tokens sort in index order: letters first, then fixed-width `Z`-prefixed
/// numbers.
///
/// # Examples
///
/// ```
/// use roomforge::door_token;
///
/// assert_eq!(door_token(0), "A");
/// assert_eq!(door_token(2), "C");
/// assert_eq!(door_token(26), "Z0026");
/// ```
pub fn door_token(index: usize) -> DoorId {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        format!("Z{:04}", index)
    }
}

/// Sparse coordinate-keyed tile storage with a default fill.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomGrid {
    width: i32,
    height: i32,
    default_tile: TileCell,
    cells: HashMap<Position, TileCell>,
}

impl RoomGrid {
    /// Creates a grid where every coordinate reads as `default_tile`.
    pub fn new(width: i32, height: i32, default_tile: TileCell) -> Self {
        Self {
            width,
            height,
            default_tile,
            cells: HashMap::new(),
        }
    }

    /// Width in tiles.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Checks whether a coordinate lies inside the grid.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Checks whether a coordinate lies inside the grid with a one-tile border excluded.
    pub fn is_interior(&self, pos: Position) -> bool {
        pos.x >= 1 && pos.y >= 1 && pos.x < self.width - 1 && pos.y < self.height - 1
    }

    /// Gets the cell at a position, or `None` outside the grid.
    pub fn get_tile(&self, pos: Position) -> Option<&TileCell> {
        if !self.contains(pos) {
            return None;
        }
        Some(self.cells.get(&pos).unwrap_or(&self.default_tile))
    }

    /// Gets the tile type at a position, or `None` outside the grid.
    pub fn tile_type(&self, pos: Position) -> Option<TileType> {
        self.get_tile(pos).map(|tile| tile.tile_type)
    }

    /// Returns true if the position is inside the grid and holds a wall.
    pub fn is_wall(&self, pos: Position) -> bool {
        self.tile_type(pos) == Some(TileType::Wall)
    }

    /// Returns true if the position is inside the grid and holds air.
    pub fn is_air(&self, pos: Position) -> bool {
        self.tile_type(pos) == Some(TileType::Air)
    }

    /// Replaces the cell at a position.
    pub fn set_tile(&mut self, pos: Position, tile: TileCell) -> ForgeResult<()> {
        if !self.contains(pos) {
            return Err(ForgeError::OutOfBounds { x: pos.x, y: pos.y });
        }
        self.cells.insert(pos, tile);
        Ok(())
    }

    /// Iterates every coordinate in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    /// Counts coordinates holding the given tile type.
    pub fn count_tiles(&self, tile_type: TileType) -> usize {
        self.positions()
            .filter(|&pos| self.tile_type(pos) == Some(tile_type))
            .count()
    }
}

/// Role of a door within its room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorType {
    Entrance,
    Exit,
}

/// A transit point out of (or into) a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Door {
    /// Identifier, unique within the room
    pub id: DoorId,
    /// Door tile position; the ground tile sits directly below it
    pub position: Position,
    /// Entrance or exit
    pub door_type: DoorType,
    /// Choice label -> destination room
    pub destinations: BTreeMap<String, RoomId>,
}

impl Door {
    /// Creates an unlinked door.
    pub fn new(id: DoorId, position: Position, door_type: DoorType) -> Self {
        Self {
            id,
            position,
            door_type,
            destinations: BTreeMap::new(),
        }
    }

    /// Records where a choice label leads.
    pub fn add_destination(&mut self, choice_label: impl Into<String>, room_id: impl Into<RoomId>) {
        self.destinations.insert(choice_label.into(), room_id.into());
    }

    /// Looks up the destination for a choice label.
    pub fn destination(&self, choice_label: &str) -> Option<&RoomId> {
        self.destinations.get(choice_label)
    }

    /// Returns true once any destination has been recorded.
    pub fn is_linked(&self) -> bool {
        !self.destinations.is_empty()
    }

    /// The ground tile the door stands on.
    pub fn ground(&self) -> Position {
        self.position.below()
    }
}

/// A rectangular zone where external logic may spawn entities.
///
/// The generator only decides placement and density; it never spawns anything.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnArea {
    /// Top-left corner
    pub position: Position,
    /// (width, height) in tiles
    pub size: (i32, i32),
    /// Rules such as `allow_enemies`, `max_enemies`, `difficulty_min`
    pub spawn_rules: BTreeMap<String, serde_json::Value>,
    /// Entity identifiers that may spawn here
    pub possible_entities: Vec<String>,
    /// Entity tags that may spawn here
    pub allowed_entity_tags: Vec<String>,
}

impl SpawnArea {
    /// Creates a spawn area with no rules.
    pub fn new(position: Position, size: (i32, i32)) -> Self {
        Self {
            position,
            size,
            spawn_rules: BTreeMap::new(),
            possible_entities: Vec::new(),
            allowed_entity_tags: Vec::new(),
        }
    }

    /// Checks if a point is within this spawn area.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomforge::{Position, SpawnArea};
    ///
    /// let area = SpawnArea::new(Position::new(2, 3), (4, 2));
    /// assert!(area.contains_point(Position::new(5, 4)));
    /// assert!(!area.contains_point(Position::new(6, 4)));
    /// ```
    pub fn contains_point(&self, pos: Position) -> bool {
        pos.x >= self.position.x
            && pos.y >= self.position.y
            && pos.x < self.position.x + self.size.0
            && pos.y < self.position.y + self.size.1
    }

    /// Returns every coordinate covered by this spawn area.
    pub fn all_coords(&self) -> Vec<Position> {
        let mut coords = Vec::with_capacity((self.size.0 * self.size.1).max(0) as usize);
        for dy in 0..self.size.1 {
            for dx in 0..self.size.0 {
                coords.push(Position::new(self.position.x + dx, self.position.y + dy));
            }
        }
        coords
    }

    /// Checks whether two areas come within `spacing` tiles of each other.
    pub fn is_near(&self, other: &SpawnArea, spacing: i32) -> bool {
        !(self.position.x + self.size.0 + spacing <= other.position.x
            || other.position.x + other.size.0 + spacing <= self.position.x
            || self.position.y + self.size.1 + spacing <= other.position.y
            || other.position.y + other.size.1 + spacing <= self.position.y)
    }
}

/// One generated room.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    /// Tile storage
    pub grid: RoomGrid,
    /// Door table keyed by door id; the entrance sorts first
    pub doors: BTreeMap<DoorId, Door>,
    /// Where the player appears when the room is entered from the start
    pub player_spawn: Option<Position>,
    /// Advisory spawn zones
    pub spawn_areas: Vec<SpawnArea>,
    /// Assigned difficulty score
    pub difficulty_rating: u32,
    /// Distance in rooms from the level start
    pub depth_from_start: u32,
    /// Enemies per air tile
    pub enemy_density: f64,
}

impl Room {
    /// Creates an empty room where every tile reads as `default_tile`.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomforge::{Position, Room, TileCell, TileType};
    ///
    /// let room = Room::new(10, 8, TileCell::wall());
    /// assert_eq!(room.size(), (10, 8));
    /// assert_eq!(room.tile_type(Position::new(3, 3)), Some(TileType::Wall));
    /// assert!(room.get_tile(Position::new(10, 0)).is_none());
    /// ```
    pub fn new(width: i32, height: i32, default_tile: TileCell) -> Self {
        Self {
            grid: RoomGrid::new(width, height, default_tile),
            doors: BTreeMap::new(),
            player_spawn: None,
            spawn_areas: Vec::new(),
            difficulty_rating: 1,
            depth_from_start: 0,
            enemy_density: 0.0,
        }
    }

    /// (width, height) in tiles.
    pub fn size(&self) -> (i32, i32) {
        (self.grid.width(), self.grid.height())
    }

    /// Width in tiles.
    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    /// Height in tiles.
    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    /// Gets the cell at a position, or `None` outside the room.
    pub fn get_tile(&self, pos: Position) -> Option<&TileCell> {
        self.grid.get_tile(pos)
    }

    /// Gets the tile type at a position, or `None` outside the room.
    pub fn tile_type(&self, pos: Position) -> Option<TileType> {
        self.grid.tile_type(pos)
    }

    /// Replaces the cell at a position.
    pub fn set_tile(&mut self, pos: Position, tile: TileCell) -> ForgeResult<()> {
        self.grid.set_tile(pos, tile)
    }

    /// Replaces a cell whose position the caller derived from the room bounds.
    ///
    /// Debug builds panic on an out-of-bounds write; release builds drop it.
    pub fn place_tile(&mut self, pos: Position, tile: TileCell) {
        let written = self.set_tile(pos, tile);
        debug_assert!(written.is_ok(), "tile write outside the room at {}", pos);
    }

    /// Registers a door. Returns false if the id is already taken.
    pub fn add_door(&mut self, door: Door) -> bool {
        if self.doors.contains_key(&door.id) {
            return false;
        }
        self.doors.insert(door.id.clone(), door);
        true
    }

    /// The identifier the next registered door should use.
    pub fn next_door_id(&self) -> DoorId {
        door_token(self.doors.len())
    }

    /// The first door in identifier order.
    pub fn first_door(&self) -> Option<&Door> {
        self.doors.values().next()
    }

    /// The last door in identifier order.
    pub fn last_door(&self) -> Option<&Door> {
        self.doors.values().next_back()
    }

    /// The entrance door, if placed.
    pub fn entrance(&self) -> Option<&Door> {
        self.doors
            .values()
            .find(|door| door.door_type == DoorType::Entrance)
    }

    /// All exit doors in identifier order.
    pub fn exits(&self) -> impl Iterator<Item = &Door> {
        self.doors
            .values()
            .filter(|door| door.door_type == DoorType::Exit)
    }

    /// Number of exit doors.
    pub fn exit_count(&self) -> usize {
        self.exits().count()
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let pos = Position::new(x, y);
                let symbol = match self.tile_type(pos) {
                    Some(_) if self.player_spawn == Some(pos) => 'S',
                    Some(tile_type) => tile_type.display_char(),
                    None => ' ',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
