//! # Levels
//!
//! A level is a graph of room identifiers plus a side table owning the rooms.
//! Door links reference rooms by identifier only.

use crate::{ForgeError, ForgeResult, Room};
use pathfinding::prelude::bfs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Identifier of a room inside a level.
pub type RoomId = String;

/// Returns the identifier of the `index`-th room of a level.
pub fn room_token(index: usize) -> RoomId {
    format!("room_{}", index)
}

/// Shape of the room graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    /// Simple chain
    Linear,
    /// Main path with dead-end side rooms
    Branching,
    /// Branching plus skip-ahead shortcuts
    Looping,
}

impl FromStr for LayoutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(LayoutType::Linear),
            "branching" => Ok(LayoutType::Branching),
            "looping" => Ok(LayoutType::Looping),
            other => Err(format!("unknown layout type: {}", other)),
        }
    }
}

/// Directed adjacency between rooms, preserving node insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomGraph {
    order: Vec<RoomId>,
    adjacency: HashMap<RoomId, Vec<RoomId>>,
}

impl RoomGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node if it is not present yet.
    pub fn add_node(&mut self, room_id: impl Into<RoomId>) {
        let room_id = room_id.into();
        if !self.adjacency.contains_key(&room_id) {
            self.order.push(room_id.clone());
            self.adjacency.insert(room_id, Vec::new());
        }
    }

    /// Adds a directed edge, creating both nodes as needed.
    ///
    /// Returns false if the edge already existed.
    pub fn add_edge(&mut self, from: impl Into<RoomId>, to: impl Into<RoomId>) -> bool {
        let from = from.into();
        let to = to.into();
        self.add_node(from.clone());
        self.add_node(to.clone());

        let neighbors = self.adjacency.entry(from).or_default();
        if neighbors.contains(&to) {
            return false;
        }
        neighbors.push(to);
        true
    }

    /// Checks whether a directed edge exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.neighbors(from).iter().any(|id| id == to)
    }

    /// Node identifiers in insertion order.
    pub fn nodes(&self) -> &[RoomId] {
        &self.order
    }

    /// Ordered neighbors of a node; empty for unknown nodes.
    pub fn neighbors(&self, room_id: &str) -> &[RoomId] {
        self.adjacency
            .get(room_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Nodes without outgoing edges, in insertion order.
    pub fn sinks(&self) -> impl Iterator<Item = &RoomId> {
        self.order
            .iter()
            .filter(move |id| self.neighbors(id).is_empty())
    }

    /// Checks whether a node exists.
    pub fn contains(&self, room_id: &str) -> bool {
        self.adjacency.contains_key(room_id)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Shortest path between two nodes, endpoints included.
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<RoomId>> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        bfs(
            &from.to_string(),
            |id| self.neighbors(id).to_vec(),
            |id| id == to,
        )
    }
}

/// A directed connection from a door in one room to a door in another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorLink {
    pub from_room_id: RoomId,
    pub to_room_id: RoomId,
    pub from_door_id: String,
    pub to_door_id: String,
    pub choice_label: String,
}

/// A complete multi-room level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelGraph {
    /// Room adjacency
    pub graph: RoomGraph,
    /// Rooms owned by the level
    pub rooms: HashMap<RoomId, Room>,
    /// Where the player starts
    pub start_room_id: Option<RoomId>,
    /// Where the level ends
    pub goal_room_id: Option<RoomId>,
    /// Seed the level was generated from
    pub seed: u64,
    /// Door wiring between rooms
    pub door_links: Vec<DoorLink>,
}

impl LevelGraph {
    /// Creates an empty level.
    pub fn new(seed: u64) -> Self {
        Self::with_graph(RoomGraph::new(), seed)
    }

    /// Creates a level over an existing room graph with no rooms generated yet.
    pub fn with_graph(graph: RoomGraph, seed: u64) -> Self {
        Self {
            graph,
            rooms: HashMap::new(),
            start_room_id: None,
            goal_room_id: None,
            seed,
            door_links: Vec::new(),
        }
    }

    /// Takes ownership of a room, adding its node to the graph if needed.
    pub fn add_room(&mut self, room_id: impl Into<RoomId>, room: Room) {
        let room_id = room_id.into();
        self.graph.add_node(room_id.clone());
        self.rooms.insert(room_id, room);
    }

    /// Looks up a room.
    pub fn get_room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Looks up a room mutably.
    pub fn get_room_mut(&mut self, room_id: &str) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    /// Looks up a room, failing if it is missing.
    pub fn room(&self, room_id: &str) -> ForgeResult<&Room> {
        self.get_room(room_id)
            .ok_or_else(|| ForgeError::UnknownRoom(room_id.to_string()))
    }

    /// Adds a directed edge between two rooms.
    pub fn connect_rooms(&mut self, from: &str, to: &str) -> bool {
        self.graph.add_edge(from, to)
    }

    /// Ordered neighbors of a room.
    pub fn neighbors(&self, room_id: &str) -> &[RoomId] {
        self.graph.neighbors(room_id)
    }

    /// Room identifiers in generation order.
    pub fn room_ids(&self) -> &[RoomId] {
        self.graph.nodes()
    }

    /// Shortest room path from start to goal, both included.
    pub fn shortest_path_to_goal(&self) -> Option<Vec<RoomId>> {
        let start = self.start_room_id.as_deref()?;
        let goal = self.goal_room_id.as_deref()?;
        self.graph.shortest_path(start, goal)
    }

    /// Graph distance of a room from the start room.
    pub fn room_depth(&self, room_id: &str) -> Option<u32> {
        let start = self.start_room_id.as_deref()?;
        self.graph
            .shortest_path(start, room_id)
            .map(|path| (path.len() - 1) as u32)
    }

    /// Door links leaving a room.
    pub fn links_from<'a>(&'a self, room_id: &'a str) -> impl Iterator<Item = &'a DoorLink> + 'a {
        self.door_links
            .iter()
            .filter(move |link| link.from_room_id == room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TileCell;

    fn chain(n: usize) -> RoomGraph {
        let mut graph = RoomGraph::new();
        for i in 0..n {
            graph.add_node(room_token(i));
            if i > 0 {
                graph.add_edge(room_token(i - 1), room_token(i));
            }
        }
        graph
    }

    #[test]
    fn test_graph_preserves_insertion_order() {
        let graph = chain(12);
        assert_eq!(graph.nodes()[0], "room_0");
        assert_eq!(graph.nodes()[10], "room_10");
        assert_eq!(graph.len(), 12);
        assert_eq!(graph.edge_count(), 11);
    }

    #[test]
    fn test_graph_rejects_duplicate_edges() {
        let mut graph = chain(3);
        assert!(!graph.add_edge("room_0", "room_1"));
        assert!(graph.add_edge("room_0", "room_2"));
        assert!(graph.has_edge("room_0", "room_2"));
        assert_eq!(graph.neighbors("room_0"), &["room_1".to_string(), "room_2".to_string()]);
    }

    #[test]
    fn test_graph_sinks() {
        let mut graph = chain(3);
        graph.add_edge("room_0", "room_3");
        let sinks: Vec<_> = graph.sinks().cloned().collect();
        assert_eq!(sinks, vec!["room_2".to_string(), "room_3".to_string()]);
    }

    #[test]
    fn test_shortest_path_prefers_shortcuts() {
        let mut graph = chain(5);
        assert_eq!(graph.shortest_path("room_0", "room_4").map(|p| p.len()), Some(5));

        graph.add_edge("room_1", "room_4");
        let path = graph.shortest_path("room_0", "room_4").unwrap();
        assert_eq!(path, vec!["room_0", "room_1", "room_4"]);

        assert!(graph.shortest_path("room_4", "room_0").is_none());
        assert!(graph.shortest_path("room_0", "nowhere").is_none());
    }

    #[test]
    fn test_level_rooms_and_depth() {
        let mut level = LevelGraph::with_graph(chain(3), 7);
        level.add_room("room_0", Room::new(5, 5, TileCell::wall()));
        level.start_room_id = Some("room_0".to_string());
        level.goal_room_id = Some("room_2".to_string());

        assert!(level.get_room("room_0").is_some());
        assert!(matches!(level.room("room_9"), Err(ForgeError::UnknownRoom(_))));
        assert_eq!(level.room_depth("room_2"), Some(2));
        assert_eq!(level.room_depth("room_0"), Some(0));
        assert_eq!(level.shortest_path_to_goal().map(|p| p.len()), Some(3));
    }

    #[test]
    fn test_layout_type_parsing() {
        assert_eq!("Linear".parse::<LayoutType>(), Ok(LayoutType::Linear));
        assert_eq!("looping".parse::<LayoutType>(), Ok(LayoutType::Looping));
        assert!("spiral".parse::<LayoutType>().is_err());
    }
}
