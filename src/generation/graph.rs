//! # Level Assembly
//!
//! Builds a room graph, generates one validated room per node and wires the
//! rooms together through their doors.

use super::{generate_validated_room, GenerationConfig, LevelGenerationConfig};
use crate::config::DEFAULT_CHOICE_LABEL;
use crate::{
    room_token, DoorLink, LayoutType, LevelGraph, MovementAttributes, Room, RoomGraph, RoomId,
};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builds the room graph for a level configuration.
pub fn build_room_graph(level_config: &LevelGenerationConfig, rng: &mut StdRng) -> RoomGraph {
    match level_config.layout_type {
        LayoutType::Linear => build_linear_graph(level_config.num_rooms),
        LayoutType::Branching => build_branching_graph(level_config, rng),
        LayoutType::Looping => build_looping_graph(level_config, rng),
    }
}

/// A simple chain `room_0 -> room_1 -> ...`.
///
/// # Examples
///
/// ```
/// use roomforge::build_linear_graph;
///
/// let graph = build_linear_graph(3);
/// assert_eq!(graph.len(), 3);
/// assert!(graph.has_edge("room_0", "room_1"));
/// assert!(graph.neighbors("room_2").is_empty());
/// ```
pub fn build_linear_graph(num_rooms: usize) -> RoomGraph {
    let mut graph = RoomGraph::new();
    for index in 0..num_rooms {
        graph.add_node(room_token(index));
        if index > 0 {
            graph.add_edge(room_token(index - 1), room_token(index));
        }
    }
    graph
}

fn main_path_length(num_rooms: usize) -> usize {
    (num_rooms / 2).max(2).min(num_rooms)
}

/// A main chain with dead-end side rooms hanging off its early rooms.
///
/// The main path holds half the rooms (at least two). At most
/// `exit_doors_per_room - 1` side rooms are added, never more than the rooms
/// left over.
pub fn build_branching_graph(level_config: &LevelGenerationConfig, rng: &mut StdRng) -> RoomGraph {
    let num_rooms = level_config.num_rooms;
    let main_length = main_path_length(num_rooms);
    let mut graph = build_linear_graph(main_length);

    let max_branches = (level_config.exit_doors_per_room.saturating_sub(1) as usize)
        .min(num_rooms - main_length);
    let mut next_room = main_length;

    for index in 0..main_length.saturating_sub(1) {
        if next_room - main_length >= max_branches {
            break;
        }
        if rng.gen_bool(level_config.branch_probability) {
            graph.add_edge(room_token(index), room_token(next_room));
            next_room += 1;
        }
    }

    graph
}

/// A branching graph plus skip-ahead edges along the main path.
///
/// Each main-path room may link to one of the rooms two to four steps ahead.
pub fn build_looping_graph(level_config: &LevelGenerationConfig, rng: &mut StdRng) -> RoomGraph {
    let mut graph = build_branching_graph(level_config, rng);
    let main_length = main_path_length(level_config.num_rooms);

    for index in 0..main_length.saturating_sub(2) {
        if !rng.gen_bool(level_config.loop_probability) {
            continue;
        }
        let last = (index + 4).min(main_length - 1);
        let target = rng.gen_range(index + 2..=last);
        if graph.add_edge(room_token(index), room_token(target)) {
            debug!("Loop edge room_{} -> room_{}", index, target);
        }
    }

    graph
}

/// Generates a complete level: graph, rooms and door links.
///
/// Room `i` is generated at its graph distance from the start and asks for one
/// exit per outgoing edge. If the goal turns out unreachable the whole level is
/// replaced by a linear one.
#[cfg_attr(feature = "dev-tools", tracing::instrument(skip_all, fields(seed = seed)))]
pub fn generate_complete_level(
    room_config: &GenerationConfig,
    level_config: &LevelGenerationConfig,
    attrs: &MovementAttributes,
    seed: u64,
) -> LevelGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let graph = build_room_graph(level_config, &mut rng);
    let level = assemble_level(graph, room_config, attrs, seed, &mut rng);

    if level.shortest_path_to_goal().is_some() {
        info!(
            "Assembled {:?} level with {} rooms and {} door links",
            level_config.layout_type,
            level.rooms.len(),
            level.door_links.len()
        );
        return level;
    }

    warn!("Goal unreachable in generated level, falling back to a linear level");
    generate_linear_fallback_level(room_config, level_config.num_rooms, attrs, seed)
}

/// Generates a linear level with one exit per room.
pub fn generate_linear_fallback_level(
    room_config: &GenerationConfig,
    num_rooms: usize,
    attrs: &MovementAttributes,
    seed: u64,
) -> LevelGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    assemble_level(build_linear_graph(num_rooms.max(1)), room_config, attrs, seed, &mut rng)
}

fn assemble_level(
    graph: RoomGraph,
    room_config: &GenerationConfig,
    attrs: &MovementAttributes,
    seed: u64,
    rng: &mut StdRng,
) -> LevelGraph {
    let mut level = LevelGraph::with_graph(graph, seed);
    let node_ids: Vec<RoomId> = level.room_ids().to_vec();

    level.start_room_id = node_ids.first().cloned();
    level.goal_room_id = level
        .graph
        .sinks()
        .last()
        .cloned()
        .or_else(|| node_ids.last().cloned());

    for room_id in &node_ids {
        let depth = level.room_depth(room_id).unwrap_or(0);
        let exit_count = level.neighbors(room_id).len().max(1);
        let config = room_config.with_seed(rng.gen());
        let room = generate_validated_room(&config, attrs, depth, exit_count);
        debug!(
            "Generated {} at depth {} with {} exits",
            room_id,
            depth,
            room.exit_count()
        );
        level.add_room(room_id.clone(), room);
    }

    link_doors(&mut level);
    level
}

/// Links a door of the source room to a door of the target room for every
/// graph edge, recording the destination on the source door.
///
/// Source doors are unused exits first; when a room has fewer exits than
/// edges, its exits are reused under a fresh choice label.
pub fn link_doors(level: &mut LevelGraph) {
    let edges: Vec<(RoomId, RoomId)> = level
        .room_ids()
        .iter()
        .flat_map(|from| {
            level
                .neighbors(from)
                .iter()
                .map(move |to| (from.clone(), to.clone()))
        })
        .collect();

    for (from, to) in edges {
        let Some(to_door_id) = level
            .get_room(&to)
            .and_then(|room| room.entrance().or_else(|| room.first_door()))
            .map(|door| door.id.clone())
        else {
            continue;
        };
        let Some(source) = level.get_room_mut(&from) else {
            continue;
        };
        let Some(from_door_id) = pick_source_door(source) else {
            continue;
        };
        let Some(door) = source.doors.get_mut(&from_door_id) else {
            continue;
        };

        let mut choice_label = DEFAULT_CHOICE_LABEL.to_string();
        let mut suffix = 1;
        while door.destinations.contains_key(&choice_label) {
            choice_label = format!("{}_{}", DEFAULT_CHOICE_LABEL, suffix);
            suffix += 1;
        }
        door.add_destination(choice_label.clone(), to.clone());

        level.door_links.push(DoorLink {
            from_room_id: from,
            to_room_id: to,
            from_door_id,
            to_door_id,
            choice_label,
        });
    }
}

fn pick_source_door(room: &Room) -> Option<String> {
    room.exits()
        .find(|door| !door.is_linked())
        .or_else(|| room.exits().next())
        .or_else(|| room.first_door())
        .map(|door| door.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> GenerationConfig {
        GenerationConfig {
            max_room_generation_attempts: 40,
            ..GenerationConfig::for_testing(seed)
        }
    }

    #[test]
    fn test_linear_graph() {
        let graph = build_linear_graph(5);
        assert_eq!(graph.len(), 5);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.sinks().collect::<Vec<_>>(), vec!["room_4"]);
        assert!(build_linear_graph(0).is_empty());
    }

    #[test]
    fn test_branching_graph_bounds() {
        for seed in 0..20 {
            let config = LevelGenerationConfig::new(8, LayoutType::Branching);
            let graph = build_branching_graph(&config, &mut StdRng::seed_from_u64(seed));

            // Main path of four rooms plus at most one branch
            assert!(graph.len() == 4 || graph.len() == 5);
            for index in 0..3 {
                assert!(graph.has_edge(&room_token(index), &room_token(index + 1)));
            }
            if graph.len() == 5 {
                assert!(graph.neighbors("room_4").is_empty());
                assert!(!graph.has_edge("room_3", "room_4"));
            }
        }
    }

    #[test]
    fn test_branching_needs_spare_exits() {
        let mut config = LevelGenerationConfig::new(8, LayoutType::Branching);
        config.exit_doors_per_room = 1;
        config.branch_probability = 1.0;
        let graph = build_branching_graph(&config, &mut StdRng::seed_from_u64(1));
        assert_eq!(graph.len(), 4);
    }

    #[test]
    fn test_branching_with_certain_branch() {
        let mut config = LevelGenerationConfig::new(6, LayoutType::Branching);
        config.branch_probability = 1.0;
        let graph = build_branching_graph(&config, &mut StdRng::seed_from_u64(1));
        assert_eq!(graph.len(), 4);
        assert!(graph.has_edge("room_0", "room_3"));
    }

    #[test]
    fn test_single_room_level_graph() {
        let config = LevelGenerationConfig::new(1, LayoutType::Branching);
        let graph = build_branching_graph(&config, &mut StdRng::seed_from_u64(1));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_looping_edges_skip_ahead() {
        let mut config = LevelGenerationConfig::new(16, LayoutType::Looping);
        config.loop_probability = 1.0;
        let graph = build_looping_graph(&config, &mut StdRng::seed_from_u64(5));
        let main_length = 8;

        for index in 0..main_length - 2 {
            let from = room_token(index);
            let skips: Vec<_> = graph
                .neighbors(&from)
                .iter()
                .filter_map(|id| id.strip_prefix("room_")?.parse::<usize>().ok())
                .filter(|&target| target < main_length && target >= index + 2)
                .collect();
            assert_eq!(skips.len(), 1, "room_{} should have one skip edge", index);
            assert!(skips[0] <= index + 4);
        }
    }

    #[test]
    fn test_link_doors_labels_and_destinations() {
        let mut level =
            generate_linear_fallback_level(&small_config(3), 3, &MovementAttributes::default(), 3);
        assert_eq!(level.door_links.len(), 2);

        let link = &level.door_links[0];
        assert_eq!(link.from_room_id, "room_0");
        assert_eq!(link.to_room_id, "room_1");
        assert_eq!(link.choice_label, DEFAULT_CHOICE_LABEL);
        assert_eq!(link.to_door_id, "A");

        let source = level.get_room("room_0").unwrap();
        let door = &source.doors[&link.from_door_id];
        assert_eq!(door.destination(DEFAULT_CHOICE_LABEL), Some(&"room_1".to_string()));

        // A second edge out of a one-exit room reuses the exit under a new label
        level.connect_rooms("room_0", "room_2");
        level.door_links.clear();
        for room in level.rooms.values_mut() {
            for door in room.doors.values_mut() {
                door.destinations.clear();
            }
        }
        link_doors(&mut level);
        let labels: Vec<_> = level
            .links_from("room_0")
            .map(|link| link.choice_label.clone())
            .collect();
        assert_eq!(level.get_room("room_0").unwrap().exit_count(), 1);
        assert_eq!(labels, vec!["default".to_string(), "default_1".to_string()]);
    }

    #[test]
    fn test_complete_level_depths_and_goal() {
        let level_config = LevelGenerationConfig::new(4, LayoutType::Linear);
        let level = generate_complete_level(
            &small_config(11),
            &level_config,
            &MovementAttributes::default(),
            11,
        );

        assert_eq!(level.start_room_id.as_deref(), Some("room_0"));
        assert_eq!(level.goal_room_id.as_deref(), Some("room_3"));
        assert_eq!(level.rooms.len(), 4);
        for (index, room_id) in level.room_ids().iter().enumerate() {
            assert_eq!(level.rooms[room_id].depth_from_start, index as u32);
        }
        assert_eq!(level.rooms["room_0"].difficulty_rating, 1);
        assert_eq!(level.shortest_path_to_goal().map(|path| path.len()), Some(4));
    }
}
