//! Level graph assembly across layouts.

use roomforge::{
    generate_complete_level, generate_linear_fallback_level, verify_traversable,
    GenerationConfig, LayoutType, LevelGenerationConfig, LevelGraph, MovementAttributes,
};

fn room_config() -> GenerationConfig {
    GenerationConfig {
        max_room_generation_attempts: 40,
        place_spawn_areas: false,
        ..GenerationConfig::for_testing(0)
    }
}

fn assert_well_formed(level: &LevelGraph, attrs: MovementAttributes) {
    let start = level.start_room_id.as_deref().expect("start room");
    let goal = level.goal_room_id.as_deref().expect("goal room");
    assert_eq!(start, "room_0");
    assert!(level.graph.neighbors(goal).is_empty());

    let path = level.shortest_path_to_goal().expect("start reaches goal");
    assert_eq!(path.first().map(String::as_str), Some(start));
    assert_eq!(path.last().map(String::as_str), Some(goal));

    assert_eq!(level.rooms.len(), level.graph.len());
    assert_eq!(level.door_links.len(), level.graph.edge_count());

    for room_id in level.room_ids() {
        let room = level.room(room_id).unwrap();
        assert!(verify_traversable(room, attrs), "{} not traversable", room_id);
        assert_eq!(Some(room.depth_from_start), level.room_depth(room_id));
    }

    for link in &level.door_links {
        assert!(level.graph.has_edge(&link.from_room_id, &link.to_room_id));
        let source = level.room(&link.from_room_id).unwrap();
        let target = level.room(&link.to_room_id).unwrap();
        let door = &source.doors[&link.from_door_id];
        assert_eq!(door.destination(&link.choice_label), Some(&link.to_room_id));
        assert!(target.doors.contains_key(&link.to_door_id));
    }
}

#[test]
fn test_linear_level() {
    let attrs = MovementAttributes::default();
    let level_config = LevelGenerationConfig::new(4, LayoutType::Linear);
    let level = generate_complete_level(&room_config(), &level_config, &attrs, 42);

    assert_well_formed(&level, attrs);
    assert_eq!(level.goal_room_id.as_deref(), Some("room_3"));
    assert_eq!(level.door_links.len(), 3);
    assert_eq!(level.seed, 42);
}

#[test]
fn test_branching_level() {
    let attrs = MovementAttributes::default();
    let mut level_config = LevelGenerationConfig::new(6, LayoutType::Branching);
    level_config.branch_probability = 1.0;
    let level = generate_complete_level(&room_config(), &level_config, &attrs, 7);

    assert_well_formed(&level, attrs);
    assert_eq!(level.rooms.len(), 4);
    // The side room hangs off the start room, so the goal is the side room
    assert!(level.graph.has_edge("room_0", "room_3"));
    assert_eq!(level.goal_room_id.as_deref(), Some("room_3"));
}

#[test]
fn test_looping_level() {
    let attrs = MovementAttributes::default();
    let mut level_config = LevelGenerationConfig::new(10, LayoutType::Looping);
    level_config.loop_probability = 1.0;
    let level = generate_complete_level(&room_config(), &level_config, &attrs, 3);

    assert_well_formed(&level, attrs);
    assert!(level.graph.has_edge("room_0", "room_2")
        || level.graph.has_edge("room_0", "room_3")
        || level.graph.has_edge("room_0", "room_4"));
}

#[test]
fn test_level_generation_is_deterministic() {
    let attrs = MovementAttributes::default();
    let level_config = LevelGenerationConfig::new(3, LayoutType::Branching);
    let first = generate_complete_level(&room_config(), &level_config, &attrs, 99);
    let second = generate_complete_level(&room_config(), &level_config, &attrs, 99);
    assert_eq!(first, second);
}

#[test]
fn test_linear_fallback_level() {
    let attrs = MovementAttributes::default();
    let level = generate_linear_fallback_level(&room_config(), 3, &attrs, 5);
    assert_well_formed(&level, attrs);
    for room in level.rooms.values() {
        assert!(room.exit_count() >= 1);
    }
}
