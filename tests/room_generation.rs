//! End-to-end checks on rooms returned by the validation pipeline.

use proptest::prelude::*;
use roomforge::{
    find_regions, generate_fallback_room, generate_validated_room, get_spawn_quadrant,
    verify_traversable, DoorType, GenerationConfig, MovementAttributes, Room, TileType,
    TraversalVerifier,
};

fn is_fallback(room: &Room) -> bool {
    room.entrance().map(|door| door.position) != room.player_spawn
}

#[test]
fn test_seed_42_two_exit_room() {
    let config = GenerationConfig::for_testing(42);
    let attrs = MovementAttributes::default();
    let room = generate_validated_room(&config, &attrs, 0, 2);

    let entrances = room
        .doors
        .values()
        .filter(|door| door.door_type == DoorType::Entrance)
        .count();
    assert_eq!(entrances, 1);
    assert_eq!(room.exit_count(), 2);
    assert_eq!(find_regions(&room).len(), 1);
    assert!(verify_traversable(&room, attrs));
}

#[test]
fn test_generation_is_deterministic() {
    let attrs = MovementAttributes::default();
    for seed in [1, 7, 1234] {
        let config = GenerationConfig::for_testing(seed);
        let first = generate_validated_room(&config, &attrs, 3, 2);
        let second = generate_validated_room(&config, &attrs, 3, 2);
        assert_eq!(first, second, "seed {}", seed);
        assert_eq!(first.to_string(), second.to_string());
    }
}

#[test]
fn test_different_seeds_differ() {
    let attrs = MovementAttributes::default();
    let a = generate_validated_room(&GenerationConfig::for_testing(100), &attrs, 0, 1);
    let b = generate_validated_room(&GenerationConfig::for_testing(101), &attrs, 0, 1);
    assert_ne!(a.to_string(), b.to_string());
}

#[test]
fn test_every_door_stands_on_ground() {
    let attrs = MovementAttributes::default();
    for seed in 0..6 {
        let config = GenerationConfig::for_testing(seed);
        let room = generate_validated_room(&config, &attrs, 0, 2);
        let verifier = TraversalVerifier::new(&room, attrs);
        for door in room.doors.values() {
            assert_eq!(room.tile_type(door.position), Some(TileType::Door));
            assert!(
                verifier.is_ground(door.ground()),
                "seed {} door {} at {}",
                seed,
                door.id,
                door.position
            );
        }
    }
}

#[test]
fn test_exits_leave_the_spawn_quadrant() {
    let attrs = MovementAttributes::default();
    for seed in 0..6 {
        let config = GenerationConfig::for_testing(seed);
        let room = generate_validated_room(&config, &attrs, 0, 1);
        if is_fallback(&room) {
            continue;
        }

        let spawn = room.player_spawn.unwrap();
        let spawn_quadrant = get_spawn_quadrant(spawn, room.size());
        for exit in room.exits() {
            assert_ne!(get_spawn_quadrant(exit.position, room.size()), spawn_quadrant);
        }
    }
}

#[test]
fn test_entrance_is_first_door() {
    let attrs = MovementAttributes::default();
    let room = generate_validated_room(&GenerationConfig::for_testing(8), &attrs, 0, 2);
    let first = room.first_door().unwrap();
    assert_eq!(first.door_type, DoorType::Entrance);
    assert!(room.exits().all(|door| door.id > first.id));
}

#[test]
fn test_difficulty_follows_depth() {
    let attrs = MovementAttributes::default();
    let config = GenerationConfig::for_testing(5);
    let shallow = generate_validated_room(&config, &attrs, 0, 1);
    let deep = generate_validated_room(&config, &attrs, 6, 1);
    assert_eq!(shallow.difficulty_rating, 1);
    assert_eq!(deep.depth_from_start, 6);
    assert!(deep.difficulty_rating > shallow.difficulty_rating);
    assert!(deep.enemy_density > shallow.enemy_density);
}

#[test]
fn test_fallback_room_is_always_valid() {
    for min_room_size in [12, 20, 33] {
        let config = GenerationConfig {
            min_room_size,
            max_room_size: min_room_size,
            ..GenerationConfig::default()
        };
        let attrs = MovementAttributes::default();
        let room = generate_fallback_room(&config, &attrs);
        assert_eq!(room.size(), (min_room_size, min_room_size));
        assert_eq!(room.doors.len(), 2);
        assert_eq!(find_regions(&room).len(), 1);
        assert!(verify_traversable(&room, attrs));
    }
}

#[test]
fn test_stricter_physics_never_breaks_generation() {
    let config = GenerationConfig::for_testing(64);
    let attrs = MovementAttributes::with_jump(2, 3);
    let room = generate_validated_room(&config, &attrs, 0, 1);
    assert!(verify_traversable(&room, attrs));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_same_seed_same_room(seed in any::<u64>(), depth in 0u32..6, exits in 1usize..3) {
        let config = GenerationConfig::for_testing(seed);
        let attrs = MovementAttributes::default();
        let first = generate_validated_room(&config, &attrs, depth, exits);
        let second = generate_validated_room(&config, &attrs, depth, exits);
        prop_assert_eq!(&first, &second);
        prop_assert!(verify_traversable(&first, attrs));
    }
}
