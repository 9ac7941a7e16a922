//! Traversal verifier scenarios and reachability properties.

use proptest::prelude::*;
use roomforge::{
    get_available_quadrants, get_spawn_quadrant, reachable_ground, verify_traversable, Door,
    DoorType, MovementAttributes, Position, Quadrant, Room, TileCell,
};

/// 16x5 air room with a wall floor on the bottom row and an air gap
/// spanning `gap` columns starting at x = 4.
fn gap_room(gap: i32) -> Room {
    let mut room = Room::new(16, 5, TileCell::air());
    for x in 0..16 {
        if !(4..4 + gap).contains(&x) {
            room.set_tile(Position::new(x, 4), TileCell::wall()).unwrap();
        }
    }
    for (index, x) in [1, 14].into_iter().enumerate() {
        let pos = Position::new(x, 3);
        room.set_tile(pos, TileCell::door()).unwrap();
        let door_type = if index == 0 {
            DoorType::Entrance
        } else {
            DoorType::Exit
        };
        room.add_door(Door::new(room.next_door_id(), pos, door_type));
    }
    room
}

#[test]
fn test_seven_tile_gap_is_too_wide() {
    let attrs = MovementAttributes::default();
    assert_eq!(attrs.max_jump_distance, 6);
    assert!(!verify_traversable(&gap_room(7), attrs));
}

#[test]
fn test_five_tile_gap_is_jumpable() {
    assert!(verify_traversable(&gap_room(5), MovementAttributes::default()));
}

#[test]
fn test_gap_limit_tracks_jump_distance() {
    assert!(verify_traversable(&gap_room(7), MovementAttributes::with_jump(4, 8)));
    assert!(!verify_traversable(&gap_room(5), MovementAttributes::with_jump(4, 5)));
}

#[test]
fn test_low_ceiling_blocks_the_jump() {
    let mut room = gap_room(5);
    // A pillar hanging from the top leaves one tile of headroom over the gap
    for y in 0..=2 {
        room.set_tile(Position::new(6, y), TileCell::wall()).unwrap();
    }
    assert!(!verify_traversable(&room, MovementAttributes::default()));
    assert!(verify_traversable(
        &room,
        MovementAttributes {
            player_height: 1,
            ..MovementAttributes::default()
        }
    ));
}

#[test]
fn test_spawn_quadrant_scenario() {
    assert_eq!(get_spawn_quadrant(Position::new(5, 5), (20, 20)), Quadrant::TopLeft);

    let available = get_available_quadrants(Quadrant::TopLeft);
    assert_eq!(available.len(), 3);
    assert!(!available.contains(&Quadrant::TopLeft));
}

/// Room of 16 columns whose floors rise to the given heights.
fn terrain(heights: &[i32]) -> Room {
    let mut room = Room::new(heights.len() as i32, 12, TileCell::air());
    for (x, &height) in heights.iter().enumerate() {
        for y in (12 - height)..12 {
            room.set_tile(Position::new(x as i32, y), TileCell::wall()).unwrap();
        }
    }
    room
}

proptest! {
    #[test]
    fn prop_reachability_is_monotonic_in_jump_limits(
        heights in prop::collection::vec(1i32..8, 16),
        jump_height in 0i32..5,
        jump_distance in 0i32..7,
        extra_height in 0i32..3,
        extra_distance in 0i32..3,
    ) {
        let room = terrain(&heights);
        let start = Position::new(0, 12 - heights[0]);

        let weak = MovementAttributes::with_jump(jump_height, jump_distance);
        let strong = MovementAttributes::with_jump(
            jump_height + extra_height,
            jump_distance + extra_distance,
        );

        let weak_reach = reachable_ground(&room, weak, start);
        let strong_reach = reachable_ground(&room, strong, start);

        prop_assert!(weak_reach.contains(&start));
        prop_assert!(weak_reach.is_subset(&strong_reach));
    }

    #[test]
    fn prop_flat_floor_is_always_traversable(width in 8i32..40, jump_distance in 1i32..8) {
        let mut room = Room::new(width, 6, TileCell::air());
        for x in 0..width {
            room.set_tile(Position::new(x, 5), TileCell::wall()).unwrap();
        }
        for (index, x) in [1, width - 2].into_iter().enumerate() {
            let pos = Position::new(x, 4);
            room.set_tile(pos, TileCell::door()).unwrap();
            let door_type = if index == 0 { DoorType::Entrance } else { DoorType::Exit };
            room.add_door(Door::new(room.next_door_id(), pos, door_type));
        }

        prop_assert!(verify_traversable(&room, MovementAttributes::with_jump(0, jump_distance)));
    }
}
