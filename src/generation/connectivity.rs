//! # Connectivity
//!
//! Flood-fill region detection and corridor bridging between regions.

use super::carving::{carve_line, CarveMode};
use super::{GenerationConfig, GenerationFailure};
use crate::config::{MAX_REPAIR_ATTEMPTS, REPAIR_SAMPLE_POINTS};
use crate::utils::evenly_spaced;
use crate::{MovementAttributes, Position, Room};
use log::debug;
use std::collections::{BTreeSet, HashSet, VecDeque};

/// Groups the air tiles of a room into maximal 4-connected regions.
///
/// Regions are returned in row-major discovery order. Door tiles are not air
/// and belong to no region.
pub fn find_regions(room: &Room) -> Vec<BTreeSet<Position>> {
    let mut seen: HashSet<Position> = HashSet::new();
    let mut regions = Vec::new();

    for pos in room.grid.positions() {
        if seen.contains(&pos) || !room.grid.is_air(pos) {
            continue;
        }

        let mut region = BTreeSet::new();
        let mut queue = VecDeque::from([pos]);
        seen.insert(pos);

        while let Some(current) = queue.pop_front() {
            region.insert(current);
            for next in current.cardinal_adjacent_positions() {
                if room.grid.is_air(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        regions.push(region);
    }

    regions
}

/// Closest pair of sampled points between two regions by Manhattan distance.
///
/// Up to `REPAIR_SAMPLE_POINTS` evenly spaced points are drawn from each side;
/// the first pair found wins ties.
pub fn closest_pair(
    first: &BTreeSet<Position>,
    second: &BTreeSet<Position>,
) -> Option<(Position, Position)> {
    let first: Vec<Position> = first.iter().copied().collect();
    let second: Vec<Position> = second.iter().copied().collect();
    let first = evenly_spaced(&first, REPAIR_SAMPLE_POINTS);
    let second = evenly_spaced(&second, REPAIR_SAMPLE_POINTS);

    let mut best: Option<(Position, Position, u32)> = None;
    for &a in &first {
        for &b in &second {
            let distance = a.manhattan_distance(b);
            if best.map_or(true, |(_, _, d)| distance < d) {
                best = Some((a, b, distance));
            }
        }
    }

    best.map(|(a, b, _)| (a, b))
}

/// Corridor endpoints joining the first two regions.
fn bridge_endpoints(
    regions: &[BTreeSet<Position>],
) -> Result<(Position, Position), GenerationFailure> {
    match regions {
        [first, second, ..] => closest_pair(first, second).ok_or(GenerationFailure::NoRepairCandidates),
        _ => Err(GenerationFailure::NoRepairCandidates),
    }
}

/// Bridges disconnected regions until the room's air forms one region.
///
/// Each pass joins the first two regions with a corridor that ignores
/// exclusion flags. Repairing a connected room changes nothing.
pub fn repair_connectivity(
    room: &mut Room,
    config: &GenerationConfig,
    attrs: &MovementAttributes,
) -> Result<(), GenerationFailure> {
    let block = attrs.corridor_block(config.min_corridor_width, config.min_corridor_height);

    for pass in 0..MAX_REPAIR_ATTEMPTS {
        let regions = find_regions(room);
        if regions.len() <= 1 {
            return Ok(());
        }

        let (from, to) = bridge_endpoints(&regions)?;
        debug!(
            "Repair pass {}: {} regions, bridging {} -> {}",
            pass + 1,
            regions.len(),
            from,
            to
        );
        carve_line(room, from, to, block, CarveMode::IgnoreFlags);
    }

    let remaining = find_regions(room).len();
    if remaining <= 1 {
        Ok(())
    } else {
        Err(GenerationFailure::RepairExhausted { regions: remaining })
    }
}
