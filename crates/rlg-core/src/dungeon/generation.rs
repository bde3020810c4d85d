//! Level generation
//!
//! Pipeline: rooms (retry or bisection strategy) on a seeded grid, chain
//! corridors, optional cycle pass, then stairs. Any failure is returned to
//! the caller; nothing here retries beyond the configured budgets.

use log::{debug, info, warn};

use super::corridor::{connect_rooms, cycle_pass};
use super::hardness::seed_hardness;
use super::partition::{Partition, PartitionTree, SplitLimits};
use super::{CellType, Level, Position, Room};
use crate::GameRng;
use crate::world::{GenerationConfig, GenerationError, RoomStrategy};

/// Generate a complete level
pub fn generate_level(
    config: &GenerationConfig,
    rng: &mut GameRng,
) -> Result<Level, GenerationError> {
    config.validate()?;

    let mut level = match config.strategy {
        RoomStrategy::Retry => place_rooms_with_retry(config, rng)?,
        RoomStrategy::Bisection => place_rooms_by_bisection(config, rng)?,
    };
    connect_rooms(&mut level, config, rng)?;
    if config.cycle_pass {
        cycle_pass(&mut level, rng)?;
    }
    place_stairs(&mut level, config, rng);

    info!(
        "generated {}x{} level: {} rooms, {:.1}% room coverage, {} up / {} down stairs",
        level.width(),
        level.height(),
        level.rooms().len(),
        level.room_coverage() * 100.0,
        level.up_stairs().len(),
        level.down_stairs().len()
    );
    Ok(level)
}

/// Allocate a level and seed its interior hardness
fn seeded_level(config: &GenerationConfig, rng: &mut GameRng) -> Level {
    let mut level = Level::new(config.width, config.height);
    seed_hardness(&mut level, config, rng);
    level
}

fn meets_coverage(rooms_area: usize, config: &GenerationConfig) -> bool {
    rooms_area as f64 >= config.min_room_coverage * config.interior_area() as f64
}

// ============================================================================
// Randomized retry
// ============================================================================

/// Room count for one attempt: the minimum, growing with probability 5/8
fn draw_room_count(config: &GenerationConfig, rng: &mut GameRng) -> usize {
    let mut count = config.min_rooms;
    while count < config.max_rooms && rng.chance(5, 8) {
        count += 1;
    }
    count
}

/// Side length: the minimum, growing with probability 3/5
fn draw_side(min: usize, max: usize, rng: &mut GameRng) -> usize {
    let mut side = min;
    while side < max && rng.chance(3, 5) {
        side += 1;
    }
    side
}

/// A random room somewhere in the interior
fn propose_room(config: &GenerationConfig, rng: &mut GameRng) -> Room {
    let interior_w = config.width - 2;
    let interior_h = config.height - 2;
    let width = draw_side(config.min_room_width, config.max_room_width, rng).min(interior_w);
    let height = draw_side(config.min_room_height, config.max_room_height, rng).min(interior_h);
    let x = rng.range(1, interior_w + 1 - width);
    let y = rng.range(1, interior_h + 1 - height);
    Room::new(x, y, width, height)
}

/// Propose whole room sets until one fits without collisions
///
/// A collision or insufficient coverage throws away the entire set.
pub fn place_rooms_with_retry(
    config: &GenerationConfig,
    rng: &mut GameRng,
) -> Result<Level, GenerationError> {
    for attempt in 1..=config.max_generation_attempts {
        let target = draw_room_count(config, rng);
        let mut rooms: Vec<Room> = Vec::with_capacity(target);
        for _ in 0..target {
            let room = propose_room(config, rng);
            if rooms.iter().any(|placed| placed.overlaps(&room, 1)) {
                break;
            }
            rooms.push(room);
        }
        if rooms.len() < target {
            continue;
        }
        if !meets_coverage(rooms.iter().map(Room::area).sum(), config) {
            continue;
        }

        debug!("placed {} rooms on attempt {}", rooms.len(), attempt);
        let mut level = seeded_level(config, rng);
        for room in rooms {
            level.paint_room(room);
        }
        return Ok(level);
    }

    warn!(
        "room placement exhausted {} attempts",
        config.max_generation_attempts
    );
    Err(GenerationError::AttemptsExhausted {
        attempts: config.max_generation_attempts,
    })
}

// ============================================================================
// Recursive bisection
// ============================================================================

/// Whether a room and the ring of cells around it are free of other rooms
pub fn is_room_valid(level: &Level, room: &Room) -> bool {
    if !room.fits_interior(level.width(), level.height()) {
        return false;
    }
    (room.y - 1..=room.bottom() + 1).all(|y| {
        (room.x - 1..=room.right() + 1).all(|x| {
            matches!(
                level.typ(Position::new(x, y)),
                CellType::Rock | CellType::WallImmutable
            )
        })
    })
}

/// Try to fit one room inside a leaf partition
fn place_room_in_leaf(
    level: &Level,
    leaf: &Partition,
    config: &GenerationConfig,
    rng: &mut GameRng,
) -> Option<Room> {
    let max_w = leaf.width.min(config.max_room_width);
    let max_h = leaf.height.min(config.max_room_height);
    if max_w < config.min_room_width || max_h < config.min_room_height {
        return None;
    }
    for _ in 0..config.leaf_room_attempts {
        let width = rng.range(config.min_room_width, max_w);
        let height = rng.range(config.min_room_height, max_h);
        let x = rng.range(leaf.x, leaf.x + leaf.width - width);
        let y = rng.range(leaf.y, leaf.y + leaf.height - height);
        let room = Room::new(x, y, width, height);
        if is_room_valid(level, &room) {
            return Some(room);
        }
    }
    None
}

/// Partition the interior and place one room per leaf
///
/// A leaf that exhausts its retries fails the attempt; the whole dungeon is
/// then rebuilt from scratch.
pub fn place_rooms_by_bisection(
    config: &GenerationConfig,
    rng: &mut GameRng,
) -> Result<Level, GenerationError> {
    let limits = SplitLimits::from_config(config);
    let root = Partition::interior(config.width, config.height);

    'attempt: for attempt in 1..=config.max_generation_attempts {
        let leaves = PartitionTree::build(root, &limits, rng).leaves();
        if leaves.len() < config.min_rooms || leaves.len() > config.max_rooms {
            debug!(
                "attempt {}: {} leaves outside room bounds",
                attempt,
                leaves.len()
            );
            continue;
        }

        let mut level = seeded_level(config, rng);
        for (index, leaf) in leaves.iter().enumerate() {
            match place_room_in_leaf(&level, leaf, config, rng) {
                Some(room) => level.paint_room(room),
                None => {
                    debug!("attempt {}: leaf {} could not hold a room", attempt, index);
                    continue 'attempt;
                }
            }
        }
        if !meets_coverage(level.room_cell_count(), config) {
            debug!(
                "attempt {}: coverage {:.3} below {:.3}",
                attempt,
                level.room_coverage(),
                config.min_room_coverage
            );
            continue;
        }

        debug!("bisection placed {} rooms on attempt {}", leaves.len(), attempt);
        return Ok(level);
    }

    warn!(
        "bisection exhausted {} attempts",
        config.max_generation_attempts
    );
    Err(GenerationError::AttemptsExhausted {
        attempts: config.max_generation_attempts,
    })
}

// ============================================================================
// Stairs
// ============================================================================

/// One staircase, plus one more with probability 1/3 up to the maximum
fn draw_stair_count(max: usize, rng: &mut GameRng) -> usize {
    let mut count = 1;
    while count < max && rng.one_in(3) {
        count += 1;
    }
    count
}

/// Random plain floor cell of a room
fn stair_spot(level: &Level, room: &Room, rng: &mut GameRng) -> Option<Position> {
    let candidates: Vec<Position> = room
        .cells()
        .filter(|&pos| level.typ(pos) == CellType::Room)
        .collect();
    rng.choose(&candidates).copied()
}

/// Place up and down staircases
///
/// With two or more rooms, up and down stairs never share a room.
pub fn place_stairs(level: &mut Level, config: &GenerationConfig, rng: &mut GameRng) {
    let room_count = level.rooms().len();
    if room_count == 0 {
        return;
    }
    let mut order: Vec<usize> = (0..room_count).collect();
    rng.shuffle(&mut order);
    let split = (room_count / 2).max(1);
    let (up_rooms, down_rooms) = if room_count > 1 {
        (order[..split].to_vec(), order[split..].to_vec())
    } else {
        (order.clone(), order)
    };

    let ups = draw_stair_count(config.max_stairs_per_kind, rng);
    let downs = draw_stair_count(config.max_stairs_per_kind, rng);
    for (count, rooms, up) in [(ups, &up_rooms, true), (downs, &down_rooms, false)] {
        for i in 0..count {
            let room = level.rooms()[rooms[i % rooms.len()]];
            match stair_spot(level, &room, rng) {
                Some(pos) => {
                    level.place_stair(pos, up);
                }
                None => warn!("room at {} has no free floor for a staircase", room.origin()),
            }
        }
    }
}
