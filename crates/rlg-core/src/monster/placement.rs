//! Putting the player and the monsters on a level

use log::{debug, warn};

use super::{Actor, ActorFlags, ActorId};
use crate::dungeon::{Level, Position, Room};
use crate::world::{GenerationConfig, PlacementError};
use crate::{
    GameRng, MONSTER_MAX_SPEED, MONSTER_MIN_SPEED, MONSTER_PLACEMENT_ATTEMPTS, PLAYER_SPEED,
};

/// Random capability flags, each bit independently set
pub fn random_flags(rng: &mut GameRng) -> ActorFlags {
    ActorFlags::from_bits_truncate(rng.rn2(16) as u8)
}

/// Whether a fresh actor may be put on a cell
fn is_free(level: &Level, pos: Position) -> bool {
    level.get(pos).is_some_and(|cell| {
        cell.typ.is_mutable() && cell.is_open() && cell.occupant.is_none()
    })
}

/// Place the player and `config.monster_count` monsters
///
/// The player lands in a random room. See [`populate_around`] for the rest.
pub fn populate(
    level: &mut Level,
    config: &GenerationConfig,
    rng: &mut GameRng,
) -> Result<Vec<Actor>, PlacementError> {
    let Some(&room) = rng.choose(level.rooms()) else {
        return Err(PlacementError::NoRooms);
    };
    let start = (0..MONSTER_PLACEMENT_ATTEMPTS)
        .map(|_| room.random_point(rng))
        .find(|&pos| is_free(level, pos))
        .ok_or(PlacementError::Exhausted {
            attempts: MONSTER_PLACEMENT_ATTEMPTS,
            placed: 0,
        })?;
    populate_around(level, start, config, rng)
}

/// Put the player on `start` and the monsters around them
///
/// Monsters go to rooms other than the one holding the player unless the
/// level has only one room. The returned table is indexed by [`ActorId`],
/// player first, and occupants are recorded on the level.
pub fn populate_around(
    level: &mut Level,
    start: Position,
    config: &GenerationConfig,
    rng: &mut GameRng,
) -> Result<Vec<Actor>, PlacementError> {
    let rooms: Vec<Room> = level.rooms().to_vec();
    if rooms.is_empty() {
        return Err(PlacementError::NoRooms);
    }
    if !level.get(start).is_some_and(|cell| cell.is_open() && cell.occupant.is_none()) {
        return Err(PlacementError::Exhausted {
            attempts: 0,
            placed: 0,
        });
    }

    let mut actors = Vec::with_capacity(config.monster_count + 1);
    level.set_occupant(start, Some(ActorId::PLAYER));
    actors.push(Actor::player(ActorId::PLAYER, start, PLAYER_SPEED));
    debug!("player placed at {start}");

    let player_room = level.room_index_at(start);
    let monster_rooms: Vec<Room> = if rooms.len() > 1 {
        rooms
            .iter()
            .enumerate()
            .filter(|&(index, _)| Some(index) != player_room)
            .map(|(_, room)| *room)
            .collect()
    } else {
        rooms
    };

    let mut next_id = ActorId::PLAYER.next();
    for placed in 0..config.monster_count {
        let mut spot = None;
        for _ in 0..MONSTER_PLACEMENT_ATTEMPTS {
            let Some(room) = rng.choose(&monster_rooms) else {
                break;
            };
            let pos = room.random_point(rng);
            if is_free(level, pos) {
                spot = Some(pos);
                break;
            }
        }
        let Some(pos) = spot else {
            warn!("gave up placing monster {} of {}", placed + 1, config.monster_count);
            return Err(PlacementError::Exhausted {
                attempts: MONSTER_PLACEMENT_ATTEMPTS,
                placed,
            });
        };

        let speed = rng.range(MONSTER_MIN_SPEED as usize, MONSTER_MAX_SPEED as usize) as u32;
        let flags = random_flags(rng);
        level.set_occupant(pos, Some(next_id));
        actors.push(Actor::monster(next_id, pos, speed, flags));
        debug!("monster {:?} at {pos} speed {speed} flags {flags:?}", next_id);
        next_id = next_id.next();
    }

    Ok(actors)
}
