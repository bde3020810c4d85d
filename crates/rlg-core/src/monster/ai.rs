//! Monster AI
//!
//! Each monster turn: work out where the monster wants to go, build fresh
//! distance fields toward that goal, and pick the downhill neighbour. The
//! game loop applies the chosen step (moving, digging or killing).

use log::trace;

use super::{Actor, ActorFlags};
use crate::GameRng;
use crate::action::Direction;
use crate::dungeon::{DistanceField, Level, Position};

/// Distance fields toward one goal, rebuilt every monster turn
#[derive(Debug, Clone)]
pub struct Navigation {
    pub walking: DistanceField,
    pub tunneling: DistanceField,
}

impl Navigation {
    pub fn toward(level: &Level, goal: Position) -> Self {
        Self {
            walking: DistanceField::walking(level, goal),
            tunneling: DistanceField::tunneling(level, goal),
        }
    }

    /// The field an actor moves by
    pub fn field_for(&self, actor: &Actor) -> &DistanceField {
        if actor.can_tunnel() {
            &self.tunneling
        } else {
            &self.walking
        }
    }
}

/// Whether a monster can see the player: both stand in the same room
pub fn can_see(level: &Level, from: Position, to: Position) -> bool {
    match level.room_index_at(from) {
        Some(room) => level.room_index_at(to) == Some(room),
        None => false,
    }
}

/// Decide where a monster is heading, updating its memory
///
/// Telepaths always know where the player is. Others must see the player;
/// smart monsters keep heading for the last place they saw them.
pub fn perceive(level: &Level, monster: &mut Actor, player: Position) -> Option<Position> {
    let position = monster.position;
    let sees = can_see(level, position, player);
    let mind = monster.mind_mut()?;

    if mind.flags.contains(ActorFlags::TELEPATHIC) || sees {
        if mind.flags.contains(ActorFlags::SMART) {
            mind.last_seen = Some(player);
        }
        return Some(player);
    }
    if mind.flags.contains(ActorFlags::SMART) {
        if mind.last_seen == Some(position) {
            mind.last_seen = None;
        }
        return mind.last_seen;
    }
    None
}

/// Whether an actor may step onto a cell at all
pub fn can_enter(level: &Level, actor: &Actor, pos: Position) -> bool {
    match level.get(pos) {
        Some(cell) if cell.is_open() => true,
        Some(cell) => actor.can_tunnel() && cell.typ.is_mutable(),
        None => false,
    }
}

/// A uniformly random enterable neighbour
pub fn random_step(level: &Level, actor: &Actor, rng: &mut GameRng) -> Option<Position> {
    let options: Vec<Position> = Direction::ALL
        .iter()
        .filter_map(|&dir| actor.position.step(dir))
        .filter(|&pos| can_enter(level, actor, pos))
        .collect();
    rng.choose(&options).copied()
}

/// Downhill neighbour in the actor's field, if it is not already at the goal
pub fn step_toward(nav: &Navigation, actor: &Actor) -> Option<Position> {
    nav.field_for(actor).downhill(actor.position)
}

/// Choose this turn's destination cell; `None` means stay put
pub fn choose_move(
    level: &Level,
    monster: &mut Actor,
    player: Position,
    rng: &mut GameRng,
) -> Option<Position> {
    if monster.flags().contains(ActorFlags::ERRATIC) && rng.one_in(2) {
        let step = random_step(level, monster, rng);
        trace!("monster {:?} wanders to {:?}", monster.id, step);
        return step;
    }
    let goal = perceive(level, monster, player)?;
    let nav = Navigation::toward(level, goal);
    step_toward(&nav, monster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{CellType, Room};
    use crate::monster::ActorId;

    /// Two rooms joined by a corridor along row 4
    fn two_room_level() -> Level {
        let mut level = Level::new(30, 10);
        level.paint_room(Room::new(2, 2, 5, 5));
        level.paint_room(Room::new(20, 2, 5, 5));
        for x in 7..20 {
            level.carve(Position::new(x, 4));
        }
        level
    }

    fn monster_at(pos: Position, flags: ActorFlags) -> Actor {
        Actor::monster(ActorId(1), pos, 10, flags)
    }

    #[test]
    fn test_telepath_approaches_player() {
        let level = two_room_level();
        let mut monster = monster_at(Position::new(22, 4), ActorFlags::TELEPATHIC);
        let player = Position::new(3, 4);
        let before = DistanceField::walking(&level, player).get(monster.position);
        let step = choose_move(&level, &mut monster, player, &mut GameRng::new(1)).unwrap();
        assert_eq!(DistanceField::walking(&level, player).get(step), before - 1);
    }

    #[test]
    fn test_blind_monster_waits() {
        let level = two_room_level();
        let mut monster = monster_at(Position::new(22, 4), ActorFlags::empty());
        let step = choose_move(&level, &mut monster, Position::new(3, 4), &mut GameRng::new(1));
        assert_eq!(step, None);
    }

    #[test]
    fn test_monster_in_same_room_sees_player() {
        let level = two_room_level();
        let mut monster = monster_at(Position::new(6, 6), ActorFlags::empty());
        let step = choose_move(&level, &mut monster, Position::new(2, 2), &mut GameRng::new(1));
        assert_eq!(step, Some(Position::new(5, 5)));
    }

    #[test]
    fn test_smart_monster_remembers() {
        let level = two_room_level();
        let mut monster = monster_at(Position::new(6, 6), ActorFlags::SMART);
        let seen_at = Position::new(3, 3);
        assert_eq!(perceive(&level, &mut monster, seen_at), Some(seen_at));
        // Player leaves for the other room: monster keeps the memory.
        assert_eq!(
            perceive(&level, &mut monster, Position::new(22, 3)),
            Some(seen_at)
        );
        monster.position = seen_at;
        assert_eq!(perceive(&level, &mut monster, Position::new(22, 3)), None);
    }

    #[test]
    fn test_adjacent_monster_steps_onto_player() {
        let level = two_room_level();
        let player = Position::new(4, 4);
        let mut monster = monster_at(Position::new(5, 5), ActorFlags::TELEPATHIC);
        let step = choose_move(&level, &mut monster, player, &mut GameRng::new(1));
        assert_eq!(step, Some(player));
    }

    #[test]
    fn test_tunneler_cuts_through_rock() {
        let mut level = Level::new(30, 10);
        level.paint_room(Room::new(2, 2, 3, 3));
        level.paint_room(Room::new(20, 2, 3, 3));
        let mut monster = monster_at(
            Position::new(20, 3),
            ActorFlags::TELEPATHIC | ActorFlags::TUNNEL,
        );
        let step = choose_move(&level, &mut monster, Position::new(4, 3), &mut GameRng::new(1))
            .unwrap();
        assert_eq!(level.typ(step), CellType::Rock);
        assert_eq!(step.x, 19);

        // A walker has no route at all.
        let mut walker = monster_at(Position::new(20, 3), ActorFlags::TELEPATHIC);
        let stuck = choose_move(&level, &mut walker, Position::new(4, 3), &mut GameRng::new(1));
        assert_eq!(stuck, None);
    }

    #[test]
    fn test_random_step_respects_terrain() {
        let level = two_room_level();
        let walker = monster_at(Position::new(2, 2), ActorFlags::ERRATIC);
        let digger = monster_at(Position::new(2, 2), ActorFlags::ERRATIC | ActorFlags::TUNNEL);
        let mut rng = GameRng::new(17);
        for _ in 0..100 {
            let step = random_step(&level, &walker, &mut rng).unwrap();
            assert!(level.is_open(step));
            let step = random_step(&level, &digger, &mut rng).unwrap();
            assert!(level.typ(step).is_mutable());
        }
    }
}
