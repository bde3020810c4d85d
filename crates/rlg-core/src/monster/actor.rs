//! Actors: the player and the monsters

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::TURN_DIVISOR;
use crate::dungeon::Position;

/// Index of an actor in the game loop's actor table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl ActorId {
    pub const PLAYER: ActorId = ActorId(0);

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn next(self) -> Self {
        ActorId(self.0 + 1)
    }
}

bitflags! {
    /// Monster capabilities, one bit per trait
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ActorFlags: u8 {
        /// Remembers where the player was last seen
        const SMART = 0x01;
        /// Always knows where the player is
        const TELEPATHIC = 0x02;
        /// Digs through rock
        const TUNNEL = 0x04;
        /// Moves at random half of the time
        const ERRATIC = 0x08;
    }
}

// Serialize as raw bits
impl Serialize for ActorFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ActorFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(ActorFlags::from_bits_truncate(bits))
    }
}

/// Per-monster state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonsterMind {
    pub flags: ActorFlags,
    /// Where the player was last seen, for smart monsters
    pub last_seen: Option<Position>,
}

impl MonsterMind {
    pub fn new(flags: ActorFlags) -> Self {
        Self {
            flags,
            last_seen: None,
        }
    }
}

/// What kind of actor this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Monster(MonsterMind),
}

/// Anything that takes turns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub position: Position,
    /// Turns per 1000 time units; always positive
    pub speed: u32,
    pub next_turn: u64,
    /// Tie-breaker assigned by the turn queue on each insertion
    pub sequence: u64,
    pub kind: ActorKind,
    pub alive: bool,
}

impl Actor {
    pub fn player(id: ActorId, position: Position, speed: u32) -> Self {
        Self::new(id, position, speed, ActorKind::Player)
    }

    pub fn monster(id: ActorId, position: Position, speed: u32, flags: ActorFlags) -> Self {
        Self::new(id, position, speed, ActorKind::Monster(MonsterMind::new(flags)))
    }

    fn new(id: ActorId, position: Position, speed: u32, kind: ActorKind) -> Self {
        Self {
            id,
            position,
            speed: speed.max(1),
            next_turn: 0,
            sequence: 0,
            kind,
            alive: true,
        }
    }

    pub const fn is_player(&self) -> bool {
        matches!(self.kind, ActorKind::Player)
    }

    /// Capability flags; the player has none
    pub fn flags(&self) -> ActorFlags {
        match self.kind {
            ActorKind::Player => ActorFlags::empty(),
            ActorKind::Monster(mind) => mind.flags,
        }
    }

    pub fn can_tunnel(&self) -> bool {
        self.flags().contains(ActorFlags::TUNNEL)
    }

    pub fn mind_mut(&mut self) -> Option<&mut MonsterMind> {
        match &mut self.kind {
            ActorKind::Player => None,
            ActorKind::Monster(mind) => Some(mind),
        }
    }

    /// Time between this actor's turns
    pub fn turn_delay(&self) -> u64 {
        TURN_DIVISOR / self.speed.max(1) as u64
    }

    /// Map glyph: `@` for the player, the flag bits in hex for monsters
    pub fn symbol(&self) -> char {
        match self.kind {
            ActorKind::Player => '@',
            ActorKind::Monster(mind) => {
                char::from_digit(mind.flags.bits() as u32, 16).unwrap_or('?')
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_delay() {
        let player = Actor::player(ActorId::PLAYER, Position::new(1, 1), 10);
        assert_eq!(player.turn_delay(), 100);
        let fast = Actor::monster(ActorId(1), Position::new(2, 2), 20, ActorFlags::empty());
        assert_eq!(fast.turn_delay(), 50);
        let odd = Actor::monster(ActorId(2), Position::new(2, 2), 7, ActorFlags::empty());
        assert_eq!(odd.turn_delay(), 142);
    }

    #[test]
    fn test_zero_speed_is_clamped() {
        let actor = Actor::monster(ActorId(1), Position::new(1, 1), 0, ActorFlags::empty());
        assert_eq!(actor.speed, 1);
    }

    #[test]
    fn test_flags_and_symbols() {
        let player = Actor::player(ActorId::PLAYER, Position::new(1, 1), 10);
        assert!(player.is_player());
        assert!(player.flags().is_empty());
        assert_eq!(player.symbol(), '@');

        let digger = Actor::monster(
            ActorId(1),
            Position::new(1, 1),
            10,
            ActorFlags::TUNNEL | ActorFlags::SMART,
        );
        assert!(digger.can_tunnel());
        assert!(!digger.is_player());
        assert_eq!(digger.symbol(), '5');

        let all = Actor::monster(ActorId(2), Position::new(1, 1), 10, ActorFlags::all());
        assert_eq!(all.symbol(), 'f');
    }

    #[test]
    fn test_flags_serialize_as_bits() {
        let json = serde_json::to_string(&ActorFlags::TELEPATHIC).unwrap();
        assert_eq!(json, "2");
        let back: ActorFlags = serde_json::from_str("12").unwrap();
        assert_eq!(back, ActorFlags::TUNNEL | ActorFlags::ERRATIC);
    }
}
