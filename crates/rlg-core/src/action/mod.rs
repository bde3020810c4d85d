//! Player action system
//!
//! The turn loop asks an [`ActionSource`] for the player's next action.
//! Key bindings and terminal handling live outside the engine.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::dungeon::{Level, Position};
use crate::monster::Actor;

/// Movement direction on the 8-connected grid
///
/// Declaration order is the tie-break order used when several neighbours
/// are equally good: the four cardinals (up, down, left, right) first,
/// then the diagonals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Direction {
    North,
    South,
    West,
    East,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Direction {
    /// Cardinal directions in tie-break order (up, down, left, right)
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// All eight directions in tie-break order
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// Get the delta (dx, dy) for this direction
    pub const fn delta(&self) -> (i8, i8) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::NorthEast => (1, -1),
            Direction::SouthWest => (-1, 1),
            Direction::SouthEast => (1, 1),
        }
    }

    /// Classic roguelike key for this direction
    pub const fn key(&self) -> char {
        match self {
            Direction::North => 'k',
            Direction::South => 'j',
            Direction::West => 'h',
            Direction::East => 'l',
            Direction::NorthWest => 'y',
            Direction::NorthEast => 'u',
            Direction::SouthWest => 'b',
            Direction::SouthEast => 'n',
        }
    }

    /// Parse a classic roguelike movement key
    pub fn from_key(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|dir| dir.key() == key)
    }
}

/// Auxiliary views the player may ask for without spending a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Query {
    Map,
    MonsterList,
}

/// What the player does on their turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    Move(Direction),
    Stay,
    Quit,
    Query(Query),
}

impl PlayerAction {
    /// Parse a single key: direction keys, `.` or space to stay, `q` to quit,
    /// `m` for the monster list and `v` for the map
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '.' | ' ' | '5' => Some(PlayerAction::Stay),
            'q' | 'Q' => Some(PlayerAction::Quit),
            'm' => Some(PlayerAction::Query(Query::MonsterList)),
            'v' => Some(PlayerAction::Query(Query::Map)),
            k => Direction::from_key(k).map(PlayerAction::Move),
        }
    }
}

/// Read-only snapshot handed to the input provider on the player's turn
#[derive(Debug, Clone, Copy)]
pub struct TurnView<'a> {
    pub level: &'a Level,
    pub actors: &'a [Actor],
    pub player: Position,
}

impl TurnView<'_> {
    /// Living monsters as (position, dx, dy) relative to the player
    pub fn monster_offsets(&self) -> Vec<(Position, i32, i32)> {
        self.actors
            .iter()
            .filter(|actor| actor.alive && !actor.is_player())
            .map(|actor| {
                let dx = actor.position.x as i32 - self.player.x as i32;
                let dy = actor.position.y as i32 - self.player.y as i32;
                (actor.position, dx, dy)
            })
            .collect()
    }

    /// Text lines describing where each monster is
    pub fn monster_list(&self) -> Vec<String> {
        self.monster_offsets()
            .into_iter()
            .map(|(_, dx, dy)| {
                let vertical = match dy {
                    d if d < 0 => format!("{} north", -d),
                    d if d > 0 => format!("{} south", d),
                    _ => String::new(),
                };
                let horizontal = match dx {
                    d if d < 0 => format!("{} west", -d),
                    d if d > 0 => format!("{} east", d),
                    _ => String::new(),
                };
                match (vertical.is_empty(), horizontal.is_empty()) {
                    (false, false) => format!("monster {} and {}", vertical, horizontal),
                    (false, true) => format!("monster {}", vertical),
                    (true, false) => format!("monster {}", horizontal),
                    (true, true) => "monster here".to_string(),
                }
            })
            .collect()
    }
}

/// Supplies the player's actions
pub trait ActionSource {
    /// Called once per player turn (and again after each query)
    fn next_action(&mut self, view: &TurnView<'_>) -> PlayerAction;
}

/// Replays a fixed list of actions, then quits
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    actions: VecDeque<PlayerAction>,
}

impl ScriptedInput {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    /// Actions not yet consumed
    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl ActionSource for ScriptedInput {
    fn next_action(&mut self, _view: &TurnView<'_>) -> PlayerAction {
        self.actions.pop_front().unwrap_or(PlayerAction::Quit)
    }
}

/// Player that never moves
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleInput;

impl ActionSource for IdleInput {
    fn next_action(&mut self, _view: &TurnView<'_>) -> PlayerAction {
        PlayerAction::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_deltas_are_distinct_unit_steps() {
        let mut seen = Vec::new();
        for dir in Direction::iter() {
            let (dx, dy) = dir.delta();
            assert!(dx.abs() <= 1 && dy.abs() <= 1 && (dx, dy) != (0, 0));
            assert!(!seen.contains(&(dx, dy)));
            seen.push((dx, dy));
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_all_matches_declaration_order() {
        let iterated: Vec<_> = Direction::iter().collect();
        assert_eq!(iterated, Direction::ALL.to_vec());
        assert_eq!(&Direction::ALL[..4], &Direction::CARDINALS[..]);
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!(
            PlayerAction::from_key('k'),
            Some(PlayerAction::Move(Direction::North))
        );
        assert_eq!(
            PlayerAction::from_key('n'),
            Some(PlayerAction::Move(Direction::SouthEast))
        );
        assert_eq!(PlayerAction::from_key('.'), Some(PlayerAction::Stay));
        assert_eq!(PlayerAction::from_key('q'), Some(PlayerAction::Quit));
        assert_eq!(
            PlayerAction::from_key('m'),
            Some(PlayerAction::Query(Query::MonsterList))
        );
        assert_eq!(PlayerAction::from_key('z'), None);
    }

    #[test]
    fn test_scripted_input_quits_when_exhausted() {
        let level = Level::new(10, 5);
        let view = TurnView {
            level: &level,
            actors: &[],
            player: Position::new(1, 1),
        };
        let mut input = ScriptedInput::new([PlayerAction::Stay]);
        assert_eq!(input.next_action(&view), PlayerAction::Stay);
        assert_eq!(input.remaining(), 0);
        assert_eq!(input.next_action(&view), PlayerAction::Quit);
    }
}
