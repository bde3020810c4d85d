//! Main turn loop
//!
//! Actors act in order of their next turn time. Each pop runs exactly one
//! turn: the player's through an [`ActionSource`], a monster's through the
//! AI. Acting actors are requeued `1000 / speed` time units later.

use log::{debug, info, trace};

use crate::TUNNEL_INCREMENT;
use crate::action::{ActionSource, PlayerAction, TurnView};
use crate::dungeon::{DigOutcome, Level, Position};
use crate::monster::{self, Actor, ActorId};
use crate::rng::GameRng;
use crate::schedule::{TurnKey, TurnQueue};
use crate::world::{GenerationConfig, PlacementError};

/// Result of a single queue pop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An actor took its turn
    Acted(ActorId),
    /// The popped entry referred to a dead or displaced actor
    Discarded,
    /// Nothing left to schedule
    Idle,
    PlayerDied,
    PlayerQuit,
    /// The last monster died
    Victory,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    PlayerDied,
    PlayerQuit,
    TurnLimit,
    Victory,
}

/// What happened on the player's turn
enum PlayerTurn {
    Acted,
    Quit,
}

/// Owns the level, the actor table and the turn queue
#[derive(Debug, Clone)]
pub struct GameLoop {
    level: Level,
    /// Indexed by [`ActorId`]; dead actors stay in place
    actors: Vec<Actor>,
    queue: TurnQueue,
    rng: GameRng,
    tunnel_increment: u8,
    time: u64,
    turns: u64,
    monsters_slain: usize,
}

impl GameLoop {
    /// Start a loop over existing actors
    ///
    /// Each living actor is queued at its `next_turn`, in table order, and
    /// recorded as the occupant of its cell. The RNG starts from seed 0 until
    /// replaced with [`GameLoop::with_rng`].
    pub fn new(mut level: Level, mut actors: Vec<Actor>) -> Self {
        level.clear_occupants();
        let mut queue = TurnQueue::new();
        for actor in actors.iter_mut().filter(|actor| actor.alive) {
            level.set_occupant(actor.position, Some(actor.id));
            actor.sequence = queue.push(actor.id, actor.next_turn).sequence;
        }
        Self {
            level,
            actors,
            queue,
            rng: GameRng::new(0),
            tunnel_increment: TUNNEL_INCREMENT,
            time: 0,
            turns: 0,
            monsters_slain: 0,
        }
    }

    /// Place a player and `config.monster_count` monsters on `level`
    pub fn populate(
        mut level: Level,
        config: &GenerationConfig,
        mut rng: GameRng,
    ) -> Result<Self, PlacementError> {
        let actors = monster::populate(&mut level, config, &mut rng)?;
        Ok(Self::from_placed(level, actors, config, rng))
    }

    /// Like [`GameLoop::populate`] with the player on a known cell
    pub fn populate_at(
        mut level: Level,
        player: Position,
        config: &GenerationConfig,
        mut rng: GameRng,
    ) -> Result<Self, PlacementError> {
        let actors = monster::populate_around(&mut level, player, config, &mut rng)?;
        Ok(Self::from_placed(level, actors, config, rng))
    }

    fn from_placed(
        level: Level,
        actors: Vec<Actor>,
        config: &GenerationConfig,
        rng: GameRng,
    ) -> Self {
        info!(
            "populated level with {} monsters",
            actors.len().saturating_sub(1)
        );
        Self::new(level, actors)
            .with_rng(rng)
            .with_tunnel_increment(config.tunnel_increment)
    }

    pub fn with_rng(mut self, rng: GameRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_tunnel_increment(mut self, increment: u8) -> Self {
        self.tunnel_increment = increment.max(1);
        self
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.index())
    }

    /// The player, if the table has one
    pub fn player(&self) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.is_player())
    }

    /// Time of the turn most recently taken
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Number of turns actually taken
    pub fn turns(&self) -> u64 {
        self.turns
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Monsters killed so far in this run
    pub fn monsters_slain(&self) -> usize {
        self.monsters_slain
    }

    pub fn monsters_alive(&self) -> usize {
        self.actors
            .iter()
            .filter(|actor| actor.alive && !actor.is_player())
            .count()
    }

    /// Map with actors drawn on it
    pub fn render(&self) -> String {
        self.level.render(&self.actors)
    }

    /// Give up the level, e.g. to save it
    pub fn into_level(self) -> Level {
        self.level
    }

    /// Pop one queue entry and run that actor's turn
    pub fn step(&mut self, input: &mut dyn ActionSource) -> StepOutcome {
        let Some(key) = self.queue.pop() else {
            return StepOutcome::Idle;
        };
        if !self.is_current(&key) {
            debug!("discarding stale turn {:?}", key);
            return StepOutcome::Discarded;
        }

        self.time = key.time;
        self.turns += 1;
        let index = key.actor.index();
        if self.actors[index].is_player() {
            if let PlayerTurn::Quit = self.player_turn(index, input) {
                info!("player quit at time {}", self.time);
                return StepOutcome::PlayerQuit;
            }
        } else {
            self.monster_turn(index);
        }

        let actor = &mut self.actors[index];
        if actor.alive {
            actor.next_turn = key.time + actor.turn_delay();
            actor.sequence = self.queue.push(actor.id, actor.next_turn).sequence;
        }

        if self.player().is_some_and(|player| !player.alive) {
            info!("player killed at time {}", self.time);
            StepOutcome::PlayerDied
        } else if self.monsters_slain > 0 && self.monsters_alive() == 0 {
            info!("all monsters dead at time {}", self.time);
            StepOutcome::Victory
        } else {
            StepOutcome::Acted(key.actor)
        }
    }

    /// Step until the game ends or `turn_limit` turns have been taken
    pub fn run(&mut self, input: &mut dyn ActionSource, turn_limit: Option<u64>) -> GameOutcome {
        loop {
            if turn_limit.is_some_and(|limit| self.turns >= limit) {
                return GameOutcome::TurnLimit;
            }
            match self.step(input) {
                StepOutcome::Acted(_) | StepOutcome::Discarded => {}
                StepOutcome::Idle => return GameOutcome::TurnLimit,
                StepOutcome::PlayerDied => return GameOutcome::PlayerDied,
                StepOutcome::PlayerQuit => return GameOutcome::PlayerQuit,
                StepOutcome::Victory => return GameOutcome::Victory,
            }
        }
    }

    /// Whether a popped key still describes a living actor on its cell
    fn is_current(&self, key: &TurnKey) -> bool {
        self.actors.get(key.actor.index()).is_some_and(|actor| {
            actor.alive
                && actor.sequence == key.sequence
                && self.level.occupant(actor.position) == Some(actor.id)
        })
    }

    fn player_turn(&mut self, index: usize, input: &mut dyn ActionSource) -> PlayerTurn {
        loop {
            let position = self.actors[index].position;
            let view = TurnView {
                level: &self.level,
                actors: &self.actors,
                player: position,
            };
            match input.next_action(&view) {
                PlayerAction::Query(query) => {
                    trace!("player query {query}");
                }
                PlayerAction::Quit => return PlayerTurn::Quit,
                PlayerAction::Stay => return PlayerTurn::Acted,
                PlayerAction::Move(dir) => {
                    match position.step(dir).filter(|&pos| self.level.is_open(pos)) {
                        Some(target) => self.move_actor(index, target),
                        None => debug!("player bumps into rock going {dir}"),
                    }
                    return PlayerTurn::Acted;
                }
            }
        }
    }

    fn monster_turn(&mut self, index: usize) {
        let Some(player) = self.player().map(|player| player.position) else {
            return;
        };
        let Some(target) =
            monster::choose_move(&self.level, &mut self.actors[index], player, &mut self.rng)
        else {
            return;
        };

        if self.level.is_open(target) {
            self.move_actor(index, target);
            return;
        }
        if !self.actors[index].can_tunnel() {
            return;
        }
        match self.level.dig(target, self.tunnel_increment) {
            DigOutcome::Breached => {
                trace!("monster {:?} breaks through at {target}", self.actors[index].id);
                self.move_actor(index, target);
            }
            DigOutcome::Weakened { remaining } => {
                trace!("rock at {target} down to {remaining}");
            }
            DigOutcome::Blocked | DigOutcome::Open => {}
        }
    }

    /// Move an actor, killing whoever already stands on the target
    fn move_actor(&mut self, index: usize, target: Position) {
        let id = self.actors[index].id;
        if let Some(victim) = self.level.occupant(target).filter(|&other| other != id)
            && let Some(dead) = self.actors.get_mut(victim.index())
        {
            dead.alive = false;
            if !dead.is_player() {
                self.monsters_slain += 1;
            }
            info!("{:?} kills {:?} at {target}", id, victim);
        }
        let from = self.actors[index].position;
        self.level.set_occupant(from, None);
        self.level.set_occupant(target, Some(id));
        self.actors[index].position = target;
    }
}
