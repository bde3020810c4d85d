//! rlg-core: dungeon generation and turn simulation engine
//!
//! This crate builds a bounded dungeon grid, fills it with rooms, joins the
//! rooms with weighted shortest-path corridors and then runs a time-ordered
//! turn loop over the player and the monsters living in it.
//!
//! It performs no terminal or file I/O; callers supply input through
//! [`action::ActionSource`] and persist levels through [`world::layout`].

pub mod action;
pub mod dungeon;
pub mod monster;
pub mod world;

mod consts;
mod gameloop;
mod rng;
mod schedule;

pub use consts::*;
pub use gameloop::{GameLoop, GameOutcome, StepOutcome};
pub use rng::GameRng;
pub use schedule::{TurnKey, TurnQueue};
