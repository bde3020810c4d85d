//! Monster system
//!
//! Actors (the player included), their placement on a fresh level, and the
//! per-turn movement AI.

mod actor;
pub mod ai;
mod placement;

pub use actor::{Actor, ActorFlags, ActorId, ActorKind, MonsterMind};
pub use ai::{Navigation, choose_move};
pub use placement::{populate, populate_around, random_flags};
