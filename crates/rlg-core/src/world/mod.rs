//! World-level concerns: configuration, errors and the persisted layout

pub mod config;
pub mod errors;
pub mod layout;

pub use config::{
    ConnectionOrder, GenerationConfig, HardnessCostModel, HardnessProfile, RoomStrategy,
};
pub use errors::{ConfigError, GenerationError, PlacementError, SaveFormatError};
pub use layout::{SAVE_TAG, SAVE_VERSION, SavedDungeon, decode, encode, record_size};
