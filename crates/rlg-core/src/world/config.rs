//! Generation parameters
//!
//! A [`GenerationConfig`] is built once (defaults, JSON or CLI overrides),
//! validated, and then passed by reference to generation and population.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::errors::ConfigError;
use crate::consts::*;

/// Largest supported grid side; the layout stores coordinates as bytes
pub const MAX_DIMENSION: usize = 255;

/// Room placement strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoomStrategy {
    /// Random proposals, restarting the whole room set on any collision
    #[default]
    Retry,
    /// Recursive bisection of the interior, one room per leaf
    Bisection,
}

/// How interior rock hardness is seeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HardnessProfile {
    /// Independent uniform draw per cell
    #[default]
    Uniform,
    /// Diffused seeds followed by a gaussian blur
    Smoothed,
}

/// Order in which rooms are chained together by corridors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionOrder {
    /// Room i is joined to room i + 1
    #[default]
    Sequential,
    /// Rooms are joined along a random permutation
    Shuffled,
}

/// How rock hardness turns into corridor cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HardnessCostModel {
    /// Cost grows with the raw hardness value
    Continuous,
    /// Hardness range split into this many equal bands
    Banded { bands: u8 },
}

impl Default for HardnessCostModel {
    fn default() -> Self {
        HardnessCostModel::Banded { bands: 4 }
    }
}

/// Immutable generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    // Grid
    pub width: usize,
    pub height: usize,
    pub min_hardness: u8,
    pub max_hardness: u8,
    pub hardness_profile: HardnessProfile,

    // Rooms
    pub strategy: RoomStrategy,
    pub min_rooms: usize,
    pub max_rooms: usize,
    pub min_room_width: usize,
    pub min_room_height: usize,
    pub max_room_width: usize,
    pub max_room_height: usize,
    pub min_room_coverage: f64,
    pub max_generation_attempts: usize,

    // Bisection
    pub min_partition_width: usize,
    pub min_partition_height: usize,
    pub max_partition_width: usize,
    pub max_partition_height: usize,
    pub split_bias: f64,
    pub leaf_room_attempts: usize,

    // Corridors
    pub connection_order: ConnectionOrder,
    pub cycle_pass: bool,
    pub cost_model: HardnessCostModel,
    pub room_weight: u32,
    pub corridor_weight: u32,
    pub rock_weight: u32,

    // Stairs and actors
    pub max_stairs_per_kind: usize,
    pub monster_count: usize,
    pub tunnel_increment: u8,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: DUNGEON_X,
            height: DUNGEON_Y,
            min_hardness: MIN_HARDNESS,
            max_hardness: MAX_HARDNESS,
            hardness_profile: HardnessProfile::Uniform,

            strategy: RoomStrategy::Retry,
            min_rooms: MIN_ROOMS,
            max_rooms: MAX_ROOMS,
            min_room_width: ROOM_MIN_X,
            min_room_height: ROOM_MIN_Y,
            max_room_width: ROOM_MAX_X,
            max_room_height: ROOM_MAX_Y,
            min_room_coverage: 0.0,
            max_generation_attempts: MAX_GENERATION_ATTEMPTS,

            min_partition_width: 13,
            min_partition_height: 7,
            max_partition_width: 26,
            max_partition_height: 13,
            split_bias: 0.25,
            leaf_room_attempts: LEAF_ROOM_ATTEMPTS,

            connection_order: ConnectionOrder::Sequential,
            cycle_pass: true,
            cost_model: HardnessCostModel::default(),
            room_weight: 0,
            corridor_weight: 0,
            rock_weight: 0,

            max_stairs_per_kind: 3,
            monster_count: DEFAULT_MONSTER_COUNT,
            tunnel_increment: TUNNEL_INCREMENT,
        }
    }
}

impl GenerationConfig {
    /// Load a config from a JSON file; missing fields take defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Number of cells inside the immutable border
    pub fn interior_area(&self) -> usize {
        self.width.saturating_sub(2) * self.height.saturating_sub(2)
    }

    /// Check every cross-field constraint the generators rely on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 3 || self.height < 3 {
            return Err(ConfigError::invalid(
                "width/height",
                "grid needs at least one interior cell",
            ));
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(ConfigError::invalid(
                "width/height",
                format!("grid sides are limited to {}", MAX_DIMENSION),
            ));
        }
        if self.min_hardness == 0 || self.min_hardness > self.max_hardness {
            return Err(ConfigError::invalid(
                "min_hardness",
                "rock hardness range must be non-empty and above zero",
            ));
        }
        if self.min_rooms == 0 || self.min_rooms > self.max_rooms {
            return Err(ConfigError::invalid(
                "min_rooms",
                "room count range must be non-empty and above zero",
            ));
        }
        if self.min_room_width == 0
            || self.min_room_height == 0
            || self.min_room_width > self.max_room_width
            || self.min_room_height > self.max_room_height
        {
            return Err(ConfigError::invalid(
                "min_room_width/height",
                "room dimension ranges must be non-empty",
            ));
        }
        if self.min_room_width > self.width - 2 || self.min_room_height > self.height - 2 {
            return Err(ConfigError::invalid(
                "min_room_width/height",
                "smallest room does not fit inside the border",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_room_coverage) {
            return Err(ConfigError::invalid(
                "min_room_coverage",
                "must be a fraction between 0 and 1",
            ));
        }
        if self.max_generation_attempts == 0 || self.leaf_room_attempts == 0 {
            return Err(ConfigError::invalid(
                "max_generation_attempts",
                "retry budgets must allow at least one attempt",
            ));
        }
        if self.strategy == RoomStrategy::Bisection {
            self.validate_partitions()?;
        }
        if let HardnessCostModel::Banded { bands: 0 } = self.cost_model {
            return Err(ConfigError::invalid("cost_model", "needs at least one band"));
        }
        if self.max_stairs_per_kind == 0 {
            return Err(ConfigError::invalid(
                "max_stairs_per_kind",
                "levels need at least one staircase of each kind",
            ));
        }
        if self.tunnel_increment == 0 {
            return Err(ConfigError::invalid(
                "tunnel_increment",
                "tunneling must remove some hardness",
            ));
        }
        Ok(())
    }

    fn validate_partitions(&self) -> Result<(), ConfigError> {
        if self.min_partition_width < self.min_room_width
            || self.min_partition_height < self.min_room_height
        {
            return Err(ConfigError::invalid(
                "min_partition_width/height",
                "smallest partition must hold the smallest room",
            ));
        }
        // Any side above the maximum must split into two sides of at least the minimum.
        if self.max_partition_width + 1 < 2 * self.min_partition_width
            || self.max_partition_height + 1 < 2 * self.min_partition_height
        {
            return Err(ConfigError::invalid(
                "max_partition_width/height",
                "maximum must be at least twice the minimum less one",
            ));
        }
        if self.split_bias < 0.0 {
            return Err(ConfigError::invalid("split_bias", "must not be negative"));
        }
        Ok(())
    }
}
