//! Dungeon and simulation constants

/// Default dungeon width in columns
pub const DUNGEON_X: usize = 80;

/// Default dungeon height in rows
pub const DUNGEON_Y: usize = 21;

/// Default room count bounds
pub const MIN_ROOMS: usize = 6;
pub const MAX_ROOMS: usize = 12;

/// Default room dimension bounds
pub const ROOM_MIN_X: usize = 4;
pub const ROOM_MIN_Y: usize = 3;
pub const ROOM_MAX_X: usize = 20;
pub const ROOM_MAX_Y: usize = 15;

/// Default interior rock hardness range
pub const MIN_HARDNESS: u8 = 1;
pub const MAX_HARDNESS: u8 = 254;

/// Hardness of the immutable border
pub const IMMUTABLE_HARDNESS: u8 = u8::MAX;

/// Player speed
pub const PLAYER_SPEED: u32 = 10;

/// Monster speed range (inclusive)
pub const MONSTER_MIN_SPEED: u32 = 5;
pub const MONSTER_MAX_SPEED: u32 = 20;

/// A turn costs `TURN_DIVISOR / speed` time units
pub const TURN_DIVISOR: u64 = 1000;

/// Default number of monsters placed on a level
pub const DEFAULT_MONSTER_COUNT: usize = 10;

/// Hardness removed by one tunneling turn
pub const TUNNEL_INCREMENT: u8 = 85;

/// Hardness band width used by the tunneling distance field
pub const TUNNEL_COST_DIVISOR: u32 = 85;

/// Attempts made to find a free starting cell for each monster
pub const MONSTER_PLACEMENT_ATTEMPTS: usize = 2000;

/// Whole-dungeon generation attempts before giving up
pub const MAX_GENERATION_ATTEMPTS: usize = 2000;

/// Room placement attempts per partition leaf
pub const LEAF_ROOM_ATTEMPTS: usize = 100;

/// Cycle pass costs
pub const CYCLE_OPEN_COST: u32 = 127;
pub const CYCLE_ROOM_ADJACENT_COST: u32 = 191;
