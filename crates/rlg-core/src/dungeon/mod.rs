//! Dungeon grid, room placement and corridor carving

mod cell;
mod corridor;
mod distance;
mod generation;
mod hardness;
mod level;
mod partition;
mod position;
mod room;

pub use cell::{Cell, CellType};
pub use corridor::{
    CorridorCost, InvertedCost, carve_corridor, connect_rooms, cycle_pass, farthest_rooms,
};
pub use distance::{CellCost, Connectivity, DistanceField, TunnelCost, UNREACHABLE, WalkCost};
pub use generation::{
    generate_level, is_room_valid, place_rooms_by_bisection, place_rooms_with_retry, place_stairs,
};
pub use hardness::seed_hardness;
pub use level::{DigOutcome, Level};
pub use partition::{Partition, PartitionNode, PartitionTree, SplitAxis, SplitLimits};
pub use position::Position;
pub use room::Room;
