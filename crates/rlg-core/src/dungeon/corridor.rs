//! Corridor carving
//!
//! Corridors follow the cheapest 4-connected route between two cells:
//! 1. Flood a distance field from the source under a cell cost function
//! 2. Walk downhill from the destination back to the source
//! 3. Turn every rock cell on that walk into corridor
//!
//! Rooms are first chained together under [`CorridorCost`], which makes
//! reusing open cells cheap. The cycle pass then joins the two most distant
//! rooms under [`InvertedCost`], which pushes the extra corridor away from
//! existing passages so the level gains a loop.

use log::debug;

use super::distance::{CellCost, Connectivity, DistanceField};
use super::{CellType, Level, Position, Room};
use crate::world::{ConnectionOrder, GenerationConfig, GenerationError, HardnessCostModel};
use crate::{CYCLE_OPEN_COST, CYCLE_ROOM_ADJACENT_COST, GameRng};

/// Cost of entering a cell while joining rooms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorridorCost {
    pub model: HardnessCostModel,
    pub min_hardness: u8,
    pub max_hardness: u8,
    pub room_weight: u32,
    pub corridor_weight: u32,
    pub rock_weight: u32,
}

impl CorridorCost {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            model: config.cost_model,
            min_hardness: config.min_hardness,
            max_hardness: config.max_hardness,
            room_weight: config.room_weight,
            corridor_weight: config.corridor_weight,
            rock_weight: config.rock_weight,
        }
    }

    /// Rock cost contribution of a hardness value; never below 1
    pub fn hardness_cost(&self, hardness: u8) -> u32 {
        match self.model {
            HardnessCostModel::Continuous => hardness.max(1) as u32,
            HardnessCostModel::Banded { bands } => {
                let lo = self.min_hardness as u32;
                let hi = (self.max_hardness as u32).max(lo);
                let span = hi - lo + 1;
                let offset = (hardness as u32).clamp(lo, hi) - lo;
                1 + offset * bands as u32 / span
            }
        }
    }
}

impl Default for CorridorCost {
    fn default() -> Self {
        Self::from_config(&GenerationConfig::default())
    }
}

impl CellCost for CorridorCost {
    fn cost(&self, level: &Level, pos: Position) -> Option<u32> {
        let cell = level.get(pos)?;
        match cell.typ {
            CellType::WallImmutable => None,
            CellType::Corridor => Some(1 + self.corridor_weight),
            CellType::Room | CellType::StairUp | CellType::StairDown => {
                Some(1 + self.room_weight)
            }
            CellType::Rock => Some(1 + self.rock_weight + self.hardness_cost(cell.hardness)),
        }
    }
}

/// Cost used by the cycle pass: open ground is expensive, soft rock cheap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvertedCost;

impl CellCost for InvertedCost {
    fn cost(&self, level: &Level, pos: Position) -> Option<u32> {
        let cell = level.get(pos)?;
        match cell.typ {
            CellType::WallImmutable => None,
            typ if typ.is_open() => Some(CYCLE_OPEN_COST),
            _ if level.is_adjacent_to_room(pos) => Some(CYCLE_ROOM_ADJACENT_COST),
            _ => Some((u8::MAX - cell.hardness).max(1) as u32),
        }
    }
}

/// Carve the cheapest route from `from` to `to`
///
/// Returns the route from `to` back to `from`. Rock on the route becomes
/// corridor; every other cell keeps its terrain and hardness.
pub fn carve_corridor(
    level: &mut Level,
    from: Position,
    to: Position,
    cost: &impl CellCost,
) -> Result<Vec<Position>, GenerationError> {
    let field = DistanceField::compute(level, from, cost, Connectivity::Four);
    let path = field
        .path_from(to)
        .ok_or(GenerationError::Unreachable { from, to })?;
    let carved = path.iter().filter(|&&pos| level.carve(pos)).count();
    debug!(
        "corridor {} -> {}: {} cells, {} carved, cost {}",
        from,
        to,
        path.len(),
        carved,
        field.get(to)
    );
    Ok(path)
}

/// Chain every room to the next one in the configured order
pub fn connect_rooms(
    level: &mut Level,
    config: &GenerationConfig,
    rng: &mut GameRng,
) -> Result<(), GenerationError> {
    let mut order: Vec<usize> = (0..level.rooms().len()).collect();
    if config.connection_order == ConnectionOrder::Shuffled {
        rng.shuffle(&mut order);
    }
    let cost = CorridorCost::from_config(config);
    for pair in order.windows(2) {
        let from = level.rooms()[pair[0]].random_point(rng);
        let to = level.rooms()[pair[1]].random_point(rng);
        carve_corridor(level, from, to, &cost)?;
    }
    Ok(())
}

/// Indices of the two rooms whose origins are furthest apart
pub fn farthest_rooms(rooms: &[Room]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, usize)> = None;
    for (i, a) in rooms.iter().enumerate() {
        for (j, b) in rooms.iter().enumerate().skip(i + 1) {
            let dist = a.distance_squared(b);
            if best.is_none_or(|(_, _, d)| dist > d) {
                best = Some((i, j, dist));
            }
        }
    }
    best.map(|(i, j, _)| (i, j))
}

/// Carve one extra corridor between the most distant rooms
///
/// Returns the carved route, or `None` when there are fewer than two rooms.
pub fn cycle_pass(
    level: &mut Level,
    rng: &mut GameRng,
) -> Result<Option<Vec<Position>>, GenerationError> {
    let Some((a, b)) = farthest_rooms(level.rooms()) else {
        return Ok(None);
    };
    let from = level.rooms()[a].random_point(rng);
    let to = level.rooms()[b].random_point(rng);
    debug!("cycle pass between rooms {} and {}", a, b);
    carve_corridor(level, from, to, &InvertedCost).map(Some)
}
