//! Distance fields over the level grid
//!
//! A field holds, for every cell, the cheapest total cost of reaching it
//! from a source cell, where each step pays the cost of the cell it
//! *enters*. Fields are computed with Dijkstra's algorithm on a binary heap
//! and read back by walking downhill from any cell to the source.
//!
//! Fields are scratch values: callers compute one when they need it and
//! drop it afterwards, since the grid may change between uses.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::{CellType, Level, Position};
use crate::TUNNEL_COST_DIVISOR;
use crate::action::Direction;

/// Marker for cells the source cannot reach
pub const UNREACHABLE: u32 = u32::MAX;

/// Cost of entering a cell; `None` means the cell can never be entered
pub trait CellCost {
    fn cost(&self, level: &Level, pos: Position) -> Option<u32>;
}

/// Which neighbours a step may reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Up, down, left, right
    Four,
    /// Cardinals plus diagonals
    Eight,
}

impl Connectivity {
    /// Neighbour directions in tie-break order
    pub fn directions(&self) -> &'static [Direction] {
        match self {
            Connectivity::Four => &Direction::CARDINALS,
            Connectivity::Eight => &Direction::ALL,
        }
    }
}

/// Unit cost over open cells only
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkCost;

impl CellCost for WalkCost {
    fn cost(&self, level: &Level, pos: Position) -> Option<u32> {
        level.is_open(pos).then_some(1)
    }
}

/// Any mutable cell, paying extra for the hardness still to be dug
#[derive(Debug, Clone, Copy, Default)]
pub struct TunnelCost;

impl CellCost for TunnelCost {
    fn cost(&self, level: &Level, pos: Position) -> Option<u32> {
        let cell = level.get(pos)?;
        match cell.typ {
            CellType::WallImmutable => None,
            _ => Some(1 + cell.hardness as u32 / TUNNEL_COST_DIVISOR),
        }
    }
}

/// Shortest-path costs from a single source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    width: usize,
    height: usize,
    source: Position,
    connectivity: Connectivity,
    costs: Vec<u32>,
}

impl DistanceField {
    /// Flood the whole level from `source`
    pub fn compute(
        level: &Level,
        source: Position,
        cost: &impl CellCost,
        connectivity: Connectivity,
    ) -> Self {
        let mut costs = vec![UNREACHABLE; level.width() * level.height()];
        let mut field = Self {
            width: level.width(),
            height: level.height(),
            source,
            connectivity,
            costs: Vec::new(),
        };
        if !level.in_bounds(source) {
            field.costs = costs;
            return field;
        }

        let mut heap = BinaryHeap::new();
        let start = level.index(source);
        costs[start] = 0;
        heap.push(Reverse((0u32, start)));

        while let Some(Reverse((dist, index))) = heap.pop() {
            // Skip stale heap entries
            if dist != costs[index] {
                continue;
            }
            let pos = level.position_of(index);
            for &dir in connectivity.directions() {
                let Some(next) = pos.step(dir).filter(|&p| level.in_bounds(p)) else {
                    continue;
                };
                let Some(step) = cost.cost(level, next) else {
                    continue;
                };
                let candidate = dist.saturating_add(step);
                let next_index = level.index(next);
                if candidate < costs[next_index] {
                    costs[next_index] = candidate;
                    heap.push(Reverse((candidate, next_index)));
                }
            }
        }

        field.costs = costs;
        field
    }

    /// Non-tunneling movement toward `target`
    pub fn walking(level: &Level, target: Position) -> Self {
        Self::compute(level, target, &WalkCost, Connectivity::Eight)
    }

    /// Tunneling movement toward `target`
    pub fn tunneling(level: &Level, target: Position) -> Self {
        Self::compute(level, target, &TunnelCost, Connectivity::Eight)
    }

    /// Cost recorded for a cell, [`UNREACHABLE`] outside the grid
    pub fn get(&self, pos: Position) -> u32 {
        if pos.x >= self.width || pos.y >= self.height {
            return UNREACHABLE;
        }
        self.costs[pos.y * self.width + pos.x]
    }

    pub fn is_reachable(&self, pos: Position) -> bool {
        self.get(pos) != UNREACHABLE
    }

    /// Neighbour with the lowest recorded cost, first in tie-break order
    ///
    /// Only neighbours strictly cheaper than `pos` itself qualify.
    pub fn downhill(&self, pos: Position) -> Option<Position> {
        let here = self.get(pos);
        self.connectivity
            .directions()
            .iter()
            .filter_map(|&dir| pos.step(dir))
            .filter(|&next| self.get(next) < here)
            .min_by_key(|&next| self.get(next))
    }

    /// Walk downhill from `from` to the source
    ///
    /// The returned path starts at `from` and ends at the source. `None`
    /// if `from` is unreachable.
    pub fn path_from(&self, from: Position) -> Option<Vec<Position>> {
        if !self.is_reachable(from) {
            return None;
        }
        let mut path = vec![from];
        let mut current = from;
        while current != self.source {
            current = self.downhill(current)?;
            path.push(current);
        }
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::Room;

    fn open_level() -> Level {
        let mut level = Level::new(12, 8);
        level.paint_room(Room::new(1, 1, 10, 6));
        level
    }

    #[test]
    fn test_walking_is_chebyshev_in_open_room() {
        let level = open_level();
        let target = Position::new(2, 2);
        let field = DistanceField::walking(&level, target);
        for pos in level.rooms()[0].cells() {
            assert_eq!(field.get(pos) as usize, pos.chebyshev(target));
        }
    }

    #[test]
    fn test_walking_ignores_rock() {
        let level = open_level();
        let field = DistanceField::walking(&level, Position::new(2, 2));
        assert_eq!(field.get(Position::new(0, 0)), UNREACHABLE);
        assert!(!field.is_reachable(Position::new(11, 7)));
    }

    #[test]
    fn test_tunneling_crosses_rock() {
        let mut level = Level::new(12, 8);
        level.paint_room(Room::new(1, 1, 3, 3));
        level.set_rock_hardness(Position::new(5, 2), 200);
        let field = DistanceField::tunneling(&level, Position::new(2, 2));
        assert!(field.is_reachable(Position::new(9, 5)));
        assert!(!field.is_reachable(Position::new(0, 0)));
        // Room step, then minimal rock.
        assert_eq!(field.get(Position::new(4, 2)), 2);
        // Entering hardness 200 rock costs 1 + 200 / 85.
        assert_eq!(field.get(Position::new(5, 2)), 2 + 3);
    }

    #[test]
    fn test_path_descends_to_source() {
        let level = open_level();
        let source = Position::new(2, 2);
        let field = DistanceField::walking(&level, source);
        let path = field.path_from(Position::new(8, 5)).unwrap();
        assert_eq!(path.first(), Some(&Position::new(8, 5)));
        assert_eq!(path.last(), Some(&source));
        assert_eq!(path.len(), 7);
        for pair in path.windows(2) {
            assert!(field.get(pair[1]) < field.get(pair[0]));
        }
    }

    #[test]
    fn test_tie_break_prefers_cardinals_in_order() {
        let level = open_level();
        let field = DistanceField::compute(
            &level,
            Position::new(5, 3),
            &WalkCost,
            Connectivity::Four,
        );
        // From directly below-right, up and left tie; up comes first.
        assert_eq!(field.downhill(Position::new(6, 4)), Some(Position::new(6, 3)));
    }

    #[test]
    fn test_unreachable_has_no_path() {
        let level = open_level();
        let field = DistanceField::walking(&level, Position::new(2, 2));
        assert_eq!(field.path_from(Position::new(0, 0)), None);
    }
}
