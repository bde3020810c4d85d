//! Level grid
//!
//! Cells are stored row-major. The outermost ring is always
//! `WallImmutable` at maximum hardness and no mutator here touches it.

use serde::{Deserialize, Serialize};

use super::{Cell, CellType, Position, Room};
use crate::monster::{Actor, ActorId};
use crate::{IMMUTABLE_HARDNESS, MIN_HARDNESS};

/// Result of applying one tunneling step to a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigOutcome {
    /// Immutable or out of bounds
    Blocked,
    /// Already open, nothing to dig
    Open,
    /// Hardness lowered but the cell is still rock
    Weakened { remaining: u8 },
    /// Hardness reached zero and the cell became corridor
    Breached,
}

/// A single dungeon level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    rooms: Vec<Room>,
    up_stairs: Vec<Position>,
    down_stairs: Vec<Position>,
}

impl Level {
    /// Create a level with an immutable border and minimal-hardness interior rock
    pub fn new(width: usize, height: usize) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                    cells.push(Cell::immutable());
                } else {
                    cells.push(Cell::rock(MIN_HARDNESS));
                }
            }
        }
        Self {
            width,
            height,
            cells,
            rooms: Vec::new(),
            up_stairs: Vec::new(),
            down_stairs: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major index of a position
    pub fn index(&self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }

    /// Position of a row-major index
    pub fn position_of(&self, index: usize) -> Position {
        Position::new(index % self.width, index / self.width)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn is_border(&self, pos: Position) -> bool {
        self.in_bounds(pos)
            && (pos.x == 0 || pos.y == 0 || pos.x + 1 == self.width || pos.y + 1 == self.height)
    }

    pub fn is_interior(&self, pos: Position) -> bool {
        self.in_bounds(pos) && !self.is_border(pos)
    }

    /// Get the cell at a position
    ///
    /// Panics if the position is out of bounds; use [`Level::get`] otherwise.
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.in_bounds(pos).then(|| self.cell(pos))
    }

    /// Mutable access to an interior cell; border cells are never handed out
    pub(crate) fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if !self.is_interior(pos) {
            return None;
        }
        let index = self.index(pos);
        Some(&mut self.cells[index])
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn typ(&self, pos: Position) -> CellType {
        self.cell(pos).typ
    }

    pub fn hardness(&self, pos: Position) -> u8 {
        self.cell(pos).hardness
    }

    /// Whether a position is in bounds and walkable
    pub fn is_open(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(Cell::is_open)
    }

    pub fn occupant(&self, pos: Position) -> Option<ActorId> {
        self.get(pos).and_then(|cell| cell.occupant)
    }

    /// Record which actor stands on a cell
    pub fn set_occupant(&mut self, pos: Position, occupant: Option<ActorId>) {
        if self.in_bounds(pos) {
            let index = self.index(pos);
            self.cells[index].occupant = occupant;
        }
    }

    pub(crate) fn clear_occupants(&mut self) {
        for cell in &mut self.cells {
            cell.occupant = None;
        }
    }

    /// Set the hardness of an interior rock cell, kept within `1..=255`
    pub fn set_rock_hardness(&mut self, pos: Position, hardness: u8) {
        if let Some(cell) = self.cell_mut(pos)
            && cell.typ == CellType::Rock
        {
            cell.hardness = hardness.max(1);
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn up_stairs(&self) -> &[Position] {
        &self.up_stairs
    }

    pub fn down_stairs(&self) -> &[Position] {
        &self.down_stairs
    }

    /// Paint a room's cells as open floor and append it to the room list
    pub fn paint_room(&mut self, room: Room) {
        for pos in room.cells() {
            if let Some(cell) = self.cell_mut(pos) {
                cell.typ = CellType::Room;
                cell.hardness = 0;
            }
        }
        self.rooms.push(room);
    }

    /// Turn a rock cell into corridor; any other cell is left untouched
    ///
    /// Returns true if the cell changed.
    pub fn carve(&mut self, pos: Position) -> bool {
        match self.cell_mut(pos) {
            Some(cell) if cell.typ == CellType::Rock => {
                cell.typ = CellType::Corridor;
                cell.hardness = 0;
                true
            }
            _ => false,
        }
    }

    /// Put a staircase on an open cell
    ///
    /// Returns false if the cell is not open floor.
    pub fn place_stair(&mut self, pos: Position, up: bool) -> bool {
        let Some(cell) = self.cell_mut(pos) else {
            return false;
        };
        if !cell.typ.is_open() || cell.typ.is_stair() {
            return false;
        }
        cell.typ = if up {
            CellType::StairUp
        } else {
            CellType::StairDown
        };
        cell.hardness = 0;
        if up {
            self.up_stairs.push(pos);
        } else {
            self.down_stairs.push(pos);
        }
        true
    }

    /// Put a staircase on any interior cell, opening it if needed
    pub(crate) fn force_stair(&mut self, pos: Position, up: bool) -> bool {
        let Some(cell) = self.cell_mut(pos) else {
            return false;
        };
        cell.typ = if up {
            CellType::StairUp
        } else {
            CellType::StairDown
        };
        cell.hardness = 0;
        let list = if up {
            &mut self.up_stairs
        } else {
            &mut self.down_stairs
        };
        if !list.contains(&pos) {
            list.push(pos);
        }
        true
    }

    /// Lower a rock cell's hardness by `amount`
    pub fn dig(&mut self, pos: Position, amount: u8) -> DigOutcome {
        let Some(cell) = self.cell_mut(pos) else {
            return DigOutcome::Blocked;
        };
        if cell.typ.is_open() {
            return DigOutcome::Open;
        }
        let remaining = cell.hardness.saturating_sub(amount);
        if remaining == 0 {
            cell.typ = CellType::Corridor;
            cell.hardness = 0;
            DigOutcome::Breached
        } else {
            cell.hardness = remaining;
            DigOutcome::Weakened { remaining }
        }
    }

    /// Total number of room cells (stairs included)
    pub fn room_cell_count(&self) -> usize {
        self.rooms.iter().map(Room::area).sum()
    }

    /// Fraction of the interior covered by rooms
    pub fn room_coverage(&self) -> f64 {
        let interior = self.width.saturating_sub(2) * self.height.saturating_sub(2);
        if interior == 0 {
            return 0.0;
        }
        self.room_cell_count() as f64 / interior as f64
    }

    /// Index of the room containing a position
    pub fn room_index_at(&self, pos: Position) -> Option<usize> {
        self.rooms.iter().position(|room| room.contains(pos))
    }

    /// Whether a cell has room floor directly above, below, left or right
    pub fn is_adjacent_to_room(&self, pos: Position) -> bool {
        crate::action::Direction::CARDINALS.iter().any(|&dir| {
            pos.step(dir)
                .and_then(|next| self.get(next))
                .is_some_and(|cell| cell.typ.is_room_floor())
        })
    }

    /// Hardness of every cell, row-major
    pub fn hardness_map(&self) -> Vec<u8> {
        self.cells.iter().map(|cell| cell.hardness).collect()
    }

    /// Check that no interior cell violates the open/hardness agreement
    /// and that the border is intact
    pub fn is_consistent(&self) -> bool {
        self.cells.iter().enumerate().all(|(index, cell)| {
            let pos = self.position_of(index);
            if self.is_border(pos) {
                cell.typ == CellType::WallImmutable && cell.hardness == IMMUTABLE_HARDNESS
            } else {
                cell.typ != CellType::WallImmutable && cell.is_consistent()
            }
        })
    }

    /// ASCII map with living actors drawn over the terrain
    pub fn render(&self, actors: &[Actor]) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                let glyph = match self.occupant(pos).and_then(|id| actors.get(id.index())) {
                    Some(actor) if actor.alive && actor.position == pos => actor.symbol(),
                    _ if self.is_border(pos) => {
                        if y == 0 || y + 1 == self.height {
                            '-'
                        } else {
                            '|'
                        }
                    }
                    _ => self.typ(pos).symbol(),
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new(crate::DUNGEON_X, crate::DUNGEON_Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_level_border() {
        let level = Level::new(80, 21);
        assert_eq!(level.cells().len(), 80 * 21);
        assert_eq!(level.typ(Position::new(0, 0)), CellType::WallImmutable);
        assert_eq!(level.typ(Position::new(79, 10)), CellType::WallImmutable);
        assert_eq!(level.typ(Position::new(40, 20)), CellType::WallImmutable);
        assert_eq!(level.hardness(Position::new(0, 5)), 255);
        assert_eq!(level.typ(Position::new(1, 1)), CellType::Rock);
        assert!(level.is_consistent());
    }

    #[test]
    fn test_border_is_never_mutable() {
        let mut level = Level::new(10, 5);
        let corner = Position::new(0, 0);
        assert!(!level.carve(corner));
        assert_eq!(level.dig(corner, 255), DigOutcome::Blocked);
        assert!(!level.place_stair(Position::new(9, 2), true));
        level.set_rock_hardness(Position::new(0, 2), 3);
        assert_eq!(level.hardness(Position::new(0, 2)), 255);
        assert!(level.is_consistent());
    }

    #[test]
    fn test_paint_room_zeroes_hardness() {
        let mut level = Level::new(20, 10);
        let room = Room::new(2, 2, 4, 3);
        level.paint_room(room);
        for pos in room.cells() {
            assert_eq!(level.typ(pos), CellType::Room);
            assert_eq!(level.hardness(pos), 0);
        }
        assert_eq!(level.rooms(), &[room]);
        assert_eq!(level.room_cell_count(), 12);
        assert!(level.is_consistent());
    }

    #[test]
    fn test_carve_only_changes_rock() {
        let mut level = Level::new(20, 10);
        level.paint_room(Room::new(2, 2, 4, 3));
        assert!(!level.carve(Position::new(3, 3)));
        assert_eq!(level.typ(Position::new(3, 3)), CellType::Room);
        assert!(level.carve(Position::new(8, 3)));
        assert!(!level.carve(Position::new(8, 3)));
        assert_eq!(level.typ(Position::new(8, 3)), CellType::Corridor);
        assert_eq!(level.hardness(Position::new(8, 3)), 0);
    }

    #[test]
    fn test_dig_weakens_then_breaches() {
        let mut level = Level::new(10, 5);
        let pos = Position::new(4, 2);
        level.set_rock_hardness(pos, 200);
        assert_eq!(level.dig(pos, 85), DigOutcome::Weakened { remaining: 115 });
        assert_eq!(level.dig(pos, 85), DigOutcome::Weakened { remaining: 30 });
        assert_eq!(level.dig(pos, 85), DigOutcome::Breached);
        assert_eq!(level.typ(pos), CellType::Corridor);
        assert_eq!(level.dig(pos, 85), DigOutcome::Open);
        assert!(level.is_consistent());
    }

    #[test]
    fn test_stairs_need_open_floor() {
        let mut level = Level::new(20, 10);
        level.paint_room(Room::new(2, 2, 4, 3));
        assert!(!level.place_stair(Position::new(10, 5), true));
        assert!(level.place_stair(Position::new(2, 2), true));
        assert!(!level.place_stair(Position::new(2, 2), false));
        assert!(level.place_stair(Position::new(3, 2), false));
        assert_eq!(level.up_stairs(), &[Position::new(2, 2)]);
        assert_eq!(level.down_stairs(), &[Position::new(3, 2)]);
        assert_eq!(level.room_index_at(Position::new(3, 2)), Some(0));
    }

    #[test]
    fn test_room_adjacency() {
        let mut level = Level::new(20, 10);
        level.paint_room(Room::new(2, 2, 4, 3));
        assert!(level.is_adjacent_to_room(Position::new(6, 3)));
        assert!(level.is_adjacent_to_room(Position::new(3, 1)));
        assert!(!level.is_adjacent_to_room(Position::new(6, 1)));
        assert!(!level.is_adjacent_to_room(Position::new(8, 3)));
    }

    #[test]
    fn test_render_shape() {
        let mut level = Level::new(6, 4);
        level.paint_room(Room::new(1, 1, 2, 2));
        let map = level.render(&[]);
        let lines: Vec<&str> = map.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "------");
        assert_eq!(lines[1], "|..  |");
    }
}
