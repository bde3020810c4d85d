//! Map cell types

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::monster::ActorId;

/// Terrain kind of a cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CellType {
    #[default]
    Rock = 0,
    Room = 1,
    Corridor = 2,
    StairUp = 3,
    StairDown = 4,
    WallImmutable = 5,
}

impl CellType {
    /// Open cells are walkable and always have hardness 0
    pub const fn is_open(&self) -> bool {
        matches!(
            self,
            CellType::Room | CellType::Corridor | CellType::StairUp | CellType::StairDown
        )
    }

    /// Room floor, including stairs painted onto it
    pub const fn is_room_floor(&self) -> bool {
        matches!(
            self,
            CellType::Room | CellType::StairUp | CellType::StairDown
        )
    }

    pub const fn is_stair(&self) -> bool {
        matches!(self, CellType::StairUp | CellType::StairDown)
    }

    /// Whether carving or digging may ever change this cell
    pub const fn is_mutable(&self) -> bool {
        !matches!(self, CellType::WallImmutable)
    }

    /// Get the display character for this cell type
    pub const fn symbol(&self) -> char {
        match self {
            CellType::Rock => ' ',
            CellType::Room => '.',
            CellType::Corridor => '#',
            CellType::StairUp => '<',
            CellType::StairDown => '>',
            CellType::WallImmutable => '+',
        }
    }
}

/// A single map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub typ: CellType,
    pub hardness: u8,
    pub occupant: Option<ActorId>,
}

impl Cell {
    /// Interior rock of the given hardness
    pub const fn rock(hardness: u8) -> Self {
        Self {
            typ: CellType::Rock,
            hardness,
            occupant: None,
        }
    }

    /// Border cell that nothing may alter
    pub const fn immutable() -> Self {
        Self {
            typ: CellType::WallImmutable,
            hardness: crate::IMMUTABLE_HARDNESS,
            occupant: None,
        }
    }

    pub const fn is_open(&self) -> bool {
        self.typ.is_open()
    }

    /// Hardness/terrain agreement: open exactly when hardness is 0
    pub const fn is_consistent(&self) -> bool {
        self.typ.is_open() == (self.hardness == 0)
    }
}
