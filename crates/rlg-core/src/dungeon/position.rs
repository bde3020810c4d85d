//! Grid coordinates

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::Direction;

/// A cell coordinate: `x` is the column, `y` the row
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Offset by a signed delta, `None` if it would leave the positive quadrant
    pub fn offset(self, dx: i8, dy: i8) -> Option<Position> {
        Some(Position {
            x: self.x.checked_add_signed(dx as isize)?,
            y: self.y.checked_add_signed(dy as isize)?,
        })
    }

    /// One step in a direction
    pub fn step(self, dir: Direction) -> Option<Position> {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    /// Squared Euclidean distance
    pub fn distance_squared(self, other: Position) -> usize {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx * dx + dy * dy
    }

    pub fn manhattan(self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// King-move distance
    pub fn chebyshev(self, other: Position) -> usize {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
