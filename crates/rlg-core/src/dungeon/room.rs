//! Rooms

use serde::{Deserialize, Serialize};

use super::Position;
use crate::GameRng;

/// A rectangular room; `x`/`y` is the top-left corner (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Room {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Last column inside the room
    pub const fn right(&self) -> usize {
        self.x + self.width - 1
    }

    /// Last row inside the room
    pub const fn bottom(&self) -> usize {
        self.y + self.height - 1
    }

    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    pub const fn center(&self) -> Position {
        Position::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub const fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x && pos.x <= self.right() && pos.y >= self.y && pos.y <= self.bottom()
    }

    /// Check whether two rooms come within `buffer` cells of each other
    pub const fn overlaps(&self, other: &Room, buffer: usize) -> bool {
        self.x <= other.right() + buffer
            && other.x <= self.right() + buffer
            && self.y <= other.bottom() + buffer
            && other.y <= self.bottom() + buffer
    }

    /// Whether the room keeps a one-cell gap from a `width` x `height` grid's border
    pub const fn fits_interior(&self, width: usize, height: usize) -> bool {
        self.width > 0
            && self.height > 0
            && self.x >= 1
            && self.y >= 1
            && self.right() + 1 < width
            && self.bottom() + 1 < height
    }

    /// Squared Euclidean distance between room origins
    pub fn distance_squared(&self, other: &Room) -> usize {
        self.origin().distance_squared(other.origin())
    }

    /// Uniformly chosen cell inside the room
    pub fn random_point(&self, rng: &mut GameRng) -> Position {
        Position::new(
            self.x + rng.rn2(self.width as u32) as usize,
            self.y + rng.rn2(self.height as u32) as usize,
        )
    }

    /// Iterate all cells of the room row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y..=self.bottom())
            .flat_map(move |y| (self.x..=self.right()).map(move |x| Position::new(x, y)))
    }
}
