//! Persisted dungeon layout
//!
//! All multi-byte integers are big-endian. Record layout:
//!
//! | bytes      | field                                 |
//! |------------|---------------------------------------|
//! | 12         | tag `RLG327-S2021`                    |
//! | 4          | version (0)                           |
//! | 4          | total record size                     |
//! | 2          | player column, row                    |
//! | h * w      | hardness, row-major                   |
//! | 2 + 4r     | room count, then column/row/width/height |
//! | 2 + 2u     | up-stair count, then column/row       |
//! | 2 + 2d     | down-stair count, then column/row     |
//!
//! Decoding checks the whole record before building anything.

use log::debug;

use super::SaveFormatError;
use crate::dungeon::{Level, Position, Room};

/// File tag
pub const SAVE_TAG: &[u8; 12] = b"RLG327-S2021";

/// Only version written and accepted
pub const SAVE_VERSION: u32 = 0;

/// Tag, version, size and player position
const HEADER_LEN: usize = 12 + 4 + 4 + 2;

/// A decoded record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDungeon {
    pub level: Level,
    pub player: Position,
}

/// Size in bytes of a record with the given contents
pub const fn record_size(
    width: usize,
    height: usize,
    rooms: usize,
    up_stairs: usize,
    down_stairs: usize,
) -> usize {
    HEADER_LEN + width * height + 2 + 4 * rooms + 2 + 2 * up_stairs + 2 + 2 * down_stairs
}

fn coordinate(what: &'static str, value: usize) -> Result<u8, SaveFormatError> {
    u8::try_from(value).map_err(|_| SaveFormatError::Unencodable {
        reason: format!("{what} coordinate {value} does not fit in a byte"),
    })
}

fn count(what: &'static str, value: usize) -> Result<u16, SaveFormatError> {
    u16::try_from(value).map_err(|_| SaveFormatError::CountOverflow { what, count: value })
}

/// Serialize a level and the player's position
pub fn encode(level: &Level, player: Position) -> Result<Vec<u8>, SaveFormatError> {
    let rooms = level.rooms();
    let ups = level.up_stairs();
    let downs = level.down_stairs();
    let size = record_size(level.width(), level.height(), rooms.len(), ups.len(), downs.len());
    let declared = u32::try_from(size).map_err(|_| SaveFormatError::Unencodable {
        reason: format!("record of {size} bytes is too large"),
    })?;

    let mut out = Vec::with_capacity(size);
    out.extend_from_slice(SAVE_TAG);
    out.extend_from_slice(&SAVE_VERSION.to_be_bytes());
    out.extend_from_slice(&declared.to_be_bytes());
    out.push(coordinate("player", player.x)?);
    out.push(coordinate("player", player.y)?);
    out.extend(level.cells().iter().map(|cell| cell.hardness));

    out.extend_from_slice(&count("room", rooms.len())?.to_be_bytes());
    for room in rooms {
        out.push(coordinate("room", room.x)?);
        out.push(coordinate("room", room.y)?);
        out.push(coordinate("room", room.width)?);
        out.push(coordinate("room", room.height)?);
    }
    for (what, stairs) in [("up stair", ups), ("down stair", downs)] {
        out.extend_from_slice(&count(what, stairs.len())?.to_be_bytes());
        for pos in stairs {
            out.push(coordinate(what, pos.x)?);
            out.push(coordinate(what, pos.y)?);
        }
    }

    debug_assert_eq!(out.len(), size);
    Ok(out)
}

/// Read cursor over a record
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], SaveFormatError> {
        let needed = self.offset + n;
        let slice = self
            .bytes
            .get(self.offset..needed)
            .ok_or(SaveFormatError::Truncated {
                needed,
                len: self.bytes.len(),
            })?;
        self.offset = needed;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, SaveFormatError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, SaveFormatError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, SaveFormatError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Read a count of `record`-byte entries, refusing counts longer than the data
    fn count(&mut self, what: &'static str, record: usize) -> Result<usize, SaveFormatError> {
        let n = self.u16()? as usize;
        if n * record > self.remaining() {
            return Err(SaveFormatError::CountOverflow { what, count: n });
        }
        Ok(n)
    }

    fn interior_point(
        &mut self,
        what: &'static str,
        width: usize,
        height: usize,
    ) -> Result<Position, SaveFormatError> {
        let x = self.u8()? as usize;
        let y = self.u8()? as usize;
        if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
            return Err(SaveFormatError::OutOfBounds { what, x, y });
        }
        Ok(Position::new(x, y))
    }
}

/// Parse a record for a `width` by `height` grid
pub fn decode(bytes: &[u8], width: usize, height: usize) -> Result<SavedDungeon, SaveFormatError> {
    let mut reader = Reader::new(bytes);
    if reader.take(SAVE_TAG.len())? != SAVE_TAG {
        return Err(SaveFormatError::BadTag);
    }
    let version = reader.u32()?;
    if version != SAVE_VERSION {
        return Err(SaveFormatError::UnsupportedVersion { found: version });
    }
    let declared = reader.u32()?;
    if declared as usize != bytes.len() {
        return Err(SaveFormatError::SizeMismatch {
            declared,
            actual: bytes.len(),
        });
    }

    let player = reader.interior_point("player", width, height)?;
    let hardness = reader.take(width * height)?;

    let room_count = reader.count("room", 4)?;
    let mut rooms = Vec::with_capacity(room_count);
    for _ in 0..room_count {
        let origin = reader.interior_point("room", width, height)?;
        let room_width = reader.u8()? as usize;
        let room_height = reader.u8()? as usize;
        let room = Room::new(origin.x, origin.y, room_width, room_height);
        let fits = room_width > 0
            && room_height > 0
            && room.right() + 1 < width
            && room.bottom() + 1 < height;
        if !fits {
            return Err(SaveFormatError::OutOfBounds {
                what: "room",
                x: origin.x,
                y: origin.y,
            });
        }
        rooms.push(room);
    }

    let mut stairs = [Vec::new(), Vec::new()];
    for (what, list) in ["up stair", "down stair"].into_iter().zip(stairs.iter_mut()) {
        let n = reader.count(what, 2)?;
        for _ in 0..n {
            list.push(reader.interior_point(what, width, height)?);
        }
    }
    if reader.remaining() != 0 {
        return Err(SaveFormatError::SizeMismatch {
            declared,
            actual: reader.offset,
        });
    }

    // Everything checked: build the level.
    let mut level = Level::new(width, height);
    for (index, &h) in hardness.iter().enumerate() {
        let pos = level.position_of(index);
        if !level.is_interior(pos) {
            continue;
        }
        if h == 0 {
            level.carve(pos);
        } else {
            level.set_rock_hardness(pos, h);
        }
    }
    for room in rooms {
        level.paint_room(room);
    }
    let [ups, downs] = stairs;
    for pos in ups {
        level.force_stair(pos, true);
    }
    for pos in downs {
        level.force_stair(pos, false);
    }

    debug!(
        "decoded {}x{} level with {} rooms",
        width,
        height,
        level.rooms().len()
    );
    Ok(SavedDungeon { level, player })
}
