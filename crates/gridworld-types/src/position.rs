//! Integer grid coordinates.
//!
//! [`Position`] is a plain `Copy` value: every translation returns a new
//! instance. Ordering is lexicographic on `(x, y)`, which is also the order
//! in which `BTreeMap<Position, _>` iterates, so nearest-target searches
//! break distance ties deterministically.

use serde::{Deserialize, Serialize};

/// A cell coordinate on the grid.
///
/// Coordinates are signed so that translating off the top or left edge
/// produces a negative (off-grid) position instead of wrapping.
/// Layout files encode a position as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Position {
    /// Column, growing eastward.
    pub x: i32,
    /// Row, growing southward.
    pub y: i32,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to `other`.
    pub const fn distance_to(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }

    /// Return a new position shifted by `(dx, dy)`.
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Whether either coordinate is negative.
    pub const fn is_negative(self) -> bool {
        self.x < 0 || self.y < 0
    }

    /// The four cardinal neighbors in north, south, east, west order.
    pub const fn neighbors(self) -> [Self; 4] {
        [
            self.translated(0, -1),
            self.translated(0, 1),
            self.translated(1, 0),
            self.translated(-1, 0),
        ]
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Position> for (i32, i32) {
    fn from(pos: Position) -> Self {
        (pos.x, pos.y)
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
