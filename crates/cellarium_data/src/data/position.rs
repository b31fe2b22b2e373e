use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer grid coordinate of a cell.
///
/// Positions compare and hash by value, so they serve directly as map keys.
/// The derived ordering (x, then y, then z) is used to print cells in a
/// stable order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position in the z = 0 plane.
    #[must_use]
    pub const fn planar(x: i32, y: i32) -> Self {
        Self { x, y, z: 0 }
    }

    /// Returns this position shifted by the given deltas, or `None` if any
    /// coordinate leaves the `i32` range.
    #[must_use]
    pub fn checked_offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            z: self.z.checked_add(dz)?,
        })
    }
}

impl From<(i32, i32, i32)> for Position {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Pad through the formatter so `{:<15}` aligns log columns.
        f.pad(&format!("({},{},{})", self.x, self.y, self.z))
    }
}
