use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB display color carried by every cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl CellColor {
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn with_red(self, r: u8) -> Self {
        Self { r, ..self }
    }

    #[must_use]
    pub const fn with_green(self, g: u8) -> Self {
        Self { g, ..self }
    }

    #[must_use]
    pub const fn with_blue(self, b: u8) -> Self {
        Self { b, ..self }
    }
}

impl From<[u8; 3]> for CellColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.r, self.g, self.b)
    }
}
