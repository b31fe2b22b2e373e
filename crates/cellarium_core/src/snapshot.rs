use cellarium_data::{CellColor, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CellSnapshot {
    pub position: Position,
    pub values: Vec<f32>,
    pub color: CellColor,
}

/// Printable copy of the read view at a cycle boundary.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world: Option<String>,
    pub cycle: u64,
    pub characteristics: Vec<String>,
    pub cells: Vec<CellSnapshot>,
}

impl WorldSnapshot {
    #[must_use]
    pub fn with_world(mut self, name: impl Into<String>) -> Self {
        self.world = Some(name.into());
        self
    }

    #[must_use]
    pub fn cell(&self, position: Position) -> Option<&CellSnapshot> {
        self.cells.iter().find(|c| c.position == position)
    }

    /// Value of a named characteristic (case-insensitive) at `position`.
    #[must_use]
    pub fn value(&self, position: Position, name: &str) -> Option<f32> {
        let index = self
            .characteristics
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))?;
        self.cell(position)?.values.get(index).copied()
    }
}

impl fmt::Display for WorldSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.world {
            Some(name) => write!(f, "[{name}] cycle {}", self.cycle)?,
            None => write!(f, "cycle {}", self.cycle)?,
        }
        writeln!(f, ": {} cell(s)", self.cells.len())?;
        for cell in &self.cells {
            write!(f, "  {:<15}", cell.position)?;
            for (name, value) in self.characteristics.iter().zip(&cell.values) {
                write!(f, " {name}={value}")?;
            }
            writeln!(f, " color={}", cell.color)?;
        }
        Ok(())
    }
}
