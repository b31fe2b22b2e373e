//! Transient (position, cell) pairs handed to callers.
//!
//! A handle never owns map entries; it holds shared references to the cell
//! seen in the read view and, separately, to the cell at the same position in
//! the write view. Reads observe the state as of cycle start. Writes go to the
//! write-view cell, so in synchronous mode they become visible only after the
//! buffer swap, and in asynchronous mode (where both views coincide) they are
//! visible immediately.

use crate::cell::{Cell, CellView, SharedCell};
use crate::error::{Result, SimError};
use cellarium_data::{CellColor, Position};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct CellHandle {
    position: Position,
    read: SharedCell,
    write: Option<SharedCell>,
}

impl CellHandle {
    pub(crate) fn new(position: Position, read: SharedCell, write: Option<SharedCell>) -> Self {
        Self {
            position,
            read,
            write,
        }
    }

    /// Handle whose read and write targets are the same cell.
    pub(crate) fn direct(position: Position, cell: SharedCell) -> Self {
        Self {
            position,
            write: Some(Rc::clone(&cell)),
            read: cell,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// The cell as seen by readers. Read-only: a write to the read-view cell
    /// would be lost at the next swap.
    #[must_use]
    pub fn cell(&self) -> CellView<'_> {
        CellView::new(&self.read)
    }

    /// The write-view cell, if the position is still present there.
    #[must_use]
    pub fn write_cell(&self) -> Option<&Cell> {
        self.write.as_deref()
    }

    /// Whether both views share one cell.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.write
            .as_ref()
            .is_some_and(|w| Rc::ptr_eq(w, &self.read))
    }

    pub fn get(&self, index: usize) -> Result<f32> {
        self.read.get(index)
    }

    pub fn get_by_name(&self, name: &str) -> Result<f32> {
        self.read.get_by_name(name)
    }

    #[must_use]
    pub fn color(&self) -> CellColor {
        self.read.color()
    }

    pub fn set(&self, index: usize, value: f32) -> Result<()> {
        self.target()?.set(index, value)
    }

    pub fn set_by_name(&self, name: &str, value: f32) -> Result<()> {
        self.target()?.set_by_name(name, value)
    }

    /// Applies `f` to the read value and stores the result in the write view.
    pub fn update<F>(&self, index: usize, f: F) -> Result<f32>
    where
        F: FnOnce(f32) -> f32,
    {
        let next = f(self.read.get(index)?);
        self.target()?.set(index, next)?;
        Ok(next)
    }

    pub fn update_by_name<F>(&self, name: &str, f: F) -> Result<f32>
    where
        F: FnOnce(f32) -> f32,
    {
        let index = self.read.registry().index_of(name)?;
        self.update(index, f)
    }

    pub fn set_color(&self, color: CellColor) -> Result<()> {
        self.target()?.set_color(color)
    }

    fn target(&self) -> Result<&Cell> {
        self.write
            .as_deref()
            .ok_or(SimError::Detached(self.position))
    }
}
