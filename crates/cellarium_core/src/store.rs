//! Position-indexed cell storage with double buffering.
//!
//! The store owns two maps. `views[front]` is the read view: the state as of
//! the start of the current cycle. In synchronous mode the other map is the
//! write view being built for the next cycle; [`CellStore::begin_cycle`]
//! fills it with restamped deep copies and [`CellStore::end_cycle`] flips
//! `front`, which swaps the views without copying. In asynchronous mode the
//! read view doubles as the write view and the write guard is suspended.
//!
//! Mode switches are meant to happen between cycles. Switching in the middle
//! of a synchronous cycle discards whatever the write view held.

use crate::cell::{Cell, SharedCell, WriteGuard};
use crate::characteristics::CharacteristicRegistry;
use crate::handle::CellHandle;
use crate::snapshot::{CellSnapshot, WorldSnapshot};
use cellarium_data::Position;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimulationMode {
    /// Writes land in a separate buffer that becomes visible at cycle end.
    #[default]
    Synchronous,
    /// Writes are visible immediately; the write guard is off.
    Asynchronous,
}

type CellMap = HashMap<Position, SharedCell>;

#[derive(Debug)]
pub struct CellStore {
    registry: Arc<CharacteristicRegistry>,
    guard: Rc<WriteGuard>,
    mode: SimulationMode,
    views: [CellMap; 2],
    front: usize,
    current_cell: Option<CellHandle>,
}

impl CellStore {
    /// Creates an empty synchronous store at generation 0.
    #[must_use]
    pub fn new(registry: Arc<CharacteristicRegistry>) -> Self {
        Self {
            registry,
            guard: Rc::new(WriteGuard::new(0)),
            mode: SimulationMode::Synchronous,
            views: [CellMap::new(), CellMap::new()],
            front: 0,
            current_cell: None,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: SimulationMode) -> Self {
        self.set_mode(mode);
        self
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<CharacteristicRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SimulationMode) {
        self.mode = mode;
        self.guard
            .set_suspended(mode == SimulationMode::Asynchronous);
        self.clear_current_cell();
    }

    /// The active write generation, which is also the cycle number.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.guard.active()
    }

    /// Disables the stamp comparison regardless of mode. Intended for tests
    /// that need to poke at cells outside their owning generation.
    pub fn bypass_write_guard(&mut self, bypass: bool) {
        self.guard.set_bypassed(bypass);
    }

    /// A zeroed cell bound to this store's registry and write guard.
    #[must_use]
    pub fn create_cell(&self) -> Cell {
        Cell::new(Arc::clone(&self.registry), Rc::clone(&self.guard))
    }

    /// Advances the write generation and prepares the write view.
    pub fn begin_cycle(&mut self) {
        self.guard.advance();
        self.prepare_write_view();
    }

    /// Prepares the write view for the initialization pass without advancing
    /// the generation.
    pub fn begin_initialization(&mut self) {
        self.prepare_write_view();
    }

    pub fn end_cycle(&mut self) {
        self.clear_current_cell();
        if self.mode == SimulationMode::Synchronous {
            self.front ^= 1;
        }
    }

    fn prepare_write_view(&mut self) {
        self.clear_current_cell();
        if self.mode == SimulationMode::Synchronous {
            let back = self.front ^ 1;
            let mut next = std::mem::take(&mut self.views[back]);
            next.clear();
            next.extend(
                self.views[self.front]
                    .iter()
                    .map(|(pos, cell)| (*pos, Rc::new(Cell::clone(cell)))),
            );
            self.views[back] = next;
        }
    }

    fn read_view(&self) -> &CellMap {
        &self.views[self.front]
    }

    fn write_index(&self) -> usize {
        match self.mode {
            SimulationMode::Synchronous => self.front ^ 1,
            SimulationMode::Asynchronous => self.front,
        }
    }

    fn write_view(&self) -> &CellMap {
        &self.views[self.write_index()]
    }

    fn write_view_mut(&mut self) -> &mut CellMap {
        let idx = self.write_index();
        &mut self.views[idx]
    }

    /// Inserts `cell` into the write view. Returns `None`, leaving the store
    /// untouched, if `pos` is already occupied there or if `cell` was not
    /// created by this store (see [`CellStore::create_cell`]).
    pub fn add_cell(&mut self, pos: Position, cell: Cell) -> Option<CellHandle> {
        if !cell.belongs_to(&self.registry, &self.guard) {
            tracing::warn!(position = %pos, "Rejected cell created for another store");
            return None;
        }
        let view = self.write_view_mut();
        if view.contains_key(&pos) {
            return None;
        }
        let cell = Rc::new(cell);
        view.insert(pos, Rc::clone(&cell));
        Some(CellHandle::direct(pos, cell))
    }

    /// Adds a fresh zeroed cell at `pos`.
    pub fn add_new_cell(&mut self, pos: Position) -> Option<CellHandle> {
        let cell = self.create_cell();
        self.add_cell(pos, cell)
    }

    pub fn remove_cell(&mut self, pos: Position) -> bool {
        self.write_view_mut().remove(&pos).is_some()
    }

    /// Relocates a write-view entry, keeping the same cell.
    pub fn move_cell(&mut self, from: Position, to: Position) -> bool {
        let view = self.write_view_mut();
        if !view.contains_key(&from) || view.contains_key(&to) {
            return false;
        }
        match view.remove(&from) {
            Some(cell) => {
                view.insert(to, cell);
                true
            }
            None => false,
        }
    }

    /// Looks up the read view.
    #[must_use]
    pub fn try_get_cell(&self, pos: Position) -> Option<CellHandle> {
        self.read_view().get(&pos).map(|cell| self.handle(pos, cell))
    }

    /// Lazily enumerates the read view. Order is unspecified but stable while
    /// the view is unchanged; call again for a fresh pass.
    pub fn all_cells(&self) -> impl Iterator<Item = CellHandle> + '_ {
        self.read_view()
            .iter()
            .map(move |(pos, cell)| self.handle(*pos, cell))
    }

    fn handle(&self, pos: Position, read: &SharedCell) -> CellHandle {
        let write = self.write_view().get(&pos).map(Rc::clone);
        CellHandle::new(pos, Rc::clone(read), write)
    }

    /// Number of cells in the read view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_view().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_view().is_empty()
    }

    /// Number of cells in the write view.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.write_view().len()
    }

    /// Selects the write-view cell at `pos` as the current cell.
    pub fn select_cell(&mut self, pos: Position) -> bool {
        self.current_cell = self
            .write_view()
            .get(&pos)
            .map(|cell| CellHandle::direct(pos, Rc::clone(cell)));
        self.current_cell.is_some()
    }

    #[must_use]
    pub fn current_cell(&self) -> Option<&CellHandle> {
        self.current_cell.as_ref()
    }

    pub fn clear_current_cell(&mut self) {
        self.current_cell = None;
    }

    /// Printable copy of the read view, sorted by position.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        let mut cells: Vec<CellSnapshot> = self
            .read_view()
            .iter()
            .map(|(pos, cell)| CellSnapshot {
                position: *pos,
                values: cell.values(),
                color: cell.color(),
            })
            .collect();
        cells.sort_by_key(|c| c.position);
        WorldSnapshot {
            world: None,
            cycle: self.generation(),
            characteristics: self.registry.names().to_vec(),
            cells,
        }
    }
}
