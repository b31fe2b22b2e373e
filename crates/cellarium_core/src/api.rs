//! The capability facade handed to behavior modules.
//!
//! Modules see only this narrow surface: the cycle number, read-view
//! enumeration and lookup, cell creation and removal in the write view, and
//! the parameter lists configured for each lifecycle phase. They never get
//! the store itself, so they cannot swap buffers, change the mode or touch
//! the write guard.

use crate::config::Phase;
use crate::handle::CellHandle;
use crate::store::CellStore;
use cellarium_data::Position;

/// Configured parameter list per lifecycle phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseParameters([Vec<String>; 5]);

impl PhaseParameters {
    #[must_use]
    pub fn get(&self, phase: Phase) -> &[String] {
        &self.0[phase.index()]
    }

    pub fn set(&mut self, phase: Phase, parameters: Vec<String>) {
        self.0[phase.index()] = parameters;
    }

    /// Parameters for a phase named case-insensitively; empty when the name
    /// is not a phase.
    #[must_use]
    pub fn lookup(&self, phase_name: &str) -> &[String] {
        match phase_name.parse::<Phase>() {
            Ok(phase) => self.get(phase),
            Err(_) => &[],
        }
    }
}

pub struct SimulationApi<'a> {
    store: &'a mut CellStore,
    parameters: &'a PhaseParameters,
}

impl<'a> SimulationApi<'a> {
    pub fn new(store: &'a mut CellStore, parameters: &'a PhaseParameters) -> Self {
        Self { store, parameters }
    }

    /// Current cycle number.
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.store.generation()
    }

    /// Enumerates the read view. Collect the handles first if the pass is
    /// going to add or remove cells.
    pub fn all_cells(&self) -> impl Iterator<Item = CellHandle> + '_ {
        self.store.all_cells()
    }

    /// Creates a zeroed cell at (x, y, z) in the write view; `None` if the
    /// position is taken.
    pub fn add_cell(&mut self, x: i32, y: i32, z: i32) -> Option<CellHandle> {
        self.store.add_new_cell(Position::new(x, y, z))
    }

    pub fn remove_cell(&mut self, x: i32, y: i32, z: i32) -> bool {
        self.store.remove_cell(Position::new(x, y, z))
    }

    #[must_use]
    pub fn try_get_cell(&self, x: i32, y: i32, z: i32) -> Option<CellHandle> {
        self.store.try_get_cell(Position::new(x, y, z))
    }

    /// Parameters configured for the named phase.
    #[must_use]
    pub fn parameters(&self, phase_name: &str) -> &[String] {
        self.parameters.lookup(phase_name)
    }
}
