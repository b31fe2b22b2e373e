//! # Cellarium Core
//!
//! The simulation kernel for Cellarium, a cellular-automaton host that drives
//! externally supplied behavior modules.
//!
//! This crate contains:
//! - The characteristic registry shared by every cell in a world
//! - Cells with a generation stamp checked against a shared write guard
//! - A double-buffered cell store (synchronous or asynchronous update)
//! - The behavior module registry and fault-isolated hook invocation
//! - The cycle driver and the capability facade handed to hooks
//!
//! ## Example
//!
//! ```
//! use cellarium_core::{CellStore, CharacteristicRegistry};
//! use cellarium_data::Position;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(CharacteristicRegistry::new(["age", "size"]).unwrap());
//! let mut store = CellStore::new(registry);
//!
//! store.begin_initialization();
//! store.add_new_cell(Position::new(0, 0, 0));
//! store.end_cycle();
//!
//! store.begin_cycle();
//! let cell = store.try_get_cell(Position::new(0, 0, 0)).unwrap();
//! cell.set_by_name("age", 5.0).unwrap();
//! // Synchronous writes land in the pending view.
//! assert_eq!(cell.get_by_name("age").unwrap(), 0.0);
//! store.end_cycle();
//! ```

/// Capability facade passed to behavior hooks
pub mod api;
/// Cells, their values and the generation write guard
pub mod cell;
/// Ordered, case-insensitive characteristic names
pub mod characteristics;
/// World configuration and simulation phases
pub mod config;
/// Cycle driver
pub mod engine;
/// Error types
pub mod error;
/// Read/write handle onto a stored cell
pub mod handle;
/// Counters and logging setup
pub mod metrics;
/// Behavior module registry and invocation
pub mod module_loader;
/// Serializable world state
pub mod snapshot;
/// Double-buffered cell storage
pub mod store;

pub use api::{PhaseParameters, SimulationApi};
pub use cell::{Cell, CellView, SharedCell, WriteGuard};
pub use characteristics::CharacteristicRegistry;
pub use config::{MethodConfig, Phase, WorldConfig};
pub use engine::{BindingFailure, EngineEvent, EngineState, SimulationEngine, WorldInfo};
pub use error::{Result, SimError};
pub use handle::CellHandle;
pub use metrics::{init_logging, Metrics};
pub use module_loader::{
    invoke, BehaviorModule, BehaviorType, CallableHandle, HookFn, ModuleReference, ModuleRegistry,
};
pub use snapshot::{CellSnapshot, WorldSnapshot};
pub use store::{CellStore, SimulationMode};
