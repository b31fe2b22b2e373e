//! Cycle driver.
//!
//! The engine owns the cell store and the five optional hook bindings. The
//! first cycle request moves it from `NotStarted` to `Running`, running the
//! initialization hook once; every cycle then runs
//!
//! `begin_cycle -> Update -> Evaluation -> Reproduction -> Selection -> end_cycle`
//!
//! and emits a snapshot. A failing hook is reported as an event and does not
//! stop the remaining hooks or the cycle.

use crate::api::{PhaseParameters, SimulationApi};
use crate::characteristics::CharacteristicRegistry;
use crate::config::{Phase, WorldConfig};
use crate::error::{Result, SimError};
use crate::metrics::Metrics;
use crate::module_loader::{invoke, CallableHandle, ModuleRegistry};
use crate::snapshot::WorldSnapshot;
use crate::store::{CellStore, SimulationMode};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    NotStarted,
    Running,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    HookSucceeded {
        phase: Phase,
        cycle: u64,
    },
    HookFailed {
        phase: Phase,
        cycle: u64,
        error: SimError,
    },
    Snapshot(WorldSnapshot),
}

/// A configured hook that could not be resolved; the hook stays unbound.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingFailure {
    pub phase: Phase,
    pub reference: String,
    pub error: SimError,
}

/// Descriptive part of the world configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldInfo {
    pub name: String,
    pub space: i64,
    pub dimensions: Vec<i64>,
}

pub struct SimulationEngine {
    info: WorldInfo,
    state: EngineState,
    store: CellStore,
    hooks: [Option<CallableHandle>; 5],
    parameters: PhaseParameters,
    metrics: Metrics,
}

impl SimulationEngine {
    /// An unconfigured engine with an empty synchronous store.
    #[must_use]
    pub fn new(name: impl Into<String>, registry: Arc<CharacteristicRegistry>) -> Self {
        Self {
            info: WorldInfo {
                name: name.into(),
                space: 0,
                dimensions: Vec::new(),
            },
            state: EngineState::NotStarted,
            store: CellStore::new(registry),
            hooks: Default::default(),
            parameters: PhaseParameters::default(),
            metrics: Metrics::new(),
        }
    }

    /// Builds the registry and store from `config` and resolves each
    /// configured hook against `modules`.
    ///
    /// Registry errors abort construction. A hook that fails to resolve is
    /// returned as a [`BindingFailure`] and left unbound; the other hooks are
    /// unaffected.
    pub fn from_config(
        config: &WorldConfig,
        modules: &ModuleRegistry,
    ) -> Result<(Self, Vec<BindingFailure>)> {
        let registry = Arc::new(CharacteristicRegistry::new(&config.characteristics)?);
        let mut engine = Self::new(config.name.clone(), registry);
        engine.info.space = config.space;
        engine.info.dimensions = config.dimensions.clone();

        let mut failures = Vec::new();
        for phase in Phase::ALL {
            let Some(method) = config.method(phase) else {
                continue;
            };
            engine.set_parameters(phase, method.parameters.clone());
            match modules.resolve_str(&method.method) {
                Ok(handle) => {
                    tracing::debug!(%phase, reference = %handle.reference(), "Hook bound");
                    engine.bind(phase, handle);
                }
                Err(error) => {
                    tracing::warn!(%phase, reference = %method.method, %error, "Hook not bound");
                    failures.push(BindingFailure {
                        phase,
                        reference: method.method.clone(),
                        error,
                    });
                }
            }
        }
        Ok((engine, failures))
    }

    #[must_use]
    pub fn with_mode(mut self, mode: SimulationMode) -> Self {
        self.store.set_mode(mode);
        self
    }

    pub fn bind(&mut self, phase: Phase, handle: CallableHandle) {
        self.hooks[phase.index()] = Some(handle);
    }

    pub fn unbind(&mut self, phase: Phase) -> Option<CallableHandle> {
        self.hooks[phase.index()].take()
    }

    #[must_use]
    pub fn is_bound(&self, phase: Phase) -> bool {
        self.hooks[phase.index()].is_some()
    }

    pub fn set_parameters(&mut self, phase: Phase, parameters: Vec<String>) {
        self.parameters.set(phase, parameters);
    }

    #[must_use]
    pub fn parameters(&self) -> &PhaseParameters {
        &self.parameters
    }

    #[must_use]
    pub fn info(&self) -> &WorldInfo {
        &self.info
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.store.generation()
    }

    #[must_use]
    pub fn store(&self) -> &CellStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CellStore {
        &mut self.store
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        self.store.snapshot().with_world(self.info.name.clone())
    }

    /// Runs `count` cycles, starting the simulation first if needed.
    ///
    /// `count` mirrors the textual cycle request and must be non-negative;
    /// a negative value is rejected with [`SimError::InvalidArgument`] before
    /// anything runs. A zero count on a fresh engine still performs the
    /// start-up pass.
    pub fn run_cycles(&mut self, count: i64) -> Result<Vec<EngineEvent>> {
        if count < 0 {
            return Err(SimError::invalid_argument(format!(
                "cycle count must be a non-negative integer, got {count}"
            )));
        }

        let mut events = Vec::new();
        if self.state == EngineState::NotStarted {
            self.start(&mut events);
        }
        for _ in 0..count {
            self.run_cycle(&mut events);
        }
        Ok(events)
    }

    fn start(&mut self, events: &mut Vec<EngineEvent>) {
        tracing::info!(world = %self.info.name, mode = ?self.store.mode(), "Simulation started");
        self.state = EngineState::Running;
        if self.is_bound(Phase::Initialization) {
            self.store.begin_initialization();
            self.run_hook(Phase::Initialization, events);
            self.store.end_cycle();
        }
        events.push(EngineEvent::Snapshot(self.snapshot()));
    }

    fn run_cycle(&mut self, events: &mut Vec<EngineEvent>) {
        let started = Instant::now();
        self.store.begin_cycle();
        tracing::debug!(cycle = self.cycle(), "Cycle begin");
        for phase in Phase::CYCLE {
            self.run_hook(phase, events);
        }
        self.store.end_cycle();
        self.metrics
            .record_cycle(started.elapsed(), self.store.len());
        events.push(EngineEvent::Snapshot(self.snapshot()));
    }

    fn run_hook(&mut self, phase: Phase, events: &mut Vec<EngineEvent>) {
        let Some(handle) = self.hooks[phase.index()].clone() else {
            return;
        };
        let cycle = self.cycle();
        let mut api = SimulationApi::new(&mut self.store, &self.parameters);
        match invoke(&handle, &mut api) {
            Ok(()) => {
                self.metrics.record_hook(true);
                tracing::debug!(%phase, cycle, "Hook completed");
                events.push(EngineEvent::HookSucceeded { phase, cycle });
            }
            Err(error) => {
                self.metrics.record_hook(false);
                tracing::warn!(%phase, cycle, %error, "Hook failed");
                events.push(EngineEvent::HookFailed {
                    phase,
                    cycle,
                    error,
                });
            }
        }
    }
}
