pub mod macros;

use cellarium_core::{
    BehaviorModule, BehaviorType, CellHandle, MethodConfig, ModuleRegistry, Phase,
    SimulationApi, SimulationEngine, SimulationMode, WorldConfig,
};
use cellarium_data::Position;
use std::cell::RefCell;

/// Module path of the hooks in [`test_modules`].
#[allow(dead_code)]
pub const TEST_MODULE: &str = "test_hooks.so";

#[allow(dead_code)]
pub fn increment_age(api: &mut SimulationApi<'_>) -> anyhow::Result<()> {
    for cell in api.all_cells() {
        cell.update_by_name("age", |age| age + 1.0)?;
    }
    Ok(())
}

#[allow(dead_code)]
pub fn spawn_origin(api: &mut SimulationApi<'_>) -> anyhow::Result<()> {
    if api.add_cell(0, 0, 0).is_none() {
        anyhow::bail!("origin already occupied");
    }
    Ok(())
}

#[allow(dead_code)]
pub fn always_fails(_api: &mut SimulationApi<'_>) -> anyhow::Result<()> {
    anyhow::bail!("deliberate failure")
}

#[allow(dead_code)]
pub fn always_panics(_api: &mut SimulationApi<'_>) -> anyhow::Result<()> {
    panic!("deliberate panic")
}

/// Writes an unknown characteristic, which must fail inside the hook.
#[allow(dead_code)]
pub fn touch_unknown(api: &mut SimulationApi<'_>) -> anyhow::Result<()> {
    for cell in api.all_cells() {
        cell.set_by_name("colour", 1.0)?;
    }
    Ok(())
}

thread_local! {
    static KEPT_HANDLE: RefCell<Option<CellHandle>> = const { RefCell::new(None) };
}

/// Keeps a handle to the first cell and, on the next call, writes through
/// the handle kept by the previous one.
#[allow(dead_code)]
pub fn write_through_kept_handle(api: &mut SimulationApi<'_>) -> anyhow::Result<()> {
    let previous = KEPT_HANDLE.with(|kept| kept.replace(api.all_cells().next()));
    if let Some(handle) = previous {
        handle.set_by_name("age", -1.0)?;
    }
    Ok(())
}

/// `test_hooks.so` with type `Test.Hooks`.
#[allow(dead_code)]
pub fn test_modules() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register(
        TEST_MODULE,
        BehaviorModule::new().with_type(
            "Test.Hooks",
            BehaviorType::new()
                .with_method("Increment", increment_age)
                .with_method("Spawn", spawn_origin)
                .with_method("Fail", always_fails)
                .with_method("Panic", always_panics)
                .with_method("Unknown", touch_unknown)
                .with_method("KeepHandle", write_through_kept_handle),
        ),
    );
    registry
}

#[allow(dead_code)]
pub fn test_hook(method: &str) -> String {
    format!("{TEST_MODULE};Test.Hooks;{method}")
}

#[allow(dead_code)]
pub struct WorldBuilder {
    config: WorldConfig,
    modules: ModuleRegistry,
    mode: SimulationMode,
    cells: Vec<(Position, Vec<(String, f32)>)>,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let config = WorldConfig {
            name: "test".to_string(),
            characteristics: vec!["age".to_string()],
            ..WorldConfig::default()
        };
        Self {
            config,
            modules: test_modules(),
            mode: SimulationMode::Synchronous,
            cells: Vec::new(),
        }
    }

    pub fn with_characteristics(mut self, names: &[&str]) -> Self {
        self.config.characteristics = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_mode(mut self, mode: SimulationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_modules(mut self, modules: ModuleRegistry) -> Self {
        self.modules = modules;
        self
    }

    pub fn with_hook(self, phase: Phase, reference: &str) -> Self {
        self.with_hook_params(phase, reference, &[])
    }

    pub fn with_hook_params(mut self, phase: Phase, reference: &str, params: &[&str]) -> Self {
        let method = MethodConfig::new(reference).with_parameters(params.iter().copied());
        self.config.set_method(phase, Some(method));
        self
    }

    /// Places a cell before the simulation starts.
    pub fn with_cell(mut self, x: i32, y: i32, z: i32, values: &[(&str, f32)]) -> Self {
        let values = values.iter().map(|(n, v)| (n.to_string(), *v)).collect();
        self.cells.push((Position::new(x, y, z), values));
        self
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn build(self) -> SimulationEngine {
        let (engine, failures) = SimulationEngine::from_config(&self.config, &self.modules)
            .expect("Failed to create engine in test builder");
        assert!(failures.is_empty(), "Unexpected binding failures: {failures:?}");
        let mut engine = engine.with_mode(self.mode);

        let store = engine.store_mut();
        store.begin_initialization();
        for (position, values) in self.cells {
            let cell = store
                .add_new_cell(position)
                .expect("Duplicate cell in test builder");
            for (name, value) in values {
                cell.set_by_name(&name, value).expect("Failed to seed cell");
            }
        }
        store.end_cycle();
        engine
    }
}

/// Writes `content` to a fresh file under the system temp directory.
#[allow(dead_code)]
pub fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("cellarium-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write temp file");
    path
}
