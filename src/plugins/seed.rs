//! Four-cell demo world.
//!
//! Expects the characteristics `type`, `age` and `status`.

use cellarium_core::{BehaviorModule, BehaviorType, SimulationApi};

pub const MODULE_PATH: &str = "cellarium_seed";
pub const TYPE_NAME: &str = "Seed.Demo";

/// Corner cells placed by `Initialization`: (x, y, type, age, status).
const CORNERS: [(i32, i32, f32, f32, f32); 4] = [
    (1, 1, 1.0, 1.0, 1.0),
    (1, -1, 1.0, 10.0, 2.0),
    (-1, 1, 2.0, 100.0, 1.0),
    (-1, -1, 2.0, 1000.0, 2.0),
];

#[must_use]
pub fn module() -> BehaviorModule {
    BehaviorModule::new().with_type(
        TYPE_NAME,
        BehaviorType::new()
            .with_method("Initialization", initialization)
            .with_method("Update", update),
    )
}

fn initialization(api: &mut SimulationApi<'_>) -> anyhow::Result<()> {
    for (x, y, kind, age, status) in CORNERS {
        let Some(cell) = api.add_cell(x, y, 0) else {
            continue;
        };
        cell.set_by_name("type", kind)?;
        cell.set_by_name("age", age)?;
        cell.set_by_name("status", status)?;
        tracing::debug!(position = %cell.position(), kind, age, status, "Seed cell added");
    }
    Ok(())
}

/// Ages the cell at (-1, -1, 0) only.
fn update(api: &mut SimulationApi<'_>) -> anyhow::Result<()> {
    if let Some(cell) = api.try_get_cell(-1, -1, 0) {
        let age = cell.update_by_name("age", |age| age + 1.0)?;
        tracing::debug!(position = %cell.position(), age, "Seed cell aged");
    }
    Ok(())
}
