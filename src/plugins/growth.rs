//! Colony growth model.
//!
//! Expects the characteristics `age` and `size`. Phase parameters:
//!
//! - `initialization`: path of a seed file, one `x,y,z,age,size` line per
//!   cell, `#` starts a comment line
//! - `update`: age increment (default 1), size increment (default 0)
//! - `selection`: age threshold above which cells are removed (default 35)
//! - `reproduction`: size threshold above which cells split (default 10)

use super::numeric_parameter;
use anyhow::{bail, Context};
use cellarium_core::{BehaviorModule, BehaviorType, SimulationApi};
use cellarium_data::Position;

pub const MODULE_PATH: &str = "cellarium_growth";
pub const TYPE_NAME: &str = "Growth.Colony";

const DEFAULT_AGE_STEP: f32 = 1.0;
const DEFAULT_SIZE_STEP: f32 = 0.0;
const DEFAULT_AGE_LIMIT: f32 = 35.0;
const DEFAULT_SPLIT_SIZE: f32 = 10.0;

/// Planar neighbours in the order a child position is tried.
const NEIGHBOURS: [(i32, i32); 8] = [
    (1, 0),
    (0, 1),
    (-1, 0),
    (0, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
    (1, -1),
];

#[must_use]
pub fn module() -> BehaviorModule {
    BehaviorModule::new().with_type(
        TYPE_NAME,
        BehaviorType::new()
            .with_method("Initialization", initialization)
            .with_method("Update", update)
            .with_method("Selection", selection)
            .with_method("Reproduction", reproduction),
    )
}

/// One parsed seed line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedCell {
    pub position: Position,
    pub age: f32,
    pub size: f32,
}

/// Parses seed file content. Blank lines and `#` comments are skipped.
pub fn parse_seed(text: &str) -> anyhow::Result<Vec<SeedCell>> {
    let mut cells = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 5 {
            bail!(
                "seed line {}: expected 5 comma-separated fields, found {}",
                number + 1,
                fields.len()
            );
        }
        let int = |i: usize| -> anyhow::Result<i32> {
            fields[i]
                .parse()
                .with_context(|| format!("seed line {}: bad integer '{}'", number + 1, fields[i]))
        };
        cells.push(SeedCell {
            position: Position::new(int(0)?, int(1)?, int(2)?),
            age: int(3)? as f32,
            size: int(4)? as f32,
        });
    }
    Ok(cells)
}

fn initialization(api: &mut SimulationApi<'_>) -> anyhow::Result<()> {
    let Some(path) = api.parameters("initialization").first().cloned() else {
        bail!("initialization needs the seed file path as its first parameter");
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading seed file '{path}'"))?;
    let seeds = parse_seed(&text)?;
    tracing::debug!(path = %path, cells = seeds.len(), "Seed file loaded");

    for seed in seeds {
        let Position { x, y, z } = seed.position;
        if let Some(cell) = api.add_cell(x, y, z) {
            cell.set_by_name("age", seed.age)?;
            cell.set_by_name("size", seed.size)?;
        }
    }
    Ok(())
}

fn update(api: &mut SimulationApi<'_>) -> anyhow::Result<()> {
    let params = api.parameters("update");
    let age_step = numeric_parameter(params, 0, DEFAULT_AGE_STEP);
    let size_step = numeric_parameter(params, 1, DEFAULT_SIZE_STEP);

    for cell in api.all_cells() {
        cell.update_by_name("age", |age| age + age_step)?;
        cell.update_by_name("size", |size| size + size_step)?;
    }
    Ok(())
}

fn selection(api: &mut SimulationApi<'_>) -> anyhow::Result<()> {
    let limit = numeric_parameter(api.parameters("selection"), 0, DEFAULT_AGE_LIMIT);

    let mut expired = Vec::new();
    for cell in api.all_cells() {
        if cell.get_by_name("age")? > limit {
            expired.push(cell.position());
        }
    }
    for Position { x, y, z } in expired {
        api.remove_cell(x, y, z);
        tracing::debug!(x, y, z, "Cell removed");
    }
    Ok(())
}

/// Splits every cell larger than the threshold: the child takes the first
/// free neighbour with age 1 and half the size, and the parent keeps the
/// other half.
fn reproduction(api: &mut SimulationApi<'_>) -> anyhow::Result<()> {
    let limit = numeric_parameter(api.parameters("reproduction"), 0, DEFAULT_SPLIT_SIZE);

    let mut parents = Vec::new();
    for cell in api.all_cells() {
        if cell.get_by_name("size")? > limit {
            parents.push(cell);
        }
    }

    for parent in parents {
        let half = (parent.get_by_name("size")? / 2.0).floor();
        let origin = parent.position();
        for (dx, dy) in NEIGHBOURS {
            let Some(Position { x, y, z }) = origin.checked_offset(dx, dy, 0) else {
                continue;
            };
            if api.try_get_cell(x, y, z).is_some() {
                continue;
            }
            if let Some(child) = api.add_cell(x, y, z) {
                child.set_by_name("age", 1.0)?;
                child.set_by_name("size", half)?;
                tracing::debug!(parent = %origin, child = %child.position(), size = half, "Cell split");
                break;
            }
        }
        parent.set_by_name("size", half)?;
    }
    Ok(())
}
