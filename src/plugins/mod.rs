//! Behavior modules compiled into the binary.
//!
//! World configurations reach these through the ordinary
//! `<module>;<type>;<method>` references, for example
//! `cellarium_growth;Growth.Colony;Update`.

pub mod growth;
pub mod seed;

use cellarium_core::ModuleRegistry;

/// Registry holding every built-in module.
#[must_use]
pub fn builtin_modules() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry
        .register(seed::MODULE_PATH, seed::module())
        .register(growth::MODULE_PATH, growth::module());
    registry
}

/// Reads `parameters[index]` as a number, falling back to `default` when the
/// entry is missing or not numeric.
pub(crate) fn numeric_parameter(parameters: &[String], index: usize, default: f32) -> f32 {
    parameters
        .get(index)
        .and_then(|raw| raw.trim().parse::<f32>().ok())
        .unwrap_or(default)
}
