mod common;

use cellarium_core::Phase;
use cellarium_io::{load_world_config, ConfigError};
use cellarium_lib::app::App;
use cellarium_lib::plugins::builtin_modules;
use common::temp_file;

const SEED_WORLD: &str = r#"{
    "Name": "Demo",
    "Space": 2,
    "Dimensions": [10, 10],
    "Characteristics": ["type", "age", "status"],
    "Initialization": { "Method": "cellarium_seed;Seed.Demo;Initialization", "Parameters": [] },
    "Update": { "Method": "cellarium_seed;Seed.Demo;Update" },
    "Evaluation": { "Method": "cellarium_seed;Seed.Demo;Evaluate" },
    "Comment": "unknown properties are ignored"
}"#;

#[test]
fn test_load_world_config_from_file() {
    let path = temp_file("seed_world.json", SEED_WORLD);
    let config = load_world_config(&path).unwrap();
    assert_eq!(config.name, "Demo");
    assert_eq!(config.dimensions, [10, 10]);
    assert_eq!(config.characteristics.len(), 3);
    assert!(config.method(Phase::Reproduction).is_none());
    assert_eq!(config.fingerprint(), load_world_config(&path).unwrap().fingerprint());
}

#[test]
fn test_app_binds_what_resolves() {
    let path = temp_file("seed_world_app.json", SEED_WORLD);
    let mut app = App::new(builtin_modules());
    let failures = app.load_configuration(&path).unwrap();

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].phase, Phase::Evaluation);
    let engine = app.engine().unwrap();
    assert_eq!(engine.info().name, "Demo");
    assert!(engine.is_bound(Phase::Update));
}

#[test]
fn test_syntax_error_reports_location() {
    let path = temp_file("broken.json", "{\n  \"name\": \"x\"\n  \"space\": 1\n}\n");
    let err = load_world_config(&path).unwrap_err();
    assert_eq!(err.location().map(|(line, _)| line), Some(3));
    let text = err.to_string();
    assert!(text.contains("Line: 3"), "{text}");
    assert!(text.contains("  \"space\": 1\n"), "{text}");
    assert!(text.trim_end().ends_with('^'), "{text}");
}

#[test]
fn test_missing_file_leaves_shell_without_world() {
    let mut app = App::new(builtin_modules());
    let err = app
        .load_configuration(std::path::Path::new("/no/such/world.json"))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Missing { .. })
    ));
    assert!(!app.has_world());
}

#[test]
fn test_duplicate_characteristics_rejected() {
    let path = temp_file(
        "dupes.json",
        r#"{ "name": "d", "space": 1, "dimensions": [2], "characteristics": ["size", "Size"] }"#,
    );
    assert!(matches!(
        load_world_config(&path),
        Err(ConfigError::Registry(_))
    ));
}

#[test]
fn test_hand_edited_file_loads() {
    let path = temp_file(
        "hand_edited.json",
        r#"{
    // lab notebook copy
    "WorldName": "ignored",
    "NAME": "Notebook",
    "space": "2",
    "Dimensions": ["8", 8,],
    "CHARACTERISTICS": ["age", "size",], /* order matters */
    "update": { "METHOD": "cellarium_growth;Growth.Colony;Update", "parameters": ["1"], },
}"#,
    );
    let config = load_world_config(&path).unwrap();
    assert_eq!(config.name, "Notebook");
    assert_eq!(config.space, 2);
    assert_eq!(config.dimensions, [8, 8]);
    assert_eq!(config.characteristics, ["age", "size"]);
    assert_eq!(config.method(Phase::Update).unwrap().parameters, ["1"]);
}

#[test]
fn test_missing_dimensions_is_a_parse_error() {
    let path = temp_file(
        "no_dims.json",
        r#"{ "name": "n", "space": 2, "characteristics": ["age"] }"#,
    );
    let err = load_world_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert_eq!(err.location(), None);
    assert!(err.to_string().contains("dimensions"));
}
