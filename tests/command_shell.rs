mod common;

use cellarium_lib::app::{App, Command, StatusCode, View};
use cellarium_lib::plugins::builtin_modules;
use common::temp_file;

fn run_script(app: &mut App, script: &str) -> String {
    let mut view = View::new(Vec::new());
    app.run(script.as_bytes(), &mut view).unwrap();
    String::from_utf8(view.into_inner()).unwrap()
}

fn seeded_app() -> App {
    let path = temp_file(
        "shell_world.json",
        r#"{
            "name": "Shell",
            "space": 2,
            "dimensions": [4, 4],
            "characteristics": ["type", "age", "status"],
            "initialization": { "method": "cellarium_seed;Seed.Demo;Initialization" },
            "update": { "method": "cellarium_seed;Seed.Demo;Update" }
        }"#,
    );
    let mut app = App::new(builtin_modules());
    app.load_configuration(&path).unwrap();
    app
}

#[test]
fn test_session_runs_cycles_and_exits() {
    let mut app = seeded_app();
    let out = run_script(&mut app, "TESTSIM 2\nts 1\nE\nTS 5\n");

    assert!(!app.running);
    assert!(out.contains("[Shell] cycle 0: 4 cell(s)"));
    assert!(out.contains("[Shell] cycle 3: 4 cell(s)"));
    assert!(out.contains("age=1003"));
    assert!(!out.contains("cycle 4"));
}

#[test]
fn test_misuse_reports_and_continues() {
    let mut app = seeded_app();
    let out = run_script(&mut app, "jump\nTS\nTS abc\n\nHELP\nX\n");

    assert!(out.contains("Unknown command. 'jump'"));
    assert!(out.contains("invalid number of arguments"));
    assert!(out.contains("invalid argument value"));
    assert!(out.contains("Usage: TESTSIM <cycle-count>"));
    assert!(out.contains("ABOUT (AB)"));
    assert_eq!(app.engine().unwrap().cycle(), 0);
}

#[test]
fn test_end_of_input_ends_session() {
    let mut app = App::new(builtin_modules());
    let out = run_script(&mut app, "about\n");
    assert!(app.running);
    assert!(out.contains("Cellarium"));
}

#[test]
fn test_execute_returns_status() {
    let mut app = App::new(builtin_modules());
    let mut view = View::new(Vec::new());
    let status = app
        .execute(&Command::parse("testsim 1").unwrap(), &mut view)
        .unwrap();
    assert_eq!(status, StatusCode::NoWorld);
}
