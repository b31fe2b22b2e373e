mod common;

use cellarium_core::{
    CellStore, CharacteristicRegistry, PhaseParameters, SimError, SimulationApi, SimulationMode,
};
use cellarium_data::Position;
use common::increment_age;
use std::sync::Arc;

const ORIGIN: Position = Position::new(0, 0, 0);

fn store_with_age(mode: SimulationMode, age: f32) -> CellStore {
    let registry = Arc::new(CharacteristicRegistry::new(["age"]).unwrap());
    let mut store = CellStore::new(registry).with_mode(mode);
    store.begin_initialization();
    store
        .add_new_cell(ORIGIN)
        .unwrap()
        .set_by_name("age", age)
        .unwrap();
    store.end_cycle();
    store
}

fn age_at(store: &CellStore, pos: Position) -> f32 {
    store.try_get_cell(pos).unwrap().get_by_name("age").unwrap()
}

#[test]
fn test_synchronous_update_visible_after_end_cycle() {
    let mut store = store_with_age(SimulationMode::Synchronous, 5.0);
    let params = PhaseParameters::default();

    store.begin_cycle();
    increment_age(&mut SimulationApi::new(&mut store, &params)).unwrap();
    assert_eq!(age_at(&store, ORIGIN), 5.0);

    store.end_cycle();
    assert_eq!(age_at(&store, ORIGIN), 6.0);
}

#[test]
fn test_asynchronous_update_visible_immediately() {
    let mut store = store_with_age(SimulationMode::Asynchronous, 5.0);
    let params = PhaseParameters::default();

    store.begin_cycle();
    increment_age(&mut SimulationApi::new(&mut store, &params)).unwrap();
    assert_eq!(age_at(&store, ORIGIN), 6.0);
    store.end_cycle();
    assert_eq!(age_at(&store, ORIGIN), 6.0);
}

#[test]
fn test_stale_handle_rejected_in_synchronous_mode() {
    let mut store = store_with_age(SimulationMode::Synchronous, 1.0);
    store.begin_cycle();
    let captured = store.try_get_cell(ORIGIN).unwrap();
    store.end_cycle();

    store.begin_cycle();
    let err = captured.set_by_name("age", 99.0).unwrap_err();
    assert!(matches!(err, SimError::WriteProtection { .. }));
    store.end_cycle();
    assert_eq!(age_at(&store, ORIGIN), 1.0);
}

#[test]
fn test_stale_handle_accepted_in_asynchronous_mode() {
    let mut store = store_with_age(SimulationMode::Asynchronous, 1.0);
    store.begin_cycle();
    let captured = store.try_get_cell(ORIGIN).unwrap();
    store.end_cycle();

    store.begin_cycle();
    captured.set_by_name("age", 99.0).unwrap();
    store.end_cycle();
    assert_eq!(age_at(&store, ORIGIN), 99.0);
}

#[test]
fn test_read_side_cell_is_protected() {
    let mut store = store_with_age(SimulationMode::Synchronous, 1.0);
    store.begin_cycle();
    let handle = store.try_get_cell(ORIGIN).unwrap();
    // The read-view cell belongs to the previous generation.
    assert!(!handle.cell().is_writable());
    assert_eq!(handle.cell().generation(), 0);
    assert!(handle.write_cell().is_some_and(|c| c.is_writable()));
    handle.set_by_name("age", 3.0).unwrap();
    assert_eq!(handle.cell().get_by_name("age").unwrap(), 1.0);
    store.end_cycle();
}

#[test]
fn test_bypass_allows_stale_writes() {
    let mut store = store_with_age(SimulationMode::Synchronous, 1.0);
    store.begin_cycle();
    let captured = store.try_get_cell(ORIGIN).unwrap();
    store.end_cycle();

    store.begin_cycle();
    store.bypass_write_guard(true);
    assert!(captured.set_by_name("age", 7.0).is_ok());
    store.bypass_write_guard(false);
    assert!(captured.set_by_name("age", 8.0).is_err());
    store.end_cycle();
}

#[test]
fn test_removed_cell_handle_is_detached() {
    let mut store = store_with_age(SimulationMode::Synchronous, 1.0);
    store.begin_cycle();
    assert!(store.remove_cell(ORIGIN));
    // Still readable from the cycle-start view.
    let handle = store.try_get_cell(ORIGIN).unwrap();
    assert_eq!(handle.get_by_name("age").unwrap(), 1.0);
    assert_eq!(
        handle.set_by_name("age", 2.0),
        Err(SimError::Detached(ORIGIN))
    );
    store.end_cycle();
    assert!(store.try_get_cell(ORIGIN).is_none());
}

#[test]
fn test_failed_write_leaves_cell_unchanged() {
    let mut store = store_with_age(SimulationMode::Synchronous, 4.0);
    store.begin_cycle();
    let handle = store.try_get_cell(ORIGIN).unwrap();
    assert!(matches!(
        handle.set(3, 1.0),
        Err(SimError::IndexOutOfRange { index: 3, count: 1 })
    ));
    store.end_cycle();
    assert_eq!(age_at(&store, ORIGIN), 4.0);
}
