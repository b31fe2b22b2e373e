/// Asserts the number of cells in the engine's read view.
#[macro_export]
macro_rules! assert_population {
    ($engine:expr, $count:expr) => {
        assert_eq!(
            $engine.store().len(),
            $count,
            "Population count mismatch"
        );
    };
}

/// Asserts a characteristic value of the cell at a position.
#[macro_export]
macro_rules! assert_characteristic {
    ($engine:expr, ($x:expr, $y:expr, $z:expr), $name:expr, $expected:expr) => {
        let cell = $engine
            .store()
            .try_get_cell(cellarium_data::Position::new($x, $y, $z))
            .expect("Cell not found in store");
        let actual = cell
            .get_by_name($name)
            .expect("Characteristic not registered");
        assert!(
            (actual - $expected).abs() < 1e-6,
            "Characteristic {} at ({}, {}, {}) is {}, expected {}",
            $name,
            $x,
            $y,
            $z,
            actual,
            $expected
        );
    };
}
