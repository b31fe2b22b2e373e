//! Cell state and the generation-stamp write guard.
//!
//! Every cell carries a stamp naming the write generation it was created (or
//! cloned) in. The owning store shares a [`WriteGuard`] with its cells; each
//! mutating accessor compares the cell's stamp against the guard's active
//! generation before touching anything. A behavior module that keeps a
//! handle from an earlier cycle and writes through it gets
//! [`SimError::WriteProtection`] instead of silently corrupting the read view.

use crate::characteristics::CharacteristicRegistry;
use crate::error::{Result, SimError};
use cellarium_data::CellColor;
use std::cell::{Cell as Slot, RefCell};
use std::rc::Rc;
use std::sync::Arc;

/// Shared ownership of a cell between the store views and handles.
pub type SharedCell = Rc<Cell>;

/// Active write generation plus the switches that disable the check.
///
/// This is an epoch check, not a lock. The kernel is single-threaded.
#[derive(Debug, Default)]
pub struct WriteGuard {
    active: Slot<u64>,
    /// Set while the store runs in asynchronous mode.
    suspended: Slot<bool>,
    /// Explicit test-only override.
    bypassed: Slot<bool>,
}

impl WriteGuard {
    #[must_use]
    pub fn new(generation: u64) -> Self {
        Self {
            active: Slot::new(generation),
            ..Default::default()
        }
    }

    /// Generation whose cells may currently be written.
    #[must_use]
    pub fn active(&self) -> u64 {
        self.active.get()
    }

    pub(crate) fn advance(&self) -> u64 {
        let next = self.active.get() + 1;
        self.active.set(next);
        next
    }

    pub(crate) fn set_suspended(&self, suspended: bool) {
        self.suspended.set(suspended);
    }

    pub(crate) fn set_bypassed(&self, bypassed: bool) {
        self.bypassed.set(bypassed);
    }

    /// Whether stamps are compared at all.
    #[must_use]
    pub fn is_enforced(&self) -> bool {
        !self.suspended.get() && !self.bypassed.get()
    }

    pub fn check(&self, stamp: u64) -> Result<()> {
        let active = self.active.get();
        if self.is_enforced() && stamp != active {
            return Err(SimError::WriteProtection { stamp, active });
        }
        Ok(())
    }
}

/// A fixed-length vector of characteristic values plus a display color.
///
/// Values use interior mutability so that handles can hold shared references
/// while the store keeps ownership of the map entries.
#[derive(Debug)]
pub struct Cell {
    values: RefCell<Vec<f32>>,
    color: Slot<CellColor>,
    stamp: u64,
    registry: Arc<CharacteristicRegistry>,
    guard: Rc<WriteGuard>,
}

impl Cell {
    /// Creates a zeroed cell stamped with the guard's active generation.
    #[must_use]
    pub fn new(registry: Arc<CharacteristicRegistry>, guard: Rc<WriteGuard>) -> Self {
        Self {
            values: RefCell::new(vec![0.0; registry.count()]),
            color: Slot::new(CellColor::BLACK),
            stamp: guard.active(),
            registry,
            guard,
        }
    }

    /// Number of characteristics, always the registry count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write generation this cell belongs to.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.stamp
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<CharacteristicRegistry> {
        &self.registry
    }

    /// Whether this cell was built for the store owning `registry` and `guard`.
    pub(crate) fn belongs_to(
        &self,
        registry: &Arc<CharacteristicRegistry>,
        guard: &Rc<WriteGuard>,
    ) -> bool {
        Arc::ptr_eq(&self.registry, registry) && Rc::ptr_eq(&self.guard, guard)
    }

    /// Whether a write would currently pass the guard.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.guard.check(self.stamp).is_ok()
    }

    pub fn get(&self, index: usize) -> Result<f32> {
        let values = self.values.borrow();
        values
            .get(index)
            .copied()
            .ok_or(SimError::IndexOutOfRange {
                index,
                count: values.len(),
            })
    }

    pub fn get_by_name(&self, name: &str) -> Result<f32> {
        self.get(self.registry.index_of(name)?)
    }

    pub fn set(&self, index: usize, value: f32) -> Result<()> {
        self.update(index, |_| value).map(|_| ())
    }

    pub fn set_by_name(&self, name: &str, value: f32) -> Result<()> {
        self.set(self.registry.index_of(name)?, value)
    }

    /// Read-modify-write of one characteristic; returns the new value.
    pub fn update<F>(&self, index: usize, f: F) -> Result<f32>
    where
        F: FnOnce(f32) -> f32,
    {
        self.guard.check(self.stamp)?;
        let mut values = self.values.borrow_mut();
        let count = values.len();
        let slot = values
            .get_mut(index)
            .ok_or(SimError::IndexOutOfRange { index, count })?;
        *slot = f(*slot);
        Ok(*slot)
    }

    pub fn update_by_name<F>(&self, name: &str, f: F) -> Result<f32>
    where
        F: FnOnce(f32) -> f32,
    {
        self.update(self.registry.index_of(name)?, f)
    }

    /// Copy of the characteristic vector.
    #[must_use]
    pub fn values(&self) -> Vec<f32> {
        self.values.borrow().clone()
    }

    #[must_use]
    pub fn color(&self) -> CellColor {
        self.color.get()
    }

    pub fn set_color(&self, color: CellColor) -> Result<()> {
        self.guard.check(self.stamp)?;
        self.color.set(color);
        Ok(())
    }

    pub fn set_rgb(&self, r: u8, g: u8, b: u8) -> Result<()> {
        self.set_color(CellColor::new(r, g, b))
    }

    pub fn set_red(&self, r: u8) -> Result<()> {
        self.set_color(self.color().with_red(r))
    }

    pub fn set_green(&self, g: u8) -> Result<()> {
        self.set_color(self.color().with_green(g))
    }

    pub fn set_blue(&self, b: u8) -> Result<()> {
        self.set_color(self.color().with_blue(b))
    }
}

/// Read-only borrow of a cell, handed out for the read side of a handle.
///
/// Writes go through [`CellHandle`](crate::handle::CellHandle), which routes
/// them to the write view.
#[derive(Debug, Clone, Copy)]
pub struct CellView<'a>(&'a Cell);

impl<'a> CellView<'a> {
    pub(crate) fn new(cell: &'a Cell) -> Self {
        Self(cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.0.generation()
    }

    /// Whether the underlying cell belongs to the active write generation.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.0.is_writable()
    }

    pub fn get(&self, index: usize) -> Result<f32> {
        self.0.get(index)
    }

    pub fn get_by_name(&self, name: &str) -> Result<f32> {
        self.0.get_by_name(name)
    }

    #[must_use]
    pub fn values(&self) -> Vec<f32> {
        self.0.values()
    }

    #[must_use]
    pub fn color(&self) -> CellColor {
        self.0.color()
    }
}

/// Deep copy of values and color.
///
/// The copy is stamped with the guard's *current* active generation, not the
/// source's stamp; this is what makes the synchronous-mode clone writable for
/// the cycle being built.
impl Clone for Cell {
    fn clone(&self) -> Self {
        Self {
            values: RefCell::new(self.values.borrow().clone()),
            color: Slot::new(self.color.get()),
            stamp: self.guard.active(),
            registry: Arc::clone(&self.registry),
            guard: Rc::clone(&self.guard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Arc<CharacteristicRegistry>, Rc<WriteGuard>) {
        let registry = Arc::new(CharacteristicRegistry::new(["age", "size"]).unwrap());
        (registry, Rc::new(WriteGuard::new(0)))
    }

    #[test]
    fn test_new_cell_is_zeroed_and_sized() {
        let (reg, guard) = setup();
        let cell = Cell::new(reg, guard);
        assert_eq!(cell.len(), 2);
        assert_eq!(cell.values(), vec![0.0, 0.0]);
        assert_eq!(cell.color(), CellColor::BLACK);
        assert_eq!(cell.generation(), 0);
    }

    #[test]
    fn test_access_by_index_and_name() {
        let (reg, guard) = setup();
        let cell = Cell::new(reg, guard);
        assert_eq!(cell.set(1, 4.5), Ok(()));
        cell.set_by_name("AGE", 2.0).unwrap();
        assert_eq!(cell.get_by_name("size").unwrap(), 4.5);
        assert_eq!(cell.get(0).unwrap(), 2.0);
        assert_eq!(cell.update_by_name("age", |a| a + 1.0).unwrap(), 3.0);
    }

    #[test]
    fn test_index_out_of_range() {
        let (reg, guard) = setup();
        let cell = Cell::new(reg, guard);
        assert_eq!(
            cell.set(2, 1.0),
            Err(SimError::IndexOutOfRange { index: 2, count: 2 })
        );
        assert!(matches!(
            cell.get_by_name("weight"),
            Err(SimError::UnknownCharacteristic(_))
        ));
    }

    #[test]
    fn test_stale_stamp_is_write_protected() {
        let (reg, guard) = setup();
        let cell = Cell::new(reg, Rc::clone(&guard));
        cell.set(0, 5.0).unwrap();
        guard.advance();

        assert_eq!(
            cell.set(0, 9.0),
            Err(SimError::WriteProtection { stamp: 0, active: 1 })
        );
        assert!(cell.set_rgb(1, 2, 3).is_err());
        assert_eq!(cell.get(0).unwrap(), 5.0);
        assert_eq!(cell.color(), CellColor::BLACK);
    }

    #[test]
    fn test_suspended_or_bypassed_guard_allows_writes() {
        let (reg, guard) = setup();
        let cell = Cell::new(reg, Rc::clone(&guard));
        guard.advance();
        guard.set_suspended(true);
        assert!(cell.set(0, 1.0).is_ok());
        guard.set_suspended(false);
        guard.set_bypassed(true);
        assert!(cell.set(0, 2.0).is_ok());
        guard.set_bypassed(false);
        assert!(!cell.is_writable());
    }

    #[test]
    fn test_clone_is_deep_and_restamped() {
        let (reg, guard) = setup();
        let cell = Cell::new(reg, Rc::clone(&guard));
        cell.set(0, 7.0).unwrap();
        cell.set_rgb(9, 8, 7).unwrap();
        guard.advance();

        let copy = cell.clone();
        assert_eq!(copy.generation(), 1);
        copy.set(0, 8.0).unwrap();
        assert_eq!(cell.get(0).unwrap(), 7.0);
        assert_eq!(copy.color(), CellColor::new(9, 8, 7));
    }

    #[test]
    fn test_view_reads_through() {
        let (reg, guard) = setup();
        let cell = Cell::new(reg, guard);
        cell.set(0, 3.0).unwrap();
        let view = CellView::new(&cell);
        assert_eq!(view.get_by_name("age").unwrap(), 3.0);
        assert_eq!(view.values(), cell.values());
        assert!(view.is_writable());
    }

    #[test]
    fn test_color_components() {
        let (reg, guard) = setup();
        let cell = Cell::new(reg, guard);
        cell.set_red(200).unwrap();
        cell.set_blue(5).unwrap();
        assert_eq!(cell.color(), CellColor::new(200, 0, 5));
    }
}
