//! Ordered, case-insensitive registry of characteristic names.
//!
//! The registry is built once from configuration and then shared read-only
//! (behind an `Arc`) by the cell store and every cell it creates. There is no
//! way to mutate it after construction; a second configuration load builds a
//! fresh registry for the new world rather than touching the old one.

use crate::error::{Result, SimError};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacteristicRegistry {
    /// Names as configured, in index order.
    names: Vec<String>,
    /// Lower-cased name -> index.
    index_by_name: HashMap<String, usize>,
}

impl CharacteristicRegistry {
    /// Builds the registry, assigning indices `0..n` in input order.
    ///
    /// Names are trimmed; lookups ignore case. Fails with
    /// [`SimError::DuplicateName`] when two names collide ignoring case and
    /// with [`SimError::EmptyName`] for blank entries.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();
        for (i, raw) in names.into_iter().enumerate() {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                return Err(SimError::EmptyName(i));
            }
            let key = name.to_lowercase();
            if registry.index_by_name.contains_key(&key) {
                return Err(SimError::DuplicateName(name.to_string()));
            }
            registry.index_by_name.insert(key, registry.names.len());
            registry.names.push(name.to_string());
        }
        Ok(registry)
    }

    /// Number of registered characteristics.
    #[must_use]
    pub fn count(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of `name`, or [`SimError::UnknownCharacteristic`].
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.try_index_of(name).ok_or_else(|| SimError::unknown(name))
    }

    #[must_use]
    pub fn try_index_of(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(&name.trim().to_lowercase()).copied()
    }

    /// Configured spelling of the characteristic at `index`.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
