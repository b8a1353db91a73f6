//! Data-bearing modules
//!
//! Some modules are tuned by an external, shared configuration object (a
//! fuel tank's capacity, a weapon's fire rate). The module keeps a shared
//! reference to it and never copies it.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use serde::de::DeserializeOwned;

use super::{Module, Owner};
use crate::config::{self, ConfigError};

/// Holds at most one shared reference to an external data object
pub struct DataSlot<D: ?Sized> {
    data: Option<Rc<D>>,
}

impl<D: ?Sized> DataSlot<D> {
    /// Create an empty slot
    pub fn new() -> Self {
        Self { data: None }
    }

    /// Create a slot already holding `data`
    pub fn with(data: Rc<D>) -> Self {
        Self { data: Some(data) }
    }

    /// Replace the held data, returning the previous reference
    pub fn set(&mut self, data: Rc<D>) -> Option<Rc<D>> {
        self.data.replace(data)
    }

    /// Currently held data
    pub fn get(&self) -> Option<&Rc<D>> {
        self.data.as_ref()
    }

    /// Release the held data
    pub fn clear(&mut self) -> Option<Rc<D>> {
        self.data.take()
    }

    /// True when data is held
    pub fn is_set(&self) -> bool {
        self.data.is_some()
    }
}

impl<D: ?Sized> Default for DataSlot<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ?Sized + fmt::Debug> fmt::Debug for DataSlot<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DataSlot").field(&self.data).finish()
    }
}

/// A module that carries an external data object
pub trait DataModule<O: Owner>: Module<O> {
    /// Type of the external data
    type Data: ?Sized + 'static;

    /// Slot holding the data reference
    fn data_slot(&self) -> &DataSlot<Self::Data>;

    /// Mutable slot holding the data reference
    fn data_slot_mut(&mut self) -> &mut DataSlot<Self::Data>;

    /// Replace the data reference
    fn set_data(&mut self, data: Rc<Self::Data>) {
        self.data_slot_mut().set(data);
    }

    /// Current data reference
    fn data(&self) -> Option<&Rc<Self::Data>> {
        self.data_slot().get()
    }

    /// Drop the data reference
    fn clear_data(&mut self) {
        self.data_slot_mut().clear();
    }
}

/// Load a data object from a `.toml` or `.ron` file, ready to be shared
/// between modules
pub fn load_data_asset<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Rc<D>, ConfigError> {
    let data = config::load_file(path.as_ref())?;
    log::debug!("Loaded data asset {}", path.as_ref().display());
    Ok(Rc::new(data))
}
