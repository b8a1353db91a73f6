//! Behaviour modules and their per-actor registry
//!
//! An actor owns a [`Registry`]. Modules register themselves with it when the
//! host activates them and unregister when deactivated. Once registered they
//! receive the four lifecycle passes and can look up siblings by exact type
//! through [`Module::require`].

mod activation;
mod data;
mod error;
mod lifecycle;
mod link;
mod registry;

#[cfg(test)]
mod tests;

pub use activation::{Activation, ResolveOwner};
pub use data::{load_data_asset, DataModule, DataSlot};
pub use error::ModuleError;
pub use lifecycle::{module_handle, Module, ModuleHandle, ModuleType};
pub use link::ModuleLink;
pub use registry::{DispatchPass, Owner, Registry};
