//! Module registration and lookup errors

use thiserror::Error;

/// Errors raised by the module registration handshake and typed lookups.
///
/// None of these abort a frame. The operation that detects one logs it at
/// error level and hands it back to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    /// A module of the same concrete type is already registered
    #[error("cannot register {module} on {owner}: a module of that type is already registered")]
    RegistrationConflict {
        /// Concrete type of the rejected module
        module: &'static str,
        /// Owner of the registry
        owner: String,
    },

    /// Removal requested for a module that is not registered
    #[error("cannot unregister {module} from {owner}: it is not registered there")]
    UnregisteredRemoval {
        /// Concrete type of the module
        module: &'static str,
        /// Owner of the registry
        owner: String,
    },

    /// The module has no owning registry
    #[error("{module} has no owning registry")]
    NoOwnerResolved {
        /// Concrete type of the module
        module: &'static str,
    },

    /// A required sibling module is not registered
    #[error("{module} requires {required} but none is registered on {owner}")]
    DependencyNotFound {
        /// Concrete type of the requesting module
        module: &'static str,
        /// Type that was requested
        required: &'static str,
        /// Owner of the registry
        owner: String,
    },

    /// The module is mutably borrowed elsewhere (usually its own hook)
    #[error("{module} is busy and cannot change its registration right now")]
    ModuleBusy {
        /// Concrete type of the module
        module: &'static str,
    },
}

impl ModuleError {
    /// Log this error at error level and hand it back.
    pub(crate) fn report(self) -> Self {
        log::error!("{}", self);
        self
    }
}
