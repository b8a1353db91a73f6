//! Module-side back-reference to the owning registry

use std::fmt;
use std::rc::{Rc, Weak};

use super::{Module, ModuleError, ModuleHandle, Owner, Registry};
use crate::scene::SceneNode;

/// Relation between a module and the registry it resolved as its owner.
///
/// Holds weak references only: the registry does not outlive its owner
/// because a module still points at it.
pub struct ModuleLink<O: Owner> {
    registry: Option<Weak<Registry<O>>>,
    host: Option<Weak<SceneNode<O>>>,
    enabled: bool,
}

impl<O: Owner> ModuleLink<O> {
    /// Create an unbound, enabled link
    pub fn new() -> Self {
        Self {
            registry: None,
            host: None,
            enabled: true,
        }
    }

    /// Resolved owning registry, if still alive.
    ///
    /// Resolution is not registration: the registry may have dropped the
    /// module since. Ask the registry ([`Registry::holds`]) or the handle
    /// ([`Activation::is_active`](super::Activation::is_active)) for that.
    pub fn registry(&self) -> Option<Rc<Registry<O>>> {
        self.registry.as_ref().and_then(Weak::upgrade)
    }

    /// Scene node the module was activated on
    pub fn host(&self) -> Option<Rc<SceneNode<O>>> {
        self.host.as_ref().and_then(Weak::upgrade)
    }

    /// Dispatch filter flag
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the dispatch filter flag
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the hosting hierarchy is active.
    ///
    /// Modules activated directly against a registry have no host node and
    /// count as active. A host node that has been dropped counts as inactive.
    pub fn is_hierarchy_active(&self) -> bool {
        match &self.host {
            None => true,
            Some(host) => host
                .upgrade()
                .map_or(false, |node| node.is_active_in_hierarchy()),
        }
    }

    /// Resolve the sibling module of exact type `T` on behalf of `requester`
    pub fn require<T: Module<O>>(
        &self,
        requester: &'static str,
    ) -> Result<ModuleHandle<T>, ModuleError> {
        let registry = self
            .registry()
            .ok_or_else(|| ModuleError::NoOwnerResolved { module: requester }.report())?;

        registry.try_get::<T>().ok_or_else(|| {
            ModuleError::DependencyNotFound {
                module: requester,
                required: std::any::type_name::<T>(),
                owner: registry.owner_label(),
            }
            .report()
        })
    }

    pub(crate) fn bind(&mut self, registry: &Rc<Registry<O>>, host: Option<&Rc<SceneNode<O>>>) {
        self.registry = Some(Rc::downgrade(registry));
        if let Some(host) = host {
            self.host = Some(Rc::downgrade(host));
        }
    }

    /// Drop the registry back-reference. The host node is kept so a later
    /// activation through a different resolver still knows its hierarchy.
    pub(crate) fn unbind(&mut self) {
        self.registry = None;
    }
}

impl<O: Owner> Default for ModuleLink<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Owner> fmt::Debug for ModuleLink<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleLink")
            .field("owner", &self.registry().map(|r| r.owner_label()))
            .field("host", &self.host().map(|n| n.path()))
            .field("enabled", &self.enabled)
            .finish()
    }
}
