//! Self-registration handshake between a module and its owner
//!
//! The host signals activation and deactivation on a module handle. On
//! activation the module resolves its owner through a [`ResolveOwner`]
//! capability and registers itself; on deactivation it unregisters and
//! forgets the owner.

use std::any::type_name;
use std::rc::Rc;

use super::{Module, ModuleError, ModuleHandle, Owner, Registry};
use crate::scene::SceneNode;

/// Locates the registry a module should register with
pub trait ResolveOwner<O: Owner> {
    /// Nearest registry, if any
    fn resolve_owner(&self) -> Option<Rc<Registry<O>>>;

    /// Scene node hosting the module, used for hierarchy activity
    fn host_node(&self) -> Option<Rc<SceneNode<O>>> {
        None
    }
}

/// An explicit registry is its own owner
impl<O: Owner> ResolveOwner<O> for Rc<Registry<O>> {
    fn resolve_owner(&self) -> Option<Rc<Registry<O>>> {
        Some(Rc::clone(self))
    }
}

/// A scene node resolves to the nearest registry-bearing node at or above it
impl<O: Owner> ResolveOwner<O> for Rc<SceneNode<O>> {
    fn resolve_owner(&self) -> Option<Rc<Registry<O>>> {
        self.find_owner()
    }

    fn host_node(&self) -> Option<Rc<SceneNode<O>>> {
        Some(Rc::clone(self))
    }
}

/// Activation signals for module handles
pub trait Activation<O: Owner> {
    /// Resolve the owner if needed and register with it.
    ///
    /// Activating a module that is already registered does nothing.
    fn activate<R>(&self, resolver: &R) -> Result<(), ModuleError>
    where
        R: ResolveOwner<O> + ?Sized;

    /// Unregister from the resolved owner and forget it
    fn deactivate(&self) -> Result<(), ModuleError>;

    /// Whether the resolved owner currently holds this instance.
    ///
    /// False while the module is mutably borrowed.
    fn is_active(&self) -> bool;
}

impl<O, M> Activation<O> for ModuleHandle<M>
where
    O: Owner,
    M: Module<O>,
{
    fn activate<R>(&self, resolver: &R) -> Result<(), ModuleError>
    where
        R: ResolveOwner<O> + ?Sized,
    {
        let name = type_name::<M>();
        let mut module = self
            .try_borrow_mut()
            .map_err(|_| ModuleError::ModuleBusy { module: name }.report())?;

        let resolved = module.link().registry();
        if resolved.as_ref().map_or(false, |registry| registry.holds(self)) {
            log::debug!("{} is already active", name);
            return Ok(());
        }

        let registry = match resolved {
            Some(registry) => registry,
            None => resolver
                .resolve_owner()
                .ok_or_else(|| ModuleError::NoOwnerResolved { module: name }.report())?,
        };
        let host = resolver.host_node();
        module.link_mut().bind(&registry, host.as_ref());

        // Registered straight through Registry::add, only the back-reference was missing
        if registry.holds(self) {
            log::debug!("{} already registered on {}, now bound", name, registry.owner());
            return Ok(());
        }

        // Registry::add only clones the handle, the borrow above stays valid
        if registry.add(self) {
            Ok(())
        } else {
            module.link_mut().unbind();
            Err(ModuleError::RegistrationConflict {
                module: name,
                owner: registry.owner_label(),
            }
            .report())
        }
    }

    fn deactivate(&self) -> Result<(), ModuleError> {
        let name = type_name::<M>();
        let mut module = self
            .try_borrow_mut()
            .map_err(|_| ModuleError::ModuleBusy { module: name }.report())?;

        let Some(registry) = module.link().registry() else {
            return Err(ModuleError::NoOwnerResolved { module: name }.report());
        };

        let removed = registry.remove(self);
        module.link_mut().unbind();
        if removed {
            Ok(())
        } else {
            Err(ModuleError::UnregisteredRemoval {
                module: name,
                owner: registry.owner_label(),
            }
            .report())
        }
    }

    fn is_active(&self) -> bool {
        self.try_borrow()
            .ok()
            .and_then(|module| module.link().registry())
            .map_or(false, |registry| registry.holds(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::logging::capture;
    use crate::module::{module_handle, ModuleLink};

    type Actor = u32;

    #[derive(Default)]
    struct Beacon {
        link: ModuleLink<Actor>,
    }

    impl Module<Actor> for Beacon {
        fn link(&self) -> &ModuleLink<Actor> {
            &self.link
        }
        fn link_mut(&mut self) -> &mut ModuleLink<Actor> {
            &mut self.link
        }
    }

    struct Nowhere;

    impl ResolveOwner<Actor> for Nowhere {
        fn resolve_owner(&self) -> Option<Rc<Registry<Actor>>> {
            None
        }
    }

    #[test]
    fn test_activate_registers_both_ways() {
        let registry = Registry::shared(7);
        let beacon = module_handle(Beacon::default());

        beacon.activate(&registry).unwrap();
        assert!(beacon.is_active());
        assert!(registry.try_get::<Beacon>().is_some());
        let owner = beacon.borrow().link().registry().unwrap();
        assert!(Rc::ptr_eq(&owner, &registry));
    }

    #[test]
    fn test_activate_twice_registers_once() {
        let registry = Registry::shared(7);
        let beacon = module_handle(Beacon::default());

        beacon.activate(&registry).unwrap();
        beacon.activate(&registry).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_activate_without_owner_fails() {
        let beacon = module_handle(Beacon::default());
        let result = beacon.activate(&Nowhere);
        assert!(matches!(result, Err(ModuleError::NoOwnerResolved { .. })));
        assert!(!beacon.is_active());
    }

    #[test]
    fn test_conflicting_activation_leaves_module_unbound() {
        let registry = Registry::shared(7);
        let first = module_handle(Beacon::default());
        let second = module_handle(Beacon::default());

        first.activate(&registry).unwrap();
        let result = second.activate(&registry);
        assert!(matches!(result, Err(ModuleError::RegistrationConflict { .. })));
        assert!(second.borrow().link().registry().is_none());

        // The rejected instance cannot evict the registered one
        assert!(matches!(
            second.deactivate(),
            Err(ModuleError::NoOwnerResolved { .. })
        ));
        assert!(first.is_active());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_deactivate_twice_is_reported_not_fatal() {
        let registry = Registry::shared(7);
        let beacon = module_handle(Beacon::default());

        beacon.activate(&registry).unwrap();
        beacon.deactivate().unwrap();
        assert!(registry.is_empty());

        let second = beacon.deactivate();
        assert!(matches!(second, Err(ModuleError::NoOwnerResolved { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reactivation_cycles() {
        let registry = Registry::shared(7);
        let beacon = module_handle(Beacon::default());

        for _ in 0..3 {
            beacon.activate(&registry).unwrap();
            assert_eq!(registry.len(), 1);
            beacon.deactivate().unwrap();
            assert!(registry.is_empty());
        }
    }

    #[test]
    fn test_registry_removal_is_seen_by_handle() {
        let registry = Registry::shared(7);
        let beacon = module_handle(Beacon::default());
        beacon.activate(&registry).unwrap();

        assert!(registry.remove(&beacon));
        assert!(!beacon.is_active());

        beacon.activate(&registry).unwrap();
        assert!(beacon.is_active());
        assert!(registry.holds(&beacon));
    }

    #[test]
    fn test_activate_binds_module_added_through_registry() {
        let registry = Registry::shared(7);
        let beacon = module_handle(Beacon::default());
        assert!(registry.add(&beacon));

        beacon.activate(&registry).unwrap();
        assert!(beacon.is_active());
        assert_eq!(registry.len(), 1);

        beacon.deactivate().unwrap();
        assert!(!registry.contains::<Beacon>());
        assert!(beacon.borrow().link().registry().is_none());
    }

    #[test]
    fn test_deactivate_after_registry_removal_reports_unregistered() {
        let registry = Registry::shared(7);
        let beacon = module_handle(Beacon::default());
        beacon.activate(&registry).unwrap();
        registry.remove(&beacon);

        capture::start();
        let result = beacon.deactivate();
        assert!(matches!(
            result,
            Err(ModuleError::UnregisteredRemoval { owner, .. }) if owner == "7"
        ));
        assert_eq!(capture::errors().len(), 1);

        // The stale owner is forgotten
        assert!(beacon.borrow().link().registry().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_busy_module_cannot_change_registration() {
        let registry = Registry::shared(7);
        let beacon = module_handle(Beacon::default());

        let _held = beacon.borrow();
        let result = beacon.activate(&registry);
        assert!(matches!(result, Err(ModuleError::ModuleBusy { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_scene_node_resolves_nearest_actor() {
        let level = SceneNode::root("level");
        let ship = level.spawn_child_actor("ship", 1);
        let turret = ship.spawn_child("turret");
        let beacon = module_handle(Beacon::default());

        beacon.activate(&turret).unwrap();
        let ship_registry = ship.registry().unwrap();
        assert!(ship_registry.contains::<Beacon>());
        assert_eq!(
            beacon.borrow().link().host().map(|node| node.path()),
            Some("level/ship/turret".to_string())
        );
    }

    #[test]
    fn test_scene_node_without_actor_fails() {
        let level = SceneNode::<Actor>::root("level");
        let beacon = module_handle(Beacon::default());
        let result = beacon.activate(&level);
        assert!(matches!(result, Err(ModuleError::NoOwnerResolved { .. })));
    }
}
