//! Module trait and lifecycle hooks

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::{ModuleError, ModuleLink, Owner};
use crate::foundation::time::FrameTime;

/// Shared handle to a module instance.
///
/// The host owns the module's existence; registries keep clones of this
/// handle only while the module is registered.
pub type ModuleHandle<M> = Rc<RefCell<M>>;

/// Wrap a module in a [`ModuleHandle`]
pub fn module_handle<M>(module: M) -> ModuleHandle<M> {
    Rc::new(RefCell::new(module))
}

/// Identifier of a concrete module type
#[derive(Debug, Clone, Copy)]
pub struct ModuleType {
    id: TypeId,
    name: &'static str,
}

impl ModuleType {
    /// Type tag for `T`
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Runtime type identifier
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Readable type name, used in diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ModuleType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModuleType {}

impl Hash for ModuleType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A self-registering unit of behaviour owned by an actor.
///
/// Implementors embed a [`ModuleLink`] and expose it through `link` and
/// `link_mut`. Every hook is a no-op by default. Hooks are only ever called
/// by the owning [`Registry`](super::Registry) during a dispatch pass, and
/// only while the module is enabled and its host hierarchy is active.
///
/// ```
/// use actor_modules::prelude::*;
///
/// #[derive(Default)]
/// struct Fuel {
///     link: ModuleLink<&'static str>,
///     litres: f32,
/// }
///
/// impl Module<&'static str> for Fuel {
///     fn link(&self) -> &ModuleLink<&'static str> { &self.link }
///     fn link_mut(&mut self) -> &mut ModuleLink<&'static str> { &mut self.link }
///
///     fn on_update(&mut self, time: &FrameTime) {
///         self.litres -= time.delta;
///     }
/// }
///
/// let registry = Registry::shared("ship");
/// let fuel = module_handle(Fuel { litres: 10.0, ..Default::default() });
/// fuel.activate(&registry).unwrap();
/// assert!(registry.try_get::<Fuel>().is_some());
/// ```
pub trait Module<O: Owner>: Any {
    /// Back-reference to the owning registry
    fn link(&self) -> &ModuleLink<O>;

    /// Mutable back-reference to the owning registry
    fn link_mut(&mut self) -> &mut ModuleLink<O>;

    /// Module types this module expects to `require`.
    ///
    /// Advisory only. Nothing checks it unless
    /// [`Registry::validate_dependencies`](super::Registry::validate_dependencies) runs.
    fn required_types(&self) -> Vec<ModuleType> {
        Vec::new()
    }

    /// Called once by the start pass
    fn on_start(&mut self) {}

    /// Called every frame
    fn on_update(&mut self, _time: &FrameTime) {}

    /// Called once per fixed physics step
    fn on_physics_update(&mut self, _time: &FrameTime) {}

    /// Called every frame after the update and physics passes
    fn on_late_update(&mut self, _time: &FrameTime) {}

    /// Whether dispatch should call this module's hooks
    fn is_enabled(&self) -> bool {
        self.link().is_enabled()
    }

    /// Enable or disable hook dispatch. Registration is unaffected.
    fn set_enabled(&mut self, enabled: bool) {
        self.link_mut().set_enabled(enabled);
    }

    /// Enabled and hosted by an active hierarchy
    fn is_active_and_enabled(&self) -> bool {
        self.is_enabled() && self.link().is_hierarchy_active()
    }

    /// Look up the sibling module of exact type `T` in the owning registry.
    ///
    /// Logs one error and returns it when there is no owner or no `T`.
    fn require<T: Module<O>>(&self) -> Result<ModuleHandle<T>, ModuleError>
    where
        Self: Sized,
    {
        self.link().require::<T>(std::any::type_name::<Self>())
    }
}
