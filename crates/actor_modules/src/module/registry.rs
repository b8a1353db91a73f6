//! Per-owner module registry and lifecycle dispatch

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::{Module, ModuleError, ModuleHandle, ModuleType};
use crate::foundation::time::FrameTime;

/// Identity of the actor that owns a registry.
///
/// Anything printable works: a name, a numeric id, a newtype over either.
/// Diagnostics use the `Display` form.
pub trait Owner: fmt::Debug + fmt::Display + 'static {}

impl<T: fmt::Debug + fmt::Display + 'static> Owner for T {}

/// The four per-frame dispatch passes, in the order a driver runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchPass {
    /// Once per actor, before its first update
    Start,
    /// Every frame
    Update,
    /// Once per fixed physics step
    PhysicsUpdate,
    /// Every frame, after update and physics
    LateUpdate,
}

impl fmt::Display for DispatchPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatchPass::Start => "start",
            DispatchPass::Update => "update",
            DispatchPass::PhysicsUpdate => "physics update",
            DispatchPass::LateUpdate => "late update",
        };
        f.write_str(name)
    }
}

struct ModuleEntry<O: Owner> {
    module_type: ModuleType,
    // Same allocation as `module`, kept as `Any` for typed lookups
    instance: Rc<dyn Any>,
    module: Rc<RefCell<dyn Module<O>>>,
}

/// Live set of modules attached to one owner.
///
/// At most one module per concrete type. Modules are kept in insertion order
/// and every dispatch pass walks them in that order.
///
/// Dispatch iterates a snapshot, so hooks may call [`Registry::add`] and
/// [`Registry::remove`]: additions are seen from the next pass, removed
/// modules are skipped for the rest of the current one.
pub struct Registry<O: Owner> {
    owner: O,
    modules: RefCell<IndexMap<TypeId, ModuleEntry<O>>>,
}

impl<O: Owner> Registry<O> {
    /// Create an empty registry for `owner`
    pub fn new(owner: O) -> Self {
        Self {
            owner,
            modules: RefCell::new(IndexMap::new()),
        }
    }

    /// Create an empty registry ready to be shared with modules
    pub fn shared(owner: O) -> Rc<Self> {
        Rc::new(Self::new(owner))
    }

    /// Owner identity
    pub fn owner(&self) -> &O {
        &self.owner
    }

    pub(crate) fn owner_label(&self) -> String {
        self.owner.to_string()
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.modules.borrow().len()
    }

    /// True when no module is registered
    pub fn is_empty(&self) -> bool {
        self.modules.borrow().is_empty()
    }

    /// Register `module` under its concrete type.
    ///
    /// Returns false when a module of that type is already registered.
    pub fn add<M: Module<O>>(&self, module: &ModuleHandle<M>) -> bool {
        let module_type = ModuleType::of::<M>();
        let mut modules = self.modules.borrow_mut();
        if modules.contains_key(&module_type.id()) {
            log::debug!("{} already has a {} registered", self.owner, module_type);
            return false;
        }

        let instance: Rc<dyn Any> = Rc::clone(module) as Rc<dyn Any>;
        let dispatch: Rc<RefCell<dyn Module<O>>> = Rc::clone(module) as Rc<RefCell<dyn Module<O>>>;
        modules.insert(
            module_type.id(),
            ModuleEntry {
                module_type,
                instance,
                module: dispatch,
            },
        );
        log::debug!("Registered {} on {}", module_type, self.owner);
        true
    }

    /// Unregister `module`.
    ///
    /// Returns false when no module of its type is registered, or when the
    /// registered one is a different instance.
    pub fn remove<M: Module<O>>(&self, module: &ModuleHandle<M>) -> bool {
        let module_type = ModuleType::of::<M>();
        let mut modules = self.modules.borrow_mut();
        let is_same = modules
            .get(&module_type.id())
            .map_or(false, |entry| same_allocation(&entry.instance, module));
        if !is_same {
            log::debug!("{} is not registered on {}", module_type, self.owner);
            return false;
        }

        // shift_remove keeps the remaining modules in insertion order
        modules.shift_remove(&module_type.id());
        log::debug!("Unregistered {} from {}", module_type, self.owner);
        true
    }

    /// Registered module of exact type `T`
    pub fn try_get<T: Module<O>>(&self) -> Option<ModuleHandle<T>> {
        let modules = self.modules.borrow();
        let entry = modules.get(&TypeId::of::<T>())?;
        Rc::clone(&entry.instance).downcast::<RefCell<T>>().ok()
    }

    /// True when this exact instance is the registered module of its type
    pub fn holds<M: Module<O>>(&self, module: &ModuleHandle<M>) -> bool {
        self.modules
            .borrow()
            .get(&TypeId::of::<M>())
            .map_or(false, |entry| same_allocation(&entry.instance, module))
    }

    /// True when a module of exact type `T` is registered
    pub fn contains<T: 'static>(&self) -> bool {
        self.modules.borrow().contains_key(&TypeId::of::<T>())
    }

    /// True when a module of the given type is registered
    pub fn contains_type(&self, module_type: &ModuleType) -> bool {
        self.modules.borrow().contains_key(&module_type.id())
    }

    /// Registered module types in dispatch order
    pub fn module_types(&self) -> Vec<ModuleType> {
        self.modules
            .borrow()
            .values()
            .map(|entry| entry.module_type)
            .collect()
    }

    /// Run the start pass
    pub fn dispatch_start(&self) {
        self.dispatch(DispatchPass::Start, |module| module.on_start());
    }

    /// Run the per-frame update pass
    pub fn dispatch_update(&self, time: &FrameTime) {
        self.dispatch(DispatchPass::Update, |module| module.on_update(time));
    }

    /// Run one physics step pass
    pub fn dispatch_physics_update(&self, time: &FrameTime) {
        self.dispatch(DispatchPass::PhysicsUpdate, |module| {
            module.on_physics_update(time);
        });
    }

    /// Run the late update pass
    pub fn dispatch_late_update(&self, time: &FrameTime) {
        self.dispatch(DispatchPass::LateUpdate, |module| module.on_late_update(time));
    }

    /// Run any pass by name
    pub fn dispatch_pass(&self, pass: DispatchPass, time: &FrameTime) {
        match pass {
            DispatchPass::Start => self.dispatch_start(),
            DispatchPass::Update => self.dispatch_update(time),
            DispatchPass::PhysicsUpdate => self.dispatch_physics_update(time),
            DispatchPass::LateUpdate => self.dispatch_late_update(time),
        }
    }

    /// Check every module's declared dependencies against the registry.
    ///
    /// Logs and returns one [`ModuleError::DependencyNotFound`] per missing
    /// type.
    pub fn validate_dependencies(&self) -> Vec<ModuleError> {
        let mut missing = Vec::new();
        for (module_type, module) in self.snapshot() {
            let required = match module.try_borrow() {
                Ok(module) => module.required_types(),
                Err(_) => {
                    log::warn!(
                        "Skipping dependency check of {} on {}: module is borrowed",
                        module_type,
                        self.owner
                    );
                    continue;
                }
            };

            for dependency in required {
                if !self.contains_type(&dependency) {
                    missing.push(
                        ModuleError::DependencyNotFound {
                            module: module_type.name(),
                            required: dependency.name(),
                            owner: self.owner_label(),
                        }
                        .report(),
                    );
                }
            }
        }
        missing
    }

    fn snapshot(&self) -> Vec<(ModuleType, Rc<RefCell<dyn Module<O>>>)> {
        self.modules
            .borrow()
            .values()
            .map(|entry| (entry.module_type, Rc::clone(&entry.module)))
            .collect()
    }

    fn is_still_registered(&self, module_type: &ModuleType, module: &Rc<RefCell<dyn Module<O>>>) -> bool {
        self.modules
            .borrow()
            .get(&module_type.id())
            .map_or(false, |entry| same_allocation(&entry.module, module))
    }

    fn dispatch<F>(&self, pass: DispatchPass, mut hook: F)
    where
        F: FnMut(&mut dyn Module<O>),
    {
        for (module_type, module) in self.snapshot() {
            if !self.is_still_registered(&module_type, &module) {
                continue;
            }

            let Ok(mut module) = module.try_borrow_mut() else {
                log::warn!(
                    "Skipping {} of {} on {}: module is already borrowed",
                    pass,
                    module_type,
                    self.owner
                );
                continue;
            };

            if module.is_active_and_enabled() {
                hook(&mut *module);
            }
        }
    }
}

impl<O: Owner> fmt::Debug for Registry<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("owner", &self.owner)
            .field("modules", &self.module_types())
            .finish()
    }
}

fn same_allocation<A: ?Sized, B: ?Sized>(a: &Rc<A>, b: &Rc<B>) -> bool {
    std::ptr::eq(Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>())
}
