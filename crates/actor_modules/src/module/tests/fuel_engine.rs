use std::ops::Deref;
use std::rc::Rc;

use super::Actor;
use crate::foundation::logging::capture;
use crate::foundation::time::FrameTime;
use crate::module::{
    module_handle, Activation, Module, ModuleError, ModuleHandle, ModuleLink, ModuleType, Registry,
};

#[derive(Default)]
struct Fuel {
    link: ModuleLink<Actor>,
    litres: f32,
}

impl Module<Actor> for Fuel {
    fn link(&self) -> &ModuleLink<Actor> {
        &self.link
    }
    fn link_mut(&mut self) -> &mut ModuleLink<Actor> {
        &mut self.link
    }
}

#[derive(Default)]
struct Engine {
    link: ModuleLink<Actor>,
    fuel: Option<ModuleHandle<Fuel>>,
    burned: f32,
}

impl Module<Actor> for Engine {
    fn link(&self) -> &ModuleLink<Actor> {
        &self.link
    }
    fn link_mut(&mut self) -> &mut ModuleLink<Actor> {
        &mut self.link
    }
    fn required_types(&self) -> Vec<ModuleType> {
        vec![ModuleType::of::<Fuel>()]
    }
    fn on_start(&mut self) {
        self.fuel = self.require::<Fuel>().ok();
    }
    fn on_update(&mut self, time: &FrameTime) {
        if let Some(fuel) = &self.fuel {
            let mut fuel = fuel.borrow_mut();
            let burn = time.delta.min(fuel.litres);
            fuel.litres -= burn;
            self.burned += burn;
        }
    }
}

/// Wraps an engine; registering it never makes an `Engine` discoverable
#[derive(Default)]
struct TurboEngine {
    engine: Engine,
}

impl Deref for TurboEngine {
    type Target = Engine;

    fn deref(&self) -> &Engine {
        &self.engine
    }
}

impl Module<Actor> for TurboEngine {
    fn link(&self) -> &ModuleLink<Actor> {
        &self.engine.link
    }
    fn link_mut(&mut self) -> &mut ModuleLink<Actor> {
        &mut self.engine.link
    }
}

fn rocket() -> (Rc<Registry<Actor>>, ModuleHandle<Fuel>, ModuleHandle<Engine>) {
    let registry = Registry::shared("rocket");
    let fuel = module_handle(Fuel {
        litres: 10.0,
        ..Default::default()
    });
    let engine = module_handle(Engine::default());
    fuel.activate(&registry).unwrap();
    engine.activate(&registry).unwrap();
    (registry, fuel, engine)
}

#[test]
fn test_engine_resolves_fuel_during_start() {
    let (registry, fuel, engine) = rocket();
    assert!(registry.validate_dependencies().is_empty());

    registry.dispatch_start();
    let resolved = engine.borrow().fuel.clone().unwrap();
    assert!(Rc::ptr_eq(&resolved, &fuel));

    registry.dispatch_update(&FrameTime::new(2.0, 2.0, 1));
    assert_eq!(fuel.borrow().litres, 8.0);
    assert_eq!(engine.borrow().burned, 2.0);
}

#[test]
fn test_require_after_fuel_deactivates_reports_missing_dependency() {
    let (registry, fuel, engine) = rocket();
    registry.dispatch_start();

    fuel.deactivate().unwrap();
    capture::start();
    let result = engine.borrow().require::<Fuel>();

    assert!(matches!(
        result,
        Err(ModuleError::DependencyNotFound { required, owner, .. })
            if required.ends_with("Fuel") && owner == "rocket"
    ));
    let errors = capture::errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Engine"));
    assert!(errors[0].contains("Fuel"));
}

#[test]
fn test_require_before_registration_logs_exactly_once() {
    let engine = module_handle(Engine::default());

    capture::start();
    let result = engine.borrow().require::<Fuel>();

    assert!(matches!(result, Err(ModuleError::NoOwnerResolved { .. })));
    assert_eq!(capture::errors().len(), 1);
}

#[test]
fn test_missing_dependency_found_by_validation() {
    let registry = Registry::shared("rocket");
    let engine = module_handle(Engine::default());
    engine.activate(&registry).unwrap();

    capture::start();
    let missing = registry.validate_dependencies();
    assert_eq!(missing.len(), 1);
    assert_eq!(capture::errors().len(), 1);

    // Start still runs; the engine simply has no fuel
    registry.dispatch_start();
    assert!(engine.borrow().fuel.is_none());
}

#[test]
fn test_second_engine_is_rejected() {
    let (registry, _fuel, first) = rocket();
    let second = module_handle(Engine::default());

    capture::start();
    let result = second.activate(&registry);
    assert!(matches!(result, Err(ModuleError::RegistrationConflict { .. })));
    assert_eq!(capture::errors().len(), 1);

    let engines = registry
        .module_types()
        .into_iter()
        .filter(|t| *t == ModuleType::of::<Engine>())
        .count();
    assert_eq!(engines, 1);
    let registered = registry.try_get::<Engine>().unwrap();
    assert!(Rc::ptr_eq(&registered, &first));

    // The rejected engine never bound to the registry, so it cannot evict
    assert!(matches!(
        second.deactivate(),
        Err(ModuleError::NoOwnerResolved { .. })
    ));
    assert!(registry.remove(&first) && !registry.contains::<Engine>());
    assert!(!registry.remove(&second));
}

#[test]
fn test_lookup_is_by_exact_type() {
    let registry = Registry::shared("rocket");
    let turbo = module_handle(TurboEngine::default());
    turbo.activate(&registry).unwrap();

    assert!(registry.try_get::<TurboEngine>().is_some());
    assert!(registry.try_get::<Engine>().is_none());
    assert_eq!(turbo.borrow().burned, 0.0);
}

#[test]
fn test_double_deactivate_leaves_registry_intact() {
    let (registry, fuel, _engine) = rocket();

    fuel.deactivate().unwrap();
    capture::start();
    let second = fuel.deactivate();

    assert!(matches!(second, Err(ModuleError::NoOwnerResolved { .. })));
    assert_eq!(capture::errors().len(), 1);
    assert_eq!(registry.len(), 1);
    assert!(registry.contains::<Engine>());
}

#[test]
fn test_fuel_reactivation_is_visible_again() {
    let (registry, fuel, engine) = rocket();
    fuel.deactivate().unwrap();
    assert!(engine.borrow().require::<Fuel>().is_err());

    fuel.activate(&registry).unwrap();
    let again = engine.borrow().require::<Fuel>().unwrap();
    assert!(Rc::ptr_eq(&again, &fuel));
}
