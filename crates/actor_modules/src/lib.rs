//! # Actor Modules
//!
//! Lifecycle framework that lets host-managed actors own a dynamic set of
//! behaviour modules.
//!
//! ## Features
//!
//! - **Self-registration**: modules register with the nearest owning actor
//!   when activated and unregister when deactivated
//! - **Typed lookups**: `require::<T>()` finds a sibling module by exact type
//! - **Ordered dispatch**: start, update, physics update and late update
//!   passes visit modules in registration order
//! - **Data modules**: shared, externally loaded configuration objects
//!
//! ## Quick Start
//!
//! ```rust
//! use actor_modules::prelude::*;
//!
//! #[derive(Default)]
//! struct Fuel {
//!     link: ModuleLink<&'static str>,
//!     litres: f32,
//! }
//!
//! impl Module<&'static str> for Fuel {
//!     fn link(&self) -> &ModuleLink<&'static str> { &self.link }
//!     fn link_mut(&mut self) -> &mut ModuleLink<&'static str> { &mut self.link }
//! }
//!
//! #[derive(Default)]
//! struct Engine {
//!     link: ModuleLink<&'static str>,
//!     fuel: Option<ModuleHandle<Fuel>>,
//! }
//!
//! impl Module<&'static str> for Engine {
//!     fn link(&self) -> &ModuleLink<&'static str> { &self.link }
//!     fn link_mut(&mut self) -> &mut ModuleLink<&'static str> { &mut self.link }
//!
//!     fn required_types(&self) -> Vec<ModuleType> {
//!         vec![ModuleType::of::<Fuel>()]
//!     }
//!
//!     fn on_start(&mut self) {
//!         self.fuel = self.require::<Fuel>().ok();
//!     }
//!
//!     fn on_update(&mut self, time: &FrameTime) {
//!         if let Some(fuel) = &self.fuel {
//!             fuel.borrow_mut().litres -= time.delta;
//!         }
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rocket = SceneNode::actor("rocket", "rocket");
//!     let fuel = module_handle(Fuel { litres: 5.0, ..Default::default() });
//!     let engine = module_handle(Engine::default());
//!     fuel.activate(&rocket)?;
//!     engine.activate(&rocket)?;
//!
//!     let mut stage = Stage::new(RuntimeConfig::default())?;
//!     stage.insert_tree(&rocket);
//!     stage.run_frames(2, 1.0);
//!
//!     assert_eq!(fuel.borrow().litres, 3.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod module;
pub mod runtime;
pub mod scene;

/// Common imports for module authors and drivers
pub mod prelude {
    pub use crate::{
        core::{Config, ConfigError, RuntimeConfig},
        foundation::time::{FrameClock, FrameTime},
        module::{
            load_data_asset, module_handle, Activation, DataModule, DataSlot, DispatchPass,
            Module, ModuleError, ModuleHandle, ModuleLink, ModuleType, Owner, Registry,
            ResolveOwner,
        },
        runtime::{ActorKey, FrameStats, Stage},
        scene::SceneNode,
    };
}
