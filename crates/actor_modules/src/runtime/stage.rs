//! # Stage
//!
//! Frame driver that feeds the four lifecycle passes to every actor's
//! registry in a fixed order:
//!
//! 1. start, once per actor before its first update (after the optional
//!    dependency check)
//! 2. update
//! 3. zero or more fixed-step physics updates
//! 4. late update
//!
//! Each pass runs across all actors before the next pass begins.

use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use crate::core::{ConfigError, RuntimeConfig};
use crate::foundation::time::{FixedStep, FrameTime};
use crate::module::{Owner, Registry};
use crate::scene::SceneNode;

new_key_type! {
    /// Handle to an actor held by a [`Stage`]
    pub struct ActorKey;
}

struct ActorEntry<O: Owner> {
    registry: Rc<Registry<O>>,
    started: bool,
}

/// Counters for the last frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Actors that ran their start pass this frame
    pub started_actors: usize,
    /// Physics steps run this frame
    pub physics_steps: u32,
    /// Missing dependencies found by start-time validation
    pub missing_dependencies: usize,
}

/// Drives lifecycle dispatch for a set of actors
pub struct Stage<O: Owner> {
    actors: SlotMap<ActorKey, ActorEntry<O>>,
    config: RuntimeConfig,
    physics: FixedStep,
    time: FrameTime,
    stats: FrameStats,
}

impl<O: Owner> Stage<O> {
    /// Create a stage with a validated configuration
    pub fn new(config: RuntimeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "Stage ready: physics step {:.4}s, up to {} steps per frame",
            config.physics_timestep,
            config.max_physics_steps
        );

        Ok(Self {
            actors: SlotMap::with_key(),
            physics: FixedStep::new(config.physics_timestep, config.max_physics_steps),
            config,
            time: FrameTime::default(),
            stats: FrameStats::default(),
        })
    }

    /// Runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Add an actor's registry. Its start pass runs on the next tick.
    pub fn insert(&mut self, registry: Rc<Registry<O>>) -> ActorKey {
        log::debug!("Stage tracking {}", registry.owner());
        self.actors.insert(ActorEntry {
            registry,
            started: false,
        })
    }

    /// Add every actor in the subtree rooted at `node`, parents first
    pub fn insert_tree(&mut self, node: &Rc<SceneNode<O>>) -> Vec<ActorKey> {
        let mut keys = Vec::new();
        if let Some(registry) = node.registry() {
            keys.push(self.insert(Rc::clone(registry)));
        }
        for child in node.children() {
            keys.extend(self.insert_tree(&child));
        }
        keys
    }

    /// Stop driving an actor
    pub fn remove(&mut self, key: ActorKey) -> Option<Rc<Registry<O>>> {
        let entry = self.actors.remove(key)?;
        log::debug!("Stage released {}", entry.registry.owner());
        Some(entry.registry)
    }

    /// Registry of a tracked actor
    pub fn registry(&self, key: ActorKey) -> Option<&Rc<Registry<O>>> {
        self.actors.get(key).map(|entry| &entry.registry)
    }

    /// Whether the actor's start pass has run
    pub fn is_started(&self, key: ActorKey) -> bool {
        self.actors.get(key).map_or(false, |entry| entry.started)
    }

    /// Number of tracked actors
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// True when no actor is tracked
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Timing of the last frame
    pub fn time(&self) -> FrameTime {
        self.time
    }

    /// Counters of the last frame
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Run one frame covering `delta` seconds
    pub fn tick(&mut self, delta: f32) -> FrameStats {
        let delta = delta.max(0.0);
        self.time = FrameTime::new(delta, self.time.elapsed + delta, self.time.frame + 1);
        let mut stats = FrameStats::default();

        let validate = self.config.validate_dependencies;
        for entry in self.actors.values_mut().filter(|entry| !entry.started) {
            entry.started = true;
            if validate {
                stats.missing_dependencies += entry.registry.validate_dependencies().len();
            }
            entry.registry.dispatch_start();
            stats.started_actors += 1;
        }

        let frame = self.time;
        for entry in self.actors.values() {
            entry.registry.dispatch_update(&frame);
        }

        stats.physics_steps = self.physics.advance(delta);
        let step = self.physics.timestep();
        for _ in 0..stats.physics_steps {
            let physics_time = FrameTime::new(step, frame.elapsed, frame.frame);
            for entry in self.actors.values() {
                entry.registry.dispatch_physics_update(&physics_time);
            }
        }

        for entry in self.actors.values() {
            entry.registry.dispatch_late_update(&frame);
        }

        self.stats = stats;
        stats
    }

    /// Run `frames` frames of `delta` seconds each
    pub fn run_frames(&mut self, frames: u64, delta: f32) {
        for _ in 0..frames {
            self.tick(delta);
        }
    }
}
