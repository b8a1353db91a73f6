//! Rocket behaviour modules

use std::path::Path;
use std::rc::Rc;

use actor_modules::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;

pub type Craft = &'static str;

const GRAVITY: f32 = 9.81;
const THRUST_PER_LITRE: f32 = 4.0; // m/s^2 of lift per litre burned per second

/// Tank tuning shared by every tank built from the same asset
#[derive(Debug, Clone, Deserialize)]
pub struct FuelTankSpec {
    pub capacity: f32,
    pub burn_rate: f32,
    #[serde(default)]
    pub burn_jitter: f32,
}

impl FuelTankSpec {
    /// Load a tank asset and reject values the engine cannot burn with
    pub fn load(path: impl AsRef<Path>) -> Result<Rc<Self>, ConfigError> {
        let spec: Rc<Self> = load_data_asset(path)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check that every value is a usable, finite number
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.capacity.is_finite() && self.capacity >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "capacity must be a non-negative number of litres, got {}",
                self.capacity
            )));
        }
        if !(self.burn_rate.is_finite() && self.burn_rate >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "burn_rate must be a non-negative number of litres per second, got {}",
                self.burn_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.burn_jitter) {
            return Err(ConfigError::Invalid(format!(
                "burn_jitter must be between 0 and 1, got {}",
                self.burn_jitter
            )));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FuelTank {
    link: ModuleLink<Craft>,
    spec: DataSlot<FuelTankSpec>,
    pub litres: f32,
}

impl FuelTank {
    pub fn from_spec(spec: Rc<FuelTankSpec>) -> Self {
        Self {
            litres: spec.capacity,
            spec: DataSlot::with(spec),
            ..Default::default()
        }
    }

    /// Drain up to `litres`, returning what was actually drawn
    pub fn draw(&mut self, litres: f32) -> f32 {
        let drawn = litres.clamp(0.0, self.litres);
        self.litres -= drawn;
        drawn
    }
}

impl Module<Craft> for FuelTank {
    fn link(&self) -> &ModuleLink<Craft> {
        &self.link
    }
    fn link_mut(&mut self) -> &mut ModuleLink<Craft> {
        &mut self.link
    }
}

impl DataModule<Craft> for FuelTank {
    type Data = FuelTankSpec;

    fn data_slot(&self) -> &DataSlot<FuelTankSpec> {
        &self.spec
    }
    fn data_slot_mut(&mut self) -> &mut DataSlot<FuelTankSpec> {
        &mut self.spec
    }
}

pub struct Engine {
    link: ModuleLink<Craft>,
    fuel: Option<ModuleHandle<FuelTank>>,
    rng: StdRng,
    flameout: bool,
    /// Litres burned last frame, per second
    pub burn: f32,
}

impl Engine {
    pub fn new(seed: u64) -> Self {
        Self {
            link: ModuleLink::new(),
            fuel: None,
            rng: StdRng::seed_from_u64(seed),
            flameout: false,
            burn: 0.0,
        }
    }

    pub fn is_flamed_out(&self) -> bool {
        self.flameout
    }

    fn shut_down(&mut self, reason: &str) {
        if !self.flameout {
            log::warn!("Engine flameout: {}", reason);
        }
        self.flameout = true;
        self.fuel = None;
        self.burn = 0.0;
    }
}

impl Module<Craft> for Engine {
    fn link(&self) -> &ModuleLink<Craft> {
        &self.link
    }
    fn link_mut(&mut self) -> &mut ModuleLink<Craft> {
        &mut self.link
    }

    fn required_types(&self) -> Vec<ModuleType> {
        vec![ModuleType::of::<FuelTank>()]
    }

    fn on_start(&mut self) {
        self.fuel = self.require::<FuelTank>().ok();
        if self.fuel.is_some() {
            log::info!("Engine ignition");
        }
    }

    fn on_update(&mut self, time: &FrameTime) {
        if self.flameout {
            return;
        }

        // The tank may have been detached since the last frame
        let attached = self.fuel.as_ref().map_or(false, |tank| tank.is_active());
        if !attached {
            match self.require::<FuelTank>() {
                Ok(tank) => self.fuel = Some(tank),
                Err(_) => return self.shut_down("fuel line cut"),
            }
        }

        let Some(tank) = self.fuel.clone() else {
            return;
        };
        let mut tank = tank.borrow_mut();
        let Some(spec) = tank.data().cloned() else {
            return self.shut_down("tank has no spec");
        };

        // Specs built in code skip validation
        let jitter = if (0.0..=1.0).contains(&spec.burn_jitter) {
            spec.burn_jitter
        } else {
            0.0
        };
        let rate = spec.burn_rate * (1.0 + self.rng.gen_range(-jitter..=jitter));
        let drawn = tank.draw(rate * time.delta);
        self.burn = if time.delta > 0.0 { drawn / time.delta } else { 0.0 };

        if tank.litres <= 0.0 {
            drop(tank);
            self.shut_down("tank empty");
        }
    }
}

/// Integrates altitude from engine output. Hosted on a child node so the
/// owning craft is found by walking up the hierarchy.
#[derive(Default)]
pub struct Flight {
    link: ModuleLink<Craft>,
    engine: Option<ModuleHandle<Engine>>,
    pub altitude: f32,
    pub velocity: f32,
    pub apogee: f32,
    report_every: u64,
}

impl Flight {
    pub fn new(report_every: u64) -> Self {
        Self {
            report_every,
            ..Default::default()
        }
    }
}

impl Module<Craft> for Flight {
    fn link(&self) -> &ModuleLink<Craft> {
        &self.link
    }
    fn link_mut(&mut self) -> &mut ModuleLink<Craft> {
        &mut self.link
    }

    fn required_types(&self) -> Vec<ModuleType> {
        vec![ModuleType::of::<Engine>()]
    }

    fn on_start(&mut self) {
        self.engine = self.require::<Engine>().ok();
    }

    fn on_physics_update(&mut self, time: &FrameTime) {
        let burn = self.engine.as_ref().map_or(0.0, |engine| engine.borrow().burn);
        let acceleration = burn * THRUST_PER_LITRE - GRAVITY;

        self.velocity += acceleration * time.delta;
        self.altitude += self.velocity * time.delta;
        if self.altitude <= 0.0 {
            self.altitude = 0.0;
            self.velocity = self.velocity.max(0.0);
        }
        self.apogee = self.apogee.max(self.altitude);
    }

    fn on_late_update(&mut self, time: &FrameTime) {
        if self.report_every > 0 && time.frame % self.report_every == 0 {
            log::info!(
                "t={:>5.2}s altitude {:>7.1} m, velocity {:>6.1} m/s",
                time.elapsed,
                self.altitude,
                self.velocity
            );
        }
    }
}
