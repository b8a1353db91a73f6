//! Rocket demo: a fuel tank, an engine and a flight computer cooperating
//! through the actor module registry

mod modules;

use std::error::Error;
use std::path::Path;
use std::rc::Rc;

use actor_modules::foundation::logging;
use actor_modules::prelude::*;

use modules::{Craft, Engine, Flight, FuelTank, FuelTankSpec};

// Demo configuration
const RUNTIME_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/runtime.ron");
const FUEL_TANK_ASSET: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fuel_tank.toml");
const FLIGHT_FRAMES: u64 = 600; // Ten seconds at 60 fps
const FUEL_CUT_FRAME: u64 = 300; // Frame at which the tank is detached
const REPORT_EVERY: u64 = 60; // Frames between telemetry lines
const ENGINE_SEED: u64 = 0x5eed;

pub struct RocketDemoApp {
    stage: Stage<Craft>,
    rocket: Rc<SceneNode<Craft>>,
    tank: ModuleHandle<FuelTank>,
    engine: ModuleHandle<Engine>,
    flight: ModuleHandle<Flight>,
    frame_time: f32,
}

impl RocketDemoApp {
    pub fn new(config: RuntimeConfig) -> Result<Self, Box<dyn Error>> {
        let spec = FuelTankSpec::load(FUEL_TANK_ASSET)?;
        log::info!(
            "Loaded tank spec: {} L at {} L/s",
            spec.capacity,
            spec.burn_rate
        );

        let rocket = SceneNode::actor("rocket", "rocket");
        let avionics = rocket.spawn_child("avionics");

        let tank = module_handle(FuelTank::from_spec(spec));
        let engine = module_handle(Engine::new(ENGINE_SEED));
        let flight = module_handle(Flight::new(REPORT_EVERY));
        tank.activate(&rocket)?;
        engine.activate(&rocket)?;
        flight.activate(&avionics)?;

        let frame_time = config.target_frame_time().unwrap_or(1.0 / 60.0);
        let mut stage = Stage::new(config)?;
        stage.insert_tree(&rocket);

        Ok(Self {
            stage,
            rocket,
            tank,
            engine,
            flight,
            frame_time,
        })
    }

    /// A second engine of the same type is refused; the first keeps its slot
    fn show_duplicate_engine(&self) {
        let spare = module_handle(Engine::new(ENGINE_SEED + 1));
        if let Err(e) = spare.activate(&self.rocket) {
            log::info!("Spare engine refused as expected: {}", e);
        }

        if let Some(registry) = self.rocket.registry() {
            let installed = registry.try_get::<Engine>();
            let original = installed.map_or(false, |engine| Rc::ptr_eq(&engine, &self.engine));
            log::info!(
                "Registered modules: {}, original engine kept: {}",
                registry.len(),
                original
            );
        }
    }

    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        self.show_duplicate_engine();

        let mut clock = FrameClock::new();
        let mut slowest = 0.0_f32;
        for frame in 1..=FLIGHT_FRAMES {
            if frame == FUEL_CUT_FRAME {
                log::info!("Detaching fuel tank at frame {}", frame);
                self.tank.deactivate()?;
            }
            self.stage.tick(self.frame_time);
            slowest = slowest.max(clock.tick());
        }
        log::debug!(
            "Simulated {} frames, slowest took {:.3} ms of wall time",
            clock.frame_count(),
            slowest * 1000.0
        );

        let flight = self.flight.borrow();
        log::info!(
            "Flight over after {:.1}s: apogee {:.1} m, {:.1} L left in tank, flameout: {}",
            self.stage.time().elapsed,
            flight.apogee,
            self.tank.borrow().litres,
            self.engine.borrow().is_flamed_out()
        );
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = RuntimeConfig::load_or_default(Path::new(RUNTIME_CONFIG))?;
    logging::init_from_config(&config)?;
    log::info!("Starting Rocket Demo");

    let result = RocketDemoApp::new(config).and_then(|mut app| app.run());
    match result {
        Ok(()) => {
            log::info!("Rocket Demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Rocket Demo failed: {:?}", e);
            Err(e)
        }
    }
}
