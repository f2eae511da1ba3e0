//! Storm Chaser headless runner
//!
//! Drives a session with a scripted player through the host frame loop and
//! prints a summary plus the resulting save.
//!
//! Usage: `storm-chaser [config.json] [seconds] [vehicle]`

use std::error::Error;
use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use storm_chaser::consts::*;
use storm_chaser::sim::{
    DriveInput, GameEvent, GameState, TickInput, VehicleModel, elevation, tick,
};
use storm_chaser::{SaveData, SimConfig};

const DEFAULT_SECONDS: f32 = 120.0;
const DEFAULT_SEED: u64 = 0x5EED;
/// Seconds spent walking around the house before heading for the vehicle
const WALK_PHASE_SECS: f32 = 20.0;
const WALK_RADIUS: f32 = 150.0;
const WALK_SPEED: f32 = 6.0;
const RADAR_AFTER_SECS: f32 = 5.0;

/// Command line options. Arguments may come in any order.
#[derive(Debug, PartialEq)]
struct RunArgs {
    config_path: Option<String>,
    seconds: f32,
    vehicle: Option<VehicleModel>,
}

impl RunArgs {
    fn parse(args: &[String]) -> Self {
        let mut run = RunArgs {
            config_path: None,
            seconds: DEFAULT_SECONDS,
            vehicle: None,
        };
        for arg in args {
            if arg.ends_with(".json") {
                run.config_path = Some(arg.clone());
            } else if let Ok(seconds) = arg.parse::<f32>() {
                if seconds.is_finite() && seconds > 0.0 {
                    run.seconds = seconds;
                }
            } else if let Some(model) = VehicleModel::from_name(arg) {
                run.vehicle = Some(model);
            } else {
                log::warn!("Ignoring unknown argument {:?}", arg);
            }
        }
        run
    }
}

/// Stand-in for the first-person controller
struct ScriptedPlayer {
    angle: f32,
}

impl ScriptedPlayer {
    fn new() -> Self {
        Self { angle: 0.0 }
    }

    /// Intent for the next frame
    fn input(&mut self, state: &GameState, elapsed: f32, dt: f32) -> TickInput {
        let world_size = state.config.world_size;
        let on_foot = |xz: Vec2| {
            Vec3::new(xz.x, elevation(xz.x, xz.y, world_size) + PLAYER_EYE_HEIGHT, xz.y)
        };

        if state.vehicle.is_driving {
            return TickInput {
                drive: DriveInput {
                    throttle: 1.0,
                    steer: 0.35,
                },
                ..Default::default()
            };
        }

        if elapsed < WALK_PHASE_SECS {
            // Circle the house
            self.angle = (self.angle + dt * WALK_SPEED / WALK_RADIUS) % TAU;
            let house = state.config.house_position;
            let xz = house + Vec2::from_angle(self.angle) * WALK_RADIUS;
            // Drop a radar at the house once the loop is under way
            let place_radar =
                (elapsed >= RADAR_AFTER_SECS && state.radars.is_empty()).then_some(house);
            return TickInput {
                player_position: Some(on_foot(xz)),
                place_radar,
                ..Default::default()
            };
        }

        // Head for the vehicle and climb in
        let here = Vec2::new(state.player.position.x, state.player.position.z);
        let car = Vec2::new(state.vehicle.position.x, state.vehicle.position.z);
        let to_car = car - here;
        let step = to_car.clamp_length_max(WALK_SPEED * dt);
        let in_range = state.player.position.distance(state.vehicle.position) < VEHICLE_ENTER_RANGE;
        TickInput {
            player_position: Some(on_foot(here + step)),
            toggle_vehicle: in_range && !state.vehicle.is_airborne(),
            ..Default::default()
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Destroyed(e) => log::debug!("{:?} {} destroyed", e.kind, e.id),
        GameEvent::Damage(d) => log::trace!("Damage {:.2} (vehicle {:.2})", d.amount, d.vehicle_amount),
        other => log::info!("{:?}", other),
    }
}

fn load_config(path: Option<&str>) -> Result<SimConfig, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let json = std::fs::read_to_string(path)?;
    let config = SimConfig::from_json(&json)?;
    log::info!("Loaded config from {}", path);
    Ok(config)
}

fn log_catalogue() {
    for model in VehicleModel::ALL {
        let spec = model.spec();
        log::info!(
            "Vehicle {}: price {}, base health {}, speed {}, weight {}",
            model.as_str(),
            spec.price,
            spec.base_health,
            spec.drive_speed,
            spec.weight_factor
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let RunArgs {
        config_path,
        seconds,
        vehicle,
    } = RunArgs::parse(&args);

    let config = load_config(config_path.as_deref())?;
    let mut state = GameState::new(config, DEFAULT_SEED);
    log_catalogue();
    if let Some(model) = vehicle {
        if let Err(e) = state.select_model(model) {
            log::warn!("Cannot use {}: {}", model.as_str(), e);
        }
    }
    let mut player = ScriptedPlayer::new();
    log::info!("Storm Chaser running {} simulated seconds", seconds);

    // Uneven host frames exercise the accumulator
    let frame_pattern = [FRAME_DT, FRAME_DT, 2.0 * FRAME_DT, 0.5 * FRAME_DT];
    let mut accumulator = 0.0f32;
    let mut elapsed = 0.0f32;
    let mut frame = 0usize;

    while elapsed < seconds && !state.is_game_over() {
        let dt = frame_pattern[frame % frame_pattern.len()].min(0.1);
        frame += 1;
        accumulator += dt;

        let mut input = player.input(&state, elapsed, dt);
        let mut substeps = 0;
        while accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
            tick(&mut state, &input, FRAME_DT);
            accumulator -= FRAME_DT;
            elapsed += FRAME_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.toggle_vehicle = false;
            input.place_radar = None;
            input.pause = false;
        }

        for event in state.drain_events() {
            log_event(&event);
        }
    }

    println!("Simulated {:.1}s ({} ticks)", elapsed, state.time_ticks);
    println!(
        "Trees destroyed: {}/{}  House: {}",
        state.trees.destroyed_count(),
        state.trees.len(),
        if state.house.destroyed { "destroyed" } else { "standing" }
    );
    println!(
        "Currency: {}  Player health: {:.1}  Vehicle health: {:.1}",
        state.currency, state.player.health, state.vehicle.health
    );
    println!(
        "Tornado at ({:.1}, {:.1}) after {} steps, hour {:.1}",
        state.tornado.position().x,
        state.tornado.position().z,
        state.tornado.steps_taken(),
        state.clock.hour
    );
    if state.is_game_over() {
        println!("GAME OVER");
    }

    println!("{}", SaveData::capture(&state).to_json()?);
    Ok(())
}
