//! Render-cadence simulation tick
//!
//! Core game loop that advances the simulation deterministically. Tornado
//! pursuit runs on its own slower fixed interval inside `TornadoController`;
//! everything else here runs once per call.

use glam::{Vec2, Vec3};

use super::damage::apply_tornado_damage;
use super::destruction;
use super::state::{GameEvent, GameState, SessionPhase};
use super::vehicle::{DriveInput, FlightTransition, drive, step_flight};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// On-foot player position from the host's controller. Ignored while driving.
    pub player_position: Option<Vec3>,
    /// Throttle and steering (only used while driving)
    pub drive: DriveInput,
    /// Enter or leave the vehicle
    pub toggle_vehicle: bool,
    /// Drop a radar at (x, z)
    pub place_radar: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one render tick of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            SessionPhase::Playing => {
                state.phase = SessionPhase::Paused;
                log::debug!("Paused");
                return;
            }
            SessionPhase::Paused => {
                state.phase = SessionPhase::Playing;
                log::debug!("Resumed");
            }
            SessionPhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != SessionPhase::Playing {
        return;
    }

    if !dt.is_finite() || dt < 0.0 {
        log::debug!("Skipping tick with invalid dt {}", dt);
        return;
    }

    state.time_ticks += 1;
    let world_size = state.config.world_size;

    // Day/night
    if state.clock.advance(dt).is_some() {
        state.sync_tornado_phase();
    }

    // On foot, the host owns the player position
    if let Some(position) = input
        .player_position
        .filter(|p| p.is_finite() && !state.vehicle.is_driving)
    {
        state.player.position = position;
    }

    if input.toggle_vehicle {
        state.toggle_vehicle();
    }

    // Tornado pursuit (fixed interval)
    state.tornado.advance(dt, state.player.position, world_size);
    let tornado = state
        .tornado
        .is_active()
        .then(|| state.tornado.position());

    // Destruction
    let mut destroyed = Vec::new();
    if let Some(center) = tornado {
        let earned = destruction::evaluate(center, &mut state.trees, &mut state.house, &mut destroyed);
        state.currency = state.currency.saturating_add(earned);
    }

    // Vehicle: the flight model goes first and locks out driving while it owns the vehicle
    let (vehicle, outcome) = step_flight(
        state.vehicle,
        tornado,
        state.player.upgrades.chassis,
        dt,
        world_size,
    );
    state.vehicle = vehicle;
    match outcome.transition {
        Some(FlightTransition::Lifted) => {
            log::debug!("Vehicle lifted at {:?}", state.vehicle.position);
            state.push_event(GameEvent::VehicleLifted);
        }
        Some(FlightTransition::Landed) => {
            log::debug!("Vehicle landed at {:?}", state.vehicle.position);
            state.push_event(GameEvent::VehicleLanded);
        }
        None => {}
    }
    if !outcome.physics_owned {
        state.vehicle = drive(
            state.vehicle,
            input.drive,
            state.player.upgrades.engine,
            dt,
            world_size,
        );
    }
    if state.vehicle.is_driving {
        state.player.position = state.vehicle.position;
    }

    // Damage
    if let Some(center) = tornado {
        let distance = state.player.position.distance(center);
        let vehicle = state.vehicle.is_driving.then_some(&mut state.vehicle);
        if let Some(report) = apply_tornado_damage(&mut state.player.health, vehicle, distance, dt) {
            state.push_event(GameEvent::Damage(report));
        }
    }

    // Debris
    for event in destroyed {
        state.debris.emit(&event);
        state.push_event(GameEvent::Destroyed(event));
    }
    state.debris.update(dt);

    if let Some(xz) = input.place_radar.filter(|p| p.is_finite()) {
        state.place_radar(xz);
    }

    if state.player.health <= 0.0 {
        state.phase = SessionPhase::GameOver;
        log::info!(
            "Game over after {} ticks with {} currency",
            state.time_ticks,
            state.currency
        );
        state.push_event(GameEvent::GameOver);
    }
}
