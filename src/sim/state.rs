//! Game state and core simulation types
//!
//! `GameState` owns every subsystem's state for one session. Each field has a
//! single writer per tick; see `tick` for the order.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::DayClock;
use super::damage::DamageReport;
use super::destruction::DestructionEvent;
use super::economy::{self, ModelSelection, ShopError, UpgradeKind, Upgrades};
use super::particles::DebrisEmitter;
use super::registry::{Registry, Structure};
use super::terrain::elevation;
use super::tornado::TornadoController;
use super::vehicle::{VehicleModel, VehicleState};
use crate::config::SimConfig;
use crate::consts::*;
use crate::ground_point;

/// Stream offset so debris randomness never shares a sequence with world generation
const DEBRIS_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Simulation running
    Playing,
    /// Host menu open; nothing advances
    Paused,
    /// Player health hit zero. Terminal until a new session is created.
    GameOver,
}

/// The player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Eye position. Driven by the host on foot, by the vehicle while driving.
    pub position: Vec3,
    /// [0, 100]
    pub health: f32,
    pub upgrades: Upgrades,
}

/// A placed weather radar marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Radar {
    pub id: u32,
    pub position: Vec3,
    pub active: bool,
}

/// Everything the host may react to, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An object went from standing to destroyed
    Destroyed(DestructionEvent),
    /// Player (and possibly vehicle) lost health this tick
    Damage(DamageReport),
    TornadoActivated,
    TornadoDeactivated,
    VehicleLifted,
    VehicleLanded,
    VehicleEntered,
    VehicleExited,
    RadarPlaced { id: u32, position: Vec3 },
    GameOver,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// World seed (tree layout)
    pub seed: u64,
    pub config: SimConfig,
    pub phase: SessionPhase,
    /// Render ticks processed
    pub time_ticks: u64,
    pub clock: DayClock,
    pub tornado: TornadoController,
    pub trees: Registry,
    pub house: Structure,
    pub vehicle: VehicleState,
    pub player: PlayerState,
    pub currency: u64,
    pub unlocked_models: Vec<VehicleModel>,
    pub radars: Vec<Radar>,
    /// Cosmetic debris (not gameplay-affecting, not persisted)
    pub debris: DebrisEmitter,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh session: full health, starting currency, default vehicle.
    ///
    /// A config that fails validation is replaced by the defaults.
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("Invalid config ({}), using defaults", e);
                SimConfig::default()
            }
        };
        let mut rng = Pcg32::seed_from_u64(seed);
        let world_size = config.world_size;

        let trees = Registry::generate(&config, &mut rng);
        let house = Structure::house(config.house_position, world_size);
        let clock = DayClock::new(config.starting_hour, config.hours_per_second);
        let tornado = TornadoController::new(&config);
        let vehicle = VehicleState::parked(VehicleModel::default(), config.vehicle_start, world_size);
        let player = PlayerState {
            position: eye_point(config.player_start, world_size),
            health: MAX_HEALTH,
            upgrades: Upgrades::default(),
        };
        let debris = DebrisEmitter::new(seed ^ DEBRIS_STREAM, config.max_debris);

        let mut state = Self {
            seed,
            phase: SessionPhase::Playing,
            time_ticks: 0,
            clock,
            tornado,
            trees,
            house,
            vehicle,
            player,
            currency: config.starting_currency,
            unlocked_models: vec![VehicleModel::default()],
            radars: Vec::new(),
            debris,
            events: Vec::new(),
            next_id: 1,
            config,
        };
        state.sync_tornado_phase();

        log::info!(
            "Session started: seed={}, trees={}, hour={:.1}",
            seed,
            state.trees.len(),
            state.clock.hour
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events emitted since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// Activate or deactivate the tornado to match the clock
    pub(crate) fn sync_tornado_phase(&mut self) {
        match self.tornado.set_phase(self.clock.phase()) {
            Some(true) => self.push_event(GameEvent::TornadoActivated),
            Some(false) => self.push_event(GameEvent::TornadoDeactivated),
            None => {}
        }
    }

    /// Enter or leave the vehicle.
    ///
    /// Entering needs the player within range. Neither direction is allowed
    /// while the vehicle is airborne.
    pub fn toggle_vehicle(&mut self) -> bool {
        if self.vehicle.is_airborne() {
            return false;
        }

        if self.vehicle.is_driving {
            self.vehicle.is_driving = false;
            self.player.position = self.vehicle.position + Vec3::Y * PLAYER_EYE_HEIGHT;
            self.push_event(GameEvent::VehicleExited);
            return true;
        }

        if self.player.position.distance(self.vehicle.position) < VEHICLE_ENTER_RANGE {
            self.vehicle.is_driving = true;
            self.player.position = self.vehicle.position;
            self.push_event(GameEvent::VehicleEntered);
            return true;
        }
        false
    }

    /// Drop a radar on the terrain at (x, z)
    pub fn place_radar(&mut self, xz: Vec2) -> u32 {
        let id = self.next_entity_id();
        let position = ground_point(xz, elevation(xz.x, xz.y, self.config.world_size));
        self.radars.push(Radar {
            id,
            position,
            active: true,
        });
        self.push_event(GameEvent::RadarPlaced { id, position });
        id
    }

    pub fn repair_vehicle(&mut self) -> Result<u64, ShopError> {
        let cost = economy::repair_vehicle(&mut self.currency, &mut self.vehicle)?;
        log::info!("Vehicle repaired for {}", cost);
        Ok(cost)
    }

    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> Result<u8, ShopError> {
        let level = economy::purchase_upgrade(&mut self.currency, &mut self.player.upgrades, kind)?;
        log::info!("{:?} upgraded to level {}", kind, level);
        Ok(level)
    }

    pub fn select_model(&mut self, model: VehicleModel) -> Result<ModelSelection, ShopError> {
        let selection = economy::select_model(
            &mut self.currency,
            &mut self.unlocked_models,
            &mut self.vehicle,
            model,
        )?;
        log::info!("Vehicle model {} ({:?})", model.as_str(), selection);
        Ok(selection)
    }
}

/// Player eye position standing on the terrain at (x, z)
pub fn eye_point(xz: Vec2, world_size: f32) -> Vec3 {
    ground_point(xz, elevation(xz.x, xz.y, world_size) + PLAYER_EYE_HEIGHT)
}
