//! Save/load persistence
//!
//! Features:
//! - Versioned JSON document
//! - World rebuilt from the seed; only destroyed flags are stored (bitset)
//! - Every loaded value sanitised; anything undecodable falls back to a fresh session

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SimConfig;
use crate::consts::MAX_HEALTH;
use crate::sim::economy::Upgrades;
use crate::sim::state::{GameState, SessionPhase, eye_point};
use crate::sim::tornado::TornadoController;
use crate::sim::vehicle::{VehicleModel, VehicleState};
use crate::{normalize_angle, wrap_hour};

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("malformed save data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported save version {found} (expected {SAVE_VERSION})")]
    UnsupportedVersion { found: u32 },
}

/// Persisted vehicle. Flight state is not saved; the vehicle always loads parked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedVehicle {
    pub model: VehicleModel,
    pub health: f32,
    /// Ground-plane (x, z)
    pub position: Vec2,
    pub rotation: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlayer {
    pub health: f32,
    pub position: Vec3,
}

/// Everything needed to resume a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub seed: u64,
    pub currency: u64,
    pub upgrades: Upgrades,
    pub unlocked_models: Vec<VehicleModel>,
    pub vehicle: SavedVehicle,
    pub player: SavedPlayer,
    /// Registry size when saved; the bitset only applies to a matching world
    pub tree_count: u32,
    /// Bit i set = tree i destroyed
    pub destroyed_trees: Vec<u64>,
    pub house_destroyed: bool,
    pub hour: f32,
}

impl SaveData {
    /// Snapshot a running session
    pub fn capture(state: &GameState) -> Self {
        let vehicle = &state.vehicle;
        Self {
            version: SAVE_VERSION,
            seed: state.seed,
            currency: state.currency,
            upgrades: state.player.upgrades,
            unlocked_models: state.unlocked_models.clone(),
            vehicle: SavedVehicle {
                model: vehicle.model,
                health: vehicle.health,
                position: Vec2::new(vehicle.position.x, vehicle.position.z),
                rotation: vehicle.rotation,
            },
            player: SavedPlayer {
                health: state.player.health,
                position: state.player.position,
            },
            tree_count: state.trees.len() as u32,
            destroyed_trees: state.trees.destroyed_bitset(),
            house_destroyed: state.house.destroyed,
            hour: state.clock.hour,
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let data: SaveData = serde_json::from_str(json)?;
        if data.version != SAVE_VERSION {
            return Err(SaveError::UnsupportedVersion {
                found: data.version,
            });
        }
        Ok(data)
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

fn health_or_full(value: f32) -> f32 {
    finite_or(value, MAX_HEALTH).clamp(0.0, MAX_HEALTH)
}

impl GameState {
    /// Rebuild a session from a save.
    ///
    /// The world is regenerated from the saved seed and the destroyed flags are
    /// re-applied without events or rewards.
    pub fn restore(config: SimConfig, save: &SaveData) -> Self {
        let mut state = GameState::new(config, save.seed);
        let world_size = state.config.world_size;

        state.currency = save.currency;
        state.player.upgrades = save.upgrades.clamped();

        let mut unlocked = vec![VehicleModel::default()];
        for &model in &save.unlocked_models {
            if !unlocked.contains(&model) {
                unlocked.push(model);
            }
        }
        let model = if unlocked.contains(&save.vehicle.model) {
            save.vehicle.model
        } else {
            log::warn!("Saved vehicle {:?} is not unlocked", save.vehicle.model);
            VehicleModel::default()
        };
        state.unlocked_models = unlocked;

        let vehicle_xz = if save.vehicle.position.is_finite() {
            save.vehicle.position
        } else {
            state.config.vehicle_start
        };
        state.vehicle = VehicleState {
            rotation: normalize_angle(finite_or(save.vehicle.rotation, 0.0)),
            health: health_or_full(save.vehicle.health),
            ..VehicleState::parked(model, vehicle_xz, world_size)
        };

        state.player.health = health_or_full(save.player.health);
        state.player.position = if save.player.position.is_finite() {
            save.player.position
        } else {
            eye_point(state.config.player_start, world_size)
        };

        if save.tree_count as usize == state.trees.len() {
            state.trees.restore_destroyed(&save.destroyed_trees);
        } else {
            log::warn!(
                "Save has {} trees but world has {}, ignoring destroyed trees",
                save.tree_count,
                state.trees.len()
            );
        }
        state.house.destroyed = save.house_destroyed;

        // Re-derive the tornado from the restored clock
        state.clock.hour = wrap_hour(finite_or(save.hour, state.config.starting_hour));
        state.tornado = TornadoController::new(&state.config);
        state.drain_events();
        state.sync_tornado_phase();

        if state.player.health <= 0.0 {
            state.phase = SessionPhase::GameOver;
        }

        log::info!(
            "Session restored: seed={}, currency={}, destroyed trees={}, hour={:.1}",
            state.seed,
            state.currency,
            state.trees.destroyed_count(),
            state.clock.hour
        );
        state
    }

    /// Restore from `json` if present and decodable, otherwise start fresh with `seed`
    pub fn load_or_default(config: SimConfig, seed: u64, json: Option<&str>) -> Self {
        match json.map(SaveData::from_json) {
            Some(Ok(save)) => Self::restore(config, &save),
            Some(Err(e)) => {
                log::warn!("Discarding save ({}), starting a new session", e);
                Self::new(config, seed)
            }
            None => Self::new(config, seed),
        }
    }
}
