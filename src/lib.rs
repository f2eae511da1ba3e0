//! Storm Chaser - tornado pursuit and destruction simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, tornado, destruction, vehicle flight, damage)
//! - `config`: Tunable session parameters
//! - `persistence`: Versioned save/load with fallback to defaults
//!
//! Rendering, audio and UI live outside this crate. They feed the simulation
//! player position, intents and frame delta-time, and consume the events and
//! read-only snapshots it produces.

pub mod config;
pub mod persistence;
pub mod sim;

pub use config::{ConfigError, SimConfig};
pub use persistence::{SaveData, SaveError};

use glam::{Vec2, Vec3};

/// Simulation contract constants
///
/// These values are tuned by feel and are part of the gameplay contract.
/// Session-level knobs (world size, counts, start positions) live in [`SimConfig`].
pub mod consts {
    /// Render tick used by the headless runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum render ticks per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Terrain undulation wavelength divisor and amplitude
    pub const TERRAIN_WAVELENGTH: f32 = 80.0;
    pub const TERRAIN_AMPLITUDE: f32 = 8.0;
    /// Width of the boundary band where the wall rises
    pub const EDGE_MARGIN: f32 = 30.0;
    /// Wall height reached one full margin past the threshold
    pub const EDGE_WALL_HEIGHT: f32 = 150.0;

    /// Tree kill radius squared (radius 8, planar)
    pub const TREE_KILL_RADIUS_SQ: f32 = 64.0;
    /// House kill radius (planar)
    pub const HOUSE_KILL_RADIUS: f32 = 45.0;
    /// Currency granted per destroyed tree
    pub const TREE_REWARD: u64 = 25;
    /// Currency granted for the house
    pub const HOUSE_REWARD: u64 = 1000;

    /// Cap on pursuit steps executed in a single frame
    pub const MAX_PURSUIT_STEPS_PER_FRAME: u32 = 4;

    /// Base pull radius before chassis upgrades and weight factor
    pub const PULL_BASE_THRESHOLD: f32 = 40.0;
    pub const PULL_THRESHOLD_PER_CHASSIS: f32 = 5.0;
    /// Base pull strength before chassis upgrades and weight factor
    pub const PULL_BASE_STRENGTH: f32 = 100.0;
    pub const PULL_STRENGTH_PER_CHASSIS: f32 = 15.0;
    /// Tumble rates while pulled (rad/s)
    pub const SPIN_PITCH_RATE: f32 = 5.0;
    pub const SPIN_ROLL_RATE: f32 = 3.0;
    /// Effective airborne gravity (9.8 × 5)
    pub const FLIGHT_GRAVITY: f32 = 9.8 * 5.0;
    /// How far below resting height the vehicle must fall before landing
    pub const LANDING_TOLERANCE: f32 = 0.5;

    /// Player damage bands
    pub const DAMAGE_INNER_RADIUS: f32 = 50.0;
    pub const DAMAGE_INNER_RATE: f32 = 450.0;
    pub const DAMAGE_OUTER_RADIUS: f32 = 100.0;
    pub const DAMAGE_OUTER_RATE: f32 = 35.0;
    /// Share of player damage applied to the driven vehicle
    pub const VEHICLE_DAMAGE_SHARE: f32 = 0.1;

    /// Health bounds shared by player and vehicle
    pub const MAX_HEALTH: f32 = 100.0;

    /// Vehicle handling
    pub const TURN_SPEED: f32 = 1.8;
    pub const ENGINE_SPEED_PER_LEVEL: f32 = 10.0;
    pub const REVERSE_FACTOR: f32 = 0.5;
    /// Distance within which the player can enter/exit the vehicle
    pub const VEHICLE_ENTER_RANGE: f32 = 15.0;
    /// On-foot eye height above the terrain
    pub const PLAYER_EYE_HEIGHT: f32 = 1.8;

    /// Debris
    pub const DEBRIS_GRAVITY: f32 = 35.0;
    pub const DEBRIS_LIFE_DECAY: f32 = 0.7;
    pub const DEBRIS_FLOOR: f32 = -10.0;
    pub const VEGETATION_BURST: usize = 12;
    pub const STRUCTURE_BURST: usize = 40;

    /// Shop
    pub const REPAIR_COST: u64 = 250;
    pub const UPGRADE_COST_STEP: u64 = 400;
    pub const MAX_UPGRADE_LEVEL: u8 = 5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Drop the vertical component
#[inline]
pub fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Squared distance on the ground plane (ignores y)
#[inline]
pub fn planar_distance_sq(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    dx * dx + dz * dz
}

/// Distance on the ground plane (ignores y)
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar_distance_sq(a, b).sqrt()
}

/// Lift a ground-plane point (x, z) into world space at the given height
#[inline]
pub fn ground_point(xz: Vec2, y: f32) -> Vec3 {
    Vec3::new(xz.x, y, xz.y)
}

/// Wrap an hour value into [0, 24)
#[inline]
pub fn wrap_hour(hour: f32) -> f32 {
    let wrapped = hour.rem_euclid(24.0);
    // rem_euclid can return exactly 24.0 for tiny negative inputs
    if wrapped >= 24.0 { 0.0 } else { wrapped }
}
