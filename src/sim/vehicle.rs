//! Vehicle model, driving and flight
//!
//! A vehicle is either grounded (position and yaw come from player driving
//! input) or airborne (position comes from the flight integrator). Both are
//! expressed as `(VehicleState, input) -> VehicleState` transitions so the two
//! control sources never touch the same state in one tick.

use glam::{EulerRot, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::terrain::{elevation, snap_to_ground};
use crate::consts::*;
use crate::{ground_point, normalize_angle, planar};

/// Vehicle models available in the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleModel {
    /// "Scout": cheap and flimsy, easily lifted
    #[default]
    Light,
    /// "Tracker": reinforced chassis
    Medium,
    /// "Beast": armored interceptor
    Heavy,
}

/// Per-model constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSpec {
    /// Multiplies pull radius and pull strength (heavier = smaller)
    pub weight_factor: f32,
    /// Top driving speed before engine upgrades and health penalty
    pub drive_speed: f32,
    /// Shop price
    pub price: u64,
    /// Durability rating shown in the shop
    pub base_health: u32,
}

impl VehicleModel {
    pub const ALL: [VehicleModel; 3] = [VehicleModel::Light, VehicleModel::Medium, VehicleModel::Heavy];

    pub fn spec(self) -> ModelSpec {
        match self {
            VehicleModel::Light => ModelSpec {
                weight_factor: 1.2,
                drive_speed: 20.0,
                price: 0,
                base_health: 100,
            },
            VehicleModel::Medium => ModelSpec {
                weight_factor: 0.8,
                drive_speed: 30.0,
                price: 1500,
                base_health: 250,
            },
            VehicleModel::Heavy => ModelSpec {
                weight_factor: 0.4,
                drive_speed: 40.0,
                price: 5000,
                base_health: 600,
            },
        }
    }

    /// Shop name
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleModel::Light => "scout",
            VehicleModel::Medium => "tracker",
            VehicleModel::Heavy => "beast",
        }
    }

    /// Accepts shop names and weight-class names
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "scout" | "light" => Some(VehicleModel::Light),
            "tracker" | "medium" => Some(VehicleModel::Medium),
            "beast" | "heavy" => Some(VehicleModel::Heavy),
            _ => None,
        }
    }

    /// Distance at which the tornado starts lifting this model
    pub fn pull_threshold(self, chassis_level: u8) -> f32 {
        let chassis = f32::from(chassis_level.min(MAX_UPGRADE_LEVEL));
        (PULL_BASE_THRESHOLD + chassis * PULL_THRESHOLD_PER_CHASSIS) * self.spec().weight_factor
    }

    /// Lift/push magnitude applied while inside the pull radius
    pub fn pull_strength(self, chassis_level: u8) -> f32 {
        let chassis = f32::from(chassis_level.min(MAX_UPGRADE_LEVEL));
        (PULL_BASE_STRENGTH - chassis * PULL_STRENGTH_PER_CHASSIS).max(0.0) * self.spec().weight_factor
    }
}

/// Flight sub-state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FlightStatus {
    /// Player input is authoritative
    #[default]
    Grounded,
    /// Flight integration is authoritative
    Airborne {
        vertical_velocity: f32,
        /// Accumulated pitch (rad)
        spin_x: f32,
        /// Accumulated roll (rad)
        spin_z: f32,
    },
}

/// Flight state changes reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightTransition {
    Lifted,
    Landed,
}

/// Result of one flight step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightOutcome {
    /// The flight model wrote the vehicle this tick; player input must not
    pub physics_owned: bool,
    pub transition: Option<FlightTransition>,
}

/// Driving intent, each axis in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DriveInput {
    /// Positive = forward at full speed, negative = reverse at half speed
    pub throttle: f32,
    /// Positive = turn left
    pub steer: f32,
}

/// The player's vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub position: Vec3,
    /// Yaw (radians)
    pub rotation: f32,
    /// [0, 100]
    pub health: f32,
    pub is_driving: bool,
    pub model: VehicleModel,
    pub flight: FlightStatus,
}

impl VehicleState {
    /// A parked, full-health vehicle resting on the terrain at `xz`
    pub fn parked(model: VehicleModel, xz: Vec2, world_size: f32) -> Self {
        Self {
            position: ground_point(xz, elevation(xz.x, xz.y, world_size)),
            rotation: 0.0,
            health: MAX_HEALTH,
            is_driving: false,
            model,
            flight: FlightStatus::Grounded,
        }
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self.flight, FlightStatus::Airborne { .. })
    }

    /// Driving speed with engine bonus and damage penalty
    ///
    /// A wrecked vehicle still crawls at 30% speed.
    pub fn drive_speed(&self, engine_level: u8) -> f32 {
        let engine = f32::from(engine_level.min(MAX_UPGRADE_LEVEL));
        let condition = self.health.clamp(0.0, MAX_HEALTH) / MAX_HEALTH;
        (self.model.spec().drive_speed + engine * ENGINE_SPEED_PER_LEVEL) * (0.3 + 0.7 * condition)
    }

    /// Visual orientation: yaw plus tumble while airborne
    pub fn orientation(&self) -> Quat {
        match self.flight {
            FlightStatus::Grounded => Quat::from_rotation_y(self.rotation),
            FlightStatus::Airborne { spin_x, spin_z, .. } => {
                Quat::from_euler(EulerRot::YXZ, self.rotation, spin_x, spin_z)
            }
        }
    }

    /// Subtract health, clamped at zero. Returns the health actually lost.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health - amount).clamp(0.0, MAX_HEALTH);
        before - self.health
    }
}

/// One render tick of the flight model.
///
/// `tornado` is `None` while the tornado is inactive. Inside the pull radius
/// the vehicle is lifted, spun and shoved away on the ground plane; once
/// airborne it integrates under gravity until it drops below its resting
/// height, then snaps back to the ground.
pub fn step_flight(
    mut vehicle: VehicleState,
    tornado: Option<Vec3>,
    chassis_level: u8,
    dt: f32,
    world_size: f32,
) -> (VehicleState, FlightOutcome) {
    let was_airborne = vehicle.is_airborne();
    if !dt.is_finite() || dt <= 0.0 {
        return (
            vehicle,
            FlightOutcome {
                physics_owned: was_airborne,
                transition: None,
            },
        );
    }

    let mut pulled = false;
    if let Some(center) = tornado {
        let distance = vehicle.position.distance(center);
        if distance.is_finite() && distance < vehicle.model.pull_threshold(chassis_level) {
            pulled = true;
            let strength = vehicle.model.pull_strength(chassis_level);
            let (vertical_velocity, spin_x, spin_z) = match vehicle.flight {
                FlightStatus::Airborne {
                    vertical_velocity,
                    spin_x,
                    spin_z,
                } => (vertical_velocity, spin_x, spin_z),
                FlightStatus::Grounded => (0.0, 0.0, 0.0),
            };
            vehicle.flight = FlightStatus::Airborne {
                vertical_velocity: vertical_velocity + dt * strength / 2.0,
                spin_x: spin_x + dt * SPIN_PITCH_RATE,
                spin_z: spin_z + dt * SPIN_ROLL_RATE,
            };

            let away = planar(vehicle.position - center).normalize_or_zero();
            vehicle.position += away * dt * strength;
        }
    }

    let mut transition = None;
    if let FlightStatus::Airborne {
        vertical_velocity,
        spin_x,
        spin_z,
    } = vehicle.flight
    {
        vehicle.position.y += vertical_velocity * dt;
        let resting = elevation(vehicle.position.x, vehicle.position.z, world_size);
        if vehicle.position.y <= resting - LANDING_TOLERANCE {
            vehicle.position.y = resting;
            vehicle.flight = FlightStatus::Grounded;
            if was_airborne {
                transition = Some(FlightTransition::Landed);
            }
        } else {
            vehicle.flight = FlightStatus::Airborne {
                vertical_velocity: vertical_velocity - FLIGHT_GRAVITY * dt,
                spin_x,
                spin_z,
            };
            if !was_airborne {
                transition = Some(FlightTransition::Lifted);
            }
        }
    }

    let physics_owned = was_airborne || pulled;
    (
        vehicle,
        FlightOutcome {
            physics_owned,
            transition,
        },
    )
}

/// One render tick of player driving. Only applies to a grounded, driven vehicle.
pub fn drive(
    mut vehicle: VehicleState,
    input: DriveInput,
    engine_level: u8,
    dt: f32,
    world_size: f32,
) -> VehicleState {
    if !vehicle.is_driving || vehicle.is_airborne() {
        return vehicle;
    }
    if !dt.is_finite() || dt <= 0.0 || !input.throttle.is_finite() || !input.steer.is_finite() {
        return vehicle;
    }

    let steer = input.steer.clamp(-1.0, 1.0);

    vehicle.rotation = normalize_angle(vehicle.rotation + steer * TURN_SPEED * dt);

    let forward = Vec3::new(vehicle.rotation.sin(), 0.0, vehicle.rotation.cos());
    let speed = vehicle.drive_speed(engine_level);
    // Throttle is digital: only its sign matters
    let travel = if input.throttle > 0.0 {
        speed
    } else if input.throttle < 0.0 {
        -speed * REVERSE_FACTOR
    } else {
        0.0
    };
    vehicle.position = snap_to_ground(vehicle.position + forward * travel * dt, world_size);
    vehicle
}
