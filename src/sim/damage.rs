//! Player damage model
//!
//! Two radius bands around an active tornado. Health only ever goes down here;
//! a tenth of the damage also reaches the vehicle while it is being driven.

use serde::{Deserialize, Serialize};

use super::vehicle::VehicleState;
use crate::consts::*;

/// Damage per second at `distance` from the tornado
pub fn damage_rate(distance: f32) -> f32 {
    if !distance.is_finite() || distance < 0.0 {
        return 0.0;
    }
    if distance < DAMAGE_INNER_RADIUS {
        DAMAGE_INNER_RATE
    } else if distance < DAMAGE_OUTER_RADIUS {
        DAMAGE_OUTER_RATE
    } else {
        0.0
    }
}

/// Health actually removed this tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DamageReport {
    pub amount: f32,
    pub vehicle_amount: f32,
}

/// Apply one tick of tornado damage.
///
/// `health` is the player's pool. `vehicle` is `Some` only while the player is
/// driving it. Returns `None` when nothing was lost (out of range, already
/// dead, or invalid inputs).
pub fn apply_tornado_damage(
    health: &mut f32,
    vehicle: Option<&mut VehicleState>,
    distance: f32,
    dt: f32,
) -> Option<DamageReport> {
    if !dt.is_finite() || dt <= 0.0 || *health <= 0.0 {
        return None;
    }

    let amount = damage_rate(distance) * dt;
    if amount <= 0.0 {
        return None;
    }

    let before = *health;
    *health = (before - amount).clamp(0.0, MAX_HEALTH);

    let vehicle_amount = vehicle
        .map(|v| v.take_damage(amount * VEHICLE_DAMAGE_SHARE))
        .unwrap_or(0.0);

    Some(DamageReport {
        amount: before - *health,
        vehicle_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::vehicle::VehicleModel;
    use glam::Vec2;
    use proptest::prelude::*;

    #[test]
    fn test_damage_bands() {
        let rates: Vec<f32> = [40.0, 80.0, 150.0].iter().map(|&d| damage_rate(d)).collect();
        assert_eq!(rates, vec![450.0, 35.0, 0.0]);
        assert_eq!(damage_rate(49.999), 450.0);
        assert_eq!(damage_rate(50.0), 35.0);
        assert_eq!(damage_rate(100.0), 0.0);
        assert_eq!(damage_rate(f32::NAN), 0.0);
    }

    #[test]
    fn test_apply_inner_band() {
        let mut health = 100.0;
        let report = apply_tornado_damage(&mut health, None, 10.0, 0.1).unwrap();
        assert!((report.amount - 45.0).abs() < 1e-4);
        assert!((health - 55.0).abs() < 1e-4);
        assert_eq!(report.vehicle_amount, 0.0);
    }

    #[test]
    fn test_driven_vehicle_takes_a_tenth() {
        let mut health = 100.0;
        let mut vehicle = VehicleState::parked(VehicleModel::Light, Vec2::ZERO, 1500.0);
        vehicle.is_driving = true;

        let report = apply_tornado_damage(&mut health, Some(&mut vehicle), 75.0, 1.0).unwrap();
        assert!((report.amount - 35.0).abs() < 1e-4);
        assert!((report.vehicle_amount - 3.5).abs() < 1e-4);
        assert!((vehicle.health - 96.5).abs() < 1e-4);
    }

    #[test]
    fn test_clamps_at_zero_and_stops() {
        let mut health = 10.0;
        let report = apply_tornado_damage(&mut health, None, 0.0, 1.0).unwrap();
        assert_eq!(health, 0.0);
        assert!((report.amount - 10.0).abs() < 1e-4);

        assert_eq!(apply_tornado_damage(&mut health, None, 0.0, 1.0), None);
        assert_eq!(health, 0.0);
    }

    #[test]
    fn test_vehicle_channel_uses_full_amount_even_when_player_nearly_dead() {
        let mut health = 1.0;
        let mut vehicle = VehicleState::parked(VehicleModel::Heavy, Vec2::ZERO, 1500.0);
        let report = apply_tornado_damage(&mut health, Some(&mut vehicle), 10.0, 1.0).unwrap();
        assert!((report.vehicle_amount - 45.0).abs() < 1e-4);
        assert_eq!(health, 0.0);
    }

    #[test]
    fn test_invalid_dt() {
        let mut health = 100.0;
        assert_eq!(apply_tornado_damage(&mut health, None, 10.0, -0.5), None);
        assert_eq!(apply_tornado_damage(&mut health, None, 10.0, f32::INFINITY), None);
        assert_eq!(health, 100.0);
    }

    proptest! {
        #[test]
        fn health_never_increases(
            distances in proptest::collection::vec(-10.0f32..300.0, 1..50),
            dt in 0.0f32..0.2,
        ) {
            let mut health = 100.0f32;
            for d in distances {
                let before = health;
                apply_tornado_damage(&mut health, None, d, dt);
                prop_assert!(health <= before);
                prop_assert!((0.0..=100.0).contains(&health));
            }
        }
    }
}
