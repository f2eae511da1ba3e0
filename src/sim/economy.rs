//! Currency sinks: repairs, upgrades and the vehicle shop
//!
//! Every operation either succeeds completely or leaves all state untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::vehicle::{VehicleModel, VehicleState};
use crate::consts::*;

/// Upgrade tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeKind {
    /// +10 drive speed per level
    Engine,
    /// Shrinks the tornado's grip on the vehicle
    Chassis,
    /// Radar probe range (consumed by the host UI)
    Radar,
}

/// Upgrade levels, each 0..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Upgrades {
    pub engine: u8,
    pub chassis: u8,
    pub radar: u8,
}

impl Upgrades {
    pub fn level(&self, kind: UpgradeKind) -> u8 {
        match kind {
            UpgradeKind::Engine => self.engine,
            UpgradeKind::Chassis => self.chassis,
            UpgradeKind::Radar => self.radar,
        }
    }

    fn level_mut(&mut self, kind: UpgradeKind) -> &mut u8 {
        match kind {
            UpgradeKind::Engine => &mut self.engine,
            UpgradeKind::Chassis => &mut self.chassis,
            UpgradeKind::Radar => &mut self.radar,
        }
    }

    /// Clamp every track into 0..=MAX_UPGRADE_LEVEL
    pub fn clamped(self) -> Self {
        Self {
            engine: self.engine.min(MAX_UPGRADE_LEVEL),
            chassis: self.chassis.min(MAX_UPGRADE_LEVEL),
            radar: self.radar.min(MAX_UPGRADE_LEVEL),
        }
    }
}

/// Why a purchase was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    #[error("not enough currency: need {cost}, have {available}")]
    InsufficientFunds { cost: u64, available: u64 },

    #[error("{0:?} upgrade is already at max level")]
    MaxLevel(UpgradeKind),

    #[error("vehicle is already at full health")]
    NothingToRepair,
}

/// What `select_model` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSelection {
    /// Already owned; switched for free
    Switched,
    /// Bought, unlocked and switched
    Purchased { price: u64 },
}

/// Price of the next level on a track currently at `level`
pub fn upgrade_cost(level: u8) -> u64 {
    (u64::from(level) + 1) * UPGRADE_COST_STEP
}

fn charge(currency: &mut u64, cost: u64) -> Result<(), ShopError> {
    if *currency < cost {
        return Err(ShopError::InsufficientFunds {
            cost,
            available: *currency,
        });
    }
    *currency -= cost;
    Ok(())
}

/// Restore the vehicle to full health for a flat fee
pub fn repair_vehicle(currency: &mut u64, vehicle: &mut VehicleState) -> Result<u64, ShopError> {
    if vehicle.health >= MAX_HEALTH {
        return Err(ShopError::NothingToRepair);
    }
    charge(currency, REPAIR_COST)?;
    vehicle.health = MAX_HEALTH;
    Ok(REPAIR_COST)
}

/// Buy the next level on one track. Returns the new level.
pub fn purchase_upgrade(
    currency: &mut u64,
    upgrades: &mut Upgrades,
    kind: UpgradeKind,
) -> Result<u8, ShopError> {
    let level = upgrades.level(kind);
    if level >= MAX_UPGRADE_LEVEL {
        return Err(ShopError::MaxLevel(kind));
    }
    charge(currency, upgrade_cost(level))?;
    let slot = upgrades.level_mut(kind);
    *slot += 1;
    Ok(*slot)
}

/// Switch to `model`, buying it first if it is not unlocked yet.
///
/// A fresh purchase comes with a fully repaired vehicle.
pub fn select_model(
    currency: &mut u64,
    unlocked: &mut Vec<VehicleModel>,
    vehicle: &mut VehicleState,
    model: VehicleModel,
) -> Result<ModelSelection, ShopError> {
    if unlocked.contains(&model) {
        vehicle.model = model;
        return Ok(ModelSelection::Switched);
    }

    let price = model.spec().price;
    charge(currency, price)?;
    unlocked.push(model);
    vehicle.model = model;
    vehicle.health = MAX_HEALTH;
    Ok(ModelSelection::Purchased { price })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn vehicle() -> VehicleState {
        VehicleState::parked(VehicleModel::Light, Vec2::ZERO, 1500.0)
    }

    #[test]
    fn test_upgrade_costs() {
        assert_eq!(upgrade_cost(0), 400);
        assert_eq!(upgrade_cost(4), 2000);
    }

    #[test]
    fn test_purchase_upgrade_until_max() {
        let mut currency = 100_000;
        let mut upgrades = Upgrades::default();
        for expected in 1..=5 {
            assert_eq!(
                purchase_upgrade(&mut currency, &mut upgrades, UpgradeKind::Chassis),
                Ok(expected)
            );
        }
        assert_eq!(currency, 100_000 - (400 + 800 + 1200 + 1600 + 2000));
        assert_eq!(
            purchase_upgrade(&mut currency, &mut upgrades, UpgradeKind::Chassis),
            Err(ShopError::MaxLevel(UpgradeKind::Chassis))
        );
        assert_eq!(upgrades.engine, 0);
    }

    #[test]
    fn test_upgrade_insufficient_funds_leaves_state() {
        let mut currency = 399;
        let mut upgrades = Upgrades::default();
        let err = purchase_upgrade(&mut currency, &mut upgrades, UpgradeKind::Engine).unwrap_err();
        assert_eq!(
            err,
            ShopError::InsufficientFunds {
                cost: 400,
                available: 399
            }
        );
        assert_eq!(currency, 399);
        assert_eq!(upgrades, Upgrades::default());
    }

    #[test]
    fn test_repair() {
        let mut currency = 300;
        let mut v = vehicle();
        assert_eq!(repair_vehicle(&mut currency, &mut v), Err(ShopError::NothingToRepair));

        v.health = 12.0;
        assert_eq!(repair_vehicle(&mut currency, &mut v), Ok(250));
        assert_eq!(currency, 50);
        assert_eq!(v.health, 100.0);

        v.health = 40.0;
        assert!(matches!(
            repair_vehicle(&mut currency, &mut v),
            Err(ShopError::InsufficientFunds { .. })
        ));
        assert_eq!(v.health, 40.0);
    }

    #[test]
    fn test_buy_then_switch_back_for_free() {
        let mut currency = 2000;
        let mut unlocked = vec![VehicleModel::Light];
        let mut v = vehicle();
        v.health = 30.0;

        assert_eq!(
            select_model(&mut currency, &mut unlocked, &mut v, VehicleModel::Medium),
            Ok(ModelSelection::Purchased { price: 1500 })
        );
        assert_eq!(currency, 500);
        assert_eq!(v.model, VehicleModel::Medium);
        assert_eq!(v.health, 100.0);

        assert_eq!(
            select_model(&mut currency, &mut unlocked, &mut v, VehicleModel::Light),
            Ok(ModelSelection::Switched)
        );
        assert_eq!(currency, 500);
        assert_eq!(v.model, VehicleModel::Light);

        assert!(select_model(&mut currency, &mut unlocked, &mut v, VehicleModel::Heavy).is_err());
        assert_eq!(unlocked, vec![VehicleModel::Light, VehicleModel::Medium]);
    }

    #[test]
    fn test_clamped_upgrades() {
        let upgrades = Upgrades {
            engine: 9,
            chassis: 2,
            radar: 200,
        }
        .clamped();
        assert_eq!(upgrades, Upgrades { engine: 5, chassis: 2, radar: 5 });
    }
}
