//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied delta-time only; tornado pursuit on a fixed interval
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod damage;
pub mod destruction;
pub mod economy;
pub mod particles;
pub mod registry;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod tornado;
pub mod vehicle;

pub use clock::{DayClock, DayPhase};
pub use damage::{DamageReport, apply_tornado_damage, damage_rate};
pub use destruction::{DestructionEvent, DestructionKind};
pub use economy::{ModelSelection, ShopError, UpgradeKind, Upgrades};
pub use particles::{Debris, DebrisEmitter};
pub use registry::{DestructibleObject, HOUSE_ID, Registry, Structure};
pub use state::{GameEvent, GameState, PlayerState, Radar, SessionPhase};
pub use terrain::elevation;
pub use tick::{TickInput, tick};
pub use tornado::{TornadoController, TornadoState};
pub use vehicle::{DriveInput, FlightStatus, VehicleModel, VehicleState};
