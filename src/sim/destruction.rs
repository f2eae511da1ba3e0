//! Destruction evaluator
//!
//! Sole writer of destroyed flags. Each call sweeps the registry and the house
//! against the tornado position and reports exactly one event per
//! false → true transition, together with the currency it earns.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::registry::{Registry, Structure};
use crate::consts::*;
use crate::planar_distance_sq;

/// What kind of object was destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestructionKind {
    /// Trees
    Vegetation,
    /// The house
    Structure,
}

impl DestructionKind {
    /// One-time currency reward for destroying an object of this kind
    pub fn reward(self) -> u64 {
        match self {
            DestructionKind::Vegetation => TREE_REWARD,
            DestructionKind::Structure => HOUSE_REWARD,
        }
    }
}

/// One-shot notification that an object was destroyed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DestructionEvent {
    pub id: u32,
    pub position: Vec3,
    pub kind: DestructionKind,
}

/// Sweep trees and the house around `tornado`.
///
/// Events are appended to `events`; the returned value is the currency earned
/// by this call. Objects already destroyed are never revisited.
pub fn evaluate(
    tornado: Vec3,
    trees: &mut Registry,
    house: &mut Structure,
    events: &mut Vec<DestructionEvent>,
) -> u64 {
    if !tornado.is_finite() {
        return 0;
    }

    let mut earned = 0;

    trees.sweep(tornado, TREE_KILL_RADIUS_SQ, |tree| {
        log::debug!("Tree {} destroyed at {:?}", tree.id, tree.position);
        earned = DestructionKind::Vegetation.reward().saturating_add(earned);
        events.push(DestructionEvent {
            id: tree.id,
            position: tree.position,
            kind: DestructionKind::Vegetation,
        });
    });

    if !house.destroyed
        && planar_distance_sq(house.position, tornado) < HOUSE_KILL_RADIUS * HOUSE_KILL_RADIUS
        && house.mark_destroyed()
    {
        log::info!("House destroyed at {:?}", house.position);
        earned = DestructionKind::Structure.reward().saturating_add(earned);
        events.push(DestructionEvent {
            id: house.id,
            position: house.position,
            kind: DestructionKind::Structure,
        });
    }

    earned
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn far_house() -> Structure {
        Structure::house(Vec2::new(500.0, 500.0), 1500.0)
    }

    #[test]
    fn test_tree_clear_scenario() {
        let mut trees = Registry::from_placements(&[(Vec3::new(10.0, 2.0, 10.0), 4.0)]);
        let mut house = far_house();
        let mut events = Vec::new();
        let mut currency = 0;

        // Just outside radius 8
        currency += evaluate(Vec3::new(18.5, 0.0, 10.0), &mut trees, &mut house, &mut events);
        assert!(events.is_empty());

        currency += evaluate(Vec3::new(14.0, 0.0, 13.0), &mut trees, &mut house, &mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, DestructionKind::Vegetation);
        assert_eq!(events[0].id, 0);
        assert_eq!(currency, 25);
        assert!(trees.get(0).unwrap().destroyed);

        // Re-checking in range produces nothing further
        for _ in 0..10 {
            currency += evaluate(Vec3::new(10.0, 0.0, 10.0), &mut trees, &mut house, &mut events);
        }
        assert_eq!(events.len(), 1);
        assert_eq!(currency, 25);
    }

    #[test]
    fn test_house_destruction_reward() {
        let mut trees = Registry::default();
        let mut house = Structure::house(Vec2::ZERO, 1500.0);
        let mut events = Vec::new();
        let mut currency = 0;

        currency += evaluate(Vec3::new(46.0, 0.0, 0.0), &mut trees, &mut house, &mut events);
        assert!(!house.destroyed);

        for step in 0..20 {
            let pos = Vec3::new(44.0 - step as f32, 0.0, 0.0);
            currency += evaluate(pos, &mut trees, &mut house, &mut events);
        }

        assert!(house.destroyed);
        assert_eq!(currency, 1000);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, DestructionKind::Structure);
    }

    #[test]
    fn test_multiple_trees_one_event_each() {
        let mut trees = Registry::from_placements(&[
            (Vec3::new(0.0, 0.0, 0.0), 3.0),
            (Vec3::new(2.0, 0.0, 2.0), 3.0),
            (Vec3::new(-4.0, 0.0, 4.0), 3.0),
            (Vec3::new(40.0, 0.0, 0.0), 3.0),
        ]);
        let mut house = far_house();
        let mut events = Vec::new();

        let earned = evaluate(Vec3::ZERO, &mut trees, &mut house, &mut events);
        assert_eq!(earned, 75);
        let ids: Vec<u32> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(trees.live_count(), 1);
    }

    #[test]
    fn test_non_finite_tornado_is_noop() {
        let mut trees = Registry::from_placements(&[(Vec3::ZERO, 3.0)]);
        let mut house = Structure::house(Vec2::ZERO, 1500.0);
        let mut events = Vec::new();

        let earned = evaluate(Vec3::new(f32::NAN, 0.0, 0.0), &mut trees, &mut house, &mut events);
        assert_eq!(earned, 0);
        assert!(events.is_empty());
        assert!(!house.destroyed);
    }

    #[test]
    fn test_restored_tree_never_rewarded() {
        let mut trees = Registry::from_placements(&[(Vec3::ZERO, 3.0)]);
        trees.restore_destroyed(&[1]);
        let mut house = far_house();
        let mut events = Vec::new();

        assert_eq!(evaluate(Vec3::ZERO, &mut trees, &mut house, &mut events), 0);
        assert!(events.is_empty());
    }
}
