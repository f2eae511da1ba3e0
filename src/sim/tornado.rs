//! Tornado motion controller
//!
//! Pure pursuit: every pursuit tick the tornado moves a fixed distance toward
//! the player's last known position and is re-clamped to the terrain. Pursuit
//! ticks run on a slower fixed interval than render ticks; the controller
//! accumulates render delta-time and steps whenever a full interval is banked.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::clock::DayPhase;
use super::terrain::{elevation, snap_to_ground};
use crate::config::SimConfig;
use crate::consts::MAX_PURSUIT_STEPS_PER_FRAME;
use crate::ground_point;

/// Read-only tornado snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TornadoState {
    pub position: Vec3,
    /// True while it is night
    pub active: bool,
}

/// One pursuit step from `position` toward `target`.
///
/// A zero-length separation yields no displacement. The result always sits on
/// the terrain surface.
pub fn pursue(position: Vec3, target: Vec3, step: f32, world_size: f32) -> Vec3 {
    let direction = (target - position).normalize_or_zero();
    snap_to_ground(position + direction * step, world_size)
}

/// Owns the tornado state and its fixed-interval pursuit schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TornadoController {
    state: TornadoState,
    /// Banked time toward the next pursuit step (seconds)
    accumulator: f32,
    /// Seconds between pursuit steps
    interval: f32,
    /// Distance per pursuit step
    step: f32,
    /// Total pursuit steps taken this session
    steps_taken: u64,
}

impl TornadoController {
    pub fn new(config: &SimConfig) -> Self {
        Self::at(config.tornado_start, config)
    }

    /// Start inactive at `xz`, on the ground
    pub fn at(xz: Vec2, config: &SimConfig) -> Self {
        Self {
            state: TornadoState {
                position: ground_point(xz, elevation(xz.x, xz.y, config.world_size)),
                active: false,
            },
            accumulator: 0.0,
            interval: config.pursuit_interval_secs,
            step: config.pursuit_step,
            steps_taken: 0,
        }
    }

    pub fn state(&self) -> &TornadoState {
        &self.state
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Follow the day/night phase. Returns the new activity flag when it changes.
    ///
    /// Deactivation freezes the position and drops any banked time, so the
    /// next night resumes from the same spot.
    pub fn set_phase(&mut self, phase: DayPhase) -> Option<bool> {
        let active = phase == DayPhase::Night;
        if active == self.state.active {
            return None;
        }
        self.state.active = active;
        self.accumulator = 0.0;
        if active {
            log::info!("Tornado touched down at {:?}", self.state.position);
        } else {
            log::info!("Tornado dissipated at {:?}", self.state.position);
        }
        Some(active)
    }

    /// Bank `dt` and run any due pursuit steps toward `player`.
    ///
    /// Returns the number of steps taken. Inactive controllers and invalid
    /// inputs (non-finite or negative dt, non-finite target) do nothing.
    pub fn advance(&mut self, dt: f32, player: Vec3, world_size: f32) -> u32 {
        if !self.state.active || !dt.is_finite() || dt < 0.0 || !player.is_finite() {
            return 0;
        }

        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= self.interval && steps < MAX_PURSUIT_STEPS_PER_FRAME {
            self.state.position = pursue(self.state.position, player, self.step, world_size);
            self.accumulator -= self.interval;
            steps += 1;
        }

        if self.accumulator >= self.interval {
            log::debug!(
                "Pursuit fell behind by {:.2}s, dropping backlog",
                self.accumulator
            );
            self.accumulator %= self.interval;
        }

        self.steps_taken += u64::from(steps);
        steps
    }

    /// Place the tornado (used when rehydrating a save)
    pub(crate) fn relocate(&mut self, xz: Vec2, world_size: f32) {
        self.state.position = ground_point(xz, elevation(xz.x, xz.y, world_size));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planar_distance;
    use proptest::prelude::*;

    const SIZE: f32 = 1500.0;

    fn active_controller(xz: Vec2) -> TornadoController {
        let mut controller = TornadoController::at(xz, &SimConfig::default());
        controller.set_phase(DayPhase::Night);
        controller
    }

    #[test]
    fn test_pursue_moves_fixed_step_on_flat_ground() {
        // sin(0) = 0 along x = 0, so the line x = 0 is flat
        let next = pursue(Vec3::new(0.0, 0.0, 100.0), Vec3::new(0.0, 0.0, 0.0), 5.5, SIZE);
        assert!((next.z - 94.5).abs() < 1e-4);
        assert_eq!(next.x, 0.0);
        assert_eq!(next.y, 0.0);
    }

    #[test]
    fn test_pursue_zero_separation_stays_put() {
        let here = Vec3::new(40.0, elevation(40.0, 40.0, SIZE), 40.0);
        let next = pursue(here, here, 5.5, SIZE);
        assert_eq!(next, here);
        assert!(next.is_finite());
    }

    #[test]
    fn test_height_tracks_terrain() {
        let mut controller = active_controller(Vec2::new(300.0, -200.0));
        let player = Vec3::new(0.0, 1.8, 0.0);
        for _ in 0..40 {
            controller.advance(0.5, player, SIZE);
            let p = controller.position();
            assert_eq!(p.y, elevation(p.x, p.z, SIZE));
        }
    }

    #[test]
    fn test_fixed_interval_schedule() {
        let mut controller = active_controller(Vec2::new(200.0, 0.0));
        let player = Vec3::ZERO;

        // 0.125 s frames: a step every fourth frame
        let mut steps = Vec::new();
        for _ in 0..8 {
            steps.push(controller.advance(0.125, player, SIZE));
        }
        assert_eq!(steps, vec![0, 0, 0, 1, 0, 0, 0, 1]);
        assert_eq!(controller.steps_taken(), 2);
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut controller = active_controller(Vec2::new(400.0, 0.0));
        let taken = controller.advance(10.0, Vec3::ZERO, SIZE);
        assert_eq!(taken, MAX_PURSUIT_STEPS_PER_FRAME);
        // Backlog dropped: the next short frame does not burst
        assert_eq!(controller.advance(0.125, Vec3::ZERO, SIZE), 0);
    }

    #[test]
    fn test_inactive_does_not_move() {
        let mut controller = TornadoController::new(&SimConfig::default());
        let start = controller.position();
        assert_eq!(controller.advance(5.0, Vec3::ZERO, SIZE), 0);
        assert_eq!(controller.position(), start);
    }

    #[test]
    fn test_deactivation_freezes_and_resumes() {
        let mut controller = active_controller(Vec2::new(300.0, 300.0));
        controller.advance(0.5, Vec3::ZERO, SIZE);
        controller.advance(0.25, Vec3::ZERO, SIZE);
        let frozen = controller.position();

        assert_eq!(controller.set_phase(DayPhase::Day), Some(false));
        controller.advance(3.0, Vec3::ZERO, SIZE);
        assert_eq!(controller.position(), frozen);

        assert_eq!(controller.set_phase(DayPhase::Night), Some(true));
        // Banked 0.25 s was discarded on deactivation
        assert_eq!(controller.advance(0.25, Vec3::ZERO, SIZE), 0);
        assert_eq!(controller.position(), frozen);
        assert_eq!(controller.advance(0.25, Vec3::ZERO, SIZE), 1);
        assert!(planar_distance(controller.position(), Vec3::ZERO) < planar_distance(frozen, Vec3::ZERO));
    }

    #[test]
    fn test_set_phase_is_idempotent() {
        let mut controller = active_controller(Vec2::ZERO);
        assert_eq!(controller.set_phase(DayPhase::Night), None);
    }

    #[test]
    fn test_invalid_inputs_skip_tick() {
        let mut controller = active_controller(Vec2::new(100.0, 0.0));
        let start = controller.position();
        assert_eq!(controller.advance(-1.0, Vec3::ZERO, SIZE), 0);
        assert_eq!(controller.advance(f32::NAN, Vec3::ZERO, SIZE), 0);
        assert_eq!(controller.advance(1.0, Vec3::new(f32::NAN, 0.0, 0.0), SIZE), 0);
        assert_eq!(controller.position(), start);
    }

    proptest! {
        #[test]
        fn pursuit_converges_without_diverging(
            tx in -600.0f32..600.0,
            tz in -600.0f32..600.0,
            px in -600.0f32..600.0,
            pz in -600.0f32..600.0,
        ) {
            let step = 5.5;
            let player = Vec3::new(px, elevation(px, pz, SIZE) + 1.8, pz);
            let mut position = Vec3::new(tx, elevation(tx, tz, SIZE), tz);
            let start = planar_distance(position, player);
            prop_assume!(start > step);

            let mut reached = false;
            for _ in 0..1000 {
                let before = planar_distance(position, player);
                position = pursue(position, player, step, SIZE);
                let after = planar_distance(position, player);
                if before > step {
                    prop_assert!(after < before);
                } else {
                    reached = true;
                    prop_assert!(after <= step + 1e-3);
                }
            }
            prop_assert!(reached);
        }
    }
}
