//! Destruction debris
//!
//! Cosmetic only. Each destruction event spawns a burst of tumbling chunks
//! that fall under gravity and fade out. Nothing here feeds back into the
//! simulation.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::destruction::{DestructionEvent, DestructionKind};
use crate::consts::*;

/// A single debris chunk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Debris {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Euler angles (rad)
    pub rotation: Vec3,
    /// Angular velocity (rad/s)
    pub spin: Vec3,
    /// 1 → 0, decreasing linearly
    pub life: f32,
    pub kind: DestructionKind,
}

impl Debris {
    /// Render scale: chunks shrink as they fade
    pub fn scale(&self) -> f32 {
        let base = match self.kind {
            DestructionKind::Vegetation => 1.5,
            DestructionKind::Structure => 2.5,
        };
        self.life.max(0.0) * base
    }
}

/// Burst size per destruction kind
pub fn burst_size(kind: DestructionKind) -> usize {
    match kind {
        DestructionKind::Vegetation => VEGETATION_BURST,
        DestructionKind::Structure => STRUCTURE_BURST,
    }
}

/// Horizontal velocity spread per destruction kind
fn horizontal_spread(kind: DestructionKind) -> f32 {
    match kind {
        DestructionKind::Vegetation => 20.0,
        DestructionKind::Structure => 30.0,
    }
}

/// Owns all live debris
#[derive(Debug, Clone)]
pub struct DebrisEmitter {
    particles: Vec<Debris>,
    rng: Pcg32,
    capacity: usize,
}

impl DebrisEmitter {
    pub fn new(seed: u64, capacity: usize) -> Self {
        Self {
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            capacity,
        }
    }

    pub fn particles(&self) -> &[Debris] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Spawn a burst for `event`. Chunks past the capacity are dropped.
    pub fn emit(&mut self, event: &DestructionEvent) {
        let room = self.capacity.saturating_sub(self.particles.len());
        let count = burst_size(event.kind).min(room);
        if count < burst_size(event.kind) {
            log::debug!("Debris cap reached, spawning {} of {}", count, burst_size(event.kind));
        }

        let spread = horizontal_spread(event.kind);
        let rng = &mut self.rng;
        self.particles.extend((0..count).map(|_| Debris {
            position: event.position + Vec3::new(0.0, rng.random::<f32>() * 5.0, 0.0),
            velocity: Vec3::new(
                (rng.random::<f32>() - 0.5) * spread,
                15.0 + rng.random::<f32>() * 20.0,
                (rng.random::<f32>() - 0.5) * spread,
            ),
            rotation: Vec3::new(
                rng.random::<f32>() * std::f32::consts::PI,
                rng.random::<f32>() * std::f32::consts::PI,
                0.0,
            ),
            spin: Vec3::new(
                rng.random::<f32>() * 5.0,
                rng.random::<f32>() * 5.0,
                rng.random::<f32>() * 5.0,
            ),
            life: 1.0,
            kind: event.kind,
        }));
    }

    /// Integrate all debris and drop anything faded out or below the floor
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        for p in &mut self.particles {
            p.position += p.velocity * dt;
            p.velocity.y -= DEBRIS_GRAVITY * dt;
            p.life -= dt * DEBRIS_LIFE_DECAY;
            p.rotation += p.spin * dt;
        }
        self.particles
            .retain(|p| p.life > 0.0 && p.position.y >= DEBRIS_FLOOR);
    }
}
