//! Terrain height field
//!
//! A closed-form elevation function: gentle sinusoidal hills plus a wall that
//! rises quadratically past the play-area margin, forming a bowl that keeps
//! everything inside the world without hard collision.

use glam::Vec3;

use crate::consts::*;

/// Elevation at world-space (x, z) for a square world of side `world_size`
#[inline]
pub fn elevation(x: f32, z: f32, world_size: f32) -> f32 {
    base_undulation(x, z) + wall_term(x, z, world_size)
}

/// Rolling hills, ±8 units
#[inline]
pub fn base_undulation(x: f32, z: f32) -> f32 {
    (x / TERRAIN_WAVELENGTH).sin() * (z / TERRAIN_WAVELENGTH).cos() * TERRAIN_AMPLITUDE
}

/// Boundary wall contribution
///
/// Zero up to `world_size / 2 - EDGE_MARGIN` (measured with the Chebyshev
/// distance from the origin), then grows with the square of the overshoot.
#[inline]
pub fn wall_term(x: f32, z: f32, world_size: f32) -> f32 {
    let edge_dist = x.abs().max(z.abs());
    let overshoot = (edge_dist - wall_threshold(world_size)).max(0.0);
    let factor = overshoot / EDGE_MARGIN;
    factor * factor * EDGE_WALL_HEIGHT
}

/// Edge distance at which the wall starts rising
#[inline]
pub fn wall_threshold(world_size: f32) -> f32 {
    world_size / 2.0 - EDGE_MARGIN
}

/// Snap a point onto the terrain surface, keeping its (x, z)
#[inline]
pub fn snap_to_ground(point: Vec3, world_size: f32) -> Vec3 {
    Vec3::new(point.x, elevation(point.x, point.z, world_size), point.z)
}
