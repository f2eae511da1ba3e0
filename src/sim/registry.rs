//! Destructible registry
//!
//! Trees live in a flat arena indexed by id (`objects[id].id == id`). The
//! destroyed flag is the only mutable field and only ever goes false → true.
//! Destroyed entries stay in place as tombstones so ids remain stable; scans
//! skip them before computing any distance.

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::terrain::elevation;
use crate::config::SimConfig;
use crate::{ground_point, planar_distance_sq};

/// Id reserved for the house so it never collides with tree ids
pub const HOUSE_ID: u32 = u32::MAX;

/// A static world object that the tornado can destroy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DestructibleObject {
    pub id: u32,
    pub position: Vec3,
    pub scale: f32,
    pub destroyed: bool,
}

/// All trees in the world
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    objects: Vec<DestructibleObject>,
    destroyed_count: usize,
}

impl Registry {
    /// Scatter `config.tree_count` trees with pre-sampled terrain height
    pub fn generate(config: &SimConfig, rng: &mut Pcg32) -> Self {
        let half = config.tree_spread / 2.0;
        let objects = (0..config.tree_count)
            .map(|id| {
                let x = rng.random_range(-half..half);
                let z = rng.random_range(-half..half);
                let scale = rng.random_range(config.tree_scale_min..=config.tree_scale_max);
                DestructibleObject {
                    id,
                    position: Vec3::new(x, elevation(x, z, config.world_size), z),
                    scale,
                    destroyed: false,
                }
            })
            .collect();

        log::debug!("Generated {} trees", config.tree_count);
        Self {
            objects,
            destroyed_count: 0,
        }
    }

    /// Build a registry from explicit (position, scale) pairs; ids follow order
    pub fn from_placements(placements: &[(Vec3, f32)]) -> Self {
        let objects = placements
            .iter()
            .enumerate()
            .map(|(i, &(position, scale))| DestructibleObject {
                id: i as u32,
                position,
                scale,
                destroyed: false,
            })
            .collect();
        Self {
            objects,
            destroyed_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed_count
    }

    pub fn live_count(&self) -> usize {
        self.objects.len() - self.destroyed_count
    }

    pub fn get(&self, id: u32) -> Option<&DestructibleObject> {
        self.objects.get(id as usize)
    }

    /// Every object, tombstones included (read-only snapshot for rendering)
    pub fn objects(&self) -> &[DestructibleObject] {
        &self.objects
    }

    /// Objects still standing
    pub fn live(&self) -> impl Iterator<Item = &DestructibleObject> {
        self.objects.iter().filter(|o| !o.destroyed)
    }

    /// Is any standing object within `radius` of `point` on the ground plane?
    pub fn any_within(&self, point: Vec3, radius: f32) -> bool {
        let radius_sq = radius * radius;
        self.live()
            .any(|o| planar_distance_sq(o.position, point) < radius_sq)
    }

    /// Mark every standing object strictly inside `radius_sq` of `center` as
    /// destroyed, calling `on_destroyed` once per transition.
    ///
    /// Only the destruction evaluator calls this.
    pub(crate) fn sweep(
        &mut self,
        center: Vec3,
        radius_sq: f32,
        mut on_destroyed: impl FnMut(&DestructibleObject),
    ) -> usize {
        let mut count = 0;
        for object in &mut self.objects {
            if object.destroyed {
                continue;
            }
            if planar_distance_sq(object.position, center) < radius_sq {
                object.destroyed = true;
                count += 1;
                on_destroyed(object);
            }
        }
        self.destroyed_count += count;
        count
    }

    /// Pack destroyed flags into 64-bit words (bit `i` = tree id `i`)
    pub fn destroyed_bitset(&self) -> Vec<u64> {
        let mut words = vec![0u64; self.objects.len().div_ceil(64)];
        for object in self.objects.iter().filter(|o| o.destroyed) {
            let i = object.id as usize;
            words[i / 64] |= 1u64 << (i % 64);
        }
        words
    }

    /// Re-apply destroyed flags from a save. Bits past the registry length are
    /// ignored. Flags are only ever set, never cleared.
    pub(crate) fn restore_destroyed(&mut self, words: &[u64]) {
        for object in &mut self.objects {
            let i = object.id as usize;
            let set = words
                .get(i / 64)
                .is_some_and(|word| *word & (1u64 << (i % 64)) != 0);
            if set && !object.destroyed {
                object.destroyed = true;
                self.destroyed_count += 1;
            }
        }
    }
}

/// The house: a single destructible with no partial damage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub id: u32,
    pub position: Vec3,
    pub destroyed: bool,
}

impl Structure {
    pub fn house(xz: Vec2, world_size: f32) -> Self {
        Self {
            id: HOUSE_ID,
            position: ground_point(xz, elevation(xz.x, xz.y, world_size)),
            destroyed: false,
        }
    }

    /// Flip the destroyed flag; true only on the transition
    pub(crate) fn mark_destroyed(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        true
    }
}
