//! Star field backdrop: random points scattered through a cube around the planet.

use bytemuck::{Pod, Zeroable};
use rand::Rng;

use crate::params::StarFieldParams;

/// Per-instance star data uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct StarInstance {
    pub position: [f32; 3],
}

/// Immutable set of star positions, generated once per scene
pub struct StarField {
    pub stars: Vec<StarInstance>,
    half_extent: f32,
}

impl StarField {
    /// Scatter `params.count` stars uniformly inside `[-half_extent, half_extent]³`
    ///
    /// Not seeded from anything persistent: every run gets a different sky.
    pub fn generate<R: Rng + ?Sized>(params: &StarFieldParams, rng: &mut R) -> Self {
        let h = params.half_extent.abs();
        let stars = (0..params.count)
            .map(|_| StarInstance {
                position: [
                    rng.random_range(-h..=h),
                    rng.random_range(-h..=h),
                    rng.random_range(-h..=h),
                ],
            })
            .collect();

        Self {
            stars,
            half_extent: h,
        }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }
}
