// Copyright @yucwang 2026

pub mod density;
pub mod physical;
pub mod scattering;

use crate::math::color::{ self, Color };
use crate::render::scene::Scene;
use crate::render::state::VolumeSampleState;

/// Result of shading one raymarch step: the radiance produced at the
/// sample point and the extinction coefficient that attenuates
/// everything behind it.
pub struct RaymarchSample {
    pub luminance: Color,
    pub extinction: Color,
}

impl RaymarchSample {
    pub fn new(luminance: Color, extinction: Color) -> Self {
        Self { luminance, extinction }
    }

    pub fn zero() -> Self {
        Self::new(color::zero(), color::zero())
    }
}

/// Shading model applied at each raymarch step. Implementations bind
/// their volume attributes against the scene volume at construction,
/// so sampling involves no name lookups.
pub trait RaymarchSampler: Send + Sync {
    fn sample(&self, scene: &Scene, state: &VolumeSampleState)
            -> RaymarchSample;
}
