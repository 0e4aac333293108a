// Copyright @yucwang 2026

pub mod point;
pub mod spot;

use crate::math::color::Color;
use crate::math::constants::Vector3f;
use crate::occluders::Occluder;
use crate::render::state::LightSampleState;

use std::sync::Arc;

/// One light evaluation: the unoccluded radiance arriving at the
/// shading point and the position the light was sampled at, which the
/// caller feeds to the light's occluder.
pub struct LightSample {
    pub luminance: Color,
    pub ws_p: Vector3f,
}

impl LightSample {
    pub fn new(luminance: Color, ws_p: Vector3f) -> Self {
        Self { luminance, ws_p }
    }
}

/// A light source paired with the occluder that shadows it.
/// Implementations must be safe for concurrent read-only access.
pub trait Light: Send + Sync {
    fn sample(&self, state: &LightSampleState) -> LightSample;
    fn occluder(&self) -> Arc<dyn Occluder>;
}
