// Copyright @yucwang 2026

use crate::lights::{ Light, LightSample };
use crate::math::color::{ self, Color };
use crate::math::constants::{ Float, Vector3f };
use crate::occluders::{ NullOccluder, Occluder };
use crate::phase::K_ISOTROPIC;
use crate::render::state::LightSampleState;

use std::sync::Arc;

/// Distance falloff shared by the concrete light types. The soft
/// rolloff clamps the inverse-square blowup close to the source.
pub(super) fn falloff_factor(enabled: bool, soft_rolloff: bool,
                             p1: Vector3f, p2: Vector3f) -> Float {
    if !enabled {
        return 1.0;
    }
    let distance_sq = (p1 - p2).norm_squared();
    if soft_rolloff && distance_sq < 1.0 {
        (1.0 / distance_sq).powf(0.25)
    } else {
        1.0 / distance_sq
    }
}

/// Omnidirectional light at a single point. Intensity is stored
/// pre-divided by the isotropic phase constant so that an isotropic
/// medium lit at unit distance scatters the nominal color.
pub struct PointLight {
    ws_p: Vector3f,
    intensity: Color,
    falloff_enabled: bool,
    soft_rolloff: bool,
    occluder: Arc<dyn Occluder>,
}

impl PointLight {
    pub fn new(ws_p: Vector3f) -> Self {
        Self {
            ws_p,
            intensity: color::one() / K_ISOTROPIC,
            falloff_enabled: false,
            soft_rolloff: true,
            occluder: Arc::new(NullOccluder),
        }
    }

    pub fn set_intensity(&mut self, intensity: Color) {
        self.intensity = intensity / K_ISOTROPIC;
    }

    pub fn set_falloff_enabled(&mut self, enabled: bool) {
        self.falloff_enabled = enabled;
    }

    pub fn set_occluder(&mut self, occluder: Arc<dyn Occluder>) {
        self.occluder = occluder;
    }

    pub fn position(&self) -> Vector3f {
        self.ws_p
    }
}

impl Light for PointLight {
    fn sample(&self, state: &LightSampleState) -> LightSample {
        let falloff = falloff_factor(self.falloff_enabled, self.soft_rolloff,
                                     state.ws_p, self.ws_p);
        LightSample::new(self.intensity * falloff, self.ws_p)
    }

    fn occluder(&self) -> Arc<dyn Occluder> {
        self.occluder.clone()
    }
}

/* Tests for PointLight */
