// Copyright @yucwang 2026

use crate::lights::point::falloff_factor;
use crate::lights::{ Light, LightSample };
use crate::math::color::{ self, Color };
use crate::math::constants::{ Float, Vector3f };
use crate::occluders::{ NullOccluder, Occluder };
use crate::phase::K_ISOTROPIC;
use crate::render::state::LightSampleState;

use std::sync::Arc;

/// Cone-restricted point light. Full intensity inside the start angle,
/// a quartic rolloff out to the width angle, dark beyond it.
pub struct SpotLight {
    ws_p: Vector3f,
    direction: Vector3f,
    intensity: Color,
    cos_width: Float,
    cos_start: Float,
    falloff_enabled: bool,
    soft_rolloff: bool,
    occluder: Arc<dyn Occluder>,
}

impl SpotLight {
    pub fn new(ws_p: Vector3f, direction: Vector3f) -> Self {
        Self {
            ws_p,
            direction: direction.normalize(),
            intensity: color::one() / K_ISOTROPIC,
            cos_width: 0.0,
            cos_start: 0.0,
            falloff_enabled: false,
            soft_rolloff: true,
            occluder: Arc::new(NullOccluder),
        }
    }

    pub fn set_intensity(&mut self, intensity: Color) {
        self.intensity = intensity / K_ISOTROPIC;
    }

    /// Cone angles in radians, measured from the axis. `width` is the
    /// outer edge, `start` the end of the full-intensity core.
    pub fn set_cone_angles(&mut self, width: Float, start: Float) {
        self.cos_width = width.cos();
        self.cos_start = start.cos();
    }

    pub fn set_falloff_enabled(&mut self, enabled: bool) {
        self.falloff_enabled = enabled;
    }

    pub fn set_occluder(&mut self, occluder: Arc<dyn Occluder>) {
        self.occluder = occluder;
    }

    fn cone_falloff(&self, ws_p: Vector3f) -> Float {
        let cos_theta = (ws_p - self.ws_p).normalize().dot(&self.direction);
        if cos_theta < self.cos_width {
            0.0
        } else if cos_theta > self.cos_start {
            1.0
        } else {
            let delta = (cos_theta - self.cos_width) /
                (self.cos_start - self.cos_width);
            delta * delta * delta * delta
        }
    }
}

impl Light for SpotLight {
    fn sample(&self, state: &LightSampleState) -> LightSample {
        let cone = self.cone_falloff(state.ws_p);
        let distance = falloff_factor(self.falloff_enabled, self.soft_rolloff,
                                      state.ws_p, self.ws_p);
        LightSample::new(self.intensity * cone * distance, self.ws_p)
    }

    fn occluder(&self) -> Arc<dyn Occluder> {
        self.occluder.clone()
    }
}

/* Tests for SpotLight */
