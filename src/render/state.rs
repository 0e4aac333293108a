// Copyright @yucwang 2026

use crate::math::constants::{ Float, Vector3f, FLOAT_MAX };
use crate::math::ray::Ray3f;

/// Distinguishes primary shading rays from secondary rays fired by
/// occluders, which only need transmittance and may skip the light loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RayType {
    FullRaymarch,
    TransmittanceOnly,
}

/// Per-ray context. Owned by the call stack of a single ray evaluation
/// and never shared across threads; secondary states are derived by
/// value construction.
#[derive(Debug, Clone)]
pub struct RayState {
    pub ws_ray: Ray3f,
    pub t_min: Float,
    pub t_max: Float,
    pub ray_depth: usize,
    pub ray_type: RayType,
    pub time: Float,
    pub do_output_deep_l: bool,
    pub do_output_deep_t: bool,
}

impl RayState {
    pub fn new(ws_ray: Ray3f) -> Self {
        Self {
            ws_ray,
            t_min: 0.0,
            t_max: FLOAT_MAX,
            ray_depth: 0,
            ray_type: RayType::FullRaymarch,
            time: 0.0,
            do_output_deep_l: false,
            do_output_deep_t: false,
        }
    }
}

/// Context for evaluating a volume at one world-space point.
pub struct VolumeSampleState<'a> {
    pub ray_state: &'a RayState,
    pub ws_p: Vector3f,
}

impl<'a> VolumeSampleState<'a> {
    pub fn new(ray_state: &'a RayState, ws_p: Vector3f) -> Self {
        Self { ray_state, ws_p }
    }
}

/// Context for evaluating a light at one world-space point.
pub struct LightSampleState<'a> {
    pub ray_state: &'a RayState,
    pub ws_p: Vector3f,
}

impl<'a> LightSampleState<'a> {
    pub fn new(ray_state: &'a RayState, ws_p: Vector3f) -> Self {
        Self { ray_state, ws_p }
    }
}

/// Context for evaluating the transmittance between a shading point and
/// a light sample position.
pub struct OcclusionSampleState<'a> {
    pub ray_state: &'a RayState,
    pub ws_p: Vector3f,
    pub ws_light_p: Vector3f,
}

impl<'a> OcclusionSampleState<'a> {
    pub fn new(ray_state: &'a RayState, ws_p: Vector3f,
               ws_light_p: Vector3f) -> Self {
        Self { ray_state, ws_p, ws_light_p }
    }

    /// Derives the state for a shadow ray towards the light sample:
    /// depth incremented, transmittance-only, bounded by the distance
    /// to the light.
    pub fn make_secondary_ray_state(&self) -> RayState {
        let to_light = self.ws_light_p - self.ws_p;
        let mut state = self.ray_state.clone();
        state.ray_depth += 1;
        state.ray_type = RayType::TransmittanceOnly;
        state.ws_ray = Ray3f::new_normalized(self.ws_p, to_light);
        state.t_min = 0.0;
        state.t_max = to_light.norm();
        state
    }
}

/* Tests for ray states */
