// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::color::{ self, Color };
use crate::math::constants::{ Float, Vector3f };
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;
use crate::phase::{ Isotropic, PhaseFunction };
use crate::render::interval::{ Interval, IntervalVec };
use crate::render::state::{ RayState, VolumeSampleState };
use crate::volumes::volume_attr::BoundAttr;
use crate::volumes::{ Volume, VolumeSample };

use std::sync::Arc;

/// Homogeneous box of constant attribute values, the simplest useful
/// medium and the reference case for analytic transmittance checks.
pub struct ConstantVolume {
    local_to_world: Transform,
    attr_names: Vec<String>,
    attr_values: Vec<Color>,
    max_attr_value: Float,
    step_length: Option<Float>,
    phase_function: Arc<dyn PhaseFunction>,
}

impl ConstantVolume {
    pub fn new(local_to_world: Transform) -> Self {
        Self {
            local_to_world,
            attr_names: Vec::new(),
            attr_values: Vec::new(),
            max_attr_value: 0.0,
            step_length: None,
            phase_function: Arc::new(Isotropic),
        }
    }

    pub fn add_attribute(&mut self, name: &str, value: Color) {
        match self.attr_names.iter().position(|n| n == name) {
            Some(idx) => self.attr_values[idx] = value,
            None => {
                self.attr_names.push(name.to_string());
                self.attr_values.push(value);
            }
        }
        self.max_attr_value = self.attr_values.iter()
            .map(|v| color::max_comp(*v))
            .fold(0.0, Float::max);
    }

    /// Overrides the default step length, which scales with the square
    /// root of the densest attribute value.
    pub fn set_step_length(&mut self, step_length: Float) {
        self.step_length = Some(step_length);
    }

    pub fn set_phase_function(&mut self, phase_function: Arc<dyn PhaseFunction>) {
        self.phase_function = phase_function;
    }
}

impl Volume for ConstantVolume {
    fn attribute_names(&self) -> &[String] {
        &self.attr_names
    }

    fn sample(&self, state: &VolumeSampleState, attribute: &BoundAttr)
            -> VolumeSample {
        let idx = match attribute.index() {
            Some(idx) if idx < self.attr_values.len() => idx,
            _ => return VolumeSample::new(color::zero(),
                                          self.phase_function.clone()),
        };

        let ls_p = self.local_to_world.inv_apply_point(state.ws_p);
        if !AABB::zero_one().contains(&ls_p) {
            return VolumeSample::new(color::zero(),
                                     self.phase_function.clone());
        }
        VolumeSample::new(self.attr_values[idx], self.phase_function.clone())
    }

    fn ws_bounds(&self) -> AABB {
        let mut bounds = AABB::default();
        for ls_p in AABB::zero_one().corner_points().iter() {
            bounds.expand_by_point(&self.local_to_world.apply_point(*ls_p));
        }
        bounds
    }

    fn intersect(&self, state: &RayState) -> IntervalVec {
        let ls_ray = Ray3f::new(
            self.local_to_world.inv_apply_point(state.ws_ray.origin()),
            self.local_to_world.inv_apply_vector(state.ws_ray.dir()));
        match AABB::zero_one().ray_intersect_range(&ls_ray, state.t_min,
                                                   state.t_max) {
            Some((t0, t1)) if t1 > t0 => {
                let step = match self.step_length {
                    Some(step) => step,
                    None if self.max_attr_value > 0.0 =>
                        (t1 - t0) / (self.max_attr_value.sqrt() * 20.0),
                    None => t1 - t0,
                };
                vec![Interval::new(t0, t1, step)]
            }
            _ => Vec::new(),
        }
    }

    fn phase_function(&self) -> Arc<dyn PhaseFunction> {
        self.phase_function.clone()
    }

    fn info(&self) -> Vec<String> {
        vec![format!("constant volume, attributes: {}",
                     self.attr_names.join(", "))]
    }
}

/* Tests for ConstantVolume */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volumes::volume_attr::VolumeAttr;

    fn unit_volume() -> ConstantVolume {
        let xform = Transform::from_translation_scale(
            Vector3f::new(-1.0, -1.0, -1.0), Vector3f::new(2.0, 2.0, 2.0));
        let mut volume = ConstantVolume::new(xform);
        volume.add_attribute("scattering", color::gray(0.5));
        volume
    }

    #[test]
    fn test_constant_value_inside_zero_outside() {
        let volume = unit_volume();
        let attr = VolumeAttr::new("scattering").bind(&volume);
        let ray_state = RayState::new(Ray3f::new(
            Vector3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0)));

        let inside = VolumeSampleState::new(&ray_state,
                                            Vector3f::new(0.5, 0.5, 0.5));
        assert_eq!(volume.sample(&inside, &attr).value, color::gray(0.5));

        let outside = VolumeSampleState::new(&ray_state,
                                             Vector3f::new(3.0, 0.0, 0.0));
        assert_eq!(volume.sample(&outside, &attr).value, color::zero());
    }

    #[test]
    fn test_intersect_and_step_override() {
        let mut volume = unit_volume();
        volume.set_step_length(0.125);
        let state = RayState::new(Ray3f::new(
            Vector3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0)));
        let intervals = volume.intersect(&state);
        assert_eq!(intervals.len(), 1);
        assert!((intervals[0].t0 - 4.0).abs() < 1e-9);
        assert!((intervals[0].t1 - 6.0).abs() < 1e-9);
        assert_eq!(intervals[0].step_length, 0.125);
    }

    #[test]
    fn test_default_step_scales_with_density() {
        let volume = unit_volume();
        let state = RayState::new(Ray3f::new(
            Vector3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0)));
        let intervals = volume.intersect(&state);
        assert_eq!(intervals.len(), 1);
        let expected = 2.0 / ((0.5 as Float).sqrt() * 20.0);
        assert!((intervals[0].step_length - expected).abs() < 1e-9);
    }
}
