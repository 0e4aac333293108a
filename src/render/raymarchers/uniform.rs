// Copyright @yucwang 2026

use crate::math::color::{ self, Color };
use crate::math::constants::Float;
use crate::render::error::ConfigError;
use crate::render::interval::split_intervals;
use crate::render::params::ParamMap;
use crate::render::raymarchers::{ setup_deep_l_curve, setup_deep_t_curve,
                                  update_deep_functions, IntegrationResult,
                                  Raymarcher };
use crate::render::samplers::RaymarchSampler;
use crate::render::scene::Scene;
use crate::render::state::{ RayState, VolumeSampleState };
use crate::volumes::volume_attr::{ BoundAttr, VolumeAttr };
use crate::volumes::Volume;

use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Params {
    pub step_length: Float,
    pub use_volume_step_length: bool,
    pub volume_step_length_mult: Float,
    pub do_early_termination: bool,
    pub early_termination_threshold: Float,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            step_length: 1.0,
            use_volume_step_length: true,
            volume_step_length_mult: 1.0,
            do_early_termination: true,
            early_termination_threshold: 0.001,
        }
    }
}

/// Fixed-step integrator: each interval is covered with equally spaced
/// samples, attenuation uses the Beer-Lambert term per step, and
/// luminance accumulates front to back.
pub struct UniformRaymarcher {
    params: Params,
    sampler: Arc<dyn RaymarchSampler>,
    holdout_attr: BoundAttr,
}

impl UniformRaymarcher {
    pub fn new(sampler: Arc<dyn RaymarchSampler>) -> Self {
        Self {
            params: Params::default(),
            sampler,
            holdout_attr: BoundAttr::invalid(),
        }
    }

    pub fn set_params(&mut self, params: &ParamMap) -> Result<(), ConfigError> {
        if let Some(v) = params.float("step_length") {
            if v <= 0.0 {
                return Err(ConfigError::NonPositiveStepLength(v));
            }
            self.params.step_length = v;
        }
        if let Some(v) = params.int("use_volume_step_length") {
            self.params.use_volume_step_length = v != 0;
        }
        if let Some(v) = params.float("volume_step_length_multiplier") {
            if v <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "volume_step_length_multiplier".to_string(),
                    reason: "must be positive".to_string(),
                });
            }
            self.params.volume_step_length_mult = v;
        }
        if let Some(v) = params.int("do_early_termination") {
            self.params.do_early_termination = v != 0;
        }
        if let Some(v) = params.float("early_termination_threshold") {
            if v < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "early_termination_threshold".to_string(),
                    reason: "must be non-negative".to_string(),
                });
            }
            self.params.early_termination_threshold = v;
        }
        Ok(())
    }

    /// Resolves the holdout attribute against the scene volume. Must
    /// run before rendering for holdouts to take effect; unbound, the
    /// attribute samples zero and holdouts are a no-op.
    pub fn bind_holdout(&mut self, volume: &dyn Volume) {
        self.holdout_attr = VolumeAttr::new("holdout").bind(volume);
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

/// Per-step transmittance bookkeeping. On secondary rays the holdout
/// coefficient simply adds to extinction; on primary rays it is
/// tracked separately so the alpha output can distinguish media from
/// held-out geometry.
fn update_transmittance(state: &RayState, step_length: Float,
                        sigma_e: &mut Color, sigma_h: Color,
                        t_e: &mut Color, t_h: &mut Color,
                        t_alpha: &mut Color, t_m: &mut Color) {
    let mut exp_sigma_e = color::one();
    let mut exp_sigma_h = color::one();

    if state.ray_depth > 0 {
        *sigma_e += sigma_h;
    } else if color::max_comp(sigma_h) > 0.0 {
        exp_sigma_h = color::exp(-sigma_h * step_length);
        t_h.component_mul_assign(&exp_sigma_h);
    }

    if color::max_comp(*sigma_e) > 0.0 {
        exp_sigma_e = color::exp(-*sigma_e * step_length);
        t_e.component_mul_assign(&exp_sigma_e);
    }

    if state.ray_depth == 0 {
        *t_m = color::lerp(*t_alpha, *t_m, exp_sigma_h);
        *t_alpha = color::lerp(*t_m, *t_alpha, exp_sigma_e);
    }
}

impl Raymarcher for UniformRaymarcher {
    fn integrate(&self, scene: &Scene, state: &RayState) -> IntegrationResult {
        let raw_intervals = scene.volume.intersect(state);
        let intervals = split_intervals(&raw_intervals);

        if intervals.is_empty() {
            return IntegrationResult::empty();
        }

        let mut lf = setup_deep_l_curve(state, intervals[0].t0);
        let mut tf = setup_deep_t_curve(state, intervals[0].t0);

        let mut l = color::zero();
        let mut t_e = color::one();
        let mut t_h = color::one();
        let mut t_alpha = color::one();
        let mut t_m = color::zero();

        'interval_loop: for interval in intervals.iter() {
            let t_start = interval.t0.max(state.t_min);
            let t_end = interval.t1.min(state.t_max);

            let step_length_to_use = if self.params.use_volume_step_length {
                interval.step_length * self.params.volume_step_length_mult
            } else {
                self.params.step_length
            };
            let base_step_length = step_length_to_use.min(t_end - t_start);

            let mut step_t0 = t_start;
            let mut step_t1 = t_start + base_step_length;

            // Clipped-away or degenerate intervals would never advance.
            if step_t0 >= step_t1 {
                continue;
            }

            while step_t0 < t_end {
                let step_length = step_t1 - step_t0;
                let t = 0.5 * (step_t0 + step_t1);
                let sample_state = VolumeSampleState::new(
                    state, state.ws_ray.at(t));

                let ho_sample = scene.volume.sample(&sample_state,
                                                    &self.holdout_attr);
                let sample = self.sampler.sample(scene, &sample_state);

                let mut sigma_e = sample.extinction;
                update_transmittance(state, step_length, &mut sigma_e,
                                     ho_sample.value, &mut t_e, &mut t_h,
                                     &mut t_alpha, &mut t_m);

                l += step_length * sample.luminance
                    .component_mul(&t_e)
                    .component_mul(&t_h);

                let mut do_terminate = false;
                if self.params.do_early_termination &&
                        color::max_comp(t_e) <
                        self.params.early_termination_threshold {
                    t_e = color::zero();
                    t_alpha = color::zero();
                    do_terminate = true;
                }

                update_deep_functions(step_t1, l, t_e, &mut lf, &mut tf);

                step_t0 = step_t1;
                step_t1 = t_end.min(step_t1 + base_step_length);

                if do_terminate {
                    break 'interval_loop;
                }
            }
        }

        if let Some(curve) = tf.as_mut() {
            curve.remove_duplicates();
        }
        if let Some(curve) = lf.as_mut() {
            curve.remove_duplicates();
        }

        // Alpha on camera rays accounts for holdouts; secondary rays
        // report pure extinction transmittance.
        let transmittance = if state.ray_depth == 0 { t_alpha } else { t_e };
        IntegrationResult {
            luminance: l,
            transmittance,
            luminance_function: lf,
            transmittance_function: tf,
        }
    }
}

/* Tests for UniformRaymarcher */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3f;
    use crate::math::ray::Ray3f;
    use crate::math::transform::Transform;
    use crate::render::samplers::density::DensitySampler;
    use crate::volumes::constant_volume::ConstantVolume;

    fn constant_scene(density: Float, depth: Float) -> Scene {
        // A box stretched to the requested depth along z.
        let xform = Transform::from_translation_scale(
            Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(1.0, 1.0, depth));
        let mut volume = ConstantVolume::new(xform);
        volume.add_attribute("density", color::gray(density));
        volume.set_step_length(0.01);
        Scene::new(Arc::new(volume))
    }

    fn axial_state() -> RayState {
        RayState::new(Ray3f::new(Vector3f::new(0.5, 0.5, -1.0),
                                 Vector3f::new(0.0, 0.0, 1.0)))
    }

    fn marcher(scene: &Scene) -> UniformRaymarcher {
        UniformRaymarcher::new(Arc::new(
            DensitySampler::new(scene.volume.as_ref())))
    }

    #[test]
    fn test_beer_lambert_transmittance() {
        // Extinction 1 over distance 2 gives T = exp(-2).
        let scene = constant_scene(1.0, 2.0);
        let raymarcher = marcher(&scene);
        let result = raymarcher.integrate(&scene, &axial_state());
        let expected = (-2.0 as Float).exp();
        assert!((result.transmittance.x - expected).abs() < 1e-3,
                "got {}", result.transmittance.x);
    }

    #[test]
    fn test_empty_overlap_is_identity() {
        let scene = constant_scene(1.0, 2.0);
        let raymarcher = marcher(&scene);
        let state = RayState::new(Ray3f::new(
            Vector3f::new(5.0, 5.0, -1.0), Vector3f::new(0.0, 0.0, 1.0)));
        let result = raymarcher.integrate(&scene, &state);
        assert_eq!(result.luminance, color::zero());
        assert_eq!(result.transmittance, color::one());
    }

    #[test]
    fn test_early_termination_zeroes_transmittance() {
        let scene = constant_scene(20.0, 2.0);
        let mut raymarcher = marcher(&scene);
        let mut params = ParamMap::new();
        params.set_int("do_early_termination", 1)
              .set_float("early_termination_threshold", 0.01);
        raymarcher.set_params(&params).unwrap();

        let result = raymarcher.integrate(&scene, &axial_state());
        assert_eq!(result.transmittance, color::zero());
    }

    #[test]
    fn test_early_termination_never_brightens() {
        let scene = constant_scene(20.0, 2.0);
        let mut with_term = marcher(&scene);
        let mut without_term = marcher(&scene);
        let mut on = ParamMap::new();
        on.set_int("do_early_termination", 1);
        with_term.set_params(&on).unwrap();
        let mut off = ParamMap::new();
        off.set_int("do_early_termination", 0);
        without_term.set_params(&off).unwrap();

        let terminated = with_term.integrate(&scene, &axial_state());
        let full = without_term.integrate(&scene, &axial_state());
        assert!(terminated.luminance.x <= full.luminance.x + 1e-9);
        assert!((terminated.luminance.x - full.luminance.x).abs() < 5e-3);
    }

    #[test]
    fn test_deep_transmittance_is_monotonic() {
        let scene = constant_scene(1.0, 2.0);
        let raymarcher = marcher(&scene);
        let mut state = axial_state();
        state.do_output_deep_t = true;
        let result = raymarcher.integrate(&scene, &state);
        let curve = result.transmittance_function.unwrap();
        let samples = curve.samples();
        assert!(samples.len() > 2);
        assert_eq!(samples[0].1, color::one());
        for pair in samples.windows(2) {
            assert!(pair[1].1.x <= pair[0].1.x + 1e-12);
        }
    }

    #[test]
    fn test_invalid_params_rejected() {
        let scene = constant_scene(1.0, 2.0);
        let mut raymarcher = marcher(&scene);
        let mut params = ParamMap::new();
        params.set_float("step_length", -0.5);
        assert!(raymarcher.set_params(&params).is_err());
    }

    #[test]
    fn test_fixed_step_length_used_when_requested() {
        let scene = constant_scene(1.0, 2.0);
        let mut raymarcher = marcher(&scene);
        let mut params = ParamMap::new();
        params.set_int("use_volume_step_length", 0)
              .set_float("step_length", 0.05);
        raymarcher.set_params(&params).unwrap();

        let result = raymarcher.integrate(&scene, &axial_state());
        let expected = (-2.0 as Float).exp();
        assert!((result.transmittance.x - expected).abs() < 1e-2);
    }
}
