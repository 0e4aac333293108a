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

use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Params {
    pub threshold: Float,
    pub volume_step_length_mult: Float,
    pub do_trapezoid_integration: bool,
    pub early_termination_threshold: Float,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            volume_step_length_mult: 4.0,
            do_trapezoid_integration: true,
            early_termination_threshold: 0.001,
        }
    }
}

/// Error-driven integrator: the step length shrinks with the local mean
/// free path and with the remaining transmittance, so dense regions and
/// nearly opaque tails get sampled finely while thin media are crossed
/// in a few long steps. The volume-suggested step length scaled by the
/// multiplier acts as the upper bound.
pub struct AdaptiveRaymarcher {
    params: Params,
    sampler: Arc<dyn RaymarchSampler>,
}

impl AdaptiveRaymarcher {
    pub fn new(sampler: Arc<dyn RaymarchSampler>) -> Self {
        Self {
            params: Params::default(),
            sampler,
        }
    }

    pub fn set_params(&mut self, params: &ParamMap) -> Result<(), ConfigError> {
        if let Some(v) = params.float("threshold") {
            if v <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "threshold".to_string(),
                    reason: "must be positive".to_string(),
                });
            }
            self.params.threshold = v;
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
        if let Some(v) = params.int("do_trapezoid_integration") {
            self.params.do_trapezoid_integration = v != 0;
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

    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl Raymarcher for AdaptiveRaymarcher {
    fn integrate(&self, scene: &Scene, state: &RayState) -> IntegrationResult {
        let raw_intervals = scene.volume.intersect(state);
        let intervals = split_intervals(&raw_intervals);

        if intervals.is_empty() {
            return IntegrationResult::empty();
        }

        let mut lf = setup_deep_l_curve(state, intervals[0].t0);
        let mut tf = setup_deep_t_curve(state, intervals[0].t0);

        let mut l = color::zero();
        let mut t = color::one();
        let mut previous_l = color::zero();
        let mut previous_t = color::one();

        for interval in intervals.iter() {
            let t_start = interval.t0.max(state.t_min);
            let t_end = interval.t1.min(state.t_max);

            let base_step_length =
                (interval.step_length * self.params.volume_step_length_mult)
                    .min(t_end - t_start);

            let mut step_t0 = t_start;
            let mut step_t1 = t_start + base_step_length;

            // Clipped-away or degenerate intervals would never advance.
            if step_t0 >= step_t1 {
                continue;
            }

            let mut do_terminate = false;
            while step_t0 < t_end {
                let step_length = step_t1 - step_t0;
                let sample_state = VolumeSampleState::new(
                    state, state.ws_ray.at(step_t1));
                let sample = self.sampler.sample(scene, &sample_state);

                // Sampling density rises as transmittance falls towards
                // the error threshold.
                let divisor =
                    (color::max_comp(t) / self.params.threshold).sqrt();
                let adapted_step_length = base_step_length / divisor;

                if color::max_comp(sample.extinction) > 0.0 {
                    let mean_free_path =
                        1.0 / color::max_comp(sample.extinction);
                    let suggested_step = mean_free_path / divisor;
                    if step_length > suggested_step * 1.1 {
                        // Too coarse for the local density; retry the
                        // step at the suggested length.
                        step_t1 = (step_t0 +
                                   suggested_step.min(adapted_step_length))
                            .min(t_end);
                        continue;
                    }
                    step_t0 = step_t1;
                    step_t1 = (step_t1 +
                               suggested_step.min(adapted_step_length))
                        .min(t_end);
                } else {
                    step_t0 = step_t1;
                    step_t1 = (step_t1 + adapted_step_length).min(t_end);
                }

                if color::max_comp(sample.extinction) > 0.0 {
                    let term: Color =
                        color::exp(-sample.extinction * step_length);
                    if self.params.do_trapezoid_integration {
                        t = t.component_mul(&((term + previous_t) * 0.5));
                        previous_t = term;
                    } else {
                        t.component_mul_assign(&term);
                    }
                }

                let luminance_term =
                    sample.luminance.component_mul(&t) * step_length;
                if self.params.do_trapezoid_integration {
                    l += (luminance_term + previous_l) * 0.5;
                    previous_l = luminance_term;
                } else {
                    l += luminance_term;
                }

                if color::max_comp(t) <
                        self.params.early_termination_threshold {
                    t = color::zero();
                    do_terminate = true;
                }

                update_deep_functions(step_t1, l, t, &mut lf, &mut tf);

                if do_terminate {
                    break;
                }
            }

            if do_terminate {
                break;
            }
        }

        if let Some(curve) = tf.as_mut() {
            curve.remove_duplicates();
        }
        if let Some(curve) = lf.as_mut() {
            curve.remove_duplicates();
        }

        IntegrationResult {
            luminance: l,
            transmittance: t,
            luminance_function: lf,
            transmittance_function: tf,
        }
    }
}

/* Tests for AdaptiveRaymarcher */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3f;
    use crate::math::ray::Ray3f;
    use crate::math::transform::Transform;
    use crate::render::samplers::density::DensitySampler;
    use crate::volumes::constant_volume::ConstantVolume;

    fn constant_scene(density: Float, depth: Float) -> Scene {
        let xform = Transform::from_translation_scale(
            Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(1.0, 1.0, depth));
        let mut volume = ConstantVolume::new(xform);
        volume.add_attribute("density", color::gray(density));
        Scene::new(Arc::new(volume))
    }

    fn axial_state() -> RayState {
        RayState::new(Ray3f::new(Vector3f::new(0.5, 0.5, -1.0),
                                 Vector3f::new(0.0, 0.0, 1.0)))
    }

    fn marcher(scene: &Scene) -> AdaptiveRaymarcher {
        AdaptiveRaymarcher::new(Arc::new(
            DensitySampler::new(scene.volume.as_ref())))
    }

    #[test]
    fn test_beer_lambert_without_trapezoid() {
        // Constant extinction makes the rectangle rule exact no matter
        // how the steps are partitioned.
        let scene = constant_scene(1.0, 2.0);
        let mut raymarcher = marcher(&scene);
        let mut params = ParamMap::new();
        params.set_int("do_trapezoid_integration", 0);
        raymarcher.set_params(&params).unwrap();

        let result = raymarcher.integrate(&scene, &axial_state());
        let expected = (-2.0 as Float).exp();
        assert!((result.transmittance.x - expected).abs() < 1e-6,
                "got {}", result.transmittance.x);
    }

    #[test]
    fn test_trapezoid_stays_close_to_analytic() {
        let scene = constant_scene(1.0, 2.0);
        let raymarcher = marcher(&scene);
        let result = raymarcher.integrate(&scene, &axial_state());
        let expected = (-2.0 as Float).exp();
        assert!((result.transmittance.x - expected).abs() < 0.02,
                "got {}", result.transmittance.x);
    }

    #[test]
    fn test_denser_medium_takes_more_steps() {
        let dense = constant_scene(5.0, 2.0);
        let thin = constant_scene(0.5, 2.0);
        let mut state = axial_state();
        state.do_output_deep_t = true;

        let dense_curve = marcher(&dense).integrate(&dense, &state)
            .transmittance_function.unwrap();
        let thin_curve = marcher(&thin).integrate(&thin, &state)
            .transmittance_function.unwrap();
        assert!(dense_curve.len() > thin_curve.len());
    }

    #[test]
    fn test_early_termination_zeroes_transmittance() {
        let scene = constant_scene(20.0, 2.0);
        let raymarcher = marcher(&scene);
        let result = raymarcher.integrate(&scene, &axial_state());
        assert_eq!(result.transmittance, color::zero());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let scene = constant_scene(1.0, 2.0);
        let mut raymarcher = marcher(&scene);
        let mut params = ParamMap::new();
        params.set_float("threshold", 0.0);
        assert!(raymarcher.set_params(&params).is_err());
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
}
