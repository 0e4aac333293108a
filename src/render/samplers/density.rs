// Copyright @yucwang 2026

use crate::render::samplers::{ RaymarchSample, RaymarchSampler };
use crate::render::scene::Scene;
use crate::render::state::VolumeSampleState;
use crate::volumes::volume_attr::{ BoundAttr, VolumeAttr };
use crate::volumes::Volume;

/// Visualization sampler: the density attribute doubles as both
/// emitted radiance and extinction. No lights are consulted.
pub struct DensitySampler {
    density_attr: BoundAttr,
}

impl DensitySampler {
    pub fn new(volume: &dyn Volume) -> Self {
        Self { density_attr: VolumeAttr::new("density").bind(volume) }
    }
}

impl RaymarchSampler for DensitySampler {
    fn sample(&self, scene: &Scene, state: &VolumeSampleState)
            -> RaymarchSample {
        let sample = scene.volume.sample(state, &self.density_attr);
        RaymarchSample::new(sample.value, sample.value)
    }
}

/* Tests for DensitySampler */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::color;
    use crate::math::constants::Vector3f;
    use crate::math::ray::Ray3f;
    use crate::math::transform::Transform;
    use crate::render::state::RayState;
    use crate::volumes::constant_volume::ConstantVolume;

    use std::sync::Arc;

    #[test]
    fn test_density_drives_luminance_and_extinction() {
        let mut volume = ConstantVolume::new(Transform::default());
        volume.add_attribute("density", color::gray(0.5));
        let scene = Scene::new(Arc::new(volume));

        let sampler = DensitySampler::new(scene.volume.as_ref());
        let ray_state = RayState::new(Ray3f::new(
            Vector3f::new(0.5, 0.5, -1.0), Vector3f::new(0.0, 0.0, 1.0)));
        let state = VolumeSampleState::new(&ray_state,
                                           Vector3f::new(0.5, 0.5, 0.5));
        let sample = sampler.sample(&scene, &state);
        assert_eq!(sample.luminance, color::gray(0.5));
        assert_eq!(sample.extinction, color::gray(0.5));
    }
}
