// Copyright @yucwang 2026

use crate::math::color::{ self, Color };
use crate::render::samplers::{ RaymarchSample, RaymarchSampler };
use crate::render::scene::Scene;
use crate::render::state::{ LightSampleState, OcclusionSampleState, RayType,
                            VolumeSampleState };
use crate::volumes::volume_attr::{ BoundAttr, VolumeAttr };
use crate::volumes::Volume;

/// Scattering-only sampler: a single `scattering` attribute acts as
/// both the scattering and the extinction coefficient. Lighter than
/// the physical sampler when absorption and emission do not matter.
pub struct ScatteringSampler {
    scattering_attr: BoundAttr,
}

impl ScatteringSampler {
    pub fn new(volume: &dyn Volume) -> Self {
        Self {
            scattering_attr: VolumeAttr::new("scattering").bind(volume),
        }
    }
}

impl RaymarchSampler for ScatteringSampler {
    fn sample(&self, scene: &Scene, state: &VolumeSampleState)
            -> RaymarchSample {
        let volume = scene.volume.as_ref();
        let scattering = volume.sample(state, &self.scattering_attr).value;

        let mut l = color::zero();
        if color::max_comp(scattering) > 0.0 &&
                state.ray_state.ray_type == RayType::FullRaymarch {
            let light_state = LightSampleState::new(state.ray_state,
                                                    state.ws_p);
            for light in scene.lights.iter() {
                let light_sample = light.sample(&light_state);

                let occlusion_state = OcclusionSampleState::new(
                    state.ray_state, state.ws_p, light_sample.ws_p);
                let transmittance: Color =
                    light.occluder().sample(scene, &occlusion_state);

                l += scattering
                    .component_mul(&light_sample.luminance)
                    .component_mul(&transmittance);
            }
        }

        RaymarchSample::new(l, scattering)
    }
}

/* Tests for ScatteringSampler */
