// Copyright @yucwang 2026

use crate::math::color::{ self, Color };
use crate::render::samplers::{ RaymarchSample, RaymarchSampler };
use crate::render::scene::Scene;
use crate::render::state::{ LightSampleState, OcclusionSampleState, RayType,
                            VolumeSampleState };
use crate::volumes::volume_attr::{ BoundAttr, VolumeAttr };
use crate::volumes::Volume;

/// Radiative transfer sampler: scattering, absorption and emission
/// attributes combine into in-scattered radiance from each light plus
/// emitted radiance, with extinction as their joint attenuation.
pub struct PhysicalSampler {
    scattering_attr: BoundAttr,
    absorption_attr: BoundAttr,
    emission_attr: BoundAttr,
}

impl PhysicalSampler {
    pub fn new(volume: &dyn Volume) -> Self {
        Self {
            scattering_attr: VolumeAttr::new("scattering").bind(volume),
            absorption_attr: VolumeAttr::new("absorption").bind(volume),
            emission_attr: VolumeAttr::new("emission").bind(volume),
        }
    }
}

impl RaymarchSampler for PhysicalSampler {
    fn sample(&self, scene: &Scene, state: &VolumeSampleState)
            -> RaymarchSample {
        let volume = scene.volume.as_ref();
        let wo = -state.ray_state.ws_ray.dir();

        let sc_sample = volume.sample(state, &self.scattering_attr);
        let ab_sample = volume.sample(state, &self.absorption_attr);
        let em_sample = volume.sample(state, &self.emission_attr);

        let sigma_s = sc_sample.value;
        let sigma_a = ab_sample.value;
        let l_em = em_sample.value;

        // The light loop only matters on primary rays through
        // scattering media; shadow rays just need extinction.
        let mut l_sc = color::zero();
        if color::max_comp(sigma_s) > 0.0 &&
                state.ray_state.ray_type == RayType::FullRaymarch {
            let light_state = LightSampleState::new(state.ray_state,
                                                    state.ws_p);
            for light in scene.lights.iter() {
                let light_sample = light.sample(&light_state);

                let occlusion_state = OcclusionSampleState::new(
                    state.ray_state, state.ws_p, light_sample.ws_p);
                let transmittance: Color =
                    light.occluder().sample(scene, &occlusion_state);

                let wi = (state.ws_p - light_sample.ws_p).normalize();
                let p = sc_sample.phase_function.probability(wi, wo);

                l_sc += p * light_sample.luminance
                    .component_mul(&sigma_s)
                    .component_mul(&transmittance);
            }
        }

        RaymarchSample::new(l_sc + l_em, sigma_s + sigma_a)
    }
}

/* Tests for PhysicalSampler */
