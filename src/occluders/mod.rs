// Copyright @yucwang 2026

use crate::buffer::mapping::{ Mapping, MatrixMapping };
use crate::buffer::voxel_buffer::{ DataWindow, VoxelBuffer };
use crate::math::color::{ self, Color };
use crate::math::constants::{ Float, Int, Vector3f, Vector3i };
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;
use crate::render::raymarchers::Raymarcher;
use crate::render::scene::Scene;
use crate::render::state::{ OcclusionSampleState, RayState, RayType };
use crate::volumes::interp::{ self, InterpKind };

use log::info;

use std::sync::Arc;

/// Shadow rays deeper than this return full transmittance instead of
/// recursing further, unless a different cap is set on the occluder.
pub const MAX_RAY_DEPTH: usize = 8;

/// Transmittance between a shading point and a light sample position.
/// Implementations must be safe for concurrent read-only access.
pub trait Occluder: Send + Sync {
    fn sample(&self, scene: &Scene, state: &OcclusionSampleState) -> Color;
}

/// The identity occluder: everything is fully visible.
pub struct NullOccluder;

impl Occluder for NullOccluder {
    fn sample(&self, _scene: &Scene, _state: &OcclusionSampleState) -> Color {
        color::one()
    }
}

/// Exact occlusion by raymarching a secondary ray towards the light
/// for every sample. Accurate and expensive.
pub struct RaymarchOccluder {
    raymarcher: Arc<dyn Raymarcher>,
    max_ray_depth: usize,
}

impl RaymarchOccluder {
    pub fn new(raymarcher: Arc<dyn Raymarcher>) -> Self {
        Self { raymarcher, max_ray_depth: MAX_RAY_DEPTH }
    }

    pub fn set_max_ray_depth(&mut self, max_ray_depth: usize) {
        self.max_ray_depth = max_ray_depth;
    }
}

impl Occluder for RaymarchOccluder {
    fn sample(&self, scene: &Scene, state: &OcclusionSampleState) -> Color {
        let secondary = state.make_secondary_ray_state();
        if secondary.ray_depth > self.max_ray_depth {
            return color::one();
        }
        self.raymarcher.integrate(scene, &secondary).transmittance
    }
}

/// Occlusion baked into a voxel buffer over the scene volume's bounds:
/// each voxel stores the transmittance from its center to the light
/// position, computed once up front. Lookups are a single linear
/// interpolation.
pub struct VoxelOccluder {
    buffer: VoxelBuffer,
}

impl VoxelOccluder {
    pub fn new(scene: &Scene, raymarcher: &dyn Raymarcher,
               ws_light_p: Vector3f, res: Int) -> Self {
        info!("Building voxel occluder");

        let ws_bounds = scene.volume.ws_bounds();
        let size = ws_bounds.diagnal();
        let max_side = size.x.max(size.y).max(size.z);
        let buffer_res = Vector3i::new(
            ((size.x / max_side) * res as Float).ceil().max(1.0) as Int,
            ((size.y / max_side) * res as Float).ceil().max(1.0) as Int,
            ((size.z / max_side) * res as Float).ceil().max(1.0) as Int);
        info!("  resolution: {}x{}x{}",
              buffer_res.x, buffer_res.y, buffer_res.z);

        let window = DataWindow::from_resolution(buffer_res);
        let mapping = Mapping::Uniform(MatrixMapping::new(
            Transform::from_translation_scale(ws_bounds.p_min, size), window));
        let mut buffer = VoxelBuffer::new(window, mapping);

        for k in 0..buffer_res.z {
            for j in 0..buffer_res.y {
                for i in 0..buffer_res.x {
                    let ws_p = buffer.mapping().voxel_to_world(
                        Vector3f::new(i as Float + 0.5,
                                      j as Float + 0.5,
                                      k as Float + 0.5));
                    let to_light = ws_light_p - ws_p;

                    let mut state = RayState::new(
                        Ray3f::new_normalized(ws_p, to_light));
                    state.ray_type = RayType::TransmittanceOnly;
                    state.ray_depth = 1;
                    state.t_max = to_light.norm();

                    let result = raymarcher.integrate(scene, &state);
                    buffer.set_value(i, j, k, result.transmittance);
                }
            }
        }

        Self { buffer }
    }

    fn in_continuous_window(&self, vs_p: Vector3f) -> bool {
        let window = self.buffer.data_window();
        vs_p.x >= window.min.x as Float && vs_p.x < window.max.x as Float + 1.0 &&
        vs_p.y >= window.min.y as Float && vs_p.y < window.max.y as Float + 1.0 &&
        vs_p.z >= window.min.z as Float && vs_p.z < window.max.z as Float + 1.0
    }
}

impl Occluder for VoxelOccluder {
    fn sample(&self, _scene: &Scene, state: &OcclusionSampleState) -> Color {
        let vs_p = self.buffer.mapping()
            .world_to_voxel(state.ws_p, state.ray_state.time);
        if !self.in_continuous_window(vs_p) {
            return color::one();
        }
        interp::sample(InterpKind::Linear, &self.buffer, vs_p)
    }
}

/* Tests for occluders */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::samplers::density::DensitySampler;
    use crate::render::raymarchers::uniform::UniformRaymarcher;
    use crate::volumes::constant_volume::ConstantVolume;

    fn dense_scene(density: Float) -> Scene {
        let mut volume = ConstantVolume::new(Transform::default());
        volume.add_attribute("density", color::gray(density));
        volume.set_step_length(0.01);
        Scene::new(Arc::new(volume))
    }

    fn marcher(scene: &Scene) -> Arc<UniformRaymarcher> {
        Arc::new(UniformRaymarcher::new(Arc::new(
            DensitySampler::new(scene.volume.as_ref()))))
    }

    #[test]
    fn test_null_occluder_is_identity() {
        let scene = dense_scene(1.0);
        let ray_state = RayState::new(Ray3f::new(
            Vector3f::new(0.5, 0.5, -1.0), Vector3f::new(0.0, 0.0, 1.0)));
        let state = OcclusionSampleState::new(
            &ray_state, Vector3f::new(0.5, 0.5, 0.5),
            Vector3f::new(0.5, 0.5, 5.0));
        assert_eq!(NullOccluder.sample(&scene, &state), color::one());
    }

    #[test]
    fn test_raymarch_occluder_attenuates_through_medium() {
        let scene = dense_scene(1.0);
        let occluder = RaymarchOccluder::new(marcher(&scene));

        let ray_state = RayState::new(Ray3f::new(
            Vector3f::new(0.5, 0.5, -1.0), Vector3f::new(0.0, 0.0, 1.0)));
        // The path to the light crosses the full unit depth of medium.
        let state = OcclusionSampleState::new(
            &ray_state, Vector3f::new(0.5, 0.5, 0.0),
            Vector3f::new(0.5, 0.5, 5.0));
        let t = occluder.sample(&scene, &state);
        let expected = (-1.0 as Float).exp();
        assert!((t.x - expected).abs() < 1e-2, "got {}", t.x);
    }

    #[test]
    fn test_raymarch_occluder_depth_cap() {
        let scene = dense_scene(1.0);
        let occluder = RaymarchOccluder::new(marcher(&scene));

        let mut ray_state = RayState::new(Ray3f::new(
            Vector3f::new(0.5, 0.5, -1.0), Vector3f::new(0.0, 0.0, 1.0)));
        ray_state.ray_depth = MAX_RAY_DEPTH;
        let state = OcclusionSampleState::new(
            &ray_state, Vector3f::new(0.5, 0.5, 0.0),
            Vector3f::new(0.5, 0.5, 5.0));
        assert_eq!(occluder.sample(&scene, &state), color::one());

        // Raising the cap lets the same shadow ray march again.
        let mut deep = RaymarchOccluder::new(marcher(&scene));
        deep.set_max_ray_depth(MAX_RAY_DEPTH + 2);
        assert!(deep.sample(&scene, &state).x < 1.0);
    }

    #[test]
    fn test_voxel_occluder_matches_raymarch_estimate() {
        let scene = dense_scene(1.0);
        let raymarcher = marcher(&scene);
        let light_p = Vector3f::new(0.5, 0.5, 5.0);
        let occluder = VoxelOccluder::new(&scene, raymarcher.as_ref(),
                                          light_p, 16);

        let ray_state = RayState::new(Ray3f::new(
            Vector3f::new(0.5, 0.5, -1.0), Vector3f::new(0.0, 0.0, 1.0)));
        let state = OcclusionSampleState::new(
            &ray_state, Vector3f::new(0.5, 0.5, 0.1), light_p);
        let baked = occluder.sample(&scene, &state);
        let exact = RaymarchOccluder::new(raymarcher)
            .sample(&scene, &state);
        assert!((baked.x - exact.x).abs() < 0.1,
                "baked {} exact {}", baked.x, exact.x);
    }

    #[test]
    fn test_voxel_occluder_outside_bounds_is_transparent() {
        let scene = dense_scene(1.0);
        let raymarcher = marcher(&scene);
        let occluder = VoxelOccluder::new(&scene, raymarcher.as_ref(),
                                          Vector3f::new(0.5, 0.5, 5.0), 8);

        let ray_state = RayState::new(Ray3f::new(
            Vector3f::new(0.5, 0.5, -1.0), Vector3f::new(0.0, 0.0, 1.0)));
        let state = OcclusionSampleState::new(
            &ray_state, Vector3f::new(10.0, 10.0, 10.0),
            Vector3f::new(0.5, 0.5, 5.0));
        assert_eq!(occluder.sample(&scene, &state), color::one());
    }
}
