// Copyright @yucwang 2026

use crate::buffer::camera::Camera;
use crate::buffer::voxel_buffer::DataWindow;
use crate::math::constants::{ Float, Vector3f };
use crate::math::transform::Transform;

/// Bijective transform between world space and a buffer's continuous
/// voxel space. Local space is always the unit cube `[0, 1]^3`.
#[derive(Debug, Clone)]
pub enum Mapping {
    Uniform(MatrixMapping),
    Frustum(FrustumMapping),
}

impl Mapping {
    pub fn world_to_voxel(&self, ws_p: Vector3f, time: Float) -> Vector3f {
        match self {
            Mapping::Uniform(m) => m.world_to_voxel(ws_p, time),
            Mapping::Frustum(m) => m.world_to_voxel(ws_p, time),
        }
    }

    pub fn voxel_to_world(&self, vs_p: Vector3f) -> Vector3f {
        match self {
            Mapping::Uniform(m) => m.voxel_to_world(vs_p),
            Mapping::Frustum(m) => m.voxel_to_world(vs_p),
        }
    }

    pub fn local_to_world(&self, ls_p: Vector3f) -> Vector3f {
        match self {
            Mapping::Uniform(m) => m.local_to_world(ls_p),
            Mapping::Frustum(m) => m.local_to_world(ls_p),
        }
    }

    pub fn data_window(&self) -> DataWindow {
        match self {
            Mapping::Uniform(m) => m.window,
            Mapping::Frustum(m) => m.window,
        }
    }
}

/// Affine mapping: a single matrix pair relates world and local space,
/// voxel space is local space scaled by the buffer resolution.
#[derive(Debug, Clone)]
pub struct MatrixMapping {
    local_to_world: Transform,
    window: DataWindow,
}

impl MatrixMapping {
    pub fn new(local_to_world: Transform, window: DataWindow) -> Self {
        Self { local_to_world, window }
    }

    pub fn local_to_world_transform(&self) -> &Transform {
        &self.local_to_world
    }

    pub fn world_to_local(&self, ws_p: Vector3f, _time: Float) -> Vector3f {
        self.local_to_world.inv_apply_point(ws_p)
    }

    pub fn world_to_local_dir(&self, ws_v: Vector3f) -> Vector3f {
        self.local_to_world.inv_apply_vector(ws_v)
    }

    pub fn local_to_world(&self, ls_p: Vector3f) -> Vector3f {
        self.local_to_world.apply_point(ls_p)
    }

    pub fn world_to_voxel(&self, ws_p: Vector3f, time: Float) -> Vector3f {
        self.local_to_voxel(self.world_to_local(ws_p, time))
    }

    pub fn voxel_to_world(&self, vs_p: Vector3f) -> Vector3f {
        self.local_to_world(self.voxel_to_local(vs_p))
    }

    pub fn local_to_voxel(&self, ls_p: Vector3f) -> Vector3f {
        let min = self.window.min;
        let size = self.window.size_f();
        Vector3f::new(min.x as Float + ls_p.x * size.x,
                      min.y as Float + ls_p.y * size.y,
                      min.z as Float + ls_p.z * size.z)
    }

    pub fn voxel_to_local(&self, vs_p: Vector3f) -> Vector3f {
        let min = self.window.min;
        let size = self.window.size_f();
        Vector3f::new((vs_p.x - min.x as Float) / size.x,
                      (vs_p.y - min.y as Float) / size.y,
                      (vs_p.z - min.z as Float) / size.z)
    }
}

/// Perspective mapping derived from a camera: x/y follow the camera's
/// screen axes, z slices lie between the near and far clip planes.
#[derive(Debug, Clone)]
pub struct FrustumMapping {
    camera: Camera,
    window: DataWindow,
}

impl FrustumMapping {
    pub fn new(camera: Camera, window: DataWindow) -> Self {
        Self { camera, window }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn world_to_voxel(&self, ws_p: Vector3f, time: Float) -> Vector3f {
        self.local_to_voxel(self.world_to_local(ws_p, time))
    }

    pub fn voxel_to_world(&self, vs_p: Vector3f) -> Vector3f {
        self.local_to_world(self.voxel_to_local(vs_p))
    }

    pub fn world_to_local(&self, ws_p: Vector3f, _time: Float) -> Vector3f {
        let ss_p = self.camera.world_to_screen(ws_p);
        0.5 * ss_p + Vector3f::new(0.5, 0.5, 0.5)
    }

    pub fn local_to_world(&self, ls_p: Vector3f) -> Vector3f {
        let ss_p = 2.0 * ls_p - Vector3f::new(1.0, 1.0, 1.0);
        self.camera.screen_to_world(ss_p)
    }

    pub fn local_to_voxel(&self, ls_p: Vector3f) -> Vector3f {
        let min = self.window.min;
        let size = self.window.size_f();
        Vector3f::new(min.x as Float + ls_p.x * size.x,
                      min.y as Float + ls_p.y * size.y,
                      min.z as Float + ls_p.z * size.z)
    }

    pub fn voxel_to_local(&self, vs_p: Vector3f) -> Vector3f {
        let min = self.window.min;
        let size = self.window.size_f();
        Vector3f::new((vs_p.x - min.x as Float) / size.x,
                      (vs_p.y - min.y as Float) / size.y,
                      (vs_p.z - min.z as Float) / size.z)
    }
}

/* Tests for mappings */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3i;

    #[test]
    fn test_matrix_mapping_roundtrip() {
        let window = DataWindow::from_resolution(Vector3i::new(8, 8, 8));
        let xform = Transform::from_translation_scale(
            Vector3f::new(-1.0, -1.0, -1.0), Vector3f::new(2.0, 2.0, 2.0));
        let mapping = MatrixMapping::new(xform, window);

        // World-space center of the volume is the voxel-space center.
        let vs_p = mapping.world_to_voxel(Vector3f::new(0.0, 0.0, 0.0), 0.0);
        assert!((vs_p - Vector3f::new(4.0, 4.0, 4.0)).norm() < 1e-9);

        let ws_p = mapping.voxel_to_world(vs_p);
        assert!(ws_p.norm() < 1e-9);
    }

    #[test]
    fn test_frustum_mapping_depth_slices() {
        let camera = Camera::new(Vector3f::new(0.0, 0.0, 0.0),
                                 Vector3f::new(0.0, 0.0, 1.0),
                                 Vector3f::new(0.0, 1.0, 0.0),
                                 std::f64::consts::FRAC_PI_2,
                                 1.0,
                                 1.0,
                                 2.0);
        let window = DataWindow::from_resolution(Vector3i::new(16, 16, 16));
        let mapping = FrustumMapping::new(camera, window);

        // Center of the near plane maps to the front center voxel column.
        let vs_near = mapping.world_to_voxel(Vector3f::new(0.0, 0.0, 1.0), 0.0);
        assert!((vs_near.x - 8.0).abs() < 1e-9);
        assert!((vs_near.y - 8.0).abs() < 1e-9);
        assert!(vs_near.z.abs() < 1e-9);

        let vs_far = mapping.world_to_voxel(Vector3f::new(0.0, 0.0, 2.0), 0.0);
        assert!((vs_far.z - 16.0).abs() < 1e-9);

        let back = mapping.voxel_to_world(vs_near);
        assert!((back - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-9);
    }
}
