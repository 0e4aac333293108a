// Copyright @yucwang 2026

use crate::math::constants::{ Float, Matrix4f, Vector3f };
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;

use nalgebra::Point3;

/// Perspective camera. Screen space is the NDC cube: x and y in
/// `[-1, 1]`, z in `[-1, 1]` between the near and far clip planes.
/// Serves both as the frustum mapping's transform oracle and as the
/// demo renderer's ray generator.
#[derive(Debug, Copy, Clone)]
pub struct Camera {
    position: Vector3f,
    world_to_screen: Transform,
    near: Float,
    far: Float,
}

impl Camera {
    pub fn new(position: Vector3f,
               target: Vector3f,
               up: Vector3f,
               fov_y_radians: Float,
               aspect: Float,
               near: Float,
               far: Float) -> Self {
        let view = Matrix4f::look_at_rh(
            &Point3::from(position),
            &Point3::from(target),
            &up,
        );
        let projection = Matrix4f::new_perspective(aspect, fov_y_radians, near, far);
        Self {
            position,
            world_to_screen: Transform::new(projection * view),
            near,
            far,
        }
    }

    pub fn position(&self) -> Vector3f {
        self.position
    }

    pub fn near(&self) -> Float {
        self.near
    }

    pub fn far(&self) -> Float {
        self.far
    }

    pub fn world_to_screen(&self, ws_p: Vector3f) -> Vector3f {
        self.world_to_screen.apply_point(ws_p)
    }

    pub fn screen_to_world(&self, ss_p: Vector3f) -> Vector3f {
        self.world_to_screen.inv_apply_point(ss_p)
    }

    /// Primary ray through the given NDC x/y coordinate.
    pub fn ray(&self, ndc_x: Float, ndc_y: Float) -> Ray3f {
        let ws_near = self.screen_to_world(Vector3f::new(ndc_x, ndc_y, -1.0));
        Ray3f::new_normalized(self.position, ws_near - self.position)
    }
}

/* Tests for Camera */

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> Camera {
        Camera::new(Vector3f::new(0.0, 0.0, 0.0),
                    Vector3f::new(0.0, 0.0, 1.0),
                    Vector3f::new(0.0, 1.0, 0.0),
                    std::f64::consts::FRAC_PI_2,
                    1.0,
                    1.0,
                    10.0)
    }

    #[test]
    fn test_screen_roundtrip() {
        let camera = test_camera();
        let ws_p = Vector3f::new(0.3, -0.2, 4.0);
        let ss_p = camera.world_to_screen(ws_p);
        let back = camera.screen_to_world(ss_p);
        assert!((back - ws_p).norm() < 1e-9);
    }

    #[test]
    fn test_center_ray_points_forward() {
        let camera = test_camera();
        let ray = camera.ray(0.0, 0.0);
        assert!((ray.dir() - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn test_near_far_depths() {
        let camera = test_camera();
        let ss_near = camera.world_to_screen(Vector3f::new(0.0, 0.0, 1.0));
        let ss_far = camera.world_to_screen(Vector3f::new(0.0, 0.0, 10.0));
        assert!((ss_near.z + 1.0).abs() < 1e-9);
        assert!((ss_far.z - 1.0).abs() < 1e-9);
    }
}
