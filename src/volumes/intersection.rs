// Copyright @yucwang 2026

use crate::buffer::mapping::{ FrustumMapping, Mapping, MatrixMapping };
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector3f, EPSILON };
use crate::math::ray::Ray3f;
use crate::render::interval::{ Interval, IntervalVec };
use crate::render::state::RayState;

/// Ray intersection strategy for a voxel buffer, chosen to match its
/// mapping: uniform buffers reduce to a slab test against the local
/// unit cube, frustum buffers clip against the six planes of the
/// camera frustum.
#[derive(Debug, Clone)]
pub enum BufferIntersection {
    Uniform(UniformIntersection),
    Frustum(FrustumIntersection),
}

impl BufferIntersection {
    pub fn from_mapping(mapping: &Mapping) -> Self {
        match mapping {
            Mapping::Uniform(m) =>
                BufferIntersection::Uniform(UniformIntersection::new(m.clone())),
            Mapping::Frustum(m) =>
                BufferIntersection::Frustum(FrustumIntersection::new(m.clone())),
        }
    }

    pub fn intersect(&self, state: &RayState) -> IntervalVec {
        match self {
            BufferIntersection::Uniform(i) => i.intersect(state),
            BufferIntersection::Frustum(i) => i.intersect(state),
        }
    }
}

/// Builds the interval for a parametric overlap [t0, t1], stepping
/// once per voxel: the step length is the world-space distance divided
/// by the voxel-space distance covered between the two endpoints.
fn make_interval(mapping: &Mapping, ray: &Ray3f, time: Float,
                 t0: Float, t1: Float) -> Interval {
    let vs_first = mapping.world_to_voxel(ray.at(t0), time);
    let vs_last = mapping.world_to_voxel(ray.at(t1), time);
    let num_voxels = (vs_last - vs_first).norm().max(1.0);
    Interval::new(t0, t1, (t1 - t0) / num_voxels)
}

/// Intersection against a matrix-mapped buffer: the world ray is pulled
/// into local space and slab-tested against the unit cube.
#[derive(Debug, Clone)]
pub struct UniformIntersection {
    mapping: MatrixMapping,
}

impl UniformIntersection {
    pub fn new(mapping: MatrixMapping) -> Self {
        Self { mapping }
    }

    pub fn intersect(&self, state: &RayState) -> IntervalVec {
        let ws_ray = &state.ws_ray;
        // Direction is deliberately left unnormalized so parametric t
        // values carry over unchanged between the two spaces.
        let ls_ray = Ray3f::new(
            self.mapping.world_to_local(ws_ray.origin(), state.time),
            self.mapping.world_to_local_dir(ws_ray.dir()));

        match AABB::zero_one().ray_intersect_range(&ls_ray, state.t_min,
                                                   state.t_max) {
            Some((t0, t1)) if t1 > t0 => {
                let mapping = Mapping::Uniform(self.mapping.clone());
                vec![make_interval(&mapping, ws_ray, state.time, t0, t1)]
            }
            _ => Vec::new(),
        }
    }
}

/// One of the six bounding planes of a frustum, built from three of its
/// world-space corner points.
#[derive(Debug, Copy, Clone)]
struct Plane {
    point: Vector3f,
    normal: Vector3f,
}

impl Plane {
    fn from_points(p0: Vector3f, p1: Vector3f, p2: Vector3f) -> Self {
        let normal = (p1 - p0).cross(&(p2 - p0)).normalize();
        Self { point: p0, normal }
    }

    /// Parametric distance along the ray to the plane, if not parallel.
    fn intersect(&self, ray: &Ray3f) -> Option<Float> {
        let denom = ray.dir().dot(&self.normal);
        if denom.abs() < EPSILON {
            return None;
        }
        Some((self.point - ray.origin()).dot(&self.normal) / denom)
    }

    fn facing(&self, dir: Vector3f) -> bool {
        dir.dot(&self.normal) < 0.0
    }
}

/// Intersection against a frustum-mapped buffer. The six planes are
/// derived once from the world-space positions of the local unit cube's
/// corners; clipping a ray against them yields at most one interval.
#[derive(Debug, Clone)]
pub struct FrustumIntersection {
    mapping: FrustumMapping,
    planes: [Plane; 6],
}

impl FrustumIntersection {
    pub fn new(mapping: FrustumMapping) -> Self {
        let c: Vec<Vector3f> = AABB::zero_one()
            .corner_points()
            .iter()
            .map(|ls_p| mapping.local_to_world(*ls_p))
            .collect();

        // Corner triples are wound so every normal points out of the
        // frustum: -x, +x, -y, +y, near, far.
        let planes = [
            Plane::from_points(c[4], c[0], c[6]),
            Plane::from_points(c[1], c[5], c[3]),
            Plane::from_points(c[4], c[5], c[0]),
            Plane::from_points(c[2], c[3], c[6]),
            Plane::from_points(c[0], c[1], c[2]),
            Plane::from_points(c[5], c[4], c[7]),
        ];

        Self { mapping, planes }
    }

    pub fn intersect(&self, state: &RayState) -> IntervalVec {
        let ws_ray = &state.ws_ray;
        let mut t0 = state.t_min;
        let mut t1 = state.t_max;

        for plane in self.planes.iter() {
            let t = match plane.intersect(ws_ray) {
                Some(t) => t,
                None => continue,
            };
            // Entering through planes facing the ray, exiting through
            // the rest.
            if plane.facing(ws_ray.dir()) {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
        }

        t0 = t0.max(0.0);
        if t0 >= t1 {
            return Vec::new();
        }

        let mapping = Mapping::Frustum(self.mapping.clone());
        vec![make_interval(&mapping, ws_ray, state.time, t0, t1)]
    }
}

/* Tests for buffer intersections */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::camera::Camera;
    use crate::buffer::voxel_buffer::DataWindow;
    use crate::math::constants::Vector3i;
    use crate::math::transform::Transform;

    #[test]
    fn test_uniform_hit_and_miss() {
        let window = DataWindow::from_resolution(Vector3i::new(10, 10, 10));
        let xform = Transform::from_translation_scale(
            Vector3f::new(-1.0, -1.0, -1.0), Vector3f::new(2.0, 2.0, 2.0));
        let intersection = UniformIntersection::new(
            MatrixMapping::new(xform, window));

        let hit = RayState::new(Ray3f::new(
            Vector3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0)));
        let intervals = intersection.intersect(&hit);
        assert_eq!(intervals.len(), 1);
        assert!((intervals[0].t0 - 4.0).abs() < 1e-9);
        assert!((intervals[0].t1 - 6.0).abs() < 1e-9);
        // Ten voxels crossed over a two-unit span.
        assert!((intervals[0].step_length - 0.2).abs() < 1e-9);

        let miss = RayState::new(Ray3f::new(
            Vector3f::new(0.0, 5.0, -5.0), Vector3f::new(0.0, 0.0, 1.0)));
        assert!(intersection.intersect(&miss).is_empty());
    }

    #[test]
    fn test_uniform_origin_inside_clamps_entry() {
        let window = DataWindow::from_resolution(Vector3i::new(4, 4, 4));
        let xform = Transform::from_translation_scale(
            Vector3f::new(-1.0, -1.0, -1.0), Vector3f::new(2.0, 2.0, 2.0));
        let intersection = UniformIntersection::new(
            MatrixMapping::new(xform, window));

        let state = RayState::new(Ray3f::new(
            Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0)));
        let intervals = intersection.intersect(&state);
        assert_eq!(intervals.len(), 1);
        assert!(intervals[0].t0.abs() < 1e-9);
        assert!((intervals[0].t1 - 1.0).abs() < 1e-9);
    }

    fn test_camera() -> Camera {
        Camera::new(Vector3f::new(0.0, 0.0, 0.0),
                    Vector3f::new(0.0, 0.0, 1.0),
                    Vector3f::new(0.0, 1.0, 0.0),
                    std::f64::consts::FRAC_PI_2,
                    1.0,
                    1.0,
                    4.0)
    }

    #[test]
    fn test_frustum_axial_ray() {
        let window = DataWindow::from_resolution(Vector3i::new(8, 8, 16));
        let intersection = FrustumIntersection::new(
            FrustumMapping::new(test_camera(), window));

        let state = RayState::new(Ray3f::new(
            Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0)));
        let intervals = intersection.intersect(&state);
        assert_eq!(intervals.len(), 1);
        assert!((intervals[0].t0 - 1.0).abs() < 1e-6);
        assert!((intervals[0].t1 - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_frustum_ray_behind_camera_misses() {
        let window = DataWindow::from_resolution(Vector3i::new(8, 8, 16));
        let intersection = FrustumIntersection::new(
            FrustumMapping::new(test_camera(), window));

        let state = RayState::new(Ray3f::new(
            Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, -1.0)));
        assert!(intersection.intersect(&state).is_empty());
    }

    #[test]
    fn test_frustum_matches_uniform_step_semantics() {
        // Step length spans the interval divided by voxel distance for
        // both strategies.
        let window = DataWindow::from_resolution(Vector3i::new(8, 8, 16));
        let mapping = FrustumMapping::new(test_camera(), window);
        let intersection = FrustumIntersection::new(mapping.clone());

        let state = RayState::new(Ray3f::new(
            Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0)));
        let intervals = intersection.intersect(&state);
        let interval = intervals[0];
        let expected_voxels = (mapping.world_to_voxel(
                state.ws_ray.at(interval.t1), 0.0) -
            mapping.world_to_voxel(state.ws_ray.at(interval.t0), 0.0)).norm();
        let expected = (interval.t1 - interval.t0) / expected_voxels;
        assert!((interval.step_length - expected).abs() < 1e-9);
    }
}
