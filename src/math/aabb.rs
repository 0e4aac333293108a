// Copyright 2026 @TwoCookingMice

use super::constants::{ Float, Vector3f, FLOAT_MIN, FLOAT_MAX };
use super::ray::Ray3f;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    pub p_min: Vector3f,
    pub p_max: Vector3f
}

impl Default for AABB {
    fn default() -> Self {
        Self { p_min: Vector3f::new(FLOAT_MAX, FLOAT_MAX, FLOAT_MAX),
               p_max: Vector3f::new(FLOAT_MIN, FLOAT_MIN, FLOAT_MIN) }
    }
}

impl AABB {
    pub fn new(p_min: Vector3f, p_max: Vector3f) -> Self {
        let mut min = Vector3f::new(0.0, 0.0, 0.0);
        let mut max = Vector3f::new(0.0, 0.0, 0.0);
        for idx in 0..3 {
            min[idx] = p_min[idx].min(p_max[idx]);
            max[idx] = p_max[idx].max(p_min[idx]);
        }
        Self { p_min: min, p_max: max }
    }

    /// The unit cube, the local space of every volume mapping.
    pub fn zero_one() -> Self {
        Self { p_min: Vector3f::new(0.0, 0.0, 0.0),
               p_max: Vector3f::new(1.0, 1.0, 1.0) }
    }

    pub fn center(&self) -> Vector3f {
        0.5 * self.p_min + 0.5 * self.p_max
    }

    pub fn expand_by_point(&mut self, p: &Vector3f) {
        for idx in 0..3 {
            self.p_min[idx] = self.p_min[idx].min(p[idx]);
            self.p_max[idx] = self.p_max[idx].max(p[idx]);
        }
    }

    pub fn expand_by_aabb(&mut self, other: &AABB) {
        for idx in 0..3 {
            self.p_min[idx] = self.p_min[idx].min(other.p_min[idx]);
            self.p_max[idx] = self.p_max[idx].max(other.p_max[idx]);
        }
    }

    pub fn contains(&self, p: &Vector3f) -> bool {
        for idx in 0..3 {
            if p[idx] < self.p_min[idx] || p[idx] > self.p_max[idx] {
                return false;
            }
        }
        true
    }

    /// The eight corner points, x varying fastest.
    pub fn corner_points(&self) -> [Vector3f; 8] {
        let min = self.p_min;
        let max = self.p_max;
        [
            Vector3f::new(min.x, min.y, min.z),
            Vector3f::new(max.x, min.y, min.z),
            Vector3f::new(min.x, max.y, min.z),
            Vector3f::new(max.x, max.y, min.z),
            Vector3f::new(min.x, min.y, max.z),
            Vector3f::new(max.x, min.y, max.z),
            Vector3f::new(min.x, max.y, max.z),
            Vector3f::new(max.x, max.y, max.z),
        ]
    }

    /// Slab intersection over the parametric range [t_min, t_max].
    pub fn ray_intersect_range(&self, ray: &Ray3f, t_min: Float, t_max: Float)
            -> Option<(Float, Float)> {
        if !self.is_valid() {
            return None;
        }

        let o = ray.origin();
        let d = ray.dir();
        let mut t0 = t_min;
        let mut t1 = t_max;

        for idx in 0..3 {
            let dir = d[idx];
            if dir.abs() < 1e-12 {
                if o[idx] < self.p_min[idx] || o[idx] > self.p_max[idx] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut near = (self.p_min[idx] - o[idx]) * inv;
            let mut far = (self.p_max[idx] - o[idx]) * inv;
            if near > far {
                std::mem::swap(&mut near, &mut far);
            }

            t0 = t0.max(near);
            t1 = t1.min(far);
            if t1 < t0 {
                return None;
            }
        }

        Some((t0, t1))
    }

    pub fn diagnal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    pub fn is_valid(&self) -> bool {
        for idx in 0..3 {
            if self.p_min[idx] > self.p_max[idx] {
                return false;
            }
        }
        true
    }
}

/* Test for AABB */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_geometry() {
        let min = Vector3f::new(1.0, 7.0, 3.0);
        let max = Vector3f::new(4.0, 4.0, 4.0);
        let mut bbox = AABB::new(min, max);

        let center = bbox.center();
        assert!((center.x - 2.5).abs() < 1e-12);
        assert!((center.y - 5.5).abs() < 1e-12);
        assert!((center.z - 3.5).abs() < 1e-12);

        bbox.expand_by_point(&Vector3f::new(-1.0, 5.0, 6.0));
        assert!((bbox.p_min.x + 1.0).abs() < 1e-12);
        assert!((bbox.p_max.z - 6.0).abs() < 1e-12);

        let mut bbox1 = AABB::default();
        bbox1.expand_by_aabb(&bbox);
        assert_eq!(bbox1, bbox);
    }

    #[test]
    fn test_aabb_intersect() {
        let bbox = AABB::new(Vector3f::new(-1.0, -1.0, -1.0),
                             Vector3f::new(1.0, 1.0, 1.0));

        let r1 = Ray3f::new(Vector3f::new(0.0, 0.0, -3.0),
                            Vector3f::new(0.0, 0.0, 1.0));
        let (t0, t1) = bbox.ray_intersect_range(&r1, 0.0, FLOAT_MAX).unwrap();
        assert!((t0 - 2.0).abs() < 1e-12);
        assert!((t1 - 4.0).abs() < 1e-12);

        let r2 = Ray3f::new(Vector3f::new(-2.0, 0.0, -3.0),
                            Vector3f::new(0.0, 0.0, 1.0));
        assert!(bbox.ray_intersect_range(&r2, 0.0, FLOAT_MAX).is_none());
    }

    #[test]
    fn test_corner_points() {
        let corners = AABB::zero_one().corner_points();
        assert_eq!(corners[0], Vector3f::new(0.0, 0.0, 0.0));
        assert_eq!(corners[7], Vector3f::new(1.0, 1.0, 1.0));
    }
}
