// Copyright @yucwang 2026

use crate::buffer::mapping::Mapping;
use crate::math::color::Color;
use crate::math::constants::{ Float, Int, Vector3f, Vector3i };

/// Inclusive integer index range of a voxel buffer. Continuous voxel
/// space spans `[min, max + 1)` per axis; integer coordinates are voxel
/// corners and `i + 0.5` is a voxel center.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DataWindow {
    pub min: Vector3i,
    pub max: Vector3i,
}

impl DataWindow {
    pub fn new(min: Vector3i, max: Vector3i) -> Self {
        Self { min, max }
    }

    /// Window starting at the origin with the given resolution.
    pub fn from_resolution(res: Vector3i) -> Self {
        Self { min: Vector3i::new(0, 0, 0),
               max: res - Vector3i::new(1, 1, 1) }
    }

    pub fn size(&self) -> Vector3i {
        self.max - self.min + Vector3i::new(1, 1, 1)
    }

    pub fn size_f(&self) -> Vector3f {
        let size = self.size();
        Vector3f::new(size.x as Float, size.y as Float, size.z as Float)
    }

    /// Checks a continuous coordinate against the discrete bounds.
    pub fn contains(&self, vs_p: Vector3f) -> bool {
        for dim in 0..3 {
            if vs_p[dim] < self.min[dim] as Float
                    || vs_p[dim] > self.max[dim] as Float {
                return false;
            }
        }
        true
    }

    pub fn clamp_index(&self, i: Int, j: Int, k: Int) -> (Int, Int, Int) {
        (i.clamp(self.min.x, self.max.x),
         j.clamp(self.min.y, self.max.y),
         k.clamp(self.min.z, self.max.z))
    }
}

/// Dense 3D array of color samples over a data window, together with
/// the mapping that relates world space to its voxel space. Built once
/// by upstream modeling and immutable during rendering.
pub struct VoxelBuffer {
    window: DataWindow,
    data: Vec<Color>,
    mapping: Mapping,
}

impl VoxelBuffer {
    pub fn new(window: DataWindow, mapping: Mapping) -> Self {
        let size = window.size();
        let len = (size.x as usize) * (size.y as usize) * (size.z as usize);
        Self { window,
               data: vec![Color::new(0.0, 0.0, 0.0); len],
               mapping }
    }

    pub fn data_window(&self) -> DataWindow {
        self.window
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    fn offset(&self, i: Int, j: Int, k: Int) -> usize {
        let size = self.window.size();
        let x = (i - self.window.min.x) as usize;
        let y = (j - self.window.min.y) as usize;
        let z = (k - self.window.min.z) as usize;
        (z * size.y as usize + y) * size.x as usize + x
    }

    /// Raw lookup. Indices must lie inside the data window; interpolation
    /// kernels clamp before calling.
    pub fn value(&self, i: Int, j: Int, k: Int) -> Color {
        self.data[self.offset(i, j, k)]
    }

    pub fn set_value(&mut self, i: Int, j: Int, k: Int, value: Color) {
        let offset = self.offset(i, j, k);
        self.data[offset] = value;
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/* Tests for VoxelBuffer */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::mapping::MatrixMapping;
    use crate::math::transform::Transform;

    fn test_buffer(res: Int) -> VoxelBuffer {
        let window = DataWindow::from_resolution(Vector3i::new(res, res, res));
        let mapping = Mapping::Uniform(
            MatrixMapping::new(Transform::default(), window));
        VoxelBuffer::new(window, mapping)
    }

    #[test]
    fn test_window_contains() {
        let window = DataWindow::from_resolution(Vector3i::new(4, 4, 4));
        assert!(window.contains(Vector3f::new(0.0, 1.5, 3.0)));
        assert!(!window.contains(Vector3f::new(0.0, 1.5, 3.5)));
        assert!(!window.contains(Vector3f::new(-0.1, 0.0, 0.0)));
    }

    #[test]
    fn test_value_roundtrip() {
        let mut buffer = test_buffer(4);
        buffer.set_value(1, 2, 3, Color::new(0.5, 0.25, 0.125));
        assert_eq!(buffer.value(1, 2, 3), Color::new(0.5, 0.25, 0.125));
        assert_eq!(buffer.value(0, 0, 0), Color::new(0.0, 0.0, 0.0));
    }
}
