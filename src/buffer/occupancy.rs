// Copyright @yucwang 2026

use crate::buffer::voxel_buffer::{ DataWindow, VoxelBuffer };
use crate::math::color;
use crate::math::constants::{ Int, Vector3i };

/// Coarse block grid marking which regions of a voxel buffer hold any
/// non-zero data. Blocks are cubes of `block_size` voxels, anchored at
/// the data window minimum. Stands in for a sparse buffer's block
/// allocation table and drives empty-space optimization.
#[derive(Debug, Clone)]
pub struct BlockOccupancy {
    window: DataWindow,
    block_size: Int,
    block_res: Vector3i,
    blocks: Vec<bool>,
}

impl BlockOccupancy {
    pub fn from_buffer(buffer: &VoxelBuffer, block_size: Int) -> Self {
        let window = buffer.data_window();
        let size = window.size();
        let block_res = Vector3i::new(
            (size.x + block_size - 1) / block_size,
            (size.y + block_size - 1) / block_size,
            (size.z + block_size - 1) / block_size,
        );
        let count = (block_res.x * block_res.y * block_res.z) as usize;
        let mut blocks = vec![false; count];

        for k in window.min.z..=window.max.z {
            for j in window.min.y..=window.max.y {
                for i in window.min.x..=window.max.x {
                    if color::max_comp(buffer.value(i, j, k)) > 0.0 {
                        let (bx, by, bz) = block_of(&window, block_size, i, j, k);
                        let idx = ((bz * block_res.y + by) * block_res.x + bx)
                            as usize;
                        blocks[idx] = true;
                    }
                }
            }
        }

        Self { window, block_size, block_res, blocks }
    }

    pub fn block_size(&self) -> Int {
        self.block_size
    }

    pub fn block_res(&self) -> Vector3i {
        self.block_res
    }

    pub fn data_window(&self) -> DataWindow {
        self.window
    }

    /// Block coordinate containing the given voxel index.
    pub fn block_coord(&self, i: Int, j: Int, k: Int) -> Vector3i {
        let (bx, by, bz) = block_of(&self.window, self.block_size, i, j, k);
        Vector3i::new(bx, by, bz)
    }

    pub fn block_index_is_valid(&self, x: Int, y: Int, z: Int) -> bool {
        x >= 0 && x < self.block_res.x &&
        y >= 0 && y < self.block_res.y &&
        z >= 0 && z < self.block_res.z
    }

    pub fn block_is_allocated(&self, x: Int, y: Int, z: Int) -> bool {
        if !self.block_index_is_valid(x, y, z) {
            return false;
        }
        let idx = ((z * self.block_res.y + y) * self.block_res.x + x) as usize;
        self.blocks[idx]
    }

    pub fn any_allocated(&self) -> bool {
        self.blocks.iter().any(|b| *b)
    }
}

fn block_of(window: &DataWindow, block_size: Int,
            i: Int, j: Int, k: Int) -> (Int, Int, Int) {
    ((i - window.min.x).div_euclid(block_size),
     (j - window.min.y).div_euclid(block_size),
     (k - window.min.z).div_euclid(block_size))
}

/* Tests for BlockOccupancy */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::mapping::{ Mapping, MatrixMapping };
    use crate::math::color::Color;
    use crate::math::transform::Transform;

    fn empty_buffer(res: Int) -> VoxelBuffer {
        let window = DataWindow::from_resolution(Vector3i::new(res, res, res));
        let mapping = Mapping::Uniform(
            MatrixMapping::new(Transform::default(), window));
        VoxelBuffer::new(window, mapping)
    }

    #[test]
    fn test_empty_buffer_has_no_blocks() {
        let occupancy = BlockOccupancy::from_buffer(&empty_buffer(16), 8);
        assert_eq!(occupancy.block_res(), Vector3i::new(2, 2, 2));
        assert!(!occupancy.any_allocated());
    }

    #[test]
    fn test_single_voxel_marks_one_block() {
        let mut buffer = empty_buffer(16);
        buffer.set_value(9, 1, 1, Color::new(1.0, 1.0, 1.0));
        let occupancy = BlockOccupancy::from_buffer(&buffer, 8);
        assert!(occupancy.block_is_allocated(1, 0, 0));
        assert!(!occupancy.block_is_allocated(0, 0, 0));
        assert!(!occupancy.block_is_allocated(5, 0, 0));
    }
}
