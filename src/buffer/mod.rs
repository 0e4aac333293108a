// Copyright @yucwang 2026

pub mod camera;
pub mod mapping;
pub mod occupancy;
pub mod voxel_buffer;
