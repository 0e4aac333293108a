// Copyright @yucwang 2026

use crate::buffer::occupancy::BlockOccupancy;
use crate::buffer::voxel_buffer::VoxelBuffer;
use crate::buffer::mapping::Mapping;
use crate::math::aabb::AABB;
use crate::math::color::{ self, Color };
use crate::math::constants::{ Float, Int, Vector3f };
use crate::render::error::ConfigError;
use crate::phase::{ Isotropic, PhaseFunction };
use crate::render::interval::IntervalVec;
use crate::render::state::{ RayState, VolumeSampleState };
use crate::volumes::interp::{ self, InterpKind };
use crate::volumes::intersection::BufferIntersection;
use crate::volumes::optimizer::{ EmptySpaceOptimizer, SparseFrustumOptimizer,
                                 SparseUniformOptimizer };
use crate::volumes::volume_attr::BoundAttr;
use crate::volumes::{ Volume, VolumeSample };

use std::sync::Arc;

/// A voxel buffer exposed as a renderable volume. Each attribute shares
/// the buffer's stored values, scaled by a per-attribute color factor,
/// so one density buffer can drive scattering, absorption and emission
/// with different coefficients.
pub struct VoxelVolume {
    buffer: Arc<VoxelBuffer>,
    attr_names: Vec<String>,
    attr_scales: Vec<Color>,
    interpolation: InterpKind,
    intersection: BufferIntersection,
    optimizer: Option<EmptySpaceOptimizer>,
    optimizer_block_size: Option<Int>,
    ws_bounds: AABB,
    phase_function: Arc<dyn PhaseFunction>,
}

fn mapping_ws_bounds(mapping: &Mapping) -> AABB {
    let mut bounds = AABB::default();
    for ls_p in AABB::zero_one().corner_points().iter() {
        bounds.expand_by_point(&mapping.local_to_world(*ls_p));
    }
    bounds
}

impl VoxelVolume {
    pub fn new(buffer: Arc<VoxelBuffer>) -> Self {
        let intersection = BufferIntersection::from_mapping(buffer.mapping());
        let ws_bounds = mapping_ws_bounds(buffer.mapping());
        Self {
            buffer,
            attr_names: Vec::new(),
            attr_scales: Vec::new(),
            interpolation: InterpKind::Linear,
            intersection,
            optimizer: None,
            optimizer_block_size: None,
            ws_bounds,
            phase_function: Arc::new(Isotropic),
        }
    }

    /// Replaces the backing buffer, rebinding the intersection handler,
    /// the cached bounds and any enabled empty-space optimizer to the
    /// new mapping.
    pub fn set_buffer(&mut self, buffer: Arc<VoxelBuffer>)
            -> Result<(), ConfigError> {
        self.intersection = BufferIntersection::from_mapping(buffer.mapping());
        self.ws_bounds = mapping_ws_bounds(buffer.mapping());
        self.buffer = buffer;
        self.optimizer = None;
        match self.optimizer_block_size {
            Some(block_size) => self.set_use_empty_space_optimization(block_size),
            None => Ok(()),
        }
    }

    /// Registers an attribute backed by the buffer's values scaled by
    /// `scale`. Re-adding a name replaces its scale.
    pub fn add_attribute(&mut self, name: &str, scale: Color) {
        match self.attr_names.iter().position(|n| n == name) {
            Some(idx) => self.attr_scales[idx] = scale,
            None => {
                self.attr_names.push(name.to_string());
                self.attr_scales.push(scale);
            }
        }
    }

    pub fn set_interpolation(&mut self, interpolation: InterpKind) {
        self.interpolation = interpolation;
    }

    pub fn set_phase_function(&mut self, phase_function: Arc<dyn PhaseFunction>) {
        self.phase_function = phase_function;
    }

    /// Registers several attributes at once, all sharing the buffer.
    pub fn add_attributes(&mut self, names: &[&str], scales: &[Color])
            -> Result<(), ConfigError> {
        if names.len() != scales.len() {
            return Err(ConfigError::AttributeCountMismatch {
                names: names.len(),
                values: scales.len(),
            });
        }
        for (name, scale) in names.iter().zip(scales.iter()) {
            self.add_attribute(name, *scale);
        }
        Ok(())
    }

    /// Builds the block occupancy grid and enables the empty-space
    /// optimizer matching the buffer's mapping.
    pub fn set_use_empty_space_optimization(&mut self, block_size: Int)
            -> Result<(), ConfigError> {
        if self.buffer.is_empty() {
            return Err(ConfigError::EmptyBuffer);
        }
        let occupancy = Arc::new(
            BlockOccupancy::from_buffer(&self.buffer, block_size));
        let mapping = self.buffer.mapping().clone();
        self.optimizer = Some(match mapping {
            Mapping::Uniform(_) => EmptySpaceOptimizer::SparseUniform(
                SparseUniformOptimizer::new(mapping, occupancy)),
            Mapping::Frustum(_) => EmptySpaceOptimizer::SparseFrustum(
                SparseFrustumOptimizer::new(mapping, occupancy)),
        });
        self.optimizer_block_size = Some(block_size);
        Ok(())
    }

    pub fn buffer(&self) -> &Arc<VoxelBuffer> {
        &self.buffer
    }

    fn in_continuous_window(&self, vs_p: Vector3f) -> bool {
        let window = self.buffer.data_window();
        let min = window.min;
        let max = window.max;
        vs_p.x >= min.x as Float && vs_p.x < max.x as Float + 1.0 &&
        vs_p.y >= min.y as Float && vs_p.y < max.y as Float + 1.0 &&
        vs_p.z >= min.z as Float && vs_p.z < max.z as Float + 1.0
    }
}

impl Volume for VoxelVolume {
    fn attribute_names(&self) -> &[String] {
        &self.attr_names
    }

    fn sample(&self, state: &VolumeSampleState, attribute: &BoundAttr)
            -> VolumeSample {
        let idx = match attribute.index() {
            Some(idx) if idx < self.attr_scales.len() => idx,
            _ => return VolumeSample::new(color::zero(),
                                          self.phase_function.clone()),
        };

        let vs_p = self.buffer.mapping()
            .world_to_voxel(state.ws_p, state.ray_state.time);
        if !self.in_continuous_window(vs_p) {
            return VolumeSample::new(color::zero(),
                                     self.phase_function.clone());
        }

        let value = interp::sample(self.interpolation, &self.buffer, vs_p);
        VolumeSample::new(value.component_mul(&self.attr_scales[idx]),
                          self.phase_function.clone())
    }

    fn ws_bounds(&self) -> AABB {
        self.ws_bounds
    }

    fn intersect(&self, state: &RayState) -> IntervalVec {
        let intervals = self.intersection.intersect(state);
        match &self.optimizer {
            Some(optimizer) => optimizer.optimize(state, &intervals),
            None => intervals,
        }
    }

    fn phase_function(&self) -> Arc<dyn PhaseFunction> {
        self.phase_function.clone()
    }

    fn info(&self) -> Vec<String> {
        let window = self.buffer.data_window();
        let size = window.size();
        vec![
            format!("voxel volume {}x{}x{}", size.x, size.y, size.z),
            format!("attributes: {}", self.attr_names.join(", ")),
        ]
    }
}

/* Tests for VoxelVolume */
