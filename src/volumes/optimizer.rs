// Copyright @yucwang 2026

use crate::buffer::mapping::Mapping;
use crate::buffer::occupancy::BlockOccupancy;
use crate::math::constants::{ Float, Int, Vector3f, EPSILON, FLOAT_MAX };
use crate::render::interval::{ Interval, IntervalVec };
use crate::render::state::{ RayState, RayType };

use std::sync::Arc;

/// Refines a buffer's raw intersection intervals using the block
/// occupancy grid, so the raymarcher never steps through unallocated
/// space. Both strategies are conservative: when a ray shape falls
/// outside their assumptions they return the input unchanged, which is
/// always correct, just slower.
#[derive(Clone)]
pub enum EmptySpaceOptimizer {
    SparseUniform(SparseUniformOptimizer),
    SparseFrustum(SparseFrustumOptimizer),
}

impl EmptySpaceOptimizer {
    pub fn optimize(&self, state: &RayState, intervals: &IntervalVec)
            -> IntervalVec {
        match self {
            EmptySpaceOptimizer::SparseUniform(o) =>
                o.optimize(state, intervals),
            EmptySpaceOptimizer::SparseFrustum(o) =>
                o.optimize(state, intervals),
        }
    }
}

/// Run of overlapped parameter space, in the normalized coordinate of
/// one input interval.
struct Run {
    s0: Float,
    s1: Float,
}

fn runs_to_intervals(runs: &[Run], interval: &Interval) -> IntervalVec {
    let length = interval.t1 - interval.t0;
    runs.iter()
        .map(|run| Interval::new(interval.t0 + run.s0 * length,
                                 interval.t0 + run.s1 * length,
                                 interval.step_length))
        .collect()
}

/// Grid walk over the occupancy blocks of a uniform buffer. The ray
/// segment is traversed block by block and only runs of allocated
/// blocks survive as intervals.
#[derive(Clone)]
pub struct SparseUniformOptimizer {
    mapping: Mapping,
    occupancy: Arc<BlockOccupancy>,
}

impl SparseUniformOptimizer {
    pub fn new(mapping: Mapping, occupancy: Arc<BlockOccupancy>) -> Self {
        Self { mapping, occupancy }
    }

    pub fn optimize(&self, state: &RayState, intervals: &IntervalVec)
            -> IntervalVec {
        // The walk assumes a single contiguous overlap.
        if intervals.len() != 1 {
            return intervals.clone();
        }
        if !self.occupancy.any_allocated() {
            return Vec::new();
        }

        let interval = intervals[0];
        let ray = &state.ws_ray;
        let window = self.occupancy.data_window();
        let block_size = self.occupancy.block_size() as Float;
        let block_res = self.occupancy.block_res();

        let to_block = |vs_p: Vector3f| {
            Vector3f::new((vs_p.x - window.min.x as Float) / block_size,
                          (vs_p.y - window.min.y as Float) / block_size,
                          (vs_p.z - window.min.z as Float) / block_size)
        };
        let b0 = to_block(self.mapping.world_to_voxel(
            ray.at(interval.t0), state.time));
        let b1 = to_block(self.mapping.world_to_voxel(
            ray.at(interval.t1), state.time));
        let dir = b1 - b0;

        let clamp_cell = |v: Float, res: Int| {
            (v.floor() as Int).clamp(0, res - 1)
        };
        let mut cell = [
            clamp_cell(b0.x, block_res.x),
            clamp_cell(b0.y, block_res.y),
            clamp_cell(b0.z, block_res.z),
        ];

        let mut step = [0 as Int; 3];
        let mut s_delta = [FLOAT_MAX; 3];
        let mut s_next = [FLOAT_MAX; 3];
        for axis in 0..3 {
            let d = dir[axis];
            if d > 0.0 {
                step[axis] = 1;
                s_delta[axis] = 1.0 / d;
                s_next[axis] = (cell[axis] as Float + 1.0 - b0[axis]) / d;
            } else if d < 0.0 {
                step[axis] = -1;
                s_delta[axis] = -1.0 / d;
                s_next[axis] = (cell[axis] as Float - b0[axis]) / d;
            }
            // Degenerate axes keep the FLOAT_MAX sentinel so they never
            // win the advance below.
            if !s_next[axis].is_finite() {
                s_next[axis] = FLOAT_MAX;
            }
        }

        let mut runs: Vec<Run> = Vec::new();
        let mut s_entry = 0.0;
        while s_entry < 1.0 - EPSILON {
            let axis = min_axis(&s_next);
            let s_exit = s_next[axis].min(1.0);

            if self.occupancy.block_is_allocated(cell[0], cell[1], cell[2]) {
                match runs.last_mut() {
                    Some(run) if (run.s1 - s_entry).abs() < EPSILON =>
                        run.s1 = s_exit,
                    _ => runs.push(Run { s0: s_entry, s1: s_exit }),
                }
            }

            cell[axis] += step[axis];
            s_next[axis] += s_delta[axis];
            s_entry = s_exit;
            if !self.occupancy.block_index_is_valid(cell[0], cell[1], cell[2])
                    && s_entry < 1.0 - EPSILON {
                break;
            }
        }

        runs_to_intervals(&runs, &interval)
    }
}

fn min_axis(values: &[Float; 3]) -> usize {
    let mut axis = 0;
    for idx in 1..3 {
        if values[idx] < values[axis] {
            axis = idx;
        }
    }
    axis
}

/// Depth walk over the occupancy blocks of a frustum buffer. Applies
/// only to primary camera rays, which travel down a single x/y block
/// column of the frustum; every other ray shape passes through
/// unmodified.
#[derive(Clone)]
pub struct SparseFrustumOptimizer {
    mapping: Mapping,
    occupancy: Arc<BlockOccupancy>,
}

impl SparseFrustumOptimizer {
    pub fn new(mapping: Mapping, occupancy: Arc<BlockOccupancy>) -> Self {
        Self { mapping, occupancy }
    }

    pub fn optimize(&self, state: &RayState, intervals: &IntervalVec)
            -> IntervalVec {
        if state.ray_type != RayType::FullRaymarch || state.ray_depth != 0 {
            return intervals.clone();
        }
        if intervals.len() != 1 {
            return intervals.clone();
        }
        if !self.occupancy.any_allocated() {
            return Vec::new();
        }

        let interval = intervals[0];
        let ray = &state.ws_ray;
        let vs0 = self.mapping.world_to_voxel(ray.at(interval.t0), state.time);
        let vs1 = self.mapping.world_to_voxel(ray.at(interval.t1), state.time);
        if (vs1.z - vs0.z).abs() < EPSILON {
            return intervals.clone();
        }

        let window = self.occupancy.data_window();
        let block_size = self.occupancy.block_size();
        let to_block = |vs_p: &Vector3f| {
            self.occupancy.block_coord(
                (vs_p.x.floor() as Int).clamp(window.min.x, window.max.x),
                (vs_p.y.floor() as Int).clamp(window.min.y, window.max.y),
                0)
        };
        let column = to_block(&vs0);
        // A ray leaving the entry block column would be checked against
        // the wrong occupancy; hand those through unchanged.
        let exit_column = to_block(&vs1);
        if column.x != exit_column.x || column.y != exit_column.y {
            return intervals.clone();
        }

        let vz_min = vs0.z.min(vs1.z);
        let vz_max = vs0.z.max(vs1.z);
        let bz_first = ((vz_min - window.min.z as Float) /
                        block_size as Float).floor() as Int;
        let bz_last = ((vz_max - window.min.z as Float) /
                       block_size as Float).ceil() as Int - 1;

        // World-space t of a voxel-space depth along this ray's column.
        let t_of_depth = |vs_z: Float| {
            let s = (vs_z - vs0.z) / (vs1.z - vs0.z);
            let ws_p = self.mapping.voxel_to_world(
                Vector3f::new(vs0.x + s * (vs1.x - vs0.x),
                              vs0.y + s * (vs1.y - vs0.y),
                              vs_z));
            (ws_p - ray.origin()).dot(&ray.dir()) / ray.dir().norm_squared()
        };

        let mut out_intervals = IntervalVec::new();
        let mut open: Option<(Float, Float)> = None;
        for bz in bz_first.max(0)..=bz_last
                .min(self.occupancy.block_res().z - 1) {
            let z0 = (window.min.z + bz * block_size) as Float;
            let z1 = z0 + block_size as Float;
            let z0 = z0.max(vz_min);
            let z1 = z1.min(vz_max);
            if z1 <= z0 {
                continue;
            }

            if self.occupancy.block_is_allocated(column.x, column.y, bz) {
                open = match open {
                    Some((open_z0, _)) => Some((open_z0, z1)),
                    None => Some((z0, z1)),
                };
            } else if let Some((open_z0, open_z1)) = open.take() {
                out_intervals.push(depth_interval(
                    &t_of_depth, open_z0, open_z1, interval.step_length));
            }
        }
        if let Some((open_z0, open_z1)) = open {
            out_intervals.push(depth_interval(
                &t_of_depth, open_z0, open_z1, interval.step_length));
        }

        out_intervals
    }
}

fn depth_interval(t_of_depth: &dyn Fn(Float) -> Float,
                  z0: Float, z1: Float, step_length: Float) -> Interval {
    let ta = t_of_depth(z0);
    let tb = t_of_depth(z1);
    Interval::new(ta.min(tb).max(0.0), ta.max(tb), step_length)
}

/* Tests for empty-space optimizers */
