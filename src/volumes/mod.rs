// Copyright @yucwang 2026

pub mod composite_volume;
pub mod constant_volume;
pub mod interp;
pub mod intersection;
pub mod optimizer;
pub mod volume_attr;
pub mod voxel_volume;

use crate::math::aabb::AABB;
use crate::math::color::Color;
use crate::phase::PhaseFunction;
use crate::render::interval::IntervalVec;
use crate::render::state::{ RayState, VolumeSampleState };
use crate::volumes::volume_attr::BoundAttr;

use std::sync::Arc;

/// One evaluation of a volume: the attribute value at a point plus the
/// phase function governing scattering there.
pub struct VolumeSample {
    pub value: Color,
    pub phase_function: Arc<dyn PhaseFunction>,
}

impl VolumeSample {
    pub fn new(value: Color, phase_function: Arc<dyn PhaseFunction>) -> Self {
        Self { value, phase_function }
    }
}

/// A renderable participating medium. All methods are read-only and
/// safe for concurrent access once setup is complete; attribute binding
/// (see `volume_attr`) happens before parallel execution begins.
pub trait Volume: Send + Sync {
    /// Names of the attributes this volume exposes. Indices into this
    /// list are what `BoundAttr` captures; they are volume-specific.
    fn attribute_names(&self) -> &[String];

    /// Evaluates one attribute at `state.ws_p`. Points outside the
    /// volume and unbound attributes yield zero, never an error.
    fn sample(&self, state: &VolumeSampleState, attribute: &BoundAttr)
            -> VolumeSample;

    /// Axis-aligned world-space bounding box.
    fn ws_bounds(&self) -> AABB;

    /// Ray-parameter intervals where the ray overlaps this volume.
    fn intersect(&self, state: &RayState) -> IntervalVec;

    fn phase_function(&self) -> Arc<dyn PhaseFunction>;

    /// String-formatted description, one line per item.
    fn info(&self) -> Vec<String> {
        Vec::new()
    }
}
