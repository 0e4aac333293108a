// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::color;
use crate::phase::{ Composite, Isotropic, PhaseFunction };
use crate::render::interval::IntervalVec;
use crate::render::state::{ RayState, VolumeSampleState };
use crate::volumes::volume_attr::BoundAttr;
use crate::volumes::{ Volume, VolumeSample };

use std::sync::Arc;

/// Union of child volumes. Attribute values add; the attribute name
/// list is the union of the children's lists, and each composite
/// attribute index is resolved to per-child handles when a child is
/// added, so sampling stays lookup-free.
pub struct CompositeVolume {
    volumes: Vec<Arc<dyn Volume>>,
    attr_names: Vec<String>,
    // child_attrs[attr][child]
    child_attrs: Vec<Vec<BoundAttr>>,
    phase_function: Arc<dyn PhaseFunction>,
}

impl CompositeVolume {
    pub fn new() -> Self {
        Self {
            volumes: Vec::new(),
            attr_names: Vec::new(),
            child_attrs: Vec::new(),
            phase_function: Arc::new(Isotropic),
        }
    }

    pub fn add_volume(&mut self, volume: Arc<dyn Volume>) {
        for name in volume.attribute_names() {
            if !self.attr_names.contains(name) {
                self.attr_names.push(name.clone());
            }
        }
        self.volumes.push(volume);
        self.rebind();
        self.rebuild_phase_function();
    }

    pub fn volume_count(&self) -> usize {
        self.volumes.len()
    }

    fn rebind(&mut self) {
        self.child_attrs = self.attr_names.iter()
            .map(|name| self.volumes.iter()
                 .map(|v| BoundAttr::from_names(name, v.attribute_names()))
                 .collect())
            .collect();
    }

    // Children contribute equally; per-sample weighting by local
    // density would require interior mutability during rendering.
    fn rebuild_phase_function(&mut self) {
        let mut composite = Composite::new();
        for volume in self.volumes.iter() {
            composite.add(volume.phase_function());
        }
        self.phase_function = Arc::new(composite);
    }
}

impl Default for CompositeVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl Volume for CompositeVolume {
    fn attribute_names(&self) -> &[String] {
        &self.attr_names
    }

    fn sample(&self, state: &VolumeSampleState, attribute: &BoundAttr)
            -> VolumeSample {
        let idx = match attribute.index() {
            Some(idx) if idx < self.child_attrs.len() => idx,
            _ => return VolumeSample::new(color::zero(),
                                          self.phase_function.clone()),
        };

        let mut value = color::zero();
        for (volume, child_attr) in
                self.volumes.iter().zip(self.child_attrs[idx].iter()) {
            value += volume.sample(state, child_attr).value;
        }
        VolumeSample::new(value, self.phase_function.clone())
    }

    fn ws_bounds(&self) -> AABB {
        let mut bounds = AABB::default();
        for volume in self.volumes.iter() {
            bounds.expand_by_aabb(&volume.ws_bounds());
        }
        bounds
    }

    fn intersect(&self, state: &RayState) -> IntervalVec {
        let mut intervals = IntervalVec::new();
        for volume in self.volumes.iter() {
            intervals.extend(volume.intersect(state));
        }
        intervals
    }

    fn phase_function(&self) -> Arc<dyn PhaseFunction> {
        self.phase_function.clone()
    }

    fn info(&self) -> Vec<String> {
        let mut lines = vec![format!("composite of {} volumes",
                                     self.volumes.len())];
        for volume in self.volumes.iter() {
            lines.extend(volume.info());
        }
        lines
    }
}

/* Tests for CompositeVolume */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::color::Color;
    use crate::math::constants::Vector3f;
    use crate::math::ray::Ray3f;
    use crate::math::transform::Transform;
    use crate::volumes::constant_volume::ConstantVolume;
    use crate::volumes::volume_attr::VolumeAttr;

    fn box_volume(offset: Vector3f, name: &str, value: Color)
            -> Arc<dyn Volume> {
        let xform = Transform::from_translation_scale(
            offset, Vector3f::new(1.0, 1.0, 1.0));
        let mut volume = ConstantVolume::new(xform);
        volume.add_attribute(name, value);
        Arc::new(volume)
    }

    #[test]
    fn test_values_add_in_overlap() {
        let mut composite = CompositeVolume::new();
        composite.add_volume(box_volume(Vector3f::new(0.0, 0.0, 0.0),
                                        "scattering", color::gray(1.0)));
        composite.add_volume(box_volume(Vector3f::new(0.5, 0.0, 0.0),
                                        "scattering", color::gray(2.0)));

        let attr = VolumeAttr::new("scattering").bind(&composite);
        let ray_state = RayState::new(Ray3f::new(
            Vector3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0)));

        let overlap = VolumeSampleState::new(&ray_state,
                                             Vector3f::new(0.75, 0.5, 0.5));
        assert_eq!(composite.sample(&overlap, &attr).value, color::gray(3.0));

        let first_only = VolumeSampleState::new(&ray_state,
                                                Vector3f::new(0.25, 0.5, 0.5));
        assert_eq!(composite.sample(&first_only, &attr).value,
                   color::gray(1.0));
    }

    #[test]
    fn test_attribute_union_and_partial_binding() {
        let mut composite = CompositeVolume::new();
        composite.add_volume(box_volume(Vector3f::new(0.0, 0.0, 0.0),
                                        "scattering", color::gray(1.0)));
        composite.add_volume(box_volume(Vector3f::new(0.0, 0.0, 0.0),
                                        "emission", color::gray(4.0)));

        assert_eq!(composite.attribute_names(),
                   &["scattering".to_string(), "emission".to_string()]);

        let attr = VolumeAttr::new("emission").bind(&composite);
        let ray_state = RayState::new(Ray3f::new(
            Vector3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0)));
        let state = VolumeSampleState::new(&ray_state,
                                           Vector3f::new(0.5, 0.5, 0.5));
        // Only the second child exposes emission.
        assert_eq!(composite.sample(&state, &attr).value, color::gray(4.0));
    }

    #[test]
    fn test_intersect_concatenates_children() {
        let mut composite = CompositeVolume::new();
        composite.add_volume(box_volume(Vector3f::new(0.0, 0.0, 0.0),
                                        "scattering", color::gray(1.0)));
        composite.add_volume(box_volume(Vector3f::new(0.0, 0.0, 3.0),
                                        "scattering", color::gray(1.0)));

        let state = RayState::new(Ray3f::new(
            Vector3f::new(0.5, 0.5, -1.0), Vector3f::new(0.0, 0.0, 1.0)));
        let intervals = composite.intersect(&state);
        assert_eq!(intervals.len(), 2);
    }

    #[test]
    fn test_bounds_cover_all_children() {
        let mut composite = CompositeVolume::new();
        composite.add_volume(box_volume(Vector3f::new(0.0, 0.0, 0.0),
                                        "scattering", color::gray(1.0)));
        composite.add_volume(box_volume(Vector3f::new(2.0, 0.0, 0.0),
                                        "scattering", color::gray(1.0)));
        let bounds = composite.ws_bounds();
        assert!((bounds.p_min - Vector3f::new(0.0, 0.0, 0.0)).norm() < 1e-9);
        assert!((bounds.p_max - Vector3f::new(3.0, 1.0, 1.0)).norm() < 1e-9);
    }
}
