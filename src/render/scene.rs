// Copyright @yucwang 2026

use crate::lights::Light;
use crate::volumes::Volume;

use std::sync::Arc;

/// Everything a raymarcher needs to shade a ray: the scene volume and
/// the lights illuminating it. Immutable once rendering starts.
#[derive(Clone)]
pub struct Scene {
    pub volume: Arc<dyn Volume>,
    pub lights: Vec<Arc<dyn Light>>,
}

impl Scene {
    pub fn new(volume: Arc<dyn Volume>) -> Self {
        Self { volume, lights: Vec::new() }
    }

    pub fn add_light(&mut self, light: Arc<dyn Light>) {
        self.lights.push(light);
    }
}
