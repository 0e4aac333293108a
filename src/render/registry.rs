// Copyright @yucwang 2026

use crate::phase::{ DoubleHenyeyGreenstein, HenyeyGreenstein, Isotropic,
                    PhaseFunction };
use crate::render::error::ConfigError;

use std::collections::HashMap;
use std::sync::Arc;

/// Maps type names to constructors for one trait-object family, so
/// drivers can build raymarchers, samplers or phase functions from
/// configuration strings. Registries are plain values owned by the
/// caller; there is no global instance.
pub struct Registry<T: ?Sized> {
    constructors: HashMap<String, Box<dyn Fn() -> Arc<T> + Send + Sync>>,
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self { constructors: HashMap::new() }
    }

    pub fn register<F>(&mut self, name: &str, constructor: F)
            where F: Fn() -> Arc<T> + Send + Sync + 'static {
        self.constructors.insert(name.to_string(), Box::new(constructor));
    }

    pub fn create(&self, name: &str) -> Result<Arc<T>, ConfigError> {
        match self.constructors.get(name) {
            Some(constructor) => Ok(constructor()),
            None => Err(ConfigError::UnknownTypeName(name.to_string())),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys()
            .map(|k| k.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in phase functions under their conventional names.
/// Raymarchers and samplers take constructor arguments bound to a
/// scene, so drivers register those per scene instead.
pub fn standard_phase_functions() -> Registry<dyn PhaseFunction> {
    let mut registry: Registry<dyn PhaseFunction> = Registry::new();
    registry.register("isotropic", || Arc::new(Isotropic));
    registry.register("henyey_greenstein",
                      || Arc::new(HenyeyGreenstein::new(0.5)));
    registry.register("double_henyey_greenstein",
                      || Arc::new(DoubleHenyeyGreenstein::new(0.6, -0.3, 0.7)));
    registry
}

/* Tests for Registry */
