// Copyright @yucwang 2026

use crate::math::constants::{ Float, Int };

use std::collections::HashMap;

/// String-keyed configuration bag, the surface through which drivers
/// configure raymarchers without knowing their concrete type.
#[derive(Debug, Clone, Default)]
pub struct ParamMap {
    float_map: HashMap<String, Float>,
    int_map: HashMap<String, Int>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_float(&mut self, name: &str, value: Float) -> &mut Self {
        self.float_map.insert(name.to_string(), value);
        self
    }

    pub fn set_int(&mut self, name: &str, value: Int) -> &mut Self {
        self.int_map.insert(name.to_string(), value);
        self
    }

    pub fn float(&self, name: &str) -> Option<Float> {
        self.float_map.get(name).copied()
    }

    pub fn int(&self, name: &str) -> Option<Int> {
        self.int_map.get(name).copied()
    }
}

/* Tests for ParamMap */
