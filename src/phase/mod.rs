// Copyright @yucwang 2026

use crate::math::constants::{ Float, Vector3f, PI };

/// Probability of the isotropic phase function; phase functions are
/// normalized so integrating over the sphere yields one.
pub const K_ISOTROPIC: Float = 1.0 / (4.0 * PI);

/// Scattering-direction distribution given an incoming direction.
/// Implementations must be safe for concurrent read-only access.
pub trait PhaseFunction: Send + Sync {
    fn probability(&self, ws_in: Vector3f, ws_out: Vector3f) -> Float;
}

pub struct Isotropic;

impl PhaseFunction for Isotropic {
    fn probability(&self, _ws_in: Vector3f, _ws_out: Vector3f) -> Float {
        K_ISOTROPIC
    }
}

pub struct HenyeyGreenstein {
    g: Float,
}

impl HenyeyGreenstein {
    pub fn new(g: Float) -> Self {
        Self { g: g.clamp(-1.0, 1.0) }
    }
}

impl PhaseFunction for HenyeyGreenstein {
    fn probability(&self, ws_in: Vector3f, ws_out: Vector3f) -> Float {
        let cos_theta = ws_in.dot(&ws_out);
        K_ISOTROPIC * (1.0 - self.g * self.g) /
            (1.0 + self.g * self.g - 2.0 * self.g * cos_theta).powf(1.5)
    }
}

pub struct DoubleHenyeyGreenstein {
    g1: Float,
    g2: Float,
    blend: Float,
}

impl DoubleHenyeyGreenstein {
    pub fn new(g1: Float, g2: Float, blend: Float) -> Self {
        Self {
            g1: g1.clamp(-1.0, 1.0),
            g2: g2.clamp(-1.0, 1.0),
            blend: blend.clamp(0.0, 1.0),
        }
    }
}

impl PhaseFunction for DoubleHenyeyGreenstein {
    fn probability(&self, ws_in: Vector3f, ws_out: Vector3f) -> Float {
        let cos_theta = ws_in.dot(&ws_out);
        let p1 = K_ISOTROPIC * (1.0 - self.g1 * self.g1) /
            (1.0 + self.g1 * self.g1 - 2.0 * self.g1 * cos_theta).powf(1.5);
        let p2 = K_ISOTROPIC * (1.0 - self.g2 * self.g2) /
            (1.0 + self.g2 * self.g2 - 2.0 * self.g2 * cos_theta).powf(1.5);
        p2 + (p1 - p2) * self.blend
    }
}

/// Weighted blend of several phase functions, used by composite volumes
/// whose children scatter differently. Weights are fixed at setup time.
pub struct Composite {
    functions: Vec<std::sync::Arc<dyn PhaseFunction>>,
    weights: Vec<Float>,
}

impl Composite {
    pub fn new() -> Self {
        Self { functions: Vec::new(), weights: Vec::new() }
    }

    pub fn add(&mut self, function: std::sync::Arc<dyn PhaseFunction>) {
        self.functions.push(function);
        self.weights.push(1.0);
    }

    pub fn set_weight(&mut self, idx: usize, weight: Float) {
        assert!(idx < self.weights.len());
        self.weights[idx] = weight;
    }
}

impl PhaseFunction for Composite {
    fn probability(&self, ws_in: Vector3f, ws_out: Vector3f) -> Float {
        let mut p = 0.0;
        let mut weight = 0.0;
        for (function, w) in self.functions.iter().zip(self.weights.iter()) {
            p += function.probability(ws_in, ws_out) * w;
            weight += w;
        }
        if weight > 0.0 { p / weight } else { 0.0 }
    }
}

/* Tests for phase functions */
