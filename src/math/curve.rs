// Copyright @yucwang 2026

use super::color::Color;
use super::constants::Float;

/// Piecewise-linear function from ray parameter to color. Used for the
/// in-memory deep luminance/transmittance functions that a raymarch can
/// emit alongside its scalar result.
#[derive(Debug, Clone, Default)]
pub struct ColorCurve {
    samples: Vec<(Float, Color)>,
}

impl ColorCurve {
    pub fn new() -> Self {
        Self { samples: Vec::new() }
    }

    /// Samples must be added in increasing t order.
    pub fn add_sample(&mut self, t: Float, value: Color) {
        self.samples.push((t, value));
    }

    /// Drops interior samples whose value equals both neighbors, keeping
    /// the curve minimal after long constant runs.
    pub fn remove_duplicates(&mut self) {
        if self.samples.len() < 3 {
            return;
        }
        let mut kept = Vec::with_capacity(self.samples.len());
        kept.push(self.samples[0]);
        for idx in 1..self.samples.len() - 1 {
            let prev = self.samples[idx - 1].1;
            let cur = self.samples[idx].1;
            let next = self.samples[idx + 1].1;
            if cur != prev || cur != next {
                kept.push(self.samples[idx]);
            }
        }
        kept.push(self.samples[self.samples.len() - 1]);
        self.samples = kept;
    }

    pub fn interpolate(&self, t: Float) -> Color {
        match self.samples.len() {
            0 => Color::new(0.0, 0.0, 0.0),
            1 => self.samples[0].1,
            _ => {
                if t <= self.samples[0].0 {
                    return self.samples[0].1;
                }
                let last = self.samples[self.samples.len() - 1];
                if t >= last.0 {
                    return last.1;
                }
                let hi = match self.samples.iter().position(|s| s.0 > t) {
                    Some(hi) => hi,
                    None => return last.1,
                };
                let (t0, v0) = self.samples[hi - 1];
                let (t1, v1) = self.samples[hi];
                let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
                v0 + (v1 - v0) * f
            }
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[(Float, Color)] {
        &self.samples
    }
}

/* Tests for ColorCurve */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::color;

    #[test]
    fn test_interpolate_between_samples() {
        let mut curve = ColorCurve::new();
        curve.add_sample(0.0, color::zero());
        curve.add_sample(2.0, color::gray(1.0));
        let mid = curve.interpolate(1.0);
        assert!((mid.x - 0.5).abs() < 1e-12);
        assert_eq!(curve.interpolate(-1.0), color::zero());
        assert_eq!(curve.interpolate(5.0), color::gray(1.0));
    }

    #[test]
    fn test_remove_duplicates_keeps_endpoints() {
        let mut curve = ColorCurve::new();
        curve.add_sample(0.0, color::one());
        curve.add_sample(1.0, color::one());
        curve.add_sample(2.0, color::one());
        curve.add_sample(3.0, color::gray(0.5));
        curve.remove_duplicates();
        assert_eq!(curve.len(), 3);
        assert_eq!(curve.samples()[0].0, 0.0);
        assert_eq!(curve.samples()[2].0, 3.0);
    }
}
