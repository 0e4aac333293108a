// Copyright @yucwang 2026

use super::constants::{ Float, Vector3f };

/// RGB radiance/transmittance value. Channels are independent throughout
/// the integrator; any cross-channel coupling happens upstream in lights
/// and phase functions.
pub type Color = Vector3f;

pub fn zero() -> Color {
    Color::new(0.0, 0.0, 0.0)
}

pub fn one() -> Color {
    Color::new(1.0, 1.0, 1.0)
}

pub fn gray(v: Float) -> Color {
    Color::new(v, v, v)
}

/// Component-wise exponential, used for Beer-Lambert updates.
pub fn exp(c: Color) -> Color {
    Color::new(c.x.exp(), c.y.exp(), c.z.exp())
}

pub fn max_comp(c: Color) -> Float {
    c.x.max(c.y).max(c.z)
}

pub fn lerp(a: Color, b: Color, t: Color) -> Color {
    Color::new(
        a.x + (b.x - a.x) * t.x,
        a.y + (b.y - a.y) * t.y,
        a.z + (b.z - a.z) * t.z,
    )
}

/* Tests for color helpers */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_and_max() {
        let c = exp(Color::new(0.0, -1.0, -2.0));
        assert!((c.x - 1.0).abs() < 1e-12);
        assert!((c.y - (-1.0f64).exp()).abs() < 1e-12);
        assert_eq!(max_comp(Color::new(0.25, 0.5, 0.125)), 0.5);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Color::new(1.0, 2.0, 3.0);
        let b = Color::new(4.0, 5.0, 6.0);
        assert_eq!(lerp(a, b, zero()), a);
        assert_eq!(lerp(a, b, one()), b);
    }
}
