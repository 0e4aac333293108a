// Copyright @yucwang 2026

pub mod adaptive;
pub mod uniform;

use crate::math::color::{ self, Color };
use crate::math::constants::Float;
use crate::math::curve::ColorCurve;
use crate::render::scene::Scene;
use crate::render::state::RayState;

/// Output of integrating one ray: accumulated luminance, final
/// transmittance, and the optional deep functions recording both as
/// curves over ray parameter t.
pub struct IntegrationResult {
    pub luminance: Color,
    pub transmittance: Color,
    pub luminance_function: Option<ColorCurve>,
    pub transmittance_function: Option<ColorCurve>,
}

impl IntegrationResult {
    /// The empty result: a ray that never touched the volume carries
    /// no luminance and full transmittance.
    pub fn empty() -> Self {
        Self {
            luminance: color::zero(),
            transmittance: color::one(),
            luminance_function: None,
            transmittance_function: None,
        }
    }
}

/// Numerical integrator for the radiative transfer equation along one
/// ray. Implementations must be safe for concurrent read-only access.
pub trait Raymarcher: Send + Sync {
    fn integrate(&self, scene: &Scene, state: &RayState) -> IntegrationResult;
}

/// Starts the deep luminance curve at the front of the first interval.
pub fn setup_deep_l_curve(state: &RayState, first: Float) -> Option<ColorCurve> {
    if !state.do_output_deep_l {
        return None;
    }
    let mut curve = ColorCurve::new();
    curve.add_sample(first, color::zero());
    Some(curve)
}

/// Starts the deep transmittance curve at the front of the first
/// interval.
pub fn setup_deep_t_curve(state: &RayState, first: Float) -> Option<ColorCurve> {
    if !state.do_output_deep_t {
        return None;
    }
    let mut curve = ColorCurve::new();
    curve.add_sample(first, color::one());
    Some(curve)
}

pub fn update_deep_functions(t: Float, luminance: Color, transmittance: Color,
                             lf: &mut Option<ColorCurve>,
                             tf: &mut Option<ColorCurve>) {
    if let Some(curve) = lf {
        curve.add_sample(t, luminance);
    }
    if let Some(curve) = tf {
        curve.add_sample(t, transmittance);
    }
}
