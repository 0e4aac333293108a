// Copyright @yucwang 2026

pub mod raymarch;

use crate::math::bitmap::Bitmap;
use crate::render::scene::Scene;

/// Produces an image of a scene. Implementations own their camera and
/// integration strategy; the scene is shared read-only across worker
/// threads.
pub trait Renderer {
    fn render(&self, scene: &Scene) -> Bitmap;
}
