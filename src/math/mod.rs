// Copyright @yucwang 2026

pub mod aabb;
pub mod bitmap;
pub mod color;
pub mod constants;
pub mod curve;
pub mod ray;
pub mod transform;
