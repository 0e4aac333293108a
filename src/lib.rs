// Copyright @yucwang 2026

#![allow(dead_code)]

pub mod math;
pub mod buffer;
pub mod volumes;
pub mod phase;
pub mod lights;
pub mod occluders;
pub mod render;
pub mod renderers;
pub mod io;
