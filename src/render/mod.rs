// Copyright @yucwang 2026

pub mod error;
pub mod interval;
pub mod params;
pub mod raymarchers;
pub mod registry;
pub mod samplers;
pub mod scene;
pub mod state;
