/* Copyright 2026 @Yuchen Wong */

pub type Float = f64;
pub type Int = i32;
pub type UInt = u32;

pub type Vector2f = nalgebra::Vector2<Float>;
pub type Vector3f = nalgebra::Vector3<Float>;
pub type Vector3i = nalgebra::Vector3<Int>;
pub type Matrix4f = nalgebra::Matrix4<Float>;

pub const EPSILON: Float = 1e-6;
pub const PI: Float = std::f64::consts::PI;
pub const INV_PI: Float = std::f64::consts::FRAC_1_PI;
pub const FLOAT_MIN: Float = std::f64::MIN;
pub const FLOAT_MAX: Float = std::f64::MAX;
