// Copyright @yucwang 2026

use thiserror::Error;

/// Setup-time failures. These abort configuration before any rendering
/// work begins; per-sample conditions (points outside a data window,
/// unbound attributes) are soft and never surface here.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("step length must be positive, got {0}")]
    NonPositiveStepLength(f64),
    #[error("voxel buffer is empty")]
    EmptyBuffer,
    #[error("attribute name and value counts differ: {names} vs {values}")]
    AttributeCountMismatch { names: usize, values: usize },
    #[error("no constructor registered under name '{0}'")]
    UnknownTypeName(String),
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}
