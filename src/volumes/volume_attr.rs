// Copyright @yucwang 2026

use crate::volumes::Volume;

/// Named reference to a volume attribute. Resolution against a concrete
/// volume is an explicit, separate step: `bind` once per volume before
/// rendering, then sample through the returned handle many times. This
/// keeps the hot path free of name lookups and makes the thread-safety
/// boundary visible, since a bound handle is only meaningful for the
/// volume it was bound against.
#[derive(Debug, Clone)]
pub struct VolumeAttr {
    name: String,
}

impl VolumeAttr {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolves the attribute against a volume's attribute list. A name
    /// the volume does not expose binds to the invalid sentinel, which
    /// samples as zero.
    pub fn bind(&self, volume: &dyn Volume) -> BoundAttr {
        BoundAttr::from_names(&self.name, volume.attribute_names())
    }
}

/// Resolved attribute handle: either an index into one specific
/// volume's attribute list, or the invalid sentinel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BoundAttr {
    index: Option<usize>,
}

impl BoundAttr {
    pub fn from_names(name: &str, names: &[String]) -> Self {
        Self { index: names.iter().position(|n| n == name) }
    }

    pub fn invalid() -> Self {
        Self { index: None }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_valid(&self) -> bool {
        self.index.is_some()
    }
}

/* Tests for attribute binding */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_by_name_list() {
        let names = vec!["scattering".to_string(), "emission".to_string()];
        let bound = BoundAttr::from_names("emission", &names);
        assert_eq!(bound.index(), Some(1));

        let missing = BoundAttr::from_names("absorption", &names);
        assert!(!missing.is_valid());
    }
}
