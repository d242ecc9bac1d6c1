//! Shader variant descriptors
//!
//! A variant is the ordered set of preprocessor defines selecting which
//! optional shader code paths compile in. Variants are derived from the
//! vertex attributes a mesh carries and the textures its material binds,
//! and key shader-module memoization in the resource cache.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// Ordered set of shader preprocessor defines
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ShaderVariant {
    defines: BTreeSet<String>,
}

impl ShaderVariant {
    /// Create an empty variant
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a define
    pub fn add_define(&mut self, define: impl Into<String>) {
        self.defines.insert(define.into());
    }

    /// Add the `HAS_<NAME>` define for a present attribute or texture,
    /// upper-casing the name
    pub fn add_present(&mut self, name: &str) {
        self.add_define(format!("HAS_{}", name.to_uppercase()));
    }

    /// Remove every define
    pub fn clear(&mut self) {
        self.defines.clear();
    }

    /// Defines in sorted order
    pub fn defines(&self) -> impl Iterator<Item = &str> {
        self.defines.iter().map(String::as_str)
    }

    /// Check for a specific define
    pub fn has_define(&self, define: &str) -> bool {
        self.defines.contains(define)
    }

    /// Number of defines
    pub fn len(&self) -> usize {
        self.defines.len()
    }

    /// Whether the variant has no defines
    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    /// Stable content hash used as a memoization key
    pub fn hash_id(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.defines.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_defines_are_upper_cased() {
        let mut variant = ShaderVariant::new();
        variant.add_present("position");
        variant.add_present("baseColor");
        assert!(variant.has_define("HAS_POSITION"));
        assert!(variant.has_define("HAS_BASECOLOR"));
    }

    #[test]
    fn hash_is_order_independent() {
        let mut a = ShaderVariant::new();
        a.add_define("HAS_NORMAL");
        a.add_define("HAS_POSITION");

        let mut b = ShaderVariant::new();
        b.add_define("HAS_POSITION");
        b.add_define("HAS_NORMAL");

        assert_eq!(a.hash_id(), b.hash_id());
        assert_ne!(a.hash_id(), ShaderVariant::new().hash_id());
    }
}
