//! The optional `PayloadInfo` literal (§4.8 step 3), sized from the
//! owning variant's payload counts.

use ignis_technique::TechniqueVariantInfo;

/// The `PayloadInfo { primary_count, secondary_count }` literal a shader
/// emits when its variant declares non-zero payload sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadInfo {
    /// Number of `f32` slots in the primary ray payload.
    pub primary_count: usize,
    /// Number of `f32` slots in the secondary ray payload.
    pub secondary_count: usize,
}

impl PayloadInfo {
    /// Derives a payload literal from a technique variant, or `None` if
    /// the variant declares no payload (both counts zero).
    pub fn from_variant(variant: &TechniqueVariantInfo) -> Option<Self> {
        if variant.primary_payload_count == 0 && variant.secondary_payload_count == 0 {
            return None;
        }
        Some(Self { primary_count: variant.primary_payload_count, secondary_count: variant.secondary_payload_count })
    }

    /// Renders the `let payload_info = PayloadInfo { … };` DSL line.
    pub fn to_dsl(self) -> String {
        format!("let payload_info = PayloadInfo {{ primary_count = {}, secondary_count = {} }};", self.primary_count, self.secondary_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_payload_variant_emits_nothing() {
        let variant = TechniqueVariantInfo::default();
        assert!(PayloadInfo::from_variant(&variant).is_none());
    }

    #[test]
    fn nonzero_payload_renders_both_counts() {
        let variant = TechniqueVariantInfo { primary_payload_count: 6, secondary_payload_count: 1, ..Default::default() };
        let payload = PayloadInfo::from_variant(&variant).unwrap();
        assert_eq!(payload.to_dsl(), "let payload_info = PayloadInfo { primary_count = 6, secondary_count = 1 };");
    }
}
