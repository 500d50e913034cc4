//! The technique/variant data model (§3, §4.7): what each rendering pass
//! needs from the loader, independent of how its shader body is emitted.

use rustc_hash::FxHashMap;

/// How a variant wants shadow rays handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowHandlingMode {
    /// A single shadow ray per sample, no material evaluation on the hit.
    Simple,
    /// Shadow rays may traverse non-opaque surfaces but skip full shading.
    Advanced,
    /// Shadow rays fully evaluate hit materials (e.g. MIS AOV variants).
    AdvancedWithMaterials,
}

/// A callback slot a variant may install a named generator for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackType {
    /// Runs once before each iteration launches this variant's shaders.
    BeforeIteration,
    /// Runs once after each iteration's launches complete.
    AfterIteration,
}

/// The default emitter-payload-initializer name used when a variant does
/// not declare its own (§4.5 supplement: `original_source` is
/// authoritative, not the distillation's guess).
pub const DEFAULT_EMITTER_PAYLOAD_INITIALIZER: &str = "empty_payload_initializer";

/// One pass within a technique: its own shader set, payload sizes,
/// framebuffer policy, and camera override (§3 "Variant").
#[derive(Debug, Clone, PartialEq)]
pub struct TechniqueVariantInfo {
    /// How shadow rays are handled for this variant.
    pub shadow_handling_mode: ShadowHandlingMode,
    /// Whether this variant samples scene lights.
    pub uses_lights: bool,
    /// Whether this variant reads participating media.
    pub uses_media: bool,
    /// Whether infinite lights are evaluated in the miss shader even when
    /// `uses_lights` would otherwise gate that on hit shaders only.
    pub uses_all_lights_in_miss: bool,
    /// The primary ray payload's field count.
    pub primary_payload_count: usize,
    /// The secondary (shadow) ray payload's field count.
    pub secondary_payload_count: usize,
    /// The named emitter-payload initializer function, if this variant
    /// does not use the default.
    pub emitter_payload_initializer: Option<String>,
    /// The named camera-ray generator this variant uses instead of the
    /// default perspective generator (e.g. a light-tracer's "rays from
    /// lights" generator).
    pub override_camera_generator: Option<String>,
    /// Whether this variant requires an explicit camera object in the
    /// scene (false for variants that synthesize their own rays, e.g.
    /// light-tracer passes).
    pub requires_explicit_camera: bool,
    /// Named generators keyed by callback slot.
    pub callback_generators: FxHashMap<CallbackType, String>,
    /// Overrides the film width used to launch this variant.
    pub override_width: Option<usize>,
    /// Overrides the film height used to launch this variant.
    pub override_height: Option<usize>,
    /// Overrides the samples-per-iteration used for this variant.
    pub override_spi: Option<usize>,
    /// Whether this variant's framebuffer is excluded from the
    /// iteration/sample-count accounting (§4.9, §8 item 8).
    pub lock_framebuffer: bool,
}

impl Default for TechniqueVariantInfo {
    fn default() -> Self {
        Self {
            shadow_handling_mode: ShadowHandlingMode::Simple,
            uses_lights: false,
            uses_media: false,
            uses_all_lights_in_miss: false,
            primary_payload_count: 0,
            secondary_payload_count: 0,
            emitter_payload_initializer: None,
            override_camera_generator: None,
            requires_explicit_camera: true,
            callback_generators: FxHashMap::default(),
            override_width: None,
            override_height: None,
            override_spi: None,
            lock_framebuffer: false,
        }
    }
}

impl TechniqueVariantInfo {
    /// The emitter-payload-initializer name to use, falling back to
    /// [`DEFAULT_EMITTER_PAYLOAD_INITIALIZER`] when unset.
    pub fn emitter_payload_initializer_name(&self) -> &str {
        self.emitter_payload_initializer.as_deref().unwrap_or(DEFAULT_EMITTER_PAYLOAD_INITIALIZER)
    }

    /// The samples-per-iteration this variant actually launches with,
    /// given the technique's `hint_spi` (§4.9 "GetSPI(hint)").
    pub fn spi(&self, hint_spi: usize) -> usize { self.override_spi.unwrap_or(hint_spi) }
}

/// Chooses which variant indices are active for a given iteration index.
/// Absent, every variant runs every iteration in declared order (§4.9
/// step 1: "else sweep all variants").
pub type VariantSelector = std::sync::Arc<dyn Fn(usize) -> Vec<usize> + Send + Sync>;

/// A technique's full registration: enabled AOVs, its ordered variants,
/// and an optional variant selector (§3 "Technique info").
#[derive(Clone)]
pub struct TechniqueInfo {
    /// AOV names this technique contributes, beyond the base framebuffer.
    pub aov_names: Vec<String>,
    /// The technique's variants, in declaration order.
    pub variants: Vec<TechniqueVariantInfo>,
    /// The variant selector, if the technique restricts which variants
    /// run on a given iteration.
    pub selector: Option<VariantSelector>,
}

impl std::fmt::Debug for TechniqueInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TechniqueInfo")
            .field("aov_names", &self.aov_names)
            .field("variants", &self.variants)
            .field("selector", &self.selector.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl TechniqueInfo {
    /// A technique with a single default-configured variant and no AOVs.
    pub fn single_variant(variant: TechniqueVariantInfo) -> Self {
        Self { aov_names: Vec::new(), variants: vec![variant], selector: None }
    }

    /// The variant indices active for `iteration`: the selector's choice
    /// if one is installed, else every variant index in order.
    pub fn active_variants(&self, iteration: usize) -> Vec<usize> {
        match &self.selector {
            Some(selector) => selector(iteration),
            None => (0..self.variants.len()).collect(),
        }
    }

    /// Sum `GetSPI(hint_spi)` over the variants active at `iteration`,
    /// excluding any with `lock_framebuffer` set (§4.7 supplement:
    /// `compute_spi` "excluding any with lock_framebuffer").
    pub fn compute_spi(&self, iteration: usize, hint_spi: usize) -> usize {
        self.active_variants(iteration)
            .into_iter()
            .filter_map(|i| self.variants.get(i))
            .filter(|v| !v.lock_framebuffer)
            .map(|v| v.spi(hint_spi))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_variant_uses_the_default_emitter_initializer() {
        let variant = TechniqueVariantInfo::default();
        assert_eq!(variant.emitter_payload_initializer_name(), DEFAULT_EMITTER_PAYLOAD_INITIALIZER);
    }

    #[test]
    fn compute_spi_sums_unlocked_active_variants() {
        let mut locked = TechniqueVariantInfo { lock_framebuffer: true, override_spi: Some(1), ..Default::default() };
        let unlocked = TechniqueVariantInfo { override_spi: Some(4), ..Default::default() };
        locked.lock_framebuffer = true;
        let info = TechniqueInfo { aov_names: vec![], variants: vec![locked, unlocked], selector: None };
        assert_eq!(info.compute_spi(0, 8), 4);
    }

    #[test]
    fn compute_spi_falls_back_to_hint_when_unset() {
        let variant = TechniqueVariantInfo::default();
        let info = TechniqueInfo::single_variant(variant);
        assert_eq!(info.compute_spi(0, 16), 16);
    }

    #[test]
    fn selector_restricts_active_variants() {
        let v0 = TechniqueVariantInfo::default();
        let v1 = TechniqueVariantInfo::default();
        let selector: VariantSelector = std::sync::Arc::new(|iter| if iter == 0 { vec![0, 1] } else { vec![0] });
        let info = TechniqueInfo { aov_names: vec![], variants: vec![v0, v1], selector: Some(selector) };
        assert_eq!(info.active_variants(0), vec![0, 1]);
        assert_eq!(info.active_variants(1), vec![0]);
    }
}
