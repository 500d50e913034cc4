//! Parameter-acquisition options (§4.5): how `add_number`/`add_color`/
//! `add_vector`/`add_texture` decide whether a scene property is baked
//! into the shader source as a literal or wired through as a runtime
//! parameter.

/// How a shading-tree parameter gets embedded into generated DSL source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedType {
    /// The value is structural: known at scene-load time and always
    /// baked as a literal (e.g. a texture's resolution).
    Structural,
    /// The value may vary at runtime and is passed through a registered
    /// parameter instead of being inlined.
    Dynamic,
    /// Use the shading tree's ambient default policy for this kind of
    /// parameter (embed numeric/color/vector constants, register
    /// everything else dynamically).
    Default,
}

/// Options controlling how a scalar parameter is acquired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberOptions {
    /// The embedding policy.
    pub embed: EmbedType,
    /// The value used when the scene property is absent.
    pub default: f64,
    /// Under [`EmbedType::Default`], embed if the acquired value is zero.
    pub specialize_zero: bool,
    /// Under [`EmbedType::Default`], embed if the acquired value is one.
    pub specialize_one: bool,
}

impl NumberOptions {
    /// Always embed the literal value, never register a parameter.
    pub fn structural(default: f64) -> Self {
        Self { embed: EmbedType::Structural, default, specialize_zero: true, specialize_one: true }
    }

    /// Always register a runtime parameter, never inline a literal.
    pub fn dynamic(default: f64) -> Self {
        Self { embed: EmbedType::Dynamic, default, specialize_zero: false, specialize_one: false }
    }

    /// Use the shading tree's default policy, embedding only when the
    /// acquired value is zero; defaults to `0` if the property is unset.
    pub fn zero() -> Self {
        Self { embed: EmbedType::Default, default: 0.0, specialize_zero: true, specialize_one: false }
    }

    /// Use the shading tree's default policy, embedding only when the
    /// acquired value is one; defaults to `1` if the property is unset.
    pub fn one() -> Self {
        Self { embed: EmbedType::Default, default: 1.0, specialize_zero: false, specialize_one: true }
    }
}

/// Options controlling how a color parameter is acquired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorOptions {
    /// The embedding policy.
    pub embed: EmbedType,
    /// The value used when the scene property is absent.
    pub default: [f64; 3],
    /// Under [`EmbedType::Default`], embed if the acquired color is black.
    pub specialize_black: bool,
    /// Under [`EmbedType::Default`], embed if the acquired color is white.
    pub specialize_white: bool,
}

impl ColorOptions {
    /// Always embed the literal color, never register a parameter.
    pub fn structural(default: [f64; 3]) -> Self {
        Self { embed: EmbedType::Structural, default, specialize_black: true, specialize_white: true }
    }

    /// Always register a runtime parameter, never inline a literal.
    pub fn dynamic(default: [f64; 3]) -> Self {
        Self { embed: EmbedType::Dynamic, default, specialize_black: false, specialize_white: false }
    }

    /// Use the shading tree's default policy, embedding only when the
    /// acquired color is black; defaults to black if the property is unset.
    pub fn black() -> Self {
        Self { embed: EmbedType::Default, default: [0.0, 0.0, 0.0], specialize_black: true, specialize_white: false }
    }

    /// Use the shading tree's default policy, embedding only when the
    /// acquired color is white; defaults to white if the property is unset.
    pub fn white() -> Self {
        Self { embed: EmbedType::Default, default: [1.0, 1.0, 1.0], specialize_black: false, specialize_white: true }
    }
}

/// Options controlling how a vector parameter is acquired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorOptions {
    /// The embedding policy.
    pub embed: EmbedType,
    /// The value used when the scene property is absent.
    pub default: [f64; 3],
    /// Under [`EmbedType::Default`], embed if the acquired vector is zero.
    pub specialize_zero: bool,
    /// Under [`EmbedType::Default`], embed if the acquired vector is the
    /// all-ones vector.
    pub specialize_one: bool,
    /// Under [`EmbedType::Default`], embed if the acquired vector is a
    /// signed unit axis (`±x`, `±y`, or `±z`).
    pub specialize_unit_axis: bool,
}

impl VectorOptions {
    /// Always embed the literal vector, never register a parameter.
    pub fn structural(default: [f64; 3]) -> Self {
        Self { embed: EmbedType::Structural, default, specialize_zero: true, specialize_one: true, specialize_unit_axis: true }
    }

    /// Always register a runtime parameter, never inline a literal.
    pub fn dynamic(default: [f64; 3]) -> Self {
        Self { embed: EmbedType::Dynamic, default, specialize_zero: false, specialize_one: false, specialize_unit_axis: false }
    }

    /// Use the shading tree's default policy, embedding only when the
    /// acquired vector is zero; defaults to the zero vector if the
    /// property is unset.
    pub fn zero() -> Self {
        Self {
            embed: EmbedType::Default,
            default: [0.0, 0.0, 0.0],
            specialize_zero: true,
            specialize_one: false,
            specialize_unit_axis: false,
        }
    }
}

/// Options controlling how a texture reference is acquired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureOptions {
    /// The embedding policy. Textures are never structurally embeddable
    /// as a literal (there is no "literal" form of an image); `Structural`
    /// here instead means the texture's *index* is baked in rather than
    /// looked up dynamically by name at render time.
    pub embed: EmbedType,
    /// Whether a missing texture reference falls back to a flat color
    /// instead of being a transpile error.
    pub allow_missing: bool,
}

impl TextureOptions {
    /// A texture reference that must resolve to a declared texture.
    pub fn full() -> Self { Self { embed: EmbedType::Default, allow_missing: false } }

    /// A texture reference that falls back to plain black/white when
    /// absent, used for optional texture slots like bump maps.
    pub fn full_plain() -> Self { Self { embed: EmbedType::Default, allow_missing: true } }

    /// Always bake the texture's index as a structural literal.
    pub fn structural() -> Self { Self { embed: EmbedType::Structural, allow_missing: false } }

    /// Always resolve the texture dynamically at render time.
    pub fn dynamic() -> Self { Self { embed: EmbedType::Dynamic, allow_missing: false } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_one_use_default_policy() {
        assert_eq!(NumberOptions::zero().embed, EmbedType::Default);
        assert_eq!(NumberOptions::one().default, 1.0);
    }

    #[test]
    fn zero_and_one_specialize_on_opposite_predicates() {
        let zero = NumberOptions::zero();
        assert!(zero.specialize_zero && !zero.specialize_one);
        let one = NumberOptions::one();
        assert!(!one.specialize_zero && one.specialize_one);
    }

    #[test]
    fn dynamic_never_specializes() {
        let dynamic = ColorOptions::dynamic([0.2, 0.2, 0.2]);
        assert!(!dynamic.specialize_black && !dynamic.specialize_white);
    }

    #[test]
    fn structural_never_falls_back_to_missing() {
        assert!(!TextureOptions::structural().allow_missing);
        assert!(TextureOptions::full_plain().allow_missing);
    }
}
