//! Texture baking options (§4.5 supplement): rasterizing a pattern DAG
//! node down to a fixed-resolution image buffer instead of leaving it as
//! DSL source evaluated per-shading-point.

/// Options controlling how a texture is baked to an image buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureBakeOptions {
    /// The baked image's width in pixels.
    pub width: usize,
    /// The baked image's height in pixels.
    pub height: usize,
    /// Whether a texture whose evaluation turns out not to depend on its
    /// input coordinates is still baked to a full image (`false`, the
    /// default) or left as a single constant value (`true`).
    pub skip_constant: bool,
}

impl Default for TextureBakeOptions {
    fn default() -> Self { Self { width: 1024, height: 1024, skip_constant: false } }
}

/// A baked texture: either a full raster, or — when
/// [`TextureBakeOptions::skip_constant`] applied and the source turned
/// out constant — a single RGB value.
#[derive(Debug, Clone, PartialEq)]
pub enum BakedTexture {
    /// A `width * height` RGB raster, row-major.
    Image {
        /// The raster's width in pixels.
        width: usize,
        /// The raster's height in pixels.
        height: usize,
        /// Row-major RGB pixel data, `width * height` entries.
        pixels: Vec<[f32; 3]>,
    },
    /// A single constant color, standing in for every pixel.
    Constant([f32; 3]),
}

/// Bake `evaluate` (a per-pixel sampler, given normalized `(u, v)`
/// coordinates in `[0, 1]`) to an image per `options`.
///
/// When `options.skip_constant` is set, the four corners and the center
/// are sampled first; if they all agree, the whole texture is assumed
/// constant and a single value is returned instead of a full raster.
pub fn bake(options: TextureBakeOptions, evaluate: impl Fn(f32, f32) -> [f32; 3]) -> BakedTexture {
    if options.skip_constant {
        if let Some(constant) = probe_constant(&evaluate) {
            return BakedTexture::Constant(constant);
        }
    }

    let mut pixels = Vec::with_capacity(options.width * options.height);
    for y in 0..options.height {
        let v = (y as f32 + 0.5) / options.height as f32;
        for x in 0..options.width {
            let u = (x as f32 + 0.5) / options.width as f32;
            pixels.push(evaluate(u, v));
        }
    }
    BakedTexture::Image { width: options.width, height: options.height, pixels }
}

fn probe_constant(evaluate: &impl Fn(f32, f32) -> [f32; 3]) -> Option<[f32; 3]> {
    let samples = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.5, 0.5)];
    let first = evaluate(samples[0].0, samples[0].1);
    let all_equal = samples[1..].iter().all(|&(u, v)| evaluate(u, v) == first);
    all_equal.then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bake_options_are_1024_square() {
        let options = TextureBakeOptions::default();
        assert_eq!(options.width, 1024);
        assert_eq!(options.height, 1024);
        assert!(!options.skip_constant);
    }

    #[test]
    fn constant_texture_collapses_when_requested() {
        let options = TextureBakeOptions { width: 8, height: 8, skip_constant: true };
        let baked = bake(options, |_, _| [0.5, 0.5, 0.5]);
        assert_eq!(baked, BakedTexture::Constant([0.5, 0.5, 0.5]));
    }

    #[test]
    fn varying_texture_is_fully_rasterized() {
        let options = TextureBakeOptions { width: 4, height: 4, skip_constant: true };
        let baked = bake(options, |u, v| [u, v, 0.0]);
        match baked {
            BakedTexture::Image { width, height, pixels } => {
                assert_eq!(width, 4);
                assert_eq!(height, 4);
                assert_eq!(pixels.len(), 16);
            }
            BakedTexture::Constant(_) => panic!("expected a full raster"),
        }
    }

    #[test]
    fn skip_constant_false_always_rasterizes() {
        let options = TextureBakeOptions { width: 2, height: 2, skip_constant: false };
        let baked = bake(options, |_, _| [1.0, 1.0, 1.0]);
        assert!(matches!(baked, BakedTexture::Image { .. }));
    }
}
