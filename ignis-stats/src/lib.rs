//! Timing and quantity statistics, accumulated thread-locally during a load
//! or an iteration and merged serially at variant/iteration boundaries (§5).

#![warn(missing_docs, missing_debug_implementations)]

use rustc_hash::FxHashMap as HashMap;
use std::time::{Duration, Instant};

/// The kind of shader a timing block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderType {
    /// The top-level device dispatch shader.
    Device,
    /// Primary ray traversal.
    PrimaryTraversal,
    /// Secondary (shadow) ray traversal.
    SecondaryTraversal,
    /// Ray-generation shader.
    RayGeneration,
    /// A per-material hit shader (keyed separately by id, see [`Statistics`]).
    Hit,
    /// The miss shader.
    Miss,
    /// A per-material advanced-shadow hit shader.
    AdvancedShadowHit,
    /// The advanced-shadow miss shader.
    AdvancedShadowMiss,
    /// A technique-specific callback shader (e.g. PPM's photon rebuild).
    Callback,
    /// The tonemap service shader.
    Tonemap,
    /// The imageinfo service shader.
    ImageInfo,
    /// A texture-baking shader.
    Bake,
}

/// A named section of host-side work timed independently of shader launches
/// (buffer/image loading, framebuffer/AOV updates, GPU sort sub-phases).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionType {
    /// GPU primary-ray sort.
    GpuSortPrimary,
    /// GPU secondary-ray sort.
    GpuSortSecondary,
    /// GPU primary-ray stream compaction.
    GpuCompactPrimary,
    /// Image loading from disk.
    ImageLoading,
    /// Packed (mip/atlas) image loading.
    PackedImageLoading,
    /// Device buffer upload.
    BufferLoading,
    /// Host-side framebuffer update.
    FramebufferUpdate,
    /// Host-side AOV update.
    AovUpdate,
    /// Tonemap buffer update.
    TonemapUpdate,
}

/// A counted quantity accumulated across shader launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Number of camera rays generated.
    CameraRayCount,
    /// Number of shadow rays traced.
    ShadowRayCount,
    /// Number of bounce rays traced.
    BounceRayCount,
}

const QUANTITY_COUNT: usize = 3;

fn quantity_index(q: Quantity) -> usize {
    match q {
        Quantity::CameraRayCount => 0,
        Quantity::ShadowRayCount => 1,
        Quantity::BounceRayCount => 2,
    }
}

/// Accumulated timing for one shader kind: total elapsed time, launch count,
/// and min/max/total workload across launches.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShaderStats {
    /// Total elapsed wall-clock time across all launches.
    pub elapsed: Duration,
    /// Number of times this shader was launched.
    pub count: u64,
    /// Sum of the `workload` argument passed to every launch.
    pub workload: u64,
    /// Largest single-launch workload seen.
    pub max_workload: u64,
    /// Smallest single-launch workload seen.
    pub min_workload: u64,
}

impl ShaderStats {
    fn record(&mut self, workload: u64, elapsed: Duration) {
        self.elapsed += elapsed;
        self.count += 1;
        self.workload += workload;
        self.max_workload = self.max_workload.max(workload);
        self.min_workload = if self.count == 1 { workload } else { self.min_workload.min(workload) };
    }

    /// Component-wise accumulation, as in `Statistics::add` (§8).
    pub fn add(&mut self, other: &ShaderStats) {
        let self_was_empty = self.count == 0;
        self.elapsed += other.elapsed;
        self.count += other.count;
        self.workload += other.workload;
        self.max_workload = self.max_workload.max(other.max_workload);
        self.min_workload = if other.count == 0 {
            self.min_workload
        } else if self_was_empty {
            other.min_workload
        } else {
            self.min_workload.min(other.min_workload)
        };
    }
}

/// Accumulated timing for one host-side section.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SectionStats {
    /// Total elapsed wall-clock time.
    pub elapsed: Duration,
    /// Number of times the section was entered.
    pub count: u64,
}

impl SectionStats {
    fn record(&mut self, elapsed: Duration) {
        self.elapsed += elapsed;
        self.count += 1;
    }

    /// Component-wise accumulation.
    pub fn add(&mut self, other: &SectionStats) {
        self.elapsed += other.elapsed;
        self.count += other.count;
    }
}

/// A started-but-not-yet-ended shader launch or section. Dropping it without
/// calling [`ShaderLaunch::end`]/[`SectionGuard::end`] is a logic error in the
/// caller, not modeled as a panic — callers are expected to always pair
/// begin/end (RAII guards are provided for convenience).
pub struct ShaderLaunch<'a> {
    stats: &'a mut Statistics,
    kind: ShaderType,
    id: u64,
    start: Instant,
    workload: u64,
}

impl<'a> ShaderLaunch<'a> {
    /// Ends the launch, recording its elapsed time.
    pub fn end(self) {
        let elapsed = self.start.elapsed();
        self.stats.stats_for_mut(self.kind, self.id).record(self.workload, elapsed);
    }
}

/// Per-shader, per-section, per-quantity statistics. Instances are kept
/// thread-local during loading/rendering and merged with [`Statistics::add`]
/// at iteration or variant boundaries.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    device: ShaderStats,
    primary_traversal: ShaderStats,
    secondary_traversal: ShaderStats,
    ray_generation: ShaderStats,
    miss: ShaderStats,
    hit: HashMap<u64, ShaderStats>,
    advanced_shadow_hit: HashMap<u64, ShaderStats>,
    advanced_shadow_miss: HashMap<u64, ShaderStats>,
    callback: HashMap<u64, ShaderStats>,
    image_info: ShaderStats,
    tonemap: ShaderStats,
    bake: ShaderStats,
    quantities: [u64; QUANTITY_COUNT],
    sections: HashMap<SectionType, SectionStats>,
}

impl Statistics {
    /// A fresh, all-zero instance.
    pub fn new() -> Self { Self::default() }

    /// Resets to a fresh, all-zero instance.
    pub fn reset(&mut self) { *self = Self::default(); }

    fn stats_for_mut(&mut self, kind: ShaderType, id: u64) -> &mut ShaderStats {
        match kind {
            ShaderType::Device => &mut self.device,
            ShaderType::PrimaryTraversal => &mut self.primary_traversal,
            ShaderType::SecondaryTraversal => &mut self.secondary_traversal,
            ShaderType::RayGeneration => &mut self.ray_generation,
            ShaderType::Miss => &mut self.miss,
            ShaderType::ImageInfo => &mut self.image_info,
            ShaderType::Tonemap => &mut self.tonemap,
            ShaderType::Bake => &mut self.bake,
            ShaderType::Hit => self.hit.entry(id).or_default(),
            ShaderType::AdvancedShadowHit => self.advanced_shadow_hit.entry(id).or_default(),
            ShaderType::AdvancedShadowMiss => self.advanced_shadow_miss.entry(id).or_default(),
            ShaderType::Callback => self.callback.entry(id).or_default(),
        }
    }

    /// Starts timing a shader launch; `id` distinguishes per-material
    /// variants of [`ShaderType::Hit`]/[`ShaderType::AdvancedShadowHit`]/
    /// [`ShaderType::AdvancedShadowMiss`]/[`ShaderType::Callback`] and is
    /// ignored for the other kinds.
    pub fn begin_shader_launch(&mut self, kind: ShaderType, workload: u64, id: u64) -> ShaderLaunch<'_> {
        ShaderLaunch { stats: self, kind, id, start: Instant::now(), workload }
    }

    /// Starts timing a host-side section.
    pub fn begin_section(&mut self, section: SectionType) -> SectionGuard<'_> {
        SectionGuard { stats: self, section, start: Instant::now() }
    }

    /// Increases a counted quantity.
    pub fn increase(&mut self, quantity: Quantity, value: u64) {
        self.quantities[quantity_index(quantity)] += value;
    }

    /// Reads back a counted quantity's current total.
    pub fn quantity(&self, quantity: Quantity) -> u64 { self.quantities[quantity_index(quantity)] }

    /// Looks up accumulated stats for a non-keyed shader kind.
    pub fn shader_stats(&self, kind: ShaderType) -> Option<&ShaderStats> {
        match kind {
            ShaderType::Device => Some(&self.device),
            ShaderType::PrimaryTraversal => Some(&self.primary_traversal),
            ShaderType::SecondaryTraversal => Some(&self.secondary_traversal),
            ShaderType::RayGeneration => Some(&self.ray_generation),
            ShaderType::Miss => Some(&self.miss),
            ShaderType::ImageInfo => Some(&self.image_info),
            ShaderType::Tonemap => Some(&self.tonemap),
            ShaderType::Bake => Some(&self.bake),
            _ => None,
        }
    }

    /// Merges `other`'s accumulated values into `self`, component-wise
    /// (testable property §8 item 8 relies on this).
    pub fn add(&mut self, other: &Statistics) {
        self.device.add(&other.device);
        self.primary_traversal.add(&other.primary_traversal);
        self.secondary_traversal.add(&other.secondary_traversal);
        self.ray_generation.add(&other.ray_generation);
        self.miss.add(&other.miss);
        self.image_info.add(&other.image_info);
        self.tonemap.add(&other.tonemap);
        self.bake.add(&other.bake);
        for (id, s) in &other.hit {
            self.hit.entry(*id).or_default().add(s);
        }
        for (id, s) in &other.advanced_shadow_hit {
            self.advanced_shadow_hit.entry(*id).or_default().add(s);
        }
        for (id, s) in &other.advanced_shadow_miss {
            self.advanced_shadow_miss.entry(*id).or_default().add(s);
        }
        for (id, s) in &other.callback {
            self.callback.entry(*id).or_default().add(s);
        }
        for i in 0..QUANTITY_COUNT {
            self.quantities[i] += other.quantities[i];
        }
        for (sec, s) in &other.sections {
            self.sections.entry(*sec).or_default().add(s);
        }
    }

    /// A one-line-per-shader human-readable dump, in the spirit of
    /// `Statistics::dump` (table formatting is left to the caller; this
    /// returns structured rows instead of a pre-rendered table since the
    /// loader has no terminal-width context to align columns against).
    pub fn dump_rows(&self) -> Vec<(String, u64, u64)> {
        let mut rows = vec![
            ("device".to_string(), self.device.count, self.device.elapsed.as_millis() as u64),
            ("ray_generation".to_string(), self.ray_generation.count, self.ray_generation.elapsed.as_millis() as u64),
            ("miss".to_string(), self.miss.count, self.miss.elapsed.as_millis() as u64),
            ("tonemap".to_string(), self.tonemap.count, self.tonemap.elapsed.as_millis() as u64),
        ];
        for (id, s) in &self.hit {
            rows.push((format!("hit[{id}]"), s.count, s.elapsed.as_millis() as u64));
        }
        rows
    }
}

/// RAII guard ending a [`SectionType`] timing on drop.
pub struct SectionGuard<'a> {
    stats: &'a mut Statistics,
    section: SectionType,
    start: Instant,
}

impl Drop for SectionGuard<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        self.stats.sections.entry(self.section).or_default().record(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_launch_records_workload_extremes() {
        let mut stats = Statistics::new();
        stats.begin_shader_launch(ShaderType::Miss, 10, 0).end();
        stats.begin_shader_launch(ShaderType::Miss, 30, 0).end();
        stats.begin_shader_launch(ShaderType::Miss, 20, 0).end();
        let s = stats.shader_stats(ShaderType::Miss).unwrap();
        assert_eq!(s.count, 3);
        assert_eq!(s.workload, 60);
        assert_eq!(s.max_workload, 30);
        assert_eq!(s.min_workload, 10);
    }

    #[test]
    fn per_material_hit_stats_are_keyed_independently() {
        let mut stats = Statistics::new();
        stats.begin_shader_launch(ShaderType::Hit, 5, 0).end();
        stats.begin_shader_launch(ShaderType::Hit, 7, 1).end();
        assert_eq!(stats.hit.get(&0).unwrap().count, 1);
        assert_eq!(stats.hit.get(&1).unwrap().count, 1);
    }

    #[test]
    fn add_is_component_wise() {
        let mut a = Statistics::new();
        a.increase(Quantity::CameraRayCount, 100);
        a.begin_shader_launch(ShaderType::Miss, 1, 0).end();

        let mut b = Statistics::new();
        b.increase(Quantity::CameraRayCount, 50);
        b.begin_shader_launch(ShaderType::Miss, 1, 0).end();

        a.add(&b);
        assert_eq!(a.quantity(Quantity::CameraRayCount), 150);
        assert_eq!(a.shader_stats(ShaderType::Miss).unwrap().count, 2);
    }

    #[test]
    fn merging_an_empty_stats_does_not_collapse_min_workload() {
        let mut a = ShaderStats::default();
        a.record(10, Duration::from_millis(1));
        a.record(30, Duration::from_millis(1));
        assert_eq!(a.min_workload, 10);

        let empty = ShaderStats::default();
        a.add(&empty);
        assert_eq!(a.count, 2);
        assert_eq!(a.min_workload, 10);
    }

    #[test]
    fn merging_into_an_empty_stats_adopts_the_others_min_workload() {
        let mut empty = ShaderStats::default();
        let mut other = ShaderStats::default();
        other.record(5, Duration::from_millis(1));
        other.record(15, Duration::from_millis(1));
        empty.add(&other);
        assert_eq!(empty.count, 2);
        assert_eq!(empty.min_workload, 5);
    }

    #[test]
    fn section_guard_records_on_drop() {
        let mut stats = Statistics::new();
        {
            let _g = stats.begin_section(SectionType::BufferLoading);
        }
        assert_eq!(stats.sections.get(&SectionType::BufferLoading).unwrap().count, 1);
    }
}
