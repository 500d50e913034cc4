//! The loader context (§3 "Ownership summary"): the single owner of the
//! scene database, the shape/entity/light tables, the resource-name →
//! numeric-id interning maps, and the shared `has_error` flag every other
//! component (shading tree, shape providers, entity dedup) signals into.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use ignis_base::bounding_box::BoundingBox;
use ignis_base::cgmath64::Point3;
use ignis_bvh::entity_object::EntityObject;
use ignis_serialize::Serializer;
use ignis_shapes::provider::ShapeRecord;
use rustc_hash::FxHashMap;

use crate::entity::MaterialKey;

/// One fixed-size table's growable backing buffer plus its entry count,
/// mirroring the `entities` fixed table (§3: "48 bytes each") and the
/// per-embed-class light tables it shares the same shape with.
#[derive(Debug, Default)]
pub struct Table {
    /// The raw bytes written so far, 16-byte aligned per entry.
    pub bytes: Vec<u8>,
    /// The number of entries appended.
    pub count: usize,
}

/// Everything the loader exclusively owns across prepare → load → BVH →
/// light → variant (§3 "Ownership summary", §7 "`HasError` flag").
#[derive(Debug)]
pub struct LoaderContext {
    /// Set by any non-fatal failure anywhere in the loader (§7); the
    /// top-level load returns failure iff this is set when loading ends.
    pub has_error: Arc<AtomicBool>,

    /// The `shapes` dynamic table (§3), written by [`crate::shapes`].
    pub shapes_table: Mutex<Table>,
    /// Loaded shape records, indexed by dense shape id, used to look up a
    /// shape's bounding box during entity dedup (§4.3 step 5).
    pub shape_records: Mutex<Vec<ShapeRecord>>,
    /// Each shape's provider tag (`"trimesh"`, `"sphere"`, §4.2
    /// supplement), indexed by shape id, used to route its
    /// [`EntityObject`]s into the right per-provider BVH build.
    pub shape_provider_tags: Mutex<Vec<&'static str>>,

    /// The `entities` fixed table (§3), written by [`crate::entity`].
    pub entities_table: Mutex<Table>,
    /// Deduplicated material tuples, in first-seen (append) order (§4.3
    /// step 6); index into this vector is the material id.
    pub materials: Mutex<Vec<MaterialKey>>,
    /// `EntityToMaterial[entity index] = material id` (§4.3 step 8).
    pub entity_to_material: Mutex<Vec<usize>>,
    /// Entity names tagged by an area light during prepare (§4.4
    /// "prepare"), consulted by entity dedup step 6.
    pub emissive_entities: Mutex<rustc_hash::FxHashSet<String>>,

    /// Per-provider [`EntityObject`] arrays, fed to [`ignis_bvh::build_many`]
    /// after shape loading completes (§4.2 "After shape load...").
    pub entity_objects_by_provider: Mutex<FxHashMap<&'static str, Vec<EntityObject>>>,

    /// The accumulated bounding box of every entity loaded so far (§4.3
    /// step 5: "accumulate the global scene bbox").
    pub scene_bbox: Mutex<BoundingBox<Point3>>,
}

impl LoaderContext {
    /// A fresh, empty context.
    pub fn new() -> Self {
        Self {
            has_error: Arc::new(AtomicBool::new(false)),
            shapes_table: Mutex::new(Table::default()),
            shape_records: Mutex::new(Vec::new()),
            shape_provider_tags: Mutex::new(Vec::new()),
            entities_table: Mutex::new(Table::default()),
            materials: Mutex::new(Vec::new()),
            entity_to_material: Mutex::new(Vec::new()),
            emissive_entities: Mutex::new(rustc_hash::FxHashSet::default()),
            entity_objects_by_provider: Mutex::new(FxHashMap::default()),
            scene_bbox: Mutex::new(BoundingBox::default()),
        }
    }

    /// Whether any non-fatal error has been recorded so far (§7).
    pub fn has_error(&self) -> bool { self.has_error.load(Ordering::Relaxed) }

    /// Records a non-fatal error (referential, structural, parse or
    /// resource per §7) and logs it at `error` level.
    pub fn signal_error(&self, message: impl std::fmt::Display) {
        log::error!("{message}");
        self.has_error.store(true, Ordering::Relaxed);
    }

    /// A fresh [`Serializer`] writing into `table`'s backing buffer,
    /// acquiring its mutex only for this append (§5 "each write path uses
    /// a dedicated mutex, never the whole context").
    pub fn append<R>(table: &Mutex<Table>, write: impl FnOnce(&mut Serializer<'_>) -> R) -> R {
        let mut table = table.lock().expect("table mutex poisoned");
        let mut serializer = Serializer::writer(&mut table.bytes);
        let result = write(&mut serializer);
        table.count += 1;
        result
    }
}

impl Default for LoaderContext {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_context_has_no_error() {
        let ctx = LoaderContext::new();
        assert!(!ctx.has_error());
    }

    #[test]
    fn signal_error_sets_the_flag() {
        let ctx = LoaderContext::new();
        ctx.signal_error("missing shape `nope`");
        assert!(ctx.has_error());
    }
}
