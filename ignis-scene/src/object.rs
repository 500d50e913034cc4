//! Named scene objects and insertion-ordered collections of them (§3, §6.1).

use crate::property::PropertyMap;
use rustc_hash::FxHashMap;

/// One declared object: a plugin-type tag plus its property bag. `name` is
/// carried on the object itself (rather than only as a map key) so an
/// `Object` can be passed around after being looked up.
#[derive(Debug, Clone)]
pub struct Object {
    /// The object's declared name, unique within its kind.
    pub name: String,
    /// The plugin type, e.g. `"triangle"`, `"perspective"`, `"diffuse"`.
    pub plugin_type: String,
    /// The object's property map.
    pub properties: PropertyMap,
}

impl Object {
    /// Builds a fresh object with no properties set.
    pub fn new(name: impl Into<String>, plugin_type: impl Into<String>) -> Self {
        Self { name: name.into(), plugin_type: plugin_type.into(), properties: PropertyMap::new() }
    }
}

/// An insertion-ordered, name-indexed collection of objects.
///
/// Scene sections (`shapes`, `bsdfs`, `entities`, ...) need both O(1)
/// name lookup and deterministic iteration order — the round-trip testable
/// property (§8) requires "identical iteration order across provider maps,
/// ... made deterministic by sorting on input name", which insertion order
/// already satisfies for a single parse of one file. `EntryMap`-style
/// closures are overkill for a plain named registry, so this is a flat
/// `Vec` plus a name index: a declared-order table that goes from an
/// integer id to an entity without losing declaration order.
#[derive(Debug, Clone, Default)]
pub struct ObjectTable {
    objects: Vec<Object>,
    index: FxHashMap<String, usize>,
}

impl ObjectTable {
    /// An empty table.
    pub fn new() -> Self { Self::default() }

    /// Inserts an object, returning its index. Re-inserting an existing name
    /// overwrites that slot in place, preserving its original position.
    pub fn insert(&mut self, object: Object) -> usize {
        if let Some(&i) = self.index.get(&object.name) {
            self.objects[i] = object;
            i
        } else {
            let i = self.objects.len();
            self.index.insert(object.name.clone(), i);
            self.objects.push(object);
            i
        }
    }

    /// Looks up an object by name.
    pub fn get(&self, name: &str) -> Option<&Object> {
        self.index.get(name).map(|&i| &self.objects[i])
    }

    /// Looks up an object's declaration index by name, used by entity/
    /// material dedup to index fixed-size id arrays (§4.3).
    pub fn index_of(&self, name: &str) -> Option<usize> { self.index.get(name).copied() }

    /// The number of objects in the table.
    pub fn len(&self) -> usize { self.objects.len() }

    /// Whether the table has no objects.
    pub fn is_empty(&self) -> bool { self.objects.is_empty() }

    /// Iterates objects in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Object> { self.objects.iter() }
}

impl std::ops::Index<usize> for ObjectTable {
    type Output = Object;
    fn index(&self, i: usize) -> &Object { &self.objects[i] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_lookup_preserves_order() {
        let mut table = ObjectTable::new();
        table.insert(Object::new("b", "diffuse"));
        table.insert(Object::new("a", "diffuse"));
        let names: Vec<_> = table.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(table.index_of("a"), Some(1));
    }

    #[test]
    fn reinsert_overwrites_in_place() {
        let mut table = ObjectTable::new();
        table.insert(Object::new("a", "diffuse"));
        table.insert(Object::new("a", "conductor"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("a").unwrap().plugin_type, "conductor");
    }
}
