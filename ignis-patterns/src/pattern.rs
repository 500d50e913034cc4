//! Texture pattern objects and the dependency DAG built over them (§2
//! "Pattern (texture) loader: Build pattern DAG (image, checker, brick,
//! noise family, transform, expression)").

use crate::dag::{Dag, Node};
use ignis_scene::Scene;
use rustc_hash::FxHashMap;

/// The texture plugin-type, one per §2's pattern list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternKind {
    /// A file-backed or in-memory raster image.
    Image,
    /// A two-color checkerboard, composed from two sub-textures.
    Checker,
    /// A brick pattern, composed from a brick and mortar sub-texture.
    Brick,
    /// One of the noise family (perlin, voronoi, cellnoise, fbm, ...); the
    /// specific variant name is carried in the tuple since the DAG only
    /// cares about dependency shape, not noise kind.
    Noise(String),
    /// Applies a UV transform to a base texture.
    Transform,
    /// A PExpr expression texture, evaluated by the transpiler (§4.5); this
    /// crate only models it as a DAG leaf since expression-internal texture
    /// references are discovered by the transpiler, not the pattern loader.
    Expression,
    /// A plugin type this crate doesn't special-case; still a valid leaf.
    Other(String),
}

impl PatternKind {
    fn from_plugin_type(plugin_type: &str) -> Self {
        match plugin_type {
            "image" => PatternKind::Image,
            "checker" => PatternKind::Checker,
            "brick" => PatternKind::Brick,
            "transform" => PatternKind::Transform,
            "expr" | "expression" => PatternKind::Expression,
            noise @ ("noise" | "perlin" | "voronoi" | "cellnoise" | "pnoise" | "snoise" | "fbm" | "gabor") => {
                PatternKind::Noise(noise.to_owned())
            }
            other => PatternKind::Other(other.to_owned()),
        }
    }

    /// The property keys under which this kind references other named
    /// textures, in the order the DAG edges should be created.
    fn dependency_keys(&self) -> &'static [&'static str] {
        match self {
            PatternKind::Checker => &["texture1", "texture2"],
            PatternKind::Brick => &["brick_texture", "mortar_texture"],
            PatternKind::Transform => &["base"],
            _ => &[],
        }
    }
}

/// One pattern node's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// The texture's declared name.
    pub name: String,
    /// Which kind of pattern this is.
    pub kind: PatternKind,
}

/// Errors building the pattern DAG.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// A texture referenced a name not declared in the scene's `textures`
    /// table.
    #[error("texture {0:?} references unknown texture {1:?}")]
    UnknownReference(String, String),
    /// Adding a dependency edge would have created a cycle.
    #[error("texture {0:?} has a circular dependency through {1:?}")]
    Circular(String, String),
}

/// Builds the pattern DAG for every texture declared in `scene`, returning
/// each pattern's node keyed by name. `dag` is supplied by the caller since
/// the arena's lifetime must outlive the returned node handles.
pub fn populate<'a>(dag: &'a Dag<'a, Pattern>, scene: &Scene) -> Result<FxHashMap<String, Node<'a, Pattern>>, PatternError> {
    let mut nodes: FxHashMap<String, Node<'a, Pattern>> = FxHashMap::default();
    for object in scene.textures.iter() {
        let kind = PatternKind::from_plugin_type(&object.plugin_type);
        let node = dag.create_node(Pattern { name: object.name.clone(), kind });
        nodes.insert(object.name.clone(), node);
    }

    for object in scene.textures.iter() {
        let node = nodes[&object.name];
        let kind = node.entity().borrow().kind.clone();
        for &key in kind.dependency_keys() {
            let Some(dep_name) = object.properties.string(key) else { continue };
            let Some(&dep_node) = nodes.get(dep_name) else {
                return Err(PatternError::UnknownReference(object.name.clone(), dep_name.to_owned()));
            };
            if !node.add_child(dep_node) {
                return Err(PatternError::Circular(object.name.clone(), dep_name.to_owned()));
            }
        }
    }

    Ok(nodes)
}

/// Returns every node reachable from `roots` in dependency order: a node's
/// dependencies (its DAG children) always precede it.
pub fn evaluation_order<'a>(roots: &[Node<'a, Pattern>]) -> Vec<Node<'a, Pattern>> {
    let mut order = Vec::new();
    let mut seen = rustc_hash::FxHashSet::default();
    fn visit<'a>(node: Node<'a, Pattern>, seen: &mut rustc_hash::FxHashSet<Node<'a, Pattern>>, order: &mut Vec<Node<'a, Pattern>>) {
        if !seen.insert(node) {
            return;
        }
        for child in node.children() {
            visit(child, seen, order);
        }
        order.push(node);
    }
    for &root in roots {
        visit(root, &mut seen, &mut order);
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignis_scene::{Object, Property};

    fn scene_with_checker() -> Scene {
        let mut scene = Scene::new();
        scene.textures.insert(Object::new("a", "image"));
        scene.textures.insert(Object::new("b", "image"));
        let mut checker = Object::new("c", "checker");
        checker.properties.set("texture1", Property::String("a".into()));
        checker.properties.set("texture2", Property::String("b".into()));
        scene.textures.insert(checker);
        scene
    }

    #[test]
    fn checker_depends_on_both_sub_textures() {
        let scene = scene_with_checker();
        let dag = Dag::new();
        let nodes = populate(&dag, &scene).unwrap();
        let checker = nodes["c"];
        assert_eq!(checker.num_of_children(), 2);
    }

    #[test]
    fn evaluation_order_puts_dependencies_first() {
        let scene = scene_with_checker();
        let dag = Dag::new();
        let nodes = populate(&dag, &scene).unwrap();
        let order = evaluation_order(&[nodes["c"]]);
        let names: Vec<_> = order.iter().map(|n| n.entity().borrow().name.clone()).collect();
        assert_eq!(names.last().unwrap(), "c");
        assert!(names.iter().position(|n| n == "a").unwrap() < names.iter().position(|n| n == "c").unwrap());
    }

    #[test]
    fn unknown_reference_is_an_error() {
        let mut scene = Scene::new();
        let mut checker = Object::new("c", "checker");
        checker.properties.set("texture1", Property::String("missing".into()));
        checker.properties.set("texture2", Property::String("missing".into()));
        scene.textures.insert(checker);
        let dag = Dag::new();
        assert!(populate(&dag, &scene).is_err());
    }

    #[test]
    fn self_reference_is_circular() {
        let mut scene = Scene::new();
        let mut transform = Object::new("t", "transform");
        transform.properties.set("base", Property::String("t".into()));
        scene.textures.insert(transform);
        let dag = Dag::new();
        assert!(matches!(populate(&dag, &scene), Err(PatternError::Circular(_, _))));
    }
}
