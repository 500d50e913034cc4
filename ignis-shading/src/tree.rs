//! The shading tree (§4.5): acquires typed parameters from scene objects
//! and tracks which textures a material ends up using.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ignis_base::cgmath64::Vector3;
use ignis_base::tolerance::{Origin, Tolerance};
use ignis_scene::{Object, Scene};
use rustc_hash::FxHashSet;

use crate::error::ShadingError;
use crate::expr::PExprType;
use crate::options::{ColorOptions, EmbedType, NumberOptions, TextureOptions, VectorOptions};
use crate::transpiler::{self, EmptyResolver, Transpiler};

/// A runtime-dynamic parameter registered by a non-embedded acquisition.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// The dense index this parameter was assigned, used to build its
    /// DSL accessor.
    pub id: usize,
    /// The object property this parameter was read from, for diagnostics.
    pub source: String,
    /// The parameter's type.
    pub ty: PExprType,
}

/// Assembles a material's (or light's, or camera's) shading DSL: reads
/// scene properties through [`ShadingTree::add_number`] and friends,
/// embedding structural values as literals and registering dynamic ones
/// as parameters.
#[derive(Debug)]
pub struct ShadingTree<'a> {
    scene: &'a Scene,
    transpiler: Transpiler,
    parameters: Vec<Parameter>,
    used_textures: FxHashSet<String>,
    has_error: Arc<AtomicBool>,
}

impl<'a> ShadingTree<'a> {
    /// Create a shading tree over `scene`, reporting acquisition failures
    /// through the shared `has_error` flag (typically the loader
    /// context's, so one bad material does not panic the whole load).
    pub fn new(scene: &'a Scene, has_error: Arc<AtomicBool>) -> Self {
        Self { scene, transpiler: Transpiler::new(), parameters: Vec::new(), used_textures: FxHashSet::default(), has_error }
    }

    /// Whether any acquisition on this tree (or another tree sharing the
    /// same flag) has failed so far.
    pub fn has_error(&self) -> bool { self.has_error.load(Ordering::Relaxed) }

    fn signal_error(&self) { self.has_error.store(true, Ordering::Relaxed); }

    /// The textures referenced via [`Self::add_texture`] so far, in no
    /// particular order.
    pub fn used_textures(&self) -> &FxHashSet<String> { &self.used_textures }

    /// The parameters registered by non-embedded acquisitions so far.
    pub fn parameters(&self) -> &[Parameter] { &self.parameters }

    fn next_parameter_id(&self) -> usize { self.parameters.len() }

    fn register_parameter(&mut self, source: &str, ty: PExprType) -> usize {
        let id = self.next_parameter_id();
        self.parameters.push(Parameter { id, source: source.to_owned(), ty });
        id
    }

    /// Acquire a scalar parameter from `object`'s `prop_name` property.
    pub fn add_number(&mut self, object: &Object, prop_name: &str, options: NumberOptions) -> (PExprType, String) {
        let value = object.properties.number(prop_name, options.default);
        let specialize = (options.specialize_zero && is_near(value, 0.0)) || (options.specialize_one && is_near(value, 1.0));
        if transpiler::should_embed(options.embed, specialize) {
            return (PExprType::Number, format_literal(value));
        }
        let id = self.register_parameter(prop_name, PExprType::Number);
        (PExprType::Number, format!("params.get_number({id})"))
    }

    /// Acquire a color parameter from `object`'s `prop_name` property,
    /// stored as a `vector3` scene property.
    pub fn add_color(&mut self, object: &Object, prop_name: &str, options: ColorOptions) -> (PExprType, String) {
        let default = cgmath_vector(options.default);
        let value = object.properties.vector3(prop_name, default);
        let specialize = (options.specialize_black && vector_is_near_zero(value)) || (options.specialize_white && vector_is_near_one(value));
        if transpiler::should_embed(options.embed, specialize) {
            return (PExprType::Color, format!("make_color({}, {}, {})", format_literal(value.x), format_literal(value.y), format_literal(value.z)));
        }
        let id = self.register_parameter(prop_name, PExprType::Color);
        (PExprType::Color, format!("params.get_color({id})"))
    }

    /// Acquire a vector parameter from `object`'s `prop_name` property.
    pub fn add_vector(&mut self, object: &Object, prop_name: &str, options: VectorOptions) -> (PExprType, String) {
        let default = cgmath_vector(options.default);
        let value = object.properties.vector3(prop_name, default);
        let specialize = (options.specialize_zero && vector_is_near_zero(value))
            || (options.specialize_one && vector_is_near_one(value))
            || (options.specialize_unit_axis && vector_is_unit_axis(value));
        if transpiler::should_embed(options.embed, specialize) {
            return (PExprType::Vec3, format!("make_vec3({}, {}, {})", format_literal(value.x), format_literal(value.y), format_literal(value.z)));
        }
        let id = self.register_parameter(prop_name, PExprType::Vec3);
        (PExprType::Vec3, format!("params.get_vector({id})"))
    }

    /// Acquire a texture reference from `object`'s `prop_name` property,
    /// which must name a declared entry in `scene.textures`.
    pub fn add_texture(&mut self, object: &Object, prop_name: &str, options: TextureOptions) -> Result<(PExprType, String), ShadingError> {
        let name = match object.properties.string(prop_name) {
            Some(name) => name.to_owned(),
            None => {
                if options.allow_missing {
                    return Ok((PExprType::Color, "black_color".to_owned()));
                }
                self.signal_error();
                return Err(ShadingError::UnknownObject(prop_name.to_owned()));
            }
        };
        if self.scene.textures.get(&name).is_none() {
            self.signal_error();
            return Err(ShadingError::UnknownObject(name));
        }
        self.used_textures.insert(name.clone());
        let dsl = match options.embed {
            EmbedType::Structural => format!("tex_eval_structural({name:?}, ctx)"),
            _ => format!("tex_eval({name:?}, ctx)"),
        };
        Ok((PExprType::Color, dsl))
    }

    /// Transpile a parsed PExpr tree against the fixed internal context,
    /// with no custom variables or texture references resolvable beyond
    /// it (use [`Self::add_texture`] for texture-valued properties
    /// instead of embedding `tex(...)` calls directly).
    pub fn transpile(&mut self, node: &crate::expr::PExprNode) -> Result<(PExprType, String), ShadingError> {
        self.transpiler.emit(node, &EmptyResolver).map_err(|e| {
            self.signal_error();
            ShadingError::from(e)
        })
    }
}

fn format_literal(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() { format!("{v:.1}") } else { format!("{v}") }
}

fn cgmath_vector(default: [f64; 3]) -> Vector3 { Vector3::new(default[0], default[1], default[2]) }

fn is_near(value: f64, target: f64) -> bool { value.near(&target) }

fn vector_is_near_zero(v: Vector3) -> bool { v.so_small() }

fn vector_is_near_one(v: Vector3) -> bool { v.near(&Vector3::new(1.0, 1.0, 1.0)) }

/// Whether `v` is a signed unit axis: `±x`, `±y`, or `±z`, within tolerance.
fn vector_is_unit_axis(v: Vector3) -> bool {
    let axes = [Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 0.0, 1.0)];
    axes.iter().any(|axis| v.near(axis) || v.near(&-*axis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignis_scene::property::Property;
    use ignis_scene::Scene;

    fn object_with_number(plugin_type: &str, prop: &str, value: f64) -> Object {
        let mut object = Object::new("mat", plugin_type);
        object.properties.set(prop, Property::Number(value));
        object
    }

    #[test]
    fn structural_number_is_embedded_as_a_literal() {
        let object = object_with_number("diffuse", "roughness", 0.25);
        let scene = Scene::default();
        let mut tree = ShadingTree::new(&scene, Arc::new(AtomicBool::new(false)));
        let (ty, src) = tree.add_number(&object, "roughness", NumberOptions::structural(0.0));
        assert_eq!(ty, PExprType::Number);
        assert_eq!(src, "0.25");
        assert!(tree.parameters().is_empty());
    }

    #[test]
    fn dynamic_number_registers_a_parameter() {
        let object = object_with_number("diffuse", "roughness", 0.25);
        let scene = Scene::default();
        let mut tree = ShadingTree::new(&scene, Arc::new(AtomicBool::new(false)));
        let (_, src) = tree.add_number(&object, "roughness", NumberOptions::dynamic(0.0));
        assert_eq!(src, "params.get_number(0)");
        assert_eq!(tree.parameters().len(), 1);
    }

    #[test]
    fn default_policy_embeds_a_zero_value_acquired_under_zero_options() {
        let object = object_with_number("diffuse", "roughness", 0.0);
        let scene = Scene::default();
        let mut tree = ShadingTree::new(&scene, Arc::new(AtomicBool::new(false)));
        let (_, src) = tree.add_number(&object, "roughness", NumberOptions::zero());
        assert_eq!(src, "0.0");
        assert!(tree.parameters().is_empty());
    }

    #[test]
    fn default_policy_registers_a_nonzero_value_acquired_under_zero_options() {
        let object = object_with_number("diffuse", "roughness", 0.25);
        let scene = Scene::default();
        let mut tree = ShadingTree::new(&scene, Arc::new(AtomicBool::new(false)));
        let (_, src) = tree.add_number(&object, "roughness", NumberOptions::zero());
        assert_eq!(src, "params.get_number(0)");
        assert_eq!(tree.parameters().len(), 1);
    }

    #[test]
    fn default_policy_embeds_a_black_color() {
        let mut object = Object::new("mat", "diffuse");
        object.properties.set("reflectance", Property::Vector3(Vector3::new(0.0, 0.0, 0.0)));
        let scene = Scene::default();
        let mut tree = ShadingTree::new(&scene, Arc::new(AtomicBool::new(false)));
        let (_, src) = tree.add_color(&object, "reflectance", ColorOptions::black());
        assert_eq!(src, "make_color(0.0, 0.0, 0.0)");
        assert!(tree.parameters().is_empty());
    }

    #[test]
    fn default_policy_registers_a_non_black_color_acquired_under_black_options() {
        let mut object = Object::new("mat", "diffuse");
        object.properties.set("reflectance", Property::Vector3(Vector3::new(0.5, 0.2, 0.1)));
        let scene = Scene::default();
        let mut tree = ShadingTree::new(&scene, Arc::new(AtomicBool::new(false)));
        let (_, src) = tree.add_color(&object, "reflectance", ColorOptions::black());
        assert_eq!(src, "params.get_color(0)");
    }

    #[test]
    fn default_policy_embeds_a_unit_axis_vector() {
        let mut object = Object::new("mat", "diffuse");
        object.properties.set("up", Property::Vector3(Vector3::new(0.0, 1.0, 0.0)));
        let scene = Scene::default();
        let mut tree = ShadingTree::new(&scene, Arc::new(AtomicBool::new(false)));
        let mut options = VectorOptions::dynamic([0.0, 0.0, 0.0]);
        options.embed = EmbedType::Default;
        options.specialize_unit_axis = true;
        let (_, src) = tree.add_vector(&object, "up", options);
        assert_eq!(src, "make_vec3(0.0, 1.0, 0.0)");
    }

    #[test]
    fn missing_required_texture_signals_an_error() {
        let scene = Scene::default();
        let object = Object::new("mat".to_owned(), "diffuse".to_owned());
        let flag = Arc::new(AtomicBool::new(false));
        let mut tree = ShadingTree::new(&scene, flag.clone());
        let result = tree.add_texture(&object, "albedo", TextureOptions::full());
        assert!(result.is_err());
        assert!(flag.load(Ordering::Relaxed));
    }

    #[test]
    fn missing_optional_texture_falls_back_to_black() {
        let scene = Scene::default();
        let object = Object::new("mat".to_owned(), "diffuse".to_owned());
        let mut tree = ShadingTree::new(&scene, Arc::new(AtomicBool::new(false)));
        let (ty, src) = tree.add_texture(&object, "bump", TextureOptions::full_plain()).unwrap();
        assert_eq!(ty, PExprType::Color);
        assert_eq!(src, "black_color");
    }
}
