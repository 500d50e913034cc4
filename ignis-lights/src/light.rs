//! Typed light objects (§3: "Light is a sum of variants").

use ignis_base::cgmath64::{Point3, Vector3};
use ignis_scene::{Object, Scene};

/// The light plugin-type, one per §3's sum-of-variants list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// An isotropic point light.
    Point,
    /// A cone-restricted spot light.
    Spot,
    /// A directional (infinitely distant) light.
    Directional,
    /// An area light attached to an entity's shape.
    Area,
    /// A physical sun disk.
    Sun,
    /// A uniform analytic sky.
    Sky,
    /// CIE uniform sky model.
    CieUniform,
    /// CIE cloudy sky model.
    CieCloudy,
    /// CIE clear sky model.
    CieClear,
    /// CIE intermediate sky model.
    CieIntermediate,
    /// Perez sky model.
    Perez,
    /// An environment map light.
    Environment,
}

impl LightKind {
    /// Maps a scene object's `plugin_type` to a light kind.
    pub fn from_plugin_type(plugin_type: &str) -> Option<Self> {
        Some(match plugin_type {
            "point" => LightKind::Point,
            "spot" => LightKind::Spot,
            "directional" => LightKind::Directional,
            "area" => LightKind::Area,
            "sun" => LightKind::Sun,
            "sky" => LightKind::Sky,
            "cie_uniform" => LightKind::CieUniform,
            "cie_cloudy" => LightKind::CieCloudy,
            "cie_clear" => LightKind::CieClear,
            "cie_intermediate" => LightKind::CieIntermediate,
            "perez" => LightKind::Perez,
            "env" | "environment" => LightKind::Environment,
            _ => return None,
        })
    }

    /// Whether this kind of light has finite extent (contributes to the
    /// finite-light partition) rather than always falling through to the
    /// miss shader (§3: "infinite lights always fall through to the miss
    /// shader").
    pub fn is_finite(self) -> bool {
        !matches!(self, LightKind::Sky | LightKind::Perez | LightKind::Environment)
    }

    /// The embed class name this kind participates in, if any (§4.4:
    /// "the fixed table named after the class"). Only finite lights with a
    /// fixed binary layout are embeddable this way; `Area` instead varies
    /// with its target entity's shape and is resolved through
    /// [`Light::embed_class`]/[`AreaRepresentation`] instead.
    pub fn embed_class(self) -> Option<&'static str> {
        match self {
            LightKind::Point => Some("SimplePointLight"),
            LightKind::Spot => Some("SimpleSpotLight"),
            _ => None,
        }
    }
}

/// The sub-variant an area light embeds as, chosen by its target entity's
/// shape rather than being a separate [`LightKind`] (§4.4; grounded on
/// `AreaLight::getEmbedClass`'s switch over `RepresentationType`): a shape
/// matching the plane primitive embeds as a plane light, a sphere shape as
/// a sphere light, and anything else as the general area light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaRepresentation {
    /// The entity's shape is the canonical rectangular plane primitive.
    Plane,
    /// The entity's shape is an analytic sphere.
    Sphere,
    /// Any other shape (meshes, cubes, cylinders, ...).
    Other,
}

impl AreaRepresentation {
    /// The fixed embed-class table entry for this representation.
    pub fn embed_class(self) -> &'static str {
        match self {
            AreaRepresentation::Plane => "SimplePlaneLight",
            AreaRepresentation::Sphere => "SimpleSphereLight",
            AreaRepresentation::Other => "SimpleAreaLight",
        }
    }
}

/// Classifies the shape backing `entity_name` in `scene`, for an area
/// light's embed-class decision. Unresolvable references (missing entity,
/// missing `shape` property, unknown shape) fall back to `Other`, the same
/// as any non-plane, non-sphere shape.
fn entity_area_representation(scene: &Scene, entity_name: &str) -> AreaRepresentation {
    let representation = scene
        .entities
        .get(entity_name)
        .and_then(|entity| entity.properties.string("shape"))
        .and_then(|shape_name| scene.shapes.get(shape_name))
        .map(|shape| shape.plugin_type.as_str());
    match representation {
        Some("sphere") => AreaRepresentation::Sphere,
        Some("rectangle") => AreaRepresentation::Plane,
        _ => AreaRepresentation::Other,
    }
}

/// One instantiated light: the common fields every variant carries (§3),
/// regardless of kind.
#[derive(Debug, Clone)]
pub struct Light {
    /// The light's declared name (unique within the scene's `lights` table).
    pub name: String,
    /// Which kind of light this is.
    pub kind: LightKind,
    /// Whether the light's shape is a Dirac delta, i.e. un-samplable by
    /// area (point, spot, directional, sun).
    pub is_delta: bool,
    /// Position, for lights that have one.
    pub position: Option<Point3>,
    /// Direction, for lights that have one.
    pub direction: Option<Vector3>,
    /// For area lights, the entity name this light is attached to.
    pub entity: Option<String>,
    /// Estimated flux, used for CDF-based importance sampling.
    pub flux: f32,
    /// Assigned id, populated once the loader has partitioned and ordered
    /// all lights (§4.4 "Setup").
    pub id: u32,
}

impl Light {
    /// Instantiates a light from its scene object.
    pub fn from_object(object: &Object) -> Option<Self> {
        let kind = LightKind::from_plugin_type(&object.plugin_type)?;
        let is_delta = matches!(kind, LightKind::Point | LightKind::Spot | LightKind::Directional | LightKind::Sun);
        let position = object.properties.get("position").and_then(|p| p.as_vector3()).map(|v| Point3::new(v.x, v.y, v.z));
        let direction = object.properties.get("direction").and_then(|p| p.as_vector3());
        let entity = object.properties.string("entity").map(str::to_owned);
        let flux = estimate_flux(kind, object) as f32;
        Some(Light { name: object.name.clone(), kind, is_delta, position, direction, entity, flux, id: 0 })
    }

    /// The embed class this light participates in, or `None` if it cannot
    /// be embedded (infinite lights, or an area light with no resolvable
    /// target entity). `scene` resolves an area light's target entity to
    /// its shape, which the other kinds' fixed classes do not need.
    pub fn embed_class(&self, scene: &Scene) -> Option<&'static str> {
        if self.kind == LightKind::Area {
            let entity = self.entity.as_deref()?;
            return Some(entity_area_representation(scene, entity).embed_class());
        }
        self.kind.embed_class()
    }
}

/// A crude radiometric flux estimate good enough to rank lights for
/// importance sampling; a full estimate would integrate over the emission
/// profile (§4.4's "query its optional embed-class tag" step only needs a
/// comparative ranking, not a physically exact value).
fn estimate_flux(kind: LightKind, object: &Object) -> f64 {
    let intensity = object.properties.number("intensity", 1.0);
    let scale = match kind {
        LightKind::Point | LightKind::Sun => 4.0 * std::f64::consts::PI,
        LightKind::Spot => std::f64::consts::PI,
        LightKind::Directional | LightKind::Sky | LightKind::Perez | LightKind::Environment => 1.0,
        LightKind::Area => object.properties.number("area", 1.0) * std::f64::consts::PI,
        LightKind::CieUniform | LightKind::CieCloudy | LightKind::CieClear | LightKind::CieIntermediate => 1.0,
    };
    intensity * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignis_scene::Property;

    #[test]
    fn unknown_plugin_type_yields_no_light() {
        let object = Object::new("l1", "bogus");
        assert!(Light::from_object(&object).is_none());
    }

    #[test]
    fn point_light_is_delta_and_embeddable() {
        let mut object = Object::new("l1", "point");
        object.properties.set("intensity", Property::Number(2.0));
        let light = Light::from_object(&object).unwrap();
        assert!(light.is_delta);
        assert_eq!(light.embed_class(&Scene::default()), Some("SimplePointLight"));
        assert!(light.flux > 0.0);
    }

    #[test]
    fn sky_light_is_infinite_and_not_embeddable() {
        let object = Object::new("l1", "sky");
        let light = Light::from_object(&object).unwrap();
        assert!(!light.kind.is_finite());
        assert_eq!(light.embed_class(&Scene::default()), None);
    }

    #[test]
    fn directional_and_sun_lights_are_never_embeddable() {
        let directional = Light::from_object(&Object::new("l1", "directional")).unwrap();
        let sun = Light::from_object(&Object::new("l2", "sun")).unwrap();
        let scene = Scene::default();
        assert_eq!(directional.embed_class(&scene), None);
        assert_eq!(sun.embed_class(&scene), None);
    }

    fn area_light_on_entity(shape_plugin_type: &str) -> (Scene, Light) {
        let mut scene = Scene::new();
        let mut shape = Object::new("s1", shape_plugin_type);
        shape.properties.set("dummy", Property::Number(0.0));
        scene.shapes.insert(shape);
        let mut entity = Object::new("e1", "entity");
        entity.properties.set("shape", Property::String("s1".to_owned()));
        scene.entities.insert(entity);
        let mut object = Object::new("l1", "area");
        object.properties.set("entity", Property::String("e1".to_owned()));
        let light = Light::from_object(&object).unwrap();
        (scene, light)
    }

    #[test]
    fn area_light_on_a_rectangle_embeds_as_a_plane_light() {
        let (scene, light) = area_light_on_entity("rectangle");
        assert_eq!(light.embed_class(&scene), Some("SimplePlaneLight"));
    }

    #[test]
    fn area_light_on_a_sphere_embeds_as_a_sphere_light() {
        let (scene, light) = area_light_on_entity("sphere");
        assert_eq!(light.embed_class(&scene), Some("SimpleSphereLight"));
    }

    #[test]
    fn area_light_on_any_other_shape_embeds_as_the_general_area_light() {
        let (scene, light) = area_light_on_entity("cube");
        assert_eq!(light.embed_class(&scene), Some("SimpleAreaLight"));
    }

    #[test]
    fn area_light_referencing_an_unresolvable_entity_falls_back_to_the_general_area_light() {
        let mut object = Object::new("l1", "area");
        object.properties.set("entity", Property::String("missing".to_owned()));
        let light = Light::from_object(&object).unwrap();
        assert_eq!(light.embed_class(&Scene::default()), Some("SimpleAreaLight"));
    }

    #[test]
    fn area_light_with_no_entity_at_all_is_not_embeddable() {
        let object = Object::new("l1", "area");
        let light = Light::from_object(&object).unwrap();
        assert_eq!(light.embed_class(&Scene::default()), None);
    }
}
