//! Shape providers: the plugin-type → synthesis dispatch of §4.2.
//!
//! "Providers register by name; ... map to the *trimesh* provider; 'sphere'
//! maps to the *sphere* provider." Provider identifiers are plain
//! `&'static str` tags, used for per-provider BVH grouping (§4.2
//! supplement) rather than pointer identity.

use crate::errors::ShapeError;
use crate::trimesh::{PlaneShape, SphereShape, TriMesh};
use ignis_base::bounding_box::BoundingBox;
use ignis_base::cgmath64::{EuclideanSpace, Point3};
use ignis_scene::Object;

/// Kind-specific auxiliary data produced by a provider, mirroring §3's
/// "kind-specific auxiliary" field of `Shape`.
#[derive(Debug, Clone)]
pub enum ShapeKind {
    /// A loaded or synthesized triangle mesh.
    TriMesh(TriMesh),
    /// An analytic sphere.
    Sphere(SphereShape),
}

/// The full result of loading one shape declaration.
#[derive(Debug, Clone)]
pub struct ShapeRecord {
    /// The synthesized geometry.
    pub kind: ShapeKind,
    /// The shape's (already-inflated) world-space bounding box.
    pub bbox: BoundingBox<Point3>,
    /// Present iff this shape matched the canonical four-vertex plane
    /// layout (§4.2 item 2).
    pub plane: Option<PlaneShape>,
}

/// A plugin-type synthesizer. Every provider is registered under a single
/// `identifier()` used to group entities into per-provider scene BVHs
/// (§4.2, §4.6).
pub trait ShapeProvider: Send + Sync {
    /// The provider's per-provider BVH grouping tag.
    fn identifier(&self) -> &'static str;
    /// Which plugin-type strings this provider accepts.
    fn accepts(&self, plugin_type: &str) -> bool;
    /// Synthesizes or loads the shape described by `object`.
    fn handle(&self, object: &Object) -> Result<ShapeRecord, ShapeError>;
}

/// The trimesh provider: triangle meshes, analytic mesh primitives, and
/// (where supported) file-backed meshes.
#[derive(Debug, Default)]
pub struct TriMeshProvider;

const TRIMESH_TYPES: &[&str] = &[
    "triangle", "rectangle", "cube", "box", "icosphere", "uvsphere", "cylinder", "cone", "disk",
    "gauss", "obj", "ply", "mitsuba", "external",
];

impl ShapeProvider for TriMeshProvider {
    fn identifier(&self) -> &'static str { "trimesh" }

    fn accepts(&self, plugin_type: &str) -> bool { TRIMESH_TYPES.contains(&plugin_type) }

    fn handle(&self, object: &Object) -> Result<ShapeRecord, ShapeError> {
        let props = &object.properties;
        let mut mesh = match object.plugin_type.as_str() {
            "rectangle" => crate::primitives::rectangle(),
            "cube" | "box" => crate::primitives::cube(),
            "icosphere" => crate::primitives::icosphere(props.integer("subdivisions", 1) as u32),
            "uvsphere" => crate::primitives::uvsphere(
                props.integer("lat_segments", 16) as u32,
                props.integer("lon_segments", 32) as u32,
            ),
            "cylinder" => crate::primitives::cylinder(props.integer("segments", 32) as u32),
            "cone" => crate::primitives::cone(props.integer("segments", 32) as u32),
            "disk" => crate::primitives::disk(props.integer("segments", 32) as u32),
            "triangle" => single_triangle(object)?,
            "obj" | "ply" | "mitsuba" | "external" | "gauss" => {
                let filename = props.string("filename").unwrap_or("").to_string();
                return Err(ShapeError::FileNotFound(object.name.clone(), filename));
            }
            other => return Err(ShapeError::UnknownPluginType(other.to_string())),
        };
        if mesh.positions.is_empty() {
            return Err(ShapeError::ZeroVertices(object.name.clone()));
        }
        if mesh.faces.is_empty() {
            return Err(ShapeError::ZeroFaces(object.name.clone()));
        }
        if props.boolean("flip_normals", false) {
            mesh.flip_normals();
        }
        if mesh.has_degenerate_faces() {
            return Err(ShapeError::NonTriangular(object.name.clone()));
        }
        let plane = mesh.detect_plane();
        let bbox = mesh.bounding_box();
        Ok(ShapeRecord { kind: ShapeKind::TriMesh(mesh), bbox, plane })
    }
}

fn single_triangle(object: &Object) -> Result<TriMesh, ShapeError> {
    use crate::trimesh::Face;
    use ignis_base::cgmath64::{InnerSpace, Vector3};
    let props = &object.properties;
    let zero = Vector3::new(0.0, 0.0, 0.0);
    let p0 = props.vector3("p0", zero);
    let p1 = props.vector3("p1", Vector3::new(1.0, 0.0, 0.0));
    let p2 = props.vector3("p2", Vector3::new(0.0, 1.0, 0.0));
    let positions = vec![Point3::from_vec(p0), Point3::from_vec(p1), Point3::from_vec(p2)];
    let n = (p1 - p0).cross(p2 - p0);
    let normal = if n.dot(n) > 0.0 { n.normalize() } else { n };
    Ok(TriMesh {
        positions,
        normals: vec![normal; 3],
        texcoords: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
        faces: vec![Face { positions: [0, 1, 2], normals: [0, 1, 2], texcoords: [0, 1, 2], material_slot: 0 }],
    })
}

/// The sphere provider: one analytic sphere per declaration.
#[derive(Debug, Default)]
pub struct SphereProvider;

impl ShapeProvider for SphereProvider {
    fn identifier(&self) -> &'static str { "sphere" }

    fn accepts(&self, plugin_type: &str) -> bool { plugin_type == "sphere" }

    fn handle(&self, object: &Object) -> Result<ShapeRecord, ShapeError> {
        use ignis_base::cgmath64::Vector3;
        let props = &object.properties;
        let origin = Point3::from_vec(props.vector3("center", Vector3::new(0.0, 0.0, 0.0)));
        let radius = props.number("radius", 1.0);
        let shape = SphereShape { origin, radius };
        let bbox = shape.bounding_box();
        Ok(ShapeRecord { kind: ShapeKind::Sphere(shape), bbox, plane: None })
    }
}

/// Resolves the provider registered for a plugin type, per the dispatch
/// table of §4.2. Prepare-phase callers use this to register exactly the
/// providers actually needed.
pub fn provider_for(plugin_type: &str) -> Option<Box<dyn ShapeProvider>> {
    if TriMeshProvider.accepts(plugin_type) {
        Some(Box::new(TriMeshProvider))
    } else if SphereProvider.accepts(plugin_type) {
        Some(Box::new(SphereProvider))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_plugin_type_routes_to_trimesh_provider() {
        let provider = provider_for("cube").unwrap();
        assert_eq!(provider.identifier(), "trimesh");
    }

    #[test]
    fn sphere_plugin_type_routes_to_sphere_provider() {
        let provider = provider_for("sphere").unwrap();
        assert_eq!(provider.identifier(), "sphere");
    }

    #[test]
    fn unknown_plugin_type_has_no_provider() {
        assert!(provider_for("nonexistent").is_none());
    }

    #[test]
    fn cube_handle_produces_nonempty_bbox() {
        let object = Object::new("c1", "cube");
        let record = TriMeshProvider.handle(&object).unwrap();
        assert!(record.bbox.diagonal().x > 0.0);
    }

    #[test]
    fn obj_without_backing_file_is_referential_error() {
        let object = Object::new("m1", "obj");
        let err = TriMeshProvider.handle(&object).unwrap_err();
        assert!(matches!(err, ShapeError::FileNotFound(_, _)));
    }
}
