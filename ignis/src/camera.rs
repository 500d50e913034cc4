//! Camera orientation (§3 supplement, grounded on the original runtime's
//! `CameraOrientation`): the eye position and local basis a camera-driven
//! ray-generation shader needs, independent of the particular camera
//! plugin (`perspective`, `orthographic`, `fisheye`) that produced it.

use ignis_base::cgmath64::{InnerSpace, Point3, Vector3};
use ignis_scene::Object;

/// The eye point plus forward/up directions a ray-generation shader reads
/// to build its local camera basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOrientation {
    /// The eye (camera origin) in world space.
    pub eye: Point3,
    /// The normalized forward direction.
    pub dir: Vector3,
    /// The normalized up direction.
    pub up: Vector3,
}

impl CameraOrientation {
    /// Builds an orientation from raw (not necessarily normalized)
    /// vectors, normalizing `dir` and `up` in the process.
    pub fn new(eye: Point3, dir: Vector3, up: Vector3) -> Self {
        Self { eye, dir: dir.normalize(), up: up.normalize() }
    }

    /// Derives an orientation from a `camera` scene object's `eye`, `dir`
    /// and `up` vector3 properties, defaulting to a camera looking down
    /// `-Z` from the origin with `+Y` up when a property is absent.
    pub fn from_object(object: &Object) -> Self {
        let eye = object.properties.vector3("eye", Vector3::new(0.0, 0.0, 0.0));
        let dir = object.properties.vector3("dir", Vector3::new(0.0, 0.0, -1.0));
        let up = object.properties.vector3("up", Vector3::new(0.0, 1.0, 0.0));
        Self::new(Point3::new(eye.x, eye.y, eye.z), dir, up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_object_looks_down_negative_z() {
        let object = Object::new("camera", "perspective");
        let orientation = CameraOrientation::from_object(&object);
        assert_eq!(orientation.eye, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(orientation.dir, Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(orientation.up, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn direction_and_up_are_normalized() {
        let orientation = CameraOrientation::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -2.0), Vector3::new(0.0, 3.0, 0.0));
        assert!((orientation.dir.magnitude() - 1.0).abs() < 1.0e-9);
        assert!((orientation.up.magnitude() - 1.0).abs() < 1.0e-9);
    }
}
