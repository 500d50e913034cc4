//! Affine transforms and the normal-matrix / scale-factor pair entities need
//! for the 48-byte fixed-table entry (§4.3).

use crate::cgmath64::*;

/// An affine transform stored together with its inverse, mirroring the
/// `Transformf` used throughout `LoaderEntity.cpp`: the loader always needs
/// both directions (to-local for shading, to-global for BVH/world queries)
/// and recomputing the inverse per use would be wasteful.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    to_global: Matrix4,
    to_local: Matrix4,
}

impl Transform {
    /// Builds a transform from its forward matrix, inverting it once.
    ///
    /// # Panics
    /// Panics if `matrix` is not invertible; a non-invertible entity
    /// transform is a scene-authoring error the loader should have rejected
    /// earlier (degenerate / zero-scale instances are a structural error,
    /// §7).
    pub fn new(to_global: Matrix4) -> Self {
        let to_local = to_global
            .invert()
            .expect("entity transform must be invertible");
        Self { to_global, to_local }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            to_global: Matrix4::from_value(1.0),
            to_local: Matrix4::from_value(1.0),
        }
    }

    /// The forward (local → global) matrix.
    pub fn to_global(&self) -> Matrix4 { self.to_global }

    /// The inverse (global → local) matrix.
    pub fn to_local(&self) -> Matrix4 { self.to_local }

    /// The upper-left 3x3 linear part of the forward matrix, transformed for
    /// normals: `inverse(linear)^T`. Used both to transform shading normals
    /// into global space and to derive the per-entity `scale_factor`.
    pub fn normal_matrix(&self) -> Matrix3 {
        let linear = Matrix3::new(
            self.to_global.x.x, self.to_global.x.y, self.to_global.x.z,
            self.to_global.y.x, self.to_global.y.y, self.to_global.y.z,
            self.to_global.z.x, self.to_global.z.y, self.to_global.z.z,
        );
        linear
            .invert()
            .expect("entity transform must be invertible")
            .transpose()
    }

    /// `|det(normal_matrix)|`, the area/volume scale factor written into the
    /// entity's fixed-table entry (§4.3).
    pub fn scale_factor(&self) -> f64 { self.normal_matrix().determinant().abs() }

    /// Applies the forward transform to a point.
    pub fn transform_point(&self, p: Point3) -> Point3 {
        let v = self.to_global * p.to_homogeneous();
        Point3::from_homogeneous(v)
    }

    /// Transforms a bounding box by pushing its 8 corners through the
    /// forward transform and re-deriving the axis-aligned box. Mirrors
    /// `BoundingBox::transformed` from `LoaderEntity.cpp`.
    pub fn transform_bbox(&self, bbox: &crate::bounding_box::BoundingBox<Point3>) -> crate::bounding_box::BoundingBox<Point3> {
        let min = bbox.min();
        let max = bbox.max();
        let corners = [
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(min.x, max.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, min.y, max.z),
            Point3::new(max.x, min.y, max.z),
            Point3::new(min.x, max.y, max.z),
            Point3::new(max.x, max.y, max.z),
        ];
        corners
            .iter()
            .map(|c| self.transform_point(*c))
            .collect()
    }
}

impl Default for Transform {
    fn default() -> Self { Self::identity() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounding_box::BoundingBox;

    #[test]
    fn identity_roundtrip() {
        let t = Transform::identity();
        assert_eq!(t.scale_factor(), 1.0);
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(t.transform_point(p), p);
    }

    #[test]
    fn uniform_scale_scale_factor() {
        let t = Transform::new(Matrix4::from_scale(2.0));
        // normal matrix of a uniform scale by s has determinant 1/s^3... but
        // inverse-transpose of (s*I) is (1/s)*I, det = 1/s^3. Its absolute
        // value is the factor written to the entity table.
        assert!((t.scale_factor() - 0.125).abs() < 1e-9);
    }

    #[test]
    fn transform_bbox_translates() {
        let t = Transform::new(Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0)));
        let mut bbox = BoundingBox::new();
        bbox.push(&Point3::new(0.0, 0.0, 0.0));
        bbox.push(&Point3::new(1.0, 1.0, 1.0));
        let moved = t.transform_bbox(&bbox);
        assert_eq!(moved.min(), &Point3::new(1.0, 0.0, 0.0));
        assert_eq!(moved.max(), &Point3::new(2.0, 1.0, 1.0));
    }
}
