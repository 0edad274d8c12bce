//! Incrementally composed 4×4 transforms.
//!
//! [`Matrix4`] is a thin builder over [`glam::Mat4`]. Every operation multiplies
//! onto the *right* of the current matrix, so the most recently applied operation
//! acts closest to the object's local frame:
//!
//! ```
//! use blocky::Matrix4;
//! use glam::Vec3;
//!
//! let mut m = Matrix4::identity();
//! m.translate(1.0, 0.0, 0.0).rotate(90.0, 0.0, 0.0, 1.0).scale(2.0, 2.0, 2.0);
//!
//! // Scaled first, then rotated, then translated.
//! let p = m.transform_point(Vec3::X);
//! assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
//! ```
//!
//! The type is `Copy`, so capturing a frame for later use is a plain assignment and
//! mutating the copy never touches the original.

use glam::{Mat4, Vec3};

/// A homogeneous transform built by post-multiplying translate/rotate/scale steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4 {
    mat: Mat4,
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix4 {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            mat: Mat4::IDENTITY,
        }
    }

    /// Wraps an existing glam matrix.
    pub fn from_mat4(mat: Mat4) -> Self {
        Self { mat }
    }

    /// Composes a translation on the right.
    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.mat *= Mat4::from_translation(Vec3::new(x, y, z));
        self
    }

    /// Composes a rotation of `degrees` about the axis `(x, y, z)` on the right.
    ///
    /// The axis does not need to be normalized. A zero-length axis leaves the
    /// matrix unchanged.
    pub fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) -> &mut Self {
        let axis = Vec3::new(x, y, z);
        if let Some(axis) = axis.try_normalize() {
            self.mat *= Mat4::from_axis_angle(axis, degrees.to_radians());
        }
        self
    }

    /// Composes a non-uniform scale on the right.
    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.mat *= Mat4::from_scale(Vec3::new(x, y, z));
        self
    }

    /// Applies the transform to a point (w = 1).
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.mat.transform_point3(point)
    }

    /// The translation column, i.e. where the local origin lands.
    pub fn translation(&self) -> Vec3 {
        self.mat.w_axis.truncate()
    }

    pub fn as_mat4(&self) -> Mat4 {
        self.mat
    }

    /// Column-major element array, ready for GPU upload.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.mat.to_cols_array_2d()
    }
}

impl From<&Matrix4> for Matrix4 {
    fn from(other: &Matrix4) -> Self {
        *other
    }
}

impl From<Matrix4> for Mat4 {
    fn from(m: Matrix4) -> Self {
        m.mat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn composition_matches_matrix_product() {
        let mut m = Matrix4::identity();
        m.translate(0.5, -1.0, 2.0)
            .rotate(30.0, 0.0, 1.0, 0.0)
            .scale(2.0, 3.0, 4.0);

        let expected = Mat4::from_translation(Vec3::new(0.5, -1.0, 2.0))
            * Mat4::from_rotation_y(30f32.to_radians())
            * Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));

        let p = Vec3::new(0.3, -0.7, 1.1);
        assert_vec_eq(m.transform_point(p), expected.transform_point3(p));
    }

    #[test]
    fn translate_then_rotate_differs_from_rotate_then_translate() {
        let mut a = Matrix4::identity();
        a.translate(1.0, 0.0, 0.0).rotate(90.0, 0.0, 0.0, 1.0);

        let mut b = Matrix4::identity();
        b.rotate(90.0, 0.0, 0.0, 1.0).translate(1.0, 0.0, 0.0);

        let p = Vec3::new(1.0, 0.0, 0.0);
        assert_vec_eq(a.transform_point(p), Vec3::new(1.0, 1.0, 0.0));
        assert_vec_eq(b.transform_point(p), Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn rotation_uses_degrees_and_normalizes_axis() {
        let mut m = Matrix4::identity();
        m.rotate(90.0, 0.0, 0.0, 5.0);
        assert_vec_eq(m.transform_point(Vec3::X), Vec3::Y);
    }

    #[test]
    fn zero_axis_rotation_is_a_no_op() {
        let mut m = Matrix4::identity();
        m.translate(1.0, 2.0, 3.0);
        let before = m;
        m.rotate(45.0, 0.0, 0.0, 0.0);
        assert_eq!(m, before);
    }

    #[test]
    fn copies_are_independent() {
        let mut original = Matrix4::identity();
        original.translate(1.0, 0.0, 0.0);

        let mut copy = Matrix4::from(&original);
        copy.scale(3.0, 3.0, 3.0).translate(0.0, 5.0, 0.0);

        assert_vec_eq(original.translation(), Vec3::new(1.0, 0.0, 0.0));
        assert_vec_eq(copy.translation(), Vec3::new(1.0, 15.0, 0.0));
    }
}
