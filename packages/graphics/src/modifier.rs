//! Modifiers that map one canvas onto another canvas, and eventually onto the
//! render target.

use vek::*;


/// Any modifier in 2D space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Modifier2 {
    /// Apply an affine transform to the geometry.
    Transform(Transform2),
    /// Apply color multiplication.
    Color(Rgba<f32>),
}

impl From<Transform2> for Modifier2 {
    fn from(inner: Transform2) -> Self {
        Modifier2::Transform(inner)
    }
}

impl From<Rgba<f32>> for Modifier2 {
    fn from(inner: Rgba<f32>) -> Self {
        Modifier2::Color(inner)
    }
}


/// A 2D affine transform modifier. Is a newtype around a matrix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform2(pub Mat3<f32>);

impl Transform2 {
    /// Translate by `v`.
    pub fn translate<V: Into<Vec2<f32>>>(v: V) -> Self {
        Transform2(Mat3::translation_2d(v))
    }

    /// Component-wise scale by `v`.
    pub fn scale<V: Into<Vec2<f32>>>(v: V) -> Self {
        let v = v.into();
        Transform2(Mat3::scaling_3d([v.x, v.y, 1.0]))
    }

    /// Apply this transformation to a point.
    pub fn apply<V: Into<Vec2<f32>>>(&self, v: V) -> Vec2<f32> {
        (self.0 * Vec3::from_point_2d(v)).xy()
    }

    /// Compose with another such that
    /// `b.apply(a.apply(v)) == a.then(&b).apply(v)`.
    pub fn then(&self, other: &Self) -> Self {
        Transform2(other.0 * self.0)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec2<f32>, b: Vec2<f32>) {
        assert!(
            (a - b).magnitude() < 1e-3,
            "{:?} is not close to {:?}", a, b,
        );
    }

    #[test]
    fn translate_then_scale() {
        let t = Transform2::translate([10.0, 20.0])
            .then(&Transform2::scale([2.0, 3.0]));
        assert_close(t.apply([1.0, 1.0]), Vec2::new(22.0, 63.0));
    }
}
