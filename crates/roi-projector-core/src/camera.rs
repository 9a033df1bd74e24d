use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Pinhole camera matrix.
///
/// Only `fx = K[0][0]`, `fy = K[1][1]`, `cx = K[0][2]` and `cy = K[1][2]` are
/// interpreted; skew and the last row are carried along untouched.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intrinsics {
    pub k: Matrix3<f64>,
}

impl Intrinsics {
    pub fn new(k: Matrix3<f64>) -> Self {
        Self { k }
    }

    pub fn from_params(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self::new(Matrix3::new(
            fx, 0.0, cx, //
            0.0, fy, cy, //
            0.0, 0.0, 1.0,
        ))
    }

    pub fn from_row_major(values: &[f64; 9]) -> Self {
        Self::new(Matrix3::from_row_slice(values))
    }

    pub fn to_rows(&self) -> [[f64; 3]; 3] {
        let k = &self.k;
        [
            [k[(0, 0)], k[(0, 1)], k[(0, 2)]],
            [k[(1, 0)], k[(1, 1)], k[(1, 2)]],
            [k[(2, 0)], k[(2, 1)], k[(2, 2)]],
        ]
    }

    #[inline]
    pub fn fx(&self) -> f64 {
        self.k[(0, 0)]
    }

    #[inline]
    pub fn fy(&self) -> f64 {
        self.k[(1, 1)]
    }

    #[inline]
    pub fn cx(&self) -> f64 {
        self.k[(0, 2)]
    }

    #[inline]
    pub fn cy(&self) -> f64 {
        self.k[(1, 2)]
    }

    /// Pixel -> normalized image plane: `((u - cx) / fx, (v - cy) / fy)`.
    #[inline]
    pub fn normalize(&self, u: f64, v: f64) -> Point2<f64> {
        Point2::new((u - self.cx()) / self.fx(), (v - self.cy()) / self.fy())
    }

    /// Normalized image plane -> pixel.
    #[inline]
    pub fn denormalize(&self, n: Point2<f64>) -> Point2<f64> {
        Point2::new(self.fx() * n.x + self.cx(), self.fy() * n.y + self.cy())
    }
}

/// Rigid transform from camera-1 coordinates to camera-2 coordinates.
///
/// Stored as a full 4×4 matrix; the bottom row is assumed to be `[0, 0, 0, 1]`
/// and is never read.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extrinsic {
    pub m: Matrix4<f64>,
}

impl Extrinsic {
    pub fn new(m: Matrix4<f64>) -> Self {
        Self { m }
    }

    pub fn identity() -> Self {
        Self::new(Matrix4::identity())
    }

    pub fn from_row_major(values: &[f64; 16]) -> Self {
        Self::new(Matrix4::from_row_slice(values))
    }

    /// Build from a rotation and a translation.
    pub fn from_parts(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
        Self::new(m)
    }

    pub fn to_rows(&self) -> [[f64; 4]; 4] {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = self.m[(r, c)];
            }
        }
        rows
    }

    pub fn rotation(&self) -> Matrix3<f64> {
        self.m.fixed_view::<3, 3>(0, 0).into_owned()
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.m.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Apply the top 3×4 block: `R * p + t`.
    #[inline]
    pub fn transform(&self, p: &Point3<f64>) -> Point3<f64> {
        let m = &self.m;
        Point3::new(
            m[(0, 0)] * p.x + m[(0, 1)] * p.y + m[(0, 2)] * p.z + m[(0, 3)],
            m[(1, 0)] * p.x + m[(1, 1)] * p.y + m[(1, 2)] * p.z + m[(1, 3)],
            m[(2, 0)] * p.x + m[(2, 1)] * p.y + m[(2, 2)] * p.z + m[(2, 3)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalize_denormalize_round_trip() {
        let k = Intrinsics::from_params(900.0, 880.0, 640.0, 360.0);
        let n = k.normalize(100.0, 500.0);
        assert_relative_eq!(n.x, (100.0 - 640.0) / 900.0);
        assert_relative_eq!(n.y, (500.0 - 360.0) / 880.0);
        let p = k.denormalize(n);
        assert_relative_eq!(p.x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 500.0, epsilon = 1e-9);
    }

    #[test]
    fn row_major_layout_matches_accessors() {
        let k = Intrinsics::from_row_major(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(k.fx(), 1.0);
        assert_eq!(k.cx(), 3.0);
        assert_eq!(k.fy(), 5.0);
        assert_eq!(k.cy(), 6.0);
        assert_eq!(k.to_rows()[2], [7.0, 8.0, 9.0]);
    }

    #[test]
    fn transform_ignores_bottom_row() {
        let mut values = [0.0; 16];
        values[0] = 1.0;
        values[5] = 1.0;
        values[10] = 1.0;
        values[3] = 10.0;
        values[7] = -5.0;
        values[11] = 2.0;
        // garbage bottom row
        values[12] = 3.0;
        values[15] = 7.0;
        let e = Extrinsic::from_row_major(&values);
        let p = e.transform(&Point3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Point3::new(11.0, -3.0, 5.0));
        assert_eq!(e.translation(), Vector3::new(10.0, -5.0, 2.0));
        assert_eq!(e.rotation(), Matrix3::identity());
    }

    #[test]
    fn from_parts_places_blocks() {
        let r = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let t = Vector3::new(1.0, 2.0, 3.0);
        let e = Extrinsic::from_parts(r, t);
        assert_eq!(e.rotation(), r);
        assert_eq!(e.translation(), t);
        assert_eq!(e.to_rows()[3], [0.0, 0.0, 0.0, 1.0]);
    }
}
