//! Plane-induced homography between the two cameras.
//!
//! When the region lies on a known plane the depth of each corner is implied
//! by the plane, so a single 3×3 homography replaces per-point back-projection.

use crate::calibration::Calibration;
use crate::projection::ProjectionError;
use crate::region::RegionError;
use crate::types::{Point2D, Rect};
use nalgebra::{Matrix3, Point2, Vector3};

/// Homogeneous `w` below this magnitude is treated as a point at infinity.
const MIN_W: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn from_array(rows: [[f64; 3]; 3]) -> Self {
        Self::new(Matrix3::from_fn(|r, c| rows[r][c]))
    }

    pub fn to_array(&self) -> [[f64; 3]; 3] {
        let h = &self.h;
        [
            [h[(0, 0)], h[(0, 1)], h[(0, 2)]],
            [h[(1, 0)], h[(1, 1)], h[(1, 2)]],
            [h[(2, 0)], h[(2, 1)], h[(2, 2)]],
        ]
    }

    /// Map `p`, or `None` when it lands (numerically) at infinity.
    #[inline]
    pub fn apply(&self, p: Point2D) -> Option<Point2D> {
        let v = self.h * Vector3::new(p.x, p.y, 1.0);
        let w = v[2];
        if w.abs() < MIN_W {
            return None;
        }
        Some(Point2::new(v[0] / w, v[1] / w))
    }
}

/// Homography mapping camera-1 pixels to camera-2 pixels for points on the
/// plane `n·X = plane_depth` (camera-1 frame).
///
/// `H = K2 · (R + t·nᵀ / d) · K1⁻¹`, scaled so `H[2][2] = 1`. The normal
/// defaults to the camera-1 optical axis and is normalized before use.
pub fn plane_homography(
    calib: &Calibration,
    plane_depth: f64,
    plane_normal: Option<Vector3<f64>>,
) -> Option<Homography> {
    if !plane_depth.is_finite() || plane_depth <= 0.0 {
        return None;
    }
    let n = plane_normal.unwrap_or_else(Vector3::z);
    let n = n.try_normalize(1e-12)?;

    let r = calib.extrinsic.rotation();
    let t = calib.extrinsic.translation();
    let ratio = t.norm() / plane_depth;
    if ratio > 1.0 {
        log::warn!(
            "baseline/plane depth ratio {ratio:.3} > 1; plane depth {plane_depth} is likely wrong"
        );
    }

    let k1_inv = calib.camera1.k.try_inverse()?;
    let plane_term = r + t * n.transpose() / plane_depth;
    if plane_term.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let h = calib.camera2.k * plane_term * k1_inv;

    let s = h[(2, 2)];
    if s.abs() <= 1e-10 {
        return None;
    }
    Some(Homography::new(h / s))
}

/// Bounding box in camera 2 of `rect` assumed to lie on the fronto-parallel
/// plane at `plane_depth`.
///
/// Camera-1 distortion is removed from the corners before mapping; camera-2
/// distortion is not applied on this path.
pub fn project_rect_planar(
    calib: &Calibration,
    rect: &Rect,
    plane_depth: f64,
) -> Result<Rect, RegionError> {
    if !plane_depth.is_finite() || plane_depth <= 0.0 {
        return Err(RegionError::InvalidDepth);
    }
    let h = plane_homography(calib, plane_depth, None).ok_or(RegionError::DegenerateHomography)?;
    log::debug!("plane homography at depth {plane_depth}: {:?}", h.to_array());

    let mut mapped = [Point2D::origin(); 4];
    for (corner, (c, slot)) in rect.corners().iter().zip(mapped.iter_mut()).enumerate() {
        let mut p = *c;
        if calib.distortion1.has_distortion() {
            let n = calib.distortion1.undistort(calib.camera1.normalize(c.x, c.y));
            p = calib.camera1.denormalize(n);
        }
        *slot = h
            .apply(p)
            .filter(|q| q.x.is_finite() && q.y.is_finite())
            .ok_or(RegionError::ProjectionFailedAt {
                corner,
                source: ProjectionError::NonFinite,
            })?;
    }
    Rect::bounding(&mapped).ok_or(RegionError::NotEnoughPoints { valid: 0 })
}
