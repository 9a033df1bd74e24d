use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Pixel coordinates in some camera's image plane (`x` = u, `y` = v).
pub type Point2D = Point2<f64>;

/// Four vertices of a quadrilateral, implicitly closed.
pub type Quad = [Point2D; 4];

/// A source-camera pixel together with its depth along the optical axis.
///
/// `z` is in the same units as the calibration translation (usually mm).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthPixel {
    pub u: f64,
    pub v: f64,
    pub z: f64,
}

impl DepthPixel {
    pub fn new(u: f64, v: f64, z: f64) -> Self {
        Self { u, v, z }
    }

    /// `z` is a usable depth: finite and strictly positive.
    #[inline]
    pub fn has_valid_depth(&self) -> bool {
        is_valid_depth(self.z)
    }
}

#[inline]
pub(crate) fn is_valid_depth(z: f64) -> bool {
    z.is_finite() && z > 0.0
}

/// Axis-aligned rectangle in an image plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Corners in the order top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> Quad {
        [
            Point2::new(self.x, self.y),
            Point2::new(self.x + self.w, self.y),
            Point2::new(self.x + self.w, self.y + self.h),
            Point2::new(self.x, self.y + self.h),
        ]
    }

    /// Min/max bounding box of `points`. Returns `None` for an empty slice.
    pub fn bounding(points: &[Point2D]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

/// Every vertex of `points` has finite coordinates.
#[inline]
pub fn all_finite(points: &[Point2D]) -> bool {
    points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
}
