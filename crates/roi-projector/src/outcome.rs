//! Caller-facing `{ok, value, message}` shapes built from core results.

use roi_projector_core::{Point2D, ProjectionError, Quad, Rect, RegionError};
use serde::{Deserialize, Serialize};

const OK: &str = "ok";

/// Result of projecting a single depth pixel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointOutcome {
    pub ok: bool,
    pub point: Option<[f64; 2]>,
    pub message: String,
}

impl From<Result<Point2D, ProjectionError>> for PointOutcome {
    fn from(res: Result<Point2D, ProjectionError>) -> Self {
        match res {
            Ok(p) => Self {
                ok: true,
                point: Some([p.x, p.y]),
                message: OK.to_string(),
            },
            Err(err) => Self {
                ok: false,
                point: None,
                message: err.to_string(),
            },
        }
    }
}

/// Result of all-or-nothing corner projection. `points` is empty on failure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CornersOutcome {
    pub ok: bool,
    pub points: Vec<[f64; 2]>,
    pub message: String,
}

impl CornersOutcome {
    /// The projected quad, if the projection succeeded.
    pub fn quad(&self) -> Option<Quad> {
        if !self.ok {
            return None;
        }
        let pts: [[f64; 2]; 4] = self.points.as_slice().try_into().ok()?;
        Some(quad_from_array(&pts))
    }
}

impl From<Result<Quad, RegionError>> for CornersOutcome {
    fn from(res: Result<Quad, RegionError>) -> Self {
        match res {
            Ok(q) => Self {
                ok: true,
                points: quad_to_array(&q).to_vec(),
                message: OK.to_string(),
            },
            Err(err) => Self {
                ok: false,
                points: Vec::new(),
                message: err.to_string(),
            },
        }
    }
}

/// Result of rectangle projection (depth or plane based).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectOutcome {
    pub ok: bool,
    pub rect: Option<Rect>,
    pub message: String,
}

impl From<Result<Rect, RegionError>> for RectOutcome {
    fn from(res: Result<Rect, RegionError>) -> Self {
        match res {
            Ok(rect) => Self {
                ok: true,
                rect: Some(rect),
                message: OK.to_string(),
            },
            Err(err) => Self {
                ok: false,
                rect: None,
                message: err.to_string(),
            },
        }
    }
}

/// Containment of a target quad in an ROI quad.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlapOutcome {
    /// Fraction of the target area inside the ROI.
    pub ratio: f64,
    pub threshold: f64,
    pub overlapping: bool,
}

impl OverlapOutcome {
    pub fn evaluate(roi: &Quad, target: &Quad, threshold: f64) -> Self {
        let ratio = roi_projector_core::containment_ratio(roi, target);
        Self {
            ratio,
            threshold,
            overlapping: ratio > threshold,
        }
    }
}

pub fn quad_from_array(points: &[[f64; 2]; 4]) -> Quad {
    points.map(|[x, y]| Point2D::new(x, y))
}

pub fn quad_to_array(quad: &Quad) -> [[f64; 2]; 4] {
    quad.map(|p| [p.x, p.y])
}
