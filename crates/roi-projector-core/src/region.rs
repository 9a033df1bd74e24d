//! Projecting whole regions (4 corners or an axis-aligned rectangle).
//!
//! The two entry points fail differently on purpose:
//! - [`project_corners`] is all-or-nothing and stops at the first bad corner,
//! - [`project_rect`] drops corners that fail and only needs a few survivors.

use crate::calibration::Calibration;
use crate::projection::{project_point, ProjectionError};
use crate::types::{is_valid_depth, DepthPixel, Point2D, Quad, Rect};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Minimum number of projected corners [`project_rect`] needs to build a box.
pub const MIN_RECT_POINTS: usize = 2;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("calibration not loaded")]
    NotCalibrated,
    /// Corner indices are 0-based.
    #[error("invalid depth at corner {corner}")]
    InvalidDepthAt { corner: usize },
    #[error("projection failed at corner {corner}")]
    ProjectionFailedAt {
        corner: usize,
        #[source]
        source: ProjectionError,
    },
    #[error("invalid depth")]
    InvalidDepth,
    #[error("not enough valid projected points")]
    NotEnoughPoints { valid: usize },
    #[error("plane homography is degenerate")]
    DegenerateHomography,
}

/// Project 4 corners, each with its own depth, keeping input order.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(calib)))]
pub fn project_corners(
    calib: &Calibration,
    corners: &[DepthPixel; 4],
) -> Result<Quad, RegionError> {
    let mut out = [Point2D::origin(); 4];
    for (corner, (pt, slot)) in corners.iter().zip(out.iter_mut()).enumerate() {
        if !pt.has_valid_depth() {
            return Err(RegionError::InvalidDepthAt { corner });
        }
        *slot = project_point(calib, pt.u, pt.v, pt.z)
            .map_err(|source| RegionError::ProjectionFailedAt { corner, source })?;
        log::debug!(
            "corner {corner}: ({:.2}, {:.2}) z={:.2} -> ({:.2}, {:.2})",
            pt.u,
            pt.v,
            pt.z,
            slot.x,
            slot.y
        );
    }
    Ok(out)
}

/// Bounding box in camera 2 of `rect` lying at a single `depth`.
pub fn project_rect(calib: &Calibration, rect: &Rect, depth: f64) -> Result<Rect, RegionError> {
    project_rect_with(calib, rect, depth, MIN_RECT_POINTS)
}

/// [`project_rect`] with an explicit survivor count.
///
/// Corners whose projection fails are skipped. The result is the min/max box
/// of the surviving points, not the projected quadrilateral.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(calib)))]
pub fn project_rect_with(
    calib: &Calibration,
    rect: &Rect,
    depth: f64,
    min_points: usize,
) -> Result<Rect, RegionError> {
    if !is_valid_depth(depth) {
        return Err(RegionError::InvalidDepth);
    }

    let mut projected = Vec::with_capacity(4);
    for (i, c) in rect.corners().iter().enumerate() {
        match project_point(calib, c.x, c.y, depth) {
            Ok(p) => projected.push(p),
            Err(err) => log::warn!("rect corner {i} dropped: {err}"),
        }
    }

    if projected.len() < min_points.max(1) {
        return Err(RegionError::NotEnoughPoints {
            valid: projected.len(),
        });
    }
    Rect::bounding(&projected).ok_or(RegionError::NotEnoughPoints { valid: 0 })
}
