use crate::overlap::DEFAULT_OVERLAP_THRESHOLD;
use crate::region::MIN_RECT_POINTS;
use serde::{Deserialize, Serialize};

fn default_overlap_threshold() -> f64 {
    DEFAULT_OVERLAP_THRESHOLD
}

fn default_min_rect_points() -> usize {
    MIN_RECT_POINTS
}

fn default_plane_depth() -> f64 {
    1000.0
}

/// Tunables for [`RoiProjector`](crate::RoiProjector).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectorParams {
    /// Containment ratio that must be exceeded for two regions to match.
    #[serde(default = "default_overlap_threshold")]
    pub overlap_threshold: f64,
    /// Surviving corners needed by best-effort rectangle projection.
    #[serde(default = "default_min_rect_points")]
    pub min_rect_points: usize,
    /// Plane depth used by the planar (homography) rectangle path, in
    /// calibration units.
    #[serde(default = "default_plane_depth")]
    pub plane_depth: f64,
}

impl Default for ProjectorParams {
    fn default() -> Self {
        Self {
            overlap_threshold: default_overlap_threshold(),
            min_rect_points: default_min_rect_points(),
            plane_depth: default_plane_depth(),
        }
    }
}
