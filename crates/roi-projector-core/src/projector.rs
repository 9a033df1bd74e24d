use crate::calibration::{Calibration, CalibrationError};
use crate::homography::project_rect_planar;
use crate::overlap::is_overlapping;
use crate::params::ProjectorParams;
use crate::projection::{project_point, ProjectionError};
use crate::region::{project_corners, project_rect_with, RegionError};
use crate::types::{DepthPixel, Point2D, Quad, Rect};
use std::path::Path;

/// Stateful entry point: owns the currently usable calibration.
///
/// A failed (re)load never replaces or invalidates a calibration that was
/// loaded earlier. Loading is not synchronized; callers sharing one projector
/// across threads must serialize `load_*` themselves.
#[derive(Clone, Debug, Default)]
pub struct RoiProjector {
    calibration: Option<Calibration>,
    params: ProjectorParams,
}

impl RoiProjector {
    pub fn new(params: ProjectorParams) -> Self {
        Self {
            calibration: None,
            params,
        }
    }

    pub fn with_calibration(calibration: Calibration, params: ProjectorParams) -> Self {
        Self {
            calibration: Some(calibration),
            params,
        }
    }

    #[inline]
    pub fn params(&self) -> &ProjectorParams {
        &self.params
    }

    #[inline]
    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    #[inline]
    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    /// Parse `text` and, on success, make it the active calibration.
    pub fn load_calibration(&mut self, text: &str) -> Result<(), CalibrationError> {
        self.replace_calibration(Calibration::load(text))
    }

    /// Read a calibration record from disk; same replacement rules as
    /// [`RoiProjector::load_calibration`].
    pub fn load_calibration_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<(), CalibrationError> {
        let path = path.as_ref();
        log::info!("loading calibration from {}", path.display());
        self.replace_calibration(Calibration::load_file(path))
    }

    fn replace_calibration(
        &mut self,
        loaded: Result<Calibration, CalibrationError>,
    ) -> Result<(), CalibrationError> {
        match loaded {
            Ok(calibration) => {
                self.calibration = Some(calibration);
                Ok(())
            }
            Err(err) => {
                if self.calibration.is_some() {
                    log::warn!("calibration reload failed, keeping previous calibration: {err}");
                }
                Err(err)
            }
        }
    }

    pub fn project_point(&self, u: f64, v: f64, depth: f64) -> Result<Point2D, ProjectionError> {
        let calib = self.calibration.as_ref().ok_or(ProjectionError::NotCalibrated)?;
        project_point(calib, u, v, depth)
    }

    pub fn project_corners(&self, corners: &[DepthPixel; 4]) -> Result<Quad, RegionError> {
        project_corners(self.require()?, corners)
    }

    pub fn project_rect(&self, rect: &Rect, depth: f64) -> Result<Rect, RegionError> {
        project_rect_with(self.require()?, rect, depth, self.params.min_rect_points)
    }

    /// Rectangle projection through the plane homography at `params.plane_depth`.
    pub fn project_rect_planar(&self, rect: &Rect) -> Result<Rect, RegionError> {
        project_rect_planar(self.require()?, rect, self.params.plane_depth)
    }

    /// Does `target` lie inside `roi` by more than `params.overlap_threshold`?
    ///
    /// Pure geometry: works without a calibration.
    pub fn is_overlapping(&self, roi: &Quad, target: &Quad) -> bool {
        is_overlapping(roi, target, self.params.overlap_threshold)
    }

    fn require(&self) -> Result<&Calibration, RegionError> {
        self.calibration.as_ref().ok_or(RegionError::NotCalibrated)
    }
}
