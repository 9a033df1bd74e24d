//! JSON job files and reports for batch projection.

use crate::outcome::{quad_from_array, CornersOutcome, OverlapOutcome, RectOutcome};
use roi_projector_core::{CalibrationError, DepthPixel, ProjectorParams, Rect, RoiProjector};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum JobError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("calibration {path}: {source}")]
    Calibration {
        path: String,
        #[source]
        source: CalibrationError,
    },
}

/// One batch of projections against a single calibration.
///
/// Every operation is optional; the report only contains the ones requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionJob {
    pub calibration_path: String,
    #[serde(default)]
    pub params: Option<ProjectorParams>,
    #[serde(default)]
    pub corners: Option<[DepthPixel; 4]>,
    #[serde(default)]
    pub rect: Option<Rect>,
    /// Depth for `rect`; `params.plane_depth` when omitted.
    #[serde(default)]
    pub depth: Option<f64>,
    /// Also project `rect` through the plane homography.
    #[serde(default)]
    pub planar: bool,
    #[serde(default)]
    pub roi_quad: Option<[[f64; 2]; 4]>,
    #[serde(default)]
    pub target_quad: Option<[[f64; 2]; 4]>,
    #[serde(default)]
    pub output_path: Option<String>,
}

impl ProjectionJob {
    /// Load a JSON job from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, JobError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this job to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), JobError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve relative paths against `dir` (usually the job file's folder).
    pub fn rebase(&mut self, dir: &Path) {
        let rebase = |p: &str| -> String {
            let path = Path::new(p);
            if path.is_relative() {
                dir.join(path).to_string_lossy().into_owned()
            } else {
                p.to_string()
            }
        };
        self.calibration_path = rebase(&self.calibration_path);
        self.output_path = self.output_path.as_deref().map(rebase);
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        self.output_path.as_ref().map(PathBuf::from)
    }

    pub fn params(&self) -> ProjectorParams {
        self.params.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corners: Option<CornersOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect: Option<RectOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planar_rect: Option<RectOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap: Option<OverlapOutcome>,
}

impl ProjectionReport {
    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), JobError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Every requested projection succeeded.
    pub fn all_ok(&self) -> bool {
        self.corners.as_ref().is_none_or(|c| c.ok)
            && self.rect.as_ref().is_none_or(|r| r.ok)
            && self.planar_rect.as_ref().is_none_or(|r| r.ok)
    }
}

/// Load the job's calibration and run every requested operation.
///
/// Only an unusable calibration aborts the job; per-operation failures are
/// recorded in the report.
pub fn run_job(job: &ProjectionJob) -> Result<ProjectionReport, JobError> {
    let mut projector = RoiProjector::new(job.params());
    projector
        .load_calibration_file(&job.calibration_path)
        .map_err(|source| JobError::Calibration {
            path: job.calibration_path.clone(),
            source,
        })?;
    Ok(run_with(&projector, job))
}

/// Run the operations of `job` on an already calibrated projector.
pub fn run_with(projector: &RoiProjector, job: &ProjectionJob) -> ProjectionReport {
    let mut report = ProjectionReport::default();

    if let Some(corners) = &job.corners {
        report.corners = Some(projector.project_corners(corners).into());
    }

    if let Some(rect) = &job.rect {
        let depth = job.depth.unwrap_or(projector.params().plane_depth);
        report.rect = Some(projector.project_rect(rect, depth).into());
        if job.planar {
            report.planar_rect = Some(projector.project_rect_planar(rect).into());
        }
    }

    match (&job.roi_quad, &job.target_quad) {
        (Some(roi), Some(target)) => {
            report.overlap = Some(OverlapOutcome::evaluate(
                &quad_from_array(roi),
                &quad_from_array(target),
                projector.params().overlap_threshold,
            ));
        }
        (None, None) => {}
        _ => log::warn!("overlap check needs both roi_quad and target_quad; skipped"),
    }

    log::info!("job finished, all ok: {}", report.all_ok());
    report
}
