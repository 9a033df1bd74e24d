//! High-level facade for the `roi-projector-*` workspace.
//!
//! This crate provides:
//! - re-exports of the projection core (`roi_projector::core`),
//! - `{ok, value, message}` outcome types for callers that want plain data
//!   instead of `Result`s,
//! - JSON job files that batch several projections against one calibration,
//! - (feature `cli`, on by default) the `roi-projector` command line tool.
//!
//! ## Quickstart
//!
//! ```no_run
//! use roi_projector::{CornersOutcome, DepthPixel, ProjectorParams, RoiProjector};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut projector = RoiProjector::new(ProjectorParams::default());
//! projector.load_calibration_file("stereo_calibration.json")?;
//!
//! let outcome = CornersOutcome::from(projector.project_corners(&[
//!     DepthPixel::new(100.0, 200.0, 1000.0),
//!     DepthPixel::new(400.0, 200.0, 1000.0),
//!     DepthPixel::new(400.0, 350.0, 1000.0),
//!     DepthPixel::new(100.0, 350.0, 1000.0),
//! ]));
//! println!("{}", serde_json::to_string(&outcome)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `roi_projector::core`: calibration, projection, region and overlap primitives.
//! - `roi_projector::outcome`: serializable per-call results.
//! - `roi_projector::io`: `ProjectionJob` / `ProjectionReport` and `run_job`.

pub use roi_projector_core as core;

pub use roi_projector_core::{
    Calibration, CalibrationError, DepthPixel, Point2D, ProjectionError, ProjectorParams, Quad,
    Rect, RegionError, RoiProjector,
};

pub mod io;
pub mod outcome;

pub use io::{run_job, run_with, JobError, ProjectionJob, ProjectionReport};
pub use outcome::{CornersOutcome, OverlapOutcome, PointOutcome, RectOutcome};
