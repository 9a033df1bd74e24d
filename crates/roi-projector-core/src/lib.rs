//! Core geometry for projecting regions of interest from a depth camera into
//! a second (2D) camera.
//!
//! The crate is purely numeric: it knows nothing about image buffers or
//! detectors. Given a stereo [`Calibration`] it maps depth-camera pixels,
//! corner quads and rectangles into the target camera, and scores how much of
//! one convex quad lies inside another.
//!
//! ```
//! use roi_projector_core::{DepthPixel, ProjectorParams, RoiProjector};
//!
//! let record = r#"{
//!     "extrinsic_matrix": [[1,0,0,0],[0,1,0,0],[0,0,1,0],[0,0,0,1]],
//!     "camera1_matrix": [[1000,0,500],[0,1000,500],[0,0,1]],
//!     "camera2_matrix": [[1000,0,500],[0,1000,500],[0,0,1]]
//! }"#;
//! let mut projector = RoiProjector::new(ProjectorParams::default());
//! projector.load_calibration(record).unwrap();
//!
//! let quad = projector
//!     .project_corners(&[
//!         DepthPixel::new(100.0, 200.0, 1000.0),
//!         DepthPixel::new(400.0, 200.0, 1000.0),
//!         DepthPixel::new(400.0, 350.0, 1000.0),
//!         DepthPixel::new(100.0, 350.0, 1000.0),
//!     ])
//!     .unwrap();
//! assert!(projector.is_overlapping(&quad, &quad));
//! ```

mod calibration;
mod camera;
mod distortion;
mod homography;
mod logger;
mod overlap;
mod params;
mod projection;
mod projector;
mod record;
mod region;
mod types;

pub use calibration::{
    Calibration, CalibrationError, KEY_CAMERA1, KEY_CAMERA2, KEY_DISTORTION1, KEY_DISTORTION2,
    KEY_EXTRINSIC,
};
pub use camera::{Extrinsic, Intrinsics};
pub use distortion::{Distortion, UNDISTORT_ITERATIONS};
pub use homography::{plane_homography, project_rect_planar, Homography};
pub use overlap::{
    clip_convex, containment_ratio, is_overlapping, point_in_convex_quad, polygon_area,
    DEFAULT_OVERLAP_THRESHOLD,
};
pub use params::ProjectorParams;
pub use projection::{project_point, ProjectionError};
pub use projector::RoiProjector;
pub use record::{find_key_array_start, parse_fixed, RecordError};
pub use region::{project_corners, project_rect, project_rect_with, RegionError, MIN_RECT_POINTS};
pub use types::{all_finite, DepthPixel, Point2D, Quad, Rect};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
