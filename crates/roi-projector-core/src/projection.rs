//! Depth-camera pixel -> 2D-camera pixel.

use crate::calibration::Calibration;
use crate::types::{is_valid_depth, Point2D};
use nalgebra::Point3;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("calibration not loaded")]
    NotCalibrated,
    #[error("invalid depth")]
    InvalidDepth,
    #[error("point is behind the target camera")]
    BehindCamera,
    #[error("projected point is not finite")]
    NonFinite,
}

/// Project source pixel `(u, v)` observed at `depth` into camera 2.
///
/// Steps: normalize with K1, undistort with camera-1 coefficients, back-project
/// to `(x·d, y·d, d)`, apply the extrinsic, perspective-divide, distort with
/// camera-2 coefficients, denormalize with K2. Each distortion step is skipped
/// when its coefficients are all zero.
pub fn project_point(
    calib: &Calibration,
    u: f64,
    v: f64,
    depth: f64,
) -> Result<Point2D, ProjectionError> {
    if !is_valid_depth(depth) {
        return Err(ProjectionError::InvalidDepth);
    }

    let mut n1 = calib.camera1.normalize(u, v);
    if calib.distortion1.has_distortion() {
        n1 = calib.distortion1.undistort(n1);
    }

    let p1 = Point3::new(n1.x * depth, n1.y * depth, depth);
    let p2 = calib.extrinsic.transform(&p1);
    if !p2.z.is_finite() || p2.z <= 0.0 {
        return Err(ProjectionError::BehindCamera);
    }

    let mut n2 = (p2 / p2.z).xy();
    if calib.distortion2.has_distortion() {
        n2 = calib.distortion2.distort(n2);
    }

    let out = calib.camera2.denormalize(n2);
    if !out.x.is_finite() || !out.y.is_finite() {
        return Err(ProjectionError::NonFinite);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Extrinsic, Intrinsics};
    use crate::distortion::Distortion;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Vector3};

    fn identity_calibration() -> Calibration {
        let k = Intrinsics::from_params(1000.0, 1000.0, 500.0, 500.0);
        Calibration {
            extrinsic: Extrinsic::identity(),
            camera1: k,
            camera2: k,
            distortion1: Distortion::ZERO,
            distortion2: Distortion::ZERO,
        }
    }

    #[test]
    fn identity_calibration_is_identity() {
        let c = identity_calibration();
        for &(u, v) in &[(0.0, 0.0), (500.0, 500.0), (123.0, 987.0), (-40.0, 1600.0)] {
            for &d in &[0.1, 1.0, 750.0, 1e6] {
                let p = project_point(&c, u, v, d).unwrap();
                assert_relative_eq!(p.x, u, epsilon = 1e-9);
                assert_relative_eq!(p.y, v, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn rejects_bad_depth() {
        let c = identity_calibration();
        for d in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                project_point(&c, 1.0, 1.0, d),
                Err(ProjectionError::InvalidDepth)
            );
        }
    }

    #[test]
    fn translation_shifts_by_focal_over_depth() {
        let mut c = identity_calibration();
        c.extrinsic = Extrinsic::from_parts(Matrix3::identity(), Vector3::new(50.0, -20.0, 0.0));
        let p = project_point(&c, 500.0, 500.0, 1000.0).unwrap();
        assert_relative_eq!(p.x, 550.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 480.0, epsilon = 1e-9);
    }

    #[test]
    fn behind_target_camera() {
        let mut c = identity_calibration();
        c.extrinsic = Extrinsic::from_parts(Matrix3::identity(), Vector3::new(0.0, 0.0, -2000.0));
        assert_eq!(
            project_point(&c, 500.0, 500.0, 1000.0),
            Err(ProjectionError::BehindCamera)
        );
        // exactly on the camera plane is also rejected
        assert_eq!(
            project_point(&c, 500.0, 500.0, 2000.0),
            Err(ProjectionError::BehindCamera)
        );
    }

    #[test]
    fn non_finite_intrinsics_surface_as_error() {
        let mut c = identity_calibration();
        c.camera2 = Intrinsics::from_params(f64::INFINITY, 1000.0, 500.0, 500.0);
        assert_eq!(
            project_point(&c, 600.0, 500.0, 1000.0),
            Err(ProjectionError::NonFinite)
        );
    }

    #[test]
    fn zero_distortion_fast_path_matches_full_path() {
        let c = identity_calibration();
        let n = c.camera1.normalize(321.0, 654.0);
        // evaluate the distortion-applied path by hand with zero coefficients
        let n = Distortion::ZERO.undistort(n);
        let p3 = Point3::new(n.x * 900.0, n.y * 900.0, 900.0);
        let q = c.extrinsic.transform(&p3);
        let n2 = Distortion::ZERO.distort((q / q.z).xy());
        let expected = c.camera2.denormalize(n2);
        assert_eq!(project_point(&c, 321.0, 654.0, 900.0).unwrap(), expected);
    }

    #[test]
    fn distortion_on_both_sides_cancels_for_identical_cameras() {
        let mut c = identity_calibration();
        let d = Distortion::from_array([-0.08, 0.01, 0.0005, -0.0003, 0.0]);
        c.distortion1 = d;
        c.distortion2 = d;
        let p = project_point(&c, 700.0, 300.0, 1200.0).unwrap();
        assert_relative_eq!(p.x, 700.0, epsilon = 1e-3);
        assert_relative_eq!(p.y, 300.0, epsilon = 1e-3);
    }
}
