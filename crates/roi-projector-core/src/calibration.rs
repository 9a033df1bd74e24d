//! Stereo calibration record: loading and writing.

use crate::camera::{Extrinsic, Intrinsics};
use crate::distortion::Distortion;
use crate::record::{parse_fixed, RecordError};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

pub const KEY_EXTRINSIC: &str = "extrinsic_matrix";
pub const KEY_CAMERA1: &str = "camera1_matrix";
pub const KEY_CAMERA2: &str = "camera2_matrix";
pub const KEY_DISTORTION1: &str = "camera1_distortion";
pub const KEY_DISTORTION2: &str = "camera2_distortion";

#[derive(thiserror::Error, Debug)]
pub enum CalibrationError {
    #[error("calibration record rejected: {0}")]
    Record(#[from] RecordError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("\"{key}\" holds a non-finite value and cannot be written")]
    NonFinite { key: &'static str },
}

/// One-time stereo calibration between the depth camera (camera 1) and the
/// 2D camera (camera 2).
///
/// A value of this type only exists once every required matrix has parsed,
/// so holding one means the calibration is usable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Camera-1 frame -> camera-2 frame.
    pub extrinsic: Extrinsic,
    pub camera1: Intrinsics,
    pub camera2: Intrinsics,
    pub distortion1: Distortion,
    pub distortion2: Distortion,
}

impl Calibration {
    /// Parse a calibration record.
    ///
    /// `extrinsic_matrix` (16 values) and both camera matrices (9 values each)
    /// are required; the whole load fails if any of them is missing or short.
    /// The distortion arrays are optional and fall back to zero on absence or
    /// on any scan failure.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(text), fields(len = text.len()))
    )]
    pub fn load(text: &str) -> Result<Self, CalibrationError> {
        let extrinsic = Extrinsic::from_row_major(&parse_fixed::<16>(text, KEY_EXTRINSIC)?);
        let camera1 = Intrinsics::from_row_major(&parse_fixed::<9>(text, KEY_CAMERA1)?);
        let camera2 = Intrinsics::from_row_major(&parse_fixed::<9>(text, KEY_CAMERA2)?);
        let distortion1 = optional_distortion(text, KEY_DISTORTION1);
        let distortion2 = optional_distortion(text, KEY_DISTORTION2);

        log::debug!(
            "calibration loaded: fx1={:.3} fy1={:.3} fx2={:.3} fy2={:.3} t={:?} dist1={} dist2={}",
            camera1.fx(),
            camera1.fy(),
            camera2.fx(),
            camera2.fy(),
            extrinsic.translation().as_slice(),
            distortion1.has_distortion(),
            distortion2.has_distortion(),
        );

        Ok(Self {
            extrinsic,
            camera1,
            camera2,
            distortion1,
            distortion2,
        })
    }

    /// Read and parse a calibration record from disk.
    pub fn load_file(path: impl AsRef<std::path::Path>) -> Result<Self, CalibrationError> {
        let raw = std::fs::read_to_string(path)?;
        Self::load(&raw)
    }

    /// Serialize as a record that [`Calibration::load`] reads back unchanged.
    ///
    /// Matrices are written as nested rows, distortion as flat 5-arrays.
    /// JSON has no `inf`/`nan`, so a calibration holding one is rejected.
    pub fn to_record_json(&self) -> Result<String, CalibrationError> {
        let (d1, d2) = (self.distortion1.to_array(), self.distortion2.to_array());
        let fields: [(&'static str, &[f64]); 5] = [
            (KEY_EXTRINSIC, self.extrinsic.m.as_slice()),
            (KEY_CAMERA1, self.camera1.k.as_slice()),
            (KEY_DISTORTION1, &d1),
            (KEY_CAMERA2, self.camera2.k.as_slice()),
            (KEY_DISTORTION2, &d2),
        ];
        if let Some((key, _)) = fields
            .iter()
            .find(|(_, values)| values.iter().any(|v| !v.is_finite()))
        {
            return Err(CalibrationError::NonFinite { key: *key });
        }

        let record = serde_json::json!({
            KEY_EXTRINSIC: self.extrinsic.to_rows(),
            KEY_CAMERA1: self.camera1.to_rows(),
            KEY_DISTORTION1: d1,
            KEY_CAMERA2: self.camera2.to_rows(),
            KEY_DISTORTION2: d2,
        });
        Ok(serde_json::to_string_pretty(&record)?)
    }

    /// Write the record produced by [`Calibration::to_record_json`] to disk.
    pub fn write_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), CalibrationError> {
        std::fs::write(path, self.to_record_json()?)?;
        Ok(())
    }
}

fn optional_distortion(text: &str, key: &str) -> Distortion {
    match parse_fixed::<5>(text, key) {
        Ok(c) => Distortion::from_array(c),
        Err(err) => {
            log::debug!("{key}: using zero distortion ({err})");
            Distortion::ZERO
        }
    }
}
