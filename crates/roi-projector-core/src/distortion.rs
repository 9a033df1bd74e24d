//! Radial + tangential lens distortion on normalized image coordinates.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Fixed-point iterations used by [`Distortion::undistort`].
///
/// There is no convergence test: reference outputs were produced with exactly
/// this many steps.
pub const UNDISTORT_ITERATIONS: usize = 5;

/// Five-coefficient Brown-Conrady model, ordered `(k1, k2, p1, p2, k3)` on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Distortion {
    pub k1: f64,
    pub k2: f64,
    pub p1: f64,
    pub p2: f64,
    pub k3: f64,
}

impl Distortion {
    pub const ZERO: Distortion = Distortion {
        k1: 0.0,
        k2: 0.0,
        p1: 0.0,
        p2: 0.0,
        k3: 0.0,
    };

    pub fn from_array(c: [f64; 5]) -> Self {
        Self {
            k1: c[0],
            k2: c[1],
            p1: c[2],
            p2: c[3],
            k3: c[4],
        }
    }

    pub fn to_array(&self) -> [f64; 5] {
        [self.k1, self.k2, self.p1, self.p2, self.k3]
    }

    /// Any coefficient is nonzero. Only used to skip the model for ideal lenses.
    #[inline]
    pub fn has_distortion(&self) -> bool {
        self.to_array().iter().any(|&c| c != 0.0)
    }

    #[inline]
    fn terms(&self, x: f64, y: f64) -> (f64, f64, f64) {
        let r2 = x * x + y * y;
        let radial = 1.0 + self.k1 * r2 + self.k2 * r2 * r2 + self.k3 * r2 * r2 * r2;
        let x_t = 2.0 * self.p1 * x * y + self.p2 * (r2 + 2.0 * x * x);
        let y_t = self.p1 * (r2 + 2.0 * y * y) + 2.0 * self.p2 * x * y;
        (radial, x_t, y_t)
    }

    /// Ideal normalized point -> distorted normalized point.
    #[inline]
    pub fn distort(&self, p: Point2<f64>) -> Point2<f64> {
        let (radial, x_t, y_t) = self.terms(p.x, p.y);
        Point2::new(p.x * radial + x_t, p.y * radial + y_t)
    }

    /// Distorted normalized point -> ideal normalized point.
    ///
    /// A near-zero radial factor is not guarded; non-finite results propagate
    /// to the caller's finiteness checks.
    pub fn undistort(&self, pd: Point2<f64>) -> Point2<f64> {
        let mut x = pd.x;
        let mut y = pd.y;
        for _ in 0..UNDISTORT_ITERATIONS {
            let (radial, x_t, y_t) = self.terms(x, y);
            x = (pd.x - x_t) / radial;
            y = (pd.y - y_t) / radial;
        }
        Point2::new(x, y)
    }
}

impl From<[f64; 5]> for Distortion {
    fn from(c: [f64; 5]) -> Self {
        Self::from_array(c)
    }
}
