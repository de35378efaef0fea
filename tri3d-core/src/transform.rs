/// Object orientation and the rotation matrices derived from it
use nalgebra::{Matrix3, Point3, Vector3};
use std::f64::consts::FRAC_PI_2;

use crate::error::ConstructionError;

/// Tolerance used when validating externally supplied matrices.
const ORTHONORMAL_EPSILON: f64 = 1e-9;

/// Heading and pitch of the rendered object (in radians)
///
/// This is the state a frontend keeps between draws; the core only ever sees
/// a copy of it inside [`RenderParams`](crate::RenderParams).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Rotation about the vertical (Y) axis.
    pub heading: f64,
    /// Rotation about the horizontal (X) axis.
    pub pitch: f64,
}

impl Orientation {
    pub fn new(heading: f64, pitch: f64) -> Self {
        Self { heading, pitch }
    }

    pub fn zero() -> Self {
        Self {
            heading: 0.0,
            pitch: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians), keeping pitch in [-π/2, π/2]
    pub fn rotate(&mut self, d_heading: f64, d_pitch: f64) {
        self.heading += d_heading;
        self.pitch = (self.pitch + d_pitch).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// The combined `Heading · Pitch` rotation for this orientation
    pub fn matrix(&self) -> RotationMatrix {
        RotationMatrix::orientation(self.heading, self.pitch)
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::zero()
    }
}

/// An orthonormal 3x3 rotation matrix
///
/// Only heading/pitch rotations and their products can be built, which keeps
/// the matrix orthonormal. [`RotationMatrix::try_from_row_major`] is the
/// single escape hatch and validates its input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix {
    m: Matrix3<f64>,
}

impl RotationMatrix {
    pub fn identity() -> Self {
        Self {
            m: Matrix3::identity(),
        }
    }

    /// Rotation about the Y axis.
    pub fn heading(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        #[rustfmt::skip]
        let m = Matrix3::new(
            c,   0.0, s,
            0.0, 1.0, 0.0,
            -s,  0.0, c,
        );
        Self { m }
    }

    /// Rotation about the X axis.
    pub fn pitch(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        #[rustfmt::skip]
        let m = Matrix3::new(
            1.0, 0.0, 0.0,
            0.0, c,   s,
            0.0, -s,  c,
        );
        Self { m }
    }

    /// `Heading(heading) · Pitch(pitch)`: pitch is applied first.
    pub fn orientation(heading: f64, pitch: f64) -> Self {
        Self::heading(heading).compose(&Self::pitch(pitch))
    }

    /// Build a matrix from nine row-major values.
    ///
    /// Fails on the wrong element count or when the rows are not orthonormal.
    pub fn try_from_row_major(values: &[f64]) -> Result<Self, ConstructionError> {
        if values.len() != 9 {
            return Err(ConstructionError::ElementCount(values.len()));
        }
        let m = Matrix3::from_row_slice(values);
        let deviation = (m * m.transpose() - Matrix3::identity()).amax();
        if deviation > ORTHONORMAL_EPSILON {
            return Err(ConstructionError::NotOrthonormal { deviation });
        }
        Ok(Self { m })
    }

    /// `self · other`: the result applies `other` first, then `self`.
    pub fn compose(&self, other: &RotationMatrix) -> RotationMatrix {
        Self { m: self.m * other.m }
    }

    pub fn apply(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.m * v
    }

    pub fn apply_point(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.m * p.coords)
    }

    /// The nine entries in row-major order.
    pub fn to_row_major(&self) -> [f64; 9] {
        let t = self.m.transpose();
        let mut out = [0.0; 9];
        out.copy_from_slice(t.as_slice());
        out
    }
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::identity()
    }
}
