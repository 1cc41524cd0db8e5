#![warn(missing_docs)]
//! Module for handling optical rays
use std::fmt::Display;

use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{vector, Vector2};
use serde::{Deserialize, Serialize};
use uom::si::{
    angle::{degree, radian},
    f64::Angle,
};

/// A single ray in one-dimensional (x, angle) phase space.
///
/// A [`Ray`] is a point in phase space at a given axial position `z`: a transverse offset `x`
/// from the optical axis and an [`Angle`] relative to it. Rays are immutable value types. An
/// optical element never modifies a ray in place but produces a new one on each application,
/// so a full trace is a sequence of rays.
///
/// The axial position `z` is bookkeeping for consumers (it records where along the column the
/// ray state is valid) and does not enter the transfer math itself.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ray {
    /// transverse offset from the optical axis
    x: f64,
    /// angle relative to the optical axis
    angle: Angle,
    /// axial position of this ray state
    z: f64,
    /// diagnostic label
    label: String,
}
impl Ray {
    /// Creates a new [`Ray`].
    ///
    /// There is nothing to validate here: a ray is pure data carriage. Degenerate values
    /// (e.g. an infinite angle behind a zero-focal-length lens) are legal states.
    #[must_use]
    pub fn new(x: f64, angle: Angle, z: f64, label: &str) -> Self {
        Self {
            x,
            angle,
            z,
            label: label.to_owned(),
        }
    }
    /// Returns the transverse offset of this [`Ray`].
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }
    /// Returns the angle of this [`Ray`].
    #[must_use]
    pub const fn angle(&self) -> Angle {
        self.angle
    }
    /// Returns the angle of this [`Ray`] in radians (the transfer-native unit).
    #[must_use]
    pub fn angle_rad(&self) -> f64 {
        self.angle.get::<radian>()
    }
    /// Returns the angle of this [`Ray`] in degrees (the display-oriented unit).
    #[must_use]
    pub fn angle_deg(&self) -> f64 {
        self.angle.get::<degree>()
    }
    /// Returns the axial position of this [`Ray`].
    #[must_use]
    pub const fn z(&self) -> f64 {
        self.z
    }
    /// Returns the label of this [`Ray`].
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
    /// Return the phase-space vector (x, angle in radians) of this [`Ray`].
    #[must_use]
    pub fn phase_vector(&self) -> Vector2<f64> {
        vector![self.x, self.angle_rad()]
    }
}
impl Display for Ray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ray \"{}\" starting at {}: [{}, {}°]",
            self.label,
            self.z,
            self.x,
            self.angle_deg()
        )
    }
}
/// Tolerance based comparison of rays compares (x, angle, z) and ignores the label.
impl AbsDiffEq for Ray {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.angle_rad().abs_diff_eq(&other.angle_rad(), epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}
impl RelativeEq for Ray {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }
    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self
                .angle_rad()
                .relative_eq(&other.angle_rad(), epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}
