#![warn(missing_docs)]
//! Thin lens element
use num::Zero;
use serde::{Deserialize, Serialize};

use super::{ElementAttr, ElementKind, OpticalOperator};
use crate::{
    error::{BeamResult, BeamlineError},
    transfer::{TransferComponent, TransferMatrix},
};

/// A thin lens of a given focal length.
///
/// The angular kick depends on the lateral distance `Δ = offset − x` between the lens axis
/// and the incoming ray, so the `c` slot of the transfer matrix is a
/// [`TransferComponent::Response`] rather than the paraxial constant `−1/f`. The deflection
/// is the exact arcsine form `asin(−Δ/√(Δ² + f²))`, which reduces to the thin-lens rule for
/// small `Δ` but stays well defined far off axis.
///
/// Degenerate inputs are defined behavior, not errors: a ray through the lens center
/// (`Δ == 0`) passes undeviated, and a zero focal length saturates the output angle at
/// `sign(Δ)·∞` instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lens {
    focal_length: f64,
    attr: ElementAttr,
}
impl Lens {
    /// Create a new [`Lens`] with the given label, focal length and axial position.
    ///
    /// A focal length of 0.0 is legal (see the degenerate saturation rule above).
    ///
    /// # Errors
    ///
    /// This function returns an error if the given focal length or axial position is not
    /// finite.
    pub fn new(label: &str, focal_length: f64, z: f64) -> BeamResult<Self> {
        if !focal_length.is_finite() {
            return Err(BeamlineError::Element("focal length must be finite".into()));
        }
        Ok(Self {
            focal_length,
            attr: ElementAttr::new(label, z)?,
        })
    }
    /// Returns the focal length of this [`Lens`].
    #[must_use]
    pub const fn focal_length(&self) -> f64 {
        self.focal_length
    }
    /// Sets the focal length of this [`Lens`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given focal length is not finite.
    pub fn set_focal_length(&mut self, focal_length: f64) -> BeamResult<()> {
        if !focal_length.is_finite() {
            return Err(BeamlineError::Element("focal length must be finite".into()));
        }
        self.focal_length = focal_length;
        Ok(())
    }
}
impl OpticalOperator for Lens {
    fn attr(&self) -> &ElementAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ElementAttr {
        &mut self.attr
    }
    fn kind(&self) -> ElementKind {
        ElementKind::Lens
    }
    fn value(&self) -> f64 {
        self.focal_length
    }
    fn set_value(&mut self, value: f64) -> BeamResult<()> {
        self.set_focal_length(value)
    }
    fn transfer(&self) -> TransferMatrix {
        let offset = self.attr.offset();
        let focal_length = self.focal_length;
        TransferMatrix::new(
            TransferComponent::Constant(1.0),
            TransferComponent::Constant(0.0),
            TransferComponent::Response(Box::new(move |x| {
                let dx = offset - x;
                if dx.is_zero() {
                    0.0
                } else if focal_length.is_zero() {
                    f64::INFINITY * dx.signum()
                } else {
                    (-dx / dx.hypot(focal_length)).asin()
                }
            })),
            TransferComponent::Constant(1.0),
        )
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::{radian, ray::Ray};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    #[test]
    fn new() {
        let lens = Lens::new("L1", 10.0, 50.0).unwrap();
        assert_eq!(lens.focal_length(), 10.0);
        assert_eq!(lens.label(), "L1");
        assert_eq!(lens.z(), 50.0);
        assert_eq!(lens.kind(), ElementKind::Lens);
        assert!(Lens::new("L1", 0.0, 0.0).is_ok());
        assert!(Lens::new("L1", f64::NAN, 0.0).is_err());
        assert!(Lens::new("L1", f64::INFINITY, 0.0).is_err());
    }
    #[test]
    fn apply_center_ray_undeviated() {
        let mut lens = Lens::new("L1", 10.0, 50.0).unwrap();
        lens.set_offset(2.0).unwrap();
        let ray = Ray::new(2.0, radian!(0.3), 50.0, "R0");
        let refracted = lens.apply(&ray);
        assert_abs_diff_eq!(refracted.x(), 2.0);
        assert_abs_diff_eq!(refracted.angle_rad(), 0.3);
        assert_abs_diff_eq!(refracted.z(), 50.0);
    }
    #[test]
    fn apply_off_axis() {
        let lens = Lens::new("L1", 10.0, 50.0).unwrap();
        let ray = Ray::new(5.0, radian!(0.0), 50.0, "R0");
        let refracted = lens.apply(&ray);
        // Δ = 0 − 5 = −5, kick = asin(5/√125)
        assert_relative_eq!(
            refracted.angle_rad(),
            (5.0 / 125.0_f64.sqrt()).asin(),
            max_relative = 1e-12
        );
        assert_abs_diff_eq!(refracted.x(), 5.0);
        assert_abs_diff_eq!(refracted.z(), 50.0);
        assert_eq!(refracted.label(), "L1(R0)");
    }
    #[test]
    fn apply_off_axis_adds_to_input_angle() {
        let lens = Lens::new("L1", 10.0, 50.0).unwrap();
        let ray = Ray::new(5.0, radian!(0.2), 50.0, "R0");
        let refracted = lens.apply(&ray);
        assert_relative_eq!(
            refracted.angle_rad(),
            0.2 + (5.0 / 125.0_f64.sqrt()).asin(),
            max_relative = 1e-12
        );
    }
    #[test]
    fn apply_zero_focal_length_saturates() {
        let lens = Lens::new("L1", 0.0, 50.0).unwrap();
        let ray = Ray::new(-3.0, radian!(0.0), 50.0, "R0");
        // Δ = 0 − (−3) = 3 > 0
        let refracted = lens.apply(&ray);
        assert_eq!(refracted.angle_rad(), f64::INFINITY);
        let ray = Ray::new(3.0, radian!(0.0), 50.0, "R0");
        let refracted = lens.apply(&ray);
        assert_eq!(refracted.angle_rad(), f64::NEG_INFINITY);
    }
    #[test]
    fn set_focal_length() {
        let mut lens = Lens::new("L1", 10.0, 50.0).unwrap();
        lens.set_focal_length(20.0).unwrap();
        assert_eq!(lens.value(), 20.0);
        assert!(lens.set_focal_length(f64::NAN).is_err());
    }
}
