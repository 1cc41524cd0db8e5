#![warn(missing_docs)]
//! Free-space propagation element
use num::Zero;
use serde::{Deserialize, Serialize};

use super::{ElementAttr, ElementKind, OpticalOperator};
use crate::{
    error::{BeamResult, BeamlineError},
    transfer::{TransferComponent, TransferMatrix},
};

/// A free-space gap of a given axial extent.
///
/// A propagator advances a ray along the optical axis by its signed `distance`, shifting the
/// transverse offset by the exact (finite-angle) `tan(θ)·d` rather than the small-angle
/// `θ·d`. The angle itself is unchanged. In a canonical system (source at the largest `z`,
/// screen at the smallest) the synthesized propagator distances are negative, so rays move
/// toward smaller `z` as they travel downstream.
///
/// Propagators are normally not created by hand but synthesized by
/// [`OpticalSystem::fill`](crate::system::OpticalSystem::fill), which keeps exactly one of
/// them between any two axially adjacent physical elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Propagator {
    distance: f64,
    attr: ElementAttr,
}
impl Propagator {
    /// Create a new [`Propagator`] with the given label, signed propagation distance and
    /// axial position.
    ///
    /// # Errors
    ///
    /// This function returns an error if the given distance or axial position is not finite.
    pub fn new(label: &str, distance: f64, z: f64) -> BeamResult<Self> {
        if !distance.is_finite() {
            return Err(BeamlineError::Element(
                "propagation distance must be finite".into(),
            ));
        }
        Ok(Self {
            distance,
            attr: ElementAttr::new(label, z)?,
        })
    }
    /// Returns the signed propagation distance of this [`Propagator`].
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }
    /// Sets the signed propagation distance of this [`Propagator`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given distance is not finite.
    pub fn set_distance(&mut self, distance: f64) -> BeamResult<()> {
        if !distance.is_finite() {
            return Err(BeamlineError::Element(
                "propagation distance must be finite".into(),
            ));
        }
        self.distance = distance;
        Ok(())
    }
}
impl OpticalOperator for Propagator {
    fn attr(&self) -> &ElementAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ElementAttr {
        &mut self.attr
    }
    fn kind(&self) -> ElementKind {
        ElementKind::Propagator
    }
    fn value(&self) -> f64 {
        self.distance
    }
    fn set_value(&mut self, value: f64) -> BeamResult<()> {
        self.set_distance(value)
    }
    fn transfer(&self) -> TransferMatrix {
        // d == 0 must stay an exact identity even for degenerate (infinite) angles
        if self.distance.is_zero() {
            return TransferMatrix::identity();
        }
        let distance = self.distance;
        TransferMatrix::new(
            TransferComponent::Constant(1.0),
            TransferComponent::Response(Box::new(move |angle| angle.tan() * distance)),
            TransferComponent::Constant(0.0),
            TransferComponent::Constant(1.0),
        )
    }
    fn axial_shift(&self) -> f64 {
        self.distance
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::{radian, ray::Ray};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    #[test]
    fn new() {
        let propagator = Propagator::new("S0", -50.0, 50.0).unwrap();
        assert_eq!(propagator.distance(), -50.0);
        assert_eq!(propagator.label(), "S0");
        assert_eq!(propagator.z(), 50.0);
        assert_eq!(propagator.kind(), ElementKind::Propagator);
        assert!(Propagator::new("S0", f64::NAN, 0.0).is_err());
        assert!(Propagator::new("S0", f64::INFINITY, 0.0).is_err());
        assert!(Propagator::new("S0", 0.0, f64::NAN).is_err());
    }
    #[test]
    fn apply() {
        let propagator = Propagator::new("S0", -50.0, 50.0).unwrap();
        let ray = Ray::new(5.0, radian!(0.1), 100.0, "R0");
        let propagated = propagator.apply(&ray);
        assert_relative_eq!(propagated.x(), 5.0 + 0.1_f64.tan() * (-50.0));
        assert_abs_diff_eq!(propagated.angle_rad(), 0.1);
        assert_abs_diff_eq!(propagated.z(), 50.0);
        assert_eq!(propagated.label(), "S0(R0)");
    }
    #[test]
    fn apply_zero_distance_is_identity() {
        let propagator = Propagator::new("S0", 0.0, 10.0).unwrap();
        let ray = Ray::new(1.0, radian!(0.5), 10.0, "R0");
        let propagated = propagator.apply(&ray);
        assert_abs_diff_eq!(propagated.x(), ray.x());
        assert_abs_diff_eq!(propagated.angle_rad(), ray.angle_rad());
        assert_abs_diff_eq!(propagated.z(), ray.z());
    }
    #[test]
    fn apply_zero_distance_degenerate_angle() {
        // an infinite angle (e.g. behind a zero-focal-length lens) must survive a
        // zero-length gap unchanged instead of degrading to NaN
        let propagator = Propagator::new("S0", 0.0, 10.0).unwrap();
        let ray = Ray::new(1.0, radian!(f64::INFINITY), 10.0, "R0");
        let propagated = propagator.apply(&ray);
        assert_eq!(propagated.x(), 1.0);
        assert_eq!(propagated.angle_rad(), f64::INFINITY);
    }
    #[test]
    fn set_distance() {
        let mut propagator = Propagator::new("S0", 1.0, 0.0).unwrap();
        propagator.set_distance(2.0).unwrap();
        assert_eq!(propagator.distance(), 2.0);
        assert!(propagator.set_distance(f64::NAN).is_err());
        assert_eq!(propagator.value(), 2.0);
    }
}
