#![warn(missing_docs)]
//! Beam deflector element
use serde::{Deserialize, Serialize};
use uom::si::{
    angle::{degree, radian},
    f64::Angle,
};

use super::{ElementAttr, ElementKind, OpticalOperator};
use crate::{
    error::{BeamResult, BeamlineError},
    transfer::{TransferComponent, TransferMatrix},
};

/// A beam deflector adding a constant angle to every ray.
///
/// The deflection is independent of the lateral distance from the optical axis, so the `d`
/// slot of the transfer matrix is a simple additive response of the input angle. The
/// element's `value` is the deflection in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deflector {
    deflection: Angle,
    attr: ElementAttr,
}
impl Deflector {
    /// Create a new [`Deflector`] with the given label, deflection angle and axial position.
    ///
    /// # Errors
    ///
    /// This function returns an error if the given deflection or axial position is not
    /// finite.
    pub fn new(label: &str, deflection: Angle, z: f64) -> BeamResult<Self> {
        if !deflection.is_finite() {
            return Err(BeamlineError::Element(
                "deflection angle must be finite".into(),
            ));
        }
        Ok(Self {
            deflection,
            attr: ElementAttr::new(label, z)?,
        })
    }
    /// Returns the deflection angle of this [`Deflector`].
    #[must_use]
    pub const fn deflection(&self) -> Angle {
        self.deflection
    }
    /// Sets the deflection angle of this [`Deflector`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given deflection is not finite.
    pub fn set_deflection(&mut self, deflection: Angle) -> BeamResult<()> {
        if !deflection.is_finite() {
            return Err(BeamlineError::Element(
                "deflection angle must be finite".into(),
            ));
        }
        self.deflection = deflection;
        Ok(())
    }
}
impl OpticalOperator for Deflector {
    fn attr(&self) -> &ElementAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ElementAttr {
        &mut self.attr
    }
    fn kind(&self) -> ElementKind {
        ElementKind::Deflector
    }
    fn value(&self) -> f64 {
        self.deflection.get::<degree>()
    }
    fn set_value(&mut self, value: f64) -> BeamResult<()> {
        self.set_deflection(Angle::new::<degree>(value))
    }
    fn transfer(&self) -> TransferMatrix {
        let deflection = self.deflection.get::<radian>();
        TransferMatrix::new(
            TransferComponent::Constant(1.0),
            TransferComponent::Constant(0.0),
            TransferComponent::Constant(0.0),
            TransferComponent::Response(Box::new(move |angle| angle + deflection)),
        )
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::{degree, radian, ray::Ray};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    #[test]
    fn new() {
        let deflector = Deflector::new("D1", degree!(1.5), 20.0).unwrap();
        assert_eq!(deflector.label(), "D1");
        assert_eq!(deflector.z(), 20.0);
        assert_eq!(deflector.kind(), ElementKind::Deflector);
        assert_relative_eq!(deflector.value(), 1.5, max_relative = 1e-12);
        assert!(Deflector::new("D1", radian!(f64::NAN), 0.0).is_err());
        assert!(Deflector::new("D1", radian!(f64::INFINITY), 0.0).is_err());
    }
    #[test]
    fn apply() {
        let deflector = Deflector::new("D1", degree!(90.0), 20.0).unwrap();
        let ray = Ray::new(3.0, radian!(0.1), 20.0, "R0");
        let deflected = deflector.apply(&ray);
        assert_relative_eq!(
            deflected.angle_rad(),
            0.1 + core::f64::consts::FRAC_PI_2,
            max_relative = 1e-12
        );
        assert_abs_diff_eq!(deflected.x(), 3.0);
        assert_abs_diff_eq!(deflected.z(), 20.0);
        assert_eq!(deflected.label(), "D1(R0)");
    }
    #[test]
    fn apply_additivity() {
        // two deflectors in sequence equal one with the summed angle
        let first = Deflector::new("D1", degree!(10.0), 0.0).unwrap();
        let second = Deflector::new("D2", degree!(20.0), 0.0).unwrap();
        let combined = Deflector::new("D", degree!(30.0), 0.0).unwrap();
        let ray = Ray::new(1.0, radian!(0.05), 0.0, "R0");
        let stepwise = second.apply(&first.apply(&ray));
        let direct = combined.apply(&ray);
        assert_relative_eq!(stepwise.angle_rad(), direct.angle_rad(), max_relative = 1e-12);
        assert_abs_diff_eq!(stepwise.x(), direct.x());
    }
    #[test]
    fn set_value_in_degrees() {
        let mut deflector = Deflector::new("D1", degree!(0.0), 0.0).unwrap();
        deflector.set_value(45.0).unwrap();
        assert_relative_eq!(
            deflector.deflection().get::<radian>(),
            core::f64::consts::FRAC_PI_4,
            max_relative = 1e-12
        );
        assert!(deflector.set_value(f64::NAN).is_err());
    }
}
