#![warn(missing_docs)]
//! A preset transmission-electron-microscope column
use crate::{
    degree,
    elements::{Deflector, Element, Lens, OpticalOperator},
    error::{BeamResult, BeamlineError},
    screen::Screen,
    source::Source,
    system::OpticalSystem,
    trace::RayTrace,
};

/// A JEM2100F-style transmission-electron-microscope column.
///
/// This is a ready-made [`OpticalSystem`]: a gun crossover source at `z = 100` emitting a
/// ±0.2° ray fan from a finite-size crossover, the condenser/objective/intermediate/
/// projector lens stack with its deflector pairs, and a viewing screen at `z = −100`. All
/// elements are reachable through named accessors for interactive column tuning.
#[derive(Debug, Clone)]
pub struct Microscope {
    system: OpticalSystem,
}
impl Microscope {
    /// Create a new [`Microscope`] with the default column layout.
    ///
    /// # Errors
    ///
    /// This function will return an error if the column cannot be assembled (which would
    /// indicate an inconsistent preset table).
    pub fn new() -> BeamResult<Self> {
        let mut source = Source::new(100.0, vec![degree!(-0.2), degree!(0.2)])?;
        source.set_size(1.0)?;
        source.set_points(2)?;
        let elements: Vec<Element> = vec![
            Lens::new("CL1", 10.0, 90.0)?.into(),
            Deflector::new("Gun1", degree!(0.0), 80.0)?.into(),
            Deflector::new("Gun2", degree!(0.0), 75.0)?.into(),
            Lens::new("CL3", 10.0, 65.0)?.into(),
            Deflector::new("CLA1", degree!(0.0), 50.0)?.into(),
            Deflector::new("CLA2", degree!(0.0), 45.0)?.into(),
            Lens::new("CM", 10.0, 30.0)?.into(),
            Lens::new("OLpre", 10.0, 5.0)?.into(),
            Lens::new("OLpost", 10.0, -5.0)?.into(),
            Lens::new("IL1", 10.0, -15.0)?.into(),
            Deflector::new("ILA1", degree!(0.0), -20.0)?.into(),
            Deflector::new("ILA2", degree!(0.0), -25.0)?.into(),
            Lens::new("IL2", 10.0, -30.0)?.into(),
            Lens::new("IL3", 10.0, -40.0)?.into(),
            Deflector::new("PLA", degree!(0.0), -50.0)?.into(),
            Lens::new("PL", 10.0, -60.0)?.into(),
        ];
        Ok(Self {
            system: OpticalSystem::new("JEM2100F", source, elements, Screen::new(-100.0)?)?,
        })
    }
    /// Returns a reference to the underlying [`OpticalSystem`].
    #[must_use]
    pub const fn system(&self) -> &OpticalSystem {
        &self.system
    }
    /// Returns a mutable reference to the underlying [`OpticalSystem`].
    pub fn system_mut(&mut self) -> &mut OpticalSystem {
        &mut self.system
    }
    /// Look up a lens by its label.
    ///
    /// # Errors
    ///
    /// This function will return an error if the label is unknown or names an operator of a
    /// different kind.
    pub fn lens(&self, label: &str) -> BeamResult<&Lens> {
        match self.system.operator(label)? {
            Element::Lens(lens) => Ok(lens),
            other => Err(BeamlineError::Element(format!(
                "operator \"{label}\" is a {}, not a lens",
                other.kind()
            ))),
        }
    }
    /// Look up a lens by its label, mutably.
    ///
    /// # Errors
    ///
    /// This function will return an error if the label is unknown or names an operator of a
    /// different kind.
    pub fn lens_mut(&mut self, label: &str) -> BeamResult<&mut Lens> {
        match self.system.operator_mut(label)? {
            Element::Lens(lens) => Ok(lens),
            other => Err(BeamlineError::Element(format!(
                "operator \"{label}\" is a {}, not a lens",
                other.kind()
            ))),
        }
    }
    /// Look up a deflector by its label.
    ///
    /// # Errors
    ///
    /// This function will return an error if the label is unknown or names an operator of a
    /// different kind.
    pub fn deflector(&self, label: &str) -> BeamResult<&Deflector> {
        match self.system.operator(label)? {
            Element::Deflector(deflector) => Ok(deflector),
            other => Err(BeamlineError::Element(format!(
                "operator \"{label}\" is a {}, not a deflector",
                other.kind()
            ))),
        }
    }
    /// The first condenser lens.
    ///
    /// # Errors
    /// See [`Microscope::lens`].
    pub fn cl1(&self) -> BeamResult<&Lens> {
        self.lens("CL1")
    }
    /// The third condenser lens (brightness lens).
    ///
    /// # Errors
    /// See [`Microscope::lens`].
    pub fn cl3(&self) -> BeamResult<&Lens> {
        self.lens("CL3")
    }
    /// The condenser mini lens.
    ///
    /// # Errors
    /// See [`Microscope::lens`].
    pub fn cm(&self) -> BeamResult<&Lens> {
        self.lens("CM")
    }
    /// The objective pre-field lens.
    ///
    /// # Errors
    /// See [`Microscope::lens`].
    pub fn ol_pre(&self) -> BeamResult<&Lens> {
        self.lens("OLpre")
    }
    /// The objective post-field lens.
    ///
    /// # Errors
    /// See [`Microscope::lens`].
    pub fn ol_post(&self) -> BeamResult<&Lens> {
        self.lens("OLpost")
    }
    /// The first intermediate lens.
    ///
    /// # Errors
    /// See [`Microscope::lens`].
    pub fn il1(&self) -> BeamResult<&Lens> {
        self.lens("IL1")
    }
    /// The second intermediate lens.
    ///
    /// # Errors
    /// See [`Microscope::lens`].
    pub fn il2(&self) -> BeamResult<&Lens> {
        self.lens("IL2")
    }
    /// The third intermediate lens.
    ///
    /// # Errors
    /// See [`Microscope::lens`].
    pub fn il3(&self) -> BeamResult<&Lens> {
        self.lens("IL3")
    }
    /// The projector lens.
    ///
    /// # Errors
    /// See [`Microscope::lens`].
    pub fn pl(&self) -> BeamResult<&Lens> {
        self.lens("PL")
    }
    /// The first gun deflector.
    ///
    /// # Errors
    /// See [`Microscope::deflector`].
    pub fn gun1(&self) -> BeamResult<&Deflector> {
        self.deflector("Gun1")
    }
    /// The second gun deflector.
    ///
    /// # Errors
    /// See [`Microscope::deflector`].
    pub fn gun2(&self) -> BeamResult<&Deflector> {
        self.deflector("Gun2")
    }
    /// The first condenser alignment deflector.
    ///
    /// # Errors
    /// See [`Microscope::deflector`].
    pub fn cla1(&self) -> BeamResult<&Deflector> {
        self.deflector("CLA1")
    }
    /// The second condenser alignment deflector.
    ///
    /// # Errors
    /// See [`Microscope::deflector`].
    pub fn cla2(&self) -> BeamResult<&Deflector> {
        self.deflector("CLA2")
    }
    /// The first intermediate alignment deflector.
    ///
    /// # Errors
    /// See [`Microscope::deflector`].
    pub fn ila1(&self) -> BeamResult<&Deflector> {
        self.deflector("ILA1")
    }
    /// The second intermediate alignment deflector.
    ///
    /// # Errors
    /// See [`Microscope::deflector`].
    pub fn ila2(&self) -> BeamResult<&Deflector> {
        self.deflector("ILA2")
    }
    /// The projector alignment deflector.
    ///
    /// # Errors
    /// See [`Microscope::deflector`].
    pub fn pla(&self) -> BeamResult<&Deflector> {
        self.deflector("PLA")
    }
    /// Returns the brightness of this [`Microscope`] (the CL3 focal length).
    ///
    /// # Errors
    /// See [`Microscope::lens`].
    pub fn brightness(&self) -> BeamResult<f64> {
        Ok(self.cl3()?.focal_length())
    }
    /// Sets the brightness of this [`Microscope`] (the CL3 focal length).
    ///
    /// # Errors
    ///
    /// This function will return an error if the given value is not finite.
    pub fn set_brightness(&mut self, value: f64) -> BeamResult<()> {
        self.lens_mut("CL3")?.set_focal_length(value)
    }
    /// Trace one batch of gun rays through the column.
    ///
    /// # Errors
    /// See [`OpticalSystem::trace`].
    pub fn trace(&self) -> BeamResult<Vec<RayTrace>> {
        self.system.trace()
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::elements::ElementKind;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    #[test]
    fn new() {
        let microscope = Microscope::new().unwrap();
        assert_eq!(microscope.system().label(), "JEM2100F");
        assert_eq!(microscope.system().count(ElementKind::Lens), 9);
        assert_eq!(microscope.system().count(ElementKind::Deflector), 7);
        // 16 physical elements need 17 gaps
        assert_eq!(microscope.system().count(ElementKind::Propagator), 17);
    }
    #[test]
    fn accessors() {
        let microscope = Microscope::new().unwrap();
        assert_eq!(microscope.cl1().unwrap().z(), 90.0);
        assert_eq!(microscope.cl3().unwrap().z(), 65.0);
        assert_eq!(microscope.cm().unwrap().z(), 30.0);
        assert_eq!(microscope.ol_pre().unwrap().z(), 5.0);
        assert_eq!(microscope.ol_post().unwrap().z(), -5.0);
        assert_eq!(microscope.il1().unwrap().z(), -15.0);
        assert_eq!(microscope.il2().unwrap().z(), -30.0);
        assert_eq!(microscope.il3().unwrap().z(), -40.0);
        assert_eq!(microscope.pl().unwrap().z(), -60.0);
        assert_eq!(microscope.gun1().unwrap().z(), 80.0);
        assert_eq!(microscope.gun2().unwrap().z(), 75.0);
        assert_eq!(microscope.cla1().unwrap().z(), 50.0);
        assert_eq!(microscope.cla2().unwrap().z(), 45.0);
        assert_eq!(microscope.ila1().unwrap().z(), -20.0);
        assert_eq!(microscope.ila2().unwrap().z(), -25.0);
        assert_eq!(microscope.pla().unwrap().z(), -50.0);
    }
    #[test]
    fn accessor_kind_mismatch() {
        let microscope = Microscope::new().unwrap();
        assert_matches!(microscope.lens("Gun1"), Err(BeamlineError::Element(_)));
        assert_matches!(microscope.deflector("CL1"), Err(BeamlineError::Element(_)));
        assert_matches!(microscope.lens("nope"), Err(BeamlineError::Lookup(_)));
    }
    #[test]
    fn brightness() {
        let mut microscope = Microscope::new().unwrap();
        assert_relative_eq!(microscope.brightness().unwrap(), 10.0);
        microscope.set_brightness(12.5).unwrap();
        assert_relative_eq!(microscope.brightness().unwrap(), 12.5);
        assert!(microscope.set_brightness(f64::NAN).is_err());
    }
    #[test]
    fn trace() {
        let microscope = Microscope::new().unwrap();
        let traces = microscope.trace().unwrap();
        // 2 launch positions × 2 angles
        assert_eq!(traces.len(), 4);
        for trace in &traces {
            assert_eq!(trace.len(), 1 + microscope.system().len());
        }
    }
}
