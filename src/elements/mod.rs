#![warn(missing_docs)]
//! This module contains the optical operator abstraction and the concrete element kinds
//! (propagators, lenses, deflectors).
mod deflector;
mod element_attr;
mod lens;
mod propagator;

pub use deflector::Deflector;
pub use element_attr::ElementAttr;
pub use lens::Lens;
pub use propagator::Propagator;

use serde::{Deserialize, Serialize};
use strum::Display;
use uom::si::{angle::radian, f64::Angle};

use crate::{error::BeamResult, ray::Ray, transfer::TransferMatrix};

/// The concrete kind of an optical element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ElementKind {
    /// a free-space gap
    Propagator,
    /// a thin lens
    Lens,
    /// a constant-angle beam deflector
    Deflector,
}

/// This is the basic trait that must be implemented by all concrete optical elements.
///
/// An optical operator transforms one [`Ray`] into a new one through its 2×2
/// [`TransferMatrix`] (see [`OpticalOperator::apply`]). Besides the transform itself, every
/// operator carries the shared [`ElementAttr`] attributes and a kind specific scalar `value`
/// (propagation distance, focal length or deflection angle in degrees).
pub trait OpticalOperator {
    /// Return the shared attributes of this element.
    fn attr(&self) -> &ElementAttr;
    /// Return the shared attributes of this element as mutable.
    fn attr_mut(&mut self) -> &mut ElementAttr;
    /// Return the kind of this element.
    fn kind(&self) -> ElementKind;
    /// Return the physically meaningful scalar of this element.
    ///
    /// This is the propagation distance for a propagator, the focal length for a lens and
    /// the deflection angle *in degrees* for a deflector.
    fn value(&self) -> f64;
    /// Set the physically meaningful scalar of this element (see [`OpticalOperator::value`]).
    ///
    /// # Errors
    ///
    /// This function will return an error if the given value is not finite.
    fn set_value(&mut self, value: f64) -> BeamResult<()>;
    /// Return the transfer matrix of this element.
    fn transfer(&self) -> TransferMatrix;
    /// Return the axial displacement this element imposes on a transformed ray.
    ///
    /// Only a propagator moves rays along the axis; all other elements transform in place.
    fn axial_shift(&self) -> f64 {
        0.0
    }
    /// Apply this element to the given ray, producing the transformed ray.
    ///
    /// The four transfer components are evaluated with the *input* ray's phase-space
    /// coordinates (constants combine linearly, responses are invoked, see
    /// [`TransferMatrix::transform`]). The resulting ray is advanced axially by
    /// [`OpticalOperator::axial_shift`] and labeled `"<element label>(<ray label>)"`. This is
    /// a pure function of the input ray and the element state.
    fn apply(&self, ray: &Ray) -> Ray {
        let (x, angle) = self.transfer().transform(ray.x(), ray.angle_rad());
        Ray::new(
            x,
            Angle::new::<radian>(angle),
            ray.z() + self.axial_shift(),
            &format!("{}({})", self.attr().label(), ray.label()),
        )
    }
    /// Returns the label of this element.
    fn label(&self) -> &str {
        self.attr().label()
    }
    /// Returns the axial position of this element.
    fn z(&self) -> f64 {
        self.attr().z()
    }
    /// Sets the axial position of this element.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given axial position is not finite.
    fn set_z(&mut self, z: f64) -> BeamResult<()> {
        self.attr_mut().set_z(z)
    }
    /// Returns the lateral offset of this element's optical axis.
    fn offset(&self) -> f64 {
        self.attr().offset()
    }
    /// Sets the lateral offset of this element's optical axis.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given offset is not finite.
    fn set_offset(&mut self, offset: f64) -> BeamResult<()> {
        self.attr_mut().set_offset(offset)
    }
}

/// An optical element of any concrete kind.
///
/// This enum is the storage form of the three operator kinds within an optical system. It
/// implements [`OpticalOperator`] by delegation, so a chain of elements can be applied
/// uniformly during a trace while the system's fill algorithm can still pattern match the
/// synthesized propagators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Element {
    /// a free-space gap
    Propagator(Propagator),
    /// a thin lens
    Lens(Lens),
    /// a constant-angle beam deflector
    Deflector(Deflector),
}
impl Element {
    /// Returns `true` if this element is a (possibly synthesized) propagator.
    #[must_use]
    pub const fn is_propagator(&self) -> bool {
        matches!(self, Self::Propagator(_))
    }
}
impl OpticalOperator for Element {
    fn attr(&self) -> &ElementAttr {
        match self {
            Self::Propagator(p) => p.attr(),
            Self::Lens(l) => l.attr(),
            Self::Deflector(d) => d.attr(),
        }
    }
    fn attr_mut(&mut self) -> &mut ElementAttr {
        match self {
            Self::Propagator(p) => p.attr_mut(),
            Self::Lens(l) => l.attr_mut(),
            Self::Deflector(d) => d.attr_mut(),
        }
    }
    fn kind(&self) -> ElementKind {
        match self {
            Self::Propagator(p) => p.kind(),
            Self::Lens(l) => l.kind(),
            Self::Deflector(d) => d.kind(),
        }
    }
    fn value(&self) -> f64 {
        match self {
            Self::Propagator(p) => p.value(),
            Self::Lens(l) => l.value(),
            Self::Deflector(d) => d.value(),
        }
    }
    fn set_value(&mut self, value: f64) -> BeamResult<()> {
        match self {
            Self::Propagator(p) => p.set_value(value),
            Self::Lens(l) => l.set_value(value),
            Self::Deflector(d) => d.set_value(value),
        }
    }
    fn transfer(&self) -> TransferMatrix {
        match self {
            Self::Propagator(p) => p.transfer(),
            Self::Lens(l) => l.transfer(),
            Self::Deflector(d) => d.transfer(),
        }
    }
    fn axial_shift(&self) -> f64 {
        match self {
            Self::Propagator(p) => p.axial_shift(),
            Self::Lens(l) => l.axial_shift(),
            Self::Deflector(d) => d.axial_shift(),
        }
    }
}
impl From<Propagator> for Element {
    fn from(propagator: Propagator) -> Self {
        Self::Propagator(propagator)
    }
}
impl From<Lens> for Element {
    fn from(lens: Lens) -> Self {
        Self::Lens(lens)
    }
}
impl From<Deflector> for Element {
    fn from(deflector: Deflector) -> Self {
        Self::Deflector(deflector)
    }
}
impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} \"{}\": value = {}, offset = {}, size = {}, z = {}",
            self.kind(),
            self.label(),
            self.value(),
            self.offset(),
            self.attr().size(),
            self.z()
        )
    }
}
