#![warn(missing_docs)]
//! Ray transfer matrices whose entries are constants or response functions
use std::fmt::Debug;

/// A single entry of a [`TransferMatrix`].
///
/// First-order elements use plain scalar entries which combine linearly with their
/// phase-space coordinate. Elements with a position (or angle) dependent response use the
/// [`TransferComponent::Response`] variant instead: the boxed function is *invoked* with the
/// coordinate of its matrix slot and its return value is used as-is, which allows exact
/// (non-paraxial) element models within the same 2×2 structure.
pub enum TransferComponent {
    /// plain scalar entry, scales its phase-space coordinate
    Constant(f64),
    /// entry evaluated as a function of its phase-space coordinate
    Response(Box<dyn Fn(f64) -> f64>),
}
impl TransferComponent {
    /// Combine this component with the given phase-space coordinate.
    ///
    /// A [`TransferComponent::Constant`] scales the coordinate, a
    /// [`TransferComponent::Response`] is invoked with it.
    #[must_use]
    pub fn combine(&self, coordinate: f64) -> f64 {
        match self {
            Self::Constant(c) => c * coordinate,
            Self::Response(response) => response(coordinate),
        }
    }
    /// Returns `true` if this component is a [`TransferComponent::Response`].
    #[must_use]
    pub const fn is_response(&self) -> bool {
        matches!(self, Self::Response(_))
    }
}
impl Debug for TransferComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant(c) => write!(f, "Constant({c:?})"),
            Self::Response(_) => write!(f, "Response(fn)"),
        }
    }
}

/// The 2×2 transfer structure of an optical element.
///
/// A matrix `[[A, B], [C, D]]` maps a ray `(x, θ)` to `(A∘x + B∘θ, C∘x + D∘θ)` where `∘` is
/// [`TransferComponent::combine`]. The `a` and `c` slots therefore see the input transverse
/// offset, while `b` and `d` see the input angle (in radians). Note that this means a
/// response in the `b` slot is a function of the *angle*; the free-space propagator uses
/// exactly that for its exact `tan(θ)·d` transverse advance.
#[derive(Debug)]
pub struct TransferMatrix {
    a: TransferComponent,
    b: TransferComponent,
    c: TransferComponent,
    d: TransferComponent,
}
impl TransferMatrix {
    /// Creates a new [`TransferMatrix`] from its four components.
    #[must_use]
    pub const fn new(
        a: TransferComponent,
        b: TransferComponent,
        c: TransferComponent,
        d: TransferComponent,
    ) -> Self {
        Self { a, b, c, d }
    }
    /// Creates the identity transfer matrix.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            a: TransferComponent::Constant(1.0),
            b: TransferComponent::Constant(0.0),
            c: TransferComponent::Constant(0.0),
            d: TransferComponent::Constant(1.0),
        }
    }
    /// Map the phase-space pair (x, angle in radians) through this matrix.
    #[must_use]
    pub fn transform(&self, x: f64, angle: f64) -> (f64, f64) {
        (
            self.a.combine(x) + self.b.combine(angle),
            self.c.combine(x) + self.d.combine(angle),
        )
    }
}
