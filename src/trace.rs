#![warn(missing_docs)]
//! Sequential application of an operator chain to a single ray
use std::fmt::Display;

use log::warn;
use nalgebra::MatrixXx3;
use serde::{Deserialize, Serialize};
use uom::si::f64::Angle;

use crate::{
    elements::{Element, OpticalOperator},
    error::{BeamResult, BeamlineError},
    ray::Ray,
};

/// The ordered sequence of rays produced by tracing one initial ray through an operator
/// chain.
///
/// A [`RayTrace`] moves through three states: empty, seeded with exactly one (initial) ray,
/// and traced with `1 + n` rays after applying an `n`-element chain. Tracing is only valid
/// from the seeded state; [`RayTrace::run`] adds a one-shot self-healing retry on top of
/// that precondition (see there).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RayTrace {
    rays: Vec<Ray>,
    label: String,
}
impl RayTrace {
    /// Create a new [`RayTrace`] from an ordered list of rays.
    #[must_use]
    pub fn new(rays: Vec<Ray>, label: &str) -> Self {
        Self {
            rays,
            label: label.to_owned(),
        }
    }
    /// Create a new [`RayTrace`] seeded with the given initial ray.
    #[must_use]
    pub fn seeded(ray: Ray, label: &str) -> Self {
        Self::new(vec![ray], label)
    }
    /// Clear this trace and seed it with a new initial ray.
    ///
    /// This transitions any state back to the seeded state.
    pub fn initialize(&mut self, x: f64, angle: Angle, z: f64, label: &str) {
        self.rays.clear();
        self.rays.push(Ray::new(x, angle, z, label));
    }
    /// Returns the rays of this [`RayTrace`] in trace order.
    #[must_use]
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }
    /// Returns the number of rays in this [`RayTrace`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.rays.len()
    }
    /// Returns `true` if this [`RayTrace`] contains no rays.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }
    /// Returns the label of this [`RayTrace`].
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
    fn seed(&self) -> BeamResult<Ray> {
        if self.rays.len() != 1 {
            return Err(BeamlineError::Retrace(format!(
                "can only trace from exactly one initial ray, trace \"{}\" holds {}",
                self.label,
                self.rays.len()
            )));
        }
        self.rays
            .last()
            .cloned()
            .ok_or_else(|| BeamlineError::Retrace("trace is empty".into()))
    }
    /// Apply the given operator chain in order, appending one transformed ray per operator.
    ///
    /// Each operator consumes the previous output ray and produces the next one. The
    /// operators themselves are untouched; this is the entry point safe for tracing many
    /// rays through a shared chain.
    ///
    /// # Errors
    ///
    /// This function will return an error if this trace is not in the seeded state.
    pub fn trace(&mut self, chain: &[Element]) -> BeamResult<()> {
        let mut current = self.seed()?;
        for operator in chain {
            current = operator.apply(&current);
            self.rays.push(current.clone());
        }
        Ok(())
    }
    /// Apply the given operator chain and write each operator's axial position back.
    ///
    /// Identical to [`RayTrace::trace`] except that after every application the operator's
    /// own `z` is overwritten with the resulting ray's `z`. This couples trace-time
    /// bookkeeping back into shared operator state, so it is strictly a single-ray
    /// diagnostic tool: tracing several rays through the same chain this way overwrites the
    /// positions repeatedly. Taking the chain mutably keeps any parallel batch use from
    /// compiling.
    ///
    /// # Errors
    ///
    /// This function will return an error if this trace is not in the seeded state or an
    /// operator rejects the written position.
    pub fn trace_set_z(&mut self, chain: &mut [Element]) -> BeamResult<()> {
        let mut current = self.seed()?;
        for operator in chain {
            current = operator.apply(&current);
            operator.set_z(current.z())?;
            self.rays.push(current.clone());
        }
        Ok(())
    }
    /// Trace with a one-shot self-healing retry.
    ///
    /// On a retrace precondition failure this logs a warning, re-seeds the trace from its
    /// own first ray and retries exactly once; a second consecutive failure (or an empty
    /// trace, which has no ray to re-seed from) propagates the error.
    ///
    /// # Errors
    ///
    /// This function will return an error if the retry fails or nothing can be re-seeded.
    pub fn run(&mut self, chain: &[Element]) -> BeamResult<()> {
        match self.trace(chain) {
            Ok(()) => Ok(()),
            Err(BeamlineError::Retrace(msg)) => {
                warn!("{msg}");
                let first = self
                    .rays
                    .first()
                    .cloned()
                    .ok_or(BeamlineError::Retrace(msg))?;
                warn!("reinitializing ray trace \"{}\"", self.label);
                self.initialize(first.x(), first.angle(), first.z(), first.label());
                self.trace(chain)
            }
            Err(e) => Err(e),
        }
    }
    /// Return the traced path as a matrix with one (x, z, angle in radians) row per ray.
    #[must_use]
    pub fn path(&self) -> MatrixXx3<f64> {
        let mut path = MatrixXx3::<f64>::zeros(self.rays.len());
        for (idx, ray) in self.rays.iter().enumerate() {
            path[(idx, 0)] = ray.x();
            path[(idx, 1)] = ray.z();
            path[(idx, 2)] = ray.angle_rad();
        }
        path
    }
}
impl Display for RayTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RayTrace \"{}\":", self.label)?;
        for ray in &self.rays {
            write!(f, "\n\t{ray}")?;
        }
        Ok(())
    }
}
